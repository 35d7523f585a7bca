use crate::storage::Category;

// ============================================================================
// Prompts
// ============================================================================

/// Fixed role/style prompt sent as the system message on every cycle.
pub const SYSTEM_PROMPT: &str = r#"You are a local news writer for Tongass News, serving Southeast Alaska including Juneau, Ketchikan, Sitka, Wrangell, Petersburg, Haines, and Skagway.

Write in a fun, encouraging, adventurous, safety-first style. Be warm and community-focused. Include practical advice, local context, and references to specific Tongass region locations.

Topics to cover:
- Inside Passage ferry schedules and conditions
- Mendenhall Glacier viewing updates
- Tongass National Forest recreation
- Commercial fishing fleet news (salmon, halibut, crab)
- Cruise ship arrivals and tourism updates
- Community events in regional towns
- Southeast Alaska weather and marine forecasts
- Wildlife: whales, bears, eagles, sea lions
- Totem pole and cultural heritage events
- Ice field and glacier conditions

Always be accurate about local geography and conditions. Reference real places like Gastineau Channel, Stephens Passage, Icy Strait, Lynn Canal, and other local waterways.

IMPORTANT: All content is authored by "Tongass News" - never use individual author names."#;

/// Per-cycle user prompt. Names the two categories the scheduler picked and
/// pins the JSON response contract the draft parser expects.
pub fn cycle_prompt(primary: Category, secondary: Category) -> String {
    let categories = Category::ALL
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"Generate fresh content for Tongass News. Create the following:

1. TWO informational pieces (400-600 words each) about current happenings in Southeast Alaska. The first piece must be about {primary} and the second about {secondary}. Each should include a compelling title, brief excerpt (1-2 sentences), and full detailed content. Focus on quality over quantity.

2. One weather/safety ADVISORY relevant to the Inside Passage region. This could be about marine conditions, avalanche danger, ferry delays, storm warnings, or safety advisories. ALL ADVISORIES ARE CRITICAL.

3. Three ticker messages about current conditions:
   - One about fishing/harbor conditions
   - One about community events
   - One about weather/safety

Respond in JSON format:
{{
  "informational_pieces": [
    {{
      "title": "string",
      "excerpt": "string (1-2 sentences)",
      "content": "string (400-600 words, detailed and informative)",
      "category": "string (one of: {categories})"
    }},
    {{
      "title": "string",
      "excerpt": "string (1-2 sentences)",
      "content": "string (400-600 words, detailed and informative)",
      "category": "string"
    }}
  ],
  "advisory": {{
    "message": "string (urgent safety advisory)",
    "severity": "critical"
  }},
  "tickers": [
    {{"label": "HARBOR", "message": "string"}},
    {{"label": "EVENTS", "message": "string"}},
    {{"label": "WEATHER", "message": "string"}}
  ]
}}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_prompt_names_both_categories() {
        let prompt = cycle_prompt(Category::Fishing, Category::Maritime);
        assert!(prompt.contains("first piece must be about Fishing"));
        assert!(prompt.contains("second about Maritime"));
    }

    #[test]
    fn test_cycle_prompt_pins_response_contract() {
        let prompt = cycle_prompt(Category::Wildlife, Category::Weather);
        assert!(prompt.contains(r#""informational_pieces""#));
        assert!(prompt.contains(r#""advisory""#));
        assert!(prompt.contains(r#""tickers""#));
        assert!(prompt.contains(r#"{"label": "HARBOR", "message": "string"}"#));
    }

    #[test]
    fn test_cycle_prompt_lists_every_category() {
        let prompt = cycle_prompt(Category::Wildlife, Category::Weather);
        for category in Category::ALL {
            assert!(prompt.contains(category.as_str()), "missing {}", category);
        }
    }

    #[test]
    fn test_system_prompt_fixes_byline() {
        assert!(SYSTEM_PROMPT.contains(r#"authored by "Tongass News""#));
    }
}
