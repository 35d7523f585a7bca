use serde::Deserialize;

// ============================================================================
// Draft Payload
// ============================================================================
//
// The shapes the generation gateway hands back, exactly as parsed from the
// model's JSON. Everything here is untrusted: fields default rather than
// fail so one missing key does not poison the whole payload, and nothing is
// stored until the validators in [`crate::newsroom::validate`] have passed
// each item individually.

/// Top-level cycle payload.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DraftPayload {
    pub informational_pieces: Vec<DraftArticle>,
    pub advisory: Option<DraftAdvisory>,
    pub tickers: Vec<DraftTicker>,
}

/// One candidate article, pre-validation.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DraftArticle {
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub category: String,
}

/// One candidate safety advisory, pre-validation.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DraftAdvisory {
    pub message: String,
    pub severity: Option<String>,
}

/// One candidate ticker message, pre-validation.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DraftTicker {
    pub label: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_payload_parses() {
        let json = r#"{
            "informational_pieces": [
                {"title": "T", "excerpt": "E", "content": "C", "category": "Fishing"}
            ],
            "advisory": {"message": "Gale warning", "severity": "critical"},
            "tickers": [{"label": "HARBOR", "message": "Floats icy"}]
        }"#;

        let payload: DraftPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.informational_pieces.len(), 1);
        assert_eq!(payload.advisory.as_ref().unwrap().message, "Gale warning");
        assert_eq!(payload.tickers[0].label, "HARBOR");
    }

    #[test]
    fn test_missing_sections_default_empty() {
        let payload: DraftPayload = serde_json::from_str("{}").unwrap();
        assert!(payload.informational_pieces.is_empty());
        assert!(payload.advisory.is_none());
        assert!(payload.tickers.is_empty());
    }

    #[test]
    fn test_missing_item_fields_default_empty() {
        let json = r#"{"informational_pieces": [{"title": "Only a title"}]}"#;
        let payload: DraftPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.informational_pieces[0].title, "Only a title");
        assert_eq!(payload.informational_pieces[0].content, "");
    }

    #[test]
    fn test_advisory_without_severity() {
        let json = r#"{"advisory": {"message": "Trail closed"}}"#;
        let payload: DraftPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.advisory.unwrap().severity, None);
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let json = r#"{"tickers": [], "schedule_note": "6x daily"}"#;
        let payload: DraftPayload = serde_json::from_str(json).unwrap();
        assert!(payload.tickers.is_empty());
    }
}
