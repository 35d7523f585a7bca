use std::borrow::Cow;

/// Elements whose entire content is dropped, not just the surrounding tags.
const SWALLOWED_ELEMENTS: [&str; 2] = ["script", "style"];

/// SEC-001: Strip HTML/XML markup from untrusted generated text.
///
/// Generated article bodies are stored and served as plain text, so any
/// markup in them is either model noise or an injection attempt. This
/// removes:
/// - `<script>` and `<style>` elements including everything between the
///   opening and closing tags
/// - every other `<...>` tag, keeping the text between tags
///
/// A `<` that cannot open a tag (not followed by a letter, `/`, `!`, or `?`)
/// is ordinary text and is preserved. An unterminated tag swallows the rest
/// of the input rather than letting a truncated payload leak markup through.
///
/// Returns `Cow::Borrowed` when the input contains no `<` at all (common case).
pub fn strip_markup(s: &str) -> Cow<'_, str> {
    if !s.contains('<') {
        return Cow::Borrowed(s);
    }

    let bytes = s.as_bytes();
    let len = bytes.len();
    let mut out = String::with_capacity(len);
    let mut i = 0;

    while i < len {
        if bytes[i] == b'<' && opens_tag(bytes, i) {
            if let Some(name) = swallowed_element_at(bytes, i) {
                i = skip_swallowed_element(bytes, i, name);
                continue;
            }
            // Plain tag: skip through the closing '>'. No '>' means the tag
            // runs to the end of input and takes the remainder with it.
            match bytes[i..].iter().position(|&b| b == b'>') {
                Some(offset) => i += offset + 1,
                None => i = len,
            }
        } else {
            // Safe byte — find the run up to the next real tag opener
            let start = i;
            i += 1;
            while i < len && !(bytes[i] == b'<' && opens_tag(bytes, i)) {
                i += 1;
            }
            // SAFETY of slicing: we only stop on the ASCII byte '<', which
            // cannot appear mid-codepoint in valid UTF-8.
            out.push_str(&s[start..i]);
        }
    }

    Cow::Owned(out)
}

/// True if the byte after `at` can start a tag name per the HTML tokenizer:
/// a letter, `/` (close tag), `!` (comment/doctype), or `?` (PI).
fn opens_tag(bytes: &[u8], at: usize) -> bool {
    match bytes.get(at + 1) {
        Some(&c) => c.is_ascii_alphabetic() || c == b'/' || c == b'!' || c == b'?',
        None => false,
    }
}

/// If the tag opening at `at` is a content-swallowing element, return its name.
fn swallowed_element_at(bytes: &[u8], at: usize) -> Option<&'static str> {
    let rest = bytes.get(at + 1..)?;
    SWALLOWED_ELEMENTS.iter().copied().find(|name| {
        rest.len() >= name.len()
            && rest[..name.len()].eq_ignore_ascii_case(name.as_bytes())
            && matches!(
                rest.get(name.len()),
                None | Some(b'>') | Some(b'/') | Some(b' ') | Some(b'\t') | Some(b'\n') | Some(b'\r')
            )
    })
}

/// Skip from the opening `<` of a swallowed element past its matching close
/// tag. Missing close tags (or a missing final '>') swallow to end of input.
fn skip_swallowed_element(bytes: &[u8], at: usize, name: &str) -> usize {
    let len = bytes.len();

    // Past the opening tag's '>'
    let mut i = match bytes[at..].iter().position(|&b| b == b'>') {
        Some(offset) => at + offset + 1,
        None => return len,
    };

    // Scan for `</name` followed by a tag-name boundary
    while i < len {
        if bytes[i] == b'<' && bytes.get(i + 1) == Some(&b'/') {
            if let Some(tag_name) = bytes.get(i + 2..i + 2 + name.len()) {
                let boundary = matches!(
                    bytes.get(i + 2 + name.len()),
                    None | Some(b'>') | Some(b' ') | Some(b'\t') | Some(b'\n') | Some(b'\r')
                );
                if boundary && tag_name.eq_ignore_ascii_case(name.as_bytes()) {
                    return match bytes[i..].iter().position(|&b| b == b'>') {
                        Some(offset) => i + offset + 1,
                        None => len,
                    };
                }
            }
        }
        i += 1;
    }

    len
}

/// SEC-001: Strip ASCII control characters and ANSI escape sequences from text.
///
/// Generated text can carry control bytes that manipulate terminals (log
/// viewers, `sqlite3` shells) or downstream consumers. Strips:
/// - ASCII control chars: 0x00-0x08, 0x0B-0x0C, 0x0E-0x1F, 0x7F
/// - ANSI CSI sequences: `\x1b[` ... (terminal byte 0x40-0x7E)
/// - ANSI OSC sequences: `\x1b]` ... (until BEL 0x07 or ST `\x1b\\`)
/// - Bare ESC (0x1b) not followed by `[` or `]`
///
/// Preserves: tab (0x09), newline (0x0A), carriage return (0x0D).
///
/// Returns `Cow::Borrowed` when the input contains no control characters —
/// the fast path is a single byte scan with no allocation.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    let bytes = s.as_bytes();
    let len = bytes.len();

    // Fast path: scan for any byte that needs stripping
    let needs_strip = bytes
        .iter()
        .any(|&b| b == 0x1b || b == 0x7f || (b < 0x20 && b != 0x09 && b != 0x0a && b != 0x0d));

    if !needs_strip {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(len);
    let mut i = 0;

    while i < len {
        let b = bytes[i];

        if b == 0x1b {
            // ESC byte — check what follows
            if i + 1 < len && bytes[i + 1] == b'[' {
                // CSI sequence: skip \x1b[ then parameter/intermediate bytes until final byte
                i += 2;
                while i < len {
                    let c = bytes[i];
                    i += 1;
                    if (0x40..=0x7e).contains(&c) {
                        break; // final byte consumed
                    }
                }
            } else if i + 1 < len && bytes[i + 1] == b']' {
                // OSC sequence: skip \x1b] then everything until BEL or ST (\x1b\\)
                i += 2;
                while i < len {
                    if bytes[i] == 0x07 {
                        i += 1; // consume BEL
                        break;
                    }
                    if bytes[i] == 0x1b && i + 1 < len && bytes[i + 1] == b'\\' {
                        i += 2; // consume ST
                        break;
                    }
                    i += 1;
                }
            } else {
                // Bare ESC — skip it
                i += 1;
            }
        } else if b == 0x7f || (b < 0x20 && b != 0x09 && b != 0x0a && b != 0x0d) {
            // Control character (not tab/newline/CR) — skip
            i += 1;
        } else {
            // Safe byte — find the run of safe bytes to batch-copy
            let start = i;
            i += 1;
            while i < len {
                let nb = bytes[i];
                if nb == 0x1b || nb == 0x7f || (nb < 0x20 && nb != 0x09 && nb != 0x0a && nb != 0x0d)
                {
                    break;
                }
                i += 1;
            }
            // SAFETY: we only break on ASCII control bytes, which cannot appear
            // mid-codepoint in valid UTF-8, so s[start..i] is valid UTF-8.
            out.push_str(&s[start..i]);
        }
    }

    Cow::Owned(out)
}

/// SEC-001: Full sanitization pass for one untrusted text field.
///
/// Markup stripping, then control-character stripping, then a trim. Every
/// string that reaches the database goes through here first.
pub fn sanitize_fragment(s: &str) -> String {
    let stripped = strip_markup(s);
    let cleaned = strip_control_chars(&stripped);
    cleaned.trim().to_string()
}
