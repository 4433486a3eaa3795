//! Best-effort classification of generated text as prose or fenced code.
//!
//! The heuristic lives behind this pure function boundary so it can be
//! swapped or disabled without touching storage or prompt logic. Malformed
//! fences always degrade to prose, never to an error.

/// What the model produced, as far as fence sniffing can tell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneratedContent {
    /// No well-formed, language-tagged fenced block was found.
    Prose(String),
    /// The first well-formed fenced block in the response.
    Code { language: String, code: String },
}

impl GeneratedContent {
    /// The code payload, when this is a code block.
    pub fn code(&self) -> Option<&str> {
        match self {
            GeneratedContent::Code { code, .. } => Some(code),
            GeneratedContent::Prose(_) => None,
        }
    }
}

/// Classify a raw model response.
///
/// A response counts as code when it contains an opening fence followed by a
/// language tag on the same line, and a matching closing fence later on. The
/// payload is the text between the end of the opener line and the closing
/// fence, fences excluded. An opener without a closer, or a bare fence with
/// no tag, yields `Prose` with the whole response untouched.
pub fn classify_response(text: &str) -> GeneratedContent {
    match find_fenced_block(text) {
        Some((language, code)) => GeneratedContent::Code { language, code },
        None => GeneratedContent::Prose(text.to_string()),
    }
}

const FENCE: &str = "```";

/// Find the first language-tagged fenced block with a closing fence.
fn find_fenced_block(text: &str) -> Option<(String, String)> {
    let mut search_from = 0;

    while let Some(found) = text[search_from..].find(FENCE) {
        let open = search_from + found;
        let rest = &text[open + FENCE.len()..];

        // The language tag runs to the end of the opener line.
        let Some(line_end) = rest.find('\n') else {
            return None;
        };
        let tag = rest[..line_end].trim();

        if is_language_tag(tag) {
            let body_start = open + FENCE.len() + line_end + 1;
            let close = text[body_start..].find(FENCE)?;
            return Some((
                tag.to_string(),
                text[body_start..body_start + close].to_string(),
            ));
        }

        // Untagged fence: not an opener we accept, keep scanning.
        search_from = open + FENCE.len();
    }

    None
}

/// Whether a fence annotation looks like a language identifier.
fn is_language_tag(tag: &str) -> bool {
    !tag.is_empty()
        && tag.len() <= 20
        && tag
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '#' | '_' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_python_block() {
        let response = "Here you go:\n```python\nprint(\"hola\")\n```\nEnjoy.";
        let content = classify_response(response);
        assert_eq!(
            content,
            GeneratedContent::Code {
                language: "python".to_string(),
                code: "print(\"hola\")\n".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_closer_degrades_to_prose() {
        let response = "```python\nprint(\"hola\")";
        let content = classify_response(response);
        assert_eq!(content, GeneratedContent::Prose(response.to_string()));
    }

    #[test]
    fn test_untagged_fence_is_prose() {
        let response = "```\nnot really code\n```";
        let content = classify_response(response);
        assert_eq!(content, GeneratedContent::Prose(response.to_string()));
    }

    #[test]
    fn test_plain_prose() {
        let response = "Quicksort partitions around a pivot.";
        assert_eq!(
            classify_response(response),
            GeneratedContent::Prose(response.to_string())
        );
    }

    #[test]
    fn test_first_tagged_block_wins() {
        let response = "```rust\nfn main() {}\n```\n```python\npass\n```";
        match classify_response(response) {
            GeneratedContent::Code { language, code } => {
                assert_eq!(language, "rust");
                assert_eq!(code, "fn main() {}\n");
            }
            other => panic!("expected code, got {other:?}"),
        }
    }

    #[test]
    fn test_language_tags_with_punctuation() {
        let response = "```c++\nint x;\n```";
        match classify_response(response) {
            GeneratedContent::Code { language, .. } => assert_eq!(language, "c++"),
            other => panic!("expected code, got {other:?}"),
        }
    }

    #[test]
    fn test_prose_sentence_with_backticks_mid_line() {
        // A fence opener with no newline after it cannot start a block.
        let response = "use ``` to fence code";
        assert_eq!(
            classify_response(response),
            GeneratedContent::Prose(response.to_string())
        );
    }

    #[test]
    fn test_code_accessor() {
        let content = classify_response("```python\nx = 1\n```");
        assert_eq!(content.code(), Some("x = 1\n"));
        assert_eq!(classify_response("plain").code(), None);
    }
}
