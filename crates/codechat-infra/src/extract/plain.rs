//! Plain-text content extraction.
//!
//! Turns attachment bytes into prompt text for text-like formats. Binary
//! formats are rejected with `UnsupportedFormat`; the caller then keeps the
//! attachment but omits its body from the prompt.

use std::path::Path;

use codechat_core::storage::extract::ContentExtractor;
use codechat_types::error::ExtractionError;

/// Extractor for UTF-8 text payloads.
pub struct PlainTextExtractor;

impl PlainTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PlainTextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentExtractor for PlainTextExtractor {
    fn extract_text(&self, data: &[u8], declared_type: &str) -> Result<String, ExtractionError> {
        if !is_text_mime(declared_type) {
            return Err(ExtractionError::UnsupportedFormat(declared_type.to_string()));
        }

        String::from_utf8(data.to_vec())
            .map_err(|e| ExtractionError::InvalidEncoding(e.to_string()))
    }
}

/// Detect MIME type from file extension.
pub fn detect_mime(filename: &str) -> String {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        // Text
        "txt" => "text/plain",
        "md" | "markdown" => "text/markdown",
        "csv" => "text/csv",
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "xml" => "text/xml",
        "yaml" | "yml" => "text/yaml",
        "toml" => "text/toml",

        // Code
        "rs" => "text/x-rust",
        "py" => "text/x-python",
        "js" => "text/javascript",
        "ts" => "text/typescript",
        "json" => "application/json",
        "sh" | "bash" => "text/x-shellscript",
        "sql" => "text/x-sql",
        "go" => "text/x-go",
        "java" => "text/x-java",
        "c" | "h" => "text/x-c",
        "cpp" | "hpp" | "cc" | "cxx" => "text/x-c++",

        // Documents
        "pdf" => "application/pdf",

        // Images
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",

        // Default
        _ => "application/octet-stream",
    }
    .to_string()
}

/// Check whether a MIME type represents extractable text content.
pub fn is_text_mime(mime: &str) -> bool {
    mime.starts_with("text/") || mime == "application/json"
}
