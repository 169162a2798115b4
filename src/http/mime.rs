//! MIME type module
//!
//! Content types normally come from store metadata. This table fills the gap for
//! backends without metadata (the local filesystem), keyed on the object's extension.

/// Content type served when the store has none for a blob
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Get MIME Content-Type based on file extension
///
/// # Examples
/// ```
/// use blob_gateway::http::mime::content_type_for_extension;
/// assert_eq!(content_type_for_extension("html"), Some("text/html; charset=utf-8"));
/// assert_eq!(content_type_for_extension("mp4"), Some("video/mp4"));
/// assert_eq!(content_type_for_extension("xyz"), None);
/// ```
pub fn content_type_for_extension(extension: &str) -> Option<&'static str> {
    let content_type = match extension.to_ascii_lowercase().as_str() {
        // Text
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css",
        "txt" | "md" => "text/plain; charset=utf-8",
        "xml" => "application/xml",
        "csv" => "text/csv",

        // JavaScript/WASM
        "js" | "mjs" => "application/javascript",
        "json" | "map" => "application/json",
        "wasm" => "application/wasm",

        // Images
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "webp" => "image/webp",

        // Video
        "mp4" => "video/mp4",
        "webm" => "video/webm",

        // Fonts
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "otf" => "font/otf",

        // Data
        "parquet" => "application/vnd.apache.parquet",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "gz" | "gzip" => "application/gzip",

        _ => return None,
    };
    Some(content_type)
}

/// True for `text/html`, with or without parameters
pub fn is_html(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case("text/html"))
}
