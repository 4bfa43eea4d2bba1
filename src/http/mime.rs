//! Content-Type detection module
//!
//! Maps a file extension to the Content-Type a browser expects.

/// Get the Content-Type for a file extension.
///
/// Unknown extensions (and files without one) fall back to
/// `application/octet-stream`.
pub fn content_type_for(extension: Option<&str>) -> &'static str {
    match extension {
        // Markup and styles
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css",
        Some("txt" | "md") => "text/plain; charset=utf-8",
        Some("xml") => "application/xml",

        // Scripts and data
        Some("js" | "mjs") => "application/javascript",
        Some("json" | "map") => "application/json",
        Some("webmanifest") => "application/manifest+json",
        Some("wasm") => "application/wasm",

        // Images
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("webp") => "image/webp",
        Some("avif") => "image/avif",

        // Media
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",
        Some("mp3") => "audio/mpeg",
        Some("ogg") => "audio/ogg",
        Some("wav") => "audio/wav",

        // Fonts
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        Some("otf") => "font/otf",

        // Downloads
        Some("pdf") => "application/pdf",
        Some("zip") => "application/zip",
        Some("gz") => "application/gzip",

        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn website_asset_types() {
        assert_eq!(content_type_for(Some("html")), "text/html; charset=utf-8");
        assert_eq!(content_type_for(Some("css")), "text/css");
        assert_eq!(content_type_for(Some("js")), "application/javascript");
        assert_eq!(content_type_for(Some("svg")), "image/svg+xml");
        assert_eq!(content_type_for(Some("woff2")), "font/woff2");
        assert_eq!(content_type_for(Some("webmanifest")), "application/manifest+json");
    }

    #[test]
    fn source_maps_are_json() {
        assert_eq!(content_type_for(Some("map")), "application/json");
    }

    #[test]
    fn unknown_extension_falls_back() {
        assert_eq!(content_type_for(Some("xyz")), "application/octet-stream");
        assert_eq!(content_type_for(None), "application/octet-stream");
    }
}
