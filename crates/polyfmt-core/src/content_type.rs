//! Content-type identifiers and their canonical file extensions.
//!
//! Editors describe the text they hand over with a type identifier such as
//! `public.swift-source`. The dispatcher only needs an extension from it, to
//! filter formatters and to name the temporary copy.

/// Content-type identifier to canonical extension.
const CONTENT_TYPES: &[(&str, &str)] = &[
    ("public.swift-source", "swift"),
    ("public.c-source", "c"),
    ("public.c-header", "h"),
    ("public.c-plus-plus-source", "cpp"),
    ("public.c-plus-plus-header", "hpp"),
    ("public.objective-c-source", "m"),
    ("public.objective-c-plus-plus-source", "mm"),
    ("com.sun.java-source", "java"),
    ("com.microsoft.c-sharp-source", "cs"),
    ("public.protobuf-source", "proto"),
    ("public.json", "json"),
    ("com.netscape.javascript-source", "js"),
    ("com.microsoft.typescript", "ts"),
    ("public.css", "css"),
    ("public.html", "html"),
    ("net.daringfireball.markdown", "md"),
    ("public.yaml", "yaml"),
    ("public.xml", "xml"),
    ("com.apple.dt.playground", "swift"),
];

/// Returns the canonical extension for a content-type identifier.
///
/// An identifier that is not in the table and contains no `.` is taken to
/// be a bare extension, so `"swift"` maps to `swift`.
pub fn canonical_extension(content_type: &str) -> Option<String> {
    if let Some((_, ext)) = CONTENT_TYPES.iter().find(|(ct, _)| *ct == content_type) {
        return Some((*ext).to_string());
    }
    if !content_type.is_empty() && !content_type.contains('.') {
        return Some(content_type.to_ascii_lowercase());
    }
    None
}

/// Infers a content-type identifier from a file extension.
///
/// Falls back to the extension itself, which [`canonical_extension`] maps
/// back to the same extension.
pub fn for_extension(extension: &str) -> String {
    let lower = extension.to_ascii_lowercase();
    CONTENT_TYPES
        .iter()
        .find(|(_, ext)| *ext == lower)
        .map(|(ct, _)| (*ct).to_string())
        .unwrap_or(lower)
}
