//! Upload filename handling
//!
//! Uploaded filenames are untrusted: they are flattened to a safe character
//! set before being stored, and the audio format tag is derived from the
//! (sanitized) extension.

use tarab_common::{Error, Result};

/// Audio formats accepted for upload
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["mp3", "wav", "flac", "m4a"];

/// Format tag assumed when a filename carries no extension
pub const DEFAULT_FILE_TYPE: &str = "mp3";

/// Sanitize an uploaded filename: drop any path components, keep only
/// alphanumerics, dot, dash and underscore, collapse everything else to `_`.
pub fn sanitize_filename(raw: &str) -> String {
    // Keep only the final path component, whichever separator the client used
    let base = raw.rsplit(['/', '\\']).next().unwrap_or(raw);

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    // ".." would escape upward if the name were ever joined onto a path
    let cleaned = cleaned.trim_matches('.').to_string();
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

/// Lowercase extension of a filename, if it has one
pub fn extension_of(filename: &str) -> Option<String> {
    let (stem, ext) = filename.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Derive the stored file_type from a filename, defaulting when no extension
/// is present
pub fn file_type_of(filename: &str) -> String {
    extension_of(filename).unwrap_or_else(|| DEFAULT_FILE_TYPE.to_string())
}

/// Reject audio uploads whose extension is not in the allowed set
pub fn check_allowed_extension(filename: &str) -> Result<()> {
    match extension_of(filename) {
        Some(ext) if ALLOWED_EXTENSIONS.contains(&ext.as_str()) => Ok(()),
        Some(ext) => Err(Error::Validation(format!(
            "File type '{}' not allowed (allowed: {})",
            ext,
            ALLOWED_EXTENSIONS.join(", ")
        ))),
        None => Err(Error::Validation(
            "Audio file has no extension".to_string(),
        )),
    }
}
