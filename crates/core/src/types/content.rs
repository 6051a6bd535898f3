//! Listing kinds and uploaded-content classification.

use serde::{Deserialize, Serialize};

/// Maximum size of an uploaded dataset file, in bytes (100 MiB).
///
/// The upload collaborator enforces this before bytes reach the gateway;
/// the constant lives here so both sides agree on the limit.
pub const MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

/// How a dataset listing is served to consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ListingKind {
    /// Rows pulled over a warehouse query endpoint.
    #[default]
    Api,
    /// Rows served to an agent integration.
    Agent,
}

/// Classification of uploaded dataset content by declared MIME type.
///
/// Exact matches are checked before prefix matches, so `text/csv` classifies
/// as [`ContentKind::Csv`] rather than [`ContentKind::Text`]. Exact matches
/// are case-sensitive, mirroring how uploads declare them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Image,
    Video,
    Audio,
    Json,
    Csv,
    Text,
    Pdf,
    #[default]
    Unknown,
}

impl ContentKind {
    /// Classify a declared MIME type.
    ///
    /// ```
    /// use datamart_core::ContentKind;
    ///
    /// assert_eq!(ContentKind::from_mime("application/json"), ContentKind::Json);
    /// assert_eq!(ContentKind::from_mime("text/csv"), ContentKind::Csv);
    /// assert_eq!(ContentKind::from_mime("text/html"), ContentKind::Text);
    /// assert_eq!(ContentKind::from_mime("application/octet-stream"), ContentKind::Unknown);
    /// ```
    #[must_use]
    pub fn from_mime(mime: &str) -> Self {
        match mime {
            "application/json" => Self::Json,
            "text/csv" | "application/csv" => Self::Csv,
            "application/pdf" => Self::Pdf,
            _ if mime.starts_with("image/") => Self::Image,
            _ if mime.starts_with("video/") => Self::Video,
            _ if mime.starts_with("audio/") => Self::Audio,
            _ if mime.starts_with("text/") => Self::Text,
            _ => Self::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_matches() {
        assert_eq!(ContentKind::from_mime("application/json"), ContentKind::Json);
        assert_eq!(ContentKind::from_mime("text/csv"), ContentKind::Csv);
        assert_eq!(ContentKind::from_mime("application/csv"), ContentKind::Csv);
        assert_eq!(ContentKind::from_mime("application/pdf"), ContentKind::Pdf);
    }

    #[test]
    fn test_prefix_matches() {
        assert_eq!(ContentKind::from_mime("image/png"), ContentKind::Image);
        assert_eq!(ContentKind::from_mime("video/mp4"), ContentKind::Video);
        assert_eq!(ContentKind::from_mime("audio/ogg"), ContentKind::Audio);
        assert_eq!(ContentKind::from_mime("text/plain"), ContentKind::Text);
    }

    #[test]
    fn test_exact_beats_prefix() {
        // text/csv must classify as Csv even though text/ is a Text prefix
        assert_eq!(ContentKind::from_mime("text/csv"), ContentKind::Csv);
    }

    #[test]
    fn test_exact_matches_are_case_sensitive() {
        assert_eq!(
            ContentKind::from_mime("Application/JSON"),
            ContentKind::Unknown
        );
    }

    #[test]
    fn test_unknown() {
        assert_eq!(
            ContentKind::from_mime("application/octet-stream"),
            ContentKind::Unknown
        );
        assert_eq!(ContentKind::from_mime(""), ContentKind::Unknown);
    }
}
