use std::path::Path;

use base64::{
    engine::general_purpose::STANDARD,
    Engine as _,
};
use chrono::Utc;

pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// An inline `data:<mime>;base64,<payload>` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataUrl<'a> {
    pub mime_type: &'a str,
    pub payload: &'a str,
}

impl<'a> DataUrl<'a> {
    /// Only base64 data URLs qualify; anything else is treated as a plain reference.
    pub fn parse(value: &'a str) -> Option<Self> {
        let rest = value.strip_prefix("data:")?;
        let (mime_type, payload) = rest.split_once(";base64,")?;
        Some(DataUrl { mime_type, payload })
    }

    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        STANDARD.decode(self.payload)
    }
}

pub fn to_data_url(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes))
}

/// Replaces everything outside `[A-Za-z0-9.]` with `_` and lowercases the rest.
pub fn sanitize_asset_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' { c.to_ascii_lowercase() } else { '_' })
        .collect()
}

fn path_safe(name: &str) -> String {
    name.chars().map(|c| if matches!(c, '/' | '\\') || c.is_control() { '_' } else { c }).collect()
}

pub fn guess_mime_type(path: &str) -> &'static str {
    let extension = Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        "m4a" => "audio/mp4",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        "pdf" => "application/pdf",
        _ => DEFAULT_MIME_TYPE,
    }
}

/// Hands out asset file names stamped with strictly increasing millisecond timestamps.
#[derive(Debug, Default)]
pub struct AssetNamer {
    last_timestamp: i64,
}

impl AssetNamer {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_timestamp(&mut self) -> i64 {
        let now = Utc::now().timestamp_millis();
        self.last_timestamp = now.max(self.last_timestamp + 1);
        self.last_timestamp
    }

    pub fn gallery_file_name(&mut self, original_name: &str) -> String {
        format!("asset_{}_{}", self.next_timestamp(), sanitize_asset_name(original_name))
    }

    /// The item id is kept as is apart from characters that would break the archive path.
    pub fn thumbnail_file_name(&mut self, item_id: &str) -> String {
        format!("thumb_{}_{}.png", path_safe(item_id), self.next_timestamp())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_asset_name() {
        assert_eq!(sanitize_asset_name("Mona Lisa (1503).JPG"), "mona_lisa__1503_.jpg");
        assert_eq!(sanitize_asset_name("café-olé.mp3"), "caf__ol_.mp3");
        assert_eq!(sanitize_asset_name(""), "");
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        for name in ["Mona Lisa (1503).JPG", "日本の祭り.png", "a/b\\c..d", "already_clean.png"] {
            let once = sanitize_asset_name(name);
            assert_eq!(sanitize_asset_name(&once), once, "not idempotent for {:?}", name);
        }
    }

    #[test]
    fn test_data_url_parsing() {
        let parsed = DataUrl::parse("data:image/png;base64,iVBORw0K").unwrap();
        assert_eq!(parsed.mime_type, "image/png");
        assert_eq!(parsed.payload, "iVBORw0K");

        assert!(DataUrl::parse("https://example.com/a.png").is_none());
        assert!(DataUrl::parse("data:text/plain,hello").is_none());
        assert!(DataUrl::parse("assets/asset_1_a.png").is_none());
    }

    #[test]
    fn test_data_url_round_trip() {
        let url = to_data_url("audio/mpeg", b"ID3\x04\x00");
        let parsed = DataUrl::parse(&url).unwrap();
        assert_eq!(parsed.mime_type, "audio/mpeg");
        assert_eq!(parsed.decode().unwrap(), b"ID3\x04\x00");
    }

    #[test]
    fn test_namer_never_repeats() {
        let mut namer = AssetNamer::new();
        let names: Vec<String> = (0..50).map(|_| namer.gallery_file_name("photo.png")).collect();
        let mut unique = names.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), names.len());

        let thumb = namer.thumbnail_file_name("c-17");
        assert!(thumb.starts_with("thumb_c-17_"));
        assert!(thumb.ends_with(".png"));
    }

    #[test]
    fn test_thumbnail_keeps_item_id() {
        let mut namer = AssetNamer::new();
        assert!(namer.thumbnail_file_name("c-1712345").starts_with("thumb_c-1712345_"));
        assert!(namer.thumbnail_file_name("../c/1").starts_with("thumb_.._c_1_"));
    }

    #[test]
    fn test_guess_mime_type() {
        assert_eq!(guess_mime_type("assets/thumb_c1_1.png"), "image/png");
        assert_eq!(guess_mime_type("assets/asset_1_song.MP3"), "audio/mpeg");
        assert_eq!(guess_mime_type("assets/asset_1_noext"), DEFAULT_MIME_TYPE);
    }
}
