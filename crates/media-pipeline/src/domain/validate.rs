use crate::domain::asset::AssetCategory;
use crate::error::{MediaError, MediaResult};

/// Strips path separators and control characters, collapses spaces to
/// underscores, and trims to 255 chars — the limit most filesystems and
/// object stores share.
pub fn sanitize_filename(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|c| *c != '/' && *c != '\\' && !c.is_control())
        .map(|c| if c == ' ' { '_' } else { c })
        .collect();

    let trimmed = if cleaned.chars().count() > 255 {
        cleaned.chars().take(255).collect()
    } else {
        cleaned
    };

    if trimmed.is_empty() {
        "file".to_string()
    } else {
        trimmed
    }
}

const IMAGE_MIMES: &[&str] = &["image/png", "image/jpeg", "image/gif", "image/webp", "image/svg+xml"];
const VIDEO_MIMES: &[&str] = &["video/mp4", "video/webm", "video/quicktime"];
const AUDIO_MIMES: &[&str] = &["audio/mpeg", "audio/wav", "audio/ogg"];
const DOCUMENT_MIMES: &[&str] = &["application/pdf", "application/json", "text/plain"];
const THREE_D_MIMES: &[&str] = &["model/gltf-binary", "model/gltf+json", "application/octet-stream"];

/// `None` means the MIME type is on no whitelist and the upload must be
/// rejected.
pub fn categorize(content_type: &str) -> Option<AssetCategory> {
    let ct = content_type.to_ascii_lowercase();
    if IMAGE_MIMES.contains(&ct.as_str()) {
        Some(AssetCategory::Image)
    } else if VIDEO_MIMES.contains(&ct.as_str()) {
        Some(AssetCategory::Video)
    } else if AUDIO_MIMES.contains(&ct.as_str()) {
        Some(AssetCategory::Audio)
    } else if DOCUMENT_MIMES.contains(&ct.as_str()) {
        Some(AssetCategory::Document)
    } else if THREE_D_MIMES.contains(&ct.as_str()) {
        Some(AssetCategory::ThreeD)
    } else {
        None
    }
}

pub fn validate_size(size_bytes: u64, category: AssetCategory) -> MediaResult<()> {
    if size_bytes > category.byte_cap() {
        return Err(MediaError::TooLarge { size_bytes, cap: category.byte_cap() });
    }
    Ok(())
}

/// Only checked when the caller declares dimensions (images and video
/// thumbnails); both axes must fall in `[1, 10_000]`.
pub fn validate_dimensions(width: Option<u32>, height: Option<u32>) -> MediaResult<()> {
    for dim in [width, height].into_iter().flatten() {
        if !(1..=10_000).contains(&dim) {
            return Err(MediaError::InvalidDimensions(dim));
        }
    }
    Ok(())
}
