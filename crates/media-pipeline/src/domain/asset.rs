use chrono::{DateTime, Utc};
use uuid::Uuid;

/// The five accepted upload categories, each with its own MIME whitelist
/// and byte cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetCategory {
    Image,
    Video,
    Audio,
    Document,
    ThreeD,
}

impl AssetCategory {
    pub fn byte_cap(self) -> u64 {
        const MIB: u64 = 1024 * 1024;
        match self {
            AssetCategory::Image => 100 * MIB,
            AssetCategory::Video => 500 * MIB,
            AssetCategory::Audio => 50 * MIB,
            AssetCategory::Document => 50 * MIB,
            AssetCategory::ThreeD => 200 * MIB,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AssetCategory::Image => "image",
            AssetCategory::Video => "video",
            AssetCategory::Audio => "audio",
            AssetCategory::Document => "document",
            AssetCategory::ThreeD => "3d",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinStatus {
    Pending,
    Pinning,
    Pinned,
    Failed,
}

impl PinStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PinStatus::Pending => "pending",
            PinStatus::Pinning => "pinning",
            PinStatus::Pinned => "pinned",
            PinStatus::Failed => "failed",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "pending" => Some(PinStatus::Pending),
            "pinning" => Some(PinStatus::Pinning),
            "pinned" => Some(PinStatus::Pinned),
            "failed" => Some(PinStatus::Failed),
            _ => None,
        }
    }
}

/// What the caller supplies for a miss (the hash was not already on file).
/// `id` is minted by the service before the store call so `storage_key`
/// (`media/{id}/{sanitised-name}`) is stable even though the row doesn't
/// exist yet.
#[derive(Debug, Clone)]
pub struct NewAssetFields {
    pub id: Uuid,
    pub sha256: String,
    pub filename: String,
    pub content_type: String,
    pub category: AssetCategory,
    pub size_bytes: u64,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub storage_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub id: Uuid,
    pub sha256: String,
    pub filename: String,
    pub content_type: String,
    pub category_name: String,
    pub size_bytes: u64,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub storage_key: String,
    pub pin_status: String,
    pub cid: Option<String>,
    pub gateway_url: Option<String>,
    pub pin_error: Option<String>,
    pub pin_attempts: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Asset {
    pub fn new(fields: &NewAssetFields) -> Self {
        let now = Utc::now();
        Self {
            id: fields.id,
            sha256: fields.sha256.clone(),
            filename: fields.filename.clone(),
            content_type: fields.content_type.clone(),
            category_name: fields.category.as_str().to_string(),
            size_bytes: fields.size_bytes,
            width: fields.width,
            height: fields.height,
            storage_key: fields.storage_key.clone(),
            pin_status: PinStatus::Pending.as_str().to_string(),
            cid: None,
            gateway_url: None,
            pin_error: None,
            pin_attempts: 0,
            created_at: now,
            updated_at: now,
        }
    }
}
