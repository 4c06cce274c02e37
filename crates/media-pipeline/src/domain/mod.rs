pub mod asset;
pub mod hash;
pub mod validate;

pub use asset::{Asset, AssetCategory, NewAssetFields, PinStatus};
pub use hash::{sha256_hex, StreamingHasher};
pub use validate::{categorize, sanitize_filename, validate_dimensions, validate_size};
