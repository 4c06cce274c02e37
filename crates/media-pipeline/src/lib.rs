//! Content-addressed media intake: validate, hash once while reading the
//! upload, dedup on SHA-256 via `FindOrCreateBySHA256`, write to pluggable
//! object storage, and request pinning. Storage and pinning are ports so
//! the binary can choose filesystem/in-memory today and a remote backend
//! later without touching upload logic.

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use adapters::{
    FilesystemObjectStore, HttpPinner, InMemoryAssetStore, InMemoryObjectStore, InMemoryPinner, MongoAssetStore,
};
pub use domain::{Asset, AssetCategory, NewAssetFields, PinStatus};
pub use error::{MediaError, MediaResult};
pub use ports::{AssetStore, MediaPipelineApi, ObjectStore, PinOutcome, Pinner, UploadRequest};
pub use service::MediaPipelineService;
