pub mod inbound;
pub mod outbound;

pub use inbound::{MediaPipelineApi, UploadRequest};
pub use outbound::{AssetStore, ObjectStore, PinOutcome, Pinner};
