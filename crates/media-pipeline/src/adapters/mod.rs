pub mod filesystem;
pub mod http_pinner;
pub mod in_memory;
pub mod mongo;

pub use filesystem::FilesystemObjectStore;
pub use http_pinner::HttpPinner;
pub use in_memory::{InMemoryAssetStore, InMemoryObjectStore, InMemoryPinner};
pub use mongo::MongoAssetStore;
