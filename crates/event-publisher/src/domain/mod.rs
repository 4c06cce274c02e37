pub mod envelope;

pub use envelope::{EventEnvelope, CONTENT_TYPE, EXCHANGE, SCHEMA, SCHEMA_VERSION};
