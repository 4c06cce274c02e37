pub mod outbound;

pub use outbound::EventPublisher;
