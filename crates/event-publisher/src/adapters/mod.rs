pub mod in_memory;
pub mod lapin_publisher;

pub use in_memory::InMemoryEventPublisher;
pub use lapin_publisher::LapinEventPublisher;
