pub mod raw_event;

pub use raw_event::RawEvent;
