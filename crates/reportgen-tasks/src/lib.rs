//! reportgen Tasks: puts report-generation tasks on the message bus.

pub mod redis_publisher;
