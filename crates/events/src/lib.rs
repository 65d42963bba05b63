pub mod event;
pub mod publisher;
pub mod saga;

pub use event::Event;
pub use publisher::{EventPublisher, PublishOutcome, RecordingPublisher};
pub use saga::CompensationStack;
