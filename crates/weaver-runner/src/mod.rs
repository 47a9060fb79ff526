mod event_bus;
mod event_consumer;
mod layout_client;
mod logging;
mod session_runner;

pub use event_bus::{
    EventBus, EventContext, EventEnvelope, EventSource, EventType, SystemEvent,
};
pub use event_consumer::{spawn_consumer, CueConsumer, EventConsumer, LoggingConsumer, LoggingCueSink};
pub use layout_client::{FetchError, LayoutClient};
pub use logging::init_logging;
pub use session_runner::{spawn_session, RunnerConfig, SessionHandle};
