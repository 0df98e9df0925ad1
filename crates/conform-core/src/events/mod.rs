//! Validation lifecycle events.
//! Handlers observe phases without influencing the run.

pub mod dispatcher;
pub mod handler;
pub mod types;

pub use dispatcher::EventDispatcher;
pub use handler::ConformEventHandler;
pub use types::ValidationPhase;
