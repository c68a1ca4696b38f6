//! Event bus adapters.
//!
//! - `InMemoryEventBus` - In-process bus; dispatches to subscribed handlers
//!   before `publish` returns
//! - `BackgroundHandler` - Moves a subscriber's work onto a spawned task

mod background;
mod in_memory;

pub use background::BackgroundHandler;
pub use in_memory::InMemoryEventBus;
