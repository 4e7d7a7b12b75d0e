//! Directory change notifications.
//!
//! - [`EventBus`] -- in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`DirectoryEvent`] -- a change made to the tenant's directory through
//!   this service.

pub mod bus;

pub use bus::{DirectoryEvent, DirectoryEventKind, EventBus};
