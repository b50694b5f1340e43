//! Session state containers.
//!
//! Every store is created once per session by [`AppContext`](crate::AppContext)
//! and shared through `Arc`. Locks are never held across an `.await`.

pub mod app;
pub mod chat;
pub mod messages;
pub mod typing;
pub mod user;

pub use app::{AppStore, Badge, RailMode};
pub use chat::{ChatStore, UiOptions};
pub use messages::MessagesStore;
pub use typing::{Typer, TypingTracker};
pub use user::UserStore;
