//! Session and content stores for the Inkwell client.
//!
//! This crate is the client's state kernel:
//! - **`SessionStore`**: the authenticated identity (or none), rehydrated
//!   from a durable slot at startup and persisted on login/register
//! - **`ContentStore`**: the posts currently loaded (all posts or own posts)
//! - The request lifecycle protocol: every async operation commits
//!   Loading, then exactly one of Succeeded/Failed plus its data mutation,
//!   with overlapping operations on one store resolved by issue order
//! - Client-side form validation and the engine error taxonomy
//!
//! Presentation layers call store operations and render snapshots; no store
//! error ever escapes as a panic.

mod content;
mod error;
mod lifecycle;
mod session;
mod status;
mod validate;

pub use content::{ContentState, ContentStore};
pub use error::{EngineError, EngineResult};
pub use session::{SessionPersistence, SessionState, SessionStore, SlotPersistence};
pub use status::{OpPhase, OperationStatus};
pub use validate::{
    validate_login, validate_post, validate_registration, FieldError, LoginForm,
    RegistrationForm, ValidationErrors,
};
