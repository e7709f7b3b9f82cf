//! Session lifecycle: a pure state machine plus the controller that
//! drives it against the backend and the token store.

mod controller;
mod machine;

pub use controller::SessionController;
pub use machine::{reduce, SessionEvent, SessionState, SessionStatus};
