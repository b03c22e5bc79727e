//! Interface state machine
//!
//! Elm-style core: every user action, service response and timer firing is
//! an [`Event`]; [`transition`] turns the current [`UiState`] and an event
//! into the next state plus the [`Effect`]s the runtime must carry out.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::{Effect, ViewEvent};
pub use event::Event;
pub use state::{
    RequestId, SessionContext, StatusKind, StatusLine, UiState, UploadId, UploadSession,
};
pub use transition::{transition, TransitionError, TransitionResult};
