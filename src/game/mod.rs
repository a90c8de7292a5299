//! Game modes.
//!
//! Both modes are explicit state machines: a state enum, a `step()` that
//! does one state's work (the only places that block are tone playback,
//! key waits and network calls) and returns the next state, and a `run()`
//! that steps until the terminal state and reports how the run ended.
//!
//! - [`local::LocalGame`]: offline rounds with lives and score.
//! - [`remote::RemoteGame`]: rounds of a server-side session, synchronised
//!   by manual status polls.

pub mod local;
pub mod remote;

pub use local::{GameSession, LocalGame, LocalOutcome, LocalState, Verdict};
pub use remote::{RemoteGame, RemoteGameSession, RemoteOutcome, RemotePhase, RemoteState};
