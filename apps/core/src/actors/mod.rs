//! Actor plumbing for the scoring subsystem.
//!
//! - `messages`: request, state and error types exchanged with actors
//! - `traits`: the backend-agnostic scoring interface
//! - `process`: the process-backed scorer (handle + serving loop)

pub mod messages;
pub mod process;
pub mod traits;
