//! Chat orchestration: one user message in, one assistant reply out.

pub mod chat;


pub use chat::{ChatAgent, DEFAULT_PHASE_TIMEOUT, TurnOutcome, TurnPhase};
