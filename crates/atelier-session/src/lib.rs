//! Session orchestration for Atelier.
//!
//! # Module Structure
//!
//! - `manager`: `EditorSession`, the session state machine
//! - `gate`: single-writer gating for mutation requests
//! - `autosave`: the debounced autosave timer

mod autosave;
mod gate;
mod manager;

pub use manager::{EditorSession, InstructionOutcome};
