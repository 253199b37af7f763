//! Session domain module.
//!
//! # Module Structure
//!
//! - `model`: Core session domain model (`Session`, `SessionStatus`)
//! - `turn`: Conversation turn types (`Turn`, `TurnRole`, `Attachment`,
//!   `ClarifyingOption`)

mod model;
mod turn;

pub use model::{Session, SessionStatus};
pub use turn::{Attachment, ClarifyingOption, Turn, TurnRole};
