//! Sandboxed preview surface for AI-generated documents.
//!
//! # Module Structure
//!
//! - `policy`: the injected content security policy
//! - `frame`: document preparation and the isolated hosting frame
//! - `viewport`: responsive width emulation

pub mod frame;
pub mod policy;
pub mod viewport;

pub use frame::{prepare_frame, PreparedFrame, ScrollPolicy, SANDBOX_TOKENS};
pub use policy::{ContentSecurityPolicy, FONT_FILE_HOST, FONT_STYLESHEET_HOST};
pub use viewport::PreviewViewport;
