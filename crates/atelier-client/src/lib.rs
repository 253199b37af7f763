//! HTTP boundary of the Atelier editing stack.
//!
//! # Module Structure
//!
//! - `mutation`: the AI mutation service client and response normalization
//! - `persistence`: the draft save and publish endpoint client

mod http;
pub mod mutation;
pub mod persistence;

pub use mutation::{HttpMutationService, MutationOutcome, MutationRequest, MutationService};
pub use persistence::{HttpPersistenceService, PersistenceService, PublishReceipt, SaveRequest};
