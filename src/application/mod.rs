// Application layer - the ledger service that composes the in-memory
// ledger with its persistence collaborator.

pub mod error;
pub mod service;

pub use error::*;
pub use service::*;
