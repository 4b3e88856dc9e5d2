//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async write operations.
//! They take any Postgres executor so the lifecycle can run them inside a
//! transaction; reads go through [`crate::query`].

pub mod petition_repo;
pub mod signature_repo;

pub use petition_repo::PetitionRepo;
pub use signature_repo::SignatureRepo;
