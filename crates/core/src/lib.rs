//! Domain vocabulary for the city petitions service.
//!
//! This crate has no I/O: it defines the petition status machine, listing
//! request objects, pagination arithmetic, error kinds, and the moderation
//! authority seam. Persistence lives in `petitions-db`, transport in
//! `petitions-api`.

pub mod error;
pub mod listing;
pub mod moderation;
pub mod pagination;
pub mod petition;
pub mod roles;
pub mod types;
