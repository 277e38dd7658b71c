//! Domain logic for the course catalog and navigation trees.
//!
//! Everything in this crate is pure: no database, no HTTP. The `db` crate
//! feeds flat rows in, the `api` crate turns results into responses.

pub mod deletion;
pub mod error;
pub mod hierarchy;
pub mod navigation;
pub mod ordering;
pub mod roles;
pub mod slug;
pub mod tree;
pub mod types;
