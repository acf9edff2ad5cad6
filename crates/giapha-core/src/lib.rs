//! Core types, integrity rules and services for the Gia Phả family registry.
//!
//! This crate is deliberately free of HTTP and database dependencies. The
//! services are generic over [`store::RegistryStore`]; storage backends
//! (e.g. `giapha-store-sqlite`) implement that trait.

pub mod access;
pub mod account;
pub mod achievement;
pub mod enroll;
pub mod error;
pub mod lookup;
pub mod person;
pub mod registry;
pub mod relation;
pub mod relations;
pub mod rules;
pub mod store;
pub mod tree;

pub use error::{Error, Result};
