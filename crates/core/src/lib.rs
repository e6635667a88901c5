//! MeuBairro Core - Shared types library.
//!
//! This crate provides common types used across all MeuBairro components:
//! - `app` - The marketplace client service
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no session
//! state. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and prices, coordinates
//!   with great-circle distance, and the search mode / filter tab enums

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
