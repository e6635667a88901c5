//! Core types for MeuBairro.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod coord;
pub mod id;
pub mod price;
pub mod search;

pub use coord::Coordinate;
pub use id::*;
pub use price::Price;
pub use search::{FilterTab, SearchMode};
