//! # rolodex-query
//!
//! Read paths against the live database: validated table paging and
//! gated ad-hoc queries.
//!
//! Ad-hoc queries pass a pluggable [`gate::QueryGate`] before execution
//! and run inside a transaction that is always rolled back. Every result
//! cell is reduced to its string form or null.

pub mod error;
pub mod gate;
pub mod gateway;

pub use error::QueryError;
pub use gate::{ParsingGate, PrefixGate, QueryGate, gate_for};
pub use gateway::{BrowsePage, QueryGateway};
