//! Console command layer.
//!
//! # Responsibility
//! - Parse typed lines into commands.
//! - Dispatch commands to the address book and render replies.
//!
//! # Invariants
//! - The dispatcher is the single place that turns errors into messages.

pub mod dispatcher;
pub mod error;
pub mod parser;
