//! Contact domain model.
//!
//! # Responsibility
//! - Define validated fields and the contact record aggregate.
//! - Keep every validation rule inside core.
//!
//! # Invariants
//! - Field values are validated on construction and on mutation.
//! - A record owns its fields exclusively.

pub mod field;
pub mod record;
