#![deny(missing_docs)]

//! # cim-core — Foundational Types for the Civic Issue Management Stack
//!
//! This crate defines the domain types that every other crate in the
//! workspace depends on. It has no internal crate dependencies — only
//! `serde`, `serde_json`, `thiserror`, and `chrono` from the external
//! ecosystem.
//!
//! ## Design Principles
//!
//! 1. **One [`ComplaintStatus`] enum.** A single definition with exhaustive
//!    `match` everywhere. Status strings are parsed at the boundary; invalid
//!    values never reach the stores.
//!
//! 2. **Escalation is a pure function.** [`escalation::is_effectively_escalated`]
//!    derives the display-only escalated classification from
//!    `(status, raised_date, now)`. Nothing persists it.
//!
//! 3. **Explicit patches.** [`ComplaintPatch`] models partial updates with
//!    optional fields — absence means "leave unchanged" — instead of
//!    untyped update objects.
//!
//! 4. **[`ValidationError`] carries the rejected input** so operators can
//!    diagnose bad requests without guesswork.

pub mod category;
pub mod error;
pub mod escalation;
pub mod patch;
pub mod status;

// Re-export primary types at crate root for ergonomic imports.
pub use category::{catalog, Category};
pub use error::ValidationError;
pub use escalation::{is_effectively_escalated, ESCALATION_AGE_DAYS};
pub use patch::ComplaintPatch;
pub use status::ComplaintStatus;
