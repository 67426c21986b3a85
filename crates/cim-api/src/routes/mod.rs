//! # API Route Modules
//!
//! Route modules for the civic-complaint API surface:
//!
//! - `municipalities` — municipal portal: official login, the category
//!   catalog, and municipality aggregate reads.
//! - `complaints` — complaint lifecycle and queries: fetch, transition,
//!   evidence upload, filtered pagination.
//! - `state_portal` — state portal: state official login and the
//!   municipalities-under-a-state view.
//!
//! Login and the category catalog are public; everything else sits behind
//! the bearer-token middleware (see [`crate::auth`]).

pub mod complaints;
pub mod municipalities;
pub mod state_portal;
