//! Payroll Engine library crate.
//!
//! This crate exposes salary, income tax, insurance, unemployment and
//! savings calculators as pure functions over decimal amounts.  The
//! tables they read live in versioned [`statute::Statute`] values, so
//! one binary serves several tax regimes.  External applications may
//! call [`engine::gross_to_net`] and friends directly or embed the HTTP
//! surface via [`api::build_router`].

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod insurance;
pub mod models;
pub mod money;
pub mod savings;
pub mod statute;
pub mod tax;
pub mod unemployment;

pub use engine::{gross_to_net, net_to_gross, run_batch};
pub use error::CalcError;
pub use savings::{future_value, required_contribution};
pub use statute::{Statute, StatuteBook};
pub use unemployment::compute_benefit;
