//! household-cli - Terminal-based shared household bill splitting
//!
//! This library provides the core of a bill-splitting tool for people who
//! share a home: residents, bills divided into per-resident shares, payment
//! tracking and balance summaries. Amounts are exact integer cents; equal
//! splits round half-up and the last participant absorbs the remainder so
//! shares always add up to the bill total.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Paths, settings and logging
//! - `error`: Custom error types
//! - `models`: Core data models (money, residents, bills, shares)
//! - `split`: Equal allocation and custom-split reconciliation
//! - `storage`: JSON file storage layer
//! - `services`: Business logic layer, including bill drafts
//! - `audit`: Audit logging system
//! - `export`: CSV, JSON and YAML export
//! - `display`: Terminal formatting
//! - `cli`: Command handlers for the `household` binary
//!
//! # Example
//!
//! ```rust
//! use household_cli::models::Money;
//! use household_cli::split::allocate_equal;
//!
//! let shares = allocate_equal(Money::from_cents(10000), &["ana", "bruno", "carla"]);
//! let amounts: Vec<i64> = shares.iter().map(|(_, m)| m.cents()).collect();
//! assert_eq!(amounts, vec![3333, 3333, 3334]);
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod services;
pub mod split;
pub mod storage;

pub use error::{HouseholdError, HouseholdResult};
