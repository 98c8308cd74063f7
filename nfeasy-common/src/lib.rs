//! # NF-easy Common Library
//!
//! Shared code for the NF-easy services including:
//! - Record models (invoices, workflows, divergences, connector records)
//! - Error kinds shared by the store, engine and HTTP layers
//! - Configuration loading
//! - Timestamp helpers

pub mod config;
pub mod error;
pub mod models;
pub mod time;

pub use error::{Error, Result};
