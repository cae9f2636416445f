//! # cms-core
//!
//! Core crate for the CMS backend. Contains configuration schemas, the
//! unified error system, and small shared helpers.
//!
//! This crate has **no** internal dependencies on other CMS crates.

pub mod config;
pub mod error;
pub mod result;
pub mod timeout;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
