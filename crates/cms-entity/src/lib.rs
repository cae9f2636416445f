//! # cms-entity
//!
//! Domain entity models for the CMS backend. Every struct in this crate
//! represents a database table row or a domain value object. Database
//! entities derive `sqlx::FromRow`.

pub mod permission;
pub mod role;
pub mod token;
pub mod user;
