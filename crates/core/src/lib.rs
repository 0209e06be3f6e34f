//! `hrms-core`: HR back office domain records shared by the auth and API layers.
//!
//! This crate contains **pure domain** data (no infrastructure concerns).

pub mod entity;
pub mod error;
pub mod records;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use records::{AdminRecord, EmployeeRecord};
