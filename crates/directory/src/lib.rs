//! Client side of the upstream directory REST backend.
//!
//! - [`source`] -- the [`DirectorySource`](source::DirectorySource) trait and its error type.
//! - [`api`] -- the reqwest-backed implementation.
//! - [`memory`] -- an in-process implementation for tests and local runs.
//! - [`resolver`] -- recursive organization chart resolution.
//! - [`references`] -- de-duplicated branch/department/manager lookups.
//! - [`probe`] -- existence checks feeding the step engine.

pub mod api;
pub mod memory;
pub mod probe;
pub mod references;
pub mod resolver;
pub mod source;

pub use source::{DirectoryError, DirectoryGateway, DirectorySource, EmployeeQuery};
