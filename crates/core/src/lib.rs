//! Domain types and pure engines for the orgdesk administration service.
//!
//! Nothing in this crate performs I/O. The organization-chart forest builder,
//! the pagination helpers, and the onboarding/offboarding step engine are all
//! plain functions over plain data so they can be tested in isolation from the
//! directory client and the HTTP layer.

pub mod employee;
pub mod error;
pub mod org_chart;
pub mod pagination;
pub mod roles;
pub mod types;
pub mod workflow;
