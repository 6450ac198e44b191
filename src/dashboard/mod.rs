//! Executive dashboard aggregation.
//!
//! This module contains the pure aggregation over the six record
//! collections, the [`Dashboard`] that fetches them concurrently and
//! publishes immutable snapshots, and the [`RefreshScheduler`] that keeps
//! those snapshots current.

mod aggregator;
mod scheduler;
mod service;

pub use aggregator::{
    DashboardInputs, aggregate, average_salary, department_histogram, hire_year_histogram,
    overtime_table,
};
pub use scheduler::{RefreshScheduler, SchedulerHandle};
pub use service::{Dashboard, RefreshOutcome};
