//! Core data models for the Attendance Analytics Engine.
//!
//! Raw record-store JSON is normalized into these types at the boundary;
//! everything downstream works on typed, read-only records.

mod employee;
pub mod fields;
mod filter;
mod hours;
mod punch;
mod summary;

pub use employee::{EmployeeRecord, ProjectRecord};
pub use filter::{FilterSpec, WindowKind};
pub use hours::{Hours, round_hours};
pub use punch::AttendancePunch;
pub use summary::{
    AuditStep, DashboardSnapshot, DashboardSummary, OvertimeRow, ResolvedAttendance,
};
