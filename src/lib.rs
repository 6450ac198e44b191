//! Attendance Aggregation & Analytics Engine
//!
//! This crate turns raw attendance punches and the auxiliary workforce
//! collections (employees, leave requests, projects, meeting rooms, payroll)
//! into filtered, sorted and paginated views and executive dashboard
//! statistics: department counts, hire-year histograms, salary series,
//! latest attendance and daily overtime.
//!
//! The engine performs no network or disk I/O beyond loading its YAML
//! configuration; records are supplied through [`source::RecordSource`].

#![warn(missing_docs)]

pub mod calculation;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod source;
