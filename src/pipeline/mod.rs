//! Filter, search, sort and paginate pipeline.
//!
//! A view is a pure function of a collection and a [`ViewQuery`]. The
//! caller owns the query, changes it in response to user input, and runs
//! the pipeline again; nothing is cached between runs.

mod attendance;
mod query;
mod record;
mod stages;

pub use attendance::{AttendanceRow, attendance_view};
pub use query::{PageSpec, SearchSpec, SortDirection, SortSpec, View, ViewQuery};
pub use record::{FieldValue, Record};
pub use stages::{filter_by_substring, filter_by_window, paginate, run, sort_by};
