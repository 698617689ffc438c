//! Slice scheduling module
//!
//! Turns the stored watermark and the current date into a daily
//! [`DateWindow`], then crosses it with the parent entities of an
//! entity-scoped report to produce the ordered [`Slice`]s a run fetches.

mod routers;
mod types;

pub use routers::{build_slices, parse_date, SliceScheduler, DATE_FORMAT};
pub use types::{DateWindow, ParentEntity, Slice};
