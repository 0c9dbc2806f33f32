//! Attendance and leave reporting engine.
//!
//! Pure aggregation over already-fetched rows: every instant is normalized
//! into the configured local zone before any calendar-day bucketing, and
//! all functions are total over well-formed input (empty input yields
//! zeroed output, never an error).

pub mod assembler;
pub mod attendance;
pub mod cache;
pub mod leave;
pub mod source;
pub mod timezone;
pub mod working_day;
