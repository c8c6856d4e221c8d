//! Reporting period management.

pub mod resolver;

pub use resolver::{PeriodRequest, PeriodResolver, ReportPeriod};
