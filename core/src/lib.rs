//! debtsync-core — seat-overage debtor report synchronization.
//!
//! A scheduled batch job: pull billing rows from the source spreadsheet and
//! contact data from the analytics service, rank the accounts running more
//! seats than they pay for, rewrite the debtor report sheet, and file a
//! reminder ticket listing the overdue accounts.
//!
//! RULES:
//!   - All remote calls are sequential. No retries, no fan-out.
//!   - The report sheet is the only durable state between runs.
//!   - Transform steps are pure functions; IO lives in the clients.

pub mod config;
pub mod digest;
pub mod enrichment;
pub mod error;
pub mod job;
pub mod pipeline;
pub mod report;
pub mod schedule;
pub mod sheets;
pub mod tracker;
pub mod types;
