//! Recurring deposit schedule management.
//!
//! This crate provides:
//! - The [`ScheduleRecord`] model for a user's recurring-deposit intention
//! - A [`ScheduleStore`] persistence trait with an in-memory implementation
//! - [`ScheduleManager`] lifecycle rules: create, cancel, due-selection,
//!   and execution recording
//!
//! The manager never touches the chain. An external executor polls
//! [`ScheduleManager::list_due`], submits the transfer itself, and reports
//! back through [`ScheduleManager::record_execution`].

pub mod manager;
pub mod record;
pub mod store;

pub use manager::{CreateSchedule, ScheduleManager, MAX_INTERVAL_DAYS};
pub use record::{ExecutionReceipt, ScheduleRecord};
pub use store::{MemoryStore, ScheduleStore};

#[cfg(test)]
mod tests;
