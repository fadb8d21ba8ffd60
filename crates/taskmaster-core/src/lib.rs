//! # taskmaster-core
//!
//! Foundation types for the TaskMaster task manager.
//!
//! This crate provides the shared vocabulary the other taskmaster crates
//! depend on:
//!
//! - **Domain types**: [`task::Task`], [`task::TaskCategory`],
//!   [`task::TaskStatus`], plus the [`task::TaskDraft`] and
//!   [`task::TaskChanges`] parameter structs
//! - **Scheduling**: [`schedule`] converts between a user's wall-clock due
//!   date/time and the reference-timezone strings stored on the wire
//! - **Errors**: [`errors::ScheduleError`] via `thiserror`
//!
//! ## Crate Position
//!
//! Foundation crate. Depended on by `taskmaster-store` and `taskmaster-cli`.

#![deny(unsafe_code)]

pub mod errors;
pub mod schedule;
pub mod task;

pub use errors::ScheduleError;
pub use task::{Task, TaskCategory, TaskChanges, TaskDraft, TaskStatus};
