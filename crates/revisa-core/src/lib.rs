//! Core types and scheduling logic for Revisa.
//!
//! This crate is deliberately free of HTTP and database dependencies. The
//! scheduler is pure; persistence lives behind [`store::ReviewStore`].

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod item;
pub mod outcome;
pub mod practice;
pub mod scheduler;
pub mod store;

pub use error::{Error, Result};
pub use outcome::Outcome;
pub use scheduler::{Scheduler, SchedulerConfig};
