//! Student leave notifier.
//!
//! Two pipelines share one record store:
//! - import: an uploaded workbook is decoded ([`import::workbook`]), validated and mapped to
//!   records ([`import::loader`]), then written to the [`store`];
//! - notify: a teacher's records are read back, rendered by [`digest`] and delivered through
//!   [`mail`] ([`notify`] ties the three together).
//!
//! The HTTP surface lives in [`api`] and [`routes`].

pub mod api;
pub mod config;
pub mod db;
pub mod digest;
pub mod docs;
pub mod error;
pub mod import;
pub mod mail;
pub mod model;
pub mod notify;
pub mod routes;
pub mod store;

pub use error::{AppError, Result};
