//! Application layer: caller-side helpers built on the domain store

pub mod error;
pub mod history;

pub use error::{ApplicationError, ApplicationResult};
pub use history::{History, Revision};
