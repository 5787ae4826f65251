//! Board storage for EventDesk.
//!
//! A trait-based interface with a single-file JSON implementation, standing
//! in for the hosted document database the dashboard talks to.

#![warn(missing_docs)]

pub mod board_store;
pub mod json_store;

pub use board_store::{BoardStore, Result, StorageError};
pub use json_store::JsonBoardStore;
