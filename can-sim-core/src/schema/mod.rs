//! Schema loading and message/signal descriptors
//!
//! The schema is loaded once at startup and is read-only for the process
//! lifetime; the transmission loop only ever borrows it.

pub mod database;
pub mod dbc;

pub use database::{ByteOrder, MessageSpec, Schema, SchemaStats, SignalSpec, ValueType};
pub use dbc::load_dbc;
