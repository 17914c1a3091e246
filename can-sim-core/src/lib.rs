//! CAN Traffic Simulator Core Library
//!
//! Generates randomized, correctly-encoded CAN frames from a DBC schema and
//! transmits them at a fixed cadence. Intended for exercising downstream
//! consumers (ECUs, loggers, dashboards) without physical hardware.
//!
//! # Architecture
//!
//! This library is intentionally minimal and focused on traffic generation:
//! - Loads message/signal descriptors from DBC files
//! - Derives a safe value range per signal (declared bounds or bit-width)
//! - Samples random values honoring each signal's numeric domain
//! - Packs complete signal-value sets into frame payloads
//! - Drives a fixed-period transmission loop with per-tick failure isolation
//!
//! The library does NOT:
//! - Decode frames received from the bus
//! - Provision the underlying interface (e.g. `ip link add ... type vcan`)
//! - Fan out to multiple buses or schedule by priority
//!
//! All process-level concerns (CLI, config files, signal handling) are in
//! the application layer (can-sim-cli).
//!
//! # Example Usage
//!
//! Any `FrameSink` implementation can sit behind the loop; on Linux,
//! `SocketCanBus::open("vcan0")` provides the real SocketCAN path.
//!
//! ```no_run
//! use can_sim_core::{CancelToken, Frame, FrameSink, Result, Transmitter};
//! use rand::{rngs::StdRng, SeedableRng};
//! use std::path::Path;
//! use std::time::Duration;
//!
//! struct NullBus;
//!
//! impl FrameSink for NullBus {
//!     fn send_frame(&mut self, _frame: &Frame) -> Result<()> {
//!         Ok(())
//!     }
//! }
//!
//! let schema = can_sim_core::schema::load_dbc(Path::new("powertrain.dbc")).unwrap();
//! let cancel = CancelToken::new();
//!
//! let mut tx = Transmitter::new(schema, NullBus, Duration::from_millis(100), cancel.clone());
//! let mut rng = StdRng::seed_from_u64(42);
//! tx.run(&mut rng);
//! ```

// Public modules
pub mod bus;
pub mod encoder;
pub mod generate;
pub mod range;
pub mod schema;
pub mod transmitter;
pub mod types;

// Re-export main types for convenience
pub use bus::FrameSink;
#[cfg(target_os = "linux")]
pub use bus::SocketCanBus;
pub use encoder::MessageEncoder;
pub use schema::{MessageSpec, Schema, SchemaStats, SignalSpec};
pub use transmitter::{CancelToken, Transmitter, DEFAULT_PERIOD};
pub use types::{Frame, Result, SignalValue, SignalValueSet, SimError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
