//! Transmission loop
//!
//! Drives the select → generate → encode → send cycle at a fixed period.
//! Every collaborator (schema, bus, period, cancellation token, RNG) is
//! passed in explicitly; there is no global state. A single message's
//! failure is logged and never halts the loop.

use crate::bus::FrameSink;
use crate::encoder::MessageEncoder;
use crate::schema::{MessageSpec, Schema};
use crate::types::{Result, SignalValueSet};
use crate::{generate, range};
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Default tick period of the transmission loop
pub const DEFAULT_PERIOD: Duration = Duration::from_millis(100);

/// Shared cancellation flag.
///
/// Set exactly once from any context (idempotent); the loop observes it
/// cooperatively at tick boundaries and before each send. Requesting
/// cancellation is the orderly shutdown path, not a failure.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Create a new, untripped token
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    /// Request cancellation. Safe to call repeatedly and from any thread.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// True once cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// The transmission loop: repeatedly picks a random message, generates a
/// full signal-value set, encodes it, and hands the frame to the bus.
pub struct Transmitter<B: FrameSink> {
    schema: Schema,
    bus: B,
    period: Duration,
    cancel: CancelToken,
}

impl<B: FrameSink> Transmitter<B> {
    /// Build a loop over an already-loaded schema and an open bus.
    ///
    /// The bus must stay valid until cancellation; the loop never reopens
    /// it.
    pub fn new(schema: Schema, bus: B, period: Duration, cancel: CancelToken) -> Self {
        Self {
            schema,
            bus,
            period,
            cancel,
        }
    }

    /// Run until the cancellation token trips.
    ///
    /// One frame is sent per tick, in generation order; failures within a
    /// tick abandon that tick only. The same RNG drives message selection
    /// and value sampling, so a seeded source reproduces a full run.
    pub fn run<R: Rng>(&mut self, rng: &mut R) {
        let stats = self.schema.stats();
        log::info!(
            "Transmission loop started: {} messages, period {:?}",
            stats.num_messages,
            self.period
        );

        while !self.cancel.is_cancelled() {
            self.tick(rng);
            thread::sleep(self.period);
        }

        log::info!("Transmission loop stopped");
    }

    /// One iteration: select, generate, encode, send
    fn tick<R: Rng>(&mut self, rng: &mut R) {
        let messages = self.schema.messages();
        if messages.is_empty() {
            return;
        }

        let message = &messages[rng.gen_range(0..messages.len())];

        let values = match Self::build_value_set(message, rng) {
            Ok(values) => values,
            Err(e) => {
                log::warn!("Value generation failed for {}: {}", message.name, e);
                return;
            }
        };

        let frame = match MessageEncoder::encode(message, &values) {
            Ok(frame) => frame,
            Err(e) => {
                log::warn!("{}", e);
                return;
            }
        };

        // Cancellation observed again before the potentially blocking
        // send; nothing goes out after shutdown is requested.
        if self.cancel.is_cancelled() {
            return;
        }

        match self.bus.send_frame(&frame) {
            Ok(()) => log::info!(
                "{} id=0x{:03X} {}",
                message.name,
                frame.can_id,
                Self::format_values(message, &values)
            ),
            Err(e) => log::warn!("Send failed for {}: {}", message.name, e),
        }
    }

    /// Generate one value per signal, in this message's declared ranges
    fn build_value_set<R: Rng>(message: &MessageSpec, rng: &mut R) -> Result<SignalValueSet> {
        let mut values = SignalValueSet::with_capacity(message.signals.len());
        for signal in &message.signals {
            let bounds = range::value_range(signal);
            let value = generate::sample_value(signal, bounds, rng)?;
            values.insert(signal.name.clone(), value);
        }
        Ok(values)
    }

    /// Render "signal:value,..." in declaration order for the log line
    fn format_values(message: &MessageSpec, values: &SignalValueSet) -> String {
        message
            .signals
            .iter()
            .filter_map(|s| values.get(&s.name).map(|v| format!("{}:{}", s.name, v)))
            .collect::<Vec<_>>()
            .join(",")
    }
}
