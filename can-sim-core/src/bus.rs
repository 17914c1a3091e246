//! Bus adapter
//!
//! The transmission loop only needs a live send capability; everything
//! about the underlying transport stays behind the `FrameSink` trait.
//! Provisioning the interface itself (`ip link add ... type vcan`) is
//! environment setup and out of scope here.

use crate::types::{Frame, Result};

/// Outbound port for handing encoded frames to a bus.
///
/// A send error is non-fatal to the caller: the loop logs it and moves on
/// to the next tick. Exactly one context uses a sink at a time, so
/// implementations need no internal locking.
pub trait FrameSink {
    fn send_frame(&mut self, frame: &Frame) -> Result<()>;
}

#[cfg(target_os = "linux")]
pub use socketcan_bus::SocketCanBus;

#[cfg(target_os = "linux")]
mod socketcan_bus {
    use super::FrameSink;
    use crate::types::{Frame, Result, SimError};
    use socketcan::{CanFrame, CanSocket, EmbeddedFrame, ExtendedId, Id, Socket, StandardId};

    /// SocketCAN-backed sink writing classic CAN frames to a named channel
    pub struct SocketCanBus {
        channel: String,
        socket: CanSocket,
    }

    impl SocketCanBus {
        /// Open the given channel (e.g. "vcan0", "can0").
        ///
        /// The channel must already exist and be up; failure here is a
        /// setup error and fatal to the process.
        pub fn open(channel: &str) -> Result<Self> {
            let socket = CanSocket::open(channel).map_err(|e| SimError::BusOpen {
                channel: channel.to_string(),
                cause: e.to_string(),
            })?;
            log::info!("Opened CAN channel: {}", channel);
            Ok(Self {
                channel: channel.to_string(),
                socket,
            })
        }

        /// Name of the underlying channel
        pub fn channel(&self) -> &str {
            &self.channel
        }
    }

    impl FrameSink for SocketCanBus {
        fn send_frame(&mut self, frame: &Frame) -> Result<()> {
            let id = make_id(frame)?;
            let can_frame = CanFrame::new(id, &frame.data).ok_or_else(|| {
                SimError::Send(format!(
                    "failed to construct CAN frame (id=0x{:X}, len={})",
                    frame.can_id,
                    frame.data.len()
                ))
            })?;

            self.socket
                .write_frame(&can_frame)
                .map_err(|e| SimError::Send(e.to_string()))
        }
    }

    /// Map our frame's explicit extended flag onto a SocketCAN identifier
    fn make_id(frame: &Frame) -> Result<Id> {
        if frame.is_extended {
            ExtendedId::new(frame.can_id)
                .map(Id::from)
                .ok_or_else(|| SimError::Send(format!("invalid extended id: 0x{:X}", frame.can_id)))
        } else {
            u16::try_from(frame.can_id)
                .ok()
                .and_then(StandardId::new)
                .map(Id::from)
                .ok_or_else(|| SimError::Send(format!("invalid standard id: 0x{:X}", frame.can_id)))
        }
    }
}
