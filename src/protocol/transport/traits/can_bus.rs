//! Minimal abstraction for an asynchronous CAN controller. Allows the emulator
//! to plug into various implementations (MCP2515 over SPI, embedded HAL,
//! SocketCAN on a desktop, etc.).
use crate::protocol::transport::can_frame::CanFrame;
use futures_util::Future;

/// Nominal bus bitrate requested from the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusBitrate {
    /// Low-speed body bus of the P2 platform, where the DIM lives.
    Kbps125,
    Kbps250,
    Kbps500,
}

impl BusBitrate {
    pub fn bits_per_second(&self) -> u32 {
        match self {
            BusBitrate::Kbps125 => 125_000,
            BusBitrate::Kbps250 => 250_000,
            BusBitrate::Kbps500 => 500_000,
        }
    }
}

/// Oscillator feeding the CAN controller, needed to derive bit timing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControllerClock {
    Mhz8,
    Mhz16,
    Mhz20,
}

impl ControllerClock {
    pub fn hertz(&self) -> u32 {
        match self {
            ControllerClock::Mhz8 => 8_000_000,
            ControllerClock::Mhz16 => 16_000_000,
            ControllerClock::Mhz20 => 20_000_000,
        }
    }
}

/// Contract to start the controller and send CAN frames asynchronously.
pub trait CanBus {
    type Error: core::fmt::Debug;
    /// Start the controller. Called repeatedly at boot until it succeeds.
    fn begin<'a>(
        &'a mut self,
        bitrate: BusBitrate,
        clock: ControllerClock,
    ) -> impl core::future::Future<Output = Result<(), Self::Error>> + 'a;
    /// Emit a frame on the bus. Asynchronous to accommodate non-blocking drivers.
    fn send<'a>(
        &'a mut self,
        frame: &'a CanFrame,
    ) -> impl Future<Output = Result<(), Self::Error>> + 'a;
}
