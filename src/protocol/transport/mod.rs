//! DIM transport layer: CAN frame representation, identifiers, the multi-frame
//! text transport, and the bus/timer/output abstraction traits.
//!
//! ## Timing constants
//!
//! The cluster firmware expects a minimum spacing between some frames. These
//! defaults feed [`DimConfig`](crate::config::DimConfig) and can be overridden
//! there.

pub mod can_frame;
pub mod can_id;
pub mod text;
pub mod traits;

/// Delay after each randomized keep-alive and handshake frame (ms).
///
/// The airbag and auxiliary modules of the real car never emit two of these
/// frames back to back; the cluster tolerates the same 15 ms spacing.
pub const KEEP_ALIVE_SPACING_MS: u32 = 15;

/// Delay after each frame of a text display sequence (ms).
///
/// The display controller drops characters when the chunks arrive faster
/// than this.
pub const TEXT_FRAME_SPACING_MS: u32 = 40;

/// Poll interval used while waiting for the CAN controller to start (ms).
pub const BUS_START_RETRY_MS: u32 = 100;

/// Minimum interval between two runs of the low-priority tier (ms).
pub const LOW_PRIORITY_INTERVAL_MS: u32 = 50;
