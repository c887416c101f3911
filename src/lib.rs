//! `volvo-dim` library: emulates, in a `no_std` environment, the ECUs that
//! feed a P2 Volvo instrument cluster (DIM) over CAN, so that gauges, lamps
//! and the text display can be driven by an external controller.
//!
//! The crate exposes the vehicle value types, the controller configuration,
//! and the protocol layers (frame table, field encoders, keep-alive
//! emulation, odometer, text transport and the simulation scheduler).
#![no_std]
//==================================================================================
/// Vehicle values shared by the encoders and the controller (gear, blinker,
/// commanded state snapshot).
pub mod core;
/// Controller settings and their builder.
pub mod config;
/// Errors surfaced by the transport and the controller.
pub mod error;
/// DIM bus protocol: frames, encoders, keep-alives, odometer, text transport
/// and the simulation scheduler.
pub mod protocol;
//==================================================================================
