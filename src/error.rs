//! Error definitions shared across library modules.
//!
//! Out-of-range vehicle values are never errors: encoders clamp, ignore or
//! fall back to a default. Only the collaborators (CAN controller, output
//! lines) can fail.
use thiserror_no_std::Error;

#[derive(Error, Debug, PartialEq, Eq)]
/// Errors that can occur while building a CAN identifier.
pub enum CanIdBuildError {
    /// Value does not fit the requested identifier width.
    #[error("Identifier out of range: {raw:#X}")]
    OutOfRange { raw: u32 },
}

//==================================================================================DIM_ERROR
#[derive(Debug, Error, PartialEq, Eq)]
/// Errors surfaced by the cluster controller.
pub enum DimError<E: core::fmt::Debug> {
    /// CAN layer refused or failed to send the frame.
    #[error("CAN bus send error: {0:?}")]
    Send(E),
    /// A relay output line could not be driven.
    #[error("Output line error")]
    Output,
}
