//! CAN identifiers used by the P2 DIM network. Every slot of the frame table
//! uses a 29-bit extended identifier; standard identifiers are accepted for
//! raw pass-through frames.
use crate::error::CanIdBuildError;
use embedded_can::{ExtendedId, Id, StandardId};

/// Largest value of an 11-bit identifier.
pub const MAX_STANDARD_ID: u32 = 0x7FF;
/// Largest value of a 29-bit identifier.
pub const MAX_EXTENDED_ID: u32 = 0x1FFF_FFFF;

//==================================================================================CAN_ID
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Standard (11-bit) or extended (29-bit) CAN identifier.
pub enum CanId {
    Standard(u16),
    Extended(u32),
}

impl CanId {
    /// Extended identifier; bits above 28 are dropped.
    pub const fn extended(raw: u32) -> Self {
        CanId::Extended(raw & MAX_EXTENDED_ID)
    }

    /// Standard identifier; bits above 10 are dropped.
    pub const fn standard(raw: u16) -> Self {
        CanId::Standard(raw & MAX_STANDARD_ID as u16)
    }

    /// Checked extended constructor.
    pub fn try_extended(raw: u32) -> Result<Self, CanIdBuildError> {
        if raw > MAX_EXTENDED_ID {
            return Err(CanIdBuildError::OutOfRange { raw });
        }
        Ok(CanId::Extended(raw))
    }

    /// Checked standard constructor.
    pub fn try_standard(raw: u32) -> Result<Self, CanIdBuildError> {
        if raw > MAX_STANDARD_ID {
            return Err(CanIdBuildError::OutOfRange { raw });
        }
        Ok(CanId::Standard(raw as u16))
    }

    /// Raw numeric value.
    pub fn raw(&self) -> u32 {
        match *self {
            CanId::Standard(raw) => raw as u32,
            CanId::Extended(raw) => raw,
        }
    }

    pub fn is_extended(&self) -> bool {
        matches!(self, CanId::Extended(_))
    }
}

impl From<CanId> for Id {
    fn from(id: CanId) -> Self {
        // Both variants are masked on construction, the fallbacks are unreachable.
        match id {
            CanId::Standard(raw) => Id::Standard(StandardId::new(raw).unwrap_or(StandardId::ZERO)),
            CanId::Extended(raw) => Id::Extended(ExtendedId::new(raw).unwrap_or(ExtendedId::ZERO)),
        }
    }
}

impl From<Id> for CanId {
    fn from(id: Id) -> Self {
        match id {
            Id::Standard(raw) => CanId::Standard(raw.as_raw()),
            Id::Extended(raw) => CanId::Extended(raw.as_raw()),
        }
    }
}
//==================================================================================TESTS
#[cfg(test)]
#[path = "tests.rs"]
mod tests;
