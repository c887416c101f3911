//! Frame table: the fourteen periodic messages the emulated ECUs put on the
//! DIM bus, with the identifier and default payload of each.
//!
//! The identifiers and default payloads below are the wire contract with the
//! cluster and must not change.
use crate::protocol::transport::{can_frame::CanFrame, can_id::CanId};

/// Number of message slots.
pub const SLOT_COUNT: usize = 14;

//==================================================================================MESSAGE_SLOT
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// One periodic message of the emulated car.
pub enum MessageSlot {
    /// Vehicle speed, odometer pulses, general keep-alive.
    Speed = 0,
    /// Engine speed, high beam, instrument backlight.
    Rpm = 1,
    /// Coolant and outdoor temperature, climate status.
    Coolant = 2,
    /// Clock, fuel level, chime control.
    Time = 3,
    /// Brake system keep-alive and brake warning.
    Brakes = 4,
    /// Turn indicators.
    Blinker = 5,
    /// Anti-skid module keep-alive.
    AntiSkid = 6,
    /// Airbag (SRS) module status.
    Airbag = 7,
    /// Auxiliary "4C" module keep-alive, fog lamp.
    AuxKeepAlive = 8,
    /// Car configuration broadcast.
    CarConfig = 9,
    /// Gear selector position.
    Gear = 10,
    /// Message-window control of the display.
    DisplayWindow = 11,
    /// Message-window content of the display.
    DisplayMessage = 12,
    /// Display rotation, service reminder.
    DisplayRotate = 13,
}

impl MessageSlot {
    /// Every slot, in table order.
    pub const ALL: [MessageSlot; SLOT_COUNT] = [
        MessageSlot::Speed,
        MessageSlot::Rpm,
        MessageSlot::Coolant,
        MessageSlot::Time,
        MessageSlot::Brakes,
        MessageSlot::Blinker,
        MessageSlot::AntiSkid,
        MessageSlot::Airbag,
        MessageSlot::AuxKeepAlive,
        MessageSlot::CarConfig,
        MessageSlot::Gear,
        MessageSlot::DisplayWindow,
        MessageSlot::DisplayMessage,
        MessageSlot::DisplayRotate,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Bus identifier of the slot.
    pub const fn id(self) -> CanId {
        CanId::extended(match self {
            MessageSlot::Speed => 0x0217FFC,
            MessageSlot::Rpm => 0x2803008,
            MessageSlot::Coolant => 0x3C01428,
            MessageSlot::Time => 0x381526C,
            MessageSlot::Brakes => 0x3600008,
            MessageSlot::Blinker => 0x0A10408,
            MessageSlot::AntiSkid => 0x2006428,
            MessageSlot::Airbag => 0x1A0600A,
            MessageSlot::AuxKeepAlive => 0x2616CFC,
            MessageSlot::CarConfig => 0x1017FFC,
            MessageSlot::Gear => 0x3200408,
            MessageSlot::DisplayWindow => 0x02A0240E,
            MessageSlot::DisplayMessage => 0x1800008,
            MessageSlot::DisplayRotate => 0x131726C,
        })
    }

    /// Payload the slot holds at power-on.
    pub const fn default_payload(self) -> [u8; 8] {
        match self {
            MessageSlot::Speed => [0x01, 0xEB, 0x00, 0xD8, 0xF0, 0x58, 0x00, 0x00],
            MessageSlot::Rpm => [0xFF, 0xE1, 0xFF, 0xFF, 0xFF, 0xCF, 0x00, 0x00],
            MessageSlot::Coolant => [0xC0, 0x80, 0x51, 0x89, 0x0E, 0x57, 0x00, 0x00],
            MessageSlot::Time => [0x00, 0x01, 0x05, 0xBC, 0x05, 0xA0, 0x40, 0x40],
            MessageSlot::Brakes => [0x00, 0x00, 0xB0, 0x60, 0x30, 0x00, 0x00, 0x00],
            MessageSlot::Blinker => [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x08],
            MessageSlot::AntiSkid => [0x01, 0xE3, 0xE0, 0x00, 0x00, 0x00, 0x00, 0x00],
            MessageSlot::Airbag => [0x00, 0x00, 0x00, 0x00, 0x00, 0xBE, 0x49, 0x00],
            MessageSlot::AuxKeepAlive => [0x0B, 0x42, 0x00, 0x00, 0xFD, 0x1F, 0x00, 0xFF],
            MessageSlot::CarConfig => [0x01, 0x0F, 0xF7, 0xFA, 0x00, 0x00, 0x00, 0xC0],
            MessageSlot::Gear => [0x11, 0xDE, 0x53, 0x00, 0x24, 0x00, 0x10, 0x00],
            MessageSlot::DisplayWindow => [0xC0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x35],
            MessageSlot::DisplayMessage => [0x00, 0x00, 0x00, 0x00, 0x00, 0x08, 0x00, 0x00],
            MessageSlot::DisplayRotate => [0xCF, 0xEB, 0x80, 0xA2, 0xF0, 0xAA, 0x00, 0xAA],
        }
    }
}

//==================================================================================FRAME_TABLE
#[derive(Clone, Debug, PartialEq, Eq)]
/// Current payload of every slot. Encoders mutate it in place, the scheduler
/// flushes it to the bus.
pub struct FrameTable {
    payloads: [[u8; 8]; SLOT_COUNT],
}

impl Default for FrameTable {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameTable {
    /// Table holding the power-on payloads.
    pub fn new() -> Self {
        let mut payloads = [[0u8; 8]; SLOT_COUNT];
        for slot in MessageSlot::ALL {
            payloads[slot.index()] = slot.default_payload();
        }
        Self { payloads }
    }

    pub fn payload(&self, slot: MessageSlot) -> &[u8; 8] {
        &self.payloads[slot.index()]
    }

    pub fn payload_mut(&mut self, slot: MessageSlot) -> &mut [u8; 8] {
        &mut self.payloads[slot.index()]
    }

    /// Overwrite a single byte, leaving the rest of the slot untouched.
    pub fn set_byte(&mut self, slot: MessageSlot, index: usize, value: u8) {
        self.payloads[slot.index()][index] = value;
    }

    pub fn byte(&self, slot: MessageSlot, index: usize) -> u8 {
        self.payloads[slot.index()][index]
    }

    /// Put a slot back to its power-on payload.
    pub fn reset_slot(&mut self, slot: MessageSlot) {
        self.payloads[slot.index()] = slot.default_payload();
    }

    /// CAN frame carrying the current payload of `slot`.
    pub fn frame(&self, slot: MessageSlot) -> CanFrame {
        CanFrame::data_frame(slot.id(), self.payloads[slot.index()])
    }
}
