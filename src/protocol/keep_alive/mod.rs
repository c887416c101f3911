//! Keep-alive emulation for the modules the DIM supervises: the boot
//! handshakes of the airbag (SRS) and auxiliary "4C" modules, and the random
//! variation the real airbag, climate and configuration broadcasts show.
//!
//! The draw ranges and band thresholds were measured on a running car. The
//! cluster firmware checks the resulting byte patterns, so both the
//! thresholds and the bytes are kept exactly.
use rand::{Rng, RngCore};

use crate::protocol::frames::{FrameTable, MessageSlot};

//==================================================================================HANDSHAKES
/// Airbag module boot sequence, sent once on the airbag identifier.
pub const AIRBAG_HANDSHAKE: [[u8; 8]; 4] = [
    [0xC0, 0x00, 0x00, 0x00, 0x00, 0xBC, 0xDB, 0x80],
    [0x00, 0x00, 0x00, 0x00, 0x00, 0xBC, 0xDB, 0x80],
    [0xC0, 0x00, 0x00, 0x00, 0x00, 0xBC, 0xC9, 0x80],
    [0x80, 0x00, 0x00, 0x00, 0x00, 0xBC, 0xC9, 0x80],
];

/// Auxiliary module boot sequence, sent once on the 4C identifier.
pub const AUX_HANDSHAKE: [[u8; 8]; 4] = [
    [0x09, 0x22, 0x00, 0x00, 0x00, 0x50, 0x00, 0x00],
    [0x09, 0x22, 0x00, 0x00, 0x00, 0x50, 0x00, 0x00],
    [0x0B, 0x22, 0x00, 0x00, 0x00, 0x50, 0x00, 0x00],
    [0x0B, 0x22, 0x00, 0x00, 0x00, 0x50, 0x00, 0x00],
];

//==================================================================================DRAW_RANGES
/// Airbag status draw: `0..794`.
pub const AIRBAG_DRAW_RANGE: u32 = 794;
/// Car configuration draw: `0..7`.
pub const CAR_CONFIG_DRAW_RANGE: u32 = 7;
/// Climate status draw (bytes 0 and 1): `0..133`.
pub const CLIMATE_STATUS_DRAW_RANGE: u32 = 133;
/// Climate sensor draw (byte 2): `0..105`.
pub const CLIMATE_SENSOR_DRAW_RANGE: u32 = 105;

//==================================================================================BANDS
/// Airbag byte 0 for a draw in `0..794`.
pub fn airbag_status(draw: u32) -> u8 {
    match draw {
        0..=179 => 0x40,
        180..=369 => 0xC0,
        370..=574 => 0x00,
        _ => 0x80,
    }
}

/// Car configuration bytes 6 and 7 for a draw in `0..7`, when the draw
/// selects the alternate pattern.
pub fn car_config_tail(draw: u32) -> Option<[u8; 2]> {
    (draw > 3).then_some([0xFF, 0xF3])
}

/// Climate bytes 0 and 1 for a draw in `0..133`.
pub fn climate_status(draw: u32) -> [u8; 2] {
    let byte0 = match draw {
        0..=15 => 0x00,
        16..=40 => 0x40,
        41..=75 => 0xC0,
        _ => 0x80,
    };
    let byte1 = if draw < 76 { 0x80 } else { 0x00 };
    [byte0, byte1]
}

/// Climate byte 2 for a draw in `0..105`.
pub fn climate_sensor(draw: u32) -> u8 {
    match draw {
        0..=6 => 0x11,
        7..=14 => 0x71,
        15..=24 => 0x61,
        25..=59 => 0x51,
        _ => 0x41,
    }
}

//==================================================================================GENERATORS
/// Draw a new airbag status into the airbag slot.
pub fn jitter_airbag<R: RngCore>(table: &mut FrameTable, rng: &mut R) {
    let draw = rng.gen_range(0..AIRBAG_DRAW_RANGE);
    table.set_byte(MessageSlot::Airbag, 0, airbag_status(draw));
}

/// Draw the car configuration tail. Once the alternate pattern is drawn it
/// stays in the slot.
pub fn jitter_car_config<R: RngCore>(table: &mut FrameTable, rng: &mut R) {
    let draw = rng.gen_range(0..CAR_CONFIG_DRAW_RANGE);
    if let Some([byte6, byte7]) = car_config_tail(draw) {
        table.set_byte(MessageSlot::CarConfig, 6, byte6);
        table.set_byte(MessageSlot::CarConfig, 7, byte7);
    }
}

/// Draw the climate status bytes (0..=2 of the coolant slot). Temperature
/// bytes are left alone.
pub fn jitter_climate<R: RngCore>(table: &mut FrameTable, rng: &mut R) {
    let [byte0, byte1] = climate_status(rng.gen_range(0..CLIMATE_STATUS_DRAW_RANGE));
    let byte2 = climate_sensor(rng.gen_range(0..CLIMATE_SENSOR_DRAW_RANGE));
    table.set_byte(MessageSlot::Coolant, 0, byte0);
    table.set_byte(MessageSlot::Coolant, 1, byte1);
    table.set_byte(MessageSlot::Coolant, 2, byte2);
}
