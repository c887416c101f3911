//! Field encoders: map one semantic value onto the bytes of its frame-table
//! slot, following the scaling rules the cluster firmware expects.
//!
//! Every encoder writes only its own bytes. Out-of-range input never fails:
//! it is clamped, or the slot is left unchanged and `None` is returned.
//! Arithmetic is single precision on purpose, the constants were calibrated
//! against a firmware computing in `f32`.
use crate::core::{Blinker, Gear};
use crate::protocol::frames::{FrameTable, MessageSlot};

/// Highest speed the gauge shows.
pub const MAX_SPEED: i32 = 160;
/// Speed gauge steps per unit of speed.
pub const SPEED_SCALE: f32 = 6.375;
/// Highest engine speed the tachometer shows.
pub const MAX_RPM: i32 = 8000;
/// Tachometer full-scale value (Q8.8) reached at [`MAX_RPM`].
pub const RPM_FULL_SCALE: f32 = 31.62;
/// Fuel gauge steps per percent.
pub const FUEL_SCALE: f32 = 0.62;
/// Minutes in a day; the clock accepts `0..=MINUTES_PER_DAY`.
pub const MINUTES_PER_DAY: i32 = 1440;

//==================================================================================TEMPERATURES
/// Outdoor temperature in °F, `-49..=176`.
///
/// Byte 4 selects one of three ranges, byte 5 is the ceiling of the scaled
/// position inside it.
pub fn encode_outdoor_temp(table: &mut FrameTable, temp: i32) -> Option<i16> {
    let (range, position) = match temp {
        -49..=32 => (0x0D, ceil_u8((temp + 83) as f32 * 2.21)),
        33..=146 => (0x0E, ceil_u8((temp - 33) as f32 * 2.25)),
        147..=176 => (0x0F, ceil_u8((temp - 147) as f32 * 2.20)),
        _ => return None,
    };
    table.set_byte(MessageSlot::Coolant, 4, range);
    table.set_byte(MessageSlot::Coolant, 5, position);
    Some(temp as i16)
}

/// Coolant gauge position, `0..=100`. The needle is linear up to 55 and
/// compressed above.
pub fn encode_coolant_temp(table: &mut FrameTable, temp: i32) -> Option<u8> {
    let value = match temp {
        0..=55 => (temp + 88) as u8,
        56..=100 => ceil_u8((temp - 55) as f32 * 0.333).wrapping_add(173),
        _ => return None,
    };
    table.set_byte(MessageSlot::Coolant, 3, value);
    Some(temp as u8)
}

/// Convert °C to °F for callers that work in metric.
pub fn celsius_to_fahrenheit(temp: f32) -> f32 {
    temp * (9.0 / 5.0) + 32.0
}

//==================================================================================SPEED_AND_RPM
/// Vehicle speed, `0..=160`.
///
/// The gauge position is `round(speed * 6.375)`, a 10-bit value: byte 6 holds
/// the low eight bits and the band tag in byte 5 (`0x58..=0x5B`) the rest.
pub fn encode_speed(table: &mut FrameTable, speed: i32) -> Option<u8> {
    if !(0..=MAX_SPEED).contains(&speed) {
        return None;
    }
    let band = match speed {
        0..=40 => 0x58,
        41..=80 => 0x59,
        81..=120 => 0x5A,
        _ => 0x5B,
    };
    let position = round_u32(speed as f32 * SPEED_SCALE);
    table.set_byte(MessageSlot::Speed, 5, band);
    table.set_byte(MessageSlot::Speed, 6, (position & 0xFF) as u8);
    Some(speed as u8)
}

/// Engine speed, clamped to `0..=8000`, as a Q8.8 value in bytes 6 (high) and
/// 7 (low) of the RPM slot.
pub fn encode_rpm(table: &mut FrameTable, rpm: i32) -> u16 {
    let rpm = rpm.clamp(0, MAX_RPM);
    let scale = RPM_FULL_SCALE / MAX_RPM as f32;
    let encoded = round_u32(rpm as f32 * scale * 256.0) as u16;
    let [high, low] = encoded.to_be_bytes();
    table.set_byte(MessageSlot::Rpm, 6, high);
    table.set_byte(MessageSlot::Rpm, 7, low);
    rpm as u16
}

/// Odometer pulse counter, byte 7 of the speed slot.
pub fn encode_odometer(table: &mut FrameTable, counter: u8) {
    table.set_byte(MessageSlot::Speed, 7, counter);
}

//==================================================================================GEAR
pub fn encode_gear(table: &mut FrameTable, gear: Gear) {
    let (byte4, byte6) = gear.bytes();
    table.set_byte(MessageSlot::Gear, 4, byte4);
    table.set_byte(MessageSlot::Gear, 6, byte6);
}

//==================================================================================TIME_AND_FUEL
/// Fuel level in percent, `0..=100`, written to bytes 6 and 7 of the time slot.
pub fn encode_fuel_level(table: &mut FrameTable, level: i32) -> Option<u8> {
    if !(0..=100).contains(&level) {
        return None;
    }
    let value = round_u32(level as f32 * FUEL_SCALE) as u8;
    table.set_byte(MessageSlot::Time, 6, value);
    table.set_byte(MessageSlot::Time, 7, value);
    Some(level as u8)
}

/// Clock as minutes since midnight, `0..=1440`: byte 4 holds the multiple of
/// 256, byte 5 the remainder.
pub fn encode_time(table: &mut FrameTable, minutes: i32) -> Option<u16> {
    if !(0..=MINUTES_PER_DAY).contains(&minutes) {
        return None;
    }
    table.set_byte(MessageSlot::Time, 4, (minutes / 256) as u8);
    table.set_byte(MessageSlot::Time, 5, (minutes % 256) as u8);
    Some(minutes as u16)
}

/// Minutes since midnight for a 12-hour clock reading.
///
/// `hour` is `0..=12`, `minute` is `0..=59`. 12 AM is midnight and 12 PM is
/// noon. Invalid readings give `0`.
pub fn clock_to_minutes(hour: i32, minute: i32, am: bool) -> u16 {
    if !(0..=12).contains(&hour) || !(0..60).contains(&minute) {
        return 0;
    }
    let hour = if hour == 12 { 0 } else { hour };
    let minutes = hour * 60 + minute;
    if am {
        minutes as u16
    } else {
        (minutes + 720) as u16
    }
}

//==================================================================================LIGHTS
/// Instrument backlight, clamped to `0..=255`.
///
/// Byte 2 takes the raw value, bytes 3 and 4 the value rescaled to 15 and 13
/// steps on top of `0x30`.
pub fn encode_brightness(table: &mut FrameTable, value: i32) -> u8 {
    let value = value.clamp(0, 255);
    let step15 = (value as f32 * 15.0 / 255.0 + 0.5) as u8;
    let step13 = (value as f32 * 13.0 / 255.0 + 0.5) as u8;
    table.set_byte(MessageSlot::Rpm, 2, value as u8);
    table.set_byte(MessageSlot::Rpm, 3, 0x30 + step15);
    table.set_byte(MessageSlot::Rpm, 4, 0x30 + step13);
    value as u8
}

pub fn encode_high_beam(table: &mut FrameTable, on: bool) {
    table.set_byte(MessageSlot::Rpm, 1, if on { 0xFF } else { 0xEA });
}

pub fn encode_fog(table: &mut FrameTable, on: bool) {
    table.set_byte(MessageSlot::AuxKeepAlive, 2, if on { 0xE6 } else { 0x00 });
}

/// Brake system warning lamp (the keep-alive reports a fault when on).
pub fn encode_brake_warning(table: &mut FrameTable, on: bool) {
    table.set_byte(MessageSlot::Brakes, 3, if on { 0x00 } else { 0x60 });
}

pub fn encode_blinker(table: &mut FrameTable, blinker: Blinker) {
    table.set_byte(MessageSlot::Blinker, 7, blinker.byte());
}

//==================================================================================DISPLAY
/// Warning chime.
pub fn encode_ding_noise(table: &mut FrameTable, on: bool) {
    table.set_byte(MessageSlot::Time, 1, if on { 0x18 } else { 0x30 });
}

/// Hide the service reminder.
pub fn encode_service_cleared(table: &mut FrameTable, cleared: bool) {
    table.set_byte(MessageSlot::DisplayRotate, 7, if cleared { 0x7F } else { 0x3F });
}

//==================================================================================ROUNDING
// Inputs are never negative here.
fn round_u32(value: f32) -> u32 {
    (value + 0.5) as u32
}

fn ceil_u8(value: f32) -> u8 {
    let truncated = value as u32;
    let ceiled = if (truncated as f32) < value {
        truncated + 1
    } else {
        truncated
    };
    ceiled as u8
}
