//! Semantic vehicle values shared by the encoders, the controller and the
//! command service: gear positions, turn indicator state, and the
//! [`VehicleState`] snapshot of everything currently commanded.

//==================================================================================GEAR
/// Gear selector position shown by the cluster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Gear {
    /// Automatic gearbox "L" (low range).
    Low,
    Park,
    Reverse,
    Neutral,
    First,
    Second,
    Third,
    Fourth,
    Fifth,
    Sixth,
    /// Unrecognized input; the cluster shows no valid position.
    #[default]
    Unknown,
}

impl Gear {
    /// Map a label by its leading character (`L`, `P`, `R`, `N`, `1`..`6`,
    /// letters case-insensitive). Anything else is [`Gear::Unknown`].
    pub fn from_label(label: &str) -> Self {
        match label.chars().next() {
            Some('l' | 'L') => Gear::Low,
            Some('p' | 'P') => Gear::Park,
            Some('r' | 'R') => Gear::Reverse,
            Some('n' | 'N') => Gear::Neutral,
            Some('1') => Gear::First,
            Some('2') => Gear::Second,
            Some('3') => Gear::Third,
            Some('4') => Gear::Fourth,
            Some('5') => Gear::Fifth,
            Some('6') => Gear::Sixth,
            _ => Gear::Unknown,
        }
    }

    /// Map a simulator gear code: `-4` L, `-3` P, `-2` R, `-1` unknown,
    /// `0` N, `1..=6` forward gears. Other codes are [`Gear::Unknown`].
    pub fn from_code(code: i32) -> Self {
        match code {
            -4 => Gear::Low,
            -3 => Gear::Park,
            -2 => Gear::Reverse,
            0 => Gear::Neutral,
            1 => Gear::First,
            2 => Gear::Second,
            3 => Gear::Third,
            4 => Gear::Fourth,
            5 => Gear::Fifth,
            6 => Gear::Sixth,
            _ => Gear::Unknown,
        }
    }

    /// Bytes 4 and 6 of the gear slot.
    pub const fn bytes(self) -> (u8, u8) {
        match self {
            Gear::Low => (0x40, 0x96),
            Gear::Park => (0x24, 0x10),
            Gear::Reverse => (0xE4, 0x20),
            Gear::Neutral => (0x24, 0x30),
            Gear::First => (0x34, 0x40),
            Gear::Second => (0x40, 0x70),
            Gear::Third => (0x40, 0x60),
            Gear::Fourth => (0x44, 0x50),
            Gear::Fifth => (0xBE, 0x00),
            Gear::Sixth => (0xD5, 0x00),
            Gear::Unknown => (0x10, 0x40),
        }
    }
}

//==================================================================================BLINKER
/// Turn indicator lamps, resolved from the three simulator inputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Blinker {
    #[default]
    Off,
    Left,
    Right,
    /// Both indicators.
    Hazard,
}

impl Blinker {
    /// Priority: hazard, then both sides, then right, then left.
    pub fn from_inputs(right: bool, left: bool, hazard: bool) -> Self {
        if hazard || (right && left) {
            Blinker::Hazard
        } else if right {
            Blinker::Right
        } else if left {
            Blinker::Left
        } else {
            Blinker::Off
        }
    }

    /// Byte 7 of the blinker slot.
    pub const fn byte(self) -> u8 {
        match self {
            Blinker::Hazard => 0x0E,
            Blinker::Right => 0x0C,
            Blinker::Left => 0x0A,
            Blinker::Off => 0x08,
        }
    }
}

//==================================================================================VEHICLE_STATE
/// Last accepted value of every commanded field.
///
/// Values rejected by an encoder (out of range) do not reach this struct;
/// clamped values are stored clamped.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct VehicleState {
    /// Gauge speed, also integrated by the odometer.
    pub speed: u8,
    pub rpm: u16,
    /// Coolant gauge position, 0..=100.
    pub coolant_temp: Option<u8>,
    /// Outdoor temperature in °F.
    pub outdoor_temp: Option<i16>,
    /// Fuel level in percent.
    pub fuel_level: Option<u8>,
    pub gear: Gear,
    /// Minutes since midnight.
    pub time_of_day: Option<u16>,
    pub mileage_enabled: bool,
    pub brightness: Option<u8>,
    pub high_beam: bool,
    pub fog: bool,
    pub brake_warning: bool,
    pub parking_brake: bool,
    pub ding_noise: bool,
    pub service_cleared: bool,
    pub blinker: Blinker,
    /// A custom text message is shown and refreshed by the scheduler.
    pub text_active: bool,
}

impl Default for VehicleState {
    fn default() -> Self {
        Self {
            speed: 0,
            rpm: 0,
            coolant_temp: None,
            outdoor_temp: None,
            fuel_level: None,
            gear: Gear::default(),
            time_of_day: None,
            mileage_enabled: true,
            brightness: None,
            high_beam: false,
            fog: false,
            brake_warning: false,
            parking_brake: false,
            ding_noise: false,
            service_cleared: false,
            blinker: Blinker::default(),
            text_active: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// Label and code input select the same gear bytes.
    fn test_label_and_code_agree() {
        assert_eq!(Gear::from_label("P").bytes(), (0x24, 0x10));
        assert_eq!(Gear::from_code(-3).bytes(), (0x24, 0x10));

        let pairs = [
            ("L", -4),
            ("r", -2),
            ("N", 0),
            ("1", 1),
            ("2", 2),
            ("3", 3),
            ("4", 4),
            ("5", 5),
            ("6", 6),
        ];
        for (label, code) in pairs {
            assert_eq!(Gear::from_label(label), Gear::from_code(code), "{label} vs {code}");
        }
    }

    #[test]
    /// Only the first character of a label matters.
    fn test_label_uses_leading_character() {
        assert_eq!(Gear::from_label("park"), Gear::Park);
        assert_eq!(Gear::from_label("Reverse"), Gear::Reverse);
        assert_eq!(Gear::from_label("3rd"), Gear::Third);
    }

    #[test]
    /// Unrecognized input falls back to the unknown pair.
    fn test_unknown_gear() {
        assert_eq!(Gear::from_label(""), Gear::Unknown);
        assert_eq!(Gear::from_label("D"), Gear::Unknown);
        assert_eq!(Gear::from_label("7"), Gear::Unknown);
        assert_eq!(Gear::from_code(-1), Gear::Unknown);
        assert_eq!(Gear::from_code(9), Gear::Unknown);
        assert_eq!(Gear::Unknown.bytes(), (0x10, 0x40));
    }

    #[test]
    /// Hazard dominates every other combination.
    fn test_blinker_priority() {
        assert_eq!(Blinker::from_inputs(true, false, true).byte(), 0x0E);
        assert_eq!(Blinker::from_inputs(true, true, false).byte(), 0x0E);
        assert_eq!(Blinker::from_inputs(true, false, false).byte(), 0x0C);
        assert_eq!(Blinker::from_inputs(false, true, false).byte(), 0x0A);
        assert_eq!(Blinker::from_inputs(false, false, false).byte(), 0x08);
    }
}
