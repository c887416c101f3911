//! Odometer pulse integrator. The cluster advances its odometer by watching a
//! free-running 8-bit counter in the speed frame; this module turns
//! speed × time into counter increments without losing the fractional part.

/// Counter increments per unit of distance. Measured on a real cluster: one
/// mile at 64 mph takes 1 min 56.07 s.
pub const CALIBRATION_FACTOR: f64 = 830.0;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Running odometer state: wrapped counter, carried fraction, last update time.
pub struct OdometerAccumulator {
    counter: u8,
    remainder: f64,
    last_update_ms: Option<u64>,
    calibration: f64,
}

impl Default for OdometerAccumulator {
    fn default() -> Self {
        Self::new(CALIBRATION_FACTOR)
    }
}

impl OdometerAccumulator {
    pub fn new(calibration: f64) -> Self {
        Self {
            counter: 0,
            remainder: 0.0,
            last_update_ms: None,
            calibration,
        }
    }

    /// Current counter value, as written to the speed frame.
    pub fn counter(&self) -> u8 {
        self.counter
    }

    /// Fraction of a pulse carried to the next update, in `[0, 1)`.
    pub fn remainder(&self) -> f64 {
        self.remainder
    }

    /// Advance to `now_ms` at `speed`.
    ///
    /// The first call only records the time. When `counting` is false the
    /// elapsed time is consumed without accumulating, so re-enabling never
    /// credits the paused interval. Returns the counter.
    pub fn update(&mut self, now_ms: u64, speed: u8, counting: bool) -> u8 {
        let elapsed_ms = match self.last_update_ms {
            Some(last) => now_ms.saturating_sub(last),
            None => 0,
        };
        self.last_update_ms = Some(now_ms);

        if counting && elapsed_ms > 0 {
            // Integer-valued numerator first: exact in f64, one rounding at the division.
            let pulses = speed as f64 * elapsed_ms as f64 * self.calibration / MILLIS_PER_HOUR;
            self.remainder += pulses;

            let whole = self.remainder as u64;
            if whole > 0 {
                self.remainder -= whole as f64;
                self.counter = ((self.counter as u64 + whole) % 256) as u8;
            }
        }
        self.counter
    }
}
