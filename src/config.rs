//! Runtime configuration of the cluster controller: pacing, bus start
//! parameters, odometer calibration and relay polarity.
use embassy_time::Duration;

use crate::protocol::odometer::CALIBRATION_FACTOR;
use crate::protocol::transport::traits::can_bus::{BusBitrate, ControllerClock};
use crate::protocol::transport::{
    BUS_START_RETRY_MS, KEEP_ALIVE_SPACING_MS, LOW_PRIORITY_INTERVAL_MS, TEXT_FRAME_SPACING_MS,
};

#[derive(Clone, Debug, PartialEq)]
/// Controller settings. Defaults reproduce the timing of the real car.
pub struct DimConfig {
    /// Minimum interval between two low-priority flushes.
    pub low_priority_interval: Duration,
    /// Delay after each randomized keep-alive and handshake frame.
    pub keep_alive_spacing: Duration,
    /// Delay after each frame of a text display sequence.
    pub text_frame_spacing: Duration,
    /// Poll interval while the CAN controller refuses to start.
    pub bus_retry_interval: Duration,
    pub bitrate: BusBitrate,
    pub clock: ControllerClock,
    /// Odometer pulses per unit of distance.
    pub calibration_factor: f64,
    /// Time after start-up during which the odometer does not count.
    pub startup_grace: Duration,
    /// Level that turns the parking-brake lamp on.
    pub parking_brake_active_high: bool,
    /// Emit notices for rejected input. Needs the `defmt` feature, otherwise
    /// nothing is emitted.
    pub diagnostics: bool,
}

impl Default for DimConfig {
    fn default() -> Self {
        Self {
            low_priority_interval: Duration::from_millis(LOW_PRIORITY_INTERVAL_MS as u64),
            keep_alive_spacing: Duration::from_millis(KEEP_ALIVE_SPACING_MS as u64),
            text_frame_spacing: Duration::from_millis(TEXT_FRAME_SPACING_MS as u64),
            bus_retry_interval: Duration::from_millis(BUS_START_RETRY_MS as u64),
            bitrate: BusBitrate::Kbps125,
            clock: ControllerClock::Mhz16,
            calibration_factor: CALIBRATION_FACTOR,
            startup_grace: Duration::from_millis(0),
            parking_brake_active_high: true,
            diagnostics: false,
        }
    }
}

impl DimConfig {
    /// Builder starting from the defaults.
    pub fn builder() -> DimConfigBuilder {
        DimConfigBuilder {
            config: DimConfig::default(),
        }
    }
}

//==================================================================================BUILDER
#[derive(Debug)]
/// Fluent builder for [`DimConfig`].
pub struct DimConfigBuilder {
    config: DimConfig,
}

impl DimConfigBuilder {
    pub fn low_priority_interval_ms(mut self, millis: u64) -> Self {
        self.config.low_priority_interval = Duration::from_millis(millis);
        self
    }

    pub fn keep_alive_spacing_ms(mut self, millis: u64) -> Self {
        self.config.keep_alive_spacing = Duration::from_millis(millis);
        self
    }

    pub fn text_frame_spacing_ms(mut self, millis: u64) -> Self {
        self.config.text_frame_spacing = Duration::from_millis(millis);
        self
    }

    pub fn bus_retry_interval_ms(mut self, millis: u64) -> Self {
        self.config.bus_retry_interval = Duration::from_millis(millis);
        self
    }

    pub fn bitrate(mut self, bitrate: BusBitrate) -> Self {
        self.config.bitrate = bitrate;
        self
    }

    pub fn clock(mut self, clock: ControllerClock) -> Self {
        self.config.clock = clock;
        self
    }

    /// Non-finite or negative factors are ignored.
    pub fn calibration_factor(mut self, factor: f64) -> Self {
        if factor.is_finite() && factor >= 0.0 {
            self.config.calibration_factor = factor;
        }
        self
    }

    pub fn startup_grace_ms(mut self, millis: u64) -> Self {
        self.config.startup_grace = Duration::from_millis(millis);
        self
    }

    pub fn parking_brake_active_high(mut self, active_high: bool) -> Self {
        self.config.parking_brake_active_high = active_high;
        self
    }

    /// Only effective with the `defmt` feature.
    pub fn diagnostics(mut self, enabled: bool) -> Self {
        self.config.diagnostics = enabled;
        self
    }

    pub fn build(self) -> DimConfig {
        self.config
    }
}

/// Milliseconds of a configured duration, saturated to what the timer accepts.
pub(crate) fn delay_millis(duration: Duration) -> u32 {
    duration.as_millis().min(u32::MAX as u64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// Defaults reproduce the timing of the real car.
    fn test_defaults() {
        let config = DimConfig::default();
        assert_eq!(config.low_priority_interval.as_millis(), 50);
        assert_eq!(config.keep_alive_spacing.as_millis(), 15);
        assert_eq!(config.text_frame_spacing.as_millis(), 40);
        assert_eq!(config.bus_retry_interval.as_millis(), 100);
        assert_eq!(config.bitrate.bits_per_second(), 125_000);
        assert_eq!(config.clock.hertz(), 16_000_000);
        assert_eq!(config.calibration_factor, 830.0);
        assert!(config.parking_brake_active_high);
        assert!(!config.diagnostics);
    }

    #[test]
    /// Builder overrides only what it is told to.
    fn test_builder_overrides() {
        let config = DimConfig::builder()
            .low_priority_interval_ms(20)
            .calibration_factor(3600.0)
            .calibration_factor(f64::NAN)
            .diagnostics(true)
            .build();

        assert_eq!(config.low_priority_interval.as_millis(), 20);
        assert_eq!(config.calibration_factor, 3600.0);
        assert!(config.diagnostics);
        assert_eq!(config.keep_alive_spacing.as_millis(), 15);
    }
}
