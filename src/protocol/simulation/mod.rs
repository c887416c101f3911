//! Simulation scheduler of the cluster bus.
//!
//! [`DimController`] owns the frame table and the injected collaborators
//! (CAN controller, timer, random source, relay lines). The host applies
//! vehicle values through the setters and calls [`DimController::simulate`]
//! in its main loop:
//!
//! * the high-priority tier (speed with odometer pulses, RPM) goes out on
//!   every call;
//! * the low-priority tier (keep-alives, lamps, gear, display, active text)
//!   goes out at most once per configured interval.
//!
//! [`service`] wraps the controller for hosts where other tasks produce the
//! values.
use crate::config::{delay_millis, DimConfig};
use crate::core::{Blinker, Gear, VehicleState};
use crate::error::DimError;
use crate::protocol::encoders::{self, celsius_to_fahrenheit, clock_to_minutes};
use crate::protocol::frames::{FrameTable, MessageSlot};
use crate::protocol::keep_alive::{
    jitter_airbag, jitter_car_config, jitter_climate, AIRBAG_HANDSHAKE, AUX_HANDSHAKE,
};
use crate::protocol::odometer::OdometerAccumulator;
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::text::builder::{TextFrameBuilder, TEXT_SEQUENCE_FRAMES};
use crate::protocol::transport::text::layout::DisplayText;
use crate::protocol::transport::text::{CLEAR_WINDOW, WINDOW_OPEN};
use crate::protocol::transport::traits::{
    can_bus::CanBus, dim_timer::DimTimer, output_line::OutputLine,
};
use rand::RngCore;

pub mod service;

/// Time the power relay stays on during a gauge reset (ms).
pub const GAUGE_RESET_HOLD_MS: u32 = 7_000;
/// RPM shown during a gauge sweep.
pub const SWEEP_RPM: i32 = 7_900;
/// Speed shown during a gauge sweep.
pub const SWEEP_SPEED: i32 = 160;
/// Duration of a gauge sweep (ms).
pub const SWEEP_DURATION_MS: u64 = 500;
/// Pause between two scheduler ticks while sweeping (ms).
pub const SWEEP_TICK_MS: u32 = 10;

//==================================================================================STATE
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Lifecycle of the controller.
pub enum DimState {
    /// Created, `init` not called yet. Ticks are ignored.
    Uninitialized,
    /// Bus start and handshakes in progress.
    Initializing,
    Running,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// What a call to [`DimController::simulate`] transmitted.
pub enum TickOutcome {
    /// Nothing, the controller is not running.
    Idle,
    /// Speed and RPM only.
    HighPriority,
    /// Both tiers.
    Full,
}

//==================================================================================CONTROLLER
/// Emulates every ECU the cluster listens to.
///
/// `L` is the relay line type, shared by the parking-brake lamp and the
/// optional ignition relay; use [`NoLine`] when the board has neither.
///
/// [`NoLine`]: crate::protocol::transport::traits::output_line::NoLine
pub struct DimController<C: CanBus, T: DimTimer, R: RngCore, L: OutputLine> {
    can_bus: C,
    timer: T,
    rng: R,
    parking_brake_line: L,
    power_line: Option<L>,
    config: DimConfig,
    table: FrameTable,
    vehicle: VehicleState,
    odometer: OdometerAccumulator,
    text: Option<DisplayText>,
    state: DimState,
    last_low_priority_ms: Option<u64>,
    started_at_ms: u64,
}

impl<C, T, R, L> DimController<C, T, R, L>
where
    C: CanBus,
    T: DimTimer,
    R: RngCore,
    L: OutputLine,
{
    pub fn new(can_bus: C, timer: T, rng: R, parking_brake_line: L, config: DimConfig) -> Self {
        let odometer = OdometerAccumulator::new(config.calibration_factor);
        Self {
            can_bus,
            timer,
            rng,
            parking_brake_line,
            power_line: None,
            config,
            table: FrameTable::new(),
            vehicle: VehicleState::default(),
            odometer,
            text: None,
            state: DimState::Uninitialized,
            last_low_priority_ms: None,
            started_at_ms: 0,
        }
    }

    /// Attach the relay that powers the cluster.
    pub fn with_power_line(mut self, line: L) -> Self {
        self.power_line = Some(line);
        self
    }

    pub fn state(&self) -> DimState {
        self.state
    }

    pub fn vehicle(&self) -> &VehicleState {
        &self.vehicle
    }

    pub fn table(&self) -> &FrameTable {
        &self.table
    }

    pub fn odometer(&self) -> &OdometerAccumulator {
        &self.odometer
    }

    pub fn config(&self) -> &DimConfig {
        &self.config
    }

    pub(crate) fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }

    //==================================================================================LIFECYCLE
    /// Start the CAN controller, power the cluster and play the airbag and
    /// auxiliary module boot handshakes.
    ///
    /// A controller that refuses to start is retried forever.
    pub async fn init(&mut self) -> Result<(), DimError<C::Error>> {
        self.state = DimState::Initializing;
        #[cfg(feature = "defmt")]
        defmt::info!("Starting CAN controller");
        let retry = delay_millis(self.config.bus_retry_interval);
        while let Err(_err) = self
            .can_bus
            .begin(self.config.bitrate, self.config.clock)
            .await
        {
            #[cfg(feature = "defmt")]
            defmt::warn!(
                "CAN controller start failed: {:?}, retrying",
                defmt::Debug2Format(&_err)
            );
            self.timer.delay_ms(retry).await;
        }

        self.power_on()?;
        self.drive_parking_brake(false)?;

        for payload in AIRBAG_HANDSHAKE {
            self.send_keep_alive(CanFrame::data_frame(MessageSlot::Airbag.id(), payload))
                .await?;
        }
        for payload in AUX_HANDSHAKE {
            self.send_keep_alive(CanFrame::data_frame(MessageSlot::AuxKeepAlive.id(), payload))
                .await?;
        }
        #[cfg(feature = "defmt")]
        defmt::info!("Handshakes sent, cluster bus running");

        self.started_at_ms = self.timer.now_ms();
        self.last_low_priority_ms = None;
        self.state = DimState::Running;
        Ok(())
    }

    /// One scheduler pass. Call it from the host main loop.
    pub async fn simulate(&mut self) -> Result<TickOutcome, DimError<C::Error>> {
        if self.state != DimState::Running {
            return Ok(TickOutcome::Idle);
        }
        self.simulate_high_priority().await?;

        let now = self.timer.now_ms();
        let interval = self.config.low_priority_interval.as_millis();
        let due = self
            .last_low_priority_ms
            .map_or(true, |last| now.saturating_sub(last) >= interval);
        if !due {
            return Ok(TickOutcome::HighPriority);
        }
        #[cfg(feature = "defmt")]
        defmt::trace!("Low priority flush at {} ms", now);
        self.simulate_low_priority().await?;
        // The interval counts from the end of the flush.
        self.last_low_priority_ms = Some(self.timer.now_ms());
        Ok(TickOutcome::Full)
    }

    /// Speed (with odometer pulses) and RPM.
    pub async fn simulate_high_priority(&mut self) -> Result<(), DimError<C::Error>> {
        let now = self.timer.now_ms();
        let grace = self.config.startup_grace.as_millis();
        let counting =
            self.vehicle.mileage_enabled && now.saturating_sub(self.started_at_ms) >= grace;
        let counter = self.odometer.update(now, self.vehicle.speed, counting);
        encoders::encode_odometer(&mut self.table, counter);

        self.send_slot(MessageSlot::Speed).await?;
        self.send_slot(MessageSlot::Rpm).await
    }

    /// Keep-alives, lamps, gear and display slots, then the active text.
    pub async fn simulate_low_priority(&mut self) -> Result<(), DimError<C::Error>> {
        self.send_slot(MessageSlot::Brakes).await?;
        self.send_slot(MessageSlot::AntiSkid).await?;

        jitter_airbag(&mut self.table, &mut self.rng);
        let frame = self.table.frame(MessageSlot::Airbag);
        self.send_keep_alive(frame).await?;

        self.send_slot(MessageSlot::AuxKeepAlive).await?;

        jitter_car_config(&mut self.table, &mut self.rng);
        let frame = self.table.frame(MessageSlot::CarConfig);
        self.send_keep_alive(frame).await?;

        self.send_slot(MessageSlot::Time).await?;

        jitter_climate(&mut self.table, &mut self.rng);
        let frame = self.table.frame(MessageSlot::Coolant);
        self.send_keep_alive(frame).await?;

        for slot in [
            MessageSlot::Blinker,
            MessageSlot::Gear,
            MessageSlot::DisplayWindow,
            MessageSlot::DisplayMessage,
            MessageSlot::DisplayRotate,
        ] {
            self.send_slot(slot).await?;
        }

        if let Some(text) = self.text {
            self.send_text(&text).await?;
        }
        Ok(())
    }

    //==================================================================================GAUGES
    /// Vehicle speed, `0..=160`. Other values are ignored.
    pub fn set_speed(&mut self, speed: i32) {
        match encoders::encode_speed(&mut self.table, speed) {
            Some(speed) => self.vehicle.speed = speed,
            None => self.reject("speed", speed),
        }
    }

    /// Engine speed, clamped to `0..=8000`.
    pub fn set_rpm(&mut self, rpm: i32) {
        self.vehicle.rpm = encoders::encode_rpm(&mut self.table, rpm);
    }

    /// Coolant gauge position, `0..=100`.
    pub fn set_coolant_temp(&mut self, temp: i32) {
        match encoders::encode_coolant_temp(&mut self.table, temp) {
            Some(temp) => self.vehicle.coolant_temp = Some(temp),
            None => self.reject("coolant temperature", temp),
        }
    }

    /// Outdoor temperature in °F, `-49..=176`.
    pub fn set_outdoor_temp(&mut self, temp: i32) {
        match encoders::encode_outdoor_temp(&mut self.table, temp) {
            Some(temp) => self.vehicle.outdoor_temp = Some(temp),
            None => self.reject("outdoor temperature", temp),
        }
    }

    /// Outdoor temperature in °C, rounded to the nearest °F. Non-finite
    /// readings are ignored.
    pub fn set_outdoor_temp_celsius(&mut self, temp: f32) {
        if !temp.is_finite() {
            return self.reject_non_finite("outdoor temperature");
        }
        let fahrenheit = celsius_to_fahrenheit(temp);
        let rounded = if fahrenheit < 0.0 {
            (fahrenheit - 0.5) as i32
        } else {
            (fahrenheit + 0.5) as i32
        };
        self.set_outdoor_temp(rounded);
    }

    /// Fuel level in percent. The time slot carrying it is sent right away.
    pub async fn set_fuel_level(&mut self, level: i32) -> Result<(), DimError<C::Error>> {
        match encoders::encode_fuel_level(&mut self.table, level) {
            Some(level) => {
                self.vehicle.fuel_level = Some(level);
                self.send_slot(MessageSlot::Time).await
            }
            None => {
                self.reject("fuel level", level);
                Ok(())
            }
        }
    }

    pub fn set_gear(&mut self, gear: Gear) {
        encoders::encode_gear(&mut self.table, gear);
        self.vehicle.gear = gear;
    }

    /// Gear from a label such as `"P"` or `"3"`.
    pub fn set_gear_label(&mut self, label: &str) {
        self.set_gear(Gear::from_label(label));
    }

    /// Gear from a simulator code, `-4..=6`.
    pub fn set_gear_code(&mut self, code: i32) {
        self.set_gear(Gear::from_code(code));
    }

    /// Clock in minutes since midnight, `0..=1440`.
    pub fn set_time(&mut self, minutes: i32) {
        match encoders::encode_time(&mut self.table, minutes) {
            Some(minutes) => self.vehicle.time_of_day = Some(minutes),
            None => self.reject("time of day", minutes),
        }
    }

    /// Clock from a 12-hour reading.
    pub fn set_clock(&mut self, hour: i32, minute: i32, am: bool) {
        self.set_time(clock_to_minutes(hour, minute, am) as i32);
    }

    /// Gate the odometer. Time spent disabled is not counted later.
    pub fn enable_mileage_tracking(&mut self, enabled: bool) {
        self.vehicle.mileage_enabled = enabled;
    }

    //==================================================================================LAMPS
    pub fn set_brightness(&mut self, value: i32) {
        self.vehicle.brightness = Some(encoders::encode_brightness(&mut self.table, value));
    }

    pub fn enable_high_beam(&mut self, on: bool) {
        encoders::encode_high_beam(&mut self.table, on);
        self.vehicle.high_beam = on;
    }

    pub fn enable_fog(&mut self, on: bool) {
        encoders::encode_fog(&mut self.table, on);
        self.vehicle.fog = on;
    }

    pub fn enable_brake(&mut self, on: bool) {
        encoders::encode_brake_warning(&mut self.table, on);
        self.vehicle.brake_warning = on;
    }

    pub fn enable_ding_noise(&mut self, on: bool) {
        encoders::encode_ding_noise(&mut self.table, on);
        self.vehicle.ding_noise = on;
    }

    pub fn clear_service_message(&mut self, cleared: bool) {
        encoders::encode_service_cleared(&mut self.table, cleared);
        self.vehicle.service_cleared = cleared;
    }

    /// Parking-brake lamp. Driven through its relay line, not the bus.
    pub fn enable_parking_brake(&mut self, on: bool) -> Result<(), DimError<C::Error>> {
        self.drive_parking_brake(on)?;
        self.vehicle.parking_brake = on;
        Ok(())
    }

    pub fn set_blinker(&mut self, right: bool, left: bool, hazard: bool) {
        let blinker = Blinker::from_inputs(right, left, hazard);
        encoders::encode_blinker(&mut self.table, blinker);
        self.vehicle.blinker = blinker;
    }

    //==================================================================================TEXT
    /// Show `text` in the message area and keep refreshing it with the
    /// low-priority tier until cleared.
    pub fn set_custom_text(&mut self, text: &str) {
        self.set_display_text(DisplayText::format(text));
    }

    /// Same as [`Self::set_custom_text`] for an already formatted message.
    pub fn set_display_text(&mut self, text: DisplayText) {
        self.text = Some(text);
        self.table.set_byte(MessageSlot::DisplayWindow, 7, WINDOW_OPEN);
        self.vehicle.text_active = true;
    }

    /// Close the message area and stop refreshing the custom text.
    pub async fn clear_custom_text(&mut self) -> Result<(), DimError<C::Error>> {
        self.text = None;
        self.vehicle.text_active = false;
        self.table.reset_slot(MessageSlot::DisplayWindow);
        let frame = CanFrame::data_frame(MessageSlot::DisplayWindow.id(), CLEAR_WINDOW);
        self.send_raw(&frame).await
    }

    /// Send one text sequence right away, without making it persistent. The
    /// window slot stays open so the next flush does not close the text.
    pub async fn display_text(&mut self, text: &str) -> Result<(), DimError<C::Error>> {
        let text = DisplayText::format(text);
        self.table.set_byte(MessageSlot::DisplayWindow, 7, WINDOW_OPEN);
        self.send_text(&text).await
    }

    //==================================================================================SERVICE_OPERATIONS
    /// Pass an arbitrary frame through to the bus.
    pub async fn send_raw(&mut self, frame: &CanFrame) -> Result<(), DimError<C::Error>> {
        self.can_bus.send(frame).await.map_err(DimError::Send)
    }

    /// Switch the cluster power relay on. No-op without a power line.
    pub fn power_on(&mut self) -> Result<(), DimError<C::Error>> {
        match self.power_line.as_mut() {
            Some(line) => line.set_high().map_err(|_| DimError::Output),
            None => Ok(()),
        }
    }

    pub fn power_off(&mut self) -> Result<(), DimError<C::Error>> {
        match self.power_line.as_mut() {
            Some(line) => line.set_low().map_err(|_| DimError::Output),
            None => Ok(()),
        }
    }

    /// Hold the power relay on, then cut it so the cluster reboots.
    pub async fn gauge_reset(&mut self) -> Result<(), DimError<C::Error>> {
        self.power_on()?;
        self.timer.delay_ms(GAUGE_RESET_HOLD_MS).await;
        self.power_off()
    }

    /// Drive both needles to the top of their scale for half a second, then
    /// back to zero.
    pub async fn sweep_gauges(&mut self) -> Result<(), DimError<C::Error>> {
        self.set_rpm(SWEEP_RPM);
        self.set_speed(SWEEP_SPEED);

        let start = self.timer.now_ms();
        while self.timer.now_ms().saturating_sub(start) < SWEEP_DURATION_MS {
            self.simulate().await?;
            self.timer.delay_ms(SWEEP_TICK_MS).await;
        }

        self.set_rpm(0);
        self.set_speed(0);
        Ok(())
    }

    /// Emit notices for rejected input. Notices go through `defmt`; without
    /// the `defmt` feature this flag has no effect.
    pub fn enable_diagnostics(&mut self, enabled: bool) {
        self.config.diagnostics = enabled;
    }

    //==================================================================================INTERNALS
    async fn send_slot(&mut self, slot: MessageSlot) -> Result<(), DimError<C::Error>> {
        let frame = self.table.frame(slot);
        self.can_bus.send(&frame).await.map_err(DimError::Send)
    }

    async fn send_keep_alive(&mut self, frame: CanFrame) -> Result<(), DimError<C::Error>> {
        self.can_bus.send(&frame).await.map_err(DimError::Send)?;
        self.timer
            .delay_ms(delay_millis(self.config.keep_alive_spacing))
            .await;
        Ok(())
    }

    async fn send_text(&mut self, text: &DisplayText) -> Result<(), DimError<C::Error>> {
        let spacing = delay_millis(self.config.text_frame_spacing);
        let window = *self.table.payload(MessageSlot::DisplayWindow);
        let frames = TextFrameBuilder::new(
            text,
            MessageSlot::DisplayWindow.id(),
            MessageSlot::DisplayMessage.id(),
            window,
        )
        .build();

        for (index, frame) in frames.enumerate() {
            self.can_bus.send(&frame).await.map_err(DimError::Send)?;
            // No pause after the terminator.
            if index + 1 < TEXT_SEQUENCE_FRAMES {
                self.timer.delay_ms(spacing).await;
            }
        }
        Ok(())
    }

    fn drive_parking_brake(&mut self, on: bool) -> Result<(), DimError<C::Error>> {
        let level = on == self.config.parking_brake_active_high;
        self.parking_brake_line
            .set_level(level)
            .map_err(|_| DimError::Output)
    }

    fn reject(&self, _field: &'static str, _value: i32) {
        #[cfg(feature = "defmt")]
        {
            if self.config.diagnostics {
                defmt::warn!("Ignoring out of range {}: {}", _field, _value);
            }
        }
    }

    fn reject_non_finite(&self, _field: &'static str) {
        #[cfg(feature = "defmt")]
        {
            if self.config.diagnostics {
                defmt::warn!("Ignoring non-finite {}", _field);
            }
        }
    }
}
