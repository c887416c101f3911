//! Command service built on top of [`DimController`].
//!
//! The service owns the controller and keeps the scheduler ticking. Producer
//! tasks (a simulator link, a telemetry bridge, a button handler) hold a
//! [`DimHandle`] and queue [`DimCommand`]s on a pre-allocated
//! [`embassy_sync::channel::Channel`]. Commands are applied between two
//! ticks, so a value change never lands in the middle of a flush.
//!
//! No allocation is performed and the mutex flavour is left to the firmware
//! (`CriticalSectionRawMutex` across interrupts, `NoopRawMutex` within one
//! executor).

use embassy_sync::{
    blocking_mutex::raw::RawMutex,
    channel::{Channel, Sender, TrySendError},
};
use futures_util::{future::select, future::Either, pin_mut};
use rand::RngCore;

use crate::core::Gear;
use crate::error::DimError;
use crate::protocol::simulation::{DimController, DimState, TickOutcome};
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::text::layout::DisplayText;
use crate::protocol::transport::traits::{
    can_bus::CanBus, dim_timer::DimTimer, output_line::OutputLine,
};

/// Default pause between two scheduler ticks when no command arrives (ms).
pub const DEFAULT_TICK_PERIOD_MS: u32 = 10;

//==================================================================================COMMANDS
/// Value changes queued by producer tasks.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DimCommand {
    Speed(i32),
    Rpm(i32),
    CoolantTemp(i32),
    /// Degrees Fahrenheit.
    OutdoorTemp(i32),
    FuelLevel(i32),
    Gear(Gear),
    /// Minutes since midnight.
    Time(i32),
    MileageTracking(bool),
    Brightness(i32),
    HighBeam(bool),
    Fog(bool),
    Brake(bool),
    DingNoise(bool),
    ServiceCleared(bool),
    ParkingBrake(bool),
    Blinker { right: bool, left: bool, hazard: bool },
    CustomText(DisplayText),
    ClearText,
    SendRaw(CanFrame),
}

//==================================================================================SERVICE
/// Runner owning the controller and the command queue.
pub struct DimService<'a, C, T, R, L, M, const CAP: usize>
where
    C: CanBus,
    T: DimTimer,
    R: RngCore,
    L: OutputLine,
    M: RawMutex,
{
    controller: DimController<C, T, R, L>,
    commands: &'a Channel<M, DimCommand, CAP>,
    tick_period_ms: u32,
}

impl<'a, C, T, R, L, M, const CAP: usize> DimService<'a, C, T, R, L, M, CAP>
where
    C: CanBus,
    T: DimTimer,
    R: RngCore,
    L: OutputLine,
    M: RawMutex,
{
    pub fn new(
        controller: DimController<C, T, R, L>,
        commands: &'a Channel<M, DimCommand, CAP>,
    ) -> Self {
        Self {
            controller,
            commands,
            tick_period_ms: DEFAULT_TICK_PERIOD_MS,
        }
    }

    /// Maximum time the runner waits for a command before ticking.
    pub fn with_tick_period_ms(mut self, millis: u32) -> Self {
        self.tick_period_ms = millis;
        self
    }

    /// Handle for a producer task. Any number can be taken.
    pub fn handle(&self) -> DimHandle<'a, M, CAP> {
        DimHandle {
            sender: self.commands.sender(),
        }
    }

    pub fn controller(&self) -> &DimController<C, T, R, L> {
        &self.controller
    }

    /// Initialise the controller if needed, then tick forever.
    pub async fn run(mut self) -> Result<(), DimError<C::Error>> {
        if self.controller.state() != DimState::Running {
            self.controller.init().await?;
        }
        loop {
            self.step().await?;
        }
    }

    /// Apply at most one command (waiting up to the tick period for it),
    /// then run one scheduler pass.
    pub async fn step(&mut self) -> Result<TickOutcome, DimError<C::Error>> {
        let command = match self.commands.try_receive() {
            Ok(command) => Some(command),
            Err(_) => {
                let commands = self.commands;
                let period = self.tick_period_ms;
                let command_future = commands.receive();
                let tick_future = self.controller.timer_mut().delay_ms(period);
                pin_mut!(command_future);
                pin_mut!(tick_future);

                match select(command_future, tick_future).await {
                    Either::Left((command, _pending_tick)) => Some(command),
                    Either::Right(((), _pending_command)) => None,
                }
            }
        };

        if let Some(command) = command {
            handle_command(&mut self.controller, command).await?;
        }
        self.controller.simulate().await
    }
}

//==================================================================================HANDLE
/// Producer side of the command queue.
pub struct DimHandle<'a, M: RawMutex, const CAP: usize> {
    sender: Sender<'a, M, DimCommand, CAP>,
}

impl<'a, M: RawMutex, const CAP: usize> Clone for DimHandle<'a, M, CAP> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<'a, M: RawMutex, const CAP: usize> DimHandle<'a, M, CAP> {
    /// Queue a command, waiting for room if the queue is full.
    pub async fn send(&self, command: DimCommand) {
        self.sender.send(command).await;
    }

    /// Queue a command without waiting. A full queue hands it back.
    pub fn try_send(&self, command: DimCommand) -> Result<(), DimCommand> {
        self.sender.try_send(command).map_err(|err| match err {
            TrySendError::Full(command) => command,
        })
    }

    /// Format and queue a persistent text message.
    pub async fn show_text(&self, text: &str) {
        self.send(DimCommand::CustomText(DisplayText::format(text))).await;
    }
}

async fn handle_command<C, T, R, L>(
    controller: &mut DimController<C, T, R, L>,
    command: DimCommand,
) -> Result<(), DimError<C::Error>>
where
    C: CanBus,
    T: DimTimer,
    R: RngCore,
    L: OutputLine,
{
    #[cfg(feature = "defmt")]
    defmt::debug!("Applying command {}", command);

    match command {
        DimCommand::Speed(speed) => controller.set_speed(speed),
        DimCommand::Rpm(rpm) => controller.set_rpm(rpm),
        DimCommand::CoolantTemp(temp) => controller.set_coolant_temp(temp),
        DimCommand::OutdoorTemp(temp) => controller.set_outdoor_temp(temp),
        DimCommand::FuelLevel(level) => controller.set_fuel_level(level).await?,
        DimCommand::Gear(gear) => controller.set_gear(gear),
        DimCommand::Time(minutes) => controller.set_time(minutes),
        DimCommand::MileageTracking(enabled) => controller.enable_mileage_tracking(enabled),
        DimCommand::Brightness(value) => controller.set_brightness(value),
        DimCommand::HighBeam(on) => controller.enable_high_beam(on),
        DimCommand::Fog(on) => controller.enable_fog(on),
        DimCommand::Brake(on) => controller.enable_brake(on),
        DimCommand::DingNoise(on) => controller.enable_ding_noise(on),
        DimCommand::ServiceCleared(cleared) => controller.clear_service_message(cleared),
        DimCommand::ParkingBrake(on) => controller.enable_parking_brake(on)?,
        DimCommand::Blinker {
            right,
            left,
            hazard,
        } => controller.set_blinker(right, left, hazard),
        DimCommand::CustomText(text) => controller.set_display_text(text),
        DimCommand::ClearText => controller.clear_custom_text().await?,
        DimCommand::SendRaw(frame) => controller.send_raw(&frame).await?,
    }
    Ok(())
}
