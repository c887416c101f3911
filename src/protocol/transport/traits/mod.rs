//! Abstraction traits consumed by the emulator (CAN bus, timer, output line).
pub mod can_bus;
pub mod dim_timer;
pub mod output_line;
