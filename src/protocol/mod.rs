//! Layers of the cluster bus emulation: the frame table and its field
//! encoders, keep-alive and odometer emulation, the CAN transport, and the
//! scheduler tying them together.
pub mod encoders;
pub mod frames;
pub mod keep_alive;
pub mod odometer;
pub mod simulation;
pub mod transport;
