//! Single digital output, used for the parking-brake lamp relay and the
//! optional ignition power relay of the cluster.

pub trait OutputLine {
    type Error: core::fmt::Debug;
    /// Drive the line to the high level.
    fn set_high(&mut self) -> Result<(), Self::Error>;
    /// Drive the line to the low level.
    fn set_low(&mut self) -> Result<(), Self::Error>;

    fn set_level(&mut self, high: bool) -> Result<(), Self::Error> {
        if high {
            self.set_high()
        } else {
            self.set_low()
        }
    }
}

/// Placeholder for hardware without the corresponding relay.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoLine;

impl OutputLine for NoLine {
    type Error = core::convert::Infallible;

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
