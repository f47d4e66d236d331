use embedded_hal::{delay::DelayNs, digital::OutputPin};
use log::trace;

use crate::{
    command::{Command, RegisterSelection},
    sender::SendCommand,
    utils::{BitOps, BitState},
    Error,
};

/// Minimal time the enable line stays high, the controller latches the bus on the falling edge
pub const ENABLE_HOLD_US: u32 = 4_000;

/// 8-pin parallel sender, write only (the R/W line of the panel is tied to ground)
pub struct ParallelSender<ControlPin, DBPin, Delayer>
where
    ControlPin: OutputPin,
    DBPin: OutputPin,
    Delayer: DelayNs,
{
    rs_pin: ControlPin,
    en_pin: ControlPin,
    // db_pins[0] is DB7, db_pins[7] is DB0
    db_pins: [DBPin; 8],
    delayer: Delayer,
    enable_hold_us: u32,
}

impl<ControlPin, DBPin, Delayer> ParallelSender<ControlPin, DBPin, Delayer>
where
    ControlPin: OutputPin,
    DBPin: OutputPin,
    Delayer: DelayNs,
{
    /// Take the 10 lines of the panel, in the order `[DB7..DB0]`, enable, register select.
    ///
    /// Enable and register select are driven low before the sender is handed out.
    pub fn new(
        db_pins: [DBPin; 8],
        mut en: ControlPin,
        mut rs: ControlPin,
        delayer: Delayer,
    ) -> Result<Self, Error> {
        en.set_low().map_err(Error::digital)?;
        rs.set_low().map_err(Error::digital)?;

        Ok(Self {
            rs_pin: rs,
            en_pin: en,
            db_pins,
            delayer,
            enable_hold_us: ENABLE_HOLD_US,
        })
    }

    /// Hold the enable line high for longer than [`ENABLE_HOLD_US`], shorter values are raised to it
    pub fn with_enable_hold_us(mut self, hold_us: u32) -> Self {
        self.enable_hold_us = hold_us.max(ENABLE_HOLD_US);
        self
    }

    /// Current enable pulse width
    pub fn get_enable_hold_us(&self) -> u32 {
        self.enable_hold_us
    }

    /// Give back the lines and the delayer
    pub fn release(self) -> ([DBPin; 8], ControlPin, ControlPin, Delayer) {
        (self.db_pins, self.en_pin, self.rs_pin, self.delayer)
    }

    fn push_bits(&mut self, raw_bits: u8) -> Result<(), Error> {
        self.db_pins
            .iter_mut()
            .zip(raw_bits.bits_msb_first())
            .try_for_each(|(pin, bit)| match bit {
                BitState::Set => pin.set_high(),
                BitState::Clear => pin.set_low(),
            })
            .map_err(Error::digital)
    }

    fn pulse_enable(&mut self) -> Result<(), Error> {
        self.en_pin.set_high().map_err(Error::digital)?;
        self.delayer.delay_us(self.enable_hold_us);
        self.en_pin.set_low().map_err(Error::digital)
    }
}

impl<ControlPin, DBPin, Delayer> SendCommand for ParallelSender<ControlPin, DBPin, Delayer>
where
    ControlPin: OutputPin,
    DBPin: OutputPin,
    Delayer: DelayNs,
{
    fn send(&mut self, command: Command) -> Result<(), Error> {
        let selected = match command.get_register_selection() {
            RegisterSelection::Command => self.rs_pin.set_low(),
            RegisterSelection::Data => self.rs_pin.set_high(),
        };
        selected.map_err(Error::digital)?;

        trace!(
            "lcd bus: {:?} {:#04x}",
            command.get_register_selection(),
            command.get_bits()
        );

        self.push_bits(command.get_bits())?;
        self.pulse_enable()
    }
}
