//! Built-in sender
//! If you want to create a new sender, you will need to implement [`SendCommand`] trait

use crate::{command::Command, Error};

mod parallel_sender;

pub use parallel_sender::{ParallelSender, ENABLE_HOLD_US};

/// [`SendCommand`] is the trait a sender should implement to communicate with the hardware
///
/// There is no read back from the controller, a send is fire-and-forget,
/// only faults of the lines themselves are reported.
pub trait SendCommand {
    /// Put a [`Command`] on the bus and latch it into the controller
    fn send(&mut self, command: Command) -> Result<(), Error>;
}

impl<S: SendCommand + ?Sized> SendCommand for &mut S {
    fn send(&mut self, command: Command) -> Result<(), Error> {
        (**self).send(command)
    }
}
