//! The 16x2 character LCD, driven in 8-bit mode

use crate::{
    command::{Command, CommandSet},
    sender::SendCommand,
    Error,
};

mod init;

/// Column the cursor is pushed past by [`Lcd::new_line()`]
///
/// The controller addresses 40 cells per line, no matter how many of them are visible.
pub const NEW_LINE_COLUMN: i32 = 41;

/// Character code sent for a `char` outside of `0..=255`, a full rectangle on the HD44780 ROM
const FALLBACK_CHAR: u8 = 0xFF;

/// LCD driver, with a 1-based cursor position bookkeeping
///
/// Note:
/// The cursor position is tracked, not enforced. It is never clamped or wrapped,
/// it may go below 1 or beyond the 16 visible columns. Callers that care must keep it in range.
pub struct Lcd<Sender: SendCommand> {
    sender: Sender,
    cursor_position: i32,
}

impl<Sender: SendCommand> Lcd<Sender> {
    /// Send an instruction byte, register select low
    ///
    /// Takes a raw opcode or a [`CommandSet`] name, both always reach the instruction register.
    pub fn send_command(&mut self, opcode: impl Into<u8>) -> Result<(), Error> {
        self.sender.send(Command::instruction(opcode.into()))
    }

    /// Send a character code, register select high
    pub fn send_data(&mut self, byte: u8) -> Result<(), Error> {
        self.sender.send(Command::data(byte))
    }

    /// Write string at the current position, one [`Lcd::send_data()`] per `char`
    ///
    /// There is no bound check, the cursor position keeps growing past the end of the line.
    pub fn write(&mut self, text: &str) -> Result<(), Error> {
        text.chars().try_for_each(|char| {
            self.cursor_position += 1;
            self.send_data(u8::try_from(char).unwrap_or(FALLBACK_CHAR))
        })
    }

    /// Move the cursor `offset` cells, right for positive values, left for negative ones
    pub fn move_cursor(&mut self, offset: i32) -> Result<(), Error> {
        if offset == 0 {
            return Ok(());
        }

        let command = match offset > 0 {
            true => CommandSet::MoveRight,
            false => CommandSet::MoveLeft,
        };

        for _ in 0..offset.unsigned_abs() {
            self.send_command(command)?;
        }

        self.cursor_position += offset;
        Ok(())
    }

    /// Move the cursor right until it crosses into the second line
    ///
    /// Sends `41 - cursor_position` MoveRight commands (none if that is negative)
    /// and does not touch the cursor position bookkeeping.
    pub fn new_line(&mut self) -> Result<(), Error> {
        for _ in 0..(NEW_LINE_COLUMN - self.cursor_position) {
            self.send_command(CommandSet::MoveRight)?;
        }
        Ok(())
    }

    #[allow(missing_docs)]
    pub fn on(&mut self) -> Result<(), Error> {
        self.send_command(CommandSet::TurnOn)
    }

    #[allow(missing_docs)]
    pub fn off(&mut self) -> Result<(), Error> {
        self.send_command(CommandSet::TurnOff)
    }

    /// Clear display, and reset cursor position to 1
    pub fn clear(&mut self) -> Result<(), Error> {
        self.cursor_position = 1;
        self.send_command(CommandSet::ClearDisplay)
    }

    /// Return cursor to top left, and reset cursor position to 1
    pub fn home(&mut self) -> Result<(), Error> {
        self.cursor_position = 1;
        self.send_command(CommandSet::MoveHome)
    }

    #[allow(missing_docs)]
    pub fn cursor_on(&mut self) -> Result<(), Error> {
        self.send_command(CommandSet::CursorOn)
    }

    #[allow(missing_docs)]
    pub fn cursor_off(&mut self) -> Result<(), Error> {
        self.send_command(CommandSet::CursorOff)
    }

    #[allow(missing_docs)]
    pub fn show_cursor(&mut self) -> Result<(), Error> {
        self.send_command(CommandSet::ShowCursor)
    }

    #[allow(missing_docs)]
    pub fn hide_cursor(&mut self) -> Result<(), Error> {
        self.send_command(CommandSet::HideCursor)
    }

    #[allow(missing_docs)]
    pub fn blink_on(&mut self) -> Result<(), Error> {
        self.send_command(CommandSet::BlinkOn)
    }

    #[allow(missing_docs)]
    pub fn blink_off(&mut self) -> Result<(), Error> {
        self.send_command(CommandSet::BlinkOff)
    }

    /// Shift the whole display content one cell to the left
    pub fn scroll_left(&mut self) -> Result<(), Error> {
        self.send_command(CommandSet::ScrollLeft)
    }

    /// Shift the whole display content one cell to the right
    pub fn scroll_right(&mut self) -> Result<(), Error> {
        self.send_command(CommandSet::ScrollRight)
    }

    /// Current (unclamped) cursor position, 1 is the top left cell
    pub fn get_cursor_position(&self) -> i32 {
        self.cursor_position
    }

    #[allow(missing_docs)]
    pub fn sender(&self) -> &Sender {
        &self.sender
    }

    /// Give back the sender, without tearing down the display
    pub fn release(self) -> Sender {
        self.sender
    }

    // blank the panel and switch it off, registered as a shutdown action by `Lcd::new()`
    pub(crate) fn teardown(&mut self) -> Result<(), Error> {
        self.clear()?;
        self.off()
    }
}
