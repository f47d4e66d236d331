//! Commands understood by the LCD controller in 8-bit mode

/// Symbolic commands, see [`CommandSet::opcode()`] for the raw byte of each one
///
/// Only instructions live here, character codes are framed with [`Command::data()`].
///
/// Several names share one opcode, the controller has a single "display on/off control"
/// instruction, and this table only uses two settings of it.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandSet {
    ClearDisplay,
    MoveHome,
    EntryMode,
    TurnOff,
    TurnOn,
    BlinkOff,
    BlinkOn,
    CursorOff,
    CursorOn,
    HideCursor,
    ShowCursor,
    MoveLeft,
    MoveRight,
    ScrollLeft,
    ScrollRight,
    InitDisplay,
    Font5x7,
}

impl CommandSet {
    /// The raw byte put on the data bus
    pub const fn opcode(self) -> u8 {
        match self {
            CommandSet::ClearDisplay => 0b0000_0001,
            CommandSet::MoveHome => 0b0000_0010,
            CommandSet::EntryMode => 0b0000_0110,
            CommandSet::TurnOff => 0b0000_1000,
            CommandSet::BlinkOff | CommandSet::CursorOff | CommandSet::HideCursor => 0b0000_1100,
            CommandSet::BlinkOn
            | CommandSet::TurnOn
            | CommandSet::ShowCursor
            | CommandSet::CursorOn
            | CommandSet::InitDisplay => 0b0000_1111,
            CommandSet::MoveLeft => 0b0001_0000,
            CommandSet::MoveRight => 0b0001_0100,
            CommandSet::ScrollLeft => 0b0001_1000,
            CommandSet::ScrollRight => 0b0001_1100,
            CommandSet::Font5x7 => 0b0011_1000,
        }
    }
}

impl From<CommandSet> for u8 {
    fn from(command: CommandSet) -> Self {
        command.opcode()
    }
}

/// Which register of the controller receives the byte on the bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterSelection {
    /// Instruction register, register select line low
    Command,
    /// Data register, register select line high
    Data,
}

/// A framed byte, ready to be put on the bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command {
    rs: RegisterSelection,
    bits: u8,
}

impl Command {
    /// Frame a raw instruction byte
    pub const fn instruction(bits: u8) -> Self {
        Self {
            rs: RegisterSelection::Command,
            bits,
        }
    }

    /// Frame a raw character code
    pub const fn data(bits: u8) -> Self {
        Self {
            rs: RegisterSelection::Data,
            bits,
        }
    }

    /// Which register the byte targets
    pub fn get_register_selection(&self) -> RegisterSelection {
        self.rs
    }

    /// The byte on the bus
    pub fn get_bits(&self) -> u8 {
        self.bits
    }
}

impl From<CommandSet> for Command {
    fn from(command: CommandSet) -> Self {
        Self::instruction(command.opcode())
    }
}
