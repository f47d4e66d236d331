use log::{debug, warn};

use crate::{
    command::CommandSet,
    event_loop::{Clock, EventLoop},
    lcd::Lcd,
    sender::SendCommand,
    Error,
};

// power-on configuration of the controller, the order matters
const INIT_SEQUENCE: [CommandSet; 4] = [
    CommandSet::Font5x7,
    CommandSet::InitDisplay,
    CommandSet::EntryMode,
    CommandSet::ClearDisplay,
];

impl<Sender: SendCommand> Lcd<Sender> {
    /// Create a [`Lcd`] driver, init LCD hardware, write `text` if there is one,
    /// then register its teardown with `event_loop`.
    ///
    /// When the loop quits, the display is cleared and turned off.
    /// On error nothing is registered.
    /// The loop context must hand out the driver through [`AsMut`].
    pub fn new<Ctx, C>(
        sender: Sender,
        text: Option<&str>,
        event_loop: &mut EventLoop<Ctx, C>,
    ) -> Result<Self, Error>
    where
        Ctx: AsMut<Self> + 'static,
        C: Clock,
        Sender: 'static,
    {
        let lcd = Self::init(sender, text)?;

        event_loop.on_quit(teardown_action::<Sender, Ctx>);

        Ok(lcd)
    }

    /// Create a [`Lcd`] driver and init LCD hardware, without any event loop
    ///
    /// Nothing will blank the display on exit, it's up to the caller.
    pub fn init(sender: Sender, text: Option<&str>) -> Result<Self, Error> {
        let mut lcd = Self::power_on(sender)?;

        if let Some(text) = text {
            lcd.write(text)?;
        }

        Ok(lcd)
    }

    fn power_on(sender: Sender) -> Result<Self, Error> {
        let mut lcd = Lcd {
            sender,
            cursor_position: 1,
        };

        for command in INIT_SEQUENCE {
            lcd.send_command(command)?;
        }

        debug!("lcd: initialized");
        Ok(lcd)
    }
}

fn teardown_action<Sender, Ctx>(ctx: &mut Ctx)
where
    Sender: SendCommand,
    Ctx: AsMut<Lcd<Sender>>,
{
    if let Err(err) = ctx.as_mut().teardown() {
        warn!("lcd: teardown failed: {}", err);
    }
}
