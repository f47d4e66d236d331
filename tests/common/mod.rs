//! Recording fakes shared by the integration tests.
//!
//! Output pins and the delayer push into one [`EventLog`], so a test can check the
//! exact order of line changes and waits, the way the panel would observe them.

#![allow(dead_code)]

use std::{
    cell::{Cell, RefCell},
    collections::VecDeque,
    convert::Infallible,
    rc::Rc,
};

use embedded_hal::{
    delay::DelayNs,
    digital::{ErrorKind, ErrorType, InputPin, OutputPin},
};
use lcd1602_uikit::{
    analog::AnalogInput,
    command::{Command, RegisterSelection},
    event_loop::Clock,
    sender::{ParallelSender, SendCommand},
    Error,
};

pub const DATA_PINS: [&str; 8] = ["db7", "db6", "db5", "db4", "db3", "db2", "db1", "db0"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Set(&'static str, bool),
    DelayNs(u64),
}

#[derive(Clone, Default)]
pub struct EventLog(Rc<RefCell<Vec<Event>>>);

impl EventLog {
    pub fn push(&self, event: Event) {
        self.0.borrow_mut().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.borrow().clone()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

pub struct LogPin {
    name: &'static str,
    log: EventLog,
}

impl LogPin {
    pub fn new(name: &'static str, log: &EventLog) -> Self {
        Self {
            name,
            log: log.clone(),
        }
    }
}

impl ErrorType for LogPin {
    type Error = Infallible;
}

impl OutputPin for LogPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.log.push(Event::Set(self.name, false));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.log.push(Event::Set(self.name, true));
        Ok(())
    }
}

pub struct LogDelay {
    log: EventLog,
}

impl LogDelay {
    pub fn new(log: &EventLog) -> Self {
        Self { log: log.clone() }
    }
}

impl DelayNs for LogDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.log.push(Event::DelayNs(u64::from(ns)));
    }

    fn delay_us(&mut self, us: u32) {
        self.log.push(Event::DelayNs(u64::from(us) * 1_000));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.log.push(Event::DelayNs(u64::from(ms) * 1_000_000));
    }
}

pub type LogSender = ParallelSender<LogPin, LogPin, LogDelay>;

pub fn log_sender(log: &EventLog) -> LogSender {
    let db_pins = DATA_PINS.map(|name| LogPin::new(name, log));
    ParallelSender::new(
        db_pins,
        LogPin::new("en", log),
        LogPin::new("rs", log),
        LogDelay::new(log),
    )
    .unwrap()
}

/// What the panel latched on one enable falling edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub register_select: bool,
    pub byte: u8,
    pub hold_ns: u64,
}

/// Replay the log as line levels, and sample the bus on each enable falling edge
pub fn latched_frames(events: &[Event]) -> Vec<Frame> {
    let mut levels = std::collections::HashMap::new();
    let mut enable_high = false;
    let mut hold_ns = 0;
    let mut frames = Vec::new();

    for event in events {
        match *event {
            Event::Set("en", true) => {
                enable_high = true;
                hold_ns = 0;
            }
            Event::Set("en", false) => {
                if enable_high {
                    let byte = DATA_PINS.iter().fold(0u8, |acc, name| {
                        (acc << 1) | u8::from(*levels.get(name).unwrap_or(&false))
                    });
                    frames.push(Frame {
                        register_select: *levels.get("rs").unwrap_or(&false),
                        byte,
                        hold_ns,
                    });
                }
                enable_high = false;
            }
            Event::Set(name, level) => {
                levels.insert(name, level);
            }
            Event::DelayNs(ns) => {
                if enable_high {
                    hold_ns += ns;
                }
            }
        }
    }

    frames
}

/// A sender that only remembers what it was asked to send
///
/// It can be told to fail every byte aimed at one register, failed bytes are not recorded.
#[derive(Clone, Default)]
pub struct RecordingSender {
    sent: Rc<RefCell<Vec<Command>>>,
    failing: Rc<Cell<Option<RegisterSelection>>>,
}

impl RecordingSender {
    pub fn fail_on(&self, register: RegisterSelection) {
        self.failing.set(Some(register));
    }

    pub fn heal(&self) {
        self.failing.set(None);
    }

    pub fn sent(&self) -> Vec<Command> {
        self.sent.borrow().clone()
    }

    pub fn instructions(&self) -> Vec<u8> {
        self.sent()
            .iter()
            .filter(|command| command.get_register_selection() == RegisterSelection::Command)
            .map(Command::get_bits)
            .collect()
    }

    pub fn data(&self) -> Vec<u8> {
        self.sent()
            .iter()
            .filter(|command| command.get_register_selection() == RegisterSelection::Data)
            .map(Command::get_bits)
            .collect()
    }

    pub fn clear(&self) {
        self.sent.borrow_mut().clear();
    }
}

impl SendCommand for RecordingSender {
    fn send(&mut self, command: Command) -> Result<(), Error> {
        if self.failing.get() == Some(command.get_register_selection()) {
            return Err(Error::Digital(ErrorKind::Other));
        }
        self.sent.borrow_mut().push(command);
        Ok(())
    }
}

/// Manually driven clock, sleeping jumps straight to the deadline
#[derive(Clone, Default)]
pub struct FakeClock {
    now: Rc<Cell<u64>>,
    sleeps: Rc<RefCell<Vec<u64>>>,
}

impl FakeClock {
    pub fn set(&self, now_ms: u64) {
        self.now.set(now_ms);
    }

    pub fn now(&self) -> u64 {
        self.now.get()
    }

    pub fn sleeps(&self) -> Vec<u64> {
        self.sleeps.borrow().clone()
    }
}

impl Clock for FakeClock {
    fn now_ms(&mut self) -> u64 {
        self.now.get()
    }

    fn sleep_until(&mut self, deadline_ms: u64) {
        self.sleeps.borrow_mut().push(deadline_ms);
        if deadline_ms > self.now.get() {
            self.now.set(deadline_ms);
        }
    }
}

/// Input line that replays a script of levels, the last level sticks
#[derive(Clone)]
pub struct ScriptedPin {
    levels: Rc<RefCell<VecDeque<Result<bool, ErrorKind>>>>,
    last: Rc<Cell<bool>>,
    reads: Rc<Cell<usize>>,
}

impl ScriptedPin {
    pub fn new(levels: &[bool]) -> Self {
        Self {
            levels: Rc::new(RefCell::new(levels.iter().map(|&level| Ok(level)).collect())),
            last: Rc::new(Cell::new(false)),
            reads: Rc::new(Cell::new(0)),
        }
    }

    pub fn push(&self, level: Result<bool, ErrorKind>) {
        self.levels.borrow_mut().push_back(level);
    }

    pub fn reads(&self) -> usize {
        self.reads.get()
    }
}

impl ErrorType for ScriptedPin {
    type Error = ErrorKind;
}

impl InputPin for ScriptedPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.reads.set(self.reads.get() + 1);
        match self.levels.borrow_mut().pop_front() {
            Some(Ok(level)) => {
                self.last.set(level);
                Ok(level)
            }
            Some(Err(kind)) => Err(kind),
            None => Ok(self.last.get()),
        }
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|level| !level)
    }
}

/// Analog channel that replays a script of samples, the last sample sticks
#[derive(Clone, Default)]
pub struct ScriptedAdc {
    samples: Rc<RefCell<VecDeque<Result<u16, ()>>>>,
    last: Rc<Cell<u16>>,
}

impl ScriptedAdc {
    pub fn new(samples: &[u16]) -> Self {
        let adc = Self::default();
        samples.iter().for_each(|&sample| adc.push(Ok(sample)));
        adc
    }

    pub fn push(&self, sample: Result<u16, ()>) {
        self.samples.borrow_mut().push_back(sample);
    }
}

impl AnalogInput for ScriptedAdc {
    type Error = ();

    fn read(&mut self) -> Result<u16, Self::Error> {
        match self.samples.borrow_mut().pop_front() {
            Some(Ok(sample)) => {
                self.last.set(sample);
                Ok(sample)
            }
            Some(Err(())) => Err(()),
            None => Ok(self.last.get()),
        }
    }
}
