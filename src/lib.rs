/*!
# LCD 1602 UI kit

Drive a 16x2 character LCD in 8-bit mode, and react to buttons and potentiometers.

Basic Usage:

1. Create an [`event_loop::EventLoop`] with a [`event_loop::Clock`], it owns every polled device
<br/>
<br/>
2. Initialize a "sender" <br/>
    This crate include an 8-pin parallel driver [`sender::ParallelSender`],
    or you can use any driver implemented [`sender::SendCommand`].
<br/>
<br/>
3. Use [`lcd::Lcd::new()`] to create a [`lcd::Lcd`], initialize LCD1602 hardware,
   and register its teardown with the event loop
<br/>
<br/>
4. Register [`button::Button`]s and [`potentiometer::PotentioMeter`]s, then call
   [`event_loop::EventLoop::run()`]. Any callback can call [`event_loop::Handle::quit()`] to stop,
   or reach another registered device with [`event_loop::Handle::device_mut()`].
*/

#![no_std]
#![warn(missing_docs)]

extern crate alloc;

pub mod analog;
pub mod button;
pub mod command;
mod error;
pub mod event_loop;
pub mod lcd;
pub mod potentiometer;
pub mod sender;
pub mod utils;

pub use error::Error;
