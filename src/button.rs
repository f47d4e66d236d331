//! Push button on a digital input line

use alloc::boxed::Box;

use embedded_hal::digital::InputPin;
use log::debug;

use crate::{
    event_loop::{Callback, Clock, Device, DeviceId, EventLoop, Handle},
    Error,
};

/// Time a released button waits before it is polled again
pub const DEFAULT_REPEAT_INTERVAL_MS: u64 = 100;

/// A button that runs a callback once per press
///
/// The line is expected high while pressed, configure the pin with a pull-down in your HAL.
pub struct Button<Pin: InputPin, Ctx> {
    pin: Pin,
    pressed: bool,
    on_pressed: Option<Callback<Ctx>>,
    repeat_interval_ms: u64,
}

impl<Pin: InputPin, Ctx> Button<Pin, Ctx> {
    /// A button without callback, with [`DEFAULT_REPEAT_INTERVAL_MS`]
    pub fn new(pin: Pin) -> Self {
        Self {
            pin,
            pressed: false,
            on_pressed: None,
            repeat_interval_ms: DEFAULT_REPEAT_INTERVAL_MS,
        }
    }

    /// Run `callback` on every rising edge of the line
    pub fn on_pressed(mut self, callback: impl FnMut(&mut Handle<'_, Ctx>) + 'static) -> Self {
        self.on_pressed = Some(Box::new(callback));
        self
    }

    /// How long the button rests after it was seen released
    pub fn repeat_interval_ms(mut self, interval_ms: u64) -> Self {
        self.repeat_interval_ms = interval_ms;
        self
    }

    /// Latch the current line level, then hand the button to `event_loop`
    ///
    /// A button already held down at registration does not fire until it is released and pressed again.
    /// The returned id finds it back with [`EventLoop::device_mut()`] or [`Handle::device_mut()`].
    pub fn register<C: Clock>(
        mut self,
        event_loop: &mut EventLoop<Ctx, C>,
    ) -> Result<DeviceId, Error>
    where
        Pin: 'static,
        Ctx: 'static,
    {
        self.pressed = self.pin.is_high().map_err(Error::digital)?;
        debug!("button: registered, pressed: {}", self.pressed);
        Ok(event_loop.register(self))
    }

    /// Latched state, `true` between a rising edge and the next low reading
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }
}

impl<Pin, Ctx> Device<Ctx> for Button<Pin, Ctx>
where
    Pin: InputPin + 'static,
    Ctx: 'static,
{
    fn poll(&mut self, now_ms: u64, handle: &mut Handle<'_, Ctx>) -> Result<u64, Error> {
        if self.pin.is_high().map_err(Error::digital)? {
            if !self.pressed {
                self.pressed = true;
                if let Some(callback) = self.on_pressed.as_mut() {
                    callback(handle);
                }
            }
            Ok(now_ms)
        } else {
            self.pressed = false;
            Ok(now_ms.saturating_add(self.repeat_interval_ms))
        }
    }
}
