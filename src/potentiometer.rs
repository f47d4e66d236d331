//! Potentiometer on an analog channel

use alloc::boxed::Box;

use log::debug;

use crate::{
    analog::{to_percent, AnalogInput},
    event_loop::{Clock, Device, DeviceId, EventLoop, Handle},
    Error,
};

type ChangeCallback<Ctx> = Box<dyn FnMut(&mut Handle<'_, Ctx>, u8)>;

/// A potentiometer to input analog data
///
/// Its value is read in the `0..=100` range, a callback runs each time the value changes.
pub struct PotentioMeter<Adc: AnalogInput, Ctx> {
    adc: Adc,
    last_value: u8,
    on_changed: Option<ChangeCallback<Ctx>>,
}

impl<Adc: AnalogInput, Ctx> PotentioMeter<Adc, Ctx> {
    /// A potentiometer without callback
    pub fn new(adc: Adc) -> Self {
        Self {
            adc,
            last_value: 0,
            on_changed: None,
        }
    }

    /// Run `callback` with the new value each time a poll reads a different value
    pub fn on_changed(
        mut self,
        callback: impl FnMut(&mut Handle<'_, Ctx>, u8) + 'static,
    ) -> Self {
        self.on_changed = Some(Box::new(callback));
        self
    }

    /// Take an initial reading, then hand the potentiometer to `event_loop`
    ///
    /// Keep the returned id to read the value later, through [`EventLoop::device_mut()`],
    /// or [`Handle::device_mut()`] from another device's callback.
    pub fn register<C: Clock>(
        mut self,
        event_loop: &mut EventLoop<Ctx, C>,
    ) -> Result<DeviceId, Error>
    where
        Adc: 'static,
        Ctx: 'static,
    {
        self.last_value = self.value()?;
        debug!("potentiometer: registered at {}%", self.last_value);
        Ok(event_loop.register(self))
    }

    /// Read the channel now, as a percentage
    pub fn value(&mut self) -> Result<u8, Error> {
        let raw = self.adc.read().map_err(|err| {
            debug!("potentiometer: adc error {:?}", err);
            Error::Analog
        })?;
        Ok(to_percent(raw, Adc::FULL_SCALE))
    }

    /// The value seen by the latest poll
    pub fn last_value(&self) -> u8 {
        self.last_value
    }
}

impl<Adc, Ctx> Device<Ctx> for PotentioMeter<Adc, Ctx>
where
    Adc: AnalogInput + 'static,
    Ctx: 'static,
{
    fn poll(&mut self, now_ms: u64, handle: &mut Handle<'_, Ctx>) -> Result<u64, Error> {
        let new_value = self.value()?;

        if new_value != self.last_value {
            if let Some(callback) = self.on_changed.as_mut() {
                callback(handle, new_value);
            }
        }

        self.last_value = new_value;
        Ok(now_ms)
    }
}
