//! Analog input seam
//!
//! `embedded-hal` 1.0 dropped its ADC trait, so the crate brings its own, implement it
//! on top of the one-shot conversion of your HAL.

use core::cmp::Ordering;

/// A configured analog channel
pub trait AnalogInput {
    /// Error reported by the peripheral
    type Error: core::fmt::Debug;

    /// Raw value of a full scale sample
    const FULL_SCALE: u16 = u16::MAX;

    /// Take one sample, in `0..=FULL_SCALE`
    fn read(&mut self) -> Result<u16, Self::Error>;
}

impl<A: AnalogInput + ?Sized> AnalogInput for &mut A {
    type Error = A::Error;

    const FULL_SCALE: u16 = A::FULL_SCALE;

    fn read(&mut self) -> Result<u16, Self::Error> {
        (**self).read()
    }
}

/// Scale a raw sample to a percentage, rounded to the nearest whole percent
///
/// Exact ties (only possible with an even `full_scale`) go to the even percent. For odd and
/// power of two full scales, e.g. `4095` or `4096`, this gives the same result as rounding the
/// `raw / full_scale` float to 2 decimals then multiplying by 100. Other even full scales have
/// ties a float cannot hold exactly, there the float rounding may differ by one.
/// Samples above `full_scale` saturate at 100.
pub fn to_percent(raw: u16, full_scale: u16) -> u8 {
    if full_scale == 0 {
        return 0;
    }

    let scaled = u32::from(raw.min(full_scale)) * 100;
    let full_scale = u32::from(full_scale);

    let (quotient, remainder) = (scaled / full_scale, scaled % full_scale);
    let round_up = match (remainder * 2).cmp(&full_scale) {
        Ordering::Greater => true,
        Ordering::Equal => quotient % 2 == 1,
        Ordering::Less => false,
    };

    (quotient + u32::from(round_up)) as u8
}
