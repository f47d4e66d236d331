//! Drive LCD1602 with a STM32F411RET6 in 8 Pin Mode, with a button and a potentiometer
//!
//! The potentiometer value is shown on the first line, pressing the button quits:
//! the display is cleared and turned off, then the core idles.

//! Wiring diagram
//!
//! LCD1602 <-> STM32F411RET6
//!     Vss <-> GND
//!     Vdd <-> 5V (It is best to use an external source for the 5V pin, such as the 5V output from a DAPLink device or USB.)
//!      V0 <-> potentiometer <-> 5V & GND (to adjust the display contrast)
//!      RS <-> PA9
//!      RW <-> GND (write only)
//!      EN <-> PA8 (and optionally connect to a 4.7 kOhm Pulldown resistor, to stable voltage level when STM32 reset)
//!      D0 <-> PB0
//!     ...
//!      D7 <-> PB7
//!       A <-> 5V
//!       K <-> GND
//!
//! Button (to 3V3, pull-down inside MCU) <-> PA1
//! Potentiometer wiper (between 3V3 and GND) <-> PA0

#![no_std]
#![no_main]

use core::{convert::Infallible, fmt::Write};

use cortex_m::peripheral::DWT;
use embedded_alloc::LlffHeap as Heap;
use log::info;
use panic_rtt_target as _;
use rtt_target::rtt_init_log;
use stm32f4xx_hal::{
    adc::{
        config::{AdcConfig, SampleTime},
        Adc,
    },
    gpio::{Analog, ErasedPin, Output, PA0},
    pac,
    prelude::*,
    timer::SysDelay,
};

use lcd1602_uikit::{
    analog::AnalogInput,
    button::Button,
    event_loop::{Clock, EventLoop, Handle},
    lcd::Lcd,
    potentiometer::PotentioMeter,
    sender::ParallelSender,
};

#[global_allocator]
static HEAP: Heap = Heap::empty();

const HEAP_SIZE: usize = 4096;

type LinePin = ErasedPin<Output>;
type Display = Lcd<ParallelSender<LinePin, LinePin, SysDelay>>;

struct App {
    lcd: Display,
}

impl AsMut<Display> for App {
    fn as_mut(&mut self) -> &mut Display {
        &mut self.lcd
    }
}

/// Millisecond clock on the DWT cycle counter, wrap around is folded in on every read
struct DwtClock {
    last_cycles: u32,
    total_cycles: u64,
    cycles_per_ms: u64,
}

impl DwtClock {
    fn new(sysclk_hz: u32) -> Self {
        Self {
            last_cycles: DWT::cycle_count(),
            total_cycles: 0,
            cycles_per_ms: u64::from(sysclk_hz / 1_000),
        }
    }
}

impl Clock for DwtClock {
    fn now_ms(&mut self) -> u64 {
        let cycles = DWT::cycle_count();
        self.total_cycles += u64::from(cycles.wrapping_sub(self.last_cycles));
        self.last_cycles = cycles;
        self.total_cycles / self.cycles_per_ms
    }
}

/// ADC1 on PA0, 12-bit samples
struct PotChannel {
    adc: Adc<pac::ADC1>,
    pin: PA0<Analog>,
}

impl AnalogInput for PotChannel {
    type Error = Infallible;

    const FULL_SCALE: u16 = 4095;

    fn read(&mut self) -> Result<u16, Self::Error> {
        Ok(self.adc.convert(&self.pin, SampleTime::Cycles_480))
    }
}

fn show_value(handle: &mut Handle<'_, App>, value: u8) {
    let mut text: heapless::String<8> = heapless::String::new();
    if write!(text, "{:>3}%", value).is_err() {
        info!("demo: cannot format value {}", value);
        return;
    }

    let shown = handle.lcd.home().and_then(|_| handle.lcd.write(&text));
    if let Err(err) = shown {
        info!("demo: cannot show value: {}", err);
    }
}

#[cortex_m_rt::entry]
fn main() -> ! {
    rtt_init_log!();

    {
        use core::mem::MaybeUninit;
        static mut HEAP_MEM: [MaybeUninit<u8>; HEAP_SIZE] = [MaybeUninit::uninit(); HEAP_SIZE];
        unsafe { HEAP.init(core::ptr::addr_of_mut!(HEAP_MEM) as usize, HEAP_SIZE) }
    }

    let dp = pac::Peripherals::take().expect("Cannot take device peripherals");
    let mut cp = pac::CorePeripherals::take().expect("Cannot take core peripherals");

    let rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.use_hse(8.MHz()).sysclk(84.MHz()).freeze();

    let delayer = cp.SYST.delay(&clocks);

    cp.DCB.enable_trace();
    cp.DWT.enable_cycle_counter();

    let mut event_loop: EventLoop<App, DwtClock> =
        EventLoop::new(DwtClock::new(clocks.sysclk().raw()));

    // init needed digital pins

    let gpioa = dp.GPIOA.split();
    let gpiob = dp.GPIOB.split();

    // Push-pull mode for a fast interaction
    let en_pin = gpioa.pa8.into_push_pull_output().erase();
    let rs_pin = gpioa.pa9.into_push_pull_output().erase();

    // DB7 first
    let db_pins = [
        gpiob.pb7.into_push_pull_output().erase(),
        gpiob.pb6.into_push_pull_output().erase(),
        gpiob.pb5.into_push_pull_output().erase(),
        gpiob.pb4.into_push_pull_output().erase(),
        gpiob.pb3.into_push_pull_output().erase(),
        gpiob.pb2.into_push_pull_output().erase(),
        gpiob.pb1.into_push_pull_output().erase(),
        gpiob.pb0.into_push_pull_output().erase(),
    ];

    let sender =
        ParallelSender::new(db_pins, en_pin, rs_pin, delayer).expect("Cannot drive LCD lines");

    // init LCD1602
    let lcd = Lcd::new(sender, Some("Hello"), &mut event_loop).expect("Cannot init LCD");
    let mut app = App { lcd };

    Button::new(gpioa.pa1.into_pull_down_input())
        .on_pressed(|handle: &mut Handle<'_, App>| handle.quit())
        .register(&mut event_loop)
        .expect("Cannot read button");

    let adc = Adc::adc1(dp.ADC1, true, AdcConfig::default());
    PotentioMeter::new(PotChannel {
        adc,
        pin: gpioa.pa0.into_analog(),
    })
    .on_changed(show_value)
    .register(&mut event_loop)
    .expect("Cannot read potentiometer");

    info!("demo: running");
    event_loop.run(&mut app);
    info!("demo: stopped");

    #[allow(clippy::empty_loop)]
    loop {}
}
