//! Cooperative, single threaded polling of input devices
//!
//! The loop owns every registered [`Device`] and every shutdown action.
//! Application state lives in a context value `Ctx`, which callbacks reach through a [`Handle`].
//!
//! Instead of blocking inside a device, each poll reports when the device wants to be polled again.
//! A pass polls, in registration order, every device that is due; when nothing is due the loop
//! sleeps on the [`Clock`] until the earliest due time. One slow device never delays the others.
//!
//! A registered device stays reachable through its [`DeviceId`]: [`EventLoop::device_mut()`]
//! from the application, [`Handle::device_mut()`] from a callback.

use alloc::{boxed::Box, vec::Vec};
use core::{
    any::Any,
    ops::{Deref, DerefMut},
};

use log::{debug, warn};

use crate::Error;

/// Monotonic millisecond time source of the loop
pub trait Clock {
    /// Milliseconds since an arbitrary, fixed origin, never decreasing
    fn now_ms(&mut self) -> u64;

    /// Block until [`Clock::now_ms()`] reaches `deadline_ms`
    ///
    /// Default implementation spins on [`Clock::now_ms()`],
    /// a firmware may override it to sleep the core (e.g. `wfi`).
    fn sleep_until(&mut self, deadline_ms: u64) {
        while self.now_ms() < deadline_ms {}
    }
}

/// What a device callback gets: the application context and a way to stop the loop
///
/// It also reaches the other registered devices, see [`Handle::device_mut()`].
pub struct Handle<'h, Ctx> {
    ctx: &'h mut Ctx,
    // registry split around the device being polled
    before: &'h mut [Slot<Ctx>],
    after: &'h mut [Slot<Ctx>],
    quit_requested: bool,
}

impl<'h, Ctx> Handle<'h, Ctx> {
    fn new(ctx: &'h mut Ctx, before: &'h mut [Slot<Ctx>], after: &'h mut [Slot<Ctx>]) -> Self {
        Self {
            ctx,
            before,
            after,
            quit_requested: false,
        }
    }

    /// Ask the loop to stop
    ///
    /// Shutdown actions run as soon as the current device finishes its poll,
    /// the current pass still completes before [`EventLoop::run()`] returns.
    pub fn quit(&mut self) {
        self.quit_requested = true;
    }

    /// Whether [`Handle::quit()`] was called
    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Another registered device, e.g. to read a potentiometer from a button callback
    ///
    /// `None` if `id` is the device currently being polled, or if it is not a `D`.
    pub fn device_mut<D: Any>(&mut self, id: DeviceId) -> Option<&mut D> {
        let polled = self.before.len();
        let slot = match id.0 {
            index if index < polled => self.before.get_mut(index)?,
            index if index == polled => return None,
            index => self.after.get_mut(index - polled - 1)?,
        };
        slot.downcast_mut()
    }
}

impl<Ctx> Deref for Handle<'_, Ctx> {
    type Target = Ctx;

    fn deref(&self) -> &Ctx {
        &*self.ctx
    }
}

impl<Ctx> DerefMut for Handle<'_, Ctx> {
    fn deref_mut(&mut self) -> &mut Ctx {
        &mut *self.ctx
    }
}

/// Upcast to [`Any`], implemented for every `'static` type
///
/// Lets the loop hand a registered device back with its concrete type.
pub trait AsAny {
    /// `self` as [`Any`]
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Anything the loop can poll
pub trait Device<Ctx>: AsAny {
    /// Sample the hardware, fire callbacks on state transitions,
    /// and return the time (in [`Clock::now_ms()`] units) this device is due again.
    ///
    /// Returning `now_ms` asks to be polled on the very next pass.
    fn poll(&mut self, now_ms: u64, handle: &mut Handle<'_, Ctx>) -> Result<u64, Error>;
}

/// Position of a device in the registry, returned by [`EventLoop::register()`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct DeviceId(usize);

impl DeviceId {
    /// Registration index, starting from 0
    pub fn index(self) -> usize {
        self.0
    }
}

/// A callback without payload, e.g. a button press
pub type Callback<Ctx> = Box<dyn FnMut(&mut Handle<'_, Ctx>)>;

/// An action run once when the loop quits
pub type ShutdownAction<Ctx> = Box<dyn FnMut(&mut Ctx)>;

struct Slot<Ctx> {
    device: Box<dyn Device<Ctx>>,
    next_due_ms: u64,
}

impl<Ctx> Slot<Ctx> {
    fn downcast_mut<D: Any>(&mut self) -> Option<&mut D> {
        // through the trait object, not the box
        AsAny::as_any_mut(&mut *self.device).downcast_mut()
    }
}

/// The scheduler
pub struct EventLoop<Ctx, C: Clock> {
    registry: Vec<Slot<Ctx>>,
    shutdown_actions: Vec<ShutdownAction<Ctx>>,
    running: bool,
    clock: C,
}

impl<Ctx, C: Clock> EventLoop<Ctx, C> {
    /// Create an empty loop, it counts as running until [`EventLoop::quit()`]
    pub fn new(clock: C) -> Self {
        Self {
            registry: Vec::new(),
            shutdown_actions: Vec::new(),
            running: true,
            clock,
        }
    }

    /// Append a device to the registry, it is due immediately
    ///
    /// There is no way to unregister, a device stays until the loop is dropped.
    pub fn register(&mut self, device: impl Device<Ctx> + 'static) -> DeviceId {
        let id = DeviceId(self.registry.len());
        self.registry.push(Slot {
            device: Box::new(device),
            next_due_ms: 0,
        });
        debug!("event loop: registered device {}", id.0);
        id
    }

    /// Append an action to run when the loop quits
    pub fn on_quit(&mut self, action: impl FnMut(&mut Ctx) + 'static) {
        self.shutdown_actions.push(Box::new(action));
    }

    /// `true` from construction until [`EventLoop::quit()`]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// A registered device, `None` if `id` is unknown or the device is not a `D`
    pub fn device_mut<D: Any>(&mut self, id: DeviceId) -> Option<&mut D> {
        self.registry.get_mut(id.0)?.downcast_mut()
    }

    /// Number of registered devices
    pub fn device_count(&self) -> usize {
        self.registry.len()
    }

    /// Number of shutdown actions still waiting to run
    pub fn pending_shutdown_actions(&self) -> usize {
        self.shutdown_actions.len()
    }

    /// Access the clock, e.g. for a callback-free wait in the application
    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// Poll devices until the loop quits
    pub fn run(&mut self, ctx: &mut Ctx) {
        debug!("event loop: start, {} devices", self.registry.len());

        while self.running {
            self.run_once(ctx);
        }

        debug!("event loop: stopped");
    }

    /// One pass over the registry
    ///
    /// Devices that are due are polled in registration order. If no device was due,
    /// sleep until the earliest one is. Does nothing once the loop has quit.
    pub fn run_once(&mut self, ctx: &mut Ctx) {
        if !self.running {
            return;
        }

        let now = self.clock.now_ms();
        let mut polled_any = false;

        for index in 0..self.registry.len() {
            let (before, rest) = self.registry.split_at_mut(index);
            let Some((slot, after)) = rest.split_first_mut() else {
                break;
            };
            if slot.next_due_ms > now {
                continue;
            }
            polled_any = true;

            let mut handle = Handle::new(ctx, before, after);
            match slot.device.poll(now, &mut handle) {
                Ok(next_due_ms) => slot.next_due_ms = next_due_ms,
                // keep the old due time, the device is retried on the next pass
                Err(err) => warn!("event loop: device {} skipped: {}", index, err),
            }

            if handle.quit_requested() {
                self.quit(ctx);
            }
        }

        if !polled_any {
            let earliest = self.registry.iter().map(|slot| slot.next_due_ms).min();
            if let Some(deadline) = earliest {
                self.clock.sleep_until(deadline);
            }
        }
    }

    /// Run every shutdown action once, in registration order, then stop the loop
    ///
    /// Calling it again does not run the actions a second time.
    pub fn quit(&mut self, ctx: &mut Ctx) {
        debug!(
            "event loop: quit, {} shutdown actions",
            self.shutdown_actions.len()
        );

        for mut action in self.shutdown_actions.drain(..) {
            action(ctx);
        }

        self.running = false;
    }
}
