//! Status-light adapter for identify pulses.
//!
//! Drives any `embedded_hal` output pin.  [`Indicator::blink`] switches
//! the pin on and records when it must go off; the main loop calls
//! [`PinIndicator::poll`] each iteration to end the pulse.
//!
//! Pin errors are logged and otherwise ignored: a stuck status light is
//! not worth failing dispatch over.

use embedded_hal::digital::OutputPin;
use log::warn;

use crate::app::ports::{Clock, Indicator};

/// One GPIO used as the identify light.
pub struct PinIndicator<P, C> {
    pin: P,
    clock: C,
    /// Time at which the current pulse ends.
    off_at_us: Option<u64>,
}

impl<P: OutputPin, C: Clock> PinIndicator<P, C> {
    pub fn new(pin: P, clock: C) -> Self {
        Self {
            pin,
            clock,
            off_at_us: None,
        }
    }

    /// End the current pulse once its duration has elapsed.
    pub fn poll(&mut self) {
        let Some(off_at) = self.off_at_us else {
            return;
        };
        if self.clock.now_us() >= off_at {
            if self.pin.set_low().is_err() {
                warn!("indicator: failed to clear pin");
            }
            self.off_at_us = None;
        }
    }

    /// Whether a pulse is in progress.
    pub fn is_lit(&self) -> bool {
        self.off_at_us.is_some()
    }
}

impl<P: OutputPin, C: Clock> Indicator for PinIndicator<P, C> {
    fn blink(&mut self, duration_us: u32) {
        if self.pin.set_high().is_err() {
            warn!("indicator: failed to set pin");
            return;
        }
        self.off_at_us = Some(self.clock.now_us() + u64::from(duration_us));
    }
}
