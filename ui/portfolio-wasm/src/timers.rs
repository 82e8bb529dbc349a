//! Fixed-delay timers on top of `gloo-timers`.
//!
//! Every pending [`Timeout`] is owned by the scheduler; dropping the
//! scheduler clears whatever has not fired yet. A fired timeout is dropped in
//! a microtask once its callback has returned.

use crate::registry::Registry;
use gloo_timers::callback::Timeout;
use pf_core::Scheduler;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

#[derive(Default)]
pub struct WebScheduler {
    pending: Rc<RefCell<Registry<Timeout>>>,
}

impl Scheduler for WebScheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) {
        let pending = Rc::clone(&self.pending);
        let slot = Rc::new(Cell::new(None::<u32>));
        let fired_slot = Rc::clone(&slot);

        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        let timeout = Timeout::new(millis, move || {
            let fired = fired_slot
                .take()
                .and_then(|id| pending.borrow_mut().take(id));
            task();
            // The callback still runs inside `fired`.
            if let Some(fired) = fired {
                let release = Closure::once_into_js(move || drop(fired));
                gloo_utils::window().queue_microtask(release.unchecked_ref());
            }
        });
        slot.set(Some(self.pending.borrow_mut().insert(timeout)));
    }
}

impl Drop for WebScheduler {
    fn drop(&mut self) {
        self.pending.borrow_mut().clear();
    }
}
