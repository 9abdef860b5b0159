use std::cell::{Cell, RefCell};
use std::rc::Rc;

use fitcore::scheduler::{Scheduler, Task, TimerId};
use fitcore::time::{millis_u32, Duration};
use hashbrown::HashMap;
use tracing::warn;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::Window;

#[derive(Clone, Copy)]
enum Kind {
    Timeout,
    Frame,
}

struct Slot {
    kind: Kind,
    handle: i32,
    // Held so the JS callback stays valid until it fires or is cleared.
    _closure: Closure<dyn FnMut()>,
}

/// [`Scheduler`] on `setTimeout` / `requestAnimationFrame`.
///
/// Each pending callback owns a slot; the slot (and its closure) is released when
/// the callback fires or is cancelled, so cancelled debounce timers do not leak.
pub(super) struct BrowserScheduler {
    window: Window,
    next_key: Cell<u64>,
    slots: Rc<RefCell<HashMap<u64, Slot>>>,
}

impl BrowserScheduler {
    pub(super) fn new(window: Window) -> Self {
        Self {
            window,
            next_key: Cell::new(1),
            slots: Rc::new(RefCell::new(HashMap::new())),
        }
    }

    fn schedule(&self, kind: Kind, delay: Duration, task: Task) -> TimerId {
        let key = self.next_key.get();
        self.next_key.set(key + 1);

        let slots = Rc::clone(&self.slots);
        let mut task = Some(task);
        let closure = Closure::<dyn FnMut()>::new(move || {
            // Release the slot before running the task so the task may schedule
            // again (counters and debounce do).
            let slot = slots.borrow_mut().remove(&key);
            if let Some(task) = task.take() {
                task();
            }
            drop(slot);
        });

        let callback = closure.as_ref().unchecked_ref();
        let handle = match kind {
            Kind::Timeout => {
                let ms = millis_u32(delay).min(i32::MAX as u32) as i32;
                self.window
                    .set_timeout_with_callback_and_timeout_and_arguments_0(callback, ms)
            }
            Kind::Frame => self.window.request_animation_frame(callback),
        };

        match handle {
            Ok(handle) => {
                self.slots.borrow_mut().insert(
                    key,
                    Slot {
                        kind,
                        handle,
                        _closure: closure,
                    },
                );
            }
            Err(e) => warn!(?e, "failed to schedule browser callback"),
        }
        TimerId(key)
    }

    fn cancel(&self, id: TimerId) {
        let slot = self.slots.borrow_mut().remove(&id.0);
        if let Some(slot) = slot {
            match slot.kind {
                Kind::Timeout => self.window.clear_timeout_with_handle(slot.handle),
                Kind::Frame => {
                    let _ = self.window.cancel_animation_frame(slot.handle);
                }
            }
        }
    }
}

impl Scheduler for BrowserScheduler {
    fn set_timeout(&self, delay: Duration, task: Task) -> TimerId {
        self.schedule(Kind::Timeout, delay, task)
    }

    fn clear_timeout(&self, id: TimerId) {
        self.cancel(id);
    }

    fn request_frame(&self, task: Task) -> TimerId {
        self.schedule(Kind::Frame, Duration::ZERO, task)
    }

    fn cancel_frame(&self, id: TimerId) {
        self.cancel(id);
    }
}

impl Drop for BrowserScheduler {
    fn drop(&mut self) {
        let keys: Vec<u64> = self.slots.borrow().keys().copied().collect();
        for key in keys {
            self.cancel(TimerId(key));
        }
    }
}
