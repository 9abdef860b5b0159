//! Rate limiting for event handlers.
//!
//! - [`Debounce`]: trailing edge. Only the last call of a burst runs, `wait` after it.
//! - [`Throttle`]: leading edge. The first call of each `limit` window runs, the
//!   rest are dropped.
//! - [`FrameThrottle`]: at most one run per animation frame.
//!
//! All three cancel their pending work when dropped.

use std::cell::Cell;
use std::rc::{Rc, Weak};

use crate::scheduler::{Scheduler, TimerId};
use crate::time::Duration;

struct DebounceInner<A> {
    scheduler: Rc<dyn Scheduler>,
    wait: Duration,
    pending: Cell<Option<TimerId>>,
    func: Box<dyn Fn(A)>,
}

pub struct Debounce<A: 'static> {
    inner: Rc<DebounceInner<A>>,
}

impl<A: 'static> Debounce<A> {
    pub fn new(scheduler: Rc<dyn Scheduler>, wait: Duration, func: impl Fn(A) + 'static) -> Self {
        Self {
            inner: Rc::new(DebounceInner {
                scheduler,
                wait,
                pending: Cell::new(None),
                func: Box::new(func),
            }),
        }
    }

    /// Replace any pending invocation with one for `arg`, due `wait` from now.
    pub fn call(&self, arg: A) {
        self.cancel();

        let weak: Weak<DebounceInner<A>> = Rc::downgrade(&self.inner);
        let id = self.inner.scheduler.set_timeout(
            self.inner.wait,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.pending.set(None);
                    (inner.func)(arg);
                }
            }),
        );
        self.inner.pending.set(Some(id));
    }

    pub fn cancel(&self) {
        if let Some(id) = self.inner.pending.take() {
            self.inner.scheduler.clear_timeout(id);
        }
    }

    pub fn is_pending(&self) -> bool {
        let id = self.inner.pending.get();
        id.is_some()
    }
}

impl<A: 'static> Drop for Debounce<A> {
    fn drop(&mut self) {
        self.cancel();
    }
}

struct ThrottleInner<A> {
    scheduler: Rc<dyn Scheduler>,
    limit: Duration,
    blocked: Cell<bool>,
    reset: Cell<Option<TimerId>>,
    func: Box<dyn Fn(A)>,
}

pub struct Throttle<A: 'static> {
    inner: Rc<ThrottleInner<A>>,
}

impl<A: 'static> Throttle<A> {
    pub fn new(scheduler: Rc<dyn Scheduler>, limit: Duration, func: impl Fn(A) + 'static) -> Self {
        Self {
            inner: Rc::new(ThrottleInner {
                scheduler,
                limit,
                blocked: Cell::new(false),
                reset: Cell::new(None),
                func: Box::new(func),
            }),
        }
    }

    /// Returns whether the call ran.
    pub fn call(&self, arg: A) -> bool {
        if self.inner.blocked.get() {
            return false;
        }

        self.inner.blocked.set(true);
        let weak = Rc::downgrade(&self.inner);
        let id = self.inner.scheduler.set_timeout(
            self.inner.limit,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.reset.set(None);
                    inner.blocked.set(false);
                }
            }),
        );
        self.inner.reset.set(Some(id));

        (self.inner.func)(arg);
        true
    }

    pub fn is_blocked(&self) -> bool {
        self.inner.blocked.get()
    }
}

impl<A: 'static> Drop for Throttle<A> {
    fn drop(&mut self) {
        if let Some(id) = self.inner.reset.take() {
            self.inner.scheduler.clear_timeout(id);
        }
    }
}

struct FrameInner {
    scheduler: Rc<dyn Scheduler>,
    frame: Cell<Option<TimerId>>,
    func: Box<dyn Fn()>,
}

/// Coalesces bursts of events (scroll fires many times per repaint) into one
/// run in the next animation frame.
pub struct FrameThrottle {
    inner: Rc<FrameInner>,
}

impl FrameThrottle {
    pub fn new(scheduler: Rc<dyn Scheduler>, func: impl Fn() + 'static) -> Self {
        Self {
            inner: Rc::new(FrameInner {
                scheduler,
                frame: Cell::new(None),
                func: Box::new(func),
            }),
        }
    }

    /// Returns `true` if this call requested a new frame, `false` if one was
    /// already pending.
    pub fn schedule(&self) -> bool {
        if self.is_ticking() {
            return false;
        }

        let weak = Rc::downgrade(&self.inner);
        let id = self.inner.scheduler.request_frame(Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.frame.set(None);
                (inner.func)();
            }
        }));
        self.inner.frame.set(Some(id));
        true
    }

    pub fn is_ticking(&self) -> bool {
        let frame = self.inner.frame.get();
        frame.is_some()
    }

    pub fn cancel(&self) {
        if let Some(id) = self.inner.frame.take() {
            self.inner.scheduler.cancel_frame(id);
        }
    }
}

impl Drop for FrameThrottle {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::ManualScheduler;
    use std::cell::RefCell;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn manual() -> (Rc<ManualScheduler>, Rc<dyn Scheduler>) {
        let s = Rc::new(ManualScheduler::new());
        let dyn_s: Rc<dyn Scheduler> = s.clone();
        (s, dyn_s)
    }

    #[test]
    fn debounce_burst_runs_once_after_last_call() {
        let (clock, sched) = manual();
        let calls = Rc::new(RefCell::new(Vec::new()));
        let c = calls.clone();
        let d = Debounce::new(sched, ms(250), move |arg: u32| {
            c.borrow_mut().push(arg);
        });

        // Five calls, 10ms apart: t = 0, 10, 20, 30, 40.
        for i in 0..5u32 {
            clock.advance_to(ms(u64::from(i) * 10));
            d.call(i);
        }

        clock.advance_to(ms(289));
        assert!(calls.borrow().is_empty());
        assert!(d.is_pending());

        clock.advance_to(ms(290));
        assert_eq!(*calls.borrow(), vec![4]);
        assert!(!d.is_pending());

        clock.advance(ms(1_000));
        assert_eq!(calls.borrow().len(), 1);
    }

    #[test]
    fn debounce_cancel_and_drop_discard_pending_call() {
        let (clock, sched) = manual();
        let hits = Rc::new(Cell::new(0));

        let h = hits.clone();
        let d = Debounce::new(sched.clone(), ms(50), move |_: ()| h.set(h.get() + 1));
        d.call(());
        d.cancel();
        clock.advance(ms(100));
        assert_eq!(hits.get(), 0);

        d.call(());
        drop(d);
        clock.advance(ms(100));
        assert_eq!(hits.get(), 0);
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn throttle_runs_on_leading_edge_of_each_window() {
        let (clock, sched) = manual();
        let at = Rc::new(RefCell::new(Vec::new()));

        let a = at.clone();
        let clock_for_fn = clock.clone();
        let t = Throttle::new(sched, ms(100), move |_: ()| {
            a.borrow_mut().push(clock_for_fn.now().as_millis());
        });

        // A call every 10ms for 500ms.
        for step in 0..50u64 {
            clock.advance_to(ms(step * 10));
            t.call(());
        }

        assert_eq!(*at.borrow(), vec![0, 100, 200, 300, 400]);
    }

    #[test]
    fn throttle_reports_dropped_calls() {
        let (clock, sched) = manual();
        let t = Throttle::new(sched, ms(100), |_: u8| {});
        assert!(t.call(1));
        assert!(t.is_blocked());
        assert!(!t.call(2));
        clock.advance(ms(100));
        assert!(!t.is_blocked());
        assert!(t.call(3));
    }

    #[test]
    fn frame_throttle_coalesces_until_the_frame_runs() {
        let (clock, sched) = manual();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let f = FrameThrottle::new(sched, move || h.set(h.get() + 1));

        assert!(f.schedule());
        assert!(!f.schedule());
        assert!(!f.schedule());
        assert_eq!(clock.pending_frames(), 1);

        clock.run_frame();
        assert_eq!(hits.get(), 1);
        assert!(!f.is_ticking());

        assert!(f.schedule());
        clock.run_frame();
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn frame_throttle_cancel_drops_the_frame() {
        let (clock, sched) = manual();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let f = FrameThrottle::new(sched, move || h.set(h.get() + 1));
        f.schedule();
        f.cancel();
        assert_eq!(clock.run_frame(), 0);
        assert_eq!(hits.get(), 0);
    }
}
