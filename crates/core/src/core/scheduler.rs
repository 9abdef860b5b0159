//! Deferred work: timeouts and animation frames.
//!
//! Every behavior that waits (debounce, throttle, counter ticks, per-frame scroll
//! work) goes through [`Scheduler`], so the browser implementation and the
//! deterministic [`ManualScheduler`] used by tests are interchangeable.

use std::cell::RefCell;
use std::collections::BTreeMap;

use hashbrown::HashMap;

use crate::time::Duration;

/// Handle for a pending timeout or frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

pub type Task = Box<dyn FnOnce()>;

/// Single-threaded task scheduling. Tasks never run re-entrantly from inside the
/// call that scheduled them.
pub trait Scheduler {
    fn set_timeout(&self, delay: Duration, task: Task) -> TimerId;

    /// Cancelling an id that already fired (or was never issued) is a no-op.
    fn clear_timeout(&self, id: TimerId);

    /// Run `task` before the next repaint.
    fn request_frame(&self, task: Task) -> TimerId;

    fn cancel_frame(&self, id: TimerId);
}

struct ManualState {
    now: Duration,
    next_id: u64,
    timers: BTreeMap<(Duration, u64), Task>,
    due_at: HashMap<u64, Duration>,
    frames: Vec<(u64, Task)>,
}

/// Virtual clock for host tests.
///
/// Time only moves through [`advance`](Self::advance) / [`advance_to`](Self::advance_to);
/// frames only run through [`run_frame`](Self::run_frame). Timers due at the same
/// instant run in the order they were scheduled.
pub struct ManualScheduler {
    state: RefCell<ManualState>,
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self {
            state: RefCell::new(ManualState {
                now: Duration::ZERO,
                next_id: 1,
                timers: BTreeMap::new(),
                due_at: HashMap::new(),
                frames: Vec::new(),
            }),
        }
    }

    pub fn now(&self) -> Duration {
        self.state.borrow().now
    }

    /// Pending timeouts (frames not included).
    pub fn pending(&self) -> usize {
        self.state.borrow().timers.len()
    }

    pub fn pending_frames(&self) -> usize {
        self.state.borrow().frames.len()
    }

    pub fn advance(&self, by: Duration) {
        let target = self.now() + by;
        self.advance_to(target);
    }

    /// Run every timeout due at or before `target`, including ones scheduled by
    /// tasks that run along the way, then park the clock at `target`.
    pub fn advance_to(&self, target: Duration) {
        loop {
            let task = {
                let mut st = self.state.borrow_mut();
                let key = match st.timers.keys().next() {
                    Some(&key) if key.0 <= target => key,
                    _ => break,
                };
                st.due_at.remove(&key.1);
                st.now = key.0;
                st.timers.remove(&key)
            };
            if let Some(task) = task {
                task();
            }
        }

        let mut st = self.state.borrow_mut();
        if st.now < target {
            st.now = target;
        }
    }

    /// Run the frame callbacks requested so far. Callbacks requested while this
    /// frame runs wait for the next one. Returns how many ran.
    pub fn run_frame(&self) -> usize {
        let frames = std::mem::take(&mut self.state.borrow_mut().frames);
        let count = frames.len();
        for (_, task) in frames {
            task();
        }
        count
    }

    fn issue_id(st: &mut ManualState) -> u64 {
        let id = st.next_id;
        st.next_id += 1;
        id
    }
}

impl Scheduler for ManualScheduler {
    fn set_timeout(&self, delay: Duration, task: Task) -> TimerId {
        let mut st = self.state.borrow_mut();
        let id = Self::issue_id(&mut st);
        let due = st.now + delay;
        st.timers.insert((due, id), task);
        st.due_at.insert(id, due);
        TimerId(id)
    }

    fn clear_timeout(&self, id: TimerId) {
        let mut st = self.state.borrow_mut();
        if let Some(due) = st.due_at.remove(&id.0) {
            st.timers.remove(&(due, id.0));
        }
    }

    fn request_frame(&self, task: Task) -> TimerId {
        let mut st = self.state.borrow_mut();
        let id = Self::issue_id(&mut st);
        st.frames.push((id, task));
        TimerId(id)
    }

    fn cancel_frame(&self, id: TimerId) {
        self.state.borrow_mut().frames.retain(|(fid, _)| *fid != id.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn timeouts_run_in_due_order() {
        let s = ManualScheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        for (delay, tag) in [(30, "c"), (10, "a"), (20, "b"), (10, "a2")] {
            let log = log.clone();
            s.set_timeout(ms(delay), Box::new(move || log.borrow_mut().push(tag)));
        }

        s.advance(ms(15));
        assert_eq!(*log.borrow(), vec!["a", "a2"]);
        s.advance(ms(100));
        assert_eq!(*log.borrow(), vec!["a", "a2", "b", "c"]);
        assert_eq!(s.now(), ms(115));
    }

    #[test]
    fn cleared_timeout_never_runs() {
        let s = ManualScheduler::new();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let id = s.set_timeout(ms(5), Box::new(move || h.set(h.get() + 1)));
        s.clear_timeout(id);
        s.clear_timeout(id);
        s.advance(ms(50));
        assert_eq!(hits.get(), 0);
        assert_eq!(s.pending(), 0);
    }

    #[test]
    fn tasks_can_reschedule_within_one_advance() {
        let s = Rc::new(ManualScheduler::new());
        let hits = Rc::new(Cell::new(0));

        let s2 = s.clone();
        let h = hits.clone();
        s.set_timeout(
            ms(10),
            Box::new(move || {
                h.set(h.get() + 1);
                let h = h.clone();
                s2.set_timeout(ms(10), Box::new(move || h.set(h.get() + 1)));
            }),
        );

        s.advance(ms(20));
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn frames_requested_during_a_frame_wait_for_the_next() {
        let s = Rc::new(ManualScheduler::new());
        let hits = Rc::new(Cell::new(0));

        let s2 = s.clone();
        let h = hits.clone();
        s.request_frame(Box::new(move || {
            h.set(h.get() + 1);
            let h = h.clone();
            s2.request_frame(Box::new(move || h.set(h.get() + 1)));
        }));

        assert_eq!(s.run_frame(), 1);
        assert_eq!(hits.get(), 1);
        assert_eq!(s.run_frame(), 1);
        assert_eq!(hits.get(), 2);
        assert_eq!(s.run_frame(), 0);
    }

    #[test]
    fn cancelled_frame_is_dropped() {
        let s = ManualScheduler::new();
        let id = s.request_frame(Box::new(|| panic!("cancelled frame ran")));
        s.cancel_frame(id);
        assert_eq!(s.pending_frames(), 0);
        assert_eq!(s.run_frame(), 0);
    }
}
