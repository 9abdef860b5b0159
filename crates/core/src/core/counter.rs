//! Statistic counters that count up from zero once they scroll into view.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::debug;

use crate::scheduler::Scheduler;
use crate::time::Duration;

/// Parse a counter target the way markup authors write it: leading whitespace,
/// optional `+`, then digits; anything after the digits (`"500+"`, `"98%"`) is
/// ignored. Missing, negative or non-numeric targets count to `0`.
pub fn parse_target(raw: Option<&str>) -> u64 {
    let Some(raw) = raw else {
        return 0;
    };
    let s = raw.trim_start();
    let s = s.strip_prefix('+').unwrap_or(s);
    let end = s
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    s[..end].parse::<u64>().unwrap_or(0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterFrame {
    pub value: u64,
    pub finished: bool,
}

/// Fixed step count rather than a fixed rate: every counter takes about
/// `steps` ticks no matter how large its target is.
#[derive(Debug, Clone)]
pub struct CounterAnimation {
    target: u64,
    increment: f64,
    current: f64,
    finished: bool,
}

impl CounterAnimation {
    pub fn new(target: u64, steps: u32) -> Self {
        let steps = steps.max(1);
        Self {
            target,
            increment: target as f64 / f64::from(steps),
            current: 0.0,
            finished: false,
        }
    }

    pub fn target(&self) -> u64 {
        self.target
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Advance one step. The final frame always shows exactly `target`.
    pub fn tick(&mut self) -> CounterFrame {
        if self.finished {
            return CounterFrame {
                value: self.target,
                finished: true,
            };
        }

        self.current += self.increment;
        if self.current >= self.target as f64 {
            self.finished = true;
            return CounterFrame {
                value: self.target,
                finished: true,
            };
        }

        let value = (self.current.floor() as u64).min(self.target);
        CounterFrame {
            value,
            finished: false,
        }
    }
}

/// Cancels a running counter. Dropping the handle does not stop it.
#[derive(Debug, Clone)]
pub struct CounterHandle {
    cancelled: Rc<Cell<bool>>,
    finished: Rc<Cell<bool>>,
}

impl CounterHandle {
    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_finished(&self) -> bool {
        self.finished.get()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

struct CounterRun {
    animation: CounterAnimation,
    render: Box<dyn FnMut(u64)>,
}

/// Drive `animation` on `scheduler`, calling `render` with each displayed value
/// every `interval` until the target is shown or the handle is cancelled.
pub fn spawn_counter(
    scheduler: Rc<dyn Scheduler>,
    animation: CounterAnimation,
    interval: Duration,
    render: impl FnMut(u64) + 'static,
) -> CounterHandle {
    let handle = CounterHandle {
        cancelled: Rc::new(Cell::new(false)),
        finished: Rc::new(Cell::new(false)),
    };
    debug!(to = animation.target(), "counter started");

    let run = Rc::new(RefCell::new(CounterRun {
        animation,
        render: Box::new(render),
    }));
    schedule_tick(scheduler, run, interval, handle.clone());
    handle
}

fn schedule_tick(
    scheduler: Rc<dyn Scheduler>,
    run: Rc<RefCell<CounterRun>>,
    interval: Duration,
    handle: CounterHandle,
) {
    let next = scheduler.clone();
    scheduler.set_timeout(
        interval,
        Box::new(move || {
            if handle.is_cancelled() {
                return;
            }

            let frame = {
                let mut run = run.borrow_mut();
                let frame = run.animation.tick();
                (run.render)(frame.value);
                frame
            };

            if frame.finished {
                handle.finished.set(true);
            } else {
                schedule_tick(next, run, interval, handle);
            }
        }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::ManualScheduler;

    #[test]
    fn target_parsing_falls_back_to_zero() {
        assert_eq!(parse_target(Some("500")), 500);
        assert_eq!(parse_target(Some(" 500+ ")), 500);
        assert_eq!(parse_target(Some("+98%")), 98);
        assert_eq!(parse_target(Some("-3")), 0);
        assert_eq!(parse_target(Some("many")), 0);
        assert_eq!(parse_target(Some("")), 0);
        assert_eq!(parse_target(None), 0);
    }

    fn run_to_end(target: u64) -> (Vec<u64>, u64) {
        let mut anim = CounterAnimation::new(target, 100);
        let mut shown = Vec::new();
        let mut ticks = 0;
        loop {
            let frame = anim.tick();
            ticks += 1;
            shown.push(frame.value);
            if frame.finished {
                break;
            }
            assert!(ticks < 1_000, "counter never finished");
        }
        (shown, ticks)
    }

    #[test]
    fn ends_exactly_on_target_without_overshoot() {
        for target in [0u64, 1, 7, 500, 999_999] {
            let (shown, ticks) = run_to_end(target);
            assert_eq!(*shown.last().unwrap(), target);
            assert!(shown.iter().all(|v| *v <= target));
            assert!(shown.windows(2).all(|w| w[0] <= w[1]), "not monotonic");
            assert!(ticks <= 101, "target {target} took {ticks} ticks");
        }
    }

    #[test]
    fn zero_target_finishes_on_first_tick() {
        let mut anim = CounterAnimation::new(0, 100);
        assert_eq!(
            anim.tick(),
            CounterFrame {
                value: 0,
                finished: true
            }
        );
        assert!(anim.is_finished());
        assert_eq!(anim.tick().value, 0);
    }

    #[test]
    fn spawned_counter_renders_until_target() {
        let clock = Rc::new(ManualScheduler::new());
        let sched: Rc<dyn Scheduler> = clock.clone();
        let shown = Rc::new(RefCell::new(Vec::new()));

        let s = shown.clone();
        let handle = spawn_counter(
            sched,
            CounterAnimation::new(250, 100),
            Duration::from_millis(20),
            move |v| s.borrow_mut().push(v),
        );

        clock.advance(Duration::from_millis(19));
        assert!(shown.borrow().is_empty());

        clock.advance(Duration::from_millis(1));
        assert_eq!(*shown.borrow(), vec![2]);

        clock.advance(Duration::from_secs(5));
        assert!(handle.is_finished());
        assert_eq!(*shown.borrow().last().unwrap(), 250);
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn cancelled_counter_stops_rendering() {
        let clock = Rc::new(ManualScheduler::new());
        let sched: Rc<dyn Scheduler> = clock.clone();
        let shown = Rc::new(RefCell::new(Vec::new()));

        let s = shown.clone();
        let handle = spawn_counter(
            sched,
            CounterAnimation::new(1_000, 100),
            Duration::from_millis(20),
            move |v| s.borrow_mut().push(v),
        );

        clock.advance(Duration::from_millis(60));
        handle.cancel();
        clock.advance(Duration::from_secs(5));

        assert_eq!(shown.borrow().len(), 3);
        assert!(!handle.is_finished());
        assert_eq!(clock.pending(), 0);
    }
}
