//! Ordered, best-effort initialization.
//!
//! Steps run strictly in order. The first failure stops the sequence and is
//! logged once; steps that already ran stay applied. Nothing is retried.

use tracing::{debug, error, info};

use crate::error::{Result, SiteError};
use crate::time::{Duration, Instant};

type Step<'a> = Box<dyn FnOnce() -> Result<()> + 'a>;

#[derive(Default)]
pub struct Startup<'a> {
    steps: Vec<(&'static str, Step<'a>)>,
}

#[derive(Debug)]
pub struct StartupReport {
    pub completed: Vec<&'static str>,
    pub failed: Option<(&'static str, SiteError)>,
    pub skipped: Vec<&'static str>,
    pub elapsed: Duration,
}

impl StartupReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_none()
    }
}

impl<'a> Startup<'a> {
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    pub fn step(mut self, name: &'static str, f: impl FnOnce() -> Result<()> + 'a) -> Self {
        self.steps.push((name, Box::new(f)));
        self
    }

    pub fn run(self) -> StartupReport {
        let started = Instant::now();
        let mut report = StartupReport {
            completed: Vec::new(),
            failed: None,
            skipped: Vec::new(),
            elapsed: Duration::ZERO,
        };

        for (name, f) in self.steps {
            if report.failed.is_some() {
                report.skipped.push(name);
                continue;
            }

            let step_started = Instant::now();
            match f() {
                Ok(()) => {
                    debug!(
                        step = name,
                        elapsed_us = step_started.elapsed().as_micros() as u64,
                        "startup step done"
                    );
                    report.completed.push(name);
                }
                Err(e) => {
                    error!(step = name, error = %e, "error initializing website");
                    report.failed = Some((name, e));
                }
            }
        }

        report.elapsed = started.elapsed();
        if report.is_complete() {
            info!(steps = report.completed.len(), "startup complete");
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn runs_every_step_in_order() {
        let log = RefCell::new(Vec::new());
        let report = Startup::new()
            .step("listeners", || {
                log.borrow_mut().push("listeners");
                Ok(())
            })
            .step("lazy_images", || {
                log.borrow_mut().push("lazy_images");
                Ok(())
            })
            .step("scroll", || {
                log.borrow_mut().push("scroll");
                Ok(())
            })
            .run();

        assert!(report.is_complete());
        assert_eq!(*log.borrow(), vec!["listeners", "lazy_images", "scroll"]);
        assert_eq!(report.completed, vec!["listeners", "lazy_images", "scroll"]);
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn failure_keeps_earlier_steps_and_skips_later_ones() {
        let applied = RefCell::new(Vec::new());
        let report = Startup::new()
            .step("listeners", || {
                applied.borrow_mut().push("listeners");
                Ok(())
            })
            .step("lazy_images", || Err(SiteError::js("IntersectionObserver missing")))
            .step("scroll", || {
                applied.borrow_mut().push("scroll");
                Ok(())
            })
            .run();

        assert!(!report.is_complete());
        assert_eq!(*applied.borrow(), vec!["listeners"]);
        assert_eq!(report.completed, vec!["listeners"]);
        assert_eq!(report.skipped, vec!["scroll"]);

        let (name, err) = report.failed.as_ref().unwrap();
        assert_eq!(*name, "lazy_images");
        assert!(err.to_string().contains("IntersectionObserver"));
    }
}
