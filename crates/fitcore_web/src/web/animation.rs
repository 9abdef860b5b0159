use std::cell::RefCell;
use std::rc::Rc;

use fitcore::config::SiteConfig;
use fitcore::counter::{parse_target, spawn_counter, CounterAnimation, CounterHandle};
use fitcore::scheduler::Scheduler;
use fitcore::subscription::SubscriptionSet;
use fitcore::timing::FrameThrottle;
use fitcore::{css, reveal, scroll, Result};
use tracing::{debug, info};
use web_sys::{Document, Element, Event, Window};

use super::dom::{self, has_class, query, query_all, set_class, set_style};
use super::events::listen_passive;
use super::observer::{ObserverOptions, OnceObserver};

const STYLE_ELEMENT_ID: &str = "fitcore-reveal-styles";

struct RunningCounter {
    element: Element,
    target: u64,
    handle: CounterHandle,
}

/// Scroll reveal, stat counters and the hero parallax.
pub(super) struct AnimationController {
    config: Rc<SiteConfig>,
    scheduler: Rc<dyn Scheduler>,
    reveal_observer: Option<OnceObserver>,
    counter_observer: Option<OnceObserver>,
    running: Rc<RefCell<Vec<RunningCounter>>>,
    hero_frame: Option<Rc<FrameThrottle>>,
    subscriptions: SubscriptionSet,
    started: bool,
}

impl AnimationController {
    pub(super) fn create(config: Rc<SiteConfig>, scheduler: Rc<dyn Scheduler>) -> Self {
        Self {
            config,
            scheduler,
            reveal_observer: None,
            counter_observer: None,
            running: Rc::new(RefCell::new(Vec::new())),
            hero_frame: None,
            subscriptions: SubscriptionSet::new(),
            started: false,
        }
    }

    pub(super) fn start(&mut self) -> Result<()> {
        if self.started {
            return Ok(());
        }
        let window = dom::window()?;
        let document = dom::document()?;

        if self.config.inject_reveal_styles {
            inject_reveal_styles(&document, &self.config)?;
        }
        self.start_reveal(&document)?;
        self.start_counters(&document)?;
        self.start_hero(&window, &document)?;

        self.started = true;
        info!("animations started");
        Ok(())
    }

    pub(super) fn stop(&mut self) {
        if let Some(obs) = self.reveal_observer.take() {
            debug!(pending = obs.pending(), "reveal observer stopped");
        }
        if let Some(obs) = self.counter_observer.take() {
            debug!(pending = obs.pending(), "counter observer stopped");
        }
        // An interrupted counter jumps to its target; it will not run again.
        for counter in self.running.borrow_mut().drain(..) {
            if !counter.handle.is_finished() {
                counter.handle.cancel();
                counter.element.set_text_content(Some(&counter.target.to_string()));
            }
        }
        if let Some(frame) = self.hero_frame.take() {
            frame.cancel();
        }
        self.subscriptions.dispose_all();
        self.started = false;
    }

    fn start_reveal(&mut self, document: &Document) -> Result<()> {
        let revealed = &self.config.classes.revealed;
        let elements: Vec<Element> = query_all(document, &self.config.selectors.reveal)?
            .into_iter()
            .filter(|el| !has_class(el, revealed))
            .collect();
        if elements.is_empty() {
            return Ok(());
        }

        let config = Rc::clone(&self.config);
        let observer = OnceObserver::new(
            "reveal",
            elements,
            ObserverOptions {
                threshold: self.config.timing.reveal_threshold,
                root_margin: Some(self.config.timing.reveal_root_margin.as_str()),
            },
            move |batch: &[Element]| {
                let delay_attr = &config.attributes.reveal_delay;
                let actions = reveal::plan(batch.iter(), |el| el.get_attribute(delay_attr));
                for action in actions {
                    if let Some(delay) = action.delay_ms {
                        let delay = css::ms(delay);
                        set_style(action.target, "transition-delay", &delay);
                        set_style(action.target, "animation-delay", &delay);
                    }
                    set_class(action.target, &config.classes.revealed, true);
                }
            },
        )?;
        self.reveal_observer = Some(observer);
        Ok(())
    }

    fn start_counters(&mut self, document: &Document) -> Result<()> {
        let done = &self.config.attributes.counter_done;
        let elements: Vec<Element> = query_all(document, &self.config.selectors.counter)?
            .into_iter()
            .filter(|el| !el.has_attribute(done))
            .collect();
        if elements.is_empty() {
            return Ok(());
        }

        let config = Rc::clone(&self.config);
        let scheduler = Rc::clone(&self.scheduler);
        let running = Rc::clone(&self.running);
        let observer = OnceObserver::new(
            "counter",
            elements,
            ObserverOptions {
                threshold: self.config.timing.counter_threshold,
                root_margin: None,
            },
            move |batch: &[Element]| {
                let timing = &config.timing;
                for el in batch {
                    let raw = el.get_attribute(&config.attributes.counter_target);
                    let target = parse_target(raw.as_deref());
                    let _ = el.set_attribute(&config.attributes.counter_done, "");
                    let display = el.clone();
                    let handle = spawn_counter(
                        Rc::clone(&scheduler),
                        CounterAnimation::new(target, timing.counter_steps),
                        timing.counter_tick(),
                        move |value| display.set_text_content(Some(&value.to_string())),
                    );
                    let mut live = running.borrow_mut();
                    live.retain(|c| !c.handle.is_finished());
                    live.push(RunningCounter {
                        element: el.clone(),
                        target,
                        handle,
                    });
                }
            },
        )?;
        self.counter_observer = Some(observer);
        Ok(())
    }

    fn start_hero(&mut self, window: &Window, document: &Document) -> Result<()> {
        let Some(hero) = query(document, &self.config.selectors.hero)? else {
            return Ok(());
        };

        let rate = self.config.timing.hero_parallax_rate;
        let frame = {
            let window = window.clone();
            Rc::new(FrameThrottle::new(Rc::clone(&self.scheduler), move || {
                let offset = scroll::parallax_offset(dom::scroll_y(&window), rate);
                set_style(&hero, "transform", &css::translate_y(offset));
            }))
        };

        let sub = {
            let frame = Rc::clone(&frame);
            listen_passive(window, "scroll", move |_: Event| {
                frame.schedule();
            })?
        };
        self.subscriptions.push(sub);
        self.hero_frame = Some(frame);
        Ok(())
    }
}

fn inject_reveal_styles(document: &Document, config: &SiteConfig) -> Result<()> {
    if document.get_element_by_id(STYLE_ELEMENT_ID).is_some() {
        return Ok(());
    }
    let Some(attribute) = reveal::attribute_of_selector(&config.selectors.reveal) else {
        debug!(
            selector = %config.selectors.reveal,
            "reveal selector is not an attribute; no styles injected"
        );
        return Ok(());
    };
    let Some(head) = document.head() else {
        return Ok(());
    };

    let style = document.create_element("style").map_err(dom::js_err)?;
    style.set_id(STYLE_ELEMENT_ID);
    style.set_text_content(Some(&reveal::stylesheet(attribute, &config.classes.revealed)));
    head.append_child(&style).map_err(dom::js_err)?;
    Ok(())
}
