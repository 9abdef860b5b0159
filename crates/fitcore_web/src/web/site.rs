use std::cell::RefCell;
use std::rc::Rc;

use fitcore::config::SiteConfig;
use fitcore::lazy::{preloads_to_add, source_to_assign};
use fitcore::nav::{self, MenuEvent};
use fitcore::scheduler::Scheduler;
use fitcore::scroll::{self, KeyAction, PlayState};
use fitcore::startup::{Startup, StartupReport};
use fitcore::subscription::SubscriptionSet;
use fitcore::timing::{Debounce, FrameThrottle};
use fitcore::{css, Result};
use tracing::{debug, info};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, KeyboardEvent, ScrollBehavior, ScrollToOptions, Window};

use super::dom::{self, query, query_all, set_class, set_style};
use super::events::{listen, listen_passive};
use super::menu::MenuView;
use super::observer::{ObserverOptions, OnceObserver};

#[derive(Default)]
struct Running {
    subscriptions: SubscriptionSet,
    lazy_images: Option<OnceObserver>,
    resize: Option<Rc<Debounce<()>>>,
    scroll_frame: Option<Rc<FrameThrottle>>,
}

/// Page-wide behavior: lazy images, resize/visibility/keyboard handling, the
/// scroll progress bar and parallax layers.
pub(super) struct SiteController {
    config: Rc<SiteConfig>,
    scheduler: Rc<dyn Scheduler>,
    running: RefCell<Running>,
}

impl SiteController {
    pub(super) fn create(config: Rc<SiteConfig>, scheduler: Rc<dyn Scheduler>) -> Self {
        Self {
            config,
            scheduler,
            running: RefCell::new(Running::default()),
        }
    }

    /// Run the startup sequence. Call after the DOM is ready. A failing step is
    /// logged and ends the sequence; earlier steps stay in effect.
    pub(super) fn start(&self) -> StartupReport {
        Startup::new()
            .step("listeners", || self.register_listeners())
            .step("lazy_images", || self.setup_lazy_loading())
            .step("performance", || self.setup_performance())
            .step("loaded", || self.mark_loaded())
            .run()
    }

    pub(super) fn stop(&self) {
        let mut running = self.running.borrow_mut();
        running.subscriptions.dispose_all();
        if let Some(debounce) = running.resize.take() {
            debounce.cancel();
        }
        if let Some(frame) = running.scroll_frame.take() {
            frame.cancel();
        }
        running.lazy_images = None;
    }

    /// Id of the section the reader is currently in, using the same rule as the
    /// active nav link.
    pub(super) fn current_section(&self) -> Result<Option<String>> {
        let window = dom::window()?;
        let document = dom::document()?;
        let sections = query_all(&document, &self.config.selectors.section)?;
        let tops: Vec<(String, f64)> = sections
            .iter()
            .map(|s| (s.id(), dom::offset_top(s)))
            .collect();
        let current = nav::active_section(
            tops.iter().map(|(id, top)| (id.as_str(), *top)),
            dom::scroll_y(&window),
            self.config.timing.section_lookahead_px,
        );
        Ok(current.map(str::to_string))
    }

    fn register_listeners(&self) -> Result<()> {
        let window = dom::window()?;
        let document = dom::document()?;
        let mut running = self.running.borrow_mut();

        let resize = {
            let config = Rc::clone(&self.config);
            Rc::new(Debounce::new(
                Rc::clone(&self.scheduler),
                self.config.timing.resize_debounce(),
                move |_: ()| handle_resize(&config),
            ))
        };
        {
            let resize = Rc::clone(&resize);
            running
                .subscriptions
                .push(listen(&window, "resize", move |_: Event| resize.call(()))?);
        }
        running.resize = Some(resize);

        {
            let doc = document.clone();
            running
                .subscriptions
                .push(listen(&document, "visibilitychange", move |_: Event| {
                    let state = PlayState::for_hidden(doc.hidden());
                    if let Some(body) = doc.body() {
                        let _ = body.style().set_property("animation-play-state", state.as_css());
                    }
                    debug!(state = state.as_css(), "visibility changed");
                })?);
        }

        {
            let doc = document.clone();
            let config = Rc::clone(&self.config);
            let menu = menu_view(&document, &config)?;
            running
                .subscriptions
                .push(listen(&document, "keydown", move |ev: KeyboardEvent| {
                    match KeyAction::from_key(&ev.key()) {
                        Some(KeyAction::CloseMenu) => {
                            if let Some(menu) = &menu {
                                menu.apply(MenuEvent::Escape);
                            }
                        }
                        Some(KeyAction::EnterKeyboardNavigation) => {
                            if let Some(body) = doc.body() {
                                set_class(&body, &config.classes.keyboard_navigation, true);
                            }
                        }
                        None => {}
                    }
                })?);
        }

        if self.config.reset_keyboard_mode_on_pointer {
            let doc = document.clone();
            let class = self.config.classes.keyboard_navigation.clone();
            running
                .subscriptions
                .push(listen(&document, "mousedown", move |_: Event| {
                    if let Some(body) = doc.body() {
                        set_class(&body, &class, false);
                    }
                })?);
        }

        Ok(())
    }

    fn setup_lazy_loading(&self) -> Result<()> {
        let document = dom::document()?;
        let images = query_all(&document, &self.config.selectors.lazy_image)?;
        if images.is_empty() {
            return Ok(());
        }
        let count = images.len();

        let config = Rc::clone(&self.config);
        let observer = OnceObserver::new(
            "lazy_images",
            images,
            ObserverOptions {
                threshold: self.config.timing.lazy_threshold,
                root_margin: None,
            },
            move |batch: &[Element]| {
                // Gather every assignment before touching `src`.
                let plan: Vec<(&Element, Option<String>)> = batch
                    .iter()
                    .map(|img| {
                        let current = img.get_attribute("src");
                        let fallback = img.get_attribute(&config.attributes.lazy_src);
                        (img, source_to_assign(current.as_deref(), fallback.as_deref()))
                    })
                    .collect();

                for (img, src) in plan {
                    if let Some(src) = src {
                        let _ = img.set_attribute("src", &src);
                    }
                    set_class(img, &config.classes.loaded, true);
                }
            },
        )?;

        debug!(images = count, "lazy loading armed");
        self.running.borrow_mut().lazy_images = Some(observer);
        Ok(())
    }

    fn setup_performance(&self) -> Result<()> {
        let window = dom::window()?;
        let document = dom::document()?;

        preload_critical_images(&document, &self.config.preload_images)?;

        let indicator = query(&document, &self.config.selectors.scroll_indicator)?;
        let layers: Vec<(Element, f64)> =
            query_all(&document, &self.config.selectors.parallax)?
                .into_iter()
                .map(|el| {
                    let raw = el.get_attribute(&self.config.attributes.parallax_speed);
                    let speed = scroll::parse_parallax_speed(
                        raw.as_deref(),
                        self.config.timing.default_parallax_speed,
                    );
                    (el, speed)
                })
                .collect();

        if indicator.is_none() && layers.is_empty() {
            debug!("no scroll indicator or parallax layers");
            return Ok(());
        }

        let frame = {
            let window = window.clone();
            let document = document.clone();
            Rc::new(FrameThrottle::new(Rc::clone(&self.scheduler), move || {
                on_scroll_frame(&window, &document, indicator.as_ref(), &layers);
            }))
        };

        let mut running = self.running.borrow_mut();
        {
            let frame = Rc::clone(&frame);
            running
                .subscriptions
                .push(listen_passive(&window, "scroll", move |_: Event| {
                    frame.schedule();
                })?);
        }
        running.scroll_frame = Some(frame);
        Ok(())
    }

    fn mark_loaded(&self) -> Result<()> {
        let document = dom::document()?;
        if let Some(body) = document.body() {
            set_class(&body, &self.config.classes.loaded, true);
        }
        info!("FitCore Gym website loaded");
        Ok(())
    }
}

/// Smooth-scroll back to the top of the page.
pub(super) fn scroll_to_top() -> Result<()> {
    let opts = ScrollToOptions::new();
    opts.set_top(0.0);
    opts.set_behavior(ScrollBehavior::Smooth);
    dom::window()?.scroll_to_with_scroll_to_options(&opts);
    Ok(())
}

fn menu_view(document: &Document, config: &SiteConfig) -> Result<Option<MenuView>> {
    let hamburger = query(document, &config.selectors.hamburger)?;
    let panel = query(document, &config.selectors.nav_menu)?;
    Ok(match (hamburger, panel) {
        (Some(h), Some(p)) => Some(MenuView::new(h, p, &config.classes.active)),
        _ => None,
    })
}

fn handle_resize(config: &SiteConfig) {
    let (Ok(window), Ok(document)) = (dom::window(), dom::document()) else {
        return;
    };
    let width = dom::viewport_width(&window);
    if !scroll::should_unstick_stats(width, config.timing.stats_breakpoint_px) {
        return;
    }
    if let Ok(Some(stats)) = query(&document, &config.selectors.stats_panel) {
        set_style(&stats, "position", "static");
        set_style(&stats, "transform", "none");
        debug!(width, "stats panel unstuck");
    }
}

fn on_scroll_frame(
    window: &Window,
    document: &Document,
    indicator: Option<&Element>,
    layers: &[(Element, f64)],
) {
    let y = dom::scroll_y(window);
    let progress = scroll::scroll_progress_percent(
        y,
        dom::document_height(document),
        dom::viewport_height(window),
    );

    if let Some(indicator) = indicator {
        set_style(indicator, "width", &css::percent(progress));
    }
    for (el, speed) in layers {
        set_style(el, "transform", &css::translate_y(scroll::parallax_offset(y, *speed)));
    }
}

fn preload_critical_images(document: &Document, urls: &[String]) -> Result<()> {
    let Some(head) = document.head() else {
        return Ok(());
    };
    let list = head
        .query_selector_all("link[rel='preload']")
        .map_err(dom::js_err)?;
    let existing: Vec<String> = (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|n| n.dyn_into::<Element>().ok())
        .filter_map(|link| link.get_attribute("href"))
        .collect();

    for url in preloads_to_add(urls, &existing) {
        let link = document.create_element("link").map_err(dom::js_err)?;
        link.set_attribute("rel", "preload").map_err(dom::js_err)?;
        link.set_attribute("as", "image").map_err(dom::js_err)?;
        link.set_attribute("href", url).map_err(dom::js_err)?;
        head.append_child(&link).map_err(dom::js_err)?;
    }
    Ok(())
}
