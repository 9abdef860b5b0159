use std::rc::Rc;

use fitcore::config::SiteConfig;
use fitcore::nav::{self, MenuEvent};
use fitcore::scheduler::Scheduler;
use fitcore::subscription::SubscriptionSet;
use fitcore::timing::FrameThrottle;
use fitcore::Result;
use tracing::{debug, info};
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, Event, MouseEvent, Node, ScrollBehavior, ScrollToOptions, Window,
};

use super::dom::{self, query, query_all, set_class};
use super::events::{listen, listen_passive};
use super::menu::MenuView;

struct Elements {
    navbar: Option<Element>,
    menu: Option<MenuView>,
    links: Vec<Element>,
    sections: Vec<Element>,
}

struct Shared {
    window: Window,
    document: Document,
    config: Rc<SiteConfig>,
    elements: Elements,
}

/// Navbar decoration, mobile menu, anchor scrolling and active-link tracking.
pub(super) struct Navigation {
    shared: Option<Rc<Shared>>,
    scheduler: Rc<dyn Scheduler>,
    config: Rc<SiteConfig>,
    subscriptions: SubscriptionSet,
    scroll_frame: Option<Rc<FrameThrottle>>,
}

impl Navigation {
    pub(super) fn create(config: Rc<SiteConfig>, scheduler: Rc<dyn Scheduler>) -> Self {
        Self {
            shared: None,
            scheduler,
            config,
            subscriptions: SubscriptionSet::new(),
            scroll_frame: None,
        }
    }

    pub(super) fn start(&mut self) -> Result<()> {
        if self.shared.is_some() {
            return Ok(());
        }

        let window = dom::window()?;
        let document = dom::document()?;
        let sel = &self.config.selectors;

        let navbar = query(&document, &sel.navbar)?;
        if navbar.is_none() {
            debug!(selector = %sel.navbar, "no navbar; scrolled class disabled");
        }

        let menu = match (
            query(&document, &sel.hamburger)?,
            query(&document, &sel.nav_menu)?,
        ) {
            (Some(h), Some(p)) => Some(MenuView::new(h, p, &self.config.classes.active)),
            _ => None,
        };

        let shared = Rc::new(Shared {
            window,
            document: document.clone(),
            config: Rc::clone(&self.config),
            elements: Elements {
                navbar,
                menu,
                links: query_all(&document, &sel.nav_link)?,
                sections: query_all(&document, &sel.section)?,
            },
        });

        self.start_scroll(&shared)?;
        self.start_menu(&shared)?;
        self.start_links(&shared)?;

        info!(
            links = shared.elements.links.len(),
            sections = shared.elements.sections.len(),
            "navigation started"
        );
        self.shared = Some(shared);
        Ok(())
    }

    pub(super) fn stop(&mut self) {
        self.subscriptions.dispose_all();
        if let Some(frame) = self.scroll_frame.take() {
            frame.cancel();
        }
        self.shared = None;
    }

    fn start_scroll(&mut self, shared: &Rc<Shared>) -> Result<()> {
        let on_frame = {
            let shared = Rc::clone(shared);
            move || shared.on_scroll_frame()
        };
        let frame = Rc::new(FrameThrottle::new(Rc::clone(&self.scheduler), on_frame));

        let sub = {
            let frame = Rc::clone(&frame);
            listen_passive(&shared.window, "scroll", move |_: Event| {
                frame.schedule();
            })?
        };
        self.subscriptions.push(sub);

        // Initial pass for pages restored mid-scroll.
        shared.on_scroll_frame();
        self.scroll_frame = Some(frame);
        Ok(())
    }

    fn start_menu(&mut self, shared: &Rc<Shared>) -> Result<()> {
        let Some(menu) = shared.elements.menu.clone() else {
            debug!("no hamburger/menu pair; mobile menu disabled");
            return Ok(());
        };

        let hamburger_sub = {
            let menu_for_click = menu.clone();
            listen(menu.hamburger(), "click", move |_: Event| {
                menu_for_click.apply(MenuEvent::HamburgerClick);
            })?
        };
        self.subscriptions.push(hamburger_sub);

        for link in &shared.elements.links {
            let menu = menu.clone();
            let sub = listen(link, "click", move |_: Event| {
                menu.apply(MenuEvent::NavLinkClick);
            })?;
            self.subscriptions.push(sub);
        }

        // Without a navbar, the hamburger and panel are the inside.
        let inside_roots: Vec<Node> = match &shared.elements.navbar {
            Some(navbar) => vec![navbar.clone().into()],
            None => vec![menu.hamburger().clone().into(), menu.panel().clone().into()],
        };
        let outside = listen(&shared.document, "click", move |ev: MouseEvent| {
            let inside = ev
                .target()
                .and_then(|t| t.dyn_into::<Node>().ok())
                .is_some_and(|t| inside_roots.iter().any(|root| root.contains(Some(&t))));
            if !inside {
                menu.apply(MenuEvent::OutsideClick);
            }
        })?;
        self.subscriptions.push(outside);
        Ok(())
    }

    fn start_links(&mut self, shared: &Rc<Shared>) -> Result<()> {
        for link in &shared.elements.links {
            let shared_for_link = Rc::clone(shared);
            let link_el = link.clone();
            let sub = listen(link, "click", move |ev: Event| {
                shared_for_link.on_link_click(&link_el, &ev);
            })?;
            self.subscriptions.push(sub);
        }
        Ok(())
    }
}

impl Shared {
    fn on_scroll_frame(&self) {
        let y = dom::scroll_y(&self.window);
        let timing = &self.config.timing;
        let classes = &self.config.classes;

        // Reads first: section offsets.
        let tops: Vec<(String, f64)> = self
            .elements
            .sections
            .iter()
            .map(|s| (s.id(), dom::offset_top(s)))
            .collect();
        let current = nav::active_section(
            tops.iter().map(|(id, top)| (id.as_str(), *top)),
            y,
            timing.section_lookahead_px,
        );

        // Then writes.
        if let Some(navbar) = &self.elements.navbar {
            set_class(
                navbar,
                &classes.scrolled,
                nav::is_scrolled(y, timing.scrolled_threshold_px),
            );
        }
        for link in &self.elements.links {
            let href = link.get_attribute("href").unwrap_or_default();
            let on = current.is_some_and(|id| nav::link_matches(&href, id));
            set_class(link, &classes.active, on);
        }
    }

    fn on_link_click(&self, link: &Element, ev: &Event) {
        let Some(href) = link.get_attribute("href") else {
            return;
        };
        let Some(id) = nav::anchor_target(&href) else {
            return;
        };

        ev.prevent_default();
        let Some(target) = self.document.get_element_by_id(id) else {
            debug!(%id, "anchor target missing");
            return;
        };

        let top = nav::anchor_scroll_top(
            dom::offset_top(&target),
            self.config.timing.anchor_offset_px,
        );
        let opts = ScrollToOptions::new();
        opts.set_top(top);
        opts.set_behavior(ScrollBehavior::Smooth);
        self.window.scroll_to_with_scroll_to_options(&opts);
    }
}
