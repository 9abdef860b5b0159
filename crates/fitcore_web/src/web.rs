use std::cell::RefCell;
use std::rc::Rc;

use fitcore::config::{SiteConfig, CONFIG_ISLAND_ID};
use fitcore::scheduler::Scheduler;
use fitcore::{phone, Result};
use tracing::{error, info, warn, Level};
use wasm_bindgen::prelude::*;
use web_sys::Document;

mod animation;
mod dom;
mod events;
mod logging;
mod menu;
mod navigation;
mod observer;
mod ready;
mod scheduler;
mod site;

use animation::AnimationController;
use navigation::Navigation;
use scheduler::BrowserScheduler;
use site::SiteController;

/// Read the JSON config island, if the page ships one. A missing island means
/// defaults; a malformed one is logged and also means defaults.
fn load_config(document: &Document) -> SiteConfig {
    let Some(island) = document.get_element_by_id(CONFIG_ISLAND_ID) else {
        return SiteConfig::default();
    };
    let text = island.text_content().unwrap_or_default();
    if text.trim().is_empty() {
        return SiteConfig::default();
    }
    match SiteConfig::from_json_str(&text) {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!(error = %e, "ignoring config island");
            SiteConfig::default()
        }
    }
}

struct Controllers {
    navigation: Navigation,
    animation: AnimationController,
    site: SiteController,
}

impl Controllers {
    fn create(config: Rc<SiteConfig>, scheduler: &Rc<dyn Scheduler>) -> Self {
        Self {
            navigation: Navigation::create(Rc::clone(&config), Rc::clone(scheduler)),
            animation: AnimationController::create(Rc::clone(&config), Rc::clone(scheduler)),
            site: SiteController::create(config, Rc::clone(scheduler)),
        }
    }
}

/// Composition root. Owns the scheduler and, while started, the three
/// controllers.
struct App {
    scheduler: Rc<dyn Scheduler>,
    explicit_config: Option<SiteConfig>,
    controllers: RefCell<Option<Controllers>>,
}

impl App {
    fn create(explicit_config: Option<SiteConfig>) -> Result<Self> {
        let window = dom::window()?;
        let scheduler: Rc<dyn Scheduler> = Rc::new(BrowserScheduler::new(window));
        Ok(Self {
            scheduler,
            explicit_config,
            controllers: RefCell::new(None),
        })
    }

    fn is_started(&self) -> bool {
        self.controllers.borrow().is_some()
    }

    /// Wait for the DOM, then bring every controller up. One controller
    /// failing does not keep the others from starting.
    async fn start(&self) -> Result<()> {
        let document = dom::document()?;
        ready::dom_ready(&document).await?;
        if self.is_started() {
            return Ok(());
        }

        let config = self
            .explicit_config
            .clone()
            .unwrap_or_else(|| load_config(&document));
        let mut controllers = Controllers::create(Rc::new(config), &self.scheduler);

        if let Err(e) = controllers.navigation.start() {
            error!(error = %e, "navigation failed to start");
        }
        if let Err(e) = controllers.animation.start() {
            error!(error = %e, "animations failed to start");
        }
        let report = controllers.site.start();
        if !report.is_complete() {
            warn!(skipped = report.skipped.len(), "site running with partial startup");
        }

        *self.controllers.borrow_mut() = Some(controllers);
        Ok(())
    }

    fn stop(&self) {
        let Some(mut controllers) = self.controllers.borrow_mut().take() else {
            return;
        };
        controllers.site.stop();
        controllers.animation.stop();
        controllers.navigation.stop();
        info!("site stopped");
    }

    fn scroll_to_top(&self) -> Result<()> {
        site::scroll_to_top()
    }

    fn current_section(&self) -> Result<Option<String>> {
        match self.controllers.borrow().as_ref() {
            Some(c) => c.site.current_section(),
            None => Ok(None),
        }
    }
}

fn max_level() -> Level {
    if cfg!(debug_assertions) {
        Level::DEBUG
    } else {
        Level::INFO
    }
}

/// Page entry point: start once the DOM is ready, stop on `pagehide`, and
/// start again if the page comes back from the back/forward cache.
pub fn start() {
    logging::init(max_level());

    let app = match App::create(None) {
        Ok(app) => app,
        Err(e) => {
            error!(error = %e, "cannot start site");
            return;
        }
    };

    wasm_bindgen_futures::spawn_local(async move {
        let window = match dom::window() {
            Ok(w) => w,
            Err(e) => {
                error!(error = %e, "cannot start site");
                return;
            }
        };
        loop {
            if let Err(e) = app.start().await {
                error!(error = %e, "site failed to start");
                return;
            }
            if ready::page_hide(&window).await.is_err() {
                return;
            }
            app.stop();
            if ready::page_show(&window).await.is_err() {
                return;
            }
        }
    });
}

fn to_js(e: fitcore::SiteError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Handle for pages that drive the lifecycle from script.
#[wasm_bindgen]
pub struct FitcoreSite {
    app: Rc<App>,
}

#[wasm_bindgen]
impl FitcoreSite {
    /// `config_json` overrides the config island when given.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> std::result::Result<FitcoreSite, JsValue> {
        logging::init(max_level());
        let config = config_json
            .as_deref()
            .map(SiteConfig::from_json_str)
            .transpose()
            .map_err(to_js)?;
        let app = App::create(config).map_err(to_js)?;
        Ok(Self { app: Rc::new(app) })
    }

    /// Resolves once every controller has been started.
    pub fn start(&self) -> js_sys::Promise {
        let app = Rc::clone(&self.app);
        wasm_bindgen_futures::future_to_promise(async move {
            app.start().await.map_err(to_js)?;
            Ok(JsValue::UNDEFINED)
        })
    }

    pub fn stop(&self) {
        self.app.stop();
    }

    #[wasm_bindgen(js_name = scrollToTop)]
    pub fn scroll_to_top(&self) -> std::result::Result<(), JsValue> {
        self.app.scroll_to_top().map_err(to_js)
    }

    /// Id of the section in view, or `undefined` before `start` resolves.
    #[wasm_bindgen(js_name = currentSection)]
    pub fn current_section(&self) -> std::result::Result<Option<String>, JsValue> {
        self.app.current_section().map_err(to_js)
    }

    #[wasm_bindgen(js_name = formatPhoneNumber)]
    pub fn format_phone_number(input: &str) -> String {
        phone::format_phone_number(input)
    }
}
