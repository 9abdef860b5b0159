//! # fitcore
//!
//! Page behavior for the FitCore gym site, minus the browser.
//!
//! Everything here is plain Rust that runs (and is tested) on the host: timing
//! primitives, the observe-once tracker, and the decisions each controller makes
//! from what it reads off the page. The `fitcore_web` crate feeds these from the
//! real DOM on `wasm32`.
//!
//! ## Feature Flags
//!
//! - `serde` (default): `SiteConfig` (de)serialization and JSON overrides
//!
//! ## Modules
//!
//! - [`scheduler`]: timeouts and animation frames behind one trait, plus a
//!   virtual clock for tests
//! - [`timing`]: debounce, throttle, per-frame coalescing
//! - [`observe`]: one-shot intersection tracking
//! - [`reveal`], [`counter`], [`nav`], [`scroll`], [`lazy`]: controller decisions
//! - [`startup`], [`subscription`]: lifecycle plumbing

#[path = "core/config.rs"]
pub mod config;

#[path = "core/counter.rs"]
pub mod counter;

#[path = "core/css.rs"]
pub mod css;

#[path = "core/error.rs"]
pub mod error;

#[path = "core/lazy.rs"]
pub mod lazy;

#[path = "core/nav.rs"]
pub mod nav;

#[path = "core/observe.rs"]
pub mod observe;

#[path = "core/phone.rs"]
pub mod phone;

#[path = "core/reveal.rs"]
pub mod reveal;

#[path = "core/scheduler.rs"]
pub mod scheduler;

#[path = "core/scroll.rs"]
pub mod scroll;

#[path = "core/startup.rs"]
pub mod startup;

#[path = "core/subscription.rs"]
pub mod subscription;

#[path = "core/time.rs"]
pub mod time;

#[path = "core/timing.rs"]
pub mod timing;

pub use error::{Result, SiteError};

/// Prelude module for convenient imports.
///
/// ```
/// use fitcore::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::SiteConfig;
    pub use crate::counter::{spawn_counter, CounterAnimation, CounterHandle};
    pub use crate::error::{Result, SiteError};
    pub use crate::nav::{MenuEvent, MenuState};
    pub use crate::observe::{IntersectionSample, ObserveOnce};
    pub use crate::phone::format_phone_number;
    pub use crate::scheduler::{ManualScheduler, Scheduler, TimerId};
    pub use crate::startup::{Startup, StartupReport};
    pub use crate::subscription::{Subscription, SubscriptionSet};
    pub use crate::timing::{Debounce, FrameThrottle, Throttle};
}
