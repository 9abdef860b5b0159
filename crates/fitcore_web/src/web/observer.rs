use std::cell::RefCell;
use std::rc::Rc;

use fitcore::observe::{IntersectionSample, ObserveOnce};
use fitcore::Result;
use tracing::debug;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use super::dom::js_err;

pub(super) struct ObserverOptions<'a> {
    pub(super) threshold: f64,
    pub(super) root_margin: Option<&'a str>,
}

struct Shared {
    elements: Vec<Element>,
    once: ObserveOnce<usize>,
}

type OnFire = Box<dyn FnMut(&[Element])>;

/// `IntersectionObserver` that reports each element exactly once.
///
/// Each dispatch is handled in two phases: first every entry is read into a
/// sample (no DOM writes), then `on_fire` receives the whole batch of newly
/// visible elements in delivery order. Fired elements are unobserved.
pub(super) struct OnceObserver {
    observer: IntersectionObserver,
    shared: Rc<RefCell<Shared>>,
    _callback: Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>,
}

impl OnceObserver {
    pub(super) fn new(
        label: &'static str,
        elements: Vec<Element>,
        options: ObserverOptions<'_>,
        on_fire: impl FnMut(&[Element]) + 'static,
    ) -> Result<Self> {
        let mut once = ObserveOnce::new(options.threshold);
        for i in 0..elements.len() {
            once.watch(i);
        }
        let shared = Rc::new(RefCell::new(Shared { elements, once }));

        let mut on_fire: OnFire = Box::new(on_fire);
        let cb_shared = Rc::clone(&shared);
        let callback = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
            move |entries: js_sys::Array, observer: IntersectionObserver| {
                let fired: Vec<Element> = {
                    let mut shared = cb_shared.borrow_mut();
                    let samples: Vec<IntersectionSample<usize>> = entries
                        .iter()
                        .filter_map(|v| v.dyn_into::<IntersectionObserverEntry>().ok())
                        .filter_map(|entry| {
                            let target = entry.target();
                            let index = shared.elements.iter().position(|el| *el == target)?;
                            Some(IntersectionSample::new(
                                index,
                                entry.is_intersecting(),
                                entry.intersection_ratio(),
                            ))
                        })
                        .collect();

                    let Shared { elements, once } = &mut *shared;
                    once.process(samples)
                        .map(|i| elements[i].clone())
                        .collect()
                };

                if fired.is_empty() {
                    return;
                }
                for el in &fired {
                    observer.unobserve(el);
                }
                debug!(observer = label, count = fired.len(), "intersection batch");
                on_fire(&fired);
            },
        );

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(options.threshold));
        if let Some(margin) = options.root_margin {
            init.set_root_margin(margin);
        }

        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
                .map_err(js_err)?;
        for el in shared.borrow().elements.iter() {
            observer.observe(el);
        }

        Ok(Self {
            observer,
            shared,
            _callback: callback,
        })
    }

    pub(super) fn pending(&self) -> usize {
        self.shared.borrow().once.pending_count()
    }

    /// Stop observing. Elements that already fired keep whatever the callback
    /// wrote on them.
    pub(super) fn disconnect(&self) {
        self.observer.disconnect();
    }
}

impl Drop for OnceObserver {
    fn drop(&mut self) {
        self.disconnect();
    }
}
