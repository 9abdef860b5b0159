use fitcore::subscription::Subscription;
use fitcore::Result;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{AddEventListenerOptions, EventTarget};

use super::dom::js_err;

/// Attach `handler` for `kind` on `target`. The listener stays registered until
/// the returned subscription is disposed or dropped.
pub(super) fn listen<E, F>(
    target: &EventTarget,
    kind: &'static str,
    handler: F,
) -> Result<Subscription>
where
    E: JsCast + 'static,
    F: FnMut(E) + 'static,
{
    attach(target, kind, false, handler)
}

/// Like [`listen`], registered as passive (the handler never calls
/// `preventDefault`). Used for scroll so the browser can keep scrolling on the
/// compositor.
pub(super) fn listen_passive<E, F>(
    target: &EventTarget,
    kind: &'static str,
    handler: F,
) -> Result<Subscription>
where
    E: JsCast + 'static,
    F: FnMut(E) + 'static,
{
    attach(target, kind, true, handler)
}

fn attach<E, F>(
    target: &EventTarget,
    kind: &'static str,
    passive: bool,
    mut handler: F,
) -> Result<Subscription>
where
    E: JsCast + 'static,
    F: FnMut(E) + 'static,
{
    let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |ev: web_sys::Event| {
        if let Ok(ev) = ev.dyn_into::<E>() {
            handler(ev);
        }
    });

    if passive {
        let opts = AddEventListenerOptions::new();
        opts.set_passive(true);
        target
            .add_event_listener_with_callback_and_add_event_listener_options(
                kind,
                closure.as_ref().unchecked_ref(),
                &opts,
            )
            .map_err(js_err)?;
    } else {
        target
            .add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())
            .map_err(js_err)?;
    }

    let target = target.clone();
    Ok(Subscription::new(kind, move || {
        let _ = target.remove_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
        drop(closure);
    }))
}
