use fitcore::Result;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{AddEventListenerOptions, Document, EventTarget, Window};

use super::dom::js_err;

/// Resolves once the DOM is parsed. Resolves immediately if it already is.
pub(super) async fn dom_ready(doc: &Document) -> Result<()> {
    if doc.ready_state() != "loading" {
        return Ok(());
    }
    next_event(doc, "DOMContentLoaded").await
}

/// Resolves when the page is being hidden for navigation.
pub(super) async fn page_hide(win: &Window) -> Result<()> {
    next_event(win, "pagehide").await
}

/// Resolves when the page is shown again (including restores from the
/// back/forward cache).
pub(super) async fn page_show(win: &Window) -> Result<()> {
    next_event(win, "pageshow").await
}

/// One-shot latch on the next `kind` event from `target`.
async fn next_event(target: &EventTarget, kind: &str) -> Result<()> {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        let opts = AddEventListenerOptions::new();
        opts.set_once(true);
        let on_event = Closure::once_into_js(move || {
            let _ = resolve.call0(&JsValue::NULL);
        });
        let _ = target.add_event_listener_with_callback_and_add_event_listener_options(
            kind,
            on_event.unchecked_ref(),
            &opts,
        );
    });

    JsFuture::from(promise).await.map_err(js_err)?;
    Ok(())
}
