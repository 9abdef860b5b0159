use fitcore::{Result, SiteError};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, Window};

pub(super) fn js_err(value: JsValue) -> SiteError {
    let message = value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
        })
        .unwrap_or_else(|| format!("{value:?}"));
    SiteError::js(message)
}

pub(super) fn window() -> Result<Window> {
    web_sys::window().ok_or(SiteError::MissingWindow)
}

pub(super) fn document() -> Result<Document> {
    window()?.document().ok_or(SiteError::MissingDocument)
}

/// First match, or `None` for no match. A malformed selector is reported.
pub(super) fn query(doc: &Document, selector: &str) -> Result<Option<Element>> {
    doc.query_selector(selector)
        .map_err(|_| SiteError::InvalidSelector {
            selector: selector.to_string(),
        })
}

/// All matches in document order.
pub(super) fn query_all(doc: &Document, selector: &str) -> Result<Vec<Element>> {
    let list = doc
        .query_selector_all(selector)
        .map_err(|_| SiteError::InvalidSelector {
            selector: selector.to_string(),
        })?;

    let mut out = Vec::with_capacity(list.length() as usize);
    for i in 0..list.length() {
        if let Some(el) = list.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
            out.push(el);
        }
    }
    Ok(out)
}

pub(super) fn as_html(el: &Element) -> Option<&HtmlElement> {
    el.dyn_ref::<HtmlElement>()
}

pub(super) fn set_style(el: &Element, property: &str, value: &str) {
    if let Some(html) = as_html(el) {
        let _ = html.style().set_property(property, value);
    }
}

pub(super) fn set_class(el: &Element, class: &str, on: bool) {
    let list = el.class_list();
    let _ = if on {
        list.add_1(class)
    } else {
        list.remove_1(class)
    };
}

pub(super) fn has_class(el: &Element, class: &str) -> bool {
    el.class_list().contains(class)
}

pub(super) fn offset_top(el: &Element) -> f64 {
    as_html(el).map(|h| f64::from(h.offset_top())).unwrap_or(0.0)
}

pub(super) fn scroll_y(win: &Window) -> f64 {
    win.scroll_y().unwrap_or(0.0)
}

pub(super) fn viewport_height(win: &Window) -> f64 {
    win.inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0)
}

pub(super) fn viewport_width(win: &Window) -> f64 {
    win.inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0)
}

pub(super) fn document_height(doc: &Document) -> f64 {
    doc.document_element()
        .map(|el| f64::from(el.scroll_height()))
        .unwrap_or(0.0)
}
