//! Scroll reveal decisions.

/// What to write on an element that just crossed into view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealAction<K> {
    pub target: K,
    /// Transition delay in milliseconds, if the element asked for one.
    pub delay_ms: Option<u32>,
}

/// Parse a reveal delay attribute. Accepts a plain non-negative integer
/// (`"300"`) or a `ms` suffixed one (`"300ms"`); anything else means no delay.
pub fn parse_delay_ms(raw: Option<&str>) -> Option<u32> {
    let raw = raw?.trim();
    let digits = raw.strip_suffix("ms").unwrap_or(raw).trim();
    if digits.is_empty() {
        return None;
    }
    digits.parse::<u32>().ok()
}

/// Plan the writes for one batch of newly revealed targets. Attribute reads
/// happen through `delay_of` before any write, so a caller can gather the whole
/// plan and then apply it in one pass.
pub fn plan<K, I, F>(revealed: I, mut delay_of: F) -> Vec<RevealAction<K>>
where
    I: IntoIterator<Item = K>,
    F: FnMut(&K) -> Option<String>,
{
    revealed
        .into_iter()
        .map(|target| {
            let delay_ms = parse_delay_ms(delay_of(&target).as_deref());
            RevealAction { target, delay_ms }
        })
        .collect()
}

/// Stylesheet for the four reveal variants, keyed on the `data-aos` value. The
/// revealed state is the `animate` class.
pub fn stylesheet(attribute: &str, revealed_class: &str) -> String {
    const VARIANTS: [(&str, &str, &str); 4] = [
        ("fade-up", "translateY(30px)", "translateY(0)"),
        ("fade-right", "translateX(-30px)", "translateX(0)"),
        ("fade-left", "translateX(30px)", "translateX(0)"),
        ("zoom-in", "scale(0.9)", "scale(1)"),
    ];

    let mut css = String::new();
    for (name, from, to) in VARIANTS {
        css.push_str(&format!(
            "[{attribute}=\"{name}\"] {{ opacity: 0; transform: {from}; transition: all 0.6s ease-out; }}\n\
             [{attribute}=\"{name}\"].{revealed_class} {{ opacity: 1; transform: {to}; }}\n"
        ));
    }
    css
}

/// The attribute name inside a `[name]` / `[name="value"]` selector, used to key
/// the stylesheet on whatever attribute the page uses for reveals.
pub fn attribute_of_selector(selector: &str) -> Option<&str> {
    let inner = selector.trim().strip_prefix('[')?.strip_suffix(']')?;
    let name = inner.split('=').next()?.trim();
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}
