/// The `src` to assign when an image first scrolls into view, if any.
///
/// An image that already has a live source keeps it. Otherwise the fallback
/// attribute is used when it is present and non-blank. `None` means leave `src`
/// untouched (the image is still marked loaded).
pub fn source_to_assign(current_src: Option<&str>, fallback: Option<&str>) -> Option<String> {
    let has_src = current_src.is_some_and(|s| !s.trim().is_empty());
    if has_src {
        return None;
    }
    fallback
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Preload URLs that still need a `<link rel=preload>`: blanks, duplicates and
/// anything already in `existing` are dropped. Order is kept.
pub fn preloads_to_add<'a, E>(wanted: &'a [String], existing: E) -> Vec<&'a str>
where
    E: IntoIterator,
    E::Item: AsRef<str>,
{
    let existing: Vec<E::Item> = existing.into_iter().collect();
    let mut out: Vec<&str> = Vec::new();
    for url in wanted.iter().map(|u| u.trim()) {
        if url.is_empty() || out.contains(&url) {
            continue;
        }
        if existing.iter().any(|e| e.as_ref() == url) {
            continue;
        }
        out.push(url);
    }
    out
}
