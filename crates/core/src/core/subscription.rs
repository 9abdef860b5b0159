//! Disposable handles for anything a controller registers with the page.

use std::fmt;

/// Runs its disposer exactly once: on [`dispose`](Self::dispose) or on drop.
pub struct Subscription {
    label: &'static str,
    disposer: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(label: &'static str, disposer: impl FnOnce() + 'static) -> Self {
        Self {
            label,
            disposer: Some(Box::new(disposer)),
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn dispose(mut self) {
        self.run();
    }

    fn run(&mut self) {
        if let Some(disposer) = self.disposer.take() {
            disposer();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("label", &self.label)
            .field("live", &self.disposer.is_some())
            .finish()
    }
}

/// The subscriptions one controller owns between `start` and `stop`.
#[derive(Debug, Default)]
pub struct SubscriptionSet {
    items: Vec<Subscription>,
}

impl SubscriptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sub: Subscription) {
        self.items.push(sub);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Dispose in reverse registration order.
    pub fn dispose_all(&mut self) {
        while let Some(sub) = self.items.pop() {
            sub.dispose();
        }
    }
}

impl Extend<Subscription> for SubscriptionSet {
    fn extend<T: IntoIterator<Item = Subscription>>(&mut self, iter: T) {
        self.items.extend(iter);
    }
}

impl Drop for SubscriptionSet {
    fn drop(&mut self) {
        self.dispose_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn disposer_runs_once() {
        let hits = Rc::new(RefCell::new(0));
        let h = hits.clone();
        let sub = Subscription::new("scroll", move || *h.borrow_mut() += 1);
        assert_eq!(sub.label(), "scroll");
        sub.dispose();
        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn drop_disposes() {
        let hits = Rc::new(RefCell::new(0));
        {
            let h = hits.clone();
            let _sub = Subscription::new("click", move || *h.borrow_mut() += 1);
        }
        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn set_disposes_in_reverse_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut set = SubscriptionSet::new();
        for label in ["resize", "visibility", "keydown"] {
            let log = log.clone();
            set.push(Subscription::new(label, move || log.borrow_mut().push(label)));
        }
        assert_eq!(set.len(), 3);

        set.dispose_all();
        assert!(set.is_empty());
        assert_eq!(*log.borrow(), vec!["keydown", "visibility", "resize"]);

        set.dispose_all();
        assert_eq!(log.borrow().len(), 3);
    }
}
