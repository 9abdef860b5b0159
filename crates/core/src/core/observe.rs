//! Observe-once: the shared shape of scroll reveal, counters and lazy images.
//!
//! Each observed target starts `Pending` and moves to `Fired` the first time a
//! sample shows it intersecting at or above the threshold. There is no way back
//! except [`ObserveOnce::restart`], which is only used when a controller is
//! stopped and started again.

use std::hash::Hash;

use hashbrown::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObserveState {
    Pending,
    Fired,
}

/// One entry from an intersection dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionSample<K> {
    pub target: K,
    pub is_intersecting: bool,
    pub ratio: f64,
}

impl<K> IntersectionSample<K> {
    pub fn new(target: K, is_intersecting: bool, ratio: f64) -> Self {
        Self {
            target,
            is_intersecting,
            ratio,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ObserveOnce<K> {
    threshold: f64,
    order: Vec<K>,
    states: HashMap<K, ObserveState>,
}

impl<K> ObserveOnce<K>
where
    K: Eq + Hash + Clone,
{
    /// `threshold` is clamped into `0.0..=1.0`; NaN becomes `0.0`.
    pub fn new(threshold: f64) -> Self {
        let threshold = if threshold.is_nan() {
            0.0
        } else {
            threshold.clamp(0.0, 1.0)
        };
        Self {
            threshold,
            order: Vec::new(),
            states: HashMap::new(),
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Start tracking `target`. Returns `false` if it was already tracked.
    pub fn watch(&mut self, target: K) -> bool {
        if self.states.contains_key(&target) {
            return false;
        }
        self.states.insert(target.clone(), ObserveState::Pending);
        self.order.push(target);
        true
    }

    pub fn state(&self, target: &K) -> Option<ObserveState> {
        self.states.get(target).copied()
    }

    pub fn is_fired(&self, target: &K) -> bool {
        self.state(target) == Some(ObserveState::Fired)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.states
            .values()
            .filter(|s| **s == ObserveState::Pending)
            .count()
    }

    /// Targets still waiting to fire, in watch order.
    pub fn pending(&self) -> impl Iterator<Item = &K> + '_ {
        self.order
            .iter()
            .filter(|k| self.states.get(*k) == Some(&ObserveState::Pending))
    }

    /// Consume one dispatch. The returned iterator is lazy: a target is marked
    /// fired only when the iterator reaches it, in delivery order. Untracked
    /// targets and targets that already fired are skipped.
    pub fn process<I>(&mut self, batch: I) -> Triggered<'_, K, I::IntoIter>
    where
        I: IntoIterator<Item = IntersectionSample<K>>,
    {
        Triggered {
            owner: self,
            batch: batch.into_iter(),
        }
    }

    /// Put every target back into `Pending`.
    pub fn restart(&mut self) {
        for state in self.states.values_mut() {
            *state = ObserveState::Pending;
        }
    }

    /// Stop tracking everything.
    pub fn clear(&mut self) {
        self.order.clear();
        self.states.clear();
    }

    fn qualifies(&self, sample: &IntersectionSample<K>) -> bool {
        sample.is_intersecting && sample.ratio >= self.threshold
    }
}

pub struct Triggered<'a, K, I> {
    owner: &'a mut ObserveOnce<K>,
    batch: I,
}

impl<K, I> Iterator for Triggered<'_, K, I>
where
    K: Eq + Hash + Clone,
    I: Iterator<Item = IntersectionSample<K>>,
{
    type Item = K;

    fn next(&mut self) -> Option<K> {
        for sample in self.batch.by_ref() {
            if !self.owner.qualifies(&sample) {
                continue;
            }
            match self.owner.states.get_mut(&sample.target) {
                Some(state) if *state == ObserveState::Pending => {
                    *state = ObserveState::Fired;
                    return Some(sample.target);
                }
                _ => continue,
            }
        }
        None
    }
}
