//! # Observable Store
//!
//! A state container that notifies listeners when the slice of state they
//! care about changes.
//!
//! ```text
//! store.update(|s| ...)  →  for each listener:
//!                              next = selector(state)
//!                              if next != last { callback(&next) }
//! ```
//!
//! Listeners pick their slice with a selector. Equality on the selected value
//! suppresses callbacks for updates that didn't touch it, so a row that only
//! reads one conversation isn't woken up by edits to another.
//!
//! Single-threaded: `update` takes `&mut self`, so writes are serialized by
//! the borrow checker. Callbacks must not reach back into the store.

use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener<S> = Box<dyn FnMut(&S)>;

pub struct Store<S> {
    state: S,
    listeners: Vec<(SubscriptionId, Listener<S>)>,
    next_id: u64,
}

impl<S> Store<S> {
    pub fn new(state: S) -> Self {
        Self {
            state,
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    /// Subscribe to a slice of state.
    ///
    /// The selector runs once now to seed the last-seen value, and again after
    /// every `update`. `callback` fires only when the selected value changes.
    pub fn subscribe<T, F, C>(&mut self, selector: F, mut callback: C) -> SubscriptionId
    where
        T: PartialEq + 'static,
        F: Fn(&S) -> T + 'static,
        C: FnMut(&T) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;

        let mut last = selector(&self.state);
        let listener = Box::new(move |state: &S| {
            let next = selector(state);
            if next != last {
                callback(&next);
                last = next;
            }
        });
        self.listeners.push((id, listener));
        debug!("Store subscription {:?} added ({} total)", id, self.listeners.len());
        id
    }

    /// Remove a listener. Returns false if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    /// Mutate the state, then notify listeners whose slice changed.
    pub fn update<R>(&mut self, f: impl FnOnce(&mut S) -> R) -> R {
        let result = f(&mut self.state);
        for (_, listener) in self.listeners.iter_mut() {
            listener(&self.state);
        }
        result
    }
}

impl<S: Default> Default for Store<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}
