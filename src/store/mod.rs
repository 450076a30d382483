//! The two application stores and the plumbing they share.
//!
//! [`SessionStore`] owns the signed-in user, [`DomainStore`] owns every
//! writing entity. Both are plain owned structs: consumers hold them
//! directly and register change callbacks through `subscribe`.

mod domain;
mod session;

pub use domain::{DomainChange, DomainStore};
pub use session::{
    validate_credentials, validate_signup, SessionState, SessionStore, DEFAULT_LOGIN_DELAY,
};

use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

/// Subscription handle returned by `subscribe`.
pub type SubscriptionId = u64;

type Listener<E> = Box<dyn FnMut(&E) + Send>;

/// Change listeners for one store.
pub struct Subscribers<E> {
    listeners: Vec<(SubscriptionId, Listener<E>)>,
    next_id: SubscriptionId,
}

impl<E> Default for Subscribers<E> {
    fn default() -> Self {
        Self {
            listeners: Vec::new(),
            next_id: 0,
        }
    }
}

impl<E> Subscribers<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener; it runs synchronously after every change.
    pub fn subscribe(&mut self, listener: impl FnMut(&E) + Send + 'static) -> SubscriptionId {
        let id = self.next_id;
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns false if the id was unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        match self.listeners.iter().position(|(sub, _)| *sub == id) {
            Some(pos) => {
                self.listeners.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn notify(&mut self, event: &E) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(event);
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

/// Wall-clock source for entity timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        if let Ok(mut now) = self.now.lock() {
            *now += by;
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        match self.now.lock() {
            Ok(now) => *now,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}
