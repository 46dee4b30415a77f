//! Stock implementations of the host seams.

use chrono::{Local, NaiveDate};
use std::cell::RefCell;
use std::collections::HashMap;
use std::convert::Infallible;
use std::rc::Rc;

use crate::{BlobStore, Clock};

/// In-memory store. Clones share the same map, so a test can keep a handle
/// and inspect what a session wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    blobs: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.blobs.borrow().get(key).cloned()
    }

    pub fn insert(&self, key: &str, blob: impl Into<String>) {
        self.blobs.borrow_mut().insert(key.to_string(), blob.into());
    }
}

impl BlobStore for MemoryStore {
    type Error = Infallible;

    fn read(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.get(key))
    }

    fn write(&self, key: &str, blob: &str) -> Result<(), Self::Error> {
        self.insert(key, blob);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        self.blobs.borrow_mut().remove(key);
        Ok(())
    }
}

/// Local wall-clock date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock pinned to one date; tests and scripted runs move it by hand.
#[derive(Debug, Clone)]
pub struct FixedClock {
    date: Rc<RefCell<NaiveDate>>,
}

impl FixedClock {
    #[must_use]
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date: Rc::new(RefCell::new(date)),
        }
    }

    pub fn set(&self, date: NaiveDate) {
        *self.date.borrow_mut() = date;
    }

    /// Move forward one calendar day.
    pub fn advance(&self) {
        let next = self.date.borrow().succ_opt();
        if let Some(next) = next {
            self.set(next);
        }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        *self.date.borrow()
    }
}
