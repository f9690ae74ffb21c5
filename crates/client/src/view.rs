//! Stale-response guard for views.
//!
//! A view starts each load with [`ViewScope::begin`] and delivers the result
//! through the returned [`ViewTicket`]. Starting another load, or
//! invalidating the scope when the view goes away, makes older tickets
//! refuse their results, so a late response never lands in a view that has
//! moved on.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, Default)]
pub struct ViewScope {
    epoch: Arc<AtomicU64>,
}

#[derive(Debug, Clone)]
pub struct ViewTicket {
    epoch: Arc<AtomicU64>,
    issued: u64,
}

impl ViewScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> ViewTicket {
        let issued = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        ViewTicket {
            epoch: self.epoch.clone(),
            issued,
        }
    }

    /// The view was unmounted or replaced.
    pub fn invalidate(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
    }
}

impl ViewTicket {
    pub fn is_current(&self) -> bool {
        self.epoch.load(Ordering::SeqCst) == self.issued
    }

    /// `Some(value)` if the view still wants it.
    pub fn accept<T>(&self, value: T) -> Option<T> {
        if self.is_current() {
            Some(value)
        } else {
            tracing::debug!(ticket = self.issued, "discarding stale response");
            None
        }
    }
}
