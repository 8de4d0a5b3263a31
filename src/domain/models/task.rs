//! Case task model.
//!
//! A case task is a named, pure transformation of one case's data, tagged
//! with the case event it is submitted under. One task exists per bulk
//! workflow; tasks never perform I/O and never fail.

use std::fmt;
use std::sync::Arc;

use super::case::{CaseData, CaseEvent};

/// Pure `(CaseData) -> CaseData` transform applied during a fan-out.
#[derive(Clone)]
pub struct CaseTask {
    name: &'static str,
    event: CaseEvent,
    transform: Arc<dyn Fn(CaseData) -> CaseData + Send + Sync>,
}

impl CaseTask {
    pub fn new<F>(name: &'static str, event: CaseEvent, transform: F) -> Self
    where
        F: Fn(CaseData) -> CaseData + Send + Sync + 'static,
    {
        Self {
            name,
            event,
            transform: Arc::new(transform),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Case event this task's output is submitted under.
    pub fn event(&self) -> CaseEvent {
        self.event
    }

    /// Apply the transform to one case's data.
    pub fn apply(&self, data: CaseData) -> CaseData {
        (self.transform)(data)
    }
}

impl fmt::Debug for CaseTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaseTask")
            .field("name", &self.name)
            .field("event", &self.event)
            .finish_non_exhaustive()
    }
}
