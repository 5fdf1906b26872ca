//! Descriptive text differences (summary, description)

use crate::compat::changed::Changed;
use crate::compat::context::DiffContext;
use crate::compat::types::{DiffResult, OwnChange};
use std::sync::Arc;

/// A change to a descriptive field; never more severe than `Metadata`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MetadataDiff {
    field: &'static str,
    old: Option<String>,
    new: Option<String>,
    context: Arc<DiffContext>,
}

impl MetadataDiff {
    /// Compare two texts of `field`; `None` when they are equal
    pub fn compare(
        field: &'static str,
        old: Option<&str>,
        new: Option<&str>,
        context: &Arc<DiffContext>,
    ) -> Option<Self> {
        (old != new).then(|| Self {
            field,
            old: old.map(str::to_string),
            new: new.map(str::to_string),
            context: Arc::clone(context),
        })
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn old_text(&self) -> Option<&str> {
        self.old.as_deref()
    }

    pub fn new_text(&self) -> Option<&str> {
        self.new.as_deref()
    }
}

impl Changed for MetadataDiff {
    fn kind(&self) -> &'static str {
        "metadata"
    }

    fn context(&self) -> &DiffContext {
        &self.context
    }

    fn own_changes(&self) -> Vec<OwnChange> {
        if self.old == self.new {
            Vec::new()
        } else {
            vec![OwnChange::unguarded(self.field)]
        }
    }

    fn core_verdict(&self) -> DiffResult {
        if self.old == self.new {
            DiffResult::NoChanges
        } else {
            DiffResult::Metadata
        }
    }
}
