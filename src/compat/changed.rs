//! The `Changed` capability shared by every diff node

use crate::compat::context::DiffContext;
use crate::compat::engine;
use crate::compat::error::Result;
use crate::compat::types::{DiffResult, OwnChange, classify};
use std::fmt;

/// A diff node: the comparison result for one sub-structure of a contract.
///
/// Implementors describe their own field-level changes and list their
/// present children; severity and aggregation follow from that.
pub trait Changed: fmt::Debug + Send + Sync {
    /// Stable node kind label, e.g. `oauth_flow`
    fn kind(&self) -> &'static str;

    /// The run context this node was built with
    fn context(&self) -> &DiffContext;

    /// Own changes that occurred, ignoring children
    fn own_changes(&self) -> Vec<OwnChange>;

    /// Verdict over own changes only
    fn core_verdict(&self) -> DiffResult {
        classify(self.context(), &self.own_changes())
    }

    /// Present child nodes; absent optional children are left out
    fn children(&self) -> Vec<&dyn Changed> {
        Vec::new()
    }

    /// Verdict over this node and its whole subtree
    fn overall_verdict(&self) -> Result<DiffResult> {
        engine::overall_verdict(self)
    }
}

/// View an optional child as a trait object
pub fn as_changed<T: Changed>(child: &Option<T>) -> Option<&dyn Changed> {
    child.as_ref().map(|node| node as &dyn Changed)
}

/// Gather present children in declaration order
pub fn present<'a>(
    children: impl IntoIterator<Item = Option<&'a dyn Changed>>,
) -> Vec<&'a dyn Changed> {
    children.into_iter().flatten().collect()
}
