//! Aggregation engine
//!
//! Folds a tree of diff nodes into one verdict per subtree by taking the
//! maximum severity of a node's own verdict and its children's verdicts. The
//! traversal is guarded by the context's depth limit and by a check for the
//! same node appearing twice on the current path. Node identity is its
//! address together with its kind, since an inline child may share its
//! parent's address.

use crate::compat::changed::Changed;
use crate::compat::error::{DiffError, Result};
use crate::compat::rules::CompatibilityRule;
use crate::compat::types::{DiffResult, OwnChange};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// What the traversal reports for each visited node
struct Visit<'a> {
    kind: &'static str,
    depth: usize,
    breaking: Vec<bool>,
    changes: &'a [OwnChange],
}

/// Aggregate the verdict of `node` and all of its descendants
pub fn overall_verdict<T: Changed + ?Sized>(node: &T) -> Result<DiffResult> {
    let mut path = Vec::new();
    let verdict = fold(node, 1, &mut path, &mut |_| {})?;
    debug!(kind = node.kind(), verdict = %verdict, "aggregated diff tree");
    Ok(verdict)
}

fn fold<T, F>(
    node: &T,
    depth: usize,
    path: &mut Vec<(*const (), &'static str)>,
    visit: &mut F,
) -> Result<DiffResult>
where
    T: Changed + ?Sized,
    F: FnMut(Visit<'_>),
{
    let limit = node.context().max_depth();
    if depth > limit {
        return Err(DiffError::DepthExceeded {
            limit,
            kind: node.kind(),
        });
    }

    let identity = (std::ptr::from_ref(node).cast::<()>(), node.kind());
    if path.contains(&identity) {
        return Err(DiffError::Cycle { kind: node.kind() });
    }
    path.push(identity);

    let changes = node.own_changes();
    let breaking = changes
        .iter()
        .map(|change| change.is_breaking(node.context()))
        .collect();
    visit(Visit {
        kind: node.kind(),
        depth,
        breaking,
        changes: &changes,
    });

    let mut verdict = node.core_verdict();
    for child in node.children() {
        verdict = verdict.combine(fold(child, depth + 1, path, visit)?);
    }

    path.pop();
    trace!(kind = node.kind(), depth, verdict = %verdict, "classified node");
    Ok(verdict)
}

/// One own change found in the tree, with its resolved severity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedChange {
    /// Kind of the node that owns the change
    pub node: &'static str,
    /// Depth of that node, the root being 1
    pub depth: usize,
    pub field: &'static str,
    pub rule: Option<CompatibilityRule>,
    /// Whether the rule was enabled for this run
    pub breaking: bool,
}

/// Serializable summary of a classified diff tree
#[derive(Debug, Clone, Serialize)]
pub struct CompatibilityReport {
    /// Overall verdict of the tree
    pub verdict: DiffResult,
    /// Whether the overall verdict is incompatible
    pub has_breaking_changes: bool,
    /// Every own change in the tree, in depth-first order
    pub changes: Vec<ClassifiedChange>,
    /// Count of changes per rule ID
    pub summary: BTreeMap<String, usize>,
    /// Number of nodes visited
    pub node_count: usize,
}

impl CompatibilityReport {
    /// Classify a tree and collect every change it carries
    pub fn from_tree<T: Changed + ?Sized>(root: &T) -> Result<Self> {
        let mut changes = Vec::new();
        let mut node_count = 0;
        let mut path = Vec::new();

        let verdict = fold(root, 1, &mut path, &mut |visit: Visit<'_>| {
            node_count += 1;
            for (change, breaking) in visit.changes.iter().zip(visit.breaking) {
                changes.push(ClassifiedChange {
                    node: visit.kind,
                    depth: visit.depth,
                    field: change.field,
                    rule: change.rule,
                    breaking,
                });
            }
        })?;

        let mut summary = BTreeMap::new();
        for change in &changes {
            if let Some(rule) = change.rule {
                *summary.entry(rule.id().to_string()).or_insert(0) += 1;
            }
        }

        debug!(
            verdict = %verdict,
            changes = changes.len(),
            nodes = node_count,
            "built compatibility report"
        );
        Ok(Self {
            verdict,
            has_breaking_changes: verdict.is_incompatible(),
            changes,
            summary,
            node_count,
        })
    }

    /// Changes whose rule was enabled
    pub fn breaking_changes(&self) -> impl Iterator<Item = &ClassifiedChange> {
        self.changes.iter().filter(|change| change.breaking)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compat::context::DiffContext;
    use std::sync::Arc;

    #[derive(Debug)]
    struct Chain {
        context: Arc<DiffContext>,
        next: Option<Box<Chain>>,
        changed: bool,
    }

    impl Changed for Chain {
        fn kind(&self) -> &'static str {
            "chain"
        }

        fn context(&self) -> &DiffContext {
            &self.context
        }

        fn own_changes(&self) -> Vec<OwnChange> {
            if self.changed {
                vec![OwnChange::guarded("type", CompatibilityRule::SchemaTypeChanged)]
            } else {
                Vec::new()
            }
        }

        fn children(&self) -> Vec<&dyn Changed> {
            self.next.iter().map(|next| &**next as &dyn Changed).collect()
        }
    }

    fn chain(context: &Arc<DiffContext>, length: usize, changed_at: Option<usize>) -> Chain {
        let mut node = Chain {
            context: Arc::clone(context),
            next: None,
            changed: changed_at == Some(length),
        };
        for position in (1..length).rev() {
            node = Chain {
                context: Arc::clone(context),
                next: Some(Box::new(node)),
                changed: changed_at == Some(position),
            };
        }
        node
    }

    #[derive(Debug)]
    struct SelfLoop {
        context: DiffContext,
    }

    impl Changed for SelfLoop {
        fn kind(&self) -> &'static str {
            "self_loop"
        }

        fn context(&self) -> &DiffContext {
            &self.context
        }

        fn own_changes(&self) -> Vec<OwnChange> {
            Vec::new()
        }

        fn children(&self) -> Vec<&dyn Changed> {
            vec![self as &dyn Changed]
        }
    }

    #[test]
    fn test_deep_change_reaches_root() {
        let context = DiffContext::new().shared();
        let root = chain(&context, 10, Some(10));

        assert_eq!(root.core_verdict(), DiffResult::NoChanges);
        assert_eq!(root.overall_verdict().unwrap(), DiffResult::Incompatible);
    }

    #[test]
    fn test_depth_limit_is_enforced() {
        let context = DiffContext::builder().max_depth(4).build().unwrap().shared();

        assert!(chain(&context, 4, None).overall_verdict().is_ok());
        let err = chain(&context, 5, None).overall_verdict().unwrap_err();
        assert!(matches!(err, DiffError::DepthExceeded { limit: 4, kind: "chain" }));
    }

    #[test]
    fn test_self_reference_is_reported_as_cycle() {
        let node = SelfLoop {
            context: DiffContext::new(),
        };
        let err = node.overall_verdict().unwrap_err();
        assert!(matches!(err, DiffError::Cycle { kind: "self_loop" }));
    }

    #[test]
    fn test_report_collects_changes_with_depth() {
        let context = DiffContext::new().shared();
        let root = chain(&context, 3, Some(2));

        let report = CompatibilityReport::from_tree(&root).unwrap();
        assert_eq!(report.verdict, DiffResult::Incompatible);
        assert!(report.has_breaking_changes);
        assert_eq!(report.node_count, 3);
        assert_eq!(report.changes.len(), 1);
        assert_eq!(report.changes[0].depth, 2);
        assert_eq!(report.summary.get("SCHEMA_TYPE_CHANGED"), Some(&1));
        assert_eq!(report.breaking_changes().count(), 1);
    }
}
