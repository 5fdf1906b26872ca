//! Properties of verdict aggregation over diff trees

use contract_compat::diff::{
    Direction, ExtensionsDiff, MetadataDiff, OAuthFlowDiff, OAuthFlowsDiff, ParameterDiff,
    SchemaDiff, SecuritySchemeDiff,
};
use contract_compat::model::Extensions;
use contract_compat::{Changed, CompatibilityRule, DiffContext, DiffResult, RuleOverride};
use serde_json::json;
use std::sync::Arc;

fn security_tree(context: &Arc<DiffContext>, changed_flow: bool) -> SecuritySchemeDiff {
    let flow = OAuthFlowDiff::builder(None, None, context)
        .token_url(changed_flow)
        .build();
    let flows = OAuthFlowsDiff::builder(None, None, context)
        .authorization_code(Some(flow))
        .build();
    SecuritySchemeDiff::builder("oauth", None, None, context)
        .description(MetadataDiff::compare("description", Some("a"), Some("b"), context))
        .oauth_flows(Some(flows))
        .build()
}

/// Check that a subtree never reports less than its parts
fn assert_monotone(node: &dyn Changed) {
    let overall = node.overall_verdict().unwrap();
    assert!(overall >= node.core_verdict(), "{} below own verdict", node.kind());
    for child in node.children() {
        assert!(
            overall >= child.overall_verdict().unwrap(),
            "{} below child {}",
            node.kind(),
            child.kind()
        );
        assert_monotone(child);
    }
}

#[test]
fn test_aggregation_is_idempotent() {
    let context = DiffContext::new().shared();
    let tree = security_tree(&context, true);
    let snapshot = tree.clone();

    let first = tree.overall_verdict().unwrap();
    let second = tree.overall_verdict().unwrap();

    assert_eq!(first, second);
    assert_eq!(tree, snapshot);
}

#[test]
fn test_aggregation_is_monotone() {
    let context = DiffContext::new().shared();
    assert_monotone(&security_tree(&context, true));
    assert_monotone(&security_tree(&context, false));
}

#[test]
fn test_no_flags_means_no_changes() {
    let context = DiffContext::new().shared();
    let flow = OAuthFlowDiff::builder(None, None, &context).build();
    let schema = SchemaDiff::builder(None, None, Direction::Request, &context).build();
    let parameter = ParameterDiff::builder("id", "path", None, None, &context)
        .schema(Some(schema))
        .build();

    assert_eq!(flow.overall_verdict().unwrap(), DiffResult::NoChanges);
    assert_eq!(parameter.overall_verdict().unwrap(), DiffResult::NoChanges);
}

#[test]
fn test_policy_override_flips_severity() {
    for (value, expected) in [
        (RuleOverride::Breaking, DiffResult::Incompatible),
        (RuleOverride::Default, DiffResult::Incompatible),
        (RuleOverride::Compatible, DiffResult::Compatible),
    ] {
        let context = DiffContext::builder()
            .rule(CompatibilityRule::SchemaDiscriminatorChanged, value)
            .build()
            .unwrap()
            .shared();
        let schema = SchemaDiff::builder(None, None, Direction::Response, &context)
            .discriminator_changed(true)
            .build();

        assert_eq!(schema.overall_verdict().unwrap(), expected, "override {value:?}");
    }
}

#[test]
fn test_absent_child_is_neutral() {
    let context = DiffContext::builder()
        .rule(
            CompatibilityRule::SecuritySchemeOauth2TokenUrlChanged,
            RuleOverride::Compatible,
        )
        .build()
        .unwrap()
        .shared();
    let flow = OAuthFlowDiff::builder(None, None, &context)
        .token_url(true)
        .build();
    let expected = flow.overall_verdict().unwrap();
    assert_eq!(expected, DiffResult::Compatible);

    let flows = OAuthFlowsDiff::builder(None, None, &context)
        .implicit(None)
        .password(None)
        .client_credentials(Some(flow))
        .authorization_code(None)
        .extensions(None)
        .build();

    assert_eq!(flows.children().len(), 1);
    assert_eq!(flows.core_verdict(), DiffResult::NoChanges);
    assert_eq!(flows.overall_verdict().unwrap(), expected);
}

#[test]
fn test_metadata_child_never_lowers_verdict() {
    let context = DiffContext::new().shared();
    for changed_type in [false, true] {
        let plain = SecuritySchemeDiff::builder("oauth", None, None, &context)
            .changed_type(changed_type)
            .build();
        let described = SecuritySchemeDiff::builder("oauth", None, None, &context)
            .changed_type(changed_type)
            .description(MetadataDiff::compare("description", Some("a"), Some("b"), &context))
            .build();

        let before = plain.overall_verdict().unwrap();
        let after = described.overall_verdict().unwrap();
        assert!(after >= before);
        assert_eq!(after, before.combine(DiffResult::Metadata));
    }
}

#[test]
fn test_compatible_child_does_not_raise_breaking_parent() {
    let context = DiffContext::new().shared();
    let old: Extensions = [("x-a".to_string(), json!(1))].into_iter().collect();
    let new: Extensions = [("x-a".to_string(), json!(2))].into_iter().collect();
    let extensions = ExtensionsDiff::compare(&old, &new, &context);

    let flow = OAuthFlowDiff::builder(None, None, &context)
        .authorization_url(true)
        .extensions(extensions)
        .build();

    assert_eq!(flow.children().len(), 1);
    assert_eq!(flow.children()[0].overall_verdict().unwrap(), DiffResult::Compatible);
    assert_eq!(flow.overall_verdict().unwrap(), DiffResult::Incompatible);
}

#[test]
fn test_metadata_only_tree() {
    let context = DiffContext::new().shared();
    let tree = security_tree(&context, false);

    assert_eq!(tree.core_verdict(), DiffResult::NoChanges);
    let verdict = tree.overall_verdict().unwrap();
    assert_eq!(verdict, DiffResult::Metadata);
    assert!(verdict.is_metadata_only());
    assert!(verdict.is_compatible());
    assert!(verdict.is_different());
}

#[test]
fn test_trees_classify_across_threads() {
    let context = DiffContext::new().shared();
    let trees = vec![security_tree(&context, true), security_tree(&context, false)];

    let verdicts: Vec<DiffResult> = std::thread::scope(|scope| {
        let handles: Vec<_> = trees
            .iter()
            .map(|tree| scope.spawn(move || tree.overall_verdict().unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(verdicts, vec![DiffResult::Incompatible, DiffResult::Metadata]);
}
