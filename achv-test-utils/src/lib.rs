//! achv Test Utilities
//!
//! Shared test infrastructure for the achv workspace:
//! - Proptest generators for step trees
//! - Fixtures for common progress trees
//! - Tree walking helpers for assertions

pub use achv_core::{
    Identity, LookupPayload, ParentInfo, ProgressTree, RenderedTree, StepNode,
};

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for generating step trees.

    use super::*;
    use proptest::prelude::*;

    /// Generate an optional step id from a small range so duplicates occur.
    pub fn arb_step_id() -> impl Strategy<Value = Option<u64>> {
        prop::option::weighted(0.8, 1u64..64)
    }

    /// Generate a leaf step.
    pub fn arb_leaf() -> impl Strategy<Value = StepNode> {
        (
            arb_step_id(),
            "[A-Za-z][A-Za-z ]{0,12}",
            any::<bool>(),
            prop::option::of((0u64..20, 0u64..20)),
            prop::option::of("[a-z ]{1,16}"),
        )
            .prop_map(|(id, name, done, progress, description)| {
                let mut node = StepNode::new(id, name, done);
                if let Some((count, total)) = progress {
                    node = node.with_progress(count, total);
                }
                if let Some(description) = description {
                    node = node.with_description(description);
                }
                node
            })
    }

    /// Generate a step with up to four levels of children.
    pub fn arb_step() -> impl Strategy<Value = StepNode> {
        arb_leaf().prop_recursive(4, 48, 4, |inner| {
            (arb_leaf(), prop::collection::vec(inner, 0..4))
                .prop_map(|(node, children)| node.with_children(children))
        })
    }

    /// Generate a forest of top-level steps.
    pub fn arb_steps() -> impl Strategy<Value = Vec<StepNode>> {
        prop::collection::vec(arb_step(), 0..5)
    }

    /// Generate a complete backend response.
    pub fn arb_progress_tree() -> impl Strategy<Value = ProgressTree> {
        (arb_step_id(), "[A-Za-z ]{1,16}", any::<bool>(), arb_steps()).prop_map(
            |(id, name, done, steps)| ProgressTree {
                parent: ParentInfo {
                    id,
                    name,
                    done,
                    ..ParentInfo::default()
                },
                character: "thrall".to_string(),
                server: "area-52".to_string(),
                server_name: Some("Area 52".to_string()),
                steps,
            },
        )
    }

    /// Generate identity parts with mixed case and padding.
    pub fn arb_identity_parts() -> impl Strategy<Value = (String, String, String)> {
        (
            prop::sample::select(vec!["us", "EU", "Kr", "tw"]),
            "[A-Za-z][A-Za-z0-9-]{0,10}",
            "[A-Za-z]{2,12}",
        )
            .prop_map(|(region, realm, character)| {
                (region.to_string(), format!(" {}", realm), character)
            })
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built trees for common scenarios.

    use super::*;
    use serde_json::json;

    /// Identity used throughout the fixtures.
    pub fn identity() -> Identity {
        Identity::new("us", "area-52", "thrall").expect("fixture identity is valid")
    }

    /// `{id:1}` → `{id:2}` → `{id:3}`.
    pub fn chain_steps() -> Vec<StepNode> {
        vec![StepNode::new(Some(1), "One", false).with_children(vec![
            StepNode::new(Some(2), "Two", false)
                .with_children(vec![StepNode::new(Some(3), "Three", false)]),
        ])]
    }

    /// Same chain as [`chain_steps`], with the legacy `criteria` field.
    pub fn chain_steps_as_criteria() -> Vec<StepNode> {
        serde_json::from_value(json!([
            { "id": 1, "name": "One", "criteria": [
                { "id": 2, "name": "Two", "criteria": [
                    { "id": 3, "name": "Three" }
                ] }
            ] }
        ]))
        .expect("fixture json is valid")
    }

    /// Completed meta achievement with one open criterion.
    pub fn done_parent_steps() -> Vec<StepNode> {
        vec![StepNode::new(Some(10), "A", true)
            .with_children(vec![StepNode::new(Some(11), "A1", false)])]
    }

    /// A small mixed tree wrapped in a backend response.
    pub fn sample_tree() -> ProgressTree {
        ProgressTree {
            parent: ParentInfo {
                id: Some(19458),
                name: "A World Awoken".to_string(),
                done: false,
                ..ParentInfo::default()
            },
            character: "thrall".to_string(),
            server: "area-52".to_string(),
            server_name: Some("Area 52".to_string()),
            steps: vec![
                StepNode::new(Some(100), "Explorer", true).with_children(vec![
                    StepNode::new(None, "Waking Shores", false),
                    StepNode::new(None, "Ohn'ahran Plains", true),
                ]),
                StepNode::new(Some(200), "Loremaster", false).with_children(vec![
                    StepNode::new(None, "Quests", false).with_progress(40, 90),
                ]),
                StepNode::new(Some(300), "Glyph Hunter", false),
            ],
        }
    }

    /// Backend error body.
    pub fn not_found_payload() -> LookupPayload {
        LookupPayload::Error(achv_core::ErrorPayload {
            error: "Character not found".to_string(),
        })
    }
}

// ============================================================================
// WALK HELPERS
// ============================================================================

/// Count all nodes in a forest.
pub fn count_nodes(steps: &[StepNode]) -> usize {
    steps.iter().map(|s| 1 + count_nodes(&s.children)).sum()
}

/// Every step in pre-order with the effective-done flag its ancestors imply.
pub fn expected_effective_done(steps: &[StepNode], parent_done: bool) -> Vec<bool> {
    let mut out = Vec::new();
    for step in steps {
        let done = parent_done || step.done;
        out.push(done);
        out.extend(expected_effective_done(&step.children, done));
    }
    out
}

/// Reference pre-order search, used to cross-check the locator.
pub fn preorder_ids(steps: &[StepNode]) -> Vec<Option<u64>> {
    let mut out = Vec::new();
    for step in steps {
        out.push(step.id);
        out.extend(preorder_ids(&step.children));
    }
    out
}

/// Number of bullets in an exported markdown document.
pub fn bullet_count(markdown: &str) -> usize {
    markdown
        .lines()
        .filter(|line| line.trim_start().starts_with("- ["))
        .count()
}
