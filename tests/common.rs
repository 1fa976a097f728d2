//! Common test utilities for building procedures and answers.
use tenken::prelude::*;

/// Builds the procedure most tests work on.
///
/// ```text
/// 1. [Text Field] Inspector name
/// 2. [Checkbox] Leak found
///    └── if is checked: [Picture/File] Photo of leak *
/// 3. Section: Pump
///    1. [Number] Pressure
///       └── if between 10 and 20: # Pressure notes, [Text Field] Explain
///       └── if higher than 50: [Checkbox] Shut down
///    2. [Multiple Choice] Condition (Good, Poor)
///       └── if is Poor: [Text Field] Describe
/// 4. # Sign-off
/// 5. [Signature] Signature *
/// ```
#[allow(dead_code)]
pub fn sample_procedure() -> Procedure {
    let mut procedure = Procedure::empty(IdGenerator::sequential());
    procedure.meta.title = "Pump inspection".to_string();
    procedure.meta.description = "Weekly walk-down".to_string();
    procedure.meta.asset_ids = vec!["asset-1".to_string()];
    procedure.meta.team_ids = vec!["team-a".to_string(), "team-b".to_string()];

    let drafts = vec![
        NodeDraft::field("Inspector name", FieldType::TextField),
        NodeDraft::field("Leak found", FieldType::Checkbox).with_condition(
            Condition::checked(),
            vec![NodeDraft::field("Photo of leak", FieldType::File).required()],
        ),
        NodeDraft::section("Pump")
            .with_description("Main feed pump")
            .with_children(vec![
                NodeDraft::field("Pressure", FieldType::Number)
                    .with_description("Gauge reading in bar")
                    .with_condition(
                        Condition::between("10", "20"),
                        vec![
                            NodeDraft::heading("Pressure notes"),
                            NodeDraft::field("Explain", FieldType::TextField),
                        ],
                    )
                    .with_condition(
                        Condition::new(Operator::HigherThan).with_value("50"),
                        vec![NodeDraft::field("Shut down", FieldType::Checkbox)],
                    ),
                NodeDraft::field("Condition", FieldType::MultipleChoice)
                    .with_options(["Good", "Poor"])
                    .with_condition(
                        Condition::is("Poor"),
                        vec![NodeDraft::field("Describe", FieldType::TextField)],
                    ),
            ]),
        NodeDraft::heading("Sign-off"),
        NodeDraft::field("Signature", FieldType::Signature).required(),
    ];
    for draft in drafts {
        procedure
            .insert(Container::Root, draft)
            .expect("sample draft should be admissible");
    }
    procedure
}

/// Finds the first node with `label` in display order.
#[allow(dead_code)]
pub fn id_of(procedure: &Procedure, label: &str) -> NodeId {
    let mut found = None;
    procedure.walk(|visit| match visit {
        Visit::Node { node, .. } if node.label() == label => {
            found = Some(node.id);
            Walk::Stop
        }
        _ => Walk::Continue,
    });
    found.unwrap_or_else(|| panic!("no node labelled '{}'", label))
}

/// Labels of the given nodes, in the given order.
#[allow(dead_code)]
pub fn labels(procedure: &Procedure, ids: &[NodeId]) -> Vec<String> {
    ids.iter()
        .map(|id| procedure.find(*id).expect("node exists").label().to_string())
        .collect()
}

/// Labels of the children of `container`.
#[allow(dead_code)]
pub fn child_labels(procedure: &Procedure, container: Container) -> Vec<String> {
    labels(procedure, procedure.children(container).expect("container exists"))
}

/// Every node id reachable from `id`, including `id` itself.
#[allow(dead_code)]
pub fn subtree_ids(procedure: &Procedure, id: NodeId) -> (Vec<NodeId>, Vec<ConditionId>) {
    let mut nodes = Vec::new();
    let mut conditions = Vec::new();
    procedure.walk_subtree(id, |visit| {
        match visit {
            Visit::Node { node, .. } => nodes.push(node.id),
            Visit::Condition { group, .. } => conditions.push(group.id),
        }
        Walk::Continue
    });
    (nodes, conditions)
}
