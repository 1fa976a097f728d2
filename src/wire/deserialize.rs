use super::schema::{FetchResponse, FetchedItem, HEADING_TYPE, WireCondition, WireReference};
use crate::error::LoadError;
use crate::model::{
    Condition, ConditionGroup, ConditionId, Container, FieldNode, FieldType, HeadingNode,
    IdGenerator, MeterRef, Node, NodeId, NodeKind, Operator, ProcedureMeta, SectionNode,
};
use crate::tree::Procedure;
use ahash::{AHashMap, AHashSet};
use itertools::Itertools;
use serde_json::Value;

/// Rebuilds a `Procedure` from the flat lists of a fetch response.
struct Loader<'a> {
    response: &'a FetchResponse,
    procedure: Procedure,
    ids_by_wire: AHashMap<&'a str, NodeId>,
    placements: AHashMap<Container, Vec<NodeId>>,
}

impl<'a> Loader<'a> {
    fn new(response: &'a FetchResponse, ids: IdGenerator) -> Self {
        let mut procedure = Procedure::empty(ids);
        procedure.meta = meta_of(response);
        Self {
            response,
            procedure,
            ids_by_wire: AHashMap::new(),
            placements: AHashMap::new(),
        }
    }

    fn items(&self) -> impl Iterator<Item = (&'a FetchedItem, bool)> + 'a {
        let response = self.response;
        response
            .fields
            .iter()
            .map(|item| (item, item.field_type == HEADING_TYPE))
            .chain(response.headings.iter().map(|item| (item, true)))
    }

    /// Wire ids of items that cannot be placed because their condition uses an
    /// unknown operator, together with everything nested beneath them.
    fn skipped(&self) -> AHashSet<&'a str> {
        let mut skipped: AHashSet<&'a str> = self
            .items()
            .filter(|(item, _)| {
                item.parent_id.is_some()
                    && item
                        .condition
                        .as_ref()
                        .is_some_and(|c| Operator::from_wire(&c.kind).is_none())
            })
            .map(|(item, _)| item.id.as_str())
            .collect();
        loop {
            let before = skipped.len();
            for (item, _) in self.items() {
                if item
                    .parent_id
                    .as_deref()
                    .is_some_and(|parent| skipped.contains(parent))
                {
                    skipped.insert(item.id.as_str());
                }
            }
            if skipped.len() == before {
                break;
            }
        }
        for id in &skipped {
            log::warn!("load: skipping item '{}' with an unknown condition operator", id);
        }
        skipped
    }

    /// Wire UUIDs are kept as-is; anything else gets a fresh identity.
    fn claim(&mut self, wire_id: &'a str) -> Result<NodeId, LoadError> {
        if self.ids_by_wire.contains_key(wire_id) {
            return Err(LoadError::DuplicateWireId(wire_id.to_string()));
        }
        let id = match NodeId::parse(wire_id) {
            Some(id) if !self.procedure.nodes.contains_key(&id) => id,
            _ => self.procedure.fresh_node_id(),
        };
        self.ids_by_wire.insert(wire_id, id);
        Ok(id)
    }

    /// Pass 1: every section, field and heading as a detached node.
    fn build_nodes(&mut self, skipped: &AHashSet<&'a str>) -> Result<(), LoadError> {
        for section in &self.response.sections {
            let id = self.claim(&section.id)?;
            self.store(
                id,
                NodeKind::Section(SectionNode {
                    label: section.section_name.clone(),
                    description: section.section_description.clone(),
                    children: Vec::new(),
                }),
            );
        }

        let items: Vec<_> = self.items().collect();
        for (item, is_heading) in items {
            if skipped.contains(item.id.as_str()) {
                continue;
            }
            let id = self.claim(&item.id)?;
            let kind = if is_heading {
                NodeKind::Heading(HeadingNode {
                    label: item.field_name.clone(),
                })
            } else {
                NodeKind::Field(field_of(item))
            };
            self.store(id, kind);
        }
        Ok(())
    }

    fn store(&mut self, id: NodeId, kind: NodeKind) {
        self.procedure.nodes.insert(
            id,
            Node {
                id,
                parent: Container::Root,
                kind,
            },
        );
    }

    /// Pass 2: resolve every item's container, creating condition groups on
    /// demand. Items are visited in wire order, so each container's list comes
    /// out sorted and groups appear in the order of their first child.
    fn place_items(&mut self, skipped: &AHashSet<&'a str>) -> Result<(), LoadError> {
        let items: Vec<&'a FetchedItem> = self
            .items()
            .map(|(item, _)| item)
            .filter(|item| !skipped.contains(item.id.as_str()))
            .sorted_by_key(|item| item.order)
            .collect();

        for item in items {
            let id = self.ids_by_wire[item.id.as_str()];
            let container = if let Some(parent_wire) = item.parent_id.as_deref() {
                let condition = item
                    .condition
                    .as_ref()
                    .and_then(decode_condition)
                    .ok_or_else(|| LoadError::MissingCondition(item.id.clone()))?;
                let parent = self.resolve_parent(&item.id, parent_wire)?;
                Container::Condition(self.group_for(parent, condition))
            } else if let Some(section_wire) = item.section_id.as_deref() {
                let section = self
                    .ids_by_wire
                    .get(section_wire)
                    .copied()
                    .filter(|id| self.procedure.nodes.get(id).is_some_and(Node::is_section))
                    .ok_or_else(|| LoadError::UnknownSection {
                        item_id: item.id.clone(),
                        section_id: section_wire.to_string(),
                    })?;
                Container::Section(section)
            } else {
                Container::Root
            };

            if let Some(node) = self.procedure.nodes.get_mut(&id) {
                node.parent = container;
            }
            self.placements.entry(container).or_default().push(id);
        }
        Ok(())
    }

    fn resolve_parent(&self, item_id: &str, parent_wire: &str) -> Result<NodeId, LoadError> {
        let parent = self
            .ids_by_wire
            .get(parent_wire)
            .copied()
            .ok_or_else(|| LoadError::UnknownParent {
                item_id: item_id.to_string(),
                parent_id: parent_wire.to_string(),
            })?;
        match self.procedure.nodes.get(&parent) {
            Some(node) if node.as_field().is_some() => Ok(parent),
            _ => Err(LoadError::ParentNotAField {
                item_id: item_id.to_string(),
                parent_id: parent_wire.to_string(),
            }),
        }
    }

    /// The wire format has no group id: children sharing a parent and an
    /// identical rule belong to one group.
    fn group_for(&mut self, field: NodeId, condition: Condition) -> ConditionId {
        let existing = self
            .procedure
            .nodes
            .get(&field)
            .and_then(Node::as_field)
            .and_then(|f| {
                f.conditions.iter().copied().find(|id| {
                    self.procedure
                        .conditions
                        .get(id)
                        .is_some_and(|group| group.condition == condition)
                })
            });
        if let Some(id) = existing {
            return id;
        }

        let id = self.procedure.fresh_condition_id();
        self.procedure.conditions.insert(
            id,
            ConditionGroup {
                id,
                field,
                condition,
                children: Vec::new(),
            },
        );
        if let Some(Node {
            kind: NodeKind::Field(f),
            ..
        }) = self.procedure.nodes.get_mut(&field)
        {
            f.conditions.push(id);
        }
        id
    }

    /// Pass 3: write the child lists, interleaving root sections at their
    /// recorded positions.
    fn assemble(mut self) -> Procedure {
        let mut root = self.placements.remove(&Container::Root).unwrap_or_default();
        let sections = self
            .response
            .sections
            .iter()
            .sorted_by_key(|section| (section.position.unwrap_or(u32::MAX), section.order));
        for section in sections {
            let id = self.ids_by_wire[section.id.as_str()];
            let index = section
                .position
                .map(|position| position.saturating_sub(1) as usize)
                .unwrap_or(root.len())
                .min(root.len());
            root.insert(index, id);
        }
        self.procedure.root = root;

        for (container, children) in self.placements {
            if let Some(list) = self.procedure.children_mut(container) {
                *list = children;
            }
        }
        self.procedure
    }
}

fn meta_of(response: &FetchResponse) -> ProcedureMeta {
    let ids = |refs: &[WireReference]| -> Vec<String> {
        refs.iter().map(|r| r.id.clone()).collect()
    };
    ProcedureMeta {
        title: response.title.clone(),
        description: response.description.clone(),
        visibility: response.visibility,
        asset_ids: ids(&response.assets),
        location_ids: ids(&response.locations),
        team_ids: ids(&response.teams),
        category_ids: ids(&response.categories),
        priority: response.priority.clone(),
    }
}

fn field_of(item: &FetchedItem) -> FieldNode {
    let config = item.config.clone().unwrap_or_default();
    FieldNode {
        label: item.field_name.clone(),
        field_type: FieldType::from_wire(&item.field_type),
        required: item.required,
        description: item.field_description.clone(),
        options: config.options.unwrap_or_default(),
        meter: config.meter_id.map(MeterRef::new),
        conditions: Vec::new(),
    }
}

/// The rule encoded by a wire condition, or `None` for an unknown operator.
pub fn decode_condition(wire: &WireCondition) -> Option<Condition> {
    let operator = Operator::from_wire(&wire.kind)?;
    let mut condition = Condition::new(operator);
    if operator.takes_value() {
        condition.value = wire
            .values
            .as_ref()
            .and_then(|values| values.first().cloned())
            .or_else(|| wire.value.as_ref().and_then(json_text));
        condition.value2 = wire.value2.as_ref().and_then(json_text);
    }
    Some(condition)
}

fn json_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Rebuilds the builder tree from a fetch response.
///
/// Structurally wrong payloads (dangling references, reused ids, nesting the
/// builder cannot represent) fail the whole load.
pub fn deserialize(response: &FetchResponse, ids: IdGenerator) -> Result<Procedure, LoadError> {
    let mut loader = Loader::new(response, ids);
    let skipped = loader.skipped();
    loader.build_nodes(&skipped)?;
    loader.place_items(&skipped)?;
    let procedure = loader.assemble();
    procedure.validate()?;
    log::info!(
        "Loaded procedure '{}' ({} nodes, {} condition groups)",
        procedure.meta.title,
        procedure.len(),
        procedure.condition_count()
    );
    Ok(procedure)
}
