use super::schema::{
    HEADING_TYPE, ProcedurePayload, SaveRequest, WireCondition, WireConfig, WireItem, WireSection,
};
use crate::evaluator::parse_number;
use crate::model::{
    Condition, ConditionGroup, FieldNode, HeadingNode, Node, NodeKind, SectionNode,
};
use crate::tree::{Procedure, TreeFold};
use serde_json::Value;

/// Maps stored fields and headings to wire items. Sections yield `None`: at
/// the root they are handled separately, anywhere else they are dropped.
struct WireFold;

impl TreeFold for WireFold {
    type Output = Option<WireItem>;

    fn field(
        &mut self,
        _node: &Node,
        field: &FieldNode,
        branches: Vec<(&ConditionGroup, Vec<Option<WireItem>>)>,
    ) -> Option<WireItem> {
        let mut children = Vec::new();
        for (group, items) in branches {
            let payload = condition_payload(&group.condition);
            for mut item in items.into_iter().flatten() {
                item.condition = Some(payload.clone());
                children.push(item);
            }
        }
        number(&mut children);

        Some(WireItem {
            field_name: field.label.clone(),
            field_type: field.field_type.wire_name(),
            required: field.required,
            order: 0,
            field_description: field.description.clone().filter(|d| !d.is_empty()),
            config: field_config(field),
            children,
            condition: None,
        })
    }

    fn heading(&mut self, _node: &Node, heading: &HeadingNode) -> Option<WireItem> {
        Some(WireItem {
            field_name: heading.label.clone(),
            field_type: HEADING_TYPE.to_string(),
            required: false,
            ..WireItem::default()
        })
    }

    fn section(
        &mut self,
        node: &Node,
        _section: &SectionNode,
        _children: Vec<Option<WireItem>>,
    ) -> Option<WireItem> {
        log::warn!("serialize: dropping nested section {}", node.id);
        None
    }
}

/// Assigns contiguous one-based `order` values by array position.
fn number(items: &mut [WireItem]) {
    for (index, item) in items.iter_mut().enumerate() {
        item.order = index as u32 + 1;
    }
}

fn field_config(field: &FieldNode) -> Option<WireConfig> {
    let config = WireConfig {
        options: Some(field.options.clone()).filter(|options| !options.is_empty()),
        meter_id: field
            .meter
            .as_ref()
            .map(|meter| meter.meter_id.clone())
            .filter(|id| !id.is_empty()),
    };
    if config.is_empty() { None } else { Some(config) }
}

/// The wire form of a condition rule.
pub fn condition_payload(condition: &Condition) -> WireCondition {
    let operator = condition.operator;
    let mut payload = WireCondition {
        kind: operator.wire_name().to_string(),
        ..WireCondition::default()
    };
    if !operator.takes_value() {
        return payload;
    }
    if operator.takes_value_list() {
        payload.values = Some(condition.value.iter().cloned().collect());
    } else {
        payload.value = condition.value.as_deref().map(numeric_value);
        payload.value2 = condition.value2.as_deref().map(numeric_value);
    }
    payload
}

/// Numeric operand text as a JSON number when the number reads back as the
/// same text, otherwise as the text itself.
fn numeric_value(text: &str) -> Value {
    let number = match text.parse::<i64>() {
        Ok(integer) => Some(serde_json::Number::from(integer)),
        Err(_) => parse_number(text).and_then(serde_json::Number::from_f64),
    };
    match number {
        Some(number) if number.to_string() == text => Value::Number(number),
        _ => Value::String(text.to_string()),
    }
}

/// Derives the wire payload from the builder tree.
pub fn serialize(procedure: &Procedure) -> ProcedurePayload {
    let mut folder = WireFold;
    let mut root_fields = Vec::new();
    let mut sections = Vec::new();

    for (index, id) in procedure.root().iter().enumerate() {
        let Some(node) = procedure.find(*id) else {
            continue;
        };
        match &node.kind {
            NodeKind::Section(section) => {
                let mut fields: Vec<WireItem> = section
                    .children
                    .iter()
                    .filter_map(|child| procedure.fold(*child, &mut folder).flatten())
                    .collect();
                number(&mut fields);
                sections.push(WireSection {
                    section_name: section.label.clone(),
                    order: 0,
                    position: index as u32 + 1,
                    section_description: section.description.clone().filter(|d| !d.is_empty()),
                    fields,
                });
            }
            _ => {
                if let Some(item) = procedure.fold(*id, &mut folder).flatten() {
                    root_fields.push(item);
                }
            }
        }
    }

    number(&mut root_fields);
    for (index, section) in sections.iter_mut().enumerate() {
        section.order = index as u32 + 1;
    }

    let meta = &procedure.meta;
    ProcedurePayload {
        title: meta.title.clone(),
        description: meta.description.clone(),
        visibility: meta.visibility,
        asset_ids: meta.asset_ids.clone(),
        location_ids: meta.location_ids.clone(),
        teams_in_charge: meta.team_ids.clone(),
        root_fields,
        sections,
    }
}

impl Procedure {
    /// The wire payload for save and live preview.
    pub fn to_payload(&self) -> ProcedurePayload {
        serialize(self)
    }

    pub fn to_save_request(&self, organization_id: &str) -> SaveRequest {
        SaveRequest {
            organization_id: organization_id.to_string(),
            payload: serialize(self),
        }
    }
}
