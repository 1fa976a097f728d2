//! Tests for the serializer, the deserializer and the backend round trip.
mod common;
use common::{id_of, sample_procedure};
use serde_json::json;
use tenken::error::{LoadError, ValidationError};
use tenken::model::wire_operator_name;
use tenken::prelude::*;
use tenken::wire::{WireItem, condition_payload, deserialize, flatten};

fn assert_contiguous(items: &[WireItem]) {
    for (index, item) in items.iter().enumerate() {
        assert_eq!(item.order as usize, index + 1, "order of '{}'", item.field_name);
        assert_contiguous(&item.children);
    }
}

fn reload(procedure: &Procedure) -> Procedure {
    let response = flatten(&procedure.to_save_request("org-1"), "proc-1");
    deserialize(&response, IdGenerator::sequential()).expect("round trip should load")
}

fn fetch(value: serde_json::Value) -> FetchResponse {
    FetchResponse::from_json(&value.to_string()).expect("valid fetch JSON")
}

#[test]
fn test_serialize_splits_root_fields_and_sections() {
    let payload = sample_procedure().to_payload();
    let root: Vec<&str> = payload
        .root_fields
        .iter()
        .map(|item| item.field_name.as_str())
        .collect();
    assert_eq!(root, vec!["Inspector name", "Leak found", "Sign-off", "Signature"]);

    assert_eq!(payload.sections.len(), 1);
    let pump = &payload.sections[0];
    assert_eq!(pump.section_name, "Pump");
    assert_eq!(pump.order, 1);
    assert_eq!(pump.position, 3);
    assert_eq!(pump.section_description.as_deref(), Some("Main feed pump"));
    assert_eq!(pump.fields.len(), 2);

    assert_eq!(payload.title, "Pump inspection");
    assert_eq!(payload.teams_in_charge, vec!["team-a", "team-b"]);
}

#[test]
fn test_serialize_orders_are_contiguous() {
    let payload = sample_procedure().to_payload();
    assert_contiguous(&payload.root_fields);
    for (index, section) in payload.sections.iter().enumerate() {
        assert_eq!(section.order as usize, index + 1);
        assert_contiguous(&section.fields);
    }
}

#[test]
fn test_condition_children_carry_their_rule() {
    let payload = sample_procedure().to_payload();
    let pressure = &payload.sections[0].fields[0];
    assert_eq!(pressure.field_type, "number_field");
    assert_eq!(pressure.field_description.as_deref(), Some("Gauge reading in bar"));

    let names: Vec<&str> = pressure
        .children
        .iter()
        .map(|child| child.field_name.as_str())
        .collect();
    assert_eq!(names, vec!["Pressure notes", "Explain", "Shut down"]);

    let first = pressure.children[0].condition.as_ref().unwrap();
    assert_eq!(first.kind, "between");
    assert_eq!(first.value, Some(json!(10)));
    assert_eq!(first.value2, Some(json!(20)));
    assert_eq!(pressure.children[2].condition.as_ref().unwrap().kind, "higher_than");

    let heading = &pressure.children[0];
    assert!(heading.is_heading());
    assert!(!heading.required);
}

#[test]
fn test_field_config_only_when_present() {
    let payload = sample_procedure().to_payload();
    let condition = &payload.sections[0].fields[1];
    let config = condition.config.as_ref().unwrap();
    assert_eq!(config.options, Some(vec!["Good".to_string(), "Poor".to_string()]));
    assert_eq!(config.meter_id, None);
    assert!(payload.root_fields[0].config.is_none());

    let mut procedure = Procedure::empty(IdGenerator::sequential());
    procedure.insert(
        Container::Root,
        NodeDraft::field("Hours", FieldType::MeterReading).with_meter(MeterRef {
            meter_id: "meter-9".to_string(),
            unit: Some("h".to_string()),
        }),
    );
    let item = &procedure.to_payload().root_fields[0];
    let value = serde_json::to_value(item).unwrap();
    assert_eq!(value["config"], json!({ "meterId": "meter-9" }));
}

#[test]
fn test_condition_payload_shapes() {
    let is = condition_payload(&Condition::is("Poor"));
    assert_eq!(is.kind, "one_of");
    assert_eq!(is.values, Some(vec!["Poor".to_string()]));
    assert_eq!(is.value, None);

    let missing = condition_payload(&Condition::new(Operator::DoesNotContain).with_value("Hoses"));
    assert_eq!(missing.kind, "does_not_contain");
    assert_eq!(missing.values, Some(vec!["Hoses".to_string()]));

    let checked = condition_payload(&Condition::checked());
    assert_eq!(checked.kind, "is_checked");
    assert_eq!(serde_json::to_value(&checked).unwrap(), json!({ "type": "is_checked" }));

    let decimal = condition_payload(&Condition::new(Operator::LowerThan).with_value("2.5"));
    assert_eq!(decimal.value, Some(json!(2.5)));
    let text = condition_payload(&Condition::new(Operator::EqualTo).with_value("abc"));
    assert_eq!(text.value, Some(json!("abc")));
}

#[test]
fn test_operator_and_type_names() {
    assert_eq!(wire_operator_name("is"), "one_of");
    assert_eq!(wire_operator_name("is not"), "not_one_of");
    assert_eq!(wire_operator_name("does not contain"), "does_not_contain");
    assert_eq!(wire_operator_name("roughly"), "unknown");

    assert_eq!(FieldType::from_label("Amount ($)").wire_name(), "amount_field");
    assert_eq!(FieldType::from_label("Yes, No, N/A").wire_name(), "yes_no_na");
    assert_eq!(FieldType::from_label("Barcode Scan").wire_name(), "barcode scan");
    assert_eq!(FieldType::from_wire("signature_block"), FieldType::Signature);
}

#[test]
fn test_save_request_json_shape() {
    let request = sample_procedure().to_save_request("org-7");
    let value = serde_json::to_value(&request).unwrap();
    assert_eq!(value["organizationId"], "org-7");
    assert_eq!(value["visibility"], "private");
    assert_eq!(value["assetIds"], json!(["asset-1"]));
    assert_eq!(value["rootFields"][0]["fieldName"], "Inspector name");
    assert_eq!(value["rootFields"][0]["fieldType"], "text_field");
    assert!(value["rootFields"][0].get("children").is_none());
    assert!(value["rootFields"][0].get("condition").is_none());
    assert_eq!(value["sections"][0]["sectionName"], "Pump");
}

#[test]
fn test_round_trip_preserves_tree() {
    let original = sample_procedure();
    let loaded = reload(&original);

    assert_eq!(loaded.to_drafts(), original.to_drafts());
    assert_eq!(loaded.meta.title, original.meta.title);
    assert_eq!(loaded.meta.description, original.meta.description);
    assert_eq!(loaded.meta.asset_ids, original.meta.asset_ids);
    assert_eq!(loaded.meta.team_ids, original.meta.team_ids);
    assert!(loaded.validate().is_ok());
}

#[test]
fn test_round_trip_keeps_sections_between_root_fields() {
    let mut procedure = Procedure::empty(IdGenerator::sequential());
    procedure.meta.title = "Layout".to_string();
    for draft in [
        NodeDraft::section("First"),
        NodeDraft::field("A", FieldType::Date),
        NodeDraft::section("Second").with_children(vec![NodeDraft::heading("Inside")]),
        NodeDraft::field("B", FieldType::Number),
        NodeDraft::field("C", FieldType::Signature),
        NodeDraft::section("Third"),
    ] {
        procedure.insert(Container::Root, draft).unwrap();
    }
    let loaded = reload(&procedure);
    assert_eq!(loaded.to_drafts(), procedure.to_drafts());
}

#[test]
fn test_round_trip_after_edits() {
    let mut procedure = sample_procedure();
    let pump = id_of(&procedure, "Pump");
    procedure.duplicate(pump);
    procedure.reorder_sections(1, 0);
    procedure.move_node(
        id_of(&procedure, "Inspector name"),
        DropTarget::Node(id_of(&procedure, "Signature")),
    );
    let loaded = reload(&procedure);
    assert_eq!(loaded.to_drafts(), procedure.to_drafts());
}

#[test]
fn test_round_trip_keeps_operand_text() {
    let mut procedure = Procedure::empty(IdGenerator::sequential());
    procedure.meta.title = "Operands".to_string();
    let reading = NodeDraft::field("Reading", FieldType::Number)
        .with_condition(
            Condition::between("10.50", "20"),
            vec![NodeDraft::field("Note", FieldType::TextField)],
        )
        .with_condition(
            Condition::new(Operator::HigherThan).with_value("1e3"),
            vec![NodeDraft::field("Escalate", FieldType::Checkbox)],
        )
        .with_condition(
            Condition::new(Operator::LowerThan).with_value("2.5"),
            vec![NodeDraft::heading("Low")],
        );
    procedure.insert(Container::Root, reading).unwrap();

    let response = flatten(&procedure.to_save_request("org-1"), "proc-1");
    let json = serde_json::to_string(&response).unwrap();
    let response = FetchResponse::from_json(&json).unwrap();
    let loaded = Procedure::load(response, IdGenerator::sequential()).unwrap();
    assert_eq!(loaded.to_drafts(), procedure.to_drafts());

    let low = condition_payload(&Condition::new(Operator::LowerThan).with_value("2.5"));
    assert_eq!(low.value, Some(json!(2.5)));
    let padded = condition_payload(&Condition::between("10.50", " 20"));
    assert_eq!(padded.value, Some(json!("10.50")));
    assert_eq!(padded.value2, Some(json!(" 20")));
}

#[test]
fn test_round_trip_with_blank_descriptions() {
    let mut procedure = Procedure::empty(IdGenerator::sequential());
    procedure.meta.title = "Blanks".to_string();
    let section = NodeDraft::section("Area")
        .with_description("")
        .with_children(vec![
            NodeDraft::field("Reading", FieldType::Number).with_description(""),
        ]);
    let area = procedure.insert(Container::Root, section).unwrap();
    let reading = id_of(&procedure, "Reading");
    assert_eq!(procedure.find(area).unwrap().as_section().unwrap().description, None);
    assert_eq!(procedure.find(reading).unwrap().as_field().unwrap().description, None);

    let loaded = reload(&procedure);
    assert_eq!(loaded.to_drafts(), procedure.to_drafts());
}

#[test]
fn test_deserialize_groups_children_and_sorts_by_order() {
    let response = fetch(json!({
        "id": "p1",
        "title": "Grouping",
        "fields": [
            { "id": "c2", "fieldName": "Second", "fieldType": "text_field", "order": 2,
              "parentId": "f1", "condition": { "type": "one_of", "values": ["No"] } },
            { "id": "f1", "fieldName": "Gate", "fieldType": "yes_no_na", "order": 1 },
            { "id": "c1", "fieldName": "First", "fieldType": "text_field", "order": 1,
              "parentId": "f1", "condition": { "type": "one_of", "values": ["No"] } },
            { "id": "c3", "fieldName": "Third", "fieldType": "text_field", "order": 3,
              "parentId": "f1", "condition": { "type": "one_of", "values": ["N/A"] } },
            { "id": "f2", "fieldName": "Last", "fieldType": "date_field", "order": 2 }
        ]
    }));
    let procedure = deserialize(&response, IdGenerator::sequential()).unwrap();

    let gate = id_of(&procedure, "Gate");
    let groups = procedure.conditions_of(gate);
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].condition, Condition::is("No"));
    assert_eq!(groups[1].condition, Condition::is("N/A"));
    assert_eq!(
        common::child_labels(&procedure, Container::Condition(groups[0].id)),
        vec!["First", "Second"]
    );
    assert_eq!(
        common::child_labels(&procedure, Container::Root),
        vec!["Gate", "Last"]
    );
}

#[test]
fn test_deserialize_places_section_items_and_headings() {
    let response = fetch(json!({
        "id": "p2",
        "title": "Sections",
        "sections": [
            { "id": "s2", "sectionName": "Later", "order": 2 },
            { "id": "s1", "sectionName": "Earlier", "order": 1, "sectionDescription": "Start here" }
        ],
        "fields": [
            { "id": "f1", "fieldName": "Reading", "fieldType": "number_field", "order": 2,
              "sectionId": "s1", "config": { "meterId": "m-1" } }
        ],
        "headings": [
            { "id": "h1", "fieldName": "Intro", "fieldType": "heading", "order": 1,
              "sectionId": "s1" }
        ]
    }));
    let procedure = deserialize(&response, IdGenerator::sequential()).unwrap();

    assert_eq!(
        common::child_labels(&procedure, Container::Root),
        vec!["Earlier", "Later"]
    );
    let earlier = id_of(&procedure, "Earlier");
    assert_eq!(
        common::child_labels(&procedure, Container::Section(earlier)),
        vec!["Intro", "Reading"]
    );
    let reading = procedure.find(id_of(&procedure, "Reading")).unwrap();
    let field = reading.as_field().unwrap();
    assert_eq!(field.meter.as_ref().map(|m| m.meter_id.as_str()), Some("m-1"));
}

#[test]
fn test_deserialize_keeps_uuid_ids() {
    let uuid = "7c0d8f3e-1b7a-4d1e-9a55-2f64f1f0c0de";
    let response = fetch(json!({
        "fields": [
            { "id": uuid, "fieldName": "Kept", "fieldType": "checkbox", "order": 1 },
            { "id": "legacy-42", "fieldName": "Minted", "fieldType": "checkbox", "order": 2 }
        ]
    }));
    let procedure = deserialize(&response, IdGenerator::sequential()).unwrap();
    let kept = NodeId::parse(uuid).unwrap();
    assert!(procedure.contains(kept));
    assert_eq!(procedure.root()[0], kept);
    assert_eq!(procedure.len(), 2);
}

#[test]
fn test_deserialize_skips_unknown_operator_subtree() {
    let response = fetch(json!({
        "fields": [
            { "id": "f1", "fieldName": "Count", "fieldType": "number_field", "order": 1 },
            { "id": "c1", "fieldName": "Odd", "fieldType": "number_field", "order": 1,
              "parentId": "f1", "condition": { "type": "unknown" } },
            { "id": "c2", "fieldName": "Odd child", "fieldType": "text_field", "order": 1,
              "parentId": "c1", "condition": { "type": "higher_than", "value": 1 } },
            { "id": "c3", "fieldName": "Big", "fieldType": "text_field", "order": 2,
              "parentId": "f1", "condition": { "type": "higher_than", "value": 100 } }
        ]
    }));
    let procedure = deserialize(&response, IdGenerator::sequential()).unwrap();
    assert_eq!(procedure.len(), 2);
    let count = id_of(&procedure, "Count");
    let groups = procedure.conditions_of(count);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].condition.value.as_deref(), Some("100"));
}

#[test]
fn test_deserialize_rejects_dangling_references() {
    let unknown_parent = fetch(json!({
        "fields": [
            { "id": "c1", "fieldName": "Orphan", "fieldType": "text_field", "order": 1,
              "parentId": "ghost", "condition": { "type": "is_checked" } }
        ]
    }));
    assert!(matches!(
        deserialize(&unknown_parent, IdGenerator::sequential()),
        Err(LoadError::UnknownParent { .. })
    ));

    let unknown_section = fetch(json!({
        "fields": [
            { "id": "f1", "fieldName": "Lost", "fieldType": "text_field", "order": 1,
              "sectionId": "s9" }
        ]
    }));
    assert!(matches!(
        deserialize(&unknown_section, IdGenerator::sequential()),
        Err(LoadError::UnknownSection { .. })
    ));

    let duplicate = fetch(json!({
        "fields": [
            { "id": "f1", "fieldName": "One", "fieldType": "text_field", "order": 1 },
            { "id": "f1", "fieldName": "Two", "fieldType": "text_field", "order": 2 }
        ]
    }));
    assert!(matches!(
        deserialize(&duplicate, IdGenerator::sequential()),
        Err(LoadError::DuplicateWireId(_))
    ));

    let missing_condition = fetch(json!({
        "fields": [
            { "id": "f1", "fieldName": "Gate", "fieldType": "checkbox", "order": 1 },
            { "id": "c1", "fieldName": "Child", "fieldType": "text_field", "order": 1,
              "parentId": "f1" }
        ]
    }));
    assert!(matches!(
        deserialize(&missing_condition, IdGenerator::sequential()),
        Err(LoadError::MissingCondition(_))
    ));
}

#[test]
fn test_deserialize_rejects_conditions_on_non_logic_parent() {
    let response = fetch(json!({
        "fields": [
            { "id": "f1", "fieldName": "Notes", "fieldType": "text_field", "order": 1 },
            { "id": "c1", "fieldName": "Child", "fieldType": "text_field", "order": 1,
              "parentId": "f1", "condition": { "type": "is_checked" } }
        ],
        "headings": [
            { "id": "h1", "fieldName": "Title", "fieldType": "heading", "order": 2 }
        ]
    }));
    assert!(matches!(
        deserialize(&response, IdGenerator::sequential()),
        Err(LoadError::Invalid(ValidationError::ConditionsNotAllowed { .. }))
    ));

    let under_heading = fetch(json!({
        "headings": [
            { "id": "h1", "fieldName": "Title", "fieldType": "heading", "order": 1 }
        ],
        "fields": [
            { "id": "c1", "fieldName": "Child", "fieldType": "text_field", "order": 1,
              "parentId": "h1", "condition": { "type": "is_checked" } }
        ]
    }));
    assert!(matches!(
        deserialize(&under_heading, IdGenerator::sequential()),
        Err(LoadError::ParentNotAField { .. })
    ));
}

#[test]
fn test_deserialize_rejects_parent_cycles() {
    let response = fetch(json!({
        "fields": [
            { "id": "a", "fieldName": "A", "fieldType": "checkbox", "order": 1,
              "parentId": "b", "condition": { "type": "is_checked" } },
            { "id": "b", "fieldName": "B", "fieldType": "checkbox", "order": 1,
              "parentId": "a", "condition": { "type": "is_checked" } }
        ]
    }));
    assert!(matches!(
        deserialize(&response, IdGenerator::sequential()),
        Err(LoadError::Invalid(ValidationError::Unreachable(_)))
    ));
}

#[test]
fn test_from_json_rejects_garbage() {
    assert!(matches!(
        FetchResponse::from_json("{ not json"),
        Err(LoadError::JsonParseError(_))
    ));
}

#[test]
fn test_missing_keys_take_defaults() {
    let response = FetchResponse::from_json(r#"{ "id": "p3" }"#).unwrap();
    let procedure = Procedure::load(response, IdGenerator::random()).unwrap();
    assert!(procedure.is_empty());
    assert_eq!(procedure.meta.title, "");
    assert_eq!(procedure.meta.visibility, Visibility::Private);
}
