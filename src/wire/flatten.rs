use super::schema::{
    FetchResponse, FetchedItem, FetchedSection, SaveRequest, WireItem, WireReference,
};
use uuid::Uuid;

/// Lays a nested save request out the way the backend stores it: flat field
/// and heading lists linked by `sectionId` and `parentId`, every record under a
/// fresh id.
pub fn flatten(request: &SaveRequest, procedure_id: &str) -> FetchResponse {
    let payload = &request.payload;
    let mut flat = Flattener::default();

    for item in &payload.root_fields {
        flat.push(item, None, None);
    }

    let mut sections = Vec::with_capacity(payload.sections.len());
    for section in &payload.sections {
        let id = Uuid::new_v4().to_string();
        for item in &section.fields {
            flat.push(item, Some(&id), None);
        }
        sections.push(FetchedSection {
            id,
            section_name: section.section_name.clone(),
            order: section.order,
            position: Some(section.position),
            section_description: section.section_description.clone(),
        });
    }

    let references = |ids: &[String]| -> Vec<WireReference> {
        ids.iter()
            .map(|id| WireReference {
                id: id.clone(),
                name: None,
            })
            .collect()
    };

    FetchResponse {
        id: procedure_id.to_string(),
        title: payload.title.clone(),
        description: payload.description.clone(),
        visibility: payload.visibility,
        priority: None,
        assets: references(&payload.asset_ids),
        locations: references(&payload.location_ids),
        teams: references(&payload.teams_in_charge),
        categories: Vec::new(),
        fields: flat.fields,
        headings: flat.headings,
        sections,
    }
}

#[derive(Default)]
struct Flattener {
    fields: Vec<FetchedItem>,
    headings: Vec<FetchedItem>,
}

impl Flattener {
    fn push(&mut self, item: &WireItem, section_id: Option<&str>, parent_id: Option<&str>) {
        let id = Uuid::new_v4().to_string();
        let record = FetchedItem {
            id: id.clone(),
            field_name: item.field_name.clone(),
            field_type: item.field_type.clone(),
            required: item.required,
            order: item.order,
            field_description: item.field_description.clone(),
            config: item.config.clone(),
            section_id: section_id.map(str::to_string),
            parent_id: parent_id.map(str::to_string),
            condition: item.condition.clone(),
        };
        if item.is_heading() {
            self.headings.push(record);
        } else {
            self.fields.push(record);
        }
        for child in &item.children {
            self.push(child, section_id, Some(&id));
        }
    }
}
