//! Dataset references as returned by the list endpoint.

use serde_json::Value;

use crate::json;

/// A dataset the authenticated user owns. Never mutated client-side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetRef {
    pub id: String,
    pub name: String,
}

/// Maps the loose list payload into display options.
///
/// The endpoint may return plain strings or numbers, or objects whose id
/// and name hide behind several aliases. Entries without an id are
/// dropped; the display name falls back to the id. The result is sorted
/// descending by numeric id so the newest dataset comes first.
pub fn dataset_options(list: &Value) -> Vec<DatasetRef> {
    let mut options: Vec<DatasetRef> = list
        .as_array()
        .map(|items| items.iter().filter_map(option_from_entry).collect())
        .unwrap_or_default();
    options.sort_by(|a, b| {
        numeric_key(&b.id)
            .partial_cmp(&numeric_key(&a.id))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    options
}

fn option_from_entry(entry: &Value) -> Option<DatasetRef> {
    match entry {
        Value::String(_) | Value::Number(_) => {
            let id = json::display_string(entry);
            Some(DatasetRef {
                name: id.clone(),
                id,
            })
        }
        Value::Object(_) => {
            let id = json::string_field(entry, &["id", "datasetId", "dataset_id"])?;
            let name = json::string_field(entry, &["name", "dataset_name", "title"])
                .unwrap_or_else(|| id.clone());
            Some(DatasetRef { id, name })
        }
        _ => None,
    }
}

// Ids that do not parse sort to the end of the descending order.
fn numeric_key(id: &str) -> f64 {
    id.trim().parse().unwrap_or(f64::NEG_INFINITY)
}
