//! Payload parsing
//!
//! Turns the raw JSON of the summary and incidents endpoints into typed
//! records. Both functions are pure and keep source order. Records are decoded
//! one at a time so a failure can name the offending record.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::model::{ComponentStatus, Incident, IncidentUpdate};

/// Incident fields without the nested updates
#[derive(Deserialize)]
struct IncidentFields {
    id: String,
    name: String,
    status: String,
    created_at: String,
    updated_at: String,
    #[serde(default)]
    resolved_at: Option<String>,
    impact: String,
}

/// Parse the `components` array of a summary payload
///
/// A payload without a `components` key yields an empty list.
pub fn parse_components(payload: &Value) -> Result<Vec<ComponentStatus>> {
    records(payload, "components")?
        .iter()
        .enumerate()
        .map(|(index, record)| decode(record, &locate("components", index, record)))
        .collect()
}

/// Parse the `incidents` array of an incidents payload
///
/// A payload without an `incidents` key yields an empty list, and an incident
/// without `incident_updates` has no updates.
pub fn parse_incidents(payload: &Value) -> Result<Vec<Incident>> {
    records(payload, "incidents")?
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let location = locate("incidents", index, record);
            let fields: IncidentFields = decode(record, &location)?;

            let updates = records(record, "incident_updates")
                .map_err(|e| nest(&location, e))?
                .iter()
                .enumerate()
                .map(|(update_index, update)| {
                    let update_location = format!(
                        "{}.{}",
                        location,
                        locate("incident_updates", update_index, update)
                    );
                    decode::<IncidentUpdate>(update, &update_location)
                })
                .collect::<Result<Vec<_>>>()?;

            Ok(Incident {
                id: fields.id,
                name: fields.name,
                status: fields.status,
                created_at: fields.created_at,
                updated_at: fields.updated_at,
                resolved_at: fields.resolved_at,
                impact: fields.impact,
                updates,
            })
        })
        .collect()
}

/// Borrow the array stored under `key`; absent or `null` reads as empty
fn records<'a>(payload: &'a Value, key: &str) -> Result<&'a [Value]> {
    match payload.get(key) {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Array(items)) => Ok(items),
        Some(other) => Err(Error::malformed(
            key,
            format!("expected an array, found {}", value_kind(other)),
        )),
    }
}

fn decode<T: DeserializeOwned>(record: &Value, location: &str) -> Result<T> {
    T::deserialize(record).map_err(|e| Error::malformed(location, e.to_string()))
}

fn nest(parent: &str, err: Error) -> Error {
    match err {
        Error::MalformedPayload { record, message } => {
            Error::malformed(format!("{parent}.{record}"), message)
        }
        other => other,
    }
}

fn locate(key: &str, index: usize, record: &Value) -> String {
    match record.get("id").and_then(Value::as_str) {
        Some(id) => format!("{key}[{index}] (id={id})"),
        None => format!("{key}[{index}]"),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
