use crate::record::Record;
use dns_name::Fqdn;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;

#[derive(Debug)]
pub enum DecodeError {
    Json(serde_json::Error),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Json(e) => write!(f, "malformed snapshot JSON: {e}"),
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DecodeError::Json(e) => Some(e),
        }
    }
}

#[derive(Deserialize)]
struct Snapshot {
    record_keys: Vec<String>,
    record_infos: Vec<Vec<Value>>,
}

#[derive(Default)]
struct ColumnIndex {
    id: Option<usize>,
    instance_group: Option<usize>,
    network: Option<usize>,
    deployment: Option<usize>,
    ip: Option<usize>,
    domain: Option<usize>,
    az_id: Option<usize>,
    instance_index: Option<usize>,
}

impl ColumnIndex {
    fn from_keys(keys: &[String]) -> Self {
        let mut columns = Self::default();
        for (index, key) in keys.iter().enumerate() {
            match key.as_str() {
                "id" => columns.id = Some(index),
                "instance_group" => columns.instance_group = Some(index),
                "network" => columns.network = Some(index),
                "deployment" => columns.deployment = Some(index),
                "ip" => columns.ip = Some(index),
                "domain" => columns.domain = Some(index),
                "az_id" => columns.az_id = Some(index),
                "instance_index" => columns.instance_index = Some(index),
                // Unknown columns are silently ignored.
                _ => {}
            }
        }
        columns
    }
}

/// Decodes a `{record_keys, record_infos}` snapshot into its domain set and
/// record list. Only malformed top-level JSON is fatal; rows with schema
/// drift are logged and dropped.
///
/// # Errors
/// Returns [`DecodeError::Json`] if `bytes` is not the expected top-level
/// JSON shape.
pub fn decode(bytes: &[u8]) -> Result<(Vec<String>, Vec<Record>), DecodeError> {
    let snapshot: Snapshot = serde_json::from_slice(bytes).map_err(DecodeError::Json)?;
    let columns = ColumnIndex::from_keys(&snapshot.record_keys);
    let expected_len = snapshot.record_keys.len();

    let mut domains = HashSet::new();
    let mut records = Vec::with_capacity(snapshot.record_infos.len());

    for (row_index, row) in snapshot.record_infos.iter().enumerate() {
        if row.len() != expected_len {
            log::warn!(
                "record-set: row {row_index} has {} fields, expected {expected_len}",
                row.len(),
            );
            continue;
        }

        let Some(domain_raw) = extract_string(row, columns.domain, "domain", row_index) else {
            continue;
        };
        let domain = Fqdn::new(domain_raw);
        domains.insert(domain.as_str().to_string());

        let Some(id) = extract_string(row, columns.id, "id", row_index) else {
            continue;
        };
        let Some(instance_group) =
            extract_string(row, columns.instance_group, "instance_group", row_index)
        else {
            continue;
        };
        let Some(network) = extract_string(row, columns.network, "network", row_index) else {
            continue;
        };
        let Some(deployment) =
            extract_string(row, columns.deployment, "deployment", row_index)
        else {
            continue;
        };
        let Some(ip) = extract_string(row, columns.ip, "ip", row_index) else {
            continue;
        };

        let az_id = extract_string(row, columns.az_id, "az_id", row_index);
        let instance_index =
            extract_integer_as_string(row, columns.instance_index, "instance_index", row_index);

        records.push(Record {
            id,
            instance_group,
            network,
            deployment,
            ip,
            domain,
            az_id,
            instance_index,
        });
    }

    Ok((domains.into_iter().collect(), records))
}

/// Returns `None` silently when `index` is absent (the key wasn't in
/// `record_keys` at all); logs and returns `None` when it's present with
/// the wrong JSON type.
fn extract_string(
    row: &[Value],
    index: Option<usize>,
    field_name: &str,
    row_index: usize,
) -> Option<String> {
    let index = index?;
    match row[index].as_str() {
        Some(value) => Some(value.to_string()),
        None => {
            log::warn!(
                "record-set: value {} ({field_name}) of record {row_index} is not a string: {:?}",
                index,
                row[index],
            );
            None
        }
    }
}

fn extract_integer_as_string(
    row: &[Value],
    index: Option<usize>,
    field_name: &str,
    row_index: usize,
) -> Option<String> {
    let index = index?;
    match row[index].as_f64() {
        #[allow(clippy::cast_possible_truncation)]
        Some(value) => Some((value as i64).to_string()),
        None => {
            log::warn!(
                "record-set: value {} ({field_name}) of record {row_index} is not numeric: {:?}",
                index,
                row[index],
            );
            None
        }
    }
}
