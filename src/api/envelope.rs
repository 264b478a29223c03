//! Response envelope detection.
//!
//! List endpoints answer with `{records, total_records}`, `{data, ...}` or a
//! bare array depending on the service behind them. Everything else is read
//! as an empty result.

use serde_json::{Map, Value};

const RECORDS_COUNT_KEYS: [&str; 3] = ["total_records", "total", "count"];
const DATA_COUNT_KEYS: [&str; 4] = ["total", "total_records", "totalCount", "count"];

/// Records of one page plus the total across all pages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Envelope {
    pub records: Vec<Value>,
    pub total: usize,
}

pub fn normalize(body: Value) -> Envelope {
    match body {
        Value::Array(records) => {
            let total = records.len();
            Envelope { records, total }
        }
        Value::Object(mut map) => match (map.remove("records"), map.remove("data")) {
            (Some(Value::Array(records)), _) => {
                let total = count(&map, &RECORDS_COUNT_KEYS).unwrap_or(records.len());
                Envelope { records, total }
            }
            (_, Some(Value::Array(records))) => {
                let total = count(&map, &DATA_COUNT_KEYS)
                    .or_else(|| match map.get("meta") {
                        Some(Value::Object(meta)) => count(meta, &DATA_COUNT_KEYS),
                        _ => None,
                    })
                    .unwrap_or(records.len());
                Envelope { records, total }
            }
            (_, Some(nested @ Value::Object(_))) => normalize(nested),
            _ => Envelope::default(),
        },
        _ => Envelope::default(),
    }
}

fn count(map: &Map<String, Value>, keys: &[&str]) -> Option<usize> {
    keys.iter().find_map(|key| match map.get(*key)? {
        Value::Number(n) => n.as_u64().and_then(|n| usize::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}
