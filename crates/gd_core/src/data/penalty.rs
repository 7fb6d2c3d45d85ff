//! d10 penalty tables.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, SchemaError};

pub const PENALTY_SLOTS: u8 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PenaltySide {
    Offense,
    Defense,
    Offset,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PenaltyEntry {
    pub side: PenaltySide,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yards: Option<i32>,
    #[serde(default)]
    pub auto_first_down: bool,
    #[serde(default)]
    pub loss_of_down: bool,
    #[serde(default)]
    pub replay_down: bool,
    #[serde(default)]
    pub override_play_result: bool,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PenaltyTable {
    pub name: String,
    pub version: String,
    pub(crate) entries: BTreeMap<u8, PenaltyEntry>,
}

#[derive(Deserialize)]
struct RawPenaltyTable {
    name: String,
    #[serde(default)]
    version: String,
    entries: BTreeMap<String, serde_json::Value>,
}

impl PenaltyTable {
    pub fn from_json(file: &str, json: &str) -> Result<Self, SchemaError> {
        let raw: RawPenaltyTable =
            serde_json::from_str(json).map_err(|e| SchemaError::json(file, e))?;

        let mut entries = BTreeMap::new();
        for (key, value) in raw.entries {
            let path = format!("entries.{}", key);
            let slot: u8 = key
                .parse()
                .ok()
                .filter(|s| (1..=PENALTY_SLOTS).contains(s))
                .ok_or_else(|| SchemaError::field(file, &path, "key is not a d10 slot 1..10"))?;
            for required in ["side", "label"] {
                if value.get(required).is_none() {
                    return Err(SchemaError::field(
                        file,
                        format!("{}.{}", path, required),
                        "required field missing",
                    ));
                }
            }
            let entry: PenaltyEntry = serde_json::from_value(value)
                .map_err(|e| SchemaError::field(file, &path, e.to_string()))?;
            entries.insert(slot, entry);
        }
        if let Some(missing) = (1..=PENALTY_SLOTS).find(|s| !entries.contains_key(s)) {
            return Err(SchemaError::field(file, format!("entries.{}", missing), "missing slot"));
        }

        Ok(Self { name: raw.name, version: raw.version, entries })
    }

    pub fn entry(&self, slot: u8) -> Result<&PenaltyEntry, EngineError> {
        self.entries
            .get(&slot)
            .ok_or_else(|| EngineError::PenaltySlotMissing { table: self.name.clone(), slot })
    }

    pub fn entries(&self) -> impl Iterator<Item = (u8, &PenaltyEntry)> {
        self.entries.iter().map(|(slot, entry)| (*slot, entry))
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::penalty_json;
    use super::*;

    fn parse(value: &serde_json::Value) -> Result<PenaltyTable, SchemaError> {
        PenaltyTable::from_json("standard.json", &value.to_string())
    }

    #[test]
    fn test_valid_table_loads() {
        let table = parse(&penalty_json("standard")).unwrap();
        assert_eq!(table.entries().count(), 10);
        assert_eq!(table.entry(8).unwrap().side, PenaltySide::Offset);
        assert_eq!(table.entry(9).unwrap().yards, None);
        assert!(table.entry(5).unwrap().override_play_result);
    }

    #[test]
    fn test_rejects_missing_slot() {
        let mut value = penalty_json("standard");
        value["entries"].as_object_mut().unwrap().remove("10");
        let err = parse(&value).unwrap_err();
        assert!(matches!(err, SchemaError::Field { ref path, .. } if path == "entries.10"));
    }

    #[test]
    fn test_rejects_eleventh_slot() {
        let mut value = penalty_json("standard");
        value["entries"]["11"] = serde_json::json!({"side": "defense", "label": "Extra"});
        assert!(parse(&value).is_err());
    }

    #[test]
    fn test_requires_side_and_label() {
        let mut value = penalty_json("standard");
        value["entries"]["4"].as_object_mut().unwrap().remove("label");
        let err = parse(&value).unwrap_err();
        assert!(matches!(err, SchemaError::Field { ref path, .. } if path == "entries.4.label"));

        let mut value = penalty_json("standard");
        value["entries"]["6"].as_object_mut().unwrap().remove("side");
        let err = parse(&value).unwrap_err();
        assert!(matches!(err, SchemaError::Field { ref path, .. } if path == "entries.6.side"));
    }

    #[test]
    fn test_missing_slot_at_runtime() {
        let mut table = parse(&penalty_json("standard")).unwrap();
        table.entries.remove(&3);
        let err = table.entry(3).unwrap_err();
        assert_eq!(err.to_string(), "No penalty entry for slot 3 in table 'standard'");
    }
}
