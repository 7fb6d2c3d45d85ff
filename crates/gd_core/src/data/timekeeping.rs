//! Time-keeping: event → clock runoff in seconds.
//!
//! Two input shapes are accepted: the flat record and a rich rules array.
//! `TimeKeepingSource::normalize` turns either into the canonical flat form.

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
#[serde(rename_all = "camelCase")]
pub enum TimeEvent {
    Gain0to20,
    Gain20plus,
    Loss,
    OutOfBounds,
    Incomplete,
    Interception,
    Penalty,
    Fumble,
    Kickoff,
    Fieldgoal,
    Punt,
    ExtraPoint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TimeKeeping {
    pub gain0to20: u32,
    pub gain20plus: u32,
    pub loss: u32,
    pub out_of_bounds: u32,
    pub incomplete: u32,
    pub interception: u32,
    pub penalty: u32,
    pub fumble: u32,
    pub kickoff: u32,
    pub fieldgoal: u32,
    pub punt: u32,
    pub extra_point: u32,
}

impl Default for TimeKeeping {
    fn default() -> Self {
        Self {
            gain0to20: 30,
            gain20plus: 15,
            loss: 30,
            out_of_bounds: 10,
            incomplete: 5,
            interception: 15,
            penalty: 5,
            fumble: 15,
            kickoff: 5,
            fieldgoal: 5,
            punt: 10,
            extra_point: 0,
        }
    }
}

impl TimeKeeping {
    pub fn seconds(&self, event: TimeEvent) -> u32 {
        match event {
            TimeEvent::Gain0to20 => self.gain0to20,
            TimeEvent::Gain20plus => self.gain20plus,
            TimeEvent::Loss => self.loss,
            TimeEvent::OutOfBounds => self.out_of_bounds,
            TimeEvent::Incomplete => self.incomplete,
            TimeEvent::Interception => self.interception,
            TimeEvent::Penalty => self.penalty,
            TimeEvent::Fumble => self.fumble,
            TimeEvent::Kickoff => self.kickoff,
            TimeEvent::Fieldgoal => self.fieldgoal,
            TimeEvent::Punt => self.punt,
            TimeEvent::ExtraPoint => self.extra_point,
        }
    }

    fn slot_mut(&mut self, event: TimeEvent) -> &mut u32 {
        match event {
            TimeEvent::Gain0to20 => &mut self.gain0to20,
            TimeEvent::Gain20plus => &mut self.gain20plus,
            TimeEvent::Loss => &mut self.loss,
            TimeEvent::OutOfBounds => &mut self.out_of_bounds,
            TimeEvent::Incomplete => &mut self.incomplete,
            TimeEvent::Interception => &mut self.interception,
            TimeEvent::Penalty => &mut self.penalty,
            TimeEvent::Fumble => &mut self.fumble,
            TimeEvent::Kickoff => &mut self.kickoff,
            TimeEvent::Fieldgoal => &mut self.fieldgoal,
            TimeEvent::Punt => &mut self.punt,
            TimeEvent::ExtraPoint => &mut self.extra_point,
        }
    }

    /// Load either input shape and normalize.
    pub fn from_json(file: &str, json: &str) -> Result<Self, SchemaError> {
        let source: TimeKeepingSource =
            serde_json::from_str(json).map_err(|e| SchemaError::json(file, e))?;
        source.normalize().map_err(|(path, message)| SchemaError::field(file, path, message))
    }
}

/// One rule of the rich shape. `seconds` sets the base; `adjustment` is added to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRule {
    pub event: TimeEvent,
    #[serde(default)]
    pub seconds: Option<u32>,
    #[serde(default)]
    pub adjustment: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichTimeKeeping {
    #[serde(default)]
    pub version: Option<String>,
    pub rules: Vec<TimeRule>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimeKeepingSource {
    Rich(RichTimeKeeping),
    Flat(TimeKeeping),
}

impl TimeKeepingSource {
    /// Returns `(field path, message)` on failure.
    pub fn normalize(self) -> Result<TimeKeeping, (String, String)> {
        let rich = match self {
            TimeKeepingSource::Flat(flat) => return Ok(flat),
            TimeKeepingSource::Rich(rich) => rich,
        };

        let mut base: [Option<u32>; 12] = [None; 12];
        let mut adjust: [i64; 12] = [0; 12];
        // Adjustments may precede the rule that sets the base; both are summed afterwards.
        for rule in &rich.rules {
            let idx = rule.event as usize;
            if let Some(seconds) = rule.seconds {
                base[idx] = Some(seconds);
            }
            adjust[idx] += rule.adjustment as i64;
        }

        let mut flat = TimeKeeping::default();
        for event in ALL_EVENTS {
            let idx = event as usize;
            let Some(seconds) = base[idx] else {
                return Err((
                    format!("rules[{}]", serde_name(event)),
                    "no rule sets seconds for this event".to_string(),
                ));
            };
            let total = (seconds as i64 + adjust[idx]).max(0);
            *flat.slot_mut(event) = total as u32;
        }
        Ok(flat)
    }
}

const ALL_EVENTS: [TimeEvent; 12] = [
    TimeEvent::Gain0to20,
    TimeEvent::Gain20plus,
    TimeEvent::Loss,
    TimeEvent::OutOfBounds,
    TimeEvent::Incomplete,
    TimeEvent::Interception,
    TimeEvent::Penalty,
    TimeEvent::Fumble,
    TimeEvent::Kickoff,
    TimeEvent::Fieldgoal,
    TimeEvent::Punt,
    TimeEvent::ExtraPoint,
];

fn serde_name(event: TimeEvent) -> String {
    serde_json::to_value(event)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_else(|| format!("{:?}", event))
}
