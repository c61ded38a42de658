use crate::errors::{VitaliError, VitaliResult};
use crate::models::HealthLogEntry;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub const JOURNAL_CAP: usize = 60;
const DEFAULT_HEART_RATE: u32 = 70;

/// A vitals submission as the form sends it. Every field must be present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthLogDraft {
    pub steps: Option<u32>,
    pub calories: Option<u32>,
    pub water_intake: Option<u32>,
    pub sleep_hours: Option<f64>,
    pub weight: Option<f64>,
    pub heart_rate: Option<u32>,
}

impl HealthLogDraft {
    /// Form defaults: weight carried over from the latest entry, resting heart rate 70.
    pub fn prefilled(journal: &[HealthLogEntry]) -> Self {
        Self {
            steps: Some(0),
            calories: Some(0),
            water_intake: Some(0),
            sleep_hours: Some(0.0),
            weight: Some(latest(journal).map_or(0.0, |entry| entry.weight)),
            heart_rate: Some(DEFAULT_HEART_RATE),
        }
    }

    /// Stamps the draft with today's UTC date.
    pub fn submit(self) -> VitaliResult<HealthLogEntry> {
        self.submit_on(Utc::now().date_naive())
    }

    pub fn submit_on(self, date: NaiveDate) -> VitaliResult<HealthLogEntry> {
        Ok(HealthLogEntry {
            date,
            steps: self.steps.ok_or_else(|| VitaliError::missing("steps"))?,
            calories: self.calories.ok_or_else(|| VitaliError::missing("calories"))?,
            water_intake: self
                .water_intake
                .ok_or_else(|| VitaliError::missing("waterIntake"))?,
            sleep_hours: self
                .sleep_hours
                .ok_or_else(|| VitaliError::missing("sleepHours"))?,
            weight: self.weight.ok_or_else(|| VitaliError::missing("weight"))?,
            heart_rate: self
                .heart_rate
                .ok_or_else(|| VitaliError::missing("heartRate"))?,
        })
    }
}

/// Appends and truncates from the front so at most [`JOURNAL_CAP`] entries remain.
pub fn append(journal: &mut Vec<HealthLogEntry>, entry: HealthLogEntry) {
    journal.push(entry);
    if journal.len() > JOURNAL_CAP {
        let excess = journal.len() - JOURNAL_CAP;
        journal.drain(..excess);
    }
}

pub fn latest(journal: &[HealthLogEntry]) -> Option<&HealthLogEntry> {
    journal.last()
}
