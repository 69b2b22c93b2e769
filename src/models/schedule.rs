use std::fmt;

use chrono::NaiveTime;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::models::place::Activity;

const TIME_FORMAT: &str = "%H:%M";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSlot {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeSlot {
    pub fn start_label(&self) -> String {
        self.start.format(TIME_FORMAT).to_string()
    }

    pub fn end_label(&self) -> String {
        self.end.format(TIME_FORMAT).to_string()
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.start_label(), self.end_label())
    }
}

impl Serialize for TimeSlot {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("TimeSlot", 3)?;
        state.serialize_field("start", &self.start_label())?;
        state.serialize_field("end", &self.end_label())?;
        state.serialize_field("label", &self.to_string())?;
        state.end()
    }
}

#[derive(Debug, Serialize, Clone)]
pub struct ScheduledActivity {
    pub time_slot: TimeSlot,
    pub duration_hours: f64,
    pub activity: Activity,
}

#[derive(Debug, Serialize, Clone)]
pub struct DaySchedule {
    pub label: String,
    pub title: String,
    pub slots: Vec<ScheduledActivity>,
}
