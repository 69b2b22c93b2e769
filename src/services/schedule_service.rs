use std::sync::OnceLock;

use chrono::{Duration, NaiveTime};
use regex::Regex;

use crate::models::{
    itinerary::{DayPlan, Itinerary},
    schedule::{DaySchedule, ScheduledActivity, TimeSlot},
};

const DAY_START_HOUR: u32 = 9;
const BUFFER_MINUTES: i64 = 60;
const DEFAULT_DURATION_HOURS: f64 = 1.0;
const MINUTES_PER_DAY: i64 = 24 * 60;

#[derive(Clone, Debug)]
pub struct ScheduleConfig {
    pub day_start: NaiveTime,
    pub buffer: Duration,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            day_start: NaiveTime::from_hms_opt(DAY_START_HOUR, 0, 0).unwrap_or_default(),
            buffer: Duration::minutes(BUFFER_MINUTES),
        }
    }
}

fn leading_number() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?:\d+(?:\.\d*)?|\.\d+)").expect("duration pattern is a valid regex")
    })
}

/// Hours encoded in a free-text duration such as "2 hours" or "1.5h".
///
/// Only the leading number counts. Anything else (missing, unparsable, zero,
/// negative) falls back to one hour.
pub fn parse_duration_hours(text: Option<&str>) -> f64 {
    text.and_then(|text| leading_number().find(text.trim()))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|hours| hours.is_finite() && *hours > 0.0)
        .unwrap_or(DEFAULT_DURATION_HOURS)
}

// Clock arithmetic wraps at midnight, so only the minutes within one day matter.
fn clock_offset(hours: f64) -> Duration {
    let minutes = (hours * 60.0).round() as i64;
    Duration::minutes(minutes.rem_euclid(MINUTES_PER_DAY))
}

pub fn compute_slots(day: &DayPlan) -> Vec<ScheduledActivity> {
    compute_slots_with(&ScheduleConfig::default(), day)
}

/// Lays out a day back to back from `config.day_start`, with `config.buffer`
/// between consecutive activities.
pub fn compute_slots_with(config: &ScheduleConfig, day: &DayPlan) -> Vec<ScheduledActivity> {
    let mut cursor = config.day_start;

    day.activities
        .iter()
        .map(|activity| {
            let duration_hours = parse_duration_hours(activity.travel_duration.as_deref());
            let start = cursor;
            let (end, _) = start.overflowing_add_signed(clock_offset(duration_hours));
            let (next_start, _) = end.overflowing_add_signed(config.buffer);
            cursor = next_start;

            ScheduledActivity {
                time_slot: TimeSlot { start, end },
                duration_hours,
                activity: activity.clone(),
            }
        })
        .collect()
}

/// "day1" -> "Day1"
pub fn day_title(label: &str) -> String {
    match label.to_ascii_lowercase().find("day") {
        Some(index) => format!("{}Day{}", &label[..index], &label[index + 3..]),
        None => label.to_string(),
    }
}

pub fn compute_schedule(itinerary: &Itinerary) -> Vec<DaySchedule> {
    itinerary
        .days()
        .map(|(label, plan)| DaySchedule {
            label: label.to_string(),
            title: day_title(label),
            slots: compute_slots(plan),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::place::Activity;
    use serde_json::json;

    fn activity(name: &str, duration: Option<&str>) -> Activity {
        serde_json::from_value(json!({
            "placeName": name,
            "timeToTravel": duration,
        }))
        .unwrap()
    }

    fn labels(slots: &[ScheduledActivity]) -> Vec<(String, String)> {
        slots
            .iter()
            .map(|s| (s.time_slot.start_label(), s.time_slot.end_label()))
            .collect()
    }

    #[test]
    fn slots_follow_durations_plus_buffer() {
        let day = DayPlan::new(vec![
            activity("Louvre", Some("2 hours")),
            activity("Orsay", Some("1.5 hours")),
            activity("Seine cruise", Some("3")),
        ]);

        let slots = compute_slots(&day);

        assert_eq!(
            labels(&slots),
            vec![
                ("09:00".to_string(), "11:00".to_string()),
                ("12:00".to_string(), "13:30".to_string()),
                ("14:30".to_string(), "17:30".to_string()),
            ]
        );
        assert_eq!(slots[1].time_slot.to_string(), "12:00 - 13:30");
        assert_eq!(slots[2].activity.place_name, "Seine cruise");
    }

    #[test]
    fn unparsable_duration_defaults_to_one_hour() {
        let day = DayPlan::new(vec![
            activity("Cafe", Some("a while")),
            activity("Park", None),
        ]);

        let slots = compute_slots(&day);

        assert_eq!(slots[0].duration_hours, 1.0);
        assert_eq!(
            labels(&slots),
            vec![
                ("09:00".to_string(), "10:00".to_string()),
                ("11:00".to_string(), "12:00".to_string()),
            ]
        );
    }

    #[test]
    fn duration_parsing_takes_leading_number_only() {
        assert_eq!(parse_duration_hours(Some("2-3 hours")), 2.0);
        assert_eq!(parse_duration_hours(Some(" .5h")), 0.5);
        assert_eq!(parse_duration_hours(Some("0 hours")), 1.0);
        assert_eq!(parse_duration_hours(Some("-2 hours")), 1.0);
        assert_eq!(parse_duration_hours(Some("about 2 hours")), 1.0);
        assert_eq!(parse_duration_hours(Some("")), 1.0);
    }

    #[test]
    fn empty_day_has_no_slots() {
        assert!(compute_slots(&DayPlan::default()).is_empty());
    }

    #[test]
    fn long_days_wrap_past_midnight() {
        let day = DayPlan::new(vec![
            activity("Hike", Some("14 hours")),
            activity("Night market", Some("2 hours")),
        ]);

        let slots = compute_slots(&day);

        assert_eq!(slots[0].time_slot.end_label(), "23:00");
        assert_eq!(slots[1].time_slot.start_label(), "00:00");
        assert_eq!(slots[1].time_slot.end_label(), "02:00");
    }

    #[test]
    fn custom_anchor_and_buffer() {
        let config = ScheduleConfig {
            day_start: NaiveTime::from_hms_opt(8, 30, 0).unwrap(),
            buffer: Duration::minutes(30),
        };
        let day = DayPlan::new(vec![
            activity("Breakfast", Some("1 hour")),
            activity("Museum", Some("2 hours")),
        ]);

        let slots = compute_slots_with(&config, &day);

        assert_eq!(slots[1].time_slot.start_label(), "10:00");
        assert_eq!(slots[1].time_slot.end_label(), "12:00");
    }

    #[test]
    fn schedule_keeps_itinerary_order_and_titles() {
        let mut itinerary = Itinerary::new();
        itinerary.push_day("day2", DayPlan::new(vec![activity("Orsay", Some("2 hours"))]));
        itinerary.push_day("day1", DayPlan::new(vec![activity("Louvre", Some("3 hours"))]));

        let schedule = compute_schedule(&itinerary);

        assert_eq!(schedule.len(), 2);
        assert_eq!(schedule[0].label, "day2");
        assert_eq!(schedule[0].title, "Day2");
        assert_eq!(schedule[1].slots[0].time_slot.end_label(), "12:00");
        assert_eq!(day_title("Arrival"), "Arrival");
        assert_eq!(day_title("DAY 3"), "Day 3");
    }
}
