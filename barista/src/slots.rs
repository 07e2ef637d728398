use anyhow::{anyhow, Result};
use chrono::{NaiveDateTime, NaiveTime, TimeDelta, Timelike};

use crate::catalog::ShopConfig;

pub const SLOT_STEP_MINUTES: i64 = 15;
pub const SLOT_COUNT: usize = 12;

fn shift(at: NaiveDateTime, minutes: i64) -> Option<NaiveDateTime> {
    at.checked_add_signed(TimeDelta::try_minutes(minutes)?)
}

/// `now` plus the lead time, with the minute rounded up to the next multiple
/// of the slot step. Seconds are dropped after rounding, so 10:45:30 stays 10:45.
/// Fails when the lead time pushes past the representable calendar.
pub fn first_slot(now: NaiveDateTime, lead_minutes: i64) -> Result<NaiveDateTime> {
    let out_of_range = || anyhow!("min_minutes_before out of range: {}", lead_minutes);
    let shifted = shift(now, lead_minutes).ok_or_else(out_of_range)?;
    let minute = i64::from(shifted.minute());
    let rounded = (minute + SLOT_STEP_MINUTES - 1) / SLOT_STEP_MINUTES * SLOT_STEP_MINUTES;
    let truncated = shifted
        .with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .ok_or_else(out_of_range)?;
    shift(truncated, rounded - minute).ok_or_else(out_of_range)
}

/// Delivery times offered at checkout: up to `SLOT_COUNT` steps from the first
/// slot, keeping only those whose hour lies in `[start, end)` of the working hours.
pub fn generate_time_slots(now: NaiveDateTime, config: &ShopConfig) -> Result<Vec<NaiveTime>> {
    let start_hour = config.working_hours.start_hour()?;
    let end_hour = config.working_hours.end_hour()?;

    let mut current = first_slot(now, config.min_minutes_before)?;
    let mut slots = Vec::new();
    for _ in 0..SLOT_COUNT {
        let hour = current.hour();
        if hour >= start_hour && hour < end_hour {
            slots.push(current.time());
        }
        current = match shift(current, SLOT_STEP_MINUTES) {
            Some(next) => next,
            None => break,
        };
    }
    Ok(slots)
}

pub fn format_slot(slot: NaiveTime) -> String {
    slot.format("%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::WorkingHours;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 17)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn config(start: &str, end: &str, lead: i64) -> ShopConfig {
        ShopConfig {
            working_hours: WorkingHours {
                start: start.into(),
                end: end.into(),
            },
            min_minutes_before: lead,
        }
    }

    fn formatted(slots: &[NaiveTime]) -> Vec<String> {
        slots.iter().copied().map(format_slot).collect()
    }

    #[test]
    fn test_first_slot_rounding() {
        assert_eq!(first_slot(at(10, 5, 0), 30).unwrap(), at(10, 45, 0));
        // Already on a boundary: not pushed further
        assert_eq!(first_slot(at(10, 15, 0), 30).unwrap(), at(10, 45, 0));
        assert_eq!(first_slot(at(10, 15, 40), 30).unwrap(), at(10, 45, 0));
        // Rolls into the next hour
        assert_eq!(first_slot(at(10, 20, 0), 30).unwrap(), at(11, 0, 0));
        // And the next day
        assert_eq!(
            first_slot(at(23, 50, 0), 5).unwrap(),
            NaiveDate::from_ymd_opt(2024, 5, 18)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn test_slots_within_working_hours() {
        let slots = generate_time_slots(at(10, 5, 0), &config("09:00", "21:00", 30)).unwrap();
        assert_eq!(slots.len(), SLOT_COUNT);
        assert_eq!(format_slot(slots[0]), "10:45");
        assert_eq!(format_slot(slots[1]), "11:00");
        assert_eq!(format_slot(slots[SLOT_COUNT - 1]), "13:30");
    }

    #[test]
    fn test_end_hour_is_excluded() {
        let slots = generate_time_slots(at(19, 50, 0), &config("09:00", "21:00", 30)).unwrap();
        assert_eq!(formatted(&slots), vec!["20:30", "20:45"]);
    }

    #[test]
    fn test_before_opening() {
        let slots = generate_time_slots(at(7, 40, 0), &config("09:00", "21:00", 30)).unwrap();
        assert_eq!(
            formatted(&slots),
            vec![
                "09:00", "09:15", "09:30", "09:45", "10:00", "10:15", "10:30", "10:45", "11:00"
            ]
        );
    }

    #[test]
    fn test_no_slots_after_closing() {
        let slots = generate_time_slots(at(21, 10, 0), &config("09:00", "21:00", 30)).unwrap();
        assert!(slots.is_empty());
    }

    #[test]
    fn test_huge_lead_time() {
        assert!(first_slot(at(10, 0, 0), i64::MAX).is_err());
        assert!(first_slot(at(10, 0, 0), i64::MIN).is_err());
        // Fits in a TimeDelta but not in the calendar
        assert!(first_slot(at(10, 0, 0), 1 << 40).is_err());
        let err = generate_time_slots(at(10, 0, 0), &config("09:00", "21:00", i64::MAX))
            .unwrap_err();
        assert!(err.to_string().contains("min_minutes_before"));
    }

    #[test]
    fn test_bad_working_hours() {
        assert!(generate_time_slots(at(10, 0, 0), &config("morning", "21:00", 30)).is_err());
    }
}
