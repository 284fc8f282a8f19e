//! ELD daily log projection.
//!
//! Slices a planned segment timeline into midnight-to-midnight log sheets
//! matching the standard DOT daily log format: per-day status entries on a
//! 0–24 hour scale, totals per duty status, miles driven that day, and
//! remarks for each activity.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{DutyStatus, Segment};

/// Entries below this gap width are treated as touching
const GAP_TOLERANCE_HOURS: f64 = 0.01;

/// One status interval on a daily log, hours on a 0–24 scale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub status: DutyStatus,
    pub start_hour: f64,
    pub end_hour: f64,
    pub segment_type: String,
}

/// Hour totals per duty status for one day
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TotalHours {
    pub off_duty: f64,
    pub sleeper_berth: f64,
    pub driving: f64,
    pub on_duty_not_driving: f64,
}

/// One midnight-to-midnight log sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyLog {
    pub date: NaiveDate,
    pub day_number: u32,
    pub entries: Vec<LogEntry>,
    pub total_hours: TotalHours,
    pub total_miles: f64,
    pub remarks: Vec<String>,
}

/// Generate daily ELD log sheets from trip segments.
///
/// One log per calendar day from the later of `trip_start_date` and the
/// first segment's date through the last segment's end date. Gaps are
/// filled with off-duty time so every day tiles the full 24 hours. An
/// empty segment list produces no logs.
pub fn generate_daily_logs(
    segments: &[Segment],
    trip_start_date: Option<NaiveDate>,
) -> Vec<DailyLog> {
    let (first, last) = match (segments.first(), segments.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Vec::new(),
    };

    let first_date = first.start.date_naive();
    let end_date = last.end.date_naive();
    let start_date = trip_start_date.map_or(first_date, |d| d.max(first_date));

    let mut logs = Vec::new();
    let mut date = start_date;
    let mut day_number = 0u32;

    while date <= end_date {
        let day_start = date.and_time(NaiveTime::MIN).and_utc();
        let day_end = day_start + Duration::days(1);

        let mut entries: Vec<LogEntry> = Vec::new();
        let mut day_miles = 0.0;
        let mut remarks: Vec<String> = Vec::new();

        for seg in segments {
            let slice_start = seg.start.max(day_start);
            let slice_end = seg.end.min(day_end);
            if slice_start >= slice_end {
                continue;
            }

            let start_hour = hours_into_day(day_start, slice_start);
            let end_hour = hours_into_day(day_start, slice_end);

            entries.push(LogEntry {
                status: seg.duty_status,
                start_hour: round4(start_hour),
                end_hour: round4(end_hour),
                segment_type: seg.kind.as_str().to_string(),
            });

            // Apportion driven miles by the share of the segment on this day.
            if seg.duty_status == DutyStatus::Driving && seg.distance_miles > 0.0 {
                let seg_hours = seg.duration_hours();
                if seg_hours > 0.0 {
                    day_miles += seg.distance_miles * ((end_hour - start_hour) / seg_hours);
                }
            }

            if !seg.reason.is_empty() && slice_start >= seg.start {
                remarks.push(format!("{} - {}", slice_start.format("%H:%M"), seg.reason));
            }
        }

        let entries = fill_gaps(entries);

        // Totals come from the filled entries so the four statuses cover
        // the whole day.
        let mut totals = TotalHours::default();
        for entry in &entries {
            let duration = entry.end_hour - entry.start_hour;
            match entry.status {
                DutyStatus::OffDuty => totals.off_duty += duration,
                DutyStatus::SleeperBerth => totals.sleeper_berth += duration,
                DutyStatus::Driving => totals.driving += duration,
                DutyStatus::OnDutyNotDriving => totals.on_duty_not_driving += duration,
            }
        }
        totals.off_duty = round2(totals.off_duty);
        totals.sleeper_berth = round2(totals.sleeper_berth);
        totals.driving = round2(totals.driving);
        totals.on_duty_not_driving = round2(totals.on_duty_not_driving);

        day_number += 1;
        logs.push(DailyLog {
            date,
            day_number,
            entries,
            total_hours: totals,
            total_miles: round1(day_miles),
            remarks,
        });

        date = match date.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }

    logs
}

/// Fill any gaps in the 24-hour day with off-duty entries
fn fill_gaps(mut entries: Vec<LogEntry>) -> Vec<LogEntry> {
    if entries.is_empty() {
        return vec![off_duty_entry(0.0, 24.0)];
    }

    entries.sort_by(|a, b| a.start_hour.total_cmp(&b.start_hour));

    let mut filled = Vec::with_capacity(entries.len() + 2);
    let mut current_hour = 0.0;

    for entry in entries {
        if entry.start_hour > current_hour + GAP_TOLERANCE_HOURS {
            filled.push(off_duty_entry(current_hour, entry.start_hour));
        }
        current_hour = entry.end_hour;
        filled.push(entry);
    }

    if current_hour < 24.0 - GAP_TOLERANCE_HOURS {
        filled.push(off_duty_entry(current_hour, 24.0));
    }

    filled
}

fn off_duty_entry(start_hour: f64, end_hour: f64) -> LogEntry {
    LogEntry {
        status: DutyStatus::OffDuty,
        start_hour: round4(start_hour),
        end_hour: round4(end_hour),
        segment_type: "off_duty".to_string(),
    }
}

fn hours_into_day(day_start: DateTime<Utc>, t: DateTime<Utc>) -> f64 {
    (t - day_start).num_seconds() as f64 / 3600.0
}

fn round4(v: f64) -> f64 {
    (v * 10_000.0).round() / 10_000.0
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

// ===========================================================================
// Tests
// ===========================================================================
