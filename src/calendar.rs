//! iCalendar export of a [`CyclePrediction`].

use chrono::{DateTime, NaiveDate, Utc};

use crate::models::CyclePrediction;

pub const PRODID: &str = "-//Menstrual Cycle Tracker//NONSGML v1.0//EN";

fn format_date(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

fn format_stamp(now: DateTime<Utc>) -> String {
    now.format("%Y%m%dT%H%M%SZ").to_string()
}

struct Event<'a> {
    uid_kind: &'a str,
    start: NaiveDate,
    end: Option<NaiveDate>,
    summary: &'a str,
    description: &'a str,
    category: &'a str,
}

impl Event<'_> {
    fn write_lines(&self, user_id: &str, stamp: &str, lines: &mut Vec<String>) {
        lines.push("BEGIN:VEVENT".into());
        lines.push(format!("UID:{}-{}-{}", user_id, self.uid_kind, format_date(self.start)));
        lines.push(format!("DTSTAMP:{}", stamp));
        lines.push(format!("DTSTART;VALUE=DATE:{}", format_date(self.start)));
        if let Some(end) = self.end {
            lines.push(format!("DTEND;VALUE=DATE:{}", format_date(end)));
        }
        lines.push(format!("SUMMARY:{}", self.summary));
        lines.push(format!("DESCRIPTION:{}", self.description));
        lines.push(format!("CATEGORIES:{}", self.category));
        lines.push("END:VEVENT".into());
    }
}

/// Serializes the predicted period start, ovulation and fertile window as
/// three all-day events. All events share one `DTSTAMP` taken from `now`.
///
/// Lines are CRLF-separated with no blank lines between components, as
/// RFC 5545 requires.
pub fn export_ics(prediction: &CyclePrediction, user_id: &str, now: DateTime<Utc>) -> String {
    let stamp = format_stamp(now);
    let events = [
        Event {
            uid_kind: "period",
            start: prediction.next_period_date,
            end: None,
            summary: "Period start",
            description: "Expected start of menstruation based on your cycle tracking",
            category: "MENSTRUATION",
        },
        Event {
            uid_kind: "ovulation",
            start: prediction.next_ovulation_date,
            end: None,
            summary: "Ovulation",
            description: "Expected ovulation - most fertile day",
            category: "OVULATION",
        },
        Event {
            uid_kind: "fertile-start",
            start: prediction.fertile_window_start,
            end: Some(prediction.fertile_window_end),
            summary: "Fertile window",
            description: "Fertile window - increased chance of pregnancy",
            category: "FERTILE",
        },
    ];

    let mut lines: Vec<String> = vec![
        "BEGIN:VCALENDAR".into(),
        "VERSION:2.0".into(),
        format!("PRODID:{}", PRODID),
        "CALSCALE:GREGORIAN".into(),
    ];
    for event in &events {
        event.write_lines(user_id, &stamp, &mut lines);
    }
    lines.push("END:VCALENDAR".into());

    lines.join("\r\n")
}
