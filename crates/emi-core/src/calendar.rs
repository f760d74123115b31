//! Calendar export: a Google Calendar deep link for the monthly EMI reminder.
//!
//! The link describes one recurring event (monthly, `COUNT` = number of
//! installments) with the payment list in its description. Pure string
//! construction; nothing is opened or sent.

use chrono::{Datelike, Months, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::amortization::schedule::Installment;
use crate::error::EmiError;
use crate::format::format_inr;
use crate::EmiResult;

const GOOGLE_CALENDAR_RENDER_URL: &str = "https://calendar.google.com/calendar/render";
const EVENT_START_HOUR: u32 = 10;
const EVENT_END_HOUR: u32 = 11;
/// Highest day that exists in every month.
pub const MAX_PAYMENT_DAY: u32 = 28;
pub const DEFAULT_EVENT_TITLE: &str = "EMI Payment";

fn default_title() -> String {
    DEFAULT_EVENT_TITLE.to_string()
}

fn default_day() -> u32 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarRequest {
    #[serde(default = "default_title")]
    pub title: String,
    /// Day of month for the reminder; clamped to 1..=28.
    #[serde(default = "default_day")]
    pub day_of_month: u32,
    /// Any date in the month of the first payment.
    pub start_month: NaiveDate,
}

/// A recurring reminder. Event times are UTC: the link carries them as
/// `...Z` stamps, so 10:00 here is 10:00 UTC, not local time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarInvite {
    pub url: String,
    pub title: String,
    pub description: String,
    /// 10:00 UTC on the first payment day.
    pub first_event_start: NaiveDateTime,
    pub first_event_end: NaiveDateTime,
    pub last_event_end: NaiveDateTime,
    pub day_of_month: u32,
    pub occurrences: u32,
}

/// Build the recurring-event link for a schedule.
pub fn calendar_link(schedule: &[Installment], request: &CalendarRequest) -> EmiResult<CalendarInvite> {
    let first = schedule.first().ok_or_else(|| EmiError::InvalidInput {
        field: "schedule".into(),
        reason: "Cannot schedule reminders for an empty schedule".into(),
    })?;
    let occurrences = schedule.len() as u32;
    let day = request.day_of_month.clamp(1, MAX_PAYMENT_DAY);

    let first_day = NaiveDate::from_ymd_opt(request.start_month.year(), request.start_month.month(), day)
        .ok_or_else(|| EmiError::DateError(format!("invalid payment day {day}")))?;
    let last_day = first_day
        .checked_add_months(Months::new(occurrences - 1))
        .ok_or_else(|| EmiError::DateError(format!("{occurrences} months past {first_day} is out of range")))?;

    let first_event_start = at_hour(first_day, EVENT_START_HOUR)?;
    let first_event_end = at_hour(first_day, EVENT_END_HOUR)?;
    let last_event_end = at_hour(last_day, EVENT_END_HOUR)?;

    let title = format!("{} - {}", request.title, format_inr(first.payment));
    let description = describe(schedule);

    // The dates pair spans the first event's start to the last occurrence's end.
    let url = format!(
        "{GOOGLE_CALENDAR_RENDER_URL}?action=TEMPLATE&text={}&dates={}/{}&recurrence=RRULE:FREQ=MONTHLY;COUNT={occurrences}&details={}",
        urlencoding::encode(&title),
        calendar_timestamp(&first_event_start),
        calendar_timestamp(&last_event_end),
        urlencoding::encode(&description),
    );

    Ok(CalendarInvite {
        url,
        title,
        description,
        first_event_start,
        first_event_end,
        last_event_end,
        day_of_month: day,
        occurrences,
    })
}

fn describe(schedule: &[Installment]) -> String {
    let first_payment = schedule.first().map(|i| i.payment).unwrap_or_default();
    let lines: Vec<String> = schedule
        .iter()
        .map(|i| format!("Month {}: {}", i.installment, format_inr(i.payment)))
        .collect();

    format!(
        "Monthly Loan Payment Details:\n\nAmount: {}\nTotal Installments: {}\n\nPayment Schedule:\n{}",
        format_inr(first_payment),
        schedule.len(),
        lines.join("\n"),
    )
}

fn at_hour(date: NaiveDate, hour: u32) -> EmiResult<NaiveDateTime> {
    date.and_hms_opt(hour, 0, 0)
        .ok_or_else(|| EmiError::DateError(format!("invalid hour {hour}")))
}

/// Format a UTC time for the `dates` parameter.
fn calendar_timestamp(at: &NaiveDateTime) -> String {
    at.format("%Y%m%dT%H%M%SZ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amortization::schedule::compute_schedule;
    use rust_decimal_macros::dec;

    fn request(day: u32) -> CalendarRequest {
        CalendarRequest {
            title: DEFAULT_EVENT_TITLE.into(),
            day_of_month: day,
            start_month: NaiveDate::from_ymd_opt(2026, 11, 18).unwrap(),
        }
    }

    #[test]
    fn test_link_for_one_year_loan() {
        let s = compute_schedule(dec!(100000), 12, dec!(10)).unwrap();
        let invite = calendar_link(&s, &request(5)).unwrap();

        assert_eq!(invite.occurrences, 12);
        assert_eq!(invite.title, "EMI Payment - ₹8,791.59");
        assert!(invite
            .url
            .starts_with("https://calendar.google.com/calendar/render?action=TEMPLATE&text="));
        assert!(invite.url.contains("&dates=20261105T100000Z/20271005T110000Z"));
        assert!(invite.url.contains("&recurrence=RRULE:FREQ=MONTHLY;COUNT=12"));
        assert!(invite.url.contains("text=EMI%20Payment%20-%20%E2%82%B98%2C791.59"));
    }

    #[test]
    fn test_description_lists_every_month() {
        let s = compute_schedule(dec!(100000), 12, dec!(10)).unwrap();
        let invite = calendar_link(&s, &request(1)).unwrap();

        assert!(invite
            .description
            .starts_with("Monthly Loan Payment Details:\n\nAmount: ₹8,791.59\nTotal Installments: 12\n\nPayment Schedule:\nMonth 1: ₹8,791.59\n"));
        assert!(invite.description.ends_with("Month 12: ₹8,791.56"));
        assert_eq!(invite.description.matches("Month ").count(), 12);
    }

    #[test]
    fn test_day_is_clamped() {
        let s = compute_schedule(dec!(5000), 3, dec!(0)).unwrap();
        assert_eq!(calendar_link(&s, &request(31)).unwrap().day_of_month, 28);
        assert_eq!(calendar_link(&s, &request(0)).unwrap().day_of_month, 1);
    }

    #[test]
    fn test_single_installment_spans_one_day() {
        let s = compute_schedule(dec!(1000), 1, dec!(12)).unwrap();
        let invite = calendar_link(&s, &request(15)).unwrap();
        assert!(invite.url.contains("&dates=20261115T100000Z/20261115T110000Z"));
        assert!(invite.url.contains("COUNT=1&"));
    }

    #[test]
    fn test_event_times_are_utc_stamps() {
        let s = compute_schedule(dec!(5000), 3, dec!(0)).unwrap();
        let invite = calendar_link(&s, &request(5)).unwrap();
        let day = NaiveDate::from_ymd_opt(2026, 11, 5).unwrap();

        assert_eq!(invite.first_event_start, day.and_hms_opt(10, 0, 0).unwrap());
        assert_eq!(invite.first_event_end, day.and_hms_opt(11, 0, 0).unwrap());
        assert_eq!(calendar_timestamp(&invite.first_event_start), "20261105T100000Z");
        assert!(invite.url.contains("&dates=20261105T100000Z/20270105T110000Z&"));
    }

    #[test]
    fn test_empty_schedule_rejected() {
        assert!(calendar_link(&[], &request(1)).unwrap_err().is_validation());
    }

    #[test]
    fn test_request_defaults_from_json() {
        let req: CalendarRequest = serde_json::from_str(r#"{"start_month": "2026-01-31"}"#).unwrap();
        assert_eq!(req.title, "EMI Payment");
        assert_eq!(req.day_of_month, 1);
    }
}
