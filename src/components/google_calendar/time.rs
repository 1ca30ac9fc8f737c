use super::models::CalendarEvent;
use crate::error::{time_error, BotResult};
use chrono::{DateTime, Datelike, Duration, LocalResult, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

/// Parse time string in HH:MM format
pub fn parse_time(time_str: &str) -> Option<(u32, u32)> {
    let parts: Vec<&str> = time_str.split(':').collect();
    if parts.len() != 2 {
        return None;
    }
    let hour = parts[0].parse::<u32>().ok()?;
    let minute = parts[1].parse::<u32>().ok()?;
    if hour > 23 || minute > 59 {
        return None;
    }
    Some((hour, minute))
}

/// Build a wall-clock datetime in the given zone.
///
/// An ambiguous local time (DST overlap) resolves to the earlier instant;
/// a nonexistent one (DST gap) is an error. Out-of-range day/month values
/// are rejected by the date constructor.
fn resolve_local(
    tz: Tz,
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
) -> BotResult<DateTime<Tz>> {
    let date = NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| time_error(&format!("Invalid date: {:02}/{:02}", day, month)))?;
    let naive = date
        .and_hms_opt(hour, minute, 0)
        .ok_or_else(|| time_error(&format!("Invalid time: {:02}:{:02}", hour, minute)))?;

    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt),
        LocalResult::Ambiguous(earlier, _) => Ok(earlier),
        LocalResult::None => Err(time_error(&format!(
            "Local time {} does not exist in {}",
            naive, tz
        ))),
    }
}

/// Normalize a year-less `(day, month, hour, minute)` command into an
/// absolute UTC start/end pair.
///
/// The candidate is built in the configured zone for the current year; if
/// it falls strictly before `now`, the year rolls forward by exactly one.
/// That comparison is the sole disambiguation rule for year-less input.
pub fn normalize_event_time(
    day: u32,
    month: u32,
    hour: u32,
    minute: u32,
    duration_minutes: i64,
    now: DateTime<Utc>,
    tz: Tz,
) -> BotResult<(DateTime<Utc>, DateTime<Utc>)> {
    let now_local = now.with_timezone(&tz);

    let mut candidate = resolve_local(tz, now_local.year(), month, day, hour, minute)?;

    // If the date is in the past, set it to next year
    if candidate < now_local {
        candidate = resolve_local(tz, now_local.year() + 1, month, day, hour, minute)?;
    }

    let start = candidate.with_timezone(&Utc);
    let end = start + Duration::minutes(duration_minutes);

    Ok((start, end))
}

/// UTC range covering the current calendar day in the given zone
pub fn day_bounds(now: DateTime<Utc>, tz: Tz) -> BotResult<(DateTime<Utc>, DateTime<Utc>)> {
    let today = now.with_timezone(&tz).date_naive();
    let tomorrow = today
        .checked_add_signed(Duration::days(1))
        .ok_or_else(|| time_error("Failed to compute next day"))?;

    let day_start = resolve_local(tz, today.year(), today.month(), today.day(), 0, 0)?;
    let day_end = resolve_local(tz, tomorrow.year(), tomorrow.month(), tomorrow.day(), 0, 0)?;

    Ok((day_start.with_timezone(&Utc), day_end.with_timezone(&Utc)))
}

/// Calculate the next daily notification instant for a HH:MM target time
pub fn next_notification_time(
    now: DateTime<Utc>,
    target_time: &str,
    tz: Tz,
) -> BotResult<DateTime<Utc>> {
    let (target_hour, target_minute) =
        parse_time(target_time).ok_or_else(|| time_error("Invalid time format"))?;

    let now_local = now.with_timezone(&tz);
    let today = now_local.date_naive();

    let mut next = resolve_local(
        tz,
        today.year(),
        today.month(),
        today.day(),
        target_hour,
        target_minute,
    )?;

    // If we've already passed the target time today, move to tomorrow
    if next <= now_local {
        let tomorrow = today
            .checked_add_signed(Duration::days(1))
            .ok_or_else(|| time_error("Failed to compute next day"))?;
        next = resolve_local(
            tz,
            tomorrow.year(),
            tomorrow.month(),
            tomorrow.day(),
            target_hour,
            target_minute,
        )?;
    }

    Ok(next.with_timezone(&Utc))
}

/// Get an event's start time localized to the given zone.
///
/// Returns `None` for all-day events, which carry a date instead of an
/// instant.
pub fn event_start_in(tz: Tz, event: &CalendarEvent) -> Option<DateTime<Tz>> {
    let start = event.start_date_time.as_deref()?;
    let dt = DateTime::parse_from_rfc3339(start).ok()?;
    Some(dt.with_timezone(&tz))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::America::Sao_Paulo;

    fn sao_paulo_now(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Sao_Paulo
            .with_ymd_and_hms(y, mo, d, h, mi, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_parse_time() {
        // Valid cases
        assert_eq!(parse_time("00:00"), Some((0, 0)));
        assert_eq!(parse_time("12:30"), Some((12, 30)));
        assert_eq!(parse_time("23:59"), Some((23, 59)));

        // Invalid cases
        assert_eq!(parse_time("24:00"), None); // Hour out of range
        assert_eq!(parse_time("12:60"), None); // Minute out of range
        assert_eq!(parse_time("12:30:45"), None); // Too many parts
        assert_eq!(parse_time("12"), None); // Too few parts
    }

    #[test]
    fn test_normalize_future_date_keeps_year() {
        let now = sao_paulo_now(2024, 5, 1, 10, 0);

        let (start, end) = normalize_event_time(29, 5, 14, 30, 60, now, Sao_Paulo).unwrap();

        let start_local = start.with_timezone(&Sao_Paulo);
        assert_eq!(
            start_local.format("%Y-%m-%d %H:%M").to_string(),
            "2024-05-29 14:30"
        );
        let end_local = end.with_timezone(&Sao_Paulo);
        assert_eq!(
            end_local.format("%Y-%m-%d %H:%M").to_string(),
            "2024-05-29 15:30"
        );
    }

    #[test]
    fn test_normalize_past_date_rolls_year_forward_once() {
        let now = sao_paulo_now(2024, 5, 1, 10, 0);

        // 30/04 has already passed, so it lands in 2025
        let (start, _) = normalize_event_time(30, 4, 9, 0, 30, now, Sao_Paulo).unwrap();
        let start_local = start.with_timezone(&Sao_Paulo);
        assert_eq!(
            start_local.format("%Y-%m-%d %H:%M").to_string(),
            "2025-04-30 09:00"
        );

        // Earlier the same day also rolls forward, by exactly one year
        let (start, _) = normalize_event_time(1, 5, 9, 59, 30, now, Sao_Paulo).unwrap();
        assert_eq!(start.with_timezone(&Sao_Paulo).year(), 2025);
    }

    #[test]
    fn test_normalize_now_does_not_roll() {
        // A candidate equal to "now" is not strictly earlier
        let now = sao_paulo_now(2024, 5, 1, 10, 0);
        let (start, _) = normalize_event_time(1, 5, 10, 0, 15, now, Sao_Paulo).unwrap();
        assert_eq!(start.with_timezone(&Sao_Paulo).year(), 2024);
    }

    #[test]
    fn test_normalize_converts_to_utc() {
        // São Paulo is UTC-3 year-round since 2019
        let now = sao_paulo_now(2024, 5, 1, 10, 0);
        let (start, _) = normalize_event_time(29, 5, 14, 30, 60, now, Sao_Paulo).unwrap();
        assert_eq!(start.format("%Y-%m-%dT%H:%M").to_string(), "2024-05-29T17:30");
    }

    #[test]
    fn test_normalize_rejects_impossible_date() {
        let now = sao_paulo_now(2024, 5, 1, 10, 0);
        assert!(normalize_event_time(31, 2, 10, 0, 30, now, Sao_Paulo).is_err());
        assert!(normalize_event_time(1, 13, 10, 0, 30, now, Sao_Paulo).is_err());
    }

    #[test]
    fn test_day_bounds() {
        let now = sao_paulo_now(2024, 5, 1, 10, 0);
        let (start, end) = day_bounds(now, Sao_Paulo).unwrap();

        assert_eq!(
            start.with_timezone(&Sao_Paulo).format("%Y-%m-%d %H:%M").to_string(),
            "2024-05-01 00:00"
        );
        assert_eq!(
            end.with_timezone(&Sao_Paulo).format("%Y-%m-%d %H:%M").to_string(),
            "2024-05-02 00:00"
        );
        assert_eq!(end - start, Duration::days(1));
    }

    #[test]
    fn test_next_notification_time() {
        let now = sao_paulo_now(2024, 5, 1, 10, 0);

        // Later today
        let next = next_notification_time(now, "15:30", Sao_Paulo).unwrap();
        assert_eq!(
            next.with_timezone(&Sao_Paulo).format("%Y-%m-%d %H:%M").to_string(),
            "2024-05-01 15:30"
        );

        // Already passed today, so tomorrow
        let next = next_notification_time(now, "09:30", Sao_Paulo).unwrap();
        assert_eq!(
            next.with_timezone(&Sao_Paulo).format("%Y-%m-%d %H:%M").to_string(),
            "2024-05-02 09:30"
        );

        // Invalid target
        assert!(next_notification_time(now, "25:00", Sao_Paulo).is_err());
    }

    #[test]
    fn test_event_start_in() {
        let event = CalendarEvent {
            id: "event1".to_string(),
            summary: Some("Timed".to_string()),
            start_date_time: Some("2024-05-29T17:30:00Z".to_string()),
            ..Default::default()
        };
        let start = event_start_in(Sao_Paulo, &event).unwrap();
        assert_eq!(start.format("%H:%M").to_string(), "14:30");

        // All-day events have no start instant
        let all_day = CalendarEvent {
            id: "event2".to_string(),
            start_date: Some("2024-05-29".to_string()),
            ..Default::default()
        };
        assert!(event_start_in(Sao_Paulo, &all_day).is_none());
    }
}
