use super::models::CalendarEvent;
use super::time::event_start_in;
use chrono::NaiveDate;
use chrono_tz::Tz;
use rust_i18n::t;

/// Render one day's events into a localized Markdown block.
///
/// Events are assumed pre-sorted by start time; ordering is preserved.
/// All-day events render with a literal "all day" marker instead of a time.
pub fn format_agenda(events: &[CalendarEvent], reference_day: NaiveDate, tz: Tz) -> String {
    let formatted_date = reference_day.format("%d/%m/%Y").to_string();

    if events.is_empty() {
        return t!("agenda_empty", date = formatted_date).to_string();
    }

    let mut message = t!("agenda_header", date = formatted_date).to_string();
    message.push_str("\n\n");

    for event in events {
        let time_display = match event_start_in(tz, event) {
            Some(start) => start.format("%H:%M").to_string(),
            None => t!("agenda_all_day").to_string(),
        };

        let unnamed = t!("agenda_unnamed_event");
        let summary = event.summary.as_deref().unwrap_or(unnamed.as_ref());

        message.push_str(&format!("• {}: *{}*", time_display, summary));

        if let Some(location) = &event.location {
            message.push_str(&format!(" 📍 {}", location));
        }

        message.push('\n');
    }

    message
}
