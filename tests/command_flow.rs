use agendabot::commands::parser::parse_set_command;
use agendabot::commands::set_event::confirmation_message;
use agendabot::components::google_calendar::agenda::format_agenda;
use agendabot::components::google_calendar::models::CalendarEvent;
use agendabot::components::google_calendar::time::normalize_event_time;
use chrono::TimeZone;
use chrono::Utc;
use chrono_tz::America::Sao_Paulo;

/// Full `/set` pipeline: parse, normalize, confirm, same-day check.
///
/// Scenario: `/set Dentist 29/05 14:30 1h` issued when "now" is
/// 2024-05-01 10:00 in São Paulo.
#[test]
fn test_set_command_end_to_end() {
    rust_i18n::set_locale("pt-BR");

    let now = Sao_Paulo
        .with_ymd_and_hms(2024, 5, 1, 10, 0, 0)
        .unwrap()
        .with_timezone(&Utc);

    let text = "/set Dentist 29/05 14:30 1h";
    let payload = text.strip_prefix("/set ").unwrap();

    let cmd = parse_set_command(payload).unwrap();
    assert_eq!(cmd.name, "Dentist");
    assert_eq!((cmd.day, cmd.month), (29, 5));
    assert_eq!((cmd.hour, cmd.minute), (14, 30));
    assert_eq!(cmd.duration_minutes, 60);

    let (start, end) = normalize_event_time(
        cmd.day,
        cmd.month,
        cmd.hour,
        cmd.minute,
        cmd.duration_minutes,
        now,
        Sao_Paulo,
    )
    .unwrap();

    let start_local = start.with_timezone(&Sao_Paulo);
    let end_local = end.with_timezone(&Sao_Paulo);
    assert_eq!(
        start_local.format("%Y-%m-%dT%H:%M:%S").to_string(),
        "2024-05-29T14:30:00"
    );
    assert_eq!(
        end_local.format("%Y-%m-%dT%H:%M:%S").to_string(),
        "2024-05-29T15:30:00"
    );

    let confirmation = confirmation_message(
        &cmd,
        start_local,
        "https://calendar.google.com/event?eid=abc123",
    );
    assert!(confirmation.contains("*Dentist*"));
    assert!(confirmation.contains("29/05/2024"));
    assert!(confirmation.contains("14:30"));
    assert!(confirmation.contains("60 minutos"));
    assert!(confirmation.contains("https://calendar.google.com/event?eid=abc123"));

    // The event is not on the current day, so no agenda push would follow
    let today = now.with_timezone(&Sao_Paulo).date_naive();
    assert_ne!(start_local.date_naive(), today);
}

/// A same-day command triggers the agenda push branch, and the created
/// event shows up in the rendered agenda.
#[test]
fn test_same_day_command_renders_in_agenda() {
    rust_i18n::set_locale("pt-BR");

    let now = Sao_Paulo
        .with_ymd_and_hms(2024, 5, 1, 10, 0, 0)
        .unwrap()
        .with_timezone(&Utc);

    let cmd = parse_set_command("Reunião de equipe 01/05 15:00 30m").unwrap();
    let (start, _) = normalize_event_time(
        cmd.day,
        cmd.month,
        cmd.hour,
        cmd.minute,
        cmd.duration_minutes,
        now,
        Sao_Paulo,
    )
    .unwrap();

    let start_local = start.with_timezone(&Sao_Paulo);
    let today = now.with_timezone(&Sao_Paulo).date_naive();
    assert_eq!(start_local.date_naive(), today);

    // Backend would echo the created event back in the day listing
    let created = CalendarEvent {
        id: "created1".to_string(),
        summary: Some(cmd.name.clone()),
        start_date_time: Some(start.to_rfc3339()),
        ..Default::default()
    };

    let agenda = format_agenda(&[created], today, Sao_Paulo);
    assert!(agenda.contains("01/05/2024"));
    assert!(agenda.contains("• 15:00: *Reunião de equipe*"));
}

/// Parse failures map to the usage-hint branch without reaching the
/// normalizer
#[test]
fn test_invalid_command_is_rejected_before_normalization() {
    let result = parse_set_command("Dentist tomorrow 14:30 1h");
    assert!(result.is_err());
}
