use agendabot::components::google_calendar::agenda::format_agenda;
use agendabot::components::google_calendar::models::CalendarEvent;
use agendabot::error::BotResult;
use chrono::NaiveDate;
use chrono_tz::America::Sao_Paulo;

/// Mock implementation of the Google Calendar handle for testing
#[derive(Debug, Clone, Default)]
pub struct MockGoogleCalendarHandle {
    events: Vec<CalendarEvent>,
}

impl MockGoogleCalendarHandle {
    /// Create a new mock handle with predefined events
    pub fn new() -> Self {
        let events = vec![
            CalendarEvent {
                id: "event1".to_string(),
                summary: Some("Dentist".to_string()),
                location: Some("Av. Paulista, 1000".to_string()),
                // 14:30 in São Paulo (UTC-3)
                start_date_time: Some("2024-05-29T17:30:00Z".to_string()),
                end_date_time: Some("2024-05-29T18:30:00Z".to_string()),
                ..Default::default()
            },
            CalendarEvent {
                id: "event2".to_string(),
                summary: Some("Feriado".to_string()),
                start_date: Some("2024-05-29".to_string()),
                end_date: Some("2024-05-30".to_string()),
                ..Default::default()
            },
        ];

        Self { events }
    }

    /// List events from the mock
    pub async fn list_events(&self) -> BotResult<Vec<CalendarEvent>> {
        Ok(self.events.clone())
    }
}

#[tokio::test]
async fn test_agenda_formatting_with_mock_events() {
    rust_i18n::set_locale("pt-BR");

    let mock_handle = MockGoogleCalendarHandle::new();
    let events = mock_handle.list_events().await.unwrap();
    let reference_day = NaiveDate::from_ymd_opt(2024, 5, 29).unwrap();

    let message = format_agenda(&events, reference_day, Sao_Paulo);

    assert!(message.contains("29/05/2024"));

    // The timed event renders with its local time, the all-day event with
    // the literal marker, in input order
    let lines: Vec<&str> = message.lines().collect();
    let bullets: Vec<&str> = lines
        .iter()
        .filter(|l| l.starts_with('•'))
        .copied()
        .collect();
    assert_eq!(bullets.len(), 2);
    assert!(bullets[0].starts_with("• 14:30: *Dentist*"));
    assert!(bullets[0].contains("📍 Av. Paulista, 1000"));
    assert!(bullets[1].starts_with("• Dia inteiro: *Feriado*"));
}

#[tokio::test]
async fn test_agenda_formatting_empty() {
    rust_i18n::set_locale("pt-BR");

    let reference_day = NaiveDate::from_ymd_opt(2024, 5, 29).unwrap();
    let message = format_agenda(&[], reference_day, Sao_Paulo);

    assert_eq!(
        message,
        "📅 *29/05/2024*: Não há eventos agendados para hoje!"
    );
    assert!(!message.contains('•'));
}

#[tokio::test]
async fn test_agenda_unnamed_event_fallback() {
    rust_i18n::set_locale("pt-BR");

    let events = vec![CalendarEvent {
        id: "event3".to_string(),
        start_date_time: Some("2024-05-29T12:00:00Z".to_string()),
        ..Default::default()
    }];
    let reference_day = NaiveDate::from_ymd_opt(2024, 5, 29).unwrap();

    let message = format_agenda(&events, reference_day, Sao_Paulo);
    assert!(message.contains("*Evento sem título*"));
}
