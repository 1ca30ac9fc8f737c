use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

lazy_static! {
    // <free text> <DD/MM> <HH:MM or HHhMM> <duration>
    static ref COMMAND_RE: Regex = Regex::new(r"^(.+) (\d{2}/\d{2}) (\d{2}[h:]\d{2}) (\d+[hm]?)$")
        .expect("Failed to compile COMMAND_RE regex");
    static ref DATE_RE: Regex =
        Regex::new(r"^(\d{2})/(\d{2})$").expect("Failed to compile DATE_RE regex");
}

/// Structured form of a `/set` command. The year is never part of the
/// grammar; it is inferred later against the current date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleCommand {
    pub name: String,
    pub day: u32,
    pub month: u32,
    pub hour: u32,
    pub minute: u32,
    pub duration_minutes: i64,
}

/// Why a command failed to parse; each variant maps to its own usage hint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("command does not match the /set grammar")]
    InvalidFormat,
    #[error("date must be DD/MM")]
    InvalidDate,
    #[error("time must be HH:MM or HHhMM")]
    InvalidTime,
}

/// Parse the payload of a `/set` command (everything after `/set `).
///
/// Day/month values are not range-checked here; out-of-range dates are
/// rejected later when the calendar date is built.
pub fn parse_set_command(input: &str) -> Result<ScheduleCommand, ParseError> {
    let caps = COMMAND_RE
        .captures(input.trim())
        .ok_or(ParseError::InvalidFormat)?;

    let name = caps[1].to_string();

    let date_caps = DATE_RE.captures(&caps[2]).ok_or(ParseError::InvalidDate)?;
    let day = date_caps[1].parse::<u32>().map_err(|_| ParseError::InvalidDate)?;
    let month = date_caps[2].parse::<u32>().map_err(|_| ParseError::InvalidDate)?;

    let (hour, minute) = parse_time_token(&caps[3]).ok_or(ParseError::InvalidTime)?;

    let duration_minutes = parse_duration_token(&caps[4]).ok_or(ParseError::InvalidFormat)?;

    Ok(ScheduleCommand {
        name,
        day,
        month,
        hour,
        minute,
        duration_minutes,
    })
}

/// Parse a time token in HH:MM or HHhMM format
pub fn parse_time_token(time_str: &str) -> Option<(u32, u32)> {
    let separator = if time_str.contains('h') { 'h' } else { ':' };
    let parts: Vec<&str> = time_str.split(separator).collect();
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

/// Parse a duration token into minutes; a trailing `h` means hours,
/// a trailing `m` or bare digits mean minutes
pub fn parse_duration_token(duration_str: &str) -> Option<i64> {
    if let Some(hours) = duration_str.strip_suffix('h') {
        Some(hours.parse::<i64>().ok()? * 60)
    } else if let Some(minutes) = duration_str.strip_suffix('m') {
        minutes.parse::<i64>().ok()
    } else {
        duration_str.parse::<i64>().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Render a command back into its textual form
    fn format_command(cmd: &ScheduleCommand) -> String {
        format!(
            "{} {:02}/{:02} {:02}:{:02} {}",
            cmd.name, cmd.day, cmd.month, cmd.hour, cmd.minute, cmd.duration_minutes
        )
    }

    #[test]
    fn test_parse_set_command() {
        let cmd = parse_set_command("Dentist 29/05 14:30 1h").unwrap();
        assert_eq!(cmd.name, "Dentist");
        assert_eq!(cmd.day, 29);
        assert_eq!(cmd.month, 5);
        assert_eq!(cmd.hour, 14);
        assert_eq!(cmd.minute, 30);
        assert_eq!(cmd.duration_minutes, 60);

        // Multi-word names and the HHhMM time form
        let cmd = parse_set_command("Almoço com a equipe 01/12 12h00 90m").unwrap();
        assert_eq!(cmd.name, "Almoço com a equipe");
        assert_eq!(cmd.day, 1);
        assert_eq!(cmd.month, 12);
        assert_eq!(cmd.hour, 12);
        assert_eq!(cmd.minute, 0);
        assert_eq!(cmd.duration_minutes, 90);
    }

    #[test]
    fn test_parse_round_trip() {
        let original = ScheduleCommand {
            name: "Dentist".to_string(),
            day: 29,
            month: 5,
            hour: 14,
            minute: 30,
            duration_minutes: 60,
        };
        let reparsed = parse_set_command(&format_command(&original)).unwrap();
        assert_eq!(reparsed, original);
    }

    #[test]
    fn test_parse_invalid_format() {
        // Missing duration
        assert_eq!(
            parse_set_command("Dentist 29/05 14:30"),
            Err(ParseError::InvalidFormat)
        );
        // Single-digit day fails the outer pattern
        assert_eq!(
            parse_set_command("Dentist 9/05 14:30 1h"),
            Err(ParseError::InvalidFormat)
        );
        // No name
        assert_eq!(parse_set_command(""), Err(ParseError::InvalidFormat));
    }

    #[test]
    fn test_parse_invalid_time() {
        // Matches the outer pattern but the hour is out of range
        assert_eq!(
            parse_set_command("Dentist 29/05 25:00 1h"),
            Err(ParseError::InvalidTime)
        );
        assert_eq!(
            parse_set_command("Dentist 29/05 14h60 1h"),
            Err(ParseError::InvalidTime)
        );
    }

    #[test]
    fn test_parse_time_token() {
        assert_eq!(parse_time_token("14:30"), Some((14, 30)));
        assert_eq!(parse_time_token("14h30"), Some((14, 30)));
        assert_eq!(parse_time_token("00:00"), Some((0, 0)));
        assert_eq!(parse_time_token("23h59"), Some((23, 59)));

        assert_eq!(parse_time_token("24:00"), None); // Hour out of range
        assert_eq!(parse_time_token("12:60"), None); // Minute out of range
        assert_eq!(parse_time_token("14"), None); // No separator
        assert_eq!(parse_time_token("ab:30"), None); // Invalid hour
    }

    #[test]
    fn test_parse_duration_token() {
        assert_eq!(parse_duration_token("2h"), Some(120));
        assert_eq!(parse_duration_token("30m"), Some(30));
        assert_eq!(parse_duration_token("45"), Some(45));
        assert_eq!(parse_duration_token("h"), None);
        assert_eq!(parse_duration_token("abc"), None);
    }
}
