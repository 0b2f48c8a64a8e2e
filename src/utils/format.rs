//! Clock-style formatting of second counts

/// Format seconds as `MM:SS`. Minutes are not wrapped into hours.
pub fn format_clock(total_seconds: u64) -> String {
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}", minutes, seconds)
}

/// Format seconds as `HH:MM:SS`. Hours are not wrapped into days.
pub fn format_hms(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Parse either `MM:SS` or `HH:MM:SS` back into seconds.
///
/// The leading field is unbounded, every following field must be in `0..=59`.
pub fn parse_clock(text: &str) -> Option<u64> {
    let fields: Vec<&str> = text.split(':').collect();
    if !(2..=3).contains(&fields.len()) {
        return None;
    }

    let mut total: u64 = 0;
    for (index, field) in fields.iter().enumerate() {
        if field.len() < 2 || !field.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let value: u64 = field.parse().ok()?;
        if index > 0 && value > 59 {
            return None;
        }
        total = total.checked_mul(60)?.checked_add(value)?;
    }
    Some(total)
}
