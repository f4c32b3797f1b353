use chrono::{DateTime, Utc};

/// `"jane.doe@identos.ca"` -> `"Jane Doe"`.
pub fn display_name(email: &str) -> String {
    let local = email.split('@').next().unwrap_or_default();
    local
        .split(['.', '_', '-'])
        .filter(|part| !part.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(part: &str) -> String {
    let mut chars = part.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn format_watered(date: Option<DateTime<Utc>>) -> String {
    match date {
        Some(date) => date.format("%A, %B %-d, %Y %H:%M UTC").to_string(),
        None => "Never".to_string(),
    }
}
