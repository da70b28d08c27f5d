use chrono::{DateTime, Local, Utc};
use rand::Rng;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// `msg-<epoch millis>-<7 random base36 chars>`.
pub fn generate_id() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..7)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("msg-{}-{}", Utc::now().timestamp_millis(), suffix)
}

pub fn is_valid_message_text(text: &str) -> bool {
    crate::models::message::validate_text(text).is_ok()
}

/// Wall-clock time in the local zone, e.g. `3:07 PM`.
pub fn format_time(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%-I:%M %p").to_string()
}

pub fn format_relative_time(ts: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = (now - ts).num_milliseconds();
    if diff < 60_000 {
        return "Just now".to_string();
    }
    if diff < 3_600_000 {
        let mins = diff / 60_000;
        return format!("{} min{} ago", mins, if mins > 1 { "s" } else { "" });
    }
    if diff < 86_400_000 {
        let hours = diff / 3_600_000;
        return format!("{} hr{} ago", hours, if hours > 1 { "s" } else { "" });
    }
    format_time(ts)
}
