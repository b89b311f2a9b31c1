use chrono::{DateTime, Datelike, Local, TimeZone};

const MONTHS: [&str; 12] = ["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sept", "Oct", "Nov", "Dec"];

/// Seconds to `MM:SS`, or `HH:MM:SS` for durations over an hour.
pub fn format_duration(seconds: f64) -> String {
  if !seconds.is_finite() || seconds < 0.0 {
    return "00:00".to_string();
  }
  let total = seconds as u64;
  let hours = total / 3600;
  let minutes = (total % 3600) / 60;
  let secs = total % 60;
  if hours > 0 { format!("{:02}:{:02}:{:02}", hours, minutes, secs) } else { format!("{:02}:{:02}", minutes, secs) }
}

/// YouTube `YYYYMMDD` upload date to `Jan 24, 2025`.
/// Input that doesn't fit the encoding is returned unchanged.
pub fn format_upload_date(date: &str) -> String {
  if date.len() != 8 || !date.bytes().all(|b| b.is_ascii_digit()) {
    return date.to_string();
  }
  let year = &date[0..4];
  // Safety: all-digit 8-char string, the slices parse.
  let month: usize = date[4..6].parse().unwrap_or(0);
  let day: u32 = date[6..8].parse().unwrap_or(0);
  if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
    return date.to_string();
  }
  format!("{} {}, {}", MONTHS[month - 1], day, year)
}

/// Unix timestamp to a relative age ("just now", "5 minutes ago", "3 hours
/// ago", "2 days ago"), or `Jan 24, 2025` once it's over a week old.
pub fn format_timestamp(timestamp: i64) -> String {
  format_timestamp_at(timestamp, Local::now())
}

fn format_timestamp_at(timestamp: i64, now: DateTime<Local>) -> String {
  let Some(date) = Local.timestamp_opt(timestamp, 0).single() else {
    return String::new();
  };
  let diff_secs = (now - date).num_seconds().max(0);

  if diff_secs < 24 * 60 * 60 {
    let hours = diff_secs / 3600;
    if hours < 1 {
      let minutes = diff_secs / 60;
      return if minutes <= 1 { "just now".to_string() } else { format!("{} minutes ago", minutes) };
    }
    return format!("{} {} ago", hours, if hours == 1 { "hour" } else { "hours" });
  }

  if diff_secs < 7 * 24 * 60 * 60 {
    let days = diff_secs / (24 * 60 * 60);
    return format!("{} {} ago", days, if days == 1 { "day" } else { "days" });
  }

  format!("{} {}, {}", MONTHS[date.month0() as usize], date.day(), date.year())
}

/// POSIX filepath to its parent directory, with the home prefix collapsed
/// to `~`. Empty input renders as "Local file".
pub fn format_local_path(filepath: &str) -> String {
  if filepath.is_empty() {
    return "Local file".to_string();
  }

  // Collapse /Users/<name>/ (macOS) or /home/<name>/ to ~/
  let collapsed = ["/Users/", "/home/"]
    .iter()
    .find_map(|prefix| {
      let rest = filepath.strip_prefix(prefix)?;
      let (_, tail) = rest.split_once('/')?;
      Some(format!("~/{}", tail))
    })
    .unwrap_or_else(|| filepath.to_string());

  // Parent directory without the filename
  match collapsed.rfind('/') {
    Some(idx) => collapsed[..idx].to_string(),
    None => collapsed,
  }
}

/// First char upper, the rest lower.
pub fn capitalize(s: &str) -> String {
  let mut chars = s.chars();
  match chars.next() {
    Some(first) => first.to_uppercase().chain(chars.as_str().to_lowercase().chars()).collect(),
    None => String::new(),
  }
}

/// Truncate a string to `max_width` characters, appending "…" if truncated.
pub fn truncate_str(s: &str, max_width: usize) -> String {
  if s.chars().count() <= max_width {
    s.to_string()
  } else {
    let truncated: String = s.chars().take(max_width.saturating_sub(1)).collect();
    format!("{}…", truncated)
  }
}
