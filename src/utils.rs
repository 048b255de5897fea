use std::time::Duration;

use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Url;

use crate::types::{ResolvedSong, SongTableRow};

/// Separator between title and artist in generated song strings.
pub const SONG_SEPARATOR: &str = " - ";

/// Removes a markdown code fence around a model answer.
///
/// Handles fences with or without a language tag (```` ```json ````) and any
/// prose before the opening fence. Text without a fence is only trimmed.
pub fn strip_code_fences(text: &str) -> String {
    let Some(start) = text.find("```") else {
        return text.trim().to_string();
    };

    let after = &text[start + 3..];
    let after = after.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
    let end = after.find("```").unwrap_or(after.len());

    after[..end].trim().to_string()
}

/// Splits a "Title - Artist" string into its title and artist.
///
/// Only the first separator splits, so artists containing " - " survive. A
/// string without separator yields the whole string as title and an empty artist.
pub fn split_song_query(query: &str) -> (String, String) {
    match query.split_once(SONG_SEPARATOR) {
        Some((name, artist)) => (name.trim().to_string(), artist.trim().to_string()),
        None => (query.trim().to_string(), String::new()),
    }
}

/// Extracts one parameter from a URL fragment such as `#key1=value1&key2=value2`.
///
/// The leading `#` is optional and values are percent-decoded. Empty values
/// count as absent.
pub fn fragment_param(fragment: &str, key: &str) -> Option<String> {
    let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
    if fragment.is_empty() {
        return None;
    }

    let url = Url::parse(&format!("http://localhost/?{}", fragment)).ok()?;
    url.query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
        .filter(|v| !v.is_empty())
}

pub fn song_table_rows(songs: &[ResolvedSong]) -> Vec<SongTableRow> {
    songs
        .iter()
        .enumerate()
        .map(|(i, s)| SongTableRow {
            index: i + 1,
            name: s.name.clone(),
            artist: s.artist.clone(),
            preview: if s.preview_url.is_some() { "yes" } else { "-" }.to_string(),
        })
        .collect()
}

pub fn now_timestamp() -> u64 {
    Utc::now().timestamp() as u64
}

/// Formats a unix timestamp as `YYYY-MM-DD HH:MM:SS UTC`.
pub fn format_timestamp(timestamp: u64) -> String {
    DateTime::<Utc>::from_timestamp(timestamp as i64, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

/// Steady-ticking spinner shown while a provider call is in flight.
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}
