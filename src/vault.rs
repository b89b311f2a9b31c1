//! Vault filtering and ranking.
//!
//! `apply_filters` is the one pure pipeline in the app: it takes the fetched
//! records, the active filter selections, and the search box contents, and
//! returns a fresh ordered list for the view. It never touches I/O or
//! app state, so the run loop can re-invoke it on every change.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::api::MediaItem;

// --- Filter state ---

/// Snapshot of the filter bar selections.
///
/// Values are open string tags straight from the UI cycle lists; anything
/// outside the known set behaves like "all". Serialized as-is to the
/// server's `vault_filters` setting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConfig {
  #[serde(default = "default_all")]
  pub source: String,
  #[serde(default = "default_all")]
  pub channel: String,
  #[serde(default = "default_order")]
  pub order_by: String,
  #[serde(default = "default_time")]
  pub time: String,
}

fn default_all() -> String {
  "all".to_string()
}

fn default_order() -> String {
  "date-added".to_string()
}

fn default_time() -> String {
  "newest".to_string()
}

impl Default for FilterConfig {
  fn default() -> Self {
    Self { source: default_all(), channel: default_all(), order_by: default_order(), time: default_time() }
  }
}

// --- Sort key resolution ---

/// Which record field drives chronological ordering.
/// Resolved once per `apply_filters` call from (source, order_by).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SortField {
  /// `finished_t` — when processing completed ("date added"), any source.
  FinishedAt,
  /// `date_uploaded` — YouTube upload date, lexically sortable YYYYMMDD.
  DateUploaded,
  /// `creation_timestamp` — local file creation time.
  CreatedAt,
}

impl SortField {
  fn resolve(config: &FilterConfig) -> Self {
    match (config.source.as_str(), config.order_by.as_str()) {
      ("youtube", "date-added") => SortField::FinishedAt,
      ("youtube", _) => SortField::DateUploaded,
      ("local", "date-added") => SortField::FinishedAt,
      ("local", _) => SortField::CreatedAt,
      // "all" and unrecognized sources always order by processing time.
      _ => SortField::FinishedAt,
    }
  }
}

/// One item's value under the active sort field.
/// Missing values order after present ones regardless of direction.
#[derive(Debug, Clone, PartialEq, Eq)]
enum SortKey {
  Numeric(i64),
  Lexical(String),
  Missing,
}

fn sort_key(item: &MediaItem, field: SortField) -> SortKey {
  match field {
    SortField::FinishedAt => item.finished_t.map_or(SortKey::Missing, SortKey::Numeric),
    SortField::CreatedAt => item.creation_timestamp.map_or(SortKey::Missing, SortKey::Numeric),
    SortField::DateUploaded => match item.date_uploaded {
      Some(ref d) if !d.is_empty() => SortKey::Lexical(d.clone()),
      _ => SortKey::Missing,
    },
  }
}

/// Compare two sort keys. "Missing sinks" lives here and only here: absent
/// values are Greater (later) than present ones in both directions, and two
/// absences are Equal so the stable sort preserves their filtered order.
fn compare_keys(a: &SortKey, b: &SortKey, newest: bool) -> Ordering {
  match (a, b) {
    (SortKey::Missing, SortKey::Missing) => Ordering::Equal,
    (SortKey::Missing, _) => Ordering::Greater,
    (_, SortKey::Missing) => Ordering::Less,
    (SortKey::Numeric(x), SortKey::Numeric(y)) => {
      if newest { y.cmp(x) } else { x.cmp(y) }
    }
    (SortKey::Lexical(x), SortKey::Lexical(y)) => {
      if newest { y.cmp(x) } else { x.cmp(y) }
    }
    // Mixed tags can't arise from a single field; leave the stable order alone.
    (SortKey::Numeric(_), SortKey::Lexical(_)) | (SortKey::Lexical(_), SortKey::Numeric(_)) => Ordering::Equal,
  }
}

// --- The pipeline ---

/// Filter the vault records and rank the survivors.
///
/// Stages, in order:
/// 1. source: keep iff the source selection is "all" or matches the item.
/// 2. channel: a no-op unless the *source selection* is "youtube" and a
///    specific channel is selected; the gate reads the filter config, not
///    the item, so with source "all" a selected channel filters nothing.
/// 3. search: trimmed, case-folded substring match on the title; items
///    without a title never match a non-empty search.
///
/// Ordering: with an active search, prefix matches rank first and ties fall
/// back to the case-folded title; otherwise the sort field resolved from the
/// config, missing values last, "newest" meaning descending. Keys are
/// computed once per item, and the sort is stable.
pub fn apply_filters(items: &[MediaItem], config: &FilterConfig, search_text: &str) -> Vec<MediaItem> {
  let search = search_text.trim().to_lowercase();

  let kept = items
    .iter()
    .filter(|item| config.source == "all" || item.source == config.source)
    .filter(|item| {
      if config.source != "youtube" || config.channel == "all" {
        return true;
      }
      item.channel.as_deref() == Some(config.channel.as_str())
    })
    .filter(|item| {
      if search.is_empty() {
        return true;
      }
      item.title.as_ref().is_some_and(|t| t.to_lowercase().contains(&search))
    })
    .cloned();

  if !search.is_empty() {
    // Relevance ordering: (not-a-prefix-match, folded title). Prefix
    // matches sort first; titleless items fold to "".
    let mut decorated: Vec<(bool, String, MediaItem)> = kept
      .map(|item| {
        let title = item.title.as_deref().unwrap_or("").to_lowercase();
        let starts = title.starts_with(&search);
        (!starts, title, item)
      })
      .collect();
    decorated.sort_by(|a, b| (a.0, &a.1).cmp(&(b.0, &b.1)));
    decorated.into_iter().map(|(_, _, item)| item).collect()
  } else {
    let field = SortField::resolve(config);
    let newest = config.time == "newest";
    let mut decorated: Vec<(SortKey, MediaItem)> = kept.map(|item| (sort_key(&item, field), item)).collect();
    decorated.sort_by(|a, b| compare_keys(&a.0, &b.0, newest));
    decorated.into_iter().map(|(_, item)| item).collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn item(id: &str, source: &str, title: Option<&str>) -> MediaItem {
    MediaItem { id: id.to_string(), source: source.to_string(), title: title.map(str::to_string), ..Default::default() }
  }

  fn yt(id: &str, title: &str, channel: &str, finished_t: Option<i64>, date_uploaded: Option<&str>) -> MediaItem {
    MediaItem {
      channel: Some(channel.to_string()),
      finished_t,
      date_uploaded: date_uploaded.map(str::to_string),
      ..item(id, "youtube", Some(title))
    }
  }

  fn local(id: &str, title: &str, finished_t: Option<i64>, creation_timestamp: Option<i64>) -> MediaItem {
    MediaItem { finished_t, creation_timestamp, ..item(id, "local", Some(title)) }
  }

  fn config(source: &str, channel: &str, order_by: &str, time: &str) -> FilterConfig {
    FilterConfig {
      source: source.to_string(),
      channel: channel.to_string(),
      order_by: order_by.to_string(),
      time: time.to_string(),
    }
  }

  fn ids(items: &[MediaItem]) -> Vec<&str> {
    items.iter().map(|i| i.id.as_str()).collect()
  }

  // --- source filter ---

  #[test]
  fn source_all_keeps_everything() {
    let items = [yt("a", "A", "c1", Some(1), None), local("b", "B", Some(2), None)];
    let out = apply_filters(&items, &FilterConfig::default(), "");
    assert_eq!(out.len(), 2);
  }

  #[test]
  fn source_specific_excludes_others() {
    let items = [yt("a", "A", "c1", Some(1), None), local("b", "B", Some(2), None)];
    let out = apply_filters(&items, &config("local", "all", "date-added", "newest"), "");
    assert_eq!(ids(&out), ["b"]);
  }

  #[test]
  fn source_is_an_open_tag() {
    // Sources outside the two known values still filter by plain string
    // equality, so new backend sources work without code changes.
    let items = [item("a", "podcast", Some("A")), local("b", "B", Some(2), None)];
    let out = apply_filters(&items, &config("podcast", "all", "date-added", "newest"), "");
    assert_eq!(ids(&out), ["a"]);
  }

  #[test]
  fn source_unrecognized_with_no_matching_items() {
    let items = [yt("a", "A", "c1", Some(1), None), local("b", "B", Some(2), None)];
    let out = apply_filters(&items, &config("vimeo", "all", "date-added", "newest"), "");
    assert!(out.is_empty());
  }

  #[test]
  fn source_unrecognized_sorts_by_finished_t() {
    // An unknown source selection falls through to the "all" sort field.
    let mut items = [item("old", "podcast", Some("A")), item("new", "podcast", Some("B"))];
    items[0].finished_t = Some(10);
    items[1].finished_t = Some(20);
    let out = apply_filters(&items, &config("podcast", "all", "date-created", "newest"), "");
    assert_eq!(ids(&out), ["new", "old"]);
  }

  // --- channel filter ---

  #[test]
  fn channel_applies_under_youtube_source() {
    let items = [yt("a", "A", "tech", Some(1), None), yt("b", "B", "music", Some(2), None)];
    let out = apply_filters(&items, &config("youtube", "tech", "date-added", "newest"), "");
    assert_eq!(ids(&out), ["a"]);
  }

  #[test]
  fn channel_missing_on_item_never_matches_specific() {
    let mut chanless = item("a", "youtube", Some("A"));
    chanless.finished_t = Some(1);
    let items = [chanless, yt("b", "B", "tech", Some(2), None)];
    let out = apply_filters(&items, &config("youtube", "tech", "date-added", "newest"), "");
    assert_eq!(ids(&out), ["b"]);
  }

  #[test]
  fn channel_noop_when_source_not_youtube() {
    // The channel gate reads the source *selection*, not the item: with
    // source "all" and a specific channel, the stage filters nothing — not
    // even youtube items from other channels.
    let items =
      [yt("a", "A", "music", Some(3), None), yt("b", "B", "tech", Some(2), None), local("c", "C", Some(1), None)];
    let out = apply_filters(&items, &config("all", "tech", "date-added", "newest"), "");
    assert_eq!(ids(&out), ["a", "b", "c"]);
  }

  #[test]
  fn channel_all_is_noop() {
    let items = [yt("a", "A", "tech", Some(2), None), yt("b", "B", "music", Some(1), None)];
    let out = apply_filters(&items, &config("youtube", "all", "date-added", "newest"), "");
    assert_eq!(out.len(), 2);
  }

  // --- search filter ---

  #[test]
  fn search_substring_case_folded() {
    let items = [yt("a", "Intro to Rust", "tech", Some(1), None), yt("b", "Cooking 101", "food", Some(2), None)];
    let out = apply_filters(&items, &FilterConfig::default(), "RUST");
    assert_eq!(ids(&out), ["a"]);
  }

  #[test]
  fn search_excludes_titleless_items() {
    let items = [item("a", "local", None), local("b", "Rust Talk", Some(1), None)];
    let out = apply_filters(&items, &FilterConfig::default(), "rust");
    assert_eq!(ids(&out), ["b"]);
  }

  #[test]
  fn search_whitespace_only_is_noop() {
    let items = [item("a", "local", None), local("b", "B", Some(1), None)];
    let out = apply_filters(&items, &FilterConfig::default(), "   ");
    assert_eq!(out.len(), 2);
  }

  #[test]
  fn search_trims_before_matching() {
    let items = [local("a", "Rust Talk", Some(1), None)];
    let out = apply_filters(&items, &FilterConfig::default(), "  rust  ");
    assert_eq!(ids(&out), ["a"]);
  }

  // --- relevance ordering ---

  #[test]
  fn relevance_prefix_match_wins_over_timestamps() {
    // Both titles contain the needle, but only "Banana" starts with it, so
    // it ranks first even though the other item is far newer.
    let items = [yt("apple", "Apple Banana Pie", "c", Some(999), None), yt("banana", "Banana", "c", Some(1), None)];
    let out = apply_filters(&items, &FilterConfig::default(), "ban");
    assert_eq!(ids(&out), ["banana", "apple"]);
  }

  #[test]
  fn relevance_same_tier_sorts_alphabetically() {
    let items = [
      yt("b", "Banjo Lessons", "c", Some(1), None),
      yt("a", "Bandit Documentary", "c", Some(2), None),
      yt("c", "Urban Banter", "c", Some(3), None),
      yt("d", "Rural Banter", "c", Some(4), None),
    ];
    let out = apply_filters(&items, &FilterConfig::default(), "ban");
    // Prefix tier alphabetical, then non-prefix tier alphabetical.
    assert_eq!(ids(&out), ["a", "b", "d", "c"]);
  }

  #[test]
  fn relevance_ordering_ignores_filter_config_sort() {
    let items = [yt("a", "Banana Old", "c", Some(1), None), yt("b", "Banana New", "c", Some(100), None)];
    let out = apply_filters(&items, &config("youtube", "all", "date-added", "newest"), "banana");
    // Alphabetical, not newest-first.
    assert_eq!(ids(&out), ["b", "a"]);
  }

  // --- chronological ordering ---

  #[test]
  fn newest_sorts_descending_by_finished_t() {
    let items = [local("old", "Old", Some(10), None), local("new", "New", Some(20), None)];
    let out = apply_filters(&items, &config("all", "all", "date-added", "newest"), "");
    assert_eq!(ids(&out), ["new", "old"]);
  }

  #[test]
  fn oldest_sorts_ascending_by_finished_t() {
    let items = [local("new", "New", Some(20), None), local("old", "Old", Some(10), None)];
    let out = apply_filters(&items, &config("all", "all", "date-added", "oldest"), "");
    assert_eq!(ids(&out), ["old", "new"]);
  }

  #[test]
  fn missing_field_sinks_in_both_directions() {
    let items = [item("a", "local", Some("A")), local("b", "B", Some(100), None)];
    for time in ["newest", "oldest"] {
      let out = apply_filters(&items, &config("all", "all", "date-added", time), "");
      assert_eq!(ids(&out), ["b", "a"], "direction {time}");
    }
  }

  #[test]
  fn two_missing_keep_filtered_order() {
    let items = [item("a", "local", Some("A")), item("b", "local", Some("B")), local("c", "C", Some(5), None)];
    for time in ["newest", "oldest"] {
      let out = apply_filters(&items, &config("all", "all", "date-added", time), "");
      assert_eq!(ids(&out), ["c", "a", "b"], "direction {time}");
    }
  }

  #[test]
  fn youtube_upload_date_compares_lexically() {
    let items = [
      yt("jan1", "A", "c", Some(999), Some("20240101")),
      yt("jan2", "B", "c", Some(1), Some("20240102")),
      yt("dec", "C", "c", Some(500), Some("20231231")),
    ];
    let out = apply_filters(&items, &config("youtube", "all", "date-created", "newest"), "");
    assert_eq!(ids(&out), ["jan2", "jan1", "dec"]);
    let out = apply_filters(&items, &config("youtube", "all", "date-created", "oldest"), "");
    assert_eq!(ids(&out), ["dec", "jan1", "jan2"]);
  }

  #[test]
  fn youtube_empty_upload_date_counts_as_missing() {
    let items = [yt("blank", "A", "c", Some(1), Some("")), yt("dated", "B", "c", Some(2), Some("20240101"))];
    let out = apply_filters(&items, &config("youtube", "all", "date-created", "newest"), "");
    assert_eq!(ids(&out), ["dated", "blank"]);
  }

  #[test]
  fn local_source_uses_creation_timestamp() {
    let items = [local("a", "A", Some(1), Some(50)), local("b", "B", Some(2), Some(100))];
    let out = apply_filters(&items, &config("local", "all", "date-created", "newest"), "");
    assert_eq!(ids(&out), ["b", "a"]);
  }

  #[test]
  fn source_all_always_uses_finished_t() {
    // Even with a non-default order_by, "all" orders by processing time.
    let items = [yt("a", "A", "c", Some(10), Some("20240105")), local("b", "B", Some(20), Some(1))];
    let out = apply_filters(&items, &config("all", "all", "date-created", "newest"), "");
    assert_eq!(ids(&out), ["b", "a"]);
  }

  // --- purity and stability ---

  #[test]
  fn inputs_are_not_mutated() {
    let items = [local("a", "A", Some(1), None), local("b", "B", Some(2), None)];
    let before = ids(&items);
    let _ = apply_filters(&items, &FilterConfig::default(), "");
    assert_eq!(ids(&items), before);
  }

  #[test]
  fn deterministic_across_calls() {
    let items = [
      yt("a", "Gamma", "c1", Some(3), Some("20240101")),
      yt("b", "Alpha", "c2", None, None),
      local("c", "Beta", Some(3), Some(7)),
    ];
    let cfg = config("all", "all", "date-added", "newest");
    let first = apply_filters(&items, &cfg, "");
    let second = apply_filters(&items, &cfg, "");
    assert_eq!(ids(&first), ids(&second));
  }

  #[test]
  fn idempotent_on_own_output() {
    let items = [
      yt("a", "Gamma", "c1", Some(3), None),
      yt("b", "Alpha", "c1", Some(9), None),
      yt("c", "Beta", "c1", None, None),
    ];
    let cfg = config("youtube", "c1", "date-added", "newest");
    let once = apply_filters(&items, &cfg, "");
    let twice = apply_filters(&once, &cfg, "");
    assert_eq!(ids(&once), ids(&twice));
  }

  #[test]
  fn empty_input_yields_empty_output() {
    assert!(apply_filters(&[], &FilterConfig::default(), "anything").is_empty());
  }

  // --- end to end ---

  #[test]
  fn vault_scenario_newest_by_date_added() {
    let items = [
      yt("intro", "Intro to Rust", "tech", Some(10), Some("20240105")),
      yt("basics", "Rust Basics", "tech", Some(20), Some("20240103")),
    ];
    let out = apply_filters(&items, &config("youtube", "tech", "date-added", "newest"), "");
    assert_eq!(ids(&out), ["basics", "intro"]);
  }

  // --- config defaults ---

  #[test]
  fn filter_config_defaults() {
    let cfg = FilterConfig::default();
    assert_eq!(cfg.source, "all");
    assert_eq!(cfg.channel, "all");
    assert_eq!(cfg.order_by, "date-added");
    assert_eq!(cfg.time, "newest");
  }

  #[test]
  fn filter_config_partial_json_fills_defaults() {
    // Settings restored from the server may predate newer fields.
    let cfg: FilterConfig = serde_json::from_str(r#"{"source": "youtube"}"#).unwrap();
    assert_eq!(cfg.source, "youtube");
    assert_eq!(cfg.channel, "all");
    assert_eq!(cfg.time, "newest");
  }
}
