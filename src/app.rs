use anyhow::Result;
use ratatui::widgets::ListState;
use serde_json::json;
use std::time::{Duration, Instant};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::api::{ApiClient, MediaItem, MediaPreviews};
use crate::config::Config;
use crate::constants::constants;
use crate::theme::THEMES;
use crate::vault::{FilterConfig, apply_filters};

// --- Types ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
  /// Navigating the vault list.
  Results,
  /// Editing the title search box.
  Search,
  /// Cycling the filter bar selections.
  Filter,
}

/// Rows of the filter bar, in display order: source, channel, order, time.
pub const FILTER_ROWS: usize = 4;

/// Hides the footer chrome after a stretch of keyboard inactivity.
///
/// Explicit lifecycle replaces the usual closure-over-timer approach: the
/// struct owns its armed flag and last-activity instant, the run loop calls
/// `poke` on every key event, and `start`/`stop` bracket the period where
/// hiding is wanted at all.
#[derive(Debug)]
pub struct IdleHide {
  armed: bool,
  last_activity: Instant,
  delay: Duration,
}

impl IdleHide {
  pub fn new(delay: Duration) -> Self {
    Self { armed: false, last_activity: Instant::now(), delay }
  }

  /// Arm the timer and reset the activity clock.
  pub fn start(&mut self) {
    self.armed = true;
    self.last_activity = Instant::now();
  }

  /// Disarm; `is_hidden` stays false until the next `start`.
  pub fn stop(&mut self) {
    self.armed = false;
  }

  /// Record activity, revealing the chrome again.
  pub fn poke(&mut self) {
    self.last_activity = Instant::now();
  }

  pub fn is_hidden(&self) -> bool {
    self.armed && self.last_activity.elapsed() >= self.delay
  }
}

/// In-flight async task receivers.
#[derive(Default)]
struct AsyncTasks {
  previews_rx: Option<oneshot::Receiver<Result<MediaPreviews>>>,
  restore_rx: Option<oneshot::Receiver<Option<FilterConfig>>>,
  version_rx: Option<oneshot::Receiver<Result<String>>>,
  delete_rx: Option<oneshot::Receiver<Result<Vec<String>>>>,
}

// --- App State ---

pub struct App {
  pub mode: AppMode,
  pub theme_index: usize,
  api: ApiClient,
  /// Last fetched previews payload, categorized by processing status.
  pub previews: MediaPreviews,
  /// Whether at least one previews fetch has completed.
  pub loaded: bool,
  /// Active filter bar selections.
  pub filters: FilterConfig,
  /// Which filter bar row is highlighted in Filter mode.
  pub filter_row: usize,
  /// Distinct channel titles across the fetched YouTube items, sorted.
  pub channels: Vec<String>,
  /// Raw search box contents (untrimmed; the engine trims).
  pub search: String,
  pub search_cursor: usize,
  pub search_scroll: usize,
  /// The engine's output; what the list renders.
  pub view: Vec<MediaItem>,
  pub list_state: ListState,
  pub last_error: Option<String>,
  pub status_message: Option<String>,
  pub server_version: Option<String>,
  pub should_quit: bool,
  /// Id awaiting a second `x` to confirm deletion.
  pub pending_delete: Option<String>,
  pub idle: IdleHide,
  tasks: AsyncTasks,
  error_time: Option<Instant>,
  config_server_url: Option<String>,
}

impl App {
  pub fn new(api: ApiClient) -> Self {
    let config = Config::load();
    let theme_index =
      if let Some(ref name) = config.theme_name { THEMES.iter().position(|t| t.name == name).unwrap_or(0) } else { 0 };

    let mut idle = IdleHide::new(Duration::from_secs(constants().idle_hide_secs));
    idle.start();

    Self {
      mode: AppMode::Results,
      theme_index,
      api,
      previews: MediaPreviews::default(),
      loaded: false,
      filters: FilterConfig::default(),
      filter_row: 0,
      channels: Vec::new(),
      search: String::new(),
      search_cursor: 0,
      search_scroll: 0,
      view: Vec::new(),
      list_state: ListState::default(),
      last_error: None,
      status_message: None,
      server_version: None,
      should_quit: false,
      pending_delete: None,
      idle,
      tasks: AsyncTasks::default(),
      error_time: None,
      config_server_url: config.server_url,
    }
  }

  pub fn theme(&self) -> &'static crate::theme::Theme {
    // Safety: theme_index is always bounded by modular arithmetic in next_theme()
    // and clamped to THEMES.len() - 1 on initialization.
    &THEMES[self.theme_index]
  }

  pub fn next_theme(&mut self) {
    self.theme_index = (self.theme_index + 1) % THEMES.len();
    self.save_config();
  }

  fn save_config(&self) {
    let config = Config { theme_name: Some(self.theme().name.to_string()), server_url: self.config_server_url.clone() };
    config.save();
  }

  /// Set an error message with auto-dismiss tracking.
  pub fn set_error(&mut self, msg: String) {
    self.last_error = Some(msg);
    self.error_time = Some(Instant::now());
  }

  /// Clear the current error message and its expiry timer.
  pub fn clear_error(&mut self) {
    self.last_error = None;
    self.error_time = None;
  }

  /// Clear stale error messages once they've been on screen long enough.
  pub fn expire_error(&mut self) {
    if let Some(t) = self.error_time
      && t.elapsed() >= Duration::from_secs(constants().error_expiry_secs)
    {
      self.last_error = None;
      self.error_time = None;
    }
  }

  // --- View recomputation ---

  /// Re-run the filter-rank engine over the fetched records and rebuild the
  /// channel cycle list. Called on every change to items, filters, or search
  /// text. Clamps the list selection to the new view.
  pub fn recompute_view(&mut self) {
    self.view = apply_filters(&self.previews.success, &self.filters, &self.search);

    let mut channels: Vec<String> =
      self.previews.success.iter().filter(|i| i.source == "youtube").filter_map(|i| i.channel.clone()).collect();
    channels.sort();
    channels.dedup();
    self.channels = channels;

    if self.view.is_empty() {
      self.list_state.select(None);
    } else {
      let sel = self.list_state.selected().unwrap_or(0);
      if sel >= self.view.len() {
        self.list_state.select(Some(self.view.len().saturating_sub(1)));
      } else if self.list_state.selected().is_none() {
        self.list_state.select(Some(0));
      }
    }
    self.pending_delete = None;
  }

  pub fn selected_item(&self) -> Option<&MediaItem> {
    self.view.get(self.list_state.selected()?)
  }

  // --- Filter bar ---

  /// Cycle the highlighted filter row forward or backward, then re-rank and
  /// persist the new configuration.
  pub fn cycle_filter_row(&mut self, forward: bool) {
    let c = constants();
    match self.filter_row {
      0 => self.filters.source = cycle(&c.source_options, &self.filters.source, forward),
      1 => {
        let mut options = vec!["all".to_string()];
        options.extend(self.channels.iter().cloned());
        self.filters.channel = cycle(&options, &self.filters.channel, forward);
      }
      2 => self.filters.order_by = cycle(&c.order_options, &self.filters.order_by, forward),
      _ => self.filters.time = cycle(&c.time_options, &self.filters.time, forward),
    }
    debug!(source = %self.filters.source, channel = %self.filters.channel,
      order_by = %self.filters.order_by, time = %self.filters.time, "filters changed");
    self.recompute_view();
    self.persist_filters();
  }

  /// Fire-and-forget save of the active filter configuration to the server.
  fn persist_filters(&self) {
    let api = self.api.clone();
    let value = json!(self.filters);
    tokio::spawn(async move {
      if let Err(e) = api.set_setting(&constants().filters_setting_key, &value).await {
        warn!(err = %e, "failed to persist filters");
      }
    });
  }

  // --- Async triggers ---

  /// Fetch (or re-fetch) the vault previews in the background.
  pub fn trigger_refresh(&mut self) {
    if !self.loaded {
      self.status_message = Some("Loading vault…".to_string());
    }
    let api = self.api.clone();
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
      let _ = tx.send(api.fetch_media_previews().await);
    });
    self.tasks.previews_rx = Some(rx);
  }

  /// Restore the persisted filter configuration from the server, if any.
  pub fn trigger_restore_filters(&mut self) {
    let api = self.api.clone();
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
      let restored = match api.get_setting(&constants().filters_setting_key).await {
        Ok(Some(value)) => serde_json::from_value::<FilterConfig>(value).ok(),
        Ok(None) => None,
        Err(e) => {
          debug!(err = %e, "filter restore skipped");
          None
        }
      };
      let _ = tx.send(restored);
    });
    self.tasks.restore_rx = Some(rx);
  }

  pub fn trigger_version(&mut self) {
    let api = self.api.clone();
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
      let _ = tx.send(api.server_version().await);
    });
    self.tasks.version_rx = Some(rx);
  }

  /// First `x` marks the selected item; a second `x` on the same item
  /// actually deletes it.
  pub fn request_delete(&mut self) {
    let Some(item) = self.selected_item() else { return };
    let id = item.id.clone();
    let title = item.title.clone().unwrap_or_else(|| id.clone());

    if self.pending_delete.as_deref() == Some(id.as_str()) {
      self.pending_delete = None;
      self.status_message = Some("Deleting…".to_string());
      let api = self.api.clone();
      let ids = vec![id];
      let (tx, rx) = oneshot::channel();
      tokio::spawn(async move {
        let result = api.delete_media_items(&ids).await.map(|_| ids);
        let _ = tx.send(result);
      });
      self.tasks.delete_rx = Some(rx);
    } else {
      self.pending_delete = Some(id);
      self.status_message = Some(format!("Press x again to delete '{}'", title));
    }
  }

  /// Open the selected item's playback page in the default browser.
  pub fn open_selected(&mut self) {
    let Some(item) = self.selected_item() else { return };
    let url = self.api.media_page_url(&item.id);
    info!(url = %url, "opening media page");

    // Use platform-appropriate command to open URL in default browser.
    #[cfg(target_os = "macos")]
    let cmd = "open";
    #[cfg(not(target_os = "macos"))]
    let cmd = "xdg-open";
    match std::process::Command::new(cmd)
      .arg(&url)
      .stdin(std::process::Stdio::null())
      .stdout(std::process::Stdio::null())
      .stderr(std::process::Stdio::null())
      .spawn()
    {
      Ok(mut child) => {
        // Reap the child in a background thread to avoid zombie processes.
        std::thread::spawn(move || {
          let _ = child.wait();
        });
      }
      Err(e) => {
        self.set_error(format!("Failed to open browser: {}", e));
      }
    }
  }

  // --- Polling ---

  pub fn check_pending(&mut self) {
    if let Some(mut rx) = self.tasks.previews_rx.take() {
      match rx.try_recv() {
        Ok(result) => {
          self.status_message = None;
          match result {
            Ok(previews) => {
              info!(
                success = previews.success.len(),
                queued = previews.queued.len(),
                failed = previews.failed.len(),
                "previews fetched"
              );
              self.previews = previews;
              self.loaded = true;
              self.recompute_view();
            }
            Err(e) => {
              self.set_error(format!("{:#}", e));
            }
          }
        }
        Err(oneshot::error::TryRecvError::Empty) => {
          self.tasks.previews_rx = Some(rx);
        }
        Err(oneshot::error::TryRecvError::Closed) => {
          self.status_message = None;
          self.set_error("Previews fetch task failed.".to_string());
        }
      }
    }

    if let Some(mut rx) = self.tasks.restore_rx.take() {
      match rx.try_recv() {
        Ok(Some(filters)) => {
          info!(?filters, "restored persisted filters");
          self.filters = filters;
          self.recompute_view();
        }
        Ok(None) => {}
        Err(oneshot::error::TryRecvError::Empty) => {
          self.tasks.restore_rx = Some(rx);
        }
        Err(oneshot::error::TryRecvError::Closed) => {}
      }
    }

    if let Some(mut rx) = self.tasks.version_rx.take() {
      match rx.try_recv() {
        Ok(Ok(version)) => {
          self.server_version = Some(version);
        }
        Ok(Err(e)) => {
          // Header just omits the version; not worth a visible error.
          debug!(err = %e, "version query failed");
        }
        Err(oneshot::error::TryRecvError::Empty) => {
          self.tasks.version_rx = Some(rx);
        }
        Err(oneshot::error::TryRecvError::Closed) => {}
      }
    }

    if let Some(mut rx) = self.tasks.delete_rx.take() {
      match rx.try_recv() {
        Ok(result) => {
          self.status_message = None;
          match result {
            Ok(ids) => {
              info!(count = ids.len(), "delete accepted");
              self.trigger_refresh();
            }
            Err(e) => {
              self.set_error(format!("Delete failed: {:#}", e));
            }
          }
        }
        Err(oneshot::error::TryRecvError::Empty) => {
          self.tasks.delete_rx = Some(rx);
        }
        Err(oneshot::error::TryRecvError::Closed) => {
          self.status_message = None;
          self.set_error("Delete task failed.".to_string());
        }
      }
    }
  }
}

// --- Helpers ---

/// Step to the next/previous entry of an option cycle, wrapping at the ends.
/// A current value not in the list lands on the first entry.
fn cycle(options: &[String], current: &str, forward: bool) -> String {
  if options.is_empty() {
    return current.to_string();
  }
  match options.iter().position(|o| o == current) {
    Some(idx) => {
      let next = if forward { (idx + 1) % options.len() } else { (idx + options.len() - 1) % options.len() };
      options[next].clone()
    }
    None => options[0].clone(),
  }
}
