//! Application constants loaded from `constants.ron` at compile time.
//!
//! The RON file is embedded via `include_str!` so it's always available —
//! no runtime file I/O. Parsed once on first access via `LazyLock`.

use serde::Deserialize;
use std::sync::LazyLock;

/// All tuneable application constants.
#[derive(Debug, Deserialize)]
pub struct Constants {
  // Vault server
  pub default_server_url: String,
  pub filters_setting_key: String,

  // Run loop
  pub poll_interval_ms: u64,
  pub error_expiry_secs: u64,

  // Footer chrome auto-hide
  pub idle_hide_secs: u64,

  // Filter bar option cycles
  pub source_options: Vec<String>,
  pub order_options: Vec<String>,
  pub time_options: Vec<String>,
}

static CONSTANTS: LazyLock<Constants> = LazyLock::new(|| {
  // Safety: the RON file is embedded at compile time; if it's malformed this is a build-time error.
  ron::from_str(include_str!("../constants.ron")).expect("constants.ron must be valid RON (embedded at compile time)")
});

/// Returns a reference to the parsed application constants.
pub fn constants() -> &'static Constants {
  &CONSTANTS
}
