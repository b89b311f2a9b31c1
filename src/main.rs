mod api;
mod app;
mod config;
mod constants;
mod format;
mod input;
mod theme;
mod ui;
mod vault;

use anyhow::Result;
use clap::Parser;
use directories::ProjectDirs;
use ratatui::{
  DefaultTerminal,
  crossterm::event::{self, Event, KeyEventKind},
};
use std::time::Duration;
use tracing::info;

use api::ApiClient;
use app::App;
use config::Config;
use constants::constants;

// --- CLI ---

#[derive(Parser, Debug)]
#[command(author, version = env!("CARGO_PKG_VERSION"), about = "Browse your processed-media vault in the terminal", long_about = None)]
struct Args {
  /// Vault server URL (default: the configured or built-in localhost address)
  #[arg(short, long)]
  server: Option<String>,

  /// Log filter directive, e.g. 'info' or 'zv=debug' (logs go to a file,
  /// since the terminal is taken over by the UI)
  #[arg(long, default_value = "info")]
  log_level: String,
}

/// Set up file logging under the project data dir. The returned guard must
/// stay alive for the duration of the program.
fn init_logging(directive: &str) -> Option<tracing_appender::non_blocking::WorkerGuard> {
  let proj_dirs = ProjectDirs::from("", "", "zv")?;
  let log_dir = proj_dirs.data_dir().join("logs");
  std::fs::create_dir_all(&log_dir).ok()?;

  let file_appender = tracing_appender::rolling::daily(log_dir, "zv.log");
  let (writer, guard) = tracing_appender::non_blocking(file_appender);
  tracing_subscriber::fmt()
    .with_writer(writer)
    .with_ansi(false)
    .with_env_filter(tracing_subscriber::EnvFilter::new(directive))
    .init();
  Some(guard)
}

// --- Main ---

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();
  let _log_guard = init_logging(&args.log_level);

  let server_url =
    args.server.or_else(|| Config::load().server_url).unwrap_or_else(|| constants().default_server_url.clone());
  info!(server = %server_url, "starting");

  let default_hook = std::panic::take_hook();
  std::panic::set_hook(Box::new(move |info| {
    ratatui::restore();
    default_hook(info);
  }));

  let mut terminal = ratatui::init();
  let result = run(&mut terminal, &server_url).await;
  ratatui::restore();
  result
}

async fn run(terminal: &mut DefaultTerminal, server_url: &str) -> Result<()> {
  let mut app = App::new(ApiClient::new(server_url));

  app.trigger_version();
  app.trigger_restore_filters();
  app.trigger_refresh();

  loop {
    app.check_pending();
    app.expire_error();

    terminal.draw(|frame| ui::ui(frame, &mut app))?;

    if event::poll(Duration::from_millis(constants().poll_interval_ms))? {
      match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
          input::handle_key_event(&mut app, key);
        }
        _ => {}
      }
    }

    if app.should_quit {
      break;
    }
  }

  Ok(())
}
