use ratatui::crossterm::event::{self, KeyCode, KeyModifiers};

use crate::app::{App, AppMode, FILTER_ROWS};

// --- Helpers ---

/// Convert a char index to a byte offset within the string.
pub fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
  s.char_indices().nth(char_idx).map_or(s.len(), |(i, _)| i)
}

fn select_next(app: &mut App) {
  let count = app.view.len();
  if count > 0 {
    let i = app.list_state.selected().map_or(0, |i| (i + 1) % count);
    app.list_state.select(Some(i));
    app.pending_delete = None;
  }
}

fn select_prev(app: &mut App) {
  let count = app.view.len();
  if count > 0 {
    let i = app.list_state.selected().map_or(0, |i| if i == 0 { count - 1 } else { i - 1 });
    app.list_state.select(Some(i));
    app.pending_delete = None;
  }
}

// --- Event Handling ---

pub fn handle_key_event(app: &mut App, key: event::KeyEvent) {
  app.idle.poke();

  if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
    app.should_quit = true;
    return;
  }

  if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('t') {
    app.next_theme();
    return;
  }

  if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('r') {
    app.trigger_refresh();
    return;
  }

  match app.mode {
    AppMode::Results => handle_results_key(app, key),
    AppMode::Search => handle_search_key(app, key),
    AppMode::Filter => handle_filter_key(app, key),
  }
}

fn handle_results_key(app: &mut App, key: event::KeyEvent) {
  match key.code {
    KeyCode::Enter => {
      app.open_selected();
    }
    KeyCode::Char('/') => {
      app.mode = AppMode::Search;
      app.idle.stop();
    }
    KeyCode::Char('f') => {
      app.mode = AppMode::Filter;
      app.idle.stop();
    }
    KeyCode::Char('x') => {
      app.request_delete();
    }
    KeyCode::Down | KeyCode::Char('j') => select_next(app),
    KeyCode::Up | KeyCode::Char('k') => select_prev(app),
    KeyCode::Esc => {
      // Dismiss the innermost thing first: delete mark, then the active
      // search, then the app itself.
      if app.pending_delete.is_some() {
        app.pending_delete = None;
        app.status_message = None;
      } else if !app.search.is_empty() {
        app.search.clear();
        app.search_cursor = 0;
        app.search_scroll = 0;
        app.recompute_view();
      } else {
        app.should_quit = true;
      }
    }
    _ => {}
  }
}

fn handle_search_key(app: &mut App, key: event::KeyEvent) {
  app.clear_error();
  match key.code {
    KeyCode::Enter => {
      app.mode = AppMode::Results;
      app.idle.start();
    }
    KeyCode::Char(c) => {
      let byte_idx = char_to_byte_index(&app.search, app.search_cursor);
      app.search.insert(byte_idx, c);
      app.search_cursor += 1;
      app.recompute_view();
    }
    KeyCode::Backspace => {
      if app.search_cursor > 0 {
        app.search_cursor -= 1;
        let byte_idx = char_to_byte_index(&app.search, app.search_cursor);
        app.search.remove(byte_idx);
        app.recompute_view();
      }
    }
    KeyCode::Delete => {
      if app.search_cursor < app.search.chars().count() {
        let byte_idx = char_to_byte_index(&app.search, app.search_cursor);
        app.search.remove(byte_idx);
        app.recompute_view();
      }
    }
    KeyCode::Left => {
      app.search_cursor = app.search_cursor.saturating_sub(1);
    }
    KeyCode::Right => {
      if app.search_cursor < app.search.chars().count() {
        app.search_cursor += 1;
      }
    }
    KeyCode::Home => {
      app.search_cursor = 0;
    }
    KeyCode::End => {
      app.search_cursor = app.search.chars().count();
    }
    KeyCode::Down => select_next(app),
    KeyCode::Up => select_prev(app),
    KeyCode::Esc => {
      // Clear the search and return to the list.
      app.search.clear();
      app.search_cursor = 0;
      app.search_scroll = 0;
      app.recompute_view();
      app.mode = AppMode::Results;
      app.idle.start();
    }
    _ => {}
  }
}

fn handle_filter_key(app: &mut App, key: event::KeyEvent) {
  match key.code {
    KeyCode::Down | KeyCode::Char('j') => {
      app.filter_row = (app.filter_row + 1) % FILTER_ROWS;
    }
    KeyCode::Up | KeyCode::Char('k') => {
      app.filter_row = (app.filter_row + FILTER_ROWS - 1) % FILTER_ROWS;
    }
    KeyCode::Right | KeyCode::Char('l') => {
      app.cycle_filter_row(true);
    }
    KeyCode::Left | KeyCode::Char('h') => {
      app.cycle_filter_row(false);
    }
    KeyCode::Enter | KeyCode::Esc => {
      app.mode = AppMode::Results;
      app.idle.start();
    }
    _ => {}
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  // --- char_to_byte_index ---

  #[test]
  fn char_to_byte_ascii() {
    assert_eq!(char_to_byte_index("hello", 0), 0);
    assert_eq!(char_to_byte_index("hello", 3), 3);
    assert_eq!(char_to_byte_index("hello", 5), 5); // past end
  }

  #[test]
  fn char_to_byte_multibyte() {
    let s = "aé日"; // a=1 byte, é=2 bytes, 日=3 bytes
    assert_eq!(char_to_byte_index(s, 0), 0); // 'a'
    assert_eq!(char_to_byte_index(s, 1), 1); // 'é' starts at byte 1
    assert_eq!(char_to_byte_index(s, 2), 3); // '日' starts at byte 3
    assert_eq!(char_to_byte_index(s, 3), 6); // past end
  }

  #[test]
  fn char_to_byte_empty() {
    assert_eq!(char_to_byte_index("", 0), 0);
    assert_eq!(char_to_byte_index("", 5), 0);
  }
}
