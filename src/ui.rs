use ratatui::{
  Frame,
  layout::{Alignment, Constraint, Layout, Rect},
  style::{Modifier, Style, Stylize},
  text::{Line, Span},
  widgets::{Block, List, ListItem, Padding, Paragraph},
};

use crate::api::MediaItem;
use crate::app::{App, AppMode};
use crate::format::{capitalize, format_duration, format_local_path, format_timestamp, format_upload_date, truncate_str};
use crate::theme::Theme;

// --- Helpers ---

/// Compute the display width of the first `n` chars (accounting for double-width CJK).
pub fn display_width(s: &str, n: usize) -> usize {
  use unicode_width::UnicodeWidthChar;
  s.chars().take(n).map(|c| c.width().unwrap_or(0)).sum()
}

/// Channel title for YouTube items, collapsed parent directory for local ones.
fn item_origin(item: &MediaItem) -> String {
  if item.source == "youtube" {
    item.channel.clone().unwrap_or_else(|| "YouTube".to_string())
  } else {
    format_local_path(item.uri.as_deref().unwrap_or(""))
  }
}

/// The date column: upload date for YouTube, creation time for local files,
/// processing time as the fallback for either.
fn item_date(item: &MediaItem) -> String {
  if item.source == "youtube"
    && let Some(ref date) = item.date_uploaded
    && !date.is_empty()
  {
    return format_upload_date(date);
  }
  if item.source == "local"
    && let Some(ts) = item.creation_timestamp
  {
    return format_timestamp(ts);
  }
  item.finished_t.map(format_timestamp).unwrap_or_default()
}

// --- UI Rendering ---

pub fn ui(frame: &mut Frame, app: &mut App) {
  let theme = app.theme();
  frame.render_widget(Block::default().style(Style::default().bg(theme.bg)), frame.area());

  let [header_area, filter_area, main_area, status_area, input_area, footer_area] = Layout::vertical([
    Constraint::Length(1),
    Constraint::Length(1),
    Constraint::Min(3),
    Constraint::Length(1),
    Constraint::Length(3),
    Constraint::Length(1),
  ])
  .areas(frame.area());

  render_header(frame, app, header_area);
  render_filter_bar(frame, app, filter_area);
  render_main(frame, app, main_area);
  render_status(frame, app, status_area);
  render_search_input(frame, app, input_area);
  render_footer(frame, app, footer_area);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let left = Line::from(Span::styled(" ◆ zv ", Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)));
  frame.render_widget(left, area);

  let right = match &app.server_version {
    Some(server) => format!("v{} · vault v{} ", env!("CARGO_PKG_VERSION"), server),
    None => format!("v{} ", env!("CARGO_PKG_VERSION")),
  };
  let right_area = Rect { x: area.x + area.width.saturating_sub(right.len() as u16), width: right.len() as u16, ..area };
  frame.render_widget(Line::from(Span::styled(&right, Style::default().fg(theme.muted))), right_area);
}

fn render_filter_bar(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let rows: [(&str, String); 4] = [
    ("Source", capitalize(&app.filters.source)),
    ("Channel", app.filters.channel.clone()),
    ("Order", app.filters.order_by.clone()),
    ("Time", app.filters.time.clone()),
  ];

  let mut spans = vec![Span::raw(" ")];
  for (i, (label, value)) in rows.iter().enumerate() {
    let active = app.mode == AppMode::Filter && app.filter_row == i;
    let label_style =
      if active { Style::default().fg(theme.accent).add_modifier(Modifier::BOLD) } else { Style::default().fg(theme.muted) };
    let value_style = if active {
      Style::default().fg(theme.highlight_fg).bg(theme.highlight_bg).add_modifier(Modifier::BOLD)
    } else {
      Style::default().fg(theme.fg)
    };
    spans.push(Span::styled(format!("{}: ", label), label_style));
    spans.push(Span::styled(format!(" {} ", value), value_style));
    spans.push(Span::raw("  "));
  }

  if !app.search.trim().is_empty() {
    spans.push(Span::styled(format!("Search: \"{}\"", app.search.trim()), Style::default().fg(theme.status)));
  }

  frame.render_widget(Line::from(spans), area);
}

fn render_main(frame: &mut Frame, app: &mut App, area: Rect) {
  if !app.loaded {
    render_welcome(frame, app.theme(), area, "Connecting to the vault…");
  } else if app.previews.success.is_empty() {
    render_welcome(frame, app.theme(), area, "The vault is empty. Add media from the web UI.");
  } else {
    render_results(frame, app, area);
  }
}

fn render_welcome(frame: &mut Frame, theme: &Theme, area: Rect, message: &str) {
  let text = vec![
    Line::from(""),
    Line::from(Span::styled("◆  zv — your processed-media vault", Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))),
    Line::from(""),
    Line::from(Span::styled(message, Style::default().fg(theme.fg))),
  ];
  let paragraph = Paragraph::new(text).alignment(Alignment::Center).block(
    Block::bordered()
      .border_type(ratatui::widgets::BorderType::Rounded)
      .border_style(Style::default().fg(theme.border)),
  );
  frame.render_widget(paragraph, area);
}

fn render_results(frame: &mut Frame, app: &mut App, area: Rect) {
  let theme = app.theme();

  if app.view.is_empty() {
    let paragraph = Paragraph::new(Line::from(Span::styled(
      "No items match the current filters.",
      Style::default().fg(theme.muted),
    )))
    .alignment(Alignment::Center)
    .block(
      Block::bordered()
        .title(" Vault ")
        .title_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))
        .border_type(ratatui::widgets::BorderType::Rounded)
        .border_style(Style::default().fg(theme.border)),
    );
    frame.render_widget(paragraph, area);
    return;
  }

  // Inner width: area minus 2 borders minus 2 chars for highlight symbol ("▶ ")
  let inner_w = area.width.saturating_sub(4) as usize;

  let items: Vec<ListItem> = app
    .view
    .iter()
    .enumerate()
    .map(|(i, item)| {
      let is_selected = Some(i) == app.list_state.selected();
      let fg = if is_selected { theme.highlight_fg } else { theme.fg };
      let bg = if is_selected {
        theme.highlight_bg
      } else if i % 2 == 1 {
        theme.stripe_bg
      } else {
        theme.bg
      };

      let title = item.title.clone().unwrap_or_else(|| "Untitled".to_string());
      let marked = app.pending_delete.as_deref() == Some(item.id.as_str());

      // Right-side metadata: "duration  origin  date", parts present as available
      let mut right_parts: Vec<String> = Vec::new();
      if let Some(duration) = item.duration {
        right_parts.push(format_duration(duration));
      }
      let origin = item_origin(item);
      if !origin.is_empty() {
        right_parts.push(origin);
      }
      let date = item_date(item);
      if !date.is_empty() {
        right_parts.push(date);
      }
      let right = right_parts.join("  ");

      let title_style =
        if marked { Style::default().fg(theme.error).add_modifier(Modifier::CROSSED_OUT) } else { Style::default().fg(fg) };

      let line = if right.is_empty() {
        Line::from(Span::styled(truncate_str(&title, inner_w), title_style))
      } else {
        // Reserve space for right side + 2-char gap
        let right_w = right.chars().count();
        let title_max = inner_w.saturating_sub(right_w + 2);
        let title = truncate_str(&title, title_max);
        let title_w = title.chars().count();
        let gap = inner_w.saturating_sub(title_w + right_w);

        Line::from(vec![
          Span::styled(title, title_style),
          Span::raw(" ".repeat(gap)),
          Span::styled(right, Style::default().fg(theme.muted)),
        ])
      };

      ListItem::new(line).bg(bg)
    })
    .collect();

  let title = format!(" Vault — {} of {} ", app.view.len(), app.previews.success.len());
  let list = List::new(items)
    .block(
      Block::bordered()
        .title(title)
        .title_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))
        .border_type(ratatui::widgets::BorderType::Rounded)
        .border_style(Style::default().fg(theme.border)),
    )
    .highlight_symbol("▶ ")
    .highlight_style(Style::default().fg(theme.highlight_fg).bg(theme.highlight_bg).add_modifier(Modifier::BOLD));

  frame.render_stateful_widget(list, area, &mut app.list_state);
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let (text, style) = if let Some(msg) = &app.status_message {
    (format!(" ⏳ {}", msg), Style::default().fg(theme.status))
  } else if let Some(err) = &app.last_error {
    (format!(" ⚠  {}", err), Style::default().fg(theme.error))
  } else if app.loaded {
    let p = &app.previews;
    let mut parts = vec![format!("{} processed", p.success.len())];
    if !p.processing.is_empty() {
      parts.push(format!("{} processing", p.processing.len()));
    }
    if !p.queued.is_empty() {
      parts.push(format!("{} queued", p.queued.len()));
    }
    if !p.failed.is_empty() {
      parts.push(format!("{} failed", p.failed.len()));
    }
    (format!(" {}", parts.join(" · ")), Style::default().fg(theme.muted))
  } else {
    (" Ready".to_string(), Style::default().fg(theme.muted))
  };
  frame.render_widget(Paragraph::new(text).style(style), area);
}

fn render_search_input(frame: &mut Frame, app: &mut App, area: Rect) {
  let theme = app.theme();
  let border_color = if app.mode == AppMode::Search { theme.accent } else { theme.border };
  let input_block = Block::bordered()
    .title(" Search titles ")
    .title_style(Style::default().fg(border_color))
    .border_type(ratatui::widgets::BorderType::Rounded)
    .border_style(Style::default().fg(border_color))
    .padding(Padding::horizontal(1));

  let inner_w = area.width.saturating_sub(4) as usize;
  let cursor_col = display_width(&app.search, app.search_cursor);

  if cursor_col < app.search_scroll {
    app.search_scroll = cursor_col;
  } else if cursor_col >= app.search_scroll + inner_w {
    app.search_scroll = cursor_col.saturating_sub(inner_w) + 1;
  }

  let visible: String = app
    .search
    .chars()
    .scan(0usize, |col, c| {
      let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
      let start = *col;
      *col += w;
      Some((start, *col, c))
    })
    .skip_while(|(_, end, _)| *end <= app.search_scroll)
    .take_while(|(start, _, _)| *start < app.search_scroll + inner_w)
    .map(|(_, _, c)| c)
    .collect();

  let paragraph = Paragraph::new(visible).style(Style::default().fg(theme.fg)).block(input_block);
  frame.render_widget(paragraph, area);

  if app.mode == AppMode::Search {
    let cursor_x = area.x + 2 + (cursor_col - app.search_scroll) as u16;
    frame.set_cursor_position((cursor_x, area.y + 1));
  }
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();

  // Chrome auto-hides after a stretch of inactivity; any key brings it back.
  if app.idle.is_hidden() {
    return;
  }

  let keys: Vec<(&str, &str)> = match app.mode {
    AppMode::Results => {
      vec![
        ("Enter", "Open"),
        ("j/k", "Navigate"),
        ("/", "Search"),
        ("f", "Filters"),
        ("x", "Delete"),
        ("^r", "Refresh"),
        ("^t", "Theme"),
        ("Esc", "Quit"),
      ]
    }
    AppMode::Search => vec![("Enter", "Apply"), ("↑/↓", "Navigate"), ("Esc", "Clear")],
    AppMode::Filter => vec![("j/k", "Row"), ("h/l", "Cycle"), ("Enter", "Apply"), ("Esc", "Back")],
  };

  let spans: Vec<Span> = keys
    .iter()
    .enumerate()
    .flat_map(|(i, (key, action))| {
      let mut s = vec![
        Span::styled(format!(" {} ", key), Style::default().fg(theme.key_fg).bg(theme.key_bg)),
        Span::styled(format!(" {} ", action), Style::default().fg(theme.muted)),
      ];
      if i < keys.len() - 1 {
        s.push(Span::raw("  "));
      }
      s
    })
    .collect();

  frame.render_widget(Line::from(spans), area);

  let theme_label = format!("{} ", theme.name);
  let right_area =
    Rect { x: area.x + area.width.saturating_sub(theme_label.len() as u16), width: theme_label.len() as u16, ..area };
  frame.render_widget(Line::from(Span::styled(&theme_label, Style::default().fg(theme.muted))), right_area);
}
