use ratatui::style::Color;

/// A named color palette for the UI. Selected with Ctrl+T, persisted in prefs.
#[derive(Debug)]
pub struct Theme {
  pub name: &'static str,
  pub bg: Color,
  pub fg: Color,
  pub muted: Color,
  pub accent: Color,
  pub border: Color,
  pub status: Color,
  pub error: Color,
  pub highlight_fg: Color,
  pub highlight_bg: Color,
  pub stripe_bg: Color,
  pub key_fg: Color,
  pub key_bg: Color,
}

pub const THEMES: [Theme; 4] = [
  Theme {
    name: "ink",
    bg: Color::Rgb(24, 24, 37),
    fg: Color::Rgb(205, 214, 244),
    muted: Color::Rgb(108, 112, 134),
    accent: Color::Rgb(137, 180, 250),
    border: Color::Rgb(69, 71, 90),
    status: Color::Rgb(166, 227, 161),
    error: Color::Rgb(243, 139, 168),
    highlight_fg: Color::Rgb(17, 17, 27),
    highlight_bg: Color::Rgb(137, 180, 250),
    stripe_bg: Color::Rgb(30, 30, 46),
    key_fg: Color::Rgb(17, 17, 27),
    key_bg: Color::Rgb(108, 112, 134),
  },
  Theme {
    name: "paper",
    bg: Color::Rgb(239, 241, 245),
    fg: Color::Rgb(76, 79, 105),
    muted: Color::Rgb(140, 143, 161),
    accent: Color::Rgb(30, 102, 245),
    border: Color::Rgb(188, 192, 204),
    status: Color::Rgb(64, 160, 43),
    error: Color::Rgb(210, 15, 57),
    highlight_fg: Color::Rgb(239, 241, 245),
    highlight_bg: Color::Rgb(30, 102, 245),
    stripe_bg: Color::Rgb(230, 233, 239),
    key_fg: Color::Rgb(239, 241, 245),
    key_bg: Color::Rgb(140, 143, 161),
  },
  Theme {
    name: "moss",
    bg: Color::Rgb(40, 40, 40),
    fg: Color::Rgb(235, 219, 178),
    muted: Color::Rgb(146, 131, 116),
    accent: Color::Rgb(184, 187, 38),
    border: Color::Rgb(80, 73, 69),
    status: Color::Rgb(142, 192, 124),
    error: Color::Rgb(251, 73, 52),
    highlight_fg: Color::Rgb(40, 40, 40),
    highlight_bg: Color::Rgb(184, 187, 38),
    stripe_bg: Color::Rgb(50, 48, 47),
    key_fg: Color::Rgb(40, 40, 40),
    key_bg: Color::Rgb(146, 131, 116),
  },
  Theme {
    name: "mono",
    bg: Color::Black,
    fg: Color::Gray,
    muted: Color::DarkGray,
    accent: Color::White,
    border: Color::DarkGray,
    status: Color::Gray,
    error: Color::White,
    highlight_fg: Color::Black,
    highlight_bg: Color::Gray,
    stripe_bg: Color::Black,
    key_fg: Color::Black,
    key_bg: Color::DarkGray,
  },
];
