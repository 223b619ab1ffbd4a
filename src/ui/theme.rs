use ratatui::style::Color;

/// Colors shared by every view.
pub struct Theme;

impl Theme {
    pub const PRIMARY: Color = Color::Magenta;
    /// Borders and section headings.
    pub const SECONDARY: Color = Color::Cyan;
    /// Running task and its live duration.
    pub const ACTIVE: Color = Color::LightGreen;
    /// Paused task, status messages and empty-data notices.
    pub const WARN: Color = Color::Yellow;
    /// Deletion and discard prompts.
    pub const DANGER: Color = Color::Red;
    pub const HIGHLIGHT: Color = Color::Cyan;
    pub const SELECTION_MARKER: Color = Color::Green;
    pub const DIM: Color = Color::DarkGray;
    pub const TEXT: Color = Color::White;
    /// Headings and summed durations.
    pub const ACCENT: Color = Color::LightBlue;
}
