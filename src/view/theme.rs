use ratatui::style::{Color, Modifier, Style};

/// Colors used by the browser
///
/// The palette is fixed; there is no theme loading.
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,

    pub background: Color,
    pub foreground: Color,
    pub border_fg: Color,
    pub selection_bg: Color,
    pub selection_fg: Color,

    pub directory_fg: Color,
    pub file_fg: Color,
    pub arrow_fg: Color,
    pub loading_fg: Color,

    pub settings_bg: Color,
    pub path_fg: Color,
    pub button_fg: Color,
    pub button_active_fg: Color,
    pub button_active_bg: Color,

    pub error_fg: Color,
    pub popup_bg: Color,
    pub popup_border_fg: Color,
    pub popup_text_fg: Color,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),
            background: Color::Rgb(30, 30, 30),
            foreground: Color::Rgb(212, 212, 212),
            border_fg: Color::Rgb(90, 90, 90),
            selection_bg: Color::Rgb(38, 79, 120),
            selection_fg: Color::White,
            directory_fg: Color::Rgb(86, 156, 214),
            file_fg: Color::Rgb(212, 212, 212),
            arrow_fg: Color::Rgb(150, 150, 150),
            loading_fg: Color::Yellow,
            settings_bg: Color::Rgb(45, 45, 45),
            path_fg: Color::Rgb(180, 180, 180),
            button_fg: Color::Rgb(180, 180, 180),
            button_active_fg: Color::Black,
            button_active_bg: Color::Rgb(86, 156, 214),
            error_fg: Color::LightRed,
            popup_bg: Color::Rgb(60, 30, 30),
            popup_border_fg: Color::LightRed,
            popup_text_fg: Color::White,
        }
    }

    pub fn entry_style(&self, is_dir: bool, selected: bool) -> Style {
        if selected {
            return Style::default()
                .fg(self.selection_fg)
                .bg(self.selection_bg)
                .add_modifier(Modifier::BOLD);
        }
        let fg = if is_dir {
            self.directory_fg
        } else {
            self.file_fg
        };
        Style::default().fg(fg).bg(self.background)
    }

    pub fn button_style(&self, active: bool) -> Style {
        if active {
            Style::default()
                .fg(self.button_active_fg)
                .bg(self.button_active_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.button_fg).bg(self.settings_bg)
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}
