use std::env;

use color_eyre::owo_colors::OwoColorize;

pub struct Style {
    enabled: bool,
}

impl Style {
    pub fn new(force_no_color: bool, is_tty: bool) -> Self {
        let env_no_color = env::var_os("NO_COLOR").is_some();
        Self {
            enabled: !(force_no_color || env_no_color) && is_tty,
        }
    }

    pub fn label(&self, text: &str) -> String {
        if !self.enabled {
            return text.to_string();
        }
        text.bold().to_string()
    }

    pub fn running(&self, text: &str) -> String {
        self.paint(text, Tone::Green)
    }

    pub fn skipped(&self, text: &str) -> String {
        self.paint(text, Tone::Dim)
    }

    fn paint(&self, text: &str, tone: Tone) -> String {
        if !self.enabled {
            return text.to_string();
        }
        match tone {
            Tone::Green => text.green().to_string(),
            Tone::Dim => text.dimmed().to_string(),
        }
    }
}

enum Tone {
    Green,
    Dim,
}
