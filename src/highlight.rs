use inksac::prelude::*;

use crate::io::Style as OutputStyle;

#[derive(Debug, Clone, Copy)]
pub struct SyntaxHighlighter {
    color_support: ColorSupport,
}

impl Default for SyntaxHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntaxHighlighter {
    pub fn new() -> Self {
        let support = check_color_support().unwrap_or(ColorSupport::NoColor);
        Self {
            color_support: support,
        }
    }

    pub fn plain() -> Self {
        Self {
            color_support: ColorSupport::NoColor,
        }
    }

    fn enabled(&self) -> bool {
        !matches!(self.color_support, ColorSupport::NoColor)
    }

    /// Colours the leading token: cyan when it resolves, red otherwise.
    pub fn highlight_command(&self, input: &str, known: impl Fn(&str) -> bool) -> String {
        if !self.enabled() {
            return input.to_string();
        }

        let trimmed = input.trim_start();
        let indent = &input[..input.len() - trimmed.len()];
        let (base, tail) = match trimmed.find(' ') {
            Some(split) => trimmed.split_at(split),
            None => (trimmed, ""),
        };
        if base.is_empty() {
            return input.to_string();
        }

        let color = if known(base) { Color::Cyan } else { Color::Red };
        let style = Style::builder().foreground(color).bold().build();
        format!("{indent}{}{tail}", base.style(style))
    }

    pub fn paint(&self, text: &str, style: OutputStyle) -> String {
        if !self.enabled() {
            return text.to_string();
        }

        let style = match style {
            OutputStyle::Out => Style::builder().foreground(Color::Green).build(),
            OutputStyle::Info => Style::builder().foreground(Color::Blue).build(),
            OutputStyle::Warn => Style::builder().foreground(Color::Yellow).build(),
            OutputStyle::Error => Style::builder().foreground(Color::Red).bold().build(),
        };
        text.style(style).to_string()
    }

    pub fn highlight_hint(&self, hint: &str) -> String {
        if !self.enabled() {
            return hint.to_string();
        }

        let hint_style = Style::builder()
            .foreground(Color::RGB(128, 128, 128))
            .build();
        hint.style(hint_style).to_string()
    }
}
