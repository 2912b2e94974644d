use serde::{Deserialize, Serialize};
use std::fmt::Display;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub content: String,
    pub style: TextStyle,
}

impl Span {
    /// Create a new Span with given content and default style.
    pub fn new<T: Into<String>>(content: T) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }

    /// Create a new Span with given content and style.
    pub fn new_styled<T: Into<String>>(content: T, style: TextStyle) -> Self {
        Self {
            content: content.into(),
            style,
        }
    }
}

impl Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.content.fmt(f)
    }
}

impl From<&str> for Span {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Span {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextStyle {
    pub foreground_color: Option<Color>,
    pub is_bold: bool,
    pub is_dim: bool,
    pub is_italic: bool,
    pub is_underlined: bool,
}

impl TextStyle {
    /// Begin a new default TextStyle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set foreground color.
    pub fn fg(mut self, color: Color) -> Self {
        self.foreground_color = Some(color);
        self
    }

    /// Make text bold.
    pub fn bold(mut self) -> Self {
        self.is_bold = true;
        self
    }

    /// Make text dim.
    pub fn dim(mut self) -> Self {
        self.is_dim = true;
        self
    }

    /// Make text italic.
    pub fn italic(mut self) -> Self {
        self.is_italic = true;
        self
    }

    /// Underline the text.
    pub fn underline(mut self) -> Self {
        self.is_underlined = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Color {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    Gray,
    DarkGray,
    White,
}
