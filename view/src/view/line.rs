use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::{Span, TextStyle, ViewNode};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    pub spans: Vec<Span>,
    pub style: TextStyle,
}

impl Line {
    /// Create a new `Line` with given spans and default style.
    pub fn new<S: Into<Vec<Span>>>(spans: S) -> Self {
        Self {
            spans: spans.into(),
            style: TextStyle::default(),
        }
    }

    /// Set the style for the line in a builder pattern.
    pub fn style(mut self, style: TextStyle) -> Self {
        self.style = style;
        self
    }

    /// Add a span to the existing spans.
    pub fn push_span(mut self, span: Span) -> Self {
        self.spans.push(span);
        self
    }
}

impl Display for Line {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for span in &self.spans {
            span.fmt(f)?;
        }
        Ok(())
    }
}

impl From<Vec<Span>> for Line {
    fn from(value: Vec<Span>) -> Self {
        Line::new(value)
    }
}

impl From<Span> for Line {
    fn from(value: Span) -> Self {
        Line::new(vec![value])
    }
}

impl From<&str> for Line {
    fn from(value: &str) -> Self {
        Line::new(vec![Span::from(value)])
    }
}

impl From<String> for Line {
    fn from(value: String) -> Self {
        Line::new(vec![Span::from(value)])
    }
}

impl From<Line> for ViewNode {
    fn from(value: Line) -> Self {
        ViewNode::Line(value)
    }
}
