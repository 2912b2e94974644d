use serde::{Deserialize, Serialize};
use tutorial_view::{Color, Line, Render, Span, TextStyle, Tree, TreeBuilder, ViewNode};

use crate::{Event, NodePath};

/// One rendered piece of the visual tree, handed to the rendering host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    /// Path of the node this element was rendered from.
    pub path: NodePath,
    pub kind: ElementKind,
    pub on_click: Option<Event>,
    pub children: Vec<Element>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementKind {
    Title { text: String },
    Paragraph { text: String },
    Image { url: String },
    Notes,
    Note { text: String },
    BranchSet,
    BranchOption { name: String, active: bool },
    Branch { name: String },
    Placeholder { reason: String },
}

impl Element {
    pub fn new(path: NodePath, kind: ElementKind) -> Self {
        Self {
            path,
            kind,
            on_click: None,
            children: Vec::new(),
        }
    }

    pub fn on_click(mut self, event: Event) -> Self {
        self.on_click = Some(event);
        self
    }

    pub fn children(mut self, children: Vec<Element>) -> Self {
        self.children = children;
        self
    }

    /// Depth-first walk over this element and all descendants.
    pub fn walk(&self) -> Vec<&Element> {
        let mut out = vec![self];
        for child in &self.children {
            out.extend(child.walk());
        }
        out
    }

    pub fn line(&self) -> Line {
        match &self.kind {
            ElementKind::Title { text } => {
                Line::from(Span::new_styled(text.as_str(), TextStyle::new().bold().underline()))
            }
            ElementKind::Paragraph { text } => Line::from(text.as_str()),
            ElementKind::Image { url } => {
                Line::from(Span::new_styled("[image] ", TextStyle::new().fg(Color::Magenta)))
                    .push_span(Span::new_styled(url.as_str(), TextStyle::new().italic()))
            }
            ElementKind::Notes => {
                Line::from(Span::new_styled("notes", TextStyle::new().fg(Color::DarkGray)))
            }
            ElementKind::Note { text } => Line::from(Span::new_styled(
                format!("» {text}"),
                TextStyle::new().fg(Color::Yellow),
            )),
            ElementKind::BranchSet => {
                Line::from(Span::new_styled("choose a path", TextStyle::new().dim()))
            }
            ElementKind::BranchOption { name, active } => {
                let (marker, style) = if *active {
                    ("(•) ", TextStyle::new().fg(Color::Cyan).bold())
                } else {
                    ("( ) ", TextStyle::new().fg(Color::Gray))
                };
                Line::new(vec![Span::new(marker), Span::new(name.as_str())]).style(style)
            }
            ElementKind::Branch { name } => Line::from(Span::new_styled(
                format!("→ {name}"),
                TextStyle::new().fg(Color::Green),
            )),
            ElementKind::Placeholder { reason } => Line::from(Span::new_styled(
                format!("<malformed node: {reason}>"),
                TextStyle::new().fg(Color::Red),
            )),
        }
    }

    pub fn tree(&self) -> Tree {
        let label = self.line().to_string();
        if self.children.is_empty() {
            return TreeBuilder::default().label(label).build();
        }
        TreeBuilder::default()
            .label(label)
            .nodes(self.children.iter().map(Element::tree).collect())
            .build()
    }
}

impl Render for Element {
    fn render(&self) -> ViewNode {
        self.tree().into()
    }
}

/// Present a rendered sequence as a labelled text tree.
pub fn element_tree(label: impl Into<String>, elements: &[Element]) -> Tree {
    TreeBuilder::default()
        .label(label.into())
        .nodes(elements.iter().map(Element::tree).collect())
        .build()
}
