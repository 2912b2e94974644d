mod fragment;
mod line;
mod text;
mod tree;

use std::fmt::{self, Display, Formatter};

use serde::Deserialize;
use serde::Serialize;

pub use self::fragment::*;
pub use self::line::*;
pub use self::text::*;
pub use self::tree::*;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewNode {
    Fragment(Fragment),
    Line(Line),
    Tree(Tree),
}

impl Display for ViewNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ViewNode::Fragment(fragment) => fragment.fmt(f),
            ViewNode::Line(line) => line.fmt(f),
            ViewNode::Tree(tree) => tree.fmt(f),
        }
    }
}
