use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ViewNode;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    pub children: Vec<ViewNode>,
}

impl Fragment {
    pub fn new(children: Vec<ViewNode>) -> Self {
        Self { children }
    }
}

impl Display for Fragment {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (index, child) in self.children.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            child.fmt(f)?;
        }
        Ok(())
    }
}

impl From<Vec<ViewNode>> for Fragment {
    fn from(value: Vec<ViewNode>) -> Self {
        Fragment::new(value)
    }
}

impl From<Fragment> for ViewNode {
    fn from(value: Fragment) -> Self {
        ViewNode::Fragment(value)
    }
}

impl From<Vec<ViewNode>> for ViewNode {
    fn from(value: Vec<ViewNode>) -> Self {
        ViewNode::Fragment(value.into())
    }
}
