use std::{
    fmt::{self, Display, Formatter},
    num::ParseIntError,
    str::FromStr,
};

use serde::{Deserialize, Serialize};

/// Position of a node: its index in the root sequence, then its index within
/// each enclosing branch's content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }
}

impl Display for NodePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (position, index) in self.0.iter().enumerate() {
            if position > 0 {
                f.write_str(".")?;
            }
            write!(f, "{index}")?;
        }
        Ok(())
    }
}

impl FromStr for NodePath {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split('.')
            .map(|part| part.trim().parse())
            .collect::<Result<_, _>>()
            .map(Self)
    }
}

impl From<Vec<usize>> for NodePath {
    fn from(value: Vec<usize>) -> Self {
        Self(value)
    }
}

impl<const N: usize> From<[usize; N]> for NodePath {
    fn from(value: [usize; N]) -> Self {
        Self(value.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_joins_with_dots() {
        assert_eq!(NodePath::from([3, 0, 12]).to_string(), "3.0.12");
        assert_eq!(NodePath::root().to_string(), "");
    }

    #[test]
    fn parse_dotted() {
        assert_eq!("3.0".parse::<NodePath>().unwrap(), NodePath::from([3, 0]));
        assert!("3.x".parse::<NodePath>().is_err());
        assert!("".parse::<NodePath>().is_err());
    }

    #[test]
    fn child_extends() {
        let path = NodePath::root().child(2).child(1);
        assert_eq!(path.indices(), [2, 1]);
    }
}
