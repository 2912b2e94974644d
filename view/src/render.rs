use crate::ViewNode;

/// Anything that can present itself as a [`ViewNode`].
pub trait Render {
    fn render(&self) -> ViewNode;
}
