mod render;
mod view;

pub use self::render::*;
pub use self::view::*;
