mod component;
mod element;
mod event;
mod options;
mod path;

pub use self::component::*;
pub use self::element::*;
pub use self::event::*;
pub use self::options::*;
pub use self::path::*;
