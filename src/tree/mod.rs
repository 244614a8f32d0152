//! In-memory element tree the mirror and its drop zones live in.

mod core;
pub mod selector;
pub mod style;

pub use self::core::{Element, ElementId, RenderTree};
pub use selector::Selector;
pub use style::StyleDeclaration;
