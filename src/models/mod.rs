pub mod element;
pub mod metadata;

pub use element::{Element, ElementKind};
pub use metadata::{ElementMetadata, RegexMatch};
