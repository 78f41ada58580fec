//! Renderers for the assembled model.
//!
//! All of them read an [`AssembledModel`](crate::model::AssembledModel) and
//! never touch extraction state:
//!
//! - `xmi` - identifier-referenced interchange document
//! - `plantuml` - textual class diagram, readable by the diagram front-end
//! - `json` - the assembled model as JSON

pub mod json;
pub mod plantuml;
pub mod xmi;

pub use json::to_json;
pub use plantuml::{to_plantuml, InheritanceStyle, RenderOptions};
pub use xmi::to_xmi;
