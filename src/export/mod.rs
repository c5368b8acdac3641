//! Design-to-markup export path.
//!
//! - [`extractor`] - Reads live design-tool nodes into [`DesignNode`] records
//! - [`generator`] - Emits flat HTML plus a matching stylesheet
//!
//! [`DesignNode`]: crate::types::DesignNode

pub mod extractor;
pub mod generator;


pub use extractor::{extract_node_data, extract_selection, NodeSource};
pub use generator::{
    class_name, color_to_css, generate_css, generate_design_data, generate_html,
};
