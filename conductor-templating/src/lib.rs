//! Workflow templates for Conductor
//!
//! Templates are Liquid sources compiled into the binary. Rendering always
//! validates the result, so scaffolding starts from a known-good workflow.

mod engine;
mod error;
pub mod security;
pub mod store;

pub use engine::TemplateEngine;
pub use error::{Result, TemplatingError};
pub use security::validate_template_name;
pub use store::{
    BuiltinTemplate, ParameterDescriptor, TemplateDescriptor, TemplateParameter, TemplateStore,
    NAME_PARAMETER,
};
