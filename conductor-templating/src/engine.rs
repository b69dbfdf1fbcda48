//! Liquid rendering

use crate::error::{Result, TemplatingError};
use serde_json::{Map, Value};

/// Template engine with Liquid configuration
pub struct TemplateEngine {
    parser: liquid::Parser,
}

impl TemplateEngine {
    /// Create an engine with the Liquid standard library
    pub fn new() -> Result<Self> {
        let parser = liquid::ParserBuilder::with_stdlib()
            .build()
            .map_err(|e| TemplatingError::Parse(e.to_string()))?;
        Ok(Self { parser })
    }

    /// Render `source` with `variables` as globals
    pub fn render(&self, source: &str, variables: &Map<String, Value>) -> Result<String> {
        let template = self
            .parser
            .parse(source)
            .map_err(|e| TemplatingError::Parse(e.to_string()))?;
        let globals =
            liquid::to_object(variables).map_err(|e| TemplatingError::Render(e.to_string()))?;
        template
            .render(&globals)
            .map_err(|e| TemplatingError::Render(e.to_string()))
    }
}
