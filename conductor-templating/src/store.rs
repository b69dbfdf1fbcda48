//! The built-in template set
//!
//! Templates are compiled into the binary and listed in a fixed order. Every
//! render is run back through the workflow validator and parser, so a template
//! that renders into an invalid workflow, or one carrying a different name, is
//! never handed out.

use crate::engine::TemplateEngine;
use crate::error::{Result, TemplatingError};
use crate::security::validate_template_name;
use conductor_workflow::{parse_workflow, validate_workflow};
use serde::Serialize;
use serde_json::{Map, Value};

/// Parameter every template takes
pub const NAME_PARAMETER: &str = "name";

/// A parameter a template accepts
#[derive(Debug, Clone, Copy)]
pub struct TemplateParameter {
    /// Variable name inside the template
    pub name: &'static str,
    /// Description for callers
    pub description: &'static str,
    /// Whether callers must supply it
    pub required: bool,
    /// Value used when omitted
    pub default: Option<&'static str>,
}

const WORKFLOW_NAME: TemplateParameter = TemplateParameter {
    name: NAME_PARAMETER,
    description: "Name of the generated workflow",
    required: true,
    default: None,
};

/// An embedded template
#[derive(Debug, Clone, Copy)]
pub struct BuiltinTemplate {
    /// Lookup name
    pub name: &'static str,
    /// What the generated workflow does
    pub description: &'static str,
    /// Grouping used by `list`
    pub category: &'static str,
    /// Accepted parameters, `name` first
    pub parameters: &'static [TemplateParameter],
    /// Liquid source
    pub body: &'static str,
}

static BUILTIN_TEMPLATES: &[BuiltinTemplate] = &[
    BuiltinTemplate {
        name: "blank",
        description: "Minimal workflow with one placeholder shell step",
        category: "basic",
        parameters: &[WORKFLOW_NAME],
        body: include_str!("../templates/blank.yaml.liquid"),
    },
    BuiltinTemplate {
        name: "code-review",
        description: "Diff against a base branch and have a model review the change",
        category: "development",
        parameters: &[
            WORKFLOW_NAME,
            TemplateParameter {
                name: "language",
                description: "Primary language of the project",
                required: false,
                default: Some("rust"),
            },
        ],
        body: include_str!("../templates/code-review.yaml.liquid"),
    },
    BuiltinTemplate {
        name: "summarize",
        description: "Read a document and summarize it",
        category: "content",
        parameters: &[
            WORKFLOW_NAME,
            TemplateParameter {
                name: "style",
                description: "Summary style, e.g. concise or detailed",
                required: false,
                default: Some("concise"),
            },
        ],
        body: include_str!("../templates/summarize.yaml.liquid"),
    },
    BuiltinTemplate {
        name: "shell-pipeline",
        description: "Run a command and explain failures",
        category: "automation",
        parameters: &[
            WORKFLOW_NAME,
            TemplateParameter {
                name: "command",
                description: "Command to run",
                required: false,
                default: Some("make test"),
            },
        ],
        body: include_str!("../templates/shell-pipeline.yaml.liquid"),
    },
    BuiltinTemplate {
        name: "api-health",
        description: "Probe an HTTP endpoint and explain failures",
        category: "automation",
        parameters: &[
            WORKFLOW_NAME,
            TemplateParameter {
                name: "url",
                description: "Endpoint to probe",
                required: true,
                default: None,
            },
        ],
        body: include_str!("../templates/api-health.yaml.liquid"),
    },
];

/// Serializable view of a template parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterDescriptor {
    /// Parameter name
    pub name: String,
    /// Description
    pub description: String,
    /// Whether callers must supply it
    pub required: bool,
    /// Default value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

/// Serializable view of a template
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateDescriptor {
    /// Lookup name
    pub name: String,
    /// Description
    pub description: String,
    /// Category
    pub category: String,
    /// Parameters, `name` first
    pub parameters: Vec<ParameterDescriptor>,
}

impl From<&BuiltinTemplate> for TemplateDescriptor {
    fn from(template: &BuiltinTemplate) -> Self {
        Self {
            name: template.name.to_string(),
            description: template.description.to_string(),
            category: template.category.to_string(),
            parameters: template
                .parameters
                .iter()
                .map(|p| ParameterDescriptor {
                    name: p.name.to_string(),
                    description: p.description.to_string(),
                    required: p.required,
                    default: p.default.map(str::to_string),
                })
                .collect(),
        }
    }
}

/// Lookup and rendering over the built-in templates
pub struct TemplateStore {
    engine: TemplateEngine,
    templates: &'static [BuiltinTemplate],
}

impl TemplateStore {
    /// Store over the built-in set
    pub fn new() -> Result<Self> {
        Ok(Self {
            engine: TemplateEngine::new()?,
            templates: BUILTIN_TEMPLATES,
        })
    }

    /// Templates in embedded order, optionally limited to one category
    pub fn list(&self, category: Option<&str>) -> Vec<TemplateDescriptor> {
        self.templates
            .iter()
            .filter(|t| match category {
                Some(filter) if !filter.is_empty() => t.category == filter,
                _ => true,
            })
            .map(TemplateDescriptor::from)
            .collect()
    }

    /// True if a template with this name exists
    pub fn exists(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Render a template with only the workflow name
    pub fn render(&self, name: &str, workflow_name: &str) -> Result<String> {
        self.render_with(name, workflow_name, &Map::new())
    }

    /// Render a template with extra parameters
    ///
    /// The output is validated; an invalid workflow is an error.
    pub fn render_with(
        &self,
        name: &str,
        workflow_name: &str,
        parameters: &Map<String, Value>,
    ) -> Result<String> {
        validate_template_name(name)?;
        let template = self
            .find(name)
            .ok_or_else(|| TemplatingError::NotFound(name.to_string()))?;

        let variables = Self::resolve_parameters(template, workflow_name, parameters)?;
        let rendered = self.engine.render(template.body, &variables)?;

        let outcome = validate_workflow(&rendered);
        if !outcome.valid {
            tracing::warn!(
                template = template.name,
                errors = outcome.errors.len(),
                "rendered template did not validate"
            );
            return Err(TemplatingError::InvalidOutput(
                outcome.errors.into_iter().map(|d| d.message).collect(),
            ));
        }

        let definition = parse_workflow(&rendered)
            .map_err(|e| TemplatingError::InvalidOutput(vec![e.to_string()]))?;
        if definition.name != workflow_name {
            return Err(TemplatingError::InvalidParameter(format!(
                "workflow name '{workflow_name}' rendered as '{}'; use a plain name",
                definition.name
            )));
        }

        tracing::debug!(template = template.name, "rendered template");
        Ok(rendered)
    }

    fn find(&self, name: &str) -> Option<&'static BuiltinTemplate> {
        self.templates.iter().find(|t| t.name == name)
    }

    fn resolve_parameters(
        template: &BuiltinTemplate,
        workflow_name: &str,
        supplied: &Map<String, Value>,
    ) -> Result<Map<String, Value>> {
        if workflow_name.trim().is_empty() {
            return Err(TemplatingError::InvalidParameter(
                "workflow name must not be empty".to_string(),
            ));
        }
        check_plain_name(workflow_name)?;
        if supplied.contains_key(NAME_PARAMETER) {
            return Err(TemplatingError::InvalidParameter(
                "'name' is set by the workflow name and cannot be passed as a parameter"
                    .to_string(),
            ));
        }
        if let Some(unknown) = supplied
            .keys()
            .find(|key| !template.parameters.iter().any(|p| p.name == key.as_str()))
        {
            return Err(TemplatingError::InvalidParameter(format!(
                "template '{}' has no parameter '{unknown}'",
                template.name
            )));
        }

        let mut variables = Map::new();
        variables.insert(
            NAME_PARAMETER.to_string(),
            Value::String(workflow_name.to_string()),
        );
        for parameter in template
            .parameters
            .iter()
            .filter(|p| p.name != NAME_PARAMETER)
        {
            let value = match (supplied.get(parameter.name), parameter.default) {
                (Some(value), _) => scalar_to_string(parameter.name, value)?,
                (None, Some(default)) => default.to_string(),
                (None, None) => {
                    return Err(TemplatingError::InvalidParameter(format!(
                        "template '{}' requires parameter '{}'",
                        template.name, parameter.name
                    )))
                }
            };
            variables.insert(parameter.name.to_string(), Value::String(value));
        }
        Ok(variables)
    }
}

/// The name is substituted unquoted, so it must read back as the same string
fn check_plain_name(workflow_name: &str) -> Result<()> {
    match serde_yaml_ng::from_str::<serde_yaml_ng::Value>(workflow_name) {
        Ok(serde_yaml_ng::Value::String(parsed)) if parsed == workflow_name => Ok(()),
        _ => Err(TemplatingError::InvalidParameter(format!(
            "workflow name {workflow_name:?} must be a plain YAML string"
        ))),
    }
}

fn scalar_to_string(name: &str, value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(TemplatingError::InvalidParameter(format!(
            "parameter '{name}' must be a string, number or boolean"
        ))),
    }
}
