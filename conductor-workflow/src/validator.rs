//! Multi-stage workflow validation
//!
//! The stages run in order and the first one that reports errors stops the
//! pipeline:
//!
//! 1. YAML syntax, including duplicate mapping keys
//! 2. JSON Schema
//! 3. The workflow parser, the same one `workflow_run` uses
//!
//! Best-practice advisories run only after all three pass and produce
//! warnings, never errors.

use crate::error::WorkflowError;
use crate::parser::parse_workflow;
use crate::schema::schema_validator;
use crate::WorkflowDefinition;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::OnceLock;

/// Largest accepted workflow document in bytes
pub const MAX_WORKFLOW_SIZE: usize = 10 * 1024 * 1024;

/// Step count above which decomposition is recommended
pub const MAX_RECOMMENDED_STEPS: usize = 20;

/// Diagnostic severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    /// Makes the workflow invalid
    Error,
    /// Advisory only
    Warning,
}

/// A single validation finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// 1-based line, 0 when unknown
    pub line: usize,
    /// 1-based column, 0 when unknown
    pub column: usize,
    /// What is wrong
    pub message: String,
    /// How to fix it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Error or warning
    pub severity: DiagnosticSeverity,
}

impl Diagnostic {
    /// Error without a known position
    pub fn error(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self {
            line: 0,
            column: 0,
            message: message.into(),
            suggestion: Some(suggestion.into()),
            severity: DiagnosticSeverity::Error,
        }
    }

    /// Warning without a known position
    pub fn warning(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self {
            line: 0,
            column: 0,
            message: message.into(),
            suggestion: Some(suggestion.into()),
            severity: DiagnosticSeverity::Warning,
        }
    }

    /// Attach a position
    pub fn at(mut self, line: usize, column: usize) -> Self {
        self.line = line;
        self.column = column;
        self
    }
}

/// Result of validating one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    /// False iff `errors` is non-empty
    pub valid: bool,
    /// Errors in pipeline order
    pub errors: Vec<Diagnostic>,
    /// Advisories in a fixed order
    pub warnings: Vec<Diagnostic>,
}

impl ValidationOutcome {
    fn new(errors: Vec<Diagnostic>, warnings: Vec<Diagnostic>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    fn failed(errors: Vec<Diagnostic>) -> Self {
        Self::new(errors, Vec::new())
    }
}

/// Validate a workflow document
///
/// Validating the same input twice yields equal outcomes.
pub fn validate_workflow(yaml: &str) -> ValidationOutcome {
    if yaml.len() > MAX_WORKFLOW_SIZE {
        return ValidationOutcome::failed(vec![Diagnostic::error(
            WorkflowError::TooLarge {
                size: yaml.len(),
                limit: MAX_WORKFLOW_SIZE,
            }
            .to_string(),
            "Split the workflow into smaller workflows",
        )]);
    }

    let document = match syntax_stage(yaml) {
        Ok(document) => document,
        Err(diagnostic) => return ValidationOutcome::failed(vec![diagnostic]),
    };

    let schema_errors = schema_stage(&document);
    if !schema_errors.is_empty() {
        return ValidationOutcome::failed(schema_errors);
    }

    match parse_workflow(yaml) {
        Ok(definition) => ValidationOutcome::new(Vec::new(), advisories(&definition)),
        Err(error) => ValidationOutcome::failed(semantic_diagnostics(error)),
    }
}

fn syntax_stage(yaml: &str) -> Result<Value, Diagnostic> {
    // serde_json's map keeps the last of duplicate keys; serde_yaml_ng's rejects them
    serde_yaml_ng::from_str::<serde_yaml_ng::Value>(yaml).map_err(syntax_diagnostic)?;
    serde_yaml_ng::from_str::<Value>(yaml).map_err(syntax_diagnostic)
}

fn syntax_diagnostic(e: serde_yaml_ng::Error) -> Diagnostic {
    let message = e.to_string();
    let (line, column) = match e.location() {
        Some(location) => (location.line(), location.column()),
        None => position_from_message(&message),
    };
    tracing::debug!(line, column, "workflow YAML failed to parse");
    Diagnostic::error(
        format!("YAML syntax error: {message}"),
        "Check indentation (spaces, not tabs), that every key is followed by a colon and that no key appears twice",
    )
    .at(line, column)
}

/// Pull `line N` and `column N` out of a parser message, 0 when absent
fn position_from_message(message: &str) -> (usize, usize) {
    static LINE: OnceLock<Option<Regex>> = OnceLock::new();
    static COLUMN: OnceLock<Option<Regex>> = OnceLock::new();
    let line_re = LINE.get_or_init(|| Regex::new(r"line (\d+)").ok());
    let column_re = COLUMN.get_or_init(|| Regex::new(r"column (\d+)").ok());

    let capture = |re: &Option<Regex>| {
        re.as_ref()
            .and_then(|re| re.captures(message))
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0)
    };
    (capture(line_re), capture(column_re))
}

fn schema_stage(document: &Value) -> Vec<Diagnostic> {
    let validator = match schema_validator() {
        Ok(validator) => validator,
        Err(e) => {
            tracing::error!("workflow schema unusable: {e}");
            return vec![Diagnostic::error(
                "internal: the embedded workflow schema could not be loaded",
                "Report this as a bug",
            )];
        }
    };

    validator
        .iter_errors(document)
        .map(|error| {
            let pointer = error.instance_path.to_string();
            let message = if pointer.is_empty() {
                error.to_string()
            } else {
                format!("{pointer}: {error}")
            };
            Diagnostic::error(
                message,
                "Refer to the workflow schema (workflow_schema tool) for the expected structure",
            )
        })
        .collect()
}

fn semantic_diagnostics(error: WorkflowError) -> Vec<Diagnostic> {
    const HINT: &str = "Fix the workflow definition so every reference and required field resolves";
    match error {
        WorkflowError::Invalid { problems, .. } => problems
            .into_iter()
            .map(|problem| Diagnostic::error(problem, HINT))
            .collect(),
        other => vec![Diagnostic::error(other.to_string(), HINT)],
    }
}

fn advisories(definition: &WorkflowDefinition) -> Vec<Diagnostic> {
    let mut warnings = Vec::new();

    if definition
        .description
        .as_deref()
        .is_none_or(|d| d.trim().is_empty())
    {
        warnings.push(Diagnostic::warning(
            "Workflow has no description",
            "Add a description explaining what the workflow does",
        ));
    }

    let steps = definition.steps.len();
    if steps == 0 {
        warnings.push(Diagnostic::warning(
            "Workflow has no steps",
            "Add at least one step",
        ));
    } else if steps > MAX_RECOMMENDED_STEPS {
        warnings.push(Diagnostic::warning(
            format!(
                "Workflow has {steps} steps; more than {MAX_RECOMMENDED_STEPS} is hard to maintain"
            ),
            "Consider splitting it into smaller workflows",
        ));
    }

    warnings
}
