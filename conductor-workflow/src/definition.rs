//! Workflow definition types and structural validation

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// A parsed workflow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowDefinition {
    /// Workflow name
    pub name: String,
    /// Free-text description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Author supplied version string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Declared inputs
    #[serde(default)]
    pub inputs: Vec<InputDeclaration>,
    /// Steps in source order
    #[serde(default)]
    pub steps: Vec<Step>,
    /// Named outputs taken from step results
    #[serde(default)]
    pub outputs: Vec<OutputDeclaration>,
}

/// Kind of work a step performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepType {
    /// Prompt a language model
    Llm,
    /// Run a shell command
    Shell,
    /// Issue an HTTP request
    Http,
    /// Read or write a file
    File,
}

impl StepType {
    /// Lowercase tag as written in YAML
    pub fn as_str(&self) -> &'static str {
        match self {
            StepType::Llm => "llm",
            StepType::Shell => "shell",
            StepType::Http => "http",
            StepType::File => "file",
        }
    }

    /// Field that must be present for this step type
    pub fn required_field(&self) -> &'static str {
        match self {
            StepType::Llm => "prompt",
            StepType::Shell => "command",
            StepType::Http => "url",
            StepType::File => "path",
        }
    }
}

impl fmt::Display for StepType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Guard that makes a step conditional
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    /// Expression evaluated by the execution engine
    pub expression: String,
}

/// One unit of work
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Unique step id
    pub id: String,
    /// Step type tag
    #[serde(rename = "type")]
    pub step_type: StepType,
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Optional guard
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
    /// Steps that must finish first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
    /// Prompt text for `llm` steps
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    /// Model override for `llm` steps
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Command line for `shell` steps
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    /// Target for `http` steps
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// HTTP method for `http` steps
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// Path for `file` steps
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Content written by `file` steps
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl Step {
    /// True if the step carries a condition clause
    pub fn is_conditional(&self) -> bool {
        self.condition.is_some()
    }

    fn field(&self, field: &str) -> Option<&str> {
        match field {
            "prompt" => self.prompt.as_deref(),
            "command" => self.command.as_deref(),
            "url" => self.url.as_deref(),
            "path" => self.path.as_deref(),
            _ => None,
        }
    }
}

/// JSON type accepted for an input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    /// JSON string
    String,
    /// JSON number
    Number,
    /// JSON boolean
    Boolean,
    /// JSON array
    Array,
    /// JSON object
    Object,
}

impl InputType {
    /// True if `value` has this JSON type
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            InputType::String => value.is_string(),
            InputType::Number => value.is_number(),
            InputType::Boolean => value.is_boolean(),
            InputType::Array => value.is_array(),
            InputType::Object => value.is_object(),
        }
    }
}

impl fmt::Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InputType::String => "string",
            InputType::Number => "number",
            InputType::Boolean => "boolean",
            InputType::Array => "array",
            InputType::Object => "object",
        };
        f.write_str(name)
    }
}

/// A declared workflow input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputDeclaration {
    /// Input name
    pub name: String,
    /// Expected JSON type
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub input_type: Option<InputType>,
    /// Description for callers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Must be supplied unless a default exists
    #[serde(default)]
    pub required: bool,
    /// Value used when the caller omits the input
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl InputDeclaration {
    /// True if a caller has to supply this input
    pub fn needs_value(&self) -> bool {
        self.required && self.default.is_none()
    }
}

/// A named output taken from a step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputDeclaration {
    /// Output name
    pub name: String,
    /// Step id producing the value
    pub step: String,
}

impl WorkflowDefinition {
    /// Validate cross-field rules
    ///
    /// Returns every problem found, in definition order.
    pub fn validate_structure(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push("Workflow name cannot be empty".to_string());
        }

        let mut seen_inputs = HashSet::new();
        for input in &self.inputs {
            if input.name.trim().is_empty() {
                errors.push("Input name cannot be empty".to_string());
            } else if !seen_inputs.insert(input.name.as_str()) {
                errors.push(format!("Duplicate input name '{}'", input.name));
            }
            if let (Some(expected), Some(default)) = (input.input_type, &input.default) {
                if !expected.matches(default) {
                    errors.push(format!(
                        "Default for input '{}' is not of type {expected}",
                        input.name
                    ));
                }
            }
        }

        let mut step_ids = HashSet::new();
        for step in &self.steps {
            if !step_ids.insert(step.id.as_str()) {
                errors.push(format!("Duplicate step id '{}'", step.id));
            }
        }

        for step in &self.steps {
            let field = step.step_type.required_field();
            if step.field(field).is_none_or(|v| v.trim().is_empty()) {
                errors.push(format!(
                    "Step '{}' of type {} requires a non-empty '{field}'",
                    step.id, step.step_type
                ));
            }
            if let Some(condition) = &step.condition {
                if condition.expression.trim().is_empty() {
                    errors.push(format!(
                        "Step '{}' has an empty condition expression",
                        step.id
                    ));
                }
            }
            for dependency in &step.depends_on {
                if dependency == &step.id {
                    errors.push(format!("Step '{}' depends on itself", step.id));
                } else if !step_ids.contains(dependency.as_str()) {
                    errors.push(format!(
                        "Step '{}' depends on unknown step '{dependency}'",
                        step.id
                    ));
                }
            }
        }

        if let Some(cycle) = self.find_dependency_cycle() {
            errors.push(format!(
                "Circular dependency detected: {}",
                cycle.join(" -> ")
            ));
        }

        for output in &self.outputs {
            if !step_ids.contains(output.step.as_str()) {
                errors.push(format!(
                    "Output '{}' references unknown step '{}'",
                    output.name, output.step
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Find a cycle among `depends_on` edges, ignoring self and unknown edges
    fn find_dependency_cycle(&self) -> Option<Vec<String>> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Visiting,
            Done,
        }

        let edges: HashMap<&str, Vec<&str>> = self
            .steps
            .iter()
            .map(|s| {
                let deps = s
                    .depends_on
                    .iter()
                    .map(String::as_str)
                    .filter(|d| *d != s.id)
                    .collect();
                (s.id.as_str(), deps)
            })
            .collect();

        fn visit<'a>(
            node: &'a str,
            edges: &HashMap<&'a str, Vec<&'a str>>,
            marks: &mut HashMap<&'a str, Mark>,
            stack: &mut Vec<&'a str>,
        ) -> Option<Vec<String>> {
            match marks.get(node) {
                Some(Mark::Done) => return None,
                Some(Mark::Visiting) => {
                    let start = stack.iter().position(|n| *n == node).unwrap_or(0);
                    let mut cycle: Vec<String> =
                        stack[start..].iter().map(|s| s.to_string()).collect();
                    cycle.push(node.to_string());
                    return Some(cycle);
                }
                None => {}
            }
            marks.insert(node, Mark::Visiting);
            stack.push(node);
            for &next in edges.get(node).into_iter().flatten() {
                if edges.contains_key(next) {
                    if let Some(cycle) = visit(next, edges, marks, stack) {
                        return Some(cycle);
                    }
                }
            }
            stack.pop();
            marks.insert(node, Mark::Done);
            None
        }

        let mut marks = HashMap::new();
        for step in &self.steps {
            let mut stack = Vec::new();
            if let Some(cycle) = visit(step.id.as_str(), &edges, &mut marks, &mut stack) {
                return Some(cycle);
            }
        }
        None
    }
}
