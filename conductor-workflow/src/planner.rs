//! Dry-run planning
//!
//! A plan lists every step in source order with a preliminary status. Nothing
//! is executed here; real execution belongs to the CLI.

use crate::{StepType, WorkflowDefinition};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Error text returned for runs that ask for real execution
pub const EXECUTION_NOT_SUPPORTED: &str =
    "execution via this transport is not implemented; use the CLI";

/// Status of a planned step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    /// Will run
    Pending,
    /// Runs only if its condition holds
    Conditional,
    /// Ran and failed
    Failed,
    /// Ran and succeeded
    Success,
    /// Not run
    Skipped,
}

/// Whether a run was planned or executed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// Plan only
    DryRun,
    /// Real execution
    Executed,
}

/// One step of a plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepPlan {
    /// Step id
    pub step_id: String,
    /// Step type
    #[serde(rename = "type")]
    pub step_type: StepType,
    /// Preliminary status
    pub status: StepStatus,
    /// Condition expression for conditional steps
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

/// Outcome of a `workflow_run` call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    /// True when the requested mode completed
    pub success: bool,
    /// Requested mode
    pub mode: RunMode,
    /// Step plan, empty on failure
    pub plan: Vec<StepPlan>,
    /// Failure description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Workflow name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow: Option<String>,
}

impl RunResult {
    /// Result for a run that asked for real execution
    pub fn not_executed(workflow: &WorkflowDefinition) -> Self {
        Self {
            success: false,
            mode: RunMode::Executed,
            plan: Vec::new(),
            error: Some(EXECUTION_NOT_SUPPORTED.to_string()),
            workflow: Some(workflow.name.clone()),
        }
    }
}

/// Check supplied inputs against the declarations
///
/// Every declared input that is required and has no default must be present,
/// and every supplied value for a typed input must have that type.
pub fn validate_inputs(
    workflow: &WorkflowDefinition,
    inputs: &Map<String, Value>,
) -> Result<(), Vec<String>> {
    let mut problems = Vec::new();
    for declaration in &workflow.inputs {
        match inputs.get(&declaration.name) {
            None if declaration.needs_value() => {
                problems.push(format!("missing required input '{}'", declaration.name));
            }
            Some(value) => {
                if let Some(expected) = declaration.input_type {
                    if !expected.matches(value) {
                        problems.push(format!(
                            "input '{}' must be of type {expected}",
                            declaration.name
                        ));
                    }
                }
            }
            None => {}
        }
    }
    if problems.is_empty() {
        Ok(())
    } else {
        Err(problems)
    }
}

/// Plan every step in source order
pub fn plan_steps(workflow: &WorkflowDefinition) -> Vec<StepPlan> {
    workflow
        .steps
        .iter()
        .map(|step| StepPlan {
            step_id: step.id.clone(),
            step_type: step.step_type,
            status: if step.is_conditional() {
                StepStatus::Conditional
            } else {
                StepStatus::Pending
            },
            condition: step.condition.as_ref().map(|c| c.expression.clone()),
        })
        .collect()
}

/// Validate inputs and plan the workflow without executing it
pub fn plan_dry_run(workflow: &WorkflowDefinition, inputs: &Map<String, Value>) -> RunResult {
    if let Err(problems) = validate_inputs(workflow, inputs) {
        return RunResult {
            success: false,
            mode: RunMode::DryRun,
            plan: Vec::new(),
            error: Some(format!(
                "input-validation-failed: {}",
                problems.join("; ")
            )),
            workflow: Some(workflow.name.clone()),
        };
    }

    RunResult {
        success: true,
        mode: RunMode::DryRun,
        plan: plan_steps(workflow),
        error: None,
        workflow: Some(workflow.name.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_workflow;
    use serde_json::json;

    const WORKFLOW: &str = r#"
name: deploy
inputs:
  - name: x
    required: true
  - name: retries
    type: number
    default: 3
steps:
  - id: build
    type: shell
    command: make
  - id: notify
    type: http
    url: https://example.com/hook
    condition:
      expression: "inputs.notify == true"
"#;

    fn inputs(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_missing_required_input_names_it() {
        let wf = parse_workflow(WORKFLOW).unwrap();
        let result = plan_dry_run(&wf, &Map::new());
        assert!(!result.success);
        assert_eq!(result.mode, RunMode::DryRun);
        let error = result.error.unwrap();
        assert!(error.starts_with("input-validation-failed"));
        assert!(error.contains("'x'"));
        assert!(result.plan.is_empty());
    }

    #[test]
    fn test_wrong_input_type() {
        let wf = parse_workflow(WORKFLOW).unwrap();
        let result = plan_dry_run(&wf, &inputs(json!({"x": 1, "retries": "three"})));
        assert!(!result.success);
        assert!(result.error.unwrap().contains("'retries' must be of type number"));
    }

    #[test]
    fn test_plan_statuses_in_source_order() {
        let wf = parse_workflow(WORKFLOW).unwrap();
        let result = plan_dry_run(&wf, &inputs(json!({"x": "value"})));
        assert!(result.success);
        assert_eq!(result.workflow.as_deref(), Some("deploy"));
        let statuses: Vec<_> = result
            .plan
            .iter()
            .map(|p| (p.step_id.as_str(), p.status))
            .collect();
        assert_eq!(
            statuses,
            vec![
                ("build", StepStatus::Pending),
                ("notify", StepStatus::Conditional)
            ]
        );
        assert_eq!(
            result.plan[1].condition.as_deref(),
            Some("inputs.notify == true")
        );
    }

    #[test]
    fn test_not_executed() {
        let wf = parse_workflow(WORKFLOW).unwrap();
        let result = RunResult::not_executed(&wf);
        assert!(!result.success);
        assert_eq!(result.mode, RunMode::Executed);
        assert_eq!(result.error.as_deref(), Some(EXECUTION_NOT_SUPPORTED));
        assert!(result.plan.is_empty());
        assert_eq!(result.workflow.as_deref(), Some("deploy"));
    }

    #[test]
    fn test_serialized_shape() {
        let wf = parse_workflow(WORKFLOW).unwrap();
        let value = serde_json::to_value(plan_dry_run(&wf, &inputs(json!({"x": 1})))).unwrap();
        assert_eq!(value["mode"], "dry_run");
        assert_eq!(value["plan"][0]["step_id"], "build");
        assert_eq!(value["plan"][0]["type"], "shell");
        assert_eq!(value["plan"][1]["status"], "conditional");
        assert!(value.get("error").is_none());
    }
}
