//! Workflow definitions for Conductor
//!
//! This crate owns the workflow document format: the parsed
//! [`WorkflowDefinition`], the embedded JSON Schema, the staged validator that
//! turns YAML into [`ValidationOutcome`]s, and the dry-run planner.

mod definition;
mod error;
pub mod parser;
pub mod planner;
pub mod schema;
pub mod validator;

pub use definition::{
    Condition, InputDeclaration, InputType, OutputDeclaration, Step, StepType,
    WorkflowDefinition,
};
pub use error::{WorkflowError, WorkflowResult};
pub use parser::parse_workflow;
pub use planner::{
    plan_dry_run, plan_steps, validate_inputs, RunMode, RunResult, StepPlan, StepStatus,
    EXECUTION_NOT_SUPPORTED,
};
pub use schema::{workflow_schema, WORKFLOW_SCHEMA};
pub use validator::{
    validate_workflow, Diagnostic, DiagnosticSeverity, ValidationOutcome, MAX_RECOMMENDED_STEPS,
    MAX_WORKFLOW_SIZE,
};
