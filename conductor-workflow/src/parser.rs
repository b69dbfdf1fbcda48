//! YAML front end for workflow definitions
//!
//! Decoding and the cross-field rules in
//! [`WorkflowDefinition::validate_structure`] run together, so every caller
//! that holds a [`WorkflowDefinition`] holds one that passed them.

use crate::error::{WorkflowError, WorkflowResult};
use crate::WorkflowDefinition;

/// Parse and check a workflow from YAML text
pub fn parse_workflow(yaml: &str) -> WorkflowResult<WorkflowDefinition> {
    let definition: WorkflowDefinition =
        serde_yaml_ng::from_str(yaml).map_err(|e| WorkflowError::Parse {
            message: e.to_string(),
        })?;
    check(definition)
}

fn check(definition: WorkflowDefinition) -> WorkflowResult<WorkflowDefinition> {
    match definition.validate_structure() {
        Ok(()) => {
            tracing::trace!(
                workflow = %definition.name,
                steps = definition.steps.len(),
                "parsed workflow"
            );
            Ok(definition)
        }
        Err(problems) => Err(WorkflowError::Invalid {
            name: definition.name,
            problems,
        }),
    }
}
