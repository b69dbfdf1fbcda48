//! End-to-end dispatch scenarios against a fully registered server

use conductor_tools::{McpServer, ServerConfig, ToolContext};
use rmcp::model::{CallToolResult, JsonObject, RawContent};
use serde_json::{json, Value};
use serial_test::serial;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

fn server() -> McpServer {
    let context = ToolContext::new("test").unwrap();
    McpServer::with_context(ServerConfig::default(), context)
}

fn args(value: Value) -> Option<JsonObject> {
    match value {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

fn text(result: &CallToolResult) -> String {
    match &result.content[0].raw {
        RawContent::Text(text) => text.text.clone(),
        other => panic!("expected text content, got {other:?}"),
    }
}

fn body(result: &CallToolResult) -> Value {
    assert_eq!(result.is_error, Some(false), "unexpected error: {}", text(result));
    serde_json::from_str(&text(result)).unwrap()
}

async fn call(server: &McpServer, name: &str, arguments: Value) -> CallToolResult {
    server
        .dispatch(name, args(arguments), &CancellationToken::new())
        .await
}

/// Temporary directory added to the path allow-list for the test's duration
struct AllowedDir {
    dir: TempDir,
}

impl AllowedDir {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        std::env::set_var("CONDUCTOR_ALLOWED_PATHS", dir.path());
        Self { dir }
    }

    fn write(&self, file: &str, contents: &str) -> String {
        let path = self.dir.path().join(file);
        std::fs::write(&path, contents).unwrap();
        path.to_string_lossy().into_owned()
    }
}

impl Drop for AllowedDir {
    fn drop(&mut self) {
        std::env::remove_var("CONDUCTOR_ALLOWED_PATHS");
    }
}

#[test_log::test(tokio::test)]
async fn validate_good() {
    let result = call(
        &server(),
        "workflow_validate",
        json!({"workflow_yaml": "name: w\nsteps: []\n"}),
    )
    .await;
    let outcome = body(&result);

    assert_eq!(outcome["valid"], true);
    assert_eq!(outcome["errors"], json!([]));
    let warnings: Vec<String> = outcome["warnings"]
        .as_array()
        .unwrap()
        .iter()
        .map(|w| w["message"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(warnings.len(), 2);
    assert!(warnings.iter().any(|m| m.contains("no steps")));
    assert!(warnings.iter().any(|m| m.contains("description")));
}

#[test_log::test(tokio::test)]
async fn validate_yaml_bad() {
    let result = call(
        &server(),
        "workflow_validate",
        json!({"workflow_yaml": "name: w\n\tsteps:"}),
    )
    .await;
    let outcome = body(&result);

    assert_eq!(outcome["valid"], false);
    let errors = outcome["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert!(errors[0]["message"]
        .as_str()
        .unwrap()
        .starts_with("YAML syntax error"));
}

#[test_log::test(tokio::test)]
async fn list_templates_empty_filter() {
    let result = call(&server(), "list_templates", json!({})).await;
    let templates = body(&result)["templates"].as_array().unwrap().clone();

    let names: Vec<&str> = templates
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec!["blank", "code-review", "summarize", "shell-pipeline", "api-health"]
    );
    assert!(templates
        .iter()
        .all(|t| !t["description"].as_str().unwrap().is_empty()));
}

#[test_log::test(tokio::test)]
async fn scaffold_then_validate() {
    let server = server();
    let result = call(
        &server,
        "scaffold",
        json!({"template": "blank", "name": "my-wf"}),
    )
    .await;
    let scaffolded = body(&result);
    let yaml = scaffolded["workflow_yaml"].as_str().unwrap();

    assert!(yaml.contains("name: my-wf"));
    assert!(!yaml.contains("{{ name }}"));
    assert!(!yaml.contains("{{.Name}}"));

    let result = call(&server, "workflow_validate", json!({"workflow_yaml": yaml})).await;
    assert_eq!(body(&result)["valid"], true);
}

#[test_log::test(tokio::test)]
async fn every_template_scaffolds_a_valid_workflow() {
    let server = server();
    let parameters = json!({"api-health": {"url": "https://example.com/health"}});

    for template in ["blank", "code-review", "summarize", "shell-pipeline", "api-health"] {
        let mut request = json!({"template": template, "name": format!("{template}-flow")});
        if let Some(extra) = parameters.get(template) {
            request["parameters"] = extra.clone();
        }
        let result = call(&server, "scaffold", request).await;
        let yaml = body(&result)["workflow_yaml"].as_str().unwrap().to_string();

        let result = call(&server, "workflow_validate", json!({"workflow_yaml": yaml})).await;
        assert_eq!(body(&result)["valid"], true, "template {template}");
    }
}

#[test_log::test(tokio::test)]
#[serial]
async fn run_dry_missing_required_input() {
    let allowed = AllowedDir::new();
    let path = allowed.write(
        "needs-x.yaml",
        "name: needs-x\ninputs:\n  - name: x\n    required: true\nsteps:\n  - id: a\n    type: shell\n    command: echo\n",
    );

    let result = call(
        &server(),
        "workflow_run",
        json!({"workflow_path": path, "inputs": {}, "dry_run": true}),
    )
    .await;
    let run = body(&result);

    assert_eq!(run["success"], false);
    assert!(run["error"].as_str().unwrap().contains("'x'"));
}

#[test_log::test(tokio::test)]
#[serial]
async fn run_nondry_rate_limited() {
    let allowed = AllowedDir::new();
    let path = allowed.write(
        "flow.yaml",
        "name: flow\nsteps:\n  - id: a\n    type: shell\n    command: echo\n",
    );
    let server = server();
    let request = json!({"workflow_path": path, "dry_run": false});

    for _ in 0..10 {
        let result = call(&server, "workflow_run", request.clone()).await;
        assert_eq!(body(&result)["mode"], "executed");
    }

    let result = call(&server, "workflow_run", request).await;
    assert_eq!(result.is_error, Some(true));
    let message = text(&result);
    assert!(message.starts_with("rate-limited:"));
    assert!(message.contains("dry_run"));
}

#[test_log::test(tokio::test)]
#[serial]
async fn dry_runs_do_not_consume_run_tokens() {
    let allowed = AllowedDir::new();
    let path = allowed.write(
        "flow.yaml",
        "name: flow\nsteps:\n  - id: a\n    type: shell\n    command: echo\n",
    );
    let server = server();

    for _ in 0..15 {
        let result = call(&server, "workflow_run", json!({"workflow_path": path})).await;
        assert_eq!(body(&result)["success"], true);
    }
    let result = call(
        &server,
        "workflow_run",
        json!({"workflow_path": path, "dry_run": false}),
    )
    .await;
    assert_eq!(body(&result)["mode"], "executed");
}

#[test_log::test(tokio::test)]
#[serial]
async fn validate_and_run_agree_on_duplicate_keys() {
    let allowed = AllowedDir::new();
    let yaml = "name: a\nname: b\nsteps:\n  - id: s\n    type: shell\n    command: echo\n";
    let path = allowed.write("dup.yaml", yaml);
    let server = server();

    let result = call(&server, "workflow_validate", json!({"workflow_yaml": yaml})).await;
    let outcome = body(&result);
    assert_eq!(outcome["valid"], false);
    assert!(outcome["errors"][0]["message"]
        .as_str()
        .unwrap()
        .contains("duplicate"));

    let result = call(&server, "workflow_run", json!({"workflow_path": path})).await;
    assert_eq!(result.is_error, Some(true));
    assert!(text(&result).starts_with("invalid-argument: invalid workflow:"));
}

#[test_log::test(tokio::test)]
#[serial]
async fn validated_workflow_runs() {
    let allowed = AllowedDir::new();
    let yaml = "name: ok\ndescription: d\nsteps:\n  - id: s\n    type: shell\n    command: echo\n";
    let path = allowed.write("ok.yaml", yaml);
    let server = server();

    let result = call(&server, "workflow_validate", json!({"workflow_yaml": yaml})).await;
    assert_eq!(body(&result)["valid"], true);

    let result = call(&server, "workflow_run", json!({"workflow_path": path})).await;
    let run = body(&result);
    assert_eq!(run["success"], true);
    assert_eq!(run["plan"][0]["step_id"], "s");
}

#[test_log::test(tokio::test)]
async fn path_traversal_rejected() {
    let result = call(
        &server(),
        "workflow_run",
        json!({"workflow_path": "../etc/passwd"}),
    )
    .await;

    assert_eq!(result.is_error, Some(true));
    assert!(text(&result).starts_with("invalid-path:"));
}

#[test_log::test(tokio::test)]
#[serial]
async fn health_no_config() {
    let dir = TempDir::new().unwrap();
    std::env::set_var("CONDUCTOR_CONFIG", dir.path().join("missing.yaml"));
    let result = call(&server(), "health", json!({})).await;
    std::env::remove_var("CONDUCTOR_CONFIG");

    let report = body(&result);
    assert_eq!(report["healthy"], false);
    assert_eq!(report["checks"][0]["status"], "fail");
    assert!(report["checks"][0]["remediation"]
        .as_str()
        .unwrap()
        .contains("setup"));
}
