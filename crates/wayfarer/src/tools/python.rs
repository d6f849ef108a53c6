use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;
use tokio::process::Command;

use super::registry::ToolExecutor;
use crate::models::tool::Tool;

const EXECUTION_TIMEOUT: Duration = Duration::from_secs(30);

/// General-purpose compute escape hatch: runs a snippet under `python3 -I`
/// (isolated mode, no user site or env-derived sys.path) and returns whatever
/// it printed. Failures inside the snippet come back as text like any other
/// tool result.
pub struct PythonReplTool {
    interpreter: String,
    timeout: Duration,
}

impl PythonReplTool {
    pub fn new() -> Self {
        Self {
            interpreter: "python3".to_string(),
            timeout: EXECUTION_TIMEOUT,
        }
    }

    pub fn with_interpreter(mut self, interpreter: impl Into<String>) -> Self {
        self.interpreter = interpreter.into();
        self
    }

    async fn execute(&self, command: &str) -> Result<String, String> {
        let run = Command::new(&self.interpreter)
            .args(["-I", "-c", command])
            .kill_on_drop(true)
            .output();

        let output = tokio::time::timeout(self.timeout, run)
            .await
            .map_err(|_| format!("execution timed out after {}s", self.timeout.as_secs()))?
            .map_err(|e| e.to_string())?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        if !output.status.success() {
            return Err(if stderr.is_empty() {
                format!("exited with {}", output.status)
            } else {
                stderr.trim_end().to_string()
            });
        }

        let mut combined = stdout.trim_end().to_string();
        if !stderr.trim().is_empty() {
            combined.push_str(&format!("\n{}", stderr.trim_end()));
        }
        if combined.is_empty() {
            combined = "(no output; use print() to see results)".to_string();
        }
        Ok(combined)
    }
}

impl Default for PythonReplTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolExecutor for PythonReplTool {
    fn descriptor(&self) -> Tool {
        Tool::new(
            "python_repl",
            "A Python shell for complex calculations. Input should be a valid python command. \
             Print values to see them.",
            json!({
                "type": "object",
                "properties": {
                    "command": {
                        "type": "string",
                        "description": "The python code to run, e.g. print(250 * 4 + 500)"
                    }
                },
                "required": ["command"]
            }),
        )
    }

    async fn run(&self, args: Value) -> String {
        let command = args["command"].as_str().unwrap_or_default();
        match self.execute(command).await {
            Ok(output) => output,
            Err(e) => format!("python_repl failed: {e}"),
        }
    }
}
