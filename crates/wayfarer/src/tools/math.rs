use async_trait::async_trait;
use serde_json::{json, Value};

use super::registry::ToolExecutor;
use crate::models::tool::Tool;

#[derive(Debug, Clone, Copy)]
enum Op {
    Addition,
    Multiply,
    Subtraction,
    Division,
}

/// The four arithmetic tools the planner uses for cost calculations.
pub struct ArithmeticTool {
    op: Op,
}

impl ArithmeticTool {
    pub fn addition() -> Self {
        Self { op: Op::Addition }
    }

    pub fn multiply() -> Self {
        Self { op: Op::Multiply }
    }

    pub fn subtraction() -> Self {
        Self { op: Op::Subtraction }
    }

    pub fn division() -> Self {
        Self { op: Op::Division }
    }

    fn name(&self) -> &'static str {
        match self.op {
            Op::Addition => "addition",
            Op::Multiply => "multiply",
            Op::Subtraction => "subtraction",
            Op::Division => "division",
        }
    }

    fn description(&self) -> &'static str {
        match self.op {
            Op::Addition => "Add two numbers.",
            Op::Multiply => "Multiply two numbers.",
            Op::Subtraction => "Subtract the second number from the first.",
            Op::Division => "Divide the first number by the second.",
        }
    }
}

#[async_trait]
impl ToolExecutor for ArithmeticTool {
    fn descriptor(&self) -> Tool {
        Tool::new(
            self.name(),
            self.description(),
            json!({
                "type": "object",
                "properties": {
                    "a": { "type": "number", "description": "The first operand" },
                    "b": { "type": "number", "description": "The second operand" }
                },
                "required": ["a", "b"]
            }),
        )
    }

    async fn run(&self, args: Value) -> String {
        let (a, b) = match (args["a"].as_f64(), args["b"].as_f64()) {
            (Some(a), Some(b)) => (a, b),
            _ => return "Both 'a' and 'b' must be numbers.".to_string(),
        };

        match self.op {
            Op::Addition => format_number(a + b),
            Op::Multiply => format_number(a * b),
            Op::Subtraction => format_number(a - b),
            Op::Division => {
                if b == 0.0 {
                    "Denominator cannot be zero.".to_string()
                } else {
                    format_number(a / b)
                }
            }
        }
    }
}

/// Render integral results without a trailing `.0` so totals read naturally
/// in the conversation.
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}
