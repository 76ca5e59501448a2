//! JSON command protocol for scripted annotation sessions.
//!
//! Each command maps onto one harness verb, so a session can be replayed
//! from a file or driven by an external agent without a window.

use serde::{Deserialize, Serialize};

use crate::harness::TestHarness;

/// A command a scripted session can execute.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum AgentCommand {
    /// Primary press with the cursor over a world point
    Click { at: [f64; 3] },
    /// Primary press over empty background
    ClickBackground,
    /// Secondary press with the cursor over a world point
    RightClick { at: [f64; 3] },
    /// Pointer move with the cursor over a world point
    DragTo { at: [f64; 3] },
    /// Primary release
    Release,
    /// Key press by symbolic name
    Press { key: String },
    /// Report annotations, selection and marker radius.
    Inspect,
    /// Export the annotation list as JSON text.
    Export,
}

/// Response from executing a command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl CommandResponse {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
            data: None,
        }
    }

    fn ok_with_data(data: serde_json::Value) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
            data: None,
        }
    }

    fn from_result(result: crate::error::Result<()>) -> Self {
        match result {
            Ok(()) => Self::ok(),
            Err(e) => Self::err(e.to_string()),
        }
    }
}

/// Execute a single command on the harness.
pub fn execute_command(harness: &mut TestHarness, cmd: AgentCommand) -> CommandResponse {
    match cmd {
        AgentCommand::Click { at } => CommandResponse::from_result(harness.click(at)),
        AgentCommand::ClickBackground => CommandResponse::from_result(harness.click_background()),
        AgentCommand::RightClick { at } => CommandResponse::from_result(harness.right_click(at)),
        AgentCommand::DragTo { at } => CommandResponse::from_result(harness.drag_to(at)),
        AgentCommand::Release => CommandResponse::from_result(harness.release()),
        AgentCommand::Press { key } => CommandResponse::from_result(harness.press(&key)),

        AgentCommand::Inspect => {
            let annotations = match serde_json::to_value(harness.annotations()) {
                Ok(v) => v,
                Err(e) => return CommandResponse::err(e.to_string()),
            };
            CommandResponse::ok_with_data(serde_json::json!({
                "annotation_count": harness.annotation_count(),
                "annotations": annotations,
                "selected_index": harness.selected_index(),
                "dragging": harness.is_dragging(),
                "radius": harness.radius(),
            }))
        }

        AgentCommand::Export => match harness.export_json() {
            Ok(json) => CommandResponse::ok_with_data(serde_json::json!({ "annotations_json": json })),
            Err(e) => CommandResponse::err(e.to_string()),
        },
    }
}

/// Parse and execute a single JSON command string.
pub fn execute_json(harness: &mut TestHarness, json: &str) -> Result<CommandResponse, String> {
    let cmd: AgentCommand =
        serde_json::from_str(json).map_err(|e| format!("Invalid command JSON: {e}"))?;
    Ok(execute_command(harness, cmd))
}

/// Parse and execute multiple JSON commands (array).
pub fn execute_json_batch(
    harness: &mut TestHarness,
    json: &str,
) -> Result<Vec<CommandResponse>, String> {
    let cmds: Vec<AgentCommand> =
        serde_json::from_str(json).map_err(|e| format!("Invalid commands JSON: {e}"))?;
    Ok(cmds
        .into_iter()
        .map(|cmd| execute_command(harness, cmd))
        .collect())
}
