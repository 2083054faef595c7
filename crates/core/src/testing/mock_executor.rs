//! Mock command executor for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::exec::{CommandExecutor, CommandSpec, ExecError, ExitOutcome, Redirect};

#[derive(Debug, Clone)]
enum ScriptedResponse {
    Exit(i32),
    NotFound,
}

/// Response for commands of one program whose arguments contain every needle.
#[derive(Debug, Clone)]
struct ScriptedRule {
    program: String,
    needles: Vec<String>,
    response: ScriptedResponse,
}

impl ScriptedRule {
    fn matches(&self, spec: &CommandSpec) -> bool {
        spec.program == self.program
            && self
                .needles
                .iter()
                .all(|needle| spec.args.iter().any(|arg| arg.contains(needle.as_str())))
    }
}

/// Mock implementation of the CommandExecutor trait.
///
/// Provides controllable behavior for testing:
/// - Record every command for assertions
/// - Script exit codes per program, optionally narrowed by arguments
/// - Simulate a missing program
/// - Create redirect targets like a real process would
///
/// Commands exit 0 unless a rule says otherwise. When several rules match,
/// the most recently added one wins.
#[derive(Debug, Clone, Default)]
pub struct MockExecutor {
    /// Recorded commands, in call order.
    commands: Arc<RwLock<Vec<CommandSpec>>>,
    /// Scripted responses.
    rules: Arc<RwLock<Vec<ScriptedRule>>>,
    /// Text written to redirected stdout/stderr, by program.
    output: Arc<RwLock<HashMap<String, (String, String)>>>,
}

impl MockExecutor {
    /// Create a new mock executor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded commands.
    pub async fn commands(&self) -> Vec<CommandSpec> {
        self.commands.read().await.clone()
    }

    /// Get recorded commands for one program.
    pub async fn commands_for(&self, program: &str) -> Vec<CommandSpec> {
        self.commands
            .read()
            .await
            .iter()
            .filter(|spec| spec.program == program)
            .cloned()
            .collect()
    }

    /// Get recorded commands rendered as command lines.
    pub async fn command_lines(&self) -> Vec<String> {
        self.commands
            .read()
            .await
            .iter()
            .map(CommandSpec::describe)
            .collect()
    }

    /// Get the number of commands run.
    pub async fn command_count(&self) -> usize {
        self.commands.read().await.len()
    }

    /// Make every run of `program` exit with `code`.
    pub async fn set_exit_code(&self, program: &str, code: i32) {
        self.add_rule(program, &[], ScriptedResponse::Exit(code)).await;
    }

    /// Make runs of `program` exit with `code` when every needle occurs in
    /// some argument.
    pub async fn set_exit_code_matching(&self, program: &str, needles: &[&str], code: i32) {
        self.add_rule(program, needles, ScriptedResponse::Exit(code))
            .await;
    }

    /// Make `program` fail to start as if it were not installed.
    pub async fn set_not_found(&self, program: &str) {
        self.add_rule(program, &[], ScriptedResponse::NotFound).await;
    }

    /// Text `program` writes to redirected stdout and stderr.
    pub async fn set_output(&self, program: &str, stdout: &str, stderr: &str) {
        self.output
            .write()
            .await
            .insert(program.to_string(), (stdout.to_string(), stderr.to_string()));
    }

    async fn add_rule(&self, program: &str, needles: &[&str], response: ScriptedResponse) {
        self.rules.write().await.push(ScriptedRule {
            program: program.to_string(),
            needles: needles.iter().map(|s| s.to_string()).collect(),
            response,
        });
    }

    async fn write_redirect(redirect: &Redirect, text: &str) -> Result<(), ExecError> {
        if let Redirect::File(path) = redirect {
            tokio::fs::write(path, text)
                .await
                .map_err(|source| ExecError::Redirect {
                    path: path.clone(),
                    source,
                })?;
        }
        Ok(())
    }
}

#[async_trait]
impl CommandExecutor for MockExecutor {
    fn name(&self) -> &str {
        "mock"
    }

    async fn run(&self, spec: &CommandSpec) -> Result<ExitOutcome, ExecError> {
        self.commands.write().await.push(spec.clone());

        let response = self
            .rules
            .read()
            .await
            .iter()
            .rev()
            .find(|rule| rule.matches(spec))
            .map(|rule| rule.response.clone())
            .unwrap_or(ScriptedResponse::Exit(0));

        let code = match response {
            ScriptedResponse::NotFound => {
                return Err(ExecError::NotFound {
                    program: spec.program.clone(),
                });
            }
            ScriptedResponse::Exit(code) => code,
        };

        let (stdout, stderr) = self
            .output
            .read()
            .await
            .get(&spec.program)
            .cloned()
            .unwrap_or_default();
        Self::write_redirect(&spec.stdout, &stdout).await?;
        Self::write_redirect(&spec.stderr, &stderr).await?;

        Ok(ExitOutcome::from_code(code))
    }
}
