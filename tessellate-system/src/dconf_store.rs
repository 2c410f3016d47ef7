// tessellate-system/src/dconf_store.rs

use std::io::Write;
use std::process::{Command, Stdio};

use tessellate_domain::settings_overlay::{ConfigStore, SettingsOverlayError, TypedValue};
use tracing::{debug, warn};

use crate::error::StoreCommandError;

/// Captured result of an external command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs a program to completion, optionally feeding `stdin`.
pub trait CommandRunner: Send + Sync {
    fn run(&self, program: &str, args: &[&str], stdin: Option<&str>) -> Result<CommandOutput, StoreCommandError>;
}

/// [`CommandRunner`] backed by `std::process::Command`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&self, program: &str, args: &[&str], stdin: Option<&str>) -> Result<CommandOutput, StoreCommandError> {
        let spawn_error = |source| StoreCommandError::SpawnError { command: command_line(program, args), source };

        let output = match stdin {
            None => Command::new(program).args(args).stdin(Stdio::null()).output().map_err(spawn_error)?,
            Some(input) => {
                let mut child = Command::new(program)
                    .args(args)
                    .stdin(Stdio::piped())
                    .stdout(Stdio::piped())
                    .stderr(Stdio::piped())
                    .spawn()
                    .map_err(spawn_error)?;
                {
                    let mut child_stdin = child
                        .stdin
                        .take()
                        .ok_or_else(|| StoreCommandError::StdInNotAvailable(command_line(program, args)))?;
                    child_stdin.write_all(input.as_bytes())?;
                }
                child.wait_with_output()?
            }
        };

        Ok(CommandOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

fn command_line(program: &str, args: &[&str]) -> String {
    std::iter::once(program).chain(args.iter().copied()).collect::<Vec<_>>().join(" ")
}

/// [`ConfigStore`] on the user's dconf database, through `gsettings` for single
/// keys and `dconf dump`/`dconf load` for whole namespaces.
#[derive(Debug, Default)]
pub struct DconfConfigStore<R: CommandRunner = SystemCommandRunner> {
    runner: R,
}

impl DconfConfigStore<SystemCommandRunner> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<R: CommandRunner> DconfConfigStore<R> {
    pub fn with_runner(runner: R) -> Self {
        Self { runner }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Runs the command and returns its stdout if it exited successfully.
    fn run_checked(&self, program: &str, args: &[&str], stdin: Option<&str>) -> Result<String, StoreCommandError> {
        debug!(command = %command_line(program, args), "Running settings command");
        let output = self.runner.run(program, args, stdin)?;
        if output.success() {
            Ok(output.stdout)
        } else {
            Err(StoreCommandError::CommandFailed {
                command: command_line(program, args),
                exit_code: output.exit_code,
                stderr: output.stderr.trim().to_string(),
            })
        }
    }
}

impl<R: CommandRunner> ConfigStore for DconfConfigStore<R> {
    fn get(&self, schema: &str, key: &str) -> Result<TypedValue, SettingsOverlayError> {
        let stdout = self.run_checked("gsettings", &["get", schema, key], None).map_err(|err| {
            debug!(schema, key, error = %err, "gsettings get failed");
            SettingsOverlayError::read_unavailable(schema, key)
        })?;
        Ok(TypedValue::decode(stdout.trim())?)
    }

    fn set(&self, schema: &str, key: &str, value: &TypedValue) -> bool {
        let text = value.encode();
        match self.run_checked("gsettings", &["set", schema, key, text.as_str()], None) {
            Ok(_) => true,
            Err(err) => {
                warn!(schema, key, error = %err, "gsettings set failed");
                false
            }
        }
    }

    fn list_keys(&self, schema: &str) -> Vec<String> {
        match self.run_checked("gsettings", &["list-keys", schema], None) {
            Ok(stdout) => {
                let mut keys: Vec<String> =
                    stdout.lines().map(str::trim).filter(|l| !l.is_empty()).map(str::to_string).collect();
                keys.sort();
                keys
            }
            Err(err) => {
                warn!(schema, error = %err, "gsettings list-keys failed");
                Vec::new()
            }
        }
    }

    /// `gsettings list-children` prints `name schema-id` per line; only the id is kept.
    fn list_children(&self, schema: &str) -> Vec<String> {
        match self.run_checked("gsettings", &["list-children", schema], None) {
            Ok(stdout) => stdout
                .lines()
                .filter_map(|line| line.split_whitespace().nth(1))
                .map(str::to_string)
                .collect(),
            Err(err) => {
                warn!(schema, error = %err, "gsettings list-children failed");
                Vec::new()
            }
        }
    }

    fn reset_to_default(&self, schema: &str, key: &str) {
        if let Err(err) = self.run_checked("gsettings", &["reset", schema, key], None) {
            warn!(schema, key, error = %err, "gsettings reset failed");
        }
    }

    fn dump_namespace(&self, path: &str) -> Result<String, SettingsOverlayError> {
        self.run_checked("dconf", &["dump", path], None)
            .map_err(|err| SettingsOverlayError::DumpFailed { path: path.to_string(), reason: err.to_string() })
    }

    fn load_namespace(&self, path: &str, blob: &str) -> bool {
        match self.run_checked("dconf", &["load", path], Some(blob)) {
            Ok(_) => true,
            Err(err) => {
                warn!(path, error = %err, "dconf load failed");
                false
            }
        }
    }
}
