//! Subprocess launch descriptors and the language client contract.

use std::fmt;
use std::io;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::{Child, Command};

/// How long `stop` waits for the server to exit after its stdin closes
/// before killing it.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

use crate::config::{ClientConfig, TraceLevel};

/// Transport the editor uses to talk to the server process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Stdio,
}

/// Launch mode requested by the host editor. Both modes produce the same
/// descriptor; debugging the server happens out of band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchMode {
    Run,
    Debug,
}

/// Everything needed to start the external analysis process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    pub command: String,
    pub args: Vec<String>,
    pub transport: Transport,
    pub trace: TraceLevel,
}

impl LaunchSpec {
    /// Build the descriptor from resolved configuration: configured
    /// interpreter as command, resolved script path as its sole argument.
    pub fn from_config(config: &ClientConfig, install_dir: &Path, _mode: LaunchMode) -> Self {
        let script = config.resolved_script_path(install_dir);
        Self {
            command: config.server.interpreter_path.clone(),
            args: vec![script.to_string_lossy().into_owned()],
            transport: Transport::Stdio,
            trace: config.trace.server,
        }
    }
}

/// Errors from starting or stopping the client subprocess.
#[derive(Debug)]
pub enum ClientError {
    Spawn(io::Error),
    Stop(io::Error),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Spawn(err) => write!(f, "failed to spawn server process: {err}"),
            ClientError::Stop(err) => write!(f, "failed to stop server process: {err}"),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientError::Spawn(err) | ClientError::Stop(err) => Some(err),
        }
    }
}

/// Narrow contract the shim requires of a protocol client: start it once,
/// stop it once. Protocol framing and the initialization handshake live
/// behind this trait, never in the shim.
#[allow(async_fn_in_trait)]
pub trait LanguageClient {
    fn start(&mut self, spec: &LaunchSpec) -> Result<(), ClientError>;
    async fn stop(&mut self) -> Result<(), ClientError>;
}

/// A client that runs the server as a child process wired to piped stdio.
#[derive(Debug, Default)]
pub struct StdioClient {
    child: Option<Child>,
}

impl StdioClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&mut self) -> bool {
        match self.child.as_mut() {
            Some(child) => matches!(child.try_wait(), Ok(None)),
            None => false,
        }
    }
}

impl LanguageClient for StdioClient {
    fn start(&mut self, spec: &LaunchSpec) -> Result<(), ClientError> {
        let child = Command::new(&spec.command)
            .args(&spec.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .map_err(ClientError::Spawn)?;
        self.child = Some(child);
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), ClientError> {
        if let Some(mut child) = self.child.take() {
            // Closing stdin signals EOF; a well-behaved server exits on it.
            drop(child.stdin.take());
            match tokio::time::timeout(SHUTDOWN_GRACE, child.wait()).await {
                Ok(waited) => {
                    waited.map_err(ClientError::Stop)?;
                }
                Err(_) => {
                    child.start_kill().map_err(ClientError::Stop)?;
                    child.wait().await.map_err(ClientError::Stop)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_defaults;
    use std::path::Path;

    #[test]
    fn spec_uses_interpreter_and_script_argument() {
        let config = load_defaults().unwrap();
        let spec = LaunchSpec::from_config(&config, Path::new("/opt/ext"), LaunchMode::Run);
        assert_eq!(spec.command, "python");
        assert_eq!(spec.args, vec!["/opt/ext/server/cms2_lsp_server.py"]);
        assert_eq!(spec.transport, Transport::Stdio);
        assert_eq!(spec.trace, TraceLevel::Off);
    }

    #[test]
    fn run_and_debug_produce_identical_specs() {
        let config = load_defaults().unwrap();
        let run = LaunchSpec::from_config(&config, Path::new("/opt/ext"), LaunchMode::Run);
        let debug = LaunchSpec::from_config(&config, Path::new("/opt/ext"), LaunchMode::Debug);
        assert_eq!(run, debug);
    }

    #[tokio::test]
    async fn stdio_client_starts_and_stops_a_process() {
        let spec = LaunchSpec {
            command: "sleep".into(),
            args: vec!["30".into()],
            transport: Transport::Stdio,
            trace: TraceLevel::Off,
        };

        let mut client = StdioClient::new();
        client.start(&spec).expect("process spawns");
        assert!(client.is_running());

        client.stop().await.expect("process stops");
        assert!(!client.is_running());
    }

    #[tokio::test]
    async fn missing_interpreter_is_a_spawn_error() {
        let spec = LaunchSpec {
            command: "/no/such/interpreter".into(),
            args: Vec::new(),
            transport: Transport::Stdio,
            trace: TraceLevel::Off,
        };

        let err = StdioClient::new().start(&spec).unwrap_err();
        assert!(matches!(err, ClientError::Spawn(_)));
    }

    #[tokio::test]
    async fn stopping_an_unstarted_client_is_a_no_op() {
        let mut client = StdioClient::new();
        client.stop().await.expect("nothing to stop");
    }

    #[tokio::test]
    async fn stop_lets_the_server_exit_on_stdin_eof() {
        // cat reads stdin until EOF, like a server honoring shutdown.
        let spec = LaunchSpec {
            command: "cat".into(),
            args: Vec::new(),
            transport: Transport::Stdio,
            trace: TraceLevel::Off,
        };

        let mut client = StdioClient::new();
        client.start(&spec).expect("process spawns");
        assert!(client.is_running());

        client.stop().await.expect("exits on EOF");
        assert!(!client.is_running());
    }

    #[tokio::test]
    async fn is_running_reflects_child_exit() {
        let spec = LaunchSpec {
            command: "true".into(),
            args: Vec::new(),
            transport: Transport::Stdio,
            trace: TraceLevel::Off,
        };

        let mut client = StdioClient::new();
        client.start(&spec).expect("process spawns");
        for _ in 0..50 {
            if !client.is_running() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert!(!client.is_running());
    }
}
