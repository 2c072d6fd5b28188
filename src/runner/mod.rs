//! simc execution engine.
//!
//! A [`Runner`] owns the resolved simc location and the root argument list.
//! Each [`Runner::run`] call launches simc once, blocks until it exits and
//! appends a [`HistoryRecord`]. When simc cannot be started at all, the
//! configured arguments are saved to a recovery file instead of failing.

mod error;
mod history;
mod recovery;

pub use error::RunnerError;
pub use history::{HistoryRecord, TIMED_OUT};
pub use recovery::{render_recovery, write_recovery_file, PROJECT_URL};

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

use wait_timeout::ChildExt;

use crate::args::{ArgumentOwner, Arguments};
use history::{captured, query_string};

/// Environment variable holding the default simc directory.
pub const SIMC_PATH_ENV: &str = "SIMC_PATH";

/// Recovery file used when none is configured.
pub const DEFAULT_RECOVERY_FILE: &str = "simc_recovery.simc";

/// How long output readers may lag behind a killed simc before their data
/// is abandoned.
const READER_GRACE: Duration = Duration::from_millis(500);

#[cfg(windows)]
const EXECUTABLE: &str = "simc.exe";
#[cfg(not(windows))]
const EXECUTABLE: &str = "simc";

/// Runs simc with a composed argument list and keeps a history of runs.
#[derive(Debug)]
pub struct Runner {
    root: PathBuf,
    args: Arguments,
    history: Vec<HistoryRecord>,
    recovery_file: PathBuf,
    timeout: Option<Duration>,
}

impl Runner {
    /// Resolve the simc directory from `explicit`, falling back to
    /// `env_value` (the value of [`SIMC_PATH_ENV`]). Empty values count as
    /// missing.
    pub fn new(explicit: Option<PathBuf>, env_value: Option<String>) -> Result<Self, RunnerError> {
        let root = explicit
            .filter(|p| !p.as_os_str().is_empty())
            .or_else(|| env_value.filter(|v| !v.is_empty()).map(PathBuf::from))
            .ok_or(RunnerError::MissingSimcPath)?;

        tracing::debug!(root = %root.display(), "Resolved simc location");

        Ok(Self {
            root,
            args: Arguments::new(),
            history: Vec::new(),
            recovery_file: PathBuf::from(DEFAULT_RECOVERY_FILE),
            timeout: None,
        })
    }

    /// Like [`Runner::new`], reading [`SIMC_PATH_ENV`] from the process
    /// environment.
    pub fn from_env(explicit: Option<PathBuf>) -> Result<Self, RunnerError> {
        Self::new(explicit, std::env::var(SIMC_PATH_ENV).ok())
    }

    pub fn with_recovery_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.recovery_file = path.into();
        self
    }

    /// Kill simc when a run takes longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn recovery_file(&self) -> &Path {
        &self.recovery_file
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Platform-specific path of the simc binary.
    pub fn executable(&self) -> PathBuf {
        self.root.join(EXECUTABLE)
    }

    pub fn history(&self) -> &[HistoryRecord] {
        &self.history
    }

    pub fn last_record(&self) -> Option<&HistoryRecord> {
        self.history.last()
    }

    pub fn history_json(&self) -> Result<String, RunnerError> {
        Ok(serde_json::to_string_pretty(&self.history)?)
    }

    /// Run simc with the current arguments and record the outcome.
    ///
    /// Never fails: launch errors, timeouts and non-zero exits all end up
    /// in the returned record.
    pub fn run(&mut self) -> &HistoryRecord {
        let executable = self.executable();
        let tokens = self.args.flattened();
        let query = query_string(&executable.to_string_lossy(), &tokens);

        tracing::info!(%query, "Running simc");

        let record = match spawn(&executable, &tokens, self.timeout.is_some()) {
            Ok(child) => self.collect(child, query),
            Err(e) => {
                tracing::error!(
                    executable = %executable.display(),
                    error = %e,
                    "Failed to launch simc"
                );
                self.recover(&tokens);
                HistoryRecord {
                    query,
                    return_code: None,
                    output: None,
                    error: Some(format!("failed to launch {}: {e}", executable.display())),
                }
            }
        };

        let index = self.history.len();
        self.history.push(record);
        &self.history[index]
    }

    fn collect(&self, mut child: Child, query: String) -> HistoryRecord {
        let stdout = child.stdout.take().map(drain);
        let stderr = child.stderr.take().map(drain);

        // Readers are collected only after the child is gone. A killed simc
        // may leave descendants holding the pipes, so that path gets a
        // deadline instead of waiting for EOF.
        let waited = self.wait(&mut child);
        let deadline = match waited {
            Ok(Some(_)) => None,
            Ok(None) | Err(_) => Some(READER_GRACE),
        };
        let output = captured(&join(stdout, deadline));
        let stderr = captured(&join(stderr, deadline));

        match waited {
            Ok(Some(status)) => {
                let return_code = status.code();
                let error = match return_code {
                    Some(0) => {
                        tracing::info!("simc finished");
                        stderr
                    }
                    Some(code) => {
                        tracing::info!(code, "simc exited with non-zero status");
                        stderr
                    }
                    None => {
                        tracing::warn!(%status, "simc terminated without exit code");
                        stderr.or_else(|| Some(format!("simc terminated without exit code ({status})")))
                    }
                };
                HistoryRecord {
                    query,
                    return_code,
                    output,
                    error,
                }
            }
            Ok(None) => {
                let limit = self.timeout.unwrap_or_default();
                tracing::warn!(timeout = ?limit, "simc timed out and was killed");
                HistoryRecord {
                    query,
                    return_code: None,
                    output,
                    error: Some(format!("{TIMED_OUT} after {}s", limit.as_secs_f64())),
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to wait for simc");
                HistoryRecord {
                    query,
                    return_code: None,
                    output,
                    error: Some(format!("failed to wait for simc: {e}")),
                }
            }
        }
    }

    /// Wait for the child, killing it once the timeout expires.
    /// `Ok(None)` means the child was killed.
    fn wait(&self, child: &mut Child) -> std::io::Result<Option<ExitStatus>> {
        let Some(limit) = self.timeout else {
            return child.wait().map(Some);
        };
        match child.wait_timeout(limit) {
            Ok(Some(status)) => Ok(Some(status)),
            Ok(None) => {
                kill(child);
                child.wait()?;
                Ok(None)
            }
            Err(e) => {
                kill(child);
                let _ = child.wait();
                Err(e)
            }
        }
    }

    fn recover(&self, tokens: &[String]) {
        match write_recovery_file(&self.recovery_file, tokens) {
            Ok(()) => tracing::warn!(
                path = %self.recovery_file.display(),
                "Saved simc arguments to recovery file"
            ),
            Err(e) => tracing::error!(error = %e, "Could not save simc arguments"),
        }
    }
}

impl ArgumentOwner for Runner {
    fn arguments(&self) -> &Arguments {
        &self.args
    }

    fn arguments_mut(&mut self) -> &mut Arguments {
        &mut self.args
    }
}

/// Start simc. With `own_group`, simc leads a new process group on unix so
/// a timeout can take down everything it started.
fn spawn(executable: &Path, tokens: &[String], own_group: bool) -> std::io::Result<Child> {
    let mut cmd = Command::new(executable);
    cmd.args(tokens)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        if own_group {
            cmd.process_group(0);
        }
    }
    #[cfg(not(unix))]
    let _ = own_group;

    cmd.spawn()
}

/// Kill simc and, on unix, its whole process group.
fn kill(child: &mut Child) {
    #[cfg(unix)]
    {
        if let Ok(pgid) = libc::pid_t::try_from(child.id()) {
            // SAFETY: plain syscall; a negative pid addresses the group led by simc.
            if unsafe { libc::kill(-pgid, libc::SIGKILL) } == 0 {
                return;
            }
        }
    }
    if let Err(e) = child.kill() {
        tracing::warn!(error = %e, "Failed to kill simc");
    }
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> Receiver<Vec<u8>> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Err(e) = pipe.read_to_end(&mut buf) {
            tracing::warn!(error = %e, "Failed to read simc output");
        }
        let _ = tx.send(buf);
    });
    rx
}

/// Collect a reader's output, giving up after `deadline` when one is set.
fn join(reader: Option<Receiver<Vec<u8>>>, deadline: Option<Duration>) -> Vec<u8> {
    let Some(rx) = reader else {
        return Vec::new();
    };
    match deadline {
        None => rx.recv().unwrap_or_default(),
        Some(limit) => rx.recv_timeout(limit).unwrap_or_else(|_| {
            tracing::warn!("simc output pipe still open after kill, dropping it");
            Vec::new()
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_wins_over_environment() {
        let runner = Runner::new(Some("/opt/simc".into()), Some("/env/simc".into())).unwrap();
        assert_eq!(runner.root(), Path::new("/opt/simc"));
    }

    #[test]
    fn falls_back_to_environment_value() {
        let runner = Runner::new(None, Some("/env/simc".into())).unwrap();
        assert_eq!(runner.executable(), Path::new("/env/simc").join(EXECUTABLE));
    }

    #[test]
    fn missing_path_is_a_configuration_error() {
        assert!(matches!(Runner::new(None, None), Err(RunnerError::MissingSimcPath)));
        assert!(matches!(
            Runner::new(Some(PathBuf::new()), Some(String::new())),
            Err(RunnerError::MissingSimcPath)
        ));
    }

    #[test]
    fn defaults_before_first_run() {
        let runner = Runner::new(Some("/opt/simc".into()), None).unwrap();
        assert!(runner.history().is_empty());
        assert!(runner.last_record().is_none());
        assert_eq!(runner.recovery_file(), Path::new(DEFAULT_RECOVERY_FILE));
        assert_eq!(runner.timeout(), None);
        assert_eq!(runner.history_json().unwrap(), "[]");
    }

    #[test]
    fn arguments_accumulate_across_add_calls() {
        let mut runner = Runner::new(Some("/opt/simc".into()), None).unwrap();
        runner
            .add(Arguments::new().add("iterations=10"))
            .add(Arguments::new().named("threads", 2));
        assert_eq!(runner.flattened(), vec!["iterations=10", "threads=2"]);

        runner.set(Arguments::new().add("calculate_scale_factors=1"));
        assert_eq!(runner.flattened(), vec!["calculate_scale_factors=1"]);
    }
}
