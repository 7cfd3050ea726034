use std::ffi::OsString;
use std::fs::File;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::process::Stdio;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::time::Duration;

use log::debug;
use log::warn;
use wait_timeout::ChildExt;

static NEXT_INSTANCE: AtomicUsize = AtomicUsize::new(0);

/// The files of one solver run.
#[derive(Debug)]
pub(crate) struct SolverFiles {
    pub(crate) instance_file: PathBuf,
    pub(crate) log_file: PathBuf,
    pub(crate) err_file: PathBuf,
}

impl SolverFiles {
    /// Reserve file names for a new run, unique within the process.
    pub(crate) fn new(extension: &str) -> SolverFiles {
        let instance = NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed);
        let stem = std::env::temp_dir().join(format!(
            "exam-scheduler-{}-{instance}",
            std::process::id()
        ));

        SolverFiles {
            instance_file: stem.with_extension(extension),
            log_file: stem.with_extension("log"),
            err_file: stem.with_extension("err"),
        }
    }

    pub(crate) fn cleanup(self) {
        for path in [self.instance_file, self.log_file, self.err_file] {
            match std::fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => warn!("Failed to remove {}: {e}", path.display()),
            }
        }
    }
}

/// How the solver process ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ProcessOutcome {
    Exited,
    TimedOut,
}

/// Run `program` with `args` followed by the instance file, and wait for it to exit.
///
/// Exit codes are not interpreted; SAT solvers conventionally exit with 10 or 20.
pub(crate) fn run_solver(
    program: &Path,
    args: &[OsString],
    files: &SolverFiles,
    timeout: Option<Duration>,
) -> std::io::Result<ProcessOutcome> {
    let mut command = Command::new(program);
    let _ = command
        .args(args)
        .arg(&files.instance_file)
        .stdout(File::create(&files.log_file)?)
        .stderr(File::create(&files.err_file)?)
        .stdin(Stdio::null());

    debug!("Running {command:?}");
    let mut child = command.spawn()?;

    let status = match timeout {
        Some(timeout) => child.wait_timeout(timeout)?,
        None => Some(child.wait()?),
    };

    match status {
        Some(status) => {
            debug!("{} exited with {status}", program.display());
            Ok(ProcessOutcome::Exited)
        }
        None => {
            warn!(
                "{} did not finish within {:?}, killing it",
                program.display(),
                timeout.unwrap_or_default()
            );
            child.kill()?;
            let _ = child.wait()?;
            Ok(ProcessOutcome::TimedOut)
        }
    }
}
