//! Deferred removal of blocks.
//!
//! hostop has no daemon. Once a block is written, its removal is armed in
//! one of two ways:
//!
//! - **Foreground**: the blocking process sleeps for the delay and removes
//!   the block itself.
//! - **Detached**: hostop relaunches itself in a new process group with
//!   `--after=<delay> --reset=<id>` and returns at once. The relaunched
//!   process sleeps and removes the block.
//!
//! A removal is single-shot. There is no way to cancel it other than
//! killing the process that waits, which leaves the block in place.

mod error;

use std::ffi::OsString;
use std::os::unix::process::CommandExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;

use tracing::{debug, info};

pub use error::ScheduleError;

use crate::duration::format_duration;
use crate::hosts::remove_block;
use crate::telemetry::ScheduleKind;

/// Everything a later removal needs to find its block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovalRequest {
    /// Identifier of the block to remove.
    pub id: String,
    /// Delay before removal.
    pub after: Duration,
    /// Hosts file holding the block.
    pub hosts_file: PathBuf,
    /// Verbosity forwarded to a relaunched process.
    pub verbose: u8,
}

impl RemovalRequest {
    /// Arguments that make a relaunched hostop carry out this request.
    pub fn relaunch_args(&self) -> Vec<OsString> {
        let mut hosts_file = OsString::from("--hosts-file=");
        hosts_file.push(self.hosts_file.as_os_str());

        let mut args = vec![
            OsString::from(format!("--after={}", format_duration(self.after))),
            OsString::from(format!("--reset={}", self.id)),
            hosts_file,
        ];
        if self.verbose > 0 {
            args.push(OsString::from(format!("-{}", "v".repeat(self.verbose as usize))));
        }
        args
    }
}

/// Starts the detached removal process.
pub trait Launcher {
    /// Start `program` with `args` without waiting for it. Returns its PID.
    fn launch(&self, program: &Path, args: &[OsString]) -> std::io::Result<u32>;
}

/// Launches a real child process, detached from the caller's terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessLauncher;

impl Launcher for ProcessLauncher {
    fn launch(&self, program: &Path, args: &[OsString]) -> std::io::Result<u32> {
        let child = Command::new(program)
            .args(args)
            .process_group(0)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        // Not waited on: the child outlives us and is reparented on exit
        Ok(child.id())
    }
}

/// A block has been written; its removal is not yet committed.
#[derive(Debug)]
pub struct Pending {
    request: RemovalRequest,
}

/// The removal has been committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Armed {
    /// The removal already ran in this process.
    Completed {
        /// Number of blocks removed.
        removed: usize,
    },
    /// A detached process will run the removal.
    Detached {
        /// PID of the detached process.
        pid: u32,
    },
}

impl Armed {
    /// How the removal was committed.
    pub fn kind(&self) -> ScheduleKind {
        match self {
            Armed::Completed { .. } => ScheduleKind::Foreground,
            Armed::Detached { .. } => ScheduleKind::Detached,
        }
    }
}

impl Pending {
    /// Start tracking the removal of a freshly written block.
    pub fn new(request: RemovalRequest) -> Self {
        Self { request }
    }

    /// Sleep for the delay, then remove the block in this process.
    pub fn arm_foreground(self) -> Result<Armed, ScheduleError> {
        let removed = wait_and_remove(&self.request)?;
        Ok(Armed::Completed { removed })
    }

    /// Relaunch `program` to remove the block later and return immediately.
    pub fn arm_detached<L: Launcher + ?Sized>(
        self,
        launcher: &L,
        program: &Path,
    ) -> Result<Armed, ScheduleError> {
        let args = self.request.relaunch_args();
        debug!("Relaunching {:?} with {:?}", program, args);

        let pid = launcher
            .launch(program, &args)
            .map_err(|source| ScheduleError::LaunchFailed {
                program: program.to_path_buf(),
                source,
            })?;

        info!(
            "Removal of block {} handed to process {} (in {})",
            self.request.id,
            pid,
            format_duration(self.request.after)
        );
        Ok(Armed::Detached { pid })
    }
}

/// Wait out the delay, then remove the requested block.
///
/// Returns the number of blocks removed; zero when the block is already gone.
pub fn wait_and_remove(request: &RemovalRequest) -> Result<usize, ScheduleError> {
    if !request.after.is_zero() {
        info!(
            "Waiting {} before removing block {}",
            format_duration(request.after),
            request.id
        );
        std::thread::sleep(request.after);
    }

    Ok(remove_block(&request.hosts_file, &request.id)?)
}

/// Path of the running hostop executable.
pub fn current_program() -> Result<PathBuf, ScheduleError> {
    std::env::current_exe().or_else(|e| {
        debug!("current_exe failed ({}), falling back to argv[0]", e);
        std::env::args_os()
            .next()
            .filter(|arg0| !arg0.is_empty())
            .map(PathBuf::from)
            .ok_or(ScheduleError::NoExecutable)
    })
}
