//! Top-level control flow for one hostop invocation.
//!
//! 1. `--list`: print the blocks in the hosts file.
//! 2. `--reset <ID>`: wait out the delay, then remove block `ID`.
//! 3. Otherwise: write a new block for the given hosts and arm its removal,
//!    either by sleeping here (`--foreground`) or by relaunching hostop
//!    detached with `--reset`.
//!
//! A failed write returns before anything is scheduled.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, error};
use uuid::Uuid;

use crate::cli::Mode;
use crate::config::{ConfigError, Settings};
use crate::duration::format_duration;
use crate::hosts::{list_blocks, write_block};
use crate::schedule::{
    self, Armed, Launcher, Pending, ProcessLauncher, RemovalRequest, ScheduleError,
    wait_and_remove,
};
use crate::telemetry::{AuditEvent, ScheduleKind, audit};

/// Result of a block-mode invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockOutcome {
    /// Identifier of the written block.
    pub id: String,
    /// How its removal was committed.
    pub armed: Armed,
}

/// Run one invocation with the real process launcher, reporting to stdout.
pub fn run(mode: Mode, settings: &Settings) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    match mode {
        Mode::List => list(settings, &mut stdout),
        Mode::Remove(id) => remove(settings, &id).map(|_| ()),
        Mode::Block(hosts) => {
            // Only the detached relaunch needs our own executable
            let program = if settings.foreground {
                None
            } else {
                Some(schedule::current_program()?)
            };
            block(
                settings,
                &hosts,
                &ProcessLauncher,
                program.as_deref(),
                &mut stdout,
            )
            .map(|_| ())
        }
    }
}

/// Write a block for `hosts` and arm its removal.
///
/// `program` is the executable relaunched for a detached removal. It is
/// ignored in foreground mode and required otherwise; a missing program
/// fails before anything is written.
pub fn block<L, W>(
    settings: &Settings,
    hosts: &[String],
    launcher: &L,
    program: Option<&Path>,
    out: &mut W,
) -> Result<BlockOutcome>
where
    L: Launcher + ?Sized,
    W: Write,
{
    if hosts.is_empty() {
        return Err(ConfigError::NoHosts.into());
    }
    let relaunch = if settings.foreground {
        None
    } else {
        Some(program.ok_or(ScheduleError::NoExecutable)?)
    };

    let id = Uuid::new_v4().to_string();
    debug!("Generated block id {}", id);

    write_block(&settings.hosts_file, &id, hosts)
        .with_context(|| format!("Failed to block {}", hosts.join(", ")))?;

    audit().log(AuditEvent::BlockWritten {
        id: id.clone(),
        hosts: hosts.to_vec(),
        hosts_file: settings.hosts_file.display().to_string(),
        after_sec: settings.after.as_secs(),
    });

    writeln!(
        out,
        "Blocked {} for {} (id {})",
        hosts.join(", "),
        format_duration(settings.after),
        id
    )
    .context("Failed to write to stdout")?;
    out.flush().context("Failed to flush stdout")?;

    let pending = Pending::new(RemovalRequest {
        id: id.clone(),
        after: settings.after,
        hosts_file: settings.hosts_file.clone(),
        verbose: settings.verbose,
    });

    let armed = match relaunch {
        None => {
            audit().log(AuditEvent::RemovalScheduled {
                id: id.clone(),
                mode: ScheduleKind::Foreground,
                pid: None,
            });
            let armed = pending
                .arm_foreground()
                .with_context(|| format!("Failed to remove block {}", id))?;
            if let Armed::Completed { removed } = armed {
                log_removed(settings, &id, removed);
            }
            armed
        }
        Some(program) => match pending.arm_detached(launcher, program) {
            Ok(armed) => {
                log_scheduled(&id, &armed);
                armed
            }
            Err(e) => {
                error!("Block {} will not be removed automatically", id);
                audit().log(AuditEvent::RemovalLaunchFailed {
                    id: id.clone(),
                    error: e.to_string(),
                });
                return Err(anyhow::Error::new(e).context(format!(
                    "Block {} stays in {}; remove it with `hostop --after=0s --reset={}`",
                    id,
                    settings.hosts_file.display(),
                    id
                )));
            }
        },
    };

    Ok(BlockOutcome { id, armed })
}

/// Wait out the delay, then remove block `id`.
///
/// Returns the number of blocks removed; a missing block is not an error.
pub fn remove(settings: &Settings, id: &str) -> Result<usize> {
    let request = RemovalRequest {
        id: id.to_string(),
        after: settings.after,
        hosts_file: settings.hosts_file.clone(),
        verbose: settings.verbose,
    };

    let removed = wait_and_remove(&request)
        .with_context(|| format!("Failed to remove block {}", id))?;
    log_removed(settings, id, removed);
    Ok(removed)
}

/// Print every block in the hosts file, one per line.
pub fn list<W: Write>(settings: &Settings, out: &mut W) -> Result<()> {
    let blocks = list_blocks(&settings.hosts_file).context("Failed to list blocks")?;

    for block in &blocks {
        writeln!(out, "{}\t{}", block.id, block.hosts.join(" "))
            .context("Failed to write to stdout")?;
    }
    debug!("Listed {} block(s) in {:?}", blocks.len(), settings.hosts_file);
    Ok(())
}

fn log_scheduled(id: &str, armed: &Armed) {
    let pid = match armed {
        Armed::Detached { pid } => Some(*pid),
        Armed::Completed { .. } => None,
    };
    audit().log(AuditEvent::RemovalScheduled {
        id: id.to_string(),
        mode: armed.kind(),
        pid,
    });
}

fn log_removed(settings: &Settings, id: &str, removed: usize) {
    audit().log(AuditEvent::BlockRemoved {
        id: id.to_string(),
        removed,
        hosts_file: settings.hosts_file.display().to_string(),
    });
}
