//! Launching external programs from shortcuts.

use crate::command::SpawnCommand;
use crate::traits::Spawner;
use log::info;
use std::process::{Command, Stdio};

/// [`Spawner`] backed by [`std::process::Command`].
///
/// Children are started with stdin detached and are never waited on.
/// Their exit is not observed, so an exited child stays a zombie until the
/// process supervising splitwm (or init, once splitwm exits) reaps it.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessSpawner;

/// A program could not be started.
#[derive(Debug, thiserror::Error)]
#[error("failed to spawn `{command}`: {source}")]
pub struct SpawnError {
    command: String,
    #[source]
    source: std::io::Error,
}

impl Spawner for ProcessSpawner {
    type Error = SpawnError;

    fn spawn(&self, command: &SpawnCommand) -> Result<(), SpawnError> {
        let child = Command::new(command.program())
            .args(command.args())
            .stdin(Stdio::null())
            .spawn()
            .map_err(|source| SpawnError {
                command: command.to_string(),
                source,
            })?;
        info!("spawned `{}` (pid {})", command, child.id());
        Ok(())
    }
}
