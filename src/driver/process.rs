//! Plotter child processes
//!
//! Every plotter runs as its own `liveplotter plot` process, started with a
//! complete configuration as JSON on its command line.

use crate::config::PlotterConfig;
use crate::error::{LivePlotError, Result};
use std::ffi::{OsStr, OsString};
use std::process::{Child, Command, ExitStatus, Stdio};

/// Environment variable overriding the plotter executable
pub const PLOTTER_BIN_ENV: &str = "LIVEPLOTTER_BIN";

/// Executable used to start plotters
///
/// `LIVEPLOTTER_BIN` if set; otherwise the running executable when it is
/// `liveplotter` itself; otherwise `liveplotter` from `PATH`.
pub fn plotter_program() -> OsString {
    if let Some(program) = std::env::var_os(PLOTTER_BIN_ENV) {
        return program;
    }
    std::env::current_exe()
        .ok()
        .filter(|exe| exe.file_stem() == Some(OsStr::new("liveplotter")))
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("liveplotter"))
}

/// Build the command line that starts a plotter for `config`
pub fn plotter_command(
    program: impl AsRef<OsStr>,
    config: &PlotterConfig,
    headless: bool,
) -> Result<Command> {
    config.validate()?;
    let mut command = Command::new(program);
    command
        .arg("plot")
        .arg("--config-json")
        .arg(config.to_json()?)
        .stdin(Stdio::null());
    if headless {
        command.arg("--headless");
    }
    Ok(command)
}

/// Handle to a running plotter process
#[derive(Debug)]
pub struct PlotterProcess {
    child: Child,
    topic: String,
}

impl PlotterProcess {
    /// Start a windowed plotter using [`plotter_program`]
    pub fn spawn(config: &PlotterConfig) -> Result<Self> {
        Self::spawn_with(plotter_program(), config, false)
    }

    /// Start a plotter from an explicit executable
    pub fn spawn_with(
        program: impl AsRef<OsStr>,
        config: &PlotterConfig,
        headless: bool,
    ) -> Result<Self> {
        let program = program.as_ref();
        let child = plotter_command(program, config, headless)?
            .spawn()
            .map_err(|e| {
                LivePlotError::Process(format!(
                    "Failed to start plotter {:?} for '{}': {}",
                    program, config.topic, e
                ))
            })?;

        tracing::info!(
            "Started plotter for '{}' ({}) as pid {}",
            config.topic,
            config.kind,
            child.id()
        );
        Ok(Self {
            child,
            topic: config.topic.clone(),
        })
    }

    pub fn id(&self) -> u32 {
        self.child.id()
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Wait for the plotter to exit
    pub fn wait(&mut self) -> Result<ExitStatus> {
        let status = self.child.wait()?;
        tracing::debug!("Plotter '{}' exited with {}", self.topic, status);
        Ok(status)
    }

    /// Exit status if the plotter has already exited
    pub fn try_wait(&mut self) -> Result<Option<ExitStatus>> {
        Ok(self.child.try_wait()?)
    }

    /// Terminate the plotter
    pub fn kill(&mut self) -> Result<()> {
        match self.child.kill() {
            Ok(()) => {}
            // Already exited
            Err(e) if e.kind() == std::io::ErrorKind::InvalidInput => {}
            Err(e) => return Err(e.into()),
        }
        self.child.wait()?;
        Ok(())
    }
}

/// Plotters started together, killed together unless waited for
///
/// Dropping the group kills every plotter still in it, so an early return
/// never leaves orphaned plotters retrying their connection.
#[derive(Debug, Default)]
pub struct PlotterGroup {
    plotters: Vec<PlotterProcess>,
}

impl PlotterGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, plotter: PlotterProcess) {
        self.plotters.push(plotter);
    }

    pub fn len(&self) -> usize {
        self.plotters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plotters.is_empty()
    }

    /// Wait for every plotter to exit, returning `(topic, status)` pairs
    pub fn wait_all(mut self) -> Result<Vec<(String, ExitStatus)>> {
        let mut statuses = Vec::with_capacity(self.plotters.len());
        while !self.plotters.is_empty() {
            let status = self.plotters[0].wait()?;
            let plotter = self.plotters.remove(0);
            statuses.push((plotter.topic, status));
        }
        Ok(statuses)
    }

    /// Kill every plotter in the group
    pub fn kill_all(&mut self) {
        for mut plotter in self.plotters.drain(..) {
            if let Err(e) = plotter.kill() {
                tracing::warn!("Failed to stop plotter for '{}': {}", plotter.topic, e);
            } else {
                tracing::debug!("Stopped plotter for '{}'", plotter.topic);
            }
        }
    }
}

impl Drop for PlotterGroup {
    fn drop(&mut self) {
        self.kill_all();
    }
}
