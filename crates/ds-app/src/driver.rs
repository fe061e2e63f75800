//! Simulator process management.
//!
//! The simulator reads its input deck and writes its report at fixed paths
//! inside its working directory. Its exit status is unreliable, so a finished
//! process is only a synchronisation point: success is judged by the report.

use ds_config::SimulatorConfig;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

pub type DriverResult<T> = Result<T, DriverError>;

#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("Failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("Simulator timed out after {timeout_s} s")]
    Timeout { timeout_s: f64 },

    #[error("Failed to wait for simulator: {0}")]
    Wait(std::io::Error),
}

/// Runs the simulator once against whatever deck is currently on disk.
pub trait SimulatorDriver {
    /// Block until the simulator process is gone.
    ///
    /// `Ok` says nothing about whether the run succeeded.
    fn invoke(&mut self) -> DriverResult<()>;
}

impl<D: SimulatorDriver + ?Sized> SimulatorDriver for &mut D {
    fn invoke(&mut self) -> DriverResult<()> {
        (**self).invoke()
    }
}

/// Spawns the simulator as a child process with a bounded wait.
#[derive(Debug, Clone)]
pub struct ProcessDriver {
    working_dir: PathBuf,
    executable: String,
    launcher: Option<PathBuf>,
    timeout: Duration,
    poll_interval: Duration,
}

impl ProcessDriver {
    pub fn new(config: &SimulatorConfig) -> Self {
        Self {
            working_dir: config.working_dir.clone(),
            executable: config.executable.clone(),
            launcher: config.launcher.clone(),
            timeout: Duration::try_from_secs_f64(config.timeout_s.max(0.0))
                .unwrap_or(Duration::MAX),
            poll_interval: Duration::from_millis(50),
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// `<launcher> <executable>` when a launcher is set, otherwise the
    /// executable itself, preferring a copy inside the working directory.
    fn command(&self) -> Command {
        let mut cmd = match &self.launcher {
            Some(launcher) => {
                let mut cmd = Command::new(launcher);
                cmd.arg(&self.executable);
                cmd
            }
            None => {
                let local = self.working_dir.join(&self.executable);
                if local.is_file() {
                    Command::new(local)
                } else {
                    Command::new(&self.executable)
                }
            }
        };
        cmd.current_dir(&self.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        cmd
    }

    fn program_name(&self) -> String {
        match &self.launcher {
            Some(launcher) => format!("{} {}", launcher.display(), self.executable),
            None => self.executable.clone(),
        }
    }
}

impl SimulatorDriver for ProcessDriver {
    fn invoke(&mut self) -> DriverResult<()> {
        let program = self.program_name();
        debug!(%program, dir = %self.working_dir.display(), "spawning simulator");

        let started = Instant::now();
        let mut child = self
            .command()
            .spawn()
            .map_err(|source| DriverError::Spawn {
                program: program.clone(),
                source,
            })?;

        loop {
            match child.try_wait() {
                Ok(Some(status)) => {
                    let elapsed_s = started.elapsed().as_secs_f64();
                    if status.success() {
                        debug!(%status, elapsed_s, "simulator exited");
                    } else {
                        // Known to be unreliable; the report decides.
                        info!(%status, elapsed_s, "simulator exited with non-zero status");
                    }
                    return Ok(());
                }
                Ok(None) => {
                    if started.elapsed() >= self.timeout {
                        let timeout_s = self.timeout.as_secs_f64();
                        warn!(%program, timeout_s, "simulator timed out, killing");
                        if let Err(e) = child.kill() {
                            error!("Failed to kill simulator: {e}");
                        }
                        if let Err(e) = child.wait() {
                            error!("Failed to reap simulator: {e}");
                        }
                        return Err(DriverError::Timeout { timeout_s });
                    }
                    thread::sleep(self.poll_interval);
                }
                Err(e) => return Err(DriverError::Wait(e)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(dir: PathBuf, executable: &str, launcher: Option<&str>) -> SimulatorConfig {
        SimulatorConfig {
            working_dir: dir,
            executable: executable.to_string(),
            launcher: launcher.map(PathBuf::from),
            input_path: PathBuf::from("INPUT"),
            output_path: PathBuf::from("output"),
            timeout_s: 5.0,
            divergence_markers: Vec::new(),
        }
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("ds_driver_{}_{}", name, nanos));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn spawn_failure_is_reported() {
        let dir = scratch_dir("spawn");
        let mut driver = ProcessDriver::new(&config(dir, "definitely-not-a-simulator", None));
        let err = driver.invoke().unwrap_err();
        assert!(matches!(err, DriverError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn nonzero_exit_is_not_an_error() {
        let dir = scratch_dir("exit");
        std::fs::write(dir.join("sim.sh"), "echo done > output\nexit 3\n").unwrap();
        let mut driver = ProcessDriver::new(&config(dir.clone(), "sim.sh", Some("sh")))
            .with_poll_interval(Duration::from_millis(5));
        driver.invoke().unwrap();
        let report = std::fs::read_to_string(dir.join("output")).unwrap();
        assert_eq!(report.trim(), "done");
    }

    #[cfg(unix)]
    #[test]
    fn wedged_simulator_is_killed() {
        let dir = scratch_dir("wedged");
        std::fs::write(dir.join("sim.sh"), "sleep 30\n").unwrap();
        let mut cfg = config(dir, "sim.sh", Some("sh"));
        cfg.timeout_s = 0.2;
        let mut driver =
            ProcessDriver::new(&cfg).with_poll_interval(Duration::from_millis(10));

        let started = Instant::now();
        let err = driver.invoke().unwrap_err();
        assert!(matches!(err, DriverError::Timeout { .. }));
        assert!(started.elapsed() < Duration::from_secs(10));
    }
}
