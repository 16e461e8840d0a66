use anyhow::{Context, bail};
use phosphor_core::{SAMPLE_RATE, frame::NUM_CHANNELS};
use std::{
    path::Path,
    process::{Child, Command, ExitStatus, Stdio},
    sync::atomic::{AtomicBool, Ordering},
    thread,
    time::Duration,
};
use tempfile::NamedTempFile;

pub const PROGRAM_NAME: &str = "ffmpeg";

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// A running decoder. The process is killed if this is dropped before it
/// finishes.
pub struct DecoderProcess {
    child: Option<Child>,
}

impl DecoderProcess {
    pub fn spawn(mut command: Command) -> anyhow::Result<Self> {
        log::info!("Running {:?}", command);
        let child = command
            .stdin(Stdio::null())
            .spawn()
            .with_context(|| format!("failed to run {:?}", command))?;
        Ok(Self { child: Some(child) })
    }

    /// Wait for the process to exit. If `cancel` becomes set first, the
    /// process is killed and an error is returned.
    pub fn wait(mut self, cancel: &AtomicBool) -> anyhow::Result<ExitStatus> {
        let Some(child) = self.child.as_mut() else {
            bail!("decoder was already waited on");
        };
        loop {
            if let Some(status) = child.try_wait()? {
                self.child = None;
                return Ok(status);
            }
            if cancel.load(Ordering::Relaxed) {
                // dropping `self` kills and reaps the child
                bail!("decoding was interrupted");
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

impl Drop for DecoderProcess {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            if let Ok(None) = child.try_wait() {
                log::warn!("Killing decoder process {}", child.id());
                let _ = child.kill();
                let _ = child.wait();
            }
        }
    }
}

pub fn ffmpeg_command(input: &Path, output: &Path) -> Command {
    let mut command = Command::new(PROGRAM_NAME);
    command
        .args(["-loglevel", "error", "-y", "-i"])
        .arg(input)
        .args(["-f", "f32le", "-ac"])
        .arg(NUM_CHANNELS.to_string())
        .arg("-ar")
        .arg(SAMPLE_RATE.to_string())
        .arg(output);
    command
}

/// Raw audio decoded into a temporary file, which is deleted when this is
/// dropped.
pub struct Decoded {
    file: NamedTempFile,
}

impl Decoded {
    /// Decode `input` with ffmpeg. Setting `cancel` stops the decoder and
    /// removes its output.
    pub fn run(
        input: impl AsRef<Path>,
        cancel: &AtomicBool,
    ) -> anyhow::Result<Self> {
        Self::run_with(input.as_ref(), cancel, ffmpeg_command)
    }

    /// Decode `input` by running the command returned by `make_command`,
    /// which is passed the input and output paths.
    pub fn run_with<F>(
        input: &Path,
        cancel: &AtomicBool,
        make_command: F,
    ) -> anyhow::Result<Self>
    where
        F: FnOnce(&Path, &Path) -> Command,
    {
        let file = tempfile::Builder::new()
            .prefix("phosphor-")
            .suffix(".f32le")
            .tempfile()
            .context("failed to create temporary file")?;
        let command = make_command(input, file.path());
        let program = command.get_program().to_owned();
        let status = DecoderProcess::spawn(command)?.wait(cancel)?;
        if !status.success() {
            bail!(
                "{} failed to decode {} ({})",
                program.to_string_lossy(),
                input.display(),
                status
            );
        }
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}
