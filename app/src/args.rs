use clap::Parser;
use phosphor_core::{Config, Mode, parse_delay};
use std::path::PathBuf;

pub const USAGE: &str = "phosphor [-r] [-f] [-d <delay> | -v] <sound input>";

#[derive(Parser, Debug)]
#[command(name = "phosphor", disable_help_flag = true, override_usage = USAGE)]
pub struct Args {
    /// Rotate the picture 45 degrees clockwise in a wide window
    #[arg(long, short)]
    pub rotate: bool,
    /// Plot the signal against itself delayed by this many frames
    #[arg(long, short, value_parser = parse_delay)]
    pub delay: Option<usize>,
    /// Plot three delayed copies of the signal in red, green and blue
    #[arg(long, short)]
    pub visualize: bool,
    #[arg(long, short)]
    pub fullscreen: bool,
    /// Print usage and exit
    #[arg(long, short)]
    pub help: bool,
    /// Any audio file ffmpeg can decode
    pub input: Option<PathBuf>,
}

impl Args {
    /// Check the arguments make sense together. Returns `None` if usage
    /// should be printed instead of running. Touches no files.
    pub fn validate(self) -> anyhow::Result<Option<(PathBuf, Config)>> {
        let mode = Mode::from_options(self.delay, self.visualize)?;
        let input = match self.input {
            Some(input) if !self.help => input,
            _ => return Ok(None),
        };
        Ok(Some((
            input,
            Config {
                mode,
                rotate: self.rotate,
                fullscreen: self.fullscreen,
            },
        )))
    }
}
