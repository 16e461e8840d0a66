use crate::frame::WINDOW_SIZE;
use anyhow::{anyhow, bail};

/// How frames are turned into points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Plot left against right.
    #[default]
    Direct,
    /// Plot the mid signal against itself delayed by some number of frames.
    Delay(usize),
    /// Three delayed channels in red, green and blue.
    Visualize,
}

impl Mode {
    /// A delay of 0 is the same as no delay. Combining a non-zero delay with
    /// visualize is an error.
    pub fn from_options(
        delay: Option<usize>,
        visualize: bool,
    ) -> anyhow::Result<Self> {
        match (delay, visualize) {
            (Some(delay), _) if delay > WINDOW_SIZE => {
                bail!("delay {} exceeds the maximum of {}", delay, WINDOW_SIZE)
            }
            (Some(delay), true) if delay > 0 => {
                bail!("--delay and --visualize cannot be used together")
            }
            (_, true) => Ok(Self::Visualize),
            (Some(0) | None, false) => Ok(Self::Direct),
            (Some(delay), false) => Ok(Self::Delay(delay)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Config {
    pub mode: Mode,
    pub rotate: bool,
    pub fullscreen: bool,
}

/// Parse a delay in frames. Accepts decimal, hexadecimal with a `0x` prefix
/// and octal with a leading `0`.
pub fn parse_delay(s: &str) -> anyhow::Result<usize> {
    let s = s.trim_start();
    let s = s.strip_prefix('+').unwrap_or(s);
    let (digits, radix) = if let Some(hex) =
        s.strip_prefix("0x").or_else(|| s.strip_prefix("0X"))
    {
        (hex, 16)
    } else if s.len() > 1 && s.starts_with('0') {
        (&s[1..], 8)
    } else {
        (s, 10)
    };
    // `from_str_radix` takes its own sign, which would allow "++5" or "0x+5"
    if digits.starts_with(['+', '-']) {
        bail!("invalid delay {:?}", s);
    }
    let delay = usize::from_str_radix(digits, radix)
        .map_err(|e| anyhow!("invalid delay {:?}: {}", s, e))?;
    if delay > WINDOW_SIZE {
        bail!("delay {} exceeds the maximum of {}", delay, WINDOW_SIZE);
    }
    Ok(delay)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_delay_radixes() {
        assert_eq!(parse_delay("0").unwrap(), 0);
        assert_eq!(parse_delay("100").unwrap(), 100);
        assert_eq!(parse_delay("0x10").unwrap(), 16);
        assert_eq!(parse_delay("010").unwrap(), 8);
        assert_eq!(parse_delay("1024").unwrap(), WINDOW_SIZE);
        assert_eq!(parse_delay("+5").unwrap(), 5);
    }

    #[test]
    fn parse_delay_rejects_garbage() {
        assert!(parse_delay("").is_err());
        assert!(parse_delay("12ms").is_err());
        assert!(parse_delay("-1").is_err());
        assert!(parse_delay("1025").is_err());
        assert!(parse_delay("09").is_err());
        assert!(parse_delay("++5").is_err());
        assert!(parse_delay("+-5").is_err());
        assert!(parse_delay("0x+5").is_err());
        assert!(parse_delay("0x-5").is_err());
        assert!(parse_delay("0+5").is_err());
    }

    #[test]
    fn modes() {
        assert_eq!(Mode::from_options(None, false).unwrap(), Mode::Direct);
        assert_eq!(Mode::from_options(Some(0), false).unwrap(), Mode::Direct);
        assert_eq!(Mode::from_options(Some(7), false).unwrap(), Mode::Delay(7));
        assert_eq!(Mode::from_options(None, true).unwrap(), Mode::Visualize);
        assert_eq!(Mode::from_options(Some(0), true).unwrap(), Mode::Visualize);
        assert!(Mode::from_options(Some(7), true).is_err());
        assert!(Mode::from_options(Some(WINDOW_SIZE + 1), false).is_err());
    }
}
