pub const SAMPLE_RATE: usize = 44100;

/// Number of frames rendered per iteration of the loop (10ms of audio).
pub const BATCH_SIZE: usize = SAMPLE_RATE / 100;

/// Upper bound on the delay (in frames) of any channel. Also the side length
/// of the unrotated window.
pub const WINDOW_SIZE: usize = 1024;

pub const NUM_CHANNELS: usize = 2;

pub const BYTES_PER_FRAME: usize = NUM_CHANNELS * std::mem::size_of::<f32>();

/// One instant of stereo audio.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Frame {
    pub left: f32,
    pub right: f32,
}

impl Frame {
    pub const ZERO: Self = Self {
        left: 0.0,
        right: 0.0,
    };

    pub fn new(left: f32, right: f32) -> Self {
        Self { left, right }
    }

    /// The average of the two channels.
    pub fn mid(&self) -> f32 {
        0.5 * (self.left + self.right)
    }
}

/// A position in normalized device coordinates, where the visible area is
/// roughly [-1, 1] on both axes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Self) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl From<Frame> for Point {
    fn from(frame: Frame) -> Self {
        Self {
            x: frame.left,
            y: frame.right,
        }
    }
}

/// Decode interleaved little-endian f32 stereo frames. Any trailing bytes
/// that don't make up a whole frame are ignored.
pub fn frames_from_le_bytes(bytes: &[u8], out: &mut Vec<Frame>) {
    if bytes.len() % BYTES_PER_FRAME != 0 {
        log::warn!(
            "Ignoring {} trailing bytes that do not form a complete frame.",
            bytes.len() % BYTES_PER_FRAME
        );
    }
    out.clear();
    out.extend(bytes.chunks_exact(BYTES_PER_FRAME).map(frame_from_le_bytes));
}

pub(crate) fn frame_from_le_bytes(bytes: &[u8]) -> Frame {
    let mut buf = [0; 4];
    buf.copy_from_slice(&bytes[0..4]);
    let left = f32::from_le_bytes(buf);
    buf.copy_from_slice(&bytes[4..8]);
    let right = f32::from_le_bytes(buf);
    Frame { left, right }
}

#[cfg(test)]
pub(crate) fn frames_to_le_bytes(frames: &[Frame]) -> Vec<u8> {
    let mut out = Vec::with_capacity(frames.len() * BYTES_PER_FRAME);
    for frame in frames {
        out.extend_from_slice(&frame.left.to_le_bytes());
        out.extend_from_slice(&frame.right.to_le_bytes());
    }
    out
}
