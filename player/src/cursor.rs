use phosphor_core::{
    Frame,
    frame::{NUM_CHANNELS, frames_from_le_bytes},
};
use std::{fs, path::Path};

pub enum Pull<'a> {
    Frames(&'a [Frame]),
    /// Fewer frames remain than were requested. The cursor does not move.
    Insufficient,
}

/// Read position over a fixed buffer of audio, advanced by whoever is
/// consuming it in fixed-size chunks.
pub struct PcmCursor {
    frames: Vec<Frame>,
    position: usize,
}

impl PcmCursor {
    pub fn new(frames: Vec<Frame>) -> Self {
        Self {
            frames,
            position: 0,
        }
    }

    /// Load a raw file of interleaved little-endian f32 stereo frames.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let bytes = fs::read(path)?;
        let mut frames = Vec::new();
        frames_from_le_bytes(&bytes, &mut frames);
        log::info!("Loaded {} frames for playback", frames.len());
        Ok(Self::new(frames))
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.frames.len() - self.position
    }

    pub fn pull(&mut self, n: usize) -> Pull<'_> {
        if n > self.remaining() {
            return Pull::Insufficient;
        }
        let start = self.position;
        self.position += n;
        Pull::Frames(&self.frames[start..self.position])
    }

    /// Fill an interleaved output buffer with `channels` samples per frame.
    /// The first two channels get left and right and any others are
    /// silent. Once there isn't enough audio left to fill the whole buffer,
    /// it is filled with silence instead.
    pub fn fill_interleaved(&mut self, out: &mut [f32], channels: usize) {
        assert!(channels >= NUM_CHANNELS);
        match self.pull(out.len() / channels) {
            Pull::Frames(frames) => {
                for (output, frame) in out.chunks_mut(channels).zip(frames) {
                    output[0] = frame.left;
                    output[1] = frame.right;
                    for element in &mut output[NUM_CHANNELS..] {
                        *element = 0.0;
                    }
                }
            }
            Pull::Insufficient => out.fill(0.0),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn cursor(n: usize) -> PcmCursor {
        PcmCursor::new((0..n).map(|i| Frame::new(i as f32, -1.0)).collect())
    }

    #[test]
    fn pulls_advance() {
        let mut cursor = cursor(5);
        match cursor.pull(3) {
            Pull::Frames(frames) => assert_eq!(frames[2], Frame::new(2.0, -1.0)),
            Pull::Insufficient => panic!(),
        }
        assert!(matches!(cursor.pull(3), Pull::Insufficient));
        assert_eq!(cursor.position(), 3);
        assert!(matches!(cursor.pull(2), Pull::Frames(_)));
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn fill_interleaves_and_pads_extra_channels() {
        let mut cursor = cursor(2);
        let mut out = [9.0; 6];
        cursor.fill_interleaved(&mut out, 3);
        assert_eq!(out, [0.0, -1.0, 0.0, 1.0, -1.0, 0.0]);
    }

    #[test]
    fn silence_at_end() {
        let mut cursor = cursor(1);
        let mut out = [9.0; 4];
        cursor.fill_interleaved(&mut out, 2);
        assert_eq!(out, [0.0; 4]);
        assert_eq!(cursor.position(), 0);
    }
}
