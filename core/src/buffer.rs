use crate::frame::{BATCH_SIZE, Frame};

/// Holds the batch currently being rendered, preceded by `history` frames
/// from earlier batches so that delayed channels can look back in time.
///
/// With no history this is just a single batch (the "direct" layout). The
/// buffer is allocated once and then overwritten in place.
pub struct FrameBuffer {
    frames: Vec<Frame>,
    history: usize,
}

impl FrameBuffer {
    pub fn new(history: usize) -> Self {
        Self {
            frames: vec![Frame::ZERO; history + BATCH_SIZE],
            history,
        }
    }

    pub fn history(&self) -> usize {
        self.history
    }

    /// The current batch.
    pub fn batch(&self) -> &[Frame] {
        &self.frames[self.history..]
    }

    /// Where the next batch should be read into.
    pub fn batch_mut(&mut self) -> &mut [Frame] {
        &mut self.frames[self.history..]
    }

    /// The frame `delay` frames before index `i` of the current batch.
    /// Panics if this reaches back further than the available history.
    pub fn lookback(&self, i: usize, delay: usize) -> Frame {
        self.frames[self.history + i - delay]
    }

    /// Shift the most recent `history` frames to the front of the buffer,
    /// making room for the next batch.
    pub fn slide(&mut self) {
        if self.history > 0 {
            self.frames.copy_within(BATCH_SIZE.., 0);
        }
    }
}
