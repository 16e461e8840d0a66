use crate::frame::{BYTES_PER_FRAME, Frame, frame_from_le_bytes};
use std::{
    fs::File,
    io::{self, BufReader, ErrorKind, Read},
    path::Path,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchRead {
    /// The requested number of frames was read.
    Complete,
    /// The end of the stream was reached before the batch could be filled.
    /// This is the normal way for playback to end. Frames in the batch are
    /// not meaningful.
    Exhausted { frames_read: usize },
}

/// Sequential reader over a headerless stream of interleaved little-endian
/// f32 stereo frames.
pub struct FrameSource<R> {
    reader: R,
    position: usize,
    frames_total: Option<usize>,
    bytes: Vec<u8>,
}

impl FrameSource<BufReader<File>> {
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::open(path.as_ref())?;
        let len = file.metadata()?.len() as usize;
        let frames_total = len / BYTES_PER_FRAME;
        log::info!(
            "Opened {} ({} frames)",
            path.as_ref().display(),
            frames_total
        );
        let mut source = Self::new(BufReader::new(file));
        source.frames_total = Some(frames_total);
        Ok(source)
    }
}

impl<R: Read> FrameSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            position: 0,
            frames_total: None,
            bytes: Vec::new(),
        }
    }

    /// Number of frames consumed so far.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Length of the stream in frames, if it was known when it was opened.
    pub fn frames_total(&self) -> Option<usize> {
        self.frames_total
    }

    /// Fill `out` with the next `out.len()` frames.
    pub fn read_batch(&mut self, out: &mut [Frame]) -> io::Result<BatchRead> {
        self.bytes.resize(out.len() * BYTES_PER_FRAME, 0);
        let mut filled = 0;
        while filled < self.bytes.len() {
            match self.reader.read(&mut self.bytes[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => (),
                Err(e) => return Err(e),
            }
        }
        let frames_read = filled / BYTES_PER_FRAME;
        let whole_frames = &self.bytes[..frames_read * BYTES_PER_FRAME];
        for (frame, bytes) in
            out.iter_mut().zip(whole_frames.chunks_exact(BYTES_PER_FRAME))
        {
            *frame = frame_from_le_bytes(bytes);
        }
        self.position += frames_read;
        if frames_read < out.len() {
            Ok(BatchRead::Exhausted { frames_read })
        } else {
            Ok(BatchRead::Complete)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::frame::frames_to_le_bytes;
    use std::io::Cursor;

    fn ramp(n: usize) -> Vec<Frame> {
        (0..n).map(|i| Frame::new(i as f32, -(i as f32))).collect()
    }

    #[test]
    fn reads_batches_in_order() {
        let bytes = frames_to_le_bytes(&ramp(10));
        let mut source = FrameSource::new(Cursor::new(bytes));
        let mut batch = [Frame::ZERO; 4];
        assert_eq!(source.read_batch(&mut batch).unwrap(), BatchRead::Complete);
        assert_eq!(batch[3], Frame::new(3.0, -3.0));
        assert_eq!(source.read_batch(&mut batch).unwrap(), BatchRead::Complete);
        assert_eq!(batch[0], Frame::new(4.0, -4.0));
        assert_eq!(source.position(), 8);
        assert_eq!(
            source.read_batch(&mut batch).unwrap(),
            BatchRead::Exhausted { frames_read: 2 }
        );
        assert_eq!(source.position(), 10);
    }

    #[test]
    fn partial_frame_counts_as_exhausted() {
        let mut bytes = frames_to_le_bytes(&ramp(2));
        bytes.extend_from_slice(&1.0f32.to_le_bytes());
        let mut source = FrameSource::new(Cursor::new(bytes));
        let mut batch = [Frame::ZERO; 3];
        assert_eq!(
            source.read_batch(&mut batch).unwrap(),
            BatchRead::Exhausted { frames_read: 2 }
        );
    }

    #[test]
    fn length_only_known_for_opened_files() {
        let source = FrameSource::new(Cursor::new(vec![0; 16]));
        assert_eq!(source.frames_total(), None);
    }

    #[test]
    fn empty_stream() {
        let mut source = FrameSource::new(Cursor::new(Vec::new()));
        let mut batch = [Frame::ZERO; 3];
        assert_eq!(
            source.read_batch(&mut batch).unwrap(),
            BatchRead::Exhausted { frames_read: 0 }
        );
    }
}
