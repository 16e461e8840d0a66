use crate::{
    buffer::FrameBuffer,
    config::Mode,
    frame::{BATCH_SIZE, Point, WINDOW_SIZE},
    render::Intensity,
};

/// Delays used by the three channels of the visualize preset, in channel
/// order.
pub const VISUALIZE_DELAYS: [usize; 3] = [402, 53, 11];

/// Selects which colour a channel is drawn in. The main colour of a channel
/// saturates on segments ten times longer than the other two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ChannelIndex {
    Red = 0,
    Green = 1,
    Blue = 2,
}

impl ChannelIndex {
    pub const ALL: [Self; 3] = [Self::Red, Self::Green, Self::Blue];

    /// Numerators of the per-component brightness, which is
    /// `min(k / segment_length, 1)`.
    pub fn intensity_constants(self) -> Intensity {
        match self {
            Self::Red => Intensity::new(0.014, 0.0014, 0.0014),
            Self::Green => Intensity::new(0.0010, 0.010, 0.0010),
            Self::Blue => Intensity::new(0.0018, 0.0018, 0.018),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Channel {
    pub index: ChannelIndex,
    pub delay: usize,
    /// The final point drawn for this channel, so consecutive batches join
    /// up into one continuous line.
    pub last: Point,
}

impl Channel {
    pub fn new(index: ChannelIndex, delay: usize) -> Self {
        assert!(delay <= WINDOW_SIZE, "delay {} out of range", delay);
        Self {
            index,
            delay,
            last: Point::ZERO,
        }
    }

    /// Project the current batch of `buffer` to points. Without a delay the
    /// points are the raw (left, right) pairs. With a delay the x coordinate
    /// is the mid value of the current frame and the y coordinate is the mid
    /// value of the frame `delay` frames earlier.
    pub fn project(&self, buffer: &FrameBuffer, out: &mut Vec<Point>) {
        out.clear();
        if self.delay == 0 {
            out.extend(buffer.batch().iter().map(|&frame| Point::from(frame)));
        } else {
            assert!(
                self.delay <= buffer.history(),
                "delay of {} needs more history than the {} frames available",
                self.delay,
                buffer.history()
            );
            out.extend(buffer.batch().iter().enumerate().map(|(i, frame)| {
                Point::new(frame.mid(), buffer.lookback(i, self.delay).mid())
            }));
        }
    }
}

/// The channels drawn each iteration, in draw order.
#[derive(Debug, Clone)]
pub struct ChannelSet {
    channels: Vec<Channel>,
}

impl ChannelSet {
    pub fn for_mode(mode: Mode) -> Self {
        let channels = match mode {
            Mode::Direct => vec![Channel::new(ChannelIndex::Green, 0)],
            Mode::Delay(delay) => vec![Channel::new(ChannelIndex::Green, delay)],
            Mode::Visualize => ChannelIndex::ALL
                .into_iter()
                .zip(VISUALIZE_DELAYS)
                .map(|(index, delay)| Channel::new(index, delay))
                .collect(),
        };
        Self { channels }
    }

    pub fn max_delay(&self) -> usize {
        self.channels.iter().map(|c| c.delay).max().unwrap_or(0)
    }

    /// Number of frames of history a `FrameBuffer` needs to serve every
    /// channel. Zero if no channel is delayed, otherwise at least a full
    /// batch.
    pub fn history(&self) -> usize {
        match self.max_delay() {
            0 => 0,
            max_delay => max_delay.max(BATCH_SIZE),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Channel> {
        self.channels.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Channel> {
        self.channels.iter_mut()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::frame::Frame;

    // Fill the current batch with frames whose mid value is their global
    // index.
    fn fill_ramp(buffer: &mut FrameBuffer, start: usize) {
        for (i, frame) in buffer.batch_mut().iter_mut().enumerate() {
            let n = (start + i) as f32;
            *frame = Frame::new(n, n);
        }
    }

    #[test]
    fn direct_projection_is_left_right() {
        let mut buffer = FrameBuffer::new(0);
        for (i, frame) in buffer.batch_mut().iter_mut().enumerate() {
            *frame = Frame::new(i as f32, -(i as f32));
        }
        let mut points = Vec::new();
        Channel::new(ChannelIndex::Green, 0).project(&buffer, &mut points);
        assert_eq!(points.len(), BATCH_SIZE);
        assert_eq!(points[7], Point::new(7.0, -7.0));
    }

    #[test]
    fn delayed_projection_within_first_batch() {
        let delay = 100;
        let mut buffer = FrameBuffer::new(BATCH_SIZE);
        fill_ramp(&mut buffer, 0);
        let mut points = Vec::new();
        Channel::new(ChannelIndex::Green, delay).project(&buffer, &mut points);
        assert_eq!(points[100].y, points[100].x - 100.0);
        for i in delay..BATCH_SIZE {
            assert_eq!(points[i].y, (i - delay) as f32);
        }
        // history starts out silent
        assert_eq!(points[0].y, 0.0);
    }

    #[test]
    fn delayed_projection_reaches_into_previous_batches() {
        let mut buffer = FrameBuffer::new(WINDOW_SIZE);
        let mut points = Vec::new();
        let batches = 5;
        for b in 0..batches {
            fill_ramp(&mut buffer, b * BATCH_SIZE);
            if b + 1 < batches {
                buffer.slide();
            }
        }
        let start = (batches - 1) * BATCH_SIZE;
        for delay in [1, 11, 53, 402, WINDOW_SIZE] {
            Channel::new(ChannelIndex::Red, delay).project(&buffer, &mut points);
            for (i, point) in points.iter().enumerate() {
                assert_eq!(point.x, (start + i) as f32);
                assert_eq!(point.y, (start + i - delay) as f32);
            }
        }
    }

    #[test]
    fn visualize_preset_order() {
        let set = ChannelSet::for_mode(Mode::Visualize);
        let summary = set.iter().map(|c| (c.index, c.delay)).collect::<Vec<_>>();
        assert_eq!(
            summary,
            vec![
                (ChannelIndex::Red, 402),
                (ChannelIndex::Green, 53),
                (ChannelIndex::Blue, 11),
            ]
        );
        assert_eq!(set.history(), BATCH_SIZE);
    }

    #[test]
    fn history_requirements() {
        assert_eq!(ChannelSet::for_mode(Mode::Direct).history(), 0);
        assert_eq!(ChannelSet::for_mode(Mode::Delay(10)).history(), BATCH_SIZE);
        assert_eq!(
            ChannelSet::for_mode(Mode::Delay(WINDOW_SIZE)).history(),
            WINDOW_SIZE
        );
    }
}
