use crate::{
    buffer::FrameBuffer,
    channel::ChannelSet,
    frame::{BATCH_SIZE, Point, SAMPLE_RATE},
    pacing::{Clock, Pacer},
    render::{Renderer, Surface},
    source::{BatchRead, FrameSource},
};
use std::io::{self, Read};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayEvent {
    Quit,
    Resized { width: u32, height: u32 },
}

pub trait EventSource {
    /// Append any pending events to `out` without blocking.
    fn poll_events(&mut self, out: &mut Vec<DisplayEvent>);
}

pub trait Display: Surface + EventSource {
    /// Change the size of the drawable area, discarding its contents.
    fn resize(&mut self, width: u32, height: u32);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Exhausted,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub iterations: usize,
    pub reason: StopReason,
}

/// The render loop. Owns the frame buffer and all per-channel state.
pub struct Scope {
    channels: ChannelSet,
    buffer: FrameBuffer,
    renderer: Renderer,
    points: Vec<Point>,
    events: Vec<DisplayEvent>,
}

impl Scope {
    pub fn new(channels: ChannelSet) -> Self {
        let buffer = FrameBuffer::new(channels.history());
        Self {
            channels,
            buffer,
            renderer: Renderer::new(),
            points: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Render batches from `source` until it runs out or the display asks to
    /// quit, then call `release` exactly once. `release` is not called if
    /// reading from `source` fails; in that case resources are left to be
    /// released by their owners.
    pub fn run<R, D, C, F>(
        &mut self,
        source: &mut FrameSource<R>,
        display: &mut D,
        clock: &mut C,
        release: F,
    ) -> io::Result<Summary>
    where
        R: Read,
        D: Display,
        C: Clock,
        F: FnOnce(),
    {
        log::info!(
            "Rendering {} channel(s) with {} frames of history",
            self.channels.iter().count(),
            self.buffer.history(),
        );
        if let Some(frames_total) = source.frames_total() {
            log::info!(
                "Expecting {} batches ({:.1}s of audio)",
                frames_total / BATCH_SIZE,
                frames_total as f32 / SAMPLE_RATE as f32
            );
        }
        let mut pacer = Pacer::start(&*clock);
        let mut iterations = 0;
        let mut reason = StopReason::Exhausted;
        while pacer.is_running() {
            if let BatchRead::Exhausted { frames_read } =
                source.read_batch(self.buffer.batch_mut())?
            {
                log::info!(
                    "End of input after {} frames ({} left over)",
                    source.position(),
                    frames_read
                );
                pacer.stop();
                break;
            }
            self.render(display);
            iterations += 1;
            pacer.tick(clock);
            self.events.clear();
            display.poll_events(&mut self.events);
            for &event in &self.events {
                match event {
                    DisplayEvent::Quit => {
                        reason = StopReason::Quit;
                        pacer.stop();
                    }
                    DisplayEvent::Resized { width, height } => {
                        log::info!("Resized to {}x{}", width, height);
                        display.resize(width, height);
                    }
                }
            }
        }
        pacer.finish(release);
        log::info!("Stopped after {} iterations ({:?})", iterations, reason);
        Ok(Summary { iterations, reason })
    }

    fn render<D: Display>(&mut self, display: &mut D) {
        for channel in self.channels.iter_mut() {
            channel.project(&self.buffer, &mut self.points);
            self.renderer.draw_polyline(display, &self.points, channel);
        }
        display.present();
        self.buffer.slide();
    }
}
