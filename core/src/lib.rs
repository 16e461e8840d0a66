pub mod buffer;
pub mod channel;
pub mod config;
pub mod frame;
pub mod pacing;
pub mod render;
pub mod scope;
pub mod source;
pub mod viewport;

pub use buffer::FrameBuffer;
pub use channel::{Channel, ChannelIndex, ChannelSet};
pub use config::{Config, Mode, parse_delay};
pub use frame::{BATCH_SIZE, Frame, Point, SAMPLE_RATE, WINDOW_SIZE};
pub use pacing::{Clock, Pacer, PacerState, SystemClock};
pub use render::{BlendMode, Renderer, Segment, Surface};
pub use scope::{Display, DisplayEvent, EventSource, Scope, StopReason, Summary};
pub use source::{BatchRead, FrameSource};
pub use viewport::{Viewport, initial_window_size};
