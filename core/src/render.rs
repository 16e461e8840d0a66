use crate::{channel::Channel, frame::Point};
use rgb_int::Rgb24;

pub const LINE_WIDTH: u32 = 3;

/// Opacity of the black quad drawn over everything after each pass. Each
/// pass scales previously drawn colour by `1 - FADE_ALPHA`.
pub const FADE_ALPHA: f32 = 0.2;

/// Half the side length of the fade quad. Comfortably larger than the
/// visible area, even when rotated.
pub const FADE_EXTENT: f32 = 2.0;

/// Colour with components in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intensity {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Intensity {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn to_rgb24(self) -> Rgb24 {
        let to_u8 = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        Rgb24::new(to_u8(self.r), to_u8(self.g), to_u8(self.b))
    }
}

/// Brightness of one component for a segment of length `len`. Shorter
/// (slower moving) segments are brighter. A zero-length segment is as bright
/// as possible.
pub fn component_intensity(k: f32, len: f32) -> f32 {
    if len <= f32::EPSILON {
        1.0
    } else {
        (k / len).min(1.0)
    }
}

pub fn segment_intensity(from: Point, to: Point, k: Intensity) -> Intensity {
    let len = from.distance(to);
    Intensity {
        r: component_intensity(k.r, len),
        g: component_intensity(k.g, len),
        b: component_intensity(k.b, len),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    /// dst = min(dst + src, 1)
    Additive,
    /// dst = src * alpha + dst * (1 - alpha)
    Alpha,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
    pub colour: Rgb24,
}

/// Something that can be drawn on. Drawn content must persist between
/// calls to `present` since trails are produced by fading old content
/// rather than clearing it.
pub trait Surface {
    fn set_blend_mode(&mut self, blend_mode: BlendMode);

    fn draw_segments(&mut self, segments: &[Segment], line_width: u32);

    /// Fill the axis-aligned quad from `min` to `max`.
    fn fill_quad(&mut self, min: Point, max: Point, colour: Rgb24, alpha: f32);

    /// Make everything drawn so far visible.
    fn present(&mut self);
}

/// Draws batches of points as glowing lines with fading trails.
#[derive(Default)]
pub struct Renderer {
    segments: Vec<Segment>,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw one pass for `channel`: a line through `points` starting at the
    /// last point drawn for the channel, then the fade quad.
    pub fn draw_polyline<S: Surface>(
        &mut self,
        surface: &mut S,
        points: &[Point],
        channel: &mut Channel,
    ) {
        let Some(&last) = points.last() else {
            return;
        };
        let k = channel.index.intensity_constants();
        self.segments.clear();
        let mut prev = channel.last;
        for &point in points {
            self.segments.push(Segment {
                from: prev,
                to: point,
                colour: segment_intensity(prev, point, k).to_rgb24(),
            });
            prev = point;
        }
        surface.set_blend_mode(BlendMode::Additive);
        surface.draw_segments(&self.segments, LINE_WIDTH);
        Self::fade(surface);
        channel.last = last;
    }

    pub fn fade<S: Surface>(surface: &mut S) {
        surface.set_blend_mode(BlendMode::Alpha);
        surface.fill_quad(
            Point::new(-FADE_EXTENT, -FADE_EXTENT),
            Point::new(FADE_EXTENT, FADE_EXTENT),
            Rgb24::new(0, 0, 0),
            FADE_ALPHA,
        );
    }
}
