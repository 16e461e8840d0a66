use anyhow::anyhow;
use line_2d::Coord;
use phosphor_core::{
    BlendMode, Display, DisplayEvent, EventSource, Point, Segment, Surface,
    Viewport,
};
use rgb_int::Rgb24;
use sdl2::{
    EventPump,
    event::{Event, WindowEvent},
    keyboard::Scancode,
    pixels::Color,
    rect::{Point as SdlPoint, Rect},
    render::{BlendMode as SdlBlendMode, Canvas, Texture, TextureCreator},
    video::{Window, WindowContext},
};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

fn sdl_blend_mode(blend_mode: BlendMode) -> SdlBlendMode {
    match blend_mode {
        BlendMode::Additive => SdlBlendMode::Add,
        BlendMode::Alpha => SdlBlendMode::Blend,
    }
}

/// Pixels covered by a line `line_width` pixels thick. The line is
/// thickened along whichever axis it changes least in, so no pixel is
/// covered twice.
fn thick_line(
    from: Coord,
    to: Coord,
    line_width: u32,
    out: &mut Vec<SdlPoint>,
) {
    out.clear();
    let (dx, dy) = ((to.x - from.x).abs(), (to.y - from.y).abs());
    let across = if dx >= dy { (0, 1) } else { (1, 0) };
    let first = -((line_width as i32 - 1) / 2);
    for Coord { x, y } in line_2d::coords_between(from, to) {
        for i in first..(first + line_width as i32) {
            out.push(SdlPoint::new(x + across.0 * i, y + across.1 * i));
        }
    }
}

fn create_target<'a>(
    texture_creator: &'a TextureCreator<WindowContext>,
    width: u32,
    height: u32,
) -> anyhow::Result<Texture<'a>> {
    let mut texture = texture_creator.create_texture_target(
        texture_creator.default_pixel_format(),
        width.max(1),
        height.max(1),
    )?;
    texture.set_blend_mode(SdlBlendMode::None);
    Ok(texture)
}

/// Draws into an offscreen texture which is kept between frames, so
/// anything drawn stays visible until it is faded out.
pub struct SdlDisplay<'a> {
    canvas: Canvas<Window>,
    texture_creator: &'a TextureCreator<WindowContext>,
    texture: Texture<'a>,
    event_pump: EventPump,
    viewport: Viewport,
    blend_mode: BlendMode,
    scratch: Vec<SdlPoint>,
    interrupted: Arc<AtomicBool>,
}

impl<'a> SdlDisplay<'a> {
    pub fn new(
        canvas: Canvas<Window>,
        texture_creator: &'a TextureCreator<WindowContext>,
        event_pump: EventPump,
        rotate: bool,
        interrupted: Arc<AtomicBool>,
    ) -> anyhow::Result<Self> {
        let (width, height) = canvas.output_size().map_err(|e| anyhow!(e))?;
        let texture = create_target(texture_creator, width, height)?;
        let mut display = Self {
            canvas,
            texture_creator,
            texture,
            event_pump,
            viewport: Viewport::new(width, height, rotate),
            blend_mode: BlendMode::Additive,
            scratch: Vec::new(),
            interrupted,
        };
        display.clear();
        Ok(display)
    }

    fn clear(&mut self) {
        let result =
            self.canvas.with_texture_canvas(&mut self.texture, |canvas| {
                canvas.set_draw_color(Color::RGB(0, 0, 0));
                canvas.clear();
            });
        if let Err(e) = result {
            log::error!("Failed to clear display: {}", e);
        }
    }
}

impl<'a> Surface for SdlDisplay<'a> {
    fn set_blend_mode(&mut self, blend_mode: BlendMode) {
        self.blend_mode = blend_mode;
    }

    fn draw_segments(&mut self, segments: &[Segment], line_width: u32) {
        let viewport = self.viewport;
        let blend_mode = sdl_blend_mode(self.blend_mode);
        let scratch = &mut self.scratch;
        let result =
            self.canvas.with_texture_canvas(&mut self.texture, |canvas| {
                canvas.set_blend_mode(blend_mode);
                for segment in segments {
                    thick_line(
                        viewport.to_pixel(segment.from),
                        viewport.to_pixel(segment.to),
                        line_width,
                        scratch,
                    );
                    let colour = segment.colour;
                    canvas.set_draw_color(Color::RGB(
                        colour.r, colour.g, colour.b,
                    ));
                    let points = scratch.as_slice();
                    if let Err(e) = canvas.draw_points(points) {
                        log::error!("Failed to draw points: {}", e);
                    }
                }
            });
        if let Err(e) = result {
            log::error!("Failed to draw segments: {}", e);
        }
    }

    fn fill_quad(&mut self, min: Point, max: Point, colour: Rgb24, alpha: f32) {
        let corners = [
            min,
            Point::new(max.x, min.y),
            max,
            Point::new(min.x, max.y),
        ]
        .map(|p| self.viewport.to_pixel(p));
        let left = corners.iter().map(|c| c.x).min().unwrap_or(0);
        let right = corners.iter().map(|c| c.x).max().unwrap_or(0);
        let top = corners.iter().map(|c| c.y).min().unwrap_or(0);
        let bottom = corners.iter().map(|c| c.y).max().unwrap_or(0);
        let rect = Rect::new(
            left,
            top,
            (right - left) as u32,
            (bottom - top) as u32,
        );
        let blend_mode = sdl_blend_mode(self.blend_mode);
        let colour = Color::RGBA(
            colour.r,
            colour.g,
            colour.b,
            (alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
        );
        let result =
            self.canvas.with_texture_canvas(&mut self.texture, |canvas| {
                canvas.set_blend_mode(blend_mode);
                canvas.set_draw_color(colour);
                if let Err(e) = canvas.fill_rect(rect) {
                    log::error!("Failed to fill rect: {}", e);
                }
            });
        if let Err(e) = result {
            log::error!("Failed to fill quad: {}", e);
        }
    }

    fn present(&mut self) {
        if let Err(e) = self.canvas.copy(&self.texture, None, None) {
            log::error!("Failed to copy to window: {}", e);
        }
        self.canvas.present();
    }
}

impl<'a> EventSource for SdlDisplay<'a> {
    fn poll_events(&mut self, out: &mut Vec<DisplayEvent>) {
        if self.interrupted.load(Ordering::Relaxed) {
            out.push(DisplayEvent::Quit);
        }
        for event in self.event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    scancode: Some(Scancode::Escape),
                    ..
                } => out.push(DisplayEvent::Quit),
                Event::Window {
                    win_event: WindowEvent::SizeChanged(width, height),
                    ..
                } => out.push(DisplayEvent::Resized {
                    width: width.max(1) as u32,
                    height: height.max(1) as u32,
                }),
                _ => (),
            }
        }
    }
}

impl<'a> Display for SdlDisplay<'a> {
    /// `width` and `height` are in window units, which differ from pixels on
    /// high DPI outputs, so the drawable size is queried again here.
    fn resize(&mut self, width: u32, height: u32) {
        let (width, height) =
            self.canvas.output_size().unwrap_or((width, height));
        self.viewport.resize(width, height);
        match create_target(self.texture_creator, width, height) {
            Ok(texture) => self.texture = texture,
            Err(e) => log::error!("Failed to resize display: {}", e),
        }
        self.clear();
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn horizontal_line_is_thickened_vertically() {
        let mut out = Vec::new();
        thick_line(Coord::new(0, 5), Coord::new(3, 5), 3, &mut out);
        assert_eq!(out.len() % 3, 0);
        assert!(out.contains(&SdlPoint::new(0, 4)));
        assert!(out.contains(&SdlPoint::new(3, 6)));
        assert!(out.iter().all(|p| (4..=6).contains(&p.y())));
    }

    #[test]
    fn steep_line_is_thickened_horizontally() {
        let mut out = Vec::new();
        thick_line(Coord::new(10, 0), Coord::new(11, 8), 3, &mut out);
        assert!(out.iter().all(|p| (9..=12).contains(&p.x())));
        assert!(out.contains(&SdlPoint::new(9, 0)));
    }

    #[test]
    fn thin_line() {
        let mut out = Vec::new();
        thick_line(Coord::new(2, 2), Coord::new(9, 2), 1, &mut out);
        assert!(out.contains(&SdlPoint::new(2, 2)));
        assert!(out.iter().all(|p| p.y() == 2));
    }
}
