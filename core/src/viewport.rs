use crate::frame::{Point, WINDOW_SIZE};
use line_2d::Coord;
use std::f32::consts::FRAC_1_SQRT_2;

/// Initial window size in pixels. The rotated layout is wider than it is
/// tall so the diagonal trace fills more of the screen.
pub fn initial_window_size(rotate: bool) -> (u32, u32) {
    if rotate {
        (
            (WINDOW_SIZE as f32 * 1.25) as u32,
            (WINDOW_SIZE as f32 * 0.703125) as u32,
        )
    } else {
        (WINDOW_SIZE as u32, WINDOW_SIZE as u32)
    }
}

/// Maps points in normalized device coordinates onto window pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    /// Rotate everything 45 degrees clockwise.
    pub rotate: bool,
}

impl Viewport {
    pub fn new(width: u32, height: u32, rotate: bool) -> Self {
        Self {
            width,
            height,
            rotate,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    fn transform(&self, Point { x, y }: Point) -> Point {
        if self.rotate {
            Point {
                x: (x + y) * FRAC_1_SQRT_2,
                y: (y - x) * FRAC_1_SQRT_2,
            }
        } else {
            Point { x, y }
        }
    }

    /// Pixel coordinate of `point`. The y axis points up in device
    /// coordinates and down in pixels.
    pub fn to_pixel(&self, point: Point) -> Coord {
        let Point { x, y } = self.transform(point);
        Coord {
            x: ((x + 1.0) * 0.5 * self.width as f32).round() as i32,
            y: ((1.0 - y) * 0.5 * self.height as f32).round() as i32,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn window_sizes() {
        assert_eq!(initial_window_size(false), (1024, 1024));
        assert_eq!(initial_window_size(true), (1280, 720));
    }

    #[test]
    fn corners_map_to_window_edges() {
        let viewport = Viewport::new(200, 100, false);
        assert_eq!(viewport.to_pixel(Point::ZERO), Coord::new(100, 50));
        assert_eq!(viewport.to_pixel(Point::new(-1.0, 1.0)), Coord::new(0, 0));
        assert_eq!(
            viewport.to_pixel(Point::new(1.0, -1.0)),
            Coord::new(200, 100)
        );
    }

    #[test]
    fn rotation_is_clockwise() {
        let viewport = Viewport::new(200, 200, true);
        // straight up becomes up and to the right
        let up = viewport.to_pixel(Point::new(0.0, 1.0));
        assert!(up.x > 100 && up.y < 100);
        // the diagonal y = x becomes horizontal
        let diagonal = viewport.to_pixel(Point::new(0.5, 0.5));
        assert_eq!(diagonal.y, 100);
        assert!(diagonal.x > 100);
    }
}
