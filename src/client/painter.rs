use std::f32::consts::{FRAC_PI_2, PI};

use ggez::graphics::{self, Canvas, DrawMode, DrawParam, GraphicsContext, Mesh};
use ggez::GameError;
use ledge::math::units::screen;
use ledge::render::{Color, Renderer};

const ARC_SEGMENTS: usize = 6;

/// Fills shapes on a ggez canvas.
pub struct Painter<'a> {
    gfx: &'a GraphicsContext,
    canvas: &'a mut Canvas,
}

impl<'a> Painter<'a> {
    pub fn new(gfx: &'a GraphicsContext, canvas: &'a mut Canvas) -> Self {
        Self { gfx, canvas }
    }
}

impl Renderer for Painter<'_> {
    type Error = GameError;

    fn fill_rounded_rect(&mut self, rect: screen::Rect, radii: [f32; 4], color: Color) -> Result<(), GameError> {
        if rect.is_empty() {
            return Ok(());
        }

        let color = graphics::Color::from_rgb(color.r, color.g, color.b);

        let mesh = if radii.iter().all(|&r| r <= 0.0) {
            let bounds = graphics::Rect::new(rect.origin.x, rect.origin.y, rect.size.width, rect.size.height);
            Mesh::new_rectangle(self.gfx, DrawMode::fill(), bounds, color)?
        } else {
            Mesh::new_polygon(self.gfx, DrawMode::fill(), &outline(rect, radii), color)?
        };

        self.canvas.draw(&mesh, DrawParam::default());
        Ok(())
    }
}

/// Clockwise outline of a rectangle with per-corner radii, starting at the
/// top-left corner.
fn outline(rect: screen::Rect, radii: [f32; 4]) -> Vec<mint::Point2<f32>> {
    let limit = rect.size.width.min(rect.size.height) / 2.0;
    let (min, max) = (rect.min(), rect.max());

    let corners = [
        (screen::Point2D::new(min.x, min.y), PI),
        (screen::Point2D::new(max.x, min.y), PI + FRAC_PI_2),
        (screen::Point2D::new(max.x, max.y), 0.0),
        (screen::Point2D::new(min.x, max.y), FRAC_PI_2),
    ];

    let mut points = Vec::with_capacity(4 * (ARC_SEGMENTS + 1));

    for ((corner, start), radius) in corners.into_iter().zip(radii) {
        let radius = radius.clamp(0.0, limit);
        if radius == 0.0 {
            points.push(mint::Point2::from(corner));
            continue;
        }

        // Pull the arc center inwards from the corner
        let center = screen::Point2D::new(
            corner.x + if corner.x == min.x { radius } else { -radius },
            corner.y + if corner.y == min.y { radius } else { -radius },
        );

        for step in 0..=ARC_SEGMENTS {
            let angle = start + FRAC_PI_2 * step as f32 / ARC_SEGMENTS as f32;
            let (sin, cos) = angle.sin_cos();
            points.push(mint::Point2::from(screen::Point2D::new(
                center.x + radius * cos,
                center.y + radius * sin,
            )));
        }
    }

    points
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect() -> screen::Rect {
        screen::Rect::new(screen::Point2D::new(10.0, 20.0), screen::Size2D::new(64.0, 32.0))
    }

    #[test]
    fn sharp_outline_is_the_rectangle() {
        let points = outline(rect(), [0.0; 4]);
        let xy: Vec<_> = points.iter().map(|p| (p.x, p.y)).collect();
        assert_eq!(xy, vec![(10.0, 20.0), (74.0, 20.0), (74.0, 52.0), (10.0, 52.0)]);
    }

    #[test]
    fn rounded_outline_stays_inside() {
        let points = outline(rect(), [16.0, 0.0, 100.0, 16.0]);
        assert_eq!(points.len(), 3 * (ARC_SEGMENTS + 1) + 1);

        for p in points {
            assert!((10.0 - 1e-3..=74.0 + 1e-3).contains(&p.x), "{} escaped", p.x);
            assert!((20.0 - 1e-3..=52.0 + 1e-3).contains(&p.y), "{} escaped", p.y);
        }
    }
}
