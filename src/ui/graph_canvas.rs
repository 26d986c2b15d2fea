//! Draws the scene on a braille canvas.

use super::viewport::Viewport;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols::Marker,
    widgets::{
        canvas::{Canvas, Circle, Context, Line as CanvasLine, Painter, Shape},
        Block, Borders,
    },
    Frame,
};
use unlocktree::scene::{CircleShape, LineShape, Primitive, Rgb, Scene};

const BACKGROUND: Rgb = Rgb::BLACK;

/// A filled disc, sampled once per braille dot.
struct Disc {
    x: f64,
    y: f64,
    radius: f64,
    /// World size of one dot, horizontally and vertically.
    step: (f64, f64),
    color: Color,
}

impl Shape for Disc {
    fn draw(&self, painter: &mut Painter) {
        let (sx, sy) = self.step;
        if self.radius <= 0.0 || sx <= 0.0 || sy <= 0.0 {
            return;
        }
        let r2 = self.radius * self.radius;
        let mut dy = -self.radius;
        while dy <= self.radius {
            let mut dx = -self.radius;
            while dx <= self.radius {
                if dx * dx + dy * dy <= r2 {
                    if let Some((px, py)) = painter.get_point(self.x + dx, self.y + dy) {
                        painter.paint(px, py, self.color);
                    }
                }
                dx += sx;
            }
            dy += sy;
        }
    }
}

fn to_color(rgb: Rgb, opacity: f64) -> Color {
    let c = rgb.over(BACKGROUND, opacity);
    Color::Rgb(c.r, c.g, c.b)
}

pub fn draw_graph(frame: &mut Frame, area: Rect, scene: &Scene, viewport: &mut Viewport) {
    let block = Block::default()
        .title(" Achievements ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    viewport.area = inner;

    let (x_bounds, y_bounds) = viewport.canvas_bounds();
    let (cw, ch) = viewport.cell_size();
    // Braille cells hold 2x4 dots
    let step = (cw / 2.0, ch / 4.0);

    let canvas = Canvas::default()
        .marker(Marker::Braille)
        .background_color(Color::Reset)
        .x_bounds(x_bounds)
        .y_bounds(y_bounds)
        .paint(|ctx| {
            for (_, primitive) in scene.draw_order() {
                match primitive {
                    Primitive::Circle(circle) => draw_circle(ctx, circle, step),
                    Primitive::Line(line) => draw_line(ctx, line),
                }
            }
        });
    frame.render_widget(canvas, inner);
}

fn draw_circle(ctx: &mut Context, circle: &CircleShape, step: (f64, f64)) {
    if let Some(fill) = circle.fill {
        ctx.draw(&Disc {
            x: circle.cx,
            y: -circle.cy,
            radius: circle.r,
            step,
            color: to_color(fill, circle.opacity),
        });
    }
    if let Some(stroke) = circle.stroke {
        if circle.stroke_width > 0.0 && circle.r > 0.0 {
            ctx.draw(&Circle {
                x: circle.cx,
                y: -circle.cy,
                radius: circle.r,
                color: to_color(stroke, circle.opacity),
            });
        }
    }
}

fn draw_line(ctx: &mut Context, line: &LineShape) {
    let color = to_color(line.stroke, line.opacity);
    for (from, to) in line.visible_segments() {
        let (x1, y1) = line.point_at(from);
        let (x2, y2) = line.point_at(to);
        ctx.draw(&CanvasLine {
            x1,
            y1: -y1,
            x2,
            y2: -y2,
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opacity_blends_to_background() {
        assert_eq!(to_color(Rgb::new(200, 100, 0), 1.0), Color::Rgb(200, 100, 0));
        assert_eq!(to_color(Rgb::new(200, 100, 0), 0.5), Color::Rgb(100, 50, 0));
        assert_eq!(to_color(Rgb::new(200, 100, 0), 0.0), Color::Rgb(0, 0, 0));
    }
}
