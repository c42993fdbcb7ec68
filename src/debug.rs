//! Optional visualization hooks.
//!
//! Drawing never feeds back into the simulation. Hosts implement [`DebugDraw`]
//! and pass it explicitly to the `debug_draw` methods of colliders, manifolds
//! and the collision system.

use crate::math::{any_perpendicular, Vector3};

/// Segments used to approximate a circle
const CIRCLE_SEGMENTS: usize = 16;

/// An RGBA color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Color = Color::rgb(0.0, 1.0, 0.0);
    pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);
    pub const YELLOW: Color = Color::rgb(1.0, 1.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);

    /// Opaque color
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }
}

/// Line-based drawing capability supplied by the host
pub trait DebugDraw {
    /// Draws a line segment
    fn draw_line(&mut self, from: Vector3, to: Vector3, color: Color);

    /// Draws a point as a small cross
    fn draw_point(&mut self, position: Vector3, color: Color) {
        const SIZE: f32 = 0.05;
        for axis in [Vector3::x(), Vector3::y(), Vector3::z()] {
            self.draw_line(position - axis * SIZE, position + axis * SIZE, color);
        }
    }

    /// Draws a circle around `normal`
    fn draw_circle(&mut self, center: Vector3, normal: Vector3, radius: f32, color: Color) {
        let u = any_perpendicular(&normal);
        let v = normal.cross(&u);
        let step = std::f32::consts::TAU / CIRCLE_SEGMENTS as f32;

        let at = |i: usize| {
            let angle = step * i as f32;
            center + (u * angle.cos() + v * angle.sin()) * radius
        };

        for i in 0..CIRCLE_SEGMENTS {
            self.draw_line(at(i), at(i + 1), color);
        }
    }

    /// Draws a sphere as three great circles
    fn draw_sphere(&mut self, center: Vector3, radius: f32, color: Color) {
        for axis in [Vector3::x(), Vector3::y(), Vector3::z()] {
            self.draw_circle(center, axis, radius, color);
        }
    }
}

/// A [`DebugDraw`] that records every line, for hosts that batch their drawing
#[derive(Debug, Clone, Default)]
pub struct DebugLines {
    pub lines: Vec<(Vector3, Vector3, Color)>,
}

impl DebugLines {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

impl DebugDraw for DebugLines {
    fn draw_line(&mut self, from: Vector3, to: Vector3, color: Color) {
        self.lines.push((from, to, color));
    }
}
