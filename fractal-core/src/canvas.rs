//! The drawing surface capability and a retained in-memory surface.
//!
//! [`Canvas`] mirrors the small subset of a 2D path API that trees need.
//! [`StrokeCanvas`] implements it by recording stroked segments, so an
//! immediate-mode frontend can repaint the whole surface each frame and
//! tests can observe what was drawn.

use std::collections::HashMap;

use glam::Vec2;

use crate::types::{Color, Point};

/// A 2D drawing surface with path and stroke primitives.
///
/// Drawing state (line width, colors, current path) persists between
/// calls, so callers set everything they rely on before calling
/// [`Canvas::stroke`].
pub trait Canvas {
    /// Starts a new path, discarding any current one.
    fn begin_path(&mut self);
    /// Starts a new subpath at `p`.
    fn move_to(&mut self, p: Point);
    /// Extends the current subpath with a straight line to `p`.
    fn line_to(&mut self, p: Point);
    fn set_line_width(&mut self, width: f32);
    fn set_fill_color(&mut self, color: Color);
    fn set_stroke_color(&mut self, color: Color);
    /// Strokes the current path with the current width and stroke color.
    fn stroke(&mut self);
    /// Closes the current subpath back to its first point.
    fn close_path(&mut self);
    /// Erases everything drawn inside the given rectangle.
    fn clear_rect(&mut self, x: f32, y: f32, w: f32, h: f32);
    /// Surface size as `(width, height)`.
    fn size(&self) -> (f32, f32);
    fn resize(&mut self, width: f32, height: f32);
}

/// One committed line segment on a [`StrokeCanvas`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    pub from: Point,
    pub to: Point,
    pub width: f32,
    pub color: Color,
}

impl Stroke {
    /// Whether `self` is hidden under `other`: same start, width and
    /// color, and lying along `other` no further than its end.
    fn is_covered_by(&self, other: &Stroke) -> bool {
        let e = self.to - self.from;
        let d = other.to - other.from;
        if e == Vec2::ZERO || d == Vec2::ZERO {
            return e == d;
        }
        let len2 = d.length_squared();
        e.dot(d) > 0.0
            && d.perp_dot(e).abs() <= COLLINEAR_EPS * len2.sqrt() * e.length()
            && e.length_squared() <= len2 * (1.0 + COLLINEAR_EPS)
    }
}

/// Relative tolerance for treating two segments as collinear.
const COLLINEAR_EPS: f32 = 1e-4;

/// Strokes sharing a start point, width and color, by bit pattern.
type StrokeKey = ([u32; 2], u32, Color);

fn stroke_key(s: &Stroke) -> StrokeKey {
    ([s.from.x.to_bits(), s.from.y.to_bits()], s.width.to_bits(), s.color)
}

/// A [`Canvas`] that keeps the visible stroked segments in memory.
///
/// A new segment that fully covers an earlier one with the same start,
/// width and color replaces it in place, so a line re-stroked while it
/// grows is stored once.
#[derive(Debug)]
pub struct StrokeCanvas {
    size: Vec2,
    strokes: Vec<Stroke>,
    by_start: HashMap<StrokeKey, Vec<usize>>,
    subpaths: Vec<Vec<Point>>,
    line_width: f32,
    stroke_color: Color,
    fill_color: Color,
    stroke_calls: usize,
}

impl StrokeCanvas {
    /// Creates an empty surface of the given size.
    ///
    /// Drawing state starts out like a fresh HTML canvas: line width `1`
    /// and black stroke and fill colors.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
            strokes: Vec::new(),
            by_start: HashMap::new(),
            subpaths: Vec::new(),
            line_width: 1.0,
            stroke_color: Color::BLACK,
            fill_color: Color::BLACK,
            stroke_calls: 0,
        }
    }

    /// Segments currently visible, oldest first.
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    /// Number of times [`Canvas::stroke`] has been called over the
    /// lifetime of this surface, including strokes later erased.
    pub fn stroke_calls(&self) -> usize {
        self.stroke_calls
    }

    pub fn line_width(&self) -> f32 {
        self.line_width
    }

    pub fn stroke_color(&self) -> Color {
        self.stroke_color
    }

    pub fn fill_color(&self) -> Color {
        self.fill_color
    }

    /// Stores `stroke`, replacing an earlier one it covers.
    fn commit(&mut self, stroke: Stroke) {
        let slots = self.by_start.entry(stroke_key(&stroke)).or_default();
        if let Some(&i) = slots
            .iter()
            .find(|&&i| self.strokes[i].is_covered_by(&stroke))
        {
            self.strokes[i] = stroke;
            return;
        }
        slots.push(self.strokes.len());
        self.strokes.push(stroke);
    }

    fn reindex(&mut self) {
        self.by_start.clear();
        for (i, s) in self.strokes.iter().enumerate() {
            self.by_start.entry(stroke_key(s)).or_default().push(i);
        }
    }
}

impl Canvas for StrokeCanvas {
    fn begin_path(&mut self) {
        self.subpaths.clear();
    }

    fn move_to(&mut self, p: Point) {
        self.subpaths.push(vec![p]);
    }

    fn line_to(&mut self, p: Point) {
        match self.subpaths.last_mut() {
            Some(path) => path.push(p),
            // Like a 2D context, a lineTo with no subpath acts as moveTo.
            None => self.subpaths.push(vec![p]),
        }
    }

    fn set_line_width(&mut self, width: f32) {
        // Non-positive and non-finite widths are ignored by a 2D context.
        if width.is_finite() && width > 0.0 {
            self.line_width = width;
        }
    }

    fn set_fill_color(&mut self, color: Color) {
        self.fill_color = color;
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.stroke_color = color;
    }

    fn stroke(&mut self) {
        self.stroke_calls += 1;
        let segments: Vec<Stroke> = self
            .subpaths
            .iter()
            .flat_map(|path| path.windows(2))
            .map(|pair| Stroke {
                from: pair[0],
                to: pair[1],
                width: self.line_width,
                color: self.stroke_color,
            })
            .collect();
        for s in segments {
            self.commit(s);
        }
    }

    fn close_path(&mut self) {
        if let Some(path) = self.subpaths.last_mut()
            && path.len() > 1
        {
            let first = path[0];
            path.push(first);
        }
    }

    fn clear_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        let min = Vec2::new(x.min(x + w), y.min(y + h));
        let max = Vec2::new(x.max(x + w), y.max(y + h));
        // Anything beyond the surface edge was never visible.
        if min.cmple(Vec2::ZERO).all() && max.cmpge(self.size).all() {
            self.strokes.clear();
            self.by_start.clear();
            return;
        }
        let inside = |p: Point| p.cmpge(min).all() && p.cmple(max).all();
        self.strokes.retain(|s| !(inside(s.from) && inside(s.to)));
        self.reindex();
    }

    fn size(&self) -> (f32, f32) {
        (self.size.x, self.size.y)
    }

    fn resize(&mut self, width: f32, height: f32) {
        self.size = Vec2::new(width, height);
    }
}
