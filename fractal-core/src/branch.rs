use crate::{
    canvas::Canvas,
    types::{Color, Point},
};

/// Maps a branch's depth-derived line width to the width it is stroked with.
///
/// Thin twigs are flattened to a hairline and mid-sized limbs are thinned,
/// so the many high-depth branches stay visually below the trunk:
///
/// | input          | stroked width   |
/// |----------------|-----------------|
/// | `w < 3`        | `0.5`           |
/// | `3 <= w < 7`   | `w * 0.7`       |
/// | `7 <= w < 10`  | `w * 0.9`       |
/// | `w >= 10`      | `w`             |
pub fn stroke_width(line_width: f32) -> f32 {
    if line_width < 3.0 {
        0.5
    } else if line_width < 7.0 {
        line_width * 0.7
    } else if line_width < 10.0 {
        line_width * 0.9
    } else {
        line_width
    }
}

/// One line segment of a tree, revealed over a fixed number of ticks.
///
/// `start` and `end` are fixed at creation. Each [`Branch::advance`] moves
/// the drawn endpoint `current` one `step` closer to `end` and strokes the
/// segment from `start` to it.
#[derive(Clone, Debug)]
pub struct Branch {
    pub start: Point,
    pub end: Point,
    /// Depth-derived width, before [`stroke_width`] is applied.
    pub line_width: f32,
    pub color: Color,
    ticks_elapsed: u32,
    ticks_total: u32,
    current: Point,
    step: Point,
}

impl Branch {
    /// Creates an unrevealed branch.
    ///
    /// ### Panics
    /// Panics if `ticks_total` is `0`.
    pub fn new(start: Point, end: Point, line_width: f32, color: Color, ticks_total: u32) -> Self {
        assert!(ticks_total > 0, "a branch needs at least one tick");
        Self {
            start,
            end,
            line_width,
            color,
            ticks_elapsed: 0,
            ticks_total,
            current: start,
            step: (end - start) / ticks_total as f32,
        }
    }

    /// Reveals one more step of the branch.
    ///
    /// While the reveal is in progress this moves `current` by one `step`,
    /// strokes `start -> current` and returns `false`. Once every tick has
    /// elapsed it draws nothing and returns `true`, on every call.
    pub fn advance(&mut self, canvas: &mut impl Canvas) -> bool {
        if self.is_complete() {
            return true;
        }

        self.ticks_elapsed += 1;
        // Land exactly on `end` instead of accumulating float error.
        self.current = if self.ticks_elapsed == self.ticks_total {
            self.end
        } else {
            self.current + self.step
        };
        self.draw(canvas);
        false
    }

    /// Strokes `start -> current`, setting every piece of drawing state it uses.
    fn draw(&self, canvas: &mut impl Canvas) {
        canvas.begin_path();
        canvas.move_to(self.start);
        canvas.line_to(self.current);
        canvas.set_line_width(stroke_width(self.line_width));
        canvas.set_fill_color(self.color);
        canvas.set_stroke_color(self.color);
        canvas.stroke();
        canvas.close_path();
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.ticks_elapsed == self.ticks_total
    }

    pub fn ticks_elapsed(&self) -> u32 {
        self.ticks_elapsed
    }

    pub fn ticks_total(&self) -> u32 {
        self.ticks_total
    }

    /// The endpoint drawn so far.
    pub fn current(&self) -> Point {
        self.current
    }

    /// Per-tick movement of `current`.
    pub fn step(&self) -> Point {
        self.step
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::StrokeCanvas;
    use glam::Vec2;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn stroke_width_matches_piecewise_boundaries() {
        let cases = [
            (2.9, 0.5),
            (3.0, 2.1),
            (6.9, 4.83),
            (7.0, 6.3),
            (9.9, 8.91),
            (10.0, 10.0),
            (11.0, 11.0),
            (1.0, 0.5),
        ];
        for (input, expected) in cases {
            let got = stroke_width(input);
            assert!(approx(got, expected), "stroke_width({input}) = {got}, expected {expected}");
        }
    }

    #[test]
    fn new_branch_starts_at_start_with_precomputed_step() {
        let b = Branch::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, -20.0), 5.0, Color::BLACK, 10);
        assert_eq!(b.current(), b.start);
        assert_eq!(b.ticks_elapsed(), 0);
        assert_eq!(b.step(), Vec2::new(1.0, -2.0));
        assert!(!b.is_complete());
    }

    #[test]
    fn advance_draws_once_per_tick_and_converges_to_end() {
        let start = Vec2::new(100.0, 500.0);
        let end = Vec2::new(103.3, 377.7);
        let mut b = Branch::new(start, end, 11.0, Color::BLACK, 10);
        let mut canvas = StrokeCanvas::new(800.0, 600.0);

        for tick in 1..=10 {
            assert!(!b.advance(&mut canvas));
            assert_eq!(b.ticks_elapsed(), tick);
            assert_eq!(canvas.stroke_calls(), tick as usize);

            let drawn = canvas.strokes().last().unwrap();
            assert_eq!(drawn.from, start);
            assert_eq!(drawn.to, b.current());
        }

        assert!(b.is_complete());
        assert!((b.current() - end).length() < 1e-3);
    }

    #[test]
    fn advance_after_completion_is_idempotent_and_silent() {
        let mut b = Branch::new(Vec2::ZERO, Vec2::new(0.0, -5.0), 1.0, Color::BLACK, 3);
        let mut canvas = StrokeCanvas::new(10.0, 10.0);
        while !b.is_complete() {
            b.advance(&mut canvas);
        }
        let calls = canvas.stroke_calls();

        for _ in 0..5 {
            assert!(b.advance(&mut canvas));
        }
        assert_eq!(canvas.stroke_calls(), calls);
        assert_eq!(b.ticks_elapsed(), b.ticks_total());
    }

    #[test]
    fn draw_sets_its_own_width_and_color() {
        let mut canvas = StrokeCanvas::new(10.0, 10.0);
        canvas.set_line_width(42.0);
        canvas.set_stroke_color(Color::rgb(9, 9, 9));

        let green = Color::rgb(0, 200, 0);
        let mut b = Branch::new(Vec2::ZERO, Vec2::new(4.0, 0.0), 8.0, green, 2);
        b.advance(&mut canvas);

        let s = canvas.strokes()[0];
        assert!(approx(s.width, 7.2));
        assert_eq!(s.color, green);
        assert_eq!(canvas.fill_color(), green);
    }

    #[test]
    fn zero_length_branch_reveals_without_error() {
        let p = Vec2::new(5.0, 5.0);
        let mut b = Branch::new(p, p, 1.0, Color::BLACK, 4);
        let mut canvas = StrokeCanvas::new(10.0, 10.0);
        for _ in 0..4 {
            assert!(!b.advance(&mut canvas));
        }
        assert!(b.advance(&mut canvas));
        assert_eq!(b.current(), p);
    }

    #[test]
    #[should_panic]
    fn zero_ticks_is_rejected() {
        let _ = Branch::new(Vec2::ZERO, Vec2::X, 1.0, Color::BLACK, 0);
    }
}
