//! Recursive geometry for one fractal tree.
//!
//! Starting from the root, every call emits one segment and then recurses
//! twice from its end point, turning left and right by a random spread.
//! Recursion stops at `max_depth`, so depth `d` holds exactly `2^d`
//! branches and a whole tree holds `2^max_depth - 1`.

use glam::Vec2;
use rand::Rng;

use crate::{branch::Branch, config::Config, types::Point};

/// Branches of one tree grouped by depth; `levels[d]` holds depth `d`.
pub type Levels = Vec<Vec<Branch>>;

/// Generates the full branch set of a tree rooted at `root`.
///
/// Segment lengths and child angles are drawn from `rng`, so a seeded
/// generator gives reproducible trees. Within a level, branches are in
/// pre-order generation order.
///
/// ### Parameters
/// - `root` - Base of the trunk on the surface.
/// - `cfg` - Depth, ranges and styling; must pass [`Config::validate`].
/// - `rng` - Source of the uniform integer samples.
///
/// ### Returns
/// Exactly `cfg.max_depth` levels.
///
/// ### Panics
/// Panics if one of the ranges in `cfg` is empty.
pub fn generate(root: Point, cfg: &Config, rng: &mut impl Rng) -> Levels {
    let mut levels: Levels = (0..cfg.max_depth)
        .map(|d| Vec::with_capacity(1 << d.min(16)))
        .collect();
    grow(&mut levels, root, cfg.root_angle, 0, cfg, rng);
    levels
}

fn grow(
    levels: &mut Levels,
    start: Point,
    angle: f32,
    depth: usize,
    cfg: &Config,
    rng: &mut impl Rng,
) {
    if depth == cfg.max_depth {
        return;
    }

    let (min, max) = if depth == 0 { cfg.trunk_len } else { cfg.limb_len };
    let len = rng.random_range(min..=max) as f32;
    // Segments near the root are scaled up the most.
    let remaining = (cfg.max_depth - depth) as f32;
    let end = start + direction(angle) * len * remaining;

    levels[depth].push(Branch::new(start, end, remaining, cfg.color, cfg.ticks_total));

    let (lo, hi) = cfg.spread;
    let left = angle - rng.random_range(lo..=hi) as f32;
    grow(levels, end, left, depth + 1, cfg, rng);
    let right = angle + rng.random_range(lo..=hi) as f32;
    grow(levels, end, right, depth + 1, cfg, rng);
}

/// Unit vector for an angle in degrees, `0` along `+x`, clockwise toward `+y`.
#[inline]
fn direction(degrees: f32) -> Vec2 {
    Vec2::from_angle(degrees.to_radians())
}
