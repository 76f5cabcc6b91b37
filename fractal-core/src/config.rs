use crate::{error::ConfigError, types::Color};

/// Deepest tree a [`Config`] may ask for.
///
/// A tree of depth `D` holds `2^D - 1` branches and is generated by plain
/// recursion, so the depth is kept small.
pub const MAX_DEPTH_LIMIT: usize = 16;

/// Parameters for planting and revealing trees.
///
/// Ranges are inclusive `(min, max)` pairs sampled uniformly as integers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    /// Number of depth levels; depth `0` is the trunk.
    pub max_depth: usize,
    /// Ticks each branch takes to reveal.
    pub ticks_total: u32,
    /// Length unit of the trunk segment.
    pub trunk_len: (i32, i32),
    /// Length unit of every other segment.
    pub limb_len: (i32, i32),
    /// Angle in degrees each child turns away from its parent.
    pub spread: (i32, i32),
    /// Trunk direction in degrees; `-90` is straight up.
    pub root_angle: f32,
    pub color: Color,
    /// Whether the shell plants one tree when a surface first appears.
    pub seed_on_start: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: 11,
            ticks_total: 10,
            trunk_len: (10, 13),
            limb_len: (0, 11),
            spread: (15, 23),
            root_angle: -90.0,
            color: Color::BLACK,
            seed_on_start: true,
        }
    }
}

impl Config {
    /// Checks that every parameter can be used to generate a tree.
    ///
    /// ### Returns
    /// - `Ok(())` if trees can be planted with this configuration.
    /// - `Err` naming the first offending parameter otherwise.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::ZeroDepth);
        }
        if self.max_depth > MAX_DEPTH_LIMIT {
            return Err(ConfigError::DepthTooLarge {
                max_depth: self.max_depth,
                limit: MAX_DEPTH_LIMIT,
            });
        }
        if self.ticks_total == 0 {
            return Err(ConfigError::ZeroTicks);
        }

        let ranges = [
            ("trunk_len", self.trunk_len),
            ("limb_len", self.limb_len),
            ("spread", self.spread),
        ];
        for (name, (min, max)) in ranges {
            if min > max {
                return Err(ConfigError::EmptyRange { name, min, max });
            }
        }
        Ok(())
    }
}
