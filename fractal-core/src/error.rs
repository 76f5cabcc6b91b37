use thiserror::Error;

/// Reasons a [`crate::config::Config`] is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("tree depth must be at least 1")]
    ZeroDepth,

    #[error("tree depth {max_depth} exceeds the limit of {limit}")]
    DepthTooLarge { max_depth: usize, limit: usize },

    #[error("a branch must take at least one tick to reveal")]
    ZeroTicks,

    #[error("{name} range is empty: {min} > {max}")]
    EmptyRange {
        name: &'static str,
        min: i32,
        max: i32,
    },

    #[error("invalid color {0:?}, expected #rgb, #rrggbb or #rrggbbaa")]
    InvalidColor(String),
}
