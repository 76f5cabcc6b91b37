//! A planted tree and its depth-by-depth reveal.
//!
//! Reveal order per tick:
//! 1. Advance every branch of the level at `reveal_depth`, in generation order.
//! 2. If that level is now fully revealed, move to the next level and
//!    repeat within the same tick.
//! 3. Otherwise stop; deeper levels wait for the next tick.
//!
//! A branch at depth `d + 1` therefore never moves before every branch at
//! depth `d` has finished.

use log::debug;
use rand::Rng;

use crate::{
    branch::Branch,
    canvas::Canvas,
    clock::FrameToken,
    config::Config,
    generator::{self, Levels},
    types::Point,
};

/// Outcome of one [`Tree::tick`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealStatus {
    /// Some level still has branches to reveal.
    Growing,
    /// Every level is revealed; the tree needs no more ticks.
    Revealed,
}

#[derive(Debug)]
pub struct Tree {
    pub root: Point,
    levels: Levels,
    reveal_depth: usize,
    subscription: Option<FrameToken>,
}

impl Tree {
    /// Generates a full tree rooted at `root`.
    ///
    /// All geometry is built here; nothing is drawn until [`Tree::tick`].
    pub fn new(root: Point, cfg: &Config, rng: &mut impl Rng) -> Self {
        Self::from_levels(root, generator::generate(root, cfg, rng))
    }

    /// Wraps pre-built levels; the tree's depth is `levels.len()`.
    pub fn from_levels(root: Point, levels: Levels) -> Self {
        Self {
            root,
            levels,
            reveal_depth: 0,
            subscription: None,
        }
    }

    /// Runs one reveal tick against `canvas`.
    ///
    /// ### Returns
    /// [`RevealStatus::Revealed`] once `reveal_depth` reaches the tree's
    /// depth; calling again after that draws nothing.
    pub fn tick(&mut self, canvas: &mut impl Canvas) -> RevealStatus {
        while let Some(level) = self.levels.get_mut(self.reveal_depth) {
            for branch in level.iter_mut() {
                branch.advance(canvas);
            }
            if !level.iter().all(Branch::is_complete) {
                return RevealStatus::Growing;
            }
            self.reveal_depth += 1;
        }
        RevealStatus::Revealed
    }

    /// Binds the tree to a clock registration.
    ///
    /// ### Returns
    /// The previous registration, if any, so the caller can cancel it.
    pub fn attach(&mut self, token: FrameToken) -> Option<FrameToken> {
        self.subscription.replace(token)
    }

    /// Unbinds the tree from its clock registration, returning it.
    pub fn detach(&mut self) -> Option<FrameToken> {
        let token = self.subscription.take();
        if let Some(token) = token {
            debug!("tree at {:?} detached from {token:?}", self.root);
        }
        token
    }

    pub fn subscription(&self) -> Option<FrameToken> {
        self.subscription
    }

    pub fn max_depth(&self) -> usize {
        self.levels.len()
    }

    /// The level currently being revealed; equals [`Tree::max_depth`] when done.
    pub fn reveal_depth(&self) -> usize {
        self.reveal_depth
    }

    pub fn is_revealed(&self) -> bool {
        self.reveal_depth == self.levels.len()
    }

    pub fn levels(&self) -> &[Vec<Branch>] {
        &self.levels
    }

    /// All branches, level by level.
    pub fn branches(&self) -> impl Iterator<Item = &Branch> {
        self.levels.iter().flatten()
    }

    pub fn branch_count(&self) -> usize {
        self.levels.iter().map(Vec::len).sum()
    }
}
