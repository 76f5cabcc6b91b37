//! The live set of planted trees and the surface they are drawn on.
//!
//! A [`Scene`] is driven by its owner through three entry points:
//! - [`Scene::plant`] when the user clicks or taps,
//! - [`Scene::on_resize`] when the surface changes size,
//! - [`Scene::tick`] once per display refresh.
//!
//! Every tree holds a [`FrameToken`] while it is still revealing. Clearing
//! the scene cancels those registrations before the trees are dropped, so
//! nothing keeps drawing on a cleared or resized surface.

use log::{debug, trace};
use rand::Rng;

use crate::{
    canvas::Canvas,
    clock::FrameClock,
    config::Config,
    error::ConfigError,
    tree::{RevealStatus, Tree},
    types::{Point, TreeId},
};

#[derive(Debug)]
pub struct Scene<C> {
    cfg: Config,
    surface: Option<C>,
    trees: Vec<Tree>,
    clock: FrameClock,
}

impl<C: Canvas> Scene<C> {
    /// Creates an empty scene with no surface yet.
    pub fn new(cfg: Config) -> Result<Self, ConfigError> {
        cfg.validate()?;
        Ok(Self {
            cfg,
            surface: None,
            trees: Vec::new(),
            clock: FrameClock::new(),
        })
    }

    /// Creates an empty scene drawing on `surface`.
    pub fn with_surface(cfg: Config, surface: C) -> Result<Self, ConfigError> {
        let mut scene = Self::new(cfg)?;
        scene.attach_surface(surface);
        Ok(scene)
    }

    /// Replaces the configuration used for trees planted from now on.
    pub fn set_config(&mut self, cfg: Config) -> Result<(), ConfigError> {
        cfg.validate()?;
        self.cfg = cfg;
        Ok(())
    }

    /// Makes a surface available, returning the previous one.
    ///
    /// Trees that were waiting for a surface resume revealing on the next tick.
    pub fn attach_surface(&mut self, surface: C) -> Option<C> {
        let (w, h) = surface.size();
        debug!("surface attached ({w}x{h})");
        self.surface.replace(surface)
    }

    /// Removes the surface; ticks do nothing until one is attached again.
    pub fn take_surface(&mut self) -> Option<C> {
        self.surface.take()
    }

    /// Plants a tree at the bottom edge of the surface, below `x`.
    ///
    /// ### Returns
    /// - `Some(id)` of the new tree.
    /// - `None` if there is no surface yet, since its height is unknown.
    pub fn plant(&mut self, x: f32, rng: &mut impl Rng) -> Option<TreeId> {
        let Some((_, height)) = self.surface.as_ref().map(C::size) else {
            debug!("plant at x={x} ignored: no surface");
            return None;
        };
        Some(self.plant_at(Point::new(x, height), rng))
    }

    /// Plants a tree rooted at `root` and registers it with the clock.
    ///
    /// Geometry is generated immediately whether or not a surface exists;
    /// drawing starts on the first tick that has one.
    pub fn plant_at(&mut self, root: Point, rng: &mut impl Rng) -> TreeId {
        let mut tree = Tree::new(root, &self.cfg, rng);
        tree.attach(self.clock.register());

        let id = self.trees.len();
        debug!(
            "planted tree {id} at {root:?} with {} branches",
            tree.branch_count()
        );
        self.trees.push(tree);
        id
    }

    /// Fires one frame.
    ///
    /// Each registered tree runs one reveal tick; trees that finish have
    /// their registration canceled. Without a surface no tree advances.
    pub fn tick(&mut self) {
        let frame = self.clock.advance();
        let Some(surface) = self.surface.as_mut() else {
            trace!("frame {frame} skipped: no surface");
            return;
        };

        for (id, tree) in self.trees.iter_mut().enumerate() {
            let Some(token) = tree.subscription() else {
                continue;
            };
            if !self.clock.is_live(token) {
                tree.detach();
                continue;
            }
            if tree.tick(surface) == RevealStatus::Revealed {
                debug!("tree {id} revealed at frame {frame}");
                tree.detach();
                self.clock.cancel(token);
            }
        }
    }

    /// Drops every tree and erases the surface.
    ///
    /// Clock registrations are canceled before the trees go away.
    pub fn clear(&mut self) {
        for tree in &mut self.trees {
            if let Some(token) = tree.detach() {
                self.clock.cancel(token);
            }
        }
        debug!("cleared {} trees", self.trees.len());
        self.trees.clear();

        if let Some(surface) = self.surface.as_mut() {
            let (w, h) = surface.size();
            surface.clear_rect(0.0, 0.0, w, h);
        }
    }

    /// Resizes the surface and starts over with an empty scene.
    ///
    /// No tree is replanted.
    pub fn on_resize(&mut self, width: f32, height: f32) {
        debug!("surface resized to {width}x{height}");
        if let Some(surface) = self.surface.as_mut() {
            surface.resize(width, height);
        }
        self.clear();
    }

    pub fn trees(&self) -> &[Tree] {
        &self.trees
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    /// Whether any tree still wants ticks.
    pub fn is_animating(&self) -> bool {
        self.clock.live_count() > 0
    }

    pub fn surface(&self) -> Option<&C> {
        self.surface.as_ref()
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }
}
