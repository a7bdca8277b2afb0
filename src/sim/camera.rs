//! Viewport camera with smoothed follow
//!
//! The camera is simulation state, not rendering: enemy spawn points are
//! chosen on the visible boundary, so the sim must know where the
//! viewport is. Position is the top-left corner in world coordinates
//! and always stays inside `[0, world - viewport]`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::CAMERA_SMOOTHING;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Top-left corner, world coordinates
    pub pos: Vec2,
    pub viewport: Vec2,
    pub world: Vec2,
}

impl Camera {
    pub fn new(viewport: Vec2, world: Vec2) -> Self {
        let mut cam = Self {
            pos: Vec2::ZERO,
            viewport,
            world,
        };
        // Start centered on the world center, where the fortress spawns
        cam.snap_to(world / 2.0);
        cam
    }

    /// Move 10% of the way toward centering `target`, clamped to bounds
    pub fn follow(&mut self, target: Vec2) {
        let desired = target - self.viewport / 2.0;
        self.pos += (desired - self.pos) * CAMERA_SMOOTHING;
        self.clamp();
    }

    /// Jump directly to centering `target` (reset/spawn)
    pub fn snap_to(&mut self, target: Vec2) {
        self.pos = target - self.viewport / 2.0;
        self.clamp();
    }

    fn clamp(&mut self) {
        self.pos = self.pos.clamp(Vec2::ZERO, self.world - self.viewport);
    }

    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        world - self.pos
    }

    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        screen + self.pos
    }
}
