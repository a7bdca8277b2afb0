//! Fortwave - a top-down fortress wave-survival arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, combat, game state)
//! - `tuning`: Data-driven game balance
//!
//! Rendering, asset loading and input wiring are external collaborators:
//! they read the simulation state and feed a [`sim::TickInput`] each
//! frame, nothing more.

pub mod sim;
pub mod tuning;

pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per render frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Viewport dimensions (pixels)
    pub const VIEWPORT_WIDTH: f32 = 1200.0;
    pub const VIEWPORT_HEIGHT: f32 = 900.0;
    /// World is a 3x3 grid of viewports
    pub const WORLD_SCALE: f32 = 3.0;

    /// Camera follow smoothing (fraction of remaining delta per tick)
    pub const CAMERA_SMOOTHING: f32 = 0.1;

    /// Beam projectile lifetime in ticks
    pub const BEAM_TICKS: u32 = 10;

    /// Spacing between turret mount points on the fortress hull
    pub const TURRET_SPACING: f32 = 20.0;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Unit vector pointing along `angle` (radians)
#[inline]
pub fn angle_to_dir(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Angle of the vector `to - from`
#[inline]
pub fn bearing(from: Vec2, to: Vec2) -> f32 {
    (to.y - from.y).atan2(to.x - from.x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_normalize_angle_wraps() {
        assert!((normalize_angle(3.0 * PI) - (-PI)).abs() < 1e-5);
        assert!((normalize_angle(-3.0 * PI) - (-PI)).abs() < 1e-5);
        assert!((normalize_angle(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_bearing_cardinal() {
        let origin = Vec2::ZERO;
        assert!((bearing(origin, Vec2::new(10.0, 0.0)) - 0.0).abs() < 1e-6);
        assert!((bearing(origin, Vec2::new(0.0, 10.0)) - PI / 2.0).abs() < 1e-6);
        assert!((bearing(origin, Vec2::new(-10.0, 0.0)).abs() - PI).abs() < 1e-5);
    }
}
