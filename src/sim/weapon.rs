//! Weapon specifications and firing patterns
//!
//! A [`WeaponSpec`] is an immutable value shared by every slot that
//! mounts the same kind of weapon; mutable per-slot state (cooldown,
//! aim angle) lives on the fortress. The firing behavior is a tagged
//! variant so each mode only carries the fields it actually uses.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// The five guns of the arsenal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponKind {
    Basic,
    Rapid,
    Heavy,
    Shotgun,
    Laser,
}

impl WeaponKind {
    /// Kinds that can appear as drops (everything but the starting gun)
    pub const DROPPABLE: [WeaponKind; 4] = [
        WeaponKind::Rapid,
        WeaponKind::Heavy,
        WeaponKind::Shotgun,
        WeaponKind::Laser,
    ];
}

/// How a weapon turns trigger pulls into projectiles
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum FireBehavior {
    /// One projectile per shot
    Single,
    /// `count` projectiles fanned across `angle_deg` degrees
    Spread { count: u32, angle_deg: f32 },
    /// A fixed-length ray with its own short lifetime
    Beam { length: f32 },
}

/// Immutable description of one weapon kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponSpec {
    pub name: String,
    pub damage: f32,
    /// Cooldown between shots, in ticks
    pub fire_rate: u32,
    pub bullet_speed: f32,
    pub bullet_size: f32,
    /// Random aim jitter applied to single-shot fire, in degrees
    pub jitter_deg: f32,
    /// Turret traverse rate, radians per tick
    pub rotation_speed: f32,
    /// Turret spins at `rotation_speed` regardless of targets
    pub auto_rotate: bool,
    /// 0xRRGGBB, consumed by the renderer
    pub color: u32,
    pub behavior: FireBehavior,
}

impl WeaponSpec {
    /// Muzzle angles for one trigger pull, centered on `aim`.
    ///
    /// Spread fire divides the cone into equal bins and jitters each
    /// projectile within its own bin, so every angle stays inside
    /// `aim ± angle_deg/2`. Single fire jitters within `jitter_deg`.
    /// Beams always fire straight down the slot angle.
    pub fn fire_angles<R: Rng>(&self, aim: f32, rng: &mut R) -> Vec<f32> {
        match self.behavior {
            FireBehavior::Beam { .. } => vec![aim],
            FireBehavior::Spread { count, angle_deg } => {
                let count = count.max(1);
                let span = angle_deg.to_radians();
                let bin = span / count as f32;
                (0..count)
                    .map(|i| aim - span / 2.0 + bin * i as f32 + rng.random::<f32>() * bin)
                    .collect()
            }
            FireBehavior::Single => {
                let jitter = (rng.random::<f32>() - 0.5) * self.jitter_deg.to_radians();
                vec![aim + jitter]
            }
        }
    }
}
