//! Data-driven game balance
//!
//! Every numeric knob of the simulation lives here so a balance pass is
//! a JSON edit, not a code change. `Tuning::default()` is the shipped
//! balance; `Tuning::from_json` accepts partial documents and fills the
//! rest from the defaults.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{VIEWPORT_HEIGHT, VIEWPORT_WIDTH, WORLD_SCALE};
use crate::sim::weapon::{FireBehavior, WeaponKind, WeaponSpec};

/// World and viewport geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldTuning {
    pub viewport: Vec2,
    pub size: Vec2,
}

impl Default for WorldTuning {
    fn default() -> Self {
        let viewport = Vec2::new(VIEWPORT_WIDTH, VIEWPORT_HEIGHT);
        Self {
            viewport,
            size: viewport * WORLD_SCALE,
        }
    }
}

/// Player fortress parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FortressTuning {
    /// Movement, pixels per tick
    pub speed: f32,
    pub max_health: f32,
    pub size: Vec2,
    /// Target acquisition radius; also the kinetic damage-falloff range
    pub shoot_range: f32,
    /// Weapon slot count, capped at the five hull mount points
    pub max_slots: usize,
}

impl Default for FortressTuning {
    fn default() -> Self {
        Self {
            speed: 5.0,
            max_health: 100.0,
            size: Vec2::new(50.0, 30.0),
            shoot_range: 300.0,
            max_slots: 3,
        }
    }
}

/// Enemy base stats, before level scaling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    pub base_speed: f32,
    pub base_health: f32,
    /// Per-tick spawn probability while below the population cap
    pub base_spawn_rate: f32,
    pub max_count: usize,
    pub min_spawn_distance: f32,
    pub contact_damage: f32,
    pub size: Vec2,
    pub kill_score: u64,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            base_speed: 2.0,
            base_health: 20.0,
            base_spawn_rate: 0.02,
            max_count: 10,
            min_spawn_distance: 400.0,
            contact_damage: 10.0,
            size: Vec2::new(30.0, 30.0),
            kill_score: 100,
        }
    }
}

/// Weapon drop lifecycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DropTuning {
    /// Chance a slain enemy leaves a weapon behind
    pub drop_chance: f32,
    pub collect_radius: f32,
    /// Total lifetime in ticks
    pub life_ticks: u32,
    /// Remaining life at which the expiry blink starts
    pub blink_ticks: u32,
    /// Per-tick chance for the level-gated spawner to place a drop
    pub periodic_rate: f32,
}

impl Default for DropTuning {
    fn default() -> Self {
        Self {
            drop_chance: 0.3,
            collect_radius: 40.0,
            life_ticks: 600,
            blink_ticks: 120,
            periodic_rate: 0.01,
        }
    }
}

/// Tree obstacles scattered at world creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeTuning {
    pub count: usize,
    pub radius: f32,
    /// No trees spawn within this distance of the world center
    pub clearing_radius: f32,
}

impl Default for TreeTuning {
    fn default() -> Self {
        Self {
            count: 24,
            radius: 18.0,
            clearing_radius: 250.0,
        }
    }
}

/// The immutable spec for each weapon kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Arsenal {
    pub basic: WeaponSpec,
    pub rapid: WeaponSpec,
    pub heavy: WeaponSpec,
    pub shotgun: WeaponSpec,
    pub laser: WeaponSpec,
}

impl Arsenal {
    pub fn spec(&self, kind: WeaponKind) -> &WeaponSpec {
        match kind {
            WeaponKind::Basic => &self.basic,
            WeaponKind::Rapid => &self.rapid,
            WeaponKind::Heavy => &self.heavy,
            WeaponKind::Shotgun => &self.shotgun,
            WeaponKind::Laser => &self.laser,
        }
    }
}

impl Default for Arsenal {
    fn default() -> Self {
        Self {
            basic: WeaponSpec {
                name: "Basic Gun".into(),
                damage: 20.0,
                fire_rate: 15,
                bullet_speed: 8.0,
                bullet_size: 4.0,
                jitter_deg: 0.0,
                rotation_speed: 0.1,
                auto_rotate: false,
                color: 0xFFFFFF,
                behavior: FireBehavior::Single,
            },
            rapid: WeaponSpec {
                name: "Rapid Gun".into(),
                damage: 15.0,
                fire_rate: 4,
                bullet_speed: 10.0,
                bullet_size: 3.0,
                jitter_deg: 5.0,
                rotation_speed: 0.3,
                auto_rotate: false,
                color: 0xFFD700,
                behavior: FireBehavior::Single,
            },
            heavy: WeaponSpec {
                name: "Heavy Gun".into(),
                damage: 40.0,
                fire_rate: 25,
                bullet_speed: 6.0,
                bullet_size: 6.0,
                jitter_deg: 0.0,
                rotation_speed: 0.05,
                auto_rotate: false,
                color: 0xFF4444,
                behavior: FireBehavior::Single,
            },
            shotgun: WeaponSpec {
                name: "Shotgun".into(),
                damage: 10.0,
                fire_rate: 30,
                bullet_speed: 7.0,
                bullet_size: 3.0,
                jitter_deg: 0.0,
                rotation_speed: 0.08,
                auto_rotate: false,
                color: 0x87CEEB,
                behavior: FireBehavior::Spread {
                    count: 5,
                    angle_deg: 20.0,
                },
            },
            laser: WeaponSpec {
                name: "Laser Turret".into(),
                damage: 35.0,
                fire_rate: 1,
                bullet_speed: 15.0,
                bullet_size: 8.0,
                jitter_deg: 0.0,
                rotation_speed: 0.01,
                auto_rotate: true,
                color: 0x00CED1,
                behavior: FireBehavior::Beam { length: 400.0 },
            },
        }
    }
}

/// Complete balance sheet for one session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub world: WorldTuning,
    pub fortress: FortressTuning,
    pub enemy: EnemyTuning,
    pub drops: DropTuning,
    pub trees: TreeTuning,
    pub arsenal: Arsenal,
}

impl Tuning {
    /// Parse a (possibly partial) tuning document
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Enemy population cap at `level` (+20% per level, rounded up)
    pub fn enemy_cap(&self, level: u32) -> usize {
        let scale = 1.0 + (level.saturating_sub(1)) as f32 * 0.2;
        (self.enemy.max_count as f32 * scale).ceil() as usize
    }

    /// Per-tick spawn probability at `level` (+10% per level)
    pub fn spawn_rate(&self, level: u32) -> f32 {
        self.enemy.base_spawn_rate * (1.0 + (level.saturating_sub(1)) as f32 * 0.1)
    }

    /// Linear enemy stat multiplier at `level` (+1% per level)
    pub fn level_multiplier(&self, level: u32) -> f32 {
        1.0 + (level.saturating_sub(1)) as f32 * 0.01
    }
}
