//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod camera;
pub mod collision;
pub mod state;
pub mod tick;
pub mod weapon;

pub use camera::Camera;
pub use state::{
    AddWeapon, Enemy, Fortress, GamePhase, Projectile, ProjectileKind, Tree, WeaponDrop,
    WeaponSelection, WeaponSlot, World,
};
pub use tick::{TickInput, tick};
pub use weapon::{FireBehavior, WeaponKind, WeaponSpec};
