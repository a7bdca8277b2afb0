//! Game state and core simulation types
//!
//! Everything the renderer reads and the tick mutates lives here. The
//! world owns its RNG: same seed, same session.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::camera::Camera;
use super::weapon::WeaponKind;
use crate::consts::BEAM_TICKS;
use crate::tuning::Tuning;
use crate::{angle_to_dir, consts::TURRET_SPACING};

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Normal play
    Playing,
    /// All slots full and a new weapon pending; combat is suspended
    /// while the player picks a slot to overwrite (or cancels)
    WeaponSelect,
    /// Fortress destroyed; only the restart input is honored
    GameOver,
}

/// One turret mount: an immutable weapon kind plus per-slot aim state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponSlot {
    pub kind: WeaponKind,
    /// Ticks until this slot may fire again
    pub cooldown: u32,
    /// Current barrel angle, radians
    pub angle: f32,
}

impl WeaponSlot {
    pub fn new(kind: WeaponKind) -> Self {
        Self {
            kind,
            cooldown: 0,
            angle: 0.0,
        }
    }
}

/// Outcome of offering a weapon to the fortress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddWeapon {
    /// Mounted into the given empty slot
    Installed(usize),
    /// Every slot is occupied; caller must open the selection flow
    SlotsFull,
}

/// The player-controlled fortress
#[derive(Debug, Clone, PartialEq)]
pub struct Fortress {
    pub pos: Vec2,
    pub size: Vec2,
    /// Movement, pixels per tick
    pub speed: f32,
    pub health: f32,
    pub max_health: f32,
    /// Target acquisition radius and kinetic falloff range
    pub shoot_range: f32,
    pub slots: Vec<Option<WeaponSlot>>,
}

impl Fortress {
    pub fn new(tuning: &Tuning, pos: Vec2) -> Self {
        let slot_count = tuning.fortress.max_slots.clamp(1, 5);
        let mut slots = vec![None; slot_count];
        slots[0] = Some(WeaponSlot::new(WeaponKind::Basic));
        Self {
            pos,
            size: tuning.fortress.size,
            speed: tuning.fortress.speed,
            health: tuning.fortress.max_health,
            max_health: tuning.fortress.max_health,
            shoot_range: tuning.fortress.shoot_range,
            slots,
        }
    }

    /// Mount offset of slot `index` relative to the fortress center.
    /// Fixed presets: top, left, right, then the two rear quarters.
    pub fn turret_offset(index: usize) -> Vec2 {
        let d = TURRET_SPACING;
        match index {
            0 => Vec2::new(0.0, -d),
            1 => Vec2::new(-d, 0.0),
            2 => Vec2::new(d, 0.0),
            3 => Vec2::new(-d / 2.0, d),
            4 => Vec2::new(d / 2.0, d),
            _ => Vec2::ZERO,
        }
    }

    /// World position of slot `index`'s muzzle pivot
    pub fn turret_pos(&self, index: usize) -> Vec2 {
        self.pos + Self::turret_offset(index)
    }

    /// Returns true when the hit was fatal
    pub fn take_damage(&mut self, damage: f32) -> bool {
        self.health -= damage;
        self.health <= 0.0
    }

    /// Mount `kind` into the first empty slot, if any
    pub fn add_weapon(&mut self, kind: WeaponKind) -> AddWeapon {
        match self.slots.iter().position(Option::is_none) {
            Some(index) => {
                self.slots[index] = Some(WeaponSlot::new(kind));
                AddWeapon::Installed(index)
            }
            None => AddWeapon::SlotsFull,
        }
    }

    /// Overwrite an occupied slot with `kind`; false if out of range
    pub fn replace_weapon(&mut self, index: usize, kind: WeaponKind) -> bool {
        if index < self.slots.len() {
            self.slots[index] = Some(WeaponSlot::new(kind));
            true
        } else {
            false
        }
    }
}

/// A wave attacker
#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    /// Pixels per tick
    pub speed: f32,
    pub health: f32,
    pub max_health: f32,
    /// Contact damage dealt on reaching the fortress
    pub damage: f32,
}

impl Enemy {
    /// Stats scale linearly with the current level
    pub fn new(id: u32, pos: Vec2, tuning: &Tuning, level: u32) -> Self {
        let mult = tuning.level_multiplier(level);
        let health = (tuning.enemy.base_health * mult).ceil();
        Self {
            id,
            pos,
            size: tuning.enemy.size,
            speed: tuning.enemy.base_speed * mult,
            health,
            max_health: health,
            damage: tuning.enemy.contact_damage,
        }
    }

    /// Returns true when the hit was fatal
    pub fn take_damage(&mut self, damage: f32) -> bool {
        self.health -= damage;
        self.health <= 0.0
    }
}

/// Kinetic bullets move; beams are a fixed ray with a short life
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectileKind {
    Kinetic {
        /// Pixels per tick
        vel: Vec2,
        /// Euclidean distance covered so far, drives damage falloff
        traveled: f32,
    },
    Beam {
        end: Vec2,
        ticks_left: u32,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub id: u32,
    /// Current position; for beams, the fixed ray origin
    pub pos: Vec2,
    pub base_damage: f32,
    pub size: f32,
    /// Maximum kinetic travel before expiry, also the falloff range
    pub range: f32,
    /// 0xRRGGBB, consumed by the renderer
    pub color: u32,
    pub kind: ProjectileKind,
}

impl Projectile {
    pub fn kinetic(
        id: u32,
        origin: Vec2,
        angle: f32,
        speed: f32,
        damage: f32,
        size: f32,
        range: f32,
        color: u32,
    ) -> Self {
        Self {
            id,
            pos: origin,
            base_damage: damage,
            size,
            range,
            color,
            kind: ProjectileKind::Kinetic {
                vel: angle_to_dir(angle) * speed,
                traveled: 0.0,
            },
        }
    }

    pub fn beam(
        id: u32,
        origin: Vec2,
        angle: f32,
        length: f32,
        damage: f32,
        size: f32,
        color: u32,
    ) -> Self {
        Self {
            id,
            pos: origin,
            base_damage: damage,
            size,
            range: length,
            color,
            kind: ProjectileKind::Beam {
                end: origin + angle_to_dir(angle) * length,
                ticks_left: BEAM_TICKS,
            },
        }
    }

    /// Damage if this projectile connected right now.
    ///
    /// Kinetic damage decays linearly with distance, floored at 20% of
    /// base. Beam damage never decays.
    pub fn current_damage(&self) -> f32 {
        match self.kind {
            ProjectileKind::Kinetic { traveled, .. } => {
                let falloff = (1.0 - traveled / self.range).max(0.2);
                self.base_damage * falloff
            }
            ProjectileKind::Beam { .. } => self.base_damage,
        }
    }

    /// Advance one tick. Returns false once expired: a kinetic round
    /// that left the world or outran its range, or a beam whose timer
    /// ran down.
    pub fn advance(&mut self, world: Vec2) -> bool {
        match &mut self.kind {
            ProjectileKind::Kinetic { vel, traveled } => {
                self.pos += *vel;
                *traveled += vel.length();
                *traveled <= self.range
                    && self.pos.x > 0.0
                    && self.pos.x < world.x
                    && self.pos.y > 0.0
                    && self.pos.y < world.y
            }
            ProjectileKind::Beam { ticks_left, .. } => {
                *ticks_left = ticks_left.saturating_sub(1);
                *ticks_left > 0
            }
        }
    }

    /// Hit test against an enemy for this tick
    pub fn hits(&self, enemy: &Enemy) -> bool {
        match self.kind {
            ProjectileKind::Kinetic { .. } => super::collision::aabb_overlap(
                self.pos,
                Vec2::splat(self.size),
                enemy.pos,
                enemy.size,
            ),
            ProjectileKind::Beam { end, .. } => super::collision::beam_hits(
                self.pos,
                end,
                enemy.pos,
                (self.size + enemy.size.x) / 2.0,
            ),
        }
    }
}

/// A collectible weapon left on the field
#[derive(Debug, Clone, PartialEq)]
pub struct WeaponDrop {
    pub id: u32,
    pub kind: WeaponKind,
    pub pos: Vec2,
    /// Remaining lifetime in ticks
    pub ticks_left: u32,
    /// Remaining life at which the expiry blink starts
    pub blink_ticks: u32,
}

impl WeaponDrop {
    pub fn new(id: u32, kind: WeaponKind, pos: Vec2, tuning: &Tuning) -> Self {
        Self {
            id,
            kind,
            pos,
            ticks_left: tuning.drops.life_ticks,
            blink_ticks: tuning.drops.blink_ticks,
        }
    }

    /// Count down one tick; false once expired
    pub fn advance(&mut self) -> bool {
        self.ticks_left = self.ticks_left.saturating_sub(1);
        self.ticks_left > 0
    }

    /// Renderer hint: during the expiry blink the drop flashes on and
    /// off in 15-tick intervals
    pub fn blink_hidden(&self) -> bool {
        self.ticks_left <= self.blink_ticks && (self.ticks_left / 15) % 2 == 0
    }
}

/// An immovable obstacle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tree {
    pub pos: Vec2,
    pub radius: f32,
}

/// Interaction state while the player chooses a slot to overwrite.
/// The triggering drop stays in the world, reserved, until the choice
/// resolves or is cancelled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponSelection {
    pub pending: WeaponKind,
    pub drop_id: u32,
}

/// Complete session state
#[derive(Debug, Clone, PartialEq)]
pub struct World {
    pub tuning: Tuning,
    /// Session seed, reused on reset
    pub seed: u64,
    pub rng: Pcg32,
    pub camera: Camera,
    pub fortress: Fortress,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub drops: Vec<WeaponDrop>,
    pub trees: Vec<Tree>,
    pub score: u64,
    pub kill_count: u32,
    /// Difficulty counter, starts at 1
    pub level: u32,
    pub phase: GamePhase,
    pub weapon_selection: Option<WeaponSelection>,
    pub time_ticks: u64,
    next_id: u32,
}

impl World {
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let center = tuning.world.size / 2.0;
        let trees = scatter_trees(&mut rng, &tuning, center);
        Self {
            camera: Camera::new(tuning.world.viewport, tuning.world.size),
            fortress: Fortress::new(&tuning, center),
            rng,
            trees,
            seed,
            tuning,
            enemies: Vec::new(),
            projectiles: Vec::new(),
            drops: Vec::new(),
            score: 0,
            kill_count: 0,
            level: 1,
            phase: GamePhase::Playing,
            weapon_selection: None,
            time_ticks: 0,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Full session reset: same seed, same tuning, initial everything
    pub fn reset(&mut self) {
        *self = World::new(self.seed, self.tuning.clone());
    }
}

/// Place tree obstacles, keeping a clearing around the fortress spawn
fn scatter_trees(rng: &mut Pcg32, tuning: &Tuning, center: Vec2) -> Vec<Tree> {
    let radius = tuning.trees.radius;
    let world = tuning.world.size;
    let mut trees = Vec::with_capacity(tuning.trees.count);
    for _ in 0..tuning.trees.count {
        for _attempt in 0..20 {
            let pos = Vec2::new(
                rng.random_range(radius..world.x - radius),
                rng.random_range(radius..world.y - radius),
            );
            if pos.distance(center) >= tuning.trees.clearing_radius {
                trees.push(Tree { pos, radius });
                break;
            }
        }
    }
    trees
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_kinetic_falloff_at_half_range() {
        // Basic gun: damage 20, range 300, target 150 away -> 10 on impact
        let mut p = Projectile::kinetic(
            1,
            Vec2::new(500.0, 500.0),
            0.0,
            5.0,
            20.0,
            4.0,
            300.0,
            0xFFFFFF,
        );
        let world = Vec2::new(3600.0, 2700.0);
        for _ in 0..30 {
            assert!(p.advance(world));
        }
        match p.kind {
            ProjectileKind::Kinetic { traveled, .. } => {
                assert!((traveled - 150.0).abs() < 1e-3)
            }
            _ => unreachable!(),
        }
        assert!((p.current_damage() - 10.0).abs() < 1e-3);
    }

    #[test]
    fn test_kinetic_expires_at_range() {
        let mut p = Projectile::kinetic(1, Vec2::new(500.0, 500.0), 0.0, 8.0, 20.0, 4.0, 400.0, 0);
        let world = Vec2::new(3600.0, 2700.0);
        let mut ticks = 0;
        while p.advance(world) {
            ticks += 1;
            assert!(ticks < 100, "projectile never expired");
        }
        // 8 px/tick over a 400 px range: dies on the 51st advance
        assert_eq!(ticks, 50);
    }

    #[test]
    fn test_kinetic_expires_outside_world() {
        let world = Vec2::new(3600.0, 2700.0);
        let mut p = Projectile::kinetic(
            1,
            Vec2::new(10.0, 100.0),
            std::f32::consts::PI,
            8.0,
            20.0,
            4.0,
            10_000.0,
            0,
        );
        assert!(p.advance(world));
        assert!(!p.advance(world));
    }

    #[test]
    fn test_beam_lifetime_and_flat_damage() {
        let mut p = Projectile::beam(1, Vec2::ZERO, 0.0, 400.0, 35.0, 8.0, 0x00CED1);
        let world = Vec2::new(3600.0, 2700.0);
        for _ in 0..9 {
            assert!(p.advance(world));
            assert!((p.current_damage() - 35.0).abs() < 1e-6);
        }
        assert!(!p.advance(world));
    }

    #[test]
    fn test_beam_hits_multiple_enemies_along_ray() {
        let tuning = Tuning::default();
        let p = Projectile::beam(1, Vec2::ZERO, 0.0, 400.0, 35.0, 8.0, 0);
        let near = Enemy::new(2, Vec2::new(100.0, 0.0), &tuning, 1);
        let far = Enemy::new(3, Vec2::new(350.0, 5.0), &tuning, 1);
        let aside = Enemy::new(4, Vec2::new(200.0, 90.0), &tuning, 1);
        assert!(p.hits(&near));
        assert!(p.hits(&far));
        assert!(!p.hits(&aside));
    }

    #[test]
    fn test_fortress_slot_management() {
        let tuning = Tuning::default();
        let mut fortress = Fortress::new(&tuning, Vec2::ZERO);
        assert_eq!(fortress.slots.len(), 3);
        assert_eq!(fortress.slots[0].map(|s| s.kind), Some(WeaponKind::Basic));

        assert_eq!(fortress.add_weapon(WeaponKind::Rapid), AddWeapon::Installed(1));
        assert_eq!(fortress.add_weapon(WeaponKind::Heavy), AddWeapon::Installed(2));
        assert_eq!(fortress.add_weapon(WeaponKind::Laser), AddWeapon::SlotsFull);

        assert!(fortress.replace_weapon(1, WeaponKind::Laser));
        assert_eq!(fortress.slots[1].map(|s| s.kind), Some(WeaponKind::Laser));
        assert!(!fortress.replace_weapon(9, WeaponKind::Laser));
    }

    #[test]
    fn test_enemy_level_scaling() {
        let tuning = Tuning::default();
        let e1 = Enemy::new(1, Vec2::ZERO, &tuning, 1);
        let e11 = Enemy::new(2, Vec2::ZERO, &tuning, 11);
        assert!((e1.speed - 2.0).abs() < 1e-6);
        assert!((e11.speed - 2.2).abs() < 1e-6);
        assert_eq!(e1.health, 20.0);
        assert_eq!(e11.health, 22.0);
    }

    #[test]
    fn test_drop_blink_phase() {
        let tuning = Tuning::default();
        let mut drop = WeaponDrop::new(1, WeaponKind::Shotgun, Vec2::ZERO, &tuning);
        assert!(!drop.blink_hidden());
        // Run down to the blink window
        while drop.ticks_left > drop.blink_ticks {
            assert!(drop.advance());
        }
        let mut seen_hidden = false;
        let mut seen_shown = false;
        while drop.advance() {
            if drop.blink_hidden() {
                seen_hidden = true;
            } else {
                seen_shown = true;
            }
        }
        assert!(seen_hidden && seen_shown);
    }

    #[test]
    fn test_trees_respect_clearing() {
        let tuning = Tuning::default();
        let world = World::new(42, tuning.clone());
        assert!(!world.trees.is_empty());
        let center = tuning.world.size / 2.0;
        for tree in &world.trees {
            assert!(tree.pos.distance(center) >= tuning.trees.clearing_radius);
        }
    }

    proptest! {
        #[test]
        fn prop_kinetic_damage_monotone_with_floor(
            steps in 1usize..200,
            speed in 1.0f32..12.0,
            damage in 1.0f32..50.0,
        ) {
            let range = 300.0;
            let mut p = Projectile::kinetic(
                1, Vec2::new(1800.0, 1350.0), 0.7, speed, damage, 4.0, range, 0,
            );
            let world = Vec2::new(3600.0, 2700.0);
            let mut last = p.current_damage();
            prop_assert!((last - damage).abs() < 1e-4);
            for _ in 0..steps {
                if !p.advance(world) {
                    break;
                }
                let now = p.current_damage();
                prop_assert!(now <= last + 1e-4);
                prop_assert!(now >= 0.2 * damage - 1e-4);
                last = now;
            }
        }
    }
}
