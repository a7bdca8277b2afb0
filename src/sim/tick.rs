//! Fixed timestep simulation tick
//!
//! One call advances the whole session by one step, in a fixed order:
//! input/aim intents, projectile flight, combat resolution, enemy
//! pursuit, drop lifecycle, game-over evaluation, spawn gate. All
//! removal during iteration goes through `retain`-style passes so a
//! removal never skips the element behind it.

use std::f32::consts::PI;

use glam::Vec2;
use rand::Rng;

use super::collision::{aabb_circle_overlap, aabb_overlap};
use super::state::{
    AddWeapon, Enemy, GamePhase, Projectile, ProjectileKind, Tree, WeaponDrop, WeaponSelection,
    World,
};
use super::weapon::{FireBehavior, WeaponKind};
use crate::{angle_to_dir, bearing, normalize_angle};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Tracked but unused; turrets fire automatically
    pub fire: bool,
    /// Restart the session; only honored in GameOver
    pub restart: bool,
    /// Zero-based slot choice; only honored in WeaponSelect
    pub select_slot: Option<usize>,
    /// Abandon the pending weapon; only honored in WeaponSelect
    pub cancel: bool,
}

/// Advance the world by one fixed timestep
pub fn tick(world: &mut World, input: &TickInput) {
    validate_interaction(world);

    match world.phase {
        GamePhase::GameOver => {
            if input.restart {
                log::info!("restarting session (seed {})", world.seed);
                world.reset();
            }
        }
        GamePhase::WeaponSelect => {
            // Movement, spawning and combat are suspended until the
            // player resolves the slot choice
            handle_weapon_select(world, input);
        }
        GamePhase::Playing => {
            world.time_ticks += 1;
            world.camera.follow(world.fortress.pos);
            move_fortress(world, input);
            update_weapons(world);
            resolve_projectiles(world);
            advance_enemies(world);
            advance_drops(world);
            if world.fortress.health <= 0.0 {
                log::info!(
                    "game over: score {} after {} kills at level {}",
                    world.score,
                    world.kill_count,
                    world.level
                );
                world.weapon_selection = None;
                world.phase = GamePhase::GameOver;
                return;
            }
            maybe_spawn_enemy(world);
            maybe_spawn_periodic_drop(world);
        }
    }
}

/// Normalize impossible interaction states instead of crashing on them.
/// Anything fixed here is a bug elsewhere, so it logs at warn.
fn validate_interaction(world: &mut World) {
    if world.phase == GamePhase::WeaponSelect {
        match world.weapon_selection {
            None => {
                log::warn!("weapon selection active with no pending weapon, resetting");
                world.phase = GamePhase::Playing;
            }
            Some(sel) if !world.drops.iter().any(|d| d.id == sel.drop_id) => {
                log::warn!("weapon selection active but its drop is gone, resetting");
                world.weapon_selection = None;
                world.phase = GamePhase::Playing;
            }
            Some(_) => {}
        }
    } else if world.weapon_selection.is_some() {
        log::warn!("dangling weapon selection outside WeaponSelect, clearing");
        world.weapon_selection = None;
    }
}

fn handle_weapon_select(world: &mut World, input: &TickInput) {
    let Some(sel) = world.weapon_selection else {
        return;
    };

    if input.cancel {
        world.drops.retain(|d| d.id != sel.drop_id);
        world.weapon_selection = None;
        world.phase = GamePhase::Playing;
        return;
    }

    if let Some(slot) = input.select_slot {
        if world.fortress.replace_weapon(slot, sel.pending) {
            log::info!("slot {slot} replaced with {:?}", sel.pending);
            world.drops.retain(|d| d.id != sel.drop_id);
            world.weapon_selection = None;
            world.phase = GamePhase::Playing;
        }
    }
}

/// Axis-aligned movement, clamped to the world and rejected outright on
/// tree overlap: the fortress stays put for the tick, no sliding.
fn move_fortress(world: &mut World, input: &TickInput) {
    let fortress = &mut world.fortress;
    let mut delta = Vec2::ZERO;
    if input.left {
        delta.x -= fortress.speed;
    }
    if input.right {
        delta.x += fortress.speed;
    }
    if input.up {
        delta.y -= fortress.speed;
    }
    if input.down {
        delta.y += fortress.speed;
    }
    if delta == Vec2::ZERO {
        return;
    }

    let half = fortress.size / 2.0;
    let candidate = (fortress.pos + delta).clamp(half, world.tuning.world.size - half);
    if !blocked_by_tree(&world.trees, candidate, fortress.size) {
        fortress.pos = candidate;
    }
}

fn blocked_by_tree(trees: &[Tree], pos: Vec2, size: Vec2) -> bool {
    trees
        .iter()
        .any(|t| aabb_circle_overlap(pos, size, t.pos, t.radius))
}

/// Nearest enemy center, if any lies within shoot range. Linear scan;
/// ties go to the earliest-spawned enemy.
fn nearest_enemy_in_range(world: &World) -> Option<Vec2> {
    let origin = world.fortress.pos;
    let mut best: Option<(f32, Vec2)> = None;
    for enemy in &world.enemies {
        let dist = enemy.pos.distance(origin);
        if best.is_none_or(|(d, _)| dist < d) {
            best = Some((dist, enemy.pos));
        }
    }
    best.filter(|(d, _)| *d <= world.fortress.shoot_range)
        .map(|(_, pos)| pos)
}

/// Per-slot cooldown, traverse and trigger logic. Newly fired
/// projectiles are appended to the world at the end of the pass.
fn update_weapons(world: &mut World) {
    let target = nearest_enemy_in_range(world);

    for index in 0..world.fortress.slots.len() {
        let Some(mut slot) = world.fortress.slots[index] else {
            continue;
        };
        slot.cooldown = slot.cooldown.saturating_sub(1);

        let spec = world.tuning.arsenal.spec(slot.kind);
        let (auto_rotate, rotation_speed, fire_rate) =
            (spec.auto_rotate, spec.rotation_speed, spec.fire_rate);
        let muzzle = world.fortress.turret_pos(index);

        if auto_rotate {
            slot.angle = normalize_angle(slot.angle + rotation_speed);
        } else if let Some(target) = target {
            let diff = normalize_angle(bearing(muzzle, target) - slot.angle);
            let step = diff.abs().min(rotation_speed);
            slot.angle = normalize_angle(slot.angle + step.copysign(diff));
        }

        if slot.cooldown == 0 && (auto_rotate || target.is_some()) {
            fire_slot(world, index, slot, muzzle);
            slot.cooldown = fire_rate;
        }

        world.fortress.slots[index] = Some(slot);
    }
}

fn fire_slot(world: &mut World, index: usize, slot: super::state::WeaponSlot, muzzle: Vec2) {
    let angles = world
        .tuning
        .arsenal
        .spec(slot.kind)
        .fire_angles(slot.angle, &mut world.rng);

    let spec = world.tuning.arsenal.spec(slot.kind);
    let (damage, speed, size, color, behavior) = (
        spec.damage,
        spec.bullet_speed,
        spec.bullet_size,
        spec.color,
        spec.behavior,
    );
    let range = world.fortress.shoot_range;

    for angle in angles {
        let id = world.next_entity_id();
        let projectile = match behavior {
            FireBehavior::Beam { length } => {
                Projectile::beam(id, muzzle, angle, length, damage, size, color)
            }
            _ => Projectile::kinetic(id, muzzle, angle, speed, damage, size, range, color),
        };
        world.projectiles.push(projectile);
    }
    log::trace!("slot {index} fired {:?}", slot.kind);
}

/// Advance projectiles, drop the expired, resolve hits, then bank the
/// kills.
fn resolve_projectiles(world: &mut World) {
    let world_size = world.tuning.world.size;
    world.projectiles.retain_mut(|p| p.advance(world_size));

    // A kinetic round is consumed by its first hit in spawn order; a
    // beam damages everything along the ray every tick it lives.
    let mut consumed: Vec<u32> = Vec::new();
    for projectile in &world.projectiles {
        match projectile.kind {
            ProjectileKind::Kinetic { .. } => {
                if let Some(enemy) = world.enemies.iter_mut().find(|e| projectile.hits(e)) {
                    enemy.take_damage(projectile.current_damage());
                    consumed.push(projectile.id);
                }
            }
            ProjectileKind::Beam { .. } => {
                for enemy in world.enemies.iter_mut() {
                    if projectile.hits(enemy) {
                        enemy.take_damage(projectile.current_damage());
                    }
                }
            }
        }
    }
    world.projectiles.retain(|p| !consumed.contains(&p.id));

    let mut slain: Vec<Vec2> = Vec::new();
    world.enemies.retain(|e| {
        if e.health <= 0.0 {
            slain.push(e.pos);
            false
        } else {
            true
        }
    });
    for pos in slain {
        register_kill(world, pos);
    }
}

/// Score, kill counter, level-ups and death drops for one slain enemy.
/// Levels rise exactly once per tenth kill regardless of overkill.
fn register_kill(world: &mut World, pos: Vec2) {
    world.score += world.tuning.enemy.kill_score;
    world.kill_count += 1;
    if world.kill_count % 10 == 0 {
        world.level += 1;
        log::info!("level up: {} ({} kills)", world.level, world.kill_count);
    }
    if world.rng.random::<f32>() < world.tuning.drops.drop_chance {
        let kind = random_droppable(&mut world.rng);
        let id = world.next_entity_id();
        let drop = WeaponDrop::new(id, kind, pos, &world.tuning);
        log::debug!("{:?} dropped at {pos}", kind);
        world.drops.push(drop);
    }
}

fn random_droppable<R: Rng>(rng: &mut R) -> WeaponKind {
    WeaponKind::DROPPABLE[rng.random_range(0..WeaponKind::DROPPABLE.len())]
}

/// Enemies pursue the fortress in a straight line. A step into a tree
/// deflects to a random bearing instead; if that is blocked too, the
/// enemy waits the tick out. Contact deals damage once and consumes the
/// enemy.
fn advance_enemies(world: &mut World) {
    let fortress_pos = world.fortress.pos;
    let fortress_size = world.fortress.size;
    let mut contact_damage = 0.0;

    let trees = &world.trees;
    let rng = &mut world.rng;
    world.enemies.retain_mut(|enemy| {
        let dir = (fortress_pos - enemy.pos).normalize_or_zero();
        let mut next = enemy.pos + dir * enemy.speed;
        if blocked_by_tree(trees, next, enemy.size) {
            let deflected = enemy.pos + angle_to_dir(rng.random_range(-PI..PI)) * enemy.speed;
            next = if blocked_by_tree(trees, deflected, enemy.size) {
                enemy.pos
            } else {
                deflected
            };
        }
        enemy.pos = next;

        if aabb_overlap(enemy.pos, enemy.size, fortress_pos, fortress_size) {
            contact_damage += enemy.damage;
            return false;
        }
        true
    });

    if contact_damage > 0.0 {
        world.fortress.take_damage(contact_damage);
    }
}

/// Drop lifecycle: collection first, then the lifetime countdown. A
/// drop reserved by a pending weapon selection neither ages nor
/// re-collides until the choice resolves.
fn advance_drops(world: &mut World) {
    let mut index = 0;
    while index < world.drops.len() {
        let drop = &world.drops[index];
        if world.weapon_selection.map(|s| s.drop_id) == Some(drop.id) {
            index += 1;
            continue;
        }

        let collectable = world.weapon_selection.is_none()
            && aabb_circle_overlap(
                world.fortress.pos,
                world.fortress.size,
                drop.pos,
                world.tuning.drops.collect_radius,
            );
        if collectable {
            let (kind, id) = (drop.kind, drop.id);
            match world.fortress.add_weapon(kind) {
                AddWeapon::Installed(slot) => {
                    log::info!("{:?} mounted in slot {slot}", kind);
                    world.drops.remove(index);
                    continue;
                }
                AddWeapon::SlotsFull => {
                    world.weapon_selection = Some(WeaponSelection {
                        pending: kind,
                        drop_id: id,
                    });
                    world.phase = GamePhase::WeaponSelect;
                    log::info!("slots full, {:?} pending replacement choice", kind);
                    index += 1;
                    continue;
                }
            }
        }

        if !world.drops[index].advance() {
            log::debug!("drop expired");
            world.drops.remove(index);
            continue;
        }
        index += 1;
    }
}

/// Probabilistic spawn gate under a level-scaled population cap
fn maybe_spawn_enemy(world: &mut World) {
    let cap = world.tuning.enemy_cap(world.level);
    if world.enemies.len() < cap
        && world.rng.random::<f32>() < world.tuning.spawn_rate(world.level)
    {
        spawn_enemy(world);
    }
}

/// Spawn one enemy on the viewport boundary, at least the minimum
/// distance from the fortress. Reject-and-retry up to 100 attempts,
/// then force a point at exactly the minimum distance on a random
/// bearing.
fn spawn_enemy(world: &mut World) {
    let id = world.next_entity_id();
    let camera = world.camera;
    let fortress_pos = world.fortress.pos;
    let size = world.tuning.enemy.size;
    let min_dist = world.tuning.enemy.min_spawn_distance;

    let rng = &mut world.rng;
    let mut chosen = None;
    for _attempt in 0..100 {
        let candidate = match rng.random_range(0..4u8) {
            0 => Vec2::new(
                camera.pos.x + rng.random::<f32>() * camera.viewport.x,
                camera.pos.y - size.y,
            ),
            1 => Vec2::new(
                camera.pos.x + camera.viewport.x + size.x,
                camera.pos.y + rng.random::<f32>() * camera.viewport.y,
            ),
            2 => Vec2::new(
                camera.pos.x + rng.random::<f32>() * camera.viewport.x,
                camera.pos.y + camera.viewport.y + size.y,
            ),
            _ => Vec2::new(
                camera.pos.x - size.x,
                camera.pos.y + rng.random::<f32>() * camera.viewport.y,
            ),
        };
        if candidate.distance(fortress_pos) >= min_dist {
            chosen = Some(candidate);
            break;
        }
    }
    let pos =
        chosen.unwrap_or_else(|| fortress_pos + angle_to_dir(rng.random_range(-PI..PI)) * min_dist);

    let enemy = Enemy::new(id, pos, &world.tuning, world.level);
    log::debug!(
        "enemy {id} spawned at {pos} ({:.0} from fortress)",
        pos.distance(world.fortress.pos)
    );
    world.enemies.push(enemy);
}

/// From level 2 on, even levels trickle in a free weapon drop near the
/// fortress whenever the field is empty of drops.
fn maybe_spawn_periodic_drop(world: &mut World) {
    if world.level < 2 || world.level % 2 != 0 || !world.drops.is_empty() {
        return;
    }
    if world.rng.random::<f32>() >= world.tuning.drops.periodic_rate {
        return;
    }
    let kind = random_droppable(&mut world.rng);
    let offset = angle_to_dir(world.rng.random_range(-PI..PI))
        * world.rng.random_range(100.0..300.0);
    let pos = world.fortress.pos + offset;
    let id = world.next_entity_id();
    let drop = WeaponDrop::new(id, kind, pos, &world.tuning);
    log::debug!("periodic {:?} drop at {pos}", kind);
    world.drops.push(drop);
}
