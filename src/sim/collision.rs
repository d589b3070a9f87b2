//! Collision resolution
//!
//! Runs on the AI tick. Combat uses full AABB overlap, pickups use the
//! looser "item center inside the character" test. Every overlapping pair
//! produces at most one effect per call.

use super::body::{Rect, aabb_overlap, center_inside};
use super::collectible::Collectible;
use super::enemy::{Combatant, Enemy, HitEffect};
use super::world::{GameEvent, Outcome, World};
use crate::audio::SoundEffect;
use crate::consts::*;

/// Resolve every collision pairing once
pub fn resolve_collisions(world: &mut World) {
    character_vs_enemies(world);
    projectiles_vs_enemies(world);
    pickups(world);
}

fn character_vs_enemies(world: &mut World) {
    let now = world.time_ticks;
    let World {
        character,
        level,
        hud,
        hits_taken,
        events,
        ..
    } = world;

    for enemy in level.enemies.iter().filter(|e| !e.is_dead()) {
        if !aabb_overlap(&character.body.bounds(), &enemy.body().bounds()) {
            continue;
        }
        if character.hit(now, level.end_x) {
            *hits_taken += 1;
            hud.health = character.energy();
            events.push(GameEvent::Sound(SoundEffect::Hurt));
            log::debug!(
                "Character hit by enemy {} (energy {})",
                enemy.id(),
                character.energy()
            );
        }
    }
}

/// Flying bottles against live enemies. Also runs on every gravity step so
/// a falling bottle can't slip through an enemy between collision ticks.
pub(crate) fn projectiles_vs_enemies(world: &mut World) {
    let World {
        projectiles,
        level,
        events,
        ..
    } = world;

    for projectile in projectiles.iter_mut().filter(|p| p.is_flying() && !p.has_hit()) {
        let bounds = projectile.body.bounds();
        let Some(enemy) = level
            .enemies
            .iter_mut()
            .find(|e| !e.is_dead() && aabb_overlap(&bounds, &e.body().bounds()))
        else {
            continue;
        };
        if !projectile.mark_hit() {
            continue;
        }
        events.push(GameEvent::Sound(SoundEffect::Splash));

        let effect = enemy.take_hit();
        let sound = match (&*enemy, effect) {
            (_, HitEffect::Ignored) => None,
            (Enemy::Boss(_), HitEffect::Hurt) => Some(SoundEffect::BossHurt),
            (Enemy::Boss(_), HitEffect::Killed) => Some(SoundEffect::BossDeath),
            (Enemy::Patrol(_), _) => Some(SoundEffect::ChickenDeath),
        };
        if let Some(sound) = sound {
            events.push(GameEvent::Sound(sound));
        }
        log::debug!("Bottle {} hit enemy {}: {:?}", projectile.id, enemy.id(), effect);
    }
}

/// Remove every item whose center sits inside `holder`, calling `take` for
/// each. `take` may refuse an item by returning false; it then stays.
fn collect(
    items: &mut Vec<Collectible>,
    holder: &Rect,
    mut take: impl FnMut(&Collectible) -> bool,
) {
    items.retain(|item| !(center_inside(holder, &item.body.bounds()) && take(item)));
}

fn pickups(world: &mut World) {
    let World {
        character,
        level,
        hud,
        events,
        ..
    } = world;
    let holder = character.body.bounds();

    collect(&mut level.coins, &holder, |coin| {
        hud.coins += 1;
        events.push(GameEvent::Sound(SoundEffect::CoinPickup));
        log::debug!("Coin {} collected ({} total)", coin.id, hud.coins);
        true
    });

    collect(&mut level.bottles, &holder, |bottle| {
        if hud.bottles >= BAR_MAX {
            return false;
        }
        hud.bottles = hud.bottles.saturating_add(BOTTLE_STEP).min(BAR_MAX);
        events.push(GameEvent::Sound(SoundEffect::BottlePickup));
        log::debug!("Bottle {} picked up (bar {}%)", bottle.id, hud.bottles);
        true
    });

    collect(&mut level.hearts, &holder, |heart| {
        character.heal(HEART_ENERGY);
        hud.health = character.energy();
        events.push(GameEvent::Sound(SoundEffect::HeartPickup));
        log::debug!("Heart {} picked up (energy {})", heart.id, hud.health);
        true
    });
}

/// Arm the end screen when the character is dead or the boss is down
pub fn check_end_conditions(world: &mut World) {
    if world.end.is_some() {
        return;
    }
    if world.character.is_dead() {
        world.schedule_end(Outcome::GameOver);
    } else if world.level.boss_defeated() {
        world.schedule_end(Outcome::Won);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collectible::CollectibleKind;
    use crate::sim::enemy::{PatrolEnemy, PatrolKind};
    use crate::sim::level::{CoinPattern, LevelParams};
    use crate::sim::body::Facing;
    use crate::sim::projectile::Projectile;
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    /// Empty level with the boss far away
    fn world() -> World {
        let params = LevelParams {
            number: 1,
            start_x: 2000.0,
            end_x: 5000.0,
            chickens: 0,
            small_chickens: 0,
            bottles: 0,
            coins: 0,
            coin_pattern: CoinPattern::Arc,
            wobble_coins: false,
            hearts: 0,
            clouds: 0,
            boss_x: 4500.0,
        };
        World::with_params(&params, 7).unwrap()
    }

    /// A collectible centered on the character's hitbox
    fn item_on_character(world: &mut World, kind: CollectibleKind) -> Collectible {
        let center = world.character.body.bounds().center();
        let id = world.next_id();
        Collectible::new(id, kind, center - kind.size() * 0.5)
    }

    fn chicken_at(world: &mut World, x: f32) -> Enemy {
        let id = world.next_id();
        let mut rng = Pcg32::seed_from_u64(1);
        Enemy::Patrol(PatrolEnemy::new(id, PatrolKind::Chicken, x, &mut rng))
    }

    fn sounds(world: &mut World) -> Vec<SoundEffect> {
        world
            .drain_events()
            .into_iter()
            .filter_map(|e| match e {
                GameEvent::Sound(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_coin_counted_once_while_overlapping() {
        let mut w = world();
        let coin = item_on_character(&mut w, CollectibleKind::Coin);
        w.level.coins.push(coin);
        for _ in 0..5 {
            resolve_collisions(&mut w);
        }
        assert_eq!(w.hud.coins, 1);
        assert!(w.level.coins.is_empty());
        assert_eq!(sounds(&mut w), vec![SoundEffect::CoinPickup]);
    }

    #[test]
    fn test_pickup_uses_center_rule() {
        let mut w = world();
        // Overlaps the hitbox edge but its center is outside
        let b = w.character.body.bounds();
        let id = w.next_id();
        let coin = Collectible::new(id, CollectibleKind::Coin, Vec2::new(b.max.x - 20.0, b.min.y + 20.0));
        w.level.coins.push(coin);
        resolve_collisions(&mut w);
        assert_eq!(w.hud.coins, 0);
        assert_eq!(w.level.coins.len(), 1);
    }

    #[test]
    fn test_bottle_refused_when_bar_full() {
        let mut w = world();
        w.hud.bottles = BAR_MAX;
        let bottle = item_on_character(&mut w, CollectibleKind::Bottle);
        w.level.bottles.push(bottle);
        resolve_collisions(&mut w);
        assert_eq!(w.level.bottles.len(), 1, "stays in the level");

        w.hud.bottles = BAR_MAX - BOTTLE_STEP;
        resolve_collisions(&mut w);
        assert!(w.level.bottles.is_empty());
        assert_eq!(w.hud.bottles, BAR_MAX);
    }

    #[test]
    fn test_heart_never_exceeds_max_energy() {
        let mut w = world();
        w.character.set_energy(90);
        let heart = item_on_character(&mut w, CollectibleKind::Heart);
        w.level.hearts.push(heart);
        resolve_collisions(&mut w);
        assert_eq!(w.character.energy(), MAX_ENERGY);
        assert_eq!(w.hud.health, MAX_ENERGY);
    }

    #[test]
    fn test_enemy_contact_hurts_once_per_immunity_window() {
        let mut w = world();
        let x = w.character.body.pos.x + 10.0;
        let chicken = chicken_at(&mut w, x);
        w.level.enemies.insert(0, chicken);
        resolve_collisions(&mut w);
        // Knockback moves the character away; put it back on top
        w.character.body.pos.x += KNOCKBACK_DISTANCE;
        w.time_ticks += 1;
        resolve_collisions(&mut w);
        assert_eq!(w.hits_taken, 1);
        assert_eq!(w.hud.health, MAX_ENERGY - HIT_DAMAGE);
    }

    #[test]
    fn test_dead_enemies_do_not_hurt() {
        let mut w = world();
        let x = w.character.body.pos.x + 10.0;
        let mut chicken = chicken_at(&mut w, x);
        if let Enemy::Patrol(p) = &mut chicken {
            assert!(p.die());
        }
        w.level.enemies.insert(0, chicken);
        // A dead boss lying on top of the character is harmless too
        for _ in 0..5 {
            w.level.boss_mut().unwrap().hit();
        }
        w.level.boss_mut().unwrap().body.pos.x = x;

        resolve_collisions(&mut w);
        assert_eq!(w.character.energy(), MAX_ENERGY);
        assert_eq!(w.hud.health, MAX_ENERGY);
        assert_eq!(w.hits_taken, 0);
        assert!(!sounds(&mut w).contains(&SoundEffect::Hurt));
    }

    #[test]
    fn test_projectile_damages_once() {
        let mut w = world();
        let chicken = chicken_at(&mut w, 1000.0);
        let second = chicken_at(&mut w, 1000.0);
        w.level.enemies.insert(0, chicken);
        w.level.enemies.insert(1, second);
        let target = w.level.enemies[0].body().bounds().center();
        let id = w.next_id();
        w.projectiles.push(Projectile::throw(id, target - Vec2::splat(30.0), Facing::Right));

        resolve_collisions(&mut w);
        resolve_collisions(&mut w);
        let dead = w.level.enemies.iter().filter(|e| e.is_dead()).count();
        assert_eq!(dead, 1, "one bottle, one kill");
        assert!(w.projectiles[0].has_hit());
        assert_eq!(sounds(&mut w), vec![SoundEffect::Splash, SoundEffect::ChickenDeath]);
    }

    #[test]
    fn test_boss_hit_by_bottle() {
        let mut w = world();
        let target = w.level.boss().unwrap().body.bounds().center();
        let id = w.next_id();
        w.projectiles.push(Projectile::throw(id, target - Vec2::splat(30.0), Facing::Left));
        resolve_collisions(&mut w);
        assert_eq!(w.level.boss().unwrap().hit_count(), 1);
        assert_eq!(sounds(&mut w), vec![SoundEffect::Splash, SoundEffect::BossHurt]);
    }

    #[test]
    fn test_end_check_prefers_game_over() {
        let mut w = world();
        w.character.set_energy(0);
        for _ in 0..5 {
            w.level.boss_mut().unwrap().hit();
        }
        check_end_conditions(&mut w);
        assert_eq!(w.end.map(|e| e.outcome), Some(Outcome::GameOver));
    }
}
