//! Collision resolution between the claw and field entities
//!
//! One outcome per tick at most. Hazards and buffs are checked before prizes,
//! and the first overlapping entity in pool order wins. There is no
//! nearest-entity tie-break.

use super::claw::ClawMode;
use super::geometry::Rect;
use super::pool::EntityPool;
use super::state::{EntityId, HazardCategory};

/// How hazards treat the claw this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HazardGuard {
    /// Hazards cost a life
    Exposed,
    /// Post-hit grace: hazards cost nothing and stay intact
    Grace,
    /// Shield, frenzy or boost-smash: hazards are destroyed harmlessly
    Shielded,
}

/// What the claw ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionOutcome {
    /// Hazard hit; costs a life
    Destructive { hazard_id: EntityId },
    /// Hazard destroyed without penalty
    Neutralized { hazard_id: EntityId },
    /// Buff picked up
    Buff {
        buff_id: EntityId,
        category: HazardCategory,
    },
    /// Prize under the claw while dropping
    Grab { prize_id: EntityId },
}

/// Find the single collision outcome for this tick, if any
pub fn resolve(
    claw_box: &Rect,
    pool: &EntityPool,
    mode: ClawMode,
    guard: HazardGuard,
) -> Option<CollisionOutcome> {
    for hazard in pool.active_hazards() {
        if !claw_box.overlaps(&hazard.bounds()) {
            continue;
        }
        match hazard.category {
            HazardCategory::FuelRefill => {
                return Some(CollisionOutcome::Buff {
                    buff_id: hazard.id,
                    category: hazard.category,
                });
            }
            HazardCategory::Hazard => match guard {
                // Harmless, but still blocks everything behind it this tick
                HazardGuard::Grace => return None,
                HazardGuard::Shielded => {
                    return Some(CollisionOutcome::Neutralized {
                        hazard_id: hazard.id,
                    });
                }
                HazardGuard::Exposed => {
                    return Some(CollisionOutcome::Destructive {
                        hazard_id: hazard.id,
                    });
                }
            },
        }
    }

    if mode != ClawMode::Dropping {
        return None;
    }

    pool.active_prizes()
        .find(|p| claw_box.overlaps(&p.bounds()))
        .map(|p| CollisionOutcome::Grab { prize_id: p.id })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{PrizeKind, Traverse};
    use glam::Vec2;

    fn claw_box() -> Rect {
        Rect::new(Vec2::new(100.0, 100.0), Vec2::new(60.0, 50.0))
    }

    fn hazard_at(pool: &mut EntityPool, category: HazardCategory, x: f32, y: f32) -> EntityId {
        pool.insert_hazard(category, Vec2::new(x, y), Traverse::stationary(x))
    }

    fn prize_at(pool: &mut EntityPool, x: f32, y: f32) -> EntityId {
        pool.insert_prize(
            PrizeKind::Normal,
            Vec2::new(x, y),
            Vec2::new(50.0, 70.0),
            1.0,
            80,
        )
    }

    #[test]
    fn test_empty_pool_misses() {
        let pool = EntityPool::new();
        assert_eq!(
            resolve(&claw_box(), &pool, ClawMode::Dropping, HazardGuard::Exposed),
            None
        );
    }

    #[test]
    fn test_hazard_takes_priority_over_prize() {
        let mut pool = EntityPool::new();
        let _prize = prize_at(&mut pool, 110.0, 110.0);
        let hazard = hazard_at(&mut pool, HazardCategory::Hazard, 120.0, 120.0);
        assert_eq!(
            resolve(&claw_box(), &pool, ClawMode::Dropping, HazardGuard::Exposed),
            Some(CollisionOutcome::Destructive { hazard_id: hazard })
        );
    }

    #[test]
    fn test_shield_neutralizes() {
        let mut pool = EntityPool::new();
        let hazard = hazard_at(&mut pool, HazardCategory::Hazard, 120.0, 120.0);
        assert_eq!(
            resolve(&claw_box(), &pool, ClawMode::Caught, HazardGuard::Shielded),
            Some(CollisionOutcome::Neutralized { hazard_id: hazard })
        );
    }

    #[test]
    fn test_grace_hazard_blocks_grab() {
        let mut pool = EntityPool::new();
        let hazard = hazard_at(&mut pool, HazardCategory::Hazard, 120.0, 120.0);
        prize_at(&mut pool, 110.0, 110.0);
        assert_eq!(
            resolve(&claw_box(), &pool, ClawMode::Dropping, HazardGuard::Grace),
            None
        );
        assert!(pool.hazard(hazard).is_some_and(|h| !h.destroyed));
    }

    #[test]
    fn test_buff_collected_even_in_grace() {
        let mut pool = EntityPool::new();
        let buff = hazard_at(&mut pool, HazardCategory::FuelRefill, 120.0, 120.0);
        assert_eq!(
            resolve(&claw_box(), &pool, ClawMode::Retracting, HazardGuard::Grace),
            Some(CollisionOutcome::Buff {
                buff_id: buff,
                category: HazardCategory::FuelRefill
            })
        );
    }

    #[test]
    fn test_prizes_only_grabbed_while_dropping() {
        let mut pool = EntityPool::new();
        prize_at(&mut pool, 110.0, 110.0);
        for mode in [ClawMode::Retracting, ClawMode::Caught, ClawMode::Ready] {
            assert_eq!(
                resolve(&claw_box(), &pool, mode, HazardGuard::Exposed),
                None
            );
        }
    }

    #[test]
    fn test_first_in_pool_order_wins() {
        let mut pool = EntityPool::new();
        // Second prize sits closer to the claw center but was inserted later
        let first = prize_at(&mut pool, 150.0, 140.0);
        let _second = prize_at(&mut pool, 105.0, 105.0);
        assert_eq!(
            resolve(&claw_box(), &pool, ClawMode::Dropping, HazardGuard::Exposed),
            Some(CollisionOutcome::Grab { prize_id: first })
        );
    }

    #[test]
    fn test_destroyed_hazard_never_retriggers() {
        let mut pool = EntityPool::new();
        let hazard = hazard_at(&mut pool, HazardCategory::Hazard, 120.0, 120.0);
        pool.destroy_hazard(hazard);
        assert_eq!(
            resolve(&claw_box(), &pool, ClawMode::Caught, HazardGuard::Exposed),
            None
        );
    }
}
