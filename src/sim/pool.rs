//! Entity pool: the prizes and hazards of the current round
//!
//! Entities are kept sorted by id, so iteration order is insertion order.

use glam::Vec2;
use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use super::state::{EntityId, Hazard, HazardCategory, Prize, PrizeKind, Traverse};
use crate::config::KindWeight;
use crate::consts::*;

/// Read-only view of a field entity for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityView {
    pub id: EntityId,
    pub kind: EntityKind,
    pub pos: Vec2,
    pub size: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EntityKind {
    Prize { kind: PrizeKind, value: u32, weight: f32 },
    Hazard { category: HazardCategory },
}

impl From<&Prize> for EntityView {
    fn from(prize: &Prize) -> Self {
        Self {
            id: prize.id,
            kind: EntityKind::Prize {
                kind: prize.kind,
                value: prize.base_value,
                weight: prize.weight,
            },
            pos: prize.pos,
            size: prize.size,
        }
    }
}

impl From<&Hazard> for EntityView {
    fn from(hazard: &Hazard) -> Self {
        Self {
            id: hazard.id,
            kind: EntityKind::Hazard {
                category: hazard.category,
            },
            pos: hazard.pos,
            size: hazard.size,
        }
    }
}

/// Owns every prize and hazard on the field
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityPool {
    prizes: Vec<Prize>,
    hazards: Vec<Hazard>,
    next_id: EntityId,
}

impl EntityPool {
    pub fn new() -> Self {
        Self {
            prizes: Vec::new(),
            hazards: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        id
    }

    /// Spawn `count` prizes with kinds drawn from `table`
    ///
    /// Returns how many were placed; an unusable table places none.
    pub fn spawn_prizes(&mut self, count: u32, table: &[KindWeight], rng: &mut Pcg32) -> u32 {
        let Ok(dist) = WeightedIndex::new(table.iter().map(|k| k.weight)) else {
            log::warn!("Prize kind table has no positive weight; nothing spawned");
            return 0;
        };
        for _ in 0..count {
            let kind = table[dist.sample(rng)].kind;
            self.spawn_prize(kind, rng);
        }
        count
    }

    /// Spawn one prize of `kind` on the floor, avoiding overlap when possible
    pub fn spawn_prize(&mut self, kind: PrizeKind, rng: &mut Pcg32) -> EntityId {
        let profile = kind.profile();
        let size = Vec2::new(PRIZE_BASE_WIDTH, PRIZE_BASE_HEIGHT) * profile.scale;
        let y = FIELD_HEIGHT - PRIZE_FLOOR_MARGIN - size.y;
        let max_x = (FIELD_WIDTH - size.x).max(0.0);

        let mut x = rng.random_range(0.0..=max_x);
        for attempt in 1..=PLACEMENT_ATTEMPTS {
            let candidate = Rect::new(Vec2::new(x, y), size);
            if !self.prizes.iter().any(|p| p.bounds().overlaps_x(&candidate)) {
                break;
            }
            if attempt == PLACEMENT_ATTEMPTS {
                log::debug!("No free floor slot for {:?}; accepting overlap", kind);
                break;
            }
            x = rng.random_range(0.0..=max_x);
        }

        let weight = if profile.weight.0 < profile.weight.1 {
            rng.random_range(profile.weight.0..=profile.weight.1)
        } else {
            profile.weight.0
        };
        let base_value = rng.random_range(profile.value.0..=profile.value.1);

        self.insert_prize(kind, Vec2::new(x, y), size, weight, base_value)
    }

    /// Place a prize exactly where asked
    pub fn insert_prize(
        &mut self,
        kind: PrizeKind,
        pos: Vec2,
        size: Vec2,
        weight: f32,
        base_value: u32,
    ) -> EntityId {
        let id = self.next_entity_id();
        self.prizes.push(Prize {
            id,
            kind,
            pos,
            size,
            weight,
            base_value,
            captured: false,
            original_pos: pos,
        });
        id
    }

    /// Spawn one hazard or buff in a random lane and direction
    ///
    /// `None` picks the category at random: Hazard with `hazard_chance`,
    /// FuelRefill otherwise.
    pub fn spawn_hazard(
        &mut self,
        category: Option<HazardCategory>,
        hazard_chance: f64,
        rng: &mut Pcg32,
    ) -> EntityId {
        let category = category.unwrap_or_else(|| {
            if rng.random_bool(hazard_chance.clamp(0.0, 1.0)) {
                HazardCategory::Hazard
            } else {
                HazardCategory::FuelRefill
            }
        });
        let lane_y = rng.random_range(HAZARD_LANE_TOP..=HAZARD_LANE_BOTTOM);
        let leg_secs = rng.random_range(HAZARD_LEG_MIN_SECS..HAZARD_LEG_MAX_SECS);
        let left = HAZARD_EDGE_MARGIN;
        let right = FIELD_WIDTH - HAZARD_SIZE - HAZARD_EDGE_MARGIN;
        let (from_x, to_x) = if rng.random_bool(0.5) {
            (left, right)
        } else {
            (right, left)
        };
        let motion = Traverse {
            from_x,
            to_x,
            leg_secs,
            elapsed: 0.0,
        };
        let id = self.insert_hazard(category, Vec2::new(from_x, lane_y), motion);
        log::debug!("Spawned {:?} {} in lane y={:.0}", category, id, lane_y);
        id
    }

    /// Place a hazard exactly where asked
    pub fn insert_hazard(
        &mut self,
        category: HazardCategory,
        pos: Vec2,
        motion: Traverse,
    ) -> EntityId {
        let id = self.next_entity_id();
        self.hazards.push(Hazard {
            id,
            category,
            pos,
            size: Vec2::splat(HAZARD_SIZE),
            destroyed: false,
            motion,
        });
        id
    }

    /// Remove an entity by id; removing twice is harmless
    pub fn remove(&mut self, id: EntityId) -> bool {
        let before = self.prizes.len() + self.hazards.len();
        self.prizes.retain(|p| p.id != id);
        self.hazards.retain(|h| h.id != id);
        before != self.prizes.len() + self.hazards.len()
    }

    /// Hand a prize to the claw (the pool no longer holds it)
    pub fn take_prize(&mut self, id: EntityId) -> Option<Prize> {
        let idx = self.prizes.iter().position(|p| p.id == id && !p.captured)?;
        let mut prize = self.prizes.remove(idx);
        prize.captured = true;
        Some(prize)
    }

    /// Take a prize back from the claw, restored to its floor position
    pub fn return_prize(&mut self, mut prize: Prize) {
        prize.restore();
        let idx = self.prizes.partition_point(|p| p.id < prize.id);
        self.prizes.insert(idx, prize);
    }

    /// Mark a hazard as hit; it is purged on the next advance
    pub fn destroy_hazard(&mut self, id: EntityId) {
        if let Some(hazard) = self.hazards.iter_mut().find(|h| h.id == id) {
            hazard.destroyed = true;
        }
    }

    pub fn clear_hazards(&mut self) -> usize {
        let count = self.active_hazards().count();
        self.hazards.clear();
        count
    }

    /// Move hazards along their lanes and purge destroyed ones
    pub fn advance_hazards(&mut self, dt: f32) {
        self.hazards.retain(|h| !h.destroyed);
        for hazard in &mut self.hazards {
            hazard.advance(dt);
        }
    }

    pub fn prize(&self, id: EntityId) -> Option<&Prize> {
        self.prizes.iter().find(|p| p.id == id)
    }

    pub fn hazard(&self, id: EntityId) -> Option<&Hazard> {
        self.hazards.iter().find(|h| h.id == id)
    }

    /// Prizes still on the field
    pub fn active_prizes(&self) -> impl Iterator<Item = &Prize> {
        self.prizes.iter().filter(|p| !p.captured)
    }

    /// Hazards and buffs that can still trigger
    pub fn active_hazards(&self) -> impl Iterator<Item = &Hazard> {
        self.hazards.iter().filter(|h| !h.destroyed)
    }

    /// Every live entity, prizes first
    pub fn all(&self) -> Vec<EntityView> {
        self.active_prizes()
            .map(EntityView::from)
            .chain(self.active_hazards().map(EntityView::from))
            .collect()
    }

    /// Summed base value of the prizes still on the field
    pub fn active_prize_value(&self) -> u64 {
        self.active_prizes().map(|p| u64::from(p.base_value)).sum()
    }

    /// Most valuable prize on the field (lowest id wins ties)
    pub fn most_valuable_prize(&self) -> Option<&Prize> {
        self.active_prizes()
            .fold(None, |best: Option<&Prize>, p| match best {
                Some(b) if b.base_value >= p.base_value => Some(b),
                _ => Some(p),
            })
    }

    pub fn prize_count(&self) -> usize {
        self.active_prizes().count()
    }

    pub fn hazard_count(&self) -> usize {
        self.active_hazards().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(12345)
    }

    #[test]
    fn test_spawn_prizes_count_and_bounds() {
        let mut pool = EntityPool::new();
        let mut rng = rng();
        let placed = pool.spawn_prizes(5, &crate::config::default_kind_weights(), &mut rng);
        assert_eq!(placed, 5);
        assert_eq!(pool.prize_count(), 5);
        for prize in pool.active_prizes() {
            let b = prize.bounds();
            assert!(b.left() >= 0.0 && b.right() <= FIELD_WIDTH + 0.001);
            assert!(b.bottom() <= FIELD_HEIGHT);
            assert!(prize.weight > 0.0);
        }
    }

    #[test]
    fn test_spawn_prizes_terminates_when_crowded() {
        // Far more prizes than floor slots: placement must fall back to overlap
        let mut pool = EntityPool::new();
        let mut rng = rng();
        let table = [KindWeight {
            kind: PrizeKind::Heavy,
            weight: 1.0,
        }];
        assert_eq!(pool.spawn_prizes(40, &table, &mut rng), 40);
        assert_eq!(pool.prize_count(), 40);
    }

    #[test]
    fn test_spawn_prizes_respects_table() {
        let mut pool = EntityPool::new();
        let mut rng = rng();
        let table = [
            KindWeight {
                kind: PrizeKind::GoldEgg,
                weight: 1.0,
            },
            KindWeight {
                kind: PrizeKind::Normal,
                weight: 0.0,
            },
        ];
        pool.spawn_prizes(6, &table, &mut rng);
        assert!(pool.active_prizes().all(|p| p.kind == PrizeKind::GoldEgg));
    }

    #[test]
    fn test_spawn_hazard_in_lane() {
        let mut pool = EntityPool::new();
        let mut rng = rng();
        let id = pool.spawn_hazard(Some(HazardCategory::Hazard), 1.0, &mut rng);
        let hazard = pool.hazard(id).expect("spawned");
        assert!(hazard.pos.y >= HAZARD_LANE_TOP && hazard.pos.y <= HAZARD_LANE_BOTTOM);
        assert!(hazard.motion.leg_secs >= HAZARD_LEG_MIN_SECS);
        assert!(hazard.motion.leg_secs < HAZARD_LEG_MAX_SECS);
    }

    #[test]
    fn test_random_category_follows_chance() {
        let mut pool = EntityPool::new();
        let mut rng = rng();
        for _ in 0..10 {
            pool.spawn_hazard(None, 0.0, &mut rng);
        }
        assert!(
            pool.active_hazards()
                .all(|h| h.category == HazardCategory::FuelRefill)
        );
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut pool = EntityPool::new();
        let mut rng = rng();
        let id = pool.spawn_prize(PrizeKind::Normal, &mut rng);
        assert!(pool.remove(id));
        assert!(!pool.remove(id));
        assert_eq!(pool.prize_count(), 0);
    }

    #[test]
    fn test_take_and_return_preserves_order() {
        let mut pool = EntityPool::new();
        let mut rng = rng();
        let a = pool.spawn_prize(PrizeKind::Normal, &mut rng);
        let b = pool.spawn_prize(PrizeKind::Normal, &mut rng);
        let c = pool.spawn_prize(PrizeKind::Normal, &mut rng);

        let mut taken = pool.take_prize(b).expect("present");
        assert!(taken.captured);
        assert!(pool.prize(b).is_none());
        assert!(pool.take_prize(b).is_none());

        taken.pos = Vec2::new(1.0, 1.0);
        let original = taken.original_pos;
        pool.return_prize(taken);
        let ids: Vec<_> = pool.active_prizes().map(|p| p.id).collect();
        assert_eq!(ids, vec![a, b, c]);
        assert_eq!(pool.prize(b).map(|p| p.pos), Some(original));
    }

    #[test]
    fn test_destroyed_hazards_leave_views() {
        let mut pool = EntityPool::new();
        let id = pool.insert_hazard(
            HazardCategory::Hazard,
            Vec2::new(50.0, 200.0),
            Traverse::stationary(50.0),
        );
        pool.destroy_hazard(id);
        assert_eq!(pool.hazard_count(), 0);
        assert!(pool.all().is_empty());
        pool.advance_hazards(0.1);
        assert!(pool.hazard(id).is_none());
    }

    #[test]
    fn test_most_valuable_prize() {
        let mut pool = EntityPool::new();
        let size = Vec2::splat(10.0);
        pool.insert_prize(PrizeKind::Normal, Vec2::ZERO, size, 1.0, 80);
        let gold = pool.insert_prize(PrizeKind::GoldEgg, Vec2::ZERO, size, 2.5, 500);
        pool.insert_prize(PrizeKind::Heavy, Vec2::ZERO, size, 2.0, 500);
        assert_eq!(pool.most_valuable_prize().map(|p| p.id), Some(gold));
        assert_eq!(pool.active_prize_value(), 1080);
    }
}
