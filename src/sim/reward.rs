//! End-of-round reward selection
//!
//! After a winning round the host is offered every catch from the round's
//! history (or one placeholder) and picks exactly one. The pick draws a single
//! item from a weighted table; the draw is final.

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::state::CatchRecord;
use crate::error::RewardError;

/// Reward rarity tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Rare,
}

/// An item drawn from the reward table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardItem {
    pub name: String,
    pub rarity: Rarity,
}

/// Rare pool (drawn with the configured rare chance)
pub const RARE_REWARDS: &[&str] = &["Golden Claw"];

/// Common pool (equal odds among the remainder)
pub const COMMON_REWARDS: &[&str] = &["Lucky Coin", "Plush Keychain", "Sticker Pack", "Bonus Token"];

/// One selectable option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RewardCandidate {
    /// A prize caught this round
    Catch(CatchRecord),
    /// Offered when nothing was caught
    Placeholder,
}

/// Final result of a selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardGrant {
    pub candidate_index: usize,
    pub candidate: RewardCandidate,
    pub item: RewardItem,
}

/// Draw one item: rare with `rare_chance`, otherwise a uniform common
pub fn draw_reward(rng: &mut Pcg32, rare_chance: f64) -> RewardItem {
    let rare = rng.random_bool(rare_chance.clamp(0.0, 1.0));
    let (pool, rarity) = if rare {
        (RARE_REWARDS, Rarity::Rare)
    } else {
        (COMMON_REWARDS, Rarity::Common)
    };
    let name = pool[rng.random_range(0..pool.len())];
    RewardItem {
        name: name.to_string(),
        rarity,
    }
}

/// Offer state for one winning round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardSelection {
    candidates: Vec<RewardCandidate>,
    granted: Option<RewardGrant>,
}

impl RewardSelection {
    /// Every catch, or a single placeholder when nothing was caught
    pub fn offer(history: &[CatchRecord]) -> Self {
        let candidates = if history.is_empty() {
            vec![RewardCandidate::Placeholder]
        } else {
            history.iter().cloned().map(RewardCandidate::Catch).collect()
        };
        Self {
            candidates,
            granted: None,
        }
    }

    pub fn candidates(&self) -> &[RewardCandidate] {
        &self.candidates
    }

    pub fn granted(&self) -> Option<&RewardGrant> {
        self.granted.as_ref()
    }

    /// Pick a candidate; the draw happens once and is recorded
    pub fn select(
        &mut self,
        index: usize,
        rng: &mut Pcg32,
        rare_chance: f64,
    ) -> Result<RewardGrant, RewardError> {
        if self.granted.is_some() {
            return Err(RewardError::NotOffered);
        }
        let candidate = self
            .candidates
            .get(index)
            .cloned()
            .ok_or(RewardError::EntityNotFound {
                index,
                count: self.candidates.len(),
            })?;
        let grant = RewardGrant {
            candidate_index: index,
            candidate,
            item: draw_reward(rng, rare_chance),
        };
        self.granted = Some(grant.clone());
        Ok(grant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::PrizeKind;
    use rand::SeedableRng;

    fn record(id: u32) -> CatchRecord {
        CatchRecord {
            prize_id: id,
            kind: PrizeKind::Normal,
            weight: 1.0,
            value: 80,
            bonus: 0,
        }
    }

    #[test]
    fn test_empty_history_offers_placeholder() {
        let selection = RewardSelection::offer(&[]);
        assert_eq!(selection.candidates(), &[RewardCandidate::Placeholder]);
    }

    #[test]
    fn test_history_offered_in_order() {
        let selection = RewardSelection::offer(&[record(3), record(7)]);
        assert_eq!(selection.candidates().len(), 2);
        assert_eq!(selection.candidates()[1], RewardCandidate::Catch(record(7)));
    }

    #[test]
    fn test_out_of_range_selection_rejected() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut selection = RewardSelection::offer(&[record(1)]);
        assert_eq!(
            selection.select(1, &mut rng, 0.05),
            Err(RewardError::EntityNotFound { index: 1, count: 1 })
        );
        assert!(selection.granted().is_none());
        assert!(selection.select(0, &mut rng, 0.05).is_ok());
    }

    #[test]
    fn test_selection_is_final() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut selection = RewardSelection::offer(&[record(1), record(2)]);
        let grant = selection.select(1, &mut rng, 0.05).expect("first pick");
        assert_eq!(grant.candidate_index, 1);
        assert_eq!(
            selection.select(0, &mut rng, 0.05),
            Err(RewardError::NotOffered)
        );
        assert_eq!(selection.granted(), Some(&grant));
    }

    #[test]
    fn test_rare_chance_extremes() {
        let mut rng = Pcg32::seed_from_u64(9);
        for _ in 0..20 {
            assert_eq!(draw_reward(&mut rng, 1.0).rarity, Rarity::Rare);
            assert_eq!(draw_reward(&mut rng, 0.0).rarity, Rarity::Common);
        }
    }

    #[test]
    fn test_rare_rate_is_small() {
        let mut rng = Pcg32::seed_from_u64(2024);
        let rare = (0..10_000)
            .filter(|_| draw_reward(&mut rng, 0.05).rarity == Rarity::Rare)
            .count();
        // 5% of 10k with generous slack
        assert!((300..=700).contains(&rare), "rare draws: {}", rare);
    }
}
