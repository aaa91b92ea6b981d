//! Experience and leveling
//!
//! Experience is progress within the current level: it always stays below
//! `exp_threshold(level)`. Level-ups subtract the threshold in a loop so a
//! single large award can jump several levels.

use crate::entities::Player;

/// Experience per level step
pub const EXP_PER_LEVEL: u32 = 50;
/// Max hp gained per level
pub const HP_PER_LEVEL: i32 = 10;
/// Max mp gained per level
pub const MP_PER_LEVEL: i32 = 5;
/// Share of a level's threshold lost on defeat
const DEFEAT_PENALTY_RATIO: f64 = 0.1;

/// Experience needed to leave `level`
pub fn exp_threshold(level: u32) -> u32 {
    level.max(1).saturating_mul(EXP_PER_LEVEL)
}

/// Lowest experience value a defeat may leave at `level`
pub fn level_floor_exp(level: u32) -> u32 {
    level.max(1).saturating_sub(1).saturating_mul(EXP_PER_LEVEL)
}

/// Award experience, applying every level-up it causes.
/// Returns the number of levels gained.
pub fn gain_experience(player: &mut Player, amount: u32) -> u32 {
    player.exp = player.exp.saturating_add(amount);
    let mut gained = 0;
    while player.exp >= exp_threshold(player.level) {
        player.exp -= exp_threshold(player.level);
        player.level = player.level.saturating_add(1);
        player.hp.grow(HP_PER_LEVEL);
        player.mp.grow(MP_PER_LEVEL);
        player.hp.restore_full();
        player.mp.restore_full();
        gained += 1;
    }
    gained
}

/// Experience lost when acknowledging a defeat at `level`
pub fn defeat_penalty(level: u32) -> u32 {
    (f64::from(exp_threshold(level)) * DEFEAT_PENALTY_RATIO).floor() as u32
}

/// Apply the defeat penalty, never going below the level's floor
pub fn apply_defeat_penalty(player: &mut Player) -> u32 {
    let before = player.exp;
    let floor = level_floor_exp(player.level);
    player.exp = player.exp.saturating_sub(defeat_penalty(player.level)).max(floor);
    before.saturating_sub(player.exp)
}

/// Get a title/rank based on level
pub fn level_title(level: u32) -> &'static str {
    match level {
        1..=4 => "Farmhand",
        5..=9 => "Drover",
        10..=14 => "Gobbler Hunter",
        15..=19 => "Flock Breaker",
        20..=29 => "Poultry Bane",
        _ => "Legend of the Island",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_threshold() {
        assert_eq!(exp_threshold(1), 50);
        assert_eq!(exp_threshold(4), 200);
        assert_eq!(level_floor_exp(1), 0);
        assert_eq!(level_floor_exp(3), 100);
    }

    #[test]
    fn test_multi_level_jump() {
        let mut player = Player::new("Anne");
        // 50 (L1) + 100 (L2) + 150 (L3) = 300, leaves 20 into level 4
        let levels = gain_experience(&mut player, 320);
        assert_eq!(levels, 3);
        assert_eq!(player.level, 4);
        assert_eq!(player.exp, 20);
        assert_eq!(player.hp.max, 250 + 30);
        assert_eq!(player.mp.max, 50 + 15);
        assert!(player.hp.is_full() && player.mp.is_full());
    }

    #[test]
    fn test_defeat_penalty() {
        let mut player = Player::new("Anne");
        player.level = 2;
        player.exp = 90;
        // penalty = floor(2 * 50 * 0.1) = 10
        assert_eq!(apply_defeat_penalty(&mut player), 10);
        assert_eq!(player.exp, 80);
    }

    #[test]
    fn test_defeat_penalty_floor() {
        let mut player = Player::new("Anne");
        player.level = 3;
        player.exp = 105;
        apply_defeat_penalty(&mut player);
        assert_eq!(player.exp, 100);
    }

    #[test]
    fn test_level_title() {
        assert_eq!(level_title(1), "Farmhand");
        assert_eq!(level_title(99), "Legend of the Island");
    }

    proptest! {
        #[test]
        fn prop_exp_below_threshold(awards in proptest::collection::vec(0u32..5_000, 0..40)) {
            let mut player = Player::new("Anne");
            for award in awards {
                gain_experience(&mut player, award);
                prop_assert!(player.exp < exp_threshold(player.level));
                prop_assert!(player.level >= 1);
            }
        }

        #[test]
        fn prop_defeat_never_below_floor(level in 1u32..100, exp_seed in 0u32..10_000) {
            let mut player = Player::new("Anne");
            player.level = level;
            player.exp = exp_seed % exp_threshold(level);
            apply_defeat_penalty(&mut player);
            prop_assert!(player.exp >= level_floor_exp(level));
            prop_assert!(player.exp < exp_threshold(level));
        }
    }
}
