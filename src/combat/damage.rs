//! Damage calculation
//!
//! All battle math in one place: physical and magic damage, crits,
//! healing, and the enemy's counterattack.

use rand::Rng;

use crate::entities::Player;

/// Hero's innate attack before level and gear
pub const BASE_ATTACK: i32 = 0;
/// Hero's innate defense before level and gear
pub const BASE_DEFENSE: i32 = 0;
/// Chance that a physical hit is critical
pub const CRIT_CHANCE: f64 = 0.1;
/// Critical damage multiplier (result is floored)
pub const CRIT_MULT: f64 = 1.5;
/// Mp spent by a magic attack
pub const MAGIC_ATTACK_COST: i32 = 5;
/// Mp spent by a healing spell
pub const MAGIC_HEAL_COST: i32 = 3;
/// Hp restored by a potion
pub const POTION_HEAL: i32 = 40;
/// Chance that fleeing a regular enemy works
pub const FLEE_CHANCE: f64 = 0.6;

/// Outcome of a single damaging blow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub damage: i32,
    pub is_crit: bool,
}

/// Physical attack: `max(1, rand[0,5) + base + level*2 + gear - defense)`,
/// with a 10% chance of a x1.5 critical.
pub fn physical_attack(player: &Player, enemy_defense: i32, rng: &mut impl Rng) -> Hit {
    let roll = rng.gen_range(0..5);
    let raw = roll + BASE_ATTACK + player.level as i32 * 2 + player.equipment_atk as i32 - enemy_defense;
    let mut damage = raw.max(1);
    let is_crit = rng.gen::<f64>() < CRIT_CHANCE;
    if is_crit {
        damage = (f64::from(damage) * CRIT_MULT).floor() as i32;
    }
    Hit { damage, is_crit }
}

/// Magic attack: `rand[0,10) + level*4 + 10`, ignores defense
pub fn magic_attack(player: &Player, rng: &mut impl Rng) -> Hit {
    let damage = rng.gen_range(0..10) + player.level as i32 * 4 + 10;
    Hit { damage, is_crit: false }
}

/// Hp restored by a healing spell
pub fn heal_amount(level: u32) -> i32 {
    20 + level as i32 * 5
}

/// Total defense used against enemy attacks
pub fn player_defense(player: &Player) -> i32 {
    BASE_DEFENSE + (player.level / 2) as i32 + player.equipment_def as i32
}

/// Enemy counterattack: `max(1, attack - player defense)`
pub fn enemy_attack(enemy_attack: i32, player: &Player) -> i32 {
    (enemy_attack - player_defense(player)).max(1)
}

/// Whether a flee attempt against a regular enemy works
pub fn roll_flee(rng: &mut impl Rng) -> bool {
    rng.gen::<f64>() < FLEE_CHANCE
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_physical_range_level_one() {
        let player = Player::new("Anne");
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..1000 {
            let hit = physical_attack(&player, 0, &mut rng);
            if hit.is_crit {
                // floor([2,6] * 1.5)
                assert!((3..=9).contains(&hit.damage));
            } else {
                assert!((2..=6).contains(&hit.damage));
            }
        }
    }

    #[test]
    fn test_physical_minimum_one() {
        let player = Player::new("Anne");
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..200 {
            assert!(physical_attack(&player, 500, &mut rng).damage >= 1);
        }
    }

    #[test]
    fn test_magic_ignores_defense() {
        let mut player = Player::new("Anne");
        player.level = 3;
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let hit = magic_attack(&player, &mut rng);
            assert!((22..=31).contains(&hit.damage));
        }
    }

    #[test]
    fn test_enemy_attack_uses_level_and_gear() {
        let mut player = Player::new("Anne");
        player.level = 5;
        player.equipment_def = 4;
        // defense = 0 + 2 + 4
        assert_eq!(enemy_attack(20, &player), 14);
        assert_eq!(enemy_attack(3, &player), 1);
    }

    #[test]
    fn test_heal_amount() {
        assert_eq!(heal_amount(1), 25);
        assert_eq!(heal_amount(10), 70);
    }
}
