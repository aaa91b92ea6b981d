//! Battle loot
//!
//! One uniform roll per victory:
//!
//! | roll          | drop                           |
//! |---------------|--------------------------------|
//! | (0.90, 1.00)  | grimoire, +5 max mp            |
//! | (0.75, 0.90]  | weapon or armor, +1..=3        |
//! | (0.40, 0.75]  | one potion                     |
//! | [0.00, 0.40]  | nothing                        |

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::entities::Player;

/// Max mp granted by a grimoire
pub const GRIMOIRE_MP: i32 = 5;

const WEAPONS: [&str; 4] = ["Carving Knife", "Fork of Destiny", "Turkey Slayer", "Gravy Blade"];
const ARMORS: [&str; 4] = ["Apron of Protection", "Oven Mitts", "Plated Bib", "Golden Crust Mail"];
const GRIMOIRES: [&str; 4] = ["Recipe: Roast", "Recipe: Brine", "Sauce Tactics", "Holiday Spirit"];

/// A victory drop
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Loot {
    Grimoire { name: String, max_mp: i32 },
    Weapon { name: String, atk: u32 },
    Armor { name: String, def: u32 },
    Potion,
    Nothing,
}

fn pick(names: &[&str], rng: &mut impl Rng) -> String {
    names.choose(rng).copied().unwrap_or("Trinket").to_string()
}

/// Roll the drop for one victory
pub fn roll_loot(rng: &mut impl Rng) -> Loot {
    let roll = rng.gen::<f64>();
    if roll > 0.90 {
        Loot::Grimoire { name: pick(&GRIMOIRES, rng), max_mp: GRIMOIRE_MP }
    } else if roll > 0.75 {
        let bonus = rng.gen_range(1..=3);
        if rng.gen_bool(0.5) {
            Loot::Weapon { name: pick(&WEAPONS, rng), atk: bonus }
        } else {
            Loot::Armor { name: pick(&ARMORS, rng), def: bonus }
        }
    } else if roll > 0.40 {
        Loot::Potion
    } else {
        Loot::Nothing
    }
}

/// Apply a drop to the hero
pub fn apply_loot(player: &mut Player, loot: &Loot) {
    match loot {
        Loot::Grimoire { max_mp, .. } => {
            player.mp.grow(*max_mp);
            player.mp.restore_full();
        }
        Loot::Weapon { atk, .. } => player.equipment_atk = player.equipment_atk.saturating_add(*atk),
        Loot::Armor { def, .. } => player.equipment_def = player.equipment_def.saturating_add(*def),
        Loot::Potion => player.potions = player.potions.saturating_add(1),
        Loot::Nothing => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_distribution_bands() {
        let mut rng = StdRng::seed_from_u64(77);
        let (mut grim, mut equip, mut potion, mut nothing) = (0, 0, 0, 0);
        for _ in 0..20_000 {
            match roll_loot(&mut rng) {
                Loot::Grimoire { .. } => grim += 1,
                Loot::Weapon { atk, .. } => {
                    assert!((1..=3).contains(&atk));
                    equip += 1
                }
                Loot::Armor { def, .. } => {
                    assert!((1..=3).contains(&def));
                    equip += 1
                }
                Loot::Potion => potion += 1,
                Loot::Nothing => nothing += 1,
            }
        }
        assert!((1_700..=2_300).contains(&grim));
        assert!((2_600..=3_400).contains(&equip));
        assert!((6_500..=7_500).contains(&potion));
        assert!((7_500..=8_500).contains(&nothing));
    }

    #[test]
    fn test_grimoire_restores_mp() {
        let mut player = Player::new("Anne");
        player.mp.current = 10;
        apply_loot(&mut player, &Loot::Grimoire { name: "Recipe: Roast".into(), max_mp: 5 });
        assert_eq!(player.mp.max, 55);
        assert_eq!(player.mp.current, 55);
    }

    #[test]
    fn test_gear_and_potion() {
        let mut player = Player::new("Anne");
        apply_loot(&mut player, &Loot::Weapon { name: "Gravy Blade".into(), atk: 2 });
        apply_loot(&mut player, &Loot::Armor { name: "Oven Mitts".into(), def: 3 });
        apply_loot(&mut player, &Loot::Potion);
        assert_eq!((player.equipment_atk, player.equipment_def, player.potions), (2, 3, 1));
    }
}
