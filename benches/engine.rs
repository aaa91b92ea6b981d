use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use turkey_quest::combat::{Action, Battle, BattleSite, TurnOutcome};
use turkey_quest::data::{fallback_enemy, Language};
use turkey_quest::entities::{Enemy, Player};
use turkey_quest::game::MessageLog;
use turkey_quest::progression::{target_level, EncounterContext, WorldProgress};
use turkey_quest::world::{Region, WorldMaps};
use turkey_quest::Position;

fn bench_target_level(c: &mut Criterion) {
    let maps = WorldMaps::new();
    let mut rng = StdRng::seed_from_u64(7);

    c.bench_function("target_level_overworld", |b| {
        b.iter(|| {
            let ctx = EncounterContext::Overworld {
                region: Region::Cavendish,
                position: black_box(Position::new(9, 4)),
            };
            target_level(false, ctx, &maps, &mut rng)
        })
    });

    c.bench_function("target_level_dungeon", |b| {
        b.iter(|| {
            let ctx = EncounterContext::Dungeon { region: Region::Charlottetown, floor: black_box(2) };
            target_level(false, ctx, &maps, &mut rng)
        })
    });
}

fn bench_battle(c: &mut Criterion) {
    c.bench_function("scripted_battle", |b| {
        b.iter(|| {
            let mut rng = StdRng::seed_from_u64(11);
            let mut player = Player::new("Anne");
            let mut progress = WorldProgress::new();
            let mut log = MessageLog::new();
            let enemy = Enemy::from_content(fallback_enemy(3, Language::En), 3, false);
            let site = BattleSite { region: Region::Avonlea, floor: None };
            let mut battle = Battle::new(enemy, site);

            loop {
                match battle.act(Action::Physical, &mut player, &mut progress, &mut log, &mut rng) {
                    TurnOutcome::Continue => continue,
                    outcome => break black_box(outcome),
                }
            }
        })
    });
}

criterion_group!(benches, bench_target_level, bench_battle);
criterion_main!(benches);
