use std::time::Duration;

use grid_defence_core::{CellCoord, Command, EnemyKind, Phase, TurretId};
use grid_defence_system_turret_targeting::TurretTargeting;
use grid_defence_world::{self as world, query, World};

fn spawn_grunt(world: &mut World, cell: CellCoord) {
    let mut events = Vec::new();
    world::apply(world, Command::SpawnEnemy { cell, kind: EnemyKind::Grunt }, &mut events)
        .expect("spawn");
}

#[test]
fn turrets_target_enemies_inside_their_radius_only() {
    let mut world = World::new();
    let mut events = Vec::new();
    for cell in [CellCoord::new(1, 1), CellCoord::new(17, 9)] {
        world::apply(&mut world, Command::PlaceTurret { cell }, &mut events).expect("place");
    }
    world::apply(&mut world, Command::SkipBuildPhase, &mut events).expect("skip");
    world::apply(&mut world, Command::Tick { dt: Duration::ZERO }, &mut events).expect("tick");
    assert_eq!(query::phase(&world), Phase::Combat);
    spawn_grunt(&mut world, CellCoord::new(0, 0));

    let mut targeting = TurretTargeting::new();
    let mut targets = Vec::new();
    targeting.handle(
        query::phase(&world),
        &query::turret_view(&world),
        &query::enemy_view(&world),
        query::layout(&world).cell_size(),
        &mut targets,
    );

    assert_eq!(targets.len(), 1);
    assert_eq!(targets[0].turret, TurretId::new(0));
    assert!((targets[0].distance_cells - std::f32::consts::SQRT_2).abs() < 1e-4);
}

#[test]
fn identical_worlds_produce_identical_targets() {
    let run = || {
        let mut world = World::new();
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::PlaceTurret {
                cell: CellCoord::new(2, 2),
            },
            &mut events,
        )
        .expect("place");
        world::apply(&mut world, Command::SkipBuildPhase, &mut events).expect("skip");
        world::apply(&mut world, Command::Tick { dt: Duration::ZERO }, &mut events).expect("tick");
        spawn_grunt(&mut world, CellCoord::new(0, 3));

        let mut targeting = TurretTargeting::new();
        let mut history = Vec::new();
        for _ in 0..30 {
            world::apply(
                &mut world,
                Command::Tick {
                    dt: Duration::from_millis(50),
                },
                &mut events,
            )
            .expect("tick");
            let mut targets = Vec::new();
            targeting.handle(
                query::phase(&world),
                &query::turret_view(&world),
                &query::enemy_view(&world),
                query::layout(&world).cell_size(),
                &mut targets,
            );
            history.extend(targets.into_iter().map(|target| (target.enemy, target.bearing.to_bits())));
        }
        history
    };

    let first = run();
    assert!(!first.is_empty());
    assert_eq!(first, run());
}
