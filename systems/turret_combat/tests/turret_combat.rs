use std::time::Duration;

use grid_defence_core::{CellCoord, Command, EnemyKind, Event, Phase};
use grid_defence_system_turret_combat::TurretCombat;
use grid_defence_system_turret_targeting::TurretTargeting;
use grid_defence_world::{self as world, query, World};

const STEP: Duration = Duration::from_millis(16);

fn world_with_enemy_near_turret() -> World {
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::PlaceTurret {
            cell: CellCoord::new(1, 4),
        },
        &mut events,
    )
    .expect("place turret");
    world::apply(&mut world, Command::SkipBuildPhase, &mut events).expect("skip build");
    world::apply(&mut world, Command::Tick { dt: Duration::ZERO }, &mut events).expect("tick");
    world::apply(
        &mut world,
        Command::SpawnEnemy {
            cell: CellCoord::new(0, 5),
            kind: EnemyKind::Grunt,
        },
        &mut events,
    )
    .expect("spawn");
    assert_eq!(query::phase(&world), Phase::Combat);
    assert_eq!(query::enemy_view(&world).len(), 1);
    world
}

#[test]
fn turret_fires_at_most_once_per_cooldown() {
    let mut world = world_with_enemy_near_turret();
    let mut targeting = TurretTargeting::new();
    let mut combat = TurretCombat::new();
    let mut targets = Vec::new();
    let mut fire_times = Vec::new();
    let mut elapsed = Duration::ZERO;

    for _ in 0..120 {
        let mut events = Vec::new();
        world::apply(&mut world, Command::Tick { dt: STEP }, &mut events).expect("tick");
        elapsed += STEP;

        let turrets = query::turret_view(&world);
        let enemies = query::enemy_view(&world);
        targeting.handle(
            query::phase(&world),
            &turrets,
            &enemies,
            query::layout(&world).cell_size(),
            &mut targets,
        );
        let mut commands = Vec::new();
        combat.handle(query::phase(&world), &turrets, &targets, &mut commands);
        for command in commands {
            world::apply(&mut world, command, &mut events).expect("combat command");
        }

        if events
            .iter()
            .any(|event| matches!(event, Event::BulletFired { .. }))
        {
            fire_times.push(elapsed);
        }
        for turret in query::turret_view(&world).iter() {
            assert!(turret.cooldown <= Duration::from_millis(900));
        }
    }

    assert!(fire_times.len() >= 2, "turret should fire repeatedly: {fire_times:?}");
    for pair in fire_times.windows(2) {
        assert!(
            pair[1] - pair[0] >= Duration::from_millis(900),
            "turret fired twice within one cooldown: {fire_times:?}"
        );
    }
}

#[test]
fn aim_converges_on_a_stationary_bearing() {
    let mut world = world_with_enemy_near_turret();
    let mut targeting = TurretTargeting::new();
    let mut targets = Vec::new();

    let mut events = Vec::new();
    world::apply(&mut world, Command::Tick { dt: STEP }, &mut events).expect("tick");
    targeting.handle(
        query::phase(&world),
        &query::turret_view(&world),
        &query::enemy_view(&world),
        query::layout(&world).cell_size(),
        &mut targets,
    );
    assert_eq!(targets.len(), 1);
    let target = targets[0];

    for _ in 0..200 {
        world::apply(
            &mut world,
            Command::AimTurret {
                turret: target.turret,
                bearing: target.bearing,
            },
            &mut events,
        )
        .expect("aim");
    }

    let aim = query::turret_view(&world)
        .get(target.turret)
        .expect("turret")
        .aim;
    assert!((aim - target.bearing).abs() < 1e-3, "aim {aim} vs bearing {}", target.bearing);
}
