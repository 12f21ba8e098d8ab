use std::time::Duration;

use grid_defence_core::{
    CellCoord, Command, CommandError, EnemyId, EnemyKind, Event, Phase, Rules, TurretId,
    UpgradeStat,
};
use grid_defence_world::{self as world, query, World};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const STEP: Duration = Duration::from_millis(50);

fn apply(world: &mut World, command: Command) -> Result<Vec<Event>, CommandError> {
    let mut events = Vec::new();
    world::apply(world, command, &mut events).map(|()| events)
}

fn start_combat(world: &mut World) {
    let _ = apply(world, Command::SkipBuildPhase).expect("skip build");
    let _ = apply(world, Command::Tick { dt: Duration::ZERO }).expect("tick");
    assert_eq!(query::phase(world), Phase::Combat);
}

/// Ticks until `stop` matches an emitted event, returning every event seen.
fn tick_until<F>(world: &mut World, limit: Duration, stop: F) -> Vec<Event>
where
    F: Fn(&Event) -> bool,
{
    let mut seen = Vec::new();
    let mut elapsed = Duration::ZERO;
    while elapsed < limit {
        let events = apply(world, Command::Tick { dt: STEP }).expect("tick");
        elapsed += STEP;
        let done = events.iter().any(&stop);
        seen.extend(events);
        if done {
            return seen;
        }
    }
    panic!("condition not reached within {limit:?}");
}

#[test]
fn turret_purchase_and_sale_move_gold() {
    let mut world = World::new();
    let cell = CellCoord::new(5, 5);

    let events = apply(&mut world, Command::PlaceTurret { cell }).expect("place");
    assert_eq!(
        events,
        vec![Event::TurretPlaced {
            turret: TurretId::new(0),
            cell
        }]
    );
    assert_eq!(query::gold(&world), 130);

    let events = apply(&mut world, Command::Sell { cell }).expect("sell");
    assert_eq!(
        events,
        vec![Event::TurretSold {
            turret: TurretId::new(0),
            cell,
            refund: 25
        }]
    );
    assert_eq!(query::gold(&world), 155);

    assert_eq!(
        apply(&mut world, Command::Sell { cell }),
        Err(CommandError::InvalidCell { cell })
    );
}

#[test]
fn sealing_the_tower_is_refused_without_charge() {
    let mut world = World::new();
    for cell in [CellCoord::new(8, 5), CellCoord::new(10, 5), CellCoord::new(9, 4)] {
        let _ = apply(&mut world, Command::PlaceBarrier { cell }).expect("barrier");
    }
    assert_eq!(query::gold(&world), 120);

    let last = CellCoord::new(9, 6);
    assert_eq!(
        apply(&mut world, Command::PlaceBarrier { cell: last }),
        Err(CommandError::NoPathAvailable)
    );
    assert!(!query::is_barrier(&world, last));
    assert_eq!(query::gold(&world), 120);
    assert!(query::tower_reachable(&world));
}

#[test]
fn barriers_cost_gold_and_refuse_when_broke() {
    let mut world = World::new();
    let mut placed = 0;
    for column in 0..12 {
        let cell = CellCoord::new(column, 0);
        match apply(&mut world, Command::PlaceBarrier { cell }) {
            Ok(_) => placed += 1,
            Err(error) => {
                assert_eq!(
                    error,
                    CommandError::InsufficientFunds {
                        required: 20,
                        available: 0
                    }
                );
                assert!(!query::is_barrier(&world, cell));
            }
        }
    }
    assert_eq!(placed, 9);
    assert_eq!(query::gold(&world), 0);
}

#[test]
fn random_barrier_placement_never_severs_the_tower() {
    let mut rules = Rules::default();
    rules.economy.barrier_cost = 1;
    let mut world = World::with_rules(rules);
    let mut rng = ChaCha8Rng::seed_from_u64(0x5eed_ba11);
    let layout = query::layout(&world);
    let mut accepted = 0;

    for _ in 0..400 {
        let cell = CellCoord::new(
            rng.gen_range(0..layout.columns()),
            rng.gen_range(0..layout.rows()),
        );
        match apply(&mut world, Command::PlaceBarrier { cell }) {
            Ok(_) => {
                accepted += 1;
                assert!(query::tower_reachable(&world), "{cell:?} severed the tower");
            }
            Err(
                CommandError::InvalidCell { .. }
                | CommandError::NoPathAvailable
                | CommandError::InsufficientFunds { .. },
            ) => {}
            Err(other) => panic!("unexpected rejection {other:?}"),
        }
        assert_eq!(query::gold(&world), 180 - accepted);
    }
    assert!(accepted > 20, "only {accepted} barriers placed");
}

#[test]
fn enemy_contact_costs_six_tower_health() {
    let mut world = World::new();
    start_combat(&mut world);
    let _ = apply(
        &mut world,
        Command::SpawnEnemy {
            cell: CellCoord::new(0, 5),
            kind: EnemyKind::Grunt,
        },
    )
    .expect("spawn");
    assert_eq!(query::enemy_view(&world).len(), 1);

    let events = tick_until(&mut world, Duration::from_secs(20), |event| {
        matches!(event, Event::TowerDamaged { .. })
    });

    assert!(events.contains(&Event::TowerDamaged {
        enemy: EnemyId::new(0),
        remaining: 94
    }));
    assert_eq!(query::tower_health(&world), 94);
    assert!(query::enemy_view(&world).is_empty());
}

#[test]
fn breakers_hammer_through_barriers() {
    let mut world = World::new();
    let barrier = CellCoord::new(3, 5);
    let _ = apply(&mut world, Command::PlaceBarrier { cell: barrier }).expect("barrier");
    start_combat(&mut world);
    let _ = apply(
        &mut world,
        Command::SpawnEnemy {
            cell: CellCoord::new(0, 5),
            kind: EnemyKind::Breaker,
        },
    )
    .expect("spawn");

    let events = tick_until(&mut world, Duration::from_secs(20), |event| {
        matches!(event, Event::BarrierDestroyed { .. })
    });

    let barrier_events: Vec<_> = events
        .into_iter()
        .filter(|event| {
            matches!(
                event,
                Event::BarrierDamaged { .. } | Event::BarrierDestroyed { .. }
            )
        })
        .collect();
    assert_eq!(
        barrier_events,
        vec![
            Event::BarrierDamaged {
                cell: barrier,
                remaining: 5
            },
            Event::BarrierDestroyed { cell: barrier },
        ]
    );
    assert!(!query::is_barrier(&world, barrier));
    let breaker = query::enemy_view(&world).into_vec()[0];
    assert!(breaker.position.x < query::layout(&world).cell_center(barrier).x);
}

#[test]
fn clearing_a_wave_pays_out_and_returns_to_build() {
    let mut world = World::new();
    start_combat(&mut world);
    let _ = apply(&mut world, Command::AbandonSpawn).expect("abandon");
    let mut abandoned = 1;

    let mut cleared = None;
    for _ in 0..200 {
        let events = apply(&mut world, Command::Tick { dt: STEP }).expect("tick");
        for event in &events {
            match event {
                Event::SpawnRequested { .. } => {
                    let resolution = apply(&mut world, Command::AbandonSpawn).expect("abandon");
                    assert_eq!(resolution, vec![Event::SpawnAbandoned]);
                    abandoned += 1;
                }
                Event::WaveCleared { wave, reward } => cleared = Some((*wave, *reward)),
                _ => {}
            }
        }
        if cleared.is_some() {
            break;
        }
    }

    assert_eq!(abandoned, 7);
    assert_eq!(cleared, Some((1, 37)));
    assert_eq!(query::gold(&world), 217);
    assert_eq!(query::wave(&world), 2);
    assert_eq!(query::phase(&world), Phase::Build);
    assert_eq!(query::build_time_remaining(&world), Duration::from_secs(30));
}

#[test]
fn destroyed_tower_freezes_the_world() {
    let mut rules = Rules::default();
    rules.economy.tower_max_health = 6;
    let mut world = World::with_rules(rules);
    start_combat(&mut world);
    let _ = apply(
        &mut world,
        Command::SpawnEnemy {
            cell: CellCoord::new(9, 0),
            kind: EnemyKind::Grunt,
        },
    )
    .expect("spawn");

    let events = tick_until(&mut world, Duration::from_secs(20), |event| {
        matches!(
            event,
            Event::PhaseChanged {
                phase: Phase::GameOver,
                ..
            }
        )
    });
    assert!(events.contains(&Event::TowerDamaged {
        enemy: EnemyId::new(0),
        remaining: 0
    }));
    assert_eq!(query::phase(&world), Phase::GameOver);

    assert_eq!(
        apply(&mut world, Command::PlaceTurret { cell: CellCoord::new(1, 1) }),
        Err(CommandError::SimulationFrozen)
    );
    assert_eq!(apply(&mut world, Command::Tick { dt: STEP }), Ok(Vec::new()));
}

#[test]
fn grunts_reroute_through_a_broken_barrier() {
    let mut rules = Rules::default();
    rules.economy.barrier_cost = 1;
    let mut world = World::with_rules(rules);
    let gap = CellCoord::new(3, 5);
    for row in 1..11 {
        let _ = apply(&mut world, Command::PlaceBarrier { cell: CellCoord::new(3, row) })
            .expect("wall");
    }
    start_combat(&mut world);

    let _ = apply(
        &mut world,
        Command::SpawnEnemy {
            cell: CellCoord::new(2, 5),
            kind: EnemyKind::Breaker,
        },
    )
    .expect("breaker");
    let _ = apply(
        &mut world,
        Command::Tick {
            dt: Duration::from_millis(350),
        },
    )
    .expect("tick");
    let _ = apply(
        &mut world,
        Command::SpawnEnemy {
            cell: CellCoord::new(0, 5),
            kind: EnemyKind::Grunt,
        },
    )
    .expect("grunt");
    let grunt = EnemyId::new(1);

    let layout = query::layout(&world);
    let detour_row = layout.cell_center(CellCoord::new(0, 3)).y;
    let mut broken = false;
    let mut elapsed = Duration::ZERO;
    loop {
        assert!(elapsed < Duration::from_secs(30), "grunt never reached the tower");
        let events = apply(&mut world, Command::Tick { dt: STEP }).expect("tick");
        elapsed += STEP;
        broken |= events.contains(&Event::BarrierDestroyed { cell: gap });

        if events.contains(&Event::TowerDamaged {
            enemy: grunt,
            remaining: 94,
        }) {
            break;
        }
        if let Some(enemy) = query::enemy_view(&world).iter().find(|enemy| enemy.id == grunt) {
            assert!(
                enemy.position.y > detour_row,
                "grunt kept walking the detour at {:?}",
                enemy.position
            );
        }
    }

    assert!(broken);
    assert!(!query::is_barrier(&world, gap));
    assert!(elapsed < Duration::from_secs(12), "grunt took {elapsed:?}");
}

#[test]
fn refund_ignores_upgrades() {
    let mut world = World::new();
    let cell = CellCoord::new(5, 5);
    let _ = apply(&mut world, Command::PlaceTurret { cell }).expect("place");
    let _ = apply(&mut world, Command::SelectTurret { cell }).expect("select");

    let events = apply(
        &mut world,
        Command::UpgradeTurret {
            stat: UpgradeStat::Damage,
        },
    )
    .expect("upgrade");
    assert_eq!(
        events,
        vec![Event::TurretUpgraded {
            turret: TurretId::new(0),
            stat: UpgradeStat::Damage,
            tier: 2,
            cost: 25
        }]
    );
    assert_eq!(query::gold(&world), 105);

    let events = apply(&mut world, Command::Sell { cell }).expect("sell");
    assert_eq!(
        events,
        vec![Event::TurretSold {
            turret: TurretId::new(0),
            cell,
            refund: 25
        }]
    );
    assert_eq!(query::gold(&world), 130);
    assert_eq!(query::selected_turret(&world), None);
}

#[test]
fn upgrades_stop_at_the_maximum_tier() {
    let mut rules = Rules::default();
    rules.economy.starting_gold = 1_000;
    let mut world = World::with_rules(rules);
    let cell = CellCoord::new(4, 4);
    let _ = apply(&mut world, Command::PlaceTurret { cell }).expect("place");
    let _ = apply(&mut world, Command::SelectTurret { cell }).expect("select");

    let upgrade = Command::UpgradeTurret {
        stat: UpgradeStat::Range,
    };
    for _ in 1..9 {
        let _ = apply(&mut world, upgrade.clone()).expect("upgrade");
    }
    let turret = query::turret_view(&world).into_vec()[0];
    assert_eq!(turret.tiers.tier(UpgradeStat::Range), 9);
    // 20 * (1 + 2 + ... + 8)
    assert_eq!(query::gold(&world), 1_000 - 50 - 720);

    assert_eq!(
        apply(&mut world, upgrade),
        Err(CommandError::MaxTierReached {
            stat: UpgradeStat::Range
        })
    );
    assert_eq!(query::gold(&world), 230);
    assert_eq!(
        query::turret_view(&world).into_vec()[0]
            .tiers
            .tier(UpgradeStat::Range),
        9
    );
}

#[test]
fn repair_is_refused_during_combat() {
    let mut world = World::new();
    start_combat(&mut world);
    let _ = apply(
        &mut world,
        Command::SpawnEnemy {
            cell: CellCoord::new(0, 5),
            kind: EnemyKind::Grunt,
        },
    )
    .expect("spawn");
    let _ = tick_until(&mut world, Duration::from_secs(20), |event| {
        matches!(event, Event::TowerDamaged { .. })
    });
    assert_eq!(query::tower_health(&world), 94);
    let gold = query::gold(&world);

    let mut events = Vec::new();
    assert_eq!(
        world::apply(&mut world, Command::RepairTower, &mut events),
        Err(CommandError::InvalidPhase {
            phase: Phase::Combat
        })
    );
    assert_eq!(
        events,
        vec![Event::CommandRejected {
            error: CommandError::InvalidPhase {
                phase: Phase::Combat
            }
        }]
    );
    assert_eq!(query::tower_health(&world), 94);
    assert_eq!(query::gold(&world), gold);
}

#[test]
fn selling_a_barrier_removes_it_without_refund() {
    let mut world = World::new();
    let cell = CellCoord::new(2, 7);
    let _ = apply(&mut world, Command::PlaceBarrier { cell }).expect("barrier");
    assert_eq!(query::gold(&world), 160);

    let events = apply(&mut world, Command::Sell { cell }).expect("sell");
    assert_eq!(events, vec![Event::BarrierRemoved { cell }]);
    assert!(!query::is_barrier(&world, cell));
    assert!(query::is_cell_free(&world, cell));
    assert_eq!(query::gold(&world), 160);
}
