//! Incursion Headless Simulation Harness
//!
//! Validates level generation and runs scripted sessions against the pure
//! simulation core. Runs entirely in-process: no rendering, no audio.
//!
//! Usage:
//!   cargo run -p incursion-simtest
//!   cargo run -p incursion-simtest -- --verbose
//!   cargo run -p incursion-simtest -- --seeds 200 --config run.json
//!
//! `--config` takes `{ "level": {..}, "features": {..}, "tuning": {..} }`;
//! every section and every tuning field is optional.

use incursion_logic::collision::{Collider, GridCollider};
use incursion_logic::config::{validate_config, FeatureCounts, LevelConfig, Tuning};
use incursion_logic::events::GameEvent;
use incursion_logic::interaction::InteractableKind;
use incursion_logic::level::generate_level;
use incursion_logic::movement::MoveIntent;
use incursion_logic::pose::{grid_to_world, Pose};
use incursion_logic::room::{HubRoom, RoomOutcome};
use incursion_logic::session::{Incursion, TickInput};
use incursion_logic::stats::PlayerState;
use incursion_logic::validation::{validate_level, Severity};
use serde::Deserialize;

const DEFAULT_SEEDS: u64 = 25;

// ── Run configuration ───────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct HarnessConfig {
    level: LevelConfig,
    features: FeatureCounts,
    tuning: Tuning,
}

struct Options {
    verbose: bool,
    seeds: u64,
    config_path: Option<String>,
}

fn parse_args() -> Result<Options, String> {
    let mut opts = Options {
        verbose: false,
        seeds: DEFAULT_SEEDS,
        config_path: None,
    };
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--verbose" => opts.verbose = true,
            "--seeds" => {
                let value = args.next().ok_or("--seeds needs a value")?;
                opts.seeds = value
                    .parse()
                    .map_err(|e| format!("bad --seeds value {:?}: {}", value, e))?;
            }
            "--config" => {
                opts.config_path = Some(args.next().ok_or("--config needs a path")?);
            }
            other => return Err(format!("unknown argument {:?}", other)),
        }
    }
    Ok(opts)
}

fn load_config(path: Option<&str>) -> Result<HarnessConfig, String> {
    let Some(path) = path else {
        return Ok(HarnessConfig::default());
    };
    let text = std::fs::read_to_string(path).map_err(|e| format!("{}: {}", path, e))?;
    serde_json::from_str(&text).map_err(|e| format!("{}: {}", path, e))
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    let opts = match parse_args() {
        Ok(o) => o,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(2);
        }
    };
    let default_filter = if opts.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let cfg = match load_config(opts.config_path.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(2);
        }
    };
    let verbose = opts.verbose;
    println!("=== Incursion Simulation Harness ===\n");
    log::info!("harness config: {:?}", cfg);

    let mut results = Vec::new();

    // 1. Configuration sanity
    results.extend(validate_configuration(&cfg, verbose));

    // 2. Generation sweep across seeds
    results.extend(validate_generation(&cfg, opts.seeds, verbose));

    // 3. Collision invariants
    results.extend(validate_collision(&cfg, verbose));

    // 4. Pursuit and capture
    results.extend(validate_pursuit(&cfg, verbose));

    // 5. Eyes-closed survival
    results.extend(validate_blindness(&cfg, verbose));

    // 6. Scripted walk
    results.extend(validate_walk(&cfg, opts.seeds, verbose));

    // 7. Interactions
    results.extend(validate_interactions(&cfg, verbose));

    // 8. Hub room
    results.extend(validate_hub_room(&cfg, verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

fn start_run(cfg: &HarnessConfig) -> Result<Incursion, String> {
    Incursion::start(cfg.level, cfg.features, cfg.tuning)
        .map(|(run, _)| run)
        .map_err(|e| e.to_string())
}

fn setup_failure(name: &str, err: String) -> Vec<TestResult> {
    vec![TestResult {
        name: name.into(),
        passed: false,
        detail: format!("could not start run: {}", err),
    }]
}

// ── 1. Configuration ────────────────────────────────────────────────────

fn validate_configuration(cfg: &HarnessConfig, verbose: bool) -> Vec<TestResult> {
    println!("--- Configuration ---");
    let mut results = Vec::new();

    let config_errors = validate_config(&cfg.level);
    results.push(TestResult {
        name: "level_config_valid".into(),
        passed: config_errors.is_empty(),
        detail: if config_errors.is_empty() {
            let (w, h) = cfg.level.odd_dimensions();
            format!("{}x{} difficulty {}", w, h, cfg.level.difficulty)
        } else {
            config_errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; ")
        },
    });

    let tuning = cfg.tuning.validate();
    results.push(TestResult {
        name: "tuning_valid".into(),
        passed: tuning.is_ok(),
        detail: match tuning {
            Ok(()) => "tuning accepted".into(),
            Err(e) => e.to_string(),
        },
    });

    let speed = cfg.tuning.pursuit_speed(cfg.level.difficulty);
    results.push(TestResult {
        name: "adversary_slower_than_sprint".into(),
        passed: speed < cfg.tuning.run_speed,
        detail: format!(
            "adversary {:.2} vs sprint {:.2}",
            speed, cfg.tuning.run_speed
        ),
    });

    if verbose {
        println!("  features requested: {}", cfg.features.total());
    }
    results
}

// ── 2. Generation ───────────────────────────────────────────────────────

fn validate_generation(cfg: &HarnessConfig, seeds: u64, verbose: bool) -> Vec<TestResult> {
    println!("--- Generation ({} seeds) ---", seeds);
    let mut results = Vec::new();

    let mut generated = 0;
    let mut gen_failures = Vec::new();
    let mut invalid = Vec::new();
    let mut warnings = 0;
    let mut nondeterministic = Vec::new();

    for seed in 0..seeds {
        let config = LevelConfig {
            seed: cfg.level.seed.wrapping_add(seed),
            ..cfg.level
        };
        let level = match generate_level(&config, &cfg.features, &cfg.tuning) {
            Ok(l) => l,
            Err(e) => {
                gen_failures.push(format!("seed {}: {}", config.seed, e));
                continue;
            }
        };
        generated += 1;

        for err in validate_level(&level, &cfg.features) {
            match err.severity {
                Severity::Error => invalid.push(format!(
                    "seed {} [{}] {}",
                    config.seed, err.category, err.message
                )),
                Severity::Warning => warnings += 1,
            }
        }

        match generate_level(&config, &cfg.features, &cfg.tuning) {
            Ok(again) if again == level => {}
            _ => nondeterministic.push(config.seed),
        }

        if verbose && seed == 0 {
            println!("{}", level.grid().render());
        }
    }

    results.push(TestResult {
        name: "levels_generate".into(),
        passed: gen_failures.is_empty(),
        detail: if gen_failures.is_empty() {
            format!("{} levels generated", generated)
        } else {
            format!("{} failures, first: {}", gen_failures.len(), gen_failures[0])
        },
    });

    results.push(TestResult {
        name: "levels_validate".into(),
        passed: invalid.is_empty(),
        detail: if invalid.is_empty() {
            format!("0 errors, {} warnings", warnings)
        } else {
            format!("{} errors, first: {}", invalid.len(), invalid[0])
        },
    });

    results.push(TestResult {
        name: "generation_deterministic".into(),
        passed: nondeterministic.is_empty(),
        detail: if nondeterministic.is_empty() {
            "same seed, same level".into()
        } else {
            format!("seeds differ on rerun: {:?}", nondeterministic)
        },
    });

    results
}

// ── 3. Collision ────────────────────────────────────────────────────────

fn validate_collision(cfg: &HarnessConfig, _verbose: bool) -> Vec<TestResult> {
    println!("--- Collision ---");
    let level = match generate_level(&cfg.level, &cfg.features, &cfg.tuning) {
        Ok(l) => l,
        Err(e) => return setup_failure("collision_level", e.to_string()),
    };
    let t = &cfg.tuning;
    let collider = GridCollider::new(level.grid(), t.unit_size, t.collision_radius);

    let mut open_walls = 0;
    let mut blocked_cells = 0;
    for (x, z, tile) in level.grid().cells() {
        let (wx, wz) = grid_to_world(x, z, t.unit_size);
        let blocked = collider.blocked(wx, wz);
        if tile.is_passable() && blocked {
            blocked_cells += 1;
        } else if !tile.is_passable() && !blocked {
            open_walls += 1;
        }
    }

    let w = level.grid().width() as f64 * t.unit_size;
    let outside = [(-t.unit_size, 0.0), (w + t.unit_size, 0.0), (0.0, -100.0)];
    let outside_blocked = outside.iter().all(|&(x, z)| collider.blocked(x, z));

    vec![
        TestResult {
            name: "walls_block".into(),
            passed: open_walls == 0,
            detail: format!("{} wall centres reported open", open_walls),
        },
        TestResult {
            name: "passages_free".into(),
            passed: blocked_cells == 0,
            detail: format!("{} passage centres reported blocked", blocked_cells),
        },
        TestResult {
            name: "outside_grid_blocked".into(),
            passed: outside_blocked,
            detail: "points beyond the grid are solid".into(),
        },
    ]
}

// ── 4. Pursuit ──────────────────────────────────────────────────────────

fn validate_pursuit(cfg: &HarnessConfig, _verbose: bool) -> Vec<TestResult> {
    println!("--- Pursuit ---");
    let mut run = match start_run(cfg) {
        Ok(r) => r,
        Err(e) => return setup_failure("pursuit_run", e),
    };
    let p = run.player().pose;
    run.place_adversary(Pose::new(p.x + 0.5, p.z, 0.0));

    let mut caught = 0;
    for _ in 0..120 {
        let report = run.tick(&TickInput::default(), 1.0 / 60.0);
        caught += report
            .events
            .iter()
            .filter(|e| **e == GameEvent::Caught)
            .count();
    }

    vec![
        TestResult {
            name: "caught_fires_once".into(),
            passed: caught == 1,
            detail: format!("CAUGHT emitted {} times", caught),
        },
        TestResult {
            name: "run_ends_on_capture".into(),
            passed: run.outcome() == Some(&GameEvent::Caught),
            detail: format!("outcome {:?}", run.outcome()),
        },
    ]
}

// ── 5. Blindness ────────────────────────────────────────────────────────

fn validate_blindness(cfg: &HarnessConfig, verbose: bool) -> Vec<TestResult> {
    println!("--- Eyes Closed ---");
    let mut run = match start_run(cfg) {
        Ok(r) => r,
        Err(e) => return setup_failure("blindness_run", e),
    };
    let spawn = run.adversary().pose;
    let closed = TickInput {
        eyes_closed: true,
        ..TickInput::default()
    };

    let mut labels = 0;
    let mut depleted = 0;
    let mut ticks = 0;
    while !run.is_over() && ticks < 10_000 {
        let report = run.tick(&closed, 0.1);
        labels += usize::from(report.label.is_some());
        depleted += report
            .events
            .iter()
            .filter(|e| **e == GameEvent::SanityDepleted)
            .count();
        ticks += 1;
    }
    if verbose {
        println!(
            "  sanity ran out after {:.1}s ({} ticks)",
            run.clock().elapsed(),
            ticks
        );
    }

    vec![
        TestResult {
            name: "adversary_frozen_while_unseen".into(),
            passed: run.adversary().pose == spawn,
            detail: format!(
                "adversary at ({:.2}, {:.2})",
                run.adversary().pose.x,
                run.adversary().pose.z
            ),
        },
        TestResult {
            name: "no_targets_while_blind".into(),
            passed: labels == 0,
            detail: format!("{} labels shown with eyes closed", labels),
        },
        TestResult {
            name: "sanity_depleted_once".into(),
            passed: depleted == 1,
            detail: format!("SANITY_DEPLETED emitted {} times", depleted),
        },
    ]
}

// ── 6. Scripted walk ────────────────────────────────────────────────────

fn validate_walk(cfg: &HarnessConfig, seeds: u64, _verbose: bool) -> Vec<TestResult> {
    println!("--- Scripted Walk ---");
    let t = &cfg.tuning;
    let mut wall_hits = 0;
    let mut stat_violations = 0;
    let mut total_ticks = 0;

    for seed in 0..seeds.min(10) {
        let level = LevelConfig {
            seed: cfg.level.seed.wrapping_add(seed),
            ..cfg.level
        };
        let mut run = match Incursion::start(level, cfg.features, cfg.tuning) {
            Ok((r, _)) => r,
            Err(e) => return setup_failure("walk_run", e.to_string()),
        };
        for tick in 0..600u32 {
            // Sprint in bursts, turning steadily, eyes shut so the run
            // lasts the whole script.
            let input = TickInput {
                intent: MoveIntent {
                    forward: true,
                    right: tick % 90 < 30,
                    run: tick % 200 < 120,
                    crouch: tick % 300 > 270,
                    yaw_delta: 0.05,
                    ..MoveIntent::default()
                },
                eyes_closed: true,
            };
            run.tick(&input, 1.0 / 30.0);
            total_ticks += 1;

            let player: &PlayerState = run.player();
            let collider =
                GridCollider::new(run.level().grid(), t.unit_size, t.collision_radius);
            if collider.blocked(player.pose.x, player.pose.z) {
                wall_hits += 1;
            }
            let in_range = |v: f64| (0.0..=100.0).contains(&v);
            if !in_range(player.stamina) || !in_range(player.sanity) || !in_range(player.battery) {
                stat_violations += 1;
            }
            if run.is_over() {
                break;
            }
        }
    }

    vec![
        TestResult {
            name: "player_never_inside_walls".into(),
            passed: wall_hits == 0,
            detail: format!("{} ticks inside walls over {} ticks", wall_hits, total_ticks),
        },
        TestResult {
            name: "stats_stay_in_range".into(),
            passed: stat_violations == 0,
            detail: format!("{} out-of-range samples", stat_violations),
        },
    ]
}

// ── 7. Interactions ─────────────────────────────────────────────────────

fn validate_interactions(cfg: &HarnessConfig, _verbose: bool) -> Vec<TestResult> {
    println!("--- Interactions ---");
    let mut run = match start_run(cfg) {
        Ok(r) => r,
        Err(e) => return setup_failure("interaction_run", e),
    };
    let targets: Vec<_> = run
        .interactables()
        .iter()
        .map(|i| (i.id, i.kind))
        .collect();

    let mut notes = 0;
    let mut batteries = 0;
    let mut keys = 0;
    for &(id, _) in &targets {
        for event in run.interact_with(id) {
            match event {
                GameEvent::NoteRead { text } if !text.is_empty() => notes += 1,
                GameEvent::BatteryCollected { .. } => batteries += 1,
                GameEvent::KeyAcquired => keys += 1,
                _ => {}
            }
        }
    }
    let repeat_events: usize = targets
        .iter()
        .map(|&(id, _)| run.interact_with(id).len())
        .sum();
    let generators = targets
        .iter()
        .filter(|(_, k)| *k == InteractableKind::Generator)
        .count() as u32;

    vec![
        TestResult {
            name: "all_generators_restored".into(),
            passed: run.player().generators_activated == generators
                && run.generators_remaining() == 0,
            detail: format!(
                "{}/{} generators",
                run.player().generators_activated,
                generators
            ),
        },
        TestResult {
            name: "pickups_resolved".into(),
            passed: keys == cfg.features.keys as usize
                && notes == cfg.features.notes as usize
                && batteries == cfg.features.batteries as usize
                && (cfg.features.keys == 0 || run.player().held_key),
            detail: format!("{} keys, {} notes, {} batteries", keys, notes, batteries),
        },
        TestResult {
            name: "used_items_stay_used".into(),
            passed: repeat_events == 0,
            detail: format!("{} events from spent items", repeat_events),
        },
    ]
}

// ── 8. Hub room ─────────────────────────────────────────────────────────

fn validate_hub_room(cfg: &HarnessConfig, _verbose: bool) -> Vec<TestResult> {
    println!("--- Hub Room ---");
    let mut results = Vec::new();

    let mut room = HubRoom::new(false);
    let mut player = PlayerState::at(room.spawn_pose());
    let seated_target = room.probe(&player);
    results.push(TestResult {
        name: "room_starts_at_desk".into(),
        passed: room.is_seated()
            && seated_target.and_then(|t| room.label(t)) == Some("Use Computer [E]"),
        detail: format!("target {:?}", seated_target),
    });

    room.stand_up(&mut player);
    let back = MoveIntent {
        backward: true,
        ..MoveIntent::default()
    };
    let mut escaped = false;
    for _ in 0..400 {
        room.step(&mut player, &back, 0.05, &cfg.tuning);
        let p = player.pose;
        if p.x.abs() > 9.0 || p.z.abs() > 9.0 {
            escaped = true;
        }
    }
    results.push(TestResult {
        name: "room_walls_hold".into(),
        passed: !escaped,
        detail: format!("stopped at ({:.2}, {:.2})", player.pose.x, player.pose.z),
    });

    player.sanity = 20.0;
    player.battery = 10.0;
    let pills = room
        .interactables()
        .iter()
        .find(|i| i.kind == InteractableKind::Pills)
        .map(|i| i.id);
    let bed = room
        .interactables()
        .iter()
        .find(|i| i.kind == InteractableKind::Bed)
        .map(|i| i.id);
    let took = pills.and_then(|id| room.act(id, &mut player));
    let slept = bed.and_then(|id| room.act(id, &mut player));
    results.push(TestResult {
        name: "room_actions_clamp".into(),
        passed: took == Some(RoomOutcome::TookPills { sanity: 45.0 })
            && slept
                == Some(RoomOutcome::Slept {
                    stamina: 100.0,
                    battery: 0.0,
                }),
        detail: format!("{:?} / {:?}", took, slept),
    });

    let mut epilogue = HubRoom::new(true);
    let mut player = PlayerState::at(epilogue.spawn_pose());
    let door = epilogue
        .interactables()
        .iter()
        .find(|i| i.kind == InteractableKind::Door)
        .map(|i| i.id);
    let left = door
        .and_then(|id| epilogue.act(id, &mut player))
        .and_then(|o| o.event());
    results.push(TestResult {
        name: "epilogue_door_opens".into(),
        passed: left == Some(GameEvent::LeaveRoom),
        detail: format!("{:?}", left.map(|e| e.tag())),
    });

    results
}
