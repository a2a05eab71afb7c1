use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use engine::{prelude::*, ManualClock};
use util::dijkstra_map;
use world::{MapGenerator, Prefab, Rules};

pub const GAME_NAME: &str = "delve";

/// Level used when no map file is given.
const DEFAULT_MAP: &str = "
    ##########################
    #.....#........#.........#
    #.@...,........,.........#
    #.....#........#.........#
    ###,#####+################
    ###,####......############
    #.....,.......############
    #.....#.......############
    ##########################";

#[derive(Parser, Debug)]
#[command(name = GAME_NAME, about = "Run a dungeon level without a player at the keyboard")]
struct Args {
    #[arg(long, help = "Random number generator seed")]
    seed: Option<u64>,

    #[arg(long, default_value_t = 5000, help = "Maximum number of steps")]
    steps: usize,

    #[arg(long, help = "IDM file with game rule constants")]
    rules: Option<PathBuf>,

    #[arg(long, help = "Level map file")]
    map: Option<PathBuf>,

    #[arg(
        long,
        default_value_t = 100,
        help = "Wall-clock milliseconds that pass on each step"
    )]
    frame_ms: u64,

    #[arg(long, help = "Let auto-combat pick the fights")]
    auto: bool,
}

fn main() -> anyhow::Result<()> {
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .format_timestamp_secs()
    .try_init();

    let args = Args::parse();

    let seed = args.seed.unwrap_or_else(rand::random);
    log::info!("seed: {seed}");

    let rules = match &args.rules {
        Some(path) => Rules::load(path)?,
        None => Rules::default(),
    };
    let map = match &args.map {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Can't read {}", path.display()))?,
        None => DEFAULT_MAP.to_owned(),
    };
    let level = Prefab::new(map).generate(&mut util::srng(&seed))?;

    let clock = ManualClock::new(0);
    let (hooks, recv) = engine::channel();
    let mut r = Runtime::new(level)
        .with_rules(rules)
        .with_seed(seed)
        .with_clock(clock.clone())
        .with_hooks(hooks);

    let player = r.populate()?;
    if args.auto {
        r.push_intent(Intent::ToggleAutoCombat);
    }

    let mut cleared = false;
    for n in 0..args.steps {
        clock.advance(args.frame_ms);

        match r.step() {
            Step::AwaitingInput => {
                if let Some(intent) = next_intent(&r, player) {
                    r.push_intent(intent);
                }
            }
            Step::GameOver => {
                log::info!("Game over after {n} steps at {}", r.now());
                break;
            }
            Step::Idle => {
                log::warn!("Nobody is scheduled, stopping");
                break;
            }
            Step::Acted(_) | Step::Skipped(_) => {}
        }

        for msg in recv.drain() {
            match msg {
                Msg::Message(text) => log::info!("{text}"),
                Msg::LevelCleared => cleared = true,
                msg => log::debug!("{msg:?}"),
            }
        }

        // Done once the level is empty and picked clean.
        if cleared
            && !r.is_resting()
            && !r.live_entities().any(|e| e.is_lootable(&r))
        {
            break;
        }
    }

    if player.exists(&r) {
        let health = player.health(&r);
        log::info!(
            "Player level {} at {}/{} health with {} gold",
            player.level(&r),
            health.current,
            health.max,
            player.gold(&r),
        );
    }
    log::info!(
        "{} at {}, {} monsters left",
        if cleared { "Level cleared" } else { "Stopped" },
        r.now(),
        r.monsters().count()
    );

    Ok(())
}

/// Scripted stand-in for a player at the keyboard.
fn next_intent(r: &Runtime, player: Entity) -> Option<Intent> {
    if r.is_resting() {
        // Keep the resting going.
        return None;
    }

    let health = player.health(r);
    if health.current * 2 < health.max && !r.hostile_in_view() {
        return Some(Intent::Rest);
    }

    if let Some(prop) = lootable_nearby(r, player) {
        return Some(if prop.kind(r) == ActorKind::Chest {
            Intent::Interact
        } else {
            Intent::Loot
        });
    }

    let pos = player.pos(r)?;
    let targets: Vec<IVec2> = r
        .monsters()
        .chain(r.live_entities().filter(|e| e.is_lootable(r)))
        .filter_map(|e| e.pos(r))
        .collect();
    if targets.is_empty() {
        return (health.current < health.max).then_some(Intent::Rest);
    }

    Some(match path_step(r, pos, targets) {
        Some(dir) => Intent::Move(dir),
        None => Intent::Wait,
    })
}

fn lootable_nearby(r: &Runtime, player: Entity) -> Option<Entity> {
    let pos = player.pos(r)?;
    std::iter::once(IVec2::ZERO)
        .chain(DIR_8)
        .flat_map(move |d| r.actors_at(pos + d))
        .find(|e| e.is_lootable(r))
}

/// Direction of the first step on a shortest path to any of the targets.
fn path_step(
    r: &Runtime,
    origin: IVec2,
    targets: Vec<IVec2>,
) -> Option<IVec2> {
    let level = r.level();
    let dist: HashMap<IVec2, usize> = dijkstra_map(
        move |p: &IVec2| {
            let p = *p;
            DIR_8
                .into_iter()
                .map(move |d| p + d)
                .filter(move |q| level.is_walkable(*q))
        },
        targets,
    )
    .collect();

    DIR_8
        .into_iter()
        .filter(|d| {
            let q = origin + *d;
            r.is_open(q) || r.blocker_at(q).is_some_and(|e| e.is_monster(r))
        })
        .filter_map(|d| Some((d, *dist.get(&(origin + d))?)))
        .min_by_key(|(_, n)| *n)
        .map(|(d, _)| d)
}
