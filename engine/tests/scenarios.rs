use engine::{ecs::Health, prelude::*, Awareness, ManualClock, Receiver};
use rand::rngs::mock::StepRng;
use world::{Data, Effect, Monster, Prefab, Rules, SkillKind};

const CORRIDOR: &str = "
    ###########
    #.........#
    #.#######.#
    ###########";

const TWO_ROOMS: &str = "
    ##########
    #...#....#
    #.@.,....#
    #...#....#
    ##########";

fn runtime(map: &str) -> (Runtime, Receiver) {
    let (r, recv, _) = runtime_with_clock(map);
    (r, recv)
}

fn runtime_with_clock(map: &str) -> (Runtime, Receiver, ManualClock) {
    let level = Prefab::new(map).parse().unwrap();
    let rules = Rules {
        wander_chance: 0,
        ..Default::default()
    };
    let (hooks, recv) = engine::channel();
    let clock = ManualClock::new(0);
    let r = Runtime::new(level)
        .with_rules(rules)
        .with_rng(StepRng::new(0, 0))
        .with_clock(clock.clone())
        .with_hooks(hooks);
    (r, recv, clock)
}

/// Run the game with the player always waiting, collect who acted.
fn run_waiting(r: &mut Runtime, steps: usize) -> Vec<Entity> {
    let mut ret = Vec::new();
    for _ in 0..steps {
        match r.step() {
            Step::AwaitingInput => r.push_intent(Intent::Wait),
            Step::Acted(e) => ret.push(e),
            Step::Skipped(_) => {}
            Step::Idle | Step::GameOver => break,
        }
    }
    ret
}

#[test]
fn faster_actors_act_more_often() {
    let (mut r, _recv) = runtime(CORRIDOR);
    let player = r.spawn_player(ivec2(1, 1));
    // Speed 120, out of notice range but in view.
    let rat = r.spawn_monster("rat", ivec2(8, 1)).unwrap();

    let order = run_waiting(&mut r, 20);
    assert_eq!(&order[..7], &[rat, player, rat, player, rat, player, rat]);
    assert_eq!(rat.awareness(&r), Awareness::Unaware);
}

#[test]
fn populate_rooms() {
    let (mut r, _recv) = runtime(TWO_ROOMS);
    let player = r.populate().unwrap();
    assert_eq!(player.pos(&r), Some(ivec2(2, 2)));
    assert!(player.weapon(&r).is_some());

    let monsters: Vec<Entity> = r.monsters().collect();
    assert_eq!(monsters.len(), 1);
    assert_eq!(monsters[0].pos(&r), Some(ivec2(6, 2)));

    // Zero rolls always hit the chest chance.
    assert!(
        r.live_entities()
            .any(|e| e.kind(&r) == ActorKind::Chest && e.is_lootable(&r))
    );

    // Custom bestiary replaces the builtin one.
    let mut data = Data::default();
    data.bestiary.clear();
    data.bestiary.insert(
        "slime".into(),
        Monster {
            icon: 's',
            health: 3,
            ..Default::default()
        },
    );
    let (r, _recv) = runtime(TWO_ROOMS);
    let mut r = r.with_data(data);
    r.populate().unwrap();
    let monsters: Vec<Entity> = r.monsters().collect();
    assert_eq!(monsters.len(), 1);
    assert_eq!(monsters[0].name(&r), "slime");
    assert!(r.spawn_monster("rat", ivec2(1, 2)).is_err());

    // Can't populate a level without rooms.
    let (mut r, _recv) = runtime("#");
    assert!(r.populate().is_err());
}

#[test]
fn poison_clears_level() {
    let (mut r, recv) = runtime(CORRIDOR);
    r.spawn_player(ivec2(1, 1));
    let rat = r.spawn_monster("rat", ivec2(8, 1)).unwrap();
    rat.apply_effect(&mut r, Effect::Poison(2), 5);

    run_waiting(&mut r, 20);
    assert!(!rat.exists(&r));
    assert_eq!(r.monsters().count(), 0);

    let msgs = recv.drain();
    assert!(msgs.iter().any(|m| matches!(m, Msg::Death(e, _) if *e == rat)));
    assert_eq!(msgs.iter().filter(|m| **m == Msg::LevelCleared).count(), 1);
    assert!(
        r.actors_at(ivec2(8, 1))
            .any(|e| e.kind(&r) == ActorKind::Corpse)
    );
}

#[test]
fn archer_shoots_player() {
    let (mut r, recv) = runtime(CORRIDOR);
    let player = r.spawn_player(ivec2(1, 1));
    let archer = r.spawn_monster("kobold archer", ivec2(6, 1)).unwrap();

    run_waiting(&mut r, 40);
    let msgs = recv.drain();
    assert!(msgs.iter().any(|m| matches!(m, Msg::Fire(e, _) if *e == archer)));
    assert!(msgs.iter().any(|m| matches!(
        m,
        Msg::Hit { attacker: Some(a), defender, .. }
            if *a == archer && *defender == player
    )));
    // Keeps its distance and shoots instead of walking up.
    assert_eq!(archer.pos(&r), Some(ivec2(6, 1)));
    assert!(player.health(&r).current < player.health(&r).max);
}

#[test]
fn level_up_raises_skill_cap() {
    let (mut r, _recv) = runtime(CORRIDOR);
    let player = r.spawn_player(ivec2(1, 1));
    let cap = player.skill_cap(&r);

    for _ in 0..1000 {
        player.gain_skill(&mut r, SkillKind::Dodge, 50);
    }
    assert_eq!(player.skill_level(&r, SkillKind::Dodge), cap);

    let xp = r.rules().xp_per_level;
    player.gain_experience(&mut r, xp);
    assert_eq!(player.level(&r), 2);
    assert!(player.skill_cap(&r) > cap);

    for _ in 0..1000 {
        player.gain_skill(&mut r, SkillKind::Dodge, 50);
    }
    assert_eq!(player.skill_cap(&r), 10);
    assert_eq!(player.skill_level(&r, SkillKind::Dodge), 10);
}

#[test]
fn player_death_ends_game() {
    let (mut r, recv, clock) = runtime_with_clock(CORRIDOR);
    let player = r.spawn_player(ivec2(1, 1));
    r.spawn_monster("orc", ivec2(3, 1)).unwrap();

    let mut over = false;
    for _ in 0..2000 {
        // Wall clock runs on so attacks come off cooldown.
        clock.advance(100);
        match r.step() {
            Step::AwaitingInput => r.push_intent(Intent::Wait),
            Step::GameOver => {
                over = true;
                break;
            }
            _ => {}
        }
    }
    assert!(over);
    assert_eq!(r.scenario_status(), ScenarioStatus::Lost);
    assert!(!player.exists(&r));
    assert!(
        recv.drain()
            .iter()
            .any(|m| matches!(m, Msg::Death(e, _) if *e == player))
    );
    assert_eq!(r.step(), Step::GameOver);
}

#[test]
fn health_never_out_of_range() {
    let (mut r, _recv) = runtime(CORRIDOR);
    let player = r.spawn_player(ivec2(1, 1));
    r.spawn_monster("goblin", ivec2(4, 1)).unwrap();
    player.apply_effect(&mut r, Effect::Regen(3), 50);

    for _ in 0..200 {
        if r.step() == Step::AwaitingInput {
            r.push_intent(Intent::Attack(None));
        }
        for e in r.live_entities() {
            let Health { current, max } = e.get::<Health>(&r);
            assert!(current >= 0 && current <= max);
        }
    }
}
