use std::collections::VecDeque;

use rand::{RngCore, SeedableRng};
use util::GameRng;
use world::{Data, Level, MapTile, Rules};

use crate::{
    clock::{Clock, SystemClock},
    ecs::*,
    placement::Placement,
    prelude::*,
    scheduler::Scheduler,
};

/// Main data container for game engine runtime.
///
/// Owns every entity along with the random number generator, wall clock
/// and event hooks, there is no global game state.
pub struct Runtime {
    pub(crate) rules: Rules,
    pub(crate) data: Data,
    pub(crate) level: Level,
    pub(crate) ecs: Ecs,
    pub(crate) placement: Placement,
    pub(crate) scheduler: Scheduler<Entity>,
    pub(crate) player: Option<Entity>,
    /// Cells currently seen by the player.
    pub(crate) fov: HashSet<IVec2>,
    pub(crate) rng: Box<dyn RngCore>,
    pub(crate) clock: Box<dyn Clock>,
    hooks: Box<dyn Hooks>,

    /// Queued player input.
    pub(crate) intents: VecDeque<Intent>,
    pub(crate) auto_combat: bool,
    /// Wall-clock time of the next resting heal.
    pub(crate) rest_at: Option<u64>,
    /// Last game turn for which status effects were ticked.
    pub(crate) effect_turn: i64,
    /// Entities with status effects.
    pub(crate) afflicted: IndexSet<Entity>,
    /// Level cleared notification was sent and no monsters have appeared
    /// since.
    pub(crate) cleared: bool,
}

impl AsRef<Runtime> for Runtime {
    fn as_ref(&self) -> &Runtime {
        self
    }
}

impl AsMut<Runtime> for Runtime {
    fn as_mut(&mut self) -> &mut Runtime {
        self
    }
}

impl Runtime {
    /// Create a runtime for a level with no entities in it.
    ///
    /// Use `populate` to spawn the player and monsters.
    pub fn new(level: Level) -> Self {
        Runtime {
            rules: Default::default(),
            data: Default::default(),
            level,
            ecs: Default::default(),
            placement: Default::default(),
            scheduler: Default::default(),
            player: None,
            fov: Default::default(),
            rng: Box::new(GameRng::seed_from_u64(0xdeadbeef)),
            clock: Box::new(SystemClock),
            hooks: Box::new(()),
            intents: Default::default(),
            auto_combat: false,
            rest_at: None,
            effect_turn: 0,
            afflicted: Default::default(),
            cleared: false,
        }
    }

    pub fn with_rules(mut self, rules: Rules) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_data(mut self, data: Data) -> Self {
        self.data = data;
        self
    }

    pub fn with_seed(self, seed: u64) -> Self {
        self.with_rng(util::srng(&seed))
    }

    pub fn with_rng(mut self, rng: impl RngCore + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_hooks(mut self, hooks: impl Hooks + 'static) -> Self {
        self.hooks = Box::new(hooks);
        self
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn data(&self) -> &Data {
        &self.data
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    /// Current scheduler time.
    pub fn now(&self) -> Instant {
        self.scheduler.now()
    }

    /// Current wall-clock time.
    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    pub fn player(&self) -> Option<Entity> {
        self.player
    }

    pub fn is_auto_combat(&self) -> bool {
        self.auto_combat
    }

    pub fn is_resting(&self) -> bool {
        self.rest_at.is_some()
    }

    pub(crate) fn emit(&mut self, msg: Msg) {
        self.hooks.emit(msg);
    }

    pub fn tile_at(&self, pos: IVec2) -> MapTile {
        self.level.get(pos)
    }

    pub fn actors_at(&self, pos: IVec2) -> impl Iterator<Item = Entity> + '_ {
        self.placement.entities_at(pos)
    }

    /// Actors within Euclidean distance of a point.
    pub fn actors_in_radius(&self, center: IVec2, radius: i32) -> Vec<Entity> {
        let mut ret = Vec::new();
        for y in -radius..=radius {
            for x in -radius..=radius {
                let d = ivec2(x, y);
                if d.within_radius(radius) {
                    ret.extend(self.actors_at(center + d));
                }
            }
        }
        ret
    }

    pub fn live_entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.placement.all_entities()
    }

    /// Active monsters on the level.
    pub fn monsters(&self) -> impl Iterator<Item = Entity> + '_ {
        self.live_entities()
            .filter(|e| {
                e.kind(self) == ActorKind::Monster && e.is_active(self)
            })
    }

    /// Solid actor occupying a cell.
    pub fn blocker_at(&self, pos: IVec2) -> Option<Entity> {
        self.actors_at(pos).find(|e| e.is_solid(self))
    }

    /// Whether an actor could move into a cell.
    pub fn is_open(&self, pos: IVec2) -> bool {
        self.level.in_bounds(pos)
            && self.level.is_walkable(pos)
            && self.blocker_at(pos).is_none()
    }

    pub fn spawn(&mut self, components: impl hecs::DynamicBundle) -> Entity {
        Entity(self.ecs.spawn(components))
    }

    /// Put an actor in the scheduler.
    ///
    /// The actor acts after its current action delay unless a delay is
    /// given. Does nothing for inactive actors and props.
    pub fn schedule(&mut self, e: Entity, delay: Option<i64>) {
        if !e.is_active(self) || !e.kind(self).is_scheduled() {
            return;
        }
        let delay = delay.unwrap_or_else(|| e.action_delay(self));
        self.scheduler.schedule(e, delay);
        let at = self.scheduler.now() + delay.max(0);
        e.set(self, ActsNext(at));
    }

    /// Take the next active actor from the scheduler.
    pub fn pop_next(&mut self) -> Option<Entity> {
        let Runtime { scheduler, ecs, .. } = self;
        let ecs: &Ecs = ecs;
        scheduler.pop_next(|e| is_active(ecs, e))
    }

    /// Next active actor without taking it from the scheduler.
    pub fn peek_next(&mut self) -> Option<Entity> {
        let Runtime { scheduler, ecs, .. } = self;
        let ecs: &Ecs = ecs;
        scheduler.peek_next(|e| is_active(ecs, e)).map(|(e, _)| e)
    }

    /// Return whether the overall game scenario is still going or if it has
    /// ended in defeat.
    pub fn scenario_status(&self) -> ScenarioStatus {
        match self.player {
            Some(p) if p.is_active(self) => ScenarioStatus::Ongoing,
            _ => ScenarioStatus::Lost,
        }
    }
}

fn is_active(ecs: &Ecs, e: &Entity) -> bool {
    ecs.get::<&Active>(e.0).map_or(false, |a| a.0)
}

#[cfg(test)]
mod test {
    use world::Prefab;

    use super::*;

    #[test]
    fn renderer_queries() {
        let level = Prefab::new(
            "
            #####
            #...#
            #.@.#
            #...#
            #####",
        )
        .parse()
        .unwrap();
        let mut r = Runtime::new(level);
        let player = r.spawn_player(ivec2(2, 2));
        let rat = r.spawn_monster("rat", ivec2(1, 1)).unwrap();

        assert_eq!(r.tile_at(ivec2(0, 0)), MapTile::Wall);
        assert_eq!(r.tile_at(ivec2(1, 1)), MapTile::Floor);
        assert_eq!(r.actors_at(ivec2(2, 2)).collect::<Vec<_>>(), vec![player]);
        assert_eq!(r.actors_in_radius(ivec2(2, 2), 1).len(), 1);
        assert_eq!(r.actors_in_radius(ivec2(2, 2), 2).len(), 2);
        assert_eq!(r.blocker_at(ivec2(1, 1)), Some(rat));
        assert!(!r.is_open(ivec2(1, 1)));
        assert!(r.is_open(ivec2(3, 3)));
        assert!(!r.is_open(ivec2(0, 3)));
        assert_eq!(r.monsters().count(), 1);
        assert_eq!(r.scenario_status(), ScenarioStatus::Ongoing);
    }

    #[test]
    fn inactive_actors_are_not_scheduled() {
        let mut r = Runtime::new(Level::new(3, 3));
        let e = r.spawn((Active(false), Speed(100)));
        r.schedule(e, None);
        assert_eq!(r.pop_next(), None);

        let a = r.spawn((Active(true), Speed(100)));
        let b = r.spawn((Active(true), Speed(200)));
        r.schedule(a, None);
        r.schedule(b, None);
        assert_eq!(r.peek_next(), Some(b));
        assert_eq!(r.pop_next(), Some(b));
        assert_eq!(r.now(), Instant(50));

        a.set(&mut r, Active(false));
        assert_eq!(r.pop_next(), None);

        // Untagged actors get turns but are not monsters.
        assert_eq!(b.kind(&r), ActorKind::Inert);
        assert_eq!(r.monsters().count(), 0);
    }
}
