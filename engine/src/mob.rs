//! Entity logic for active creatures.

use crate::{
    ecs::{
        Active, Effects, Experience, Health, Kind, Lootable, Speed, Stats,
    },
    prelude::*,
};

impl Entity {
    pub fn health(&self, r: &impl AsRef<Runtime>) -> Health {
        self.get::<Health>(r)
    }

    /// Active entity with health left.
    pub fn is_alive(&self, r: &impl AsRef<Runtime>) -> bool {
        self.is_active(r) && !self.health(r).is_dead()
    }

    pub fn stats(&self, r: &impl AsRef<Runtime>) -> Stats {
        self.get::<Stats>(r)
    }

    pub fn level(&self, r: &impl AsRef<Runtime>) -> i32 {
        self.stats(r).level
    }

    pub fn strength_bonus(&self, r: &impl AsRef<Runtime>) -> i32 {
        Stats::bonus(self.stats(r).strength)
    }

    pub fn dexterity_bonus(&self, r: &impl AsRef<Runtime>) -> i32 {
        Stats::bonus(self.stats(r).dexterity)
    }

    pub fn agility_bonus(&self, r: &impl AsRef<Runtime>) -> i32 {
        Stats::bonus(self.stats(r).agility)
    }

    pub fn constitution_bonus(&self, r: &impl AsRef<Runtime>) -> i32 {
        Stats::bonus(self.stats(r).constitution)
    }

    /// Speed percentage with status effects applied.
    pub fn effective_speed(&self, r: &impl AsRef<Runtime>) -> i32 {
        let base = self.get::<Speed>(r).0;
        self.with::<Effects, _>(r, |es| {
            es.iter().fold(base, |speed, e| e.effect.modify_speed(speed))
        })
    }

    /// Scheduler ticks until the next action.
    pub fn action_delay(&self, r: &impl AsRef<Runtime>) -> i64 {
        let r = r.as_ref();
        r.rules.action_delay(self.effective_speed(r))
    }

    /// Set health, clamped into the valid range.
    pub(crate) fn set_health(&self, r: &mut impl AsMut<Runtime>, value: i32) {
        let r = r.as_mut();
        let mut health = self.health(r);
        if value < 0 || value > health.max {
            log::debug!(
                "Entity::set_health: clamping {value} to [0, {}]",
                health.max
            );
        }
        health.current = value.clamp(0, health.max.max(0));
        self.set(r, health);
    }

    /// Damage the entity, return whether it died from this.
    ///
    /// Entities without health can't be damaged.
    pub fn take_damage(
        &self,
        r: &mut impl AsMut<Runtime>,
        amount: i32,
    ) -> bool {
        let r = r.as_mut();
        if !self.is_alive(r) || amount <= 0 {
            return false;
        }

        let health = self.health(r);
        self.set_health(r, health.current - amount);
        if self.health(r).is_dead() {
            self.die(r);
            return true;
        }
        false
    }

    /// Restore health, return the amount actually healed.
    pub fn heal(&self, r: &mut impl AsMut<Runtime>, amount: i32) -> i32 {
        let r = r.as_mut();
        if !self.is_alive(r) || amount <= 0 {
            return 0;
        }

        let health = self.health(r);
        self.set_health(r, health.current + amount);
        self.health(r).current - health.current
    }

    /// Death handling, runs only once for an entity.
    ///
    /// The entity is deactivated and removed from the world. Slain monsters
    /// give the player experience and leave a lootable corpse.
    pub fn die(&self, r: &mut impl AsMut<Runtime>) {
        let r = r.as_mut();
        if !self.is_active(r) {
            return;
        }

        self.set(r, Active(false));
        let Some(pos) = self.pos(r) else {
            self.destroy(r);
            return;
        };

        log::info!("{} {self} died at {pos}", self.name(r));
        r.emit(Msg::Death(*self, pos));

        if self.kind(r) == ActorKind::Monster {
            let xp = self.level(r) * r.rules.monster_xp_per_level;
            if let Some(player) = r.player() {
                player.gain_experience(r, xp);
            }

            let table = self.get::<Lootable>(r).table;
            let name = format!("{} corpse", self.name(r));
            r.spawn_corpse(pos, name, table);
        }

        self.destroy(r);
        r.afflicted.shift_remove(self);
    }

    /// Grant character experience, handles level-ups.
    pub fn gain_experience(&self, r: &mut impl AsMut<Runtime>, xp: i32) {
        let r = r.as_mut();
        if xp <= 0 || !self.is_alive(r) {
            return;
        }

        let per_level = r.rules.xp_per_level.max(1);
        let mut exp = self.get::<Experience>(r);
        if exp.next <= 0 {
            exp.next = per_level * self.level(r).max(1);
        }
        exp.xp += xp;

        while exp.xp >= exp.next {
            exp.xp -= exp.next;

            let mut stats = self.stats(r);
            stats.level += 1;
            self.set(r, stats);
            exp.next = per_level * stats.level;

            let gain = r.rules.health_per_level;
            let mut health = self.health(r);
            health.max += gain;
            health.current += gain;
            self.set(r, health);

            log::info!("{self} reached level {}", stats.level);
            r.emit(Msg::LevelUp(*self, stats.level));
        }

        self.set(r, exp);
    }

    /// Actor counts as a monster to be cleared.
    pub fn is_monster(&self, r: &impl AsRef<Runtime>) -> bool {
        self.get::<Kind>(r).0 == ActorKind::Monster
    }
}

#[cfg(test)]
mod test {
    use quickcheck_macros::quickcheck;
    use rand::rngs::mock::StepRng;
    use world::Level;

    use super::*;
    use crate::{ecs::Name, LootOutcome};

    fn mob(r: &mut Runtime, hp: i32) -> Entity {
        r.spawn((
            Name("dummy".into()),
            Active(true),
            Health::new(hp),
            Stats {
                level: 1,
                ..Default::default()
            },
        ))
    }

    #[quickcheck]
    fn health_stays_in_range(changes: Vec<i16>) -> bool {
        let mut r = Runtime::new(Level::new(1, 1));
        let e = mob(&mut r, 50);
        for c in changes {
            if c < 0 {
                e.take_damage(&mut r, -(c as i32));
            } else {
                e.heal(&mut r, c as i32);
            }
            let h = e.health(&r);
            if h.current < 0 || h.current > h.max {
                return false;
            }
        }
        true
    }

    #[test]
    fn death_runs_once() {
        let mut r = Runtime::new(Level::new(4, 4));
        let e = mob(&mut r, 3);
        e.place(&mut r, ivec2(1, 1));

        assert!(!e.take_damage(&mut r, 2));
        assert!(e.is_alive(&r));
        assert!(e.take_damage(&mut r, 10));
        assert!(!e.is_active(&r));
        assert!(!e.exists(&r));

        // Further damage or death calls are no-ops.
        assert!(!e.take_damage(&mut r, 10));
        e.die(&mut r);
        assert!(!e.exists(&r));
    }

    #[test]
    fn slain_monster_rewards_once() {
        let mut r =
            Runtime::new(Level::new(4, 4)).with_rng(StepRng::new(0, 0));
        let player = r.spawn_player(ivec2(1, 1));
        let rat = r.spawn_monster("rat", ivec2(2, 1)).unwrap();
        let corpses = |r: &Runtime| {
            r.live_entities()
                .filter(|e| e.kind(r) == ActorKind::Corpse)
                .collect::<Vec<_>>()
        };

        assert!(rat.take_damage(&mut r, 100));
        assert_eq!(player.get::<Experience>(&r).xp, 10);
        assert_eq!(corpses(&r).len(), 1);

        rat.die(&mut r);
        assert!(!rat.take_damage(&mut r, 100));
        assert_eq!(player.get::<Experience>(&r).xp, 10);
        assert_eq!(corpses(&r).len(), 1);

        let corpse = corpses(&r)[0];
        assert!(matches!(
            corpse.loot(&mut r, player),
            LootOutcome::Gold(_)
        ));
        assert_eq!(corpse.loot(&mut r, player), LootOutcome::Nothing);
        assert!(corpses(&r).is_empty());
    }

    #[test]
    fn level_up() {
        let mut r = Runtime::new(Level::new(4, 4));
        let e = mob(&mut r, 10);
        e.gain_experience(&mut r, 250);

        // 100 for level 2, 200 more for level 3.
        assert_eq!(e.level(&r), 2);
        assert_eq!(e.get::<Experience>(&r), Experience { xp: 150, next: 200 });
        assert_eq!(e.health(&r), Health { current: 15, max: 15 });
    }

    #[test]
    fn attribute_bonus() {
        assert_eq!(Stats::bonus(10), 0);
        assert_eq!(Stats::bonus(11), 0);
        assert_eq!(Stats::bonus(12), 1);
        assert_eq!(Stats::bonus(9), -1);
        assert_eq!(Stats::bonus(7), -2);
    }
}
