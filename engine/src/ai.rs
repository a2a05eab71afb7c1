//! Mobs figuring out what to do on their own.
use rand::Rng;
use strum::Display;

use crate::{
    ecs::{Notice, Ranged},
    fov::line_of_sight,
    prelude::*,
    Capability,
};

/// How alert a monster is to the player.
#[derive(Copy, Clone, Default, Eq, PartialEq, Hash, Debug, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Awareness {
    #[default]
    Unaware,
    Suspicious,
    Hostile,
}

impl Entity {
    pub fn awareness(&self, r: &impl AsRef<Runtime>) -> Awareness {
        self.get::<Notice>(r).state
    }

    /// Whether the monster can perceive the player this turn.
    ///
    /// The player must be inside the alert radius with nothing blocking the
    /// line of sight.
    pub fn notices_player(&self, r: &impl AsRef<Runtime>) -> bool {
        let r = r.as_ref();
        let Some(player) = r.player().filter(|p| p.is_alive(r)) else {
            return false;
        };
        let (Some(pos), Some(target)) = (self.pos(r), player.pos(r)) else {
            return false;
        };

        let radius = self.get::<Notice>(r).radius;
        (target - pos).within_radius(radius)
            && line_of_sight(&r.level, pos, target)
    }

    /// Advance the alertness state machine by one turn.
    pub(crate) fn update_notice(&self, r: &mut impl AsMut<Runtime>) {
        let r = r.as_mut();
        if !self.has(r, Capability::Notice) {
            return;
        }

        let noticed = self.notices_player(r);
        let before = self.awareness(r);
        let after = self.with_mut::<Notice, _>(r, |n| {
            match n.state {
                Awareness::Unaware if noticed => {
                    n.state = Awareness::Suspicious;
                    // The turn of first sighting counts.
                    n.timer = 1;
                }
                Awareness::Suspicious if noticed => n.timer += 1,
                Awareness::Suspicious => {
                    n.state = Awareness::Unaware;
                    n.timer = 0;
                }
                _ => {}
            }

            if n.state == Awareness::Suspicious && n.timer >= n.delay {
                n.state = Awareness::Hostile;
            }
            n.state
        });

        if after != before {
            log::debug!("{self} goes from {before} to {after}");
            r.emit(Msg::Notice(*self, after));
        }
    }

    /// Drop suspicion of the player, hostility is permanent.
    pub(crate) fn calm_down(&self, r: &mut impl AsMut<Runtime>) {
        let r = r.as_mut();
        if self.awareness(r) != Awareness::Suspicious {
            return;
        }

        self.with_mut::<Notice, _>(r, |n| {
            n.state = Awareness::Unaware;
            n.timer = 0;
        });
        log::debug!("{self} lost sight of the player");
        r.emit(Msg::Notice(*self, Awareness::Unaware));
    }

    /// Move one cell if the destination is free.
    pub fn try_step(&self, r: &mut impl AsMut<Runtime>, dir: IVec2) -> bool {
        let r = r.as_mut();
        let Some(pos) = self.pos(r) else {
            return false;
        };
        let dest = pos + dir;
        if dir == IVec2::ZERO || !dir.is_adjacent() || !r.is_open(dest) {
            return false;
        }

        self.place(r, dest);
        true
    }

    /// Take a greedy step towards a point.
    pub fn step_towards(
        &self,
        r: &mut impl AsMut<Runtime>,
        target: IVec2,
    ) -> bool {
        let r = r.as_mut();
        let Some(pos) = self.pos(r) else {
            return false;
        };

        greedy_steps(target - pos)
            .into_iter()
            .any(|dir| self.try_step(r, dir))
    }

    /// Run a monster's turn.
    pub(crate) fn monster_act(&self, r: &mut impl AsMut<Runtime>) {
        let r = r.as_mut();
        if !self.has(r, Capability::Notice) {
            return;
        }
        self.update_notice(r);

        match self.awareness(r) {
            Awareness::Unaware => {
                let chance = r.rules.wander_chance;
                if r.rng.percent_chance(chance) {
                    let dir = DIR_8[r.rng.gen_range(0..DIR_8.len())];
                    self.try_step(r, dir);
                }
            }
            Awareness::Suspicious => {}
            Awareness::Hostile => self.hunt(r),
        }
    }

    /// Go after the player.
    fn hunt(&self, r: &mut Runtime) {
        let Some(player) = r.player().filter(|p| p.is_alive(r)) else {
            return;
        };
        let (Some(pos), Some(target)) = (self.pos(r), player.pos(r)) else {
            return;
        };
        let d = target - pos;

        if d.is_adjacent() {
            // On cooldown the turn is just spent waiting.
            self.attack(r, player);
            return;
        }

        let Ranged(ranged) = self.get::<Ranged>(r);
        if ranged.range > 0
            && d.within_radius(ranged.range)
            && line_of_sight(&r.level, pos, target)
        {
            self.fire(r, target, ranged);
            return;
        }

        self.step_towards(r, target);
    }
}

/// Candidate steps for closing a distance, in order of preference.
///
/// Diagonal when both axes need closing, then the axis with the longer
/// distance, then the other one.
pub fn greedy_steps(d: IVec2) -> Vec<IVec2> {
    let s = d.signum();
    let mut ret = Vec::new();
    if s.x != 0 && s.y != 0 {
        ret.push(s);
    }

    let (major, minor) = if d.x.abs() >= d.y.abs() {
        (ivec2(s.x, 0), ivec2(0, s.y))
    } else {
        (ivec2(0, s.y), ivec2(s.x, 0))
    };
    ret.extend([major, minor].into_iter().filter(|v| *v != IVec2::ZERO));
    ret
}

#[cfg(test)]
mod test {
    use rand::rngs::mock::StepRng;
    use world::Prefab;

    use super::*;

    #[test]
    fn greedy_order() {
        assert_eq!(
            greedy_steps(ivec2(3, -1)),
            vec![ivec2(1, -1), ivec2(1, 0), ivec2(0, -1)]
        );
        assert_eq!(greedy_steps(ivec2(0, 4)), vec![ivec2(0, 1)]);
        assert_eq!(
            greedy_steps(ivec2(-1, 2)),
            vec![ivec2(-1, 1), ivec2(0, 1), ivec2(-1, 0)]
        );
        assert!(greedy_steps(IVec2::ZERO).is_empty());
    }

    fn corridor() -> Runtime {
        let level = Prefab::new(
            "
            ###########
            #.........#
            #.#######.#
            ###########",
        )
        .parse()
        .unwrap();
        // Zero rolls make wandering always happen, keep it off.
        let rules = world::Rules {
            wander_chance: 0,
            ..Default::default()
        };
        Runtime::new(level)
            .with_rules(rules)
            .with_rng(StepRng::new(0, 0))
    }

    #[test]
    fn notice_machine() {
        let mut r = corridor();
        let player = r.spawn_player(ivec2(1, 1));
        let m = r.spawn_monster("rat", ivec2(8, 1)).unwrap();
        let notice = m.get::<Notice>(&r);
        assert_eq!((notice.radius, notice.delay), (6, 2));

        m.update_notice(&mut r);
        assert_eq!(m.awareness(&r), Awareness::Unaware);

        player.place(&mut r, ivec2(2, 1));
        m.update_notice(&mut r);
        assert_eq!(m.awareness(&r), Awareness::Suspicious);
        assert_eq!(m.get::<Notice>(&r).timer, 1);

        // Breaking contact reverts to unaware.
        player.place(&mut r, ivec2(1, 2));
        m.update_notice(&mut r);
        assert_eq!(m.awareness(&r), Awareness::Unaware);
        assert_eq!(m.get::<Notice>(&r).timer, 0);

        player.place(&mut r, ivec2(3, 1));
        m.update_notice(&mut r);
        m.update_notice(&mut r);
        assert_eq!(m.awareness(&r), Awareness::Hostile);

        // Hostility persists without contact.
        player.place(&mut r, ivec2(1, 2));
        m.update_notice(&mut r);
        assert_eq!(m.awareness(&r), Awareness::Hostile);
        m.calm_down(&mut r);
        assert_eq!(m.awareness(&r), Awareness::Hostile);
    }

    #[test]
    fn hostile_monster_closes_in() {
        let mut r = corridor();
        let player = r.spawn_player(ivec2(1, 1));
        let m = r.spawn_monster("rat", ivec2(5, 1)).unwrap();

        m.monster_act(&mut r);
        assert_eq!(m.pos(&r), Some(ivec2(5, 1)));
        m.monster_act(&mut r);
        assert_eq!(m.awareness(&r), Awareness::Hostile);
        assert_eq!(m.pos(&r), Some(ivec2(4, 1)));
        m.monster_act(&mut r);
        m.monster_act(&mut r);
        assert_eq!(m.pos(&r), Some(ivec2(2, 1)));

        // Adjacent, attacks instead of moving.
        let hp = player.health(&r).current;
        m.monster_act(&mut r);
        assert_eq!(m.pos(&r), Some(ivec2(2, 1)));
        assert!(player.health(&r).current < hp);
    }

    #[test]
    fn blocked_steps() {
        let mut r = corridor();
        let player = r.spawn_player(ivec2(1, 1));
        let m = r.spawn_monster("rat", ivec2(3, 1)).unwrap();

        assert!(!m.try_step(&mut r, ivec2(0, 1)));
        assert!(!m.try_step(&mut r, ivec2(2, 0)));
        assert!(m.try_step(&mut r, ivec2(-1, 0)));
        assert!(!m.try_step(&mut r, ivec2(-1, 0)));
        assert_eq!(r.blocker_at(ivec2(1, 1)), Some(player));
    }
}
