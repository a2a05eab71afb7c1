//! Skill progression.

use world::SkillKind;

use crate::{
    ecs::{Skill, Skills, Stats},
    prelude::*,
};

impl Skill {
    /// Add experience to the skill, return the number of levels gained.
    ///
    /// Levels never go past `cap`, a capped skill gains no experience.
    pub fn gain(&mut self, xp: i32, cap: i32, base: i32) -> i32 {
        if self.next <= 0 {
            self.next = base.max(1);
        }
        if xp <= 0 || self.level >= cap {
            return 0;
        }

        self.xp += xp;
        let mut gained = 0;
        while self.xp >= self.next && self.level < cap {
            self.xp -= self.next;
            self.level += 1;
            gained += 1;
            self.next = (self.next * 11 / 10).max(self.next + 1);
        }
        gained
    }
}

impl Entity {
    pub fn skill(&self, r: &impl AsRef<Runtime>, kind: SkillKind) -> Skill {
        self.with::<Skills, _>(r, |s| s.get(&kind).copied().unwrap_or_default())
    }

    pub fn skill_level(&self, r: &impl AsRef<Runtime>, kind: SkillKind) -> i32 {
        self.skill(r, kind).level
    }

    /// Bonus granted by the entity's level in a skill.
    pub fn skill_bonus(&self, r: &impl AsRef<Runtime>, kind: SkillKind) -> i32 {
        kind.bonus(self.skill_level(r, kind))
    }

    /// Highest level the entity's skills can reach.
    pub fn skill_cap(&self, r: &impl AsRef<Runtime>) -> i32 {
        let r = r.as_ref();
        r.rules.skill_cap(self.get::<Stats>(r).level)
    }

    /// Train a skill, only entities with a skill set learn.
    pub fn gain_skill(
        &self,
        r: &mut impl AsMut<Runtime>,
        kind: SkillKind,
        xp: i32,
    ) {
        let r = r.as_mut();
        if !self.has(r, crate::Capability::Skills) {
            return;
        }

        let cap = self.skill_cap(r);
        let base = r.rules.skill_xp_base;
        let (gained, level) = self.with_mut::<Skills, _>(r, |s| {
            let skill = s.entry(kind).or_default();
            (skill.gain(xp, cap, base), skill.level)
        });

        if gained > 0 {
            log::debug!("{self} {kind} skill advanced to {level}");
            r.emit(Msg::SkillUp(*self, kind, level));
        }
    }
}

#[cfg(test)]
mod test {
    use quickcheck_macros::quickcheck;

    use super::*;

    #[test]
    fn thresholds_grow() {
        let mut skill = Skill::default();
        assert_eq!(skill.gain(99, 5, 100), 0);
        assert_eq!(skill.next, 100);
        assert_eq!(skill.gain(1, 5, 100), 1);
        assert_eq!((skill.level, skill.xp, skill.next), (1, 0, 110));
        assert_eq!(skill.gain(110 + 121, 5, 100), 2);
        assert_eq!((skill.level, skill.next), (3, 133));
    }

    #[test]
    fn capped_skill_is_frozen() {
        let mut skill = Skill::default();
        assert_eq!(skill.gain(10_000, 2, 100), 2);
        assert_eq!(skill.level, 2);
        let before = skill;
        assert_eq!(skill.gain(500, 2, 100), 0);
        assert_eq!(skill, before);

        // Raising the cap lets leftover progress continue.
        assert!(skill.gain(1, 3, 100) <= 1);
        assert!(skill.level <= 3);
    }

    #[quickcheck]
    fn level_stays_under_cap(gains: Vec<u16>, cap: u8) -> bool {
        let cap = cap as i32 % 20;
        let mut skill = Skill::default();
        let mut prev = 0;
        for xp in gains {
            skill.gain(xp as i32, cap, 100);
            if skill.level < prev || skill.level > cap.max(0) {
                return false;
            }
            prev = skill.level;
        }
        true
    }
}
