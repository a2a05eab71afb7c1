//! Attack resolution.

use world::SkillKind;

use crate::{ecs::LastAttack, prelude::*, Capability};

/// Result of an attack attempt.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum AttackOutcome {
    /// Invalid attacker or target, nothing happened.
    NotPerformed,
    /// Attacker's weapon isn't ready yet, nothing happened.
    OnCooldown,
    /// Attack missed, `dodged` is set when the defender's dodge ability
    /// made the difference.
    Miss { dodged: bool },
    Hit {
        damage: i32,
        blocked: bool,
        killed: bool,
    },
}

impl AttackOutcome {
    pub fn is_performed(&self) -> bool {
        !matches!(
            self,
            AttackOutcome::NotPerformed | AttackOutcome::OnCooldown
        )
    }
}

impl Entity {
    /// Percent chance of evading attacks.
    pub fn dodge_chance(&self, r: &impl AsRef<Runtime>) -> i32 {
        let r = r.as_ref();
        (self.agility_bonus(r) + self.skill_bonus(r, SkillKind::Dodge))
            .min(r.rules.max_dodge_chance)
            .max(0)
    }

    /// Damage reduction against hits.
    pub fn defense(&self, r: &impl AsRef<Runtime>) -> i32 {
        self.constitution_bonus(r)
            + self.armor_defense(r)
            + self.skill_bonus(r, SkillKind::Defense)
    }

    /// Percent chance of blocking a hit, zero without a shield.
    pub fn block_chance(&self, r: &impl AsRef<Runtime>) -> i32 {
        let r = r.as_ref();
        if !self.has_shield(r) {
            return 0;
        }
        r.rules.base_block_chance + self.skill_bonus(r, SkillKind::Block)
    }

    /// Damage of a melee hit before the target's defense.
    pub fn melee_damage(&self, r: &impl AsRef<Runtime>) -> i32 {
        self.strength_bonus(r)
            + self.weapon_damage(r)
            + self.skill_bonus(r, self.weapon_skill(r))
            + self.skill_bonus(r, SkillKind::Offense)
    }

    /// Percent chance of hitting the target in melee.
    pub fn hit_chance(&self, r: &impl AsRef<Runtime>, target: &Entity) -> i32 {
        let r = r.as_ref();
        r.rules.hit_chance(self.dexterity_bonus(r), target.dodge_chance(r))
    }

    /// Whether the entity is in a state to attack the target at all.
    pub fn can_attack(&self, r: &impl AsRef<Runtime>, target: &Entity) -> bool {
        self != target
            && self.is_active(r)
            && target.has(r, Capability::Health)
            && target.is_alive(r)
    }

    /// Melee attack another entity.
    pub fn attack(
        &self,
        r: &mut impl AsMut<Runtime>,
        target: Entity,
    ) -> AttackOutcome {
        let r = r.as_mut();
        if !self.can_attack(r, &target) {
            return AttackOutcome::NotPerformed;
        }

        let now = r.now_ms();
        let period = r.rules.attack_period(self.weapon_speed(r));
        if let Some(last) = self.get::<LastAttack>(r).0 {
            if now < last.saturating_add(period) {
                return AttackOutcome::OnCooldown;
            }
        }
        self.set(r, LastAttack(Some(now)));

        let accuracy = self.dexterity_bonus(r);
        let damage = self.melee_damage(r);
        let ret = resolve_attack(r, Some(*self), target, accuracy, damage);

        if let AttackOutcome::Hit { killed, .. } = ret {
            let xp = r.rules.hit_skill_xp;
            let skill = self.weapon_skill(r);
            self.gain_skill(r, skill, xp);
            self.gain_skill(r, SkillKind::Offense, xp);

            if !killed {
                if let Some(on_hit) = self.weapon_on_hit(r) {
                    if r.rng.percent_chance(on_hit.chance) {
                        target.apply_effect(r, on_hit.effect, on_hit.duration);
                    }
                }
            }
        }

        ret
    }
}

/// Roll to hit, then apply damage with block and defense.
///
/// Shared by melee attacks and projectiles. `accuracy` adds to the base hit
/// chance and `damage` is reduced by the defender's defense, a hit always
/// does at least one point of damage.
pub(crate) fn resolve_attack(
    r: &mut Runtime,
    attacker: Option<Entity>,
    defender: Entity,
    accuracy: i32,
    damage: i32,
) -> AttackOutcome {
    let dodge = defender.dodge_chance(r);
    let chance = r.rules.hit_chance(accuracy, dodge);
    let roll = r.rng.percentile();

    if roll >= chance {
        // Would the attack have landed if the defender couldn't dodge?
        let dodged = roll < r.rules.hit_chance(accuracy, 0);
        if dodged {
            let xp = r.rules.dodge_skill_xp;
            defender.gain_skill(r, SkillKind::Dodge, xp);
        }
        r.emit(Msg::Miss {
            attacker,
            defender,
            dodged,
        });
        return AttackOutcome::Miss { dodged };
    }

    let mut damage = (damage - defender.defense(r)).max(1);
    let mut blocked = false;
    if defender.has_shield(r) {
        let chance = defender.block_chance(r);
        if r.rng.percent_chance(chance) {
            damage = (damage / 2).max(1);
            blocked = true;
            let xp = r.rules.block_skill_xp;
            defender.gain_skill(r, SkillKind::Block, xp);
        }
    }

    let xp = r.rules.defense_skill_xp;
    defender.gain_skill(r, SkillKind::Defense, xp);

    r.emit(Msg::Hit {
        attacker,
        defender,
        damage,
        blocked,
    });
    if let Some(pos) = defender.pos(r) {
        r.spawn_fx(pos);
    }

    let killed = defender.take_damage(r, damage);
    AttackOutcome::Hit {
        damage,
        blocked,
        killed,
    }
}
