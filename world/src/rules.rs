use std::{fs, path::Path};

use anyhow::{anyhow, bail, Context};
use serde::{Deserialize, Serialize};

/// Tunable game rule constants.
///
/// Every field has a working default, a rules file only needs to list the
/// values it changes.
#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Rules {
    /// Scheduler ticks in one game turn.
    pub turn_length: i64,
    /// Shortest possible action delay in ticks.
    pub min_action_delay: i64,
    pub fov_radius: i32,

    pub base_hit_chance: i32,
    pub min_hit_chance: i32,
    pub max_hit_chance: i32,
    pub max_dodge_chance: i32,
    pub base_block_chance: i32,
    /// Milliseconds between attacks with a weapon of speed 100.
    pub base_attack_period: u64,

    pub skill_xp_base: i32,
    /// Skill level cap per character level.
    pub skill_cap_per_level: i32,
    pub hit_skill_xp: i32,
    pub defense_skill_xp: i32,
    pub dodge_skill_xp: i32,
    pub block_skill_xp: i32,

    /// Experience granted per level of a slain monster.
    pub monster_xp_per_level: i32,
    /// Player experience needed per character level.
    pub xp_per_level: i32,
    pub health_per_level: i32,

    /// Milliseconds between resting heal ticks.
    pub rest_interval: u64,
    pub rest_heal: i32,

    /// Percent chance for an unaware monster to wander on its turn.
    pub wander_chance: i32,
    pub projectile_speed: i32,
    /// Percent chance of a non-entrance room getting a chest.
    pub chest_chance: i32,
    pub chest_gold_min: i32,
    pub chest_gold_max: i32,

    pub player_health: i32,
    pub player_attribute: i32,
}

impl Default for Rules {
    fn default() -> Self {
        Rules {
            turn_length: 100,
            min_action_delay: 10,
            fov_radius: 8,

            base_hit_chance: 50,
            min_hit_chance: 5,
            max_hit_chance: 95,
            max_dodge_chance: 50,
            base_block_chance: 10,
            base_attack_period: 1000,

            skill_xp_base: 100,
            skill_cap_per_level: 5,
            hit_skill_xp: 10,
            defense_skill_xp: 5,
            dodge_skill_xp: 10,
            block_skill_xp: 10,

            monster_xp_per_level: 10,
            xp_per_level: 100,
            health_per_level: 5,

            rest_interval: 500,
            rest_heal: 1,

            wander_chance: 5,
            projectile_speed: 400,
            chest_chance: 25,
            chest_gold_min: 5,
            chest_gold_max: 25,

            player_health: 20,
            player_attribute: 10,
        }
    }
}

impl Rules {
    /// Parse rules from an IDM document.
    pub fn from_idm(text: &str) -> anyhow::Result<Self> {
        let rules: Rules =
            idm::from_str(text).map_err(|e| anyhow!("Bad rules: {e}"))?;
        rules.validate()?;
        Ok(rules)
    }

    /// Check that the values make sense together.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.turn_length <= 0 {
            bail!("Bad rules: turn-length must be positive");
        }
        if self.min_action_delay <= 0 {
            bail!("Bad rules: min-action-delay must be positive");
        }
        if self.base_attack_period == 0 {
            bail!("Bad rules: base-attack-period must be positive");
        }
        if self.min_hit_chance > self.max_hit_chance {
            bail!(
                "Bad rules: min-hit-chance {} is above max-hit-chance {}",
                self.min_hit_chance,
                self.max_hit_chance
            );
        }
        if self.max_dodge_chance < 0 {
            bail!("Bad rules: max-dodge-chance can't be negative");
        }
        Ok(())
    }

    /// Load rules from an IDM file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Can't read {}", path.display()))?;
        Self::from_idm(&text)
    }

    /// Percent chance to hit given attacker accuracy and defender dodge.
    pub fn hit_chance(&self, accuracy: i32, dodge: i32) -> i32 {
        // Must not panic on inverted bounds.
        (self.base_hit_chance + accuracy - dodge)
            .max(self.min_hit_chance)
            .min(self.max_hit_chance)
    }

    /// Level cap for skills of a character of the given level.
    pub fn skill_cap(&self, level: i32) -> i32 {
        level * self.skill_cap_per_level
    }

    /// Minimum wall-clock gap between attacks for a weapon speed.
    pub fn attack_period(&self, weapon_speed: i32) -> u64 {
        self.base_attack_period * 100 / weapon_speed.max(1) as u64
    }

    /// Scheduler delay for an actor with the given effective speed.
    pub fn action_delay(&self, speed: i32) -> i64 {
        (self.turn_length * 100 / speed.max(1) as i64)
            .max(self.min_action_delay)
    }
}
