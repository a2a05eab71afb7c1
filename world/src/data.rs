use std::fmt;

use strum::{Display, EnumIter};
use util::IndexMap;

/// Static content tables.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Data {
    pub bestiary: IndexMap<String, Monster>,
    pub armory: IndexMap<String, Item>,
}

impl Default for Data {
    fn default() -> Self {
        let mut armory: IndexMap<String, Item> = Default::default();
        for item in [
            Item::new("dagger", ItemKind::Dagger).damage(2).speed(150),
            Item::new("short sword", ItemKind::Sword).damage(3),
            Item::new("hand axe", ItemKind::Axe).damage(4).speed(80),
            Item::new("mace", ItemKind::Mace).damage(4).speed(90).on_hit(
                OnHit {
                    effect: Effect::Stun,
                    duration: 1,
                    chance: 10,
                },
            ),
            Item::new("venom knife", ItemKind::Dagger).damage(2).on_hit(
                OnHit {
                    effect: Effect::Poison(1),
                    duration: 3,
                    chance: 25,
                },
            ),
            Item::new("short bow", ItemKind::Bow).damage(2),
            Item::new("buckler", ItemKind::Shield).defense(1),
            Item::new("leather cap", ItemKind::Helmet).defense(1),
            Item::new("leather armor", ItemKind::Armor).defense(2),
            Item::new("mail shirt", ItemKind::Armor).defense(3).speed(90),
            Item::new("gloves", ItemKind::Gloves).defense(1),
            Item::new("boots", ItemKind::Boots).defense(1),
            Item::new("ring of vigor", ItemKind::Ring),
            Item::new("amulet of warding", ItemKind::Amulet).defense(1),
        ] {
            armory.insert(item.name.clone(), item);
        }

        let mut bestiary: IndexMap<String, Monster> = Default::default();
        for (name, monster) in [
            (
                "rat",
                Monster {
                    icon: 'r',
                    health: 4,
                    agility: 12,
                    damage: 1,
                    speed: 120,
                    gold: LootTable::new(0, 2),
                    ..Default::default()
                },
            ),
            (
                "goblin",
                Monster {
                    icon: 'g',
                    level: 2,
                    health: 8,
                    dexterity: 11,
                    gear: vec!["short sword".into(), "leather cap".into()],
                    gold: LootTable::new(2, 8),
                    ..Default::default()
                },
            ),
            (
                "kobold archer",
                Monster {
                    icon: 'k',
                    level: 2,
                    health: 6,
                    dexterity: 12,
                    ranged: Some(RangedAttack {
                        damage: 2,
                        range: 6,
                        accuracy: 0,
                    }),
                    gold: LootTable::new(1, 6),
                    rarity: 2,
                    ..Default::default()
                },
            ),
            (
                "cave spider",
                Monster {
                    icon: 's',
                    health: 5,
                    agility: 14,
                    damage: 1,
                    speed: 110,
                    on_hit: Some(OnHit {
                        effect: Effect::Poison(1),
                        duration: 3,
                        chance: 30,
                    }),
                    rarity: 2,
                    ..Default::default()
                },
            ),
            (
                "orc",
                Monster {
                    icon: 'o',
                    level: 3,
                    health: 14,
                    strength: 13,
                    constitution: 12,
                    speed: 90,
                    gear: vec![
                        "hand axe".into(),
                        "buckler".into(),
                        "leather armor".into(),
                    ],
                    gold: LootTable::new(5, 15),
                    rarity: 3,
                    ..Default::default()
                },
            ),
        ] {
            bestiary.insert(name.to_string(), monster);
        }

        Data { bestiary, armory }
    }
}

impl Data {
    /// Resolve a monster's starting gear from the armory.
    ///
    /// Unknown item names are logged and skipped.
    pub fn gear(&self, monster: &Monster) -> Vec<Item> {
        monster
            .gear
            .iter()
            .filter_map(|name| {
                let item = self.armory.get(name).cloned();
                if item.is_none() {
                    log::warn!("Data::gear: unknown item {name:?}");
                }
                item
            })
            .collect()
    }
}

/// Things with weighted spawn frequency.
pub trait SpawnDist {
    fn rarity(&self) -> u32;

    fn spawn_weight(&self) -> f64 {
        match self.rarity() {
            0 => 0.0,
            r => 1.0 / r as f64,
        }
    }
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Monster {
    pub icon: char,
    pub level: i32,
    pub health: i32,
    pub strength: i32,
    pub dexterity: i32,
    pub agility: i32,
    pub constitution: i32,
    /// Natural attack damage used when no weapon is wielded.
    pub damage: i32,
    /// Speed percentage, 100 is normal.
    pub speed: i32,
    /// Distance at which the monster can start noticing the player.
    pub alert_radius: i32,
    /// Number of consecutive turns of noticing before turning hostile.
    pub notice_delay: i32,
    pub gold: LootTable,
    pub rarity: u32,
    /// Armory items the monster spawns wielding.
    pub gear: Vec<String>,
    pub ranged: Option<RangedAttack>,
    /// Status effect inflicted by the natural attack.
    pub on_hit: Option<OnHit>,
}

impl Default for Monster {
    fn default() -> Self {
        Monster {
            icon: 'm',
            level: 1,
            health: 5,
            strength: 10,
            dexterity: 10,
            agility: 10,
            constitution: 10,
            damage: 1,
            speed: 100,
            alert_radius: 6,
            notice_delay: 2,
            gold: Default::default(),
            rarity: 1,
            gear: Vec::new(),
            ranged: None,
            on_hit: None,
        }
    }
}

impl SpawnDist for Monster {
    fn rarity(&self) -> u32 {
        self.rarity
    }
}

#[derive(Copy, Clone, Default, Eq, PartialEq, Debug)]
pub struct RangedAttack {
    pub damage: i32,
    pub range: i32,
    /// Bonus to hit chance of the projectile.
    pub accuracy: i32,
}

/// Gold range `[gold_min, gold_max]` dropped by a corpse or chest.
#[derive(Copy, Clone, Default, Eq, PartialEq, Debug)]
pub struct LootTable {
    pub gold_min: i32,
    pub gold_max: i32,
}

impl LootTable {
    pub fn new(gold_min: i32, gold_max: i32) -> Self {
        LootTable { gold_min, gold_max }
    }
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Item {
    pub name: String,
    pub kind: ItemKind,
    pub damage: i32,
    pub defense: i32,
    /// Weapon speed percentage, scales the attack cooldown.
    pub speed: i32,
    pub on_hit: Option<OnHit>,
}

impl Default for Item {
    fn default() -> Self {
        Item {
            name: Default::default(),
            kind: Default::default(),
            damage: 0,
            defense: 0,
            speed: 100,
            on_hit: None,
        }
    }
}

impl Item {
    pub fn new(name: impl Into<String>, kind: ItemKind) -> Self {
        Item {
            name: name.into(),
            kind,
            ..Default::default()
        }
    }

    pub fn damage(mut self, damage: i32) -> Self {
        self.damage = damage;
        self
    }

    pub fn defense(mut self, defense: i32) -> Self {
        self.defense = defense;
        self
    }

    pub fn speed(mut self, speed: i32) -> Self {
        self.speed = speed;
        self
    }

    pub fn on_hit(mut self, on_hit: OnHit) -> Self {
        self.on_hit = Some(on_hit);
        self
    }

    pub fn slot(&self) -> EquipSlot {
        self.kind.slot()
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[derive(Copy, Clone, Default, Eq, PartialEq, Hash, Debug, Display, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum ItemKind {
    #[default]
    Sword,
    Axe,
    Mace,
    Dagger,
    Bow,
    Shield,
    Helmet,
    Armor,
    Gloves,
    Boots,
    Ring,
    Amulet,
}

impl ItemKind {
    /// Nominal equipment slot of the item.
    pub fn slot(self) -> EquipSlot {
        use ItemKind::*;
        match self {
            Sword | Axe | Mace | Dagger | Bow => EquipSlot::MainHand,
            Shield => EquipSlot::OffHand,
            Helmet => EquipSlot::Head,
            Armor => EquipSlot::Body,
            Gloves => EquipSlot::Hands,
            Boots => EquipSlot::Feet,
            Ring => EquipSlot::Ring1,
            Amulet => EquipSlot::Amulet,
        }
    }

    pub fn weapon_skill(self) -> Option<SkillKind> {
        match self {
            ItemKind::Sword => Some(SkillKind::Sword),
            ItemKind::Axe => Some(SkillKind::Axe),
            ItemKind::Mace => Some(SkillKind::Mace),
            ItemKind::Dagger => Some(SkillKind::Dagger),
            ItemKind::Bow => Some(SkillKind::Bow),
            _ => None,
        }
    }

    pub fn is_shield(self) -> bool {
        self == ItemKind::Shield
    }

    /// Armor pieces contribute their defense to damage reduction.
    pub fn is_armor_piece(self) -> bool {
        matches!(
            self,
            ItemKind::Helmet
                | ItemKind::Armor
                | ItemKind::Gloves
                | ItemKind::Boots
        )
    }
}

#[derive(
    Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display, EnumIter,
)]
#[strum(serialize_all = "kebab-case")]
pub enum EquipSlot {
    MainHand,
    OffHand,
    Head,
    Body,
    Hands,
    Feet,
    Ring1,
    Ring2,
    Amulet,
}

#[derive(
    Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display, EnumIter,
)]
#[strum(serialize_all = "kebab-case")]
pub enum SkillKind {
    Sword,
    Axe,
    Mace,
    Dagger,
    Bow,
    Unarmed,
    Offense,
    Defense,
    Dodge,
    Block,
}

impl SkillKind {
    /// Percentage point or damage bonus granted by a skill level.
    pub fn bonus(self, level: i32) -> i32 {
        match self {
            SkillKind::Dodge => level,
            SkillKind::Block => level * 2,
            _ => level / 2,
        }
    }
}

/// Status effect kinds and their magnitudes.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Effect {
    /// Damage per turn.
    Poison(i32),
    /// Healing per turn.
    Regen(i32),
    /// Speed reduction percentage.
    Slow(i32),
    /// Speed increase percentage.
    Haste(i32),
    /// Unable to act.
    Stun,
}

impl Effect {
    /// Effects of the same kind replace each other regardless of magnitude.
    pub fn same_kind(&self, other: &Effect) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    /// Speed percentage after applying this effect.
    pub fn modify_speed(&self, speed: i32) -> i32 {
        match *self {
            Effect::Slow(p) => speed * (100 - p).max(0) / 100,
            Effect::Haste(p) => speed * (100 + p) / 100,
            _ => speed,
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::Poison(n) => write!(f, "poison {n}"),
            Effect::Regen(n) => write!(f, "regen {n}"),
            Effect::Slow(p) => write!(f, "slow {p}%"),
            Effect::Haste(p) => write!(f, "haste {p}%"),
            Effect::Stun => write!(f, "stun"),
        }
    }
}

/// Status effect a hit can inflict.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct OnHit {
    pub effect: Effect,
    /// Duration in turns.
    pub duration: i32,
    /// Percent chance of applying on a hit.
    pub chance: i32,
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn builtin_tables() {
        let data = Data::default();
        assert!(!data.bestiary.is_empty());

        for (name, monster) in &data.bestiary {
            assert_eq!(
                data.gear(monster).len(),
                monster.gear.len(),
                "{name} has unknown gear"
            );
            assert!(monster.spawn_weight() > 0.0);
        }

        for (name, item) in &data.armory {
            assert_eq!(name, &item.name);
        }
    }

    #[test]
    fn item_slots() {
        for kind in ItemKind::iter() {
            assert_eq!(
                kind.weapon_skill().is_some(),
                kind.slot() == EquipSlot::MainHand
            );
            if kind.is_armor_piece() {
                assert!(matches!(
                    kind.slot(),
                    EquipSlot::Head
                        | EquipSlot::Body
                        | EquipSlot::Hands
                        | EquipSlot::Feet
                ));
            }
        }
        assert_eq!(ItemKind::Shield.slot(), EquipSlot::OffHand);
        assert_eq!(EquipSlot::MainHand.to_string(), "main-hand");
        assert_eq!(SkillKind::Unarmed.to_string(), "unarmed");
    }

    #[test]
    fn skill_bonus() {
        assert_eq!(SkillKind::Sword.bonus(5), 2);
        assert_eq!(SkillKind::Offense.bonus(3), 1);
        assert_eq!(SkillKind::Dodge.bonus(3), 3);
        assert_eq!(SkillKind::Block.bonus(3), 6);
    }

    #[test]
    fn effects() {
        assert!(Effect::Poison(1).same_kind(&Effect::Poison(3)));
        assert!(!Effect::Poison(1).same_kind(&Effect::Regen(1)));
        assert_eq!(Effect::Slow(50).modify_speed(100), 50);
        assert_eq!(Effect::Haste(50).modify_speed(100), 150);
        assert_eq!(Effect::Stun.modify_speed(100), 100);
        assert_eq!(Effect::Slow(200).modify_speed(100), 0);
    }
}
