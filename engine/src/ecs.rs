//! Entity component system component types.

use std::collections::BTreeMap;

use derive_more::{Deref, DerefMut};
use strum::{Display, EnumIter};
use world::{
    Effect, EquipSlot, Item, LootTable, OnHit, RangedAttack, SkillKind,
};

use crate::{ai::Awareness, prelude::*};

macro_rules! components {
    {
        $($attrname:ident,)+
    } => {
        /// Discriminator type that duplicates component names.
        ///
        /// Used to ask whether an entity carries a given kind of data
        /// without naming the component type.
        #[derive(
            Copy,
            Clone,
            Eq,
            PartialEq,
            Ord,
            PartialOrd,
            Hash,
            Debug,
            Display,
            EnumIter,
        )]
        #[strum(serialize_all = "kebab-case")]
        pub enum Capability {
            $($attrname,)+
        }

        impl Capability {
            // Switchboard statement using the discriminator.
            pub(crate) fn is_present(
                self,
                ecs: &hecs::World,
                e: hecs::Entity,
            ) -> bool {
                match self {
                    $(
                        Capability::$attrname =>
                            ecs.satisfies::<&$attrname>(e).unwrap_or(false),
                    )+
                }
            }
        }
    }
}

components! {
    Name,
    Icon,
    Kind,
    Active,
    ActsNext,
    Health,
    Stats,
    Speed,
    Equipment,
    Skills,
    Experience,
    Notice,
    Lootable,
    Gold,
    LastAttack,
    Effects,
    Projectile,
    Ranged,
    Natural,
}

#[derive(Clone, Debug, Eq, PartialEq, Default)]
pub struct Name(pub String);

#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub struct Icon(pub char);

/// What sort of a thing an entity is, drives action dispatch.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Default, Display, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum ActorKind {
    /// Entity with no behavior of its own, its turns pass idle.
    #[default]
    Inert,
    Player,
    Monster,
    Projectile,
    TransientFx,
    Corpse,
    Chest,
}

impl ActorKind {
    /// Solid actors keep others from entering their cell.
    pub fn is_solid(self) -> bool {
        matches!(
            self,
            ActorKind::Player | ActorKind::Monster | ActorKind::Chest
        )
    }

    /// Props sit in the world but never get turns.
    pub fn is_scheduled(self) -> bool {
        !matches!(self, ActorKind::Corpse | ActorKind::Chest)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub struct Kind(pub ActorKind);

/// Inactive entities are skipped by the scheduler and ignored by combat.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub struct Active(pub bool);

/// Time when the actor is scheduled to act next.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub struct ActsNext(pub Instant);

#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub struct Health {
    pub current: i32,
    pub max: i32,
}

impl Health {
    pub fn new(max: i32) -> Self {
        Health { current: max, max }
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub struct Stats {
    /// Character level, caps skill levels.
    pub level: i32,
    pub strength: i32,
    pub dexterity: i32,
    pub agility: i32,
    pub constitution: i32,
}

impl Stats {
    /// Modifier from an attribute value, 10 is average.
    pub fn bonus(attribute: i32) -> i32 {
        (attribute - 10).div_euclid(2)
    }
}

/// Base speed percentage, 100 is normal.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub struct Speed(pub i32);

#[derive(Clone, Debug, Eq, PartialEq, Default, Deref, DerefMut)]
pub struct Equipment(pub BTreeMap<EquipSlot, Item>);

#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub struct Skill {
    pub level: i32,
    pub xp: i32,
    /// Experience needed for the next level.
    pub next: i32,
}

#[derive(Clone, Debug, Eq, PartialEq, Default, Deref, DerefMut)]
pub struct Skills(pub BTreeMap<SkillKind, Skill>);

/// Character experience, the player levels up from slaying monsters.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub struct Experience {
    pub xp: i32,
    pub next: i32,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub struct Notice {
    pub state: Awareness,
    /// Consecutive turns the player has been noticed.
    pub timer: i32,
    pub radius: i32,
    pub delay: i32,
}

/// Gold held by a corpse or a chest.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub struct Lootable {
    pub table: LootTable,
    pub looted: bool,
}

/// Gold carried by the entity (generally just the player).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub struct Gold(pub i32);

/// Wall-clock millisecond time of the last performed attack.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub struct LastAttack(pub Option<u64>);

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ActiveEffect {
    pub effect: Effect,
    /// Turns left.
    pub remaining: i32,
}

/// Status effects on the entity, in order of application.
#[derive(Clone, Debug, Eq, PartialEq, Default, Deref, DerefMut)]
pub struct Effects(pub Vec<ActiveEffect>);

#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub struct Projectile {
    pub origin: IVec2,
    /// Vector from origin to the aim point.
    pub heading: IVec2,
    /// Cells flown so far.
    pub flown: i32,
    pub range: i32,
    pub damage: i32,
    pub accuracy: i32,
    pub shooter: Option<Entity>,
}

/// Ranged attack the entity can make.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub struct Ranged(pub RangedAttack);

/// Unarmed attack of the entity.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub struct Natural {
    pub damage: i32,
    pub on_hit: Option<OnHit>,
}

////////////////////////////////

/// Entity component system. Stores all the data of game entities.
#[derive(Default, Deref, DerefMut)]
pub(crate) struct Ecs(pub(crate) hecs::World);
