//! Static game world data: terrain, levels, rules and content tables.

mod data;
pub use data::{
    Data, Effect, EquipSlot, Item, ItemKind, LootTable, Monster, OnHit,
    RangedAttack, SkillKind, SpawnDist,
};

mod level;
pub use level::{Level, MapGenerator, Prefab, Room};

mod rules;
pub use rules::Rules;

mod tile;
pub use tile::MapTile;
