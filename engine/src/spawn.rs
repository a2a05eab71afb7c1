//! Creating entities and populating levels.

use anyhow::{anyhow, bail};
use rand::distributions::{Distribution, WeightedIndex};
use world::{LootTable, Monster, SpawnDist};

use crate::{ai::Awareness, ecs::*, prelude::*};

impl Runtime {
    /// Spawns a new player entity if there isn't currently a player.
    pub fn spawn_player(&mut self, pos: IVec2) -> Entity {
        if let Some(player) = self.player.filter(|p| p.exists(self)) {
            return player;
        }

        let attr = self.rules.player_attribute;
        let player = self.spawn((
            Name("player".into()),
            Icon('@'),
            Kind(ActorKind::Player),
            Active(true),
            Health::new(self.rules.player_health),
            Stats {
                level: 1,
                strength: attr,
                dexterity: attr,
                agility: attr,
                constitution: attr,
            },
            Speed(100),
            Skills::default(),
            Experience {
                xp: 0,
                next: self.rules.xp_per_level,
            },
            Natural {
                damage: 1,
                on_hit: None,
            },
        ));

        self.player = Some(player);
        player.place(self, pos);
        self.schedule(player, None);
        player
    }

    /// Spawn a monster from the bestiary.
    pub fn spawn_monster(
        &mut self,
        name: &str,
        pos: IVec2,
    ) -> anyhow::Result<Entity> {
        let monster = self
            .data
            .bestiary
            .get(name)
            .cloned()
            .ok_or_else(|| anyhow!("Unknown monster {name:?}"))?;
        Ok(self.spawn_monster_from(name, &monster, pos))
    }

    pub fn spawn_monster_from(
        &mut self,
        name: &str,
        monster: &Monster,
        pos: IVec2,
    ) -> Entity {
        let e = self.spawn((
            Name(name.into()),
            Icon(monster.icon),
            Kind(ActorKind::Monster),
            Active(true),
            Health::new(monster.health),
            Stats {
                level: monster.level,
                strength: monster.strength,
                dexterity: monster.dexterity,
                agility: monster.agility,
                constitution: monster.constitution,
            },
            Speed(monster.speed),
            Skills::default(),
            Notice {
                state: Awareness::Unaware,
                timer: 0,
                radius: monster.alert_radius,
                delay: monster.notice_delay,
            },
            Lootable {
                table: monster.gold,
                looted: false,
            },
            Natural {
                damage: monster.damage,
                on_hit: monster.on_hit,
            },
        ));
        if let Some(ranged) = monster.ranged {
            e.set(self, Ranged(ranged));
        }

        for item in self.data.gear(monster) {
            e.equip(self, item);
        }

        e.place(self, pos);
        self.schedule(e, None);
        // A new monster means the level needs clearing again.
        self.cleared = false;
        e
    }

    pub fn spawn_chest(&mut self, pos: IVec2, table: LootTable) -> Entity {
        let e = self.spawn((
            Name("chest".into()),
            Icon('='),
            Kind(ActorKind::Chest),
            Active(true),
            Lootable {
                table,
                looted: false,
            },
        ));
        e.place(self, pos);
        e
    }

    pub(crate) fn spawn_corpse(
        &mut self,
        pos: IVec2,
        name: impl Into<String>,
        table: LootTable,
    ) -> Entity {
        let e = self.spawn((
            Name(name.into()),
            Icon('%'),
            Kind(ActorKind::Corpse),
            Active(true),
            Lootable {
                table,
                looted: false,
            },
        ));
        e.place(self, pos);
        e
    }

    /// Spawn a momentary visual effect marker.
    pub(crate) fn spawn_fx(&mut self, pos: IVec2) -> Entity {
        let e = self.spawn((
            Icon('*'),
            Kind(ActorKind::TransientFx),
            Active(true),
        ));
        e.place(self, pos);
        let delay = self.rules.min_action_delay;
        self.schedule(e, Some(delay));
        e
    }

    /// Spawn the player and monsters into the level's rooms.
    ///
    /// The player starts at the level entrance or in the middle of the
    /// first room. Every other room gets one monster drawn by rarity and
    /// maybe a chest.
    pub fn populate(&mut self) -> anyhow::Result<Entity> {
        let rooms = self.level.rooms().to_vec();
        let Some(first) = rooms.first() else {
            bail!("Level has no rooms");
        };
        let start = self.level.entrance().unwrap_or(first.center());
        let player = self.spawn_player(start);

        for name in ["short sword", "leather armor"] {
            if let Some(item) = self.data.armory.get(name).cloned() {
                player.equip(self, item);
            }
        }

        let bestiary: Vec<(String, Monster)> = self
            .data
            .bestiary
            .iter()
            .filter(|(_, m)| m.spawn_weight() > 0.0)
            .map(|(n, m)| (n.clone(), m.clone()))
            .collect();
        let dist =
            WeightedIndex::new(bestiary.iter().map(|(_, m)| m.spawn_weight()))?;

        for room in rooms.iter().filter(|a| !a.contains(start)) {
            let center = room.center();
            let pos = if self.is_open(center) {
                Some(center)
            } else {
                room.cells().find(|&p| self.is_open(p))
            };
            let Some(pos) = pos else {
                log::warn!("Runtime::populate: room {room:?} has no space");
                continue;
            };

            let (name, monster) = &bestiary[dist.sample(&mut self.rng)];
            self.spawn_monster_from(name, monster, pos);

            if self.rng.percent_chance(self.rules.chest_chance) {
                let table = LootTable::new(
                    self.rules.chest_gold_min,
                    self.rules.chest_gold_max,
                );
                if let Some(pos) = room.cells().find(|&p| self.is_open(p)) {
                    self.spawn_chest(pos, table);
                }
            }
        }

        log::info!(
            "Populated level with {} monsters",
            self.monsters().count()
        );
        Ok(player)
    }
}
