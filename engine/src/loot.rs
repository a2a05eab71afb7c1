//! Looting corpses and chests.

use crate::{
    ecs::{Gold, Icon, Lootable},
    prelude::*,
    Capability,
};

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum LootOutcome {
    /// Nothing to loot, or it was already looted.
    Nothing,
    Gold(i32),
}

impl Entity {
    /// Whether there's still something to take from the entity.
    ///
    /// Monsters carry their loot table but can't be looted before they
    /// leave a corpse.
    pub fn is_lootable(&self, r: &impl AsRef<Runtime>) -> bool {
        matches!(self.kind(r), ActorKind::Corpse | ActorKind::Chest)
            && self.has(r, Capability::Lootable)
            && !self.get::<Lootable>(r).looted
    }

    /// Take the contents of a corpse or a chest.
    ///
    /// Looting is idempotent, a looted corpse is gone from the world and a
    /// looted chest stays empty.
    pub fn loot(
        &self,
        r: &mut impl AsMut<Runtime>,
        looter: Entity,
    ) -> LootOutcome {
        let r = r.as_mut();
        if !self.is_lootable(r) {
            return LootOutcome::Nothing;
        }

        let mut lootable = self.get::<Lootable>(r);
        let table = lootable.table;
        let gold = r.rng.between(table.gold_min, table.gold_max).max(0);

        let purse = looter.get::<Gold>(r).0;
        looter.set(r, Gold(purse + gold));
        lootable.looted = true;
        self.set(r, lootable);

        log::debug!("{looter} looted {gold} gold from {}", self.name(r));
        r.emit(Msg::Loot(looter, gold));
        msg!(r, "Found {gold} gold.");

        match self.kind(r) {
            ActorKind::Corpse => self.destroy(r),
            ActorKind::Chest => self.set(r, Icon('_')),
            _ => {}
        }

        LootOutcome::Gold(gold)
    }

    pub fn gold(&self, r: &impl AsRef<Runtime>) -> i32 {
        self.get::<Gold>(r).0
    }
}

#[cfg(test)]
mod test {
    use rand::rngs::mock::StepRng;
    use world::{Level, LootTable};

    use super::*;

    #[test]
    fn loot_once() {
        let mut r =
            Runtime::new(Level::new(4, 4)).with_rng(StepRng::new(0, 0));
        let player = r.spawn_player(ivec2(1, 1));
        let corpse =
            r.spawn_corpse(ivec2(1, 1), "rat corpse", LootTable::new(3, 9));
        let chest = r.spawn_chest(ivec2(2, 1), LootTable::new(5, 5));

        assert!(corpse.is_lootable(&r));
        assert_eq!(corpse.loot(&mut r, player), LootOutcome::Gold(3));
        assert!(!corpse.exists(&r));
        assert_eq!(corpse.loot(&mut r, player), LootOutcome::Nothing);

        assert_eq!(chest.loot(&mut r, player), LootOutcome::Gold(5));
        assert!(chest.exists(&r));
        assert_eq!(chest.loot(&mut r, player), LootOutcome::Nothing);

        assert_eq!(player.gold(&r), 8);
        // Live things don't have loot.
        assert_eq!(player.loot(&mut r, player), LootOutcome::Nothing);
    }
}
