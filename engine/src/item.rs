//! Equipment handling.

use world::{EquipSlot, Item, OnHit, SkillKind};

use crate::{
    ecs::{Equipment, Natural},
    prelude::*,
};

impl Entity {
    /// Equip an item in its nominal slot, return what was there before.
    ///
    /// Rings go to the first free ring slot.
    pub fn equip(
        &self,
        r: &mut impl AsMut<Runtime>,
        item: Item,
    ) -> Option<Item> {
        let r = r.as_mut();
        let mut slot = item.slot();
        let ring_taken = self.equipped(r, EquipSlot::Ring1).is_some();
        if slot == EquipSlot::Ring1 && ring_taken {
            slot = EquipSlot::Ring2;
        }
        self.equip_at(r, slot, item)
    }

    /// Equip an item in any slot.
    ///
    /// Slots are advisory, combat only cares about what's in the main hand,
    /// whether the off hand holds a shield and what armor pieces are worn.
    pub fn equip_at(
        &self,
        r: &mut impl AsMut<Runtime>,
        slot: EquipSlot,
        item: Item,
    ) -> Option<Item> {
        let r = r.as_mut();
        log::debug!("{self} equips {item} in {slot}");
        self.with_mut::<Equipment, _>(r, |eq| eq.insert(slot, item.clone()))
    }

    pub fn unequip(
        &self,
        r: &mut impl AsMut<Runtime>,
        slot: EquipSlot,
    ) -> Option<Item> {
        self.with_mut::<Equipment, _>(r, |eq| eq.remove(&slot))
    }

    pub fn equipped(
        &self,
        r: &impl AsRef<Runtime>,
        slot: EquipSlot,
    ) -> Option<Item> {
        self.with::<Equipment, _>(r, |eq| eq.get(&slot).cloned())
    }

    pub fn weapon(&self, r: &impl AsRef<Runtime>) -> Option<Item> {
        self.equipped(r, EquipSlot::MainHand)
    }

    /// Skill used for attacks with the current weapon.
    pub fn weapon_skill(&self, r: &impl AsRef<Runtime>) -> SkillKind {
        self.weapon(r)
            .and_then(|w| w.kind.weapon_skill())
            .unwrap_or(SkillKind::Unarmed)
    }

    /// Damage of the wielded weapon or the natural attack.
    pub fn weapon_damage(&self, r: &impl AsRef<Runtime>) -> i32 {
        match self.weapon(r) {
            Some(w) => w.damage,
            None => self.get::<Natural>(r).damage,
        }
    }

    /// Weapon speed percentage, unarmed attacks are normal speed.
    pub fn weapon_speed(&self, r: &impl AsRef<Runtime>) -> i32 {
        self.weapon(r).map_or(100, |w| w.speed)
    }

    pub fn weapon_on_hit(&self, r: &impl AsRef<Runtime>) -> Option<OnHit> {
        match self.weapon(r) {
            Some(w) => w.on_hit,
            None => self.get::<Natural>(r).on_hit,
        }
    }

    pub fn has_shield(&self, r: &impl AsRef<Runtime>) -> bool {
        self.equipped(r, EquipSlot::OffHand)
            .map_or(false, |i| i.kind.is_shield())
    }

    /// Total defense of worn armor pieces.
    pub fn armor_defense(&self, r: &impl AsRef<Runtime>) -> i32 {
        self.with::<Equipment, _>(r, |eq| {
            eq.values()
                .filter(|i| i.kind.is_armor_piece())
                .map(|i| i.defense)
                .sum()
        })
    }
}
