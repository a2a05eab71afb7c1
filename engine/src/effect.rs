//! Status effects that run on game turns.

use world::Effect;

use crate::{
    ecs::{ActiveEffect, Effects},
    prelude::*,
    Capability,
};

impl Entity {
    /// Put a status effect on the entity for a number of turns.
    ///
    /// An effect of the same kind is replaced and keeps the longer of the
    /// two durations.
    pub fn apply_effect(
        &self,
        r: &mut impl AsMut<Runtime>,
        effect: Effect,
        duration: i32,
    ) {
        let r = r.as_mut();
        if duration <= 0 || !self.is_alive(r) {
            return;
        }

        self.with_mut::<Effects, _>(r, |es| {
            let existing = es.iter_mut().find(|e| e.effect.same_kind(&effect));
            if let Some(e) = existing {
                e.effect = effect;
                e.remaining = e.remaining.max(duration);
            } else {
                es.push(ActiveEffect {
                    effect,
                    remaining: duration,
                });
            }
        });

        r.afflicted.insert(*self);
        log::debug!("{self} is affected by {effect} for {duration} turns");
        r.emit(Msg::EffectApplied(*self, effect));
    }

    pub fn effects(&self, r: &impl AsRef<Runtime>) -> Vec<ActiveEffect> {
        self.get::<Effects>(r).0
    }

    pub fn is_stunned(&self, r: &impl AsRef<Runtime>) -> bool {
        self.with::<Effects, _>(r, |es| {
            es.iter().any(|e| e.effect == Effect::Stun)
        })
    }
}

impl Runtime {
    /// Run one game turn of status effects on every afflicted entity.
    pub(crate) fn tick_effects(&mut self) {
        let afflicted: Vec<Entity> = self.afflicted.iter().copied().collect();

        for e in afflicted {
            if !e.is_alive(self) || !e.has(self, Capability::Effects) {
                self.afflicted.shift_remove(&e);
                continue;
            }

            for ae in e.effects(self) {
                match ae.effect {
                    Effect::Poison(n) => {
                        e.take_damage(self, n);
                    }
                    Effect::Regen(n) => {
                        e.heal(self, n);
                    }
                    _ => {}
                }
                if !e.is_alive(self) {
                    break;
                }
            }

            // Died of poison.
            if !e.exists(self) {
                self.afflicted.shift_remove(&e);
                continue;
            }

            let mut expired = Vec::new();
            e.with_mut::<Effects, _>(self, |es| {
                for ae in es.iter_mut() {
                    ae.remaining -= 1;
                }
                es.retain(|ae| {
                    if ae.remaining <= 0 {
                        expired.push(ae.effect);
                        false
                    } else {
                        true
                    }
                });
            });

            for effect in expired {
                log::debug!("{effect} wore off {e}");
                self.emit(Msg::EffectExpired(e, effect));
            }

            if !e.has(self, Capability::Effects) {
                self.afflicted.shift_remove(&e);
            }
        }
    }

    /// Tick effects for every turn boundary crossed since the last call.
    pub(crate) fn update_effects(&mut self) {
        let turn = self.now().turn(self.rules.turn_length);
        while self.effect_turn < turn {
            self.effect_turn += 1;
            self.tick_effects();
        }
    }
}

#[cfg(test)]
mod test {
    use world::Level;

    use super::*;
    use crate::ecs::{Active, Health, Speed};

    fn subject(r: &mut Runtime) -> Entity {
        let e = r.spawn((Active(true), Health::new(10), Speed(100)));
        e.place(r, ivec2(0, 0));
        e
    }

    #[test]
    fn effects_expire() {
        let mut r = Runtime::new(Level::new(2, 2));
        let (hooks, recv) = crate::channel();
        r = r.with_hooks(hooks);
        let e = subject(&mut r);

        e.apply_effect(&mut r, Effect::Poison(2), 2);
        e.apply_effect(&mut r, Effect::Slow(50), 1);
        assert_eq!(e.action_delay(&r), 200);

        r.tick_effects();
        assert_eq!(e.health(&r).current, 8);
        assert_eq!(e.effects(&r).len(), 1);
        assert_eq!(e.action_delay(&r), 100);

        r.tick_effects();
        assert_eq!(e.health(&r).current, 6);
        assert!(e.effects(&r).is_empty());
        assert!(r.afflicted.is_empty());

        let expired: Vec<Msg> = recv
            .drain()
            .into_iter()
            .filter(|m| matches!(m, Msg::EffectExpired(..)))
            .collect();
        assert_eq!(
            expired,
            vec![
                Msg::EffectExpired(e, Effect::Slow(50)),
                Msg::EffectExpired(e, Effect::Poison(2))
            ]
        );
    }

    #[test]
    fn reapply_refreshes() {
        let mut r = Runtime::new(Level::new(2, 2));
        let e = subject(&mut r);

        e.apply_effect(&mut r, Effect::Haste(50), 5);
        e.apply_effect(&mut r, Effect::Haste(20), 2);
        assert_eq!(
            e.effects(&r),
            vec![ActiveEffect {
                effect: Effect::Haste(20),
                remaining: 5
            }]
        );

        e.apply_effect(&mut r, Effect::Haste(20), 8);
        assert_eq!(e.effects(&r)[0].remaining, 8);
    }

    #[test]
    fn poison_kills() {
        let mut r = Runtime::new(Level::new(2, 2));
        let e = subject(&mut r);
        e.apply_effect(&mut r, Effect::Poison(6), 3);
        e.apply_effect(&mut r, Effect::Regen(1), 3);

        r.tick_effects();
        assert_eq!(e.health(&r).current, 5);
        r.tick_effects();
        assert!(!e.exists(&r));
        assert!(r.afflicted.is_empty());
    }
}
