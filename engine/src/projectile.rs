//! Missiles in flight.

use util::bresenham_line;
use world::RangedAttack;

use crate::{
    combat::resolve_attack,
    ecs::{Active, Icon, Kind, Name, Projectile, Speed},
    prelude::*,
    Capability,
};

impl Projectile {
    /// The cell the projectile enters next.
    pub fn next_cell(&self) -> IVec2 {
        // Extend the aim line past the target so the missile keeps going if
        // it misses.
        let far = self.origin + self.heading * (self.range + 2);
        bresenham_line(self.origin, far)
            .nth(self.flown as usize + 1)
            .unwrap_or(far)
    }
}

impl Entity {
    /// Shoot a projectile at a target point.
    pub(crate) fn fire(
        &self,
        r: &mut impl AsMut<Runtime>,
        target: IVec2,
        attack: RangedAttack,
    ) -> Option<Entity> {
        let r = r.as_mut();
        let origin = self.pos(r)?;
        let heading = target - origin;
        if heading == IVec2::ZERO || attack.range <= 0 {
            return None;
        }

        let missile = r.spawn((
            Name("arrow".into()),
            Icon('*'),
            Kind(ActorKind::Projectile),
            Active(true),
            Speed(r.rules.projectile_speed),
            Projectile {
                origin,
                heading,
                flown: 0,
                range: attack.range,
                damage: attack.damage,
                accuracy: attack.accuracy,
                shooter: Some(*self),
            },
        ));
        missile.place(r, origin);
        r.schedule(missile, None);

        log::debug!("{self} fires at {target}");
        r.emit(Msg::Fire(*self, heading.to_dir8()));
        Some(missile)
    }

    /// Move a projectile one cell along its flight path.
    pub(crate) fn fly(&self, r: &mut impl AsMut<Runtime>) {
        let r = r.as_mut();
        let mut proj = self.get::<Projectile>(r);
        if !self.has(r, Capability::Projectile) || self.pos(r).is_none() {
            self.vanish(r);
            return;
        }

        let next = proj.next_cell();
        if !r.level.in_bounds(next) || r.level.get(next).blocks_movement() {
            self.vanish(r);
            return;
        }

        if let Some(target) =
            r.blocker_at(next).filter(|&e| Some(e) != proj.shooter)
        {
            if target.is_alive(r) && target.has(r, Capability::Health) {
                resolve_attack(
                    r,
                    proj.shooter,
                    target,
                    proj.accuracy,
                    proj.damage,
                );
            }
            self.vanish(r);
            return;
        }

        self.place(r, next);
        proj.flown += 1;
        if proj.flown >= proj.range {
            self.vanish(r);
        } else {
            self.set(r, proj);
        }
    }

    /// Remove a short-lived actor.
    pub(crate) fn vanish(&self, r: &mut impl AsMut<Runtime>) {
        log::trace!("{self} vanishes");
        self.destroy(r);
    }
}
