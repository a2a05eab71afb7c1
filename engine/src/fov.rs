//! Line of sight and the player's field of view.

use util::bresenham_line;
use world::Level;

use crate::{ai::Awareness, prelude::*};

/// Whether the cells between two points are all see-through.
///
/// The end points themselves aren't checked.
pub fn line_of_sight(level: &Level, a: IVec2, b: IVec2) -> bool {
    bresenham_line(a, b)
        .skip(1)
        .all(|p| !level.get(p).blocks_sight())
}

impl Runtime {
    /// Whether `to` is within `radius` of `from` with a clear line of
    /// sight.
    pub fn can_see(&self, from: IVec2, to: IVec2, radius: i32) -> bool {
        (to - from).within_radius(radius)
            && line_of_sight(&self.level, from, to)
    }

    pub fn in_fov(&self, pos: IVec2) -> bool {
        self.fov.contains(&pos)
    }

    /// Cells currently seen by the player.
    pub fn fov(&self) -> impl Iterator<Item = IVec2> + '_ {
        self.fov.iter().copied()
    }

    /// Recompute the player's field of view.
    ///
    /// Monsters that drop out of view forget any suspicion of the player,
    /// hostile ones stay hostile.
    pub(crate) fn update_fov(&mut self) {
        self.fov.clear();
        let Some(origin) = self.player.and_then(|p| p.pos(self)) else {
            return;
        };

        let radius = self.rules.fov_radius;
        for y in -radius..=radius {
            for x in -radius..=radius {
                let pos = origin + ivec2(x, y);
                if self.level.in_bounds(pos)
                    && self.can_see(origin, pos, radius)
                {
                    self.fov.insert(pos);
                }
            }
        }

        let unseen: Vec<Entity> = self
            .monsters()
            .filter(|m| m.pos(self).map_or(true, |p| !self.in_fov(p)))
            .collect();
        for m in unseen {
            if m.awareness(self) == Awareness::Suspicious {
                m.calm_down(self);
            }
        }
    }

    /// Whether the player can see a monster that's out for blood.
    pub fn hostile_in_view(&self) -> bool {
        self.monsters().any(|m| {
            m.awareness(self) == Awareness::Hostile
                && m.pos(self).map_or(false, |p| self.in_fov(p))
        })
    }
}
