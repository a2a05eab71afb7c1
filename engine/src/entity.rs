//! Generic entity logic.
use std::fmt;

use derive_more::Deref;
use hecs::Component;

use crate::{ecs::*, prelude::*};

// Dummy wrapper so we can write impls for it directly instead of deriving a
// trait for hecs::Entity and writing every fn signature twice.
/// Game entity identifier datatype. All the actual contents live in the ECS.
#[derive(
    Copy, Clone, Hash, Eq, Ord, PartialEq, PartialOrd, Debug, Deref,
)]
pub struct Entity(pub(crate) hecs::Entity);

impl Entity {
    pub fn get<T>(&self, r: &impl AsRef<Runtime>) -> T
    where
        T: Component + Clone + Default,
    {
        let r = r.as_ref();
        r.ecs
            .get::<&T>(**self)
            .map(|c| (*c).clone())
            .unwrap_or_default()
    }

    pub(crate) fn set<T>(&self, r: &mut impl AsMut<Runtime>, val: T)
    where
        T: Component + Default + PartialEq,
    {
        let r = r.as_mut();
        if val == T::default() {
            // Remove default values, abstraction layer assumes components are
            // always present but defaulted.
            //
            // Will give an error if the component wasn't there to begin with,
            // just ignore that.
            let _ = r.ecs.remove_one::<T>(**self);
        } else if r.ecs.insert_one(**self, val).is_err() {
            log::warn!("Entity::set: {self} does not exist");
        }
    }

    /// Access a component using a closure.
    ///
    /// Use for complex components that aren't just atomic values.
    pub fn with<T: Component + Default, U>(
        &self,
        r: &impl AsRef<Runtime>,
        f: impl Fn(&T) -> U,
    ) -> U {
        let r = r.as_ref();
        let scratch = T::default();
        if let Ok(c) = r.ecs.get::<&T>(**self) {
            f(&*c)
        } else {
            f(&scratch)
        }
    }

    /// Access and mutate a component using a closure.
    ///
    /// Use for complex components that aren't just atomic values.
    pub(crate) fn with_mut<T: Component + Default + Eq, U>(
        &self,
        r: &mut impl AsMut<Runtime>,
        mut f: impl FnMut(&mut T) -> U,
    ) -> U {
        let r = r.as_mut();
        let mut delete = false;
        let mut insert = false;
        let ret;

        let mut scratch = T::default();
        if let Ok(query) = r.ecs.query_one_mut::<&mut T>(**self) {
            ret = f(&mut *query);
            // We created a default value once, reuse it here.
            if *query == scratch {
                delete = true;
            }
        } else {
            ret = f(&mut scratch);
            if scratch != T::default() {
                insert = true;
            }
        }

        if delete {
            // Component became default value, remove from ECS.
            let _ = r.ecs.remove_one::<T>(**self);
        } else if insert && r.ecs.insert_one(**self, scratch).is_err() {
            log::warn!("Entity::with_mut: {self} does not exist");
        }

        ret
    }

    /// Whether the entity carries the given kind of component.
    pub fn has(&self, r: &impl AsRef<Runtime>, cap: Capability) -> bool {
        let r = r.as_ref();
        cap.is_present(&r.ecs, **self)
    }

    pub fn exists(&self, r: &impl AsRef<Runtime>) -> bool {
        r.as_ref().ecs.contains(**self)
    }

    pub fn pos(&self, r: &impl AsRef<Runtime>) -> Option<IVec2> {
        let r = r.as_ref();
        r.placement.entity_pos(self)
    }

    pub fn place(&self, r: &mut impl AsMut<Runtime>, pos: IVec2) {
        let r = r.as_mut();
        if Some(pos) != r.placement.entity_pos(self) {
            r.placement.insert(pos, *self);
        }
    }

    /// Remove the entity from the world for good.
    ///
    /// Pending scheduler entries are left in place and skipped when they
    /// come up.
    pub fn destroy(&self, r: &mut impl AsMut<Runtime>) {
        let r = r.as_mut();
        r.placement.remove(self);
        let _ = r.ecs.despawn(**self);
    }

    pub fn kind(&self, r: &impl AsRef<Runtime>) -> ActorKind {
        self.get::<Kind>(r).0
    }

    pub fn is_active(&self, r: &impl AsRef<Runtime>) -> bool {
        self.get::<Active>(r).0
    }

    pub fn is_player(&self, r: &impl AsRef<Runtime>) -> bool {
        let r = r.as_ref();
        r.player == Some(*self)
    }

    /// Active entity that keeps others out of its cell.
    pub fn is_solid(&self, r: &impl AsRef<Runtime>) -> bool {
        self.is_active(r) && self.kind(r).is_solid()
    }

    pub fn icon(&self, r: &impl AsRef<Runtime>) -> char {
        match self.get::<Icon>(r) {
            Icon('\0') => '?',
            Icon(c) => c,
        }
    }

    pub fn name(&self, r: &impl AsRef<Runtime>) -> String {
        let name = self.get::<Name>(r).0;
        if name.is_empty() {
            self.kind(r).to_string()
        } else {
            name
        }
    }

    pub fn acts_next(&self, r: &impl AsRef<Runtime>) -> Instant {
        self.get::<ActsNext>(r).0
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0.id())
    }
}
