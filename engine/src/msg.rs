//! Emitting messages about instant events to the UI layer

use std::sync::mpsc::{self, Sender};

use derive_more::Deref;
use world::{Effect, SkillKind};

use crate::{ai::Awareness, prelude::*};

/// Interface for receiving game event messages for displaying.
#[derive(Clone, Debug, PartialEq)]
pub enum Msg {
    /// Text message.
    Message(String),

    /// Attack landed.
    Hit {
        attacker: Option<Entity>,
        defender: Entity,
        damage: i32,
        blocked: bool,
    },

    /// An attack missed an entity.
    Miss {
        attacker: Option<Entity>,
        defender: Entity,
        dodged: bool,
    },

    /// Entity dies.
    Death(Entity, IVec2),

    /// Entity's skill advanced to a new level.
    SkillUp(Entity, SkillKind, i32),

    /// Player reached a new character level.
    LevelUp(Entity, i32),

    /// Resting healed the entity, the value is its new health.
    Rest(Entity, i32),

    /// Entity picked up gold.
    Loot(Entity, i32),

    EffectApplied(Entity, Effect),

    EffectExpired(Entity, Effect),

    /// Entity shot a projectile towards direction.
    Fire(Entity, IVec2),

    /// Monster's alertness changed.
    Notice(Entity, Awareness),

    /// No monsters are left on the level.
    LevelCleared,
}

/// Sink for game events.
pub trait Hooks {
    fn emit(&mut self, msg: Msg);
}

/// Discard all events.
impl Hooks for () {
    fn emit(&mut self, _msg: Msg) {}
}

impl Hooks for Sender<Msg> {
    fn emit(&mut self, msg: Msg) {
        // Dropping the receiver just means nobody is listening anymore.
        let _ = self.send(msg);
    }
}

#[derive(Deref)]
pub struct Receiver(mpsc::Receiver<Msg>);

/// Make a hooks value for the runtime and the matching receiving end.
pub fn channel() -> (Sender<Msg>, Receiver) {
    let (send, recv) = mpsc::channel();
    (send, Receiver(recv))
}

impl Receiver {
    /// Collect all currently pending messages.
    pub fn drain(&self) -> Vec<Msg> {
        self.0.try_iter().collect()
    }
}

#[macro_export]
macro_rules! msg {
    // NB. Even the simple cases needs to be wrapped in `format!` in case the
    // fmt string is doing named variable capture.
    ($r:expr, $fmt:expr) => {
        $r.emit($crate::Msg::Message(format!($fmt)))
    };

    ($r:expr, $fmt:expr, $($arg:expr),*) => {
        let __txt = format!($fmt, $($arg),*);
        $r.emit($crate::Msg::Message(__txt))
    };
}
