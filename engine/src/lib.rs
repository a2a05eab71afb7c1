//! Game logic layer machinery.

mod ai;
pub use ai::Awareness;

mod clock;
pub use clock::{Clock, ManualClock, SystemClock};

mod combat;
pub use combat::AttackOutcome;

pub mod ecs;
pub use ecs::{ActorKind, Capability};

mod effect;

mod entity;
pub use entity::Entity;

mod fov;
pub use fov::line_of_sight;

mod item;

mod loot;
pub use loot::LootOutcome;

mod mob;

mod msg;
pub use msg::{channel, Hooks, Msg, Receiver};

mod placement;

pub mod prelude;

mod projectile;

mod runtime;
pub use runtime::Runtime;

mod scheduler;
pub use scheduler::Scheduler;

mod skill;

mod spawn;

mod time;
pub use time::Instant;

mod turn;
pub use turn::{Intent, Step};

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum ScenarioStatus {
    Ongoing,
    Lost,
}
