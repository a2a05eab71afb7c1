pub use crate::{
    msg, ActorKind, Entity, Hooks, Instant, Intent, Msg, Runtime,
    ScenarioStatus, Step,
};
pub use glam::{ivec2, IVec2};
pub use util::{
    HashMap, HashSet, IndexMap, IndexSet, RngExt, VecExt, DIR_4, DIR_8,
};
