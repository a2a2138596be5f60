//! Core simulation types and entities

pub mod colony;
pub mod creep;
pub mod entity;
pub mod resource;
pub mod types;

pub use colony::{Colony, Priorities};
pub use creep::{Creep, CreepBase};
pub use entity::{EntityId, EntityStore, SimEntity};
pub use resource::ResourceNode;
pub use types::{ContentName, Pos};

/// Colonies are the actors that replay actions refer to
pub type ActorId = EntityId;
