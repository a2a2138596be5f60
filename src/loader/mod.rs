//! Content sources and world setup
//!
//! Asset packs, localized text, and the initializer that turns a finalized
//! configuration into the tick-0 world.

pub mod assets;
pub mod dictionary;
pub mod world_init;

pub use assets::{AssetLoader, BuiltinAssets, ContentPack};
pub use dictionary::{Dictionary, EnglishDictionary};
pub use world_init::WorldInitializer;
