//! Core logic for a client-side custom skin add-on.
//!
//! Lets a player swap their avatar texture for a locally supplied PNG,
//! remembers the choice across launches, and hands a (currently one-way)
//! change notification to the multiplayer sync channel.
//!
//! Everything the host runtime normally provides — texture uploads, event
//! delivery, the network transport, the main-thread scheduler — appears here
//! as an explicit collaborator: the [`skins::TextureSink`] and
//! [`sync::SyncSender`] traits and the [`queue`] module. That keeps the core
//! constructible and testable on its own, with no global state and no hidden
//! initialization order.

pub mod error;
pub mod files;
pub mod image;
pub mod queue;
pub mod settings;
pub mod skins;
pub mod sync;

#[cfg(test)]
mod test_utils;

pub use error::SkinError;
pub use image::SkinImage;
pub use queue::{task_queue, TaskQueue, TaskSender};
pub use settings::{SettingsStore, SkinRecord};
pub use skins::{
    LoadOptions, PlayerId, SkinRegistry, SkinSummary, TextureHandle, TextureSink,
};
pub use sync::{NullSync, SkinChangeRequest, SyncSender};
