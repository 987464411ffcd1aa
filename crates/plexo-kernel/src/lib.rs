//! # plexo-kernel
//!
//! The Plexo plugin kernel. Provides:
//!
//! - Plugin registry with compose-at-first-use extends flattening
//! - Explicit per-invocation plugin contexts
//! - Fail-soft value proxy over the bridge value store
//! - Local-first message router with one batched bridge fallback
//! - Before / in-process / after invocation pipeline

pub mod compose;
pub mod context;
pub mod definition;
pub mod hub;
pub mod pipeline;
pub mod registry;
mod router;
mod values;

pub use context::PluginContext;
pub use definition::{
    CapabilitySet, DefinitionBuilder, MessageHandler, NamedCapability, PluginDefinition, Runnable,
};
pub use hub::PluginHub;
pub use pipeline::LifecycleEvent;
pub use registry::{PluginInfo, PluginRegistry};
