//! # plexo-plugin-sdk
//!
//! SDK for developing plugins for the Plexo kernel.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use plexo_plugin_sdk::prelude::*;
//!
//! pub fn install(hub: &PluginHub) -> KernelResult<()> {
//!     hub.register(
//!         PluginDefinition::builder("greeter")
//!             .name("Greeter")
//!             .run_fn(|_ctx, params, _event| {
//!                 Ok(json!({ "greeting": format!("hello, {}", params["who"]) }))
//!             })
//!             .on_message_fn(|_ctx, message, from_id| {
//!                 Ok(json!({ "heard": message, "from": from_id }))
//!             })
//!             .build(),
//!     )
//! }
//! ```

pub mod harness;

/// Prelude for convenient imports.
pub mod prelude {
    pub use serde_json::{Map, Value, json};

    pub use plexo_core::error::codes;
    pub use plexo_core::types::{Envelope, ErrorBody, HandlerId, Message};
    pub use plexo_core::{KernelError, KernelResult};

    pub use plexo_kernel::context::PluginContext;
    pub use plexo_kernel::definition::{
        CapabilitySet, DefinitionBuilder, MessageHandler, NamedCapability, PluginDefinition,
        Runnable,
    };
    pub use plexo_kernel::hub::PluginHub;
    pub use plexo_kernel::pipeline::LifecycleEvent;
    pub use plexo_kernel::registry::{PluginInfo, PluginRegistry};

    pub use crate::harness::TestHub;
}
