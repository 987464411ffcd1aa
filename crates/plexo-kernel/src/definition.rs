//! Plugin definitions and the capability traits plugin authors implement.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, OnceLock, RwLock};

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use plexo_core::result::KernelResult;

use crate::context::PluginContext;

/// A plugin's primary entry point.
pub trait Runnable: Send + Sync + fmt::Debug {
    /// Runs the plugin with the given parameters. `event_name` is set when
    /// the run was triggered by an event.
    fn run(
        &self,
        ctx: &PluginContext<'_>,
        params: &Value,
        event_name: Option<&str>,
    ) -> KernelResult<Value>;
}

/// A plugin's message entry point.
pub trait MessageHandler: Send + Sync + fmt::Debug {
    /// Handles a message sent by another plugin. `from_id` is the sender.
    fn on_message(
        &self,
        ctx: &PluginContext<'_>,
        message: &Value,
        from_id: &str,
    ) -> KernelResult<Value>;
}

/// Any additional named member a plugin exposes beyond the two well-known
/// entry points.
pub trait NamedCapability: Send + Sync + fmt::Debug {
    /// Invokes the capability.
    fn invoke(&self, ctx: &PluginContext<'_>, params: &Value) -> KernelResult<Value>;
}

/// Adapter turning a plain closure into a [`Runnable`].
pub struct ClosureRunnable {
    func: RunFn,
}

type RunFn =
    Arc<dyn Fn(&PluginContext<'_>, &Value, Option<&str>) -> KernelResult<Value> + Send + Sync>;

impl ClosureRunnable {
    /// Wraps a closure as a runnable capability.
    pub fn new(
        func: impl Fn(&PluginContext<'_>, &Value, Option<&str>) -> KernelResult<Value>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        Self {
            func: Arc::new(func),
        }
    }
}

impl fmt::Debug for ClosureRunnable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClosureRunnable").finish()
    }
}

impl Runnable for ClosureRunnable {
    fn run(
        &self,
        ctx: &PluginContext<'_>,
        params: &Value,
        event_name: Option<&str>,
    ) -> KernelResult<Value> {
        (self.func)(ctx, params, event_name)
    }
}

/// Adapter turning a plain closure into a [`MessageHandler`].
pub struct ClosureMessageHandler {
    func: MessageFn,
}

type MessageFn =
    Arc<dyn Fn(&PluginContext<'_>, &Value, &str) -> KernelResult<Value> + Send + Sync>;

impl ClosureMessageHandler {
    /// Wraps a closure as a message handler.
    pub fn new(
        func: impl Fn(&PluginContext<'_>, &Value, &str) -> KernelResult<Value> + Send + Sync + 'static,
    ) -> Self {
        Self {
            func: Arc::new(func),
        }
    }
}

impl fmt::Debug for ClosureMessageHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClosureMessageHandler").finish()
    }
}

impl MessageHandler for ClosureMessageHandler {
    fn on_message(
        &self,
        ctx: &PluginContext<'_>,
        message: &Value,
        from_id: &str,
    ) -> KernelResult<Value> {
        (self.func)(ctx, message, from_id)
    }
}

/// Adapter turning a plain closure into a [`NamedCapability`].
pub struct ClosureCapability {
    func: CapabilityFn,
}

type CapabilityFn = Arc<dyn Fn(&PluginContext<'_>, &Value) -> KernelResult<Value> + Send + Sync>;

impl ClosureCapability {
    /// Wraps a closure as a named capability.
    pub fn new(
        func: impl Fn(&PluginContext<'_>, &Value) -> KernelResult<Value> + Send + Sync + 'static,
    ) -> Self {
        Self {
            func: Arc::new(func),
        }
    }
}

impl fmt::Debug for ClosureCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClosureCapability").finish()
    }
}

impl NamedCapability for ClosureCapability {
    fn invoke(&self, ctx: &PluginContext<'_>, params: &Value) -> KernelResult<Value> {
        (self.func)(ctx, params)
    }
}

/// The callable members of a plugin definition.
///
/// Composition fills absent slots from parents; a member the child already
/// defines is never overwritten.
#[derive(Debug, Clone, Default)]
pub struct CapabilitySet {
    /// The `run` entry point, if defined.
    pub run: Option<Arc<dyn Runnable>>,
    /// The `on_message` entry point, if defined.
    pub on_message: Option<Arc<dyn MessageHandler>>,
    /// Open set of additional named members.
    pub named: BTreeMap<String, Arc<dyn NamedCapability>>,
}

impl CapabilitySet {
    /// Whether the `run` entry point is defined.
    pub fn has_run(&self) -> bool {
        self.run.is_some()
    }

    /// Whether the `on_message` entry point is defined.
    pub fn has_on_message(&self) -> bool {
        self.on_message.is_some()
    }

    /// Names of every defined member, sorted, for diagnostics.
    pub fn names(&self) -> Vec<String> {
        let mut names = Vec::new();
        if self.has_run() {
            names.push("run".to_string());
        }
        if self.has_on_message() {
            names.push("on_message".to_string());
        }
        names.extend(self.named.keys().cloned());
        names
    }

    /// Fill every slot the parent defines and this set does not.
    pub(crate) fn fill_from(&mut self, parent: &CapabilitySet) {
        if self.run.is_none() {
            self.run = parent.run.clone();
        }
        if self.on_message.is_none() {
            self.on_message = parent.on_message.clone();
        }
        for (name, capability) in &parent.named {
            self.named
                .entry(name.clone())
                .or_insert_with(|| capability.clone());
        }
    }
}

/// The unit of behavior the kernel hosts.
///
/// Definitions are registered raw and composed at first use: the registry
/// swaps in the composed copy, so once handed out a definition is immutable
/// apart from its runtime configuration cell.
#[derive(Debug)]
pub struct PluginDefinition {
    /// Unique plugin id.
    id: String,
    /// Display label, not required unique.
    name: String,
    /// Parent plugin ids to merge from. Flattened during composition.
    extends: Vec<String>,
    /// The callable members.
    capabilities: CapabilitySet,
    /// Configuration as declared (and, once composed, as merged).
    declared_configuration: Option<Map<String, Value>>,
    /// Runtime configuration, seeded at most once at first use.
    config_cell: OnceLock<RwLock<Map<String, Value>>>,
    /// Whether composition has run for this definition.
    composed: bool,
    /// When the definition was built.
    registered_at: DateTime<Utc>,
}

impl PluginDefinition {
    /// Start building a definition with the given id.
    pub fn builder(id: impl Into<String>) -> DefinitionBuilder {
        DefinitionBuilder::new(id)
    }

    /// Unique plugin id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display label.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parent ids, flattened once composed.
    pub fn extends(&self) -> &[String] {
        &self.extends
    }

    /// The callable members.
    pub fn capabilities(&self) -> &CapabilitySet {
        &self.capabilities
    }

    /// Configuration as declared, or as merged once composed.
    pub fn declared_configuration(&self) -> Option<&Map<String, Value>> {
        self.declared_configuration.as_ref()
    }

    /// Whether composition has run.
    pub fn is_composed(&self) -> bool {
        self.composed
    }

    /// When the definition was built.
    pub fn registered_at(&self) -> DateTime<Utc> {
        self.registered_at
    }

    /// The runtime configuration cell, seeded on first access from the
    /// declared configuration or the baseline template.
    pub(crate) fn configuration_cell(
        &self,
        baseline: &Map<String, Value>,
    ) -> &RwLock<Map<String, Value>> {
        self.config_cell.get_or_init(|| {
            RwLock::new(
                self.declared_configuration
                    .clone()
                    .unwrap_or_else(|| baseline.clone()),
            )
        })
    }

    /// Copy of this definition carrying composition results. The runtime
    /// configuration cell starts fresh; composition runs before first use.
    pub(crate) fn with_composition(
        &self,
        extends: Vec<String>,
        capabilities: CapabilitySet,
        configuration: Option<Map<String, Value>>,
    ) -> PluginDefinition {
        PluginDefinition {
            id: self.id.clone(),
            name: self.name.clone(),
            extends,
            capabilities,
            declared_configuration: configuration,
            config_cell: OnceLock::new(),
            composed: true,
            registered_at: self.registered_at,
        }
    }
}

/// Builder assembling a [`PluginDefinition`] from its parts.
#[derive(Debug, Default)]
pub struct DefinitionBuilder {
    id: String,
    name: Option<String>,
    extends: Vec<String>,
    capabilities: CapabilitySet,
    configuration: Option<Map<String, Value>>,
}

impl DefinitionBuilder {
    /// Start a builder for the given plugin id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Set the display name. Defaults to the id.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Declare the parents to merge from, in precedence order.
    pub fn extends<I, S>(mut self, parents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extends = parents.into_iter().map(Into::into).collect();
        self
    }

    /// Declare the plugin's own configuration.
    pub fn configuration(mut self, configuration: Map<String, Value>) -> Self {
        self.configuration = Some(configuration);
        self
    }

    /// Set the `run` entry point.
    pub fn run(mut self, runnable: impl Runnable + 'static) -> Self {
        self.capabilities.run = Some(Arc::new(runnable));
        self
    }

    /// Set the `run` entry point from a closure.
    pub fn run_fn(
        self,
        func: impl Fn(&PluginContext<'_>, &Value, Option<&str>) -> KernelResult<Value>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        self.run(ClosureRunnable::new(func))
    }

    /// Set the `on_message` entry point.
    pub fn on_message(mut self, handler: impl MessageHandler + 'static) -> Self {
        self.capabilities.on_message = Some(Arc::new(handler));
        self
    }

    /// Set the `on_message` entry point from a closure.
    pub fn on_message_fn(
        self,
        func: impl Fn(&PluginContext<'_>, &Value, &str) -> KernelResult<Value> + Send + Sync + 'static,
    ) -> Self {
        self.on_message(ClosureMessageHandler::new(func))
    }

    /// Add a named capability.
    pub fn capability(mut self, name: impl Into<String>, capability: impl NamedCapability + 'static) -> Self {
        self.capabilities.named.insert(name.into(), Arc::new(capability));
        self
    }

    /// Add a named capability from a closure.
    pub fn capability_fn(
        self,
        name: impl Into<String>,
        func: impl Fn(&PluginContext<'_>, &Value) -> KernelResult<Value> + Send + Sync + 'static,
    ) -> Self {
        self.capability(name, ClosureCapability::new(func))
    }

    /// Finish the definition.
    pub fn build(self) -> PluginDefinition {
        let name = self.name.unwrap_or_else(|| self.id.clone());
        PluginDefinition {
            id: self.id,
            name,
            extends: self.extends,
            capabilities: self.capabilities,
            declared_configuration: self.configuration,
            config_cell: OnceLock::new(),
            composed: false,
            registered_at: Utc::now(),
        }
    }
}
