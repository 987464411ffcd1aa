//! Host bridge trait, the kernel's only boundary with the outside world.

/// The host boundary the kernel calls through.
///
/// Each operation accepts one serialized request object and, where the
/// protocol defines a response, returns one serialized response object.
/// Both are opaque strings at this boundary; [`crate::protocol`] defines
/// the request shapes and [`crate::types::Envelope`] the response shape.
/// Every call blocks until its response is available.
pub trait Bridge: Send + Sync + std::fmt::Debug + 'static {
    /// Store a value in the host value store. Responds with an envelope.
    fn set_value(&self, request: &str) -> String;

    /// Read a value from the host value store. Responds with `{value}` or an
    /// error envelope.
    fn get_value(&self, request: &str) -> String;

    /// Destroy one value in the host value store. No response.
    fn destroy_value(&self, request: &str);

    /// Destroy every value scoped to a plugin. No response.
    fn clear_values(&self, request: &str);

    /// Deliver a message to plugins outside this process. Responds with
    /// `{data: {recipient_id: response}}` or an error envelope.
    fn send_message(&self, request: &str) -> String;

    /// Fire an event on the host event bus. Responds with the listeners'
    /// aggregated payload or an error envelope.
    fn fire(&self, request: &str) -> String;

    /// Run a plugin reachable only through the host. Responds with the
    /// plugin's payload or an error envelope.
    fn run_plugin(&self, request: &str) -> String;

    /// Remove a plugin from the host. No response.
    fn remove(&self, request: &str);

    /// Remove every event listener scoped to a plugin. No response.
    fn remove_events(&self, request: &str);
}
