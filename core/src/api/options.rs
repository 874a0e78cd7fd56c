//! Configuration options for an environment.

use crate::callback::TRAMPOLINE_NAME;

/// Configuration options for an [`Environment`](super::Environment).
///
/// # Example
///
/// ```
/// use rulebridge_core::api::BridgeOptions;
///
/// let options = BridgeOptions {
///     default_module: Some("MAIN".into()),
///     ..BridgeOptions::default()
/// };
/// assert_eq!(options.trampoline_name, "host-function");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeOptions {
    /// Name under which the trampoline is registered with the engine.
    ///
    /// Default: `"host-function"`
    pub trampoline_name: String,

    /// Whether extraction resolves instance names and references.
    ///
    /// Default: true
    pub extract_references: bool,

    /// Module scope for instance name lookups during extraction.
    ///
    /// Default: None (the current module)
    pub default_module: Option<String>,
}

impl Default for BridgeOptions {
    fn default() -> Self {
        Self {
            trampoline_name: TRAMPOLINE_NAME.into(),
            extract_references: true,
            default_module: None,
        }
    }
}
