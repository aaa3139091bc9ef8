//! Dispatcher configuration

use serde::Deserialize;

use crate::binding::{KeyBinding, PointerBinding};
use crate::error::Result;

/// Runtime flags of a dispatcher
///
/// Every field is optional when deserializing:
///
/// ```toml
/// debug = true
/// allow_key_repeat = false
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ControlsFlags {
    /// Emit a trace for every event
    pub debug: bool,
    /// Invoke callbacks at all
    pub enabled: bool,
    /// Fire press callbacks again while a key stays held
    pub allow_key_repeat: bool,
}

impl Default for ControlsFlags {
    fn default() -> Self {
        Self {
            debug: false,
            enabled: true,
            allow_key_repeat: false,
        }
    }
}

impl ControlsFlags {
    /// Parse flags from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

/// Construction-time configuration of a [`ControlsManager`](crate::ControlsManager)
///
/// Key binding order is priority order: when two key bindings share a key,
/// the earlier one shadows the later one. Pointer bindings never shadow each
/// other; every binding on a target fires, in binding order.
pub struct ControlsConfig<C> {
    /// Emit a trace for every event
    pub debug: bool,
    /// Invoke callbacks at all
    pub enabled: bool,
    /// Fire press callbacks again while a key stays held
    pub allow_key_repeat: bool,
    /// Value passed to every key callback
    pub context: C,
    /// Key bindings in priority order
    pub key_maps: Vec<KeyBinding<C>>,
    /// Pointer bindings, all of which fire for their target
    pub pointer_maps: Vec<PointerBinding>,
}

impl<C: Default> Default for ControlsConfig<C> {
    fn default() -> Self {
        Self::new(C::default())
    }
}

impl<C> ControlsConfig<C> {
    /// Create a configuration with default flags around `context`
    pub fn new(context: C) -> Self {
        let flags = ControlsFlags::default();
        Self {
            debug: flags.debug,
            enabled: flags.enabled,
            allow_key_repeat: flags.allow_key_repeat,
            context,
            key_maps: Vec::new(),
            pointer_maps: Vec::new(),
        }
    }

    /// Set whether to trace every event
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Set whether callbacks fire on startup
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set whether held keys fire their press callback repeatedly
    pub fn allow_key_repeat(mut self, allow: bool) -> Self {
        self.allow_key_repeat = allow;
        self
    }

    /// Apply all three flags at once
    pub fn flags(mut self, flags: ControlsFlags) -> Self {
        self.debug = flags.debug;
        self.enabled = flags.enabled;
        self.allow_key_repeat = flags.allow_key_repeat;
        self
    }

    /// Replace the context
    pub fn context(mut self, context: C) -> Self {
        self.context = context;
        self
    }

    /// Append a key binding
    pub fn key_map(mut self, binding: KeyBinding<C>) -> Self {
        self.key_maps.push(binding);
        self
    }

    /// Append several key bindings, keeping their order
    pub fn key_maps(mut self, bindings: impl IntoIterator<Item = KeyBinding<C>>) -> Self {
        self.key_maps.extend(bindings);
        self
    }

    /// Append a pointer binding
    pub fn pointer_map(mut self, binding: PointerBinding) -> Self {
        self.pointer_maps.push(binding);
        self
    }

    /// Append several pointer bindings, keeping their order
    pub fn pointer_maps(mut self, bindings: impl IntoIterator<Item = PointerBinding>) -> Self {
        self.pointer_maps.extend(bindings);
        self
    }

    /// Current flag values
    pub fn current_flags(&self) -> ControlsFlags {
        ControlsFlags {
            debug: self.debug,
            enabled: self.enabled,
            allow_key_repeat: self.allow_key_repeat,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ControlsError;
    use controls_platform::TargetId;

    #[test]
    fn test_config_defaults() {
        let config: ControlsConfig<()> = ControlsConfig::default();

        assert!(!config.debug);
        assert!(config.enabled);
        assert!(!config.allow_key_repeat);
        assert!(config.key_maps.is_empty());
        assert!(config.pointer_maps.is_empty());
    }

    #[test]
    fn test_config_builder_keeps_order() {
        let config = ControlsConfig::new(0u8)
            .key_map(KeyBinding::new("KeyA"))
            .key_maps([KeyBinding::new("KeyB"), KeyBinding::new("KeyC")])
            .pointer_map(PointerBinding::new(TargetId::new(1)))
            .debug(true);

        let keys: Vec<&str> = config.key_maps.iter().map(|b| b.key().as_str()).collect();
        assert_eq!(keys, vec!["KeyA", "KeyB", "KeyC"]);
        assert_eq!(config.pointer_maps.len(), 1);
        assert!(config.current_flags().debug);
    }

    #[test]
    fn test_flags_from_toml_partial() {
        let flags = ControlsFlags::from_toml_str("debug = true").unwrap();
        assert_eq!(
            flags,
            ControlsFlags {
                debug: true,
                enabled: true,
                allow_key_repeat: false,
            }
        );

        let empty = ControlsFlags::from_toml_str("").unwrap();
        assert_eq!(empty, ControlsFlags::default());
    }

    #[test]
    fn test_flags_from_toml_rejects_wrong_type() {
        let err = ControlsFlags::from_toml_str("enabled = \"yes\"").unwrap_err();
        assert!(matches!(err, ControlsError::Config(_)));
        assert!(err.to_string().starts_with("Invalid controls configuration"));
    }

    #[test]
    fn test_flags_applied_to_config() {
        let flags = ControlsFlags {
            debug: true,
            enabled: false,
            allow_key_repeat: true,
        };
        let config: ControlsConfig<()> = ControlsConfig::default().flags(flags);
        assert_eq!(config.current_flags(), flags);
    }
}
