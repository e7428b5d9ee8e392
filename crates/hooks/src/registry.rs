//! Explicit hook registry.
//!
//! Apps and their hooks are registered once at startup and the registry
//! is passed to whoever dispatches invocations; there is no ambient
//! global lookup of implementation modules.

use std::collections::BTreeMap;

use async_trait::async_trait;

use gantry_codec::Value;

use crate::error::{HookFault, InvokeError};
use crate::signature::HookSignature;

/// A hook implementation. Arguments arrive already decoded, in the
/// signature's declaration order; the returned value is encoded against
/// the signature's return descriptor by the adapter.
#[async_trait]
pub trait HookHandler: Send + Sync {
    async fn invoke(&self, args: Vec<Value>) -> Result<Value, HookFault>;
}

/// A signature paired with its implementation.
pub struct RegisteredHook {
    pub signature: HookSignature,
    pub handler: Box<dyn HookHandler>,
}

/// All hooks of all registered apps, keyed by app id then hook name.
#[derive(Default)]
pub struct HookRegistry {
    apps: BTreeMap<String, BTreeMap<String, RegisteredHook>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a hook under an app id. Re-registering the same hook
    /// name replaces the previous implementation.
    pub fn register(
        &mut self,
        app: impl Into<String>,
        signature: HookSignature,
        handler: impl HookHandler + 'static,
    ) {
        self.apps.entry(app.into()).or_default().insert(
            signature.name.clone(),
            RegisteredHook {
                signature,
                handler: Box::new(handler),
            },
        );
    }

    pub fn apps(&self) -> impl Iterator<Item = &str> {
        self.apps.keys().map(String::as_str)
    }

    pub fn signatures(&self, app: &str) -> Option<Vec<&HookSignature>> {
        self.apps
            .get(app)
            .map(|hooks| hooks.values().map(|h| &h.signature).collect())
    }

    pub(crate) fn hook(&self, app: &str, name: &str) -> Result<&RegisteredHook, InvokeError> {
        let hooks = self
            .apps
            .get(app)
            .ok_or_else(|| InvokeError::UnknownApp(app.to_string()))?;
        hooks.get(name).ok_or_else(|| InvokeError::UnknownHook {
            app: app.to_string(),
            hook: name.to_string(),
        })
    }

    /// Diagnostic JSON listing of every app and hook signature.
    pub fn describe(&self) -> serde_json::Value {
        let apps: Vec<serde_json::Value> = self
            .apps
            .iter()
            .map(|(app, hooks)| {
                let hooks: Vec<serde_json::Value> =
                    hooks.values().map(|h| h.signature.to_json()).collect();
                serde_json::json!({ "app": app, "hooks": hooks })
            })
            .collect();
        serde_json::json!({ "apps": apps })
    }
}
