//! The invocation adapter: decode payloads, invoke, encode the result.

use std::collections::BTreeMap;

use gantry_codec::{decode_document, encode_document};

use crate::error::InvokeError;
use crate::registry::HookRegistry;

/// Invoke a registered hook.
///
/// Each declared parameter is decoded from its payload against its
/// descriptor, in declaration order; any decode failure aborts before
/// the hook runs. The hook's result is encoded against the return
/// descriptor and returned as interchange text.
pub async fn invoke(
    registry: &HookRegistry,
    app: &str,
    hook: &str,
    payloads: &BTreeMap<String, String>,
) -> Result<String, InvokeError> {
    let registered = registry.hook(app, hook)?;
    let signature = &registered.signature;

    let mut args = Vec::with_capacity(signature.params.len());
    for (name, descriptor) in &signature.params {
        let payload = payloads
            .get(name)
            .ok_or_else(|| InvokeError::MissingParameter(name.clone()))?;
        let value = decode_document(payload, Some(descriptor)).map_err(|source| {
            InvokeError::InvalidParameter {
                name: name.clone(),
                source,
            }
        })?;
        args.push(value);
    }

    let result = registered
        .handler
        .invoke(args)
        .await
        .map_err(|source| InvokeError::HookFailed {
            hook: hook.to_string(),
            source,
        })?;

    encode_document(&result, Some(&signature.returns)).map_err(|source| {
        InvokeError::ResultEncode {
            hook: hook.to_string(),
            source,
        }
    })
}
