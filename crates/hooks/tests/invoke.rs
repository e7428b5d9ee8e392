//! Adapter behavior: argument order, abort-before-invoke, and fault
//! categories.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use gantry_codec::{encode_document, Descriptor, Value};
use gantry_hooks::{
    invoke, FaultCategory, HookFault, HookHandler, HookRegistry, HookSignature, InvokeError,
};

/// Adds an integer count of exclamation marks to a greeting.
struct Shout;

#[async_trait]
impl HookHandler for Shout {
    async fn invoke(&self, args: Vec<Value>) -> Result<Value, HookFault> {
        let mut args = args.into_iter();
        let who = args
            .next()
            .and_then(|v| v.as_text().map(str::to_string))
            .ok_or_else(|| HookFault::new("expected text argument"))?;
        let times = args
            .next()
            .and_then(|v| v.as_int())
            .ok_or_else(|| HookFault::new("expected int argument"))?;
        Ok(Value::Text(format!(
            "{}{}",
            who,
            "!".repeat(times.max(0) as usize)
        )))
    }
}

/// Always raises, counting how often it was reached.
struct Failing(Arc<AtomicUsize>);

#[async_trait]
impl HookHandler for Failing {
    async fn invoke(&self, _args: Vec<Value>) -> Result<Value, HookFault> {
        self.0.fetch_add(1, Ordering::SeqCst);
        Err(HookFault::new("boom"))
    }
}

fn registry(invocations: Arc<AtomicUsize>) -> HookRegistry {
    let mut registry = HookRegistry::new();
    registry.register(
        "demo",
        HookSignature::new("shout", Descriptor::text())
            .param("who", Descriptor::text())
            .param("times", Descriptor::int()),
        Shout,
    );
    registry.register(
        "demo",
        HookSignature::new("explode", Descriptor::text()).param("arg", Descriptor::int()),
        Failing(invocations),
    );
    registry
}

fn payload(value: &Value, descriptor: &Descriptor) -> String {
    encode_document(value, Some(descriptor)).unwrap()
}

#[tokio::test]
async fn decodes_arguments_in_declaration_order() {
    let registry = registry(Arc::new(AtomicUsize::new(0)));
    let mut payloads = BTreeMap::new();
    payloads.insert(
        "who".to_string(),
        payload(&Value::Text("hey".into()), &Descriptor::text()),
    );
    payloads.insert("times".to_string(), payload(&Value::Int(3), &Descriptor::int()));

    let result = invoke(&registry, "demo", "shout", &payloads).await.unwrap();
    assert_eq!(result, "\"hey!!!\"");
}

#[tokio::test]
async fn unknown_app_and_hook_are_routing_faults() {
    let registry = registry(Arc::new(AtomicUsize::new(0)));
    let payloads = BTreeMap::new();

    let err = invoke(&registry, "nope", "shout", &payloads).await.unwrap_err();
    assert_eq!(err, InvokeError::UnknownApp("nope".to_string()));
    assert_eq!(err.category(), FaultCategory::Routing);

    let err = invoke(&registry, "demo", "nope", &payloads).await.unwrap_err();
    assert_eq!(err.category(), FaultCategory::Routing);
}

#[tokio::test]
async fn missing_payload_is_a_payload_fault() {
    let registry = registry(Arc::new(AtomicUsize::new(0)));
    let mut payloads = BTreeMap::new();
    payloads.insert(
        "who".to_string(),
        payload(&Value::Text("hey".into()), &Descriptor::text()),
    );

    let err = invoke(&registry, "demo", "shout", &payloads).await.unwrap_err();
    assert_eq!(err, InvokeError::MissingParameter("times".to_string()));
    assert_eq!(err.category(), FaultCategory::Payload);
}

#[tokio::test]
async fn decode_failure_aborts_before_invocation() {
    let invocations = Arc::new(AtomicUsize::new(0));
    let registry = registry(invocations.clone());
    let mut payloads = BTreeMap::new();
    payloads.insert("arg".to_string(), "\"not an int\"".to_string());

    let err = invoke(&registry, "demo", "explode", &payloads).await.unwrap_err();
    assert_eq!(err.category(), FaultCategory::Payload);
    assert_eq!(invocations.load(Ordering::SeqCst), 0, "hook must not run");
}

#[tokio::test]
async fn hook_fault_is_distinct_from_codec_faults() {
    let invocations = Arc::new(AtomicUsize::new(0));
    let registry = registry(invocations.clone());
    let mut payloads = BTreeMap::new();
    payloads.insert("arg".to_string(), payload(&Value::Int(1), &Descriptor::int()));

    let err = invoke(&registry, "demo", "explode", &payloads).await.unwrap_err();
    assert_eq!(err.category(), FaultCategory::Hook);
    assert_eq!(invocations.load(Ordering::SeqCst), 1);
    assert!(err.to_string().contains("boom"));
}

#[tokio::test]
async fn result_round_trips_typed_values() {
    // A hook returning a decimal sum proves the return descriptor
    // drives encoding.
    struct Sum;

    #[async_trait]
    impl HookHandler for Sum {
        async fn invoke(&self, args: Vec<Value>) -> Result<Value, HookFault> {
            let total = args
                .first()
                .and_then(Value::as_list)
                .ok_or_else(|| HookFault::new("expected list argument"))?
                .iter()
                .map(|v| v.as_decimal().ok_or_else(|| HookFault::new("expected decimal")))
                .sum::<Result<rust_decimal::Decimal, _>>()?;
            Ok(Value::Decimal(total))
        }
    }

    let mut registry = HookRegistry::new();
    registry.register(
        "demo",
        HookSignature::new("sum", Descriptor::Decimal)
            .param("amounts", Descriptor::list(Descriptor::Decimal)),
        Sum,
    );

    let amounts = Value::List(vec![
        Value::Decimal("1.10".parse().unwrap()),
        Value::Decimal("2.20".parse().unwrap()),
    ]);
    let mut payloads = BTreeMap::new();
    payloads.insert(
        "amounts".to_string(),
        payload(&amounts, &Descriptor::list(Descriptor::Decimal)),
    );

    let result = invoke(&registry, "demo", "sum", &payloads).await.unwrap();
    assert_eq!(result, "\"3.30\"");
}
