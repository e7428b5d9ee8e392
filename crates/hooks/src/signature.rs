//! Declared hook signatures.

use gantry_codec::Descriptor;

/// The declared shape of one hook: ordered parameters and a return
/// descriptor. Built in code at registration time, one per hook.
#[derive(Debug, Clone, PartialEq)]
pub struct HookSignature {
    pub name: String,
    /// Parameter name → descriptor, in declaration order. Payloads are
    /// decoded and passed to the handler in exactly this order.
    pub params: Vec<(String, Descriptor)>,
    pub returns: Descriptor,
}

impl HookSignature {
    pub fn new(name: impl Into<String>, returns: Descriptor) -> Self {
        HookSignature {
            name: name.into(),
            params: Vec::new(),
            returns,
        }
    }

    /// Builder-style parameter declaration.
    pub fn param(mut self, name: impl Into<String>, descriptor: Descriptor) -> Self {
        self.params.push((name.into(), descriptor));
        self
    }

    /// Diagnostic JSON rendering, used by signature listings.
    pub fn to_json(&self) -> serde_json::Value {
        let params: Vec<serde_json::Value> = self
            .params
            .iter()
            .map(|(name, d)| serde_json::json!({ "name": name, "type": d.to_json() }))
            .collect();
        serde_json::json!({
            "name": self.name,
            "parameters": params,
            "returns": self.returns.to_json(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_preserves_parameter_order() {
        let signature = HookSignature::new("greet", Descriptor::text())
            .param("who", Descriptor::text())
            .param("times", Descriptor::int());
        let json = signature.to_json();
        assert_eq!(json["parameters"][0]["name"], "who");
        assert_eq!(json["parameters"][1]["name"], "times");
        assert_eq!(json["returns"]["base"], "Text");
    }
}
