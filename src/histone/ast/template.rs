//! A parsed template: its root items plus an optional signature payload.

use super::error::AstError;
use super::node::Item;
use super::wire;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    items: Vec<Item>,
    signature: Option<Value>,
}

impl Template {
    pub fn new(items: Vec<Item>) -> Self {
        Template {
            items,
            signature: None,
        }
    }

    /// Attach envelope metadata; the wire form becomes `[["HISTONE", meta], root]`.
    pub fn with_signature(mut self, meta: Value) -> Self {
        self.signature = Some(meta);
        self
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn into_items(self) -> Vec<Item> {
        self.items
    }

    pub fn signature(&self) -> Option<&Value> {
        self.signature.as_ref()
    }

    pub fn to_value(&self) -> Value {
        let root = wire::to_value(&self.items);
        match &self.signature {
            Some(meta) => wire::envelope(meta.clone(), root),
            None => root,
        }
    }

    /// Decode a bare or enveloped root, keeping the envelope metadata.
    pub fn from_value(value: &Value) -> Result<Self, AstError> {
        let (meta, _) = wire::split_envelope(value);
        Ok(Template {
            items: wire::from_value(value)?,
            signature: meta.cloned(),
        })
    }
}

impl From<Vec<Item>> for Template {
    fn from(items: Vec<Item>) -> Self {
        Template::new(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_signature_round_trip() {
        let template = Template::new(vec![Item::text("hi")]).with_signature(json!([]));
        let value = template.to_value();
        assert_eq!(value, json!([["HISTONE", []], ["hi"]]));
        assert_eq!(Template::from_value(&value).unwrap(), template);
    }

    #[test]
    fn test_bare_template() {
        let template = Template::from_value(&json!(["hi"])).unwrap();
        assert_eq!(template.signature(), None);
        assert_eq!(template.items(), &[Item::text("hi")]);
    }
}
