use serde_json::{json, Map, Value};

#[derive(Clone, Debug, PartialEq)]
pub enum InputKind {
    Image,
    String {
        default: &'static str,
        multiline: bool,
    },
    /// First entry is what the host preselects.
    Choice(&'static [&'static str]),
}

impl InputKind {
    /// The host's `[TYPE, {options}]` form.
    pub fn to_json(&self) -> Value {
        match self {
            InputKind::Image => json!(["IMAGE"]),
            InputKind::String { default, multiline } => json!([
                "STRING",
                { "default": default, "multiline": multiline }
            ]),
            InputKind::Choice(choices) => json!([choices]),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct InputSpec {
    pub name: &'static str,
    pub kind: InputKind,
}

impl InputSpec {
    pub fn new(name: &'static str, kind: InputKind) -> Self {
        Self { name, kind }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeDefinition {
    pub class_name: &'static str,
    pub display_name: &'static str,
    pub category: &'static str,
    pub function: &'static str,
    pub return_types: &'static [&'static str],
    pub inputs: Vec<InputSpec>,
}

impl NodeDefinition {
    pub fn object_info(&self) -> Value {
        let required: Map<String, Value> = self
            .inputs
            .iter()
            .map(|i| (i.name.to_string(), i.kind.to_json()))
            .collect();
        // JSON maps lose declaration order, so it is spelled out separately
        let order: Vec<&str> = self.inputs.iter().map(|i| i.name).collect();

        json!({
            "input": { "required": required },
            "input_order": { "required": order },
            "output": self.return_types,
            "output_name": self.return_types,
            "name": self.class_name,
            "display_name": self.display_name,
            "category": self.category,
            "function": self.function,
        })
    }
}
