//! What the host sees: node definitions, their input schema and the
//! class-name mapping it uses to find them.

mod image_to_prompt;
mod types;

pub use image_to_prompt::ImageToPromptNode;
pub use types::{InputKind, InputSpec, NodeDefinition};

use serde_json::{Map, Value};

pub struct NodeRegistry {
    nodes: Vec<NodeDefinition>,
}

impl NodeRegistry {
    pub fn new(nodes: Vec<NodeDefinition>) -> Self {
        Self { nodes }
    }

    pub fn get(&self, class_name: &str) -> Option<&NodeDefinition> {
        self.nodes.iter().find(|n| n.class_name == class_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &NodeDefinition> {
        self.nodes.iter()
    }

    /// Class name -> display name.
    pub fn display_names(&self) -> Vec<(&'static str, &'static str)> {
        self.iter()
            .map(|n| (n.class_name, n.display_name))
            .collect()
    }

    /// Schema of every registered node, keyed by class name.
    pub fn object_info(&self) -> Value {
        let info: Map<String, Value> = self
            .iter()
            .map(|n| (n.class_name.to_string(), n.object_info()))
            .collect();
        Value::Object(info)
    }
}

pub fn node_class_mappings() -> NodeRegistry {
    NodeRegistry::new(vec![ImageToPromptNode::definition()])
}
