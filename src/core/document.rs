use serde_yaml::{Mapping, Value};

/// Stable handle to a node in a [`Document`] arena.
///
/// Handles stay valid for the lifetime of the document; nodes are never
/// removed during a compile. This is what the reference cache stores, so
/// repeated flags can append into a previously created collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// One node of the ordered compose tree.
#[derive(Debug, Clone)]
pub enum Node {
    /// A string value. Quoting decisions are left to the YAML emitter.
    Scalar(String),
    /// Ordered (key, value) pairs. Logical key uniqueness is the builder's
    /// responsibility, enforced through the reference cache.
    Mapping(Vec<(NodeId, NodeId)>),
    /// Ordered list of values.
    Sequence(Vec<NodeId>),
}

/// Arena-backed ordered tree for the compose document under construction.
///
/// Insertion order is preserved everywhere and carries through to the
/// serialized output, so compiling the same invocation twice yields
/// byte-identical YAML.
#[derive(Debug)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Document {
    /// Create a document whose root is an empty mapping.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::Mapping(Vec::new())],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Allocate a scalar node.
    pub fn scalar(&mut self, value: impl Into<String>) -> NodeId {
        self.push(Node::Scalar(value.into()))
    }

    /// Allocate an empty mapping node.
    pub fn mapping(&mut self) -> NodeId {
        self.push(Node::Mapping(Vec::new()))
    }

    /// Allocate an empty sequence node.
    pub fn sequence(&mut self) -> NodeId {
        self.push(Node::Sequence(Vec::new()))
    }

    /// Overwrite the content of a scalar node. Used to rename the service
    /// once the image name is known.
    pub fn set_scalar(&mut self, id: NodeId, value: &str) {
        if let Node::Scalar(s) = &mut self.nodes[id.0] {
            *s = value.to_string();
        } else {
            debug_assert!(false, "set_scalar on non-scalar node");
        }
    }

    /// Append a (key, value) pair to a mapping node.
    pub fn push_pair(&mut self, parent: NodeId, key: NodeId, value: NodeId) {
        if let Node::Mapping(pairs) = &mut self.nodes[parent.0] {
            pairs.push((key, value));
        } else {
            debug_assert!(false, "push_pair on non-mapping node");
        }
    }

    /// Insert a (key, value) pair at a fixed position in a mapping node.
    /// The service's `image` and `command` keys go in front of the
    /// flag-derived keys this way.
    pub fn insert_pair(&mut self, parent: NodeId, index: usize, key: NodeId, value: NodeId) {
        if let Node::Mapping(pairs) = &mut self.nodes[parent.0] {
            let index = index.min(pairs.len());
            pairs.insert(index, (key, value));
        } else {
            debug_assert!(false, "insert_pair on non-mapping node");
        }
    }

    /// Append a value to a sequence node.
    pub fn push_item(&mut self, parent: NodeId, item: NodeId) {
        if let Node::Sequence(items) = &mut self.nodes[parent.0] {
            items.push(item);
        } else {
            debug_assert!(false, "push_item on non-sequence node");
        }
    }

    /// Render the tree to YAML text. A thin wrapper over `serde_yaml`:
    /// the arena is converted into a `serde_yaml::Value` (whose mappings
    /// preserve insertion order) and emitted from there.
    pub fn render(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(&self.to_value(self.root))
    }

    fn to_value(&self, id: NodeId) -> Value {
        match &self.nodes[id.0] {
            Node::Scalar(s) => Value::String(s.clone()),
            Node::Sequence(items) => {
                Value::Sequence(items.iter().map(|&item| self.to_value(item)).collect())
            }
            Node::Mapping(pairs) => {
                let mut mapping = Mapping::with_capacity(pairs.len());
                for &(key, value) in pairs {
                    let _ = mapping.insert(self.to_value(key), self.to_value(value));
                }
                Value::Mapping(mapping)
            }
        }
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
