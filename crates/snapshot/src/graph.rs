use crate::error::{Result, SnapshotError};
use serde_json::{Map, Number, Value};
use std::collections::HashMap;

const SHARE_KEY: &str = "$id";
const REFERENCE_KEY: &str = "$ref";
const SHARED_ARRAY_KEY: &str = "$values";

/// Handle into a [`SnapshotGraph`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
enum Node {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<NodeId>),
    /// Fields sorted by key.
    Object(Vec<(String, NodeId)>),
    /// Unlinked `$ref` placeholder; unreachable once resolution finishes.
    Reference(String),
}

/// Resolved snapshot document.
///
/// Every node lives in one arena and every `$ref` site points at the handle
/// of the shared object it names, so aliasing is real sharing and cycles are
/// representable. The graph is immutable once built.
#[derive(Debug, Clone)]
pub struct SnapshotGraph {
    nodes: Vec<Node>,
    root: NodeId,
}

impl SnapshotGraph {
    /// Resolve all `$id`/`$ref` aliasing in a parsed document.
    ///
    /// Pass 1 interns every node and records shared objects; pass 2 rewrites
    /// each child link that points at a placeholder. Order of appearance does
    /// not matter, and substitution never re-walks the target.
    pub fn resolve(document: Value) -> Result<Self> {
        let mut builder = Builder::default();
        let root = builder.intern(document)?;
        let graph = builder.link(root)?;
        log::debug!("Resolved snapshot graph with {} nodes", graph.nodes.len());
        Ok(graph)
    }

    #[must_use]
    pub fn root(&self) -> NodeRef<'_> {
        self.node(self.root)
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> NodeRef<'_> {
        NodeRef { graph: self, id }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn raw(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }
}

#[derive(Default)]
struct Builder {
    nodes: Vec<Node>,
    shares: HashMap<String, NodeId>,
}

impl Builder {
    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        self.nodes.push(node);
        id
    }

    fn intern(&mut self, value: Value) -> Result<NodeId> {
        match value {
            Value::Null => Ok(self.push(Node::Null)),
            Value::Bool(b) => Ok(self.push(Node::Bool(b))),
            Value::Number(n) => Ok(self.push(Node::Number(n))),
            Value::String(s) => Ok(self.push(Node::String(s))),
            Value::Array(items) => {
                let slot = self.push(Node::Null);
                let children = self.intern_all(items)?;
                self.nodes[slot.index()] = Node::Array(children);
                Ok(slot)
            }
            Value::Object(map) => self.intern_object(map),
        }
    }

    fn intern_all(&mut self, items: Vec<Value>) -> Result<Vec<NodeId>> {
        items.into_iter().map(|item| self.intern(item)).collect()
    }

    fn intern_object(&mut self, mut map: Map<String, Value>) -> Result<NodeId> {
        if let Some(target) = map.remove(REFERENCE_KEY) {
            let target = share_key(&target).ok_or_else(|| SnapshotError::DanglingReference {
                id: target.to_string(),
            })?;
            return Ok(self.push(Node::Reference(target)));
        }

        let share = map.remove(SHARE_KEY).and_then(|id| share_key(&id));
        let slot = self.push(Node::Null);

        let node = match map.remove(SHARED_ARRAY_KEY) {
            Some(Value::Array(items)) => Node::Array(self.intern_all(items)?),
            Some(other) => {
                map.insert(SHARED_ARRAY_KEY.to_string(), other);
                Node::Object(self.intern_fields(map)?)
            }
            None => Node::Object(self.intern_fields(map)?),
        };
        self.nodes[slot.index()] = node;

        if let Some(share) = share {
            if self.shares.insert(share.clone(), slot).is_some() {
                log::warn!("Duplicate shared object id `{share}`; keeping the later one");
            }
        }
        Ok(slot)
    }

    fn intern_fields(&mut self, map: Map<String, Value>) -> Result<Vec<(String, NodeId)>> {
        let mut fields = map
            .into_iter()
            .map(|(key, value)| Ok((key, self.intern(value)?)))
            .collect::<Result<Vec<_>>>()?;
        fields.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(fields)
    }

    fn link(self, root: NodeId) -> Result<SnapshotGraph> {
        let Self { mut nodes, shares } = self;

        let mut redirect: Vec<Option<NodeId>> = vec![None; nodes.len()];
        for (idx, node) in nodes.iter().enumerate() {
            if let Node::Reference(target) = node {
                let resolved = shares
                    .get(target)
                    .copied()
                    .ok_or_else(|| SnapshotError::DanglingReference { id: target.clone() })?;
                redirect[idx] = Some(resolved);
            }
        }

        let follow = |id: NodeId| redirect[id.index()].unwrap_or(id);
        for node in &mut nodes {
            match node {
                Node::Array(children) => {
                    for child in children.iter_mut() {
                        *child = follow(*child);
                    }
                }
                Node::Object(fields) => {
                    for (_, child) in fields.iter_mut() {
                        *child = follow(*child);
                    }
                }
                _ => {}
            }
        }

        Ok(SnapshotGraph {
            root: follow(root),
            nodes,
        })
    }
}

fn share_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Kind of a resolved node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

/// Borrowed view of one node in a [`SnapshotGraph`].
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    graph: &'a SnapshotGraph,
    id: NodeId,
}

impl std::fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("kind", &self.kind())
            .finish()
    }
}

impl<'a> NodeRef<'a> {
    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// True when both views point at the same arena node.
    #[must_use]
    pub fn same_node(&self, other: &NodeRef<'_>) -> bool {
        std::ptr::eq(self.graph, other.graph) && self.id == other.id
    }

    #[must_use]
    pub fn kind(&self) -> NodeKind {
        match self.graph.raw(self.id) {
            Node::Null | Node::Reference(_) => NodeKind::Null,
            Node::Bool(_) => NodeKind::Bool,
            Node::Number(_) => NodeKind::Number,
            Node::String(_) => NodeKind::String,
            Node::Array(_) => NodeKind::Array,
            Node::Object(_) => NodeKind::Object,
        }
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        self.kind() == NodeKind::Null
    }

    /// Field lookup on an object node. Explicit `null` fields are returned.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<NodeRef<'a>> {
        match self.graph.raw(self.id) {
            Node::Object(fields) => fields
                .binary_search_by(|(k, _)| k.as_str().cmp(key))
                .ok()
                .map(|pos| self.graph.node(fields[pos].1)),
            _ => None,
        }
    }

    /// Field lookup that treats explicit `null` as absent.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<NodeRef<'a>> {
        self.get(key).filter(|node| !node.is_null())
    }

    /// Follow a path of object keys.
    #[must_use]
    pub fn path(&self, keys: &[&str]) -> Option<NodeRef<'a>> {
        keys.iter().try_fold(*self, |node, key| node.field(key))
    }

    #[must_use]
    pub fn index(&self, idx: usize) -> Option<NodeRef<'a>> {
        match self.graph.raw(self.id) {
            Node::Array(items) => items.get(idx).map(|id| self.graph.node(*id)),
            _ => None,
        }
    }

    /// Array items; empty for non-arrays.
    pub fn items(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let graph = self.graph;
        let items: &'a [NodeId] = match graph.raw(self.id) {
            Node::Array(items) => items,
            _ => &[],
        };
        items.iter().map(move |id| graph.node(*id))
    }

    /// Object entries in key order; empty for non-objects.
    pub fn entries(&self) -> impl Iterator<Item = (&'a str, NodeRef<'a>)> + 'a {
        let graph = self.graph;
        let fields: &'a [(String, NodeId)] = match graph.raw(self.id) {
            Node::Object(fields) => fields,
            _ => &[],
        };
        fields.iter().map(move |(k, id)| (k.as_str(), graph.node(*id)))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self.graph.raw(self.id) {
            Node::Array(items) => items.len(),
            Node::Object(fields) => fields.len(),
            _ => 0,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&'a str> {
        match self.graph.raw(self.id) {
            Node::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self.graph.raw(self.id) {
            Node::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self.graph.raw(self.id) {
            Node::Number(n) => n.as_i64().or_else(|| integral(n.as_f64()?)),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        match self.graph.raw(self.id) {
            Node::Number(n) => n
                .as_u64()
                .or_else(|| integral(n.as_f64()?).and_then(|v| u64::try_from(v).ok())),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self.graph.raw(self.id) {
            Node::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Materialize this subtree as a plain JSON value.
    ///
    /// A link back to an ancestor is written as `null`, so cyclic graphs still
    /// produce a finite tree. Shared nodes reached along different paths are
    /// copied once per path.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut ancestors = Vec::new();
        materialize(self.graph, self.id, &mut ancestors)
    }
}

fn integral(v: f64) -> Option<i64> {
    if v.fract() == 0.0 && v.abs() < 9.007_199_254_740_992e15 {
        Some(v as i64)
    } else {
        None
    }
}

fn materialize(graph: &SnapshotGraph, id: NodeId, ancestors: &mut Vec<NodeId>) -> Value {
    if ancestors.contains(&id) {
        return Value::Null;
    }
    match graph.raw(id) {
        Node::Null | Node::Reference(_) => Value::Null,
        Node::Bool(b) => Value::Bool(*b),
        Node::Number(n) => Value::Number(n.clone()),
        Node::String(s) => Value::String(s.clone()),
        Node::Array(items) => {
            ancestors.push(id);
            let out = items
                .iter()
                .map(|child| materialize(graph, *child, ancestors))
                .collect();
            ancestors.pop();
            Value::Array(out)
        }
        Node::Object(fields) => {
            ancestors.push(id);
            let out = fields
                .iter()
                .map(|(k, child)| (k.clone(), materialize(graph, *child, ancestors)))
                .collect::<Map<_, _>>();
            ancestors.pop();
            Value::Object(out)
        }
    }
}
