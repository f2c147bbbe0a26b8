//! Field-tree arena: insert, remove, walk, path lookup.

use std::collections::{HashMap, VecDeque};

use slotmap::{new_key_type, SecondaryMap, SlotMap};

use crate::path::Path;

use super::field::FieldNode;

new_key_type! {
    /// Unique identifier for a field node. Copy, lightweight (u64).
    pub struct FieldId;
}

/// Empty slice constant for returning when a node has no children.
const EMPTY_CHILDREN: &[FieldId] = &[];

/// The rendered field tree, backed by a slotmap arena.
///
/// All nodes live in a single `SlotMap`. Parent/child relationships are
/// stored in secondary maps; a path index gives O(1) lookup of the field
/// editing a given value path. The path index is what makes scoped patches
/// possible without re-walking the tree.
pub struct FieldTree {
    nodes: SlotMap<FieldId, FieldNode>,
    children: SecondaryMap<FieldId, Vec<FieldId>>,
    parent: SecondaryMap<FieldId, FieldId>,
    by_path: HashMap<Path, FieldId>,
    root: Option<FieldId>,
}

impl FieldTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            children: SecondaryMap::new(),
            parent: SecondaryMap::new(),
            by_path: HashMap::new(),
            root: None,
        }
    }

    /// Insert a root-level node (no parent).
    ///
    /// If no root has been set yet, this node becomes the root.
    pub fn insert(&mut self, node: FieldNode) -> FieldId {
        let path = node.path.clone();
        let id = self.nodes.insert(node);
        self.children.insert(id, Vec::new());
        self.by_path.insert(path, id);
        if self.root.is_none() {
            self.root = Some(id);
        }
        id
    }

    /// Insert a node as a child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics (debug) if `parent` does not exist in the tree.
    pub fn insert_child(&mut self, parent: FieldId, node: FieldNode) -> FieldId {
        debug_assert!(
            self.nodes.contains_key(parent),
            "parent node does not exist"
        );
        let path = node.path.clone();
        let id = self.nodes.insert(node);
        self.children.insert(id, Vec::new());
        self.parent.insert(id, parent);
        self.by_path.insert(path, id);
        self.children
            .get_mut(parent)
            .expect("parent must have children vec")
            .push(id);
        id
    }

    /// Remove a node and all its descendants recursively.
    ///
    /// Returns the `FieldNode` for the removed node, or `None` if it didn't
    /// exist.
    pub fn remove(&mut self, id: FieldId) -> Option<FieldNode> {
        if !self.nodes.contains_key(id) {
            return None;
        }

        // Detach from parent's children list.
        if let Some(parent_id) = self.parent.remove(id) {
            if let Some(siblings) = self.children.get_mut(parent_id) {
                siblings.retain(|&child| child != id);
            }
        }

        if self.root == Some(id) {
            self.root = None;
        }

        // Collect the subtree (BFS) and remove every node.
        let mut to_remove = VecDeque::new();
        to_remove.push_back(id);
        let mut removed_root_node = None;

        while let Some(current) = to_remove.pop_front() {
            if let Some(kids) = self.children.remove(current) {
                for &child in &kids {
                    to_remove.push_back(child);
                }
            }
            self.parent.remove(current);
            if let Some(node) = self.nodes.remove(current) {
                self.by_path.remove(&node.path);
                if current == id {
                    removed_root_node = Some(node);
                }
            }
        }

        removed_root_node
    }

    /// Remove all children of `id`, keeping the node itself.
    pub fn remove_children(&mut self, id: FieldId) {
        let kids: Vec<FieldId> = self.children(id).to_vec();
        for child in kids {
            self.remove(child);
        }
    }

    /// Get the parent of a node, if it has one.
    pub fn parent(&self, id: FieldId) -> Option<FieldId> {
        self.parent.get(id).copied()
    }

    /// Get the children of a node. Returns an empty slice if the node has no
    /// children or does not exist.
    pub fn children(&self, id: FieldId) -> &[FieldId] {
        self.children
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or(EMPTY_CHILDREN)
    }

    /// Immutable access to a node.
    pub fn get(&self, id: FieldId) -> Option<&FieldNode> {
        self.nodes.get(id)
    }

    /// Mutable access to a node.
    pub fn get_mut(&mut self, id: FieldId) -> Option<&mut FieldNode> {
        self.nodes.get_mut(id)
    }

    /// The id of the field editing `path`, if one is rendered.
    pub fn id_at(&self, path: &Path) -> Option<FieldId> {
        self.by_path.get(path).copied()
    }

    /// The field editing `path`, if one is rendered.
    pub fn node_at(&self, path: &Path) -> Option<&FieldNode> {
        self.id_at(path).and_then(|id| self.get(id))
    }

    /// The current root node, if set.
    pub fn root(&self) -> Option<FieldId> {
        self.root
    }

    /// Number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether the tree contains a node with the given id.
    pub fn contains(&self, id: FieldId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Depth-first preorder walk of the whole tree.
    pub fn walk(&self) -> Vec<FieldId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        if let Some(root) = self.root {
            self.walk_into(root, &mut order);
        }
        order
    }

    fn walk_into(&self, id: FieldId, order: &mut Vec<FieldId>) {
        order.push(id);
        for &child in self.children(id) {
            self.walk_into(child, order);
        }
    }

    /// Render the tree as an indented plain-text outline.
    ///
    /// Each node becomes one line ([`FieldNode::outline`]) indented two
    /// spaces per depth level. Children of collapsed sections are skipped.
    /// The root node's own line is included, at depth zero. Suitable for
    /// hosts without a structured renderer, debugging, and snapshot tests.
    pub fn render_to_string(&self) -> String {
        let mut lines = Vec::with_capacity(self.nodes.len());
        if let Some(root) = self.root {
            self.render_into(root, 0, &mut lines);
        }
        lines.join("\n")
    }

    fn render_into(&self, id: FieldId, depth: usize, lines: &mut Vec<String>) {
        let Some(node) = self.get(id) else {
            return;
        };
        lines.push(format!("{}{}", "  ".repeat(depth), node.outline()));
        if node.collapsed {
            return;
        }
        for &child in self.children(id) {
            self.render_into(child, depth + 1, lines);
        }
    }
}

impl Default for FieldTree {
    fn default() -> Self {
        Self::new()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::field::FieldControl;

    fn p(s: &str) -> Path {
        s.parse().unwrap()
    }

    fn section(path: &str, label: &str) -> FieldNode {
        FieldNode::new(p(path), label, FieldControl::Section)
    }

    fn text(path: &str, label: &str, value: &str) -> FieldNode {
        FieldNode::new(p(path), label, FieldControl::Text { value: value.into() })
    }

    /// Build a small test tree:
    /// ```text
    ///         (root)
    ///        /      \
    ///     user      count
    ///    /    \
    ///  name   tags
    /// ```
    fn build_tree() -> (FieldTree, FieldId, FieldId, FieldId, FieldId, FieldId) {
        let mut tree = FieldTree::new();
        let root = tree.insert(section("", "Root"));
        let user = tree.insert_child(root, section("user", "User"));
        let name = tree.insert_child(user, text("user.name", "Name", "Ada"));
        let tags = tree.insert_child(user, section("user.tags", "Tags"));
        let count = tree.insert_child(root, text("count", "Count", "3"));
        (tree, root, user, name, tags, count)
    }

    // ── Insert / lookup ──────────────────────────────────────────────

    #[test]
    fn first_insert_becomes_root() {
        let mut tree = FieldTree::new();
        let id = tree.insert(section("", "Root"));
        assert_eq!(tree.root(), Some(id));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn insert_child_links_parent() {
        let (tree, root, user, ..) = build_tree();
        assert_eq!(tree.parent(user), Some(root));
        assert_eq!(tree.children(root).len(), 2);
    }

    #[test]
    fn path_index_lookup() {
        let (tree, _, user, name, ..) = build_tree();
        assert_eq!(tree.id_at(&p("user")), Some(user));
        assert_eq!(tree.id_at(&p("user.name")), Some(name));
        assert_eq!(tree.id_at(&p("missing")), None);
        assert_eq!(tree.node_at(&p("user.name")).unwrap().label, "Name");
    }

    // ── Remove ───────────────────────────────────────────────────────

    #[test]
    fn remove_subtree_recursively() {
        let (mut tree, _, user, name, tags, _) = build_tree();
        let removed = tree.remove(user);
        assert_eq!(removed.unwrap().label, "User");
        assert!(!tree.contains(user));
        assert!(!tree.contains(name));
        assert!(!tree.contains(tags));
        assert_eq!(tree.len(), 2);
        // The path index is cleaned up too.
        assert_eq!(tree.id_at(&p("user.name")), None);
    }

    #[test]
    fn remove_detaches_from_parent() {
        let (mut tree, root, user, ..) = build_tree();
        tree.remove(user);
        assert_eq!(tree.children(root).len(), 1);
    }

    #[test]
    fn remove_nonexistent_is_none() {
        let (mut tree, _, user, ..) = build_tree();
        tree.remove(user);
        assert!(tree.remove(user).is_none());
    }

    #[test]
    fn remove_children_keeps_node() {
        let (mut tree, _, user, name, tags, _) = build_tree();
        tree.remove_children(user);
        assert!(tree.contains(user));
        assert!(!tree.contains(name));
        assert!(!tree.contains(tags));
        assert!(tree.children(user).is_empty());
    }

    // ── Walk ─────────────────────────────────────────────────────────

    #[test]
    fn walk_is_preorder() {
        let (tree, root, user, name, tags, count) = build_tree();
        assert_eq!(tree.walk(), vec![root, user, name, tags, count]);
    }

    #[test]
    fn walk_empty_tree() {
        let tree = FieldTree::new();
        assert!(tree.walk().is_empty());
        assert!(tree.is_empty());
    }

    // ── Outline ──────────────────────────────────────────────────────

    #[test]
    fn outline_indents_by_depth() {
        let (tree, ..) = build_tree();
        let output = tree.render_to_string();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "Root: [section]");
        assert_eq!(lines[1], "  User: [section]");
        assert_eq!(lines[2], "    Name: [text] \"Ada\"");
        assert_eq!(lines[3], "    Tags: [section]");
        assert_eq!(lines[4], "  Count: [text] \"3\"");
    }

    #[test]
    fn outline_skips_collapsed_children() {
        let (mut tree, _, user, ..) = build_tree();
        tree.get_mut(user).unwrap().collapsed = true;
        let output = tree.render_to_string();
        assert!(output.contains("User: [section collapsed]"));
        assert!(!output.contains("Name"));
        assert!(output.contains("Count"));
    }

    #[test]
    fn outline_empty_tree_is_empty() {
        assert_eq!(FieldTree::new().render_to_string(), "");
    }
}
