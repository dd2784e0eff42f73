//! Recursive tree transforms.
//!
//! Records, permission tables and responses all share one nested shape. A
//! [`Tree`] makes the branch/leaf distinction explicit, and the three
//! transforms here (map, join, path tagging) are the only recursive walks in
//! the workspace. Everything else is built by choosing a leaf predicate and a
//! per-leaf function.
//!
//! Key order is insertion order and is preserved by every transform.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::path::FieldPath;

/// A nested structure whose terminal nodes carry `L`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Tree<L> {
    /// A nested structure keyed by field name.
    Branch(IndexMap<String, Tree<L>>),
    /// A terminal value.
    Leaf(L),
}

impl<L> Default for Tree<L> {
    fn default() -> Self {
        Tree::Branch(IndexMap::new())
    }
}

impl<L> Tree<L> {
    /// A terminal node.
    pub fn leaf(value: L) -> Self {
        Tree::Leaf(value)
    }

    /// A branch built from `(key, child)` pairs, in order.
    pub fn branch<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Tree<L>)>,
        K: Into<String>,
    {
        Tree::Branch(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn is_branch(&self) -> bool {
        matches!(self, Tree::Branch(_))
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Tree::Leaf(_))
    }

    pub fn as_leaf(&self) -> Option<&L> {
        match self {
            Tree::Leaf(value) => Some(value),
            Tree::Branch(_) => None,
        }
    }

    pub fn as_branch(&self) -> Option<&IndexMap<String, Tree<L>>> {
        match self {
            Tree::Branch(children) => Some(children),
            Tree::Leaf(_) => None,
        }
    }

    /// Direct child by key. Leaves have no children.
    pub fn get(&self, key: &str) -> Option<&Tree<L>> {
        self.as_branch().and_then(|children| children.get(key))
    }

    /// Node at a dotted path. The root path resolves to `self`.
    pub fn get_path(&self, path: &FieldPath) -> Option<&Tree<L>> {
        path.segments().try_fold(self, |node, key| node.get(key))
    }

    /// Mutable node at a dotted path.
    pub fn get_path_mut(&mut self, path: &FieldPath) -> Option<&mut Tree<L>> {
        let mut node = self;
        for key in path.segments() {
            node = match node {
                Tree::Branch(children) => children.get_mut(key)?,
                Tree::Leaf(_) => return None,
            };
        }
        Some(node)
    }

    /// Replace the node at `path`, creating branches along the way.
    ///
    /// A leaf sitting where a branch is needed is replaced by an empty branch.
    /// Returns the node previously at `path`, if any.
    pub fn set_path(&mut self, path: &FieldPath, node: Tree<L>) -> Option<Tree<L>> {
        let keys: Vec<&str> = path.segments().collect();
        let Some((last, parents)) = keys.split_last() else {
            return Some(std::mem::replace(self, node));
        };

        let mut current = self;
        for key in parents {
            if current.is_leaf() {
                *current = Tree::default();
            }
            current = match current {
                Tree::Branch(children) => children.entry((*key).to_string()).or_default(),
                Tree::Leaf(_) => unreachable!("leaf replaced by branch above"),
            };
        }

        if current.is_leaf() {
            *current = Tree::default();
        }
        match current {
            Tree::Branch(children) => children.insert((*last).to_string(), node),
            Tree::Leaf(_) => None,
        }
    }

    /// Every leaf with its path, depth first in key order.
    pub fn leaves(&self) -> Vec<(FieldPath, &L)> {
        let mut out = Vec::new();
        collect_leaves(self, &FieldPath::root(), &mut out);
        out
    }

    /// Structure-preserving map over every leaf.
    ///
    /// Branches are always recursed into; only explicit leaves reach `f`.
    pub fn map<M, F>(self, mut f: F) -> Tree<M>
    where
        F: FnMut(&FieldPath, L) -> M,
    {
        map_node(self, &FieldPath::root(), &mut f)
    }

    /// Structure-preserving map over borrowed leaves.
    pub fn map_ref<M, F>(&self, mut f: F) -> Tree<M>
    where
        F: FnMut(&FieldPath, &L) -> M,
    {
        map_ref_node(self, &FieldPath::root(), &mut f)
    }

    /// Structure-preserving map with a configurable leaf boundary.
    ///
    /// A node satisfying `is_leaf` is passed to `f` whole, even when it is a
    /// branch. Other branches are recursed into and other leaves are passed
    /// to `f` as they are.
    pub fn map_where<M, P, F>(self, is_leaf: P, mut f: F) -> Tree<M>
    where
        P: Fn(&Tree<L>) -> bool,
        F: FnMut(&FieldPath, Tree<L>) -> M,
    {
        map_where_node(self, &FieldPath::root(), &is_leaf, &mut f)
    }
}

fn collect_leaves<'a, L>(node: &'a Tree<L>, path: &FieldPath, out: &mut Vec<(FieldPath, &'a L)>) {
    match node {
        Tree::Leaf(value) => out.push((path.clone(), value)),
        Tree::Branch(children) => {
            for (key, child) in children {
                collect_leaves(child, &path.child(key), out);
            }
        }
    }
}

fn map_node<L, M, F>(node: Tree<L>, path: &FieldPath, f: &mut F) -> Tree<M>
where
    F: FnMut(&FieldPath, L) -> M,
{
    match node {
        Tree::Leaf(value) => Tree::Leaf(f(path, value)),
        Tree::Branch(children) => {
            let mut out = IndexMap::with_capacity(children.len());
            for (key, child) in children {
                let child_path = path.child(&key);
                let mapped = map_node(child, &child_path, f);
                out.insert(key, mapped);
            }
            Tree::Branch(out)
        }
    }
}

fn map_ref_node<L, M, F>(node: &Tree<L>, path: &FieldPath, f: &mut F) -> Tree<M>
where
    F: FnMut(&FieldPath, &L) -> M,
{
    match node {
        Tree::Leaf(value) => Tree::Leaf(f(path, value)),
        Tree::Branch(children) => {
            let mut out = IndexMap::with_capacity(children.len());
            for (key, child) in children {
                let mapped = map_ref_node(child, &path.child(key), f);
                out.insert(key.clone(), mapped);
            }
            Tree::Branch(out)
        }
    }
}

fn map_where_node<L, M, P, F>(node: Tree<L>, path: &FieldPath, is_leaf: &P, f: &mut F) -> Tree<M>
where
    P: Fn(&Tree<L>) -> bool,
    F: FnMut(&FieldPath, Tree<L>) -> M,
{
    if is_leaf(&node) {
        return Tree::Leaf(f(path, node));
    }
    match node {
        Tree::Branch(children) => {
            let mut out = IndexMap::with_capacity(children.len());
            for (key, child) in children {
                let child_path = path.child(&key);
                let mapped = map_where_node(child, &child_path, is_leaf, f);
                out.insert(key, mapped);
            }
            Tree::Branch(out)
        }
        leaf => Tree::Leaf(f(path, leaf)),
    }
}

/// A pair of parallel nodes produced by [`join`].
///
/// `right` is `None` when the right-hand tree has no node at this position.
#[derive(Debug, Clone, PartialEq)]
pub struct Joined<A, B> {
    pub left: Tree<A>,
    pub right: Option<Tree<B>>,
}

/// Pair two parallel trees.
///
/// Walks the keys of `left`. Where both sides are branches the walk
/// recurses; anywhere else the two nodes (either of which may still be a
/// branch) become one [`Joined`] leaf. Keys only present on the right are
/// ignored.
pub fn join<A, B: Clone>(left: Tree<A>, right: &Tree<B>) -> Tree<Joined<A, B>> {
    join_node(left, Some(right))
}

fn join_node<A, B: Clone>(left: Tree<A>, right: Option<&Tree<B>>) -> Tree<Joined<A, B>> {
    match (left, right) {
        (Tree::Branch(children), Some(Tree::Branch(other))) => {
            let mut out = IndexMap::with_capacity(children.len());
            for (key, child) in children {
                let paired = join_node(child, other.get(&key));
                out.insert(key, paired);
            }
            Tree::Branch(out)
        }
        (left, right) => Tree::Leaf(Joined {
            left,
            right: right.cloned(),
        }),
    }
}

/// A node rewritten by [`tag_paths`], carrying its dotted access path.
#[derive(Debug, Clone, PartialEq)]
pub struct Tagged<T> {
    pub inner: T,
    pub path: FieldPath,
}

/// Rewrite every node matching `is_leaf` into a [`Tagged`] node.
///
/// The walk starts at the children of `tree`. Matching nodes are transformed
/// and tagged with their path; other branches are recursed into; other
/// leaves are dropped from the output.
pub fn tag_paths<L, T, P, F>(tree: &Tree<L>, is_leaf: P, transform: F) -> Tree<Tagged<T>>
where
    P: Fn(&Tree<L>) -> bool,
    F: Fn(&Tree<L>) -> T,
{
    tag_paths_under(tree, &FieldPath::root(), is_leaf, transform)
}

/// [`tag_paths`] for a subtree that lives at `parent`.
pub fn tag_paths_under<L, T, P, F>(
    tree: &Tree<L>,
    parent: &FieldPath,
    is_leaf: P,
    transform: F,
) -> Tree<Tagged<T>>
where
    P: Fn(&Tree<L>) -> bool,
    F: Fn(&Tree<L>) -> T,
{
    tag_children(tree, parent, &is_leaf, &transform)
}

fn tag_children<L, T, P, F>(tree: &Tree<L>, parent: &FieldPath, is_leaf: &P, transform: &F) -> Tree<Tagged<T>>
where
    P: Fn(&Tree<L>) -> bool,
    F: Fn(&Tree<L>) -> T,
{
    let mut out = IndexMap::new();
    if let Tree::Branch(children) = tree {
        for (key, child) in children {
            let path = parent.child(key);
            if is_leaf(child) {
                let tagged = Tagged {
                    inner: transform(child),
                    path,
                };
                out.insert(key.clone(), Tree::Leaf(tagged));
            } else if child.is_branch() {
                out.insert(key.clone(), tag_children(child, &path, is_leaf, transform));
            }
        }
    }
    Tree::Branch(out)
}

impl Tree<Value> {
    /// Build a tree from JSON. Objects become branches; scalars, arrays and
    /// null become leaves.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Object(map) => Tree::Branch(
                map.into_iter()
                    .map(|(key, child)| (key, Tree::from_json(child)))
                    .collect(),
            ),
            other => Tree::Leaf(other),
        }
    }

    /// Convert back to JSON.
    pub fn into_json(self) -> Value {
        match self {
            Tree::Leaf(value) => value,
            Tree::Branch(children) => Value::Object(
                children
                    .into_iter()
                    .map(|(key, child)| (key, child.into_json()))
                    .collect(),
            ),
        }
    }
}
