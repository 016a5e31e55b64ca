use std::cmp::Ordering;

use crate::cmp::{Comparator, NaturalOrder};
use crate::error::EmptyStructureError;

/// Arena-backed red-black tree ordered by a [`Comparator`].
///
/// - Elements comparing `Equal` are not duplicated: a second insert overwrites
///   the stored element in place.
/// - Nodes live in a dense `Vec` and point at each other by index; an absent
///   child is the conceptual black nil leaf and is never materialized.
pub struct RbTree<T, C = NaturalOrder> {
    nodes: Vec<Node<T>>,
    root: Option<NodeId>,
    cmp: C,
}

type NodeId = usize;

struct Node<T> {
    value: T,
    red: bool,
    parent: Option<NodeId>,
    left: Option<NodeId>,
    right: Option<NodeId>,
}

impl<T> Node<T> {
    fn new(value: T, parent: Option<NodeId>) -> Self {
        Self {
            value,
            red: true,
            parent,
            left: None,
            right: None,
        }
    }
}

impl<T: Ord> RbTree<T> {
    pub fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }
}

impl<T, C: Comparator<T>> RbTree<T, C> {
    pub fn with_comparator(cmp: C) -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
            cmp,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    /// Inserts `value`, returning the previously stored element that compared
    /// `Equal` to it, if any. Overwriting does not change the tree shape.
    pub fn insert(&mut self, value: T) -> Option<T> {
        let mut cur = self.root;
        let mut parent = None;
        let mut went_left = false;
        while let Some(id) = cur {
            match self.cmp.compare(&value, &self.nodes[id].value) {
                Ordering::Less => {
                    parent = Some(id);
                    went_left = true;
                    cur = self.nodes[id].left;
                }
                Ordering::Greater => {
                    parent = Some(id);
                    went_left = false;
                    cur = self.nodes[id].right;
                }
                Ordering::Equal => {
                    return Some(std::mem::replace(&mut self.nodes[id].value, value));
                }
            }
        }

        let id = self.nodes.len();
        self.nodes.push(Node::new(value, parent));
        match parent {
            None => self.root = Some(id),
            Some(p) => {
                if went_left {
                    self.nodes[p].left = Some(id);
                } else {
                    self.nodes[p].right = Some(id);
                }
            }
        }
        self.fix_insert(id);
        None
    }

    /// Removes the element comparing `Equal` to `value`. Returns whether an
    /// element was removed.
    pub fn remove(&mut self, value: &T) -> bool {
        self.take(value).is_some()
    }

    /// Removes and returns the element comparing `Equal` to `value`.
    pub fn take(&mut self, value: &T) -> Option<T> {
        let id = self.locate(value)?;
        Some(self.remove_node(id))
    }

    pub fn contains(&self, value: &T) -> bool {
        self.locate(value).is_some()
    }

    pub fn get(&self, value: &T) -> Option<&T> {
        self.locate(value).map(|id| &self.nodes[id].value)
    }

    /// Looks up an element by an ordering probe, as in `slice::binary_search_by`:
    /// `f` returns the ordering of the stored element relative to the target.
    pub fn get_by<F>(&self, f: F) -> Option<&T>
    where
        F: FnMut(&T) -> Ordering,
    {
        self.locate_by(f).map(|id| &self.nodes[id].value)
    }

    /// Removes and returns an element located by an ordering probe.
    pub fn take_by<F>(&mut self, f: F) -> Option<T>
    where
        F: FnMut(&T) -> Ordering,
    {
        let id = self.locate_by(f)?;
        Some(self.remove_node(id))
    }

    pub fn min(&self) -> Result<&T, EmptyStructureError> {
        let root = self.root.ok_or(EmptyStructureError)?;
        Ok(&self.nodes[self.min_in(root)].value)
    }

    pub fn max(&self) -> Result<&T, EmptyStructureError> {
        let root = self.root.ok_or(EmptyStructureError)?;
        Ok(&self.nodes[self.max_in(root)].value)
    }

    /// In-order cursor over the current tree. Borrows the tree, so mutation
    /// while an iteration is in progress does not compile.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            nodes: &self.nodes,
            next: self.root.map(|root| self.min_in(root)),
            remaining: self.nodes.len(),
        }
    }

    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }

    fn locate(&self, value: &T) -> Option<NodeId> {
        let mut cur = self.root;
        while let Some(id) = cur {
            match self.cmp.compare(value, &self.nodes[id].value) {
                Ordering::Less => cur = self.nodes[id].left,
                Ordering::Greater => cur = self.nodes[id].right,
                Ordering::Equal => return Some(id),
            }
        }
        None
    }

    fn locate_by<F>(&self, mut f: F) -> Option<NodeId>
    where
        F: FnMut(&T) -> Ordering,
    {
        let mut cur = self.root;
        while let Some(id) = cur {
            match f(&self.nodes[id].value) {
                Ordering::Less => cur = self.nodes[id].right,
                Ordering::Greater => cur = self.nodes[id].left,
                Ordering::Equal => return Some(id),
            }
        }
        None
    }

    fn min_in(&self, mut id: NodeId) -> NodeId {
        while let Some(left) = self.nodes[id].left {
            id = left;
        }
        id
    }

    fn max_in(&self, mut id: NodeId) -> NodeId {
        while let Some(right) = self.nodes[id].right {
            id = right;
        }
        id
    }

    fn is_red(&self, node: Option<NodeId>) -> bool {
        node.map(|id| self.nodes[id].red).unwrap_or(false)
    }

    fn replace_child(&mut self, parent: Option<NodeId>, old: NodeId, new: Option<NodeId>) {
        match parent {
            None => self.root = new,
            Some(p) => {
                if self.nodes[p].left == Some(old) {
                    self.nodes[p].left = new;
                } else {
                    self.nodes[p].right = new;
                }
            }
        }
    }

    fn rotate_left(&mut self, x: NodeId) {
        let y = self.nodes[x].right.expect("rotate_left needs a right child");
        let inner = self.nodes[y].left;
        self.nodes[x].right = inner;
        if let Some(c) = inner {
            self.nodes[c].parent = Some(x);
        }
        let parent = self.nodes[x].parent;
        self.nodes[y].parent = parent;
        self.replace_child(parent, x, Some(y));
        self.nodes[y].left = Some(x);
        self.nodes[x].parent = Some(y);
    }

    fn rotate_right(&mut self, x: NodeId) {
        let y = self.nodes[x].left.expect("rotate_right needs a left child");
        let inner = self.nodes[y].right;
        self.nodes[x].left = inner;
        if let Some(c) = inner {
            self.nodes[c].parent = Some(x);
        }
        let parent = self.nodes[x].parent;
        self.nodes[y].parent = parent;
        self.replace_child(parent, x, Some(y));
        self.nodes[y].right = Some(x);
        self.nodes[x].parent = Some(y);
    }

    // A fresh node is red, so the only possible violation is a red-red edge
    // between `x` and its parent. Walk it upward until it dissolves.
    fn fix_insert(&mut self, mut x: NodeId) {
        while let Some(p) = self.nodes[x].parent {
            if !self.nodes[p].red {
                break;
            }
            let g = self.nodes[p].parent.expect("a red node is never the root");
            if self.nodes[g].left == Some(p) {
                match self.nodes[g].right {
                    Some(u) if self.nodes[u].red => {
                        self.nodes[p].red = false;
                        self.nodes[u].red = false;
                        self.nodes[g].red = true;
                        x = g;
                    }
                    _ => {
                        if self.nodes[p].right == Some(x) {
                            x = p;
                            self.rotate_left(x);
                        }
                        let p = self.nodes[x].parent.expect("outer child has a parent");
                        let g = self.nodes[p].parent.expect("red-red edge has a grandparent");
                        self.nodes[p].red = false;
                        self.nodes[g].red = true;
                        self.rotate_right(g);
                    }
                }
            } else {
                match self.nodes[g].left {
                    Some(u) if self.nodes[u].red => {
                        self.nodes[p].red = false;
                        self.nodes[u].red = false;
                        self.nodes[g].red = true;
                        x = g;
                    }
                    _ => {
                        if self.nodes[p].left == Some(x) {
                            x = p;
                            self.rotate_right(x);
                        }
                        let p = self.nodes[x].parent.expect("outer child has a parent");
                        let g = self.nodes[p].parent.expect("red-red edge has a grandparent");
                        self.nodes[p].red = false;
                        self.nodes[g].red = true;
                        self.rotate_left(g);
                    }
                }
            }
        }
        if let Some(root) = self.root {
            self.nodes[root].red = false;
        }
    }

    fn remove_node(&mut self, id: NodeId) -> T {
        let mut target = id;
        if self.nodes[target].left.is_some() && self.nodes[target].right.is_some() {
            // Two children: swap the stored value with the in-order successor
            // and splice the successor instead. The links stay put.
            let right = self.nodes[target].right.expect("checked above");
            let succ = self.min_in(right);
            let (lo, hi) = (target.min(succ), target.max(succ));
            let (head, tail) = self.nodes.split_at_mut(hi);
            std::mem::swap(&mut head[lo].value, &mut tail[0].value);
            target = succ;
        }

        // `target` has at most one child; splice it out.
        let child = self.nodes[target].left.or(self.nodes[target].right);
        let parent = self.nodes[target].parent;
        if let Some(c) = child {
            self.nodes[c].parent = parent;
        }
        self.replace_child(parent, target, child);

        if !self.nodes[target].red {
            self.fix_remove(child, parent);
        }
        self.detach(target)
    }

    // Restores the black-height after a black node was spliced out. `node` is
    // the child that took its place, possibly nil, known via `parent`.
    fn fix_remove(&mut self, mut node: Option<NodeId>, mut parent: Option<NodeId>) {
        while node != self.root && !self.is_red(node) {
            let Some(p) = parent else {
                break;
            };
            if self.nodes[p].left == node {
                let mut sib = self.nodes[p]
                    .right
                    .expect("a black deficit implies a sibling");
                if self.nodes[sib].red {
                    self.nodes[sib].red = false;
                    self.nodes[p].red = true;
                    self.rotate_left(p);
                    sib = self.nodes[p].right.expect("rotation keeps a sibling");
                }
                let near_red = self.is_red(self.nodes[sib].left);
                let far_red = self.is_red(self.nodes[sib].right);
                if !near_red && !far_red {
                    self.nodes[sib].red = true;
                    node = Some(p);
                    parent = self.nodes[p].parent;
                } else {
                    if !far_red {
                        let near = self.nodes[sib].left.expect("near child is red");
                        self.nodes[near].red = false;
                        self.nodes[sib].red = true;
                        self.rotate_right(sib);
                        sib = self.nodes[p].right.expect("rotation keeps a sibling");
                    }
                    self.nodes[sib].red = self.nodes[p].red;
                    self.nodes[p].red = false;
                    if let Some(far) = self.nodes[sib].right {
                        self.nodes[far].red = false;
                    }
                    self.rotate_left(p);
                    node = self.root;
                }
            } else {
                let mut sib = self.nodes[p]
                    .left
                    .expect("a black deficit implies a sibling");
                if self.nodes[sib].red {
                    self.nodes[sib].red = false;
                    self.nodes[p].red = true;
                    self.rotate_right(p);
                    sib = self.nodes[p].left.expect("rotation keeps a sibling");
                }
                let near_red = self.is_red(self.nodes[sib].right);
                let far_red = self.is_red(self.nodes[sib].left);
                if !near_red && !far_red {
                    self.nodes[sib].red = true;
                    node = Some(p);
                    parent = self.nodes[p].parent;
                } else {
                    if !far_red {
                        let near = self.nodes[sib].right.expect("near child is red");
                        self.nodes[near].red = false;
                        self.nodes[sib].red = true;
                        self.rotate_left(sib);
                        sib = self.nodes[p].left.expect("rotation keeps a sibling");
                    }
                    self.nodes[sib].red = self.nodes[p].red;
                    self.nodes[p].red = false;
                    if let Some(far) = self.nodes[sib].left {
                        self.nodes[far].red = false;
                    }
                    self.rotate_right(p);
                    node = self.root;
                }
            }
        }
        if let Some(id) = node {
            self.nodes[id].red = false;
        }
    }

    // Frees an already unlinked slot. The last arena slot moves into it, so
    // every link pointing at the old last index is re-aimed first.
    fn detach(&mut self, id: NodeId) -> T {
        let last = self.nodes.len() - 1;
        if id != last {
            let parent = self.nodes[last].parent;
            let left = self.nodes[last].left;
            let right = self.nodes[last].right;
            self.replace_child(parent, last, Some(id));
            if let Some(l) = left {
                self.nodes[l].parent = Some(id);
            }
            if let Some(r) = right {
                self.nodes[r].parent = Some(id);
            }
        }
        self.nodes.swap_remove(id).value
    }
}

impl<T: Ord> Default for RbTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord> FromIterator<T> for RbTree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<T, C: Comparator<T>> Extend<T> for RbTree<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<'a, T, C: Comparator<T>> IntoIterator for &'a RbTree<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

/// Lazy in-order cursor. Starts at the leftmost node and walks successor
/// links, so it needs no auxiliary stack.
pub struct Iter<'a, T> {
    nodes: &'a [Node<T>],
    next: Option<NodeId>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let id = self.next?;
        self.next = self.successor(id);
        self.remaining -= 1;
        Some(&self.nodes[id].value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> Iter<'_, T> {
    fn successor(&self, id: NodeId) -> Option<NodeId> {
        if let Some(mut cur) = self.nodes[id].right {
            while let Some(left) = self.nodes[cur].left {
                cur = left;
            }
            return Some(cur);
        }
        let mut cur = id;
        let mut parent = self.nodes[id].parent;
        while let Some(p) = parent {
            if self.nodes[p].left == Some(cur) {
                return Some(p);
            }
            cur = p;
            parent = self.nodes[p].parent;
        }
        None
    }
}
