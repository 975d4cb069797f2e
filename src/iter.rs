//! In-order traversal.

use crate::tree::{AvlTree, Node};

/// Ascending-key iterator over an [`AvlTree`].
///
/// Keeps the left spine of the unvisited part on an explicit stack, so auxiliary
/// space is bounded by the tree height.
pub struct Iter<'a, V> {
    stack: Vec<&'a Node<V>>,
    remaining: usize,
}

impl<'a, V> Iter<'a, V> {
    fn new(root: Option<&'a Node<V>>, len: usize) -> Self {
        let mut iter = Self {
            stack: Vec::new(),
            remaining: len,
        };
        iter.push_left_spine(root);
        iter
    }

    fn push_left_spine(&mut self, mut node: Option<&'a Node<V>>) {
        while let Some(n) = node {
            self.stack.push(n);
            node = n.left();
        }
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right());
        self.remaining = self.remaining.saturating_sub(1);
        Some((node.key(), node.value()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

impl<V> AvlTree<V> {
    /// Iterate in ascending key order. Each call starts again from the root.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter::new(self.root(), self.len())
    }

    /// Call `visit` on every record in ascending key order.
    pub fn for_each_in_order(&self, mut visit: impl FnMut(&str, &V)) {
        for_each_in_order(self.root(), &mut visit);
    }
}

impl<'a, V> IntoIterator for &'a AvlTree<V> {
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Recursive left, node, right walk of a subtree.
pub fn for_each_in_order<V, F: FnMut(&str, &V)>(node: Option<&Node<V>>, visit: &mut F) {
    if let Some(node) = node {
        for_each_in_order(node.left(), visit);
        visit(node.key(), node.value());
        for_each_in_order(node.right(), visit);
    }
}
