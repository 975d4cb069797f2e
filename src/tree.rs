//! Owned AVL tree keyed by name.
//!
//! Every node exclusively owns its two child slots ([`Link`]); there are no
//! parent pointers. Structural functions take a subtree by value and hand back
//! the (possibly different) subtree root, so callers always reassign:
//!
//! ```rust
//! use econ_avl::tree::{insert_or_update, DuplicatePolicy, Rotations};
//!
//! let mut root = None;
//! let mut rotations = Rotations::default();
//! for key in ["A", "B", "C"] {
//!     let (node, _) = insert_or_update(root.take(), key, (), DuplicatePolicy::Reject, &mut rotations);
//!     root = Some(node);
//! }
//! assert_eq!(root.as_ref().map(|n| n.key()), Some("B"));
//! assert_eq!(rotations.left, 1);
//! ```
//!
//! Invariants after every returned call: BST order under byte-wise string
//! comparison, `|height(left) - height(right)| <= 1` at every node, cached
//! heights equal `1 + max(child heights)`, and no duplicate keys.

use std::cmp::Ordering;

use tracing::trace;

/// Exclusive child slot.
pub type Link<V> = Option<Box<Node<V>>>;

#[derive(Clone)]
pub struct Node<V> {
    key: String,
    value: V,
    /// 1 for a leaf.
    height: u32,
    left: Link<V>,
    right: Link<V>,
}

impl<V> Node<V> {
    fn leaf(key: &str, value: V) -> Box<Self> {
        Box::new(Self {
            key: key.to_string(),
            value,
            height: 1,
            left: None,
            right: None,
        })
    }

    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[inline]
    pub fn value(&self) -> &V {
        &self.value
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn left(&self) -> Option<&Node<V>> {
        self.left.as_deref()
    }

    #[inline]
    pub fn right(&self) -> Option<&Node<V>> {
        self.right.as_deref()
    }

    /// `height(left) - height(right)`.
    #[inline]
    pub fn balance_factor(&self) -> i64 {
        i64::from(height(&self.left)) - i64::from(height(&self.right))
    }

    #[inline]
    fn update_height(&mut self) {
        self.height = 1 + height(&self.left).max(height(&self.right));
    }
}

/// Height of a possibly absent subtree; 0 when absent.
#[inline]
pub fn height<V>(link: &Link<V>) -> u32 {
    link.as_ref().map_or(0, |n| n.height)
}

/// What to do when the inserted key is already present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Replace the stored payload in place.
    Overwrite,
    /// Keep the stored payload; the candidate is handed back.
    Reject,
}

/// Outcome of [`insert_or_update`].
#[derive(Debug, Clone, PartialEq)]
pub enum Insertion<V> {
    /// A new node was created.
    Inserted,
    /// The key existed; carries the payload that was replaced.
    Updated(V),
    /// The key existed and the candidate payload was refused.
    Rejected(V),
}

impl<V> Insertion<V> {
    #[inline]
    pub fn is_inserted(&self) -> bool {
        matches!(self, Insertion::Inserted)
    }
}

/// Counts of single rotations performed. A double rotation counts once in each.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rotations {
    pub left: u64,
    pub right: u64,
}

/// Single right rotation around `y`. `y` must have a left child.
pub fn rotate_right<V>(mut y: Box<Node<V>>, rotations: &mut Rotations) -> Box<Node<V>> {
    let Some(mut x) = y.left.take() else {
        return y;
    };
    trace!(pivot = %y.key, new_root = %x.key, "rotate right");
    y.left = x.right.take();
    // `y` is now below `x`, so its height must be settled first.
    y.update_height();
    x.right = Some(y);
    x.update_height();
    rotations.right += 1;
    x
}

/// Single left rotation around `x`. `x` must have a right child.
pub fn rotate_left<V>(mut x: Box<Node<V>>, rotations: &mut Rotations) -> Box<Node<V>> {
    let Some(mut y) = x.right.take() else {
        return x;
    };
    trace!(pivot = %x.key, new_root = %y.key, "rotate left");
    x.right = y.left.take();
    x.update_height();
    y.left = Some(x);
    y.update_height();
    rotations.left += 1;
    y
}

/// Insert `key` into the subtree at `link`, returning the new subtree root.
///
/// On an existing key the policy is applied and the node is returned as is,
/// with no height update or rebalancing. Otherwise the heights along the
/// insertion path are recomputed and any imbalance is resolved by comparing the
/// inserted key with the heavy child's key, which picks between the single and
/// the double rotation.
pub fn insert_or_update<V>(
    link: Link<V>,
    key: &str,
    value: V,
    policy: DuplicatePolicy,
    rotations: &mut Rotations,
) -> (Box<Node<V>>, Insertion<V>) {
    let mut node = match link {
        None => return (Node::leaf(key, value), Insertion::Inserted),
        Some(node) => node,
    };

    let outcome = match key.cmp(node.key.as_str()) {
        Ordering::Less => {
            let (child, outcome) =
                insert_or_update(node.left.take(), key, value, policy, rotations);
            node.left = Some(child);
            outcome
        }
        Ordering::Greater => {
            let (child, outcome) =
                insert_or_update(node.right.take(), key, value, policy, rotations);
            node.right = Some(child);
            outcome
        }
        Ordering::Equal => {
            let outcome = match policy {
                DuplicatePolicy::Overwrite => {
                    Insertion::Updated(std::mem::replace(&mut node.value, value))
                }
                DuplicatePolicy::Reject => Insertion::Rejected(value),
            };
            return (node, outcome);
        }
    };

    node.update_height();
    let balance = node.balance_factor();

    if balance > 1 {
        let toward = node.left.as_ref().map(|l| key.cmp(l.key.as_str()));
        match toward {
            Some(Ordering::Less) => return (rotate_right(node, rotations), outcome),
            Some(Ordering::Greater) => {
                if let Some(left) = node.left.take() {
                    node.left = Some(rotate_left(left, rotations));
                }
                return (rotate_right(node, rotations), outcome);
            }
            // The key landed in a left subtree of height 2 or more, so the
            // left child exists and holds a different key.
            _ => debug_assert!(false, "left-heavy at {:?} with no diverging child", node.key),
        }
    } else if balance < -1 {
        let toward = node.right.as_ref().map(|r| key.cmp(r.key.as_str()));
        match toward {
            Some(Ordering::Greater) => return (rotate_left(node, rotations), outcome),
            Some(Ordering::Less) => {
                if let Some(right) = node.right.take() {
                    node.right = Some(rotate_right(right, rotations));
                }
                return (rotate_left(node, rotations), outcome);
            }
            // Mirror of the left-heavy case.
            _ => debug_assert!(false, "right-heavy at {:?} with no diverging child", node.key),
        }
    }

    (node, outcome)
}

/// Tear down a subtree children first. Returns the number of nodes released.
pub fn release<V>(link: Link<V>) -> usize {
    match link {
        None => 0,
        Some(mut node) => {
            let released = release(node.left.take()) + release(node.right.take());
            drop(node);
            released + 1
        }
    }
}

/// Look up `key` without recursion.
pub fn find<'a, V>(mut link: &'a Link<V>, key: &str) -> Option<&'a Node<V>> {
    while let Some(node) = link {
        link = match key.cmp(node.key.as_str()) {
            Ordering::Less => &node.left,
            Ordering::Greater => &node.right,
            Ordering::Equal => return Some(&**node),
        };
    }
    None
}

// =============================================================================
// Owning handle
// =============================================================================

/// An AVL-balanced ordered map from names to `V`.
///
/// The handle owns the root slot and reassigns it after every structural call,
/// since rotations change which node is the root.
#[derive(Clone)]
pub struct AvlTree<V> {
    pub(crate) root: Link<V>,
    len: usize,
    rotations: Rotations,
}

impl<V> AvlTree<V> {
    pub fn new() -> Self {
        Self {
            root: None,
            len: 0,
            rotations: Rotations::default(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Height of the whole tree; 0 when empty.
    #[inline]
    pub fn height(&self) -> u32 {
        height(&self.root)
    }

    #[inline]
    pub fn root(&self) -> Option<&Node<V>> {
        self.root.as_deref()
    }

    /// Rotations performed since construction or the last [`clear`](Self::clear).
    #[inline]
    pub fn rotations(&self) -> Rotations {
        self.rotations
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        find(&self.root, key).map(|n| &n.value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        find(&self.root, key).is_some()
    }

    /// Insert or handle a duplicate according to `policy`.
    ///
    /// Key validation is the caller's job; the tree accepts any string.
    pub fn insert(&mut self, key: &str, value: V, policy: DuplicatePolicy) -> Insertion<V> {
        let (root, outcome) =
            insert_or_update(self.root.take(), key, value, policy, &mut self.rotations);
        self.root = Some(root);
        if outcome.is_inserted() {
            self.len += 1;
        }
        outcome
    }

    /// Release every node. Returns how many were released.
    pub fn clear(&mut self) -> usize {
        let released = release(self.root.take());
        debug_assert_eq!(released, self.len);
        self.len = 0;
        self.rotations = Rotations::default();
        released
    }
}

impl<V> Default for AvlTree<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Drop for AvlTree<V> {
    fn drop(&mut self) {
        release(self.root.take());
    }
}

impl<V: std::fmt::Debug> std::fmt::Debug for AvlTree<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
