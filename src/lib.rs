//! # radix-rs
//!
//! A compressed prefix tree (radix tree) over byte-string keys, with exact and
//! longest-prefix lookup.
//!
//! Edges carry variable-length labels and are split on demand, so no node ever
//! has two children sharing a leading byte. Deletion only clears values; it
//! never removes or merges nodes.
//!
//! ## Example
//!
//! ```rust
//! use radix_rs::RadixTree;
//!
//! let mut tree: RadixTree<u64> = RadixTree::new();
//! tree.insert("foo", 1);
//! tree.insert("foobar", 2);
//!
//! assert_eq!(tree.get("foo"), Some(&1));
//! assert_eq!(tree.get("foob"), None);
//! assert_eq!(tree.get_longest("foobaz"), Some(&1));
//! assert_eq!(tree.get_longest("foobarbaz"), Some(&2));
//! ```
//!
//! The tree does no locking of its own. Share it across threads behind a
//! reader/writer lock around the whole tree.

mod node;

use node::Node;

/// A radix tree mapping byte-string keys to values of type `T`.
///
/// `T` needs no capabilities at all: presence is tracked per node, so a stored
/// `0` or `""` is just as present as any other value.
#[derive(Clone)]
pub struct RadixTree<T> {
    root: Node<T>,
    /// Number of nodes carrying a value.
    len: usize,
}

impl<T> RadixTree<T> {
    pub fn new() -> Self {
        Self {
            root: Node::root(),
            len: 0,
        }
    }

    /// Number of keys with a present value.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Total number of structural nodes, the root included.
    ///
    /// Deleting never frees nodes, so this only grows over the tree's lifetime.
    pub fn node_count(&self) -> usize {
        self.root.count()
    }

    /// Inserts `value` under `key`, overwriting any previous value.
    ///
    /// Returns the depth recorded on the node that now holds the value. Depths
    /// are assigned when a node is created and are diagnostic only.
    pub fn insert(&mut self, key: impl AsRef<[u8]>, value: T) -> usize {
        let mut rest = key.as_ref();
        let mut node = &mut self.root;

        loop {
            if rest.is_empty() {
                if node.value.replace(value).is_none() {
                    self.len += 1;
                }
                return node.depth;
            }

            let Some((idx, common)) = node.find_child(rest) else {
                let depth = node.depth + 1;
                node.children.push(Node::leaf(rest, value, depth));
                self.len += 1;
                tracing::trace!(depth, len = rest.len(), "new edge");
                return depth;
            };

            let child = &mut node.children[idx];
            if common < child.prefix.len() {
                child.split(common);
            }
            node = child;
            rest = &rest[common..];
        }
    }

    /// Clears the value stored under `key`.
    ///
    /// Returns the depth of the last node reached and whether a node whose path
    /// spells exactly `key` exists. Such a node reports `true` even when it had
    /// no value. Nothing is mutated when the key runs off the tree.
    pub fn delete(&mut self, key: impl AsRef<[u8]>) -> (usize, bool) {
        let mut rest = key.as_ref();
        let mut node = &mut self.root;

        loop {
            if rest.is_empty() {
                if node.value.take().is_some() {
                    self.len -= 1;
                }
                return (node.depth, true);
            }

            let Some((idx, common)) = node.find_child(rest) else {
                return (node.depth, false);
            };

            let child = &mut node.children[idx];
            if common < child.prefix.len() {
                return (child.depth, false);
            }
            node = child;
            rest = &rest[common..];
        }
    }

    /// Exact lookup.
    pub fn get(&self, key: impl AsRef<[u8]>) -> Option<&T> {
        let mut rest = key.as_ref();
        let mut node = &self.root;

        while !rest.is_empty() {
            let (idx, common) = node.find_child(rest)?;
            let child = &node.children[idx];
            if common < child.prefix.len() {
                return None;
            }
            node = child;
            rest = &rest[common..];
        }

        node.value.as_ref()
    }

    pub fn contains_key(&self, key: impl AsRef<[u8]>) -> bool {
        self.get(key).is_some()
    }

    /// Longest-prefix lookup.
    ///
    /// Returns the value stored under the longest inserted key that is a prefix
    /// of `key` (or equal to it), or `None` when there is no such key.
    pub fn get_longest(&self, key: impl AsRef<[u8]>) -> Option<&T> {
        self.get_longest_with_len(key).map(|(_, value)| value)
    }

    /// Like [`get_longest`](Self::get_longest), but also returns the length of
    /// the matched prefix of `key`.
    pub fn get_longest_with_len(&self, key: impl AsRef<[u8]>) -> Option<(usize, &T)> {
        let key = key.as_ref();
        let mut node = &self.root;
        let mut consumed = 0;
        let mut best = node.value.as_ref().map(|value| (0, value));

        while consumed < key.len() {
            let Some((idx, common)) = node.find_child(&key[consumed..]) else {
                break;
            };
            let child = &node.children[idx];
            if common < child.prefix.len() {
                // Diverged partway along the edge.
                break;
            }
            consumed += common;
            node = child;
            if let Some(value) = node.value.as_ref() {
                best = Some((consumed, value));
            }
        }

        best
    }

    /// Iterates over all present entries depth-first, parents before children.
    ///
    /// Siblings come in the order their leading byte first appeared under that
    /// parent: a branch point created by a split takes over the slot of the edge
    /// it split.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            stack: vec![(&self.root, 0)],
            path: Vec::new(),
        }
    }
}

impl<T> Default for RadixTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for RadixTree<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(k, v)| (EscapedKey(k), v)))
            .finish()
    }
}

/// Renders a key as a quoted string with non-printable bytes escaped.
struct EscapedKey(Vec<u8>);

impl std::fmt::Debug for EscapedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\"", self.0.escape_ascii())
    }
}

impl<K: AsRef<[u8]>, T> Extend<(K, T)> for RadixTree<T> {
    fn extend<I: IntoIterator<Item = (K, T)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K: AsRef<[u8]>, T> FromIterator<(K, T)> for RadixTree<T> {
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<'a, T> IntoIterator for &'a RadixTree<T> {
    type Item = (Vec<u8>, &'a T);
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct Iter<'a, T> {
    /// Pending nodes with the length of their parent's path.
    stack: Vec<(&'a Node<T>, usize)>,
    /// Reconstructed key of the node most recently visited.
    path: Vec<u8>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (Vec<u8>, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((node, parent_len)) = self.stack.pop() {
            self.path.truncate(parent_len);
            self.path.extend_from_slice(&node.prefix);

            let len = self.path.len();
            for child in node.children.iter().rev() {
                self.stack.push((child, len));
            }

            if let Some(ref value) = node.value {
                return Some((self.path.clone(), value));
            }
        }
        None
    }
}
