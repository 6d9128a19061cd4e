//! Node records for the compressed prefix tree.
//!
//! Every node owns its children outright: the tree is a plain ownership tree
//! with no back-pointers, so a split is just a field shuffle on one node.

use smallvec::SmallVec;

/// Edge labels up to this many bytes are stored inline in the node.
pub(crate) const INLINE_LABEL_LEN: usize = 16;

/// Edge label from a node's parent to the node.
pub(crate) type Label = SmallVec<[u8; INLINE_LABEL_LEN]>;

/// Number of leading bytes shared by `a` and `b`.
#[inline]
pub(crate) fn common_prefix_len(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

pub(crate) struct Node<T> {
    /// Empty only for the root.
    pub(crate) prefix: Label,
    pub(crate) value: Option<T>,
    /// No two children share a leading byte.
    pub(crate) children: Vec<Node<T>>,
    /// Distance from the root at creation time. Reported back to callers but
    /// never consulted while walking; nodes moved below a split keep theirs.
    pub(crate) depth: usize,
}

impl<T> Node<T> {
    pub(crate) fn root() -> Self {
        Self {
            prefix: Label::new(),
            value: None,
            children: Vec::new(),
            depth: 0,
        }
    }

    pub(crate) fn leaf(prefix: &[u8], value: T, depth: usize) -> Self {
        Self {
            prefix: Label::from_slice(prefix),
            value: Some(value),
            children: Vec::new(),
            depth,
        }
    }

    /// Finds the child whose label shares a non-empty prefix with `key`.
    ///
    /// Returns the child's index and the length of the shared prefix. At most
    /// one child can qualify since siblings never share a leading byte, so the
    /// scan stops at the first hit.
    #[inline]
    pub(crate) fn find_child(&self, key: &[u8]) -> Option<(usize, usize)> {
        self.children.iter().enumerate().find_map(|(idx, child)| {
            if child.prefix.is_empty() {
                return None;
            }
            let common = common_prefix_len(&child.prefix, key);
            (common > 0).then_some((idx, common))
        })
    }

    /// Splits this node's edge at `at`.
    ///
    /// The node keeps `prefix[..at]` and becomes a valueless branch point with a
    /// single child that takes over `prefix[at..]`, the old value and the old
    /// children.
    pub(crate) fn split(&mut self, at: usize) {
        assert!(
            at > 0 && at < self.prefix.len(),
            "split index {} out of range for edge of length {}",
            at,
            self.prefix.len()
        );

        let tail = Node {
            prefix: Label::from_slice(&self.prefix[at..]),
            value: self.value.take(),
            children: std::mem::take(&mut self.children),
            depth: self.depth + 1,
        };
        self.prefix.truncate(at);
        self.children.push(tail);

        tracing::trace!(at, depth = self.depth + 1, "split edge");
    }

    /// Copy of this node without its children.
    fn detached(&self) -> Self
    where
        T: Clone,
    {
        Self {
            prefix: self.prefix.clone(),
            value: self.value.clone(),
            children: Vec::new(),
            depth: self.depth,
        }
    }

    /// Total number of nodes in this subtree, this one included.
    pub(crate) fn count(&self) -> usize {
        let mut total = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            total += 1;
            stack.extend(node.children.iter());
        }
        total
    }
}

// Drop and Clone walk the subtree with explicit stacks; a chain of nodes can be
// as deep as the longest key.
impl<T> Drop for Node<T> {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

impl<T: Clone> Clone for Node<T> {
    fn clone(&self) -> Self {
        // Detached copies of every descendant in pre-order, with child counts.
        let mut order = Vec::new();
        let mut pending: Vec<&Node<T>> = self.children.iter().rev().collect();
        while let Some(node) = pending.pop() {
            order.push((node.detached(), node.children.len()));
            pending.extend(node.children.iter().rev());
        }

        // In reverse pre-order a node's children are already complete and sit
        // on top of `built`, last child first.
        let mut built: Vec<Node<T>> = Vec::with_capacity(order.len());
        for (mut copy, n) in order.into_iter().rev() {
            let at = built.len() - n;
            copy.children = built.drain(at..).rev().collect();
            built.push(copy);
        }

        let mut root = self.detached();
        built.reverse();
        root.children = built;
        root
    }
}
