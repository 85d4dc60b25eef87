//! LRU List Module
//!
//! Recency-ordered doubly-linked list for cache eviction. Nodes live in an
//! arena and link to each other by slot index, so the list is plain owned
//! data and can sit behind the same lock as the key index.

/// Index of a node inside the arena.
pub type Handle = usize;

#[derive(Debug)]
struct Node<T> {
    value: T,
    prev: Option<Handle>,
    next: Option<Handle>,
}

// == LRU List ==
/// Arena-backed doubly-linked list ordered by recency.
///
/// - Head = Most recently used
/// - Tail = Least recently used
///
/// Handles stay valid until the node is removed. Freed slots are reused by
/// later pushes.
#[derive(Debug)]
pub struct LruList<T> {
    slots: Vec<Option<Node<T>>>,
    free: Vec<Handle>,
    head: Option<Handle>,
    tail: Option<Handle>,
    len: usize,
}

impl<T> Default for LruList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LruList<T> {
    // == Constructor ==
    /// Creates a new empty list.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty list with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    // == Push Front ==
    /// Inserts a value as the most recently used node.
    pub fn push_front(&mut self, value: T) -> Handle {
        let node = Node {
            value,
            prev: None,
            next: None,
        };

        let handle = match self.free.pop() {
            Some(handle) => {
                self.slots[handle] = Some(node);
                handle
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        };

        self.link_front(handle);
        self.len += 1;
        handle
    }

    // == Move To Front ==
    /// Marks a node as most recently used.
    ///
    /// Unknown handles are ignored.
    pub fn move_to_front(&mut self, handle: Handle) {
        if self.head == Some(handle) {
            return;
        }
        if self.unlink(handle) {
            self.link_front(handle);
        }
    }

    // == Remove ==
    /// Unlinks a node and returns its value, freeing the slot.
    pub fn remove(&mut self, handle: Handle) -> Option<T> {
        if !self.unlink(handle) {
            return None;
        }
        let node = self.slots.get_mut(handle)?.take()?;
        self.free.push(handle);
        self.len -= 1;
        Some(node.value)
    }

    // == Pop Back ==
    /// Removes and returns the least recently used value.
    pub fn pop_back(&mut self) -> Option<T> {
        let tail = self.tail?;
        self.remove(tail)
    }

    /// Returns the value behind a handle.
    pub fn get(&self, handle: Handle) -> Option<&T> {
        self.node(handle).map(|node| &node.value)
    }

    /// Returns the value behind a handle mutably. Recency is unchanged.
    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        self.node_mut(handle).map(|node| &mut node.value)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterates from most to least recently used.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }

    fn node(&self, handle: Handle) -> Option<&Node<T>> {
        self.slots.get(handle).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, handle: Handle) -> Option<&mut Node<T>> {
        self.slots.get_mut(handle).and_then(Option::as_mut)
    }

    /// Detaches a node from its neighbours, patching head and tail.
    fn unlink(&mut self, handle: Handle) -> bool {
        let (prev, next) = match self.node(handle) {
            Some(node) => (node.prev, node.next),
            None => return false,
        };

        match prev {
            Some(p) => {
                if let Some(node) = self.node_mut(p) {
                    node.next = next;
                }
            }
            None => self.head = next,
        }

        match next {
            Some(n) => {
                if let Some(node) = self.node_mut(n) {
                    node.prev = prev;
                }
            }
            None => self.tail = prev,
        }

        if let Some(node) = self.node_mut(handle) {
            node.prev = None;
            node.next = None;
        }
        true
    }

    fn link_front(&mut self, handle: Handle) {
        let old_head = self.head;

        if let Some(node) = self.node_mut(handle) {
            node.prev = None;
            node.next = old_head;
        }

        match old_head {
            Some(h) => {
                if let Some(node) = self.node_mut(h) {
                    node.prev = Some(handle);
                }
            }
            None => self.tail = Some(handle),
        }

        self.head = Some(handle);
    }
}

/// Front-to-back iterator over an [`LruList`].
pub struct Iter<'a, T> {
    list: &'a LruList<T>,
    cursor: Option<Handle>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.list.node(self.cursor?)?;
        self.cursor = node.next;
        Some(&node.value)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn collect(list: &LruList<&'static str>) -> Vec<&'static str> {
        list.iter().copied().collect()
    }

    /// Walks the list backwards from the tail.
    fn collect_rev(list: &LruList<&'static str>) -> Vec<&'static str> {
        let mut out = Vec::new();
        let mut cursor = list.tail;
        while let Some(h) = cursor {
            let node = list.node(h).unwrap();
            out.push(node.value);
            cursor = node.prev;
        }
        out
    }

    #[test]
    fn test_lru_new() {
        let lru: LruList<&str> = LruList::new();
        assert!(lru.is_empty());
        assert_eq!(lru.len(), 0);
        assert!(lru.iter().next().is_none());
    }

    #[test]
    fn test_push_front_orders_newest_first() {
        let mut lru = LruList::new();
        lru.push_front("a");
        lru.push_front("b");
        lru.push_front("c");

        assert_eq!(lru.len(), 3);
        assert_eq!(collect(&lru), vec!["c", "b", "a"]);
        assert_eq!(collect_rev(&lru), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_move_to_front_from_tail_and_middle() {
        let mut lru = LruList::new();
        let a = lru.push_front("a");
        let b = lru.push_front("b");
        lru.push_front("c");

        lru.move_to_front(a);
        assert_eq!(collect(&lru), vec!["a", "c", "b"]);

        lru.move_to_front(b);
        assert_eq!(collect(&lru), vec!["b", "a", "c"]);
        assert_eq!(collect_rev(&lru), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_move_head_is_noop() {
        let mut lru = LruList::new();
        lru.push_front("a");
        let b = lru.push_front("b");

        lru.move_to_front(b);
        assert_eq!(collect(&lru), vec!["b", "a"]);
    }

    #[test]
    fn test_pop_back_evicts_oldest() {
        let mut lru = LruList::new();
        lru.push_front("a");
        lru.push_front("b");
        lru.push_front("c");

        assert_eq!(lru.pop_back(), Some("a"));
        assert_eq!(lru.pop_back(), Some("b"));
        assert_eq!(lru.len(), 1);
        assert_eq!(lru.pop_back(), Some("c"));
        assert_eq!(lru.pop_back(), None);
        assert!(lru.is_empty());
    }

    #[test]
    fn test_remove_middle_and_reuse_slot() {
        let mut lru = LruList::new();
        lru.push_front("a");
        let b = lru.push_front("b");
        lru.push_front("c");

        assert_eq!(lru.remove(b), Some("b"));
        assert_eq!(lru.remove(b), None);
        assert_eq!(collect(&lru), vec!["c", "a"]);

        let d = lru.push_front("d");
        assert_eq!(d, b, "freed slot should be reused");
        assert_eq!(collect(&lru), vec!["d", "c", "a"]);
        assert_eq!(collect_rev(&lru), vec!["a", "c", "d"]);
    }

    #[test]
    fn test_remove_only_node() {
        let mut lru = LruList::new();
        let a = lru.push_front("a");

        assert_eq!(lru.remove(a), Some("a"));
        assert!(lru.head.is_none());
        assert!(lru.tail.is_none());

        lru.push_front("b");
        assert_eq!(collect(&lru), vec!["b"]);
    }

    #[test]
    fn test_unknown_handle_is_ignored() {
        let mut lru = LruList::new();
        lru.push_front("a");

        lru.move_to_front(42);
        assert_eq!(lru.remove(42), None);
        assert!(lru.get(42).is_none());
        assert_eq!(lru.len(), 1);
    }

    #[test]
    fn test_get_mut_keeps_order() {
        let mut lru = LruList::new();
        let a = lru.push_front("a");
        lru.push_front("b");

        *lru.get_mut(a).unwrap() = "z";
        assert_eq!(collect(&lru), vec!["b", "z"]);
    }
}
