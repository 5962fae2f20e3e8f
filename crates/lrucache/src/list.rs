//! Recency list ordered from least recently used (head) to most recently
//! used (tail).
//!
//! Entries live in an arena and link to each other through [`Handle`]s, so
//! splicing is O(1) and no entry is ever shared or aliased. Freed slots go
//! on a free list and are reused by the next push.

/// Stable reference to an entry's slot in a [`RecencyList`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle(usize);

/// Entry in the recency list
struct Entry<K, V> {
    key: K,
    value: V,
    prev: Option<Handle>,
    next: Option<Handle>,
}

/// Arena-backed doubly-linked list of cache entries
pub struct RecencyList<K, V> {
    entries: Vec<Option<Entry<K, V>>>,
    head: Option<Handle>,
    tail: Option<Handle>,
    free_list: Vec<usize>,
    len: usize,
}

impl<K, V> RecencyList<K, V> {
    /// Create an empty list with room for `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            head: None,
            tail: None,
            free_list: Vec::new(),
            len: 0,
        }
    }

    /// Number of linked entries
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the list is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Handle of the least recently used entry
    pub fn head(&self) -> Option<Handle> {
        self.head
    }

    /// Handle of the most recently used entry
    pub fn tail(&self) -> Option<Handle> {
        self.tail
    }

    /// Key stored at `handle`
    pub fn key(&self, handle: Handle) -> Option<&K> {
        self.entry(handle).map(|entry| &entry.key)
    }

    /// Value stored at `handle`
    pub fn value(&self, handle: Handle) -> Option<&V> {
        self.entry(handle).map(|entry| &entry.value)
    }

    /// Mutable value stored at `handle`
    pub fn value_mut(&mut self, handle: Handle) -> Option<&mut V> {
        self.entry_mut(handle).map(|entry| &mut entry.value)
    }

    /// Append a new entry as the most recently used one
    pub fn push_tail(&mut self, key: K, value: V) -> Handle {
        let handle = self.alloc_slot();
        self.entries[handle.0] = Some(Entry {
            key,
            value,
            prev: None,
            next: None,
        });
        self.attach_tail(handle);
        self.len += 1;
        handle
    }

    /// Splice the entry out of its position and reattach it at the tail
    pub fn move_to_tail(&mut self, handle: Handle) {
        if self.tail == Some(handle) || self.entry(handle).is_none() {
            return;
        }

        self.unlink(handle);
        self.attach_tail(handle);
    }

    /// Detach and return the least recently used entry
    pub fn pop_head(&mut self) -> Option<(K, V)> {
        let head = self.head?;
        self.unlink(head);

        let entry = self.entries[head.0].take()?;
        self.free_list.push(head.0);
        self.len -= 1;

        Some((entry.key, entry.value))
    }

    /// Iterate from least to most recently used
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            list: self,
            next: self.head,
        }
    }

    fn entry(&self, handle: Handle) -> Option<&Entry<K, V>> {
        self.entries.get(handle.0).and_then(Option::as_ref)
    }

    fn entry_mut(&mut self, handle: Handle) -> Option<&mut Entry<K, V>> {
        self.entries.get_mut(handle.0).and_then(Option::as_mut)
    }

    fn attach_tail(&mut self, handle: Handle) {
        let old_tail = self.tail;

        if let Some(entry) = self.entry_mut(handle) {
            entry.prev = old_tail;
            entry.next = None;
        }

        match old_tail {
            Some(tail) => {
                if let Some(tail_entry) = self.entry_mut(tail) {
                    tail_entry.next = Some(handle);
                }
            }
            None => {
                self.head = Some(handle);
            }
        }

        self.tail = Some(handle);
    }

    fn unlink(&mut self, handle: Handle) {
        let (prev, next) = match self.entry_mut(handle) {
            Some(entry) => (entry.prev.take(), entry.next.take()),
            None => return,
        };

        match prev {
            Some(prev) => {
                if let Some(prev_entry) = self.entry_mut(prev) {
                    prev_entry.next = next;
                }
            }
            None => {
                self.head = next;
            }
        }

        match next {
            Some(next) => {
                if let Some(next_entry) = self.entry_mut(next) {
                    next_entry.prev = prev;
                }
            }
            None => {
                self.tail = prev;
            }
        }
    }

    fn alloc_slot(&mut self) -> Handle {
        if let Some(idx) = self.free_list.pop() {
            Handle(idx)
        } else {
            self.entries.push(None);
            Handle(self.entries.len() - 1)
        }
    }

    /// Walk the links in both directions and confirm they agree with `len`
    #[cfg(test)]
    pub(crate) fn check_links(&self) -> Result<(), String> {
        let mut count = 0;
        let mut prev = None;
        let mut cursor = self.head;

        while let Some(handle) = cursor {
            let entry = self
                .entry(handle)
                .ok_or_else(|| format!("dangling handle {:?}", handle))?;
            if entry.prev != prev {
                return Err(format!("broken prev link at {:?}", handle));
            }
            count += 1;
            if count > self.len {
                return Err("cycle in recency list".to_string());
            }
            prev = Some(handle);
            cursor = entry.next;
        }

        if prev != self.tail {
            return Err(format!("tail {:?} but walk ended at {:?}", self.tail, prev));
        }
        if count != self.len {
            return Err(format!("walked {} entries, len is {}", count, self.len));
        }
        Ok(())
    }
}

/// Iterator over a [`RecencyList`] from head to tail
pub struct Iter<'a, K, V> {
    list: &'a RecencyList<K, V>,
    next: Option<Handle>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.list.entry(self.next?)?;
        self.next = entry.next;
        Some((&entry.key, &entry.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(list: &RecencyList<u32, &str>) -> Vec<u32> {
        list.iter().map(|(k, _)| *k).collect()
    }

    #[test]
    fn test_list_push_tail() {
        let mut list = RecencyList::with_capacity(4);
        assert!(list.is_empty());
        assert_eq!(list.head(), None);
        assert_eq!(list.tail(), None);

        let a = list.push_tail(1, "a");
        assert_eq!(list.head(), Some(a));
        assert_eq!(list.tail(), Some(a));

        let b = list.push_tail(2, "b");
        list.push_tail(3, "c");

        assert_eq!(keys(&list), vec![1, 2, 3]);
        assert_eq!(list.key(b), Some(&2));
        assert_eq!(list.value(b), Some(&"b"));
        assert_eq!(list.len(), 3);
        list.check_links().unwrap();
    }

    #[test]
    fn test_list_move_head_to_tail() {
        let mut list = RecencyList::with_capacity(3);
        let a = list.push_tail(1, "a");
        list.push_tail(2, "b");
        list.push_tail(3, "c");

        list.move_to_tail(a);

        assert_eq!(keys(&list), vec![2, 3, 1]);
        assert_eq!(list.tail(), Some(a));
        list.check_links().unwrap();
    }

    #[test]
    fn test_list_move_interior_to_tail() {
        let mut list = RecencyList::with_capacity(3);
        list.push_tail(1, "a");
        let b = list.push_tail(2, "b");
        list.push_tail(3, "c");

        list.move_to_tail(b);

        assert_eq!(keys(&list), vec![1, 3, 2]);
        list.check_links().unwrap();
    }

    #[test]
    fn test_list_move_tail_is_noop() {
        let mut list = RecencyList::with_capacity(2);
        list.push_tail(1, "a");
        let b = list.push_tail(2, "b");

        list.move_to_tail(b);

        assert_eq!(keys(&list), vec![1, 2]);
        list.check_links().unwrap();
    }

    #[test]
    fn test_list_single_entry() {
        let mut list = RecencyList::with_capacity(1);
        let a = list.push_tail(1, "a");

        list.move_to_tail(a);
        assert_eq!(list.head(), Some(a));
        assert_eq!(list.tail(), Some(a));

        assert_eq!(list.pop_head(), Some((1, "a")));
        assert!(list.is_empty());
        assert_eq!(list.head(), None);
        assert_eq!(list.tail(), None);
        assert_eq!(list.pop_head(), None);
        list.check_links().unwrap();
    }

    #[test]
    fn test_list_pop_head_order() {
        let mut list = RecencyList::with_capacity(3);
        list.push_tail(1, "a");
        list.push_tail(2, "b");
        list.push_tail(3, "c");

        assert_eq!(list.pop_head(), Some((1, "a")));
        assert_eq!(keys(&list), vec![2, 3]);
        list.check_links().unwrap();

        assert_eq!(list.pop_head(), Some((2, "b")));
        assert_eq!(list.pop_head(), Some((3, "c")));
        assert_eq!(list.pop_head(), None);
    }

    #[test]
    fn test_list_reuses_freed_slot() {
        let mut list = RecencyList::with_capacity(2);
        let a = list.push_tail(1, "a");
        list.push_tail(2, "b");
        list.pop_head();

        let c = list.push_tail(3, "c");

        assert_eq!(c, a);
        assert_eq!(list.entries.len(), 2);
        assert_eq!(keys(&list), vec![2, 3]);
        list.check_links().unwrap();
    }

    #[test]
    fn test_list_value_mut() {
        let mut list = RecencyList::with_capacity(1);
        let a = list.push_tail(1, "a");

        if let Some(value) = list.value_mut(a) {
            *value = "z";
        }

        assert_eq!(list.value(a), Some(&"z"));
    }
}
