use std::{
    alloc::Layout,
    cell::Cell,
    ops::{Bound, Range},
    rc::Rc,
};

use proptest::prelude::*;

use crate::model;

use super::*;

// Every ordering of `0..n`.
fn permutations(n: u32) -> Vec<Vec<u32>> {
    let mut perms = vec![Vec::new()];

    for key in 0..n {
        perms = perms
            .into_iter()
            .flat_map(|perm| {
                (0..=perm.len()).map(move |at| {
                    let mut next = perm.clone();
                    next.insert(at, key);
                    next
                })
            })
            .collect();
    }

    perms
}

fn collect<V: Copy, KO, C, A: NodeAlloc>(tree: &RbTree<V, KO, C, A>) -> Vec<V> {
    tree.iter().copied().collect()
}

fn root_of<V, KO, C, A: NodeAlloc>(tree: &RbTree<V, KO, C, A>) -> Option<(&V, Color)> {
    tree.header()
        .root
        .map(|root| unsafe { (&(*root.as_ptr()).value, links(root).color()) })
}

fn insert_find_all(keys: &[u32]) {
    let mut tree: RbTree<u32> = RbTree::new();

    for &key in keys {
        assert!(tree.insert_unique(key).1);
        tree.assert_invariants();
    }

    for key in keys {
        assert_eq!(tree.find(key).get(), Some(key), "item not found");
    }

    let mut sorted = keys.to_vec();
    sorted.sort_unstable();
    assert_eq!(collect(&tree), sorted);
}

fn insert_remove_all(keys: &[u32]) {
    let mut tree: RbTree<u32> = RbTree::new();

    tree.extend_unique(keys.iter().copied());
    tree.assert_invariants();

    for key in keys {
        assert_eq!(tree.find_mut(key).remove_current(), Some(*key));
        tree.assert_invariants();
    }
    assert!(tree.is_empty());

    tree.extend_unique(keys.iter().copied());
    for key in keys.iter().rev() {
        assert_eq!(tree.remove(key), 1);
        tree.assert_invariants();
    }
    assert!(tree.is_empty());
}

#[test]
fn zero_elems_find() {
    insert_find_all(&[]);
}

#[test]
fn small_permutations_find() {
    for n in 1..=6 {
        for perm in permutations(n) {
            insert_find_all(&perm);
        }
    }
}

#[test]
fn small_permutations_remove() {
    for n in 1..=6 {
        for perm in permutations(n) {
            insert_remove_all(&perm);
        }
    }
}

#[test]
fn ascending_and_descending_runs() {
    let mut tree: RbTree<u32> = RbTree::new();

    for key in 0..512 {
        tree.insert_unique(key);
    }
    for key in (512..1024).rev() {
        tree.insert_unique(key);
    }
    tree.assert_invariants();
    assert_eq!(tree.len(), 1024);
    assert!(tree.iter().copied().eq(0..1024));

    for key in (0..1024).step_by(3) {
        assert_eq!(tree.remove(&key), 1);
    }
    tree.assert_invariants();
    assert!(tree.iter().copied().eq((0..1024).filter(|k| k % 3 != 0)));
}

#[test]
fn scenario_unique_insert() {
    let mut tree: RbTree<u32> = RbTree::new();

    for key in [10, 20, 5, 15, 25, 3] {
        tree.insert_unique(key);
        tree.assert_invariants();
    }

    assert_eq!(collect(&tree), [3, 5, 10, 15, 20, 25]);
    assert_eq!(root_of(&tree), Some((&10, Color::Black)));
}

#[test]
fn scenario_erase_root() {
    let mut tree: RbTree<u32> = RbTree::new();
    tree.extend_unique([10, 20, 5, 15, 25, 3]);

    assert_eq!(tree.remove(&10), 1);
    tree.assert_invariants();

    assert_eq!(collect(&tree), [3, 5, 15, 20, 25]);
    // The successor takes over the erased node's position and color.
    assert_eq!(root_of(&tree), Some((&15, Color::Black)));
}

#[test]
fn scenario_equal_keys_are_stable() {
    let mut tree: RbTree<(u32, char), First> = RbTree::new();

    for tag in ['A', 'B', 'C'] {
        tree.insert_equal((5, tag));
        tree.assert_invariants();
    }

    let (lo, hi) = tree.equal_range(&5);
    assert_eq!(lo, tree.cursor_front());
    assert!(hi.is_end());
    assert_eq!(tree.count(&5), 3);

    let tags: Vec<char> = tree
        .range(Bound::Included(&5), Bound::Included(&5))
        .map(|&(_, tag)| tag)
        .collect();
    assert_eq!(tags, ['A', 'B', 'C']);
}

#[test]
fn scenario_lookups() {
    let mut tree: RbTree<u32> = RbTree::new();
    tree.extend_unique([3, 5, 10, 15]);

    assert!(tree.find(&7).is_end());
    assert_eq!(tree.find(&7), tree.cursor_end());
    assert_eq!(tree.lower_bound(&7).get(), Some(&10));
    assert_eq!(tree.upper_bound(&5).get(), Some(&10));
    assert_eq!(tree.lower_bound(&5).get(), Some(&5));
    assert!(tree.upper_bound(&15).is_end());
    assert_eq!(tree.lower_bound(&0), tree.cursor_front());
}

#[test]
fn unique_insert_keeps_existing_payload() {
    let mut tree: RbTree<(u32, &str), First> = RbTree::new();

    assert!(tree.insert_unique((1, "one")).1);

    let (cursor, inserted) = tree.insert_unique((1, "uno"));
    assert!(!inserted);
    assert_eq!(cursor.get(), Some(&(1, "one")));

    assert_eq!(tree.len(), 1);
    assert_eq!(tree.get(&1), Some(&(1, "one")));
}

#[test]
fn unique_insert_after_equal_inserts() {
    let mut tree: RbTree<(u32, u32), First> = RbTree::new();
    tree.insert_equal((4, 0));
    tree.insert_equal((4, 1));
    tree.insert_equal((2, 2));

    let (cursor, inserted) = tree.insert_unique((4, 3));
    assert!(!inserted);
    assert_eq!(cursor.get(), Some(&(4, 1)));
    assert_eq!(tree.len(), 3);

    assert!(tree.insert_unique((3, 4)).1);
    tree.assert_invariants();
}

#[test]
fn insert_then_erase_round_trips() {
    let mut tree: RbTree<u32> = RbTree::new();
    tree.extend_unique((0..64).map(|k| k * 2));
    let before = collect(&tree);

    for key in [1, 63, 127, 200] {
        let (mut cursor, inserted) = tree.insert_unique(key);
        assert!(inserted);
        assert_eq!(cursor.remove_current(), Some(key));

        tree.assert_invariants();
        assert_eq!(collect(&tree), before);
    }
}

#[test]
fn size_tracks_successful_operations() {
    let mut tree: RbTree<u32> = RbTree::new();

    assert_eq!(tree.extend_unique([1, 2, 2, 3, 3, 3]), 3);
    assert_eq!(tree.len(), 3);

    assert_eq!(tree.remove(&9), 0);
    assert_eq!(tree.len(), 3);

    tree.extend_equal([2, 2]);
    assert_eq!(tree.len(), 5);
    assert_eq!(tree.remove(&2), 3);
    assert_eq!(tree.len(), 2);
    tree.assert_invariants();
}

#[test]
fn end_cursor_wraps_to_extremes() {
    let mut tree: RbTree<u32> = RbTree::new();
    tree.extend_unique([4, 2, 8, 6]);

    let mut cursor = tree.cursor_end();
    assert_eq!(cursor.get(), None);
    assert_eq!(cursor.peek_prev(), Some(&8));
    assert_eq!(cursor.peek_next(), Some(&2));

    cursor.move_prev();
    assert_eq!(cursor, tree.cursor_back());
    cursor.move_next();
    assert!(cursor.is_end());
    cursor.move_next();
    assert_eq!(cursor, tree.cursor_front());

    cursor.move_prev();
    assert!(cursor.is_end());

    let empty: RbTree<u32> = RbTree::new();
    let mut cursor = empty.cursor_front();
    assert!(cursor.is_end());
    cursor.move_prev();
    assert!(cursor.is_end());
}

#[test]
fn cursor_walks_both_ways() {
    let mut tree: RbTree<u32> = RbTree::new();
    tree.extend_unique([50, 30, 70, 20, 40, 60, 80, 35, 45]);

    let mut forward = Vec::new();
    let mut cursor = tree.cursor_front();
    while let Some(&key) = cursor.get() {
        forward.push(key);
        cursor.move_next();
    }

    let mut backward = Vec::new();
    let mut cursor = tree.cursor_back();
    while let Some(&key) = cursor.get() {
        backward.push(key);
        cursor.move_prev();
    }

    backward.reverse();
    assert_eq!(forward, backward);
    assert_eq!(forward, [20, 30, 35, 40, 45, 50, 60, 70, 80]);
}

#[test]
fn cursor_removal_keeps_other_positions() {
    let mut tree: RbTree<u32> = RbTree::new();
    tree.extend_unique(0..32);

    let mut cursor = tree.cursor_front_mut();
    while let Some(&key) = cursor.get() {
        if key % 2 == 0 {
            assert_eq!(cursor.remove_current(), Some(key));
        } else {
            cursor.move_next();
        }
    }
    assert!(cursor.remove_current().is_none());

    tree.assert_invariants();
    assert!(tree.iter().copied().eq((0..32).filter(|k| k % 2 == 1)));

    let mut cursor = tree.cursor_back_mut();
    assert_eq!(cursor.remove_current_and_move_prev(), Some(31));
    assert_eq!(cursor.get(), Some(&29));
    assert_eq!(cursor.peek_next(), None);

    let mut cursor = tree.cursor_front_mut();
    assert_eq!(cursor.remove_current_and_move_prev(), Some(1));
    assert!(cursor.is_end());
    tree.assert_invariants();
}

#[test]
fn cursor_removes_runs_of_positions() {
    let mut tree: RbTree<u32> = RbTree::new();
    tree.extend_unique(0..10);

    let mut cursor = tree.find_mut(&3);
    assert_eq!(cursor.remove_n(4), 4);
    assert_eq!(cursor.get(), Some(&7));
    assert_eq!(cursor.remove_n(0), 0);
    assert_eq!(cursor.get(), Some(&7));

    assert_eq!(cursor.remove_n(100), 3);
    assert!(cursor.is_end());
    assert_eq!(cursor.remove_n(1), 0);

    tree.assert_invariants();
    assert_eq!(collect(&tree), [0, 1, 2]);

    tree.extend_equal([1, 1]);
    let mut cursor = tree.cursor_front_mut();
    assert_eq!(cursor.remove_n(3), 3);
    assert_eq!(cursor.get(), Some(&1));
    tree.assert_invariants();
    assert_eq!(collect(&tree), [1, 2]);
}

#[test]
fn iterators_are_double_ended() {
    let mut tree: RbTree<u32> = RbTree::new();
    tree.extend_unique(1..=6);

    let mut iter = tree.iter();
    assert_eq!(iter.len(), 6);
    assert_eq!(iter.next(), Some(&1));
    assert_eq!(iter.next_back(), Some(&6));
    assert_eq!(iter.next(), Some(&2));
    assert_eq!(iter.next_back(), Some(&5));
    assert_eq!(iter.len(), 2);
    assert_eq!(iter.clone().collect::<Vec<_>>(), [&3, &4]);
    assert_eq!(iter.next(), Some(&3));
    assert_eq!(iter.next_back(), Some(&4));
    assert_eq!(iter.next(), None);
    assert_eq!(iter.next_back(), None);

    let mut owned = tree.into_iter();
    assert_eq!(owned.next_back(), Some(6));
    assert_eq!(owned.collect::<Vec<_>>(), [1, 2, 3, 4, 5]);
}

#[test]
fn range_queries() {
    let mut tree: RbTree<u32> = RbTree::new();
    tree.extend_unique(0..10);

    let keys = |lo: Bound<&u32>, hi: Bound<&u32>| tree.range(lo, hi).copied().collect::<Vec<_>>();

    assert_eq!(keys(Bound::Included(&3), Bound::Excluded(&6)), [3, 4, 5]);
    assert_eq!(keys(Bound::Excluded(&3), Bound::Included(&6)), [4, 5, 6]);
    assert_eq!(keys(Bound::Unbounded, Bound::Excluded(&2)), [0, 1]);
    assert_eq!(keys(Bound::Included(&8), Bound::Unbounded), [8, 9]);
    assert_eq!(keys(Bound::Included(&20), Bound::Unbounded), [] as [u32; 0]);
    assert_eq!(keys(Bound::Included(&7), Bound::Excluded(&2)), [] as [u32; 0]);
    assert_eq!(keys(Bound::Excluded(&4), Bound::Excluded(&5)), [] as [u32; 0]);

    let rev: Vec<u32> = tree
        .range(Bound::Included(&2), Bound::Included(&5))
        .rev()
        .copied()
        .collect();
    assert_eq!(rev, [5, 4, 3, 2]);
}

#[test]
fn remove_range_variants() {
    let mut tree: RbTree<u32> = RbTree::new();
    tree.extend_unique(0..10);

    assert_eq!(tree.remove_range(Bound::Included(&3), Bound::Excluded(&6)), 3);
    tree.assert_invariants();
    assert_eq!(collect(&tree), [0, 1, 2, 6, 7, 8, 9]);

    assert_eq!(tree.remove_range(Bound::Included(&8), Bound::Excluded(&2)), 0);
    assert_eq!(tree.remove_range(Bound::Included(&3), Bound::Excluded(&5)), 0);
    assert_eq!(tree.len(), 7);

    assert_eq!(tree.remove_range(Bound::Excluded(&7), Bound::Unbounded), 2);
    tree.assert_invariants();
    assert_eq!(collect(&tree), [0, 1, 2, 6, 7]);

    assert_eq!(tree.remove_range(Bound::Unbounded, Bound::Unbounded), 5);
    tree.assert_invariants();
    assert!(tree.is_empty());
    assert_eq!(tree.remove_range(Bound::Unbounded, Bound::Unbounded), 0);
}

#[test]
fn first_and_last_follow_mutation() {
    let mut tree: RbTree<(u32, u32), First> = RbTree::new();
    assert_eq!(tree.first(), None);
    assert_eq!(tree.pop_last(), None);

    tree.insert_equal((5, 0));
    tree.insert_equal((1, 1));
    tree.insert_equal((9, 2));
    tree.insert_equal((1, 3));
    tree.insert_equal((9, 4));

    assert_eq!(tree.first(), Some(&(1, 1)));
    assert_eq!(tree.last(), Some(&(9, 4)));

    assert_eq!(tree.pop_first(), Some((1, 1)));
    assert_eq!(tree.pop_last(), Some((9, 4)));
    assert_eq!(tree.first(), Some(&(1, 3)));
    assert_eq!(tree.last(), Some(&(9, 2)));
    tree.assert_invariants();
}

#[test]
fn clone_preserves_shape() {
    let mut tree: RbTree<u32> = RbTree::new();
    tree.extend_unique([41, 7, 93, 12, 58, 3, 77, 25, 66, 1, 88]);
    tree.remove(&58);

    let copy = tree.clone();
    copy.assert_invariants();
    assert_eq!(collect(&copy), collect(&tree));

    let (mut original, mut cloned) = (String::new(), String::new());
    tree.dotgraph("t", &mut original).unwrap();
    copy.dotgraph("t", &mut cloned).unwrap();
    assert_eq!(original, cloned);

    let empty: RbTree<u32> = RbTree::new();
    assert!(empty.clone().is_empty());
}

#[test]
fn swap_and_clear() {
    let mut a: RbTree<u32> = RbTree::new();
    let mut b: RbTree<u32> = RbTree::new();
    a.extend_unique(0..5);
    b.extend_unique(10..12);

    a.swap(&mut b);
    assert_eq!(collect(&a), [10, 11]);
    assert_eq!(collect(&b), [0, 1, 2, 3, 4]);
    a.assert_invariants();
    b.assert_invariants();

    b.clear();
    assert!(b.is_empty());
    assert_eq!(b.first(), None);
    assert!(b.cursor_front().is_end());
    b.assert_invariants();

    b.insert_unique(3);
    assert_eq!(collect(&b), [3]);
}

#[test]
fn payloads_are_dropped_exactly_once() {
    let token = Rc::new(());
    let mut tree: RbTree<(u32, Rc<()>), First> = RbTree::new();

    for key in 0..100 {
        tree.insert_equal((key % 10, token.clone()));
    }
    assert_eq!(Rc::strong_count(&token), 101);

    assert_eq!(tree.remove(&3), 10);
    assert_eq!(Rc::strong_count(&token), 91);

    let copy = tree.clone();
    assert_eq!(Rc::strong_count(&token), 181);
    drop(copy);
    assert_eq!(Rc::strong_count(&token), 91);

    assert_eq!(tree.remove_range(Bound::Included(&5), Bound::Unbounded), 50);
    assert_eq!(Rc::strong_count(&token), 41);

    let popped = tree.pop_first();
    assert!(popped.is_some());
    drop(popped);
    assert_eq!(Rc::strong_count(&token), 40);

    drop(tree);
    assert_eq!(Rc::strong_count(&token), 1);
}

#[test]
fn custom_orderings() {
    let mut desc: RbTree<u32, Identity, Greater> = RbTree::new();
    desc.extend_unique([3, 1, 4, 1, 5, 9, 2, 6]);
    desc.assert_invariants();
    assert_eq!(collect(&desc), [9, 6, 5, 4, 3, 2, 1]);
    assert_eq!(desc.lower_bound(&7).get(), Some(&6));

    let by_len = FnLess::<&str, _>::new(|a: &&str, b: &&str| a.len() < b.len());
    let mut tree = RbTree::with_parts(Identity, by_len, Global);
    tree.extend_equal(["ccc", "a", "bb", "dd", "e"]);
    tree.assert_invariants();
    assert_eq!(collect(&tree), ["a", "e", "bb", "dd", "ccc"]);
    assert_eq!(tree.count(&"zz"), 2);
}

#[test]
fn entries() {
    let mut tree: RbTree<(u32, &str), First> = RbTree::new();

    match tree.entry(&3) {
        Entry::Vacant(entry) => {
            let cursor = entry.insert((3, "three"));
            assert_eq!(cursor.get(), Some(&(3, "three")));
        }
        Entry::Occupied(_) => panic!("empty tree has no occupied entries"),
    }

    match tree.entry(&3) {
        Entry::Occupied(mut entry) => {
            assert_eq!(entry.get(), &(3, "three"));
            assert_eq!(entry.replace((3, "drei")), (3, "three"));
        }
        Entry::Vacant(_) => panic!("key 3 was inserted"),
    }
    assert_eq!(tree.get(&3), Some(&(3, "drei")));

    assert!(!tree.entry(&4).is_occupied());
    let cursor = tree.entry(&4).or_insert_with(|| (4, "four"));
    assert_eq!(cursor.into_ref(), Some(&(4, "four")));

    if let Entry::Occupied(entry) = tree.entry(&3) {
        assert_eq!(entry.remove(), (3, "drei"));
    }
    assert_eq!(collect(&tree), [(4, "four")]);
    tree.assert_invariants();
}

#[cfg(debug_assertions)]
#[test]
fn mismatched_entry_key_drops_value() {
    use std::panic::{self, AssertUnwindSafe};

    let token = Rc::new(());
    let mut tree: RbTree<(u32, Rc<()>), First> = RbTree::new();
    tree.insert_unique((1, token.clone()));
    tree.insert_unique((10, token.clone()));

    // The slot for 5 is left of 10; 20 belongs to its right.
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        if let Entry::Vacant(entry) = tree.entry(&5) {
            entry.insert((20, token.clone()));
        }
    }));
    assert!(result.is_err());

    assert_eq!(Rc::strong_count(&token), 3);
    assert_eq!(tree.len(), 2);
    tree.assert_invariants();

    drop(tree);
    assert_eq!(Rc::strong_count(&token), 1);
}

// Hands out a fixed number of blocks from the global heap, then fails.
#[derive(Clone)]
struct Budget {
    left: Rc<Cell<usize>>,
}

unsafe impl NodeAlloc for Budget {
    fn allocate(&self, layout: Layout) -> TreeResult<NonNull<u8>> {
        match self.left.get() {
            0 => Err(TreeError::alloc_failed(layout)),
            n => {
                self.left.set(n - 1);
                Global.allocate(layout)
            }
        }
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        unsafe { Global.deallocate(ptr, layout) }
    }
}

#[test]
fn allocation_failure_is_reported() {
    let left = Rc::new(Cell::new(2));
    let mut tree = RbTree::with_parts(Identity, Less, Budget { left: left.clone() });

    assert!(tree.try_insert_unique(1u32).is_ok());
    assert!(tree.try_insert_equal(2u32).is_ok());

    let layout = Layout::new::<Node<u32>>();
    let err = tree.try_insert_unique(3).err();
    assert_eq!(
        err,
        Some(TreeError::AllocFailed {
            size: layout.size(),
            align: layout.align(),
        })
    );

    // A duplicate never allocates.
    assert!(matches!(tree.try_insert_unique(1), Ok((_, false))));

    assert_eq!(tree.len(), 2);
    tree.assert_invariants();
}

#[test]
fn oom_handler_retries_until_it_gives_up() {
    let left = Rc::new(Cell::new(1));
    let calls = Rc::new(Cell::new(0));

    let handler = {
        let (left, calls) = (left.clone(), calls.clone());
        move |_: Layout| {
            calls.set(calls.get() + 1);
            // Free up one block on the first two calls, then give up.
            if calls.get() <= 2 {
                left.set(1);
                true
            } else {
                false
            }
        }
    };

    let alloc = OomRetry::new(Budget { left: left.clone() }, handler);
    let mut tree = RbTree::with_parts(Identity, Less, alloc);

    assert!(tree.try_insert_unique(10u32).is_ok());
    assert_eq!(calls.get(), 0);

    assert!(tree.try_insert_unique(20).is_ok());
    assert_eq!(calls.get(), 1);

    assert!(tree.try_insert_unique(30).is_ok());
    assert_eq!(calls.get(), 2);

    assert!(tree.try_insert_unique(40).is_err());
    assert_eq!(calls.get(), 3);

    assert_eq!(collect(&tree), [10, 20, 30]);
    assert_eq!(tree.allocator().inner().left.get(), 0);
    tree.assert_invariants();
}

#[test]
fn dotgraph_marks_colors() {
    let empty: RbTree<u32> = RbTree::new();
    let mut out = String::new();
    empty.dotgraph("empty", &mut out).unwrap();
    assert_eq!(out, "digraph \"graph-empty\" {}");

    let mut tree: RbTree<(u32, u32), First> = RbTree::new();
    tree.insert_equal((1, 0));
    tree.insert_equal((1, 1));

    let mut out = String::new();
    tree.dotgraph("dup", &mut out).unwrap();
    assert!(out.contains("\"graphdup-0\" [label=\"1\", style=filled, fillcolor=black"));
    assert!(out.contains("\"graphdup-1\" [label=\"1\", style=filled, fillcolor=red"));
    assert!(out.contains("\"graphdup-0\" -> \"graphdup-1\";"));
}

#[test]
fn maps() {
    let mut map: RbMap<&str, u32> = RbMap::new();

    assert_eq!(map.insert("b", 2), None);
    assert_eq!(map.insert("a", 1), None);
    assert_eq!(map.insert("b", 20), Some(2));
    assert!(!map.try_insert("a", 10));
    assert!(map.try_insert("c", 3));

    assert_eq!(map.len(), 3);
    assert_eq!(map.get(&"a"), Some(&1));
    assert_eq!(map.get(&"b"), Some(&20));
    assert!(!map.contains_key(&"z"));

    *map.get_mut(&"c").unwrap() += 1;
    assert_eq!(map.get(&"c"), Some(&4));

    *map.entry("d").or_insert(0) += 5;
    *map.entry("d").or_insert(0) += 5;
    assert_eq!(map.get(&"d"), Some(&10));
    *map.get_or_insert_default("e") += 1;

    map.entry("a").and_modify(|v| *v *= 100).or_default();
    assert_eq!(map.get(&"a"), Some(&100));

    assert_eq!(map.keys().copied().collect::<Vec<_>>(), ["a", "b", "c", "d", "e"]);
    assert_eq!(map.values().copied().collect::<Vec<_>>(), [100, 20, 4, 10, 1]);
    assert_eq!(map.first_key_value(), Some((&"a", &100)));
    assert_eq!(map.last_key_value(), Some((&"e", &1)));
    assert_eq!(map.lower_bound(&"bb"), Some((&"c", &4)));
    assert_eq!(map.upper_bound(&"e"), None);

    assert_eq!(map.remove(&"b"), Some(20));
    assert_eq!(map.remove(&"b"), None);
    assert_eq!(format!("{map:?}"), r#"{"a": 100, "c": 4, "d": 10, "e": 1}"#);
    map.as_tree().assert_invariants();

    let copy = map.clone();
    assert_eq!(map.pop_first(), Some(("a", 100)));
    assert_eq!(map.pop_last(), Some(("e", 1)));
    assert_eq!(copy.len(), 4);

    let counts: RbMap<char, usize> = "hello world"
        .chars()
        .filter(|c| c.is_alphabetic())
        .fold(RbMap::new(), |mut counts, c| {
            *counts.get_or_insert_default(c) += 1;
            counts
        });
    assert_eq!(counts.get(&'l'), Some(&3));
    assert_eq!(counts.iter().next(), Some((&'d', &1)));
}

#[test]
fn multimaps() {
    let mut map: RbMultiMap<u32, &str> = [(2, "x"), (1, "a"), (2, "y"), (3, "q"), (2, "z")]
        .into_iter()
        .collect();

    assert_eq!(map.len(), 5);
    assert_eq!(map.count(&2), 3);
    assert_eq!(
        map.get_all(&2).map(|(_, v)| *v).collect::<Vec<_>>(),
        ["x", "y", "z"]
    );
    assert_eq!(map.get_all(&7).count(), 0);

    assert_eq!(map.remove(&2), 3);
    assert_eq!(map.remove(&2), 0);
    assert_eq!(map.first_key_value(), Some((&1, &"a")));
    assert_eq!(map.pop_last(), Some((3, "q")));
    map.as_tree().assert_invariants();
    assert_eq!(map.into_iter().collect::<Vec<_>>(), [(1, "a")]);
}

#[test]
fn sets() {
    let mut set: RbSet<u32> = [5, 1, 4, 1, 3].into_iter().collect();

    assert_eq!(set.len(), 4);
    assert!(set.insert(2));
    assert!(!set.insert(2));
    assert!(set.contains(&4));
    assert_eq!(set.get(&3), Some(&3));
    assert_eq!(set.lower_bound(&6), None);
    assert_eq!(set.upper_bound(&3), Some(&4));

    assert!(set.remove(&4));
    assert!(!set.remove(&4));
    assert_eq!(set.take(&5), Some(5));
    assert_eq!(format!("{set:?}"), "{1, 2, 3}");

    let mut other: RbSet<u32> = RbSet::new();
    other.extend([7, 8]);
    set.swap(&mut other);
    assert_eq!(set.iter().copied().collect::<Vec<_>>(), [7, 8]);
    assert_eq!(other.first(), Some(&1));
    assert_eq!(other.last(), Some(&3));
    other.as_tree().assert_invariants();

    let mut multi: RbMultiSet<u32> = RbMultiSet::new();
    multi.extend([3, 1, 3, 2, 3]);
    assert_eq!(multi.count(&3), 3);
    assert_eq!(multi.equal_range(&3).count(), 3);
    assert_eq!(multi.remove_one(&3), Some(3));
    assert_eq!(multi.count(&3), 2);
    assert_eq!(multi.remove(&3), 2);
    assert_eq!(multi.pop_first(), Some(1));
    assert_eq!((&multi).into_iter().collect::<Vec<_>>(), [&2]);
    multi.clear();
    assert!(multi.is_empty());
}

#[test]
fn debug_lists_in_order() {
    let mut tree: RbTree<u32> = RbTree::new();
    tree.extend_unique([3, 1, 2]);

    assert_eq!(format!("{tree:?}"), "[1, 2, 3]");
    assert_eq!(format!("{:?}", tree.cursor_front()), "Cursor(Some(1))");
    assert_eq!(format!("{:?}", tree.cursor_end()), "Cursor(None)");
}

#[cfg(miri)]
const FUZZ_RANGE: Range<usize> = 0..10;

#[cfg(not(miri))]
const FUZZ_RANGE: Range<usize> = 0..1000;

proptest::proptest! {
    #![proptest_config(ProptestConfig {
        max_shrink_iters: 65536,
        .. ProptestConfig::default()
    })]

    #[test]
    fn multiset_equivalence(ops in proptest::collection::vec(model::op_strategy(), FUZZ_RANGE)) {
        model::run_multiset_equivalence(ops);
    }

    #[test]
    fn cursor_equivalence(
        values in proptest::collection::vec(0u32..200, 0..100),
        ops in proptest::collection::vec(model::cursor_op_strategy(), FUZZ_RANGE),
    ) {
        model::run_cursor_equivalence(values, ops);
    }
}
