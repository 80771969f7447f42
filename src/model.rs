//! Reference models for property tests and fuzzing.
//!
//! The tree is driven through arbitrary operation sequences alongside a trivially correct model,
//! and every observable result is compared. Structural invariants are checked after each step.

use std::{collections::BTreeMap, ops::Bound};

use arbitrary::Arbitrary;
use proptest::strategy::{Just, Strategy};

use crate::{First, RbTree};

/// A tree of `(key, tag)` pairs where the tag records when the pair was inserted.
type TaggedTree = RbTree<(u32, u64), First>;

#[derive(Copy, Clone, Debug, Arbitrary)]
pub enum ItemValue {
    /// Picks one of the keys currently present (modulo the number of keys).
    Index(usize),
    Random(u32),
}

proptest::prop_compose! {
    fn index_strategy()(
        index in 0usize..1000,
    ) -> ItemValue {
        ItemValue::Index(index)
    }
}

proptest::prop_compose! {
    fn random_strategy()(
        random in 0u32..1000,
    ) -> ItemValue {
        ItemValue::Random(random)
    }
}

fn value_strategy() -> impl Strategy<Value = ItemValue> {
    proptest::prop_oneof![index_strategy(), random_strategy()]
}

#[derive(Copy, Clone, Debug, Arbitrary)]
pub enum Op {
    InsertUnique(ItemValue),
    InsertEqual(ItemValue),
    Find(ItemValue),
    LowerBound(ItemValue),
    UpperBound(ItemValue),
    Count(ItemValue),
    Remove(ItemValue),
    RemoveRange(ItemValue, ItemValue),
    First,
    PopFirst,
    Last,
    PopLast,
}

#[derive(Copy, Clone, Debug)]
enum FinalOp {
    InsertUnique(u32),
    InsertEqual(u32),
    Find(u32),
    LowerBound(u32),
    UpperBound(u32),
    Count(u32),
    Remove(u32),
    RemoveRange(u32, u32),
    First,
    PopFirst,
    Last,
    PopLast,
}

impl Op {
    fn finalize(self, model: &BTreeMap<u32, Vec<u64>>) -> FinalOp {
        let key = |item: ItemValue| match item {
            ItemValue::Index(idx) if model.is_empty() => idx as u32,
            ItemValue::Index(idx) => model.keys().nth(idx % model.len()).copied().unwrap_or(0),
            ItemValue::Random(key) => key,
        };

        match self {
            Op::InsertUnique(item) => FinalOp::InsertUnique(key(item)),
            Op::InsertEqual(item) => FinalOp::InsertEqual(key(item)),
            Op::Find(item) => FinalOp::Find(key(item)),
            Op::LowerBound(item) => FinalOp::LowerBound(key(item)),
            Op::UpperBound(item) => FinalOp::UpperBound(key(item)),
            Op::Count(item) => FinalOp::Count(key(item)),
            Op::Remove(item) => FinalOp::Remove(key(item)),
            Op::RemoveRange(lo, hi) => FinalOp::RemoveRange(key(lo), key(hi)),
            Op::First => FinalOp::First,
            Op::PopFirst => FinalOp::PopFirst,
            Op::Last => FinalOp::Last,
            Op::PopLast => FinalOp::PopLast,
        }
    }
}

pub fn op_strategy() -> impl Strategy<Value = Op> {
    proptest::prop_oneof![
        value_strategy().prop_map(Op::InsertUnique),
        value_strategy().prop_map(Op::InsertEqual),
        value_strategy().prop_map(Op::Find),
        value_strategy().prop_map(Op::LowerBound),
        value_strategy().prop_map(Op::UpperBound),
        value_strategy().prop_map(Op::Count),
        value_strategy().prop_map(Op::Remove),
        (value_strategy(), value_strategy()).prop_map(|(lo, hi)| Op::RemoveRange(lo, hi)),
        Just(Op::First),
        Just(Op::PopFirst),
        Just(Op::Last),
        Just(Op::PopLast),
    ]
}

fn first_of(found: Option<(&u32, &Vec<u64>)>) -> Option<(u32, u64)> {
    found.and_then(|(&k, tags)| tags.first().map(|&t| (k, t)))
}

/// Runs `ops` against a [`TaggedTree`] and a `BTreeMap` of insertion-ordered tag lists.
///
/// Equivalent keys must come out in insertion order, so comparing the full contents after every
/// step also checks that duplicate insertion is stable.
pub fn run_multiset_equivalence(ops: Vec<Op>) {
    let mut model: BTreeMap<u32, Vec<u64>> = BTreeMap::new();
    let mut tree = TaggedTree::new();

    for (op_id, op) in ops.into_iter().enumerate() {
        let tag = op_id as u64;
        let final_op = op.finalize(&model);

        match final_op {
            FinalOp::InsertUnique(key) => {
                // A unique insertion that finds its key reports the element just before the
                // would-be insertion point, which is the last of the equivalent run.
                let from_model = match model.get(&key).and_then(|tags| tags.last()) {
                    Some(&existing) => ((key, existing), false),
                    None => {
                        model.entry(key).or_default().push(tag);
                        ((key, tag), true)
                    }
                };

                let (cursor, inserted) = tree.insert_unique((key, tag));
                let from_tree = (cursor.get().copied(), inserted);

                assert_eq!(
                    (Some(from_model.0), from_model.1),
                    from_tree,
                    "FinalOp #{op_id}: {final_op:?}"
                );
            }

            FinalOp::InsertEqual(key) => {
                model.entry(key).or_default().push(tag);
                let from_tree = tree.insert_equal((key, tag)).get().copied();

                assert_eq!(Some((key, tag)), from_tree, "FinalOp #{op_id}: {final_op:?}");
            }

            FinalOp::Find(key) => {
                let from_model = first_of(model.get_key_value(&key));
                let from_tree = tree.find(&key).get().copied();

                assert_eq!(from_model, from_tree, "FinalOp #{op_id}: {final_op:?}");
            }

            FinalOp::LowerBound(key) => {
                let from_model = first_of(model.range(key..).next());
                let from_tree = tree.lower_bound(&key).get().copied();

                assert_eq!(from_model, from_tree, "FinalOp #{op_id}: {final_op:?}");
            }

            FinalOp::UpperBound(key) => {
                let from_model = first_of(
                    model
                        .range((Bound::Excluded(key), Bound::Unbounded))
                        .next(),
                );
                let from_tree = tree.upper_bound(&key).get().copied();

                assert_eq!(from_model, from_tree, "FinalOp #{op_id}: {final_op:?}");
            }

            FinalOp::Count(key) => {
                let from_model = model.get(&key).map_or(0, Vec::len);
                let from_tree = tree.count(&key);

                assert_eq!(from_model, from_tree, "FinalOp #{op_id}: {final_op:?}");
            }

            FinalOp::Remove(key) => {
                let from_model = model.remove(&key).map_or(0, |tags| tags.len());
                let from_tree = tree.remove(&key);

                assert_eq!(from_model, from_tree, "FinalOp #{op_id}: {final_op:?}");
            }

            FinalOp::RemoveRange(lo, hi) => {
                let doomed: Vec<u32> = if lo <= hi {
                    model.range(lo..hi).map(|(&k, _)| k).collect()
                } else {
                    Vec::new()
                };
                let from_model: usize = doomed
                    .iter()
                    .filter_map(|k| model.remove(k))
                    .map(|tags| tags.len())
                    .sum();
                let from_tree = tree.remove_range(Bound::Included(&lo), Bound::Excluded(&hi));

                assert_eq!(from_model, from_tree, "FinalOp #{op_id}: {final_op:?}");
            }

            FinalOp::First => {
                let from_model = first_of(model.iter().next());
                let from_tree = tree.first().copied();

                assert_eq!(from_model, from_tree, "FinalOp #{op_id}: {final_op:?}");
            }

            FinalOp::PopFirst => {
                let from_model = model.first_entry().map(|mut entry| {
                    let key = *entry.key();
                    let tag = entry.get_mut().remove(0);
                    if entry.get().is_empty() {
                        entry.remove();
                    }
                    (key, tag)
                });
                let from_tree = tree.pop_first();

                assert_eq!(from_model, from_tree, "FinalOp #{op_id}: {final_op:?}");
            }

            FinalOp::Last => {
                let from_model = model
                    .iter()
                    .next_back()
                    .and_then(|(&k, tags)| tags.last().map(|&t| (k, t)));
                let from_tree = tree.last().copied();

                assert_eq!(from_model, from_tree, "FinalOp #{op_id}: {final_op:?}");
            }

            FinalOp::PopLast => {
                let from_model = model.last_entry().and_then(|mut entry| {
                    let key = *entry.key();
                    let tag = entry.get_mut().pop();
                    if entry.get().is_empty() {
                        entry.remove();
                    }
                    tag.map(|t| (key, t))
                });
                let from_tree = tree.pop_last();

                assert_eq!(from_model, from_tree, "FinalOp #{op_id}: {final_op:?}");
            }
        }

        tree.assert_invariants();

        let expected: Vec<(u32, u64)> = model
            .iter()
            .flat_map(|(&k, tags)| tags.iter().map(move |&t| (k, t)))
            .collect();
        assert_eq!(tree.len(), expected.len());
        assert!(tree.iter().copied().eq(expected.iter().copied()));
        assert!(tree.iter().rev().copied().eq(expected.iter().rev().copied()));
    }
}

#[derive(Clone, Debug, Arbitrary)]
pub enum CursorOp {
    // Get is not an operation as it's executed on every loop iteration to check equivalence.
    MovePrev,
    MoveNext,
    PeekNext,
    PeekPrev,
    RemoveCurrent,
    RemoveCurrentMovePrev,
}

pub fn cursor_op_strategy() -> impl Strategy<Value = CursorOp> {
    proptest::prop_oneof![
        Just(CursorOp::MovePrev),
        Just(CursorOp::MoveNext),
        Just(CursorOp::PeekNext),
        Just(CursorOp::PeekPrev),
        Just(CursorOp::RemoveCurrent),
        Just(CursorOp::RemoveCurrentMovePrev),
    ]
}

#[derive(Clone, Debug)]
pub struct CursorEquivalenceInput {
    pub values: Vec<u32>,
    pub ops: Vec<CursorOp>,
}

impl<'a> arbitrary::Arbitrary<'a> for CursorEquivalenceInput {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        let num_values = u8::arbitrary(u)? % 100;
        let num_ops = u16::arbitrary(u)? % 1000;

        let values = core::iter::repeat_with(|| u32::arbitrary(u).unwrap_or(0))
            .take(num_values.into())
            .collect();

        let ops = core::iter::repeat_with(|| CursorOp::arbitrary(u).unwrap_or(CursorOp::MoveNext))
            .take(num_ops.into())
            .collect();

        Ok(CursorEquivalenceInput { values, ops })
    }
}

// Position model over a sorted `Vec`: `None` is the end position, which wraps around to either
// extreme.
fn vec_curs_prev(v: &[u32], curs: Option<usize>) -> Option<usize> {
    match curs {
        Some(i) => i.checked_sub(1),
        None => v.len().checked_sub(1),
    }
}

fn vec_curs_next(v: &[u32], curs: Option<usize>) -> Option<usize> {
    match curs {
        Some(i) => Some(i + 1).filter(|&i| i < v.len()),
        None => (!v.is_empty()).then_some(0),
    }
}

/// Drives a tree cursor and an index into a sorted `Vec` through the same moves and removals.
///
/// `values` may contain duplicates; they are inserted with the equal-key policy, so the sorted
/// `Vec` keeps them too.
pub fn run_cursor_equivalence(values: Vec<u32>, ops: Vec<CursorOp>) {
    let mut vec = values.clone();
    vec.sort();

    let mut tree: RbTree<u32> = RbTree::new();
    tree.extend_equal(values);
    tree.assert_invariants();

    let mut vec_curs = vec_curs_next(&vec, None);
    let mut rb_curs = tree.cursor_front_mut();

    assert_eq!(vec_curs.map(|i| &vec[i]), rb_curs.get());

    for op in ops {
        match op {
            CursorOp::MoveNext => {
                vec_curs = vec_curs_next(&vec, vec_curs);
                rb_curs.move_next();
            }

            CursorOp::MovePrev => {
                vec_curs = vec_curs_prev(&vec, vec_curs);
                rb_curs.move_prev();
            }

            CursorOp::PeekNext => {
                let v = vec_curs_next(&vec, vec_curs).map(|i| &vec[i]);
                assert_eq!(v, rb_curs.peek_next());
            }

            CursorOp::PeekPrev => {
                let v = vec_curs_prev(&vec, vec_curs).map(|i| &vec[i]);
                assert_eq!(v, rb_curs.peek_prev());
            }

            CursorOp::RemoveCurrent => {
                let v = vec_curs.map(|i| vec.remove(i));

                // The next element slides into the removed index; past the back is the end.
                if vec_curs == Some(vec.len()) {
                    vec_curs = None;
                }

                assert_eq!(v, rb_curs.remove_current());
            }

            CursorOp::RemoveCurrentMovePrev => {
                let v = vec_curs.map(|i| {
                    vec_curs = i.checked_sub(1);
                    vec.remove(i)
                });

                assert_eq!(v, rb_curs.remove_current_and_move_prev());
            }
        }

        assert_eq!(vec_curs.map(|i| &vec[i]), rb_curs.get());
    }

    drop(rb_curs);
    tree.assert_invariants();
    assert!(tree.iter().eq(vec.iter()));
}
