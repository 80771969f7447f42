use std::ops::Bound;

use cordyceps_rbtree::{First, RbMap, RbTree};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

fn print_graph<V, KO, C>(tree: &RbTree<V, KO, C>, name: &str)
where
    KO: cordyceps_rbtree::KeyOf<V>,
    KO::Key: std::fmt::Display,
{
    let mut out = String::new();
    match tree.dotgraph(name, &mut out) {
        Ok(()) => println!("{out}"),
        Err(err) => log::error!("failed to render {name}: {err}"),
    }
}

fn main() {
    if let Err(err) = TermLogger::init(
        LevelFilter::Debug,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    ) {
        eprintln!("logging unavailable: {err}");
    }

    let mut tree: RbTree<u32> = RbTree::new();

    for key in [10, 20, 5, 15, 25, 3] {
        tree.insert_unique(key);
        tree.assert_invariants();
        println!("{tree:?}");
    }
    print_graph(&tree, "inserted");

    tree.remove(&10);
    tree.assert_invariants();
    println!("{tree:?}");
    print_graph(&tree, "erased");

    println!(
        "find(7) at end: {}, lower_bound(7) = {:?}, upper_bound(5) = {:?}",
        tree.find(&7).is_end(),
        tree.lower_bound(&7).get(),
        tree.upper_bound(&5).get(),
    );

    let mut tagged: RbTree<(u32, char), First> = RbTree::new();
    for tag in ['A', 'B', 'C'] {
        tagged.insert_equal((5, tag));
    }
    let run: String = tagged
        .range(Bound::Included(&5), Bound::Included(&5))
        .map(|&(_, tag)| tag)
        .collect();
    println!("equal run for 5: {run}");

    let copy = tree.clone();
    tree.clear();
    println!("cleared: {tree:?}, copy: {copy:?}");

    let mut words: RbMap<&str, usize> = RbMap::new();
    for word in "the quick brown fox jumps over the lazy dog the end".split_whitespace() {
        *words.get_or_insert_default(word) += 1;
    }
    println!("{words:?}");
}
