use core::{fmt, ptr::NonNull};
use std::collections::VecDeque;

use crate::{header::links, node::Node, Color, KeyOf, NodeAlloc, RbTree};

impl<V, KO, C, A> RbTree<V, KO, C, A>
where
    KO: KeyOf<V>,
    KO::Key: fmt::Display,
    A: NodeAlloc,
{
    /// Writes the tree as a Graphviz digraph, one rank per level, with nodes filled in their
    /// color.
    ///
    /// Nodes are identified by their level-order index, so equivalent keys don't collide.
    pub fn dotgraph<W>(&self, name: &str, mut w: W) -> fmt::Result
    where
        W: fmt::Write,
    {
        let root = match self.header().root {
            Some(r) => r,
            None => return write!(w, "digraph \"graph-{name}\" {{}}"),
        };

        enum Item<V> {
            Node(NonNull<Node<V>>, usize),
            Missing(usize),
        }

        let mut queue = VecDeque::new();
        queue.push_back(Item::Node(root, 0));

        write!(
            w,
            "digraph \"graph-{name}\" {{\n subgraph \"subgraph-{name}\" {{"
        )?;

        let mut next_id = 1;
        let mut missing = 0;
        let mut edges = String::new();

        while !queue.is_empty() {
            use fmt::Write;

            write!(w, "{{rank=same; ")?;

            for _ in 0..queue.len() {
                let (node, id) = match queue.pop_front() {
                    Some(Item::Node(node, id)) => (node, id),
                    Some(Item::Missing(id)) => {
                        write!(w, "\"graph{name}-missing{id}\" [shape=point]; ")?;
                        continue;
                    }
                    None => break,
                };

                let key = self.key_of().key_of(unsafe { &(*node.as_ptr()).value });
                let (fill, font) = match unsafe { links(node).color() } {
                    Color::Red => ("red", "white"),
                    Color::Black => ("black", "white"),
                };
                write!(
                    w,
                    "\"graph{name}-{id}\" [label=\"{key}\", style=filled, fillcolor={fill}, fontcolor={font}]; "
                )?;

                for child in unsafe { [links(node).left(), links(node).right()] } {
                    match child {
                        Some(child) => {
                            queue.push_back(Item::Node(child, next_id));
                            writeln!(edges, "\"graph{name}-{id}\" -> \"graph{name}-{next_id}\";")?;
                            next_id += 1;
                        }
                        None => {
                            queue.push_back(Item::Missing(missing));
                            writeln!(
                                edges,
                                "\"graph{name}-{id}\" -> \"graph{name}-missing{missing}\";"
                            )?;
                            missing += 1;
                        }
                    }
                }
            }

            writeln!(w, "}}")?;
        }

        w.write_str(&edges)?;

        w.write_str(" }\n}")
    }
}

impl<V: fmt::Debug, KO, C, A: NodeAlloc> fmt::Debug for RbTree<V, KO, C, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
