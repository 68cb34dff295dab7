//! Tarjan's strongly-connected-components algorithm, `O(|V|+|E|)`
//! (spec.md §4.4).
//!
//! `original_source/csp/scc.py::Tarjan.find_scc` is recursive; spec.md §9
//! flags that recursion depth can reach `|V|` here (e.g. a long alternating
//! cycle in the Régin residual graph), so this is restructured onto an
//! explicit work stack that simulates the same index/lowlink/stack
//! algorithm frame-by-frame instead of recursing.

/// `comp[u] == comp[v]` iff `u` and `v` are in the same strongly connected
/// component of `graph`. Component ids are assigned in the order
/// components are closed off, with no further meaning.
pub fn tarjan_scc(graph: &[Vec<usize>]) -> Vec<usize> {
    let n = graph.len();
    const UNVISITED: usize = usize::MAX;

    let mut index_of = vec![UNVISITED; n];
    let mut lowlink = vec![0usize; n];
    let mut on_stack = vec![false; n];
    let mut tarjan_stack: Vec<usize> = Vec::new();
    let mut comp = vec![0usize; n];
    let mut next_index = 0usize;
    let mut next_comp = 0usize;

    struct Frame {
        node: usize,
        iter_pos: usize,
    }
    let mut work: Vec<Frame> = Vec::new();

    for start in 0..n {
        if index_of[start] != UNVISITED {
            continue;
        }

        index_of[start] = next_index;
        lowlink[start] = next_index;
        next_index += 1;
        tarjan_stack.push(start);
        on_stack[start] = true;
        work.push(Frame {
            node: start,
            iter_pos: 0,
        });

        while let Some(frame) = work.last_mut() {
            let node = frame.node;
            if frame.iter_pos < graph[node].len() {
                let child = graph[node][frame.iter_pos];
                frame.iter_pos += 1;
                if index_of[child] == UNVISITED {
                    index_of[child] = next_index;
                    lowlink[child] = next_index;
                    next_index += 1;
                    tarjan_stack.push(child);
                    on_stack[child] = true;
                    work.push(Frame {
                        node: child,
                        iter_pos: 0,
                    });
                } else if on_stack[child] {
                    lowlink[node] = lowlink[node].min(index_of[child]);
                }
            } else {
                work.pop();
                if let Some(parent_frame) = work.last() {
                    let parent = parent_frame.node;
                    lowlink[parent] = lowlink[parent].min(lowlink[node]);
                }
                if lowlink[node] == index_of[node] {
                    loop {
                        let w = tarjan_stack.pop().expect("component root must be on stack");
                        on_stack[w] = false;
                        comp[w] = next_comp;
                        if w == node {
                            break;
                        }
                    }
                    next_comp += 1;
                }
            }
        }
    }

    comp
}

/// The "list of sets" view spec.md §4.4 requires alongside the `comp[]`
/// array: one `Vec<usize>` of member nodes per component, in component-id
/// order.
pub fn component_sets(comp: &[usize]) -> Vec<Vec<usize>> {
    let num_components = comp.iter().copied().max().map_or(0, |m| m + 1);
    let mut sets = vec![Vec::new(); num_components];
    for (node, &c) in comp.iter().enumerate() {
        sets[c].push(node);
    }
    sets
}
