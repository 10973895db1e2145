//! Cycle detection over the unit-instance dependency graph
//!
//! Modified instances (alias, scaled, prefixed, biased) reference exactly one
//! original instance, so the graph is functional: every node has at most one
//! outgoing edge. Cycles are found by walking successor chains with a
//! three-state visit marking; only instances lying on a cycle are reported,
//! not instances that merely depend on one.

use std::collections::HashMap;

#[derive(Clone, Copy, PartialEq)]
enum Visit {
    Unvisited,
    InProgress,
    Done,
}

/// Names of all instances that lie on a dependency cycle, including
/// self-loops. `edges` maps an instance name to the name of its original
/// instance; instances without a resolvable original must be left out.
pub fn cyclic_instances(edges: &HashMap<String, String>) -> Vec<String> {
    let mut state: HashMap<&str, Visit> = edges
        .keys()
        .map(|name| (name.as_str(), Visit::Unvisited))
        .collect();
    let mut cyclic = Vec::new();

    for start in edges.keys() {
        if state[start.as_str()] != Visit::Unvisited {
            continue;
        }

        // Walk the successor chain until it leaves the graph, reaches an
        // already-finished node, or closes on the current path.
        let mut path = Vec::new();
        let mut current = start.as_str();

        loop {
            state.insert(current, Visit::InProgress);
            path.push(current);

            match edges.get(current).map(String::as_str) {
                Some(next) if state.contains_key(next) => match state[next] {
                    Visit::Unvisited => current = next,
                    Visit::InProgress => {
                        // Everything from `next` to the end of the path is
                        // the cycle; earlier path entries only lead into it.
                        let cycle_start = path.iter().position(|name| *name == next)
                            .unwrap_or(0);
                        cyclic.extend(path[cycle_start..].iter().map(|name| name.to_string()));
                        break;
                    }
                    Visit::Done => break,
                },
                _ => break,
            }
        }

        for name in path {
            state.insert(name, Visit::Done);
        }
    }

    cyclic.sort();
    cyclic
}
