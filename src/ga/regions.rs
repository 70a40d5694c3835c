//! Articulation points and recombination regions of a precedence graph.
//!
//! Articulation points are computed on the undirected projection of the
//! graph including the virtual source (joined to every root) and sink
//! (joined to every leaf), then reported for real tasks only, in
//! topological order.
//!
//! A region is the set of tasks lying between two consecutive articulation
//! points `a` and `b`: descendants of `a` that are also ancestors of `b`,
//! boundaries included. A region is kept only when it is closed, i.e.
//! every member other than `a` has all of its predecessors inside the
//! region and every member other than `b` has all of its successors inside.
//! Closed regions can be reordered freely (respecting their internal
//! edges) without disturbing any task outside them.
//!
//! # Reference
//!
//! Tarjan, R.E. (1972). "Depth-first search and linear graph algorithms",
//! *SIAM Journal on Computing* 1(2), 146-160.

use std::collections::HashSet;

use crate::graph::PrecedenceGraph;
use crate::models::TaskId;

const UNVISITED: usize = usize::MAX;

/// A set of tasks that genetic operators may rearrange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    members: Vec<TaskId>,
    member_set: HashSet<TaskId>,
    movable: Vec<TaskId>,
}

impl Region {
    fn new(members: Vec<TaskId>, articulation: &HashSet<TaskId>) -> Self {
        let movable = members
            .iter()
            .copied()
            .filter(|t| !articulation.contains(t))
            .collect();
        let member_set = members.iter().copied().collect();
        Self {
            members,
            member_set,
            movable,
        }
    }

    /// Members in topological order.
    pub fn members(&self) -> &[TaskId] {
        &self.members
    }

    /// Members that are not articulation points.
    pub fn movable(&self) -> &[TaskId] {
        &self.movable
    }

    /// Returns `true` if `task` belongs to the region.
    pub fn contains(&self, task: TaskId) -> bool {
        self.member_set.contains(&task)
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` if the region has no member.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Articulation points among the real tasks, in topological order.
///
/// # Examples
///
/// ```
/// use u_balance::ga::find_articulation_points;
/// use u_balance::graph::PrecedenceGraph;
/// use u_balance::models::Task;
///
/// // 1 -> {2, 3} -> 4: both ends are cut vertices.
/// let graph = PrecedenceGraph::build(&[
///     Task::new(1, 2.0, []),
///     Task::new(2, 5.0, [1]),
///     Task::new(3, 4.0, [1]),
///     Task::new(4, 3.0, [2, 3]),
/// ]).unwrap();
/// assert_eq!(find_articulation_points(&graph), vec![1, 4]);
/// ```
pub fn find_articulation_points(graph: &PrecedenceGraph) -> Vec<TaskId> {
    let n = graph.len();
    let source = n;
    let sink = n + 1;
    let mut adj: Vec<Vec<usize>> = vec![Vec::new(); n + 2];
    for i in 0..n {
        if graph.predecessors_at(i).is_empty() {
            adj[source].push(i);
            adj[i].push(source);
        }
        if graph.successors_at(i).is_empty() {
            adj[i].push(sink);
            adj[sink].push(i);
        }
        for &s in graph.successors_at(i) {
            adj[i].push(s);
            adj[s].push(i);
        }
    }

    let is_cut = cut_vertices(&adj, source);
    let order = graph.topological_order();
    order
        .into_tasks()
        .into_iter()
        .filter(|&t| graph.index_of(t).is_some_and(|i| is_cut[i]))
        .collect()
}

/// Recombination regions between consecutive articulation points.
///
/// With fewer than two articulation points the whole task set forms a
/// single region.
pub fn find_regions(graph: &PrecedenceGraph, articulation_points: &[TaskId]) -> Vec<Region> {
    let order = graph.topological_order();
    let cut: HashSet<TaskId> = articulation_points.iter().copied().collect();

    if articulation_points.len() < 2 {
        return vec![Region::new(order.tasks().to_vec(), &cut)];
    }

    let mut regions = Vec::new();
    for pair in articulation_points.windows(2) {
        let (Some(a), Some(b)) = (graph.index_of(pair[0]), graph.index_of(pair[1])) else {
            continue;
        };
        let down = reach(graph, a, true);
        let up = reach(graph, b, false);
        let inside: Vec<bool> = (0..graph.len()).map(|i| down[i] && up[i]).collect();

        let members: Vec<TaskId> = order
            .tasks()
            .iter()
            .copied()
            .filter(|&t| graph.index_of(t).is_some_and(|i| inside[i]))
            .collect();
        if members.len() <= 2 || !is_closed(graph, &inside, a, b) {
            continue;
        }
        regions.push(Region::new(members, &cut));
    }
    regions
}

fn is_closed(graph: &PrecedenceGraph, inside: &[bool], entry: usize, exit: usize) -> bool {
    (0..graph.len()).filter(|&i| inside[i]).all(|i| {
        let preds_ok = i == entry || graph.predecessors_at(i).iter().all(|&p| inside[p]);
        let succs_ok = i == exit || graph.successors_at(i).iter().all(|&s| inside[s]);
        preds_ok && succs_ok
    })
}

/// Nodes reachable from `start` (itself included), downstream or upstream.
fn reach(graph: &PrecedenceGraph, start: usize, downstream: bool) -> Vec<bool> {
    let mut seen = vec![false; graph.len()];
    let mut stack = vec![start];
    seen[start] = true;
    while let Some(i) = stack.pop() {
        let next = if downstream {
            graph.successors_at(i)
        } else {
            graph.predecessors_at(i)
        };
        for &j in next {
            if !seen[j] {
                seen[j] = true;
                stack.push(j);
            }
        }
    }
    seen
}

/// Iterative Tarjan cut-vertex search over an undirected adjacency list.
fn cut_vertices(adj: &[Vec<usize>], start: usize) -> Vec<bool> {
    let n = adj.len();
    let mut disc = vec![UNVISITED; n];
    let mut low = vec![0; n];
    let mut is_cut = vec![false; n];
    let mut timer = 0;

    let roots = std::iter::once(start).chain(0..n);
    for root in roots {
        if disc[root] != UNVISITED {
            continue;
        }
        disc[root] = timer;
        low[root] = timer;
        timer += 1;
        let mut root_children = 0;
        // (node, parent, next neighbour offset)
        let mut stack = vec![(root, UNVISITED, 0usize)];

        while let Some(top) = stack.last_mut() {
            let (u, parent) = (top.0, top.1);
            if top.2 < adj[u].len() {
                let v = adj[u][top.2];
                top.2 += 1;
                if disc[v] == UNVISITED {
                    disc[v] = timer;
                    low[v] = timer;
                    timer += 1;
                    if u == root {
                        root_children += 1;
                    }
                    stack.push((v, u, 0));
                } else if v != parent {
                    low[u] = low[u].min(disc[v]);
                }
            } else {
                stack.pop();
                if let Some(&(p, _, _)) = stack.last() {
                    low[p] = low[p].min(low[u]);
                    if p != root && low[u] >= disc[p] {
                        is_cut[p] = true;
                    }
                }
            }
        }

        if root_children > 1 {
            is_cut[root] = true;
        }
    }
    is_cut
}
