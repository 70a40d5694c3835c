//! Region-restricted crossover and mutation on task sequences.
//!
//! Both operators only rearrange tasks belonging to one [`Region`]; every
//! task outside the region keeps its position. Given topological parents
//! and a closed region, the offspring stay topological.

use std::collections::HashSet;

use rand::Rng;

use super::Region;
use crate::graph::PrecedenceGraph;
use crate::models::{Sequence, TaskId};

/// Exchanges the order of a region's tasks between two parents.
///
/// Child 1 keeps parent 1's out-of-region tasks in place and fills the
/// region slots, left to right, with the region tasks in parent 2's order.
/// Child 2 is built symmetrically.
///
/// # Examples
///
/// ```
/// use u_balance::ga::{find_articulation_points, find_regions, region_crossover};
/// use u_balance::graph::PrecedenceGraph;
/// use u_balance::models::{Sequence, Task};
///
/// let graph = PrecedenceGraph::build(&[
///     Task::new(1, 1.0, []),
///     Task::new(2, 1.0, [1]),
///     Task::new(3, 1.0, [1]),
///     Task::new(4, 1.0, [2, 3]),
/// ]).unwrap();
/// let regions = find_regions(&graph, &find_articulation_points(&graph));
///
/// let p1 = Sequence::new(vec![1, 2, 3, 4]);
/// let p2 = Sequence::new(vec![1, 3, 2, 4]);
/// let (c1, c2) = region_crossover(&p1, &p2, &regions[0]);
/// assert_eq!(c1, p2);
/// assert_eq!(c2, p1);
/// ```
pub fn region_crossover(parent1: &Sequence, parent2: &Sequence, region: &Region) -> (Sequence, Sequence) {
    let child1 = fill_region(parent1, parent2, region);
    let child2 = fill_region(parent2, parent1, region);
    (child1, child2)
}

/// `base` with its region slots refilled in `donor`'s region order.
fn fill_region(base: &Sequence, donor: &Sequence, region: &Region) -> Sequence {
    let mut donated = donor
        .tasks()
        .iter()
        .copied()
        .filter(|&t| region.contains(t));

    let tasks = base
        .tasks()
        .iter()
        .map(|&t| {
            if region.contains(t) {
                donated.next().unwrap_or(t)
            } else {
                t
            }
        })
        .collect();
    Sequence::new(tasks)
}

/// Moves one non-articulation task of `region` to another region slot.
///
/// The target is drawn among region slots that keep the moved task after
/// all of its predecessors and before all of its successors. Returns an
/// unchanged copy when the region has fewer than two movable tasks or no
/// slot qualifies.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use u_balance::ga::{find_articulation_points, find_regions, region_mutation};
/// use u_balance::graph::PrecedenceGraph;
/// use u_balance::models::{Sequence, Task};
///
/// let graph = PrecedenceGraph::build(&[
///     Task::new(1, 1.0, []),
///     Task::new(2, 1.0, [1]),
///     Task::new(3, 1.0, [1]),
///     Task::new(4, 1.0, [2, 3]),
/// ]).unwrap();
/// let regions = find_regions(&graph, &find_articulation_points(&graph));
/// let mut rng = StdRng::seed_from_u64(7);
///
/// let child = region_mutation(&Sequence::new(vec![1, 2, 3, 4]), &regions[0], &graph, &mut rng);
/// assert!(child.is_topological(&graph));
/// ```
pub fn region_mutation<R: Rng>(
    sequence: &Sequence,
    region: &Region,
    graph: &PrecedenceGraph,
    rng: &mut R,
) -> Sequence {
    let movable = region.movable();
    if movable.len() < 2 {
        return sequence.clone();
    }

    let gene = movable[rng.random_range(0..movable.len())];
    let Some(current) = sequence.position(gene) else {
        return sequence.clone();
    };

    let mut rest = sequence.tasks().to_vec();
    rest.remove(current);
    let (lo, hi) = insertion_window(&rest, gene, graph);

    let targets: Vec<usize> = sequence
        .tasks()
        .iter()
        .enumerate()
        .filter(|&(i, &t)| i != current && region.contains(t) && (lo..=hi).contains(&i))
        .map(|(i, _)| i)
        .collect();
    if targets.is_empty() {
        return sequence.clone();
    }

    let target = targets[rng.random_range(0..targets.len())];
    rest.insert(target, gene);
    Sequence::new(rest)
}

/// Insertion indices into `rest` that place `gene` after its predecessors
/// and before its successors.
fn insertion_window(rest: &[TaskId], gene: TaskId, graph: &PrecedenceGraph) -> (usize, usize) {
    let preds: HashSet<TaskId> = graph.predecessors(gene).into_iter().collect();
    let succs: HashSet<TaskId> = graph.successors(gene).into_iter().collect();

    let lo = rest
        .iter()
        .rposition(|t| preds.contains(t))
        .map_or(0, |p| p + 1);
    let hi = rest
        .iter()
        .position(|t| succs.contains(t))
        .unwrap_or(rest.len());
    (lo, hi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::{find_articulation_points, find_regions};
    use crate::models::Task;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn two_diamonds() -> PrecedenceGraph {
        PrecedenceGraph::build(&[
            Task::root(1, 1.0),
            Task::new(2, 2.0, [1]),
            Task::new(3, 3.0, [1]),
            Task::new(4, 1.0, [2, 3]),
            Task::new(5, 2.0, [4]),
            Task::new(6, 2.0, [4]),
            Task::new(7, 1.0, [4]),
            Task::new(8, 3.0, [5, 6, 7]),
        ])
        .expect("valid")
    }

    #[test]
    fn test_crossover_keeps_outside_positions() {
        let g = two_diamonds();
        let regions = find_regions(&g, &find_articulation_points(&g));
        let second = &regions[1];

        let p1 = Sequence::new(vec![1, 2, 3, 4, 5, 6, 7, 8]);
        let p2 = Sequence::new(vec![1, 3, 2, 4, 7, 6, 5, 8]);
        let (c1, c2) = region_crossover(&p1, &p2, second);

        assert_eq!(c1.tasks(), &[1, 2, 3, 4, 7, 6, 5, 8]);
        assert_eq!(c2.tasks(), &[1, 3, 2, 4, 5, 6, 7, 8]);
        assert!(c1.is_topological(&g));
        assert!(c2.is_topological(&g));
    }

    #[test]
    fn test_mutation_stays_topological() {
        let g = two_diamonds();
        let regions = find_regions(&g, &find_articulation_points(&g));
        let mut rng = StdRng::seed_from_u64(3);
        let mut seq = g.topological_order();
        for _ in 0..200 {
            for region in &regions {
                seq = region_mutation(&seq, region, &g, &mut rng);
                assert!(seq.is_topological(&g));
                assert_eq!(seq.len(), 8);
            }
        }
    }

    #[test]
    fn test_mutation_moves_only_region_tasks() {
        let g = two_diamonds();
        let regions = find_regions(&g, &find_articulation_points(&g));
        let mut rng = StdRng::seed_from_u64(11);
        let start = Sequence::new(vec![1, 2, 3, 4, 5, 6, 7, 8]);
        for _ in 0..50 {
            let child = region_mutation(&start, &regions[1], &g, &mut rng);
            assert_eq!(&child.tasks()[..4], &[1, 2, 3, 4]);
            assert_eq!(child.tasks()[7], 8);
        }
    }

    #[test]
    fn test_mutation_without_movable_tasks() {
        let g = PrecedenceGraph::build(&[
            Task::root(1, 1.0),
            Task::new(2, 1.0, [1]),
            Task::new(3, 1.0, [2]),
        ])
        .expect("valid");
        let aps = find_articulation_points(&g);
        let regions = find_regions(&g, &aps);
        let mut rng = StdRng::seed_from_u64(1);
        let seq = Sequence::new(vec![1, 2, 3]);
        for region in &regions {
            assert_eq!(region_mutation(&seq, region, &g, &mut rng), seq);
        }
    }
}
