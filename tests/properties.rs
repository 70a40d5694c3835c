//! Property tests over randomly generated precedence graphs.

use std::collections::HashSet;

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use u_balance::balancer::LineBalancer;
use u_balance::config::{Algorithm, BalanceConfig};
use u_balance::constructive::{comsoal, priority_rule, random_sequence, ComsoalConfig, PriorityRule};
use u_balance::evaluation::{balance_delay, line_efficiency, theoretical_min_stations, LineEvaluator};
use u_balance::ga::{find_articulation_points, find_regions, region_crossover, region_mutation, GaConfig, GeneticSearch};
use u_balance::graph::PrecedenceGraph;
use u_balance::local_search::{shift_neighbor, LocalSearchMode};
use u_balance::models::{Solution, Task, TaskId};
use u_balance::u_shape::{u_comsoal, u_priority_rule};

/// Random DAG: task `j` may depend on any earlier task `i`, each edge kept
/// with probability 1/4.
fn dag() -> impl Strategy<Value = Vec<Task>> {
    (1usize..=12)
        .prop_flat_map(|n| {
            (
                prop::collection::vec(1u32..=9, n),
                prop::collection::vec(any::<u32>(), n),
            )
        })
        .prop_map(|(durations, masks)| {
            durations
                .iter()
                .enumerate()
                .map(|(j, &d)| {
                    let m = masks[j];
                    let preds = (0..j)
                        .filter(|&i| (m >> i) & 1 == 1 && (m >> (i + 16)) & 1 == 1)
                        .map(|i| i as TaskId + 1);
                    Task::new(j as TaskId + 1, f64::from(d), preds)
                })
                .collect()
        })
}

fn line_with_cycle() -> impl Strategy<Value = (Vec<Task>, f64)> {
    (dag(), 0u32..=10).prop_map(|(tasks, slack)| {
        let longest = tasks.iter().map(Task::duration).fold(0.0, f64::max);
        (tasks, longest + f64::from(slack))
    })
}

fn assert_valid(solution: &Solution, graph: &PrecedenceGraph, cycle_time: f64) {
    let ids: HashSet<TaskId> = graph.task_ids().iter().copied().collect();
    let assigned: Vec<TaskId> = solution.flatten().into_tasks();
    let unique: HashSet<TaskId> = assigned.iter().copied().collect();
    assert_eq!(assigned.len(), ids.len(), "every task assigned once");
    assert_eq!(unique, ids);

    for st in solution.station_times(graph) {
        assert!(st <= cycle_time + 1e-9, "station time {st} > {cycle_time}");
    }
    for (from, to) in graph.edges() {
        let a = solution.station_of(from).expect("assigned");
        let b = solution.station_of(to).expect("assigned");
        assert!(a <= b, "{from} -> {to} assigned to stations {a} > {b}");
    }
    assert!(solution.is_precedence_feasible(graph));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn priority_rules_are_feasible((tasks, ct) in line_with_cycle()) {
        let g = PrecedenceGraph::build(&tasks).expect("valid dag");
        for rule in [PriorityRule::LargestCandidate, PriorityRule::HelgesonBirnie] {
            let sol = priority_rule(&g, ct, rule);
            assert_valid(&sol, &g, ct);
            prop_assert!(sol.num_stations() >= theoretical_min_stations(g.total_work(), ct));
        }
    }

    #[test]
    fn comsoal_is_feasible_and_reproducible((tasks, ct) in line_with_cycle(), seed in any::<u64>()) {
        let g = PrecedenceGraph::build(&tasks).expect("valid dag");
        let config = ComsoalConfig::default()
            .with_iterations(8)
            .with_local_search(LocalSearchMode::Local);
        let a = comsoal(&g, ct, &config, &mut StdRng::seed_from_u64(seed));
        let b = comsoal(&g, ct, &config, &mut StdRng::seed_from_u64(seed));
        prop_assert_eq!(&a, &b);
        for sol in &a {
            assert_valid(sol, &g, ct);
        }
    }

    #[test]
    fn random_sequences_are_topological(tasks in dag(), seed in any::<u64>()) {
        let g = PrecedenceGraph::build(&tasks).expect("valid dag");
        let mut rng = StdRng::seed_from_u64(seed);
        for _ in 0..10 {
            prop_assert!(random_sequence(&g, &mut rng).is_topological(&g));
        }
    }

    #[test]
    fn region_operators_preserve_topology(tasks in dag(), seed in any::<u64>()) {
        let g = PrecedenceGraph::build(&tasks).expect("valid dag");
        let regions = find_regions(&g, &find_articulation_points(&g));
        let mut rng = StdRng::seed_from_u64(seed);
        let p1 = random_sequence(&g, &mut rng);
        let p2 = random_sequence(&g, &mut rng);

        for region in &regions {
            let (c1, c2) = region_crossover(&p1, &p2, region);
            prop_assert!(c1.is_topological(&g));
            prop_assert!(c2.is_topological(&g));

            let mut m = c1;
            for _ in 0..10 {
                m = region_mutation(&m, region, &g, &mut rng);
                prop_assert!(m.is_topological(&g));
            }
        }
    }

    #[test]
    fn genetic_search_is_feasible_and_reproducible((tasks, ct) in line_with_cycle(), seed in any::<u64>()) {
        let g = PrecedenceGraph::build(&tasks).expect("valid dag");
        let config = GaConfig::default()
            .with_population_size(6)
            .with_generations(3)
            .with_local_search(LocalSearchMode::Local)
            .with_output_count(2);
        let a = GeneticSearch::new(&g, ct, config.clone()).run(&mut StdRng::seed_from_u64(seed));
        let b = GeneticSearch::new(&g, ct, config).run(&mut StdRng::seed_from_u64(seed));
        prop_assert_eq!(&a.solutions, &b.solutions);
        prop_assert!(!a.solutions.is_empty());
        for sol in &a.solutions {
            assert_valid(sol, &g, ct);
        }
    }

    #[test]
    fn u_lines_cover_every_task((tasks, ct) in line_with_cycle(), seed in any::<u64>()) {
        let g = PrecedenceGraph::build(&tasks).expect("valid dag");
        let evaluator = LineEvaluator::new(&g, ct);
        let mut runs = vec![
            u_priority_rule(&g, ct, PriorityRule::LargestCandidate),
            u_priority_rule(&g, ct, PriorityRule::HelgesonBirnie),
        ];
        runs.push(u_comsoal(&g, ct, 5, &mut StdRng::seed_from_u64(seed)));
        for u in &runs {
            prop_assert_eq!(u.sides.len(), g.len());
            prop_assert_eq!(u.solution.num_tasks(), g.len());
            prop_assert!(evaluator.is_within_capacity(&u.solution));
            let order = u.solution.flatten();
            let unique: HashSet<TaskId> = order.tasks().iter().copied().collect();
            prop_assert_eq!(unique.len(), g.len());
        }
    }

    #[test]
    fn shift_keeps_order_and_capacity((tasks, ct) in line_with_cycle(), seed in any::<u64>()) {
        let g = PrecedenceGraph::build(&tasks).expect("valid dag");
        let start = priority_rule(&g, ct, PriorityRule::LargestCandidate);
        let mut rng = StdRng::seed_from_u64(seed);
        for _ in 0..10 {
            let n = shift_neighbor(&start, &g, ct, &mut rng);
            prop_assert_eq!(n.flatten(), start.flatten());
            assert_valid(&n, &g, ct);
        }
    }

    #[test]
    fn efficiency_and_delay_are_complementary((tasks, ct) in line_with_cycle()) {
        let g = PrecedenceGraph::build(&tasks).expect("valid dag");
        let sol = priority_rule(&g, ct, PriorityRule::HelgesonBirnie);
        let le = line_efficiency(&sol, &g, Some(ct));
        let bd = balance_delay(&sol, &g, Some(ct));
        prop_assert!(le <= 100.0 + 1e-9);
        prop_assert!((le + bd - 100.0).abs() < 1e-9);
    }
}

#[test]
fn lcr_end_to_end_scenario() {
    let tasks = [
        Task::new(1, 2.0, []),
        Task::new(2, 5.0, [1]),
        Task::new(3, 4.0, [1]),
        Task::new(4, 3.0, [2, 3]),
    ];
    let line = LineBalancer::new(&tasks).expect("valid");
    assert!((line.graph().total_work() - 14.0).abs() < 1e-10);
    assert_eq!(theoretical_min_stations(line.graph().total_work(), 6.0), 3);

    let outcome = line
        .balance(
            &BalanceConfig::default()
                .with_algorithm(Algorithm::Lcr)
                .with_cycle_time(6.0),
        )
        .expect("balanced");
    let best = outcome.best().expect("solution");
    assert_eq!(best.stations()[0].tasks()[0], 1);
    assert_eq!(best.num_stations(), 3);
    assert_valid(best, line.graph(), 6.0);
}

#[test]
fn seeded_requests_are_reproducible() {
    let tasks: Vec<Task> = (1..=10)
        .map(|i| {
            let preds: Vec<TaskId> = if i > 2 { vec![i - 2, i - 1] } else { vec![] };
            Task::new(i, f64::from(i % 4 + 1), preds)
        })
        .collect();
    let line = LineBalancer::new(&tasks).expect("valid");
    for algorithm in [Algorithm::Comsoal, Algorithm::Genetic] {
        let config = BalanceConfig::default()
            .with_algorithm(algorithm)
            .with_cycle_time(6.0)
            .with_iterations(30)
            .with_population_size(10)
            .with_generations(5)
            .with_seed(2024);
        let a = line.balance(&config).expect("balanced");
        let b = line.balance(&config).expect("balanced");
        assert_eq!(a, b);
    }
}
