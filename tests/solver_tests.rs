use std::time::{Duration, Instant};

use trip_solver::feasibility::{Coverage, DecisionFunction, MustInclude};
use trip_solver::matrix::{Cost, CostMatrix};
use trip_solver::solver::{
    solve, walk_cost, CoverageSolver, ExactSolver, SolveStrategy, Solution, SolverConfig, WalkKind,
    WalkSolver,
};
use trip_solver::SolverError;

/// SplitMix64, so instances are reproducible without a rand dependency.
struct Seq(u64);

impl Seq {
    fn next(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }

    fn below(&mut self, bound: u64) -> u64 {
        self.next() % bound
    }
}

fn time_ordered_instance(seed: u64, size: usize, groups: usize) -> (CostMatrix, Coverage) {
    let mut seq = Seq(seed);
    let costs = CostMatrix::from_fn(size, |from, to| {
        (from < to && seq.below(10) < 6).then(|| seq.below(20))
    });
    let names: Vec<String> = (0..groups).map(|g| format!("g{g}")).collect();
    let memberships: Vec<Vec<String>> = (0..size)
        .map(|_| {
            let first = seq.below(groups as u64) as usize;
            let mut members = vec![names[first].clone()];
            if seq.below(3) == 0 {
                members.push(names[(first + 1) % groups].clone());
            }
            members
        })
        .collect();
    let coverage = Coverage::new(names, &memberships).expect("few groups");
    (costs, coverage)
}

/// A league season seen from one team: events on non-decreasing days, each
/// against one opponent, every opponent met at least once. Travel between two
/// events costs the days between them, so a walk costs its span in days.
fn season(seed: u64, size: usize, groups: usize) -> (CostMatrix, Coverage, Vec<u64>, Vec<usize>) {
    let mut seq = Seq(seed);
    let mut opponents: Vec<usize> = (0..size)
        .map(|event| if event < groups { event } else { seq.below(groups as u64) as usize })
        .collect();
    for i in (1..size).rev() {
        let j = seq.below(i as u64 + 1) as usize;
        opponents.swap(i, j);
    }
    let mut days = Vec::with_capacity(size);
    let mut day = 0;
    for _ in 0..size {
        day += seq.below(3);
        days.push(day);
    }

    let costs = CostMatrix::from_fn(size, |from, to| (from < to).then(|| days[to] - days[from]));
    let names: Vec<String> = (0..groups).map(|g| format!("team_{g}")).collect();
    let memberships: Vec<Vec<&str>> = opponents
        .iter()
        .map(|&opponent| vec![names[opponent].as_str()])
        .collect();
    let coverage = Coverage::new(names.clone(), &memberships).expect("fits a mask");
    (costs, coverage, days, opponents)
}

/// Shortest span in days of a run of consecutive events meeting every opponent.
fn tightest_window(days: &[u64], opponents: &[usize], groups: usize) -> Option<u64> {
    let mut counts = vec![0usize; groups];
    let (mut seen, mut start, mut best) = (0, 0, None);
    for end in 0..days.len() {
        if counts[opponents[end]] == 0 {
            seen += 1;
        }
        counts[opponents[end]] += 1;
        while seen == groups {
            let span = days[end] - days[start];
            best = Some(best.map_or(span, |best: u64| best.min(span)));
            counts[opponents[start]] -= 1;
            if counts[opponents[start]] == 0 {
                seen -= 1;
            }
            start += 1;
        }
    }
    best
}

fn assert_valid(costs: &CostMatrix, decision: &dyn DecisionFunction, solution: &Solution) {
    let mut subset = solution.walk.subset();
    subset.dedup();
    assert_eq!(subset.len(), solution.events().len(), "events repeat");
    assert!(decision.accepts(&subset), "subset {subset:?} not accepted");
    assert_eq!(walk_cost(costs, &solution.walk), Some(solution.travel_cost));
}

#[test]
fn coverage_and_exact_solvers_agree_on_time_ordered_instances() {
    for seed in 0..40 {
        let (costs, coverage) = time_ordered_instance(seed, 9, 4);
        for edge_penalty in [0, 1] {
            let config = SolverConfig {
                edge_penalty,
                ..SolverConfig::default()
            };
            let exact = ExactSolver::new(config).solve(&costs, &coverage);
            let label = CoverageSolver::new(config).solve(&costs, &coverage);
            match (exact, label) {
                (Ok(exact), Ok(label)) => {
                    assert_eq!(exact.objective, label.objective, "seed {seed}");
                    assert_valid(&costs, &coverage, &exact);
                    assert_valid(&costs, &coverage, &label);
                }
                (Err(SolverError::Infeasible), Err(SolverError::Infeasible)) => {}
                (exact, label) => panic!("seed {seed}: exact {exact:?} vs label {label:?}"),
            }
        }
    }
}

#[test]
fn closed_walk_through_depot_matches_open_walk() {
    for seed in 0..25 {
        let mut seq = Seq(1_000 + seed);
        let size = 7;
        let costs = CostMatrix::from_fn(size, |_, _| (seq.below(4) != 0).then(|| seq.below(30)));
        let required = vec![0, 3, 5];

        let open = ExactSolver::new(SolverConfig::default())
            .solve(&costs, &MustInclude(required.clone()));

        let depot = costs.with_depot();
        let mut with_depot = required.clone();
        with_depot.push(size);
        let closed = ExactSolver::new(SolverConfig {
            walk_kind: WalkKind::Closed,
            ..SolverConfig::default()
        })
        .solve(&depot, &MustInclude(with_depot));

        match (open, closed) {
            (Ok(open), Ok(closed)) => {
                assert_eq!(open.travel_cost, closed.travel_cost, "seed {seed}");
                assert_valid(&depot, &MustInclude(vec![size]), &closed);
            }
            (Err(SolverError::Infeasible), Err(SolverError::Infeasible)) => {}
            (open, closed) => panic!("seed {seed}: open {open:?} vs closed {closed:?}"),
        }
    }
}

#[test]
fn closed_walks_are_never_cheaper_than_open_ones() {
    let costs = CostMatrix::from_fn(5, |from, to| Some((from.abs_diff(to) * 3) as Cost));
    let decision = MustInclude(vec![0, 2, 4]);
    let open = solve(&costs, &decision, &SolverConfig::default()).expect("complete graph");
    let closed = solve(
        &costs,
        &decision,
        &SolverConfig {
            walk_kind: WalkKind::Closed,
            ..SolverConfig::default()
        },
    )
    .expect("complete graph");
    assert_eq!(open.travel_cost, 12);
    assert_eq!(closed.travel_cost, 24);
    assert!(open.objective <= closed.objective);
}

#[test]
fn explicit_coverage_strategy_rejects_generic_predicates() {
    let costs = CostMatrix::from_fn(3, |from, to| (from < to).then_some(1));
    let config = SolverConfig {
        strategy: SolveStrategy::Coverage,
        ..SolverConfig::default()
    };
    let result = solve(&costs, &MustInclude(vec![0]), &config);
    assert!(matches!(result, Err(SolverError::Unsupported(_))));
}

#[test]
fn auto_strategy_falls_back_to_exact_on_cycles() {
    let costs = CostMatrix::from_fn(4, |_, _| Some(2));
    let coverage = Coverage::new(
        vec!["x".to_string(), "y".to_string()],
        &[vec!["x"], vec![], vec![], vec!["y"]],
    )
    .expect("two groups");
    let solution = solve(&costs, &coverage, &SolverConfig::default()).expect("complete graph");
    assert_eq!(solution.travel_cost, 2);
    assert_eq!(solution.walk.subset(), vec![0, 3]);
}

#[test]
fn generic_predicate_over_subset_size() {
    // Pick the cheapest three-event path on a line where each hop costs its index.
    let costs = CostMatrix::from_fn(6, |from, to| (to == from + 1).then_some(from as Cost));
    let three = |subset: &[usize]| subset.len() == 3;
    let solution = solve(&costs, &three, &SolverConfig::default()).expect("line has paths");
    assert_eq!(solution.events(), &[0, 1, 2]);
    assert_eq!(solution.travel_cost, 1);
}

#[test]
fn season_sized_coverage_is_optimal_and_fast() {
    let config = SolverConfig {
        edge_penalty: 1,
        ..SolverConfig::default()
    };
    for (seed, size, groups) in [(7, 41, 31), (8, 60, 30), (9, 82, 31), (10, 82, 40)] {
        let (costs, coverage, days, opponents) = season(seed, size, groups);
        let started = Instant::now();
        let solution = CoverageSolver::new(config)
            .solve(&costs, &coverage)
            .expect("every opponent appears");
        let elapsed = started.elapsed();
        assert!(
            elapsed < Duration::from_secs(5),
            "{size} events, {groups} groups took {elapsed:?}"
        );

        // One game per opponent inside the tightest window is optimal.
        let span = tightest_window(&days, &opponents, groups).expect("covering window");
        assert_eq!(solution.travel_cost, span, "seed {seed}");
        assert_eq!(solution.objective, span + groups as Cost - 1, "seed {seed}");
        assert_eq!(solution.events().len(), groups);
        assert_valid(&costs, &coverage, &solution);
    }
}
