//! Property-based tests for u-hive.
//!
//! Uses proptest to verify invariants across many random inputs.

use proptest::prelude::*;
use rand::Rng;
use u_hive::aco::construct::{cumulative_distribution, select_from_cumulative};
use u_hive::aco::{AcoParams, EdgeKey, SolutionConstructor};
use u_hive::ga::operators::{
    order_one_crossover, prefix_child, range_reversal_mutation, swap_mutation,
};
use u_hive::pheromone::PheromoneField;
use u_hive::problem::{is_permutation, Problem, SmtwtpHeuristic, SmtwtpInstance, TspInstance};
use u_hive::random::{create_rng, random_permutation};

// ============================================================================
// Strategies
// ============================================================================

fn random_coords() -> impl Strategy<Value = Vec<(f64, f64)>> {
    (2usize..15).prop_flat_map(|n| prop::collection::vec((0.0..100.0f64, 0.0..100.0f64), n))
}

fn random_tsp() -> impl Strategy<Value = TspInstance> {
    random_coords().prop_map(|coords| TspInstance::from_coords("random", &coords))
}

type JobColumns = (Vec<u64>, Vec<u64>, Vec<u64>);

fn random_job_columns() -> impl Strategy<Value = JobColumns> {
    (1usize..12).prop_flat_map(|n| {
        (
            prop::collection::vec(1u64..20, n),
            prop::collection::vec(0u64..60, n),
            prop::collection::vec(0u64..10, n),
        )
    })
}

fn random_smtwtp() -> impl Strategy<Value = SmtwtpInstance> {
    random_job_columns().prop_map(|(p, d, w)| SmtwtpInstance::from_columns("random", &p, &d, &w))
}

fn parents() -> impl Strategy<Value = (Vec<usize>, Vec<usize>)> {
    (1usize..30, any::<u64>()).prop_map(|(n, seed)| {
        let mut rng = create_rng(seed);
        (random_permutation(n, &mut rng), random_permutation(n, &mut rng))
    })
}

// ============================================================================
// Construction
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_constructed_tours_are_permutations(
        tsp in random_tsp(),
        greedy_prob in 0.0..=1.0f64,
        seed in any::<u64>(),
    ) {
        let n = tsp.size();
        let params = AcoParams::default();
        let mut field = PheromoneField::new(n, 0.5);
        field.recompute_selection_values(&tsp, params.alpha, params.beta);
        let mut ctor = SolutionConstructor::new(n);
        let mut rng = create_rng(seed);
        let mut tour = Vec::new();
        ctor.construct(&tsp, &field, &params, greedy_prob, &mut rng, &mut tour);
        prop_assert!(is_permutation(&tour, n), "not a permutation: {:?}", tour);
    }

    #[test]
    fn prop_contextual_schedules_are_permutations(
        jobs in random_smtwtp(),
        seed in any::<u64>(),
    ) {
        let jobs = jobs.with_heuristic(SmtwtpHeuristic::ModifiedDueDate);
        let n = jobs.size();
        let params = AcoParams::default();
        let mut field = PheromoneField::new(n, 1.0);
        field.recompute_selection_values(&jobs, params.alpha, params.beta);
        let mut ctor = SolutionConstructor::new(n);
        let mut rng = create_rng(seed);
        let mut schedule = Vec::new();
        ctor.construct(&jobs, &field, &params, 0.5, &mut rng, &mut schedule);
        prop_assert!(is_permutation(&schedule, n));
    }

    #[test]
    fn prop_cumulative_is_monotone_and_ends_at_one(
        weights in prop::collection::vec(0.0..10.0f64, 1..40),
        mask_seed in any::<u64>(),
    ) {
        let mut rng = create_rng(mask_seed);
        let visited: Vec<bool> = weights.iter().map(|_| rng.random_bool(0.3)).collect();
        let cum = cumulative_distribution(&weights, &visited);
        prop_assert_eq!(cum.len(), weights.len());
        for w in cum.windows(2) {
            prop_assert!(w[1] >= w[0], "cumulative must not decrease: {:?}", cum);
        }
        prop_assert_eq!(*cum.last().unwrap(), 1.0);
        prop_assert!(cum.iter().all(|&c| (0.0..=1.0).contains(&c)));
    }

    #[test]
    fn prop_selection_lands_on_unvisited(
        weights in prop::collection::vec(0.0..10.0f64, 2..40),
        draw in 0.0..=1.0f64,
        seed in any::<u64>(),
    ) {
        let mut rng = create_rng(seed);
        let mut visited: Vec<bool> = weights.iter().map(|_| rng.random_bool(0.5)).collect();
        // Keep at least one item open.
        let open = rng.random_range(0..weights.len());
        visited[open] = false;
        let cum = cumulative_distribution(&weights, &visited);
        let pick = select_from_cumulative(&cum, &visited, draw);
        prop_assert!(pick.is_some_and(|i| !visited[i]), "picked {:?}", pick);
    }
}

// ============================================================================
// Pheromone field
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_pheromone_stays_non_negative(
        ops in prop::collection::vec((0usize..6, 0usize..6, 0.0..=1.0f64, -5.0..50.0f64), 1..60),
    ) {
        let mut field = PheromoneField::new(6, 0.3);
        for (i, j, rho, amount) in ops {
            if i == j {
                continue;
            }
            field.evaporate(i, j, rho);
            field.deposit(i, j, amount);
            field.evaporate_all(rho / 2.0);
        }
        let (lo, hi) = field.bounds();
        prop_assert!(lo >= 0.0, "negative pheromone {}", lo);
        prop_assert!(hi.is_finite());
    }

    #[test]
    fn prop_edge_key_is_symmetric_and_injective(
        a in 0usize..500, b in 0usize..500, c in 0usize..500, d in 0usize..500,
    ) {
        prop_assert_eq!(EdgeKey::new(a, b), EdgeKey::new(b, a));
        let same_pair = (a.min(b), a.max(b)) == (c.min(d), c.max(d));
        prop_assert_eq!(EdgeKey::new(a, b) == EdgeKey::new(c, d), same_pair);
    }
}

// ============================================================================
// GA operators
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_crossover_children_are_permutations((p1, p2) in parents(), seed in any::<u64>()) {
        let n = p1.len();
        let mut rng = create_rng(seed);
        let (c1, c2) = order_one_crossover(&p1, &p2, &mut rng);
        prop_assert!(is_permutation(&c1, n));
        prop_assert!(is_permutation(&c2, n));
    }

    #[test]
    fn prop_prefix_child_keeps_head_and_tail_order(
        (p1, p2) in parents(),
        cut_frac in 0.0..1.0f64,
    ) {
        let n = p1.len();
        let cut = ((cut_frac * n as f64) as usize).min(n - 1);
        let child = prefix_child(&p1, &p2, cut);
        prop_assert!(is_permutation(&child, n));
        prop_assert_eq!(&child[..cut], &p1[..cut]);
        let expected_tail: Vec<usize> =
            p2.iter().copied().filter(|item| !p1[..cut].contains(item)).collect();
        prop_assert_eq!(&child[cut..], expected_tail.as_slice());
    }

    #[test]
    fn prop_mutations_preserve_permutation((p, _) in parents(), seed in any::<u64>()) {
        let n = p.len();
        let mut rng = create_rng(seed);
        let mut reversed = p.clone();
        range_reversal_mutation(&mut reversed, &mut rng);
        prop_assert!(is_permutation(&reversed, n));
        let mut swapped = p;
        swap_mutation(&mut swapped, &mut rng);
        prop_assert!(is_permutation(&swapped, n));
    }
}

// ============================================================================
// Scoring
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_tsp_score_is_sum_of_legs(coords in random_coords(), seed in any::<u64>()) {
        let tsp = TspInstance::from_coords("random", &coords);
        let mut rng = create_rng(seed);
        let tour = random_permutation(coords.len(), &mut rng);
        let mut expected = 0.0;
        for leg in tour.windows(2) {
            let (x1, y1) = coords[leg[0]];
            let (x2, y2) = coords[leg[1]];
            expected += ((x1 - x2).powi(2) + (y1 - y2).powi(2)).sqrt();
        }
        let score = tsp.score(&tour);
        let tolerance = 1e-9 * expected.max(1.0);
        prop_assert!((score - expected).abs() <= tolerance, "{} vs {}", score, expected);
        prop_assert_eq!(score, tsp.score(&tour));
    }

    #[test]
    fn prop_smtwtp_score_is_running_weighted_tardiness(
        (p, d, w) in random_job_columns(),
        seed in any::<u64>(),
    ) {
        let jobs = SmtwtpInstance::from_columns("random", &p, &d, &w);
        let mut rng = create_rng(seed);
        let schedule = random_permutation(p.len(), &mut rng);
        let mut clock = 0u64;
        let mut expected = 0u64;
        for &j in &schedule {
            clock += p[j];
            if clock > d[j] {
                expected += w[j] * (clock - d[j]);
            }
        }
        prop_assert_eq!(jobs.score(&schedule), expected as f64);
        prop_assert_eq!(jobs.score(&schedule), jobs.score(&schedule));
    }
}
