//! End-to-end scenarios through the run boundary

use std::collections::BTreeMap;
use std::thread;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use chromatic_core::execution::{CancellationToken, Deadline, ProgressReporter};
use chromatic_core::{
    create_strategy, AlgorithmId, AttemptOutcome, Coloring, ColoringEngine, ConflictAnalyzer,
    EngineOptions, EscalationDriver, Graph, GraphInput, RunEvent, RunParams, RunRequest, RunStatus,
};

fn complete_edges(n: u64) -> Vec<(u64, u64)> {
    (0..n).flat_map(|u| (u + 1..n).map(move |v| (u, v))).collect()
}

fn linked_triangles() -> GraphInput {
    GraphInput::new(6, vec![(0, 1), (1, 2), (0, 2), (3, 4), (4, 5), (3, 5), (2, 3)])
}

fn random_graph(n: u64, density: f64, seed: u64) -> GraphInput {
    let mut rng = StdRng::seed_from_u64(seed);
    let edges = (0..n)
        .flat_map(|u| (u + 1..n).map(move |v| (u, v)))
        .filter(|_| rng.gen::<f64>() < density)
        .collect();
    GraphInput::new(n as usize, edges)
}

fn run(algorithm: AlgorithmId, graph: GraphInput, params: RunParams) -> Vec<RunEvent> {
    ColoringEngine::default()
        .spawn(RunRequest::new(algorithm, graph, params))
        .collect()
}

fn done(events: &[RunEvent]) -> (&RunStatus, &BTreeMap<u64, u32>, usize, usize) {
    match events.last() {
        Some(RunEvent::Done {
            status,
            final_coloring,
            metrics,
            ..
        }) => (status, final_coloring, metrics.colors_used, metrics.conflicts),
        other => panic!("expected a done event, got {:?}", other),
    }
}

#[test]
fn single_edge_with_basic_greedy() {
    let events = run(
        AlgorithmId::BasicGreedy,
        GraphInput::new(2, vec![(0, 1)]),
        RunParams::default(),
    );
    let (status, coloring, colors_used, conflicts) = done(&events);

    assert_eq!(*status, RunStatus::Completed);
    assert_eq!(coloring, &BTreeMap::from([(0, 1), (1, 2)]));
    assert_eq!(colors_used, 2);
    assert_eq!(conflicts, 0);
}

#[test]
fn complete_graph_with_backtracking_at_four_colors() {
    let events = run(
        AlgorithmId::Backtracking,
        GraphInput::new(4, complete_edges(4)),
        RunParams::default().with_max_colors(4),
    );
    let (status, _, colors_used, _) = done(&events);

    assert_eq!(*status, RunStatus::Completed);
    assert_eq!(colors_used, 4);
}

#[test]
fn complete_graph_below_chromatic_number_escalates() {
    let graph = Graph::from_edges(4, (0..4).flat_map(|u| (u + 1..4).map(move |v| (u, v))));
    let params = RunParams::default().with_max_colors(3).with_time_limit(5.0);
    let options = EngineOptions::default();
    let driver = EscalationDriver::new(
        &graph,
        &params,
        &options,
        Deadline::starting_now(params.time_limit_duration()),
        CancellationToken::new(),
    );
    let mut strategy = create_strategy(AlgorithmId::Backtracking, &params, &options);
    let mut reporter = ProgressReporter::silent(4);

    let report = driver.run(strategy.as_mut(), &mut reporter).unwrap();

    assert_eq!(report.attempted_colors(), vec![Some(3), Some(4)]);
    assert_ne!(report.attempts[0].outcome, Ok(AttemptOutcome::Solved));
    assert!(report.solved);
    assert_eq!(report.coloring.colors_used(), 4);
}

#[test]
fn isolated_nodes_share_color_one() {
    let events = run(
        AlgorithmId::BasicGreedy,
        GraphInput::new(10, vec![]),
        RunParams::default(),
    );
    let (status, coloring, colors_used, _) = done(&events);

    assert_eq!(*status, RunStatus::Completed);
    assert_eq!(coloring.len(), 10);
    assert!(coloring.values().all(|&c| c == 1));
    assert_eq!(colors_used, 1);
}

#[test]
fn linked_triangles_with_dsatur() {
    let events = run(AlgorithmId::DSatur, linked_triangles(), RunParams::default());
    let (status, _, colors_used, conflicts) = done(&events);

    assert_eq!(*status, RunStatus::Completed);
    assert_eq!(colors_used, 3);
    assert_eq!(conflicts, 0);
}

#[test]
fn external_identifiers_survive_the_round_trip() {
    let graph = GraphInput::new(3, vec![(100, 200), (200, 300)]).with_node_ids(vec![100, 200, 300]);
    let events = run(AlgorithmId::WelshPowell, graph, RunParams::default());
    let (_, coloring, _, _) = done(&events);

    assert_eq!(coloring.keys().copied().collect::<Vec<_>>(), vec![100, 200, 300]);
    assert_eq!(coloring[&200], 1);
}

#[test]
fn watchdog_terminates_a_stalled_worker() {
    // pacing far beyond the limit keeps the worker asleep after its first step
    let options = EngineOptions {
        pacing: Some(Duration::from_secs(5)),
        grace_period: Duration::from_millis(200),
        ..EngineOptions::default()
    };
    let engine = ColoringEngine::new(options);
    let started = Instant::now();
    let events: Vec<RunEvent> = engine
        .spawn(RunRequest::new(
            AlgorithmId::BasicGreedy,
            GraphInput::new(3, vec![(0, 1)]),
            RunParams::default().with_time_limit(0.2),
        ))
        .collect();

    assert!(started.elapsed() < Duration::from_secs(3));
    let terminal: Vec<&RunEvent> = events.iter().filter(|e| e.is_terminal()).collect();
    assert_eq!(terminal.len(), 1);
    match events.last() {
        Some(RunEvent::Error { message }) => assert!(message.contains("Watchdog")),
        other => panic!("expected watchdog error, got {:?}", other),
    }
}

#[test]
fn cancelled_run_reports_audited_best_so_far() {
    // dense enough that two colors never suffice; the long stagnation
    // window keeps tabu search at k=2 until the cancel lands
    let params = RunParams {
        max_colors: Some(2),
        stagnation_time: 120_000,
        seed: Some(11),
        ..RunParams::default().with_time_limit(60.0)
    };
    let handle = ColoringEngine::default().spawn(RunRequest::new(
        AlgorithmId::TabuSearch,
        random_graph(200, 0.5, 17),
        params,
    ));

    let started = Instant::now();
    thread::sleep(Duration::from_millis(300));
    handle.cancel();
    let events: Vec<RunEvent> = handle.collect();

    assert!(started.elapsed() < Duration::from_secs(10));
    assert_eq!(events.iter().filter(|e| e.is_terminal()).count(), 1);
    let (status, coloring, _, conflicts) = done(&events);
    assert_eq!(coloring.len(), 200);
    assert!(coloring.values().all(|&c| c >= 1));
    assert!(conflicts > 0);
    assert_eq!(*status, RunStatus::Failed { conflicts });
}

#[test]
fn invalid_parameters_are_reported_as_errors() {
    let events = run(
        AlgorithmId::TabuSearch,
        linked_triangles(),
        RunParams::default().with_time_limit(-1.0),
    );

    assert_eq!(events.len(), 1);
    assert!(matches!(&events[0], RunEvent::Error { message } if message.contains("timeLimit")));
}

#[test]
fn every_strategy_ends_with_a_verified_coloring() {
    let graph = random_graph(12, 0.3, 42);
    let params = RunParams::default().with_time_limit(3.0).with_seed(5);

    for algorithm in AlgorithmId::ALL {
        let events = run(algorithm, graph.clone(), params.clone());

        let terminals = events.iter().filter(|e| e.is_terminal()).count();
        assert_eq!(terminals, 1, "{} produced {} terminal events", algorithm, terminals);

        let iterations: Vec<u64> = events
            .iter()
            .filter_map(|e| match e {
                RunEvent::Step { iteration, .. } => Some(*iteration),
                _ => None,
            })
            .collect();
        assert!(
            iterations.windows(2).all(|w| w[0] <= w[1]),
            "{} emitted decreasing iterations",
            algorithm
        );

        let (status, coloring, _, conflicts) = done(&events);
        assert_eq!(coloring.len(), 12, "{} left nodes uncolored", algorithm);
        assert!(coloring.values().all(|&c| c >= 1));
        if status.is_success() {
            assert_eq!(conflicts, 0, "{} claimed {} with conflicts", algorithm, status);
        }
    }
}

#[test]
fn metaheuristic_color_budget_never_decreases() {
    let graph = Graph::from_edges(5, (0..5).flat_map(|u| (u + 1..5).map(move |v| (u, v))));
    let params = RunParams {
        max_colors: Some(1),
        stagnation_time: 50,
        seed: Some(3),
        ..RunParams::default().with_time_limit(5.0)
    };
    let options = EngineOptions::default();
    let driver = EscalationDriver::new(
        &graph,
        &params,
        &options,
        Deadline::starting_now(params.time_limit_duration()),
        CancellationToken::new(),
    );
    let mut strategy = create_strategy(AlgorithmId::TabuSearch, &params, &options);
    let mut reporter = ProgressReporter::silent(5);

    let report = driver.run(strategy.as_mut(), &mut reporter).unwrap();
    let caps: Vec<u32> = report.attempted_colors().into_iter().flatten().collect();

    assert_eq!(caps.first(), Some(&1));
    assert!(caps.windows(2).all(|w| w[0] <= w[1]));
    assert!(report.solved);
    assert_eq!(caps.last(), Some(&5));
}

#[test]
fn conflict_count_ignores_edge_order() {
    let input = random_graph(30, 0.2, 9);
    let mut reversed = input.edges.clone();
    reversed.reverse();
    let flipped: Vec<(u64, u64)> = input.edges.iter().map(|&(u, v)| (v, u)).collect();

    let mut rng = StdRng::seed_from_u64(1);
    let coloring = Coloring::from_vec((0..30).map(|_| rng.gen_range(1..=4)).collect());

    let counts: Vec<usize> = [input.edges.clone(), reversed, flipped]
        .into_iter()
        .map(|edges| {
            let (graph, _) = Graph::from_input(&GraphInput::new(30, edges)).unwrap();
            ConflictAnalyzer::new(&graph).count(&coloring)
        })
        .collect();

    assert!(counts.windows(2).all(|w| w[0] == w[1]));
}
