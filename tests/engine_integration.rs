//! Integration tests for the Monte Carlo engine.
//!
//! These tests drive the public API end to end:
//! 1. Build a decision snapshot
//! 2. Configure and run the engine
//! 3. Check the summary against known outcomes and invariants

use mcda_sim::domain::decision::{Criterion, Decision};
use mcda_sim::domain::distribution::Distribution;
use mcda_sim::domain::foundation::{ConfidenceLevel, DistributionSlot, SimulationError};
use mcda_sim::domain::simulation::{
    Aggregator, CancellationToken, ExecutionMode, MonteCarloEngine, RunStatus,
    SimulationSettings,
};

// =============================================================================
// Test Infrastructure
// =============================================================================

fn dist(result: Result<Distribution, SimulationError>) -> Distribution {
    result.expect("valid distribution")
}

/// Four options, three criteria, every distribution kind.
fn supplier_decision() -> Decision {
    Decision::builder("Choose a supplier")
        .option("Northwind")
        .option("Contoso")
        .option("Fabrikam")
        .option("Tailspin")
        .criterion(Criterion::maximize("quality"))
        .criterion(Criterion::maximize("reliability"))
        .criterion(Criterion::minimize("lead_time"))
        .weight("quality", dist(Distribution::triangular(0.2, 0.5, 0.7)))
        .weight("reliability", dist(Distribution::beta(3.0, 3.0, 0.6)))
        .weight("lead_time", dist(Distribution::normal(0.2, 0.1)))
        .score("Northwind", "quality", dist(Distribution::normal(7.0, 1.0)))
        .score("Northwind", "reliability", dist(Distribution::uniform(6.0, 9.0)))
        .score("Northwind", "lead_time", dist(Distribution::triangular(10.0, 14.0, 20.0)))
        .score("Contoso", "quality", dist(Distribution::normal(7.5, 2.0)))
        .score("Contoso", "reliability", dist(Distribution::beta(5.0, 2.0, 10.0)))
        .score("Contoso", "lead_time", dist(Distribution::uniform(8.0, 16.0)))
        .score("Fabrikam", "quality", dist(Distribution::truncated_normal(6.0, 2.0, 0.0, 10.0)))
        .score("Fabrikam", "reliability", dist(Distribution::normal(8.0, 0.5)))
        .score("Fabrikam", "lead_time", dist(Distribution::normal(12.0, 1.0)))
        .score("Tailspin", "quality", dist(Distribution::uniform(5.0, 9.0)))
        .score("Tailspin", "reliability", dist(Distribution::triangular(4.0, 7.0, 8.0)))
        .score("Tailspin", "lead_time", dist(Distribution::beta(2.0, 2.0, 20.0)))
        .build()
        .expect("valid decision")
}

fn settings(seed: u64, trials: u64) -> SimulationSettings {
    SimulationSettings::default()
        .with_seed(seed)
        .with_trials(trials)
        .with_block_size(128)
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn degenerate_inputs_give_certain_ranking() {
    let decision = Decision::builder("certain")
        .option("A")
        .option("B")
        .criterion(Criterion::maximize("value"))
        .weight("value", dist(Distribution::uniform(1.0, 1.0)))
        .score("A", "value", dist(Distribution::uniform(10.0, 10.0)))
        .score("B", "value", dist(Distribution::uniform(5.0, 5.0)))
        .build()
        .unwrap();

    let summary = MonteCarloEngine::simulate(&decision, settings(1, 100)).unwrap();
    let a = summary.option_named("A").unwrap();
    let b = summary.option_named("B").unwrap();

    assert_eq!(a.rank1_probability(), 1.0);
    assert_eq!(a.expected_score, 10.0);
    assert_eq!(a.score_variance, 0.0);
    assert_eq!(b.probability_of_rank(2), 1.0);
    assert_eq!(b.expected_score, 5.0);
}

#[test]
fn aggregator_with_no_trials_fails() {
    let decision = supplier_decision();
    let result = Aggregator::new(decision.option_count()).finish(
        &decision.options,
        ConfidenceLevel::NINETY,
        0,
    );
    assert_eq!(result, Err(SimulationError::EmptyTrialSet));
}

#[test]
fn missing_score_fails_before_sampling() {
    let mut decision = supplier_decision();
    let tailspin = decision.option_named("Tailspin").unwrap().id;
    let quality = decision.criterion_named("quality").unwrap().id;
    decision.scores.get_mut(&tailspin).unwrap().remove(&quality);

    let err = MonteCarloEngine::configure(&decision, settings(1, 100)).unwrap_err();
    assert_eq!(
        err,
        SimulationError::IncompleteDecision {
            missing: DistributionSlot::Score {
                option: tailspin,
                criterion: quality,
            }
        }
    );
}

#[test]
fn identical_options_split_first_place() {
    let decision = Decision::builder("twins")
        .option("Left")
        .option("Right")
        .criterion(Criterion::maximize("x"))
        .criterion(Criterion::minimize("y"))
        .weight("x", dist(Distribution::uniform(0.5, 1.5)))
        .weight("y", dist(Distribution::uniform(0.5, 1.5)))
        .score("Left", "x", dist(Distribution::normal(5.0, 1.0)))
        .score("Left", "y", dist(Distribution::triangular(1.0, 2.0, 4.0)))
        .score("Right", "x", dist(Distribution::normal(5.0, 1.0)))
        .score("Right", "y", dist(Distribution::triangular(1.0, 2.0, 4.0)))
        .build()
        .unwrap();

    let summary = MonteCarloEngine::simulate(&decision, settings(2024, 4_000)).unwrap();
    for option in &summary.options {
        let p = option.rank1_probability();
        assert!((p - 0.5).abs() <= 0.1, "{} won {}", option.name, p);
    }
}

// =============================================================================
// Determinism
// =============================================================================

#[test]
fn repeated_runs_are_bit_identical() {
    let decision = supplier_decision();
    let first = MonteCarloEngine::simulate(&decision, settings(99, 3_000)).unwrap();
    let second = MonteCarloEngine::simulate(&decision, settings(99, 3_000)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn worker_count_does_not_change_the_summary() {
    let decision = supplier_decision();
    let sequential = MonteCarloEngine::simulate(
        &decision,
        settings(7, 2_500).with_execution(ExecutionMode::Sequential),
    )
    .unwrap();

    for threads in [1, 3, 8] {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .unwrap();
        let parallel = pool
            .install(|| {
                MonteCarloEngine::simulate(
                    &decision,
                    settings(7, 2_500).with_execution(ExecutionMode::Parallel),
                )
            })
            .unwrap();
        assert_eq!(parallel, sequential, "differs with {} threads", threads);
    }
}

#[test]
fn different_seeds_differ() {
    let decision = supplier_decision();
    let a = MonteCarloEngine::simulate(&decision, settings(1, 1_000)).unwrap();
    let b = MonteCarloEngine::simulate(&decision, settings(2, 1_000)).unwrap();
    assert_ne!(a.options, b.options);
}

#[test]
fn replayed_trials_reproduce_the_summary() {
    let decision = supplier_decision();
    let run_settings = settings(31, 500).with_block_size(500);
    let mut engine = MonteCarloEngine::configure(&decision, run_settings).unwrap();
    let summary = engine.run().unwrap();

    let replayed: Vec<_> = (0..500)
        .map(|i| engine.replay_trial(i).unwrap())
        .collect();
    let rebuilt = Aggregator::from_trials(decision.option_count(), &replayed)
        .finish(&decision.options, run_settings.confidence_level, 31)
        .unwrap();

    assert_eq!(rebuilt, summary);
}

// =============================================================================
// Invariants
// =============================================================================

#[test]
fn rank_probabilities_are_conserved() {
    let decision = supplier_decision();
    let summary = MonteCarloEngine::simulate(&decision, settings(5, 2_000)).unwrap();
    let m = decision.option_count();

    for option in &summary.options {
        assert_eq!(option.rank_probabilities.len(), m);
        let total: f64 = option.rank_probabilities.iter().sum();
        assert!((total - 1.0).abs() < 1e-9);
    }
    for rank in 0..m {
        let total: f64 = summary.options.iter().map(|o| o.rank_probabilities[rank]).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }
}

#[test]
fn every_trial_has_normalized_weights_and_valid_ranks() {
    let decision = supplier_decision();
    let engine = MonteCarloEngine::configure(&decision, settings(12, 300)).unwrap();
    let m = decision.option_count() as u32;

    for index in 0..300 {
        let trial = engine.replay_trial(index).unwrap();
        assert!((trial.weights.sum() - 1.0).abs() < 1e-9);
        assert!(trial.ranks.iter().all(|r| (1..=m).contains(r)));
        assert!(trial.ranks.contains(&1));
    }
}

#[test]
fn confidence_interval_widens_with_level() {
    let decision = supplier_decision();
    let narrow = MonteCarloEngine::simulate(
        &decision,
        settings(8, 2_000).with_confidence_level(ConfidenceLevel::try_new(0.5).unwrap()),
    )
    .unwrap();
    let wide = MonteCarloEngine::simulate(
        &decision,
        settings(8, 2_000).with_confidence_level(ConfidenceLevel::try_new(0.99).unwrap()),
    )
    .unwrap();

    for (n, w) in narrow.options.iter().zip(&wide.options) {
        assert_eq!(n.expected_score, w.expected_score);
        assert!(w.confidence_interval.lower <= n.confidence_interval.lower);
        assert!(w.confidence_interval.upper >= n.confidence_interval.upper);
    }
}

// =============================================================================
// Lifecycle
// =============================================================================

#[test]
fn cancelled_parallel_run_fails_without_summary() {
    let decision = supplier_decision();
    let mut engine = MonteCarloEngine::configure(
        &decision,
        settings(3, 5_000).with_execution(ExecutionMode::Parallel),
    )
    .unwrap();
    let token = CancellationToken::new();
    token.cancel();

    let err = engine.run_with_cancellation(&token).unwrap_err();
    assert_eq!(err, SimulationError::Cancelled { completed_trials: 0 });
    assert_eq!(engine.status(), RunStatus::Failed);
    assert!(engine.summary().is_none());
}

#[test]
fn summary_serializes_to_json() {
    let decision = supplier_decision();
    let summary = MonteCarloEngine::simulate(&decision, settings(4, 200)).unwrap();
    let json = summary.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["seed"], 4);
    assert_eq!(value["trials"], 200);
    assert_eq!(value["options"].as_array().unwrap().len(), 4);
}
