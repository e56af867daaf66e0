//! Trial Evaluator - weighted totals and competition ranks for one trial.

use serde::{Deserialize, Serialize};

use super::{ScoreMatrix, WeightVector};
use crate::domain::foundation::OptionId;

/// Totals closer than this are treated as tied.
pub const TIE_TOLERANCE: f64 = 1e-9;

/// Everything one trial produced.
///
/// `totals` and `ranks` follow the option order of `scores`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialResult {
    pub index: u64,
    pub weights: WeightVector,
    pub scores: ScoreMatrix,
    pub totals: Vec<f64>,
    /// 1 = best.
    pub ranks: Vec<u32>,
}

impl TrialResult {
    fn position(&self, option: &OptionId) -> Option<usize> {
        self.scores.options().iter().position(|o| o == option)
    }

    /// Weighted total of one option.
    pub fn total(&self, option: &OptionId) -> Option<f64> {
        self.position(option).map(|i| self.totals[i])
    }

    /// Rank of one option.
    pub fn rank(&self, option: &OptionId) -> Option<u32> {
        self.position(option).map(|i| self.ranks[i])
    }
}

/// Combines one weight vector and one score matrix.
pub struct TrialEvaluator;

impl TrialEvaluator {
    /// Evaluates one trial.
    pub fn evaluate(index: u64, weights: WeightVector, scores: ScoreMatrix) -> TrialResult {
        let totals = Self::totals(&weights, &scores);
        let ranks = Self::competition_ranks(&totals);
        TrialResult {
            index,
            weights,
            scores,
            totals,
            ranks,
        }
    }

    /// Computes total = Σ weight[c] × score[o, c] for each option.
    pub fn totals(weights: &WeightVector, scores: &ScoreMatrix) -> Vec<f64> {
        (0..scores.options().len())
            .map(|row| {
                scores
                    .row(row)
                    .iter()
                    .zip(weights.values())
                    .map(|(score, weight)| score * weight)
                    .sum()
            })
            .collect()
    }

    /// Standard competition ranking ("1224"), higher totals first.
    ///
    /// An option's rank is one plus the number of options whose total exceeds
    /// its own by more than [`TIE_TOLERANCE`].
    ///
    /// # Edge Cases
    /// - Empty input: Returns empty Vec
    /// - All tied: Every option is rank 1
    pub fn competition_ranks(totals: &[f64]) -> Vec<u32> {
        totals
            .iter()
            .map(|own| {
                let better = totals
                    .iter()
                    .filter(|other| **other - own > TIE_TOLERANCE)
                    .count();
                better as u32 + 1
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::decision::{Criterion, Decision};
    use crate::domain::distribution::Distribution;
    use crate::domain::simulation::{trial_rng, ScoreMatrixSampler, WeightVectorSampler};

    #[test]
    fn distinct_totals_rank_descending() {
        assert_eq!(
            TrialEvaluator::competition_ranks(&[3.0, 9.0, 5.0]),
            vec![3, 1, 2]
        );
    }

    #[test]
    fn ties_share_the_lower_rank() {
        assert_eq!(
            TrialEvaluator::competition_ranks(&[5.0, 7.0, 7.0, 1.0]),
            vec![3, 1, 1, 4]
        );
    }

    #[test]
    fn near_ties_within_tolerance_share_rank() {
        assert_eq!(
            TrialEvaluator::competition_ranks(&[1.0, 1.0 + 1e-12]),
            vec![1, 1]
        );
    }

    #[test]
    fn empty_totals_give_empty_ranks() {
        assert!(TrialEvaluator::competition_ranks(&[]).is_empty());
    }

    #[test]
    fn evaluate_weights_scores() {
        let d = Decision::builder("two criteria")
            .option("A")
            .option("B")
            .criterion(Criterion::maximize("x"))
            .criterion(Criterion::maximize("y"))
            .weight("x", Distribution::fixed(3.0).unwrap())
            .weight("y", Distribution::fixed(1.0).unwrap())
            .score("A", "x", Distribution::fixed(10.0).unwrap())
            .score("A", "y", Distribution::fixed(0.0).unwrap())
            .score("B", "x", Distribution::fixed(0.0).unwrap())
            .score("B", "y", Distribution::fixed(20.0).unwrap())
            .build()
            .unwrap();
        let mut rng = trial_rng(9, 0);
        let w = WeightVectorSampler::new(&d).unwrap().sample(&mut rng, 0).unwrap();
        let s = ScoreMatrixSampler::new(&d).unwrap().sample(&mut rng, 0).unwrap();
        let result = TrialEvaluator::evaluate(0, w, s);

        let a = d.option_named("A").unwrap().id;
        let b = d.option_named("B").unwrap().id;
        assert!((result.total(&a).unwrap() - 7.5).abs() < 1e-12);
        assert!((result.total(&b).unwrap() - 5.0).abs() < 1e-12);
        assert_eq!(result.rank(&a), Some(1));
        assert_eq!(result.rank(&b), Some(2));
    }
}
