use std::fmt;

use rayon::prelude::*;

use crate::dataset::Label;
use crate::model::{THRESHOLD, TrainedModel};

/// Outcome counts of classifying a labelled test set.
///
/// A posterior of exactly [`THRESHOLD`] is neither spam nor ham and is only
/// tallied in `undecided`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfusionMatrix {
    pub true_positive: usize,
    pub false_positive: usize,
    pub true_negative: usize,
    pub false_negative: usize,
    pub undecided: usize,
}

impl ConfusionMatrix {
    pub fn record(&mut self, probability: f64, label: Label) {
        let cell = match label {
            Label::Spam if probability > THRESHOLD => &mut self.true_positive,
            Label::Spam if probability < THRESHOLD => &mut self.false_negative,
            Label::Ham if probability < THRESHOLD => &mut self.true_negative,
            Label::Ham if probability > THRESHOLD => &mut self.false_positive,
            _ => &mut self.undecided,
        };
        *cell += 1;
    }

    /// Adds the counts of `other` to this matrix.
    pub fn merge(mut self, other: ConfusionMatrix) -> Self {
        self.true_positive += other.true_positive;
        self.false_positive += other.false_positive;
        self.true_negative += other.true_negative;
        self.false_negative += other.false_negative;
        self.undecided += other.undecided;
        self
    }

    pub fn decided(&self) -> usize {
        self.true_positive + self.false_positive + self.true_negative + self.false_negative
    }

    /// Share of correct verdicts as a whole percentage, truncated.
    pub fn accuracy_percent(&self) -> u32 {
        match self.decided() {
            0 => 0,
            decided => ((self.true_positive + self.true_negative) * 100 / decided) as u32,
        }
    }
}

impl FromIterator<(f64, Label)> for ConfusionMatrix {
    fn from_iter<I: IntoIterator<Item = (f64, Label)>>(iter: I) -> Self {
        let mut matrix = ConfusionMatrix::default();
        for (probability, label) in iter {
            matrix.record(probability, label);
        }
        matrix
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Confusion Matrix Values:")?;
        writeln!(f, "TP: {}", self.true_positive)?;
        writeln!(f, "FP: {}", self.false_positive)?;
        writeln!(f, "TN: {}", self.true_negative)?;
        writeln!(f, "FN: {}", self.false_negative)?;
        if self.undecided > 0 {
            writeln!(f, "Undecided: {}", self.undecided)?;
        }
        write!(f, "Accuracy: {}%", self.accuracy_percent())
    }
}

/// Classifies every held-out message and tallies the verdicts.
pub fn evaluate<S, H>(model: &TrainedModel, spam: &[S], ham: &[H]) -> ConfusionMatrix
where
    S: AsRef<str> + Sync,
    H: AsRef<str> + Sync,
{
    let spam = spam
        .par_iter()
        .map(|text| (model.classify(text.as_ref()), Label::Spam));
    let ham = ham
        .par_iter()
        .map(|text| (model.classify(text.as_ref()), Label::Ham));

    spam.chain(ham)
        .fold(ConfusionMatrix::default, |mut matrix, (probability, label)| {
            matrix.record(probability, label);
            matrix
        })
        .reduce(ConfusionMatrix::default, ConfusionMatrix::merge)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_each_cell() {
        let matrix: ConfusionMatrix = [
            (0.9, Label::Spam),
            (0.2, Label::Spam),
            (0.1, Label::Ham),
            (0.3, Label::Ham),
            (0.6, Label::Ham),
            (0.5, Label::Spam),
            (0.5, Label::Ham),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            matrix,
            ConfusionMatrix {
                true_positive: 1,
                false_positive: 1,
                true_negative: 2,
                false_negative: 1,
                undecided: 2,
            }
        );
        assert_eq!(matrix.decided(), 5);
    }

    #[test]
    fn merge_adds_every_cell() {
        let left: ConfusionMatrix = [(0.9, Label::Spam), (0.5, Label::Ham)].into_iter().collect();
        let right: ConfusionMatrix = [(0.1, Label::Ham), (0.7, Label::Ham)].into_iter().collect();

        assert_eq!(
            left.merge(right),
            ConfusionMatrix {
                true_positive: 1,
                false_positive: 1,
                true_negative: 1,
                false_negative: 0,
                undecided: 1,
            }
        );
    }

    #[test]
    fn accuracy_is_truncated() {
        let matrix = ConfusionMatrix {
            true_positive: 1,
            true_negative: 1,
            false_positive: 1,
            ..Default::default()
        };
        // 66.66..%
        assert_eq!(matrix.accuracy_percent(), 66);

        let matrix = ConfusionMatrix {
            true_positive: 199,
            false_negative: 1,
            ..Default::default()
        };
        assert_eq!(matrix.accuracy_percent(), 99);
    }

    #[test]
    fn empty_matrix_has_zero_accuracy() {
        assert_eq!(ConfusionMatrix::default().accuracy_percent(), 0);

        let undecided = ConfusionMatrix {
            undecided: 3,
            ..Default::default()
        };
        assert_eq!(undecided.accuracy_percent(), 0);
    }

    #[test]
    fn display_lists_counts_and_accuracy() {
        let matrix = ConfusionMatrix {
            true_positive: 3,
            true_negative: 1,
            ..Default::default()
        };

        assert_eq!(
            matrix.to_string(),
            "Confusion Matrix Values:\nTP: 3\nFP: 0\nTN: 1\nFN: 0\nAccuracy: 100%"
        );
    }

    #[test]
    fn evaluates_held_out_messages() {
        let model = TrainedModel::train(
            &["win money now", "free money offer"],
            &["meeting schedule now", "project update"],
        )
        .unwrap();

        let matrix = evaluate(&model, &["free money"], &["project meeting", "money offer"]);

        assert_eq!(matrix.true_positive, 1);
        assert_eq!(matrix.true_negative, 1);
        assert_eq!(matrix.false_positive, 1);
        assert_eq!(matrix.accuracy_percent(), 66);
    }
}
