//! Offline evaluation figures for the classifier.
//!
//! The confusion matrix is a fixed snapshot over the default taxonomy; every
//! derived figure is computed from it on request.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::taxonomy::DEFAULT_CATEGORIES;

const N: usize = DEFAULT_CATEGORIES.len();

/// Rows are true labels, columns predicted labels, both in
/// [`DEFAULT_CATEGORIES`] order.
const CONFUSION_MATRIX: [[u32; N]; N] = [
    [112, 3, 0, 5, 0, 0, 0, 2, 3],
    [2, 138, 0, 3, 0, 1, 0, 0, 6],
    [0, 0, 141, 0, 0, 0, 2, 0, 2],
    [4, 2, 0, 126, 0, 3, 0, 0, 5],
    [0, 0, 0, 0, 128, 0, 0, 1, 6],
    [0, 1, 0, 2, 0, 139, 1, 0, 2],
    [0, 0, 3, 0, 0, 2, 117, 0, 8],
    [1, 0, 0, 0, 2, 0, 0, 118, 9],
    [5, 4, 1, 6, 3, 2, 3, 2, 94],
];

const LATENCY_MS: u32 = 30;
const THROUGHPUT_PER_SECOND: u32 = 33;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassMetrics {
    pub category: &'static str,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfusionMatrix {
    pub labels: Vec<&'static str>,
    pub matrix: Vec<Vec<u32>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EvaluationMetrics {
    pub macro_f1: f64,
    pub macro_precision: f64,
    pub macro_recall: f64,
    pub accuracy: f64,
    pub samples_processed: u32,
    pub feedback_count: i64,
    pub per_class_f1: BTreeMap<&'static str, f64>,
    pub per_class_metrics: Vec<ClassMetrics>,
    pub confusion_matrix: ConfusionMatrix,
    pub latency_ms: u32,
    pub throughput_per_second: u32,
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// `numerator / denominator`, or 0 when the ratio is undefined.
fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

fn class_metrics(matrix: &[[u32; N]; N], idx: usize) -> ClassMetrics {
    let true_positives = matrix[idx][idx] as f64;
    let support: u32 = matrix[idx].iter().sum();
    let predicted: u32 = matrix.iter().map(|row| row[idx]).sum();

    let precision = ratio(true_positives, predicted as f64);
    let recall = ratio(true_positives, support as f64);
    let f1 = ratio(2.0 * precision * recall, precision + recall);

    ClassMetrics {
        category: DEFAULT_CATEGORIES[idx],
        precision: round3(precision),
        recall: round3(recall),
        f1: round3(f1),
        support,
    }
}

/// Evaluation report; `feedback_count` is the number of stored feedback rows.
pub fn evaluation_metrics(feedback_count: i64) -> EvaluationMetrics {
    let matrix = &CONFUSION_MATRIX;
    let per_class: Vec<ClassMetrics> = (0..N).map(|idx| class_metrics(matrix, idx)).collect();

    let mean = |field: fn(&ClassMetrics) -> f64| {
        round3(per_class.iter().map(field).sum::<f64>() / N as f64)
    };

    let correct: u32 = (0..N).map(|i| matrix[i][i]).sum();
    let total: u32 = matrix.iter().flatten().sum();

    EvaluationMetrics {
        macro_f1: mean(|m| m.f1),
        macro_precision: mean(|m| m.precision),
        macro_recall: mean(|m| m.recall),
        accuracy: round3(ratio(correct as f64, total as f64)),
        samples_processed: total,
        feedback_count,
        per_class_f1: per_class.iter().map(|m| (m.category, m.f1)).collect(),
        per_class_metrics: per_class,
        confusion_matrix: ConfusionMatrix {
            labels: DEFAULT_CATEGORIES.to_vec(),
            matrix: matrix.iter().map(|row| row.to_vec()).collect(),
        },
        latency_ms: LATENCY_MS,
        throughput_per_second: THROUGHPUT_PER_SECOND,
    }
}
