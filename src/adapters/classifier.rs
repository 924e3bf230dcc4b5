//! Logistic regression boundary classifier.
//!
//! Features are standardised per column, then weights are fit by full-batch
//! gradient descent on the L2-regularised log loss.

use crate::domain::error::{EnrichmentError, EnrichmentResult};
use crate::domain::models::{FeatureRow, TrainingConfig, FEATURE_COUNT};
use crate::domain::ports::{BoundaryModel, Classifier};

/// Columns with a spread below this are left unscaled.
const MIN_SCALE: f64 = 1e-12;

#[derive(Debug, Clone)]
pub struct LogisticRegression {
    learning_rate: f64,
    epochs: usize,
    l2: f64,
}

impl LogisticRegression {
    pub const fn new(learning_rate: f64, epochs: usize, l2: f64) -> Self {
        Self {
            learning_rate,
            epochs,
            l2,
        }
    }

    pub const fn from_config(config: &TrainingConfig) -> Self {
        Self::new(config.learning_rate, config.epochs, config.l2)
    }
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::from_config(&TrainingConfig::default())
    }
}

/// Fitted model: standardisation parameters plus weights.
#[derive(Debug, Clone)]
pub struct LogisticModel {
    means: FeatureRow,
    scales: FeatureRow,
    weights: FeatureRow,
    bias: f64,
}

impl LogisticModel {
    fn standardise(&self, row: &FeatureRow) -> FeatureRow {
        let mut z = [0.0; FEATURE_COUNT];
        for (i, slot) in z.iter_mut().enumerate() {
            *slot = (row[i] - self.means[i]) / self.scales[i];
        }
        z
    }

    fn logit(&self, standardised: &FeatureRow) -> f64 {
        dot(&self.weights, standardised) + self.bias
    }

    pub const fn weights(&self) -> &FeatureRow {
        &self.weights
    }
}

impl BoundaryModel for LogisticModel {
    fn predict_probability(&self, features: &FeatureRow) -> f64 {
        sigmoid(self.logit(&self.standardise(features)))
    }
}

impl Classifier for LogisticRegression {
    fn fit(&self, features: &[FeatureRow], labels: &[bool]) -> EnrichmentResult<Box<dyn BoundaryModel>> {
        if features.len() != labels.len() {
            return Err(EnrichmentError::Classifier(format!(
                "{} feature rows but {} labels",
                features.len(),
                labels.len()
            )));
        }
        if features.iter().flatten().any(|v| !v.is_finite()) {
            return Err(EnrichmentError::Classifier(
                "training features must be finite".to_string(),
            ));
        }
        let positives = labels.iter().filter(|&&l| l).count();
        let found = usize::from(positives > 0) + usize::from(positives < labels.len());
        if found < 2 {
            return Err(EnrichmentError::InsufficientClasses { found });
        }

        let n = features.len() as f64;
        let (means, scales) = column_moments(features, n);

        let mut model = LogisticModel {
            means,
            scales,
            weights: [0.0; FEATURE_COUNT],
            bias: 0.0,
        };
        let rows: Vec<FeatureRow> = features.iter().map(|r| model.standardise(r)).collect();

        for _ in 0..self.epochs {
            let mut grad_w = [0.0; FEATURE_COUNT];
            let mut grad_b = 0.0;
            for (row, &label) in rows.iter().zip(labels) {
                let error = sigmoid(model.logit(row)) - f64::from(u8::from(label));
                for (g, x) in grad_w.iter_mut().zip(row) {
                    *g += error * x;
                }
                grad_b += error;
            }
            for (w, g) in model.weights.iter_mut().zip(grad_w) {
                *w -= self.learning_rate * (g / n + self.l2 * *w);
            }
            model.bias -= self.learning_rate * grad_b / n;
        }

        Ok(Box::new(model))
    }
}

fn column_moments(features: &[FeatureRow], n: f64) -> (FeatureRow, FeatureRow) {
    let mut means = [0.0; FEATURE_COUNT];
    for row in features {
        for (m, x) in means.iter_mut().zip(row) {
            *m += x / n;
        }
    }
    let mut scales = [0.0; FEATURE_COUNT];
    for row in features {
        for ((s, x), m) in scales.iter_mut().zip(row).zip(&means) {
            *s += (x - m).powi(2) / n;
        }
    }
    for s in &mut scales {
        *s = if s.sqrt() > MIN_SCALE { s.sqrt() } else { 1.0 };
    }
    (means, scales)
}

fn dot(a: &FeatureRow, b: &FeatureRow) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Numerically stable logistic function.
fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}
