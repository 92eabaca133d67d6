//! Binary logistic regression solved by Newton-Raphson (IRLS)
//!
//! Features are standardized internally; the penalty `0.5 / C * ||w||^2`
//! applies to the weights but not to the intercept, so `C` plays the same role
//! as the inverse regularization strength of common logistic regression APIs.

use faer::prelude::*;
use faer::{Col, Mat, Side};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::error::PipelineError;

/// Smallest step-halving factor tried before accepting a Newton step
const MIN_STEP_SCALE: f64 = 1e-6;

/// Scale used for columns with (near) zero variance
const MIN_SCALE: f64 = 1e-12;

/// Solver settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogisticConfig {
    /// Inverse L2 regularization strength (must be positive)
    pub c: f64,
    /// Maximum Newton iterations
    pub max_iter: usize,
    /// Stop when the largest coefficient update falls below this value
    pub tolerance: f64,
}

impl Default for LogisticConfig {
    fn default() -> Self {
        Self {
            c: 1.0,
            max_iter: 100,
            tolerance: 1e-6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct LogisticState {
    /// Intercept in standardized feature space
    intercept: f64,
    /// Weights in standardized feature space
    weights: Vec<f64>,
    means: Vec<f64>,
    scales: Vec<f64>,
    n_iter: usize,
    converged: bool,
}

/// Terminal stage of the pipeline: learns a linear decision boundary over the
/// numeric feature matrix.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogisticRegression {
    config: LogisticConfig,
    state: Option<LogisticState>,
}

impl LogisticRegression {
    pub fn new(config: LogisticConfig) -> Self {
        Self {
            config,
            state: None,
        }
    }

    pub fn name(&self) -> &'static str {
        "classifier"
    }

    pub fn config(&self) -> &LogisticConfig {
        &self.config
    }

    pub fn is_fitted(&self) -> bool {
        self.state.is_some()
    }

    /// Newton iterations used by the last fit
    pub fn n_iter(&self) -> Option<usize> {
        self.state.as_ref().map(|s| s.n_iter)
    }

    pub fn converged(&self) -> Option<bool> {
        self.state.as_ref().map(|s| s.converged)
    }

    /// Intercept and weights expressed in the original feature units
    pub fn coefficients(&self) -> Option<(f64, Vec<f64>)> {
        let state = self.state.as_ref()?;
        let weights: Vec<f64> = state
            .weights
            .iter()
            .zip(&state.scales)
            .map(|(w, s)| w / s)
            .collect();
        let shift: f64 = weights.iter().zip(&state.means).map(|(w, m)| w * m).sum();
        Some((state.intercept - shift, weights))
    }

    /// Fit on a feature matrix (rows = samples) and 0/1 labels
    pub fn fit(&mut self, x: &Mat<f64>, y: &[usize]) -> Result<(), PipelineError> {
        let LogisticConfig {
            c,
            max_iter,
            tolerance,
        } = self.config;
        if !(c > 0.0 && c.is_finite()) {
            return Err(PipelineError::InvalidParameter(format!(
                "C must be positive and finite, got {}",
                c
            )));
        }

        let (n, d) = (x.nrows(), x.ncols());
        if n == 0 {
            return Err(PipelineError::EmptyData(
                "cannot fit a classifier on zero rows".to_string(),
            ));
        }
        if y.len() != n {
            return Err(PipelineError::LengthMismatch {
                rows: n,
                labels: y.len(),
            });
        }
        if let Some(&label) = y.iter().find(|&&l| l > 1) {
            return Err(PipelineError::InvalidLabel(label));
        }
        let positives = y.iter().filter(|&&l| l == 1).count();
        if positives == 0 || positives == n {
            return Err(PipelineError::SingleClass);
        }

        let (means, scales) = column_moments(x);
        let design = design_matrix(x, &means, &scales);
        let targets: Vec<f64> = y.iter().map(|&l| l as f64).collect();
        let lambda = 1.0 / c;
        let p = d + 1;

        let mut beta = vec![0.0; p];
        let mut objective = penalized_log_likelihood(&design, &targets, &beta, lambda);
        let mut n_iter = 0;
        let mut converged = false;

        for iter in 1..=max_iter {
            n_iter = iter;
            let probs: Vec<f64> = linear_predictor(&design, &beta)
                .into_iter()
                .map(sigmoid)
                .collect();

            let residual = Col::<f64>::from_fn(n, |i| targets[i] - probs[i]);
            let mut gradient = design.transpose() * &residual;
            let weighted =
                Mat::<f64>::from_fn(n, p, |i, j| design[(i, j)] * probs[i] * (1.0 - probs[i]));
            let mut hessian = design.transpose() * &weighted;
            for j in 1..p {
                gradient[j] -= lambda * beta[j];
                hessian[(j, j)] += lambda;
            }

            let step = newton_step(&hessian, &gradient)?;

            // Step halving keeps the penalized likelihood from decreasing
            let mut scale = 1.0;
            let (candidate, candidate_objective) = loop {
                let candidate: Vec<f64> = beta
                    .iter()
                    .zip(&step)
                    .map(|(b, s)| b + scale * s)
                    .collect();
                let value = penalized_log_likelihood(&design, &targets, &candidate, lambda);
                if value >= objective || scale <= MIN_STEP_SCALE {
                    break (candidate, value);
                }
                scale *= 0.5;
            };

            let change = step
                .iter()
                .map(|s| (s * scale).abs())
                .fold(0.0_f64, f64::max);
            beta = candidate;
            objective = candidate_objective;
            debug!(iter, change, objective, "newton step");

            if change < tolerance {
                converged = true;
                break;
            }
        }

        if !converged {
            warn!(max_iter, "logistic regression did not converge");
        }

        self.state = Some(LogisticState {
            intercept: beta[0],
            weights: beta[1..].to_vec(),
            means,
            scales,
            n_iter,
            converged,
        });
        Ok(())
    }

    /// Linear score per row; positive scores predict label 1
    pub fn decision_function(&self, x: &Mat<f64>) -> Result<Vec<f64>, PipelineError> {
        let state = self.state.as_ref().ok_or(PipelineError::NotFitted {
            stage: self.name(),
        })?;
        if x.ncols() != state.weights.len() {
            return Err(PipelineError::FeatureMismatch {
                expected: state.weights.len(),
                got: x.ncols(),
            });
        }

        let design = design_matrix(x, &state.means, &state.scales);
        let beta: Vec<f64> = std::iter::once(state.intercept)
            .chain(state.weights.iter().copied())
            .collect();
        Ok(linear_predictor(&design, &beta))
    }

    /// Probability of label 1 per row
    pub fn predict_proba(&self, x: &Mat<f64>) -> Result<Vec<f64>, PipelineError> {
        Ok(self
            .decision_function(x)?
            .into_iter()
            .map(sigmoid)
            .collect())
    }

    pub fn predict(&self, x: &Mat<f64>) -> Result<Vec<usize>, PipelineError> {
        Ok(self
            .decision_function(x)?
            .into_iter()
            .map(|score| usize::from(score > 0.0))
            .collect())
    }
}

pub fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// `ln(1 + e^x)` without overflow
fn softplus(x: f64) -> f64 {
    x.max(0.0) + (-x.abs()).exp().ln_1p()
}

/// Column means and population standard deviations
fn column_moments(x: &Mat<f64>) -> (Vec<f64>, Vec<f64>) {
    let n = x.nrows() as f64;
    let mut means = Vec::with_capacity(x.ncols());
    let mut scales = Vec::with_capacity(x.ncols());
    for j in 0..x.ncols() {
        let mean = (0..x.nrows()).map(|i| x[(i, j)]).sum::<f64>() / n;
        let var = (0..x.nrows())
            .map(|i| {
                let dev = x[(i, j)] - mean;
                dev * dev
            })
            .sum::<f64>()
            / n;
        let std = var.sqrt();
        means.push(mean);
        scales.push(if std > MIN_SCALE { std } else { 1.0 });
    }
    (means, scales)
}

/// Standardized features with a leading column of ones for the intercept
fn design_matrix(x: &Mat<f64>, means: &[f64], scales: &[f64]) -> Mat<f64> {
    let mut design = Mat::<f64>::zeros(x.nrows(), x.ncols() + 1);
    for i in 0..x.nrows() {
        design[(i, 0)] = 1.0;
        for j in 0..x.ncols() {
            design[(i, j + 1)] = (x[(i, j)] - means[j]) / scales[j];
        }
    }
    design
}

fn linear_predictor(design: &Mat<f64>, beta: &[f64]) -> Vec<f64> {
    let beta = Col::<f64>::from_fn(beta.len(), |j| beta[j]);
    let eta = design * &beta;
    (0..eta.nrows()).map(|i| eta[i]).collect()
}

fn penalized_log_likelihood(design: &Mat<f64>, targets: &[f64], beta: &[f64], lambda: f64) -> f64 {
    let likelihood: f64 = linear_predictor(design, beta)
        .iter()
        .zip(targets)
        .map(|(&eta, &y)| y * eta - softplus(eta))
        .sum();
    let penalty: f64 = beta[1..].iter().map(|b| b * b).sum::<f64>() * 0.5 * lambda;
    likelihood - penalty
}

/// Newton direction `hessian⁻¹ * gradient` via a Cholesky factorization
fn newton_step(hessian: &Mat<f64>, gradient: &Col<f64>) -> Result<Vec<f64>, PipelineError> {
    let llt = hessian.cholesky(Side::Lower).map_err(|_| {
        PipelineError::Numerical("Hessian is not positive definite".to_string())
    })?;
    let step = llt.solve(gradient.as_ref());
    let step: Vec<f64> = (0..step.nrows()).map(|j| step[j]).collect();
    if step.iter().all(|v| v.is_finite()) {
        Ok(step)
    } else {
        Err(PipelineError::Numerical(
            "Newton step is not finite".to_string(),
        ))
    }
}
