//! Vector inspection helpers used by `smartdoc-ingest`.

use ndarray::{Array1, Array2, Axis};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum AnalysisError {
    #[error("Need at least {needed} vectors, got {actual}")]
    NotEnoughVectors { needed: usize, actual: usize },

    #[error("Vector {index} has {actual} dimensions, expected {expected}")]
    RaggedInput {
        index: usize,
        expected: usize,
        actual: usize,
    },
}

/// Cosine similarity; 0.0 for mismatched lengths or zero vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let magnitude_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let magnitude_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        0.0
    } else {
        (dot_product / (magnitude_a * magnitude_b)).clamp(-1.0, 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VectorStats {
    pub dimensions: usize,
    pub min: f32,
    pub max: f32,
    pub mean: f32,
}

impl VectorStats {
    pub fn of(vector: &[f32]) -> Self {
        if vector.is_empty() {
            return Self {
                dimensions: 0,
                min: 0.0,
                max: 0.0,
                mean: 0.0,
            };
        }
        let min = vector.iter().copied().fold(f32::INFINITY, f32::min);
        let max = vector.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let mean = vector.iter().sum::<f32>() / vector.len() as f32;
        Self {
            dimensions: vector.len(),
            min,
            max,
            mean,
        }
    }
}

/// Result of projecting vectors onto their first two principal components.
#[derive(Debug, Clone)]
pub struct Projection {
    /// One `[pc1, pc2]` pair per input vector, in input order.
    pub points: Vec<[f64; 2]>,
    pub explained_variance_ratio: [f64; 2],
}

const POWER_ITERATIONS: usize = 500;
const TOLERANCE: f64 = 1e-10;

/// PCA to two dimensions via power iteration with deflation on the covariance matrix.
pub fn project_2d(vectors: &[Vec<f32>]) -> Result<Projection, AnalysisError> {
    if vectors.len() < 2 {
        return Err(AnalysisError::NotEnoughVectors {
            needed: 2,
            actual: vectors.len(),
        });
    }
    let dims = vectors[0].len();
    let mut data = Array2::<f64>::zeros((vectors.len(), dims));
    for (i, v) in vectors.iter().enumerate() {
        if v.len() != dims {
            return Err(AnalysisError::RaggedInput {
                index: i,
                expected: dims,
                actual: v.len(),
            });
        }
        for (j, x) in v.iter().enumerate() {
            data[[i, j]] = f64::from(*x);
        }
    }

    let mean = data.mean_axis(Axis(0)).unwrap_or_else(|| Array1::zeros(dims));
    let centered = &data - &mean;
    let mut covariance = centered.t().dot(&centered) / (vectors.len() as f64 - 1.0);
    let total_variance: f64 = covariance.diag().sum();

    let start = largest_row(&centered);
    let (lambda1, pc1) = power_iteration(&covariance, &start);
    covariance = covariance - lambda1 * outer(&pc1);
    let (lambda2, pc2) = power_iteration(&covariance, &start);

    let scores1 = centered.dot(&pc1);
    let scores2 = centered.dot(&pc2);
    let points = scores1
        .iter()
        .zip(scores2.iter())
        .map(|(a, b)| [*a, *b])
        .collect();

    let ratio = |lambda: f64| {
        if total_variance > 0.0 {
            (lambda / total_variance).max(0.0)
        } else {
            0.0
        }
    };

    Ok(Projection {
        points,
        explained_variance_ratio: [ratio(lambda1), ratio(lambda2)],
    })
}

fn largest_row(m: &Array2<f64>) -> Array1<f64> {
    m.rows()
        .into_iter()
        .max_by(|a, b| a.dot(a).total_cmp(&b.dot(b)))
        .map(|r| r.to_owned())
        .unwrap_or_else(|| Array1::zeros(m.ncols()))
}

fn outer(v: &Array1<f64>) -> Array2<f64> {
    let col = v.view().insert_axis(Axis(1));
    let row = v.view().insert_axis(Axis(0));
    col.dot(&row)
}

/// Dominant eigenpair of a symmetric positive semi-definite matrix.
fn power_iteration(m: &Array2<f64>, start: &Array1<f64>) -> (f64, Array1<f64>) {
    let n = m.nrows();
    let found = unit(m.dot(start)).or_else(|| {
        // start lies in the null space; try basis vectors
        (0..n).find_map(|i| {
            let mut e = Array1::<f64>::zeros(n);
            e[i] = 1.0;
            unit(m.dot(&e))
        })
    });

    let Some(mut current) = found else {
        let mut e = Array1::zeros(n);
        if n > 0 {
            e[0] = 1.0;
        }
        return (0.0, e);
    };

    for _ in 0..POWER_ITERATIONS {
        let Some(next) = unit(m.dot(&current)) else {
            break;
        };
        let delta = (&next - &current).mapv(f64::abs).sum();
        current = next;
        if delta < TOLERANCE {
            break;
        }
    }

    let lambda = current.dot(&m.dot(&current));
    (lambda, current)
}

fn unit(v: Array1<f64>) -> Option<Array1<f64>> {
    let norm = v.dot(&v).sqrt();
    if norm > TOLERANCE {
        Some(v / norm)
    } else {
        None
    }
}
