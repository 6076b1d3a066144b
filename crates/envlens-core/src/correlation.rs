use serde::Serialize;

use crate::enrich::EnrichedReading;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationCell {
    pub var_a: String,
    pub var_b: String,
    pub coefficient: f64,
}

/// Pearson correlation coefficient of paired samples.
///
/// NaN for an empty sample or when either side has zero variance.
pub fn pearson(pairs: &[(f64, f64)]) -> f64 {
    let Some(&(x0, y0)) = pairs.first() else {
        return f64::NAN;
    };
    // exact comparison: a constant like 0.1 leaves a nonzero float variance
    if pairs.iter().all(|&(x, _)| x == x0) || pairs.iter().all(|&(_, y)| y == y0) {
        return f64::NAN;
    }
    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denominator = (var_x * var_y).sqrt();
    if denominator == 0.0 || !denominator.is_finite() {
        return f64::NAN;
    }
    cov / denominator
}

/// Coefficient between two variables over records where both are numeric.
pub fn correlation<'a, I>(records: I, var_a: &str, var_b: &str) -> f64
where
    I: IntoIterator<Item = &'a EnrichedReading>,
{
    let pairs: Vec<(f64, f64)> = records
        .into_iter()
        .filter_map(|record| Some((record.value(var_a)?, record.value(var_b)?)))
        .collect();
    pearson(&pairs)
}

/// Full n x n matrix over `variables`, row-major. The diagonal is 1 unless the
/// variable is constant or absent, and cell (A, B) always equals cell (B, A).
pub fn correlation_matrix<'a, I>(records: I, variables: &[String]) -> Vec<CorrelationCell>
where
    I: IntoIterator<Item = &'a EnrichedReading>,
{
    let records: Vec<&EnrichedReading> = records.into_iter().collect();
    let n = variables.len();

    let mut coefficients = vec![f64::NAN; n * n];
    for i in 0..n {
        for j in i..n {
            let mut value = correlation(records.iter().copied(), &variables[i], &variables[j]);
            if i == j && value.is_finite() {
                value = 1.0;
            }
            coefficients[i * n + j] = value;
            coefficients[j * n + i] = value;
        }
    }

    let mut cells = Vec::with_capacity(n * n);
    for (i, var_a) in variables.iter().enumerate() {
        for (j, var_b) in variables.iter().enumerate() {
            cells.push(CorrelationCell {
                var_a: var_a.clone(),
                var_b: var_b.clone(),
                coefficient: coefficients[i * n + j],
            });
        }
    }
    cells
}
