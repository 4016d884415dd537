use std::collections::VecDeque;

/// Which of the two recorded time series to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Series {
    Energy,
    Number,
}

/// Summary statistics over a window of samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesSummary {
    pub count: usize,
    pub mean: f64,
    /// Population variance, `<x^2> - <x>^2`.
    pub variance: f64,
    pub min: f64,
    pub max: f64,
}

impl SeriesSummary {
    /// Returns `None` for an empty slice.
    pub fn of(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let count = samples.len();
        let mean = samples.iter().sum::<f64>() / count as f64;
        let mean_sq = samples.iter().map(|s| s * s).sum::<f64>() / count as f64;
        let (min, max) = samples
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &s| (lo.min(s), hi.max(s)));
        Some(Self {
            count,
            mean,
            variance: (mean_sq - mean * mean).max(0.0),
            min,
            max,
        })
    }
}

/// Energy and particle-number time series, one sample of each per frame.
///
/// The two series always have the same length. Unbounded by default; with a
/// capacity, the oldest pair is evicted once the capacity is reached.
#[derive(Debug, Clone, Default)]
pub struct StatisticsRecorder {
    energy: VecDeque<f64>,
    number: VecDeque<f64>,
    capacity: Option<usize>,
}

impl StatisticsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: Option<usize>) -> Self {
        Self {
            capacity: capacity.map(|c| c.max(1)),
            ..Self::default()
        }
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Appends one energy and one number sample.
    pub fn record(&mut self, energy_total: f64, number_total: f64) {
        if let Some(cap) = self.capacity {
            while self.energy.len() >= cap {
                self.energy.pop_front();
                self.number.pop_front();
            }
        }
        self.energy.push_back(energy_total);
        self.number.push_back(number_total);
    }

    pub fn len(&self) -> usize {
        self.energy.len()
    }

    pub fn is_empty(&self) -> bool {
        self.energy.is_empty()
    }

    pub fn clear(&mut self) {
        self.energy.clear();
        self.number.clear();
    }

    fn series(&self, series: Series) -> &VecDeque<f64> {
        match series {
            Series::Energy => &self.energy,
            Series::Number => &self.number,
        }
    }

    /// The last `k` samples of `series` in insertion order, or all of them if fewer exist.
    /// Empty when nothing has been recorded.
    pub fn series_tail(&self, series: Series, k: usize) -> Vec<f64> {
        let data = self.series(series);
        let skip = data.len().saturating_sub(k);
        data.iter().skip(skip).copied().collect()
    }

    pub fn energy_series(&self) -> Vec<f64> {
        self.energy.iter().copied().collect()
    }

    pub fn number_series(&self) -> Vec<f64> {
        self.number.iter().copied().collect()
    }

    /// Summary over the last `k` samples of `series`.
    pub fn summary(&self, series: Series, k: usize) -> Option<SeriesSummary> {
        SeriesSummary::of(&self.series_tail(series, k))
    }
}
