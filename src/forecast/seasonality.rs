//! Periodic components fit on trend residuals.

use chrono::{DateTime, Datelike, Utc};

/// How a seasonal component participates in the fit.
///
/// `Auto` enables the component only when the training series spans at
/// least two full cycles; `Enabled` demands it (and the fit fails without
/// enough span); `Disabled` leaves it out entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeasonalityMode {
    #[default]
    Auto,
    Enabled,
    Disabled,
}

/// The calendar period a component repeats over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeasonalPeriod {
    /// Seven bins keyed by weekday.
    Weekly,
    /// Twelve bins keyed by month.
    Yearly,
}

impl SeasonalPeriod {
    /// Span needed for two full cycles, the minimum for a meaningful fit.
    pub fn min_span_days(&self) -> f64 {
        match self {
            SeasonalPeriod::Weekly => 14.0,
            SeasonalPeriod::Yearly => 730.0,
        }
    }

    fn bin_count(&self) -> usize {
        match self {
            SeasonalPeriod::Weekly => 7,
            SeasonalPeriod::Yearly => 12,
        }
    }

    fn bin_of(&self, timestamp: DateTime<Utc>) -> usize {
        match self {
            SeasonalPeriod::Weekly => timestamp.weekday().num_days_from_monday() as usize,
            SeasonalPeriod::Yearly => timestamp.month0() as usize,
        }
    }
}

/// Additive seasonal offsets: the mean residual per period position,
/// centered so the component carries no level of its own.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonalComponent {
    period: SeasonalPeriod,
    offsets: Vec<f64>,
}

impl SeasonalComponent {
    pub fn fit(period: SeasonalPeriod, timestamps: &[DateTime<Utc>], residuals: &[f64]) -> Self {
        debug_assert_eq!(timestamps.len(), residuals.len());
        let bins = period.bin_count();
        let mut sums = vec![0.0; bins];
        let mut counts = vec![0usize; bins];

        for (ts, r) in timestamps.iter().zip(residuals.iter()) {
            let bin = period.bin_of(*ts);
            sums[bin] += r;
            counts[bin] += 1;
        }

        let mut offsets: Vec<f64> = sums
            .iter()
            .zip(counts.iter())
            .map(|(s, c)| if *c > 0 { s / *c as f64 } else { 0.0 })
            .collect();

        // Center on zero so the level stays with the trend.
        let mean = offsets.iter().sum::<f64>() / bins as f64;
        for o in &mut offsets {
            *o -= mean;
        }

        Self { period, offsets }
    }

    pub fn period(&self) -> SeasonalPeriod {
        self.period
    }

    pub fn value_at(&self, timestamp: DateTime<Utc>) -> f64 {
        self.offsets[self.period.bin_of(timestamp)]
    }
}
