use tracing::debug;

use shared_models::error::CoreError;

use crate::models::{AggregatedHealthMetrics, HealthRecord, HealthTrends, TrendPoint};

/// Arithmetic means of weight and height over `records`.
///
/// An empty slice is an error rather than a zeroed result. A record missing
/// weight or height contributes 0 to that sum but still counts.
pub fn aggregate(records: &[HealthRecord]) -> Result<AggregatedHealthMetrics, CoreError> {
    if records.is_empty() {
        return Err(CoreError::operation("No health data to aggregate."));
    }

    let (total_weight, total_height) = records.iter().fold((0.0, 0.0), |(w, h), record| {
        (w + record.weight.unwrap_or(0.0), h + record.height.unwrap_or(0.0))
    });
    let count = records.len();

    debug!("Aggregated {} health records", count);

    Ok(AggregatedHealthMetrics {
        average_weight: total_weight / count as f64,
        average_height: total_height / count as f64,
        record_count: count,
    })
}

/// Chronological weight and height series with first-to-last change.
/// Records without a value are left out of that series.
pub fn trends(records: &[HealthRecord]) -> HealthTrends {
    let mut ordered: Vec<&HealthRecord> = records.iter().collect();
    ordered.sort_by_key(|record| record.created_at);

    let series = |value: fn(&HealthRecord) -> Option<f64>| -> Vec<TrendPoint> {
        ordered
            .iter()
            .filter_map(|record| {
                value(record).map(|v| TrendPoint { date: record.created_at, value: v })
            })
            .collect()
    };

    let weight = series(|r| r.weight);
    let height = series(|r| r.height);

    HealthTrends {
        weight_change: change(&weight),
        height_change: change(&height),
        weight,
        height,
        record_count: records.len(),
    }
}

fn change(points: &[TrendPoint]) -> Option<f64> {
    match (points.first(), points.last()) {
        (Some(first), Some(last)) if points.len() > 1 => Some(last.value - first.value),
        _ => None,
    }
}
