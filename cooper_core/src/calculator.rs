//! Evaluation metrics calculator.
//!
//! A pure pipeline from one measurement and one subject to a
//! [`DerivedMetrics`] snapshot:
//! - Age on the evaluation date
//! - VO2 max from the Cooper 12-minute distance
//! - Classification by gender and age bracket
//! - Heart-rate training zones from age-predicted max HR
//! - Calorie and oxygen estimates
//!
//! The evaluation date is always passed in, so results depend only on the
//! arguments.

use crate::classification::classify;
use crate::measurement::{Measurement, RawMeasurement};
use crate::{DerivedMetrics, Subject, TrainingIntensity, TrainingZone, ZoneKind};
use chrono::{Datelike, NaiveDate};

/// Cooper formula intercept (meters)
const COOPER_OFFSET_M: f64 = 504.9;
/// Cooper formula divisor
const COOPER_DIVISOR: f64 = 44.73;
/// MET value for moderate running
const RUNNING_MET: f64 = 8.0;
/// kcal per kg per minute per MET
const KCAL_PER_KG_MIN_MET: f64 = 0.175;

/// Whole years from `birth_date` to `on`.
///
/// A birthday later in the year than `on` has not happened yet. A birth date
/// after `on` yields 0.
pub fn age_on(birth_date: NaiveDate, on: NaiveDate) -> u32 {
    let mut age = on.year() - birth_date.year();
    if (on.month(), on.day()) < (birth_date.month(), birth_date.day()) {
        age -= 1;
    }
    age.max(0) as u32
}

/// VO2 max in ml/kg/min from the distance covered in 12 minutes
pub fn vo2_max(distance_m: f64) -> f64 {
    (distance_m - COOPER_OFFSET_M) / COOPER_DIVISOR
}

/// Age-predicted maximum heart rate
pub fn max_heart_rate(age: u32) -> u32 {
    220u32.saturating_sub(age)
}

/// Five zones, each bound rounded independently
pub fn training_intensity(age: u32) -> TrainingIntensity {
    let max_hr = max_heart_rate(age);
    let zones = ZoneKind::ALL.map(|kind| {
        let (lo, hi) = kind.fractions();
        TrainingZone {
            kind,
            min_bpm: (max_hr as f64 * lo).round() as u32,
            max_bpm: (max_hr as f64 * hi).round() as u32,
        }
    });

    TrainingIntensity {
        max_heart_rate: max_hr,
        zones,
    }
}

/// Calories for a moderate run of `duration_s` seconds.
///
/// Heart rate and ambient conditions are not part of this estimate.
pub fn calories_burned(duration_s: f64, weight_kg: f64) -> i64 {
    ((duration_s / 60.0) * weight_kg * KCAL_PER_KG_MIN_MET * RUNNING_MET).round() as i64
}

/// Whole-body oxygen consumption in ml/min
pub fn oxygen_consumption(vo2_max: f64, weight_kg: f64) -> i64 {
    (vo2_max * weight_kg).round() as i64
}

/// Metrics for an already validated measurement
pub fn metrics_for(measurement: &Measurement, subject: &Subject, on: NaiveDate) -> DerivedMetrics {
    derive(
        measurement.distance,
        measurement.duration,
        measurement.weight,
        subject,
        on,
    )
}

/// Metrics for raw form input.
///
/// Returns `None` when distance, duration, heart rate or weight is missing
/// or invalid. Optional fields never block the calculation.
pub fn compute_metrics(
    raw: &RawMeasurement,
    subject: &Subject,
    on: NaiveDate,
) -> Option<DerivedMetrics> {
    let (distance, duration, _heart_rate, weight) = raw.primary()?;
    Some(derive(distance, duration, weight, subject, on))
}

fn derive(
    distance: f64,
    duration: f64,
    weight: f64,
    subject: &Subject,
    on: NaiveDate,
) -> DerivedMetrics {
    let age = age_on(subject.birth_date, on);
    let vo2 = vo2_max(distance);
    let classification = classify(vo2, age, subject.gender);

    tracing::debug!(
        "Computed VO2 max {:.2} ({:?}) for age {} {:?}",
        vo2,
        classification,
        age,
        subject.gender
    );

    DerivedMetrics {
        age,
        vo2_max: vo2,
        classification,
        training_intensity: training_intensity(age),
        calories_burned: calories_burned(duration, weight),
        oxygen_consumption: oxygen_consumption(vo2, weight),
    }
}
