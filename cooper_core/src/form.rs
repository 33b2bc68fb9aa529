//! Evaluation form state.
//!
//! Holds the raw input for one student's evaluation and keeps the metrics
//! snapshot in step with it. Every edit recomputes the snapshot from
//! scratch; an edit that leaves a required field invalid clears it.

use crate::calculator::{compute_metrics, metrics_for};
use crate::config::EvaluationConfig;
use crate::measurement::{Field, RawMeasurement, ValidationErrors};
use crate::sink::TestSink;
use crate::{DerivedMetrics, Result, Student, TestRecord, TestType};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

/// Form for a performance evaluation of one student
#[derive(Clone, Debug)]
pub struct EvaluationForm {
    student: Student,
    evaluation_date: NaiveDate,
    raw: RawMeasurement,
    errors: ValidationErrors,
    metrics: Option<DerivedMetrics>,
}

impl EvaluationForm {
    /// New form seeded with configured defaults
    pub fn new(student: Student, evaluation_date: NaiveDate, defaults: &EvaluationConfig) -> Self {
        let raw = RawMeasurement {
            duration: format_default(defaults.default_duration_seconds),
            temperature: format_default(defaults.default_temperature),
            humidity: format_default(defaults.default_humidity),
            ..Default::default()
        };

        let mut form = Self {
            student,
            evaluation_date,
            raw,
            errors: ValidationErrors::default(),
            metrics: None,
        };
        form.recompute();
        form
    }

    /// Copy weight, heart rate and observations from the previous test
    pub fn prefill_from(&mut self, previous: &TestRecord) {
        tracing::debug!("Prefilling form from test {}", previous.id);
        self.raw.weight = format_default(previous.weight);
        self.raw.heart_rate = previous.heart_rate.to_string();
        self.raw.observations = previous.observations.clone();
        self.recompute();
    }

    /// Update one field, clear its error and recompute metrics
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.raw.set(field, value);
        self.errors.remove(field);
        self.recompute();
    }

    pub fn get(&self, field: Field) -> &str {
        self.raw.get(field)
    }

    pub fn student(&self) -> &Student {
        &self.student
    }

    pub fn evaluation_date(&self) -> NaiveDate {
        self.evaluation_date
    }

    /// Current metrics snapshot, if the required fields are valid
    pub fn metrics(&self) -> Option<&DerivedMetrics> {
        self.metrics.as_ref()
    }

    /// Errors from the last `validate` call, minus fields edited since
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Validate every field and store the errors
    pub fn validate(&mut self) -> bool {
        self.errors = match self.raw.validate() {
            Ok(_) => ValidationErrors::default(),
            Err(errors) => errors,
        };
        self.errors.is_empty()
    }

    /// Build the record to submit, dated by the evaluation date
    ///
    /// `now` supplies the time of day only when the evaluation is dated
    /// today (UTC); see [`test_timestamp`].
    pub fn build_record(
        &mut self,
        now: DateTime<Utc>,
    ) -> std::result::Result<TestRecord, ValidationErrors> {
        let measurement = match self.raw.validate() {
            Ok(m) => m,
            Err(errors) => {
                self.errors = errors.clone();
                return Err(errors);
            }
        };
        self.errors = ValidationErrors::default();

        let metrics = metrics_for(&measurement, &self.student.subject(), self.evaluation_date);

        Ok(TestRecord {
            id: Uuid::new_v4(),
            student_id: self.student.id,
            test_type: TestType::Performance,
            test_date: test_timestamp(self.evaluation_date, now),
            distance: measurement.distance,
            duration: measurement.duration,
            heart_rate: measurement.heart_rate,
            weight: measurement.weight,
            temperature: measurement.temperature,
            humidity: measurement.humidity,
            vo2_max: metrics.vo2_max,
            classification: metrics.classification,
            observations: measurement.observations,
        })
    }

    /// Validate, build the record and hand it to `sink`
    pub fn submit(&mut self, sink: &mut dyn TestSink, now: DateTime<Utc>) -> Result<TestRecord> {
        let record = self.build_record(now)?;

        match sink.submit(&record) {
            Ok(()) => {
                tracing::info!(
                    "Submitted test {} for student {} ({:?})",
                    record.id,
                    self.student.id,
                    record.classification
                );
                Ok(record)
            }
            Err(e) => {
                tracing::error!("Failed to submit test for student {}: {}", self.student.id, e);
                Err(e)
            }
        }
    }

    fn recompute(&mut self) {
        self.metrics = compute_metrics(&self.raw, &self.student.subject(), self.evaluation_date);
    }
}

/// Timestamp stored for a test evaluated on `evaluation_date`.
///
/// Same-day evaluations keep the wall-clock instant. Backdated or
/// future-dated ones are pinned to 12:00 UTC of that date, so the UTC date
/// of `test_date` always equals the evaluation date.
pub fn test_timestamp(evaluation_date: NaiveDate, now: DateTime<Utc>) -> DateTime<Utc> {
    if now.date_naive() == evaluation_date {
        now
    } else {
        evaluation_date
            .and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN))
            .and_utc()
    }
}

/// Render a number the way a user would type it
fn format_default(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
