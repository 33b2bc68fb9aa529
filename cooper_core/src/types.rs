//! Core domain types for Cooper evaluations.
//!
//! This module defines the fundamental types used throughout the system:
//! - Students (evaluatees) and the subject attributes the calculator reads
//! - Classification tiers and heart-rate training zones
//! - Derived metrics snapshots
//! - Test records handed to the submit collaborator

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Locale
// ============================================================================

/// Display language for labels and validation messages
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum Locale {
    #[default]
    #[serde(rename = "pt-BR")]
    PtBr,
    #[serde(rename = "en")]
    En,
}

impl Locale {
    /// Parse a locale tag such as "pt-BR", "pt" or "en"
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim().to_lowercase().replace('_', "-").as_str() {
            "pt-br" | "pt" => Some(Locale::PtBr),
            "en" | "en-us" | "en-gb" => Some(Locale::En),
            _ => None,
        }
    }
}

// ============================================================================
// Subject / Student
// ============================================================================

/// Gender as recorded on the student
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    /// Map a locale-specific label to a gender.
    ///
    /// Unrecognised labels map to `Other`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "masculino" | "male" | "m" => Gender::Male,
            "feminino" | "female" | "f" => Gender::Female,
            _ => Gender::Other,
        }
    }

    pub fn label(&self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Gender::Male, Locale::PtBr) => "masculino",
            (Gender::Female, Locale::PtBr) => "feminino",
            (Gender::Other, Locale::PtBr) => "outro",
            (Gender::Male, Locale::En) => "male",
            (Gender::Female, Locale::En) => "female",
            (Gender::Other, Locale::En) => "other",
        }
    }
}

/// The attributes of an evaluatee that the calculator reads
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Subject {
    pub birth_date: NaiveDate,
    pub gender: Gender,
}

/// A student on the roster
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Student {
    pub id: Uuid,
    pub name: String,
    pub birth_date: NaiveDate,
    pub gender: Gender,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

impl Student {
    pub fn new(name: impl Into<String>, birth_date: NaiveDate, gender: Gender) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            birth_date,
            gender,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    pub fn subject(&self) -> Subject {
        Subject {
            birth_date: self.birth_date,
            gender: self.gender,
        }
    }
}

// ============================================================================
// Classification
// ============================================================================

/// VO2 max classification tier, ordered weakest to strongest
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Poor,
    Regular,
    Good,
    VeryGood,
    Excellent,
}

impl Classification {
    pub fn label(&self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Classification::Excellent, Locale::PtBr) => "Excelente",
            (Classification::VeryGood, Locale::PtBr) => "Muito Bom",
            (Classification::Good, Locale::PtBr) => "Bom",
            (Classification::Regular, Locale::PtBr) => "Regular",
            (Classification::Poor, Locale::PtBr) => "Fraco",
            (Classification::Excellent, Locale::En) => "Excellent",
            (Classification::VeryGood, Locale::En) => "Very Good",
            (Classification::Good, Locale::En) => "Good",
            (Classification::Regular, Locale::En) => "Regular",
            (Classification::Poor, Locale::En) => "Poor",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label(Locale::default()))
    }
}

// ============================================================================
// Training zones
// ============================================================================

/// The five heart-rate training zones, lowest intensity first
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ZoneKind {
    ActiveRecovery,
    AerobicBase,
    Aerobic,
    AnaerobicThreshold,
    Neuromuscular,
}

impl ZoneKind {
    pub const ALL: [ZoneKind; 5] = [
        ZoneKind::ActiveRecovery,
        ZoneKind::AerobicBase,
        ZoneKind::Aerobic,
        ZoneKind::AnaerobicThreshold,
        ZoneKind::Neuromuscular,
    ];

    /// Fractions of max heart rate bounding this zone
    pub fn fractions(&self) -> (f64, f64) {
        match self {
            ZoneKind::ActiveRecovery => (0.5, 0.6),
            ZoneKind::AerobicBase => (0.6, 0.7),
            ZoneKind::Aerobic => (0.7, 0.8),
            ZoneKind::AnaerobicThreshold => (0.8, 0.9),
            ZoneKind::Neuromuscular => (0.9, 1.0),
        }
    }

    pub fn label(&self, locale: Locale) -> &'static str {
        match (self, locale) {
            (ZoneKind::ActiveRecovery, Locale::PtBr) => "Recuperação Ativa",
            (ZoneKind::AerobicBase, Locale::PtBr) => "Base Aeróbica",
            (ZoneKind::Aerobic, Locale::PtBr) => "Aeróbico",
            (ZoneKind::AnaerobicThreshold, Locale::PtBr) => "Limiar Anaeróbico",
            (ZoneKind::Neuromuscular, Locale::PtBr) => "Neuromuscular",
            (ZoneKind::ActiveRecovery, Locale::En) => "Active Recovery",
            (ZoneKind::AerobicBase, Locale::En) => "Aerobic Base",
            (ZoneKind::Aerobic, Locale::En) => "Aerobic",
            (ZoneKind::AnaerobicThreshold, Locale::En) => "Anaerobic Threshold",
            (ZoneKind::Neuromuscular, Locale::En) => "Neuromuscular",
        }
    }
}

/// A heart-rate band in bpm
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrainingZone {
    pub kind: ZoneKind,
    pub min_bpm: u32,
    pub max_bpm: u32,
}

/// All five training zones for one subject
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrainingIntensity {
    pub max_heart_rate: u32,
    pub zones: [TrainingZone; 5],
}

// ============================================================================
// Derived metrics
// ============================================================================

/// Snapshot of everything derived from one measurement
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct DerivedMetrics {
    pub age: u32,
    pub vo2_max: f64,
    pub classification: Classification,
    pub training_intensity: TrainingIntensity,
    pub calories_burned: i64,
    pub oxygen_consumption: i64,
}

// ============================================================================
// Test records
// ============================================================================

/// Kind of evaluation a record came from
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TestType {
    Cooper,
    Performance,
}

/// A completed evaluation, as handed to the submit collaborator
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TestRecord {
    pub id: Uuid,
    pub student_id: Uuid,
    pub test_type: TestType,
    pub test_date: DateTime<Utc>,
    pub distance: f64,
    pub duration: f64,
    pub heart_rate: u32,
    pub weight: f64,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub vo2_max: f64,
    pub classification: Classification,
    #[serde(default)]
    pub observations: String,
}
