//! VO2 max classification table.
//!
//! Thresholds are keyed by gender and age bracket. Only `Gender::Male` has
//! its own column; every other gender reads the female column.

use crate::{Classification, Gender};
use serde::{Deserialize, Serialize};

/// Age bracket used by the classification table
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum AgeBracket {
    /// Under 30 (ages below 20 included)
    Twenties,
    Thirties,
    Forties,
    Fifties,
    SixtyPlus,
}

impl AgeBracket {
    /// Brackets are half-open: 30 belongs to `Thirties`.
    pub fn for_age(age: u32) -> Self {
        match age {
            0..=29 => AgeBracket::Twenties,
            30..=39 => AgeBracket::Thirties,
            40..=49 => AgeBracket::Forties,
            50..=59 => AgeBracket::Fifties,
            _ => AgeBracket::SixtyPlus,
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

/// Minimum VO2 max (ml/kg/min) for each tier above `Poor`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Thresholds {
    pub excellent: f64,
    pub good: f64,
    pub fair: f64,
    pub poor: f64,
}

const fn t(excellent: f64, good: f64, fair: f64, poor: f64) -> Thresholds {
    Thresholds {
        excellent,
        good,
        fair,
        poor,
    }
}

const MALE: [Thresholds; 5] = [
    t(56.0, 51.0, 45.0, 40.0),
    t(54.0, 48.0, 42.0, 36.0),
    t(51.0, 45.0, 39.0, 33.0),
    t(48.0, 42.0, 36.0, 30.0),
    t(45.0, 39.0, 33.0, 27.0),
];

const FEMALE: [Thresholds; 5] = [
    t(49.0, 44.0, 38.0, 33.0),
    t(46.0, 41.0, 35.0, 30.0),
    t(43.0, 38.0, 32.0, 27.0),
    t(40.0, 35.0, 29.0, 24.0),
    t(37.0, 32.0, 26.0, 21.0),
];

/// Thresholds for a gender and age bracket
pub fn thresholds(gender: Gender, bracket: AgeBracket) -> Thresholds {
    match gender {
        Gender::Male => MALE[bracket.index()],
        Gender::Female | Gender::Other => FEMALE[bracket.index()],
    }
}

/// Highest tier whose threshold `vo2_max` meets
pub fn classify(vo2_max: f64, age: u32, gender: Gender) -> Classification {
    let ranges = thresholds(gender, AgeBracket::for_age(age));

    if vo2_max >= ranges.excellent {
        Classification::Excellent
    } else if vo2_max >= ranges.good {
        Classification::VeryGood
    } else if vo2_max >= ranges.fair {
        Classification::Good
    } else if vo2_max >= ranges.poor {
        Classification::Regular
    } else {
        Classification::Poor
    }
}
