//! Scoring strategies: named weight profiles over the four factors.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AnalyzeError;
use crate::subscores::{Factor, Subscores};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    #[default]
    Balanced,
    Deadline,
    Impact,
    Fastest,
}

/// Weights over (urgency, importance, effort, dependency); each row sums to 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    pub urgency: f64,
    pub importance: f64,
    pub effort: f64,
    pub dependency: f64,
}

const BALANCED: Weights = Weights {
    urgency: 0.30,
    importance: 0.30,
    effort: 0.15,
    dependency: 0.25,
};
const DEADLINE: Weights = Weights {
    urgency: 0.55,
    importance: 0.20,
    effort: 0.10,
    dependency: 0.15,
};
const IMPACT: Weights = Weights {
    urgency: 0.15,
    importance: 0.40,
    effort: 0.10,
    dependency: 0.35,
};
const FASTEST: Weights = Weights {
    urgency: 0.10,
    importance: 0.15,
    effort: 0.60,
    dependency: 0.15,
};

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::Balanced,
        Strategy::Deadline,
        Strategy::Impact,
        Strategy::Fastest,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Strategy::Balanced => "balanced",
            Strategy::Deadline => "deadline",
            Strategy::Impact => "impact",
            Strategy::Fastest => "fastest",
        }
    }

    pub fn weights(self) -> Weights {
        match self {
            Strategy::Balanced => BALANCED,
            Strategy::Deadline => DEADLINE,
            Strategy::Impact => IMPACT,
            Strategy::Fastest => FASTEST,
        }
    }

    /// `None` (or a blank name) selects the default strategy.
    pub fn from_optional(name: Option<&str>) -> Result<Self, AnalyzeError> {
        match name.map(str::trim) {
            None | Some("") => Ok(Strategy::default()),
            Some(name) => name.parse(),
        }
    }
}

impl FromStr for Strategy {
    type Err = AnalyzeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            // "smart" is what older clients send for the default profile.
            "balanced" | "smart" => Ok(Strategy::Balanced),
            "deadline" => Ok(Strategy::Deadline),
            "impact" => Ok(Strategy::Impact),
            "fastest" => Ok(Strategy::Fastest),
            _ => Err(AnalyzeError::InvalidStrategy(s.to_string())),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Weights {
    pub fn get(&self, factor: Factor) -> f64 {
        match factor {
            Factor::Urgency => self.urgency,
            Factor::Importance => self.importance,
            Factor::Effort => self.effort,
            Factor::Dependency => self.dependency,
        }
    }

    pub fn sum(&self) -> f64 {
        self.urgency + self.importance + self.effort + self.dependency
    }

    /// weight x subscore per factor, in `Factor::ALL` order.
    pub fn contributions(&self, subscores: &Subscores) -> [(Factor, f64); 4] {
        Factor::ALL.map(|f| (f, self.get(f) * subscores.get(f)))
    }

    /// Weighted sum of the subscores, on the same 0-100 scale.
    pub fn combine(&self, subscores: &Subscores) -> f64 {
        self.contributions(subscores)
            .iter()
            .map(|(_, c)| c)
            .sum::<f64>()
            .clamp(0.0, 100.0)
    }
}
