//! Skepticism tracking
//!
//! A short FIFO of recent relevancy scores, summed against the persona's
//! baseline to give a categorical skepticism level. A cooperative
//! representative pushes the running total up and skepticism down.

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::state::Relevancy;

/// Number of recent turns the window remembers.
pub const SKEPTICISM_WINDOW: usize = 5;

// ─────────────────────────────────────────────────────────────────
// Skepticism Level
// ─────────────────────────────────────────────────────────────────

/// Categorical skepticism, used both as persona baseline and live level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SkepticismLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl SkepticismLevel {
    /// Numeric anchor the window sum is compared against.
    pub fn anchor(&self) -> i32 {
        match self {
            SkepticismLevel::Low => 1,
            SkepticismLevel::Medium => 2,
            SkepticismLevel::High => 3,
        }
    }
}

impl fmt::Display for SkepticismLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkepticismLevel::Low => write!(f, "Low"),
            SkepticismLevel::Medium => write!(f, "Medium"),
            SkepticismLevel::High => write!(f, "High"),
        }
    }
}

impl FromStr for SkepticismLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(SkepticismLevel::Low),
            "medium" => Ok(SkepticismLevel::Medium),
            "high" => Ok(SkepticismLevel::High),
            _ => Err(format!(
                "Unknown skepticism level '{}'. Valid: Low, Medium, High",
                s
            )),
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Skepticism Window
// ─────────────────────────────────────────────────────────────────

/// The last [`SKEPTICISM_WINDOW`] relevancy scores, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<i8>", into = "Vec<i8>")]
pub struct SkepticismWindow {
    scores: VecDeque<i8>,
}

impl SkepticismWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the latest score, evicting the oldest once past capacity.
    pub fn update(&mut self, latest: Relevancy) {
        self.scores.push_back(latest.score() as i8);
        if self.scores.len() > SKEPTICISM_WINDOW {
            self.scores.pop_front();
        }
    }

    /// Derive the level relative to `baseline`.
    pub fn level(&self, baseline: SkepticismLevel) -> SkepticismLevel {
        let sum = self.sum();
        let anchor = baseline.anchor();
        if sum >= anchor + 1 {
            SkepticismLevel::Low
        } else if sum <= anchor - 1 {
            SkepticismLevel::High
        } else {
            SkepticismLevel::Medium
        }
    }

    pub fn sum(&self) -> i32 {
        self.scores.iter().map(|&s| s as i32).sum()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn scores(&self) -> impl Iterator<Item = i8> + '_ {
        self.scores.iter().copied()
    }
}

impl From<Vec<i8>> for SkepticismWindow {
    /// Rebuild from persisted scores, clamping each to -1..=1 and keeping the newest five.
    fn from(scores: Vec<i8>) -> Self {
        let mut window = Self::new();
        for score in scores {
            window.update(Relevancy::from_score(score as i64));
        }
        window
    }
}

impl From<SkepticismWindow> for Vec<i8> {
    fn from(window: SkepticismWindow) -> Self {
        window.scores.into_iter().collect()
    }
}
