use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::nutrition::model::Goal;

const BUNDLED_GUIDANCE: &str = include_str!("../../data/fitness.json");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tip {
    pub title: String,
    pub content: String,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub name: String,
    pub description: String,
    pub sets: String,
    pub reps: String,
    pub category: String,
}

/// One list per goal.
#[derive(Debug, Clone, Deserialize)]
pub struct GoalLists<T> {
    pub lose: Vec<T>,
    pub maintain: Vec<T>,
    pub gain: Vec<T>,
}

impl<T> GoalLists<T> {
    pub fn for_goal(&self, goal: Goal) -> &[T] {
        match goal {
            Goal::Lose => &self.lose,
            Goal::Maintain => &self.maintain,
            Goal::Gain => &self.gain,
        }
    }
}

/// Static tips and exercises, loaded once at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct FitnessGuidance {
    pub tips: GoalLists<Tip>,
    pub exercises: GoalLists<Exercise>,
}

impl FitnessGuidance {
    pub fn bundled() -> anyhow::Result<Self> {
        serde_json::from_str(BUNDLED_GUIDANCE).context("parse bundled fitness guidance")
    }

    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let guidance = match path {
            Some(p) => {
                let raw = std::fs::read_to_string(p)
                    .with_context(|| format!("read fitness guidance {}", p.display()))?;
                serde_json::from_str(&raw)
                    .with_context(|| format!("parse fitness guidance {}", p.display()))?
            }
            None => Self::bundled()?,
        };
        info!(source = ?path, "fitness guidance loaded");
        Ok(guidance)
    }

    pub fn tips(&self, goal: Goal) -> &[Tip] {
        self.tips.for_goal(goal)
    }

    pub fn exercises(&self, goal: Goal) -> &[Exercise] {
        self.exercises.for_goal(goal)
    }
}
