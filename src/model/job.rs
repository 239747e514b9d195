//! Timed jobs: construction, training, and troop movements.
//!
//! A job is a record with a completion time. Callers use `remaining` to drive
//! countdowns and `is_due` to find expired jobs; completing a job is the
//! caller's business.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::timestamp::GameTime;
use crate::id::{JobId, PlayerId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionKind {
    Attack,
    Transport,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JobKind {
    Construction { building: String, level: u32 },
    Training { unit: String, quantity: u32 },
    TroopMovement { target: PlayerId, mission: MissionKind },
}

impl JobKind {
    pub fn as_str(&self) -> &str {
        match self {
            JobKind::Construction { .. } => "construction",
            JobKind::Training { .. } => "training",
            JobKind::TroopMovement { .. } => "troop_movement",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub owner: PlayerId,
    pub kind: JobKind,
    pub queued_at: GameTime,
    pub completes_at: GameTime,
}

impl Job {
    /// Time left until completion; zero once the job is due.
    pub fn remaining(&self, now: GameTime) -> Duration {
        self.completes_at.saturating_since(now)
    }

    pub fn is_due(&self, now: GameTime) -> bool {
        now >= self.completes_at
    }

    pub fn total_duration(&self) -> Duration {
        self.completes_at.saturating_since(self.queued_at)
    }
}
