use serde::{Deserialize, Serialize};

use crate::id::{AllianceId, PlayerId};

/// A player as seen by the leadership vote: who they are and how much land they hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: PlayerId,
    pub land_holding: i64,
}

impl Member {
    pub fn new(id: PlayerId, land_holding: i64) -> Self {
        Self { id, land_holding }
    }
}

/// A voter's current choice of alliance leader. At most one per voter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub voter_id: PlayerId,
    pub candidate_id: PlayerId,
    pub alliance_id: AllianceId,
}
