use serde::{Deserialize, Serialize};

use super::member::Member;
use crate::id::{AllianceId, PlayerId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub alliance_id: Option<AllianceId>,
    pub land_holding: i64,
}

impl Player {
    pub fn as_member(&self) -> Member {
        Member::new(self.id.clone(), self.land_holding)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alliance {
    pub id: AllianceId,
    pub name: String,
}
