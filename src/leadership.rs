//! Alliance leadership by land-weighted vote.
//!
//! Each member's voting power is `floor(land_holding / divisor)`. A vote hands
//! the voter's power to the candidate it names. The top candidate leads only if
//! no one else matches their power and they hold a majority of the alliance's
//! total possible power, counted over every member whether they voted or not.
//!
//! Leadership is never stored. Callers recompute it from the current roster and
//! votes whenever either changes.

use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

use crate::config::{ConfigError, GameSettings};
use crate::id::{AllianceId, PlayerId};
use crate::model::{Member, Vote};

/// Majority share (percent of total possible power) used when no settings are given.
pub const DEFAULT_MAJORITY_PERCENT: u8 = 50;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidInput {
    #[error("member {member} has negative land holding {land_holding}")]
    NegativeLandHolding { member: PlayerId, land_holding: i64 },
    #[error("member {0} appears more than once")]
    DuplicateMember(PlayerId),
    #[error("voter {0} has more than one vote")]
    DuplicateVoter(PlayerId),
    #[error("votes span alliances {first} and {second}")]
    MixedAlliances {
        first: AllianceId,
        second: AllianceId,
    },
}

#[derive(Debug, Error)]
pub enum LeadershipError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),
}

/// Outcome of one leadership count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadershipTally {
    pub leader: Option<PlayerId>,
    /// Accumulated power per candidate that received at least one vote.
    pub candidate_power: BTreeMap<PlayerId, u128>,
    /// Sum of every member's voting power.
    pub total_possible_power: u128,
}

impl LeadershipTally {
    /// Candidates ordered by power descending, then id ascending.
    pub fn ranking(&self) -> Vec<(&PlayerId, u128)> {
        let mut ranked: Vec<(&PlayerId, u128)> = self
            .candidate_power
            .iter()
            .map(|(id, power)| (id, *power))
            .collect();
        ranked.sort_by(|(id_a, p_a), (id_b, p_b)| p_b.cmp(p_a).then_with(|| id_a.cmp(id_b)));
        ranked
    }
}

/// Voting power of one member: `floor(land_holding / divisor)`.
pub fn voting_power(member: &Member, divisor: i64) -> Result<u128, LeadershipError> {
    if divisor <= 0 {
        return Err(ConfigError::InvalidDivisor(divisor).into());
    }
    if member.land_holding < 0 {
        return Err(InvalidInput::NegativeLandHolding {
            member: member.id.clone(),
            land_holding: member.land_holding,
        }
        .into());
    }
    Ok((member.land_holding / divisor).unsigned_abs().into())
}

/// Count votes for one alliance with the default 50% majority.
pub fn tally(
    members: &[Member],
    votes: &[Vote],
    voting_power_divisor: i64,
) -> Result<LeadershipTally, LeadershipError> {
    let settings = GameSettings {
        voting_power_divisor,
        majority_percent: DEFAULT_MAJORITY_PERCENT,
    };
    tally_with_settings(members, votes, &settings)
}

/// Count votes for one alliance using a settings snapshot.
pub fn tally_with_settings(
    members: &[Member],
    votes: &[Vote],
    settings: &GameSettings,
) -> Result<LeadershipTally, LeadershipError> {
    settings.validate()?;
    let divisor = settings.voting_power_divisor;

    let mut power_of: BTreeMap<&PlayerId, u128> = BTreeMap::new();
    for member in members {
        let power = voting_power(member, divisor)?;
        if power_of.insert(&member.id, power).is_some() {
            return Err(InvalidInput::DuplicateMember(member.id.clone()).into());
        }
    }

    let mut seen_voters: BTreeSet<&PlayerId> = BTreeSet::new();
    let mut alliance: Option<AllianceId> = None;
    let mut candidate_power: BTreeMap<PlayerId, u128> = BTreeMap::new();
    for vote in votes {
        if !seen_voters.insert(&vote.voter_id) {
            return Err(InvalidInput::DuplicateVoter(vote.voter_id.clone()).into());
        }
        match alliance {
            None => alliance = Some(vote.alliance_id),
            Some(first) if first != vote.alliance_id => {
                return Err(InvalidInput::MixedAlliances {
                    first,
                    second: vote.alliance_id,
                }
                .into());
            }
            Some(_) => {}
        }
        // Voters missing from the roster carry no land, hence no power.
        let power = power_of.get(&vote.voter_id).copied().unwrap_or(0);
        *candidate_power.entry(vote.candidate_id.clone()).or_insert(0) += power;
    }

    let total_possible_power: u128 = power_of.values().sum();

    let mut tally = LeadershipTally {
        leader: None,
        candidate_power,
        total_possible_power,
    };
    tally.leader = decide(&tally, settings.majority_percent);

    tracing::debug!(
        alliance = ?alliance,
        members = members.len(),
        votes = votes.len(),
        total_possible_power = %total_possible_power,
        leader = ?tally.leader,
        "leadership tallied"
    );

    Ok(tally)
}

/// Resolve the current leader, or `None` if the seat is vacant.
pub fn resolve_leader(
    members: &[Member],
    votes: &[Vote],
    settings: &GameSettings,
) -> Result<Option<PlayerId>, LeadershipError> {
    Ok(tally_with_settings(members, votes, settings)?.leader)
}

fn decide(tally: &LeadershipTally, majority_percent: u8) -> Option<PlayerId> {
    if tally.candidate_power.is_empty() || tally.total_possible_power == 0 {
        return None;
    }

    let ranked = tally.ranking();
    let (top_id, top_power) = ranked[0];

    // Any tie at the top blocks leadership; no tie-break is applied.
    if ranked.get(1).is_some_and(|&(_, runner_up)| runner_up == top_power) {
        return None;
    }

    if top_power * 100 >= u128::from(majority_percent) * tally.total_possible_power {
        Some(top_id.clone())
    } else {
        None
    }
}
