use std::collections::BTreeMap;
use std::time::Duration;

use thiserror::Error;

use super::job::{Job, JobKind};
use super::member::{Member, Vote};
use super::player::{Alliance, Player};
use super::timestamp::GameTime;
use crate::config::GameSettings;
use crate::id::{AllianceId, IdGenerator, JobId, PlayerId};
use crate::leadership::{self, LeadershipError, LeadershipTally};

#[derive(Debug, Error)]
pub enum WorldError {
    #[error("player {0} is already registered")]
    DuplicatePlayer(PlayerId),
    #[error("player {0} not found")]
    UnknownPlayer(PlayerId),
    #[error("{0} not found")]
    UnknownAlliance(AllianceId),
    #[error("player {0} is not in an alliance")]
    NotInAlliance(PlayerId),
    #[error("{candidate} is not a member of {alliance}")]
    CandidateNotInAlliance {
        candidate: PlayerId,
        alliance: AllianceId,
    },
    #[error("land holding cannot be negative, got {0}")]
    NegativeLandHolding(i64),
    #[error("player {player} is not the leader of {alliance}")]
    NotLeader {
        player: PlayerId,
        alliance: AllianceId,
    },
    #[error(transparent)]
    Leadership(#[from] LeadershipError),
}

/// Game state: players, alliances, live votes, and queued jobs.
///
/// Votes are keyed by voter, so casting again replaces the earlier choice.
/// The alliance leader is not a field here; ask `leader_of`.
#[derive(Debug, Default)]
pub struct World {
    pub players: BTreeMap<PlayerId, Player>,
    pub alliances: BTreeMap<AllianceId, Alliance>,
    pub votes: BTreeMap<PlayerId, Vote>,
    pub jobs: BTreeMap<JobId, Job>,
    pub id_gen: IdGenerator,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_player(
        &mut self,
        id: PlayerId,
        name: String,
        land_holding: i64,
    ) -> Result<(), WorldError> {
        if self.players.contains_key(&id) {
            return Err(WorldError::DuplicatePlayer(id));
        }
        if land_holding < 0 {
            return Err(WorldError::NegativeLandHolding(land_holding));
        }
        tracing::info!(player = %id, land_holding, "player registered");
        self.players.insert(
            id.clone(),
            Player {
                id,
                name,
                alliance_id: None,
                land_holding,
            },
        );
        Ok(())
    }

    pub fn found_alliance(&mut self, name: String) -> AllianceId {
        let id = self.id_gen.next_alliance_id();
        tracing::info!(alliance = %id, name = %name, "alliance founded");
        self.alliances.insert(id, Alliance { id, name });
        id
    }

    /// Move a player into an alliance. Leaving the previous alliance (if any)
    /// clears the player's vote and the votes cast for them.
    pub fn join_alliance(
        &mut self,
        player_id: &PlayerId,
        alliance_id: AllianceId,
    ) -> Result<(), WorldError> {
        if !self.alliances.contains_key(&alliance_id) {
            return Err(WorldError::UnknownAlliance(alliance_id));
        }
        let current = self.player(player_id)?.alliance_id;
        if current == Some(alliance_id) {
            return Ok(());
        }
        if current.is_some() {
            self.leave_alliance(player_id)?;
        }
        if let Some(player) = self.players.get_mut(player_id) {
            player.alliance_id = Some(alliance_id);
        }
        tracing::info!(player = %player_id, alliance = %alliance_id, "joined alliance");
        Ok(())
    }

    /// Remove a player from their alliance, along with their own vote and every
    /// vote naming them as candidate.
    pub fn leave_alliance(&mut self, player_id: &PlayerId) -> Result<(), WorldError> {
        let player = self
            .players
            .get_mut(player_id)
            .ok_or_else(|| WorldError::UnknownPlayer(player_id.clone()))?;
        let Some(alliance_id) = player.alliance_id.take() else {
            return Err(WorldError::NotInAlliance(player_id.clone()));
        };
        self.votes.remove(player_id);
        let before = self.votes.len();
        self.votes.retain(|_, v| &v.candidate_id != player_id);
        tracing::info!(
            player = %player_id,
            alliance = %alliance_id,
            dropped_votes = before - self.votes.len(),
            "left alliance"
        );
        Ok(())
    }

    pub fn set_land_holding(
        &mut self,
        player_id: &PlayerId,
        land_holding: i64,
    ) -> Result<(), WorldError> {
        if land_holding < 0 {
            return Err(WorldError::NegativeLandHolding(land_holding));
        }
        let player = self
            .players
            .get_mut(player_id)
            .ok_or_else(|| WorldError::UnknownPlayer(player_id.clone()))?;
        player.land_holding = land_holding;
        Ok(())
    }

    /// Cast or replace `voter`'s vote. Both players must share an alliance.
    pub fn cast_vote(&mut self, voter: &PlayerId, candidate: &PlayerId) -> Result<(), WorldError> {
        let alliance_id = self
            .player(voter)?
            .alliance_id
            .ok_or_else(|| WorldError::NotInAlliance(voter.clone()))?;
        if self.player(candidate)?.alliance_id != Some(alliance_id) {
            tracing::warn!(voter = %voter, candidate = %candidate, "vote for outsider rejected");
            return Err(WorldError::CandidateNotInAlliance {
                candidate: candidate.clone(),
                alliance: alliance_id,
            });
        }
        let previous = self.votes.insert(
            voter.clone(),
            Vote {
                voter_id: voter.clone(),
                candidate_id: candidate.clone(),
                alliance_id,
            },
        );
        tracing::info!(
            voter = %voter,
            candidate = %candidate,
            replaced = previous.is_some(),
            "vote cast"
        );
        Ok(())
    }

    /// Withdraw `voter`'s vote. Returns whether there was one.
    pub fn retract_vote(&mut self, voter: &PlayerId) -> bool {
        self.votes.remove(voter).is_some()
    }

    pub fn members_of(&self, alliance_id: AllianceId) -> Vec<Member> {
        self.players
            .values()
            .filter(|p| p.alliance_id == Some(alliance_id))
            .map(Player::as_member)
            .collect()
    }

    pub fn votes_in(&self, alliance_id: AllianceId) -> Vec<Vote> {
        self.votes
            .values()
            .filter(|v| v.alliance_id == alliance_id)
            .cloned()
            .collect()
    }

    pub fn leadership_of(
        &self,
        alliance_id: AllianceId,
        settings: &GameSettings,
    ) -> Result<LeadershipTally, WorldError> {
        if !self.alliances.contains_key(&alliance_id) {
            return Err(WorldError::UnknownAlliance(alliance_id));
        }
        let members = self.members_of(alliance_id);
        let votes = self.votes_in(alliance_id);
        Ok(leadership::tally_with_settings(&members, &votes, settings)?)
    }

    /// Current leader of an alliance, recomputed from the live roster and votes.
    pub fn leader_of(
        &self,
        alliance_id: AllianceId,
        settings: &GameSettings,
    ) -> Result<Option<PlayerId>, WorldError> {
        Ok(self.leadership_of(alliance_id, settings)?.leader)
    }

    /// Succeeds only if `player` currently leads `alliance_id`.
    pub fn require_leader(
        &self,
        alliance_id: AllianceId,
        player: &PlayerId,
        settings: &GameSettings,
    ) -> Result<(), WorldError> {
        if self.leader_of(alliance_id, settings)?.as_ref() == Some(player) {
            Ok(())
        } else {
            tracing::warn!(player = %player, alliance = %alliance_id, "leader-only action refused");
            Err(WorldError::NotLeader {
                player: player.clone(),
                alliance: alliance_id,
            })
        }
    }

    pub fn enqueue_job(
        &mut self,
        owner: &PlayerId,
        kind: JobKind,
        now: GameTime,
        duration: Duration,
    ) -> Result<JobId, WorldError> {
        self.player(owner)?;
        let id = self.id_gen.next_job_id();
        tracing::debug!(job = %id, owner = %owner, kind = kind.as_str(), ?duration, "job queued");
        self.jobs.insert(
            id,
            Job {
                id,
                owner: owner.clone(),
                kind,
                queued_at: now,
                completes_at: now.saturating_add(duration),
            },
        );
        Ok(id)
    }

    pub fn jobs_of<'a>(&'a self, owner: &'a PlayerId) -> impl Iterator<Item = &'a Job> + 'a {
        self.jobs.values().filter(move |j| &j.owner == owner)
    }

    /// Jobs whose completion time has passed. Listing only; nothing is completed.
    pub fn due_jobs(&self, now: GameTime) -> impl Iterator<Item = &Job> {
        self.jobs.values().filter(move |j| j.is_due(now))
    }

    fn player(&self, id: &PlayerId) -> Result<&Player, WorldError> {
        self.players
            .get(id)
            .ok_or_else(|| WorldError::UnknownPlayer(id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MissionKind;

    fn pid(s: &str) -> PlayerId {
        PlayerId::new(s).unwrap()
    }

    fn world_with(players: &[(&str, i64)]) -> (World, AllianceId) {
        let mut world = World::new();
        let alliance = world.found_alliance("Iron Pact".to_string());
        for (id, land) in players {
            world
                .register_player(pid(id), id.to_uppercase(), *land)
                .unwrap();
            world.join_alliance(&pid(id), alliance).unwrap();
        }
        (world, alliance)
    }

    #[test]
    fn duplicate_registration_rejected() {
        let (mut world, _) = world_with(&[("a", 100)]);
        let err = world
            .register_player(pid("a"), "again".to_string(), 0)
            .unwrap_err();
        assert!(matches!(err, WorldError::DuplicatePlayer(_)));
    }

    #[test]
    fn recasting_replaces_previous_vote() {
        let (mut world, alliance) = world_with(&[("a", 600), ("b", 400)]);
        world.cast_vote(&pid("b"), &pid("a")).unwrap();
        world.cast_vote(&pid("b"), &pid("b")).unwrap();
        let votes = world.votes_in(alliance);
        assert_eq!(votes.len(), 1);
        assert_eq!(votes[0].candidate_id, pid("b"));
    }

    #[test]
    fn cannot_vote_for_outsider() {
        let (mut world, _) = world_with(&[("a", 100)]);
        world
            .register_player(pid("loner"), "Loner".to_string(), 100)
            .unwrap();
        let err = world.cast_vote(&pid("a"), &pid("loner")).unwrap_err();
        assert!(matches!(err, WorldError::CandidateNotInAlliance { .. }));
        let err = world.cast_vote(&pid("loner"), &pid("a")).unwrap_err();
        assert!(matches!(err, WorldError::NotInAlliance(_)));
    }

    #[test]
    fn leaving_drops_votes_by_and_for_player() {
        let (mut world, alliance) = world_with(&[("a", 100), ("b", 100), ("c", 100)]);
        world.cast_vote(&pid("a"), &pid("b")).unwrap();
        world.cast_vote(&pid("b"), &pid("b")).unwrap();
        world.cast_vote(&pid("c"), &pid("a")).unwrap();

        world.leave_alliance(&pid("b")).unwrap();

        let votes = world.votes_in(alliance);
        assert_eq!(votes.len(), 1);
        assert_eq!(votes[0].voter_id, pid("c"));
        assert_eq!(world.members_of(alliance).len(), 2);
    }

    #[test]
    fn switching_alliance_leaves_the_old_one() {
        let (mut world, first) = world_with(&[("a", 500), ("b", 100)]);
        world.cast_vote(&pid("a"), &pid("a")).unwrap();
        let second = world.found_alliance("Red Banner".to_string());
        world.join_alliance(&pid("a"), second).unwrap();
        assert!(world.votes_in(first).is_empty());
        assert_eq!(world.members_of(second).len(), 1);
    }

    #[test]
    fn leader_follows_votes_and_land() {
        let settings = GameSettings::default();
        let (mut world, alliance) = world_with(&[("a", 600), ("b", 400)]);
        assert_eq!(world.leader_of(alliance, &settings).unwrap(), None);

        world.cast_vote(&pid("a"), &pid("a")).unwrap();
        assert_eq!(world.leader_of(alliance, &settings).unwrap(), Some(pid("a")));

        // b grows to match a and backs themself: tie.
        world.set_land_holding(&pid("b"), 600).unwrap();
        world.cast_vote(&pid("b"), &pid("b")).unwrap();
        assert_eq!(world.leader_of(alliance, &settings).unwrap(), None);
    }

    #[test]
    fn require_leader_gates_on_live_result() {
        let settings = GameSettings::default();
        let (mut world, alliance) = world_with(&[("a", 600), ("b", 400)]);
        world.cast_vote(&pid("a"), &pid("a")).unwrap();
        assert!(world.require_leader(alliance, &pid("a"), &settings).is_ok());
        let err = world
            .require_leader(alliance, &pid("b"), &settings)
            .unwrap_err();
        assert!(matches!(err, WorldError::NotLeader { .. }));

        world.retract_vote(&pid("a"));
        assert!(world.require_leader(alliance, &pid("a"), &settings).is_err());
    }

    #[test]
    fn negative_land_rejected() {
        let (mut world, _) = world_with(&[("a", 100)]);
        let err = world.set_land_holding(&pid("a"), -10).unwrap_err();
        assert!(matches!(err, WorldError::NegativeLandHolding(-10)));
    }

    #[test]
    fn jobs_listed_when_due() {
        let (mut world, _) = world_with(&[("a", 100), ("b", 100)]);
        let start = GameTime::from_millis(0);
        let build = world
            .enqueue_job(
                &pid("a"),
                JobKind::Construction {
                    building: "barracks".to_string(),
                    level: 2,
                },
                start,
                Duration::from_secs(60),
            )
            .unwrap();
        world
            .enqueue_job(
                &pid("a"),
                JobKind::TroopMovement {
                    target: pid("b"),
                    mission: MissionKind::Attack,
                },
                start,
                Duration::from_secs(600),
            )
            .unwrap();

        assert_eq!(world.jobs_of(&pid("a")).count(), 2);
        let due: Vec<JobId> = world
            .due_jobs(GameTime::from_millis(60_000))
            .map(|j| j.id)
            .collect();
        assert_eq!(due, vec![build]);
    }

    #[test]
    fn huge_duration_caps_completion_time() {
        let (mut world, _) = world_with(&[("a", 100)]);
        let id = world
            .enqueue_job(
                &pid("a"),
                JobKind::Training {
                    unit: "scout".to_string(),
                    quantity: 1,
                },
                GameTime::from_millis(5_000),
                Duration::MAX,
            )
            .unwrap();
        let job = &world.jobs[&id];
        assert_eq!(job.completes_at, GameTime::MAX);
        assert!(i64::try_from(job.completes_at.as_millis()).is_ok());
        assert!(job.is_due(GameTime::MAX));
    }

    #[test]
    fn job_for_unknown_player_rejected() {
        let mut world = World::new();
        let err = world
            .enqueue_job(
                &pid("nobody"),
                JobKind::Training {
                    unit: "archer".to_string(),
                    quantity: 1,
                },
                GameTime::from_millis(0),
                Duration::from_secs(1),
            )
            .unwrap_err();
        assert!(matches!(err, WorldError::UnknownPlayer(_)));
    }
}
