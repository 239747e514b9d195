//! Game-state core for Code Name: players, alliances, timed jobs, and
//! alliance leadership resolved from land-weighted votes.

pub mod config;
pub mod db;
pub mod flush;
pub mod id;
pub mod leadership;
pub mod model;

pub use config::GameSettings;
pub use id::{AllianceId, IdGenerator, JobId, PlayerId};
pub use leadership::{LeadershipError, LeadershipTally, resolve_leader, tally};
pub use model::{Alliance, GameTime, Job, JobKind, Member, Player, Vote, World, WorldError};
