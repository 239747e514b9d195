pub mod job;
pub mod member;
pub mod player;
pub mod timestamp;
pub mod world;

pub use job::{Job, JobKind, MissionKind};
pub use member::{Member, Vote};
pub use player::{Alliance, Player};
pub use timestamp::GameTime;
pub use world::{World, WorldError};
