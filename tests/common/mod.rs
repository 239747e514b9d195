#![allow(dead_code)]

use std::time::Duration;

use codename::model::*;
use codename::{AllianceId, PlayerId};

pub fn pid(s: &str) -> PlayerId {
    PlayerId::new(s).unwrap()
}

/// Two alliances, five players, three votes, two jobs.
///
/// Iron Pact: alice (600 land), bob (400), carol (50). alice and bob vote alice,
/// carol votes bob. Red Banner: dave (300), erin (unaffiliated).
pub fn build_test_world() -> (World, AllianceId, AllianceId) {
    let mut world = World::new();

    let iron = world.found_alliance("Iron Pact".to_string());
    let red = world.found_alliance("Red Banner".to_string());

    for (id, name, land) in [
        ("alice", "Alice", 600),
        ("bob", "Bob", 400),
        ("carol", "Carol\tthe Bold", 50),
        ("dave", "Dave", 300),
        ("erin", "Erin", 0),
    ] {
        world
            .register_player(pid(id), name.to_string(), land)
            .unwrap();
    }
    for id in ["alice", "bob", "carol"] {
        world.join_alliance(&pid(id), iron).unwrap();
    }
    world.join_alliance(&pid("dave"), red).unwrap();

    world.cast_vote(&pid("alice"), &pid("alice")).unwrap();
    world.cast_vote(&pid("bob"), &pid("alice")).unwrap();
    world.cast_vote(&pid("carol"), &pid("bob")).unwrap();

    let start = GameTime::from_millis(1_000_000);
    world
        .enqueue_job(
            &pid("alice"),
            JobKind::Construction {
                building: "granary".to_string(),
                level: 1,
            },
            start,
            Duration::from_secs(120),
        )
        .unwrap();
    world
        .enqueue_job(
            &pid("dave"),
            JobKind::TroopMovement {
                target: pid("bob"),
                mission: MissionKind::Transport,
            },
            start,
            Duration::from_secs(900),
        )
        .unwrap();

    (world, iron, red)
}

pub fn read_lines(path: &std::path::Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}
