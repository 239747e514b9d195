use sqlx::types::Json;
use sqlx::{PgPool, Row};

use crate::config::GameSettings;
use crate::id::{AllianceId, PlayerId};
use crate::model::{Member, Vote};

/// Roster and votes of one alliance as read from the database, ready for
/// `leadership::tally`.
#[derive(Debug, Clone, Default)]
pub struct AllianceSnapshot {
    pub members: Vec<Member>,
    pub votes: Vec<Vote>,
}

fn decode_player_id(raw: String) -> Result<PlayerId, sqlx::Error> {
    PlayerId::new(raw).map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

/// Read the current members and votes of an alliance.
///
/// Votes are filtered to voters who are still members, so a stale vote row
/// left by a departed player never reaches the resolver.
pub async fn fetch_alliance_snapshot(
    pool: &PgPool,
    alliance_id: AllianceId,
) -> Result<AllianceSnapshot, sqlx::Error> {
    let alliance = super::to_bigint(alliance_id.0)?;

    let member_rows = sqlx::query(
        "SELECT id, land_holding FROM players WHERE alliance_id = $1 ORDER BY id",
    )
    .bind(alliance)
    .fetch_all(pool)
    .await?;
    let members = member_rows
        .into_iter()
        .map(|row| -> Result<Member, sqlx::Error> {
            Ok(Member::new(
                decode_player_id(row.try_get("id")?)?,
                row.try_get("land_holding")?,
            ))
        })
        .collect::<Result<Vec<_>, sqlx::Error>>()?;

    let vote_rows = sqlx::query(
        "SELECT v.voter_id, v.candidate_id FROM votes v \
         JOIN players p ON p.id = v.voter_id AND p.alliance_id = v.alliance_id \
         WHERE v.alliance_id = $1 ORDER BY v.voter_id",
    )
    .bind(alliance)
    .fetch_all(pool)
    .await?;
    let votes = vote_rows
        .into_iter()
        .map(|row| -> Result<Vote, sqlx::Error> {
            Ok(Vote {
                voter_id: decode_player_id(row.try_get("voter_id")?)?,
                candidate_id: decode_player_id(row.try_get("candidate_id")?)?,
                alliance_id,
            })
        })
        .collect::<Result<Vec<_>, sqlx::Error>>()?;

    tracing::debug!(
        alliance = %alliance_id,
        members = members.len(),
        votes = votes.len(),
        "alliance snapshot fetched"
    );
    Ok(AllianceSnapshot { members, votes })
}

/// Replace the stored settings document.
pub async fn store_settings(pool: &PgPool, settings: &GameSettings) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO game_settings (id, settings) VALUES (1, $1) \
         ON CONFLICT (id) DO UPDATE SET settings = EXCLUDED.settings",
    )
    .bind(Json(settings))
    .execute(pool)
    .await?;
    tracing::info!(?settings, "game settings stored");
    Ok(())
}

/// Read the stored settings, or `None` if none have been stored yet.
/// A stored document that fails validation is a decode error.
pub async fn fetch_settings(pool: &PgPool) -> Result<Option<GameSettings>, sqlx::Error> {
    let stored: Option<Json<GameSettings>> =
        sqlx::query_scalar("SELECT settings FROM game_settings WHERE id = 1")
            .fetch_optional(pool)
            .await?;
    match stored {
        Some(Json(settings)) => {
            settings
                .validate()
                .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
            Ok(Some(settings))
        }
        None => Ok(None),
    }
}
