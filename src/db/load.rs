use sqlx::PgPool;

use super::to_bigint;
use crate::model::World;

/// Load an entire `World` into Postgres using COPY FROM STDIN (text format).
///
/// Order respects FK constraints: alliances → players → votes → jobs.
pub async fn load_world(pool: &PgPool, world: &World) -> Result<(), sqlx::Error> {
    // Alliances
    {
        let mut buf = String::new();
        for a in world.alliances.values() {
            buf.push_str(&format!("{}\t{}\n", to_bigint(a.id.0)?, escape(&a.name)));
        }
        copy_in(pool, include_str!("../../sql/copy_alliances.sql"), &buf).await?;
    }

    // Players (after alliances due to FK)
    {
        let mut buf = String::new();
        for p in world.players.values() {
            buf.push_str(&format!(
                "{}\t{}\t{}\t{}\n",
                escape(p.id.as_str()),
                escape(&p.name),
                opt_bigint(p.alliance_id.map(|a| to_bigint(a.0)).transpose()?),
                p.land_holding,
            ));
        }
        copy_in(pool, include_str!("../../sql/copy_players.sql"), &buf).await?;
    }

    // Votes
    {
        let mut buf = String::new();
        for v in world.votes.values() {
            buf.push_str(&format!(
                "{}\t{}\t{}\n",
                escape(v.voter_id.as_str()),
                escape(v.candidate_id.as_str()),
                to_bigint(v.alliance_id.0)?,
            ));
        }
        copy_in(pool, include_str!("../../sql/copy_votes.sql"), &buf).await?;
    }

    // Jobs
    {
        let mut buf = String::new();
        for j in world.jobs.values() {
            let detail =
                serde_json::to_string(&j.kind).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;
            buf.push_str(&format!(
                "{}\t{}\t{}\t{}\t{}\t{}\n",
                to_bigint(j.id.0)?,
                escape(j.owner.as_str()),
                j.kind.as_str(),
                escape(&detail),
                to_bigint(j.queued_at.as_millis())?,
                to_bigint(j.completes_at.as_millis())?,
            ));
        }
        copy_in(pool, include_str!("../../sql/copy_jobs.sql"), &buf).await?;
    }

    tracing::info!(
        players = world.players.len(),
        alliances = world.alliances.len(),
        votes = world.votes.len(),
        jobs = world.jobs.len(),
        "world loaded into postgres"
    );
    Ok(())
}

/// Execute a COPY FROM STDIN with the given text-format payload.
async fn copy_in(pool: &PgPool, statement: &str, data: &str) -> Result<(), sqlx::Error> {
    let mut conn = pool.acquire().await?;
    let mut copy = conn.copy_in_raw(statement).await?;
    copy.send(data.as_bytes()).await?;
    copy.finish().await?;
    Ok(())
}

/// Escape a string for Postgres COPY text format.
/// Backslash must be escaped first, then the special whitespace characters.
fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out
}

/// Render an optional BIGINT as a COPY text value (`\N` for NULL).
fn opt_bigint(v: Option<i64>) -> String {
    match v {
        Some(n) => n.to_string(),
        None => "\\N".to_string(),
    }
}
