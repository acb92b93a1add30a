use chrono::NaiveDateTime;
use serde::Serialize;

use crate::config::settings::RatingSettings;
use crate::database::{matches, DbConn};
use crate::engine::settlement;
use crate::errors::EngineError;

#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepReport {
    pub confirmed_count: usize,
    pub failed_count: usize,
    pub total_checked: usize,
}

/// Settles every PENDING match whose confirmation deadline has elapsed.
/// `now` comes from the external trigger (cron endpoint or CLI), never
/// from an internal clock, so runs are reproducible. One match's failure
/// is logged and counted without stopping the batch; a match settled
/// concurrently between the scan and the attempt surfaces as a conflict
/// and lands in `failed_count`.
pub fn sweep(
    conn: &mut DbConn,
    now: NaiveDateTime,
    settings: &RatingSettings,
) -> Result<SweepReport, EngineError> {
    let due = matches::list_pending_past_deadline(conn, now)?;
    if due.is_empty() {
        return Ok(SweepReport::default());
    }

    log::info!("Auto-confirming {} expired matches", due.len());

    let mut confirmed_count = 0;
    let mut failed_count = 0;
    for &match_id in &due {
        match settlement::settle(conn, match_id, now, settings) {
            Ok(_) => {
                confirmed_count += 1;
                log::info!("Auto-confirmed match {match_id}");
            }
            Err(err) => {
                failed_count += 1;
                log::error!("Failed to auto-confirm match {match_id}: {err}");
            }
        }
    }

    Ok(SweepReport {
        confirmed_count,
        failed_count,
        total_checked: due.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{self, MatchKind, MatchStatus};
    use crate::engine::testutil::{add_player, at, settings, test_pool};
    use crate::engine::{submit, Caller, SubmitParams};

    fn submit_match(
        conn: &mut DbConn,
        a: i64,
        b: i64,
        submitted_at: &str,
    ) -> crate::database::Match {
        submit(
            conn,
            &SubmitParams {
                kind: MatchKind::Singles,
                side_a: vec![a],
                side_b: vec![b],
                games_won_a: 2,
                games_won_b: 1,
            },
            &Caller::player(a),
            at(submitted_at),
            &settings(),
        )
        .unwrap()
    }

    #[test]
    fn settles_only_past_deadline_matches() {
        let pool = test_pool("sweep_deadline");
        let alice = add_player(&pool, "alice");
        let bob = add_player(&pool, "bob");
        let carol = add_player(&pool, "carol");
        let dave = add_player(&pool, "dave");
        let mut conn = database::get_connection(&pool).unwrap();

        // Deadline = submission + 48h
        let expired = submit_match(&mut conn, alice.id, bob.id, "2026-08-01 10:00:00");
        let fresh = submit_match(&mut conn, carol.id, dave.id, "2026-08-03 09:00:00");

        let report = sweep(&mut conn, at("2026-08-03 12:00:00"), &settings()).unwrap();

        assert_eq!(report.total_checked, 1);
        assert_eq!(report.confirmed_count, 1);
        assert_eq!(report.failed_count, 0);

        let expired = database::matches::get_by_id(&conn, expired.id).unwrap().unwrap();
        assert_eq!(expired.status, MatchStatus::Confirmed);
        let fresh = database::matches::get_by_id(&conn, fresh.id).unwrap().unwrap();
        assert_eq!(fresh.status, MatchStatus::Pending);
    }

    #[test]
    fn sweep_is_idempotent() {
        let pool = test_pool("sweep_idempotent");
        let alice = add_player(&pool, "alice");
        let bob = add_player(&pool, "bob");
        let mut conn = database::get_connection(&pool).unwrap();

        submit_match(&mut conn, alice.id, bob.id, "2026-08-01 10:00:00");

        let first = sweep(&mut conn, at("2026-08-04 10:00:00"), &settings()).unwrap();
        assert_eq!(first.confirmed_count, 1);

        let second = sweep(&mut conn, at("2026-08-04 11:00:00"), &settings()).unwrap();
        assert_eq!(second.total_checked, 0);
        assert_eq!(second.confirmed_count, 0);

        let alice = database::players::get_by_id(&conn, alice.id).unwrap().unwrap();
        let rows = database::history::list_by_player(&conn, alice.id).unwrap();
        assert_eq!(rows.len(), 1, "one sweep, one history row");
        assert_eq!(alice.rating, 1500 + rows[0].change);
    }

    #[test]
    fn one_broken_match_does_not_stop_the_batch() {
        let pool = test_pool("sweep_partial");
        let alice = add_player(&pool, "alice");
        let bob = add_player(&pool, "bob");
        let carol = add_player(&pool, "carol");
        let dave = add_player(&pool, "dave");
        let mut conn = database::get_connection(&pool).unwrap();

        let broken = submit_match(&mut conn, alice.id, bob.id, "2026-08-01 10:00:00");
        let healthy = submit_match(&mut conn, carol.id, dave.id, "2026-08-01 11:00:00");

        // Remove a participant out from under the first match; its
        // settlement now fails while the second must still go through.
        // The bundled SQLite enforces foreign keys by default, so the
        // pragma is toggled off just for this corrupting setup step.
        conn.pragma_update(None, "foreign_keys", false).unwrap();
        conn.execute("DELETE FROM players WHERE id = ?1", rusqlite::params![bob.id])
            .unwrap();
        conn.pragma_update(None, "foreign_keys", true).unwrap();

        let report = sweep(&mut conn, at("2026-08-05 10:00:00"), &settings()).unwrap();

        assert_eq!(report.total_checked, 2);
        assert_eq!(report.confirmed_count, 1);
        assert_eq!(report.failed_count, 1);

        let broken = database::matches::get_by_id(&conn, broken.id).unwrap().unwrap();
        assert_eq!(broken.status, MatchStatus::Pending, "failed match stays retryable");
        let healthy = database::matches::get_by_id(&conn, healthy.id).unwrap().unwrap();
        assert_eq!(healthy.status, MatchStatus::Confirmed);
    }

    #[test]
    fn empty_database_sweeps_clean() {
        let pool = test_pool("sweep_empty");
        let mut conn = database::get_connection(&pool).unwrap();
        let report = sweep(&mut conn, at("2026-08-05 10:00:00"), &settings()).unwrap();
        assert_eq!(report.total_checked, 0);
        assert_eq!(report.confirmed_count, 0);
        assert_eq!(report.failed_count, 0);
    }
}
