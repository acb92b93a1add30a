use rusqlite::Connection;

use crate::database::{history, matches, players, DbConn, Match, MatchStatus};
use crate::engine::Caller;
use crate::errors::EngineError;

/// Admin-only inverse of settlement: restores each participant's rating to
/// its pre-match value (current rating minus this match's stored delta),
/// deletes the match's rating-history rows, then the match itself. The
/// restored value is only exact while this is the player's most recently
/// settled match; interleaved later settlements are not reconciled.
pub fn revert(conn: &mut DbConn, match_id: i64, caller: &Caller) -> Result<(), EngineError> {
    if !caller.is_admin {
        return Err(EngineError::Authorization(
            "Only administrators can revert matches".to_string(),
        ));
    }

    let tx = conn.transaction().map_err(EngineError::from)?;
    revert_in_tx(&tx, match_id)?;
    tx.commit().map_err(EngineError::from)?;
    log::info!("Match {} reverted by admin {}", match_id, caller.id);
    Ok(())
}

fn revert_in_tx(tx: &Connection, match_id: i64) -> Result<(), EngineError> {
    let m = matches::get_by_id(tx, match_id)?
        .ok_or_else(|| EngineError::NotFound(format!("Match {match_id} not found")))?;

    if m.status != MatchStatus::Confirmed {
        return Err(EngineError::Conflict(format!(
            "Match {match_id} is not confirmed"
        )));
    }

    for (player_id, delta) in slot_deltas(&m)? {
        let player = players::get_by_id(tx, player_id)?
            .ok_or_else(|| EngineError::NotFound(format!("Player {player_id} not found")))?;
        players::update_rating(tx, player_id, player.rating - delta)?;
    }

    history::delete_by_match(tx, match_id)?;
    matches::delete(tx, match_id)?;
    Ok(())
}

fn slot_deltas(m: &Match) -> Result<Vec<(i64, i32)>, EngineError> {
    let stored = [
        (Some(m.side_a_player1), m.rating_change_a1),
        (m.side_a_player2, m.rating_change_a2),
        (Some(m.side_b_player1), m.rating_change_b1),
        (m.side_b_player2, m.rating_change_b2),
    ];

    let mut deltas = Vec::new();
    for (player_id, change) in stored {
        if let Some(player_id) = player_id {
            let change = change.ok_or_else(|| {
                EngineError::Persistence(format!(
                    "Confirmed match {} has no stored rating change for player {}",
                    m.id, player_id
                ))
            })?;
            deltas.push((player_id, change));
        }
    }
    Ok(deltas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{self, MatchKind};
    use crate::engine::testutil::{add_player, at, settings, test_pool};
    use crate::engine::{confirm, submit, Caller, SubmitParams};

    fn confirmed_match(name: &str) -> (database::DbPool, i64, i64, i64) {
        let pool = test_pool(name);
        let alice = add_player(&pool, "alice");
        let bob = add_player(&pool, "bob");
        let mut conn = database::get_connection(&pool).unwrap();
        let m = submit(
            &mut conn,
            &SubmitParams {
                kind: MatchKind::Singles,
                side_a: vec![alice.id],
                side_b: vec![bob.id],
                games_won_a: 3,
                games_won_b: 1,
            },
            &Caller::player(alice.id),
            at("2026-08-01 10:00:00"),
            &settings(),
        )
        .unwrap();
        confirm(
            &mut conn,
            m.id,
            &Caller::player(bob.id),
            at("2026-08-01 12:00:00"),
            &settings(),
        )
        .unwrap();
        (pool, m.id, alice.id, bob.id)
    }

    #[test]
    fn revert_restores_prior_ratings() {
        let (pool, match_id, alice_id, bob_id) = confirmed_match("revert_restores");
        let mut conn = database::get_connection(&pool).unwrap();

        revert(&mut conn, match_id, &Caller::admin(999)).unwrap();

        for id in [alice_id, bob_id] {
            let p = database::players::get_by_id(&conn, id).unwrap().unwrap();
            assert_eq!(p.rating, 1500, "rating must return to its pre-match value");
            assert!(database::history::list_by_player(&conn, id).unwrap().is_empty());
        }
        assert!(database::matches::get_by_id(&conn, match_id).unwrap().is_none());
    }

    #[test]
    fn reverted_match_is_gone_for_good() {
        let (pool, match_id, _, bob_id) = confirmed_match("revert_gone");
        let mut conn = database::get_connection(&pool).unwrap();

        revert(&mut conn, match_id, &Caller::admin(999)).unwrap();

        let again = revert(&mut conn, match_id, &Caller::admin(999));
        assert!(matches!(again, Err(EngineError::NotFound(_))));

        let confirm_again = confirm(
            &mut conn,
            match_id,
            &Caller::player(bob_id),
            at("2026-08-02 10:00:00"),
            &settings(),
        );
        assert!(matches!(confirm_again, Err(EngineError::NotFound(_))));
    }

    #[test]
    fn non_admin_cannot_revert() {
        let (pool, match_id, alice_id, _) = confirmed_match("revert_forbidden");
        let mut conn = database::get_connection(&pool).unwrap();

        let result = revert(&mut conn, match_id, &Caller::player(alice_id));
        assert!(matches!(result, Err(EngineError::Authorization(_))));
    }

    #[test]
    fn pending_match_cannot_be_reverted() {
        let pool = test_pool("revert_pending");
        let alice = add_player(&pool, "alice");
        let bob = add_player(&pool, "bob");
        let mut conn = database::get_connection(&pool).unwrap();
        let m = submit(
            &mut conn,
            &SubmitParams {
                kind: MatchKind::Singles,
                side_a: vec![alice.id],
                side_b: vec![bob.id],
                games_won_a: 2,
                games_won_b: 0,
            },
            &Caller::player(alice.id),
            at("2026-08-01 10:00:00"),
            &settings(),
        )
        .unwrap();

        let result = revert(&mut conn, m.id, &Caller::admin(999));
        assert!(matches!(result, Err(EngineError::Conflict(_))));
    }

    #[test]
    fn rating_invariant_holds_after_settles_and_revert() {
        let pool = test_pool("revert_invariant");
        let alice = add_player(&pool, "alice");
        let bob = add_player(&pool, "bob");
        let carol = add_player(&pool, "carol");
        let mut conn = database::get_connection(&pool).unwrap();
        let s = settings();

        let m1 = submit(
            &mut conn,
            &SubmitParams {
                kind: MatchKind::Singles,
                side_a: vec![alice.id],
                side_b: vec![bob.id],
                games_won_a: 3,
                games_won_b: 1,
            },
            &Caller::player(alice.id),
            at("2026-08-01 10:00:00"),
            &s,
        )
        .unwrap();
        confirm(&mut conn, m1.id, &Caller::player(bob.id), at("2026-08-01 11:00:00"), &s).unwrap();

        let m2 = submit(
            &mut conn,
            &SubmitParams {
                kind: MatchKind::Singles,
                side_a: vec![bob.id],
                side_b: vec![carol.id],
                games_won_a: 2,
                games_won_b: 3,
            },
            &Caller::player(bob.id),
            at("2026-08-02 10:00:00"),
            &s,
        )
        .unwrap();
        confirm(&mut conn, m2.id, &Caller::player(carol.id), at("2026-08-02 11:00:00"), &s).unwrap();

        revert(&mut conn, m2.id, &Caller::admin(999)).unwrap();

        // Current rating must equal 1500 plus the sum of surviving history
        // deltas for every player.
        for id in [alice.id, bob.id, carol.id] {
            let p = database::players::get_by_id(&conn, id).unwrap().unwrap();
            let net = database::history::sum_changes_for_player(&conn, id).unwrap();
            assert_eq!(p.rating, 1500 + net);
        }
    }
}
