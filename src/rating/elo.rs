//! ELO rating updates for best-of-N series.
//!
//! New Rating = Old Rating + K * (Actual Score - Expected Win Probability),
//! Expected Win Probability = 1 / (1 + 10^((Opponent - You) / 400)).
//!
//! Each game in a series is one independent update applied sequentially:
//! all games taken by the winning side first, then the games the losing
//! side took, recomputing the expectation from the already-updated ratings
//! before every game. Deltas are rounded to integers per game, so the
//! compounding is deliberately path dependent.
//!
//! Doubles use the side's average rating for the expectation, but the
//! absolute delta is added to each teammate individually.

use super::types::{SeriesOutcome, SideOutcome};

pub const DEFAULT_K_FACTOR: f64 = 32.0;

/// Win probability of a `rating`-rated side against an `opponent`-rated one.
pub fn expected_score(rating: f64, opponent: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf((opponent - rating) / 400.0))
}

/// Computes the settlement outcome for a series. `winner_ratings` and
/// `loser_ratings` hold 1 (singles) or 2 (doubles) before-ratings per side;
/// `games_won` is the winning side's game count, `games_lost` the other
/// side's. The caller guarantees `games_won + games_lost > 0`.
pub fn compute_ratings(
    winner_ratings: &[i32],
    loser_ratings: &[i32],
    games_won: i32,
    games_lost: i32,
    k_factor: f64,
) -> SeriesOutcome {
    let mut winners: Vec<i32> = winner_ratings.to_vec();
    let mut losers: Vec<i32> = loser_ratings.to_vec();
    let mut winner_total = 0;
    let mut loser_total = 0;

    for _ in 0..games_won {
        let (w, l) = game_deltas(&winners, &losers, true, k_factor);
        apply_delta(&mut winners, w);
        apply_delta(&mut losers, l);
        winner_total += w;
        loser_total += l;
    }

    for _ in 0..games_lost {
        let (w, l) = game_deltas(&winners, &losers, false, k_factor);
        apply_delta(&mut winners, w);
        apply_delta(&mut losers, l);
        winner_total += w;
        loser_total += l;
    }

    SeriesOutcome {
        winners: SideOutcome {
            deltas: winners
                .iter()
                .map(|_| winner_total)
                .collect(),
            new_ratings: winners,
        },
        losers: SideOutcome {
            deltas: losers.iter().map(|_| loser_total).collect(),
            new_ratings: losers,
        },
    }
}

/// Per-game deltas for both sides, from the sides' current average ratings.
fn game_deltas(
    winners: &[i32],
    losers: &[i32],
    winners_took_game: bool,
    k_factor: f64,
) -> (i32, i32) {
    let winner_avg = side_average(winners);
    let loser_avg = side_average(losers);

    let expected_winner = expected_score(winner_avg, loser_avg);
    let expected_loser = expected_score(loser_avg, winner_avg);

    let (winner_score, loser_score) = if winners_took_game {
        (1.0, 0.0)
    } else {
        (0.0, 1.0)
    };

    let winner_delta = (k_factor * (winner_score - expected_winner)).round() as i32;
    let loser_delta = (k_factor * (loser_score - expected_loser)).round() as i32;
    (winner_delta, loser_delta)
}

fn side_average(ratings: &[i32]) -> f64 {
    ratings.iter().sum::<i32>() as f64 / ratings.len() as f64
}

fn apply_delta(ratings: &mut [i32], delta: i32) {
    for rating in ratings {
        *rating += delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_ratings_single_game() {
        // expected = 0.5, round(32 * 0.5) = 16
        let outcome = compute_ratings(&[1500], &[1500], 1, 0, DEFAULT_K_FACTOR);
        assert_eq!(outcome.winners.new_ratings, vec![1516]);
        assert_eq!(outcome.winners.deltas, vec![16]);
        assert_eq!(outcome.losers.new_ratings, vec![1484]);
        assert_eq!(outcome.losers.deltas, vec![-16]);
    }

    #[test]
    fn single_game_is_zero_sum() {
        for (a, b) in [(1500, 1500), (1600, 1400), (1487, 1523), (1800, 1200)] {
            let outcome = compute_ratings(&[a], &[b], 1, 0, DEFAULT_K_FACTOR);
            assert_eq!(
                outcome.winners.deltas[0], -outcome.losers.deltas[0],
                "asymmetric deltas for {a} vs {b}"
            );
        }
    }

    #[test]
    fn hundred_point_gap_expectation() {
        let expected = expected_score(1600.0, 1500.0);
        assert!((expected - 0.64).abs() < 0.01);
    }

    #[test]
    fn favorite_gains_less_than_underdog() {
        let favorite = compute_ratings(&[1700], &[1300], 1, 0, DEFAULT_K_FACTOR);
        let underdog = compute_ratings(&[1300], &[1700], 1, 0, DEFAULT_K_FACTOR);
        assert!(favorite.winners.deltas[0] < 16);
        assert!(underdog.winners.deltas[0] > 16);
    }

    #[test]
    fn series_three_one_from_equal_ratings() {
        // Sequential compounding, winner's games first:
        // +16 (1500/1500), +15 (1516/1484), +13 (1531/1469), then the
        // loser's game at 1544/1456 swings 20 back.
        let outcome = compute_ratings(&[1500], &[1500], 3, 1, DEFAULT_K_FACTOR);
        assert_eq!(outcome.winners.new_ratings, vec![1524]);
        assert_eq!(outcome.winners.deltas, vec![24]);
        assert_eq!(outcome.losers.new_ratings, vec![1476]);
        assert_eq!(outcome.losers.deltas, vec![-24]);
    }

    #[test]
    fn doubles_side_average_matches_singles() {
        let singles = compute_ratings(&[1500], &[1500], 2, 1, DEFAULT_K_FACTOR);
        let doubles = compute_ratings(&[1500, 1500], &[1600, 1400], 2, 1, DEFAULT_K_FACTOR);

        // Same side averages, so the per-game deltas are identical and both
        // teammates move together from their own starting points.
        assert_eq!(doubles.winners.deltas[0], singles.winners.deltas[0]);
        assert_eq!(doubles.winners.deltas[1], singles.winners.deltas[0]);
        assert_eq!(doubles.losers.deltas[0], singles.losers.deltas[0]);
        assert_eq!(doubles.losers.deltas[1], singles.losers.deltas[0]);
        assert_eq!(
            doubles.losers.new_ratings,
            vec![1600 + singles.losers.deltas[0], 1400 + singles.losers.deltas[0]]
        );
    }

    #[test]
    fn teammates_always_move_together() {
        let outcome = compute_ratings(&[1650, 1450], &[1500, 1580], 3, 2, DEFAULT_K_FACTOR);
        assert_eq!(outcome.winners.deltas[0], outcome.winners.deltas[1]);
        assert_eq!(outcome.losers.deltas[0], outcome.losers.deltas[1]);
    }

    #[test]
    fn custom_k_factor_scales_change() {
        let outcome = compute_ratings(&[1500], &[1500], 1, 0, 16.0);
        assert_eq!(outcome.winners.deltas, vec![8]);
        assert_eq!(outcome.losers.deltas, vec![-8]);
    }
}
