use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::database::{Match, MatchKind, MatchStatus, RatingHistoryEntry, Side};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitMatchRequest {
    pub match_kind: String,
    pub side_a: Vec<i64>,
    pub side_b: Vec<i64>,
    pub games_won_a: i32,
    pub games_won_b: i32,
    pub caller_id: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallerRequest {
    pub caller_id: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchListParams {
    pub player_id: i64,
    pub limit: Option<usize>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SideView {
    pub players: Vec<i64>,
    pub games_won: i32,
    pub rating_changes: Vec<Option<i32>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchView {
    pub id: i64,
    pub kind: MatchKind,
    pub status: MatchStatus,
    pub side_a: SideView,
    pub side_b: SideView,
    pub winning_side: String,
    pub submitted_by: i64,
    pub confirm_deadline: NaiveDateTime,
    pub confirmed_at: Option<NaiveDateTime>,
    pub created_at: Option<NaiveDateTime>,
}

impl From<Match> for MatchView {
    fn from(m: Match) -> Self {
        let side_a = SideView {
            players: m.roster(Side::A),
            games_won: m.games_won_a,
            rating_changes: side_changes(m.rating_change_a1, m.rating_change_a2, &m, Side::A),
        };
        let side_b = SideView {
            players: m.roster(Side::B),
            games_won: m.games_won_b,
            rating_changes: side_changes(m.rating_change_b1, m.rating_change_b2, &m, Side::B),
        };
        MatchView {
            id: m.id,
            kind: m.kind,
            status: m.status,
            winning_side: match m.winning_side() {
                Side::A => "A".to_string(),
                Side::B => "B".to_string(),
            },
            side_a,
            side_b,
            submitted_by: m.submitted_by,
            confirm_deadline: m.confirm_deadline,
            confirmed_at: m.confirmed_at,
            created_at: m.created_at,
        }
    }
}

fn side_changes(
    first: Option<i32>,
    second: Option<i32>,
    m: &Match,
    side: Side,
) -> Vec<Option<i32>> {
    let mut changes = vec![first];
    if m.roster(side).len() == 2 {
        changes.push(second);
    }
    changes
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerListItem {
    pub rank: usize,
    pub player_id: i64,
    pub name: String,
    pub rating: i32,
    pub matches_played: i32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerListResponse {
    pub items: Vec<PlayerListItem>,
    pub total: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingHistoryItem {
    pub match_id: i64,
    pub rating: i32,
    pub change: i32,
    pub recorded_at: Option<NaiveDateTime>,
}

impl From<RatingHistoryEntry> for RatingHistoryItem {
    fn from(entry: RatingHistoryEntry) -> Self {
        RatingHistoryItem {
            match_id: entry.match_id,
            rating: entry.rating,
            change: entry.change,
            recorded_at: entry.created_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDetail {
    pub player_id: i64,
    pub name: String,
    pub email: String,
    pub rating: i32,
    pub history: Vec<RatingHistoryItem>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub success: bool,
}
