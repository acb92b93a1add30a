use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayerRole {
    Player,
    Admin,
}

impl PlayerRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerRole::Player => "PLAYER",
            PlayerRole::Admin => "ADMIN",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "PLAYER" => Some(PlayerRole::Player),
            "ADMIN" => Some(PlayerRole::Admin),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: PlayerRole,
    pub rating: i32,
    pub created_at: Option<NaiveDateTime>,
}

impl Player {
    pub fn is_admin(&self) -> bool {
        self.role == PlayerRole::Admin
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchKind {
    Singles,
    Doubles,
}

impl MatchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchKind::Singles => "SINGLES",
            MatchKind::Doubles => "DOUBLES",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "SINGLES" => Some(MatchKind::Singles),
            "DOUBLES" => Some(MatchKind::Doubles),
            _ => None,
        }
    }

    /// Required roster size per side.
    pub fn side_size(&self) -> usize {
        match self {
            MatchKind::Singles => 1,
            MatchKind::Doubles => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStatus {
    Pending,
    Confirmed,
    Rejected,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Pending => "PENDING",
            MatchStatus::Confirmed => "CONFIRMED",
            MatchStatus::Rejected => "REJECTED",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "PENDING" => Some(MatchStatus::Pending),
            "CONFIRMED" => Some(MatchStatus::Confirmed),
            "REJECTED" => Some(MatchStatus::Rejected),
            _ => None,
        }
    }
}

/// One of the two neutral rosters of a match. The winning side is always
/// derived from the series score, never stored as a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn other(&self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Match {
    pub id: i64,
    pub kind: MatchKind,
    pub side_a_player1: i64,
    pub side_a_player2: Option<i64>,
    pub side_b_player1: i64,
    pub side_b_player2: Option<i64>,
    pub games_won_a: i32,
    pub games_won_b: i32,
    pub status: MatchStatus,
    pub submitted_by: i64,
    pub confirm_deadline: NaiveDateTime,
    pub confirmed_at: Option<NaiveDateTime>,
    pub rating_change_a1: Option<i32>,
    pub rating_change_a2: Option<i32>,
    pub rating_change_b1: Option<i32>,
    pub rating_change_b2: Option<i32>,
    pub created_at: Option<NaiveDateTime>,
}

impl Match {
    /// The side that took more games in the series. A tied series counts
    /// for side B, matching what the submission flow has always produced.
    pub fn winning_side(&self) -> Side {
        if self.games_won_a > self.games_won_b {
            Side::A
        } else {
            Side::B
        }
    }

    pub fn roster(&self, side: Side) -> Vec<i64> {
        let (first, second) = match side {
            Side::A => (self.side_a_player1, self.side_a_player2),
            Side::B => (self.side_b_player1, self.side_b_player2),
        };
        let mut ids = vec![first];
        ids.extend(second);
        ids
    }

    pub fn games_won(&self, side: Side) -> i32 {
        match side {
            Side::A => self.games_won_a,
            Side::B => self.games_won_b,
        }
    }

    pub fn participant_ids(&self) -> Vec<i64> {
        let mut ids = self.roster(Side::A);
        ids.extend(self.roster(Side::B));
        ids
    }

    pub fn is_participant(&self, player_id: i64) -> bool {
        self.participant_ids().contains(&player_id)
    }
}

#[derive(Debug, Clone)]
pub struct RatingHistoryEntry {
    pub id: i64,
    pub player_id: i64,
    pub match_id: i64,
    pub rating: i32,
    pub change: i32,
    pub created_at: Option<NaiveDateTime>,
}

// DTO for the leaderboard query (players joined with match counts)
#[derive(Debug, Clone)]
pub struct PlayerStanding {
    pub player_id: i64,
    pub name: String,
    pub rating: i32,
    pub matches_played: i32,
}
