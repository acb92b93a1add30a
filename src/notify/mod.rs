//! Best-effort notification sink. Delivery is a collaborator concern; the
//! engine only hands over a structured payload after a successful commit.
//! Failures are swallowed here and must never reach the caller.

use crate::database::MatchKind;

#[derive(Debug, Clone)]
pub struct MatchNotification {
    pub kind: MatchKind,
    pub submitter_name: String,
    pub side_a_names: Vec<String>,
    pub side_b_names: Vec<String>,
    pub games_won_a: i32,
    pub games_won_b: i32,
}

impl MatchNotification {
    pub fn description(&self) -> String {
        format!(
            "{} vs {}",
            self.side_a_names.join(" & "),
            self.side_b_names.join(" & ")
        )
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, payload: &MatchNotification, recipients: &[String]);
}

/// Default sink: writes the notification to the log. Stands in for real
/// delivery (e-mail, chat) in deployments that have none configured.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, payload: &MatchNotification, recipients: &[String]) {
        log::info!(
            "Match result pending confirmation: {} ({}-{}), submitted by {}, notifying {}",
            payload.description(),
            payload.games_won_a,
            payload.games_won_b,
            payload.submitter_name,
            recipients.join(", ")
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_covers_both_sides() {
        let payload = MatchNotification {
            kind: MatchKind::Doubles,
            submitter_name: "alice".into(),
            side_a_names: vec!["alice".into(), "bob".into()],
            side_b_names: vec!["carol".into(), "dave".into()],
            games_won_a: 3,
            games_won_b: 2,
        };
        assert_eq!(payload.description(), "alice & bob vs carol & dave");
    }
}
