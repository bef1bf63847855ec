use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::models::notifications::{NewNotification, NotificationType, RelatedKind};
use crate::models::submissions::SubmissionStatus;

/// Facts published after a state change has committed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    ContestLive {
        contest_id: Uuid,
        title: String,
        prize: f64,
    },
    ApplicationApproved {
        application_id: Uuid,
        contest_id: Uuid,
        creator_id: Uuid,
        contest_title: String,
    },
    ApplicationRejected {
        application_id: Uuid,
        contest_id: Uuid,
        creator_id: Uuid,
        contest_title: String,
    },
    SubmissionCreated {
        submission_id: Uuid,
        contest_id: Uuid,
        brand_id: Uuid,
        contest_title: String,
        creator_name: String,
    },
    SubmissionFeedback {
        submission_id: Uuid,
        creator_id: Uuid,
        contest_title: String,
        status: SubmissionStatus,
    },
    /// The winner gets `winner_chosen`; everyone in `other_creator_ids` gets
    /// `contest_closed`.
    WinnerChosen {
        contest_id: Uuid,
        contest_title: String,
        submission_id: Uuid,
        winner_id: Uuid,
        prize: f64,
        other_creator_ids: Vec<Uuid>,
    },
}

/// Who an event is delivered to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Audience {
    /// Every active creator account.
    AllCreators,
    Users(Vec<Uuid>),
}

impl DomainEvent {
    pub fn audience(&self) -> Audience {
        match self {
            DomainEvent::ContestLive { .. } => Audience::AllCreators,
            DomainEvent::ApplicationApproved { creator_id, .. }
            | DomainEvent::ApplicationRejected { creator_id, .. }
            | DomainEvent::SubmissionFeedback { creator_id, .. } => {
                Audience::Users(vec![*creator_id])
            }
            DomainEvent::SubmissionCreated { brand_id, .. } => Audience::Users(vec![*brand_id]),
            DomainEvent::WinnerChosen {
                winner_id,
                other_creator_ids,
                ..
            } => {
                let mut ids = vec![*winner_id];
                ids.extend(other_creator_ids.iter().filter(|id| *id != winner_id));
                Audience::Users(ids)
            }
        }
    }

    /// The in-app notification `recipient_id` should see for this event.
    pub fn render(&self, recipient_id: Uuid) -> NewNotification {
        let (notification_type, title, message, related) = match self {
            DomainEvent::ContestLive {
                contest_id,
                title,
                prize,
            } => (
                NotificationType::NewContest,
                "New contest is live".to_string(),
                format!("\"{title}\" is now accepting entries. Prize: ${prize:.2}"),
                (RelatedKind::Contest, *contest_id),
            ),
            DomainEvent::ApplicationApproved {
                application_id,
                contest_title,
                ..
            } => (
                NotificationType::ApplicationApproved,
                "Application approved".to_string(),
                format!("Your application to \"{contest_title}\" was approved. You can now submit."),
                (RelatedKind::Application, *application_id),
            ),
            DomainEvent::ApplicationRejected {
                application_id,
                contest_title,
                ..
            } => (
                NotificationType::ApplicationRejected,
                "Application not accepted".to_string(),
                format!("Your application to \"{contest_title}\" was not accepted."),
                (RelatedKind::Application, *application_id),
            ),
            DomainEvent::SubmissionCreated {
                submission_id,
                contest_title,
                creator_name,
                ..
            } => (
                NotificationType::NewSubmission,
                "New submission".to_string(),
                format!("{creator_name} submitted an entry to \"{contest_title}\"."),
                (RelatedKind::Submission, *submission_id),
            ),
            DomainEvent::SubmissionFeedback {
                submission_id,
                contest_title,
                status,
                ..
            } => {
                let verdict = match status {
                    SubmissionStatus::Approved => "approved",
                    SubmissionStatus::Rejected => "rejected",
                    _ => "reviewed",
                };
                (
                    NotificationType::SubmissionFeedback,
                    "Feedback on your submission".to_string(),
                    format!("Your entry to \"{contest_title}\" was {verdict}."),
                    (RelatedKind::Submission, *submission_id),
                )
            }
            DomainEvent::WinnerChosen {
                contest_id,
                contest_title,
                submission_id,
                winner_id,
                prize,
                ..
            } => {
                if recipient_id == *winner_id {
                    (
                        NotificationType::WinnerChosen,
                        "You won!".to_string(),
                        format!("Your entry won \"{contest_title}\". Prize: ${prize:.2}"),
                        (RelatedKind::Submission, *submission_id),
                    )
                } else {
                    (
                        NotificationType::ContestClosed,
                        "Contest closed".to_string(),
                        format!("\"{contest_title}\" has ended and a winner was chosen."),
                        (RelatedKind::Contest, *contest_id),
                    )
                }
            }
        };

        NewNotification {
            recipient_id,
            notification_type,
            title,
            message,
            related: Some(related),
        }
    }

    /// SMS text for opted-in recipients; `None` for in-app only events.
    pub fn sms_text(&self, recipient_id: Uuid) -> Option<String> {
        match self {
            DomainEvent::ContestLive { title, prize, .. } => Some(format!(
                "New contest \"{title}\" is live. Prize: ${prize:.2}"
            )),
            DomainEvent::ApplicationApproved { contest_title, .. } => Some(format!(
                "You're in! Your application to \"{contest_title}\" was approved."
            )),
            DomainEvent::WinnerChosen {
                contest_title,
                winner_id,
                ..
            } if *winner_id == recipient_id => {
                Some(format!("Congratulations, you won \"{contest_title}\"!"))
            }
            _ => None,
        }
    }
}

/// Sender half of the in-process event queue.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: mpsc::UnboundedSender<DomainEvent>,
}

impl EventBus {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<DomainEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    /// Never blocks and never fails the caller; a stopped worker is logged.
    pub fn publish(&self, event: DomainEvent) {
        if let Err(e) = self.sender.send(event) {
            tracing::warn!("Event dropped, dispatcher is not running: {:?}", e.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn winner_event(winner: Uuid, others: Vec<Uuid>) -> DomainEvent {
        DomainEvent::WinnerChosen {
            contest_id: Uuid::new_v4(),
            contest_title: "Spring reel".into(),
            submission_id: Uuid::new_v4(),
            winner_id: winner,
            prize: 250.0,
            other_creator_ids: others,
        }
    }

    #[test]
    fn winner_and_runners_up_get_different_notifications() {
        let winner = Uuid::new_v4();
        let other = Uuid::new_v4();
        let event = winner_event(winner, vec![other]);

        assert_eq!(event.audience(), Audience::Users(vec![winner, other]));
        assert_eq!(
            event.render(winner).notification_type,
            NotificationType::WinnerChosen
        );
        assert_eq!(
            event.render(other).notification_type,
            NotificationType::ContestClosed
        );
        assert!(event.sms_text(winner).is_some());
        assert!(event.sms_text(other).is_none());
    }

    #[test]
    fn contest_live_goes_to_all_creators() {
        let event = DomainEvent::ContestLive {
            contest_id: Uuid::new_v4(),
            title: "Night city".into(),
            prize: 1000.0,
        };
        assert_eq!(event.audience(), Audience::AllCreators);
        let n = event.render(Uuid::new_v4());
        assert_eq!(n.message, "\"Night city\" is now accepting entries. Prize: $1000.00");
        assert!(matches!(n.related, Some((RelatedKind::Contest, _))));
    }

    #[test]
    fn events_serialize_with_a_type_tag() {
        let event = DomainEvent::ApplicationRejected {
            application_id: Uuid::nil(),
            contest_id: Uuid::nil(),
            creator_id: Uuid::nil(),
            contest_title: "x".into(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "application_rejected");
    }

    #[tokio::test]
    async fn publish_after_receiver_dropped_does_not_panic() {
        let (bus, rx) = EventBus::new();
        drop(rx);
        bus.publish(DomainEvent::ContestLive {
            contest_id: Uuid::nil(),
            title: "t".into(),
            prize: 1.0,
        });
    }
}
