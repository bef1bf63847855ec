//! Event fan-out into stored notifications, and the read/unread flow.
mod common;

use common::*;
use contest_backend::db::notifications as notification_db;
use contest_backend::error::AppError;
use contest_backend::events::{DomainEvent, EventBus};
use contest_backend::models::notifications::{NewNotification, NotificationType, RelatedKind};
use contest_backend::models::users::Roles;
use contest_backend::notify::NotificationDispatcher;
use contest_backend::notify::sms::SmsClient;
use uuid::Uuid;

fn dispatcher(db: &sea_orm::DatabaseConnection) -> NotificationDispatcher {
    NotificationDispatcher::new(db.clone(), SmsClient::disabled())
}

#[tokio::test]
async fn contest_live_reaches_every_creator() {
    let db = setup_db().await;
    let first = create_user(&db, Roles::Creator).await;
    let second = create_user(&db, Roles::Creator).await;
    let brand = create_user(&db, Roles::Brand).await;
    let contest_id = Uuid::new_v4();

    let written = dispatcher(&db)
        .handle(&DomainEvent::ContestLive {
            contest_id,
            title: "Autumn looks".into(),
            prize: 250.0,
        })
        .await;
    assert_eq!(written, 2);

    for creator in [&first, &second] {
        let inbox = notification_db::list_for_recipient(&db, creator.id, false)
            .await
            .unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].notification_type, NotificationType::NewContest);
        assert_eq!(inbox[0].related_kind, Some(RelatedKind::Contest));
        assert_eq!(inbox[0].related_id, Some(contest_id));
    }
    let brand_inbox = notification_db::list_for_recipient(&db, brand.id, false)
        .await
        .unwrap();
    assert!(brand_inbox.is_empty());
}

#[tokio::test]
async fn winner_and_others_get_different_notifications() {
    let db = setup_db().await;
    let winner = create_user(&db, Roles::Creator).await;
    let other = create_user(&db, Roles::Creator).await;

    let written = dispatcher(&db)
        .handle(&DomainEvent::WinnerChosen {
            contest_id: Uuid::new_v4(),
            contest_title: "Autumn looks".into(),
            submission_id: Uuid::new_v4(),
            winner_id: winner.id,
            prize: 250.0,
            other_creator_ids: vec![other.id],
        })
        .await;
    assert_eq!(written, 2);

    let winner_inbox = notification_db::list_for_recipient(&db, winner.id, false)
        .await
        .unwrap();
    assert_eq!(winner_inbox[0].notification_type, NotificationType::WinnerChosen);
    let other_inbox = notification_db::list_for_recipient(&db, other.id, false)
        .await
        .unwrap();
    assert_eq!(other_inbox[0].notification_type, NotificationType::ContestClosed);
}

#[tokio::test]
async fn spawned_dispatcher_drains_the_bus() {
    let db = setup_db().await;
    let creator = create_user(&db, Roles::Creator).await;

    let (bus, receiver) = EventBus::new();
    let handle = dispatcher(&db).spawn(receiver);
    bus.publish(DomainEvent::ApplicationApproved {
        application_id: Uuid::new_v4(),
        contest_id: Uuid::new_v4(),
        creator_id: creator.id,
        contest_title: "Autumn looks".into(),
    });
    // Closing the channel lets the worker finish once it has drained.
    drop(bus);
    handle.await.unwrap();

    let inbox = notification_db::list_for_recipient(&db, creator.id, true)
        .await
        .unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].notification_type, NotificationType::ApplicationApproved);
}

#[tokio::test]
async fn broadcast_targets_one_role() {
    let db = setup_db().await;
    create_user(&db, Roles::Brand).await;
    create_user(&db, Roles::Brand).await;
    let creator = create_user(&db, Roles::Creator).await;

    let sent = dispatcher(&db)
        .broadcast(
            Roles::Brand,
            NewNotification {
                recipient_id: Uuid::nil(),
                notification_type: NotificationType::NewContest,
                title: "Maintenance".into(),
                message: "Back in an hour".into(),
                related: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(sent, 2);

    let inbox = notification_db::list_for_recipient(&db, creator.id, false)
        .await
        .unwrap();
    assert!(inbox.is_empty());
}

#[tokio::test]
async fn marking_read() {
    let db = setup_db().await;
    let owner = create_user(&db, Roles::Creator).await;
    let stranger = create_user(&db, Roles::Creator).await;

    let mut ids = Vec::new();
    for n in 0..3 {
        let notification = notification_db::insert_notification(
            &db,
            NewNotification {
                recipient_id: owner.id,
                notification_type: NotificationType::SubmissionFeedback,
                title: format!("Update {n}"),
                message: "Your entry was reviewed".into(),
                related: None,
            },
        )
        .await
        .unwrap();
        ids.push(notification.id);
    }

    // Someone else's notification looks like it does not exist.
    let err = notification_db::mark_read(&db, stranger.id, ids[0])
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let read = notification_db::mark_read(&db, owner.id, ids[0]).await.unwrap();
    assert!(read.is_read);
    let unread = notification_db::list_for_recipient(&db, owner.id, true)
        .await
        .unwrap();
    assert_eq!(unread.len(), 2);

    assert_eq!(notification_db::mark_all_read(&db, owner.id).await.unwrap(), 2);
    assert_eq!(notification_db::mark_all_read(&db, owner.id).await.unwrap(), 0);
}
