use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use pubhub::{EventKind, HubError, ProgramEvent, Pubkey, Publication, PublishMode, TryRecvError};
use rstest::rstest;

mod common;
use common::with_mode;

/// Тест проверяет сценарий: Alice создаёт хаб, Bob подписывается на
/// `/topic_1`, Alice публикует "Hello, Bob!" и слушатель видит ровно одну
/// публикацию.
#[tokio::test]
async fn test_owner_publishes_to_subscriber() {
    let h = with_mode(PublishMode::HubScoped);
    let mut stream = h.program.events().stream();

    let hub = h.program.create_hub(&h.alice).unwrap();
    h.program.subscribe(&h.bob, &hub, "/topic_1").unwrap();
    let receipt = h
        .program
        .publish(&h.alice, &hub, "/topic_1", "Hello, Bob!")
        .unwrap();
    assert_eq!(receipt.events_emitted, 1);

    let mut publications = Vec::new();
    while let Ok(event) = stream.try_recv() {
        if let ProgramEvent::Publication(p) = event {
            publications.push(p);
        }
    }
    assert_eq!(
        publications,
        vec![Publication {
            publisher: h.alice,
            hub,
            topic: "/topic_1".into(),
            message: "Hello, Bob!".into(),
            subscriber: None,
        }]
    );

    h.program.close_hub(&h.alice, &hub).unwrap();
}

/// Тест проверяет сценарий: Alice создаёт хаб и подписывается на
/// `/topic_2`, Bob (не владелец) публикует ей "Hello, Alice!".
#[tokio::test]
async fn test_subscriber_receives_from_any_publisher() {
    let h = with_mode(PublishMode::SubscriberAddressed);
    let hub = h.program.create_hub(&h.alice).unwrap();
    h.program.subscribe(&h.alice, &hub, "/topic_2").unwrap();

    let mut stream = h.program.events().stream();
    let consumer = tokio::spawn(async move { stream.recv().await });

    h.program
        .publish(&h.bob, &hub, "/topic_2", "Hello, Alice!")
        .unwrap();

    let event = tokio::time::timeout(Duration::from_secs(1), consumer)
        .await
        .expect("consumer timed out")
        .unwrap()
        .unwrap();
    let publication = event.into_publication().unwrap();
    assert_eq!(publication.publisher, h.bob);
    assert_eq!(publication.subscriber, Some(h.alice));
    assert_eq!(publication.message, "Hello, Alice!");

    h.program.close_hub(&h.alice, &hub).unwrap();
}

#[rstest]
#[case::hub_scoped(PublishMode::HubScoped, 1)]
#[case::subscriber_addressed(PublishMode::SubscriberAddressed, 0)]
fn test_publish_without_subscribers_succeeds(
    #[case] mode: PublishMode,
    #[case] expected_events: usize,
) {
    let h = with_mode(mode);
    let hub = h.program.create_hub(&h.alice).unwrap();

    let receipt = h.program.publish(&h.alice, &hub, "/quiet", "anyone?").unwrap();
    assert_eq!(receipt.events_emitted, expected_events);
    assert_eq!(receipt.listeners_reached, 0);
}

#[rstest]
#[case::hub_scoped(PublishMode::HubScoped)]
#[case::subscriber_addressed(PublishMode::SubscriberAddressed)]
fn test_publish_to_missing_hub_fails(#[case] mode: PublishMode) {
    let h = with_mode(mode);
    let hub = pubhub::hub_address(&h.alice);
    let err = h.program.publish(&h.alice, &hub, "/t", "x").unwrap_err();
    assert!(matches!(err, HubError::HubNotFound { .. }));
}

#[rstest]
#[case::hub_scoped(PublishMode::HubScoped, true)]
#[case::subscriber_addressed(PublishMode::SubscriberAddressed, false)]
fn test_non_owner_publish(
    #[case] mode: PublishMode,
    #[case] rejected: bool,
) {
    let h = with_mode(mode);
    let hub = h.program.create_hub(&h.alice).unwrap();
    let result = h.program.publish(&h.bob, &hub, "/t", "from bob");
    assert_eq!(
        matches!(result, Err(HubError::Unauthorized { .. })),
        rejected
    );
}

/// Тест проверяет, что в режиме рассылки по подписчикам каждый получает
/// запись со своим именем, а подписчики других топиков ничего не получают.
#[test]
fn test_fan_out_names_each_subscriber() {
    let h = with_mode(PublishMode::SubscriberAddressed);
    let hub = h.program.create_hub(&h.alice).unwrap();
    let subscribers: Vec<Pubkey> = (0..5).map(|_| Pubkey::new_unique()).collect();
    for s in &subscribers {
        h.program.subscribe(s, &hub, "/news").unwrap();
    }
    h.program.subscribe(&h.bob, &hub, "/sports").unwrap();

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    h.program
        .events()
        .add_event_listener(EventKind::Publication, move |e| {
            if let Some(p) = e.as_publication() {
                sink.lock().unwrap().push(p.subscriber);
            }
        });

    let receipt = h.program.publish(&h.bob, &hub, "/news", "extra!").unwrap();
    assert_eq!(receipt.events_emitted, 5);

    let mut got: Vec<Pubkey> = seen.lock().unwrap().iter().flatten().copied().collect();
    got.sort();
    let mut expected = subscribers.clone();
    expected.sort();
    assert_eq!(got, expected);
}

#[test]
fn test_subscriptions_do_not_survive_hub_close() {
    let h = with_mode(PublishMode::SubscriberAddressed);
    let hub = h.program.create_hub(&h.alice).unwrap();
    h.program.subscribe(&h.bob, &hub, "/t").unwrap();
    h.program.close_hub(&h.alice, &hub).unwrap();

    // хаб пересоздан по тому же адресу, старых подписчиков нет
    assert_eq!(h.program.create_hub(&h.alice).unwrap(), hub);
    let mut stream = h.program.events().stream();
    let receipt = h.program.publish(&h.alice, &hub, "/t", "hello?").unwrap();
    assert_eq!(receipt.events_emitted, 0);
    assert_eq!(stream.try_recv(), Err(TryRecvError::Empty));
}

/// Тест проверяет, что публикации в топики без подписчиков не оставляют
/// следов в индексе подписок, а закрытие хаба освобождает его записи.
#[test]
fn test_unsubscribed_topics_leave_no_index_entries() {
    let h = with_mode(PublishMode::SubscriberAddressed);
    let hub = h.program.create_hub(&h.alice).unwrap();
    let stranger = Pubkey::new_unique();

    for i in 0..500 {
        let topic = format!("/noise/{i}");
        let receipt = h.program.publish(&stranger, &hub, &topic, "x").unwrap();
        assert_eq!(receipt.events_emitted, 0);
    }
    assert_eq!(h.program.subscriptions().hub_count(), 0);
    assert_eq!(h.program.subscriptions().topic_count(&hub), 0);

    h.program.subscribe(&h.bob, &hub, "/kept").unwrap();
    assert_eq!(h.program.subscriptions().hub_count(), 1);
    h.program.close_hub(&h.alice, &hub).unwrap();
    assert_eq!(h.program.subscriptions().hub_count(), 0);
    assert_eq!(h.program.subscriptions().subscription_count(), 0);
}

#[tokio::test]
async fn test_dropped_stream_is_not_an_error() {
    let h = with_mode(PublishMode::HubScoped);
    let hub = h.program.create_hub(&h.alice).unwrap();
    let stream = h.program.events().stream();
    drop(stream);

    let receipt = h.program.publish(&h.alice, &hub, "/t", "into the void").unwrap();
    assert_eq!(receipt.listeners_reached, 0);
    assert!(h.program.events().metrics().undelivered >= 1);
}
