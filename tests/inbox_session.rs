mod common;

use std::collections::BTreeSet;

use common::{eventually, message, service, ScriptedFetch};
use msgsync::config::SyncConfig;
use msgsync::model::{MessageId, Service, ServiceId};
use msgsync::remote::RemoteValue;
use msgsync::session::InboxSession;
use msgsync::views::newest_first;

fn ids(raw: &[&str]) -> BTreeSet<MessageId> {
    raw.iter().map(|r| MessageId::from(*r)).collect()
}

#[tokio::test]
async fn load_fetches_sender_in_background() {
    let message_fetch = ScriptedFetch::new();
    message_fetch.push_ok(message("M1", "S1", 1));
    let service_fetch = ScriptedFetch::<Service>::new();
    service_fetch.push_ok(service("S1"));

    let session = InboxSession::start(message_fetch, service_fetch.clone(), &SyncConfig::default());
    session.load_message(&MessageId::from("M1")).await.unwrap();

    let sender = ServiceId::from("S1");
    eventually(|| session.service(&sender).is_some()).await;
    assert_eq!(session.service(&sender), RemoteValue::Some(service("S1")));
    assert_eq!(service_fetch.calls(), vec![sender]);

    session.shutdown().await;
}

#[tokio::test]
async fn open_marks_loaded_message_read_once() {
    let message_fetch = ScriptedFetch::new();
    message_fetch.push_ok(message("M1", "S1", 1));
    let session = InboxSession::start(
        message_fetch,
        ScriptedFetch::<Service>::new(),
        &SyncConfig::default(),
    );
    let id = MessageId::from("M1");

    assert!(!session.open_message(&id), "not loaded yet");
    session.load_message(&id).await.unwrap();
    assert!(session.open_message(&id));
    assert!(!session.open_message(&id), "already read");
    assert!(session.views().is_read(&id));
    assert_eq!(session.views().read_ids().to_vec(), vec![id]);

    session.shutdown().await;
}

#[tokio::test]
async fn archive_and_remove_through_session() {
    let message_fetch = ScriptedFetch::new();
    for (raw, at) in [("M1", 10), ("M2", 30), ("M3", 20)] {
        message_fetch.push_ok(message(raw, "S1", at));
    }
    let session = InboxSession::start(
        message_fetch,
        ScriptedFetch::<Service>::new(),
        &SyncConfig::default(),
    );
    for raw in ["M1", "M2", "M3"] {
        session.load_message(&MessageId::from(raw)).await.unwrap();
    }

    session.set_archived(ids(&["M1", "M3"]), true);
    session.set_read(MessageId::from("M3"), true);
    assert_eq!(session.views().archived_ids().len(), 2);
    assert_eq!(
        session.views().unread_and_unarchived_ids().to_vec(),
        vec![MessageId::from("M2")]
    );

    let unread = session.views().unread_ids();
    let ordered = session.views().ordered_ids(&unread, newest_first);
    assert_eq!(
        ordered.iter().cloned().collect::<Vec<_>>(),
        vec![MessageId::from("M2"), MessageId::from("M1")]
    );

    session.remove_messages(ids(&["M1", "M2"]));
    assert_eq!(session.status().len(), 1);
    assert!(session.message(&MessageId::from("M1")).is_some());

    session.shutdown().await;
}
