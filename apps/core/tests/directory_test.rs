use std::rc::Rc;

use quickpurple_core::directory::{collect_sources, unread_entries, Directory, SourceOptions};
use quickpurple_core::model::{
    ActionId, ChatId, ContactId, Entry, MessageId, SavedStatusId, StatusId, StatusPrimitive,
};
use quickpurple_core::snapshot::{Snapshot, SnapshotDirectory, SnapshotMessage};

#[test]
fn sources_follow_buddy_list_then_statuses_then_actions() {
    let directory = SnapshotDirectory::deterministic_fixture();
    let sources = collect_sources(&directory, SourceOptions::default());
    let pairs: Vec<(&str, Entry)> = sources
        .iter()
        .map(|(name, entry)| (name.as_str(), (**entry).clone()))
        .collect();

    assert_eq!(
        &pairs[..6],
        &[
            ("John Smith", Entry::Contact(ContactId(1))),
            ("Alice Cooper", Entry::Contact(ContactId(2))),
            ("Alicia Keys", Entry::Contact(ContactId(3))),
            ("Rust Users", Entry::Chat(ChatId(10))),
            ("Bob", Entry::Contact(ContactId(4))),
            ("Lunch break", Entry::SavedStatus(SavedStatusId(20))),
        ]
    );
    assert_eq!(
        &pairs[6..8],
        &[
            ("offline", Entry::StatusKind(StatusPrimitive::Offline)),
            ("Offline", Entry::StatusKind(StatusPrimitive::Offline)),
        ]
    );
    assert!(pairs.contains(&("Do not disturb", Entry::StatusKind(StatusPrimitive::Unavailable))));
    assert!(!pairs
        .iter()
        .any(|(_, entry)| *entry == Entry::StatusKind(StatusPrimitive::Unset)));

    let account: Vec<&str> = pairs
        .iter()
        .filter(|(_, entry)| *entry == Entry::Status(StatusId(31)))
        .map(|(name, _)| *name)
        .collect();
    assert_eq!(account, vec!["me@example.org", "XMPP", "Away"]);

    assert_eq!(
        pairs.last(),
        Some(&("Plugins", Entry::Action(ActionId::Plugins)))
    );
}

#[test]
fn transient_saved_status_without_message_is_skipped() {
    let directory = SnapshotDirectory::deterministic_fixture();
    let sources = collect_sources(&directory, SourceOptions::default());
    assert!(!sources
        .iter()
        .any(|(_, entry)| **entry == Entry::SavedStatus(SavedStatusId(21))));
}

#[test]
fn names_of_one_object_share_an_entry() {
    let directory = SnapshotDirectory::deterministic_fixture();
    let sources = collect_sources(&directory, SourceOptions::default());
    let status: Vec<&Rc<Entry>> = sources
        .iter()
        .filter(|(_, entry)| **entry == Entry::Status(StatusId(30)))
        .map(|(_, entry)| entry)
        .collect();

    assert_eq!(status.len(), 3);
    assert!(Rc::ptr_eq(status[0], status[2]));
    assert_eq!(Rc::strong_count(status[0]), 3);
}

#[test]
fn static_actions_can_be_left_out() {
    let directory = SnapshotDirectory::deterministic_fixture();
    let sources = collect_sources(
        &directory,
        SourceOptions {
            static_actions: false,
        },
    );
    assert!(!sources
        .iter()
        .any(|(_, entry)| matches!(**entry, Entry::Action(_))));
}

#[test]
fn unread_messages_form_the_default_list() {
    let directory = SnapshotDirectory::deterministic_fixture();
    let unread: Vec<Entry> = unread_entries(&directory)
        .iter()
        .map(|entry| (**entry).clone())
        .collect();
    assert_eq!(unread, vec![Entry::Message(MessageId(40))]);
}

#[test]
fn primitive_lookup_falls_back_to_english_name() {
    let directory = SnapshotDirectory::deterministic_fixture();
    let record = directory.primitive(StatusPrimitive::Tune);
    assert_eq!(record.id, "tune");
    assert_eq!(record.name, "Listening to music");
}

#[test]
fn default_list_has_one_entry_per_unread_conversation() {
    let message = |id: u64, conversation: &str| SnapshotMessage {
        id: MessageId(id),
        conversation: conversation.to_string(),
        sender: "alice".to_string(),
        body: "hi".to_string(),
    };
    let directory = SnapshotDirectory::from_snapshot(Snapshot {
        unread: vec![message(1, "im:alice"), message(2, "im:alice")],
        ..Default::default()
    });

    let unread: Vec<Entry> = unread_entries(&directory)
        .iter()
        .map(|entry| (**entry).clone())
        .collect();
    assert_eq!(unread, vec![Entry::Message(MessageId(1))]);
}
