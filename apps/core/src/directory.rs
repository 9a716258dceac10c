use std::rc::Rc;

use crate::action_registry::static_actions;
use crate::model::{
    ChatId, ContactId, Entry, MessageId, SavedStatusId, StatusId, StatusPrimitive,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactRecord {
    pub id: ContactId,
    pub alias: String,
    pub presence: StatusPrimitive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRecord {
    pub id: ChatId,
    pub alias: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuddyNode {
    Contact(ContactRecord),
    Chat(ChatRecord),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedStatusRecord {
    pub id: SavedStatusId,
    pub title: String,
    pub primitive: StatusPrimitive,
    pub transient: bool,
    pub message: Option<String>,
}

impl SavedStatusRecord {
    /// Transient statuses are only worth offering when they carry a message.
    pub fn is_listed(&self) -> bool {
        !self.transient || self.message.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimitiveRecord {
    pub primitive: StatusPrimitive,
    pub id: String,
    pub name: String,
}

impl From<StatusPrimitive> for PrimitiveRecord {
    fn from(primitive: StatusPrimitive) -> Self {
        Self {
            primitive,
            id: primitive.id().to_string(),
            name: primitive.name().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountStatus {
    pub id: StatusId,
    pub username: String,
    pub protocol: String,
    pub name: String,
    pub primitive: StatusPrimitive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnreadMessage {
    pub id: MessageId,
    pub sender: String,
    pub body: String,
}

/// Read side of the live messaging system: what can be indexed, and how a
/// handle resolves back to its current record.
///
/// Lookups return `None` once the object behind a handle is gone; the index
/// is only valid for one search session.
pub trait Directory {
    fn buddy_nodes(&self) -> Vec<BuddyNode>;
    fn saved_statuses(&self) -> Vec<SavedStatusRecord>;
    fn account_statuses(&self) -> Vec<AccountStatus>;
    fn unread_messages(&self) -> Vec<UnreadMessage>;

    fn status_primitives(&self) -> Vec<PrimitiveRecord> {
        StatusPrimitive::selectable().map(PrimitiveRecord::from).collect()
    }

    fn contact(&self, id: ContactId) -> Option<ContactRecord>;
    fn chat(&self, id: ChatId) -> Option<ChatRecord>;
    fn account_status(&self, id: StatusId) -> Option<AccountStatus>;
    fn saved_status(&self, id: SavedStatusId) -> Option<SavedStatusRecord>;
    fn unread_message(&self, id: MessageId) -> Option<UnreadMessage>;

    fn primitive(&self, primitive: StatusPrimitive) -> PrimitiveRecord {
        self.status_primitives()
            .into_iter()
            .find(|record| record.primitive == primitive)
            .unwrap_or_else(|| PrimitiveRecord::from(primitive))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceOptions {
    pub static_actions: bool,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            static_actions: true,
        }
    }
}

/// Every `(display name, entry)` pair to index, in index-building order.
/// Entries with several names appear once per name, sharing one `Rc`.
pub fn collect_sources<D: Directory + ?Sized>(
    directory: &D,
    options: SourceOptions,
) -> Vec<(String, Rc<Entry>)> {
    let mut sources = Vec::new();

    for node in directory.buddy_nodes() {
        match node {
            BuddyNode::Contact(contact) => {
                sources.push((contact.alias, Rc::new(Entry::Contact(contact.id))));
            }
            BuddyNode::Chat(chat) => {
                sources.push((chat.alias, Rc::new(Entry::Chat(chat.id))));
            }
        }
    }

    for saved in directory.saved_statuses() {
        if saved.is_listed() {
            sources.push((saved.title, Rc::new(Entry::SavedStatus(saved.id))));
        }
    }

    for record in directory.status_primitives() {
        if record.primitive == StatusPrimitive::Unset {
            continue;
        }
        let entry = Rc::new(Entry::StatusKind(record.primitive));
        sources.push((record.id, Rc::clone(&entry)));
        sources.push((record.name, entry));
    }

    for status in directory.account_statuses() {
        let entry = Rc::new(Entry::Status(status.id));
        sources.push((status.username, Rc::clone(&entry)));
        sources.push((status.protocol, Rc::clone(&entry)));
        sources.push((status.name, entry));
    }

    if options.static_actions {
        for action in static_actions() {
            sources.push((action.label.to_string(), Rc::new(Entry::Action(action.id))));
        }
    }

    sources
}

/// One message entry per unread conversation, shown while the query is empty.
pub fn unread_entries<D: Directory + ?Sized>(directory: &D) -> Vec<Rc<Entry>> {
    directory
        .unread_messages()
        .into_iter()
        .map(|message| Rc::new(Entry::Message(message.id)))
        .collect()
}
