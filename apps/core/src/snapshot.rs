//! Roster snapshot standing in for a live messaging client.
//!
//! The snapshot is read from JSON or JSON5 and answers every collaborator
//! call the launcher makes. Activations mutate it and are journaled.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::activation::{Host, HostError};
use crate::directory::{
    AccountStatus, BuddyNode, ChatRecord, ContactRecord, Directory, SavedStatusRecord,
    UnreadMessage,
};
use crate::model::{
    ActionId, ChatId, ContactId, MessageId, SavedStatusId, StatusId, StatusPrimitive,
};

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("failed to read snapshot '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid json in '{}': {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid json5 in '{}': {source}", path.display())]
    Json5 {
        path: PathBuf,
        #[source]
        source: json5::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SnapshotNode {
    Contact {
        id: ContactId,
        alias: String,
        /// Name of the contact's priority buddy.
        buddy: String,
        #[serde(default = "offline")]
        presence: StatusPrimitive,
    },
    Chat {
        id: ChatId,
        alias: String,
        name: String,
    },
}

fn offline() -> StatusPrimitive {
    StatusPrimitive::Offline
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotSavedStatus {
    pub id: SavedStatusId,
    pub title: String,
    pub primitive: StatusPrimitive,
    #[serde(default)]
    pub transient: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotStatus {
    pub id: StatusId,
    pub name: String,
    pub primitive: StatusPrimitive,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotAccount {
    pub username: String,
    pub protocol: String,
    #[serde(default = "enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub statuses: Vec<SnapshotStatus>,
}

fn enabled() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotMessage {
    pub id: MessageId,
    /// Conversation the message belongs to, e.g. `im:alice` or `chat:#rust`.
    pub conversation: String,
    pub sender: String,
    pub body: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub buddy_list: Vec<SnapshotNode>,
    pub saved_statuses: Vec<SnapshotSavedStatus>,
    pub accounts: Vec<SnapshotAccount>,
    pub unread: Vec<SnapshotMessage>,
    pub open_conversations: Vec<String>,
    pub joined_chats: Vec<ChatId>,
    pub active_saved_status: Option<SavedStatusId>,
}

/// Effect applied by one successful activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    PresentedIm {
        contact: ContactId,
        conversation: String,
        draft: Option<String>,
    },
    JoinedChat {
        chat: ChatId,
        presented_existing: bool,
        draft: Option<String>,
    },
    ActivatedStatus {
        status: StatusId,
        message: Option<String>,
    },
    ActivatedSavedStatus {
        saved: SavedStatusId,
        created: bool,
    },
    PresentedConversation {
        message: MessageId,
        conversation: String,
    },
    RanAction(ActionId),
}

#[derive(Debug, Clone, Default)]
pub struct SnapshotDirectory {
    snapshot: Snapshot,
    journal: Vec<Activation>,
    quit_requested: bool,
}

impl SnapshotDirectory {
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            snapshot,
            journal: Vec::new(),
            quit_requested: false,
        }
    }

    /// Reads a snapshot; `.json5` files are parsed leniently, anything else
    /// as strict JSON.
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let raw = std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_json5 = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json5"));
        let snapshot = if is_json5 {
            json5::from_str::<Snapshot>(&raw).map_err(|source| SnapshotError::Json5 {
                path: path.to_path_buf(),
                source,
            })?
        } else {
            serde_json::from_str::<Snapshot>(&raw).map_err(|source| SnapshotError::Json {
                path: path.to_path_buf(),
                source,
            })?
        };

        tracing::info!(
            path = %path.display(),
            buddies = snapshot.buddy_list.len(),
            accounts = snapshot.accounts.len(),
            unread = snapshot.unread.len(),
            "snapshot loaded"
        );
        Ok(Self::from_snapshot(snapshot))
    }

    pub fn deterministic_fixture() -> Self {
        let contact = |id, alias: &str, buddy: &str, presence| SnapshotNode::Contact {
            id: ContactId(id),
            alias: alias.to_string(),
            buddy: buddy.to_string(),
            presence,
        };

        Self::from_snapshot(Snapshot {
            buddy_list: vec![
                contact(1, "John Smith", "john@example.org", StatusPrimitive::Available),
                contact(2, "Alice Cooper", "alice@example.org", StatusPrimitive::Away),
                contact(3, "Alicia Keys", "alicia@example.org", StatusPrimitive::Offline),
                SnapshotNode::Chat {
                    id: ChatId(10),
                    alias: "Rust Users".to_string(),
                    name: "#rust".to_string(),
                },
                contact(4, "Bob", "bob@example.org", StatusPrimitive::Unavailable),
            ],
            saved_statuses: vec![
                SnapshotSavedStatus {
                    id: SavedStatusId(20),
                    title: "Lunch break".to_string(),
                    primitive: StatusPrimitive::Away,
                    transient: false,
                    message: Some("Back in an hour".to_string()),
                },
                SnapshotSavedStatus {
                    id: SavedStatusId(21),
                    title: "Away".to_string(),
                    primitive: StatusPrimitive::Away,
                    transient: true,
                    message: None,
                },
            ],
            accounts: vec![SnapshotAccount {
                username: "me@example.org".to_string(),
                protocol: "XMPP".to_string(),
                enabled: true,
                statuses: vec![
                    SnapshotStatus {
                        id: StatusId(30),
                        name: "Available".to_string(),
                        primitive: StatusPrimitive::Available,
                        active: true,
                        message: None,
                    },
                    SnapshotStatus {
                        id: StatusId(31),
                        name: "Away".to_string(),
                        primitive: StatusPrimitive::Away,
                        active: false,
                        message: None,
                    },
                ],
            }],
            unread: vec![SnapshotMessage {
                id: MessageId(40),
                conversation: "im:alice@example.org".to_string(),
                sender: "Alice Cooper".to_string(),
                body: "<b>ping</b> &amp; pong".to_string(),
            }],
            open_conversations: Vec::new(),
            joined_chats: Vec::new(),
            active_saved_status: None,
        })
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn journal(&self) -> &[Activation] {
        &self.journal
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    fn enabled_statuses(&self) -> impl Iterator<Item = (&SnapshotAccount, &SnapshotStatus)> {
        self.snapshot
            .accounts
            .iter()
            .filter(|account| account.enabled)
            .flat_map(|account| account.statuses.iter().map(move |status| (account, status)))
    }

    fn open_conversation(&mut self, conversation: &str) -> bool {
        let existing = self
            .snapshot
            .open_conversations
            .iter()
            .any(|open| open == conversation);
        if !existing {
            self.snapshot.open_conversations.push(conversation.to_string());
        }
        existing
    }

    fn next_saved_status_id(&self) -> SavedStatusId {
        let max = self
            .snapshot
            .saved_statuses
            .iter()
            .map(|saved| saved.id.0)
            .max()
            .unwrap_or(0);
        SavedStatusId(max + 1)
    }
}

impl Directory for SnapshotDirectory {
    fn buddy_nodes(&self) -> Vec<BuddyNode> {
        self.snapshot
            .buddy_list
            .iter()
            .map(|node| match node {
                SnapshotNode::Contact {
                    id,
                    alias,
                    presence,
                    ..
                } => BuddyNode::Contact(ContactRecord {
                    id: *id,
                    alias: alias.clone(),
                    presence: *presence,
                }),
                SnapshotNode::Chat { id, alias, name } => BuddyNode::Chat(ChatRecord {
                    id: *id,
                    alias: alias.clone(),
                    name: name.clone(),
                }),
            })
            .collect()
    }

    fn saved_statuses(&self) -> Vec<SavedStatusRecord> {
        self.snapshot
            .saved_statuses
            .iter()
            .map(|saved| SavedStatusRecord {
                id: saved.id,
                title: saved.title.clone(),
                primitive: saved.primitive,
                transient: saved.transient,
                message: saved.message.clone(),
            })
            .collect()
    }

    fn account_statuses(&self) -> Vec<AccountStatus> {
        self.enabled_statuses()
            .map(|(account, status)| AccountStatus {
                id: status.id,
                username: account.username.clone(),
                protocol: account.protocol.clone(),
                name: status.name.clone(),
                primitive: status.primitive,
            })
            .collect()
    }

    /// Oldest unread message of each conversation, in the order the
    /// conversations first appear.
    fn unread_messages(&self) -> Vec<UnreadMessage> {
        let mut conversations: HashSet<&str> = HashSet::new();
        self.snapshot
            .unread
            .iter()
            .filter(|message| conversations.insert(message.conversation.as_str()))
            .map(|message| UnreadMessage {
                id: message.id,
                sender: message.sender.clone(),
                body: message.body.clone(),
            })
            .collect()
    }

    fn contact(&self, id: ContactId) -> Option<ContactRecord> {
        self.buddy_nodes().into_iter().find_map(|node| match node {
            BuddyNode::Contact(contact) if contact.id == id => Some(contact),
            _ => None,
        })
    }

    fn chat(&self, id: ChatId) -> Option<ChatRecord> {
        self.buddy_nodes().into_iter().find_map(|node| match node {
            BuddyNode::Chat(chat) if chat.id == id => Some(chat),
            _ => None,
        })
    }

    fn account_status(&self, id: StatusId) -> Option<AccountStatus> {
        self.account_statuses()
            .into_iter()
            .find(|status| status.id == id)
    }

    fn saved_status(&self, id: SavedStatusId) -> Option<SavedStatusRecord> {
        self.saved_statuses().into_iter().find(|saved| saved.id == id)
    }

    fn unread_message(&self, id: MessageId) -> Option<UnreadMessage> {
        self.unread_messages()
            .into_iter()
            .find(|message| message.id == id)
    }
}

impl Host for SnapshotDirectory {
    fn present_im(&mut self, contact: ContactId, draft: Option<&str>) -> Result<(), HostError> {
        let buddy = self
            .snapshot
            .buddy_list
            .iter()
            .find_map(|node| match node {
                SnapshotNode::Contact { id, buddy, .. } if *id == contact => Some(buddy.clone()),
                _ => None,
            })
            .ok_or_else(|| HostError::stale(contact))?;

        let conversation = format!("im:{buddy}");
        self.open_conversation(&conversation);
        self.journal.push(Activation::PresentedIm {
            contact,
            conversation,
            draft: draft.map(str::to_string),
        });
        Ok(())
    }

    fn join_chat(&mut self, chat: ChatId, draft: Option<&str>) -> Result<(), HostError> {
        let name = self
            .chat(chat)
            .map(|record| record.name)
            .ok_or_else(|| HostError::stale(chat))?;

        let conversation = format!("chat:{name}");
        let presented_existing = self
            .snapshot
            .open_conversations
            .iter()
            .any(|open| *open == conversation);
        if !self.snapshot.joined_chats.contains(&chat) {
            self.snapshot.joined_chats.push(chat);
        }
        self.open_conversation(&conversation);
        self.journal.push(Activation::JoinedChat {
            chat,
            presented_existing,
            draft: draft.map(str::to_string),
        });
        Ok(())
    }

    fn activate_status(
        &mut self,
        status: StatusId,
        message: Option<&str>,
    ) -> Result<(), HostError> {
        let account = self
            .snapshot
            .accounts
            .iter_mut()
            .filter(|account| account.enabled)
            .find(|account| account.statuses.iter().any(|candidate| candidate.id == status))
            .ok_or_else(|| HostError::stale(status))?;

        for candidate in &mut account.statuses {
            candidate.active = candidate.id == status;
            if candidate.active {
                candidate.message = message.map(str::to_string);
            }
        }
        self.journal.push(Activation::ActivatedStatus {
            status,
            message: message.map(str::to_string),
        });
        Ok(())
    }

    fn activate_primitive(
        &mut self,
        primitive: StatusPrimitive,
        message: Option<&str>,
    ) -> Result<(), HostError> {
        let existing = self
            .snapshot
            .saved_statuses
            .iter()
            .find(|saved| {
                saved.transient
                    && saved.primitive == primitive
                    && saved.message.as_deref() == message
            })
            .map(|saved| saved.id);

        let (saved, created) = match existing {
            Some(id) => (id, false),
            None => {
                let id = self.next_saved_status_id();
                self.snapshot.saved_statuses.push(SnapshotSavedStatus {
                    id,
                    title: primitive.name().to_string(),
                    primitive,
                    transient: true,
                    message: message.map(str::to_string),
                });
                (id, true)
            }
        };

        self.snapshot.active_saved_status = Some(saved);
        self.journal
            .push(Activation::ActivatedSavedStatus { saved, created });
        Ok(())
    }

    fn activate_saved_status(&mut self, saved: SavedStatusId) -> Result<(), HostError> {
        if !self
            .snapshot
            .saved_statuses
            .iter()
            .any(|candidate| candidate.id == saved)
        {
            return Err(HostError::stale(saved));
        }
        self.snapshot.active_saved_status = Some(saved);
        self.journal.push(Activation::ActivatedSavedStatus {
            saved,
            created: false,
        });
        Ok(())
    }

    fn present_message(&mut self, message: MessageId) -> Result<(), HostError> {
        let conversation = self
            .snapshot
            .unread
            .iter()
            .find(|unread| unread.id == message)
            .map(|unread| unread.conversation.clone())
            .ok_or_else(|| HostError::stale(message))?;

        self.snapshot
            .unread
            .retain(|unread| unread.conversation != conversation);
        self.open_conversation(&conversation);
        self.journal.push(Activation::PresentedConversation {
            message,
            conversation,
        });
        Ok(())
    }

    fn run_action(&mut self, action: ActionId) -> Result<(), HostError> {
        if action == ActionId::Quit {
            self.quit_requested = true;
        }
        self.journal.push(Activation::RanAction(action));
        Ok(())
    }
}
