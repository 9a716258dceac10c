use crate::model::{
    ActionId, ChatId, ContactId, Entry, MessageId, SavedStatusId, StatusId, StatusPrimitive,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    /// The object behind a handle disappeared after the index was built.
    #[error("{0} no longer exists")]
    Stale(String),
    #[error("{0}")]
    Failed(String),
}

impl HostError {
    pub fn stale(handle: impl std::fmt::Display) -> Self {
        Self::Stale(handle.to_string())
    }
}

/// Write side of the live messaging system. Each method performs the effect
/// of activating one kind of entry.
pub trait Host {
    /// Presents the IM conversation with the contact's priority buddy,
    /// opening one if needed.
    fn present_im(&mut self, contact: ContactId, draft: Option<&str>) -> Result<(), HostError>;

    /// Presents an already open conversation for the chat, then joins it.
    fn join_chat(&mut self, chat: ChatId, draft: Option<&str>) -> Result<(), HostError>;

    fn activate_status(&mut self, status: StatusId, message: Option<&str>)
        -> Result<(), HostError>;

    /// Activates the transient saved status for `(primitive, message)`,
    /// creating it when none exists yet.
    fn activate_primitive(
        &mut self,
        primitive: StatusPrimitive,
        message: Option<&str>,
    ) -> Result<(), HostError>;

    fn activate_saved_status(&mut self, saved: SavedStatusId) -> Result<(), HostError>;

    fn present_message(&mut self, message: MessageId) -> Result<(), HostError>;

    fn run_action(&mut self, action: ActionId) -> Result<(), HostError>;
}

/// Performs the effect of selecting `entry`. `parameter` is the query text
/// after the search prefix.
pub fn activate<H: Host + ?Sized>(
    host: &mut H,
    entry: &Entry,
    parameter: Option<&str>,
) -> Result<(), HostError> {
    let result = match entry {
        Entry::Contact(contact) => host.present_im(*contact, parameter),
        Entry::Chat(chat) => host.join_chat(*chat, parameter),
        Entry::Status(status) => host.activate_status(*status, parameter),
        Entry::StatusKind(primitive) => host.activate_primitive(*primitive, parameter),
        Entry::SavedStatus(saved) => host.activate_saved_status(*saved),
        Entry::Message(message) => host.present_message(*message),
        Entry::Action(action) => host.run_action(*action),
    };

    match &result {
        Ok(()) => tracing::info!(entry = %entry, parameter = parameter.is_some(), "activated"),
        Err(error) => tracing::warn!(entry = %entry, %error, "activation failed"),
    }
    result
}
