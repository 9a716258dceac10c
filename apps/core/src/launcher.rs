use std::rc::Rc;

use crate::activation::Host;
use crate::collation::{Collation, CollationError};
use crate::config::{validate, Config, ConfigError};
use crate::directory::Directory;
use crate::hotkey::HotkeyError;
use crate::hotkey_runtime::{HotkeyBinding, HotkeyRegistrar};
use crate::presentation::{row, Row};
use crate::session::{Session, SessionError};

#[derive(Debug, thiserror::Error)]
pub enum LauncherError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("collation error: {0}")]
    Collation(#[from] CollationError),
    #[error("hotkey error: {0}")]
    Hotkey(#[from] HotkeyError),
    #[error("activation failed: {0}")]
    Session(#[from] SessionError),
    #[error("search window is not open")]
    NotOpen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotkeyAction {
    Opened,
    Closed,
}

/// Ties the hotkey, the collaborators and at most one open search session
/// together.
pub struct Launcher<C, R>
where
    C: Directory + Host,
    R: HotkeyRegistrar,
{
    config: Config,
    collaborators: C,
    collation: Rc<Collation>,
    binding: HotkeyBinding<R>,
    session: Option<Session>,
}

impl<C, R> Launcher<C, R>
where
    C: Directory + Host,
    R: HotkeyRegistrar,
{
    /// Validates `config`, loads the collation for its locale and binds
    /// the configured hotkey.
    pub fn new(config: Config, collaborators: C, registrar: R) -> Result<Self, LauncherError> {
        validate(&config)?;
        let collation = Rc::new(Collation::for_locale(&config.locale)?);
        let mut binding = HotkeyBinding::create(registrar, &config.hotkey)?;
        binding.bind()?;

        Ok(Self {
            config,
            collaborators,
            collation,
            binding,
            session: None,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn collaborators(&self) -> &C {
        &self.collaborators
    }

    pub fn collaborators_mut(&mut self) -> &mut C {
        &mut self.collaborators
    }

    pub fn binding(&self) -> &HotkeyBinding<R> {
        &self.binding
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn on_hotkey(&mut self) -> HotkeyAction {
        if self.is_open() {
            self.close();
            HotkeyAction::Closed
        } else {
            self.open();
            HotkeyAction::Opened
        }
    }

    /// Opens a session with a freshly built index. Opening while a session
    /// is already open keeps the existing one.
    pub fn open(&mut self) -> &Session {
        let collaborators = &self.collaborators;
        let collation = &self.collation;
        let options = self.config.session_options();
        self.session
            .get_or_insert_with(|| Session::open(collaborators, Rc::clone(collation), options))
    }

    /// Closes the open session. Returns the number of associations released.
    pub fn close(&mut self) -> Option<usize> {
        self.session.take().map(Session::close)
    }

    pub fn on_escape(&mut self) -> bool {
        self.close().is_some()
    }

    pub fn on_query_changed(&mut self, text: &str) -> Result<usize, LauncherError> {
        let session = self.session.as_mut().ok_or(LauncherError::NotOpen)?;
        Ok(session.on_query_changed(text).len())
    }

    pub fn move_selection(&mut self, direction: i32) -> Result<usize, LauncherError> {
        let session = self.session.as_mut().ok_or(LauncherError::NotOpen)?;
        Ok(session.move_selection(direction))
    }

    /// Rows for the visible results; entries whose object went away while
    /// the window was open get a placeholder row.
    pub fn rows(&self) -> Vec<Row> {
        let Some(session) = self.session.as_ref() else {
            return Vec::new();
        };
        session
            .results()
            .iter()
            .map(|entry| row(&self.collaborators, entry).unwrap_or_else(|| Row::unavailable(entry)))
            .collect()
    }

    /// Activates the selected entry and closes the session, whether or not
    /// the activation succeeded.
    pub fn submit(&mut self) -> Result<(), LauncherError> {
        let session = self.session.take().ok_or(LauncherError::NotOpen)?;
        let outcome = session.activate_selected(&mut self.collaborators);
        session.close();
        outcome.map_err(LauncherError::from)
    }

    /// Moves the global hotkey to `spec`; the config follows only when the
    /// new hotkey was registered.
    pub fn rebind_hotkey(&mut self, spec: &str) -> Result<(), LauncherError> {
        self.binding.rebind(spec)?;
        self.config.hotkey = self.binding.hotkey().to_string();
        Ok(())
    }
}
