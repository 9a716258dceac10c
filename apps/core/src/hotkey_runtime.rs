use std::cell::RefCell;
use std::rc::Rc;

use crate::hotkey::{parse_hotkey, Hotkey, HotkeyError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegistrationId(pub u32);

/// Platform seam for global hotkeys.
pub trait HotkeyRegistrar {
    fn register(&mut self, hotkey: &Hotkey) -> Result<RegistrationId, HotkeyError>;
    fn unregister(&mut self, id: RegistrationId) -> Result<(), HotkeyError>;
}

/// Accepts every registration without touching the desktop; used by the
/// terminal shell, where the hotkey is simulated by `:open`.
#[derive(Debug, Default)]
pub struct NoopHotkeyRegistrar {
    next_id: u32,
}

impl HotkeyRegistrar for NoopHotkeyRegistrar {
    fn register(&mut self, hotkey: &Hotkey) -> Result<RegistrationId, HotkeyError> {
        self.next_id += 1;
        tracing::debug!(hotkey = %hotkey, id = self.next_id, "noop hotkey registered");
        Ok(RegistrationId(self.next_id))
    }

    fn unregister(&mut self, id: RegistrationId) -> Result<(), HotkeyError> {
        tracing::debug!(id = id.0, "noop hotkey unregistered");
        Ok(())
    }
}

/// Records live registrations in shared state so tests can observe them
/// after the registrar has been moved into a binding.
#[derive(Debug, Clone, Default)]
pub struct MockHotkeyRegistrar {
    state: Rc<RefCell<MockState>>,
}

#[derive(Debug, Default)]
struct MockState {
    next_id: u32,
    live: Vec<(RegistrationId, String)>,
    rejected: Vec<String>,
}

impl MockHotkeyRegistrar {
    /// Canonical spellings of the currently registered hotkeys.
    pub fn registrations(&self) -> Vec<String> {
        self.state
            .borrow()
            .live
            .iter()
            .map(|(_, hotkey)| hotkey.clone())
            .collect()
    }

    /// Makes registration of `hotkey` fail, as if another program owned it.
    pub fn reject(&self, hotkey: &str) {
        self.state.borrow_mut().rejected.push(hotkey.to_string());
    }
}

impl HotkeyRegistrar for MockHotkeyRegistrar {
    fn register(&mut self, hotkey: &Hotkey) -> Result<RegistrationId, HotkeyError> {
        let canonical = hotkey.to_string();
        let mut state = self.state.borrow_mut();
        if state.rejected.contains(&canonical) {
            return Err(HotkeyError::RegistrationFailed(format!(
                "{canonical} is already grabbed"
            )));
        }
        state.next_id += 1;
        let id = RegistrationId(state.next_id);
        state.live.push((id, canonical));
        Ok(id)
    }

    fn unregister(&mut self, id: RegistrationId) -> Result<(), HotkeyError> {
        let mut state = self.state.borrow_mut();
        let before = state.live.len();
        state.live.retain(|(live, _)| *live != id);
        if state.live.len() == before {
            return Err(HotkeyError::RegistrationFailed(format!(
                "unknown registration {}",
                id.0
            )));
        }
        Ok(())
    }
}

/// The one global hotkey that opens the search window. Dropping a bound
/// binding unregisters it.
pub struct HotkeyBinding<R: HotkeyRegistrar> {
    registrar: R,
    hotkey: Hotkey,
    registration: Option<RegistrationId>,
}

impl<R: HotkeyRegistrar> HotkeyBinding<R> {
    /// Parses `spec` without registering anything yet.
    pub fn create(registrar: R, spec: &str) -> Result<Self, HotkeyError> {
        Ok(Self {
            registrar,
            hotkey: parse_hotkey(spec)?,
            registration: None,
        })
    }

    pub fn hotkey(&self) -> &Hotkey {
        &self.hotkey
    }

    pub fn is_bound(&self) -> bool {
        self.registration.is_some()
    }

    pub fn bind(&mut self) -> Result<(), HotkeyError> {
        if self.registration.is_some() {
            return Ok(());
        }
        let id = self.registrar.register(&self.hotkey)?;
        self.registration = Some(id);
        tracing::info!(hotkey = %self.hotkey, "hotkey bound");
        Ok(())
    }

    /// Switches to `spec`. While bound, the new hotkey is registered before
    /// the old one is released; on failure the old binding stays in place.
    pub fn rebind(&mut self, spec: &str) -> Result<(), HotkeyError> {
        let hotkey = parse_hotkey(spec)?;
        if hotkey == self.hotkey {
            return self.bind();
        }

        match self.registration {
            Some(previous) => {
                let id = self.registrar.register(&hotkey)?;
                self.registration = Some(id);
                if let Err(error) = self.registrar.unregister(previous) {
                    tracing::warn!(%error, "previous hotkey could not be released");
                }
                tracing::info!(from = %self.hotkey, to = %hotkey, "hotkey rebound");
                self.hotkey = hotkey;
                Ok(())
            }
            None => {
                self.hotkey = hotkey;
                self.bind()
            }
        }
    }

    pub fn unbind(&mut self) -> Result<(), HotkeyError> {
        let Some(id) = self.registration.take() else {
            return Ok(());
        };
        self.registrar.unregister(id)?;
        tracing::info!(hotkey = %self.hotkey, "hotkey unbound");
        Ok(())
    }
}

impl<R: HotkeyRegistrar> Drop for HotkeyBinding<R> {
    fn drop(&mut self) {
        if let Err(error) = self.unbind() {
            tracing::warn!(%error, "hotkey unbind on drop failed");
        }
    }
}
