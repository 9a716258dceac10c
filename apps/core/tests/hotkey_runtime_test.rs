use quickpurple_core::hotkey::HotkeyError;
use quickpurple_core::hotkey_runtime::{
    HotkeyBinding, HotkeyRegistrar, MockHotkeyRegistrar, NoopHotkeyRegistrar,
};

#[test]
fn binding_tracks_registration_lifecycle() {
    let registrar = MockHotkeyRegistrar::default();
    let mut binding = HotkeyBinding::create(registrar.clone(), "Ctrl+Alt+I").unwrap();
    assert!(!binding.is_bound());
    assert!(registrar.registrations().is_empty());

    binding.bind().unwrap();
    binding.bind().unwrap();
    assert!(binding.is_bound());
    assert_eq!(registrar.registrations(), vec!["Ctrl+Alt+I".to_string()]);

    binding.unbind().unwrap();
    assert!(registrar.registrations().is_empty());
}

#[test]
fn rebind_swaps_registration() {
    let registrar = MockHotkeyRegistrar::default();
    let mut binding = HotkeyBinding::create(registrar.clone(), "Ctrl+Alt+I").unwrap();
    binding.bind().unwrap();

    binding.rebind("<Super>space").unwrap();
    assert_eq!(binding.hotkey().to_string(), "Super+Space");
    assert_eq!(registrar.registrations(), vec!["Super+Space".to_string()]);
}

#[test]
fn failed_rebind_keeps_previous_hotkey() {
    let registrar = MockHotkeyRegistrar::default();
    registrar.reject("Ctrl+Shift+P");
    let mut binding = HotkeyBinding::create(registrar.clone(), "Ctrl+Alt+I").unwrap();
    binding.bind().unwrap();

    let error = binding.rebind("Ctrl+Shift+P").unwrap_err();
    assert!(matches!(error, HotkeyError::RegistrationFailed(_)));
    assert_eq!(binding.hotkey().to_string(), "Ctrl+Alt+I");
    assert_eq!(registrar.registrations(), vec!["Ctrl+Alt+I".to_string()]);

    assert!(matches!(
        binding.rebind("Ctrl+Nope"),
        Err(HotkeyError::UnsupportedKey(_))
    ));
    assert!(binding.is_bound());
}

#[test]
fn dropping_a_binding_unregisters_it() {
    let registrar = MockHotkeyRegistrar::default();
    {
        let mut binding = HotkeyBinding::create(registrar.clone(), "Alt+Space").unwrap();
        binding.bind().unwrap();
        assert_eq!(registrar.registrations().len(), 1);
    }
    assert!(registrar.registrations().is_empty());
}

#[test]
fn noop_registrar_accepts_everything() {
    let mut registrar = NoopHotkeyRegistrar::default();
    let hotkey = quickpurple_core::hotkey::parse_hotkey("Alt+Space").unwrap();
    let first = registrar.register(&hotkey).unwrap();
    let second = registrar.register(&hotkey).unwrap();
    assert_ne!(first, second);
    registrar.unregister(first).unwrap();
}
