use quickpurple_core::hotkey::{parse_hotkey, validate_hotkey, HotkeyError, Modifier};

#[test]
fn parses_default_hotkey() {
    let parsed = parse_hotkey("Ctrl+Alt+I").unwrap();
    assert_eq!(parsed.modifiers, vec![Modifier::Ctrl, Modifier::Alt]);
    assert_eq!(parsed.key, "I");
    assert_eq!(parsed.accelerator(), "<Control><Alt>I");
}

#[test]
fn parses_gtk_accelerator_form() {
    let parsed = parse_hotkey("<Primary><Shift>f5").unwrap();
    assert_eq!(parsed.to_string(), "Ctrl+Shift+F5");
}

#[test]
fn canonicalizes_modifier_order_and_aliases() {
    assert_eq!(validate_hotkey("win + shift + alt + p").unwrap(), "Alt+Shift+Super+P");
    assert_eq!(validate_hotkey("Ctrl+Control+space").unwrap(), "Ctrl+Space");
}

#[test]
fn rejects_invalid_hotkeys() {
    assert_eq!(parse_hotkey("  "), Err(HotkeyError::Empty));
    assert_eq!(parse_hotkey("I"), Err(HotkeyError::MissingModifier));
    assert_eq!(parse_hotkey("<Control>"), Err(HotkeyError::MissingModifier));
    assert_eq!(
        parse_hotkey("Hyper+I"),
        Err(HotkeyError::UnsupportedModifier("Hyper".to_string()))
    );
    assert_eq!(
        parse_hotkey("Ctrl+F25"),
        Err(HotkeyError::UnsupportedKey("F25".to_string()))
    );
    assert_eq!(
        parse_hotkey("Ctrl+Enter"),
        Err(HotkeyError::UnsupportedKey("Enter".to_string()))
    );
    assert_eq!(
        parse_hotkey("<Control I"),
        Err(HotkeyError::Malformed("<Control I".to_string()))
    );
}
