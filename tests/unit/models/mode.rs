use super::*;

#[test]
fn test_mode_for_file_name() {
    assert_eq!(EditMode::for_file_name("memo1.txt"), EditMode::Text);
    assert_eq!(EditMode::for_file_name("memo1.html"), EditMode::Markup);
    assert_eq!(EditMode::for_file_name("memo1.HTML"), EditMode::Markup);
    assert_eq!(EditMode::for_file_name("desc"), EditMode::Text);
}

#[test]
fn test_wrap_markup_once() {
    let wrapped = wrap_markup("<b>hi</b>");
    assert!(wrapped.starts_with(MARKUP_HEADER_MARKER));
    assert!(wrapped.contains("<meta charset=\"utf-8\">"));
    assert!(wrapped.contains("<b>hi</b>"));

    // a second wrap must be byte-identical, never nested
    let again = wrap_markup(&wrapped);
    assert_eq!(again, wrapped);
    assert_eq!(again.matches(MARKUP_HEADER_MARKER).count(), 1);
}

#[test]
fn test_markup_to_text() {
    assert_eq!(markup_to_text("<b>bold</b> plain"), "bold plain");
    assert_eq!(markup_to_text("one<br>two"), "one\ntwo");
    assert_eq!(markup_to_text("<p>one</p><p>two</p>"), "one\ntwo");
    assert_eq!(markup_to_text("a &amp; b &lt;c&gt;"), "a & b <c>");
    // unterminated tag is kept verbatim rather than eating the tail
    assert_eq!(markup_to_text("x <unclosed"), "x <unclosed");
}

#[test]
fn test_escape_to_markup() {
    assert_eq!(escape_to_markup("a & b"), "a &amp; b");
    assert_eq!(escape_to_markup("<tag>"), "&lt;tag&gt;");
    assert_eq!(escape_to_markup("one\ntwo"), "one<br>\ntwo");
}

#[test]
fn test_switch_markup_to_text_discards_formatting() {
    let mut machine = ModeMachine::new(EditMode::Markup);
    let mut buffer = EditBuffer::new();
    buffer.load(
        None,
        "/r/a.html".into(),
        String::new(),
        "<b>hello</b><br>world".into(),
    );

    assert_eq!(
        machine.prompt_for(EditMode::Text),
        Some(SwitchPrompt::DiscardFormatting)
    );
    assert!(machine.apply(EditMode::Text, SwitchAnswer::Yes, &mut buffer));
    assert_eq!(machine.mode(), EditMode::Text);
    assert_eq!(buffer.text(), "hello\nworld");
    assert!(buffer.is_dirty());
}

#[test]
fn test_switch_text_to_markup_interpret_or_escape() {
    let mut machine = ModeMachine::new(EditMode::Text);
    let mut buffer = EditBuffer::new();
    buffer.load(None, "/r/a.txt".into(), "<b>x</b>".into(), String::new());

    assert!(machine.apply(EditMode::Markup, SwitchAnswer::Yes, &mut buffer));
    assert_eq!(buffer.markup(), "<b>x</b>");

    let mut machine = ModeMachine::new(EditMode::Text);
    let mut buffer = EditBuffer::new();
    buffer.load(None, "/r/a.txt".into(), "<b>x</b>".into(), String::new());

    assert!(machine.apply(EditMode::Markup, SwitchAnswer::No, &mut buffer));
    assert_eq!(buffer.markup(), "&lt;b&gt;x&lt;/b&gt;");
}

#[test]
fn test_switch_cancel_changes_nothing() {
    let mut machine = ModeMachine::new(EditMode::Markup);
    let mut buffer = EditBuffer::new();
    buffer.load(None, "/r/a.html".into(), String::new(), "<b>x</b>".into());

    assert!(!machine.apply(EditMode::Text, SwitchAnswer::Cancel, &mut buffer));
    assert_eq!(machine.mode(), EditMode::Markup);
    assert!(buffer.text().is_empty());
    assert!(!buffer.is_dirty());

    // "no" on discard-formatting is also a cancel
    assert!(!machine.apply(EditMode::Text, SwitchAnswer::No, &mut buffer));
    assert_eq!(machine.mode(), EditMode::Markup);
}

#[test]
fn test_switch_to_same_mode_is_noop() {
    let mut machine = ModeMachine::new(EditMode::Text);
    let mut buffer = EditBuffer::new();
    assert!(machine.prompt_for(EditMode::Text).is_none());
    assert!(!machine.apply(EditMode::Text, SwitchAnswer::Yes, &mut buffer));
}

#[test]
fn test_save_load_save_round_trip() {
    // what a first save writes
    let saved = wrap_markup("<b>note</b>");
    // reloaded into the buffer and saved again without edits
    let saved_again = wrap_markup(&saved);
    assert_eq!(saved, saved_again);
}
