//! End-to-end tests of the session pipeline: parse, merge, apply,
//! commands, and teardown over a memory host.

use std::rc::Rc;
use std::time::{Duration, Instant};

use styletune::{
    MemoryCommandHost, MemoryHost, MemoryPersistence, Scope, Session, SettingValue,
    DEBOUNCE_DELAY,
};

const THEME_A: &str = r#"
/* @settings
name: theme-a
id: demo
settings:
  - id: accent
    title: Accent color
    type: class-toggle
    default: false
*/
body { color: red; }
"#;

const THEME_RICH: &str = r#"
/* @settings
name: Rich Theme
id: rich
settings:
  - id: layout-heading
    title: Layout
    type: heading
    level: 2
  - id: compact
    title: Compact mode
    type: class-toggle
    default: true
    addCommand: true
  - id: radius
    title: Corner radius
    type: variable-number-slider
    default: 8
    min: 0
    max: 24
    step: 1
    format: px
  - id: panel-bg
    title: Panel background
    type: variable-themed-color
    default-light: '#ffffff'
    default-dark: '#1e1e1e'
*/
"#;

fn session_over(
    sheets: &[&str],
) -> (
    Session,
    Rc<MemoryHost>,
    Rc<MemoryCommandHost>,
    Rc<MemoryPersistence>,
) {
    let host = Rc::new(MemoryHost::new());
    for sheet in sheets {
        host.push_stylesheet(*sheet);
    }
    let command_host = Rc::new(MemoryCommandHost::new());
    let persistence = Rc::new(MemoryPersistence::new());
    let mut session = Session::new(
        Box::new(Rc::clone(&host)),
        Box::new(Rc::clone(&command_host)),
        Box::new(Rc::clone(&persistence)),
    );
    session.start(Instant::now());
    session.refresh_now();
    (session, host, command_host, persistence)
}

// ============================================================================
// The end-to-end example: theme-a with one class toggle
// ============================================================================

#[test]
fn end_to_end_class_toggle() {
    let (mut session, host, _, _) = session_over(&[THEME_A]);

    assert!(session.errors().is_empty());
    assert_eq!(session.sections().len(), 1);
    assert_eq!(session.sections()[0].id, "demo");
    assert_eq!(session.sections()[0].settings[0].id, "accent");

    // Default false: no accent-derived class, no properties.
    assert!(!host.has_class("accent"));
    assert_eq!(host.property_count(), 0);

    session.set_value("demo", "accent", SettingValue::Bool(true));
    assert_eq!(host.classes(), vec!["accent"]);
    assert_eq!(host.property_count(), 0);
}

#[test]
fn malformed_block_yields_one_error_record() {
    let bad = r#"
/* @settings
name: Broken Theme
id: broken
settings:
  - id: a
    title: A
    type: bogus
*/
"#;
    let (session, _, _, _) = session_over(&[bad]);

    assert!(session.sections().is_empty());
    assert_eq!(session.errors().len(), 1);
    assert_eq!(session.errors()[0].name, "Broken Theme");
}

#[test]
fn one_bad_sheet_never_blocks_a_good_one() {
    let bad = "/* @settings\nname: Bad\nid: bad\nsettings:\n  - id: x\n    title: X\n    type: nope\n*/";
    let (session, _, _, _) = session_over(&[bad, THEME_A]);

    assert_eq!(session.sections().len(), 1);
    assert_eq!(session.sections()[0].id, "demo");
    assert_eq!(session.errors().len(), 1);
}

#[test]
fn duplicate_section_ids_keep_first_and_record_error() {
    let (session, _, _, _) = session_over(&[THEME_A, THEME_A]);
    assert_eq!(session.sections().len(), 1);
    assert_eq!(session.errors().len(), 1);
    assert!(session.errors()[0].error.contains("duplicate section id"));
}

// ============================================================================
// Reparse reconciliation
// ============================================================================

#[test]
fn removed_section_leaves_no_applied_state_and_prunes_values() {
    let (mut session, host, _, _) = session_over(&[THEME_RICH]);
    assert!(host.has_class("compact"));
    assert_eq!(
        host.property(Scope::Default, "--radius").as_deref(),
        Some("8px")
    );
    assert_eq!(
        host.property(Scope::Light, "--panel-bg").as_deref(),
        Some("#ffffff")
    );
    assert_eq!(
        host.property(Scope::Dark, "--panel-bg").as_deref(),
        Some("#1e1e1e")
    );

    // The theme is replaced by plain CSS: clean parse, empty outcome.
    host.set_stylesheets(vec!["body { margin: 0; }".to_string()]);
    session.refresh_now();

    assert!(host.classes().is_empty());
    assert_eq!(host.property_count(), 0);
    assert_eq!(session.get_value("rich", "compact"), None);
}

#[test]
fn failed_reparse_prunes_nothing() {
    let (mut session, host, _, persistence) = session_over(&[THEME_RICH]);
    session.set_value("rich", "radius", SettingValue::Number(12.0));

    // The sheet breaks: the block still extracts but no longer parses.
    host.set_stylesheets(vec![
        "/* @settings\nname: Rich Theme\nid: rich\nsettings: [unclosed\n*/".to_string(),
    ]);
    session.refresh_now();

    assert_eq!(session.errors().len(), 1);
    assert!(session.sections().is_empty());
    // Saved values survive the transient failure.
    assert_eq!(
        session.get_value("rich", "radius"),
        Some(&SettingValue::Number(12.0))
    );
    let document = persistence.document().unwrap();
    assert_eq!(
        document["rich"].values["radius"],
        SettingValue::Number(12.0)
    );

    // The sheet comes back: the user's value reapplies.
    host.set_stylesheets(vec![THEME_RICH.to_string()]);
    session.refresh_now();
    assert_eq!(
        host.property(Scope::Default, "--radius").as_deref(),
        Some("12px")
    );
}

#[test]
fn user_value_survives_section_rename() {
    let (mut session, host, _, _) = session_over(&[THEME_A]);
    session.set_value("demo", "accent", SettingValue::Bool(true));

    let renamed = THEME_A.replace("name: theme-a", "name: theme-a-v2");
    host.set_stylesheets(vec![renamed]);
    session.refresh_now();

    assert_eq!(
        session.get_value("demo", "accent"),
        Some(&SettingValue::Bool(true))
    );
    assert!(host.has_class("accent"));
}

// ============================================================================
// Debounce behavior
// ============================================================================

#[test]
fn notification_burst_collapses_to_one_run() {
    let host = Rc::new(MemoryHost::new());
    host.push_stylesheet(THEME_A);
    let persistence = Rc::new(MemoryPersistence::new());
    let mut session = Session::new(
        Box::new(Rc::clone(&host)),
        Box::new(Rc::new(MemoryCommandHost::new())),
        Box::new(Rc::clone(&persistence)),
    );

    let start = Instant::now();
    session.start(start);

    let mut runs = 0;
    for i in 0..10 {
        let now = start + Duration::from_millis(i * 10);
        session.notify_style_change(Some("editor"), now);
        if session.poll(now) {
            runs += 1;
        }
    }
    // Last trigger at +90ms; the window is still open.
    assert_eq!(runs, 0);

    assert!(session.poll(start + Duration::from_millis(90) + DEBOUNCE_DELAY));
    assert!(!session.poll(start + Duration::from_secs(10)));
    assert_eq!(session.sections().len(), 1);
}

// ============================================================================
// Commands
// ============================================================================

#[test]
fn toggle_command_flips_value_and_class_exactly_once() {
    let (mut session, host, command_host, _) = session_over(&[THEME_RICH]);
    assert_eq!(
        command_host.registered_ids(),
        vec!["styletune-class-toggle-rich-compact"]
    );
    assert!(host.has_class("compact"));

    assert!(session.run_command("styletune-class-toggle-rich-compact"));
    assert!(!host.has_class("compact"));
    assert_eq!(
        session.get_value("rich", "compact"),
        Some(&SettingValue::Bool(false))
    );

    assert!(session.run_command("styletune-class-toggle-rich-compact"));
    assert!(host.has_class("compact"));
}

#[test]
fn teardown_leaves_host_untouched_by_styletune() {
    let (mut session, host, command_host, _) = session_over(&[THEME_RICH]);
    assert!(!host.classes().is_empty());
    assert!(host.property_count() > 0);

    session.teardown();

    assert!(host.classes().is_empty());
    assert_eq!(host.property_count(), 0);
    assert!(command_host.registered_ids().is_empty());
}
