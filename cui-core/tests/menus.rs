//! Menu registration, navigation and interception over the wire

mod common;

use std::cell::Cell;

use common::{running, TestArbiter};
use cui_core::menu::{HELP_DESCRIPTION, HELP_LINES, HELP_PREVIEW};
use cui_core::{CursorPos, CuiError, InterceptInput, ItemSpec, MenuLines, MenuSpec};
use embassy_futures::block_on;

const RIGHT: &[u8] = b"\x1b[C";
const LEFT: &[u8] = b"\x1b[D";
const ENTER: &[u8] = b"\r";
const BACKSPACE: &[u8] = &[0x7F];
const ESCAPE: &[u8] = &[0x1B, 0, 0, 0, 0];

thread_local! {
    static UPDATES: Cell<u32> = const { Cell::new(0) };
    static LAST_ACTION: Cell<Option<usize>> = const { Cell::new(None) };
}

fn update() {
    UPDATES.with(|u| u.set(u.get() + 1));
}

fn action(index: usize) {
    LAST_ACTION.with(|a| a.set(Some(index)));
}

/// Single-character editor that asks for a cursor
fn editor(input: InterceptInput, lines: &mut MenuLines, cursor: &mut Option<CursorPos>) {
    match input {
        InterceptInput::Preview => lines.set(1, "name: demo"),
        InterceptInput::Start => {
            lines.set(0, "Edit name");
            lines.set(1, "demo");
            *cursor = Some(CursorPos::new(2, 5));
        }
        InterceptInput::Key(key) => {
            lines.set(0, "Edit name");
            if let Some(c) = key.as_char() {
                let mut text = [0u8; 4];
                lines.set(1, c.encode_utf8(&mut text));
            }
            *cursor = Some(CursorPos::new(2, 2));
        }
        InterceptInput::Stop | InterceptInput::Cancel => {}
    }
}

static SETTINGS: MenuSpec = MenuSpec::new(
    "Settings",
    None,
    &[
        ItemSpec::action("< RESET >", action),
        ItemSpec::intercept("< NAME >", editor),
    ],
);

static APP_A: MenuSpec = MenuSpec::new(
    "App A",
    Some(update),
    &[ItemSpec::action("< RUN >", action), ItemSpec::submenu(&SETTINGS)],
);

static APP_B: MenuSpec = MenuSpec::new("App B", Some(update), &[ItemSpec::action("< B >", action)]);

static APP_C: MenuSpec = MenuSpec::new("App C", Some(update), &[ItemSpec::action("< C >", action)]);

static NO_UPDATE: MenuSpec = MenuSpec::new("Broken", None, &[]);

fn key(cui: &TestArbiter, bytes: &[u8]) {
    cui.receive_input(bytes);
    block_on(cui.process_menu_update()).unwrap();
}

#[test]
fn test_first_menu_shows_help() {
    let (cui, board) = running();
    let a = block_on(cui.open_client("A", 0)).unwrap();

    block_on(cui.register_menu(a, &APP_A)).unwrap();
    assert_eq!(board.wire.last_menu(), ["App A", HELP_PREVIEW, HELP_DESCRIPTION]);
}

#[test]
fn test_register_requires_update_fn() {
    let (cui, _board) = running();
    let a = block_on(cui.open_client("A", 0)).unwrap();
    assert_eq!(
        block_on(cui.register_menu(a, &NO_UPDATE)),
        Err(CuiError::MissingUpdateFn)
    );
}

#[test]
fn test_second_menu_builds_synthetic_root() {
    let (cui, board) = running();
    let a = block_on(cui.open_client("A", 0)).unwrap();
    let b = block_on(cui.open_client("B", 0)).unwrap();
    block_on(cui.register_menu(a, &APP_A)).unwrap();
    block_on(cui.register_menu(b, &APP_B)).unwrap();

    assert_eq!(board.wire.last_menu()[0], " Multi-Menu ");
    block_on(cui.with_menu(|state| {
        let root = state.forest().root().unwrap();
        assert_eq!(state.forest().multi(), Some(root));
        assert_eq!(state.forest().items(root).len(), 3);
    }));

    // Help wraps to the first registered menu
    key(cui, RIGHT);
    assert_eq!(board.wire.last_menu()[2], "App A");

    // Into App A, then its trailing item leads back to the root
    key(cui, ENTER);
    assert_eq!(board.wire.last_menu(), ["App A", "", "< RUN >"]);
    key(cui, LEFT);
    assert_eq!(board.wire.last_menu(), ["", "", "<      BACK      >"]);
    key(cui, ENTER);
    assert_eq!(board.wire.last_menu()[0], " Multi-Menu ");
    assert_eq!(board.wire.last_menu()[2], "App A");

    // Deregistering B dissolves the root, A is the root again with Help
    block_on(cui.deregister_menu(b, &APP_B)).unwrap();
    assert_eq!(board.wire.last_menu(), ["App A", HELP_PREVIEW, HELP_DESCRIPTION]);
    block_on(cui.with_menu(|state| {
        assert!(state.forest().multi().is_none());
    }));
}

#[test]
fn test_back_after_middle_menu_removed() {
    let (cui, board) = running();
    let a = block_on(cui.open_client("A", 0)).unwrap();
    let b = block_on(cui.open_client("B", 0)).unwrap();
    let c = block_on(cui.open_client("C", 0)).unwrap();
    block_on(cui.register_menu(a, &APP_A)).unwrap();
    block_on(cui.register_menu(b, &APP_B)).unwrap();
    block_on(cui.register_menu(c, &APP_C)).unwrap();

    // Help, then the last registered menu
    key(cui, LEFT);
    assert_eq!(board.wire.last_menu()[2], "App C");
    key(cui, ENTER);
    assert_eq!(board.wire.last_menu(), ["App C", "", "< C >"]);

    // C stays on screen while B goes away underneath it
    block_on(cui.deregister_menu(b, &APP_B)).unwrap();
    assert_eq!(board.wire.last_menu()[0], "App C");

    key(cui, BACKSPACE);
    assert_eq!(board.wire.last_menu()[0], " Multi-Menu ");
    assert_eq!(board.wire.last_menu()[2], "App C");
    block_on(cui.with_menu(|state| {
        let root = state.forest().root().unwrap();
        assert_eq!(state.navigator().current(), Some(root));
        assert_eq!(state.navigator().selected(), 1);
        assert_eq!(state.forest().items(root).len(), 3);
    }));
}

#[test]
fn test_back_restores_parent_selection() {
    let (cui, board) = running();
    let a = block_on(cui.open_client("A", 0)).unwrap();
    block_on(cui.register_menu(a, &APP_A)).unwrap();

    // Help -> RUN -> Settings
    key(cui, RIGHT);
    key(cui, RIGHT);
    assert_eq!(board.wire.last_menu()[2], "Settings");
    key(cui, ENTER);
    assert_eq!(board.wire.last_menu()[0], "App A");
    assert_eq!(board.wire.last_menu()[2], "< RESET >");

    key(cui, BACKSPACE);
    assert_eq!(board.wire.last_menu()[2], "Settings");

    // Escape from anywhere lands on the root's Help
    key(cui, ENTER);
    key(cui, ESCAPE);
    assert_eq!(board.wire.last_menu()[2], HELP_DESCRIPTION);
}

#[test]
fn test_action_runs_with_index() {
    let (cui, _board) = running();
    let a = block_on(cui.open_client("A", 0)).unwrap();
    block_on(cui.register_menu(a, &APP_A)).unwrap();

    key(cui, RIGHT);
    key(cui, ENTER);
    assert_eq!(LAST_ACTION.with(|l| l.get()), Some(0));
}

#[test]
fn test_input_triggers_update_fn_once() {
    let (cui, _board) = running();
    let a = block_on(cui.open_client("A", 0)).unwrap();
    block_on(cui.register_menu(a, &APP_A)).unwrap();
    let before = UPDATES.with(|u| u.get());

    cui.receive_input(RIGHT);
    // Previous chunk still pending: dropped, no update
    cui.receive_input(LEFT);
    // Failed read
    cui.receive_input(&[]);
    assert_eq!(UPDATES.with(|u| u.get()), before + 1);

    block_on(cui.process_menu_update()).unwrap();
    block_on(cui.with_menu(|state| assert_eq!(state.navigator().selected(), 0)));

    // Nothing pending
    block_on(cui.process_menu_update()).unwrap();
}

#[test]
fn test_help_session() {
    let (cui, board) = running();
    let a = block_on(cui.open_client("A", 0)).unwrap();
    block_on(cui.register_menu(a, &APP_A)).unwrap();

    key(cui, ENTER);
    assert_eq!(board.wire.last_menu(), HELP_LINES);

    // Arrows stay inside the session
    key(cui, RIGHT);
    assert_eq!(board.wire.last_menu(), HELP_LINES);

    key(cui, ESCAPE);
    assert_eq!(board.wire.last_menu(), ["App A", HELP_PREVIEW, HELP_DESCRIPTION]);
}

#[test]
fn test_intercept_session_with_cursor() {
    let (cui, board) = running();
    let a = block_on(cui.open_client("A", 1)).unwrap();
    block_on(cui.register_menu(a, &APP_A)).unwrap();
    block_on(cui.menu_nav(a, &SETTINGS, 1)).unwrap();
    assert_eq!(board.wire.last_menu(), ["App A", "name: demo", "< NAME >"]);

    board.wire.clear();
    key(cui, ENTER);
    assert_eq!(board.wire.last_menu(), ["Edit name", "demo", ""]);
    assert!(board.wire.text().ends_with("\x1b[H\x1b[2;5H\x1b[?25h"));

    key(cui, b"X");
    assert_eq!(board.wire.last_menu(), ["Edit name", "x", ""]);

    // A status print puts the cursor back where the editor wants it
    let line = block_on(cui.status_line_request(a, "Clock")).unwrap();
    board.wire.clear();
    block_on(cui_core::status_line!(cui, a, line, "{}", 12)).unwrap();
    assert!(board.wire.text().ends_with("\x1b[H\x1b[2;2H\x1b[?25h"));

    // Enter commits; the normal view returns and no cursor follows
    board.wire.clear();
    key(cui, ENTER);
    assert_eq!(board.wire.last_menu(), ["App A", "name: demo", "< NAME >"]);
    assert!(!board.wire.text().contains("\x1b[?25h"));
}

#[test]
fn test_menu_nav_rejections() {
    let (cui, _board) = running();
    let a = block_on(cui.open_client("A", 0)).unwrap();
    let b = block_on(cui.open_client("B", 0)).unwrap();
    block_on(cui.register_menu(a, &APP_A)).unwrap();

    assert_eq!(
        block_on(cui.menu_nav(b, &SETTINGS, 0)),
        Err(CuiError::InvalidClientHandle)
    );
    assert_eq!(block_on(cui.menu_nav(a, &APP_B, 0)), Err(CuiError::Failure));
    assert_eq!(
        block_on(cui.menu_nav(a, &SETTINGS, 9)),
        Err(CuiError::InvalidParam)
    );
}

#[test]
fn test_deregister_last_menu_clears_area() {
    let (cui, board) = running();
    let a = block_on(cui.open_client("A", 0)).unwrap();
    block_on(cui.register_menu(a, &APP_A)).unwrap();

    board.wire.clear();
    block_on(cui.deregister_menu(a, &APP_A)).unwrap();
    assert!(board.wire.text().contains("\x1b[1J"));
    assert!(board.wire.frames().is_empty());

    // No menu: input is ignored quietly
    key(cui, RIGHT);
    assert!(board.wire.frames().is_empty());
}

#[test]
fn test_multi_menu_title_update() {
    let (cui, board) = running();
    let a = block_on(cui.open_client("A", 0)).unwrap();
    let b = block_on(cui.open_client("B", 0)).unwrap();
    block_on(cui.register_menu(a, &APP_A)).unwrap();
    block_on(cui.register_menu(b, &APP_B)).unwrap();

    block_on(cui.update_multi_menu_title(" Apps ")).unwrap();
    assert_eq!(board.wire.last_menu()[0], " Apps ");
}

#[test]
fn test_menu_calls_need_uart_domain() {
    let (cui, _board) = common::arbiter(cui_core::CuiConfig {
        manage_uart: false,
        ..Default::default()
    });
    block_on(cui.init()).unwrap();
    let a = block_on(cui.open_client("A", 0)).unwrap();
    assert_eq!(
        block_on(cui.register_menu(a, &APP_A)),
        Err(CuiError::DomainNotManaged(cui_core::Domain::Uart))
    );
}
