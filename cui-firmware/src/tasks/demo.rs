//! Demo client
//!
//! Shows every kind of menu item: actions driving an LED, a submenu and an
//! intercepting name editor. Also keeps an uptime status line current.

use core::cell::RefCell;

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex as BlockingMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Instant, Ticker};
use heapless::String;

use cui_core::{status_line, ClientHandle, CursorPos, InterceptInput, ItemSpec, MenuLines, MenuSpec};
use cui_hal::BlinkCount;
use cui_protocol::Key;

use crate::CUI;

const NAME: &str = "Demo";
const LED: usize = 0;
const NAME_LEN: usize = 16;

/// First column of the editable text on the middle menu row
const EDIT_COL: u16 = 7;

static UPDATE: Signal<CriticalSectionRawMutex, ()> = Signal::new();

static LED_MENU: MenuSpec = MenuSpec::new(
    "LED",
    None,
    &[
        ItemSpec::action("< TOGGLE >", toggle_led),
        ItemSpec::action("< BLINK 5x >", blink_led),
        ItemSpec::action("< BLINK >", blink_led_forever),
    ],
);

static MENU: MenuSpec = MenuSpec::new(
    " Demo ",
    Some(request_update),
    &[
        ItemSpec::submenu(&LED_MENU),
        ItemSpec::intercept("< NAME >", edit_name),
    ],
);

/// Board name with the draft being edited
struct NameEditor {
    name: String<NAME_LEN>,
    draft: String<NAME_LEN>,
}

static EDITOR: BlockingMutex<CriticalSectionRawMutex, RefCell<NameEditor>> =
    BlockingMutex::new(RefCell::new(NameEditor {
        name: String::new(),
        draft: String::new(),
    }));

fn request_update() {
    UPDATE.signal(());
}

fn with_led(f: impl FnOnce(&crate::Cui, ClientHandle) -> cui_core::Result<()>) {
    let Some(cui) = CUI.try_get() else {
        return;
    };
    if let Err(e) = f(cui, ClientHandle::from_name(NAME)) {
        warn!("Demo LED action failed: {:?}", e);
    }
}

fn toggle_led(_index: usize) {
    with_led(|cui, client| cui.led_toggle(client, LED));
}

fn blink_led(_index: usize) {
    with_led(|cui, client| cui.led_blink(client, LED, BlinkCount::Times(5)));
}

fn blink_led_forever(_index: usize) {
    with_led(|cui, client| cui.led_blink(client, LED, BlinkCount::Continuous));
}

fn edit_name(input: InterceptInput, lines: &mut MenuLines, cursor: &mut Option<CursorPos>) {
    EDITOR.lock(|editor| {
        let mut editor = editor.borrow_mut();
        match input {
            InterceptInput::Preview => {
                lines.set(1, "name: ");
                if let Some(line) = lines.line_mut(1) {
                    let _ = line.push_str(&editor.name);
                }
                return;
            }
            InterceptInput::Start => editor.draft = editor.name.clone(),
            InterceptInput::Key(Key::Back) => {
                editor.draft.pop();
            }
            InterceptInput::Key(key) => {
                if let Some(c) = key.as_char() {
                    // Full draft ignores further characters
                    let _ = editor.draft.push(c);
                }
            }
            InterceptInput::Stop => {
                editor.name = editor.draft.clone();
                info!("Name set to {}", editor.name.as_str());
                return;
            }
            InterceptInput::Cancel => return,
        }

        lines.set(0, "Type a name, Enter to keep");
        lines.set(1, "name: ");
        if let Some(line) = lines.line_mut(1) {
            let _ = line.push_str(&editor.draft);
        }
        lines.set(2, "Esc discards");
        *cursor = Some(CursorPos::new(2, EDIT_COL + editor.draft.len() as u16));
    });
}

#[embassy_executor::task]
pub async fn demo_task() {
    let cui = CUI.get().await;

    EDITOR.lock(|editor| {
        let _ = editor.borrow_mut().name.push_str("cui-board");
    });

    let client = match cui.open_client(NAME, 2).await {
        Ok(client) => client,
        Err(e) => {
            error!("Demo client refused: {:?}", e);
            cui.assert("Demo client could not open", true).await;
            return;
        }
    };

    if let Err(e) = cui.led_request(client, LED) {
        warn!("Demo LED unavailable: {:?}", e);
    }
    if let Err(e) = cui.register_menu(client, &MENU).await {
        warn!("Demo menu refused: {:?}", e);
    }
    let uptime = match cui.status_line_request(client, "Uptime").await {
        Ok(id) => Some(id),
        Err(e) => {
            warn!("Uptime line refused: {:?}", e);
            None
        }
    };

    info!("Demo client running");
    let mut ticker = Ticker::every(Duration::from_secs(1));
    loop {
        match select(UPDATE.wait(), ticker.next()).await {
            Either::First(()) => {
                if let Err(e) = cui.process_menu_update().await {
                    warn!("Menu update failed: {:?}", e);
                }
            }
            Either::Second(()) => {
                let Some(id) = uptime else { continue };
                let secs = Instant::now().as_secs();
                let result = status_line!(
                    cui,
                    client,
                    id,
                    "{}:{:02}:{:02}",
                    secs / 3600,
                    secs / 60 % 60,
                    secs % 60
                )
                .await;
                if let Err(e) = result {
                    debug!("Uptime print dropped: {:?}", e);
                }
            }
        }
    }
}
