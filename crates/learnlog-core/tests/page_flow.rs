use std::time::Duration;

use chrono::{NaiveDate, NaiveTime};
use learnlog_core::autosave::{AutosaveController, AutosaveStatus};
use learnlog_core::calendar::MonthRef;
use learnlog_core::config::ClientConfig;
use learnlog_core::cropper::{CropCommand, CropSession, CropSpec};
use learnlog_core::modal::{EventModal, ModalTrigger};
use learnlog_core::reschedule::{RescheduleOutcome, reschedule_request};
use learnlog_core::theme::{MemoryThemeStore, Theme, ThemeController};
use learnlog_shared::RescheduleResponse;

fn month(year: i32, month: u32) -> MonthRef {
    MonthRef::new(year, month).expect("valid month")
}

#[test]
fn navigating_across_new_year_keeps_controls_adjacent() {
    let shown = month(2024, 1);
    let targets = shown.nav_targets();

    assert_eq!((targets.prev.year(), targets.prev.month()), (2023, 12));
    assert_eq!((targets.next.year(), targets.next.month()), (2024, 2));

    // Clicking "prev" then re-deriving targets must land back on January.
    let after_prev = targets.prev.nav_targets();
    assert_eq!(after_prev.next, shown);
}

#[test]
fn burst_of_input_produces_one_save_after_quiet_period() {
    let config = ClientConfig::default();
    let mut autosave =
        AutosaveController::new(config.autosave.debounce(), config.autosave.saved_clear());

    let keystrokes = [0_u64, 150, 900, 1_700, 1_950];
    let mut timers = Vec::new();
    for at in keystrokes {
        let ticket = autosave.on_input();
        timers.push((at + autosave.debounce_delay().as_millis() as u64, ticket));
    }

    timers.sort_by_key(|(deadline, _)| *deadline);
    let fired: Vec<_> = timers
        .into_iter()
        .filter_map(|(deadline, ticket)| autosave.on_timer(ticket).map(|g| (deadline, g)))
        .collect();

    assert_eq!(fired.len(), 1);
    assert_eq!(fired[0].0, 3_950);
    assert_eq!(autosave.status(), AutosaveStatus::Saving);

    let (_, generation) = fired[0];
    autosave.on_response(generation, Ok(()));
    assert_eq!(autosave.status().label(), "Draft saved");
    assert_eq!(autosave.saved_clear_delay(), Duration::from_millis(3_000));
}

#[test]
fn successful_drop_refreshes_the_displayed_month_once() {
    let today = NaiveDate::from_ymd_opt(2031, 5, 5).expect("valid date");
    // Page currently shows March 2024.
    let controls = month(2024, 3).nav_targets();

    let request = reschedule_request("42", "2024-03-21").expect("valid drop");
    assert_eq!(request.entry_id, "42");
    assert_eq!(request.date, "2024-03-21");

    let moved = RescheduleOutcome::from(RescheduleResponse {
        status: "success".to_string(),
        message: None,
    });
    let refetch = moved
        .refresh_month(Some(controls.prev), Some(controls.next), today)
        .expect("moved entry refreshes the grid");
    assert_eq!(refetch, month(2024, 3));
    assert_eq!((refetch.query().year, refetch.query().month), (2024, 3));
    assert_eq!(moved.alert_text(), None);

    let rejected = RescheduleOutcome::from(RescheduleResponse {
        status: "error".to_string(),
        message: Some("Entry not found".to_string()),
    });
    assert_eq!(
        rejected.refresh_month(Some(controls.prev), Some(controls.next), today),
        None
    );
    assert_eq!(
        rejected.alert_text().as_deref(),
        Some("Failed to move event: Entry not found")
    );
}

#[test]
fn pill_click_leaves_modal_closed_but_cell_click_opens_it() {
    let now = NaiveTime::from_hms_opt(9, 30, 0).expect("valid time");
    let mut modal = EventModal::new();

    let pill = modal.apply(
        &ModalTrigger::Day {
            date: "2024-03-21".to_string(),
            on_pill: true,
        },
        now,
    );
    assert!(pill.is_none());
    assert!(!modal.state().is_open());

    let cell = modal
        .apply(
            &ModalTrigger::Day {
                date: "2024-03-21".to_string(),
                on_pill: false,
            },
            now,
        )
        .expect("cell click opens");
    assert!(modal.state().is_open());
    assert_eq!(cell.prefill.as_deref(), Some("2024-03-21T09:30"));
}

#[test]
fn reselecting_before_confirm_yields_one_replacement() {
    let spec = CropSpec::from(&ClientConfig::default().cropper);
    let mut session = CropSession::new();

    let (first_read, _) = session.select_file();
    session.image_loaded(first_read).expect("first image accepted");

    // A second file replaces the live widget before the first is cropped.
    let (second_read, commands) = session.select_file();
    assert_eq!(commands, vec![CropCommand::DestroyWidget]);
    assert_eq!(session.image_loaded(first_read), Ok(Vec::new()));
    assert_eq!(
        session.image_loaded(second_read),
        Ok(vec![CropCommand::ShowModal, CropCommand::CreateWidget])
    );

    let export = session.confirm().expect("confirm");
    assert_eq!(
        session.export_finished(export),
        vec![
            CropCommand::ReplaceSelection,
            CropCommand::DestroyWidget,
            CropCommand::HideModal,
        ]
    );
    assert!(!session.state().has_widget());

    let canvas = spec.canvas_options();
    assert_eq!((canvas.width, canvas.height), (300, 300));
    assert_eq!(spec.file_name, "profile_cropped.jpg");
}

#[test]
fn dark_theme_survives_reload() {
    let first_visit = ThemeController::new(MemoryThemeStore::new());
    assert_eq!(first_visit.initial_theme(), None);
    assert_eq!(first_visit.toggle(Some("light")), Theme::Dark);

    let persisted = first_visit.store().raw().expect("theme persisted");
    let reloaded = ThemeController::new(MemoryThemeStore::with_raw(&persisted));

    assert_eq!(reloaded.initial_theme(), Some(Theme::Dark));
}
