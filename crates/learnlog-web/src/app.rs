use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::EventListener;
use learnlog_core::config::ClientConfig;
use web_sys::Document;

use crate::components::{
  AutosaveForm,
  CalendarNavigator,
  EventModalController,
  PageChrome,
  ProfileCropper,
  ThemeToggle,
  attach_focus_zoom
};

/// Everything wired on the current page.
/// Components present in the markup are
/// `Some`; the rest are skipped.
struct Page {
  _modal:        Option<Rc<EventModalController>>,
  _calendar:     Option<Rc<CalendarNavigator>>,
  _day_cells:    Vec<EventListener>,
  _autosave:     Option<Rc<AutosaveForm>>,
  _cropper:      Option<Rc<ProfileCropper>>,
  _theme:        Option<Rc<ThemeToggle>>,
  _chrome:       PageChrome,
  _focus_fields: Vec<EventListener>
}

thread_local! {
  static PAGE: RefCell<Option<Page>> =
    const { RefCell::new(None) };
}

pub fn start(config: ClientConfig) {
  let Some(document) = web_sys::window()
    .and_then(|window| window.document())
  else {
    tracing::error!("no document to attach to");
    return;
  };

  let config = Rc::new(config);
  if document.ready_state() == "loading" {
    let ready = document.clone();
    EventListener::once(
      &document,
      "DOMContentLoaded",
      move |_| mount(&ready, config)
    )
    .forget();
  } else {
    mount(&document, config);
  }
}

fn mount(
  document: &Document,
  config: Rc<ClientConfig>
) {
  let modal = EventModalController::mount(document);
  let calendar = CalendarNavigator::mount(
    document,
    Rc::clone(&config),
    modal.clone()
  );

  // Without a navigator nobody rewires the
  // cells, so the page holds them itself.
  let day_cells = match (&calendar, &modal) {
    | (None, Some(modal)) => {
      modal.attach_day_cells(document)
    }
    | _ => Vec::new()
  };

  let page = Page {
    _modal: modal,
    _calendar: calendar,
    _day_cells: day_cells,
    _autosave: AutosaveForm::mount(
      document, &config
    ),
    _cropper: ProfileCropper::mount(
      document,
      &config.cropper
    ),
    _theme: ThemeToggle::mount(
      document,
      &config.theme.storage_key
    ),
    _chrome: PageChrome::mount(document),
    _focus_fields: attach_focus_zoom(document)
  };

  tracing::info!(
    calendar = page._calendar.is_some(),
    modal = page._modal.is_some(),
    autosave = page._autosave.is_some(),
    cropper = page._cropper.is_some(),
    "page mounted"
  );
  PAGE.with(|slot| {
    *slot.borrow_mut() = Some(page);
  });
}
