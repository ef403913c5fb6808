use std::rc::{
  Rc,
  Weak
};

use gloo::events::{
  EventListener,
  EventListenerOptions
};
use gloo::timers::callback::Timeout;
use learnlog_core::ClientError;
use learnlog_core::reschedule::{
  DRAG_PAYLOAD_MIME,
  RescheduleOutcome,
  reschedule_request
};
use wasm_bindgen::JsCast;
use web_sys::{
  DragEvent,
  Element,
  Event,
  HtmlElement
};

use super::CalendarNavigator;
use crate::{
  api,
  dom
};

pub(super) const DAY_CELLS: &str =
  ".calendar__day:not(.calendar__day--empty)";
const EVENT_PILLS: &str = ".event-pill";
const DRAGGING: &str = "dragging";
const DRAG_OVER: &str =
  "calendar__day--drag-over";

fn prevents_default() -> EventListenerOptions {
  EventListenerOptions::enable_prevent_default()
}

fn drag_event(
  event: &Event
) -> Option<&DragEvent> {
  event.dyn_ref::<DragEvent>()
}

/// Pills become drag sources and day
/// cells drop targets for the calendar
/// currently in the wrapper.
pub fn attach(
  navigator: &Rc<CalendarNavigator>
) -> Vec<EventListener> {
  let document = navigator.document();
  let mut listeners = Vec::new();

  let pills = dom::query_all::<HtmlElement>(
    document,
    EVENT_PILLS
  );
  for pill in pills {
    listeners.extend(attach_pill(pill));
  }

  let cells = dom::query_all::<Element>(
    document, DAY_CELLS
  );
  for cell in cells {
    listeners.extend(attach_cell(
      cell,
      Rc::downgrade(navigator)
    ));
  }

  listeners
}

fn attach_pill(
  pill: HtmlElement
) -> [EventListener; 2] {
  let source = pill.clone();
  let dragstart = EventListener::new(
    &pill,
    "dragstart",
    move |event| {
      let entry_id =
        dom::data_attr(&source, "entry-id")
          .unwrap_or_default();
      if let Some(transfer) = drag_event(event)
        .and_then(|event| event.data_transfer())
      {
        if let Err(error) = transfer.set_data(
          DRAG_PAYLOAD_MIME,
          &entry_id
        ) {
          tracing::warn!(
            ?error,
            "failed writing drag payload"
          );
        }
        transfer.set_effect_allowed("move");
      }
      tracing::debug!(
        entry_id = %entry_id,
        "drag started"
      );

      // The browser snapshots the drag
      // image after this handler returns.
      let marked = source.clone();
      Timeout::new(0, move || {
        dom::add_class(&marked, DRAGGING);
      })
      .forget();
    }
  );

  let source = pill.clone();
  let dragend = EventListener::new(
    &pill,
    "dragend",
    move |_| {
      dom::remove_class(&source, DRAGGING);
    }
  );

  [dragstart, dragend]
}

fn attach_cell(
  cell: Element,
  navigator: Weak<CalendarNavigator>
) -> [EventListener; 4] {
  let dragover = EventListener::new_with_options(
    &cell,
    "dragover",
    prevents_default(),
    |event| {
      event.prevent_default();
      if let Some(transfer) = drag_event(event)
        .and_then(|event| event.data_transfer())
      {
        transfer.set_drop_effect("move");
      }
    }
  );

  let target = cell.clone();
  let dragenter = EventListener::new_with_options(
    &cell,
    "dragenter",
    prevents_default(),
    move |event| {
      event.prevent_default();
      dom::add_class(&target, DRAG_OVER);
    }
  );

  let target = cell.clone();
  let dragleave = EventListener::new(
    &cell,
    "dragleave",
    move |_| {
      dom::remove_class(&target, DRAG_OVER);
    }
  );

  let target = cell.clone();
  let on_drop = EventListener::new_with_options(
    &cell,
    "drop",
    prevents_default(),
    move |event| {
      event.prevent_default();
      dom::remove_class(&target, DRAG_OVER);

      let payload = drag_event(event)
        .and_then(|event| event.data_transfer())
        .and_then(|transfer| {
          transfer
            .get_data(DRAG_PAYLOAD_MIME)
            .ok()
        })
        .unwrap_or_default();
      let date = dom::data_attr(&target, "date")
        .unwrap_or_default();

      let Some(navigator) = navigator.upgrade()
      else {
        return;
      };
      drop_entry(&navigator, &payload, &date);
    }
  );

  [dragover, dragenter, dragleave, on_drop]
}

fn drop_entry(
  navigator: &Rc<CalendarNavigator>,
  payload: &str,
  date: &str
) {
  let request =
    match reschedule_request(payload, date) {
      | Ok(request) => request,
      | Err(error) => {
        tracing::warn!(
          %error,
          "ignoring drop"
        );
        return;
      }
    };

  let document = navigator.document();
  let csrf_token = match dom::csrf_token(document)
  {
    | Ok(token) => token,
    | Err(error) => {
      tracing::error!(
        %error,
        entry_id = %request.entry_id,
        "cannot reschedule entry"
      );
      return;
    }
  };

  let navigator = Rc::clone(navigator);
  wasm_bindgen_futures::spawn_local(
    async move {
      let endpoint = navigator
        .config()
        .endpoints
        .reschedule_url();
      let response = match api::post_reschedule(
        &endpoint,
        &request,
        &csrf_token
      )
      .await
      {
        | Ok(response) => response,
        | Err(error) => {
          tracing::error!(
            %error,
            entry_id = %request.entry_id,
            "reschedule request failed"
          );
          return;
        }
      };

      let outcome =
        RescheduleOutcome::from(response);
      let (prev, next) =
        navigator.nav_controls();
      let Some(month) = outcome.refresh_month(
        prev,
        next,
        chrono::Local::now().date_naive()
      ) else {
        if let RescheduleOutcome::Rejected {
          message
        } = &outcome
        {
          let error = ClientError::Rejected {
            message: message.clone()
          };
          tracing::warn!(
            %error,
            entry_id = %request.entry_id,
            "reschedule rejected"
          );
        }
        if let Some(text) = outcome.alert_text()
        {
          gloo::dialogs::alert(&text);
        }
        return;
      };

      tracing::info!(
        entry_id = %request.entry_id,
        date = %request.date,
        "entry rescheduled"
      );
      navigator.load(month);
    }
  );
}
