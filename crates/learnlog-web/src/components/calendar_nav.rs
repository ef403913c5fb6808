use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::{
  EventListener,
  EventListenerOptions
};
use learnlog_core::ClientError;
use learnlog_core::calendar::MonthRef;
use learnlog_core::config::ClientConfig;
use learnlog_core::generation::RequestGeneration;
use web_sys::{
  Document,
  Element,
  HtmlElement
};

use super::{
  EventModalController,
  drag_drop
};
use crate::{
  api,
  dom
};

const NAV_CONTROL: &str =
  ".js-calendar-nav";
const NAV_PREV: &str = ".js-nav-prev";
const NAV_NEXT: &str = ".js-nav-next";

fn control_month(
  control: &Element
) -> Result<MonthRef, ClientError> {
  MonthRef::from_attrs(
    &dom::data_attr(control, "year")
      .unwrap_or_default(),
    &dom::data_attr(control, "month")
      .unwrap_or_default()
  )
}

/// Swaps month fragments into
/// `.calendar-wrapper` and keeps the
/// prev/next controls and per-cell
/// listeners in step with what is shown.
pub struct CalendarNavigator {
  document:       Document,
  wrapper:        HtmlElement,
  config:         Rc<ClientConfig>,
  modal:          Option<Rc<EventModalController>>,
  requests:       RefCell<RequestGeneration>,
  cell_listeners: RefCell<Vec<EventListener>>,
  nav_listener:   RefCell<Option<EventListener>>
}

impl CalendarNavigator {
  pub fn mount(
    document: &Document,
    config: Rc<ClientConfig>,
    modal: Option<Rc<EventModalController>>
  ) -> Option<Rc<Self>> {
    let Some(wrapper) =
      dom::query::<HtmlElement>(
        document,
        ".calendar-wrapper"
      )
    else {
      tracing::debug!(
        "no calendar wrapper; calendar \
         navigation inactive"
      );
      return None;
    };

    let navigator = Rc::new(Self {
      document: document.clone(),
      wrapper,
      config,
      modal,
      requests: RefCell::new(
        RequestGeneration::new()
      ),
      cell_listeners: RefCell::new(
        Vec::new()
      ),
      nav_listener: RefCell::new(None)
    });
    navigator.wire_cells();

    if let Some(container) =
      dom::query::<Element>(
        document,
        ".calendar-container"
      )
    {
      let weak = Rc::downgrade(&navigator);
      let listener =
        EventListener::new_with_options(
          &container,
          "click",
          EventListenerOptions::enable_prevent_default(),
          move |event| {
            let Some(navigator) =
              weak.upgrade()
            else {
              return;
            };
            let Some(control) =
              dom::target_element(event)
                .and_then(|target| {
                  dom::closest(
                    &target,
                    NAV_CONTROL
                  )
                })
            else {
              return;
            };
            event.prevent_default();

            match control_month(&control) {
              | Ok(month) => {
                navigator.load(month)
              }
              | Err(error) => {
                tracing::warn!(
                  %error,
                  "navigation control \
                   carries no usable month"
                )
              }
            }
          }
        );
      *navigator.nav_listener.borrow_mut() =
        Some(listener);
    }

    Some(navigator)
  }

  pub fn config(&self) -> &ClientConfig {
    &self.config
  }

  pub fn document(&self) -> &Document {
    &self.document
  }

  /// Fetches and shows `month`. A fetch
  /// overtaken by a newer one is dropped
  /// when it lands.
  pub fn load(
    self: &Rc<Self>,
    month: MonthRef
  ) {
    let generation =
      self.requests.borrow_mut().begin();
    dom::set_style(
      &self.wrapper,
      "opacity",
      &self
        .config
        .calendar
        .loading_opacity
        .to_string()
    );

    let navigator = Rc::clone(self);
    wasm_bindgen_futures::spawn_local(
      async move {
        let endpoint = navigator
          .config
          .endpoints
          .calendar_url();
        let result =
          api::fetch_calendar_fragment(
            &endpoint, month
          )
          .await;

        if !navigator
          .requests
          .borrow()
          .is_current(generation)
        {
          tracing::debug!(
            year = month.year(),
            month = month.month(),
            "discarding superseded \
             calendar response"
          );
          return;
        }

        dom::set_style(
          &navigator.wrapper,
          "opacity",
          "1"
        );
        match result {
          | Ok(fragment) => {
            navigator
              .wrapper
              .set_inner_html(&fragment);
            navigator.point_controls_at(month);
            navigator.wire_cells();
            tracing::info!(
              year = month.year(),
              month = month.month(),
              "loaded calendar month"
            );
          }
          | Err(error) => {
            tracing::error!(
              %error,
              year = month.year(),
              month = month.month(),
              "error fetching calendar"
            );
          }
        }
      }
    );
  }

  /// Months the prev/next controls
  /// currently point at.
  pub fn nav_controls(
    &self
  ) -> (Option<MonthRef>, Option<MonthRef>) {
    let read = |selector: &str| {
      dom::query::<Element>(
        &self.document,
        selector
      )
      .and_then(|control| {
        control_month(&control).ok()
      })
    };
    (read(NAV_PREV), read(NAV_NEXT))
  }

  fn point_controls_at(
    &self,
    displayed: MonthRef
  ) {
    let targets = displayed.nav_targets();
    for (selector, target) in [
      (NAV_PREV, targets.prev),
      (NAV_NEXT, targets.next)
    ] {
      if let Some(control) =
        dom::query::<Element>(
          &self.document,
          selector
        )
      {
        dom::set_data_attr(
          &control,
          "year",
          &target.year().to_string()
        );
        dom::set_data_attr(
          &control,
          "month",
          &target.month().to_string()
        );
      }
    }
  }

  /// Day cells and pills are replaced
  /// wholesale on every swap, so their
  /// listeners are rebuilt with them.
  fn wire_cells(self: &Rc<Self>) {
    let mut listeners = Vec::new();
    if let Some(modal) = &self.modal {
      listeners.extend(
        modal.attach_day_cells(&self.document)
      );
    }
    listeners.extend(drag_drop::attach(self));
    tracing::debug!(
      listeners = listeners.len(),
      "wired calendar cells"
    );
    *self.cell_listeners.borrow_mut() =
      listeners;
  }
}
