use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::EventListener;
use learnlog_core::modal::{
  EventModal,
  ModalTrigger
};
use web_sys::{
  Document,
  Element,
  HtmlElement,
  HtmlInputElement
};

use super::drag_drop::DAY_CELLS;
use crate::dom;

const OPEN_CLASS: &str = "active";

pub struct EventModalController {
  modal:      HtmlElement,
  date_input: Option<HtmlInputElement>,
  machine:    RefCell<EventModal>,
  listeners:  RefCell<Vec<EventListener>>
}

impl EventModalController {
  pub fn mount(
    document: &Document
  ) -> Option<Rc<Self>> {
    let modal = dom::by_id::<HtmlElement>(
      document,
      "eventModal"
    )?;
    let controller = Rc::new(Self {
      modal,
      date_input: dom::query(
        document,
        "input[name=event_date]"
      ),
      machine: RefCell::new(EventModal::new()),
      listeners: RefCell::new(Vec::new())
    });

    let mut listeners = Vec::new();

    if let Some(button) =
      dom::by_id::<Element>(
        document,
        "btn-new-event"
      )
    {
      let weak = Rc::downgrade(&controller);
      listeners.push(EventListener::new(
        &button,
        "click",
        move |_| {
          if let Some(controller) =
            weak.upgrade()
          {
            controller
              .apply(ModalTrigger::NewEvent);
          }
        }
      ));
    }

    for close in dom::query_all::<Element>(
      document,
      ".close-modal"
    ) {
      let weak = Rc::downgrade(&controller);
      listeners.push(EventListener::new(
        &close,
        "click",
        move |_| {
          if let Some(controller) =
            weak.upgrade()
          {
            controller.apply(
              ModalTrigger::CloseControl
            );
          }
        }
      ));
    }

    let weak = Rc::downgrade(&controller);
    listeners.push(EventListener::new(
      &controller.modal,
      "click",
      move |event| {
        let Some(controller) = weak.upgrade()
        else {
          return;
        };
        let on_backdrop = event
          .target()
          .is_some_and(|target| {
            dom::is_same_target(
              &target,
              &controller.modal
            )
          });
        controller.apply(
          ModalTrigger::ModalClick {
            on_backdrop
          }
        );
      }
    ));

    *controller.listeners.borrow_mut() =
      listeners;
    Some(controller)
  }

  /// Click handlers for the day cells
  /// currently in the document. The caller
  /// owns them and drops them when the
  /// cells are replaced.
  pub fn attach_day_cells(
    self: &Rc<Self>,
    document: &Document
  ) -> Vec<EventListener> {
    dom::query_all::<Element>(document, DAY_CELLS)
      .into_iter()
      .map(|cell| {
        let weak = Rc::downgrade(self);
        let day = cell.clone();
        EventListener::new(
          &cell,
          "click",
          move |event| {
            let Some(controller) =
              weak.upgrade()
            else {
              return;
            };
            let on_pill =
              dom::target_element(event)
                .and_then(|target| {
                  dom::closest(
                    &target,
                    ".event-pill"
                  )
                })
                .is_some();
            controller.apply(
              ModalTrigger::Day {
                date: dom::data_attr(
                  &day, "date"
                )
                .unwrap_or_default(),
                on_pill
              }
            );
          }
        )
      })
      .collect()
  }

  fn apply(&self, trigger: ModalTrigger) {
    let now = chrono::Local::now().time();
    let Some(effect) = self
      .machine
      .borrow_mut()
      .apply(&trigger, now)
    else {
      return;
    };

    if let (Some(value), Some(input)) =
      (&effect.prefill, &self.date_input)
    {
      input.set_value(value);
    }

    if effect.state.is_open() {
      dom::add_class(&self.modal, OPEN_CLASS);
    } else {
      dom::remove_class(
        &self.modal,
        OPEN_CLASS
      );
    }
    tracing::debug!(
      ?trigger,
      state = ?effect.state,
      "event modal"
    );
  }
}
