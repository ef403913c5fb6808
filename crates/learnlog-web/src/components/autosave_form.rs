use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::EventListener;
use gloo::timers::callback::Timeout;
use learnlog_core::ClientError;
use learnlog_core::autosave::{
  AutosaveController,
  AutosaveStatus,
  DebounceTicket
};
use learnlog_core::config::ClientConfig;
use learnlog_core::generation::Generation;
use web_sys::{
  Document,
  FormData,
  HtmlElement,
  HtmlFormElement
};

use crate::{
  api,
  dom
};

fn millis(
  duration: std::time::Duration
) -> u32 {
  duration
    .as_millis()
    .min(u32::MAX as u128) as u32
}

/// Draft autosave for `.js-autosave-form`.
pub struct AutosaveForm {
  document:       Document,
  form:           HtmlFormElement,
  status:         Option<HtmlElement>,
  endpoint:       String,
  controller:     RefCell<AutosaveController>,
  debounce_timer: RefCell<Option<Timeout>>,
  clear_timer:    RefCell<Option<Timeout>>,
  input_listener: RefCell<Option<EventListener>>
}

impl AutosaveForm {
  pub fn mount(
    document: &Document,
    config: &ClientConfig
  ) -> Option<Rc<Self>> {
    let form = dom::query::<HtmlFormElement>(
      document,
      ".js-autosave-form"
    )?;

    let autosave = Rc::new(Self {
      document: document.clone(),
      form,
      status: dom::by_id(
        document,
        "autosave-status"
      ),
      endpoint: config.endpoints.autosave_url(),
      controller: RefCell::new(
        AutosaveController::new(
          config.autosave.debounce(),
          config.autosave.saved_clear()
        )
      ),
      debounce_timer: RefCell::new(None),
      clear_timer: RefCell::new(None),
      input_listener: RefCell::new(None)
    });

    let weak = Rc::downgrade(&autosave);
    let listener = EventListener::new(
      &autosave.form,
      "input",
      move |_| {
        if let Some(autosave) = weak.upgrade()
        {
          autosave.on_input();
        }
      }
    );
    *autosave.input_listener.borrow_mut() =
      Some(listener);

    tracing::debug!(
      endpoint = %autosave.endpoint,
      "autosave armed"
    );
    Some(autosave)
  }

  fn show(&self, status: AutosaveStatus) {
    if let Some(indicator) = &self.status {
      indicator
        .set_text_content(Some(status.label()));
    }
  }

  fn on_input(self: &Rc<Self>) {
    let (ticket, delay) = {
      let mut controller =
        self.controller.borrow_mut();
      let ticket = controller.on_input();
      (ticket, controller.debounce_delay())
    };
    self.show(AutosaveStatus::Typing);

    let weak = Rc::downgrade(self);
    // Replacing the handle cancels the
    // previous timer.
    *self.debounce_timer.borrow_mut() =
      Some(Timeout::new(
        millis(delay),
        move || {
          if let Some(autosave) =
            weak.upgrade()
          {
            autosave.on_timer(ticket);
          }
        }
      ));
  }

  fn on_timer(
    self: &Rc<Self>,
    ticket: DebounceTicket
  ) {
    let Some(generation) = self
      .controller
      .borrow_mut()
      .on_timer(ticket)
    else {
      return;
    };
    self.show(AutosaveStatus::Saving);

    let prepared = FormData::new_with_form(
      &self.form
    )
    .map_err(dom::js_error)
    .and_then(|form| {
      dom::csrf_token(&self.document)
        .map(|token| (form, token))
    });
    let (form, token) = match prepared {
      | Ok(prepared) => prepared,
      | Err(error) => {
        self.finish(generation, Err(error));
        return;
      }
    };

    let autosave = Rc::clone(self);
    wasm_bindgen_futures::spawn_local(
      async move {
        let result = api::post_autosave(
          &autosave.endpoint,
          form,
          &token
        )
        .await
        .map(|ack| {
          tracing::debug!(
            ?ack,
            "draft acknowledged"
          );
        });
        autosave.finish(generation, result);
      }
    );
  }

  fn finish(
    self: &Rc<Self>,
    generation: Generation,
    result: Result<(), ClientError>
  ) {
    if let Err(error) = &result {
      tracing::error!(
        %error,
        "autosave failed"
      );
    }

    let applied = self
      .controller
      .borrow_mut()
      .on_response(
        generation,
        result.as_ref().map(|_| ())
      );
    let Some(status) = applied else {
      return;
    };
    self.show(status);

    if status == AutosaveStatus::Saved {
      let delay = self
        .controller
        .borrow()
        .saved_clear_delay();
      let weak = Rc::downgrade(self);
      *self.clear_timer.borrow_mut() =
        Some(Timeout::new(
          millis(delay),
          move || {
            let Some(autosave) = weak.upgrade()
            else {
              return;
            };
            let cleared = autosave
              .controller
              .borrow_mut()
              .on_saved_expired(generation);
            if cleared {
              autosave.show(AutosaveStatus::Idle);
            }
          }
        ));
    }
  }
}
