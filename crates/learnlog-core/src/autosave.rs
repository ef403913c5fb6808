use std::time::Duration;

use tracing::debug;

use crate::ClientError;
use crate::generation::{
  Generation,
  RequestGeneration
};

/// Handle for one scheduled debounce
/// expiry.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub struct DebounceTicket(u64);

/// Trailing-edge debounce.
///
/// Every `touch` supersedes the previous
/// ticket; only the newest one may fire.
#[derive(Debug, Clone)]
pub struct Debounce {
  delay:   Duration,
  issued:  u64,
  pending: Option<u64>
}

impl Debounce {
  pub fn new(delay: Duration) -> Self {
    Self {
      delay,
      issued: 0,
      pending: None
    }
  }

  pub fn delay(&self) -> Duration {
    self.delay
  }

  pub fn touch(
    &mut self
  ) -> DebounceTicket {
    self.issued += 1;
    self.pending = Some(self.issued);
    DebounceTicket(self.issued)
  }

  /// Consumes the pending fire if
  /// `ticket` is still the newest one.
  pub fn fire(
    &mut self,
    ticket: DebounceTicket
  ) -> bool {
    match self.pending {
      | Some(pending) if pending == ticket.0 => {
        self.pending = None;
        true
      }
      | _ => false
    }
  }
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum AutosaveStatus {
  Idle,
  Typing,
  Saving,
  Saved,
  Failed
}

impl AutosaveStatus {
  pub fn label(&self) -> &'static str {
    match self {
      | AutosaveStatus::Idle => "",
      | AutosaveStatus::Typing => {
        "Typing..."
      }
      | AutosaveStatus::Saving => {
        "Saving draft..."
      }
      | AutosaveStatus::Saved => {
        "Draft saved"
      }
      | AutosaveStatus::Failed => {
        "Save failed"
      }
    }
  }
}

/// Status indicator and request
/// bookkeeping for the draft form.
#[derive(Debug, Clone)]
pub struct AutosaveController {
  debounce:    Debounce,
  requests:    RequestGeneration,
  status:      AutosaveStatus,
  saved_clear: Duration
}

impl AutosaveController {
  pub fn new(
    debounce: Duration,
    saved_clear: Duration
  ) -> Self {
    Self {
      debounce: Debounce::new(debounce),
      requests: RequestGeneration::new(),
      status: AutosaveStatus::Idle,
      saved_clear
    }
  }

  pub fn status(
    &self
  ) -> AutosaveStatus {
    self.status
  }

  pub fn debounce_delay(
    &self
  ) -> Duration {
    self.debounce.delay()
  }

  pub fn saved_clear_delay(
    &self
  ) -> Duration {
    self.saved_clear
  }

  pub fn on_input(
    &mut self
  ) -> DebounceTicket {
    self.status = AutosaveStatus::Typing;
    self.debounce.touch()
  }

  /// Returns the generation of the save
  /// to issue, or `None` when the timer
  /// was superseded by later input.
  pub fn on_timer(
    &mut self,
    ticket: DebounceTicket
  ) -> Option<Generation> {
    if !self.debounce.fire(ticket) {
      debug!(
        ?ticket,
        "ignoring superseded autosave \
         timer"
      );
      return None;
    }
    self.status = AutosaveStatus::Saving;
    Some(self.requests.begin())
  }

  /// Applies a save result. Stale
  /// results leave the indicator alone
  /// and yield `None`.
  pub fn on_response(
    &mut self,
    generation: Generation,
    result: Result<(), &ClientError>
  ) -> Option<AutosaveStatus> {
    if !self.requests.is_current(generation)
    {
      debug!(
        generation = generation.value(),
        "discarding stale autosave \
         response"
      );
      return None;
    }
    self.status = match result {
      | Ok(()) => AutosaveStatus::Saved,
      | Err(_) => AutosaveStatus::Failed
    };
    Some(self.status)
  }

  /// Clears "Draft saved" once its
  /// display time is up, unless anything
  /// has replaced it since.
  pub fn on_saved_expired(
    &mut self,
    generation: Generation
  ) -> bool {
    if self.status == AutosaveStatus::Saved
      && self.requests.is_current(generation)
    {
      self.status = AutosaveStatus::Idle;
      return true;
    }
    false
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn controller() -> AutosaveController {
    AutosaveController::new(
      Duration::from_millis(2_000),
      Duration::from_millis(3_000)
    )
  }

  #[test]
  fn labels_match_indicator_text() {
    assert_eq!(
      AutosaveStatus::Typing.label(),
      "Typing..."
    );
    assert_eq!(
      AutosaveStatus::Saving.label(),
      "Saving draft..."
    );
    assert_eq!(
      AutosaveStatus::Saved.label(),
      "Draft saved"
    );
    assert_eq!(
      AutosaveStatus::Failed.label(),
      "Save failed"
    );
    assert_eq!(
      AutosaveStatus::Idle.label(),
      ""
    );
  }

  #[test]
  fn only_last_ticket_fires() {
    let mut debounce = Debounce::new(
      Duration::from_millis(2_000)
    );
    let first = debounce.touch();
    let second = debounce.touch();

    assert!(!debounce.fire(first));
    assert!(debounce.fire(second));
    assert!(!debounce.fire(second));
  }

  #[test]
  fn input_then_timer_moves_through_saving()
  {
    let mut autosave = controller();
    let ticket = autosave.on_input();
    assert_eq!(
      autosave.status(),
      AutosaveStatus::Typing
    );

    let generation = autosave
      .on_timer(ticket)
      .expect("timer fires");
    assert_eq!(
      autosave.status(),
      AutosaveStatus::Saving
    );

    assert_eq!(
      autosave
        .on_response(generation, Ok(())),
      Some(AutosaveStatus::Saved)
    );
    assert!(
      autosave.on_saved_expired(generation)
    );
    assert_eq!(
      autosave.status(),
      AutosaveStatus::Idle
    );
  }

  #[test]
  fn failure_is_held_and_never_auto_cleared()
  {
    let mut autosave = controller();
    let ticket = autosave.on_input();
    let generation = autosave
      .on_timer(ticket)
      .expect("timer fires");
    let error = ClientError::Status {
      endpoint: "/api/autosave/"
        .to_string(),
      status:   500
    };

    assert_eq!(
      autosave.on_response(
        generation,
        Err(&error)
      ),
      Some(AutosaveStatus::Failed)
    );
    assert!(
      !autosave.on_saved_expired(generation)
    );
    assert_eq!(
      autosave.status(),
      AutosaveStatus::Failed
    );
  }

  #[test]
  fn stale_response_does_not_touch_indicator()
  {
    let mut autosave = controller();
    let first_ticket = autosave.on_input();
    let first = autosave
      .on_timer(first_ticket)
      .expect("first fires");
    let second_ticket =
      autosave.on_input();
    let second = autosave
      .on_timer(second_ticket)
      .expect("second fires");

    assert_eq!(
      autosave.on_response(second, Ok(())),
      Some(AutosaveStatus::Saved)
    );
    let error = ClientError::Transport {
      endpoint: "/api/autosave/"
        .to_string(),
      message:  "reset".to_string()
    };
    assert_eq!(
      autosave
        .on_response(first, Err(&error)),
      None
    );
    assert_eq!(
      autosave.status(),
      AutosaveStatus::Saved
    );
  }

  #[test]
  fn saved_clear_is_skipped_once_typing_resumes()
  {
    let mut autosave = controller();
    let ticket = autosave.on_input();
    let generation = autosave
      .on_timer(ticket)
      .expect("timer fires");
    autosave.on_response(generation, Ok(()));
    autosave.on_input();

    assert!(
      !autosave.on_saved_expired(generation)
    );
    assert_eq!(
      autosave.status(),
      AutosaveStatus::Typing
    );
  }
}
