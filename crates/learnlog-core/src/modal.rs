use chrono::{
  NaiveDate,
  NaiveTime
};
use tracing::warn;

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
)]
pub enum ModalState {
  #[default]
  Closed,
  Open
}

impl ModalState {
  pub fn is_open(&self) -> bool {
    matches!(self, ModalState::Open)
  }
}

/// What the user clicked, already
/// classified by the DOM layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalTrigger {
  NewEvent,
  Day {
    date:    String,
    on_pill: bool
  },
  CloseControl,
  /// A click that reached the modal
  /// element. `on_backdrop` is false when
  /// the target was inside the content.
  ModalClick { on_backdrop: bool }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalEffect {
  pub state:   ModalState,
  /// Value for the `event_date`
  /// datetime-local input, if it should
  /// be overwritten.
  pub prefill: Option<String>
}

/// Open/closed machine for the event
/// dialog.
#[derive(Debug, Clone, Default)]
pub struct EventModal {
  state: ModalState
}

impl EventModal {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn state(&self) -> ModalState {
    self.state
  }

  pub fn apply(
    &mut self,
    trigger: &ModalTrigger,
    now: NaiveTime
  ) -> Option<ModalEffect> {
    let (state, prefill) = match trigger
    {
      | ModalTrigger::NewEvent => {
        (ModalState::Open, None)
      }
      | ModalTrigger::Day {
        on_pill: true,
        ..
      } => return None,
      | ModalTrigger::Day {
        date,
        on_pill: false
      } => {
        let prefill =
          event_datetime_value(date, now);
        if prefill.is_none() {
          warn!(
            date = %date,
            "day cell carries an \
             unparseable date; opening \
             without prefill"
          );
        }
        (ModalState::Open, prefill)
      }
      | ModalTrigger::CloseControl
      | ModalTrigger::ModalClick {
        on_backdrop: true
      } => (ModalState::Closed, None),
      | ModalTrigger::ModalClick {
        on_backdrop: false
      } => return None
    };

    self.state = state;
    Some(ModalEffect { state, prefill })
  }
}

/// `YYYY-MM-DDTHH:MM` for the clicked
/// day at the current wall-clock minute.
pub fn event_datetime_value(
  date: &str,
  now: NaiveTime
) -> Option<String> {
  let day = NaiveDate::parse_from_str(
    date.trim(),
    "%Y-%m-%d"
  )
  .ok()?;
  Some(format!(
    "{}T{}",
    day.format("%Y-%m-%d"),
    now.format("%H:%M")
  ))
}
