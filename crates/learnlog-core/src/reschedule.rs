use chrono::NaiveDate;
use learnlog_shared::{
  RescheduleRequest,
  RescheduleResponse
};

use crate::ClientError;
use crate::calendar::{
  MonthRef,
  displayed_month
};

/// MIME type the dragged entry id is
/// stored under in the drag payload.
pub const DRAG_PAYLOAD_MIME: &str =
  "text/plain";

/// Builds the reschedule body from the
/// drag payload and the drop cell's
/// `data-date`.
pub fn reschedule_request(
  payload: &str,
  target_date: &str
) -> Result<RescheduleRequest, ClientError>
{
  let entry_id = payload.trim();
  if entry_id.is_empty() {
    return Err(ClientError::Dom(
      "drag payload carries no entry id"
        .to_string()
    ));
  }

  let date = NaiveDate::parse_from_str(
    target_date.trim(),
    "%Y-%m-%d"
  )
  .map_err(|_| {
    ClientError::InvalidDate(
      target_date.to_string()
    )
  })?;

  Ok(RescheduleRequest {
    entry_id: entry_id.to_string(),
    date:     date
      .format("%Y-%m-%d")
      .to_string()
  })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RescheduleOutcome {
  Moved,
  Rejected { message: String }
}

impl RescheduleOutcome {
  pub fn alert_text(
    &self
  ) -> Option<String> {
    match self {
      | RescheduleOutcome::Moved => None,
      | RescheduleOutcome::Rejected {
        message
      } => Some(format!(
        "Failed to move event: {message}"
      ))
    }
  }

  /// Month to re-fetch after the server
  /// answered: the one on screen when the
  /// entry moved, nothing otherwise.
  pub fn refresh_month(
    &self,
    prev_control: Option<MonthRef>,
    next_control: Option<MonthRef>,
    today: NaiveDate
  ) -> Option<MonthRef> {
    match self {
      | RescheduleOutcome::Moved => {
        Some(displayed_month(
          prev_control,
          next_control,
          today
        ))
      }
      | RescheduleOutcome::Rejected {
        ..
      } => None
    }
  }
}

impl From<RescheduleResponse>
  for RescheduleOutcome
{
  fn from(
    response: RescheduleResponse
  ) -> Self {
    if response.is_success() {
      return RescheduleOutcome::Moved;
    }
    RescheduleOutcome::Rejected {
      message: response
        .message
        .filter(|message| {
          !message.trim().is_empty()
        })
        .unwrap_or_else(|| {
          format!(
            "server answered with status \
             {:?}",
            response.status
          )
        })
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn request_carries_trimmed_entry_and_iso_date()
  {
    let request =
      reschedule_request(" 17 ", "2024-03-09")
        .expect("valid drop");

    assert_eq!(request.entry_id, "17");
    assert_eq!(request.date, "2024-03-09");
  }

  #[test]
  fn empty_payload_is_refused() {
    assert!(
      reschedule_request("  ", "2024-03-09")
        .is_err()
    );
  }

  #[test]
  fn malformed_target_date_is_refused() {
    assert_eq!(
      reschedule_request("17", "March 9"),
      Err(ClientError::InvalidDate(
        "March 9".to_string()
      ))
    );
  }

  #[test]
  fn rejection_surfaces_server_message() {
    let outcome = RescheduleOutcome::from(
      RescheduleResponse {
        status:  "error".to_string(),
        message: Some(
          "Entry not found".to_string()
        )
      }
    );

    assert_eq!(
      outcome.alert_text().as_deref(),
      Some(
        "Failed to move event: Entry not \
         found"
      )
    );
    assert_eq!(
      outcome.refresh_month(
        None,
        None,
        NaiveDate::from_ymd_opt(2024, 3, 9)
          .expect("valid date")
      ),
      None
    );
  }

  #[test]
  fn success_has_no_alert() {
    let outcome = RescheduleOutcome::from(
      RescheduleResponse {
        status:  "success".to_string(),
        message: None
      }
    );

    assert_eq!(outcome, RescheduleOutcome::Moved);
    assert_eq!(outcome.alert_text(), None);
  }

  #[test]
  fn move_refreshes_month_on_screen() {
    let month = |year, month| {
      MonthRef::new(year, month)
        .expect("valid month")
    };
    let today =
      NaiveDate::from_ymd_opt(2031, 5, 5)
        .expect("valid date");

    assert_eq!(
      RescheduleOutcome::Moved.refresh_month(
        Some(month(2023, 12)),
        Some(month(2024, 2)),
        today
      ),
      Some(month(2024, 1))
    );
    assert_eq!(
      RescheduleOutcome::Moved.refresh_month(
        None, None, today
      ),
      Some(month(2031, 5))
    );
  }

  #[test]
  fn rejection_without_message_names_status()
  {
    let outcome = RescheduleOutcome::from(
      RescheduleResponse {
        status:  "denied".to_string(),
        message: None
      }
    );

    assert_eq!(
      outcome,
      RescheduleOutcome::Rejected {
        message: "server answered with \
                  status \"denied\""
          .to_string()
      }
    );
  }
}
