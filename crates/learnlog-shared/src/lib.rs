use serde::{
  Deserialize,
  Serialize
};

/// Header the server reads the CSRF
/// token from on every mutating call.
pub const CSRF_HEADER: &str =
  "X-CSRFToken";

/// Name of the hidden form field that
/// carries the CSRF token in rendered
/// markup.
pub const CSRF_FIELD_NAME: &str =
  "csrfmiddlewaretoken";

pub const STATUS_SUCCESS: &str =
  "success";

#[derive(
  Debug,
  Clone,
  Copy,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct CalendarQuery {
  pub year:  i32,
  pub month: u32
}

impl CalendarQuery {
  pub fn pairs(
    &self
  ) -> [(&'static str, String); 2] {
    [
      ("year", self.year.to_string()),
      ("month", self.month.to_string())
    ]
  }
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct RescheduleRequest {
  pub entry_id: String,
  pub date:     String
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct RescheduleResponse {
  pub status:  String,
  #[serde(default)]
  pub message: Option<String>
}

impl RescheduleResponse {
  pub fn is_success(&self) -> bool {
    self.status == STATUS_SUCCESS
  }
}

/// Body returned by the draft-save
/// endpoint. The server does not pin
/// its shape down; any JSON object
/// counts as an acknowledgement.
#[derive(
  Debug,
  Clone,
  Default,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct AutosaveAck {
  #[serde(default)]
  pub status:   Option<String>,
  #[serde(default)]
  pub message:  Option<String>,
  #[serde(default)]
  pub saved_at: Option<String>
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn reschedule_request_uses_snake_case_keys()
  {
    let request = RescheduleRequest {
      entry_id: "42".to_string(),
      date:     "2024-03-09".to_string()
    };

    let json =
      serde_json::to_value(&request)
        .expect("serialize request");

    assert_eq!(
      json,
      serde_json::json!({
        "entry_id": "42",
        "date": "2024-03-09"
      })
    );
  }

  #[test]
  fn reschedule_response_without_message_is_accepted()
  {
    let response: RescheduleResponse =
      serde_json::from_str(
        r#"{"status":"success"}"#
      )
      .expect("decode response");

    assert!(response.is_success());
    assert_eq!(response.message, None);
  }

  #[test]
  fn reschedule_response_error_carries_message()
  {
    let response: RescheduleResponse =
      serde_json::from_str(
        r#"{"status":"error","message":"Entry not found"}"#
      )
      .expect("decode response");

    assert!(!response.is_success());
    assert_eq!(
      response.message.as_deref(),
      Some("Entry not found")
    );
  }

  #[test]
  fn autosave_ack_tolerates_unknown_fields()
  {
    let ack: AutosaveAck =
      serde_json::from_str(
        r#"{"status":"ok","draft_id":7}"#
      )
      .expect("decode ack");

    assert_eq!(
      ack.status.as_deref(),
      Some("ok")
    );
    assert_eq!(ack.saved_at, None);

    let empty: AutosaveAck =
      serde_json::from_str("{}")
        .expect("decode empty ack");
    assert_eq!(
      empty,
      AutosaveAck::default()
    );
  }

  #[test]
  fn calendar_query_pairs_are_one_indexed()
  {
    let query = CalendarQuery {
      year:  2024,
      month: 1
    };

    assert_eq!(
      query.pairs(),
      [
        ("year", "2024".to_string()),
        ("month", "1".to_string())
      ]
    );
  }
}
