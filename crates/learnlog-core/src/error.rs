use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
  #[error("request to {endpoint} failed: {message}")]
  Transport {
    endpoint: String,
    message:  String
  },

  #[error("{endpoint} answered with HTTP {status}")]
  Status {
    endpoint: String,
    status:   u16
  },

  #[error("could not decode response from {endpoint}: {message}")]
  Decode {
    endpoint: String,
    message:  String
  },

  #[error("server rejected the request: {message}")]
  Rejected { message: String },

  #[error("no csrf token found in the page")]
  MissingCsrfToken,

  #[error("invalid calendar month {year}-{month}")]
  InvalidMonth { year: String, month: String },

  #[error("invalid calendar date {0:?}")]
  InvalidDate(String),

  #[error("{machine} cannot handle {event} while {state}")]
  InvalidTransition {
    machine: &'static str,
    state:   &'static str,
    event:   &'static str
  },

  #[error("client storage unavailable: {0}")]
  Storage(String),

  #[error("browser api failed: {0}")]
  Dom(String)
}

impl ClientError {
  /// Network-level failures: the
  /// request never produced a usable
  /// answer.
  pub fn is_transport(&self) -> bool {
    matches!(
      self,
      ClientError::Transport { .. }
        | ClientError::Status { .. }
        | ClientError::Decode { .. }
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn transport_class_covers_network_status_and_decode()
  {
    let endpoint = "/api/autosave/".to_string();

    assert!(
      ClientError::Transport {
        endpoint: endpoint.clone(),
        message:  "offline".to_string()
      }
      .is_transport()
    );
    assert!(
      ClientError::Status {
        endpoint: endpoint.clone(),
        status:   502
      }
      .is_transport()
    );
    assert!(
      ClientError::Decode {
        endpoint,
        message: "eof".to_string()
      }
      .is_transport()
    );
    assert!(
      !ClientError::Rejected {
        message: "nope".to_string()
      }
      .is_transport()
    );
    assert!(
      !ClientError::MissingCsrfToken
        .is_transport()
    );
  }

  #[test]
  fn status_error_names_endpoint_and_code()
  {
    let error = ClientError::Status {
      endpoint: "/api/calendar/".to_string(),
      status:   404
    };

    assert_eq!(
      error.to_string(),
      "/api/calendar/ answered with HTTP 404"
    );
  }
}
