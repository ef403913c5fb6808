use gloo::net::http::{
  Request,
  Response
};
use learnlog_core::ClientError;
use learnlog_core::calendar::MonthRef;
use learnlog_shared::{
  AutosaveAck,
  CSRF_HEADER,
  RescheduleRequest,
  RescheduleResponse
};
use web_sys::FormData;

fn transport_error(
  endpoint: &str,
  error: gloo::net::Error
) -> ClientError {
  ClientError::Transport {
    endpoint: endpoint.to_string(),
    message:  error.to_string()
  }
}

fn decode_error(
  endpoint: &str,
  error: gloo::net::Error
) -> ClientError {
  ClientError::Decode {
    endpoint: endpoint.to_string(),
    message:  error.to_string()
  }
}

fn ensure_ok(
  endpoint: &str,
  response: &Response
) -> Result<(), ClientError> {
  if response.ok() {
    return Ok(());
  }
  Err(ClientError::Status {
    endpoint: endpoint.to_string(),
    status:   response.status()
  })
}

/// Rendered calendar grid for `month`.
pub async fn fetch_calendar_fragment(
  endpoint: &str,
  month: MonthRef
) -> Result<String, ClientError> {
  let response = Request::get(endpoint)
    .query(month.query().pairs())
    .send()
    .await
    .map_err(|error| {
      transport_error(endpoint, error)
    })?;
  ensure_ok(endpoint, &response)?;

  response
    .text()
    .await
    .map_err(|error| decode_error(endpoint, error))
}

pub async fn post_autosave(
  endpoint: &str,
  form: FormData,
  csrf_token: &str
) -> Result<AutosaveAck, ClientError> {
  let response = Request::post(endpoint)
    .header(CSRF_HEADER, csrf_token)
    .body(form)
    .map_err(|error| {
      transport_error(endpoint, error)
    })?
    .send()
    .await
    .map_err(|error| {
      transport_error(endpoint, error)
    })?;
  ensure_ok(endpoint, &response)?;

  response
    .json::<AutosaveAck>()
    .await
    .map_err(|error| decode_error(endpoint, error))
}

/// Error statuses still carry a JSON body
/// with the reason, so the body is read
/// before the status is judged.
pub async fn post_reschedule(
  endpoint: &str,
  request: &RescheduleRequest,
  csrf_token: &str
) -> Result<RescheduleResponse, ClientError>
{
  let response = Request::post(endpoint)
    .header(CSRF_HEADER, csrf_token)
    .json(request)
    .map_err(|error| {
      transport_error(endpoint, error)
    })?
    .send()
    .await
    .map_err(|error| {
      transport_error(endpoint, error)
    })?;

  match response
    .json::<RescheduleResponse>()
    .await
  {
    | Ok(body) => Ok(body),
    | Err(error) => {
      ensure_ok(endpoint, &response)?;
      Err(decode_error(endpoint, error))
    }
  }
}
