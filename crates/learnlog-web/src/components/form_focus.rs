use gloo::events::EventListener;
use web_sys::{
  Document,
  HtmlElement
};

use crate::dom;

const FIELDS: &str = ".form input[type=text], \
                      .form input[type=email], \
                      .form input[type=password], \
                      .form textarea";

/// Slight zoom on the focused form field.
pub fn attach(
  document: &Document
) -> Vec<EventListener> {
  dom::query_all::<HtmlElement>(document, FIELDS)
    .into_iter()
    .flat_map(|field| {
      let focused = field.clone();
      let blurred = field.clone();
      [
        EventListener::new(
          &field,
          "focus",
          move |_| {
            dom::set_style(
              &focused,
              "transform",
              "scale(1.02)"
            )
          }
        ),
        EventListener::new(
          &field,
          "blur",
          move |_| {
            dom::set_style(
              &blurred,
              "transform",
              "scale(1)"
            )
          }
        ),
      ]
    })
    .collect()
}
