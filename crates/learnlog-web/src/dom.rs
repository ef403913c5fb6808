use learnlog_core::ClientError;
use learnlog_shared::CSRF_FIELD_NAME;
use wasm_bindgen::{
  JsCast,
  JsValue
};
use web_sys::{
  Document,
  Element,
  Event,
  HtmlElement,
  HtmlInputElement
};

pub fn query<T: JsCast>(
  document: &Document,
  selector: &str
) -> Option<T> {
  document
    .query_selector(selector)
    .ok()
    .flatten()
    .and_then(|element| {
      element.dyn_into::<T>().ok()
    })
}

pub fn query_all<T: JsCast>(
  document: &Document,
  selector: &str
) -> Vec<T> {
  let Ok(nodes) =
    document.query_selector_all(selector)
  else {
    tracing::warn!(
      selector,
      "invalid selector"
    );
    return Vec::new();
  };

  (0..nodes.length())
    .filter_map(|index| nodes.item(index))
    .filter_map(|node| {
      node.dyn_into::<T>().ok()
    })
    .collect()
}

pub fn by_id<T: JsCast>(
  document: &Document,
  id: &str
) -> Option<T> {
  document
    .get_element_by_id(id)
    .and_then(|element| {
      element.dyn_into::<T>().ok()
    })
}

pub fn data_attr(
  element: &Element,
  name: &str
) -> Option<String> {
  element
    .get_attribute(&format!("data-{name}"))
}

pub fn set_data_attr(
  element: &Element,
  name: &str,
  value: &str
) {
  let _ = element.set_attribute(
    &format!("data-{name}"),
    value
  );
}

pub fn add_class(
  element: &Element,
  class: &str
) {
  let _ = element.class_list().add_1(class);
}

pub fn remove_class(
  element: &Element,
  class: &str
) {
  let _ =
    element.class_list().remove_1(class);
}

pub fn toggle_class(
  element: &Element,
  class: &str
) {
  let _ =
    element.class_list().toggle(class);
}

pub fn set_style(
  element: &HtmlElement,
  property: &str,
  value: &str
) {
  if let Err(error) = element
    .style()
    .set_property(property, value)
  {
    tracing::warn!(
      property,
      ?error,
      "failed setting inline style"
    );
  }
}

/// The element the event was dispatched
/// to, if it is one.
pub fn target_element(
  event: &Event
) -> Option<Element> {
  event
    .target()
    .and_then(|target| {
      target.dyn_into::<Element>().ok()
    })
}

pub fn is_same_target(
  left: &impl AsRef<JsValue>,
  right: &impl AsRef<JsValue>
) -> bool {
  left.as_ref() == right.as_ref()
}

pub fn closest(
  element: &Element,
  selector: &str
) -> Option<Element> {
  element.closest(selector).ok().flatten()
}

pub fn csrf_token(
  document: &Document
) -> Result<String, ClientError> {
  query::<HtmlInputElement>(
    document,
    &format!("[name={CSRF_FIELD_NAME}]")
  )
  .map(|input| input.value())
  .filter(|token| !token.is_empty())
  .ok_or(ClientError::MissingCsrfToken)
}

pub fn js_error(value: JsValue) -> ClientError {
  ClientError::Dom(
    value
      .as_string()
      .unwrap_or_else(|| format!("{value:?}"))
  )
}
