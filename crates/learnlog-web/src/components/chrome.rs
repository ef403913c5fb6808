use chrono::Datelike;
use gloo::events::EventListener;
use web_sys::{
  Document,
  Element
};

use crate::dom;

/// Navbar collapse, the mobile menu and
/// the footer year. Visual state only.
pub struct PageChrome {
  _listeners: Vec<EventListener>
}

impl PageChrome {
  pub fn mount(document: &Document) -> Self {
    let mut listeners = Vec::new();
    listeners.extend(navbar(document));
    listeners.extend(mobile_menu(document));
    stamp_year(document);

    tracing::debug!(
      listeners = listeners.len(),
      "page chrome wired"
    );
    Self {
      _listeners: listeners
    }
  }
}

fn navbar(
  document: &Document
) -> Option<EventListener> {
  let toggler = dom::query::<Element>(
    document,
    ".navbar__toggler"
  )?;
  let collapse = dom::query::<Element>(
    document,
    ".navbar__collapse"
  )?;

  let button = toggler.clone();
  Some(EventListener::new(
    &toggler,
    "click",
    move |_| {
      dom::toggle_class(&button, "active");
      dom::toggle_class(&collapse, "active");
    }
  ))
}

fn mobile_menu(
  document: &Document
) -> Vec<EventListener> {
  let (Some(open), Some(close), Some(menu)) = (
    dom::by_id::<Element>(
      document,
      "mobile-menu-toggle"
    ),
    dom::by_id::<Element>(
      document,
      "mobile-menu-close"
    ),
    dom::by_id::<Element>(document, "mobile-menu")
  ) else {
    return Vec::new();
  };

  let shown = menu.clone();
  vec![
    EventListener::new(&open, "click", move |_| {
      dom::add_class(&shown, "open");
    }),
    EventListener::new(&close, "click", move |_| {
      dom::remove_class(&menu, "open");
    }),
  ]
}

fn stamp_year(document: &Document) {
  if let Some(footer) =
    dom::by_id::<Element>(document, "time")
  {
    let year = chrono::Local::now().year();
    footer.set_text_content(Some(
      &year.to_string()
    ));
  }
}
