use std::rc::{
  Rc,
  Weak
};

use gloo::events::EventListener;
use learnlog_core::ClientError;
use learnlog_core::theme::{
  SubscriptionId,
  Theme,
  ThemeController,
  ThemeListener,
  ThemeListeners,
  ThemeStore
};
use wasm_bindgen::JsCast;
use web_sys::{
  Document,
  Element,
  Storage,
  StorageEvent
};

use crate::dom;

const THEME_ATTR: &str = "data-theme";

fn local_storage() -> Option<Storage> {
  web_sys::window()?
    .local_storage()
    .ok()
    .flatten()
}

/// Theme preference in `localStorage`.
/// Writes from other tabs arrive through
/// the window `storage` event.
pub struct LocalThemeStore {
  key:              String,
  listeners:        Rc<ThemeListeners>,
  _storage_changes: Option<EventListener>
}

impl LocalThemeStore {
  pub fn new(key: &str) -> Self {
    let listeners =
      Rc::new(ThemeListeners::new());

    let storage_changes =
      web_sys::window().map(|window| {
        let key = key.to_string();
        let listeners = Rc::clone(&listeners);
        EventListener::new(
          &window,
          "storage",
          move |event| {
            let Some(event) =
              event.dyn_ref::<StorageEvent>()
            else {
              return;
            };
            if event.key().as_deref()
              != Some(key.as_str())
            {
              return;
            }
            let theme = event
              .new_value()
              .as_deref()
              .and_then(Theme::parse_stored);
            if let Some(theme) = theme {
              tracing::debug!(
                theme = theme.as_attr(),
                "theme changed in another tab"
              );
              listeners.notify(theme);
            }
          }
        )
      });

    Self {
      key: key.to_string(),
      listeners,
      _storage_changes: storage_changes
    }
  }

  fn storage(
    &self
  ) -> Result<Storage, ClientError> {
    local_storage().ok_or_else(|| {
      ClientError::Storage(
        "local storage unavailable".to_string()
      )
    })
  }
}

impl ThemeStore for LocalThemeStore {
  fn load(
    &self
  ) -> Result<Option<Theme>, ClientError> {
    let raw = self
      .storage()?
      .get_item(&self.key)
      .map_err(dom::js_error)?;
    Ok(
      raw
        .as_deref()
        .and_then(Theme::parse_stored)
    )
  }

  fn save(
    &self,
    theme: Theme
  ) -> Result<(), ClientError> {
    self
      .storage()?
      .set_item(&self.key, theme.as_attr())
      .map_err(dom::js_error)?;
    self.listeners.notify(theme);
    Ok(())
  }

  fn subscribe(
    &self,
    listener: ThemeListener
  ) -> SubscriptionId {
    self.listeners.add(listener)
  }

  fn unsubscribe(
    &self,
    id: SubscriptionId
  ) {
    self.listeners.remove(id);
  }
}

fn apply(
  root: &Element,
  icon: Option<&Element>,
  theme: Theme
) {
  let _ = root
    .set_attribute(THEME_ATTR, theme.as_attr());
  if let Some(icon) = icon {
    icon.set_class_name(theme.icon_class());
  }
}

pub struct ThemeToggle {
  controller:   ThemeController<LocalThemeStore>,
  subscription: SubscriptionId,
  _click:       Option<EventListener>
}

impl ThemeToggle {
  pub fn mount(
    document: &Document,
    storage_key: &str
  ) -> Option<Rc<Self>> {
    let root = document.document_element()?;
    let button = dom::by_id::<Element>(
      document,
      "theme-toggle"
    );
    let icon =
      button.as_ref().and_then(|button| {
        button
          .query_selector("i")
          .ok()
          .flatten()
      });

    let controller = ThemeController::new(
      LocalThemeStore::new(storage_key)
    );
    if let Some(theme) =
      controller.initial_theme()
    {
      apply(&root, icon.as_ref(), theme);
    }

    let subscription = {
      let root = root.clone();
      let icon = icon.clone();
      controller.store().subscribe(Box::new(
        move |theme: Theme| {
          apply(&root, icon.as_ref(), theme)
        }
      ))
    };

    let toggle = Rc::new_cyclic(
      |weak: &Weak<Self>| Self {
        controller,
        subscription,
        _click: button.map(|button| {
          on_click(
            &button,
            weak.clone(),
            root,
            icon
          )
        })
      }
    );
    Some(toggle)
  }
}

fn on_click(
  button: &Element,
  toggle: Weak<ThemeToggle>,
  root: Element,
  icon: Option<Element>
) -> EventListener {
  EventListener::new(button, "click", move |_| {
    let Some(toggle) = toggle.upgrade() else {
      return;
    };
    let current =
      root.get_attribute(THEME_ATTR);
    let theme = toggle
      .controller
      .toggle(current.as_deref());
    apply(&root, icon.as_ref(), theme);
    tracing::info!(
      theme = theme.as_attr(),
      "theme toggled"
    );
  })
}

impl Drop for ThemeToggle {
  fn drop(&mut self) {
    self
      .controller
      .store()
      .unsubscribe(self.subscription);
  }
}
