use std::cell::{
  Cell,
  RefCell
};

use tracing::{
  debug,
  error,
  warn
};

use crate::ClientError;

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum Theme {
  Light,
  Dark
}

impl Theme {
  /// Value written to `data-theme` and to
  /// client storage.
  pub fn as_attr(&self) -> &'static str {
    match self {
      | Theme::Light => "light",
      | Theme::Dark => "dark"
    }
  }

  pub fn from_attr(
    raw: Option<&str>
  ) -> Option<Self> {
    match raw.map(str::trim) {
      | Some("light") => Some(Theme::Light),
      | Some("dark") => Some(Theme::Dark),
      | _ => None
    }
  }

  /// Reads a stored preference. Also
  /// accepts the values the old body
  /// class toggle wrote under the same
  /// key.
  pub fn parse_stored(
    raw: &str
  ) -> Option<Self> {
    match raw.trim() {
      | "light" | "" => Some(Theme::Light),
      | "dark" | "dark-mode" => {
        Some(Theme::Dark)
      }
      | _ => None
    }
  }

  /// Anything that is not explicitly
  /// light toggles to light.
  pub fn toggled_from(
    current: Option<Theme>
  ) -> Theme {
    match current {
      | Some(Theme::Light) => Theme::Dark,
      | _ => Theme::Light
    }
  }

  pub fn icon_class(
    &self
  ) -> &'static str {
    match self {
      | Theme::Light => "fas fa-sun",
      | Theme::Dark => "fas fa-moon"
    }
  }
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub struct SubscriptionId(u64);

pub type ThemeListener = Box<dyn Fn(Theme)>;

/// Persisted theme preference.
///
/// Implementations notify subscribers on
/// every successful `save`, and on
/// out-of-band changes when the backing
/// store can observe them.
pub trait ThemeStore {
  fn load(
    &self
  ) -> Result<Option<Theme>, ClientError>;

  fn save(
    &self,
    theme: Theme
  ) -> Result<(), ClientError>;

  fn subscribe(
    &self,
    listener: ThemeListener
  ) -> SubscriptionId;

  fn unsubscribe(
    &self,
    id: SubscriptionId
  );
}

/// Listener registry shared by store
/// implementations.
#[derive(Default)]
pub struct ThemeListeners {
  next_id:   Cell<u64>,
  listeners:
    RefCell<Vec<(SubscriptionId, ThemeListener)>>
}

impl ThemeListeners {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn add(
    &self,
    listener: ThemeListener
  ) -> SubscriptionId {
    let id =
      SubscriptionId(self.next_id.get());
    self.next_id.set(id.0 + 1);
    self
      .listeners
      .borrow_mut()
      .push((id, listener));
    id
  }

  pub fn remove(
    &self,
    id: SubscriptionId
  ) {
    self
      .listeners
      .borrow_mut()
      .retain(|(existing, _)| *existing != id);
  }

  /// Listeners must not subscribe or
  /// unsubscribe from inside the callback.
  pub fn notify(&self, theme: Theme) {
    for (_, listener) in
      self.listeners.borrow().iter()
    {
      listener(theme);
    }
  }
}

/// In-memory store holding the raw
/// stored string, as client storage
/// would.
#[derive(Default)]
pub struct MemoryThemeStore {
  raw:       RefCell<Option<String>>,
  listeners: ThemeListeners
}

impl MemoryThemeStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_raw(raw: &str) -> Self {
    Self {
      raw:       RefCell::new(Some(
        raw.to_string()
      )),
      listeners: ThemeListeners::new()
    }
  }

  pub fn raw(&self) -> Option<String> {
    self.raw.borrow().clone()
  }

  /// Simulates a write made by another
  /// page sharing the same storage.
  pub fn external_write(&self, raw: &str) {
    *self.raw.borrow_mut() =
      Some(raw.to_string());
    if let Some(theme) =
      Theme::parse_stored(raw)
    {
      self.listeners.notify(theme);
    }
  }
}

impl ThemeStore for MemoryThemeStore {
  fn load(
    &self
  ) -> Result<Option<Theme>, ClientError> {
    Ok(
      self
        .raw
        .borrow()
        .as_deref()
        .and_then(Theme::parse_stored)
    )
  }

  fn save(
    &self,
    theme: Theme
  ) -> Result<(), ClientError> {
    *self.raw.borrow_mut() =
      Some(theme.as_attr().to_string());
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

pub struct ThemeController<S> {
  store: S
}

impl<S: ThemeStore> ThemeController<S> {
  pub fn new(store: S) -> Self {
    Self { store }
  }

  pub fn store(&self) -> &S {
    &self.store
  }

  /// Theme to apply before the user
  /// touches anything. `None` leaves the
  /// server-rendered attribute alone.
  pub fn initial_theme(
    &self
  ) -> Option<Theme> {
    match self.store.load() {
      | Ok(theme) => {
        debug!(?theme, "loaded stored theme");
        theme
      }
      | Err(error) => {
        warn!(
          %error,
          "failed reading stored theme"
        );
        None
      }
    }
  }

  pub fn toggle(
    &self,
    current_attr: Option<&str>
  ) -> Theme {
    let next = Theme::toggled_from(
      Theme::from_attr(current_attr)
    );
    if let Err(error) = self.store.save(next)
    {
      error!(
        %error,
        theme = next.as_attr(),
        "failed persisting theme"
      );
    }
    next
  }
}
