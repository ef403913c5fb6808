use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;
use tracing::{
  error,
  info,
  warn
};

fn default_api_base() -> String {
  String::new()
}

fn default_calendar_path() -> String {
  "/api/calendar/".to_string()
}

fn default_autosave_path() -> String {
  "/api/autosave/".to_string()
}

fn default_reschedule_path() -> String {
  "/api/update_entry_date/".to_string()
}

fn default_debounce_ms() -> u64 {
  2_000
}

fn default_saved_clear_ms() -> u64 {
  3_000
}

fn default_loading_opacity() -> f64 {
  0.5
}

fn default_crop_edge_px() -> u32 {
  300
}

fn default_crop_file_name() -> String {
  "profile_cropped.jpg".to_string()
}

fn default_crop_mime() -> String {
  "image/jpeg".to_string()
}

fn default_theme_storage_key() -> String
{
  "theme".to_string()
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EndpointConfig {
  #[serde(default = "default_api_base")]
  pub api_base:   String,
  #[serde(
    default = "default_calendar_path"
  )]
  pub calendar:   String,
  #[serde(
    default = "default_autosave_path"
  )]
  pub autosave:   String,
  #[serde(
    default = "default_reschedule_path"
  )]
  pub reschedule: String
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AutosaveConfig {
  #[serde(default = "default_debounce_ms")]
  pub debounce_ms:    u64,
  #[serde(
    default = "default_saved_clear_ms"
  )]
  pub saved_clear_ms: u64
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CalendarConfig {
  #[serde(
    default = "default_loading_opacity"
  )]
  pub loading_opacity: f64
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CropperConfig {
  #[serde(
    default = "default_crop_edge_px"
  )]
  pub edge_px:          u32,
  #[serde(
    default = "default_crop_file_name"
  )]
  pub file_name:        String,
  #[serde(default = "default_crop_mime")]
  pub mime:             String,
  #[serde(
    default = "default_crop_edge_px"
  )]
  pub min_container_px: u32
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ThemeConfig {
  #[serde(
    default = "default_theme_storage_key"
  )]
  pub storage_key: String
}

#[derive(
  Debug,
  Clone,
  Default,
  PartialEq,
  Deserialize,
)]
pub struct ClientConfig {
  #[serde(default)]
  pub endpoints: EndpointConfig,
  #[serde(default)]
  pub autosave:  AutosaveConfig,
  #[serde(default)]
  pub calendar:  CalendarConfig,
  #[serde(default)]
  pub cropper:   CropperConfig,
  #[serde(default)]
  pub theme:     ThemeConfig
}

impl Default for EndpointConfig {
  fn default() -> Self {
    Self {
      api_base:   default_api_base(),
      calendar:   default_calendar_path(),
      autosave:   default_autosave_path(),
      reschedule: default_reschedule_path()
    }
  }
}

impl Default for AutosaveConfig {
  fn default() -> Self {
    Self {
      debounce_ms:    default_debounce_ms(),
      saved_clear_ms:
        default_saved_clear_ms()
    }
  }
}

impl Default for CalendarConfig {
  fn default() -> Self {
    Self {
      loading_opacity:
        default_loading_opacity()
    }
  }
}

impl Default for CropperConfig {
  fn default() -> Self {
    Self {
      edge_px:          default_crop_edge_px(),
      file_name:        default_crop_file_name(),
      mime:             default_crop_mime(),
      min_container_px:
        default_crop_edge_px()
    }
  }
}

impl Default for ThemeConfig {
  fn default() -> Self {
    Self {
      storage_key:
        default_theme_storage_key()
    }
  }
}

impl EndpointConfig {
  fn join(&self, path: &str) -> String {
    format!(
      "{}{}",
      self.api_base.trim_end_matches('/'),
      path
    )
  }

  pub fn calendar_url(&self) -> String {
    self.join(&self.calendar)
  }

  pub fn autosave_url(&self) -> String {
    self.join(&self.autosave)
  }

  pub fn reschedule_url(&self) -> String {
    self.join(&self.reschedule)
  }
}

impl AutosaveConfig {
  pub fn debounce(&self) -> Duration {
    Duration::from_millis(self.debounce_ms)
  }

  pub fn saved_clear(&self) -> Duration {
    Duration::from_millis(
      self.saved_clear_ms
    )
  }
}

impl ClientConfig {
  pub fn from_toml_str(
    raw: &str
  ) -> anyhow::Result<Self> {
    let mut config =
      toml::from_str::<ClientConfig>(raw)
        .context(
          "failed to parse client config"
        )?;
    config.sanitize();
    Ok(config)
  }

  /// Parses the bundled config, falling
  /// back to defaults when it is broken.
  pub fn load_embedded(raw: &str) -> Self {
    match Self::from_toml_str(raw) {
      | Ok(config) => {
        info!(
          calendar = %config.endpoints.calendar_url(),
          debounce_ms = config.autosave.debounce_ms,
          "loaded client config"
        );
        config
      }
      | Err(error) => {
        error!(
          error = %format!("{error:#}"),
          "failed parsing client config; \
           using defaults"
        );
        ClientConfig::default()
      }
    }
  }

  pub fn sanitize(&mut self) {
    let endpoints = &mut self.endpoints;
    for (path, fallback) in [
      (
        &mut endpoints.calendar,
        default_calendar_path()
      ),
      (
        &mut endpoints.autosave,
        default_autosave_path()
      ),
      (
        &mut endpoints.reschedule,
        default_reschedule_path()
      )
    ] {
      if path.trim().is_empty() {
        warn!(
          fallback = %fallback,
          "empty endpoint path in config"
        );
        *path = fallback;
      }
    }

    if self.autosave.debounce_ms == 0 {
      self.autosave.debounce_ms =
        default_debounce_ms();
    }
    if self.autosave.saved_clear_ms == 0 {
      self.autosave.saved_clear_ms =
        default_saved_clear_ms();
    }

    let opacity =
      self.calendar.loading_opacity;
    if !opacity.is_finite() || opacity <= 0.0
    {
      self.calendar.loading_opacity =
        default_loading_opacity();
    } else if opacity > 1.0 {
      self.calendar.loading_opacity = 1.0;
    }

    if self.cropper.edge_px == 0 {
      self.cropper.edge_px =
        default_crop_edge_px();
    }
    if self.cropper.min_container_px == 0 {
      self.cropper.min_container_px =
        default_crop_edge_px();
    }
    if self.cropper.file_name.trim().is_empty()
    {
      self.cropper.file_name =
        default_crop_file_name();
    }
    if self.cropper.mime.trim().is_empty() {
      self.cropper.mime = default_crop_mime();
    }
    if self.theme.storage_key.trim().is_empty()
    {
      self.theme.storage_key =
        default_theme_storage_key();
    }
  }
}
