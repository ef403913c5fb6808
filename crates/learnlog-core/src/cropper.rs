//! Profile-picture crop session.
//!
//! The widget itself lives in the page;
//! this module decides when it may exist
//! and which side effects each step
//! needs. At most one widget is alive at
//! a time, and it is torn down on
//! confirm, dismiss and re-selection.

use serde::Serialize;
use tracing::debug;

use crate::ClientError;
use crate::config::CropperConfig;
use crate::generation::{
  Generation,
  RequestGeneration
};

/// Options handed to the cropping widget
/// constructor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CropperOptions {
  pub aspect_ratio:         f64,
  pub view_mode:            u8,
  pub min_container_width:  u32,
  pub min_container_height: u32
}

/// Output size requested from the widget
/// when rendering the crop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CroppedCanvasOptions {
  pub width:  u32,
  pub height: u32
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CropSpec {
  pub edge_px:          u32,
  pub file_name:        String,
  pub mime:             String,
  pub min_container_px: u32
}

impl CropSpec {
  pub fn cropper_options(
    &self
  ) -> CropperOptions {
    CropperOptions {
      aspect_ratio:         1.0,
      view_mode:            1,
      min_container_width:  self
        .min_container_px,
      min_container_height: self
        .min_container_px
    }
  }

  pub fn canvas_options(
    &self
  ) -> CroppedCanvasOptions {
    CroppedCanvasOptions {
      width:  self.edge_px,
      height: self.edge_px
    }
  }
}

impl From<&CropperConfig> for CropSpec {
  fn from(config: &CropperConfig) -> Self {
    Self {
      edge_px:          config.edge_px,
      file_name:        config
        .file_name
        .clone(),
      mime:             config.mime.clone(),
      min_container_px: config
        .min_container_px
    }
  }
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum CropState {
  Idle,
  Reading(Generation),
  Active,
  Exporting(Generation)
}

impl CropState {
  fn name(&self) -> &'static str {
    match self {
      | CropState::Idle => "idle",
      | CropState::Reading(_) => "reading",
      | CropState::Active => "active",
      | CropState::Exporting(_) => {
        "exporting"
      }
    }
  }

  pub fn has_widget(&self) -> bool {
    matches!(
      self,
      CropState::Active
        | CropState::Exporting(_)
    )
  }
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum CropCommand {
  DestroyWidget,
  ShowModal,
  CreateWidget,
  HideModal,
  ReplaceSelection
}

#[derive(Debug, Clone)]
pub struct CropSession {
  state:    CropState,
  requests: RequestGeneration
}

impl Default for CropSession {
  fn default() -> Self {
    Self {
      state:    CropState::Idle,
      requests: RequestGeneration::new()
    }
  }
}

impl CropSession {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn state(&self) -> CropState {
    self.state
  }

  fn invalid(
    &self,
    event: &'static str
  ) -> ClientError {
    ClientError::InvalidTransition {
      machine: "crop session",
      state: self.state.name(),
      event
    }
  }

  /// A new file was picked. Any previous
  /// widget goes away and any read or
  /// export still in flight goes stale.
  pub fn select_file(
    &mut self
  ) -> (Generation, Vec<CropCommand>) {
    let mut commands = Vec::new();
    if self.state.has_widget() {
      commands.push(
        CropCommand::DestroyWidget
      );
    }
    let generation = self.requests.begin();
    self.state =
      CropState::Reading(generation);
    (generation, commands)
  }

  pub fn image_loaded(
    &mut self,
    generation: Generation
  ) -> Result<Vec<CropCommand>, ClientError>
  {
    match self.state {
      | CropState::Reading(current)
        if current == generation =>
      {
        self.state = CropState::Active;
        Ok(vec![
          CropCommand::ShowModal,
          CropCommand::CreateWidget,
        ])
      }
      | _ if !self
        .requests
        .is_current(generation) =>
      {
        debug!(
          generation = generation.value(),
          "dropping superseded image read"
        );
        Ok(Vec::new())
      }
      | _ => Err(self.invalid("image loaded"))
    }
  }

  pub fn confirm(
    &mut self
  ) -> Result<Generation, ClientError> {
    if self.state != CropState::Active {
      return Err(self.invalid("confirm"));
    }
    let generation = self.requests.begin();
    self.state =
      CropState::Exporting(generation);
    Ok(generation)
  }

  pub fn export_finished(
    &mut self,
    generation: Generation
  ) -> Vec<CropCommand> {
    match self.state {
      | CropState::Exporting(current)
        if current == generation =>
      {
        self.state = CropState::Idle;
        vec![
          CropCommand::ReplaceSelection,
          CropCommand::DestroyWidget,
          CropCommand::HideModal,
        ]
      }
      | _ => {
        debug!(
          generation = generation.value(),
          "dropping superseded crop export"
        );
        Vec::new()
      }
    }
  }

  /// Rendering the crop produced nothing;
  /// the widget stays up for another try.
  pub fn export_failed(
    &mut self,
    generation: Generation
  ) {
    if self.state
      == CropState::Exporting(generation)
    {
      self.state = CropState::Active;
    }
  }

  pub fn dismiss(
    &mut self
  ) -> Vec<CropCommand> {
    let mut commands = Vec::new();
    if self.state.has_widget() {
      commands.push(
        CropCommand::DestroyWidget
      );
    }
    if self.state != CropState::Idle {
      commands.push(CropCommand::HideModal);
    }
    self.requests.invalidate();
    self.state = CropState::Idle;
    commands
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::ClientConfig;

  fn spec() -> CropSpec {
    CropSpec::from(
      &ClientConfig::default().cropper
    )
  }

  #[test]
  fn output_is_fixed_square_jpeg() {
    let spec = spec();

    assert_eq!(
      spec.canvas_options(),
      CroppedCanvasOptions {
        width:  300,
        height: 300
      }
    );
    assert_eq!(
      spec.file_name,
      "profile_cropped.jpg"
    );
    assert_eq!(spec.mime, "image/jpeg");
  }

  #[test]
  fn widget_options_use_camel_case_keys() {
    let json = serde_json::to_value(
      spec().cropper_options()
    )
    .expect("serialize options");

    assert_eq!(
      json,
      serde_json::json!({
        "aspectRatio": 1.0,
        "viewMode": 1,
        "minContainerWidth": 300,
        "minContainerHeight": 300
      })
    );
  }

  #[test]
  fn full_session_creates_then_tears_down_widget()
  {
    let mut session = CropSession::new();
    let (read, commands) =
      session.select_file();
    assert!(commands.is_empty());

    assert_eq!(
      session
        .image_loaded(read)
        .expect("load accepted"),
      vec![
        CropCommand::ShowModal,
        CropCommand::CreateWidget
      ]
    );

    let export =
      session.confirm().expect("confirm");
    assert_eq!(
      session.export_finished(export),
      vec![
        CropCommand::ReplaceSelection,
        CropCommand::DestroyWidget,
        CropCommand::HideModal
      ]
    );
    assert_eq!(
      session.state(),
      CropState::Idle
    );
  }

  #[test]
  fn reselecting_destroys_existing_widget_first()
  {
    let mut session = CropSession::new();
    let (read, _) = session.select_file();
    session
      .image_loaded(read)
      .expect("load accepted");

    let (_, commands) =
      session.select_file();

    assert_eq!(
      commands,
      vec![CropCommand::DestroyWidget]
    );
    assert!(!session.state().has_widget());
  }

  #[test]
  fn late_read_of_replaced_file_is_ignored()
  {
    let mut session = CropSession::new();
    let (first, _) = session.select_file();
    let (second, _) = session.select_file();

    assert_eq!(
      session
        .image_loaded(first)
        .expect("stale read tolerated"),
      Vec::new()
    );
    assert_eq!(
      session
        .image_loaded(second)
        .expect("fresh read accepted")
        .len(),
      2
    );
  }

  #[test]
  fn confirm_without_widget_is_rejected() {
    let mut session = CropSession::new();

    assert!(matches!(
      session.confirm(),
      Err(ClientError::InvalidTransition {
        state: "idle",
        ..
      })
    ));
  }

  #[test]
  fn dismiss_discards_pending_export() {
    let mut session = CropSession::new();
    let (read, _) = session.select_file();
    session
      .image_loaded(read)
      .expect("load accepted");
    let export =
      session.confirm().expect("confirm");

    assert_eq!(
      session.dismiss(),
      vec![
        CropCommand::DestroyWidget,
        CropCommand::HideModal
      ]
    );
    assert!(
      session.export_finished(export).is_empty()
    );
  }

  #[test]
  fn failed_export_returns_to_active() {
    let mut session = CropSession::new();
    let (read, _) = session.select_file();
    session
      .image_loaded(read)
      .expect("load accepted");
    let export =
      session.confirm().expect("confirm");
    session.export_failed(export);

    assert_eq!(
      session.state(),
      CropState::Active
    );
  }
}
