use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::EventListener;
use gloo::file::callbacks::FileReader;
use js_sys::Array;
use learnlog_core::ClientError;
use learnlog_core::config::CropperConfig;
use learnlog_core::cropper::{
  CropCommand,
  CropSession,
  CropSpec
};
use learnlog_core::generation::Generation;
use wasm_bindgen::prelude::*;
use web_sys::{
  Blob,
  DataTransfer,
  Document,
  Element,
  File,
  FilePropertyBag,
  HtmlCanvasElement,
  HtmlElement,
  HtmlImageElement,
  HtmlInputElement
};

use crate::dom;

const OPEN_CLASS: &str = "active";

#[wasm_bindgen]
extern "C" {
  type Cropper;

  #[wasm_bindgen(constructor, catch)]
  fn new(
    image: &HtmlImageElement,
    options: &JsValue
  ) -> Result<Cropper, JsValue>;

  #[wasm_bindgen(method)]
  fn destroy(this: &Cropper);

  #[wasm_bindgen(
    method,
    js_name = getCroppedCanvas
  )]
  fn get_cropped_canvas(
    this: &Cropper,
    options: &JsValue
  ) -> Option<HtmlCanvasElement>;
}

/// Square crop of the profile picture
/// before the form is submitted.
pub struct ProfileCropper {
  input:     HtmlInputElement,
  modal:     HtmlElement,
  image:     HtmlImageElement,
  spec:      CropSpec,
  session:   RefCell<CropSession>,
  widget:    RefCell<Option<Cropper>>,
  reader:    RefCell<Option<FileReader>>,
  listeners: RefCell<Vec<EventListener>>
}

impl ProfileCropper {
  pub fn mount(
    document: &Document,
    config: &CropperConfig
  ) -> Option<Rc<Self>> {
    let input = dom::query::<HtmlInputElement>(
      document,
      "input[name=image]"
    )?;
    let modal = dom::by_id::<HtmlElement>(
      document,
      "cropperModal"
    )?;
    let image = dom::by_id::<HtmlImageElement>(
      document,
      "imageToCrop"
    )?;

    let cropper = Rc::new(Self {
      input,
      modal,
      image,
      spec: CropSpec::from(config),
      session: RefCell::new(CropSession::new()),
      widget: RefCell::new(None),
      reader: RefCell::new(None),
      listeners: RefCell::new(Vec::new())
    });

    let mut listeners = Vec::new();

    let weak = Rc::downgrade(&cropper);
    listeners.push(EventListener::new(
      &cropper.input,
      "change",
      move |_| {
        if let Some(cropper) = weak.upgrade() {
          cropper.on_file_selected();
        }
      }
    ));

    match dom::by_id::<Element>(
      document,
      "cropAndSave"
    ) {
      | Some(button) => {
        let weak = Rc::downgrade(&cropper);
        listeners.push(EventListener::new(
          &button,
          "click",
          move |_| {
            if let Some(cropper) =
              weak.upgrade()
            {
              cropper.on_confirm();
            }
          }
        ));
      }
      | None => {
        tracing::warn!(
          "crop modal has no confirm button"
        );
      }
    }

    let weak = Rc::downgrade(&cropper);
    listeners.push(EventListener::new(
      &cropper.modal,
      "click",
      move |event| {
        let Some(cropper) = weak.upgrade()
        else {
          return;
        };
        let on_backdrop = event
          .target()
          .is_some_and(|target| {
            dom::is_same_target(
              &target,
              &cropper.modal
            )
          });
        if on_backdrop {
          let commands = cropper
            .session
            .borrow_mut()
            .dismiss();
          *cropper.reader.borrow_mut() = None;
          cropper.run(&commands, None);
        }
      }
    ));

    *cropper.listeners.borrow_mut() =
      listeners;
    Some(cropper)
  }

  fn on_file_selected(self: &Rc<Self>) {
    let Some(file) = self
      .input
      .files()
      .and_then(|files| files.get(0))
    else {
      return;
    };

    let (generation, commands) =
      self.session.borrow_mut().select_file();
    self.run(&commands, None);

    let weak = Rc::downgrade(self);
    let reader =
      gloo::file::callbacks::read_as_data_url(
        &gloo::file::File::from(file),
        move |result| {
          let Some(cropper) = weak.upgrade()
          else {
            return;
          };
          match result {
            | Ok(data_url) => {
              cropper.on_image_read(
                generation, &data_url
              )
            }
            | Err(error) => {
              tracing::error!(
                %error,
                "failed reading selected image"
              );
              let commands = cropper
                .session
                .borrow_mut()
                .dismiss();
              cropper.run(&commands, None);
            }
          }
        }
      );
    // Dropping the previous reader aborts it.
    *self.reader.borrow_mut() = Some(reader);
  }

  fn on_image_read(
    &self,
    generation: Generation,
    data_url: &str
  ) {
    let commands = match self
      .session
      .borrow_mut()
      .image_loaded(generation)
    {
      | Ok(commands) => commands,
      | Err(error) => {
        tracing::warn!(
          %error,
          "image read ignored"
        );
        return;
      }
    };
    if commands.is_empty() {
      return;
    }
    self.image.set_src(data_url);
    self.run(&commands, None);
  }

  fn on_confirm(self: &Rc<Self>) {
    let confirmed =
      self.session.borrow_mut().confirm();
    let generation = match confirmed {
      | Ok(generation) => generation,
      | Err(error) => {
        tracing::debug!(
          %error,
          "nothing to crop"
        );
        return;
      }
    };

    let canvas = match self.render_canvas() {
      | Ok(canvas) => canvas,
      | Err(error) => {
        tracing::error!(
          %error,
          "failed rendering crop"
        );
        self
          .session
          .borrow_mut()
          .export_failed(generation);
        return;
      }
    };

    let weak = Rc::downgrade(self);
    let callback = Closure::once_into_js(
      move |blob: Option<Blob>| {
        let Some(cropper) = weak.upgrade()
        else {
          return;
        };
        cropper.on_blob(generation, blob);
      }
    );
    let encoded = canvas.to_blob_with_type(
      callback.unchecked_ref(),
      &self.spec.mime
    );
    if let Err(error) = encoded {
      tracing::error!(
        error = %dom::js_error(error),
        "failed encoding crop"
      );
      self
        .session
        .borrow_mut()
        .export_failed(generation);
    }
  }

  fn render_canvas(
    &self
  ) -> Result<HtmlCanvasElement, ClientError> {
    let widget = self.widget.borrow();
    let widget = widget.as_ref().ok_or_else(|| {
      ClientError::Dom(
        "crop widget missing".to_string()
      )
    })?;
    let options = serde_wasm_bindgen::to_value(
      &self.spec.canvas_options()
    )
    .map_err(|error| {
      ClientError::Dom(error.to_string())
    })?;
    widget
      .get_cropped_canvas(&options)
      .ok_or_else(|| {
        ClientError::Dom(
          "crop produced no canvas".to_string()
        )
      })
  }

  fn on_blob(
    &self,
    generation: Generation,
    blob: Option<Blob>
  ) {
    let Some(blob) = blob else {
      tracing::error!(
        "crop encoded to nothing"
      );
      self
        .session
        .borrow_mut()
        .export_failed(generation);
      return;
    };
    let commands = self
      .session
      .borrow_mut()
      .export_finished(generation);
    self.run(&commands, Some(&blob));
  }

  fn run(
    &self,
    commands: &[CropCommand],
    blob: Option<&Blob>
  ) {
    for command in commands {
      match command {
        | CropCommand::DestroyWidget => {
          if let Some(widget) =
            self.widget.borrow_mut().take()
          {
            widget.destroy();
          }
        }
        | CropCommand::ShowModal => {
          dom::add_class(
            &self.modal,
            OPEN_CLASS
          )
        }
        | CropCommand::HideModal => {
          dom::remove_class(
            &self.modal,
            OPEN_CLASS
          )
        }
        | CropCommand::CreateWidget => {
          if let Err(error) =
            self.create_widget()
          {
            tracing::error!(
              %error,
              "failed starting crop widget"
            );
          }
        }
        | CropCommand::ReplaceSelection => {
          let replaced = blob
            .ok_or_else(|| {
              ClientError::Dom(
                "no cropped image".to_string()
              )
            })
            .and_then(|blob| {
              self.replace_selection(blob)
            });
          if let Err(error) = replaced {
            tracing::error!(
              %error,
              "failed replacing selected file"
            );
          }
        }
      }
    }
  }

  fn create_widget(
    &self
  ) -> Result<(), ClientError> {
    let options = serde_wasm_bindgen::to_value(
      &self.spec.cropper_options()
    )
    .map_err(|error| {
      ClientError::Dom(error.to_string())
    })?;
    let widget =
      Cropper::new(&self.image, &options)
        .map_err(dom::js_error)?;
    *self.widget.borrow_mut() = Some(widget);
    Ok(())
  }

  fn replace_selection(
    &self,
    blob: &Blob
  ) -> Result<(), ClientError> {
    let properties = FilePropertyBag::new();
    properties.set_type(&self.spec.mime);
    let file =
      File::new_with_blob_sequence_and_options(
        &Array::of1(blob),
        &self.spec.file_name,
        &properties
      )
      .map_err(dom::js_error)?;

    let transfer = DataTransfer::new()
      .map_err(dom::js_error)?;
    transfer
      .items()
      .add_with_file(&file)
      .map_err(dom::js_error)?;
    self
      .input
      .set_files(transfer.files().as_ref());

    tracing::info!(
      file_name = %self.spec.file_name,
      size = file.size(),
      "replaced image with crop"
    );
    Ok(())
  }
}
