mod autosave_form;
mod calendar_nav;
mod chrome;
mod drag_drop;
mod event_modal;
mod form_focus;
mod profile_cropper;
mod theme_toggle;

pub use autosave_form::AutosaveForm;
pub use calendar_nav::CalendarNavigator;
pub use chrome::PageChrome;
pub use event_modal::EventModalController;
pub use form_focus::attach as attach_focus_zoom;
pub use profile_cropper::ProfileCropper;
pub use theme_toggle::ThemeToggle;
