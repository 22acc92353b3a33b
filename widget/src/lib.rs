pub mod api;
pub mod components;
pub mod config;
pub mod error;
pub mod events;
pub mod form;
pub mod form_group;
pub mod render;
pub mod utils;
pub mod widget;

#[cfg(target_arch = "wasm32")]
pub mod bindings;

pub use api::{AuthClient, AuthOptions, HttpAuthClient};
pub use config::{ClassNameOverrides, ClassNames, FormGroupConfig, InputType, Messages, WidgetConfig};
pub use error::{AuthError, ConfigurationError, ValidationError};
pub use events::{DomEvent, EventEmitter, EventKind, ListenerId, WidgetEvent};
pub use form::{Form, Notification, NotificationKind};
pub use form_group::{FieldState, FormGroup};
pub use widget::{AttachTarget, LifecycleState, Widget};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
}
