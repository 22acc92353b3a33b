//! JavaScript surface of the widget.

use std::cell::RefCell;

use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::future_to_promise;

use crate::components::logon_widget_view;
use crate::config::WidgetConfig;
use crate::error::ConfigurationError;
use crate::events::EventKind;
use crate::widget::{AttachTarget, Widget};

impl AttachTarget for JsValue {
    /// Only HTML elements can host the rendered form.
    fn is_node(&self) -> bool {
        self.dyn_ref::<web_sys::HtmlElement>().is_some()
    }

    fn clear(&self) {
        if let Some(element) = self.dyn_ref::<web_sys::Element>() {
            element.set_inner_html("");
        }
    }

    fn set_class_name(&self, class_name: &str) {
        if let Some(element) = self.dyn_ref::<web_sys::Element>() {
            element.set_class_name(class_name);
        }
    }
}

/// Builds a widget on `element` and renders it there.
///
/// The element is left untouched when construction fails.
pub fn mount(element: &JsValue, config: WidgetConfig) -> Result<Widget, ConfigurationError> {
    let target = (!element.is_undefined() && !element.is_null()).then_some(element);
    let widget = Widget::new(target, config)?;

    let parent = element
        .dyn_ref::<web_sys::HtmlElement>()
        .cloned()
        .ok_or(ConfigurationError::NotANode)?;
    let view_widget = widget.clone();
    leptos::mount_to(parent, move || logon_widget_view(view_widget));

    Ok(widget)
}

/// Destroys `widget` and removes everything [`mount`] rendered into `element`.
pub fn unmount(element: &JsValue, widget: Widget) {
    widget.destroy();
    element.clear();
    element.set_class_name("");
}

/// Parses an event name as accepted by `LogonWidget.on`.
pub fn event_kind(name: &str) -> Result<EventKind, JsError> {
    name.parse()
        .map_err(|_| JsError::new(&format!("Unknown event '{}'", name)))
}

/// `validate` functions found in `options.formGroups`, keyed by input name.
///
/// `JSON.stringify` drops functions, so these are collected separately.
fn js_validators(options: &JsValue) -> Vec<(String, js_sys::Function)> {
    let Ok(groups) = js_sys::Reflect::get(options, &JsValue::from_str("formGroups")) else {
        return Vec::new();
    };
    let Some(groups) = groups.dyn_ref::<js_sys::Array>() else {
        return Vec::new();
    };

    groups
        .iter()
        .filter_map(|group| {
            let name = js_sys::Reflect::get(&group, &JsValue::from_str("inputName"))
                .ok()?
                .as_string()?;
            let validate = js_sys::Reflect::get(&group, &JsValue::from_str("validate"))
                .ok()?
                .dyn_into::<js_sys::Function>()
                .ok()?;
            Some((name, validate))
        })
        .collect()
}

/// Adapts a JS validator: `true` accepts, any other return value is the
/// error message.
pub fn js_validator(function: js_sys::Function) -> impl Fn(&str) -> Result<(), String> {
    move |value: &str| match function.call1(&JsValue::NULL, &JsValue::from_str(value)) {
        Ok(result) if result.as_bool() == Some(true) => Ok(()),
        Ok(result) => Err(result.as_string().unwrap_or_default()),
        Err(thrown) => {
            log::warn!("Validator threw: {:?}", thrown);
            Err(thrown.as_string().unwrap_or_default())
        }
    }
}

/// Turns a JS options object into a [`WidgetConfig`], keeping its validators.
pub fn config_from_js(options: &JsValue) -> Result<WidgetConfig, ConfigurationError> {
    if options.is_undefined() || options.is_null() {
        return Ok(WidgetConfig::default());
    }

    let json: String = js_sys::JSON::stringify(options)
        .map_err(|_| ConfigurationError::InvalidOptions("options are not serializable".to_string()))?
        .into();
    let config = WidgetConfig::from_json(&json)?;

    Ok(js_validators(options)
        .into_iter()
        .fold(config, |config, (name, validate)| {
            config.with_validator(&name, js_validator(validate))
        }))
}

fn to_js(value: &Value) -> JsValue {
    js_sys::JSON::parse(&value.to_string()).unwrap_or(JsValue::NULL)
}

/// Handle returned to JavaScript callers.
#[wasm_bindgen]
pub struct LogonWidget {
    element: JsValue,
    widget: RefCell<Option<Widget>>,
}

#[wasm_bindgen]
impl LogonWidget {
    /// `options` takes the same shape as the JSON configuration; omitted
    /// keys keep their defaults. `formGroups[].validate` may be a function.
    #[wasm_bindgen(constructor)]
    pub fn new(element: JsValue, options: JsValue) -> Result<LogonWidget, JsError> {
        let config = config_from_js(&options)?;
        let widget = mount(&element, config)?;

        Ok(Self {
            element,
            widget: RefCell::new(Some(widget)),
        })
    }

    fn widget(&self) -> Result<Widget, JsError> {
        self.widget
            .borrow()
            .clone()
            .ok_or_else(|| JsError::new("Widget was destroyed"))
    }

    pub fn login(&self) -> Result<js_sys::Promise, JsError> {
        let task = self.widget()?.login();
        Ok(future_to_promise(async move {
            task.await;
            Ok(JsValue::UNDEFINED)
        }))
    }

    pub fn logout(&self) -> Result<js_sys::Promise, JsError> {
        let task = self.widget()?.logout();
        Ok(future_to_promise(async move {
            task.await;
            Ok(JsValue::UNDEFINED)
        }))
    }

    /// Subscribes `callback` to `event`, e.g. `"login:success"`.
    pub fn on(&self, event: &str, callback: js_sys::Function) -> Result<(), JsError> {
        let kind = event_kind(event)?;

        self.widget()?.on(kind, move |event| {
            let payload = to_js(&event.payload());
            if let Err(e) = callback.call1(&JsValue::NULL, &payload) {
                log::error!("Listener for '{}' threw: {:?}", kind, e);
            }
        });
        Ok(())
    }

    /// Removes the rendered form and detaches every field.
    pub fn destroy(&self) {
        if let Some(widget) = self.widget.borrow_mut().take() {
            unmount(&self.element, widget);
        }
    }
}
