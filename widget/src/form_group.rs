use std::cell::Cell;

use leptos::{
    create_rw_signal, ReadSignal, RwSignal, SignalGetUntracked, SignalSet, SignalWith,
    SignalWithUntracked,
};

use crate::config::{ClassNames, FormGroupConfig, InputType};
use crate::error::ValidationError;
use crate::render::{render_group, RenderedGroup};
use crate::utils::unique_id;

const ID_PREFIX: &str = "coins-logon-widget-";

/// Visual state of a form group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldState {
    #[default]
    Neutral,
    Error(String),
    Success(Option<String>),
}

impl FieldState {
    pub fn is_neutral(&self) -> bool {
        matches!(self, FieldState::Neutral)
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            FieldState::Neutral => None,
            FieldState::Error(message) => Some(message.as_str()),
            FieldState::Success(message) => message.as_deref(),
        }
    }
}

/// One labeled input, its validation rule and its visual state.
///
/// Any non-neutral state arms a one-shot latch; the next keydown in the input
/// consumes it and puts the group back to [`FieldState::Neutral`].
#[derive(Debug)]
pub struct FormGroup {
    config: FormGroupConfig,
    class_names: ClassNames,
    fallback_message: String,
    id: String,
    value: RwSignal<String>,
    state: RwSignal<FieldState>,
    clear_on_keydown: Cell<bool>,
    attached: RwSignal<bool>,
}

impl FormGroup {
    pub fn new(config: FormGroupConfig, class_names: &ClassNames) -> Self {
        let class_names = config.class_names.apply(class_names);

        Self {
            config,
            class_names,
            fallback_message: String::new(),
            id: unique_id(ID_PREFIX),
            value: create_rw_signal(String::new()),
            state: create_rw_signal(FieldState::Neutral),
            clear_on_keydown: Cell::new(false),
            attached: create_rw_signal(true),
        }
    }

    /// Message used when the validator rejects a value with an empty message.
    pub fn with_fallback_message(mut self, message: impl Into<String>) -> Self {
        self.fallback_message = message.into();
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.config.input_name
    }

    pub fn label_text(&self) -> &str {
        &self.config.label_text
    }

    pub fn placeholder(&self) -> &str {
        &self.config.placeholder
    }

    pub fn input_type(&self) -> &InputType {
        &self.config.input_type
    }

    pub fn is_required(&self) -> bool {
        self.config.required
    }

    pub fn class_names(&self) -> &ClassNames {
        &self.class_names
    }

    /// Current content of the input.
    pub fn value(&self) -> String {
        self.value.get_untracked()
    }

    pub fn set_value(&self, value: impl Into<String>) {
        self.value.set(value.into());
    }

    /// The signal the rendered input is bound to.
    pub fn value_signal(&self) -> RwSignal<String> {
        self.value
    }

    pub fn state(&self) -> FieldState {
        self.state.get_untracked()
    }

    pub fn state_signal(&self) -> ReadSignal<FieldState> {
        self.state.read_only()
    }

    pub fn is_attached(&self) -> bool {
        self.attached.get_untracked()
    }

    pub fn attached_signal(&self) -> ReadSignal<bool> {
        self.attached.read_only()
    }

    /// Runs the validator on the current value.
    ///
    /// Optional fields always pass without consulting the validator. A
    /// rejection moves the group into the error state; a pass leaves the
    /// state as it was.
    pub fn validate(&self) -> bool {
        if !self.config.required {
            return true;
        }
        let Some(validator) = &self.config.validate else {
            return true;
        };

        let value = self.value();
        match validator(value.as_str()) {
            Ok(()) => true,
            Err(message) => {
                let message = if message.is_empty() {
                    self.fallback_message.clone()
                } else {
                    message
                };
                log::debug!("Field '{}' rejected: {}", self.name(), message);
                self.set_state(FieldState::Error(message));
                false
            }
        }
    }

    pub fn set_state(&self, state: FieldState) {
        self.clear_on_keydown.set(!state.is_neutral());
        self.state.set(state);
    }

    pub fn set_error(&self, message: impl Into<String>) {
        self.set_state(FieldState::Error(message.into()));
    }

    pub fn set_success(&self, message: Option<String>) {
        self.set_state(FieldState::Success(message));
    }

    pub fn clear_state(&self) {
        self.set_state(FieldState::Neutral);
    }

    /// Keydown hook for the input. Returns whether it cleared the state.
    pub fn handle_keydown(&self) -> bool {
        if !self.clear_on_keydown.replace(false) {
            return false;
        }
        self.state.set(FieldState::Neutral);
        true
    }

    pub fn validation_error(&self) -> Option<ValidationError> {
        self.state.with_untracked(|state| match state {
            FieldState::Error(message) => Some(ValidationError {
                input_name: self.name().to_string(),
                message: message.clone(),
            }),
            _ => None,
        })
    }

    /// View description for the current state. Tracks the state signal.
    pub fn render(&self) -> RenderedGroup {
        self.state.with(|state| render_group(&self.class_names, state))
    }

    /// Takes the group out of the rendered form and drops its state.
    pub fn destroy(&self) {
        self.clear_on_keydown.set(false);
        self.attached.set(false);
        self.state.set(FieldState::Neutral);
        self.value.set(String::new());
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::config::{ClassNameOverrides, WidgetConfig};

    fn group(config: FormGroupConfig) -> FormGroup {
        FormGroup::new(config, &ClassNames::default())
    }

    #[test]
    fn test_new_group_is_neutral() {
        let group = group(FormGroupConfig::new("username", "Username:"));

        assert_eq!(group.name(), "username");
        assert!(group.id().starts_with(ID_PREFIX));
        assert_eq!(group.state(), FieldState::Neutral);
        assert_eq!(group.value(), "");
        assert!(group.is_attached());
    }

    #[test]
    fn test_ids_are_unique() {
        let first = group(FormGroupConfig::new("username", "Username:"));
        let second = group(FormGroupConfig::new("username", "Username:"));
        assert_ne!(first.id(), second.id());
    }

    #[test]
    fn test_required_empty_value_fails() {
        for value in ["", "   ", "\t\n"] {
            let group = group(FormGroupConfig::new("username", "Username:"));
            group.set_value(value);

            assert!(!group.validate());
            assert_eq!(group.state(), FieldState::Error("Field empty!".to_string()));
        }
    }

    #[test]
    fn test_required_non_empty_value_passes_and_keeps_state() {
        let group = group(FormGroupConfig::new("username", "Username:"));
        group.set_success(Some("Looks good".to_string()));
        group.set_value("alice");

        assert!(group.validate());
        assert_eq!(group.state(), FieldState::Success(Some("Looks good".to_string())));
    }

    #[test]
    fn test_optional_group_never_runs_validator() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let group = group(
            FormGroupConfig::new("nickname", "Nickname:")
                .required(false)
                .validator(move |_| {
                    counter.set(counter.get() + 1);
                    Err("never".to_string())
                }),
        );

        for value in ["", "anything"] {
            group.set_value(value);
            assert!(group.validate());
        }
        assert_eq!(calls.get(), 0);
        assert_eq!(group.state(), FieldState::Neutral);
    }

    #[test]
    fn test_required_without_validator_passes() {
        let group = group(FormGroupConfig::new("username", "Username:").without_validator());
        assert!(group.validate());
    }

    #[test]
    fn test_empty_rejection_uses_fallback_message() {
        let group = group(FormGroupConfig::new("code", "Code:").validator(|_| Err(String::new())))
            .with_fallback_message("Field empty");

        assert!(!group.validate());
        assert_eq!(group.state().message(), Some("Field empty"));
    }

    #[test]
    fn test_first_keydown_clears_error() {
        let group = group(FormGroupConfig::new("username", "Username:"));
        assert!(!group.validate());
        assert!(group.render().icon);

        assert!(group.handle_keydown());
        assert_eq!(group.state(), FieldState::Neutral);

        let rendered = group.render();
        assert!(!rendered.icon);
        assert!(rendered.message.is_none());
        assert_eq!(rendered.class, group.class_names().form_group);

        // A second keystroke has nothing left to clear.
        assert!(!group.handle_keydown());
        assert_eq!(group.state(), FieldState::Neutral);
    }

    #[test]
    fn test_keydown_clears_success() {
        let group = group(FormGroupConfig::new("username", "Username:"));
        group.set_success(None);

        assert!(group.handle_keydown());
        assert!(group.state().is_neutral());
    }

    #[test]
    fn test_keydown_latch_rearms_on_each_transition() {
        let group = group(FormGroupConfig::new("username", "Username:"));

        group.set_error("first");
        assert!(group.handle_keydown());

        group.set_error("second");
        assert!(group.handle_keydown());
        assert!(!group.handle_keydown());
    }

    #[test]
    fn test_keydown_on_neutral_group_does_nothing() {
        let group = group(FormGroupConfig::new("username", "Username:"));
        assert!(!group.handle_keydown());

        group.set_error("oops");
        group.clear_state();
        assert!(!group.handle_keydown());
    }

    #[test]
    fn test_validation_error() {
        let group = group(FormGroupConfig::new("password", "Password:"));
        assert!(group.validation_error().is_none());

        group.validate();

        assert_eq!(
            group.validation_error(),
            Some(ValidationError {
                input_name: "password".to_string(),
                message: "Field empty!".to_string(),
            })
        );
    }

    #[test]
    fn test_group_class_names_override() {
        let config = FormGroupConfig {
            class_names: ClassNameOverrides {
                form_group: Some("custom-group".to_string()),
                ..ClassNameOverrides::default()
            },
            ..FormGroupConfig::new("username", "Username:")
        };

        let group = group(config);
        assert_eq!(group.render().class, "custom-group");
    }

    #[test]
    fn test_group_class_names_keep_widget_roles() {
        let widget_classes = ClassNames {
            error: "my-error".to_string(),
            ..ClassNames::default()
        };
        let config = WidgetConfig::from_json(
            r#"{"formGroups":[{"inputName":"pin","classNames":{"formGroup":"pin-group"}}]}"#,
        )
        .unwrap();
        let group = FormGroup::new(config.form_groups[0].clone(), &widget_classes);

        group.set_error("bad pin");

        let rendered = group.render();
        assert!(rendered.has_class("pin-group"));
        assert!(rendered.has_class("my-error"));
        assert_eq!(group.class_names().input, widget_classes.input);
    }

    #[test]
    fn test_destroy_detaches_and_resets() {
        let group = group(FormGroupConfig::new("username", "Username:"));
        group.set_value("alice");
        group.set_error("bad");

        group.destroy();

        assert!(!group.is_attached());
        assert_eq!(group.value(), "");
        assert!(group.state().is_neutral());
        assert!(!group.handle_keydown());
    }
}
