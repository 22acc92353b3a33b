//! Widget options and their defaults.
//!
//! Options are merged once at construction: every field a caller leaves out
//! keeps its default, so a partial JSON document such as
//! `{"baseUrl": "https://auth.example.org"}` is a complete configuration.

use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use serde::Deserialize;

use crate::api::AuthOptions;
use crate::error::ConfigurationError;

/// Message the default validator reports for a blank field.
pub const EMPTY_FIELD_MESSAGE: &str = "Field empty!";

/// Maps a field value to `Ok(())` or a human-readable error message.
pub type Validator = Rc<dyn Fn(&str) -> Result<(), String>>;

/// The default validator: rejects values that are empty after trimming.
pub fn non_empty(value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(EMPTY_FIELD_MESSAGE.to_string());
    }

    Ok(())
}

fn default_validator() -> Option<Validator> {
    Some(Rc::new(non_empty))
}

// ============================================================================
// Class Names
// ============================================================================

/// CSS class for every visual role the widget renders.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClassNames {
    pub root: String,
    pub form: String,
    pub input: String,
    pub label: String,
    pub form_group: String,
    pub icon: String,
    pub message: String,
    pub button_group: String,
    pub button: String,
    pub button_primary: String,
    pub button_secondary: String,
    pub error: String,
    pub success: String,
}

impl Default for ClassNames {
    fn default() -> Self {
        Self {
            root: "coins-logon-widget".to_string(),
            form: "coins-logon-widget-form".to_string(),
            input: "coins-logon-widget-input".to_string(),
            label: "coins-logon-widget-label".to_string(),
            form_group: "coins-logon-widget-form-group".to_string(),
            icon: "coins-logon-widget-icon".to_string(),
            message: "coins-logon-widget-input-message".to_string(),
            button_group: "coins-logon-widget-button-group".to_string(),
            button: "coins-logon-widget-button".to_string(),
            button_primary: "coins-logon-widget-button-primary".to_string(),
            button_secondary: "coins-logon-widget-button-secondary".to_string(),
            error: "coins-logon-widget-form-group-error".to_string(),
            success: "coins-logon-widget-form-group-success".to_string(),
        }
    }
}

// ============================================================================
// Form Groups
// ============================================================================

/// HTML input type. Types without a variant of their own pass through as
/// [`InputType::Other`].
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum InputType {
    #[default]
    Text,
    Password,
    Email,
    Number,
    Search,
    Tel,
    Url,
    Other(String),
}

impl InputType {
    pub fn as_str(&self) -> &str {
        match self {
            InputType::Text => "text",
            InputType::Password => "password",
            InputType::Email => "email",
            InputType::Number => "number",
            InputType::Search => "search",
            InputType::Tel => "tel",
            InputType::Url => "url",
            InputType::Other(other) => other,
        }
    }
}

impl From<String> for InputType {
    fn from(value: String) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "" | "text" => InputType::Text,
            "password" => InputType::Password,
            "email" => InputType::Email,
            "number" => InputType::Number,
            "search" => InputType::Search,
            "tel" => InputType::Tel,
            "url" => InputType::Url,
            _ => InputType::Other(value),
        }
    }
}

/// Per-group class names. Every role left unset keeps the widget's class.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClassNameOverrides {
    pub input: Option<String>,
    pub label: Option<String>,
    pub form_group: Option<String>,
    pub icon: Option<String>,
    pub message: Option<String>,
    pub error: Option<String>,
    pub success: Option<String>,
}

impl ClassNameOverrides {
    pub fn apply(&self, base: &ClassNames) -> ClassNames {
        let pick = |role: &Option<String>, fallback: &String| {
            role.clone().unwrap_or_else(|| fallback.clone())
        };

        ClassNames {
            input: pick(&self.input, &base.input),
            label: pick(&self.label, &base.label),
            form_group: pick(&self.form_group, &base.form_group),
            icon: pick(&self.icon, &base.icon),
            message: pick(&self.message, &base.message),
            error: pick(&self.error, &base.error),
            success: pick(&self.success, &base.success),
            ..base.clone()
        }
    }
}

/// Configuration for a single labeled input.
#[derive(Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormGroupConfig {
    pub input_name: String,
    pub label_text: String,
    pub placeholder: String,
    #[serde(rename = "type")]
    pub input_type: InputType,
    pub required: bool,
    #[serde(skip, default = "default_validator")]
    pub validate: Option<Validator>,
    /// Overrides some of the widget's class names for this group only.
    pub class_names: ClassNameOverrides,
}

impl FormGroupConfig {
    pub fn new(input_name: impl Into<String>, label_text: impl Into<String>) -> Self {
        Self {
            input_name: input_name.into(),
            label_text: label_text.into(),
            ..Self::default()
        }
    }

    pub fn input_type(mut self, input_type: InputType) -> Self {
        self.input_type = input_type;
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn validator(mut self, validator: impl Fn(&str) -> Result<(), String> + 'static) -> Self {
        self.validate = Some(Rc::new(validator));
        self
    }

    pub fn without_validator(mut self) -> Self {
        self.validate = None;
        self
    }
}

impl Default for FormGroupConfig {
    fn default() -> Self {
        Self {
            input_name: "name".to_string(),
            label_text: "Name:".to_string(),
            placeholder: String::new(),
            input_type: InputType::Text,
            required: true,
            validate: default_validator(),
            class_names: ClassNameOverrides::default(),
        }
    }
}

impl fmt::Debug for FormGroupConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormGroupConfig")
            .field("input_name", &self.input_name)
            .field("label_text", &self.label_text)
            .field("placeholder", &self.placeholder)
            .field("input_type", &self.input_type)
            .field("required", &self.required)
            .field("validate", &self.validate.is_some())
            .field("class_names", &self.class_names)
            .finish()
    }
}

// ============================================================================
// Widget
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Messages {
    /// Shown when a validator rejects a value without saying why.
    pub error: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            error: "Field empty".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WidgetConfig {
    pub base_url: String,
    pub auth_cookie_name: String,
    pub credentials_key: String,
    pub class_names: ClassNames,
    pub form_groups: Vec<FormGroupConfig>,
    pub messages: Messages,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        let auth = AuthOptions::default();

        Self {
            base_url: auth.base_url,
            auth_cookie_name: auth.auth_cookie_name,
            credentials_key: auth.credentials_key,
            class_names: ClassNames::default(),
            form_groups: vec![
                FormGroupConfig::new("username", "Username:"),
                FormGroupConfig::new("password", "Password:").input_type(InputType::Password),
            ],
            messages: Messages::default(),
        }
    }
}

impl WidgetConfig {
    /// Parses a JSON options document, filling everything it omits from the defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigurationError> {
        serde_json::from_str(json).map_err(|e| ConfigurationError::InvalidOptions(e.to_string()))
    }

    pub fn auth_options(&self) -> AuthOptions {
        AuthOptions {
            base_url: self.base_url.clone(),
            auth_cookie_name: self.auth_cookie_name.clone(),
            credentials_key: self.credentials_key.clone(),
        }
    }

    /// Attaches a validator to the group named `input_name`, if there is one.
    pub fn with_validator(
        mut self,
        input_name: &str,
        validator: impl Fn(&str) -> Result<(), String> + 'static,
    ) -> Self {
        let validator: Validator = Rc::new(validator);
        for group in self.form_groups.iter_mut().filter(|g| g.input_name == input_name) {
            group.validate = Some(Rc::clone(&validator));
        }
        self
    }

    /// Input names key the submitted form data, so they must not repeat.
    pub fn check_unique_names(&self) -> Result<(), ConfigurationError> {
        let mut seen = HashSet::new();
        for group in &self.form_groups {
            if !seen.insert(group.input_name.as_str()) {
                return Err(ConfigurationError::DuplicateInputName(group.input_name.clone()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_form_groups() {
        let config = WidgetConfig::default();
        let names: Vec<&str> = config.form_groups.iter().map(|g| g.input_name.as_str()).collect();

        assert_eq!(names, vec!["username", "password"]);
        assert_eq!(config.form_groups[0].label_text, "Username:");
        assert_eq!(config.form_groups[0].input_type, InputType::Text);
        assert_eq!(config.form_groups[1].input_type, InputType::Password);
        assert!(config.form_groups.iter().all(|g| g.required && g.validate.is_some()));
        assert_eq!(config.messages.error, "Field empty");
    }

    #[test]
    fn test_non_empty_validator() {
        assert_eq!(non_empty(""), Err("Field empty!".to_string()));
        assert_eq!(non_empty("   \t"), Err("Field empty!".to_string()));
        assert_eq!(non_empty(" alice "), Ok(()));
    }

    #[test]
    fn test_from_json_merges_over_defaults() {
        let config = WidgetConfig::from_json(
            r#"{
                "baseUrl": "https://auth.example.org/api",
                "classNames": { "root": "my-widget" },
                "formGroups": [
                    { "inputName": "email", "labelText": "Email:", "type": "email" }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(config.base_url, "https://auth.example.org/api");
        assert_eq!(config.class_names.root, "my-widget");
        assert_eq!(config.class_names.form, "coins-logon-widget-form");
        assert_eq!(config.form_groups.len(), 1);

        let group = &config.form_groups[0];
        assert_eq!(group.input_name, "email");
        assert_eq!(group.input_type, InputType::Email);
        assert!(group.required);
        assert!(group.validate.is_some());
        assert_eq!(config.credentials_key, AuthOptions::default().credentials_key);
    }

    #[test]
    fn test_from_json_empty_document() {
        let config = WidgetConfig::from_json("{}").unwrap();
        assert_eq!(config.class_names, ClassNames::default());
        assert_eq!(config.form_groups.len(), 2);
    }

    #[test]
    fn test_from_json_keeps_other_input_types() {
        let config = WidgetConfig::from_json(
            r#"{"formGroups":[{"inputName":"born","type":"date"},{"inputName":"pin","type":"PASSWORD"}]}"#,
        )
        .unwrap();

        assert_eq!(config.form_groups[0].input_type, InputType::Other("date".to_string()));
        assert_eq!(config.form_groups[0].input_type.as_str(), "date");
        assert_eq!(config.form_groups[1].input_type, InputType::Password);
    }

    #[test]
    fn test_from_json_rejects_malformed_options() {
        let result = WidgetConfig::from_json(r#"{"formGroups":[{"required":"yes"}]}"#);
        assert!(matches!(result, Err(ConfigurationError::InvalidOptions(_))));
    }

    #[test]
    fn test_group_class_names_fall_back_to_widget() {
        let config = WidgetConfig::from_json(
            r#"{
                "classNames": { "error": "my-error" },
                "formGroups": [
                    { "inputName": "pin", "classNames": { "formGroup": "pin-group" } }
                ]
            }"#,
        )
        .unwrap();

        let merged = config.form_groups[0].class_names.apply(&config.class_names);
        assert_eq!(merged.form_group, "pin-group");
        assert_eq!(merged.error, "my-error");
        assert_eq!(merged.root, config.class_names.root);
    }

    #[test]
    fn test_duplicate_input_names() {
        let config = WidgetConfig {
            form_groups: vec![
                FormGroupConfig::new("username", "Username:"),
                FormGroupConfig::new("username", "Again:"),
            ],
            ..WidgetConfig::default()
        };

        assert_eq!(
            config.check_unique_names(),
            Err(ConfigurationError::DuplicateInputName("username".to_string()))
        );
        assert_eq!(WidgetConfig::default().check_unique_names(), Ok(()));
    }

    #[test]
    fn test_with_validator_targets_one_group() {
        let config = WidgetConfig::default().with_validator("password", |value| {
            if value.len() < 8 {
                Err("Too short".to_string())
            } else {
                Ok(())
            }
        });

        let password = config.form_groups[1].validate.as_ref().unwrap();
        assert_eq!(password("secret"), Err("Too short".to_string()));

        let username = config.form_groups[0].validate.as_ref().unwrap();
        assert_eq!(username("secret"), Ok(()));
    }
}
