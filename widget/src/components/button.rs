use leptos::*;

use crate::config::ClassNames;
use crate::utils::join_classes;

#[derive(Default, Clone, Copy, PartialEq)]
pub enum ButtonVariant {
    #[default]
    Primary,
    Secondary,
}

impl ButtonVariant {
    fn class<'a>(&self, class_names: &'a ClassNames) -> &'a str {
        match self {
            ButtonVariant::Primary => &class_names.button_primary,
            ButtonVariant::Secondary => &class_names.button_secondary,
        }
    }
}

/// Widget button styled from the configured class names.
#[component]
pub fn Button(
    class_names: ClassNames,
    #[prop(optional)] variant: ButtonVariant,
    #[prop(optional, into)] disabled: MaybeSignal<bool>,
    #[prop(optional, into)] button_type: Option<String>,
    #[prop(optional)] on_click: Option<Callback<ev::MouseEvent>>,
    children: Children,
) -> impl IntoView {
    let class = join_classes([class_names.button.as_str(), variant.class(&class_names)]);
    let button_type = button_type.unwrap_or_else(|| "button".to_string());

    view! {
        <button
            type=button_type
            class=class
            disabled=move || disabled.get()
            on:click=move |ev| {
                if let Some(callback) = on_click {
                    callback.call(ev);
                }
            }
        >
            {children()}
        </button>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_variant_classes() {
        let class_names = ClassNames::default();
        assert_eq!(
            ButtonVariant::Primary.class(&class_names),
            "coins-logon-widget-button-primary"
        );
        assert_eq!(
            ButtonVariant::Secondary.class(&class_names),
            "coins-logon-widget-button-secondary"
        );
    }
}
