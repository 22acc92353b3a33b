//! Pure state-to-view mapping.
//!
//! Components apply these descriptions to the DOM; nothing here touches it.

use crate::config::ClassNames;
use crate::form::{Notification, NotificationKind};
use crate::form_group::FieldState;
use crate::utils::join_classes;

/// What a form group shows for a given state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedGroup {
    pub class: String,
    pub icon: bool,
    pub message: Option<String>,
}

impl RenderedGroup {
    pub fn has_class(&self, class: &str) -> bool {
        self.class.split_whitespace().any(|c| c == class)
    }
}

pub fn render_group(class_names: &ClassNames, state: &FieldState) -> RenderedGroup {
    match state {
        FieldState::Neutral => RenderedGroup {
            class: class_names.form_group.clone(),
            icon: false,
            message: None,
        },
        FieldState::Error(message) => RenderedGroup {
            class: join_classes([class_names.form_group.as_str(), class_names.error.as_str()]),
            icon: true,
            message: Some(message.clone()),
        },
        FieldState::Success(message) => RenderedGroup {
            class: join_classes([class_names.form_group.as_str(), class_names.success.as_str()]),
            icon: true,
            message: message.clone(),
        },
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedNotification {
    pub class: String,
    pub message: String,
}

pub fn render_notification(
    class_names: &ClassNames,
    notification: Option<&Notification>,
) -> Option<RenderedNotification> {
    notification.map(|n| {
        let modifier = match n.kind {
            NotificationKind::Error => class_names.error.as_str(),
            NotificationKind::Success => class_names.success.as_str(),
        };
        RenderedNotification {
            class: join_classes([class_names.message.as_str(), modifier]),
            message: n.message.clone(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_has_no_decoration() {
        let classes = ClassNames::default();
        let rendered = render_group(&classes, &FieldState::Neutral);

        assert_eq!(rendered.class, "coins-logon-widget-form-group");
        assert!(!rendered.icon);
        assert!(rendered.message.is_none());
        assert!(!rendered.has_class(&classes.error));
        assert!(!rendered.has_class(&classes.success));
    }

    #[test]
    fn test_error_and_success_modifiers_are_exclusive() {
        let classes = ClassNames::default();

        let error = render_group(&classes, &FieldState::Error("Field empty!".to_string()));
        assert!(error.icon);
        assert_eq!(error.message.as_deref(), Some("Field empty!"));
        assert!(error.has_class(&classes.form_group));
        assert!(error.has_class(&classes.error));
        assert!(!error.has_class(&classes.success));

        let success = render_group(&classes, &FieldState::Success(None));
        assert!(success.icon);
        assert!(success.message.is_none());
        assert!(success.has_class(&classes.success));
        assert!(!success.has_class(&classes.error));
    }

    #[test]
    fn test_render_notification() {
        let classes = ClassNames::default();
        assert!(render_notification(&classes, None).is_none());

        let notification = Notification {
            message: "Invalid credentials".to_string(),
            kind: NotificationKind::Error,
        };
        let rendered = render_notification(&classes, Some(&notification)).unwrap();

        assert_eq!(rendered.message, "Invalid credentials");
        assert_eq!(
            rendered.class,
            "coins-logon-widget-input-message coins-logon-widget-form-group-error"
        );
    }
}
