use std::cell::RefCell;
use std::rc::Rc;

use leptos::{create_rw_signal, ReadSignal, RwSignal, SignalGetUntracked, SignalSet, SignalWith};

use crate::config::ClassNames;
use crate::form_group::FormGroup;
use crate::render::{render_notification, RenderedNotification};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Error,
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
}

/// Container for the form groups plus a single form-level notification slot.
#[derive(Debug)]
pub struct Form {
    class_names: ClassNames,
    groups: RefCell<Vec<Rc<FormGroup>>>,
    notification: RwSignal<Option<Notification>>,
}

impl Form {
    pub fn new(class_names: ClassNames) -> Self {
        Self {
            class_names,
            groups: RefCell::new(Vec::new()),
            notification: create_rw_signal(None),
        }
    }

    pub fn class_names(&self) -> &ClassNames {
        &self.class_names
    }

    /// Places `group` before every group already in the form.
    pub fn insert_first(&self, group: Rc<FormGroup>) {
        self.groups.borrow_mut().insert(0, group);
    }

    /// Groups in visual order, detached ones included.
    pub fn groups(&self) -> Vec<Rc<FormGroup>> {
        self.groups.borrow().clone()
    }

    /// Input names of the attached groups, in visual order.
    pub fn names(&self) -> Vec<String> {
        self.groups
            .borrow()
            .iter()
            .filter(|g| g.is_attached())
            .map(|g| g.name().to_string())
            .collect()
    }

    pub fn set_notification(&self, message: impl Into<String>, kind: NotificationKind) {
        self.notification.set(Some(Notification {
            message: message.into(),
            kind,
        }));
    }

    pub fn clear_notification(&self) {
        self.notification.set(None);
    }

    pub fn notification(&self) -> Option<Notification> {
        self.notification.get_untracked()
    }

    pub fn notification_signal(&self) -> ReadSignal<Option<Notification>> {
        self.notification.read_only()
    }

    pub fn render_notification(&self) -> Option<RenderedNotification> {
        self.notification
            .with(|notification| render_notification(&self.class_names, notification.as_ref()))
    }

    /// Detaches every group and empties the form.
    pub fn clear(&self) {
        for group in self.groups.borrow_mut().drain(..) {
            group.destroy();
        }
        self.notification.set(None);
    }
}
