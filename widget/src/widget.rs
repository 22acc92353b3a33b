use std::cell::Cell;
use std::collections::HashMap;
use std::future::Future;
use std::rc::Rc;

use leptos::{create_rw_signal, ReadSignal, RwSignal, SignalGetUntracked, SignalSet};

use crate::api::{AuthClient, HttpAuthClient};
use crate::config::WidgetConfig;
use crate::error::{display_message, AuthError, ConfigurationError};
use crate::events::{DomEvent, EventEmitter, EventKind, ListenerId, WidgetEvent};
use crate::form::{Form, NotificationKind};
use crate::form_group::FormGroup;

/// Something a widget can be attached to, usually a DOM element.
pub trait AttachTarget {
    /// Whether the handle refers to a node content can be rendered into.
    fn is_node(&self) -> bool;

    /// Removes every child.
    fn clear(&self);

    fn set_class_name(&self, class_name: &str);
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LifecycleState {
    #[default]
    Idle,
    Submitting,
    Authenticated,
    Error,
}

struct Inner<A> {
    config: WidgetConfig,
    auth: A,
    events: EventEmitter,
    form: Form,
    // Construction order, which is the reverse of the configured order.
    form_groups: Vec<Rc<FormGroup>>,
    lifecycle: RwSignal<LifecycleState>,
    destroyed: Cell<bool>,
}

/// Login/logout widget: validates its fields, hands credentials to an
/// [`AuthClient`] and reports every step on its event stream.
///
/// Cloning is cheap; clones share the same widget.
pub struct Widget<A = HttpAuthClient> {
    inner: Rc<Inner<A>>,
}

impl<A> Clone for Widget<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl Widget<HttpAuthClient> {
    /// Builds a widget with its own HTTP auth client bound to `config.base_url`.
    pub fn new<T>(element: Option<&T>, config: WidgetConfig) -> Result<Self, ConfigurationError>
    where
        T: AttachTarget + ?Sized,
    {
        let auth = HttpAuthClient::new(config.auth_options());
        Self::with_auth(element, config, auth)
    }
}

impl<A: AuthClient + 'static> Widget<A> {
    pub fn with_auth<T>(
        element: Option<&T>,
        config: WidgetConfig,
        auth: A,
    ) -> Result<Self, ConfigurationError>
    where
        T: AttachTarget + ?Sized,
    {
        let element = element.ok_or(ConfigurationError::MissingElement)?;
        if !element.is_node() {
            return Err(ConfigurationError::NotANode);
        }
        config.check_unique_names()?;

        let form = Form::new(config.class_names.clone());
        let form_groups: Vec<Rc<FormGroup>> = config
            .form_groups
            .iter()
            .map(|group| {
                let group = FormGroup::new(group.clone(), &config.class_names)
                    .with_fallback_message(config.messages.error.clone());
                Rc::new(group)
            })
            .rev()
            .collect();

        element.clear();
        element.set_class_name(&config.class_names.root);

        // Each group goes in front of the previous one, so walking the
        // reversed list restores the configured order on screen.
        for group in &form_groups {
            form.insert_first(Rc::clone(group));
        }

        let widget = Self {
            inner: Rc::new(Inner {
                config,
                auth,
                events: EventEmitter::new(),
                form,
                form_groups,
                lifecycle: create_rw_signal(LifecycleState::Idle),
                destroyed: Cell::new(false),
            }),
        };
        widget.set_events();

        log::debug!("Logon widget created with fields {:?}", widget.inner.form.names());
        Ok(widget)
    }

    fn set_events(&self) {
        for kind in [EventKind::LoginError, EventKind::LogoutError] {
            let weak = Rc::downgrade(&self.inner);
            self.inner.events.on(kind, move |event| {
                let (Some(inner), WidgetEvent::LoginError(error) | WidgetEvent::LogoutError(error)) =
                    (weak.upgrade(), event)
                else {
                    return;
                };
                Widget { inner }.on_error(error);
            });
        }

        let weak = Rc::downgrade(&self.inner);
        self.inner.events.on(EventKind::LoginSuccess, move |_| {
            if let Some(inner) = weak.upgrade() {
                Widget { inner }.on_login();
            }
        });

        let weak = Rc::downgrade(&self.inner);
        self.inner.events.on(EventKind::LogoutSuccess, move |_| {
            if let Some(inner) = weak.upgrade() {
                Widget { inner }.on_logout();
            }
        });
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn config(&self) -> &WidgetConfig {
        &self.inner.config
    }

    pub fn auth(&self) -> &A {
        &self.inner.auth
    }

    pub fn form(&self) -> &Form {
        &self.inner.form
    }

    /// Groups in construction order (last configured first).
    pub fn form_groups(&self) -> &[Rc<FormGroup>] {
        &self.inner.form_groups
    }

    pub fn form_group(&self, input_name: &str) -> Option<&Rc<FormGroup>> {
        self.inner.form_groups.iter().find(|g| g.name() == input_name)
    }

    pub fn lifecycle(&self) -> LifecycleState {
        self.inner.lifecycle.get_untracked()
    }

    pub fn lifecycle_signal(&self) -> ReadSignal<LifecycleState> {
        self.inner.lifecycle.read_only()
    }

    /// Field values keyed by input name.
    pub fn form_data(&self) -> HashMap<String, String> {
        self.inner
            .form_groups
            .iter()
            .map(|g| (g.name().to_string(), g.value()))
            .collect()
    }

    // ------------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------------

    pub fn on(&self, kind: EventKind, listener: impl Fn(&WidgetEvent) + 'static) -> ListenerId {
        self.inner.events.on(kind, listener)
    }

    pub fn once(&self, kind: EventKind, listener: impl Fn(&WidgetEvent) + 'static) -> ListenerId {
        self.inner.events.once(kind, listener)
    }

    pub fn off(&self, id: ListenerId) -> bool {
        self.inner.events.off(id)
    }

    pub fn emit(&self, event: WidgetEvent) -> usize {
        self.inner.events.emit(&event)
    }

    /// Re-emits a field's raw input event under its own name. Returns false
    /// for events that are not forwarded.
    pub fn forward_input_event(&self, event: DomEvent) -> bool {
        match WidgetEvent::input(event) {
            Some(event) => {
                self.emit(event);
                true
            }
            None => false,
        }
    }

    // ------------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------------

    /// Validates every field and, when all pass, starts a login.
    ///
    /// All fields are validated even after the first failure so every error
    /// shows at once. Returns the login task to drive, or `None` when the
    /// submit was rejected or another call is still in flight.
    pub fn on_submit(&self, event: DomEvent) -> Option<impl Future<Output = ()> + 'static> {
        if self.is_destroyed() {
            log::debug!("Ignoring submit on a destroyed widget");
            return None;
        }
        if self.lifecycle() == LifecycleState::Submitting {
            log::warn!("Ignoring submit while an authentication call is in flight");
            return None;
        }

        let mut valid = true;
        for group in &self.inner.form_groups {
            if !group.validate() {
                valid = false;
                if let Some(error) = group.validation_error() {
                    self.emit(WidgetEvent::ValidationError(error));
                }
            }
        }

        if !valid {
            log::debug!("Submit rejected by validation");
            return None;
        }

        self.emit(WidgetEvent::Submitted(event));
        Some(self.login())
    }

    /// Sends the current field values to the auth client.
    ///
    /// Values are read when this is called; the returned task performs the
    /// call and emits `login:success` or `login:error` once it resolves.
    pub fn login(&self) -> impl Future<Output = ()> + 'static {
        let data = self.form_data();
        let username = data.get("username").cloned().unwrap_or_default();
        let password = data.get("password").cloned().unwrap_or_default();

        self.inner.lifecycle.set(LifecycleState::Submitting);
        log::info!("Logging in as '{}'", username);

        let widget = self.clone();
        async move {
            match widget.inner.auth.login(&username, &password).await {
                Ok(response) => widget.emit(WidgetEvent::LoginSuccess(response)),
                Err(error) => widget.emit(WidgetEvent::LoginError(error)),
            };
        }
    }

    /// Ends the session; emits `logout:success` or `logout:error` once it resolves.
    pub fn logout(&self) -> impl Future<Output = ()> + 'static {
        self.inner.lifecycle.set(LifecycleState::Submitting);
        log::info!("Logging out");

        let widget = self.clone();
        async move {
            match widget.inner.auth.logout().await {
                Ok(response) => widget.emit(WidgetEvent::LogoutSuccess(response)),
                Err(error) => widget.emit(WidgetEvent::LogoutError(error)),
            };
        }
    }

    pub fn on_error(&self, error: &AuthError) {
        let message = display_message(error);
        self.inner.form.set_notification(message.clone(), NotificationKind::Error);
        self.inner.lifecycle.set(LifecycleState::Error);

        leptos::logging::error!("{}", message);
        log::error!("Authentication call failed: {:?}", error);
    }

    pub fn on_login(&self) {
        self.inner.form.clear_notification();
        self.inner.lifecycle.set(LifecycleState::Authenticated);
        log::info!("Switched to logged in state");
    }

    pub fn on_logout(&self) {
        for group in &self.inner.form_groups {
            group.set_value(String::new());
            group.clear_state();
        }
        self.inner.form.clear_notification();
        self.inner.lifecycle.set(LifecycleState::Idle);
        log::info!("Switched to logged out state");
    }

    pub fn is_destroyed(&self) -> bool {
        self.inner.destroyed.get()
    }

    /// Detaches every field and drops all subscribers. Clones still held by
    /// a rendered view stop accepting submits; removing the rendered nodes is
    /// left to whoever mounted them.
    pub fn destroy(self) {
        self.inner.destroyed.set(true);
        self.inner.form.clear();
        self.inner.events.clear();
    }
}

impl<A> std::fmt::Debug for Widget<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Widget")
            .field("config", &self.inner.config)
            .field("events", &self.inner.events)
            .field("lifecycle", &self.inner.lifecycle)
            .finish_non_exhaustive()
    }
}
