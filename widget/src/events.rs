//! The widget's event stream.
//!
//! Consumers subscribe by [`EventKind`]; the widget emits [`WidgetEvent`]s for
//! its own lifecycle and re-emits the raw input events of its fields.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use serde_json::{json, Value};

use crate::error::{display_message, AuthError, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Submitted,
    LoginSuccess,
    LoginError,
    LogoutSuccess,
    LogoutError,
    ValidationError,
    Blur,
    Focus,
    Keydown,
    Keypress,
    Keyup,
}

impl EventKind {
    /// Input events forwarded verbatim from the widget's fields.
    pub const INPUT: [EventKind; 5] = [
        EventKind::Blur,
        EventKind::Focus,
        EventKind::Keydown,
        EventKind::Keypress,
        EventKind::Keyup,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Submitted => "submitted",
            EventKind::LoginSuccess => "login:success",
            EventKind::LoginError => "login:error",
            EventKind::LogoutSuccess => "logout:success",
            EventKind::LogoutError => "logout:error",
            EventKind::ValidationError => "validation:error",
            EventKind::Blur => "blur",
            EventKind::Focus => "focus",
            EventKind::Keydown => "keydown",
            EventKind::Keypress => "keypress",
            EventKind::Keyup => "keyup",
        }
    }

    pub fn is_input(&self) -> bool {
        Self::INPUT.contains(self)
    }
}

impl FromStr for EventKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "submitted" => Ok(EventKind::Submitted),
            "login:success" => Ok(EventKind::LoginSuccess),
            "login:error" => Ok(EventKind::LoginError),
            "logout:success" => Ok(EventKind::LogoutSuccess),
            "logout:error" => Ok(EventKind::LogoutError),
            "validation:error" => Ok(EventKind::ValidationError),
            "blur" => Ok(EventKind::Blur),
            "focus" => Ok(EventKind::Focus),
            "keydown" => Ok(EventKind::Keydown),
            "keypress" => Ok(EventKind::Keypress),
            "keyup" => Ok(EventKind::Keyup),
            _ => Err(()),
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Backend-neutral snapshot of a DOM event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomEvent {
    pub event_type: String,
    /// `name` of the input the event fired on, if any.
    pub target: Option<String>,
    pub key: Option<String>,
}

impl DomEvent {
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            ..Self::default()
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WidgetEvent {
    Submitted(DomEvent),
    LoginSuccess(Value),
    LoginError(AuthError),
    LogoutSuccess(Value),
    LogoutError(AuthError),
    ValidationError(ValidationError),
    Input { kind: EventKind, event: DomEvent },
}

impl WidgetEvent {
    /// Wraps a raw input event, keeping its name. `None` for anything that is
    /// not one of [`EventKind::INPUT`].
    pub fn input(event: DomEvent) -> Option<Self> {
        let kind: EventKind = event.event_type.parse().ok()?;
        kind.is_input().then_some(WidgetEvent::Input { kind, event })
    }

    pub fn kind(&self) -> EventKind {
        match self {
            WidgetEvent::Submitted(_) => EventKind::Submitted,
            WidgetEvent::LoginSuccess(_) => EventKind::LoginSuccess,
            WidgetEvent::LoginError(_) => EventKind::LoginError,
            WidgetEvent::LogoutSuccess(_) => EventKind::LogoutSuccess,
            WidgetEvent::LogoutError(_) => EventKind::LogoutError,
            WidgetEvent::ValidationError(_) => EventKind::ValidationError,
            WidgetEvent::Input { kind, .. } => *kind,
        }
    }

    /// JSON shape handed to listeners outside Rust.
    pub fn payload(&self) -> Value {
        match self {
            WidgetEvent::Submitted(event) | WidgetEvent::Input { event, .. } => json!({
                "type": event.event_type,
                "target": event.target,
                "key": event.key,
            }),
            WidgetEvent::LoginSuccess(response) | WidgetEvent::LogoutSuccess(response) => {
                response.clone()
            }
            WidgetEvent::LoginError(error) | WidgetEvent::LogoutError(error) => json!({
                "message": display_message(error),
                "status": error.status(),
            }),
            WidgetEvent::ValidationError(error) => json!({
                "inputName": error.input_name,
                "message": error.message,
            }),
        }
    }
}

pub type Listener = Rc<dyn Fn(&WidgetEvent)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Clone)]
struct Registration {
    id: ListenerId,
    kind: EventKind,
    once: bool,
    listener: Listener,
}

/// Subscribe/emit hub owned by a widget.
///
/// Listeners run in registration order and may subscribe, unsubscribe or
/// emit while they run; changes apply from the next emission on.
#[derive(Default)]
pub struct EventEmitter {
    next_id: Cell<u64>,
    listeners: RefCell<Vec<Registration>>,
}

impl EventEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&self, kind: EventKind, listener: impl Fn(&WidgetEvent) + 'static) -> ListenerId {
        self.register(kind, false, Rc::new(listener))
    }

    /// Like [`on`](Self::on), but the listener is dropped after its first call.
    pub fn once(&self, kind: EventKind, listener: impl Fn(&WidgetEvent) + 'static) -> ListenerId {
        self.register(kind, true, Rc::new(listener))
    }

    fn register(&self, kind: EventKind, once: bool, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push(Registration {
            id,
            kind,
            once,
            listener,
        });
        id
    }

    /// Returns whether a listener was removed.
    pub fn off(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|r| r.id != id);
        listeners.len() != before
    }

    pub fn clear(&self) {
        self.listeners.borrow_mut().clear();
    }

    /// Calls every listener for the event's kind and returns how many ran.
    pub fn emit(&self, event: &WidgetEvent) -> usize {
        let kind = event.kind();
        let matching: Vec<Listener> = {
            let mut listeners = self.listeners.borrow_mut();
            let matching = listeners
                .iter()
                .filter(|r| r.kind == kind)
                .map(|r| Rc::clone(&r.listener))
                .collect();
            listeners.retain(|r| !(r.once && r.kind == kind));
            matching
        };

        for listener in &matching {
            listener(event);
        }
        matching.len()
    }
}

impl fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventEmitter")
            .field("listeners", &self.listeners.borrow().len())
            .finish()
    }
}
