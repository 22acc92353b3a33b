pub mod button;
pub mod form_group;
pub mod logon_widget;
pub mod notification;

pub use button::{Button, ButtonVariant};
pub use form_group::FormGroupView;
pub use logon_widget::logon_widget_view;
pub use notification::NotificationView;
