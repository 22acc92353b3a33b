use leptos::*;

use crate::api::AuthClient;
use crate::components::button::{Button, ButtonVariant};
use crate::components::form_group::FormGroupView;
use crate::components::notification::NotificationView;
use crate::events::DomEvent;
use crate::widget::{LifecycleState, Widget};

/// Renders a constructed [`Widget`]: its fields in visual order, the
/// notification slot and a button group that follows the login state.
pub fn logon_widget_view<A: AuthClient + 'static>(widget: Widget<A>) -> View {
    let form = widget.form();
    let class_names = form.class_names().clone();
    let notification = form.notification_signal();
    let groups = form.groups();
    let lifecycle = widget.lifecycle_signal();

    let on_event = {
        let widget = widget.clone();
        Callback::new(move |event: DomEvent| {
            widget.forward_input_event(event);
        })
    };

    let on_submit = {
        let widget = widget.clone();
        move |ev: ev::SubmitEvent| {
            ev.prevent_default();
            if let Some(task) = widget.on_submit(DomEvent::new("submit")) {
                wasm_bindgen_futures::spawn_local(task);
            }
        }
    };

    let on_logout = {
        let widget = widget.clone();
        Callback::new(move |_: ev::MouseEvent| {
            wasm_bindgen_futures::spawn_local(widget.logout());
        })
    };

    let on_dismiss = {
        let widget = widget.clone();
        Callback::new(move |_: ()| widget.form().clear_notification())
    };

    let fields = groups
        .into_iter()
        .map(|group| {
            let attached = group.attached_signal();
            let view = view! { <FormGroupView group=group on_event=on_event /> }.into_view();
            move || attached.get().then(|| view.clone())
        })
        .collect_view();

    let button_group_class = class_names.button_group.clone();
    let buttons = {
        let class_names = class_names.clone();
        move || match lifecycle.get() {
            LifecycleState::Authenticated => view! {
                <Button
                    class_names=class_names.clone()
                    variant=ButtonVariant::Secondary
                    on_click=on_logout
                >
                    "Log out"
                </Button>
            }
            .into_view(),
            state => view! {
                <Button
                    class_names=class_names.clone()
                    variant=ButtonVariant::Primary
                    button_type="submit"
                    disabled={state == LifecycleState::Submitting}
                >
                    {if state == LifecycleState::Submitting { "Logging in..." } else { "Log in" }}
                </Button>
            }
            .into_view(),
        }
    };

    view! {
        <form class=class_names.form.clone() novalidate=true on:submit=on_submit>
            {fields}
            <NotificationView
                notification=notification
                class_names=class_names.clone()
                on_dismiss=on_dismiss
            />
            <div class=button_group_class>{buttons}</div>
        </form>
    }
    .into_view()
}
