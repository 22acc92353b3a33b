use leptos::*;

use crate::config::ClassNames;
use crate::form::Notification;
use crate::render::render_notification;

/// Form-level message slot, empty while there is nothing to report.
#[component]
pub fn NotificationView(
    notification: ReadSignal<Option<Notification>>,
    class_names: ClassNames,
    #[prop(optional)] on_dismiss: Option<Callback<()>>,
) -> impl IntoView {
    let dismiss_class = class_names.icon.clone();
    let rendered = create_memo(move |_| {
        notification.with(|n| render_notification(&class_names, n.as_ref()))
    });

    move || {
        rendered.get().map(|r| {
            view! {
                <div class=r.class role="alert">
                    <span>{r.message}</span>
                    {on_dismiss.map(|callback| view! {
                        <button
                            class=dismiss_class.clone()
                            aria-label="Dismiss"
                            type="button"
                            on:click=move |_| callback.call(())
                        >
                            "×"
                        </button>
                    })}
                </div>
            }
        })
    }
}
