use std::rc::Rc;

use leptos::*;

use crate::events::DomEvent;
use crate::form_group::FormGroup;

/// Label, input and state decorations for one [`FormGroup`].
///
/// Input events are reported through `on_event`; keydown also gives the
/// group a chance to clear its error or success state.
#[component]
pub fn FormGroupView(
    group: Rc<FormGroup>,
    #[prop(into)] on_event: Callback<DomEvent>,
) -> impl IntoView {
    let class_names = group.class_names().clone();
    let id = group.id().to_string();
    let label_for = id.clone();
    let label_text = group.label_text().to_string();
    let name = group.name().to_string();
    let input_type = group.input_type().as_str().to_string();
    let placeholder = Some(group.placeholder().to_string()).filter(|p| !p.is_empty());
    let aria_required = group.is_required().then_some("true");
    let value = group.value_signal();

    let rendered = {
        let group = Rc::clone(&group);
        create_memo(move |_| group.render())
    };

    let forward: Rc<dyn Fn(&str, Option<String>)> = {
        let name = name.clone();
        Rc::new(move |event_type: &str, key: Option<String>| {
            let mut event = DomEvent::new(event_type).with_target(name.clone());
            event.key = key;
            on_event.call(event);
        })
    };

    let on_keydown = {
        let forward = Rc::clone(&forward);
        move |ev: ev::KeyboardEvent| {
            group.handle_keydown();
            forward("keydown", Some(ev.key()));
        }
    };
    let on_keypress = {
        let forward = Rc::clone(&forward);
        move |ev: ev::KeyboardEvent| forward("keypress", Some(ev.key()))
    };
    let on_keyup = {
        let forward = Rc::clone(&forward);
        move |ev: ev::KeyboardEvent| forward("keyup", Some(ev.key()))
    };
    let on_focus = {
        let forward = Rc::clone(&forward);
        move |_: ev::FocusEvent| forward("focus", None)
    };
    let on_blur = move |_: ev::FocusEvent| forward("blur", None);

    let icon_class = class_names.icon.clone();
    let message_class = class_names.message.clone();

    view! {
        <div class=move || rendered.with(|r| r.class.clone())>
            <label class=class_names.label.clone() for=label_for>
                {label_text}
            </label>
            <input
                class=class_names.input.clone()
                id=id
                name=name
                type=input_type
                placeholder=placeholder
                aria-required=aria_required
                prop:value=move || value.get()
                on:input=move |ev| value.set(event_target_value(&ev))
                on:keydown=on_keydown
                on:keypress=on_keypress
                on:keyup=on_keyup
                on:focus=on_focus
                on:blur=on_blur
            />
            {move || rendered.with(|r| r.icon).then(|| view! {
                <span class=icon_class.clone() aria-hidden="true"></span>
            })}
            {move || rendered.with(|r| r.message.clone()).map(|message| view! {
                <span class=message_class.clone()>{message}</span>
            })}
        </div>
    }
}
