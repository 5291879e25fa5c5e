//! Dropdown with the signed-in user's name, a profile refresh, and logout.

#[cfg(test)]
#[path = "profile_menu_test.rs"]
mod profile_menu_test;

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use session::Session;

use crate::state::session::use_session;

/// Menu label for the current session.
pub(crate) fn menu_label(session: &Session) -> String {
    match (&session.user, session.loading) {
        (Some(user), _) => user.display_name().to_owned(),
        (None, true) => "Loading…".to_owned(),
        (None, false) => "Unknown user".to_owned(),
    }
}

#[component]
pub fn ProfileMenu() -> impl IntoView {
    let session = use_session();
    let navigate = use_navigate();
    let open = RwSignal::new(false);

    let label = move || session.with(menu_label);
    let role = move || session.with(|s| s.role.as_ref().map(ToString::to_string).unwrap_or_default());

    let on_toggle = move |_| open.update(|o| *o = !*o);
    let on_refresh = move |_| {
        open.set(false);
        session.refetch_user();
    };
    let on_logout = move |_| {
        open.set(false);
        session.logout(&navigate);
    };

    view! {
        <div class="profile-menu">
            <button class="btn profile-menu__trigger" on:click=on_toggle>
                <span class="profile-menu__name">{label}</span>
                <span class="profile-menu__role">{role}</span>
            </button>
            <div class="profile-menu__dropdown" hidden=move || !open.get()>
                <button class="btn profile-menu__item" on:click=on_refresh>"Refresh profile"</button>
                <button class="btn profile-menu__item" on:click=on_logout>"Logout"</button>
            </div>
        </div>
    }
}
