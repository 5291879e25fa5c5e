//! Role-based dashboard for the signed-in user.
//!
//! SYSTEM CONTEXT
//! ==============
//! This is the authenticated landing route. Doctors and patients get
//! different panels; a session whose profile could not be loaded gets a
//! fallback with a retry instead of a redirect.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use session::{Profile, Role, Session};

use crate::components::profile_menu::ProfileMenu;
use crate::state::session::use_session;
use crate::util::auth::install_unauth_redirect;

/// Which dashboard body to show.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum DashboardView {
    Loading,
    Doctor(Profile),
    Patient(Profile),
    Unavailable,
}

pub(crate) fn dashboard_view(session: &Session) -> DashboardView {
    match (&session.user, &session.role) {
        (Some(user), Some(Role::Doctor)) => DashboardView::Doctor(user.clone()),
        (Some(user), Some(_)) => DashboardView::Patient(user.clone()),
        _ if session.loading => DashboardView::Loading,
        _ => DashboardView::Unavailable,
    }
}

fn field(value: Option<&str>) -> String {
    value.unwrap_or("—").to_owned()
}

/// Dashboard page. Redirects to `/login` if there is no session.
#[component]
pub fn DashboardPage() -> impl IntoView {
    let session = use_session();
    let navigate = use_navigate();
    install_unauth_redirect(session, navigate);

    let body = move || match session.with(dashboard_view) {
        DashboardView::Loading => view! { <p class="dashboard__status">"Loading your profile…"</p> }.into_any(),
        DashboardView::Doctor(user) => view! {
            <section class="dashboard__panel dashboard__panel--doctor">
                <h2>{format!("Welcome, {}", user.display_name())}</h2>
                <dl>
                    <dt>"Specialization"</dt><dd>{field(user.specialization.as_deref())}</dd>
                    <dt>"Hospital"</dt><dd>{field(user.hospital.as_deref())}</dd>
                    <dt>"Email"</dt><dd>{field(user.email.as_deref())}</dd>
                </dl>
            </section>
        }
        .into_any(),
        DashboardView::Patient(user) => view! {
            <section class="dashboard__panel dashboard__panel--patient">
                <h2>{format!("Welcome, {}", user.display_name())}</h2>
                <dl>
                    <dt>"Email"</dt><dd>{field(user.email.as_deref())}</dd>
                    <dt>"Phone"</dt><dd>{field(user.phone.as_deref())}</dd>
                </dl>
            </section>
        }
        .into_any(),
        DashboardView::Unavailable => view! {
            <section class="dashboard__panel dashboard__panel--unavailable">
                <h2>"Unknown user"</h2>
                <p>"Your profile could not be loaded."</p>
                <button class="btn" on:click=move |_| session.refetch_user()>"Try again"</button>
            </section>
        }
        .into_any(),
    };

    view! {
        <div class="dashboard-page">
            <header class="toolbar">
                <h1 class="toolbar__title">"CarePortal"</h1>
                <ProfileMenu/>
            </header>
            <main class="dashboard">{body}</main>
        </div>
    }
}
