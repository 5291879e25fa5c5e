//! Root application component with routing and the session provider.

use leptos::prelude::*;
use leptos_meta::{Stylesheet, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};

use crate::components::error_fallback::ErrorFallback;
use crate::components::session_gate::SessionProvider;
use crate::pages::{dashboard::DashboardPage, login::LoginPage};

/// Root application component.
///
/// The session provider sits inside the router so logout can navigate, and
/// inside the error boundary so a failing page never takes the shell down.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Stylesheet id="leptos" href="/pkg/portal.css"/>
        <Title text="CarePortal"/>

        <Router>
            <ErrorBoundary fallback=|_errors| view! { <ErrorFallback/> }>
                <SessionProvider>
                    <Routes fallback=|| "Page not found.".into_view()>
                        <Route path=StaticSegment("login") view=LoginPage/>
                        <Route path=StaticSegment("") view=DashboardPage/>
                    </Routes>
                </SessionProvider>
            </ErrorBoundary>
        </Router>
    }
}
