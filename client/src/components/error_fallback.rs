//! Fallback shown by the root error boundary.

use leptos::prelude::*;

/// Generic failure message with a reload affordance.
#[component]
pub fn ErrorFallback() -> impl IntoView {
    let on_reload = move |_| {
        #[cfg(feature = "csr")]
        {
            if let Some(window) = web_sys::window() {
                let _ = window.location().reload();
            }
        }
    };

    view! {
        <div class="error-fallback" role="alert">
            <h2>"Something went wrong."</h2>
            <p>"The page failed to render. Reloading usually fixes it."</p>
            <button class="btn btn--primary" on:click=on_reload>"Reload"</button>
        </div>
    }
}
