//! Session provider with the startup render gate.

use leptos::prelude::*;
use session::GatePolicy;

use crate::state::session::SessionContext;

/// Creates the app's session, provides it to `children`, and withholds them
/// until the gate opens so signed-out UI never flashes before the stored
/// token has been checked.
#[component]
pub fn SessionProvider(#[prop(optional)] gate: GatePolicy, children: ChildrenFn) -> impl IntoView {
    let session = SessionContext::provide(gate);

    view! {
        <Show
            when=move || session.should_render()
            fallback=|| view! { <div class="session-loading" aria-busy="true">"Loading…"</div> }
        >
            {children()}
        </Show>
    }
}
