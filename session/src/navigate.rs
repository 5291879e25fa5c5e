//! Navigation seam used by logout.

/// Route of the login view.
pub const LOGIN_ROUTE: &str = "/login";

/// Moves the application to another view.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: &str);
}

/// Navigator for headless hosts: records the route change in the log only.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, route: &str) {
        tracing::info!(%route, "navigate");
    }
}
