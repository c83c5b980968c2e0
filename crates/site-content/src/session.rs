use tracing::info;

/// Simulated admin sign-in.
///
/// There are no credentials: logging in only flips a flag that gates the
/// admin surface of [`Site`](crate::site::Site).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AdminSession {
    authenticated: bool,
}

impl AdminSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn login(&mut self) {
        self.authenticated = true;
        info!("admin session opened");
    }

    pub fn logout(&mut self) {
        self.authenticated = false;
        info!("admin session closed");
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }
}
