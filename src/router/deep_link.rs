/// What resolved a pending deep link.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeepLinkTrigger {
    /// The settle delay after the ready event elapsed.
    Ready,
    /// The hard deadline elapsed first.
    Deadline,
}

/// Initial-load deep link state.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DeepLinkState {
    /// Loaded at the root or at an unmapped path.
    Inactive,
    /// Waiting for the boot sequence to publish readiness.
    WaitingForReady { path: String },
    /// Ready was published; waiting out the settle delay.
    Settling { path: String },
    /// Navigation happened. Terminal.
    Navigated { path: String, trigger: DeepLinkTrigger },
}

/// Ready-or-deadline race for the initial deep link. Resolves at most once.
#[derive(Debug)]
pub struct DeepLink {
    state: DeepLinkState,
}

impl DeepLink {
    pub(crate) fn inactive() -> Self {
        Self {
            state: DeepLinkState::Inactive,
        }
    }

    pub(crate) fn waiting(path: impl Into<String>) -> Self {
        Self {
            state: DeepLinkState::WaitingForReady { path: path.into() },
        }
    }

    pub fn state(&self) -> &DeepLinkState {
        &self.state
    }

    /// Ready event. Returns `true` when the settle timer should be armed.
    pub(crate) fn on_ready(&mut self) -> bool {
        let DeepLinkState::WaitingForReady { path } = &self.state else {
            return false;
        };
        self.state = DeepLinkState::Settling { path: path.clone() };
        true
    }

    /// Try to resolve. Returns the path to navigate when this trigger wins the race.
    pub(crate) fn resolve(&mut self, trigger: DeepLinkTrigger) -> Option<String> {
        let path = match (&self.state, trigger) {
            (DeepLinkState::Settling { path }, _) => path.clone(),
            (DeepLinkState::WaitingForReady { path }, DeepLinkTrigger::Deadline) => path.clone(),
            _ => return None,
        };
        self.state = DeepLinkState::Navigated {
            path: path.clone(),
            trigger,
        };
        Some(path)
    }
}
