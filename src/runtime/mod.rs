pub(crate) mod event_loop;

/// Animation-frame callbacks the stage can request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FrameTask {
    /// Coalesced scroll sample.
    SampleScroll,
    /// One background-effect draw.
    DrawEffect,
}

/// Timer callbacks the stage can schedule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TimerTask {
    /// One step of the boot plan.
    Boot(crate::boot::BootAction),
    /// Show the consent banner.
    ShowConsentBanner,
    /// Deep-link settle delay elapsed after the ready event.
    DeepLinkSettle,
    /// Deep-link hard deadline.
    DeepLinkDeadline,
    /// Resize quiet period elapsed for a resize generation.
    ResizeSettled(u64),
}
