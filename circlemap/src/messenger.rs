/// Wakes up the host UI loop when the screen has something to hand to the widget.
///
/// The screen calls [`Messenger::request_redraw`] from a background task after a fetch completes. The
/// host reacts by calling [`MapScreen::process_events`](crate::MapScreen::process_events) on its UI
/// thread.
pub trait Messenger: Send + Sync {
    /// Requests the host to process pending screen events.
    fn request_redraw(&self);
}

/// Messenger that does nothing. Used when the host polls the screen every frame anyway.
#[derive(Debug, Default, Clone, Copy)]
pub struct DummyMessenger;

impl Messenger for DummyMessenger {
    fn request_redraw(&self) {}
}
