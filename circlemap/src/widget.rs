//! The map widget annotations are displayed with.

use crate::annotation::Annotation;

/// Map widget that displays annotations.
///
/// The widget is owned by a [`MapScreen`](crate::MapScreen) and only called from
/// [`MapScreen::process_events`](crate::MapScreen::process_events), so implementations don't need
/// to be thread safe. Marker images are requested from the screen with
/// [`MapScreen::image_for`](crate::MapScreen::image_for).
pub trait MapWidget {
    /// Adds annotations to the ones already displayed.
    fn add_annotations(&mut self, annotations: &[Annotation]);

    /// All annotations displayed by the widget.
    fn annotations(&self) -> &[Annotation];

    /// Fits the viewport so that all given annotations are visible.
    fn show_annotations(&mut self, annotations: &[Annotation]);
}
