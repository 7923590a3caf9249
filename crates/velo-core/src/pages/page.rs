//! View abstraction and the enum wrapper the screen manager stores.

use super::{MainView, TripView, ViewContext, ViewId};
use crate::sensors::TemperatureSensor;
use crate::ui::Frame;

/// Trait implemented by every view.
///
/// A view is a presentation function: given the cycle's [`ViewContext`] it
/// lays out a fixed set of fields. Drawing, and clearing the display on a
/// view change, belong to the [`ScreenManager`](super::ScreenManager).
pub trait Page {
    fn id(&self) -> ViewId;

    /// Human-readable title, used in logs.
    fn title(&self) -> &str;

    /// Called once when this view becomes the selected view.
    fn on_activate(&mut self) {}

    /// Lay out this cycle's frame.
    fn frame<T: TemperatureSensor>(&mut self, ctx: &mut ViewContext<'_, T>) -> Frame;
}

/// Enum-based wrapper over the concrete views, so the screen manager can
/// hold all of them without trait objects.
///
/// When adding a view, add a variant here and a [`ViewId`] for it.
pub enum PageWrapper {
    Main(MainView),
    TripSummary(TripView),
}

impl Page for PageWrapper {
    fn id(&self) -> ViewId {
        match self {
            PageWrapper::Main(page) => page.id(),
            PageWrapper::TripSummary(page) => page.id(),
        }
    }

    fn title(&self) -> &str {
        match self {
            PageWrapper::Main(page) => page.title(),
            PageWrapper::TripSummary(page) => page.title(),
        }
    }

    fn on_activate(&mut self) {
        match self {
            PageWrapper::Main(page) => page.on_activate(),
            PageWrapper::TripSummary(page) => page.on_activate(),
        }
    }

    fn frame<T: TemperatureSensor>(&mut self, ctx: &mut ViewContext<'_, T>) -> Frame {
        match self {
            PageWrapper::Main(page) => page.frame(ctx),
            PageWrapper::TripSummary(page) => page.frame(ctx),
        }
    }
}
