//! The views and the screen state machine that cycles through them.

pub mod main_view;
pub mod page;
pub mod page_manager;
pub mod trip_view;

pub use main_view::MainView;
pub use page::{Page, PageWrapper};
pub use page_manager::ScreenManager;
pub use trip_view::TripView;

use embassy_time::Instant;

use crate::sensors::TimeOfDay;
use crate::trip::TripSnapshot;

/// View identifier, in the order the view-change input cycles through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewId {
    Main,
    TripSummary,
}

impl ViewId {
    pub const ALL: [ViewId; 2] = [ViewId::Main, ViewId::TripSummary];

    /// The view after this one, wrapping past the last back to the first.
    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|&id| id == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

/// Everything a view may show for one cycle.
pub struct ViewContext<'a, T> {
    pub now: Instant,
    /// Wall-clock time read this cycle.
    pub time: TimeOfDay,
    pub trip: TripSnapshot,
    /// Ambient temperature collaborator; views throttle their own reads.
    pub temperature: &'a mut T,
}
