//! Screen state machine: view selection, view-change debounce and redraw.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_hal::digital::InputPin;
use heapless::Vec;
use log::{debug, info};

use super::page::{Page, PageWrapper};
use super::{MainView, TripView, ViewContext, ViewId};
use crate::config::TripConfig;
use crate::input::Button;
use crate::sensors::TemperatureSensor;
use crate::ui::colors;

/// Owns the selected view and the view-change input.
///
/// Starts on [`ViewId::Main`]. Each cycle it accepts at most one view change
/// (the input held for the full hold interval), clears the display when the
/// view changed, then draws the selected view.
pub struct ScreenManager<V> {
    pages: Vec<PageWrapper, 2>,
    current_view: ViewId,
    view_button: Button<V>,
    /// Clear before the next draw: set at startup and on every view change.
    needs_clear: bool,
}

impl<V: InputPin> ScreenManager<V> {
    pub fn new(config: &TripConfig, view_pin: V) -> Self {
        let mut manager = Self {
            pages: Vec::new(),
            current_view: ViewId::Main,
            view_button: Button::new("view", view_pin, config.view_hold()),
            needs_clear: true,
        };
        manager.register_page(PageWrapper::Main(MainView::new(
            config.temperature_refresh(),
        )));
        manager.register_page(PageWrapper::TripSummary(TripView::new()));
        manager
    }

    fn register_page(&mut self, page: PageWrapper) {
        self.pages.push(page).ok();
    }

    pub fn current_view(&self) -> ViewId {
        self.current_view
    }

    /// Select the next view. The display is cleared before it is drawn.
    pub fn advance(&mut self) -> ViewId {
        self.current_view = self.current_view.next();
        self.needs_clear = true;
        if let Some(page) = self.current_page_mut() {
            page.on_activate();
            info!("View changed to {}", page.title());
        }
        self.current_view
    }

    /// One control-loop cycle. Returns `true` when the view changed.
    pub fn tick<T, D>(
        &mut self,
        ctx: &mut ViewContext<'_, T>,
        display: &mut D,
    ) -> Result<bool, D::Error>
    where
        T: TemperatureSensor,
        D: DrawTarget<Color = Rgb565>,
    {
        let changed = self.view_button.poll(ctx.now);
        if changed {
            self.advance();
        }
        self.draw(ctx, display)?;
        Ok(changed)
    }

    /// Draw the selected view, clearing first if the view changed.
    pub fn draw<T, D>(&mut self, ctx: &mut ViewContext<'_, T>, display: &mut D) -> Result<(), D::Error>
    where
        T: TemperatureSensor,
        D: DrawTarget<Color = Rgb565>,
    {
        if self.needs_clear {
            debug!("Clearing display for {:?}", self.current_view);
            display.clear(colors::BACKGROUND)?;
            self.needs_clear = false;
        }
        if let Some(page) = self.current_page_mut() {
            page.frame(ctx).draw(display)?;
        }
        Ok(())
    }

    pub fn view_pin_mut(&mut self) -> &mut V {
        self.view_button.pin_mut()
    }

    fn current_page_mut(&mut self) -> Option<&mut PageWrapper> {
        let current = self.current_view;
        self.pages.iter_mut().find(|page| page.id() == current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::tests::FakePin;
    use crate::pages::tests::FixedTemperature;
    use crate::sensors::TimeOfDay;
    use crate::trip::TripSnapshot;
    use crate::ui::tests::Recorder;
    use core::cell::Cell;
    use embassy_time::Instant;

    struct Bench<'a> {
        screen: ScreenManager<FakePin<'a>>,
        sensor: FixedTemperature,
        display: Recorder,
    }

    impl<'a> Bench<'a> {
        fn new(pressed: &'a Cell<bool>) -> Self {
            Self {
                screen: ScreenManager::new(
                    &TripConfig::DEFAULT,
                    FakePin {
                        pressed,
                        broken: false,
                    },
                ),
                sensor: FixedTemperature::new(Some(21.0)),
                display: Recorder::default(),
            }
        }

        fn tick(&mut self, ms: u64) -> bool {
            let mut ctx = ViewContext {
                now: Instant::from_millis(ms),
                time: TimeOfDay::new(10, 0, 0),
                trip: TripSnapshot::default(),
                temperature: &mut self.sensor,
            };
            let Ok(changed) = self.screen.tick(&mut ctx, &mut self.display);
            changed
        }
    }

    #[test]
    fn test_starts_on_main_and_clears_once() {
        let pressed = Cell::new(false);
        let mut bench = Bench::new(&pressed);

        for ms in (0..2000).step_by(250) {
            assert!(!bench.tick(ms));
        }

        assert_eq!(bench.screen.current_view(), ViewId::Main);
        assert_eq!(bench.display.clears, 1, "only the first frame clears");
        assert!(bench.display.pixels > 0);
    }

    #[test]
    fn test_held_input_cycles_views() {
        let pressed = Cell::new(false);
        let mut bench = Bench::new(&pressed);
        bench.tick(0);

        pressed.set(true);
        let mut seen = heapless::Vec::<ViewId, 4>::new();
        for ms in (250..=3000).step_by(250) {
            if bench.tick(ms) {
                seen.push(bench.screen.current_view()).ok();
            }
        }

        assert_eq!(
            seen.as_slice(),
            &[ViewId::TripSummary, ViewId::Main, ViewId::TripSummary]
        );
        assert_eq!(bench.display.clears, 4, "startup plus one per transition");
    }

    #[test]
    fn test_short_press_changes_nothing() {
        let pressed = Cell::new(false);
        let mut bench = Bench::new(&pressed);
        bench.tick(0);

        for round in 0..4u64 {
            let start = 1000 + round * 1000;
            assert!(!bench.tick(start));
            pressed.set(true);
            for offset in [250, 500, 750] {
                assert!(!bench.tick(start + offset));
            }
            pressed.set(false);
        }

        assert_eq!(bench.screen.current_view(), ViewId::Main);
        assert_eq!(bench.display.clears, 1);
    }

    #[test]
    fn test_every_cycle_redraws_selected_view() {
        let pressed = Cell::new(false);
        let mut bench = Bench::new(&pressed);
        bench.tick(0);
        let first = bench.display.pixels;
        bench.tick(250);
        assert_eq!(bench.display.pixels, 2 * first);
    }

    #[test]
    fn test_clear_comes_before_new_view() {
        let pressed = Cell::new(false);
        let mut bench = Bench::new(&pressed);
        bench.tick(0);

        pressed.set(true);
        bench.tick(500);
        assert!(bench.tick(1000));

        assert_eq!(bench.display.clears, 2);
        assert!(
            bench.display.pixels_since_clear > 0,
            "the new view is drawn after the clear"
        );
    }
}
