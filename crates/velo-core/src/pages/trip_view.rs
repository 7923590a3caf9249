use embedded_graphics::prelude::*;

use super::{Page, ViewContext, ViewId};
use crate::sensors::TemperatureSensor;
use crate::ui::{Frame, TextField, TextSize, colors, format};

const MARGIN_X: i32 = 8;
const TITLE_Y: i32 = 8;
const FIRST_ROW_Y: i32 = 44;
const ROW_HEIGHT_PX: i32 = 32;
const VALUE_X: i32 = 120;

/// Trip summary: start time, drive time, average speed, idle time, odometer
/// and trip distance.
#[derive(Debug, Default)]
pub struct TripView;

impl TripView {
    pub fn new() -> Self {
        Self
    }
}

impl Page for TripView {
    fn id(&self) -> ViewId {
        ViewId::TripSummary
    }

    fn title(&self) -> &str {
        "Trip summary"
    }

    fn frame<T: TemperatureSensor>(&mut self, ctx: &mut ViewContext<'_, T>) -> Frame {
        let trip = &ctx.trip;
        let mut frame = Frame::new();

        frame.push(
            TextField::new(Point::new(MARGIN_X, TITLE_Y), TextSize::Large, "TRIP SUMMARY")
                .with_color(colors::TITLE),
        );

        let start = format::time_of_day(trip.trip_start);
        let drive = format::duration(trip.drive_ms);
        let average = format::speed(trip.average_centi_kmh);
        let idle = format::duration(trip.idle_ms);
        let odometer = format::odometer(trip.odometer_cm);
        let distance = format::trip(trip.trip_cm);
        let rows: [(&str, &str, Option<&str>); 6] = [
            ("START", start.as_str(), None),
            ("DRIVE", drive.as_str(), None),
            ("AVERAGE", average.as_str(), Some("km/h")),
            ("IDLE", idle.as_str(), None),
            ("ODO", odometer.as_str(), Some("km")),
            ("TRIP", distance.as_str(), Some("km")),
        ];

        let char_width = TextSize::Large.font().character_size.width as i32;
        for (row, (label, value, unit)) in rows.into_iter().enumerate() {
            let y = FIRST_ROW_Y + row as i32 * ROW_HEIGHT_PX;
            frame.push(TextField::label(Point::new(MARGIN_X, y + 6), label));
            frame.push(TextField::new(Point::new(VALUE_X, y), TextSize::Large, value));
            if let Some(unit) = unit {
                let unit_x = VALUE_X + value.len() as i32 * char_width + 6;
                frame.push(TextField::label(Point::new(unit_x, y + 10), unit));
            }
        }

        frame
    }
}
