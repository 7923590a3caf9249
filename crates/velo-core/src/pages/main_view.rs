use embassy_time::Duration;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

use super::{Page, ViewContext, ViewId};
use crate::sensors::{TemperatureSensor, ThrottledTemperature};
use crate::ui::{Frame, TextField, TextSize, colors, format};

const MARGIN_X: i32 = 8;
const HEADER_Y: i32 = 8;
/// Leaves room for `+dd.dC` in the large font at the right edge.
const TEMPERATURE_X: i32 = 252;

const SPEED_Y: i32 = 52;
const ODOMETER_Y: i32 = 112;
const TRIP_Y: i32 = 172;

/// Gap between a label and the reading below it.
const LABEL_GAP_PX: i32 = 14;

/// Riding view: clock, temperature, speed, odometer and trip distance.
pub struct MainView {
    temperature: ThrottledTemperature,
}

impl MainView {
    pub fn new(temperature_refresh: Duration) -> Self {
        Self {
            temperature: ThrottledTemperature::new(temperature_refresh),
        }
    }
}

impl Page for MainView {
    fn id(&self) -> ViewId {
        ViewId::Main
    }

    fn title(&self) -> &str {
        "Main"
    }

    fn frame<T: TemperatureSensor>(&mut self, ctx: &mut ViewContext<'_, T>) -> Frame {
        let celsius = self.temperature.read(&mut *ctx.temperature, ctx.now);
        let mut frame = Frame::new();

        frame.push(TextField::new(
            Point::new(MARGIN_X, HEADER_Y),
            TextSize::Large,
            &format::time_of_day(ctx.time),
        ));
        frame.push(
            TextField::new(
                Point::new(TEMPERATURE_X, HEADER_Y),
                TextSize::Large,
                &format::temperature(celsius),
            )
            .with_color(match celsius {
                Some(_) => colors::VALUE,
                None => colors::PLACEHOLDER,
            }),
        );

        reading(
            &mut frame,
            SPEED_Y,
            "SPEED",
            &format::speed(ctx.trip.speed_centi_kmh),
            "km/h",
            colors::SPEED,
        );
        reading(
            &mut frame,
            ODOMETER_Y,
            "ODO",
            &format::odometer(ctx.trip.odometer_cm),
            "km",
            colors::VALUE,
        );
        reading(
            &mut frame,
            TRIP_Y,
            "TRIP",
            &format::trip(ctx.trip.trip_cm),
            "km",
            colors::VALUE,
        );

        frame
    }
}

/// Label above a large reading, unit to its right.
fn reading(frame: &mut Frame, y: i32, label: &str, value: &str, unit: &str, color: Rgb565) {
    let value_y = y + LABEL_GAP_PX;
    let value_width = value.len() as i32 * TextSize::Large.font().character_size.width as i32;

    frame.push(TextField::label(Point::new(MARGIN_X, y), label));
    frame.push(
        TextField::new(Point::new(MARGIN_X, value_y), TextSize::Large, value).with_color(color),
    );
    frame.push(TextField::label(
        Point::new(MARGIN_X + value_width + 6, value_y + 10),
        unit,
    ));
}
