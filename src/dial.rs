use std::f64::consts::TAU;
use std::time::Duration;

use chrono::{Local, NaiveDateTime, Timelike};
use druid::kurbo::{Circle, Line};
use druid::piet::{LineCap, StrokeStyle};
use druid::widget::{Button, Controller, EnvScope, Flex, Label, Painter};
use druid::{
    theme, BoxConstraints, Color, Data, Env, Event, EventCtx, LayoutCtx, LifeCycle, LifeCycleCtx,
    PaintCtx, Point, RenderContext, Size, TimerToken, UpdateCtx, Widget, WidgetExt,
};
use tracing::{debug, trace};

use crate::clock::{self, HandAngles, HourFormat, Rgb, Theme};

const ACCENT: Color = Color::rgb8(65, 105, 225);
const ACCENT_DARK: Color = Color::rgb8(30, 70, 200);
const HOUR_HAND: Color = Color::rgb8(220, 220, 250);
const MINUTE_HAND: Color = Color::rgb8(180, 180, 240);
const SECOND_HAND: Color = Color::rgb8(255, 80, 80);

#[inline]
fn color([r, g, b]: Rgb) -> Color {
    Color::rgb8(r, g, b)
}

#[derive(Clone, Data)]
pub struct ClockState {
    #[data(eq)]
    now: NaiveDateTime,
    format: HourFormat,
    daylight: f64
}
impl ClockState {
    pub fn new(now: NaiveDateTime, format: HourFormat) -> Self {
        Self {
            now,
            format,
            daylight: 0.0
        }
    }
    pub fn tick(&mut self, now: NaiveDateTime) {
        self.now = now;
        self.daylight = clock::fade(self.daylight, Theme::at(now.hour()));
    }
    pub fn toggle_format(&mut self) {
        self.format.toggle();
        debug!(format = ?self.format, "hour format toggled");
    }
    pub fn time_text(&self) -> String {
        clock::format_time(self.now.time(), self.format)
    }
    pub fn date_text(&self) -> String {
        clock::format_date(self.now.date())
    }
    fn background(&self) -> Color {
        color(clock::blend(clock::NIGHT_BG, clock::DAY_BG, self.daylight))
    }
    fn text_color(&self) -> Color {
        color(clock::blend(clock::NIGHT_TEXT, clock::DAY_TEXT, self.daylight))
    }
    fn dim_color(&self) -> Color {
        let [r, g, b] = clock::blend(clock::NIGHT_TEXT, clock::DAY_TEXT, self.daylight);
        Color::rgb8(r / 2, g / 2, b / 2)
    }
}

pub struct Ticker {
    interval: Duration,
    timer: TimerToken
}
impl Ticker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            timer: TimerToken::INVALID
        }
    }
}
impl<W: Widget<ClockState>> Controller<ClockState, W> for Ticker {
    fn event(&mut self, child: &mut W, ctx: &mut EventCtx, event: &Event, data: &mut ClockState, env: &Env) {
        match event {
            Event::Timer(id) if *id == self.timer => {
                data.tick(Local::now().naive_local());
                self.timer = ctx.request_timer(self.interval);
            },
            _ => child.event(ctx, event, data, env)
        }
    }

    fn lifecycle(&mut self, child: &mut W, ctx: &mut LifeCycleCtx, event: &LifeCycle, data: &ClockState, env: &Env) {
        if let LifeCycle::WidgetAdded = event {
            self.timer = ctx.request_timer(self.interval);
        }
        child.lifecycle(ctx, event, data, env)
    }
}

pub struct ClockFace;
impl ClockFace {
    fn polar(center: Point, len: f64, angle: f64) -> Point {
        Point::new(center.x + len * angle.cos(), center.y + len * angle.sin())
    }
}
impl Widget<ClockState> for ClockFace {
    fn event(&mut self, _: &mut EventCtx, _: &Event, _: &mut ClockState, _: &Env) {}

    fn lifecycle(&mut self, _: &mut LifeCycleCtx, _: &LifeCycle, _: &ClockState, _: &Env) {}

    fn update(&mut self, ctx: &mut UpdateCtx, old_data: &ClockState, data: &ClockState, _: &Env) {
        if !old_data.same(data) {
            ctx.request_paint();
        }
    }

    fn layout(&mut self, _: &mut LayoutCtx, bc: &BoxConstraints, _: &ClockState, _: &Env) -> Size {
        bc.constrain(Size::new(260.0, 260.0))
    }

    fn paint(&mut self, ctx: &mut PaintCtx, data: &ClockState, _: &Env) {
        let size = ctx.size();
        let center = Point::new(size.width / 2.0, size.height / 2.0);
        let radius = size.width.min(size.height) / 2.0 - 10.0;
        if radius <= 15.0 {
            trace!(?size, "clock face too small to paint");
            return;
        }
        let text = data.text_color();
        let dim = data.dim_color();

        ctx.stroke(Circle::new(center, radius), &dim, 2.0);
        ctx.fill(Circle::new(center, radius - 5.0), &data.background());

        for i in 0..60 {
            let angle = TAU * i as f64 / 60.0 - TAU / 4.0;
            if i % 5 == 0 {
                ctx.fill(Circle::new(Self::polar(center, radius - 15.0, angle), 4.0), &text);
            } else {
                ctx.fill(Circle::new(Self::polar(center, radius - 8.0, angle), 1.0), &dim);
            }
        }

        let style = StrokeStyle::new().line_cap(LineCap::Round);
        let angles = HandAngles::at(data.now.time());
        for (angle, scale, width, brush) in [
            (angles.hour, 0.5, 6.0, HOUR_HAND),
            (angles.minute, 0.7, 4.0, MINUTE_HAND),
            (angles.second, 0.8, 2.0, SECOND_HAND),
        ] {
            let tip = Self::polar(center, radius * scale, angle);
            ctx.stroke_styled(Line::new(center, tip), &brush, width, &style);
        }

        ctx.fill(Circle::new(center, 6.0), &SECOND_HAND);
        ctx.fill(Circle::new(center, 3.0), &text);
    }
}

pub fn build_clock(tick: Duration) -> impl Widget<ClockState> {
    let time = Label::dynamic(|data: &ClockState, _| data.time_text()).with_text_size(96.0);
    let date = Label::dynamic(|data: &ClockState, _| data.date_text()).with_text_size(28.0);
    let readout = EnvScope::new(
        |env, data: &ClockState| env.set(theme::TEXT_COLOR, data.text_color()),
        Flex::column()
            .with_child(time)
            .with_spacer(10.0)
            .with_child(date),
    );
    let toggle = EnvScope::new(
        |env, _: &ClockState| {
            env.set(theme::BUTTON_LIGHT, ACCENT);
            env.set(theme::BUTTON_DARK, ACCENT_DARK);
            env.set(theme::TEXT_COLOR, Color::WHITE);
        },
        Button::dynamic(|data: &ClockState, _| data.format.toggle_label().to_string())
            .on_click(|_, data: &mut ClockState, _| data.toggle_format())
            .fix_size(180.0, 50.0),
    );
    let backdrop = Painter::new(|ctx, data: &ClockState, _| {
        let bounds = ctx.size().to_rect();
        ctx.fill(bounds, &data.background());
    });

    Flex::column()
        .with_spacer(40.0)
        .with_child(ClockFace)
        .with_spacer(30.0)
        .with_child(readout)
        .with_flex_spacer(1.0)
        .with_child(toggle)
        .with_spacer(50.0)
        .expand()
        .background(backdrop)
        .controller(Ticker::new(tick))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap().and_hms_opt(h, m, s).unwrap()
    }

    #[test]
    fn texts_follow_format() {
        let mut state = ClockState::new(at(21, 4, 5), HourFormat::Twelve);
        assert_eq!(state.time_text(), "09:04:05 PM");
        state.toggle_format();
        assert_eq!(state.time_text(), "21:04:05");
        assert_eq!(state.date_text(), "Monday, October 19, 2026");
    }

    #[test]
    fn ticks_fade_towards_daylight() {
        let mut state = ClockState::new(at(9, 0, 0), HourFormat::TwentyFour);
        assert_eq!(state.background(), color(clock::NIGHT_BG));
        state.tick(at(9, 0, 1));
        assert!(state.daylight > 0.0);
        for s in 2..200 {
            state.tick(at(9, s / 60, s % 60));
        }
        assert_eq!(state.background(), color(clock::DAY_BG));
        assert_eq!(state.text_color(), color(clock::DAY_TEXT));
    }

    #[test]
    fn night_stays_dark() {
        let mut state = ClockState::new(at(23, 0, 0), HourFormat::Twelve);
        state.tick(at(23, 0, 1));
        assert_eq!(state.daylight, 0.0);
        assert_eq!(state.text_color(), color(clock::NIGHT_TEXT));
    }
}
