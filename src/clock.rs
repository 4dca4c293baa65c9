use std::f64::consts::{FRAC_PI_2, TAU};

use chrono::{NaiveDate, NaiveTime, Timelike};
use druid::Data;

use crate::anim::lerp;

#[derive(Clone, Copy, Data, Debug, Default, Eq, PartialEq)]
pub enum HourFormat {
    #[default]
    Twelve,
    TwentyFour
}
impl HourFormat {
    pub fn toggle(&mut self) {
        *self = match self {
            HourFormat::Twelve => HourFormat::TwentyFour,
            HourFormat::TwentyFour => HourFormat::Twelve,
        }
    }
    pub fn toggle_label(self) -> &'static str {
        match self {
            HourFormat::Twelve => "Switch to 24H",
            HourFormat::TwentyFour => "Switch to 12H",
        }
    }
}

pub fn format_time(time: NaiveTime, format: HourFormat) -> String {
    let (h, m, s) = (time.hour(), time.minute(), time.second());
    match format {
        HourFormat::TwentyFour => format!("{h:02}:{m:02}:{s:02}"),
        HourFormat::Twelve => {
            let period = if h < 12 { "AM" } else { "PM" };
            let h12 = match h % 12 {
                0 => 12,
                x => x
            };
            format!("{h12:02}:{m:02}:{s:02} {period}")
        }
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%A, %B %d, %Y").to_string()
}

// radians, 12 o'clock is -PI / 2
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandAngles {
    pub hour: f64,
    pub minute: f64,
    pub second: f64
}
impl HandAngles {
    pub fn at(time: NaiveTime) -> Self {
        // nanosecond() exceeds 1e9 during a leap second
        let millis = (time.nanosecond() / 1_000_000).min(999) as f64;
        let (h, m, s) = (time.hour() as f64, time.minute() as f64, time.second() as f64);
        Self {
            hour: TAU * (h % 12.0 + m / 60.0) / 12.0 - FRAC_PI_2,
            minute: TAU * (m + s / 60.0) / 60.0 - FRAC_PI_2,
            second: TAU * (s + millis / 1000.0) / 60.0 - FRAC_PI_2,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Theme {Day, Night}
impl Theme {
    pub fn at(hour: u32) -> Self {
        if (6..18).contains(&hour) {
            Theme::Day
        } else {
            Theme::Night
        }
    }
    #[inline]
    pub fn daylight(self) -> f64 {
        match self {
            Theme::Day => 1.0,
            Theme::Night => 0.0,
        }
    }
}

pub type Rgb = [u8; 3];

pub const NIGHT_BG: Rgb = [10, 10, 30];
pub const DAY_BG: Rgb = [220, 230, 255];
pub const NIGHT_TEXT: Rgb = [200, 220, 255];
pub const DAY_TEXT: Rgb = [20, 30, 60];

pub const FADE_STEP: f64 = 0.05;

pub fn blend(from: Rgb, to: Rgb, t: f64) -> Rgb {
    let mut out = [0; 3];
    for (o, (a, b)) in out.iter_mut().zip(from.into_iter().zip(to)) {
        *o = lerp(a as f64, b as f64, t).round() as u8;
    }
    out
}

pub fn fade(daylight: f64, theme: Theme) -> f64 {
    lerp(daylight, theme.daylight(), FADE_STEP)
}
