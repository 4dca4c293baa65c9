use std::ops::Deref;

use keyframe::{ease, EasingFunction};
use num_traits::Float;

#[inline]
pub fn lerp<F: Float>(from: F, to: F, t: F) -> F {
    from + (to - from) * t.max(F::zero()).min(F::one())
}

pub struct Tween<E: EasingFunction, const MS: u64> {
    time: f64,
    value: f64,
    forward: bool,
    ease: E
}
impl<E: EasingFunction + Default, const MS: u64> Tween<E, MS> {
    pub fn idle() -> Self {
        Self {
            time: 0.0,
            value: 0.0,
            forward: false,
            ease: E::default()
        }
    }
}
impl<E: EasingFunction, const MS: u64> Tween<E, MS> {
    pub fn play_forward(&mut self) {
        self.forward = true;
    }
    pub fn play_backward(&mut self) {
        self.forward = false;
    }
    /// Advances by `nanos` of frame time. Returns true while more frames are needed.
    pub fn anim_frame(&mut self, nanos: u64) -> bool {
        let step = nanos as f64 * 1e-6 / MS as f64;
        self.time = if self.forward {
            (self.time + step).min(1.0)
        } else {
            (self.time - step).max(0.0)
        };
        self.value = ease::<f64, f64, E>(&self.ease, 0.0, 1.0, self.time);
        !self.finished()
    }
    #[inline]
    pub fn finished(&self) -> bool {
        if self.forward {
            self.time >= 1.0
        } else {
            self.time <= 0.0
        }
    }
}
impl<E: EasingFunction, const MS: u64> Deref for Tween<E, MS> {
    type Target = f64;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}
