//! Easing curves for transitions.

use std::f64::consts::PI;

/// Maps normalized time in [0, 1] to eased progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    Linear,
    /// Symmetric cubic; the default for unnamed transitions.
    #[default]
    CubicInOut,
    BounceOut,
    SinInOut,
}

impl Easing {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::CubicInOut => {
                let t = t * 2.0;
                if t <= 1.0 {
                    t * t * t / 2.0
                } else {
                    let t = t - 2.0;
                    (t * t * t + 2.0) / 2.0
                }
            }
            Easing::BounceOut => bounce_out(t),
            Easing::SinInOut => (1.0 - (PI * t).cos()) / 2.0,
        }
    }
}

fn bounce_out(t: f64) -> f64 {
    const B1: f64 = 4.0 / 11.0;
    const B2: f64 = 6.0 / 11.0;
    const B3: f64 = 8.0 / 11.0;
    const B4: f64 = 3.0 / 4.0;
    const B5: f64 = 9.0 / 11.0;
    const B6: f64 = 10.0 / 11.0;
    const B7: f64 = 15.0 / 16.0;
    const B8: f64 = 21.0 / 22.0;
    const B9: f64 = 63.0 / 64.0;
    let b0 = 1.0 / B1 / B1;

    if t < B1 {
        b0 * t * t
    } else if t < B3 {
        let t = t - B2;
        b0 * t * t + B4
    } else if t < B6 {
        let t = t - B5;
        b0 * t * t + B7
    } else {
        let t = t - B8;
        b0 * t * t + B9
    }
}
