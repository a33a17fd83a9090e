//! Easing curves.
//!
//! Names follow the `powerN` family: `power1` is quadratic, `power4` is
//! quintic. `out` curves decelerate, `in_out` curves are symmetric.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Ease {
    /// Linear.
    None,
    #[default]
    Power1Out,
    Power2Out,
    Power2InOut,
    Power3Out,
    Power4Out,
    Power4InOut,
}

impl Ease {
    /// Map linear progress `t` to eased progress. Input is clamped to [0, 1].
    pub fn apply(self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Ease::None => t,
            Ease::Power1Out => out(t, 2),
            Ease::Power2Out => out(t, 3),
            Ease::Power2InOut => in_out(t, 3),
            Ease::Power3Out => out(t, 4),
            Ease::Power4Out => out(t, 5),
            Ease::Power4InOut => in_out(t, 5),
        }
    }
}

fn out(t: f64, power: i32) -> f64 {
    1.0 - (1.0 - t).powi(power)
}

fn in_out(t: f64, power: i32) -> f64 {
    if t < 0.5 {
        (2.0 * t).powi(power) / 2.0
    } else {
        1.0 - (2.0 * (1.0 - t)).powi(power) / 2.0
    }
}
