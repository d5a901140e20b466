//! Ellipse vertex generator.
//!
//! Generates vertices approximating an ellipse as a regular polygon. Every
//! dot in the grid is one of these with `rx == ry`.

use crate::basics::{
    uround, VertexSource, PATH_CMD_END_POLY, PATH_CMD_LINE_TO, PATH_CMD_MOVE_TO, PATH_CMD_STOP,
    PATH_FLAGS_CCW, PATH_FLAGS_CLOSE, PI,
};

/// Fewest segments a dot is ever approximated with.
const MIN_STEPS: u32 = 8;

/// Ellipse vertex generator.
///
/// The number of steps is either given explicitly or derived from the radii
/// so the polygon deviates from the true curve by at most 1/8 pixel.
pub struct Ellipse {
    x: f64,
    y: f64,
    rx: f64,
    ry: f64,
    num: u32,
    step: u32,
    cw: bool,
}

impl Ellipse {
    /// Create a new ellipse. `num_steps == 0` selects automatic stepping.
    pub fn new(x: f64, y: f64, rx: f64, ry: f64, num_steps: u32, cw: bool) -> Self {
        let mut e = Self {
            x,
            y,
            rx,
            ry,
            num: num_steps,
            step: 0,
            cw,
        };
        if e.num == 0 {
            e.calc_num_steps();
        }
        e
    }

    /// A circle with automatic stepping.
    pub fn circle(x: f64, y: f64, r: f64) -> Self {
        Self::new(x, y, r, r, 0, false)
    }

    /// Number of polygon vertices generated.
    pub fn num_steps(&self) -> u32 {
        self.num
    }

    fn calc_num_steps(&mut self) {
        let ra = (self.rx.abs() + self.ry.abs()) / 2.0;
        let da = (ra / (ra + 0.125)).acos() * 2.0;
        self.num = if da > 0.0 {
            uround(2.0 * PI / da).max(MIN_STEPS)
        } else {
            MIN_STEPS
        };
    }
}

impl VertexSource for Ellipse {
    fn rewind(&mut self, _path_id: u32) {
        self.step = 0;
    }

    fn vertex(&mut self, x: &mut f64, y: &mut f64) -> u32 {
        if self.step == self.num {
            self.step += 1;
            return PATH_CMD_END_POLY | PATH_FLAGS_CLOSE | PATH_FLAGS_CCW;
        }
        if self.step > self.num {
            return PATH_CMD_STOP;
        }
        let mut angle = self.step as f64 / self.num as f64 * 2.0 * PI;
        if self.cw {
            angle = 2.0 * PI - angle;
        }
        *x = self.x + angle.cos() * self.rx;
        *y = self.y + angle.sin() * self.ry;
        self.step += 1;
        if self.step == 1 {
            PATH_CMD_MOVE_TO
        } else {
            PATH_CMD_LINE_TO
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
