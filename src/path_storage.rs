//! Flattened path container.
//!
//! Stores polygon vertices as `(x, y, cmd)` triples. Quadratic and cubic
//! Bezier segments are flattened into line segments as they are added, so
//! iterating the path only ever yields move-to, line-to, and end-poly
//! commands. Glyph outlines are the main client.

use crate::basics::{
    is_end_poly, is_move_to, is_vertex, uround, VertexSource, PATH_CMD_END_POLY,
    PATH_CMD_LINE_TO, PATH_CMD_MOVE_TO, PATH_CMD_STOP, PATH_FLAGS_CLOSE,
};

/// Fewest line segments a curve is split into.
const CURVE_MIN_STEPS: u32 = 4;

/// A flattened polygon path.
#[derive(Debug, Clone, Default)]
pub struct PathStorage {
    vertices: Vec<(f64, f64, u32)>,
    iter: usize,
}

impl PathStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove all vertices.
    pub fn remove_all(&mut self) {
        self.vertices.clear();
        self.iter = 0;
    }

    pub fn move_to(&mut self, x: f64, y: f64) {
        self.vertices.push((x, y, PATH_CMD_MOVE_TO));
    }

    pub fn line_to(&mut self, x: f64, y: f64) {
        self.vertices.push((x, y, PATH_CMD_LINE_TO));
    }

    /// Quadratic Bezier from the last vertex through `(x_ctrl, y_ctrl)` to `(x_to, y_to)`.
    pub fn curve3(&mut self, x_ctrl: f64, y_ctrl: f64, x_to: f64, y_to: f64) {
        let (x1, y1) = self.last_xy();
        let len = (x_ctrl - x1).hypot(y_ctrl - y1) + (x_to - x_ctrl).hypot(y_to - y_ctrl);
        let steps = curve_steps(len);
        for i in 1..=steps {
            let t = i as f64 / steps as f64;
            let mt = 1.0 - t;
            let a = mt * mt;
            let b = 2.0 * mt * t;
            let c = t * t;
            self.line_to(
                a * x1 + b * x_ctrl + c * x_to,
                a * y1 + b * y_ctrl + c * y_to,
            );
        }
    }

    /// Cubic Bezier from the last vertex through two control points to `(x_to, y_to)`.
    pub fn curve4(
        &mut self,
        x_ctrl1: f64,
        y_ctrl1: f64,
        x_ctrl2: f64,
        y_ctrl2: f64,
        x_to: f64,
        y_to: f64,
    ) {
        let (x1, y1) = self.last_xy();
        let len = (x_ctrl1 - x1).hypot(y_ctrl1 - y1)
            + (x_ctrl2 - x_ctrl1).hypot(y_ctrl2 - y_ctrl1)
            + (x_to - x_ctrl2).hypot(y_to - y_ctrl2);
        let steps = curve_steps(len);
        for i in 1..=steps {
            let t = i as f64 / steps as f64;
            let mt = 1.0 - t;
            let a = mt * mt * mt;
            let b = 3.0 * mt * mt * t;
            let c = 3.0 * mt * t * t;
            let d = t * t * t;
            self.line_to(
                a * x1 + b * x_ctrl1 + c * x_ctrl2 + d * x_to,
                a * y1 + b * y_ctrl1 + c * y_ctrl2 + d * y_to,
            );
        }
    }

    /// Close the current contour.
    pub fn close_polygon(&mut self) {
        if self.vertices.last().is_some_and(|v| is_vertex(v.2)) {
            self.vertices
                .push((0.0, 0.0, PATH_CMD_END_POLY | PATH_FLAGS_CLOSE));
        }
    }

    pub fn total_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Split the path into closed contours of plain points.
    pub fn contours(&self) -> Vec<Vec<(f64, f64)>> {
        let mut out: Vec<Vec<(f64, f64)>> = Vec::new();
        for &(x, y, cmd) in &self.vertices {
            if is_move_to(cmd) {
                out.push(vec![(x, y)]);
            } else if is_vertex(cmd) {
                match out.last_mut() {
                    Some(c) => c.push((x, y)),
                    None => out.push(vec![(x, y)]),
                }
            }
        }
        out.retain(|c| c.len() >= 3);
        out
    }

    /// Replace the path with the given closed contours.
    pub fn set_contours(&mut self, contours: &[Vec<(f64, f64)>]) {
        self.remove_all();
        for c in contours {
            let mut pts = c.iter();
            if let Some(&(x, y)) = pts.next() {
                self.move_to(x, y);
                for &(x, y) in pts {
                    self.line_to(x, y);
                }
                self.close_polygon();
            }
        }
    }

    /// Translate every vertex.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        for v in &mut self.vertices {
            if is_vertex(v.2) {
                v.0 += dx;
                v.1 += dy;
            }
        }
    }

    fn last_xy(&self) -> (f64, f64) {
        self.vertices
            .iter()
            .rev()
            .find(|v| !is_end_poly(v.2))
            .map(|v| (v.0, v.1))
            .unwrap_or((0.0, 0.0))
    }
}

fn curve_steps(len: f64) -> u32 {
    uround(len * 0.25).max(CURVE_MIN_STEPS)
}

impl VertexSource for PathStorage {
    fn rewind(&mut self, _path_id: u32) {
        self.iter = 0;
    }

    fn vertex(&mut self, x: &mut f64, y: &mut f64) -> u32 {
        match self.vertices.get(self.iter) {
            Some(&(vx, vy, cmd)) => {
                self.iter += 1;
                *x = vx;
                *y = vy;
                cmd
            }
            None => PATH_CMD_STOP,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basics::is_stop;

    #[test]
    fn test_iterate_polygon() {
        let mut p = PathStorage::new();
        p.move_to(0.0, 0.0);
        p.line_to(10.0, 0.0);
        p.line_to(10.0, 10.0);
        p.close_polygon();
        assert_eq!(p.total_vertices(), 4);

        p.rewind(0);
        let (mut x, mut y) = (0.0, 0.0);
        assert_eq!(p.vertex(&mut x, &mut y), PATH_CMD_MOVE_TO);
        assert_eq!(p.vertex(&mut x, &mut y), PATH_CMD_LINE_TO);
        assert_eq!(p.vertex(&mut x, &mut y), PATH_CMD_LINE_TO);
        assert!(is_end_poly(p.vertex(&mut x, &mut y)));
        assert!(is_stop(p.vertex(&mut x, &mut y)));
    }

    #[test]
    fn test_close_polygon_twice_adds_one_end() {
        let mut p = PathStorage::new();
        p.move_to(0.0, 0.0);
        p.line_to(1.0, 0.0);
        p.close_polygon();
        p.close_polygon();
        assert_eq!(p.total_vertices(), 3);
    }

    #[test]
    fn test_curve3_ends_at_target_and_stays_in_hull() {
        let mut p = PathStorage::new();
        p.move_to(0.0, 0.0);
        p.curve3(50.0, 100.0, 100.0, 0.0);
        let c = &p.contours()[0];
        let last = c[c.len() - 1];
        assert!((last.0 - 100.0).abs() < 1e-9 && last.1.abs() < 1e-9);
        // Apex of this parabola is at y = 50.
        let max_y = c.iter().map(|v| v.1).fold(f64::MIN, f64::max);
        assert!(max_y <= 50.0 + 1e-9);
        assert!(max_y > 45.0);
    }

    #[test]
    fn test_curve4_ends_at_target() {
        let mut p = PathStorage::new();
        p.move_to(0.0, 0.0);
        p.curve4(0.0, 50.0, 50.0, 50.0, 50.0, 0.0);
        let c = &p.contours()[0];
        assert!(c.len() > CURVE_MIN_STEPS as usize);
        let last = c[c.len() - 1];
        assert!((last.0 - 50.0).abs() < 1e-9 && last.1.abs() < 1e-9);
    }

    #[test]
    fn test_contours_round_trip_and_translate() {
        let mut p = PathStorage::new();
        p.move_to(0.0, 0.0);
        p.line_to(4.0, 0.0);
        p.line_to(4.0, 4.0);
        p.close_polygon();
        p.move_to(1.0, 1.0);
        p.line_to(2.0, 1.0);
        p.close_polygon();

        // The degenerate second contour is dropped.
        let contours = p.contours();
        assert_eq!(contours.len(), 1);

        let mut q = PathStorage::new();
        q.set_contours(&contours);
        q.translate(10.0, 20.0);
        assert_eq!(q.contours()[0][2], (14.0, 24.0));
    }
}
