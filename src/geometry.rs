use serde::Serialize;

/// Axis-aligned rectangle in a projected coordinate system.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rectangle {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

impl Rectangle {
    pub const fn new(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    pub fn center(&self) -> (f64, f64) {
        (
            self.xmin + self.width() / 2.0,
            self.ymin + self.height() / 2.0,
        )
    }

    /// Scales width and height by `factor` around the center.
    pub fn scaled(&self, factor: f64) -> Rectangle {
        let (cx, cy) = self.center();
        let half_w = self.width() * factor / 2.0;
        let half_h = self.height() * factor / 2.0;
        Rectangle::new(cx - half_w, cy - half_h, cx + half_w, cy + half_h)
    }
}
