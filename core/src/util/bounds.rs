use geo::{coord, Rect};

/// Trait to grow rectangles point by point
///
/// # Examples
///
/// ```rust
/// use geo::{coord, Rect};
/// use geoview_core::util::bounds::ExtendRect;
///
/// let mut bb = Rect::new(
///     coord! { x: -100.0, y: 40.0 },
///     coord! { x: -100.0, y: 40.0 }
/// );
///
/// bb.extend_point(-102.0, 42.0);
/// assert_eq!(bb.min().x, -102.0);
/// assert_eq!(bb.min().y, 40.0);
/// assert_eq!(bb.max().x, -100.0);
/// assert_eq!(bb.max().y, 42.0);
/// ```
pub trait ExtendRect {
    /// Extends the rectangle so it overlaps the given point
    fn extend_point(&mut self, x: f64, y: f64);
}

impl ExtendRect for Rect {
    fn extend_point(&mut self, x: f64, y: f64) {
        let min = self.min();
        self.set_min((min.x.min(x), min.y.min(y)));
        let max = self.max();
        self.set_max((max.x.max(x), max.y.max(y)));
    }
}

/// Collects points and yields the rectangle spanning all of them, or
/// [`None`] if no point was added
#[derive(Debug, Default, Copy, Clone)]
pub struct BoundsBuilder {
    rect: Option<Rect>,
}

impl BoundsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_point(&mut self, x: f64, y: f64) {
        match &mut self.rect {
            Some(rect) => rect.extend_point(x, y),
            None => {
                let c = coord! { x: x, y: y };
                self.rect = Some(Rect::new(c, c));
            }
        }
    }

    pub fn build(self) -> Option<Rect> {
        self.rect
    }
}
