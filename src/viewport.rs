/// A 2D position, either in source-frame or viewport pixel space.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub(crate) struct Point {
    pub(crate) x: f32,
    pub(crate) y: f32,
}

impl Point {
    pub(crate) const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub(crate) fn midpoint(self, other: Self) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct Dimensions {
    pub(crate) width: u32,
    pub(crate) height: u32,
}

impl Dimensions {
    pub(crate) const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Uniform scale plus centering translation from source-frame space into
/// viewport space. Pure function of its four inputs; recompute whenever the
/// source or viewport dimensions change.
#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) struct ViewportTransform {
    pub(crate) scale: f32,
    pub(crate) x_offset: f32,
    pub(crate) y_offset: f32,
}

impl ViewportTransform {
    /// Contain (letterbox) fit: the source frame is scaled uniformly until it
    /// is fully inside the viewport, then centered. Returns `None` when the
    /// source has a zero dimension, which callers must treat as a
    /// skip-this-frame condition.
    pub(crate) fn contain(source: Dimensions, viewport: Dimensions) -> Option<Self> {
        if source.width == 0 || source.height == 0 {
            return None;
        }

        let source_width = source.width as f32;
        let source_height = source.height as f32;
        let viewport_width = viewport.width as f32;
        let viewport_height = viewport.height as f32;

        let scale = (viewport_width / source_width).min(viewport_height / source_height);

        Some(Self {
            scale,
            x_offset: (viewport_width - source_width * scale) / 2.0,
            y_offset: (viewport_height - source_height * scale) / 2.0,
        })
    }

    pub(crate) fn map(&self, point: Point) -> Point {
        Point {
            x: point.x * self.scale + self.x_offset,
            y: point.y * self.scale + self.y_offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Dimensions, Point, ViewportTransform};
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn wide_viewport_is_limited_by_height() {
        let transform = ViewportTransform::contain(
            Dimensions::new(640, 480),
            Dimensions::new(1280, 480),
        )
        .unwrap();
        assert_approx_eq!(transform.scale, 1.0);
        assert_approx_eq!(transform.x_offset, 320.0);
        assert_approx_eq!(transform.y_offset, 0.0);
    }

    #[test]
    fn tall_viewport_is_limited_by_width() {
        let transform = ViewportTransform::contain(
            Dimensions::new(640, 480),
            Dimensions::new(640, 960),
        )
        .unwrap();
        assert_approx_eq!(transform.scale, 1.0);
        assert_approx_eq!(transform.x_offset, 0.0);
        assert_approx_eq!(transform.y_offset, 240.0);
    }

    #[test]
    fn scaled_rectangle_preserves_aspect_ratio_and_is_centered() {
        let cases = [
            (640u32, 480u32, 1920u32, 1080u32),
            (1280, 720, 640, 480),
            (320, 240, 320, 240),
            (1920, 1080, 100, 900),
        ];
        for &(sw, sh, vw, vh) in cases.iter() {
            let transform =
                ViewportTransform::contain(Dimensions::new(sw, sh), Dimensions::new(vw, vh))
                    .unwrap();
            let scaled_width = sw as f32 * transform.scale;
            let scaled_height = sh as f32 * transform.scale;
            assert_approx_eq!(
                scaled_width / scaled_height,
                sw as f32 / sh as f32,
                1e-4
            );
            assert_approx_eq!(transform.x_offset, (vw as f32 - scaled_width) / 2.0);
            assert_approx_eq!(transform.y_offset, (vh as f32 - scaled_height) / 2.0);
            // contain: the scaled frame never spills out of the viewport
            assert!(scaled_width <= vw as f32 + 1e-3);
            assert!(scaled_height <= vh as f32 + 1e-3);
        }
    }

    #[test]
    fn degenerate_source_dimensions_yield_no_transform() {
        let viewport = Dimensions::new(1280, 720);
        assert!(ViewportTransform::contain(Dimensions::new(0, 480), viewport).is_none());
        assert!(ViewportTransform::contain(Dimensions::new(640, 0), viewport).is_none());
    }

    #[test]
    fn mapping_applies_scale_then_offset() {
        let transform = ViewportTransform {
            scale: 2.0,
            x_offset: 10.0,
            y_offset: -5.0,
        };
        let mapped = transform.map(Point::new(100.0, 50.0));
        assert_approx_eq!(mapped.x, 210.0);
        assert_approx_eq!(mapped.y, 95.0);
    }

    #[test]
    fn midpoint_is_symmetric() {
        let mid = Point::new(0.0, 10.0).midpoint(Point::new(4.0, 2.0));
        assert_approx_eq!(mid.x, 2.0);
        assert_approx_eq!(mid.y, 6.0);
    }
}
