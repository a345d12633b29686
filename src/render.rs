use crate::{
    error::Error,
    pose::{constants, Color, Pose, SkeletonEdge},
    viewport::{Dimensions, Point, ViewportTransform},
};

/// Drawing backend the renderer paints onto. All operations are synchronous;
/// the renderer never holds a surface across ticks.
pub(crate) trait Surface {
    fn dimensions(&self) -> Dimensions;

    /// Erase the previous frame entirely.
    fn clear(&mut self) -> Result<(), Error>;

    fn stroke_polyline(&mut self, points: &[Point], weight: f32, color: Color)
        -> Result<(), Error>;

    fn fill_circle(&mut self, center: Point, radius: f32, color: Color) -> Result<(), Error>;
}

/// Draw one frame: clear, then the spine segment, the catalog edges, and
/// finally a marker per visible joint so markers stay legible where edges
/// cross. An edge is painted only when every joint it references is present
/// and individually above the confidence threshold. The pose and transform
/// are never mutated, so repeating a call repaints an identical frame.
pub(crate) fn render<S>(
    pose: &Pose,
    transform: &ViewportTransform,
    surface: &mut S,
) -> Result<(), Error>
where
    S: Surface,
{
    surface.clear()?;
    if pose.is_empty() {
        return Ok(());
    }

    draw_spine(pose, transform, surface)?;

    for edge in constants::EDGE_LIST.iter() {
        if let Some((points, len)) = edge_endpoints(edge, pose, transform) {
            surface.stroke_polyline(&points[..len], edge.weight, constants::STROKE_COLOR)?;
        }
    }

    for joint in pose.iter().filter(|joint| joint.is_visible()) {
        surface.fill_circle(
            transform.map(joint.point),
            constants::MARKER_RADIUS,
            joint.name.group().marker_color(),
        )?;
    }

    Ok(())
}

/// Mid-hips to mid-shoulders, drawn only when all four torso joints are
/// visible.
fn draw_spine<S>(pose: &Pose, transform: &ViewportTransform, surface: &mut S) -> Result<(), Error>
where
    S: Surface,
{
    let [left_shoulder, right_shoulder, left_hip, right_hip] = constants::SPINE_JOINTS;
    let torso = (
        pose.visible(left_shoulder),
        pose.visible(right_shoulder),
        pose.visible(left_hip),
        pose.visible(right_hip),
    );
    if let (Some(ls), Some(rs), Some(lh), Some(rh)) = torso {
        let mid_shoulder = transform.map(ls.point.midpoint(rs.point));
        let mid_hip = transform.map(lh.point.midpoint(rh.point));
        surface.stroke_polyline(
            &[mid_hip, mid_shoulder],
            constants::STROKE_WEIGHT,
            constants::STROKE_COLOR,
        )?;
    }
    Ok(())
}

/// Mapped viewport positions for an edge, or `None` when any referenced
/// joint is absent or below the confidence threshold.
fn edge_endpoints(
    edge: &SkeletonEdge,
    pose: &Pose,
    transform: &ViewportTransform,
) -> Option<([Point; 3], usize)> {
    debug_assert!(edge.joints.len() <= 3);
    let mut points = [Point::default(); 3];
    for (slot, &name) in points.iter_mut().zip(edge.joints.iter()) {
        *slot = transform.map(pose.visible(name)?.point);
    }
    Some((points, edge.joints.len()))
}

#[cfg(test)]
pub(crate) mod test_surface {
    use super::Surface;
    use crate::{
        error::Error,
        pose::Color,
        viewport::{Dimensions, Point},
    };

    #[derive(Debug, Clone, PartialEq)]
    pub(crate) enum Op {
        Clear,
        Polyline(Vec<(f32, f32)>, f32, Color),
        Circle((f32, f32), f32, Color),
    }

    /// Records draw calls instead of rasterizing them.
    pub(crate) struct RecordingSurface {
        pub(crate) dimensions: Dimensions,
        pub(crate) ops: Vec<Op>,
    }

    impl RecordingSurface {
        pub(crate) fn new(width: u32, height: u32) -> Self {
            Self {
                dimensions: Dimensions::new(width, height),
                ops: Vec::new(),
            }
        }

        pub(crate) fn polylines(&self) -> Vec<&Op> {
            self.ops
                .iter()
                .filter(|op| matches!(op, Op::Polyline(..)))
                .collect()
        }

        pub(crate) fn circles(&self) -> Vec<&Op> {
            self.ops
                .iter()
                .filter(|op| matches!(op, Op::Circle(..)))
                .collect()
        }
    }

    impl Surface for RecordingSurface {
        fn dimensions(&self) -> Dimensions {
            self.dimensions
        }

        fn clear(&mut self) -> Result<(), Error> {
            self.ops.push(Op::Clear);
            Ok(())
        }

        fn stroke_polyline(
            &mut self,
            points: &[Point],
            weight: f32,
            color: Color,
        ) -> Result<(), Error> {
            self.ops.push(Op::Polyline(
                points.iter().map(|p| (p.x, p.y)).collect(),
                weight,
                color,
            ));
            Ok(())
        }

        fn fill_circle(&mut self, center: Point, radius: f32, color: Color) -> Result<(), Error> {
            self.ops
                .push(Op::Circle((center.x, center.y), radius, color));
            Ok(())
        }
    }
}
