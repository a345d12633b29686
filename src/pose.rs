use crate::{error::Error, viewport::Point};
use num_traits::FromPrimitive;
use ordered_float::NotNan;

#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Hash, num_derive::FromPrimitive, num_derive::ToPrimitive,
)]
pub(crate) enum JointName {
    Nose,
    LeftEye,
    RightEye,
    LeftEar,
    RightEar,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

pub(crate) const NUM_JOINTS: usize = JointName::ALL.len();

impl JointName {
    pub(crate) const ALL: [JointName; 17] = {
        use JointName::*;
        [
            Nose,
            LeftEye,
            RightEye,
            LeftEar,
            RightEar,
            LeftShoulder,
            RightShoulder,
            LeftElbow,
            RightElbow,
            LeftWrist,
            RightWrist,
            LeftHip,
            RightHip,
            LeftKnee,
            RightKnee,
            LeftAnkle,
            RightAnkle,
        ]
    };

    pub(crate) const fn idx(self) -> usize {
        self as usize
    }

    /// Map a raw estimator keypoint index back to a name.
    pub(crate) fn from_index(index: usize) -> Option<Self> {
        Self::from_usize(index)
    }

    pub(crate) const fn group(self) -> JointGroup {
        use JointName::*;
        match self {
            Nose | LeftEye | RightEye | LeftEar | RightEar => JointGroup::Face,
            LeftShoulder | RightShoulder | LeftHip | RightHip => JointGroup::Torso,
            LeftElbow | RightElbow | LeftWrist | RightWrist | LeftKnee | RightKnee | LeftAnkle
            | RightAnkle => JointGroup::Limb,
        }
    }
}

/// Semantic grouping used to pick marker fill colors.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum JointGroup {
    Face,
    Torso,
    Limb,
}

impl JointGroup {
    pub(crate) const fn marker_color(self) -> Color {
        match self {
            JointGroup::Face => constants::GREEN,
            JointGroup::Torso => constants::RED,
            JointGroup::Limb => constants::YELLOW,
        }
    }
}

pub(crate) type Color = (u8, u8, u8);

/// One estimated body landmark in source-frame pixel space.
#[derive(Debug, Copy, Clone)]
pub(crate) struct Joint {
    pub(crate) name: JointName,
    pub(crate) point: Point,
    pub(crate) confidence: f32,
}

impl Joint {
    pub(crate) fn new(name: JointName, point: Point, confidence: f32) -> Result<Self, Error> {
        let confidence = NotNan::new(confidence)
            .map_err(|e| Error::ConstructNotNan(e, confidence))?
            .into_inner();
        if !(0.0..=1.0).contains(&confidence) {
            return Err(Error::ConfidenceOutOfRange(confidence));
        }
        Ok(Self {
            name,
            point,
            confidence,
        })
    }

    pub(crate) fn is_visible(self) -> bool {
        self.confidence > constants::MIN_CONFIDENCE
    }
}

/// All joints estimated for one subject in one frame. Slots are indexed by
/// `JointName`, so a pose can never hold two joints with the same name.
#[derive(Debug, Copy, Clone, Default)]
pub(crate) struct Pose {
    joints: [Option<Joint>; NUM_JOINTS],
}

impl Pose {
    pub(crate) fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn from_joints<I>(joints: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = Joint>,
    {
        let mut pose = Self::empty();
        for joint in joints {
            let slot = &mut pose.joints[joint.name.idx()];
            if slot.is_some() {
                return Err(Error::DuplicateJoint(joint.name));
            }
            *slot = Some(joint);
        }
        Ok(pose)
    }

    pub(crate) fn get(&self, name: JointName) -> Option<Joint> {
        self.joints[name.idx()]
    }

    /// The joint, but only if its confidence clears `MIN_CONFIDENCE`.
    pub(crate) fn visible(&self, name: JointName) -> Option<Joint> {
        self.get(name).filter(|joint| joint.is_visible())
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = Joint> + '_ {
        self.joints.iter().filter_map(|slot| *slot)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.joints.iter().all(Option::is_none)
    }
}

/// A static skeleton edge: a 2- or 3-point polyline through named joints.
#[derive(Debug, Copy, Clone)]
pub(crate) struct SkeletonEdge {
    pub(crate) joints: &'static [JointName],
    pub(crate) weight: f32,
}

pub(crate) mod constants {
    use super::{
        Color,
        JointName::{self, *},
        SkeletonEdge,
    };

    pub(crate) const MIN_CONFIDENCE: f32 = 0.4;

    pub(crate) const STROKE_WEIGHT: f32 = 8.0;
    pub(crate) const FACE_STROKE_WEIGHT: f32 = STROKE_WEIGHT / 2.0;
    pub(crate) const MARKER_RADIUS: f32 = 6.0;

    pub(crate) const WHITE: Color = (255, 255, 255);
    pub(crate) const GREEN: Color = (0, 255, 0);
    pub(crate) const YELLOW: Color = (255, 255, 0);
    pub(crate) const RED: Color = (255, 0, 0);

    pub(crate) const STROKE_COLOR: Color = WHITE;

    /// Torso joints bounding the derived spine segment (mid-hips to
    /// mid-shoulders); the renderer paints it below everything else.
    pub(crate) const SPINE_JOINTS: [JointName; 4] =
        [LeftShoulder, RightShoulder, LeftHip, RightHip];

    /// Fixed connectivity, in paint order: torso, then limbs, then face.
    /// Markers are layered on top of all edges.
    pub(crate) const EDGE_LIST: [SkeletonEdge; 8] = [
        SkeletonEdge {
            joints: &[LeftShoulder, RightShoulder],
            weight: STROKE_WEIGHT,
        },
        SkeletonEdge {
            joints: &[LeftHip, RightHip],
            weight: STROKE_WEIGHT,
        },
        SkeletonEdge {
            joints: &[LeftWrist, LeftElbow, LeftShoulder],
            weight: STROKE_WEIGHT,
        },
        SkeletonEdge {
            joints: &[RightWrist, RightElbow, RightShoulder],
            weight: STROKE_WEIGHT,
        },
        SkeletonEdge {
            joints: &[LeftHip, LeftKnee, LeftAnkle],
            weight: STROKE_WEIGHT,
        },
        SkeletonEdge {
            joints: &[RightHip, RightKnee, RightAnkle],
            weight: STROKE_WEIGHT,
        },
        SkeletonEdge {
            joints: &[LeftEar, Nose, RightEar],
            weight: FACE_STROKE_WEIGHT,
        },
        SkeletonEdge {
            joints: &[LeftEye, Nose, RightEye],
            weight: FACE_STROKE_WEIGHT,
        },
    ];
}

#[cfg(test)]
mod tests {
    use super::{constants, Joint, JointGroup, JointName, Pose, NUM_JOINTS};
    use crate::viewport::Point;

    fn joint(name: JointName, confidence: f32) -> Joint {
        Joint::new(name, Point::new(1.0, 2.0), confidence).unwrap()
    }

    #[test]
    fn all_names_round_trip_through_indices() {
        for (index, &name) in JointName::ALL.iter().enumerate() {
            assert_eq!(name.idx(), index);
            assert_eq!(JointName::from_index(index), Some(name));
        }
        assert_eq!(JointName::from_index(NUM_JOINTS), None);
    }

    #[test]
    fn visibility_is_a_strict_threshold() {
        assert!(!joint(JointName::Nose, constants::MIN_CONFIDENCE).is_visible());
        assert!(joint(JointName::Nose, constants::MIN_CONFIDENCE + 0.01).is_visible());
        assert!(!joint(JointName::Nose, 0.0).is_visible());
        assert!(joint(JointName::Nose, 1.0).is_visible());
    }

    #[test]
    fn confidence_is_validated_at_construction() {
        assert!(Joint::new(JointName::Nose, Point::new(0.0, 0.0), f32::NAN).is_err());
        assert!(Joint::new(JointName::Nose, Point::new(0.0, 0.0), -0.1).is_err());
        assert!(Joint::new(JointName::Nose, Point::new(0.0, 0.0), 1.5).is_err());
    }

    #[test]
    fn pose_rejects_duplicate_joints() {
        let result = Pose::from_joints(vec![
            joint(JointName::Nose, 0.9),
            joint(JointName::Nose, 0.8),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn pose_lookup_and_visibility() {
        let pose = Pose::from_joints(vec![
            joint(JointName::Nose, 0.9),
            joint(JointName::LeftHip, 0.1),
        ])
        .unwrap();

        assert!(pose.get(JointName::Nose).is_some());
        assert!(pose.visible(JointName::Nose).is_some());
        assert!(pose.get(JointName::LeftHip).is_some());
        assert!(pose.visible(JointName::LeftHip).is_none());
        assert!(pose.get(JointName::RightAnkle).is_none());
        assert_eq!(pose.iter().count(), 2);
        assert!(!pose.is_empty());
        assert!(Pose::empty().is_empty());
    }

    #[test]
    fn edge_list_is_well_formed() {
        for edge in constants::EDGE_LIST.iter() {
            assert!(edge.joints.len() == 2 || edge.joints.len() == 3);
            assert!(edge.weight > 0.0);
            for (i, a) in edge.joints.iter().enumerate() {
                for b in edge.joints.iter().skip(i + 1) {
                    assert_ne!(a, b);
                }
            }
        }
    }

    #[test]
    fn face_edges_paint_after_torso_and_limbs() {
        let first_face = constants::EDGE_LIST
            .iter()
            .position(|edge| edge.joints.iter().any(|j| j.group() == JointGroup::Face))
            .unwrap();
        for edge in constants::EDGE_LIST.iter().skip(first_face) {
            assert!(edge.joints.iter().any(|j| j.group() == JointGroup::Face));
        }
    }
}
