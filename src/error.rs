#[derive(Debug, thiserror::Error)]
pub(crate) enum Error {
    #[error("failed to construct NotNan from f32: {1}")]
    ConstructNotNan(#[source] ordered_float::FloatIsNan, f32),

    #[error("joint confidence {0} is outside [0, 1]")]
    ConfidenceOutOfRange(f32),

    #[error("pose already contains a joint named {0:?}")]
    DuplicateJoint(crate::pose::JointName),

    #[error("pose estimate failed: {0}")]
    Estimate(String),

    #[cfg(feature = "gui")]
    #[error("failed to open video capture device {1}")]
    OpenCapture(#[source] opencv::Error, i32),

    #[cfg(feature = "gui")]
    #[error("failed to query video capture property")]
    QueryCaptureProp(#[source] opencv::Error),

    #[cfg(feature = "gui")]
    #[error("failed to convert capture dimension to u32: {0}")]
    ConvertCaptureDim(f64),

    #[cfg(feature = "gui")]
    #[error("failed reading frame")]
    ReadFrame(#[source] opencv::Error),

    #[cfg(feature = "gui")]
    #[error("reading frame returned false")]
    ReadFrameReturnedFalse,

    #[cfg(feature = "gui")]
    #[error("failed to construct canvas Mat")]
    MakeCanvas(#[source] opencv::Error),

    #[cfg(feature = "gui")]
    #[error("failed to clear canvas")]
    ClearCanvas(#[source] opencv::Error),

    #[cfg(feature = "gui")]
    #[error("failed to take canvas region of interest")]
    CanvasRoi(#[source] opencv::Error),

    #[cfg(feature = "gui")]
    #[error("failed to resize frame onto canvas")]
    ResizeFrame(#[source] opencv::Error),

    #[cfg(feature = "gui")]
    #[error("failed to draw line")]
    DrawLine(#[source] opencv::Error),

    #[cfg(feature = "gui")]
    #[error("failed to draw circle")]
    DrawCircle(#[source] opencv::Error),

    #[cfg(feature = "gui")]
    #[error("failed to convert Point2f {0:?} to Point2i")]
    ConvertPoint2fToPoint2i(opencv::core::Point2f),

    #[cfg(feature = "gui")]
    #[error("failed to show image")]
    ImShow(#[source] opencv::Error),

    #[cfg(feature = "gui")]
    #[error("failed to wait for key press")]
    WaitKey(#[source] opencv::Error),
}
