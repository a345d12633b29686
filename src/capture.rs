use crate::{
    controller::FrameSource,
    error::Error,
    pose::Color,
    render::Surface,
    viewport::{Dimensions, Point, ViewportTransform},
};
use num_traits::ToPrimitive;
use opencv::{
    core::{Mat, Point2f, Rect, Scalar, CV_8UC3},
    imgproc::{INTER_LINEAR, LINE_8},
    prelude::*,
    videoio::{VideoCapture, CAP_PROP_FRAME_HEIGHT, CAP_PROP_FRAME_WIDTH, CAP_V4L2},
};

const WINDOW_NAME: &str = "pose overlay";

/// Open a camera and build the canvas it will be overlaid on.
pub(crate) fn open(
    device: i32,
    viewport: Dimensions,
) -> Result<(CameraSource, CanvasSurface), Error> {
    let capture =
        VideoCapture::new(device, CAP_V4L2).map_err(|e| Error::OpenCapture(e, device))?;

    let width = capture
        .get(CAP_PROP_FRAME_WIDTH)
        .map_err(Error::QueryCaptureProp)?;
    let height = capture
        .get(CAP_PROP_FRAME_HEIGHT)
        .map_err(Error::QueryCaptureProp)?;
    let source = Dimensions::new(
        width.to_u32().ok_or(Error::ConvertCaptureDim(width))?,
        height.to_u32().ok_or(Error::ConvertCaptureDim(height))?,
    );

    let surface = CanvasSurface {
        capture,
        frame: Mat::default().map_err(Error::MakeCanvas)?,
        canvas: black_canvas(viewport)?,
        source,
        viewport,
    };

    Ok((CameraSource { dims: source }, surface))
}

/// Camera geometry; v4l2 keeps it constant for the life of the capture.
pub(crate) struct CameraSource {
    pub(crate) dims: Dimensions,
}

impl FrameSource for CameraSource {
    fn dimensions(&mut self) -> Option<Dimensions> {
        if self.dims.width == 0 || self.dims.height == 0 {
            None
        } else {
            Some(self.dims)
        }
    }
}

/// Draws onto a BGR canvas. `clear` grabs the next camera frame and blits it
/// letterboxed, so the skeleton overlays live video.
pub(crate) struct CanvasSurface {
    capture: VideoCapture,
    frame: Mat,
    canvas: Mat,
    source: Dimensions,
    viewport: Dimensions,
}

impl CanvasSurface {
    pub(crate) fn canvas(&self) -> &Mat {
        &self.canvas
    }
}

impl Surface for CanvasSurface {
    fn dimensions(&self) -> Dimensions {
        self.viewport
    }

    fn clear(&mut self) -> Result<(), Error> {
        if !self
            .capture
            .read(&mut self.frame)
            .map_err(Error::ReadFrame)?
        {
            return Err(Error::ReadFrameReturnedFalse);
        }

        self.canvas = black_canvas(self.viewport)?;

        // blit the frame through the same letterbox transform the skeleton
        // uses so the overlay lines up with the video
        if let Some(transform) = ViewportTransform::contain(self.source, self.viewport) {
            let rect = Rect::new(
                transform.x_offset.round() as i32,
                transform.y_offset.round() as i32,
                (self.source.width as f32 * transform.scale).round() as i32,
                (self.source.height as f32 * transform.scale).round() as i32,
            );
            let mut roi = Mat::roi(&self.canvas, rect).map_err(Error::CanvasRoi)?;
            opencv::imgproc::resize(&self.frame, &mut roi, rect.size(), 0.0, 0.0, INTER_LINEAR)
                .map_err(Error::ResizeFrame)?;
        }

        Ok(())
    }

    fn stroke_polyline(
        &mut self,
        points: &[Point],
        weight: f32,
        color: Color,
    ) -> Result<(), Error> {
        let thickness = weight.round().max(1.0) as i32;
        for pair in points.windows(2) {
            opencv::imgproc::line(
                &mut self.canvas,
                to_point2i(pair[0])?,
                to_point2i(pair[1])?,
                bgr(color),
                thickness,
                LINE_8,
                0, // shift
            )
            .map_err(Error::DrawLine)?;
        }
        Ok(())
    }

    fn fill_circle(&mut self, center: Point, radius: f32, color: Color) -> Result<(), Error> {
        opencv::imgproc::circle(
            &mut self.canvas,
            to_point2i(center)?,
            radius.round().max(1.0) as i32,
            bgr(color),
            opencv::imgproc::FILLED,
            LINE_8,
            0, // shift
        )
        .map_err(Error::DrawCircle)
    }
}

pub(crate) fn show(surface: &CanvasSurface) -> Result<(), Error> {
    opencv::highgui::imshow(WINDOW_NAME, surface.canvas()).map_err(Error::ImShow)
}

/// Display-refresh stand-in: present for `delay_ms` and report whether the
/// user has pressed `q`.
pub(crate) fn wait_refresh(delay_ms: i32) -> Result<bool, Error> {
    const Q_KEY: u8 = b'q';
    Ok(opencv::highgui::wait_key(delay_ms).map_err(Error::WaitKey)? != i32::from(Q_KEY))
}

fn black_canvas(viewport: Dimensions) -> Result<Mat, Error> {
    Mat::zeros(viewport.height as i32, viewport.width as i32, CV_8UC3)
        .map_err(Error::MakeCanvas)?
        .to_mat()
        .map_err(Error::MakeCanvas)
}

fn bgr((r, g, b): Color) -> Scalar {
    Scalar::from((f64::from(b), f64::from(g), f64::from(r)))
}

fn to_point2i(point: Point) -> Result<opencv::core::Point2i, Error> {
    let point = Point2f::new(point.x, point.y);
    point.to().ok_or(Error::ConvertPoint2fToPoint2i(point))
}
