//! Decoded video frames handed from GStreamer streaming threads to the UI

use std::sync::Mutex;

use anyhow::Context;
use image::RgbaImage;

/// A single RGBA video frame
#[derive(Clone, Debug)]
pub struct VideoFrame {
    pub rgba: RgbaImage,
}

impl VideoFrame {
    /// Wrap tightly packed RGBA bytes; `None` if the buffer size doesn't match
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        RgbaImage::from_raw(width, height, data).map(|rgba| Self { rgba })
    }

    /// Copy an RGBA sample out of an app sink, dropping row padding
    pub fn from_sample(sample: &gstreamer::Sample) -> anyhow::Result<Self> {
        let buffer = sample.buffer().context("sample missing buffer")?;
        let caps = sample.caps().context("sample missing caps")?;
        let info = gstreamer_video::VideoInfo::from_caps(caps).context("parse caps as video info")?;

        let map = buffer.map_readable().context("map frame buffer")?;
        let pixels = pack_rows(map.as_slice(), info.width(), info.height(), info.stride()[0])?;

        Self::from_rgba(info.width(), info.height(), pixels).context("frame size does not match caps")
    }

    /// Horizontally flipped copy, for selfie-style previews
    pub fn mirrored(&self) -> Self {
        Self {
            rgba: image::imageops::flip_horizontal(&self.rgba),
        }
    }

    /// Display handle for the image widget
    pub fn handle(&self) -> cosmic::widget::image::Handle {
        cosmic::widget::image::Handle::from_rgba(
            self.rgba.width(),
            self.rgba.height(),
            self.rgba.clone().into_vec(),
        )
    }
}

/// Copy `height` rows of RGBA pixels out of a buffer laid out with `stride`
fn pack_rows(data: &[u8], width: u32, height: u32, stride: i32) -> anyhow::Result<Vec<u8>> {
    let stride = usize::try_from(stride).context("negative row stride")?;
    let row_bytes = width as usize * 4;
    let height = height as usize;
    let total = row_bytes.checked_mul(height).context("frame too large")?;

    if stride == row_bytes {
        return Ok(data.get(..total).context("frame buffer is truncated")?.to_vec());
    }
    if stride < row_bytes {
        anyhow::bail!("row stride {stride} shorter than {row_bytes} bytes");
    }

    let mut pixels = Vec::with_capacity(total);
    for row in 0..height {
        let start = row.checked_mul(stride).context("frame row offset overflows")?;
        let row = start
            .checked_add(row_bytes)
            .and_then(|end| data.get(start..end))
            .context("frame row is out of bounds")?;
        pixels.extend_from_slice(row);
    }
    Ok(pixels)
}

/// Latest-frame mailbox shared between a streaming thread and the UI
#[derive(Debug, Default)]
pub struct FrameSlot(Mutex<Option<VideoFrame>>);

impl FrameSlot {
    pub fn store(&self, frame: VideoFrame) {
        if let Ok(mut slot) = self.0.lock() {
            *slot = Some(frame);
        }
    }

    /// Take the newest frame, if one arrived since the last call
    pub fn take(&self) -> Option<VideoFrame> {
        self.0.lock().ok().and_then(|mut slot| slot.take())
    }

    pub fn clear(&self) {
        if let Ok(mut slot) = self.0.lock() {
            *slot = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rgba_checks_size() {
        assert!(VideoFrame::from_rgba(2, 2, vec![0; 16]).is_some());
        assert!(VideoFrame::from_rgba(2, 2, vec![0; 15]).is_none());
    }

    #[test]
    fn test_pack_rows_drops_padding() {
        // 1x2 frame, each row padded to 8 bytes
        let data = [1, 2, 3, 4, 0, 0, 0, 0, 5, 6, 7, 8, 0, 0, 0, 0];
        let pixels = pack_rows(&data, 1, 2, 8).unwrap();
        assert_eq!(pixels, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_pack_rows_rejects_bad_stride() {
        let data = [0u8; 16];
        assert!(pack_rows(&data, 1, 2, -8).is_err());
        assert!(pack_rows(&data, 2, 2, 4).is_err());
        assert!(pack_rows(&data, 1, 4, 8).is_err());
    }

    #[test]
    fn test_mirrored_flips_columns() {
        let mut data = vec![0u8; 2 * 1 * 4];
        data[0..4].copy_from_slice(&[255, 0, 0, 255]);
        data[4..8].copy_from_slice(&[0, 0, 255, 255]);
        let frame = VideoFrame::from_rgba(2, 1, data).unwrap();

        let mirrored = frame.mirrored();
        assert_eq!(mirrored.rgba.get_pixel(0, 0).0, [0, 0, 255, 255]);
        assert_eq!(mirrored.rgba.get_pixel(1, 0).0, [255, 0, 0, 255]);
        assert_eq!(mirrored.rgba.dimensions(), (2, 1));
    }

    #[test]
    fn test_slot_take_empties() {
        let slot = FrameSlot::default();
        assert!(slot.take().is_none());

        slot.store(VideoFrame::from_rgba(1, 1, vec![1, 2, 3, 4]).unwrap());
        assert!(slot.take().is_some());
        assert!(slot.take().is_none());
    }
}
