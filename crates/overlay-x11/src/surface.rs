//! Off-screen cairo buffers and their upload to the overlay window

use cairo::{Context, Format, ImageSurface, Operator};
use overlay_core::{BackendError, BufferId, Color, DrawingSurface, FontId, Rect, WindowId};
use tracing::warn;
use x11rb::connection::RequestConnection;
use x11rb::protocol::xproto::{ConnectionExt as _, Gcontext, ImageFormat};
use x11rb::rust_connection::RustConnection;

use crate::error::X11Error;
use crate::platform::X11Platform;

/// Bytes of a PutImage request that are not pixel data
const PUT_IMAGE_HEADER: usize = 24;

/// ARGB32 image surface plus its drawing context.
///
/// Fields drop in declaration order, so the context goes first.
pub(crate) struct Buffer {
    context: Context,
    surface: ImageSurface,
    width: u32,
    height: u32,
}

impl Buffer {
    fn new(width: u32, height: u32) -> Result<Self, X11Error> {
        let surface = ImageSurface::create(Format::ARgb32, width as i32, height as i32)?;
        let context = Context::new(&surface)?;
        Ok(Self {
            context,
            surface,
            width,
            height,
        })
    }

    fn clear(&self) -> Result<(), X11Error> {
        self.context.save()?;
        self.context.set_operator(Operator::Clear);
        self.context.paint()?;
        self.context.restore()?;
        Ok(())
    }

    fn fill(&self, rect: Rect, color: Color) -> Result<(), X11Error> {
        self.context.set_source_rgba(color.r, color.g, color.b, color.a);
        self.context.rectangle(
            f64::from(rect.x),
            f64::from(rect.y),
            f64::from(rect.width),
            f64::from(rect.height),
        );
        self.context.fill()?;
        Ok(())
    }
}

impl X11Platform {
    fn draw_glyphs(
        &mut self,
        buffer: BufferId,
        font: FontId,
        x: i32,
        baseline: i32,
        text: &str,
        color: Color,
    ) -> Result<(), X11Error> {
        let target = self.buffers.get(&buffer).ok_or(X11Error::UnknownHandle {
            kind: "buffer",
            id: buffer.0,
        })?;
        target.context.set_source_rgba(color.r, color.g, color.b, color.a);

        let mut pen = x as f32;
        for ch in text.chars() {
            let Some(glyph) = self.fonts.glyph(font, ch) else {
                continue;
            };
            if let Some(mask) = &glyph.mask {
                let left = (pen.round() as i32 + glyph.left) as f64;
                let top = (baseline + glyph.top) as f64;
                target.context.mask_surface(mask, left, top)?;
            }
            pen += glyph.advance;
        }
        Ok(())
    }

    fn upload(&self, buffer: BufferId, window: WindowId) -> Result<(), X11Error> {
        let source = self.buffers.get(&buffer).ok_or(X11Error::UnknownHandle {
            kind: "buffer",
            id: buffer.0,
        })?;
        let gc = self
            .windows
            .get(&window)
            .ok_or(X11Error::UnknownHandle {
                kind: "window",
                id: window.0,
            })?
            .gc;

        source.surface.flush();
        let stride = source.surface.stride() as usize;
        let max_request = self.conn.maximum_request_bytes();

        let mut result = Ok(());
        source.surface.with_data(|data| {
            result = put_bands(&self.conn, window, gc, source.width, source.height, stride, max_request, data);
        })?;
        result
    }
}

impl DrawingSurface for X11Platform {
    fn create_buffer(&mut self, window: WindowId, width: u32, height: u32) -> Result<BufferId, BackendError> {
        if !self.windows.contains_key(&window) {
            return Err(X11Error::UnknownHandle {
                kind: "window",
                id: window.0,
            }
            .into());
        }
        let buffer = Buffer::new(width, height)?;
        let id = BufferId(self.next_buffer);
        self.next_buffer += 1;
        self.buffers.insert(id, buffer);
        Ok(id)
    }

    fn destroy_buffer(&mut self, buffer: BufferId) {
        if self.buffers.remove(&buffer).is_none() {
            warn!("Destroying unknown buffer {:?}", buffer);
        }
    }

    fn clear_buffer(&mut self, buffer: BufferId) {
        if let Some(target) = self.buffers.get(&buffer) {
            if let Err(e) = target.clear() {
                warn!("Failed to clear buffer {:?}: {}", buffer, e);
            }
        }
    }

    fn fill_rect(&mut self, buffer: BufferId, rect: Rect, color: Color) {
        if let Some(target) = self.buffers.get(&buffer) {
            if let Err(e) = target.fill(rect, color) {
                warn!("Failed to fill rectangle: {}", e);
            }
        }
    }

    fn draw_text(&mut self, buffer: BufferId, font: FontId, x: i32, baseline: i32, text: &str, color: Color) {
        if let Err(e) = self.draw_glyphs(buffer, font, x, baseline, text, color) {
            warn!("Failed to draw text: {}", e);
        }
    }

    fn present(&mut self, buffer: BufferId, window: WindowId) -> Result<(), BackendError> {
        Ok(self.upload(buffer, window)?)
    }
}

/// Row bands `(first_row, rows)` whose pixel data fits one request
fn row_bands(height: u32, stride: usize, max_request: usize) -> impl Iterator<Item = (u32, u32)> {
    let per_band = (max_request.saturating_sub(PUT_IMAGE_HEADER) / stride.max(1)).max(1) as u32;
    (0..height)
        .step_by(per_band as usize)
        .map(move |row| (row, per_band.min(height - row)))
}

#[allow(clippy::too_many_arguments)]
fn put_bands(
    conn: &RustConnection,
    window: WindowId,
    gc: Gcontext,
    width: u32,
    height: u32,
    stride: usize,
    max_request: usize,
    data: &[u8],
) -> Result<(), X11Error> {
    for (row, rows) in row_bands(height, stride, max_request) {
        let start = row as usize * stride;
        let end = start + rows as usize * stride;
        conn.put_image(
            ImageFormat::Z_PIXMAP,
            window.0,
            gc,
            width.min(u32::from(u16::MAX)) as u16,
            rows as u16,
            0,
            row.min(i16::MAX as u32) as i16,
            0,
            32,
            &data[start..end],
        )?;
    }
    Ok(())
}
