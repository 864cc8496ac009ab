//! Streams uncompressed 8-bit and 24-bit bitmaps onto a [`svga_draw::PixelSurface`].
//!
//! Validation happens before anything visible changes: a file with the wrong bit depth,
//! compression or width is rejected without touching the DAC or the framebuffer. Failures
//! after that point (a truncated palette or pixel row) leave whatever was already drawn.

use std::fs::File;
use std::io::{self, BufReader, Read, Seek};
use std::path::Path;

use svga_draw::{pack_rgb565, IndexedSurface, Rgb565Surface};
use svga_vbe::{to_dac6, DisplayControl, Viewport, VideoWindow};
use tracing::{debug, trace, warn};

use crate::error::{BmpError, Result};
use crate::header::{
    self, padded_stride, BIT_COUNT_OFFSET, COLORS_USED_OFFSET, COMPRESSION_NONE,
    COMPRESSION_OFFSET, HEADER_LEN, PALETTE_ENTRY_LEN, WIDTH_OFFSET,
};
use crate::io::{ReadLeExt, SeekExt};

const MAX_PALETTE_ENTRIES: u64 = 256;

/// Where a load was when it stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStage {
    Open,
    ValidateHeader,
    ReadGeometry,
    ReadPalette,
    ProgramPalette,
    StreamRows,
    Close,
}

/// What was drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BmpInfo {
    pub width: u32,
    pub height: u32,
    pub bit_count: u16,
    /// DAC entries programmed; always 0 for 24-bit images.
    pub palette_entries: u32,
    pub top_down: bool,
}

#[derive(Debug, Clone, Copy)]
struct Geometry {
    width: usize,
    rows: u32,
    stride: usize,
    bottom_up: bool,
}

impl Geometry {
    /// Row index counted from the top of the image for the `stored`-th row in the file.
    #[inline]
    fn row_from_top(&self, stored: u32) -> u32 {
        if self.bottom_up {
            self.rows - 1 - stored
        } else {
            stored
        }
    }
}

/// Draws an 8-bit palettized bitmap with its top-left corner at `(x, y)` and loads its palette
/// into the DAC starting at index 0.
pub fn draw_bmp_indexed8<W, D, P>(
    surface: &mut IndexedSurface<W>,
    display: &mut D,
    x: i32,
    y: i32,
    path: P,
) -> Result<BmpInfo>
where
    W: VideoWindow,
    D: DisplayControl + ?Sized,
    P: AsRef<Path>,
{
    let mut reader = open(path.as_ref())?;
    draw_bmp_indexed8_from_reader(surface, display, x, y, &mut reader)
}

pub fn draw_bmp_indexed8_from_reader<W, D, R>(
    surface: &mut IndexedSurface<W>,
    display: &mut D,
    x: i32,
    y: i32,
    reader: &mut R,
) -> Result<BmpInfo>
where
    W: VideoWindow,
    D: DisplayControl + ?Sized,
    R: Read + Seek + ?Sized,
{
    let mut decoder = Decoder::new(reader);
    let result = decoder.indexed8(surface, display, x, y);
    decoder.finish(result)
}

/// Draws a 24-bit bitmap with its top-left corner at `(x, y)`, converting each pixel to RGB565.
pub fn draw_bmp_packed565<W, P>(
    surface: &mut Rgb565Surface<W>,
    x: i32,
    y: i32,
    path: P,
) -> Result<BmpInfo>
where
    W: VideoWindow,
    P: AsRef<Path>,
{
    let mut reader = open(path.as_ref())?;
    draw_bmp_packed565_from_reader(surface, x, y, &mut reader)
}

pub fn draw_bmp_packed565_from_reader<W, R>(
    surface: &mut Rgb565Surface<W>,
    x: i32,
    y: i32,
    reader: &mut R,
) -> Result<BmpInfo>
where
    W: VideoWindow,
    R: Read + Seek + ?Sized,
{
    let mut decoder = Decoder::new(reader);
    let result = decoder.packed565(surface, x, y);
    decoder.finish(result)
}

fn open(path: &Path) -> Result<BufReader<File>> {
    match File::open(path) {
        Ok(file) => Ok(BufReader::new(file)),
        Err(source) => {
            warn!(path = %path.display(), error = %source, "failed to open bitmap");
            Err(BmpError::Open {
                path: path.to_path_buf(),
                source,
            })
        }
    }
}

struct Decoder<'r, R: ?Sized> {
    reader: &'r mut R,
    stage: LoadStage,
}

impl<'r, R: Read + Seek + ?Sized> Decoder<'r, R> {
    fn new(reader: &'r mut R) -> Self {
        Self {
            reader,
            stage: LoadStage::Open,
        }
    }

    fn enter(&mut self, stage: LoadStage) {
        trace!(?stage, "bitmap load stage");
        self.stage = stage;
    }

    fn finish(&mut self, result: Result<BmpInfo>) -> Result<BmpInfo> {
        match &result {
            Ok(info) => {
                self.enter(LoadStage::Close);
                debug!(
                    width = info.width,
                    height = info.height,
                    bits = info.bit_count,
                    "bitmap drawn"
                );
            }
            Err(err) => warn!(stage = ?self.stage, error = %err, "bitmap load failed"),
        }
        result
    }

    fn indexed8<W, D>(
        &mut self,
        surface: &mut IndexedSurface<W>,
        display: &mut D,
        x: i32,
        y: i32,
    ) -> Result<BmpInfo>
    where
        W: VideoWindow,
        D: DisplayControl + ?Sized,
    {
        self.check_format(8)?;
        let geometry = self.read_geometry(1, surface.viewport())?;
        let palette = self.read_palette(8)?;

        self.enter(LoadStage::ProgramPalette);
        for (index, [blue, green, red]) in palette.iter().copied().enumerate() {
            // At most 256 entries, so the index always fits.
            display.program_palette_entry(
                index as u8,
                [to_dac6(red), to_dac6(green), to_dac6(blue)],
            );
        }

        let rows_start = HEADER_LEN + (palette.len() * PALETTE_ENTRY_LEN) as u64;
        self.stream_rows(&geometry, rows_start, |top, row| {
            let ty = offset(y, top as usize);
            for (col, &value) in row[..geometry.width].iter().enumerate() {
                surface.set_pixel(offset(x, col), ty, value);
            }
        })?;

        Ok(BmpInfo {
            width: geometry.width as u32,
            height: geometry.rows,
            bit_count: 8,
            palette_entries: palette.len() as u32,
            top_down: !geometry.bottom_up,
        })
    }

    fn packed565<W: VideoWindow>(
        &mut self,
        surface: &mut Rgb565Surface<W>,
        x: i32,
        y: i32,
    ) -> Result<BmpInfo> {
        self.check_format(24)?;
        let geometry = self.read_geometry(3, surface.viewport())?;

        self.stream_rows(&geometry, HEADER_LEN, |top, row| {
            let ty = offset(y, top as usize);
            for (col, bgr) in row.chunks_exact(3).take(geometry.width).enumerate() {
                surface.set_pixel(offset(x, col), ty, pack_rgb565(bgr[2], bgr[1], bgr[0]));
            }
        })?;

        Ok(BmpInfo {
            width: geometry.width as u32,
            height: geometry.rows,
            bit_count: 24,
            palette_entries: 0,
            top_down: !geometry.bottom_up,
        })
    }

    /// Bit depth first, then compression.
    fn check_format(&mut self, expected: u16) -> Result<()> {
        self.enter(LoadStage::ValidateHeader);
        self.reader.seek_to(BIT_COUNT_OFFSET)?;
        let found = self.reader.read_u16_le()?;
        if found != expected {
            return Err(BmpError::UnsupportedBitDepth { expected, found });
        }

        self.reader.seek_to(COMPRESSION_OFFSET)?;
        let compression = self.reader.read_u32_le()?;
        if compression != COMPRESSION_NONE {
            return Err(BmpError::Compressed(compression));
        }
        Ok(())
    }

    fn read_geometry(&mut self, bytes_per_pixel: usize, viewport: Viewport) -> Result<Geometry> {
        self.enter(LoadStage::ReadGeometry);
        self.reader.seek_to(WIDTH_OFFSET)?;
        let width = self.reader.read_i32_le()?;
        let height = self.reader.read_i32_le()?;

        if i64::from(width) > i64::from(viewport.width) {
            return Err(BmpError::WidthExceedsViewport {
                width,
                max: viewport.width,
            });
        }
        let width = match usize::try_from(width) {
            Ok(w) if w > 0 => w,
            _ => return Err(BmpError::InvalidWidth(width)),
        };

        let geometry = Geometry {
            width,
            rows: height.unsigned_abs(),
            stride: padded_stride(width * bytes_per_pixel),
            bottom_up: height >= 0,
        };
        debug!(
            width,
            height,
            stride = geometry.stride,
            "bitmap geometry"
        );
        Ok(geometry)
    }

    /// Reads the transient palette as `[blue, green, red]` entries.
    fn read_palette(&mut self, bit_count: u16) -> Result<Vec<[u8; 3]>> {
        self.reader.seek_to(COLORS_USED_OFFSET)?;
        let colors_used = self.reader.read_u32_le()?;
        let count = header::palette_entries(colors_used, bit_count);
        if count > MAX_PALETTE_ENTRIES {
            return Err(BmpError::PaletteTooLarge(colors_used));
        }
        let count = count as usize;

        self.enter(LoadStage::ReadPalette);
        self.reader.seek_to(HEADER_LEN)?;
        let mut raw = vec![0u8; count * PALETTE_ENTRY_LEN];
        self.reader
            .read_exact(&mut raw)
            .map_err(|err| truncated(err, BmpError::ShortPalette { entries: count }))?;

        Ok(raw
            .chunks_exact(PALETTE_ENTRY_LEN)
            .map(|entry| [entry[0], entry[1], entry[2]])
            .collect())
    }

    fn stream_rows(
        &mut self,
        geometry: &Geometry,
        rows_start: u64,
        mut blit: impl FnMut(u32, &[u8]),
    ) -> Result<()> {
        self.enter(LoadStage::StreamRows);
        self.reader.seek_to(rows_start)?;

        let mut row = vec![0u8; geometry.stride];
        for stored in 0..geometry.rows {
            self.reader
                .read_exact(&mut row)
                .map_err(|err| truncated(err, BmpError::ShortRow { row: stored }))?;
            blit(geometry.row_from_top(stored), &row);
        }
        Ok(())
    }
}

fn truncated(err: io::Error, short: BmpError) -> BmpError {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        short
    } else {
        BmpError::Io(err)
    }
}

/// `base + delta`, saturating; a saturated coordinate is off-screen and gets clipped.
#[inline]
fn offset(base: i32, delta: usize) -> i32 {
    base.saturating_add(i32::try_from(delta).unwrap_or(i32::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use svga_vbe::{DisplayMode, SimDisplay, SimVram};

    fn indexed() -> IndexedSurface<SimVram> {
        IndexedSurface::for_mode(SimVram::new(1024 * 1024), &DisplayMode::INDEXED_1024X768)
            .unwrap()
    }

    fn header(width: i32, height: i32, bits: u16) -> Vec<u8> {
        let mut buf = vec![0u8; HEADER_LEN as usize];
        buf[0..2].copy_from_slice(b"BM");
        buf[18..22].copy_from_slice(&width.to_le_bytes());
        buf[22..26].copy_from_slice(&height.to_le_bytes());
        buf[28..30].copy_from_slice(&bits.to_le_bytes());
        buf
    }

    #[test]
    fn bit_depth_is_checked_before_anything_else() {
        // Header is truncated right after the bit count; the depth still wins.
        let mut bytes = header(4, 4, 4);
        bytes.truncate(30);
        let mut surface = indexed();
        let mut display = SimDisplay::new();

        let err = draw_bmp_indexed8_from_reader(
            &mut surface,
            &mut display,
            0,
            0,
            &mut Cursor::new(bytes),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            BmpError::UnsupportedBitDepth {
                expected: 8,
                found: 4
            }
        ));
        assert_eq!(display.dac().entries_written(), 0);
        assert_eq!(surface.window().writes(), 0);
    }

    #[test]
    fn zero_width_is_invalid() {
        let mut surface = indexed();
        let mut display = SimDisplay::new();
        let err = draw_bmp_indexed8_from_reader(
            &mut surface,
            &mut display,
            0,
            0,
            &mut Cursor::new(header(0, 4, 8)),
        )
        .unwrap_err();
        assert!(matches!(err, BmpError::InvalidWidth(0)));
    }

    #[test]
    fn oversized_palette_is_unsupported() {
        let mut bytes = header(1, 1, 8);
        bytes[46..50].copy_from_slice(&300u32.to_le_bytes());
        let mut surface = indexed();
        let mut display = SimDisplay::new();
        let err = draw_bmp_indexed8_from_reader(
            &mut surface,
            &mut display,
            0,
            0,
            &mut Cursor::new(bytes),
        )
        .unwrap_err();
        assert!(matches!(err, BmpError::PaletteTooLarge(300)));
        assert_eq!(display.dac().entries_written(), 0);
    }

    #[test]
    fn row_order_follows_height_sign() {
        let geometry = Geometry {
            width: 1,
            rows: 3,
            stride: 4,
            bottom_up: true,
        };
        assert_eq!(geometry.row_from_top(0), 2);
        assert_eq!(geometry.row_from_top(2), 0);

        let geometry = Geometry {
            bottom_up: false,
            ..geometry
        };
        assert_eq!(geometry.row_from_top(0), 0);
    }
}
