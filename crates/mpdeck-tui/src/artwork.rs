//! Inline now-playing artwork.
//!
//! The image is drawn above the enlarged status text. Its height is half of
//! the status pane's nominal height in rows; its width in columns follows
//! from the terminal's cell aspect ratio so the picture comes out square.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use ratatui::crossterm::{cursor::MoveTo, queue, style::Print};

use crate::layout::Resolved;

const PNG_SIGNATURE: [u8; 8] = *b"\x89PNG\r\n\x1a\n";

/// Fallback cell size in pixels when the terminal does not report one.
pub const DEFAULT_CELL_PX: (u16, u16) = (8, 16);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtworkFrame {
    pub path: PathBuf,
    pub x: u16,
    pub y: u16,
    pub columns: u16,
    pub rows: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtworkChange {
    Show(ArtworkFrame),
    Hide,
}

/// Place an image relative to the status pane's unclipped content box.
/// `cell_px` is (width, height) of one cell in pixels.
pub fn place(path: &Path, status: Resolved, cell_px: (u16, u16), screen_width: u16) -> Option<ArtworkFrame> {
    let (cell_w, cell_h) = (i32::from(cell_px.0.max(1)), i32::from(cell_px.1.max(1)));
    let rows = status.height / 2;
    if rows <= 0 {
        return None;
    }
    let columns = (rows * cell_h / cell_w).min(i32::from(screen_width));
    let x = status.x + status.width / 2 - columns / 2;
    let y = status.y - rows - 1;
    if columns <= 0 || y < 0 {
        return None;
    }
    Some(ArtworkFrame {
        path: path.to_path_buf(),
        x: x.max(0) as u16,
        y: y as u16,
        columns: columns as u16,
        rows: rows as u16,
    })
}

pub trait ArtworkCanvas {
    fn show(&mut self, frame: &ArtworkFrame) -> io::Result<()>;
    fn hide(&mut self) -> io::Result<()>;

    fn apply(&mut self, change: &ArtworkChange) -> io::Result<()> {
        match change {
            ArtworkChange::Show(frame) => {
                self.hide()?;
                self.show(frame)
            }
            ArtworkChange::Hide => self.hide(),
        }
    }
}

/// The kitty protocol's file transfer only takes PNG; anything else would be
/// dropped by the terminal without a word.
fn check_png(path: &Path) -> io::Result<()> {
    let mut head = [0u8; 8];
    File::open(path)?.read_exact(&mut head)?;
    if head != PNG_SIGNATURE {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("{} is not a PNG image", path.display()),
        ));
    }
    Ok(())
}

/// Kitty graphics protocol: the terminal reads the PNG from disk itself.
pub struct KittyCanvas<W: Write> {
    out: W,
}

impl<W: Write> KittyCanvas<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ArtworkCanvas for KittyCanvas<W> {
    fn show(&mut self, frame: &ArtworkFrame) -> io::Result<()> {
        check_png(&frame.path)?;
        let payload = STANDARD.encode(frame.path.to_string_lossy().as_bytes());
        queue!(
            self.out,
            MoveTo(frame.x, frame.y),
            Print(format!(
                "\x1b_Ga=T,t=f,f=100,c={},r={},C=1,q=2;{}\x1b\\",
                frame.columns, frame.rows, payload
            ))
        )?;
        self.out.flush()
    }

    fn hide(&mut self) -> io::Result<()> {
        queue!(self.out, Print("\x1b_Ga=d,d=A,q=2\x1b\\"))?;
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_box() -> Resolved {
        // Enlarged status on an 80×24 screen.
        Resolved {
            x: 8,
            y: 16,
            width: 64,
            height: 24,
        }
    }

    #[test]
    fn sizes_from_cell_ratio() {
        let frame = place(Path::new("/tmp/cover.png"), status_box(), (8, 16), 80).unwrap();
        assert_eq!((frame.rows, frame.columns), (12, 24));
        assert_eq!((frame.x, frame.y), (28, 3));
    }

    #[test]
    fn no_room_means_no_image() {
        let low = Resolved { y: 3, ..status_box() };
        assert_eq!(place(Path::new("a.png"), low, (8, 16), 80), None);
        let flat = Resolved { height: 1, ..status_box() };
        assert_eq!(place(Path::new("a.png"), flat, (8, 16), 80), None);
    }

    fn image_with(head: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(head).unwrap();
        file.write_all(&[0; 32]).unwrap();
        file
    }

    fn frame_for(path: &Path) -> ArtworkFrame {
        ArtworkFrame {
            path: path.to_path_buf(),
            x: 1,
            y: 2,
            columns: 3,
            rows: 4,
        }
    }

    #[test]
    fn kitty_sequences() {
        let image = image_with(&PNG_SIGNATURE);
        let mut canvas = KittyCanvas::new(Vec::new());
        canvas.apply(&ArtworkChange::Show(frame_for(image.path()))).unwrap();
        let out = String::from_utf8(canvas.into_inner()).unwrap();
        let payload = STANDARD.encode(image.path().to_string_lossy().as_bytes());
        assert!(out.starts_with("\x1b_Ga=d,d=A,q=2\x1b\\"));
        assert!(out.contains("\x1b[3;2H"));
        assert!(out.ends_with(&format!("c=3,r=4,C=1,q=2;{payload}\x1b\\")));
    }

    #[test]
    fn jpeg_is_refused_before_anything_is_sent() {
        let image = image_with(b"\xff\xd8\xff\xe0\x00\x10JFIF");
        let mut canvas = KittyCanvas::new(Vec::new());
        let err = canvas.show(&frame_for(image.path())).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert!(canvas.into_inner().is_empty());

        let missing = KittyCanvas::new(Vec::new()).show(&frame_for(Path::new("/no/such/cover.png")));
        assert_eq!(missing.unwrap_err().kind(), io::ErrorKind::NotFound);
    }
}
