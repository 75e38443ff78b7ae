//! Asset loading
//!
//! All assets are loaded eagerly at startup. Any missing or corrupt file is
//! fatal: the caller reports the error and exits.

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::RgbaImage;
use rusttype::Font;

use crate::consts::PLAYER_FRAMES;
use crate::sim::PlatformKind;

#[derive(thiserror::Error, Debug)]
pub enum AssetError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot decode image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("cannot parse font {path}")]
    Font { path: PathBuf },

    #[error("cannot decode audio {path}: {source}")]
    Audio {
        path: PathBuf,
        #[source]
        source: rodio::decoder::DecoderError,
    },

    #[error("spritesheet {path} is {width}px wide, not divisible into {frames} frames")]
    InvalidSpritesheet { path: PathBuf, width: u32, frames: u32 },
}

/// Everything the frontend draws
pub struct Assets {
    pub narrow: RgbaImage,
    pub normal: RgbaImage,
    pub wide: RgbaImage,
    pub background: RgbaImage,
    /// `PLAYER_FRAMES` equal cells laid out horizontally
    pub player_sheet: RgbaImage,
    pub font: Font<'static>,
}

impl Assets {
    /// Load every image and the font under `dir`
    pub fn load(dir: &Path) -> Result<Self, AssetError> {
        let images = dir.join("images");
        let assets = Self {
            narrow: load_image(&images.join("narrow.png"))?,
            normal: load_image(&images.join("normal.png"))?,
            wide: load_image(&images.join("wide.png"))?,
            background: load_image(&images.join("background.png"))?,
            player_sheet: load_spritesheet(&images.join("player.png"))?,
            font: load_font(&dir.join("font.ttf"))?,
        };
        log::info!("Loaded assets from {}", dir.display());
        Ok(assets)
    }

    pub fn platform_sprite(&self, kind: PlatformKind) -> &RgbaImage {
        match kind {
            PlatformKind::Narrow => &self.narrow,
            PlatformKind::Normal => &self.normal,
            PlatformKind::Wide => &self.wide,
        }
    }

    /// Size of one player animation frame
    pub fn player_frame_size(&self) -> (u32, u32) {
        (
            self.player_sheet.width() / PLAYER_FRAMES,
            self.player_sheet.height(),
        )
    }
}

fn read(path: &Path) -> Result<Vec<u8>, AssetError> {
    std::fs::read(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_image(path: &Path) -> Result<RgbaImage, AssetError> {
    let bytes = read(path)?;
    let img = image::load_from_memory(&bytes).map_err(|source| AssetError::Image {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("Loaded {} ({}x{})", path.display(), img.width(), img.height());
    Ok(img.to_rgba8())
}

fn load_spritesheet(path: &Path) -> Result<RgbaImage, AssetError> {
    let sheet = load_image(path)?;
    check_spritesheet(path, sheet.width())?;
    Ok(sheet)
}

fn check_spritesheet(path: &Path, width: u32) -> Result<(), AssetError> {
    if width == 0 || width % PLAYER_FRAMES != 0 {
        return Err(AssetError::InvalidSpritesheet {
            path: path.to_path_buf(),
            width,
            frames: PLAYER_FRAMES,
        });
    }
    Ok(())
}

fn load_font(path: &Path) -> Result<Font<'static>, AssetError> {
    let bytes = read(path)?;
    Font::try_from_vec(bytes).ok_or_else(|| AssetError::Font {
        path: path.to_path_buf(),
    })
}

/// Read the encoded background track under `dir` and make sure it decodes.
///
/// The bytes are handed to the audio manager, which owns them from then on.
pub fn load_music(dir: &Path) -> Result<Arc<[u8]>, AssetError> {
    let path = dir.join("audio.mp3");
    let bytes: Arc<[u8]> = read(&path)?.into();
    rodio::Decoder::new(Cursor::new(bytes.clone()))
        .map_err(|source| AssetError::Audio { path, source })?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_dir_is_io_error() {
        let err = Assets::load(Path::new("/nonexistent/assets")).err().unwrap();
        assert!(matches!(err, AssetError::Io { .. }));
        assert!(err.to_string().contains("narrow.png"));
    }

    #[test]
    fn test_missing_music_is_io_error() {
        let err = load_music(Path::new("/nonexistent/assets")).unwrap_err();
        assert!(matches!(err, AssetError::Io { .. }));
        assert!(err.to_string().contains("audio.mp3"));
    }

    #[test]
    fn test_spritesheet_width_must_split_into_frames() {
        let path = Path::new("player.png");
        assert!(check_spritesheet(path, 128).is_ok());
        assert!(matches!(
            check_spritesheet(path, 130),
            Err(AssetError::InvalidSpritesheet { width: 130, .. })
        ));
        assert!(check_spritesheet(path, 0).is_err());
    }

    #[test]
    fn test_garbage_image_is_decode_error() {
        let dir = std::env::temp_dir().join(format!("rp-assets-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad.png");
        std::fs::write(&path, b"definitely not a png").unwrap();

        let err = load_image(&path).unwrap_err();
        assert!(matches!(err, AssetError::Image { .. }));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
