//! PNG encoding and export for texture buffers

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{MaterialTextures, PixelFormat, TextureBuffer};
use crate::Result;

fn encode_into<W: Write>(texture: &TextureBuffer, w: W) -> std::result::Result<(), png::EncodingError> {
    let mut encoder = png::Encoder::new(w, texture.width, texture.height);
    encoder.set_color(match texture.format {
        PixelFormat::Luma => png::ColorType::Grayscale,
        PixelFormat::Rgb => png::ColorType::Rgb,
    });
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::Default);

    let mut writer = encoder.write_header()?;
    writer.write_image_data(&texture.pixels)?;
    writer.finish()
}

/// Encode a texture as PNG bytes (for embedding in a GLB)
pub fn encode_png(texture: &TextureBuffer) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    encode_into(texture, &mut bytes)?;
    Ok(bytes)
}

/// Write a texture to a PNG file
///
/// # Example
/// ```no_run
/// use prop_gen::texture::{brass, write_png};
/// use std::path::Path;
///
/// let set = brass(64, 31);
/// write_png(&set.base_color, Path::new("brass.png")).unwrap();
/// ```
pub fn write_png(texture: &TextureBuffer, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    encode_into(texture, BufWriter::new(file))?;
    Ok(())
}

impl MaterialTextures {
    /// Write `<prefix>_<Map>.png` for all four maps into `dir`, creating it if needed
    pub fn export(&self, dir: &Path, prefix: &str) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(dir)?;
        let mut written = Vec::with_capacity(4);
        for (suffix, map) in self.maps() {
            let path = dir.join(format!("{prefix}_{suffix}.png"));
            write_png(map, &path)?;
            debug!(path = %path.display(), "wrote texture");
            written.push(path);
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::{felt, Field};

    #[test]
    fn test_encode_png_signature() {
        let tex = Field::from_fn(8, 4, |x, _| x as f32 / 7.0).to_luma();
        let bytes = encode_png(&tex).unwrap();
        assert_eq!(&bytes[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
    }

    #[test]
    fn test_export_material() {
        let dir = tempfile::tempdir().unwrap();
        let set = felt(16, 21, [68, 10, 18]);
        let paths = set.export(&dir.path().join("textures"), "felt").unwrap();

        assert_eq!(paths.len(), 4);
        assert!(paths[0].ends_with("felt_BaseColor.png"));
        assert!(paths[3].ends_with("felt_AO.png"));
        for path in &paths {
            assert!(std::fs::metadata(path).unwrap().len() > 0);
        }
    }

    #[test]
    fn test_write_png_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let tex = Field::new(4, 4).to_luma();
        let result = write_png(&tex, &dir.path().join("missing").join("a.png"));
        assert!(matches!(result, Err(crate::PropError::Io(_))));
    }
}
