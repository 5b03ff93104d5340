use std::path::Path;

use log::info;

use crate::colors;
use crate::error::LoadError;

/// Represents a 2D texture for texture mapping.
///
/// Pixels are packed ARGB, row-major, origin at the top-left corner.
/// Textures are read-only during rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    data: Vec<u32>,
    width: u32,
    height: u32,
}

impl Texture {
    /// Create a texture from already-decoded ARGB pixels.
    pub fn new(width: u32, height: u32, data: Vec<u32>) -> Result<Self, LoadError> {
        if width == 0 || height == 0 || data.len() != (width as usize) * (height as usize) {
            return Err(LoadError::BadTextureSize {
                width,
                height,
                len: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Load a texture from an image file (PNG, JPG, etc.)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let img = image::open(path.as_ref())?.to_rgba8();
        let (width, height) = img.dimensions();

        // Convert RGBA bytes to ARGB u32
        let data: Vec<u32> = img
            .pixels()
            .map(|p| {
                let [r, g, b, a] = p.0;
                colors::argb(a, r, g, b)
            })
            .collect();

        let texture = Self::new(width, height, data)?;
        info!(
            "loaded texture {} ({}x{})",
            path.as_ref().display(),
            width,
            height
        );
        Ok(texture)
    }

    /// Procedural checkerboard with `cells` squares per side.
    pub fn checkerboard(size: u32, cells: u32, a: u32, b: u32) -> Self {
        let size = size.max(1);
        let cell = (size / cells.max(1)).max(1);
        let data = (0..size * size)
            .map(|i| {
                let (x, y) = (i % size, i / size);
                if ((x / cell) + (y / cell)) % 2 == 0 {
                    a
                } else {
                    b
                }
            })
            .collect();
        Self {
            data,
            width: size,
            height: size,
        }
    }

    /// Sample the texture at UV coordinates using nearest-neighbor filtering.
    ///
    /// # UV Coordinate Convention
    /// - (0,0) is the top-left texel; V grows downwards. OBJ texture
    ///   coordinates are flipped once at load time to match.
    ///
    /// # Wrapping
    /// Texel indices are `floor(u * width)` and `floor(v * height)`, wrapped
    /// into range with `rem_euclid`, so any finite or non-finite UV is safe.
    #[inline]
    pub fn sample(&self, u: f32, v: f32) -> u32 {
        let x = wrap_texel(u, self.width);
        let y = wrap_texel(v, self.height);
        self.data[y * self.width as usize + x]
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

#[inline]
fn wrap_texel(coord: f32, size: u32) -> usize {
    // Float-to-int casts saturate (NaN becomes 0), rem_euclid keeps it in range.
    let texel = (coord * size as f32).floor() as i64;
    texel.rem_euclid(size as i64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient() -> Texture {
        // 4x2, each texel stores its own index.
        Texture::new(4, 2, (0..8).collect()).unwrap()
    }

    #[test]
    fn samples_top_left_origin() {
        let t = gradient();
        assert_eq!(t.sample(0.0, 0.0), 0);
        assert_eq!(t.sample(0.99, 0.0), 3);
        assert_eq!(t.sample(0.0, 0.99), 4);
        assert_eq!(t.sample(0.5, 0.5), 6);
    }

    #[test]
    fn out_of_range_uvs_wrap() {
        let t = gradient();
        assert_eq!(t.sample(1.0, 0.0), 0);
        assert_eq!(t.sample(1.25, 1.5), 5);
        assert_eq!(t.sample(-0.25, 0.0), 3);
        assert_eq!(t.sample(-1.0, -0.5), 4);
    }

    #[test]
    fn non_finite_uvs_never_read_out_of_bounds() {
        let t = gradient();
        for (u, v) in [
            (f32::NAN, 0.0),
            (f32::INFINITY, 0.5),
            (0.5, f32::NEG_INFINITY),
            (1e30, -1e30),
        ] {
            t.sample(u, v);
        }
    }

    #[test]
    fn rejects_mismatched_dimensions() {
        assert!(matches!(
            Texture::new(2, 2, vec![0; 3]),
            Err(LoadError::BadTextureSize { .. })
        ));
        assert!(Texture::new(0, 4, vec![]).is_err());
    }

    #[test]
    fn checkerboard_alternates() {
        let t = Texture::checkerboard(8, 2, 1, 2);
        assert_eq!(t.sample(0.1, 0.1), 1);
        assert_eq!(t.sample(0.6, 0.1), 2);
        assert_eq!(t.sample(0.6, 0.6), 1);
    }

    #[test]
    fn from_file_decodes_rgba_into_argb() {
        let path = std::env::temp_dir().join(format!("scanline3d-texture-{}.png", std::process::id()));
        let mut img = image::RgbaImage::new(2, 1);
        img.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        img.put_pixel(1, 0, image::Rgba([0, 0, 255, 128]));
        img.save(&path).unwrap();

        let t = Texture::from_file(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!((t.width(), t.height()), (2, 1));
        assert_eq!(t.sample(0.0, 0.0), 0xFFFF0000);
        assert_eq!(t.sample(0.75, 0.0), 0x800000FF);
    }

    #[test]
    fn from_file_reports_missing_image() {
        let result = Texture::from_file("definitely/not/here.png");
        assert!(matches!(result, Err(LoadError::Image(_))));
    }
}
