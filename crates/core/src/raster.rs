//! Raster module - RGBA pixel colors and buffer helpers.
//!
//! Tiles, sprite cells, the world buffer and per-frame viewports are all
//! `image::RgbaImage`s; composition goes through `image::imageops`
//! (`replace` for opaque layers, `overlay` for alpha-over), which clips to
//! both images so callers may place layers partially off-canvas.

use image::RgbaImage;

/// 8-bit RGBA color (non-premultiplied).
pub type Rgba = image::Rgba<u8>;

pub const TRANSPARENT: Rgba = image::Rgba([0, 0, 0, 0]);

/// Backdrop color; fully transparent pixels render as this.
pub const PALETTE_WHITE: Rgba = rgb(0xf8, 0xf8, 0xf8);

/// Outline color.
pub const PALETTE_BLACK: Rgba = rgb(0x14, 0x14, 0x14);

/// Accent color.
pub const PALETTE_HIGHLIGHT: Rgba = rgb(0xa8, 0xa8, 0xa8);

/// Fully opaque color
pub const fn rgb(r: u8, g: u8, b: u8) -> Rgba {
    image::Rgba([r, g, b, 255])
}

pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Rgba {
    image::Rgba([r, g, b, a])
}

pub fn is_transparent(c: Rgba) -> bool {
    c.0[3] == 0
}

/// Pixel at signed (x, y); reads outside the image are transparent.
pub fn pixel_at(img: &RgbaImage, x: i32, y: i32) -> Rgba {
    if x < 0 || y < 0 {
        return TRANSPARENT;
    }
    img.get_pixel_checked(x as u32, y as u32)
        .copied()
        .unwrap_or(TRANSPARENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::imageops;

    const RED: Rgba = rgb(255, 0, 0);
    const BLUE: Rgba = rgb(0, 0, 255);

    #[test]
    fn out_of_bounds_reads_are_transparent() {
        let img = RgbaImage::from_pixel(2, 2, RED);
        assert_eq!(pixel_at(&img, 0, 0), RED);
        assert_eq!(pixel_at(&img, -1, 0), TRANSPARENT);
        assert_eq!(pixel_at(&img, 2, 1), TRANSPARENT);
        assert!(is_transparent(pixel_at(&img, 0, 5)));
    }

    #[test]
    fn replace_copies_transparency() {
        let mut dst = RgbaImage::from_pixel(2, 2, BLUE);
        imageops::replace(&mut dst, &RgbaImage::new(1, 1), 1, 1);
        assert_eq!(*dst.get_pixel(1, 1), TRANSPARENT);
        assert_eq!(*dst.get_pixel(0, 0), BLUE);
    }

    #[test]
    fn overlay_keeps_destination_under_transparent_source() {
        let mut dst = RgbaImage::from_pixel(2, 1, BLUE);
        let mut src = RgbaImage::new(2, 1);
        src.put_pixel(0, 0, RED);
        imageops::overlay(&mut dst, &src, 0, 0);
        assert_eq!(*dst.get_pixel(0, 0), RED);
        assert_eq!(*dst.get_pixel(1, 0), BLUE);
    }

    #[test]
    fn overlay_blends_half_alpha_on_opaque() {
        let mut dst = RgbaImage::from_pixel(1, 1, BLUE);
        imageops::overlay(&mut dst, &RgbaImage::from_pixel(1, 1, rgba(255, 0, 0, 128)), 0, 0);
        let [r, _, b, a] = dst.get_pixel(0, 0).0;
        assert_eq!(a, 255);
        assert!(r > 120 && r < 136, "r = {r}");
        assert!(b > 120 && b < 136, "b = {b}");
    }

    #[test]
    fn replace_clips_negative_offset() {
        let mut dst = RgbaImage::new(4, 4);
        imageops::replace(&mut dst, &RgbaImage::from_pixel(4, 4, RED), -2, -3);
        assert_eq!(*dst.get_pixel(0, 0), RED);
        assert_eq!(*dst.get_pixel(1, 0), RED);
        assert_eq!(*dst.get_pixel(2, 0), TRANSPARENT);
        assert_eq!(*dst.get_pixel(0, 1), TRANSPARENT);
    }

    #[test]
    fn flip_horizontal_mirrors_columns() {
        let mut img = RgbaImage::new(3, 1);
        img.put_pixel(0, 0, RED);
        let flipped = imageops::flip_horizontal(&img);
        assert_eq!(*flipped.get_pixel(2, 0), RED);
        assert_eq!(*flipped.get_pixel(0, 0), TRANSPARENT);
    }
}
