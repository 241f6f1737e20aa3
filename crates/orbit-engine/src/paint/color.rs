/// Linear RGBA color (straight alpha).
///
/// Values are stored linear because that is what wgpu expects for clear
/// colors and what an sRGB surface re-encodes on write.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    /// Creates a color from sRGB-encoded components in `[0, 1]`.
    ///
    /// Alpha is never gamma encoded and is only clamped.
    #[inline]
    pub fn from_srgb(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self {
            r: srgb_to_linear(r),
            g: srgb_to_linear(g),
            b: srgb_to_linear(b),
            a: a.clamp(0.0, 1.0),
        }
    }

    /// Creates a color from sRGB bytes (`0`–`255`).
    #[inline]
    pub fn from_srgb_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::from_srgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a as f32 / 255.0)
    }

    /// Returns the clear color to hand to wgpu for a surface of `format`.
    ///
    /// Non-sRGB surfaces store whatever is written, so the color is re-encoded
    /// to sRGB to keep the on-screen result identical across formats.
    pub fn to_wgpu(self, format: wgpu::TextureFormat) -> wgpu::Color {
        let (r, g, b) = if format.is_srgb() {
            (self.r, self.g, self.b)
        } else {
            (linear_to_srgb(self.r), linear_to_srgb(self.g), linear_to_srgb(self.b))
        };
        wgpu::Color {
            r: r as f64,
            g: g as f64,
            b: b as f64,
            a: self.a as f64,
        }
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    let c = c.clamp(0.0, 1.0);
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn linear_to_srgb(c: f32) -> f32 {
    let c = c.clamp(0.0, 1.0);
    if c <= 0.0031308 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn srgb_endpoints_are_fixed() {
        let c = Color::from_srgb(0.0, 1.0, 0.0, 1.0);
        assert_eq!(c.r, 0.0);
        assert_eq!(c.g, 1.0);
    }

    #[test]
    fn srgb_mid_gray_is_darker_in_linear() {
        let c = Color::from_srgb_u8(128, 128, 128, 255);
        assert!((c.r - 0.2158).abs() < 1e-3);
    }

    #[test]
    fn srgb_surface_gets_linear_values() {
        let c = Color::from_srgb(0.5, 0.5, 0.5, 1.0);
        let w = c.to_wgpu(wgpu::TextureFormat::Bgra8UnormSrgb);
        assert!(close(w.r, c.r as f64));
    }

    #[test]
    fn unorm_surface_gets_srgb_encoding_back() {
        let c = Color::from_srgb(0.9765625, 0.9609375, 0.97265625, 1.0);
        let w = c.to_wgpu(wgpu::TextureFormat::Bgra8Unorm);
        assert!(close(w.r, 0.9765625));
        assert!(close(w.g, 0.9609375));
        assert!(close(w.b, 0.97265625));
        assert!(close(w.a, 1.0));
    }

    #[test]
    fn alpha_is_clamped_not_encoded() {
        let c = Color::from_srgb(0.0, 0.0, 0.0, 1.5);
        assert_eq!(c.a, 1.0);
    }
}
