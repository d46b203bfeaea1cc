//! Page placement of a layer canvas.
//!
//! Kept free of browser types so it can be tested natively.

use echoes_effects::LayerStyle;

/// Inline CSS for a layer canvas: fixed over the viewport, never
/// intercepting pointer events.
#[must_use]
pub fn layer_css(layer: &LayerStyle) -> String {
    let mut css = format!(
        "position:fixed;top:0;left:0;width:100%;height:100%;pointer-events:none;\
         z-index:{};mix-blend-mode:{};opacity:{}",
        layer.z_index,
        layer.mix_blend.mix_blend_name(),
        layer.opacity.clamp(0.0, 1.0)
    );
    if layer.blur_px > 0.0 {
        css.push_str(&format!(";filter:blur({}px)", layer.blur_px));
    }
    css
}

/// Turns a uniform random number in `[0, 1)` into a store seed.
#[must_use]
pub fn seed_from_unit(unit: f64) -> u64 {
    (unit.clamp(0.0, 1.0) * f64::from(u32::MAX)) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use echoes_effects::{BlendMode, Preset};

    #[test]
    fn test_layer_css_is_non_interactive() {
        let css = layer_css(&Preset::ClickRipples.profile().layer);
        assert!(css.contains("pointer-events:none"));
        assert!(css.contains("position:fixed"));
        assert!(css.contains("z-index:50"));
    }

    #[test]
    fn test_layer_css_blend_and_opacity() {
        let css = layer_css(&LayerStyle {
            z_index: 0,
            mix_blend: BlendMode::Lighter,
            opacity: 0.6,
            blur_px: 0.0,
        });
        assert!(css.contains("mix-blend-mode:plus-lighter"));
        assert!(css.ends_with("opacity:0.6"));
        assert!(!css.contains("filter"));
    }

    #[test]
    fn test_blobs_layer_css_is_blurred() {
        let css = layer_css(&Preset::LiquidBlobs.profile().layer);
        assert!(css.ends_with(";filter:blur(60px)"));
    }

    #[test]
    fn test_seed_range() {
        assert_eq!(seed_from_unit(0.0), 0);
        assert_eq!(seed_from_unit(1.0), u64::from(u32::MAX));
        assert_eq!(seed_from_unit(f64::NAN), 0);
    }
}
