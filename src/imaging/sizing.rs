//! Dimension math for display variants and card thumbnails. No I/O.

/// Crop box for a thumbnail with the given aspect ratio, `short_edge` pixels
/// on its shorter side.
///
/// ```text
/// (16, 10) @ 400  →  640 x 400
/// (4, 5)   @ 400  →  400 x 500
/// ```
pub fn thumbnail_box(aspect: (u32, u32), short_edge: u32) -> (u32, u32) {
    let (aw, ah) = aspect;
    let scale = |long: u32, short: u32| (short_edge as f64 * long as f64 / short as f64).round() as u32;
    if aw > ah {
        (scale(aw, ah), short_edge)
    } else {
        (short_edge, scale(ah, aw))
    }
}

/// One display variant to encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplaySize {
    /// Requested size on the longer edge; the manifest key.
    pub target: u32,
    pub width: u32,
    pub height: u32,
}

/// Display variants for an image of `original` dimensions.
///
/// Requested sizes larger than the original are dropped (no upscaling). If
/// every size is too large, the original size is used as the sole variant.
pub fn display_sizes(original: (u32, u32), sizes: &[u32]) -> Vec<DisplaySize> {
    let (w, h) = original;
    let longer = w.max(h);

    let scaled = |target: u32| {
        let ratio = target as f64 / longer as f64;
        let (sw, sh) = if w >= h {
            (target, (h as f64 * ratio).round() as u32)
        } else {
            ((w as f64 * ratio).round() as u32, target)
        };
        DisplaySize {
            target,
            width: sw.max(1),
            height: sh.max(1),
        }
    };

    let mut out: Vec<DisplaySize> = sizes
        .iter()
        .copied()
        .filter(|&s| s > 0 && s <= longer)
        .map(scaled)
        .collect();
    out.sort_by_key(|s| s.target);
    out.dedup_by_key(|s| s.target);

    if out.is_empty() {
        out.push(DisplaySize {
            target: longer,
            width: w,
            height: h,
        });
    }
    out
}
