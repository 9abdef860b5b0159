//! CSS value formatting without float `format!`.
//!
//! Float-to-decimal formatting has panicked on wasm in some toolchain/browser
//! combinations, and these strings are produced on every animation frame. The
//! helpers here:
//! - map `NaN` and infinities to `0` (a CSS length must stay parseable),
//! - scale + round finite values into an `i64`, then format integers,
//! - trim trailing fractional zeros so `12.50px` is written `12.5px`.

/// Fixed-point decimal with at most `decimals` fractional digits.
pub fn decimal(v: f64, decimals: usize) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }

    let decimals = decimals.min(6);
    let scale_i64 = 10_i64.pow(decimals as u32);
    let scaled = (v * scale_i64 as f64).round();
    if !scaled.is_finite() || scaled.abs() > (i64::MAX as f64) {
        return "0".to_string();
    }

    let scaled_i = scaled as i64;
    let negative = scaled_i < 0;
    let abs_i = scaled_i.unsigned_abs();
    let scale_u = scale_i64 as u64;
    let int_part = abs_i / scale_u;
    let mut frac_part = abs_i % scale_u;

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&int_part.to_string());

    if frac_part > 0 {
        let mut width = decimals;
        while frac_part % 10 == 0 {
            frac_part /= 10;
            width -= 1;
        }
        let frac_str = frac_part.to_string();
        out.push('.');
        for _ in 0..width.saturating_sub(frac_str.len()) {
            out.push('0');
        }
        out.push_str(&frac_str);
    }

    out
}

pub fn px(v: f64) -> String {
    format!("{}px", decimal(v, 2))
}

pub fn percent(v: f64) -> String {
    format!("{}%", decimal(v, 2))
}

pub fn ms(v: u32) -> String {
    format!("{v}ms")
}

/// `translateY(<v>px)`, the transform used by every parallax effect.
pub fn translate_y(v: f64) -> String {
    format!("translateY({})", px(v))
}
