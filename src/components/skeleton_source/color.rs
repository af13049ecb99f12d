//! Color assignment policy for collections that originate colors.

use super::types::Rgb;

/// Fixed palette of perceptually distinct colors, consumed in order before
/// any procedural variation kicks in.
const PALETTE: &[&str] = &[
	"#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
	"#bcbd22", "#17becf", "#aec7e8", "#ffbb78", "#98df8a", "#ff9896", "#c5b0d5", "#c49c94",
	"#f7b6d2", "#dbdb8d", "#9edae5", "#393b79", "#637939", "#8c6d31", "#843c39",
];

/// Maximum hue perturbation, in turns, for picks past the palette.
const HUE_JITTER: f64 = 0.125;

/// Simple deterministic generator so repeated runs assign the same colors.
fn jitter(seed: usize) -> f64 {
	let x = ((seed + 1) * 9301 + 49297) % 233280;
	(x as f64) / 233280.0
}

/// Pick the color for the `n`-th skeleton ever added to a collection.
///
/// The first `PALETTE.len()` picks return the palette entries verbatim, in
/// order. Later picks reuse the palette cyclically with the hue shifted by
/// up to +-0.125 turns and the saturation clamped to [0.5, 1.0] at the
/// entry's original lightness.
pub fn pick_color(n: usize) -> Rgb {
	let base = Rgb::from_hex(PALETTE[n % PALETTE.len()]).unwrap_or_default();
	if n < PALETTE.len() {
		return base;
	}
	let (h, s, l) = base.to_hsl();
	let h = h + (jitter(n) - 0.5) * 2.0 * HUE_JITTER;
	let s = (s + (jitter(n.wrapping_mul(31)) - 0.5) * 0.5).clamp(0.5, 1.0);
	Rgb::from_hsl(h, s, l)
}
