//! Value types shared by every skeleton collection.

use std::fmt;

/// Integer identifier of a traced skeleton reconstruction.
pub type SkeletonId = u64;

/// An RGB color with hex and HSL conversions used by the color policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
	pub r: u8,
	pub g: u8,
	pub b: u8,
}

impl Rgb {
	pub const fn new(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b }
	}

	/// Parse a `#rrggbb` string. Returns `None` for anything else.
	pub fn from_hex(hex: &str) -> Option<Self> {
		let hex = hex.strip_prefix('#')?;
		if hex.len() != 6 {
			return None;
		}
		let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
		let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
		let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
		Some(Self { r, g, b })
	}

	pub fn to_hex(self) -> String {
		format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
	}

	/// Convert to (hue, saturation, lightness); hue is in turns, [0, 1).
	pub fn to_hsl(self) -> (f64, f64, f64) {
		let (r, g, b) = (
			self.r as f64 / 255.0,
			self.g as f64 / 255.0,
			self.b as f64 / 255.0,
		);
		let max = r.max(g).max(b);
		let min = r.min(g).min(b);
		let l = (max + min) / 2.0;
		if max == min {
			return (0.0, 0.0, l);
		}
		let d = max - min;
		let s = if l > 0.5 {
			d / (2.0 - max - min)
		} else {
			d / (max + min)
		};
		let sector = if max == r {
			((g - b) / d).rem_euclid(6.0)
		} else if max == g {
			(b - r) / d + 2.0
		} else {
			(r - g) / d + 4.0
		};
		(sector / 6.0, s, l)
	}

	/// Convert from (hue, saturation, lightness); hue in turns, wrapped into [0, 1).
	pub fn from_hsl(h: f64, s: f64, l: f64) -> Self {
		let h = h.rem_euclid(1.0);
		let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
		let hp = h * 6.0;
		let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
		let (r1, g1, b1) = match hp as u32 {
			0 => (c, x, 0.0),
			1 => (x, c, 0.0),
			2 => (0.0, c, x),
			3 => (0.0, x, c),
			4 => (x, 0.0, c),
			_ => (c, 0.0, x),
		};
		let m = l - c / 2.0;
		Self {
			r: ((r1 + m) * 255.0).round() as u8,
			g: ((g1 + m) * 255.0).round() as u8,
			b: ((b1 + m) * 255.0).round() as u8,
		}
	}
}

impl fmt::Display for Rgb {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.to_hex())
	}
}

/// One traced skeleton as held by a collection: identity plus display state.
///
/// Collections always store their own clone; a model handed to `append` or
/// `update` is never shared between two collections afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct SkeletonModel {
	pub id: SkeletonId,
	pub base_name: String,
	pub color: Rgb,
	pub selected: bool,
	pub pre_visible: bool,
	pub post_visible: bool,
	pub text_visible: bool,
}

impl SkeletonModel {
	pub fn new(id: SkeletonId, base_name: impl Into<String>, color: Rgb) -> Self {
		Self {
			id,
			base_name: base_name.into(),
			color,
			selected: true,
			pre_visible: true,
			post_visible: true,
			text_visible: false,
		}
	}
}

/// Fired on a source after one of its mutations completes locally.
#[derive(Clone, Debug, PartialEq)]
pub enum ChangeEvent {
	Appended(Vec<SkeletonId>),
	Removed(Vec<SkeletonId>),
	Updated(SkeletonId),
	Cleared,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn hex_round_trip() {
		let c = Rgb::from_hex("#1f77b4").unwrap();
		assert_eq!(c, Rgb::new(0x1f, 0x77, 0xb4));
		assert_eq!(c.to_hex(), "#1f77b4");
		assert!(Rgb::from_hex("1f77b4").is_none());
		assert!(Rgb::from_hex("#1f77b").is_none());
		assert!(Rgb::from_hex("#zzzzzz").is_none());
	}

	#[test]
	fn hsl_round_trip_stays_close() {
		for hex in ["#ff7f0e", "#2ca02c", "#9467bd", "#17becf"] {
			let c = Rgb::from_hex(hex).unwrap();
			let (h, s, l) = c.to_hsl();
			let back = Rgb::from_hsl(h, s, l);
			assert!((back.r as i32 - c.r as i32).abs() <= 1, "{hex}");
			assert!((back.g as i32 - c.g as i32).abs() <= 1, "{hex}");
			assert!((back.b as i32 - c.b as i32).abs() <= 1, "{hex}");
		}
	}

	#[test]
	fn model_clone_is_independent() {
		let a = SkeletonModel::new(42, "neuron 42", Rgb::new(10, 20, 30));
		let mut b = a.clone();
		b.selected = false;
		b.base_name = "renamed".into();
		assert!(a.selected);
		assert_eq!(a.base_name, "neuron 42");
		assert_ne!(a, b);
	}
}
