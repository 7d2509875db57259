//! Colors for the light and dark page schemes.

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self {
			a: a.clamp(0.0, 1.0),
			..self
		}
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// The page color scheme, owned by the host document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorScheme {
	#[default]
	Light,
	Dark,
}

impl ColorScheme {
	/// Interprets a `data-theme` attribute value and the `<html>` class list.
	pub fn from_markers(data_theme: Option<&str>, has_dark_class: bool) -> Self {
		match data_theme {
			Some("dark") => ColorScheme::Dark,
			Some("light") => ColorScheme::Light,
			_ if has_dark_class => ColorScheme::Dark,
			_ => ColorScheme::Light,
		}
	}

	/// Reads the scheme marker from `<html>`. Defaults to light.
	pub fn from_document() -> Self {
		let Some(root) = web_sys::window()
			.and_then(|w| w.document())
			.and_then(|d| d.document_element())
		else {
			return ColorScheme::Light;
		};
		let data_theme = root.get_attribute("data-theme");
		Self::from_markers(data_theme.as_deref(), root.class_list().contains("dark"))
	}
}

/// Base colors for every element the renderer draws. Alphas come from the
/// field config and are applied with [`Color::with_alpha`].
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
	pub background: Color,
	pub node: Color,
	pub line: Color,
	/// Lines and halos near the pointer.
	pub accent: Color,
	pub particle: Color,
	pub pulse: Color,
}

impl Palette {
	/// Deep navy background with cyan nodes.
	pub fn dark() -> Self {
		Self {
			background: Color::rgb(10, 12, 24),
			node: Color::rgb(120, 200, 255),
			line: Color::rgb(100, 160, 220),
			accent: Color::rgb(170, 225, 255),
			particle: Color::rgb(200, 230, 255),
			pulse: Color::rgb(120, 200, 255),
		}
	}

	/// Near-white background with slate-blue nodes.
	pub fn light() -> Self {
		Self {
			background: Color::rgb(248, 250, 252),
			node: Color::rgb(59, 94, 160),
			line: Color::rgb(94, 129, 172),
			accent: Color::rgb(37, 99, 235),
			particle: Color::rgb(100, 116, 139),
			pulse: Color::rgb(59, 130, 246),
		}
	}

	pub fn for_scheme(scheme: ColorScheme) -> Self {
		match scheme {
			ColorScheme::Light => Self::light(),
			ColorScheme::Dark => Self::dark(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn css_output() {
		assert_eq!(Color::rgb(10, 12, 255).to_css(), "#0a0cff");
		assert_eq!(
			Color::rgb(1, 2, 3).with_alpha(0.5).to_css(),
			"rgba(1, 2, 3, 0.5)"
		);
		assert_eq!(Color::rgb(1, 2, 3).with_alpha(7.0).a, 1.0);
	}

	#[test]
	fn scheme_markers() {
		assert_eq!(ColorScheme::from_markers(Some("dark"), false), ColorScheme::Dark);
		assert_eq!(ColorScheme::from_markers(Some("light"), true), ColorScheme::Light);
		assert_eq!(ColorScheme::from_markers(None, true), ColorScheme::Dark);
		assert_eq!(ColorScheme::from_markers(Some("sepia"), false), ColorScheme::Light);
	}

	#[test]
	fn palettes_differ_by_scheme() {
		assert_ne!(
			Palette::for_scheme(ColorScheme::Dark).background,
			Palette::for_scheme(ColorScheme::Light).background
		);
	}
}
