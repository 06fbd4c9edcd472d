use log::debug;

use crate::config::ZoomConfig;

/// Affine draw transform: `screen = world * scale + (tx, ty)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
	pub scale: f64,
	pub tx: f64,
	pub ty: f64,
}

/// Draw-time zoom. Never touches simulation positions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
	zoom: f64,
	config: ZoomConfig,
}

impl Default for Viewport {
	fn default() -> Self {
		Self::new(ZoomConfig::default())
	}
}

impl Viewport {
	pub fn new(config: ZoomConfig) -> Self {
		Self {
			zoom: bound(config.initial, &config),
			config,
		}
	}

	pub fn zoom(&self) -> f64 {
		self.zoom
	}

	/// No-op at the upper bound.
	pub fn zoom_in(&mut self) {
		self.set_zoom(self.zoom + self.config.step);
	}

	/// No-op at the lower bound.
	pub fn zoom_out(&mut self) {
		self.set_zoom(self.zoom - self.config.step);
	}

	pub fn can_zoom_in(&self) -> bool {
		self.zoom < self.config.max
	}

	pub fn can_zoom_out(&self) -> bool {
		self.zoom > self.config.min
	}

	fn set_zoom(&mut self, zoom: f64) {
		let zoom = bound(zoom, &self.config);
		if zoom != self.zoom {
			debug!("Zoom {} -> {}", self.zoom, zoom);
			self.zoom = zoom;
		}
	}

	/// Translate to the canvas center, scale, translate back.
	pub fn transform(&self, width: f64, height: f64) -> Transform {
		let (cx, cy) = (width / 2.0, height / 2.0);
		Transform {
			scale: self.zoom,
			tx: cx - cx * self.zoom,
			ty: cy - cy * self.zoom,
		}
	}
}

/// Like `clamp`, but `max` wins over `min` instead of panicking on an
/// inverted range.
fn bound(zoom: f64, config: &ZoomConfig) -> f64 {
	zoom.max(config.min).min(config.max)
}
