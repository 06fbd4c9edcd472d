//! Tunable constants for the graph view, loadable from JSON.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Physics constants for one simulation step.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForceParams {
	/// Pull toward the canvas center, per unit of displacement.
	pub center_force: f64,
	/// Inverse-square repulsion strength between every pair.
	pub repulsion: f64,
	/// Lower clamp on pair distance in the repulsion kernel.
	pub min_distance: f64,
	/// Spring coefficient along edges.
	pub attraction: f64,
	/// Velocity multiplier applied at integration.
	pub damping: f64,
	/// Margin kept between nodes and the canvas edges.
	pub padding: f64,
	/// Half-width of the random square nodes start in around the center.
	pub jitter: f64,
}

impl Default for ForceParams {
	fn default() -> Self {
		Self {
			center_force: 0.01,
			repulsion: 3000.0,
			min_distance: 40.0,
			attraction: 0.03,
			damping: 0.9,
			padding: 30.0,
			jitter: 50.0,
		}
	}
}

/// Frame cadence of the animation scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
	/// Frames `[0, fast_phase_limit)` run `fast_steps` steps each.
	pub fast_phase_limit: u32,
	pub fast_steps: u32,
	/// Last frame (exclusive) that advances physics.
	pub max_frames: u32,
	/// Draw-only frames after physics freezes.
	pub extra_draw_frames: u32,
}

impl Default for ScheduleConfig {
	fn default() -> Self {
		Self {
			fast_phase_limit: 60,
			fast_steps: 3,
			max_frames: 300,
			extra_draw_frames: 100,
		}
	}
}

impl ScheduleConfig {
	/// Total number of frames the scheduler requests for one run.
	pub fn total_frames(&self) -> u32 {
		self.max_frames.saturating_add(self.extra_draw_frames)
	}
}

/// Zoom bounds and increment.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
	pub min: f64,
	pub max: f64,
	pub step: f64,
	pub initial: f64,
}

impl Default for ZoomConfig {
	fn default() -> Self {
		Self {
			min: 0.5,
			max: 2.0,
			step: 0.25,
			initial: 1.0,
		}
	}
}

/// How nodes and edges look on the canvas.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeStyle {
	pub base_radius: f64,
	/// Extra radius at importance 1.0.
	pub importance_radius: f64,
	pub fact_color: String,
	pub conversation_color: String,
	pub other_color: String,
	pub edge_color: String,
	pub background: String,
}

impl Default for NodeStyle {
	fn default() -> Self {
		Self {
			base_radius: 6.0,
			importance_radius: 10.0,
			fact_color: "#4f9dff".into(),
			conversation_color: "#50c878".into(),
			other_color: "#a0a0b0".into(),
			edge_color: "rgba(100, 180, 255, 0.5)".into(),
			background: "#1a1a2e".into(),
		}
	}
}

/// Everything the graph view can be tuned with.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
	pub simulation: ForceParams,
	pub schedule: ScheduleConfig,
	pub zoom: ZoomConfig,
	pub style: NodeStyle,
}

impl GraphConfig {
	/// Parse a (possibly partial) JSON config and validate it.
	pub fn from_json(json: &str) -> Result<Self> {
		let config: Self = serde_json::from_str(json)?;
		config.validate()?;
		Ok(config)
	}

	pub fn validate(&self) -> Result<()> {
		let sim = &self.simulation;
		if sim.repulsion <= 0.0 {
			return Err(invalid("simulation.repulsion must be positive"));
		}
		if sim.min_distance <= 0.0 {
			return Err(invalid("simulation.min_distance must be positive"));
		}
		if !(sim.damping > 0.0 && sim.damping < 1.0) {
			return Err(invalid("simulation.damping must lie in (0, 1)"));
		}
		if sim.padding < 0.0 || sim.jitter < 0.0 || sim.center_force < 0.0 || sim.attraction < 0.0
		{
			return Err(invalid(
				"simulation padding, jitter, center_force and attraction must not be negative",
			));
		}

		let schedule = &self.schedule;
		if schedule.fast_phase_limit > schedule.max_frames {
			return Err(invalid("schedule.fast_phase_limit exceeds schedule.max_frames"));
		}
		if schedule.max_frames.checked_add(schedule.extra_draw_frames).is_none() {
			return Err(invalid("schedule.max_frames + schedule.extra_draw_frames overflows"));
		}

		let zoom = &self.zoom;
		if zoom.min <= 0.0 {
			return Err(invalid("zoom.min must be positive"));
		}
		if zoom.min > zoom.max {
			return Err(invalid("zoom.min exceeds zoom.max"));
		}
		if zoom.step <= 0.0 {
			return Err(invalid("zoom.step must be positive"));
		}
		if zoom.initial < zoom.min || zoom.initial > zoom.max {
			return Err(invalid("zoom.initial lies outside [zoom.min, zoom.max]"));
		}
		Ok(())
	}
}

fn invalid(msg: &str) -> Error {
	Error::Config(msg.to_string())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_are_valid() {
		assert!(GraphConfig::default().validate().is_ok());
		assert_eq!(ScheduleConfig::default().total_frames(), 400);
	}

	#[test]
	fn partial_json_keeps_other_defaults() {
		let config =
			GraphConfig::from_json(r#"{ "simulation": { "repulsion": 5000 }, "zoom": { "max": 3 } }"#)
				.unwrap();
		assert_eq!(config.simulation.repulsion, 5000.0);
		assert_eq!(config.simulation.damping, 0.9);
		assert_eq!(config.zoom.max, 3.0);
		assert_eq!(config.zoom.min, 0.5);
		assert_eq!(config.schedule, ScheduleConfig::default());
	}

	#[test]
	fn empty_object_is_default() {
		assert_eq!(GraphConfig::from_json("{}").unwrap(), GraphConfig::default());
	}

	#[test]
	fn rejects_bad_damping() {
		let err = GraphConfig::from_json(r#"{ "simulation": { "damping": 1.0 } }"#).unwrap_err();
		assert!(matches!(err, Error::Config(_)));
	}

	#[test]
	fn rejects_inverted_zoom_bounds() {
		let err = GraphConfig::from_json(r#"{ "zoom": { "min": 2.5 } }"#).unwrap_err();
		assert!(matches!(err, Error::Config(_)));
	}

	#[test]
	fn rejects_fast_phase_past_max_frames() {
		let err = GraphConfig::from_json(r#"{ "schedule": { "fast_phase_limit": 400 } }"#)
			.unwrap_err();
		assert!(err.to_string().contains("fast_phase_limit"));
	}

	#[test]
	fn frame_budget_overflow_is_rejected() {
		let json = format!(
			r#"{{ "schedule": {{ "max_frames": {}, "extra_draw_frames": 10 }} }}"#,
			u32::MAX
		);
		let err = GraphConfig::from_json(&json).unwrap_err();
		assert!(err.to_string().contains("overflows"));

		let schedule = ScheduleConfig {
			max_frames: u32::MAX,
			..ScheduleConfig::default()
		};
		assert_eq!(schedule.total_frames(), u32::MAX);
	}

	#[test]
	fn rejects_negative_simulation_terms() {
		for field in ["padding", "jitter", "center_force", "attraction"] {
			let json = format!(r#"{{ "simulation": {{ "{field}": -1 }} }}"#);
			let err = GraphConfig::from_json(&json).unwrap_err();
			assert!(matches!(err, Error::Config(_)), "{field} accepted");
		}
	}

	#[test]
	fn rejects_bad_zoom_values() {
		for zoom in [
			r#"{ "step": 0 }"#,
			r#"{ "step": -0.25 }"#,
			r#"{ "initial": 0.25 }"#,
			r#"{ "initial": 2.5 }"#,
			r#"{ "min": 0, "initial": 1 }"#,
			r#"{ "min": -1 }"#,
		] {
			let json = format!(r#"{{ "zoom": {zoom} }}"#);
			let err = GraphConfig::from_json(&json).unwrap_err();
			assert!(matches!(err, Error::Config(_)), "{zoom} accepted");
		}
	}

	#[test]
	fn malformed_json_is_parse_error() {
		let err = GraphConfig::from_json("{ simulation").unwrap_err();
		assert!(matches!(err, Error::Parse(_)));
	}
}
