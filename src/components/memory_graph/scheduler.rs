//! Frame cadence driving the simulation.
//!
//! The host (requestAnimationFrame in the browser, a manual ticker in tests)
//! calls [`AnimationScheduler::on_frame`] once per refresh. The scheduler
//! decides how many physics steps the frame gets, whether to draw, and
//! whether to ask the ticker for another frame.

use log::{debug, info};

use super::simulation::ForceSimulation;
use crate::config::ScheduleConfig;

/// Source of host refresh callbacks.
pub trait Ticker {
	/// Ask for one more frame callback.
	fn request_frame(&mut self);
	/// Drop any pending callback. Must be safe to call with nothing pending.
	fn cancel_frame(&mut self);
}

/// Anything advanced one physics tick at a time.
pub trait Stepper {
	fn step(&mut self);
}

impl Stepper for ForceSimulation {
	fn step(&mut self) {
		ForceSimulation::step(self)
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
	/// Several steps per frame.
	Settle,
	/// One step per frame.
	Refine,
	/// Draw without stepping.
	Frozen,
	/// No more frames requested.
	Done,
}

/// What one frame did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameReport {
	pub steps: u32,
	pub draw: bool,
}

pub struct AnimationScheduler<T: Ticker> {
	ticker: T,
	config: ScheduleConfig,
	frame: u32,
	active: bool,
}

impl<T: Ticker> AnimationScheduler<T> {
	pub fn new(ticker: T, config: ScheduleConfig) -> Self {
		Self {
			ticker,
			config,
			frame: 0,
			active: false,
		}
	}

	/// Reset the frame counter and request the first frame. Any pending
	/// frame is cancelled first. An empty graph does not start.
	pub fn start(&mut self, node_count: usize) -> bool {
		self.stop();
		self.frame = 0;
		if node_count == 0 || self.config.total_frames() == 0 {
			return false;
		}
		self.active = true;
		self.ticker.request_frame();
		true
	}

	/// Cancel immediately; no frame stays pending.
	pub fn stop(&mut self) {
		if self.active {
			debug!("Animation cancelled at frame {}", self.frame);
		}
		self.active = false;
		self.ticker.cancel_frame();
	}

	pub fn phase_of(&self, frame: u32) -> Phase {
		let c = &self.config;
		if frame < c.fast_phase_limit {
			Phase::Settle
		} else if frame < c.max_frames {
			Phase::Refine
		} else if frame < c.total_frames() {
			Phase::Frozen
		} else {
			Phase::Done
		}
	}

	pub fn phase(&self) -> Phase {
		if self.active {
			self.phase_of(self.frame)
		} else {
			Phase::Done
		}
	}

	/// Run one host frame: step the simulation as the phase dictates and
	/// request the next frame while the budget lasts. A frame arriving after
	/// `stop` does nothing.
	pub fn on_frame<S: Stepper>(&mut self, sim: &mut S) -> FrameReport {
		if !self.active {
			return FrameReport::default();
		}

		let phase = self.phase_of(self.frame);
		let steps = match phase {
			Phase::Settle => self.config.fast_steps,
			Phase::Refine => 1,
			Phase::Frozen | Phase::Done => 0,
		};
		for _ in 0..steps {
			sim.step();
		}

		self.frame += 1;
		let next = self.phase_of(self.frame);
		if next != phase {
			debug!("Animation phase {:?} -> {:?} at frame {}", phase, next, self.frame);
		}
		if next == Phase::Done {
			self.active = false;
			info!("Animation idle after {} frames", self.frame);
		} else {
			self.ticker.request_frame();
		}

		FrameReport {
			steps,
			draw: phase != Phase::Done,
		}
	}

	pub fn is_active(&self) -> bool {
		self.active
	}

	#[cfg(test)]
	fn frame(&self) -> u32 {
		self.frame
	}

	#[cfg(test)]
	fn ticker(&self) -> &T {
		&self.ticker
	}

	#[cfg(test)]
	fn ticker_mut(&mut self) -> &mut T {
		&mut self.ticker
	}
}
