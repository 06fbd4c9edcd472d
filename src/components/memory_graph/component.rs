use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent};

use super::render;
use super::scene::Scene;
use super::scheduler::{AnimationScheduler, Phase, Ticker};
use super::simulation::ForceSimulation;
use super::types::GraphData;
use super::viewport::Viewport;
use crate::config::GraphConfig;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// [`Ticker`] backed by `requestAnimationFrame`.
struct RafTicker {
	callback: FrameCallback,
	handle: Option<i32>,
}

impl RafTicker {
	fn new(callback: FrameCallback) -> Self {
		Self {
			callback,
			handle: None,
		}
	}
}

impl Ticker for RafTicker {
	fn request_frame(&mut self) {
		let Some(window) = web_sys::window() else {
			return;
		};
		if let Some(ref cb) = *self.callback.borrow() {
			match window.request_animation_frame(cb.as_ref().unchecked_ref()) {
				Ok(id) => self.handle = Some(id),
				Err(err) => warn!("requestAnimationFrame failed: {:?}", err),
			}
		}
	}

	fn cancel_frame(&mut self) {
		if let (Some(id), Some(window)) = (self.handle.take(), web_sys::window()) {
			let _ = window.cancel_animation_frame(id);
		}
	}
}

struct GraphSession {
	simulation: ForceSimulation,
	scheduler: AnimationScheduler<RafTicker>,
	ctx: CanvasRenderingContext2d,
	width: f64,
	height: f64,
	/// Physics steps taken since the last (re)start.
	steps: u32,
}

impl GraphSession {
	fn draw(&self, viewport: &Viewport, config: &GraphConfig) {
		let scene = Scene::capture(&self.simulation, &config.style);
		let transform = viewport.transform(self.width, self.height);
		render::render(
			&scene,
			&transform,
			&config.style,
			self.width,
			self.height,
			&self.ctx,
		);
	}
}

/// Shared between the frame callback, the zoom buttons and cleanup.
#[derive(Clone, Default)]
struct GraphHandle {
	session: Rc<RefCell<Option<GraphSession>>>,
	animate: FrameCallback,
	resize: FrameCallback,
}

impl GraphHandle {
	/// Cancel the pending frame before any state is replaced or dropped.
	fn shutdown(&self) {
		if let Some(ref mut s) = *self.session.borrow_mut() {
			s.scheduler.stop();
		}
		self.session.borrow_mut().take();
		self.animate.borrow_mut().take();
		if let Some(cb) = self.resize.borrow_mut().take() {
			if let Some(window) = web_sys::window() {
				let _ = window
					.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}
	}

	/// Draws once when the scheduler is idle; a running scheduler draws on
	/// its next frame anyway.
	fn redraw_if_idle(&self, viewport: &Viewport, config: &GraphConfig) {
		if let Some(ref s) = *self.session.borrow() {
			if !s.scheduler.is_active() {
				s.draw(viewport, config);
			}
		}
	}
}

fn canvas_size(canvas: &HtmlCanvasElement, width: Option<f64>, height: Option<f64>) -> (f64, f64) {
	let parent = canvas.parent_element();
	(
		width.unwrap_or_else(|| {
			parent
				.as_ref()
				.map(|p| p.client_width() as f64)
				.filter(|w| *w > 0.0)
				.unwrap_or(800.0)
		}),
		height.unwrap_or_else(|| {
			parent
				.as_ref()
				.map(|p| p.client_height() as f64)
				.filter(|h| *h > 0.0)
				.unwrap_or(600.0)
		}),
	)
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas
		.get_context("2d")
		.ok()
		.flatten()
		.and_then(|ctx| ctx.dyn_into().ok())
}

#[component]
pub fn MemoryGraphCanvas(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(default = GraphConfig::default())] config: GraphConfig,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let config = match config.validate() {
		Ok(()) => config,
		Err(err) => {
			warn!("Invalid graph config, using defaults: {}", err);
			GraphConfig::default()
		}
	};
	let config = Rc::new(config);
	let viewport = RwSignal::new(Viewport::new(config.zoom));
	let handle = GraphHandle::default();

	// Leaving the graph view unmounts this component; nothing may stay queued.
	let stored = StoredValue::new_local(handle.clone());
	on_cleanup(move || {
		let _ = stored.try_with_value(GraphHandle::shutdown);
	});

	let (handle_init, config_init) = (handle.clone(), config.clone());
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let data = data.get();
		handle_init.shutdown();

		let canvas: HtmlCanvasElement = canvas.into();
		let (w, h) = canvas_size(&canvas, width, height);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);
		let Some(ctx) = context_2d(&canvas) else {
			warn!("Canvas 2d context unavailable");
			return;
		};

		let seed = (js_sys::Math::random() * u32::MAX as f64) as u64;
		let simulation = ForceSimulation::seeded(&data, w, h, config_init.simulation, seed);
		let scheduler = AnimationScheduler::new(
			RafTicker::new(handle_init.animate.clone()),
			config_init.schedule,
		);

		let (session_anim, config_anim) = (handle_init.session.clone(), config_init.clone());
		*handle_init.animate.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut s) = *session_anim.borrow_mut() {
				let report = s.scheduler.on_frame(&mut s.simulation);
				s.steps += report.steps;
				if report.draw {
					s.draw(&viewport.get_untracked(), &config_anim);
				}
				if !s.scheduler.is_active() {
					debug!("Layout idle after {} physics steps", s.steps);
				}
			}
		}));

		let mut session = GraphSession {
			simulation,
			scheduler,
			ctx,
			width: w,
			height: h,
			steps: 0,
		};
		session.draw(&viewport.get_untracked(), &config_init);
		let node_count = session.simulation.state().nodes.len();
		if !session.scheduler.start(node_count) {
			info!("Empty graph, animation not started");
		}
		*handle_init.session.borrow_mut() = Some(session);

		// Fixed dimensions never change; otherwise follow the parent on window resize.
		if width.is_none() || height.is_none() {
			let (session_resize, config_resize) = (handle_init.session.clone(), config_init.clone());
			let on_resize = Closure::<dyn FnMut()>::new(move || {
				let (nw, nh) = canvas_size(&canvas, width, height);
				if let Some(ref mut s) = *session_resize.borrow_mut() {
					if (nw, nh) == (s.width, s.height) {
						return;
					}
					canvas.set_width(nw as u32);
					canvas.set_height(nh as u32);
					s.width = nw;
					s.height = nh;
					s.simulation.resize(nw, nh);
					// A settled layout has to move again to respect the new bounds.
					if s.scheduler.phase() == Phase::Done {
						s.steps = 0;
						s.scheduler.start(s.simulation.state().nodes.len());
					}
					s.draw(&viewport.get_untracked(), &config_resize);
				}
			});
			if let Some(window) = web_sys::window() {
				if let Err(err) = window
					.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())
				{
					warn!("Resize listener not installed: {:?}", err);
				}
			}
			*handle_init.resize.borrow_mut() = Some(on_resize);
		}
	});

	let (handle_in, config_in) = (handle.clone(), config.clone());
	let on_zoom_in = move |_: MouseEvent| {
		viewport.update(Viewport::zoom_in);
		handle_in.redraw_if_idle(&viewport.get_untracked(), &config_in);
	};
	let (handle_out, config_out) = (handle, config);
	let on_zoom_out = move |_: MouseEvent| {
		viewport.update(Viewport::zoom_out);
		handle_out.redraw_if_idle(&viewport.get_untracked(), &config_out);
	};

	view! {
		<div class="memory-graph">
			<canvas node_ref=canvas_ref class="memory-graph-canvas" style="display: block;" />
			<div class="zoom-controls">
				<button on:click=on_zoom_out disabled=move || !viewport.get().can_zoom_out()>
					"-"
				</button>
				<span class="zoom-level">
					{move || format!("{:.0}%", viewport.get().zoom() * 100.0)}
				</span>
				<button on:click=on_zoom_in disabled=move || !viewport.get().can_zoom_in()>
					"+"
				</button>
			</div>
		</div>
	}
}
