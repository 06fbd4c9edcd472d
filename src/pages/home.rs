use leptos::prelude::*;
use log::warn;

use crate::components::memory_graph::{GraphData, MemoryGraphCanvas};
use crate::components::memory_list::MemoryList;
use crate::config::GraphConfig;
use crate::error::{Error, Result};
use crate::provider::{GraphProvider, MemoryRecord, SampleProvider, graph_from_records};

const GRAPH_CONFIG: &str = include_str!("../../assets/graph.json");
const SAMPLE_SIZE: usize = 40;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ViewMode {
	List,
	Graph,
}

#[derive(Clone, Debug, Default, PartialEq)]
struct MemorySnapshot {
	records: Vec<MemoryRecord>,
	graph: GraphData,
}

fn load_snapshot(seed: u64) -> Result<MemorySnapshot> {
	let records = SampleProvider {
		seed,
		count: SAMPLE_SIZE,
	}
	.memories()?;
	let graph = graph_from_records(&records)?;
	Ok(MemorySnapshot { records, graph })
}

/// Memory store page: list or graph of the same records.
#[component]
pub fn Home() -> impl IntoView {
	let mode = RwSignal::new(ViewMode::Graph);
	let seed = RwSignal::new(1u64);

	let config = GraphConfig::from_json(GRAPH_CONFIG).map_err(|e| {
		warn!("Rejected graph config: {}", e);
		e.to_string()
	});

	let snapshot = Memo::new(move |_| {
		load_snapshot(seed.get()).map_err(|e| {
			warn!("Loading memories failed: {}", e);
			e.to_string()
		})
	});
	// Only flips when the error itself changes, so a reload keeps the view mounted.
	let load_error = Memo::new(move |_| snapshot.with(|s| s.as_ref().err().cloned()));
	let records = Signal::derive(move || {
		snapshot.with(|s| s.as_ref().map(|s| s.records.clone()).unwrap_or_default())
	});
	let graph = Signal::derive(move || {
		snapshot.with(|s| s.as_ref().map(|s| s.graph.clone()).unwrap_or_default())
	});

	let body = move || -> Result<AnyView> {
		let config = config.clone().map_err(Error::Config)?;
		if let Some(err) = load_error.get() {
			return Err(Error::Provider(err));
		}
		Ok(match mode.get() {
			ViewMode::List => view! { <MemoryList records=records /> }.into_any(),
			ViewMode::Graph => view! { <MemoryGraphCanvas data=graph config=config /> }.into_any(),
		})
	};

	view! {
		<div class="memory-page">
			<nav class="toolbar">
				<button
					class:active=move || mode.get() == ViewMode::List
					on:click=move |_| mode.set(ViewMode::List)
				>
					"List"
				</button>
				<button
					class:active=move || mode.get() == ViewMode::Graph
					on:click=move |_| mode.set(ViewMode::Graph)
				>
					"Graph"
				</button>
				<button on:click=move |_| seed.update(|s| *s += 1)>"Reload"</button>
			</nav>

			<ErrorBoundary fallback=|errors| {
				view! {
					<h1>"Uh oh! Something went wrong!"</h1>

					<p>"Errors: "</p>
					<ul>
						{move || {
							errors
								.get()
								.into_iter()
								.map(|(_, e)| view! { <li>{e.to_string()}</li> })
								.collect_view()
						}}
					</ul>
				}
			}>
				<div class="memory-view">{body}</div>
			</ErrorBoundary>
		</div>
	}
}
