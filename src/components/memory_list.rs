//! Read-only list view of memory records.

use leptos::prelude::*;

use crate::components::memory_graph::NodeCategory;
use crate::provider::MemoryRecord;

/// Records whose content contains `query` (case-insensitive) and whose kind
/// matches `kind` when given, newest first.
pub fn filter_records<'a>(
	records: &'a [MemoryRecord],
	query: &str,
	kind: Option<NodeCategory>,
) -> Vec<&'a MemoryRecord> {
	let query = query.trim().to_lowercase();
	let mut matched: Vec<&MemoryRecord> = records
		.iter()
		.filter(|r| kind.is_none_or(|k| r.kind == k))
		.filter(|r| query.is_empty() || r.content.to_lowercase().contains(&query))
		.collect();
	matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
	matched
}

/// Row identity for the list. Includes the content so a reload that reuses
/// ids with new records re-renders those rows.
fn row_key(r: &MemoryRecord) -> (String, String, String, u64) {
	(
		r.id.clone(),
		r.content.clone(),
		r.created_at.clone(),
		r.importance.to_bits(),
	)
}

fn parse_kind(value: &str) -> Option<NodeCategory> {
	match value {
		"" => None,
		other => Some(NodeCategory::from(other)),
	}
}

#[component]
pub fn MemoryList(#[prop(into)] records: Signal<Vec<MemoryRecord>>) -> impl IntoView {
	let query = RwSignal::new(String::new());
	let kind = RwSignal::new(String::new());

	let visible = move || {
		records.with(|all| {
			filter_records(all, &query.get(), parse_kind(&kind.get()))
				.into_iter()
				.cloned()
				.collect::<Vec<_>>()
		})
	};

	view! {
		<div class="memory-list">
			<div class="memory-filters">
				<input
					type="search"
					placeholder="Filter memories"
					prop:value=move || query.get()
					on:input=move |ev| query.set(event_target_value(&ev))
				/>
				<select on:change=move |ev| kind.set(event_target_value(&ev))>
					<option value="">"All"</option>
					<option value="fact">"Facts"</option>
					<option value="conversation">"Conversations"</option>
					<option value="other">"Other"</option>
				</select>
			</div>
			<ul>
				<For each=visible key=row_key let:record>
					<li class=format!("memory memory-{}", record.kind.as_str())>
						<span class="memory-content">{record.content.clone()}</span>
						<span class="memory-meta">
							{format!("{} · {:.2}", record.created_at, record.importance)}
						</span>
					</li>
				</For>
			</ul>
		</div>
	}
}
