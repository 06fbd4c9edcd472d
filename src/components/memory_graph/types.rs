use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeCategory {
	Fact,
	Conversation,
	#[default]
	#[serde(other)]
	Other,
}

impl NodeCategory {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Fact => "fact",
			Self::Conversation => "conversation",
			Self::Other => "other",
		}
	}
}

impl From<&str> for NodeCategory {
	fn from(s: &str) -> Self {
		match s {
			"fact" => Self::Fact,
			"conversation" => Self::Conversation,
			_ => Self::Other,
		}
	}
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
	pub id: String,
	pub label: String,
	#[serde(default)]
	pub category: NodeCategory,
	#[serde(default)]
	pub importance: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
	pub source: String,
	pub target: String,
	#[serde(default)]
	pub label: String,
}

/// One snapshot from the graph provider.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	pub edges: Vec<GraphEdge>,
}
