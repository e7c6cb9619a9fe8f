//! Graph payload structures consumed by the force graph component.
//!
//! The payload is the `{ nodes, links }` document produced by the data
//! collaborator. Missing or `null` collections decode as empty so a partial
//! payload degrades to "no data" instead of failing.

use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// Group value that marks a node as a category hub.
pub const CATEGORY_GROUP: &str = "category";

/// A node in the payload.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
	/// Unique identifier for this node. Used to reference nodes in links.
	pub id: String,
	/// Optional display label. Falls back to `id` when absent.
	#[serde(default)]
	pub name: Option<String>,
	/// Categorical tag. [`CATEGORY_GROUP`] marks a category hub.
	#[serde(default)]
	pub group: Option<String>,
	/// Explicit category flag emitted by some producers alongside `group`.
	#[serde(default)]
	pub is_category: bool,
	/// Path of the media item this node stands for.
	#[serde(default)]
	pub filepath: Option<String>,
	/// Free-form description shown in the tooltip.
	#[serde(default)]
	pub description: Option<String>,
	/// Comma-separated tag list shown in the tooltip.
	#[serde(default)]
	pub tags: Option<String>,
}

impl GraphNode {
	/// Whether this node is a category hub rather than an item.
	pub fn is_category(&self) -> bool {
		self.is_category || self.group.as_deref() == Some(CATEGORY_GROUP)
	}
}

/// An edge between two nodes, by id.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphLink {
	/// Source node ID.
	pub source: String,
	/// Target node ID.
	pub target: String,
	/// Link between an item and its category hub.
	#[serde(default)]
	pub is_category_link: bool,
}

/// Complete graph data: nodes and links.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct GraphData {
	/// Nodes in producer order.
	#[serde(default, deserialize_with = "empty_if_null")]
	pub nodes: Vec<GraphNode>,
	/// Links in producer order; may reference ids missing from `nodes`.
	#[serde(default, deserialize_with = "empty_if_null")]
	pub links: Vec<GraphLink>,
}

/// Reasons a payload could not be turned into [`GraphData`].
#[derive(Debug, Error)]
pub enum PayloadError {
	/// The host page carries no payload.
	#[error("graph payload is missing")]
	Missing,
	/// The payload is not a JSON object of the expected shape.
	#[error("graph payload is malformed: {0}")]
	Malformed(#[from] serde_json::Error),
	/// The producer reported a failure instead of data.
	#[error("graph producer reported a failure: {0}")]
	Rejected(String),
}

#[derive(Deserialize)]
struct Envelope {
	#[serde(default)]
	success: Option<bool>,
	#[serde(default)]
	error: Option<String>,
	#[serde(flatten)]
	data: GraphData,
}

/// Parse a JSON payload into [`GraphData`].
pub fn parse_payload(json: &str) -> Result<GraphData, PayloadError> {
	let envelope: Envelope = serde_json::from_str(json)?;
	if envelope.success == Some(false) {
		return Err(PayloadError::Rejected(
			envelope.error.unwrap_or_else(|| "unknown error".to_string()),
		));
	}
	Ok(envelope.data)
}

fn empty_if_null<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
	D: Deserializer<'de>,
	T: Deserialize<'de>,
{
	Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
