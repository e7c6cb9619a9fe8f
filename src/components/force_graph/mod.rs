//! Force-directed graph visualization component.
//!
//! Renders an interactive force-directed graph on an HTML canvas with:
//! - A force simulation (link springs, Barnes-Hut charge, centering, collision)
//! - Pan, zoom and node dragging interactions
//! - Hover picking that pauses the layout, with a tooltip overlay
//! - Click activation of item nodes
//! - Configurable theming and visual scaling
//!
//! Everything except the canvas component and the renderer is plain Rust and
//! can be driven without a browser.
//!
//! # Example
//!
//! ```ignore
//! use nebula_graph::{ForceGraphCanvas, GraphData, GraphNode, GraphLink};
//!
//! let data = GraphData {
//!     nodes: vec![
//!         GraphNode { id: "CAT_beach".into(), group: Some("category".into()), ..Default::default() },
//!         GraphNode { id: "img1".into(), name: Some("sunset.jpg".into()), ..Default::default() },
//!     ],
//!     links: vec![
//!         GraphLink { source: "img1".into(), target: "CAT_beach".into(), is_category_link: true },
//!     ],
//! };
//!
//! view! { <ForceGraphCanvas data=data fullscreen=true /> }
//! ```

mod component;
pub mod interaction;
pub mod model;
mod quadtree;
mod render;
pub mod scale;
pub mod simulation;
pub mod state;
pub mod theme;
pub mod types;
pub mod viewport;

pub use component::{DEFAULT_MEDIA_ENDPOINT, ForceGraphCanvas, TooltipView, media_url};
pub use interaction::{HoverChange, InteractionController, NodeActivation, hit_test};
pub use model::WorkingGraph;
pub use simulation::{SimPhase, Simulation, SimulationConfig};
pub use state::{ForceGraphState, GraphSettings};
pub use theme::Theme;
pub use types::{GraphData, GraphLink, GraphNode, PayloadError, parse_payload};
pub use viewport::{ScaleExtent, ScreenPoint, SimPoint, ViewTransform, ZoomGesture};
