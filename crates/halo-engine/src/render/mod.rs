//! Per-frame geometry accumulation.
//!
//! A [`RenderList`] collects vertices and [`Batch`]es for one paint layer while
//! application code issues draw calls. Nothing touches the GPU until the
//! renderer drains the list through the [`Submit`](crate::backend::Submit)
//! contract at the end of the frame.
//!
//! Convention:
//! - positions are surface pixels (top-left origin, +Y down), z = 0
//! - colours are normalized straight alpha
//! - filled shapes are emitted clockwise on screen; the pipeline culls back faces

mod batch;
mod list;
mod projection;
mod text;
mod vertex;

pub mod shapes;

pub use batch::{Batch, Topology};
pub use list::{RenderList, MAX_VERTICES};
pub use projection::orthographic_off_center;
pub use vertex::Vertex;
