//! Recording layer: collects draws, orders them and turns them into one
//! command stream through a [`DrawWriter`](crate::draw_writer::DrawWriter).

mod draw_list;
mod key;
mod recorder;

pub use draw_list::{Draw, DrawList, Paint, Rejected};
pub use key::SortKey;
pub use recorder::{DrawPass, PassStats, TextureSet};
