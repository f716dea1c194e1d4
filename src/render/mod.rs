//! Card composition: layout planning and rasterisation.

mod card;
mod paint;

pub use card::{Card, PageError, PageNumber};
pub use paint::{BlockKind, CardPlan, CardRenderer, PlacedBlock};
