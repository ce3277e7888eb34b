//! Game rules for a pair matching card game: dealing, turn resolution,
//! scoring and the records kept between sessions.
#![no_std]

extern crate alloc;

pub use card::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use records::*;
pub use schedule::*;
pub use scoring::*;
pub use settings::*;
pub use store::*;
pub use timeline::*;
pub use types::*;

mod card;
mod engine;
mod error;
mod generator;
mod records;
mod schedule;
mod scoring;
mod settings;
mod store;
mod timeline;
mod types;
