mod labels;
pub use labels::Labels;

mod phase;
pub use phase::Phase;
