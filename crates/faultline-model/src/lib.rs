mod domain;
pub use domain::{Labels, Phase};

mod entity;
pub use entity::Entity;

mod node;
pub use node::Node;

mod mode;
pub use mode::SelectionMode;

mod spec;
pub use spec::TargetSpec;

mod error;
pub use error::{ModelError, ModelResult};
