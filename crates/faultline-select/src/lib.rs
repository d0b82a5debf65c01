//! Targeting core of a fault-injection controller.
//!
//! Given a declarative [`TargetSpec`](faultline_model::TargetSpec) and a
//! [`CandidateProvider`], the [`Selector`] pipeline filters the live entity
//! pool down to the matching subset and the [`Sampler`] draws the final
//! victim set according to the spec's selection mode.

pub mod error;
pub use error::{ProviderError, SelectError};

pub mod requirement;
pub use requirement::{Expression, Operator, Requirement};

pub mod provider;
pub use provider::CandidateProvider;

pub mod policy;
pub use policy::NamespacePolicy;

pub mod pipeline;
pub use pipeline::Selector;

pub mod sample;
pub use sample::Sampler;

pub mod membership;
pub use membership::meets;

pub mod prelude {
    pub use crate::error::{ProviderError, SelectError};
    pub use crate::membership::meets;
    pub use crate::pipeline::Selector;
    pub use crate::policy::NamespacePolicy;
    pub use crate::provider::CandidateProvider;
    pub use crate::sample::Sampler;
}
