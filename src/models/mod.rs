//! Core data models for the debt model
//!
//! Persisted rows ([`Characteristic`], [`Rule`]) and the transient shapes
//! exchanged with XML ([`DebtModel`], [`DebtCharacteristic`], [`RuleDebt`]).

pub mod characteristic;
pub mod duration;
pub mod ids;
pub mod model;
pub mod remediation;
pub mod rule;

pub use characteristic::{Characteristic, DebtCharacteristic};
pub use duration::{Duration, DurationUnit};
pub use ids::{CharacteristicId, RuleId};
pub use model::DebtModel;
pub use remediation::{FunctionType, RemediationFunction, RuleDebt, RuleKey};
pub use rule::{EffectiveRemediation, Rule, RuleStatus, MANUAL_REPOSITORY_KEY};
