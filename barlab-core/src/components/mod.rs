//! Strategy components.
//!
//! A strategy is a single signal generator: a stateless rule from bars to
//! per-bar signals. The factory turns serializable configs into generators.

pub mod factory;
pub mod signal;

pub use factory::{create_signal, FactoryError, SIGNAL_TYPES};
pub use signal::{ParamError, SignalGenerator};
