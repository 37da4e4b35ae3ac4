//! Built-in scenarios and their coroutine bodies.

pub mod counter;
pub mod echo;
pub mod multiply;
pub mod range;
pub mod relay;
pub mod yield_once;

pub use counter::{Counter, CounterScenario};
pub use echo::{Echo, EchoScenario};
pub use multiply::{Multiply, MultiplyScenario};
pub use range::{Range, RangeScenario};
pub use relay::{build_chain, Relay, RelayScenario};
pub use yield_once::{YieldOnce, YieldOnceScenario};

use crate::contract::Scenario;
use crate::error::HarnessError;

/// Every built-in scenario with its default parameters, in a fixed order.
#[must_use]
pub fn all() -> Vec<Box<dyn Scenario>> {
    vec![
        Box::new(YieldOnceScenario),
        Box::new(CounterScenario::default()),
        Box::new(RangeScenario::default()),
        Box::new(EchoScenario::default()),
        Box::new(MultiplyScenario::default()),
        Box::new(RelayScenario),
    ]
}

/// Look up a built-in scenario by id.
///
/// # Errors
///
/// Returns [`HarnessError::UnknownScenario`] if no scenario has that id.
pub fn scenario_by_id(id: &str) -> Result<Box<dyn Scenario>, HarnessError> {
    all()
        .into_iter()
        .find(|s| s.scenario_id() == id)
        .ok_or_else(|| HarnessError::UnknownScenario { id: id.to_string() })
}
