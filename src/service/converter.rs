//! State conversion policies.

use serde_json::Value;

use crate::service::state::RequestStore;

/// Turns the current request state into the payload a controller works from.
pub trait StateConverter: Send + Sync + std::fmt::Debug + 'static {
    /// Name reported in service snapshots.
    fn name(&self) -> &'static str;

    fn export(&self, store: &RequestStore) -> Value;
}

/// Exports the full service state object.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultStateExporter;

impl StateConverter for DefaultStateExporter {
    fn name(&self) -> &'static str {
        "DefaultStateExporter"
    }

    fn export(&self, store: &RequestStore) -> Value {
        store.state().to_json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::state::ServiceState;
    use serde_json::json;

    #[test]
    fn test_default_exporter_sees_latest_state() {
        let state = ServiceState::default();
        state.set("currentUserName", "Jaymoney");
        let store = RequestStore::new(state.clone());

        let exporter = DefaultStateExporter;
        assert_eq!(exporter.export(&store), json!({ "currentUserName": "Jaymoney" }));

        state.set("currentUserName", "AnadaOne");
        assert_eq!(exporter.export(&store)["currentUserName"], "AnadaOne");
    }
}
