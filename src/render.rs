use serde_json::{Map, Value, json};

use crate::core::SmartChargeState;

/// Render the state the way the smart charge entity exposes it.
#[must_use]
pub fn render_sensor(state: &SmartChargeState) -> Value {
    json!({
        "name": state.name,
        "state": if state.is_charging { "on" } else { "off" },
        "attributes": render_attributes(state),
    })
}

/// Flatten the selection into `next_hour` and `other_hour_N` attributes.
///
/// All `count` slots are always present, unfilled ones are `null`.
#[must_use]
pub fn render_attributes(state: &SmartChargeState) -> Map<String, Value> {
    let mut attributes = Map::new();
    attributes.insert("count".to_string(), json!(state.count));
    attributes.insert("done_before_hour".to_string(), json!(state.before_hour));
    attributes.insert(
        "next_hour".to_string(),
        json!(state.next_hour.map(|quote| quote.timestamp.to_rfc3339())),
    );
    attributes
        .insert("next_hour_price".to_string(), json!(state.next_hour.map(|quote| quote.price)));
    for index in 1..state.count {
        let quote = state.other_hours.get(index - 1);
        attributes.insert(
            format!("other_hour_{index}"),
            json!(quote.map(|quote| quote.timestamp.to_rfc3339())),
        );
        attributes
            .insert(format!("other_hour_{index}_price"), json!(quote.map(|quote| quote.price)));
    }
    attributes
}
