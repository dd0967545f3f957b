//! Deep merge algorithm for layered YAML configuration.
//!
//! The system config, the user config and an explicit `--config` file are
//! merged in that order before deserialisation.
//!
//! # Merge Rules
//!
//! - Mappings are merged recursively
//! - Sequences are replaced entirely (not merged)
//! - Null values in overlay delete the corresponding key from base
//! - Scalars in overlay replace scalars in base

use serde_yaml::{Mapping, Value};

/// Merge `overlay` into `base` in place.
pub fn merge_into(base: &mut Value, overlay: Value) {
    let Value::Mapping(overlay) = overlay else {
        *base = overlay;
        return;
    };
    let Value::Mapping(target) = base else {
        *base = Value::Mapping(overlay);
        return;
    };

    for (key, value) in overlay {
        if value.is_null() {
            target.remove(&key);
            continue;
        }
        match target.get_mut(&key) {
            Some(existing) => merge_into(existing, value),
            None => {
                target.insert(key, value);
            }
        }
    }
}

/// Merge two YAML values, `overlay` winning at every conflict.
pub fn deep_merge(base: &Value, overlay: &Value) -> Value {
    let mut merged = base.clone();
    merge_into(&mut merged, overlay.clone());
    merged
}

/// Merge config layers in order, later layers winning.
pub fn merge_configs(configs: &[Value]) -> Value {
    let mut merged = Value::Mapping(Mapping::new());
    for layer in configs {
        merge_into(&mut merged, layer.clone());
    }
    merged
}
