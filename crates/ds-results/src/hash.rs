//! Content-based hashing for sweep IDs.

use crate::ResultsResult;
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Hash of the sweep definition and tool version.
///
/// Two sweeps with the same configuration share an ID, which makes repeated
/// runs of one sweep easy to group. A configuration that cannot be serialized
/// is an error rather than hashing as empty.
pub fn compute_sweep_id<C: Serialize>(config: &C, tool_version: &str) -> ResultsResult<String> {
    let mut hasher = Sha256::new();

    let config_json = serde_json::to_string(config)?;
    hasher.update(config_json.as_bytes());

    hasher.update(tool_version.as_bytes());

    let result = hasher.finalize();
    Ok(format!("{:x}", result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ResultsError;
    use std::collections::BTreeMap;

    #[derive(Serialize)]
    struct Sweep {
        base: &'static str,
        points: Vec<f64>,
    }

    #[test]
    fn hash_stability() {
        let sweep = Sweep {
            base: "air",
            points: vec![0.01, 0.02],
        };
        let hash1 = compute_sweep_id(&sweep, "v1").unwrap();
        let hash2 = compute_sweep_id(&sweep, "v1").unwrap();
        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn hash_differs_for_different_inputs() {
        let a = Sweep {
            base: "air",
            points: vec![0.01],
        };
        let b = Sweep {
            base: "air",
            points: vec![0.02],
        };
        let id = |s: &Sweep, v: &str| compute_sweep_id(s, v).unwrap();
        assert_ne!(id(&a, "v1"), id(&b, "v1"));
        assert_ne!(id(&a, "v1"), id(&a, "v2"));
    }

    #[test]
    fn unserializable_config_is_an_error() {
        // JSON object keys must be strings.
        let mut by_point = BTreeMap::new();
        by_point.insert(vec![1u8, 2], "air");
        let err = compute_sweep_id(&by_point, "v1").unwrap_err();
        assert!(matches!(err, ResultsError::Json(_)));
    }
}
