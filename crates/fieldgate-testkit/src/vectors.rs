//! Golden test vectors for the shorthand codec and role merge.
//!
//! These vectors pin the canonical text form so that any client reading or
//! writing shorthand agrees with the engine.

use fieldgate_core::{merge, Permission, Shorthand};

/// A golden shorthand vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Shorthand inputs, as written in configuration.
    pub inputs: &'static [&'static str],
    /// Expected merged shorthand in canonical order.
    pub expected: &'static str,
    /// Expected permissions in canonical order.
    pub permissions: &'static [Permission],
}

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    use Permission::*;

    vec![
        GoldenVector {
            name: "no inputs",
            inputs: &[],
            expected: "",
            permissions: &[],
        },
        GoldenVector {
            name: "empty shorthand",
            inputs: &[""],
            expected: "",
            permissions: &[],
        },
        GoldenVector {
            name: "full access",
            inputs: &["CRUD"],
            expected: "CRUD",
            permissions: &[Create, Read, Update, Delete],
        },
        GoldenVector {
            name: "reversed order is canonicalized",
            inputs: &["DURC"],
            expected: "CRUD",
            permissions: &[Create, Read, Update, Delete],
        },
        GoldenVector {
            name: "duplicates collapse",
            inputs: &["RRUR"],
            expected: "RU",
            permissions: &[Read, Update],
        },
        GoldenVector {
            name: "admin and user roles",
            inputs: &["CR", "U"],
            expected: "CRU",
            permissions: &[Create, Read, Update],
        },
        GoldenVector {
            name: "write without read",
            inputs: &["CUD"],
            expected: "CUD",
            permissions: &[Create, Update, Delete],
        },
        GoldenVector {
            name: "overlapping roles",
            inputs: &["RU", "R", "UD"],
            expected: "RUD",
            permissions: &[Read, Update, Delete],
        },
        GoldenVector {
            name: "read only",
            inputs: &["R", ""],
            expected: "R",
            permissions: &[Read],
        },
    ]
}

/// Merge a vector's inputs.
///
/// Returns `None` if any input is not valid shorthand.
pub fn merge_vector(vector: &GoldenVector) -> Option<Shorthand> {
    let parsed: Option<Vec<Shorthand>> = vector.inputs.iter().map(|s| s.parse().ok()).collect();
    parsed.map(merge)
}

/// Verify every vector. Returns the names of the vectors that failed.
pub fn verify_all_vectors() -> Vec<&'static str> {
    all_vectors()
        .into_iter()
        .filter(|vector| {
            let Some(merged) = merge_vector(vector) else {
                return true;
            };
            merged.to_string() != vector.expected
                || merged.permissions().to_vec() != vector.permissions
        })
        .map(|vector| vector.name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_vectors_pass() {
        assert_eq!(verify_all_vectors(), Vec::<&str>::new());
    }

    #[test]
    fn test_vector_names_unique() {
        let vectors = all_vectors();
        let mut names: Vec<_> = vectors.iter().map(|v| v.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), vectors.len());
    }

    #[test]
    fn test_invalid_input_is_reported() {
        let vector = GoldenVector {
            name: "bad letter",
            inputs: &["CRX"],
            expected: "CR",
            permissions: &[],
        };
        assert!(merge_vector(&vector).is_none());
    }
}
