//! Shape checks between a record and its permission table.

use fieldgate_core::{FieldPath, Tree};

/// Paths of `data` that `perms` does not cover.
///
/// A permission leaf covers everything below it, and a data leaf facing a
/// permission branch counts as covered. Only missing keys are reported, in
/// data order, at the outermost missing position.
pub fn check_shape<V, P>(data: &Tree<V>, perms: &Tree<P>) -> Vec<FieldPath> {
    let mut missing = Vec::new();
    walk(data, perms, &FieldPath::root(), &mut missing);
    missing
}

fn walk<V, P>(data: &Tree<V>, perms: &Tree<P>, path: &FieldPath, missing: &mut Vec<FieldPath>) {
    let (Tree::Branch(data_children), Tree::Branch(perm_children)) = (data, perms) else {
        return;
    };
    for (key, child) in data_children {
        let child_path = path.child(key);
        match perm_children.get(key) {
            Some(perm_child) => walk(child, perm_child, &child_path, missing),
            None => missing.push(child_path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn data() -> Tree<serde_json::Value> {
        Tree::from_json(json!({
            "name": "Alice",
            "bio": "x",
            "address": { "city": "Oslo", "zip": "0150" }
        }))
    }

    #[test]
    fn test_isomorphic_tables_pass() {
        let perms: Tree<&str> = Tree::branch([
            ("name", Tree::leaf("R")),
            ("bio", Tree::leaf("R")),
            (
                "address",
                Tree::branch([("city", Tree::leaf("R")), ("zip", Tree::leaf("R"))]),
            ),
        ]);
        assert!(check_shape(&data(), &perms).is_empty());
    }

    #[test]
    fn test_reports_missing_paths_in_data_order() {
        let perms: Tree<&str> = Tree::branch([
            ("name", Tree::leaf("R")),
            ("address", Tree::branch([("city", Tree::leaf("R"))])),
        ]);
        let missing = check_shape(&data(), &perms);
        assert_eq!(missing, vec!["bio", "address.zip"]);
    }

    #[test]
    fn test_leaf_covers_subtree() {
        let perms: Tree<&str> = Tree::branch([
            ("name", Tree::leaf("R")),
            ("bio", Tree::leaf("R")),
            ("address", Tree::leaf("R")),
        ]);
        assert!(check_shape(&data(), &perms).is_empty());
    }

    #[test]
    fn test_extra_permission_keys_are_ignored() {
        let perms: Tree<&str> = Tree::branch([
            ("name", Tree::leaf("R")),
            ("bio", Tree::leaf("R")),
            ("address", Tree::leaf("R")),
            ("legacy", Tree::leaf("R")),
        ]);
        assert!(check_shape(&data(), &perms).is_empty());
    }
}
