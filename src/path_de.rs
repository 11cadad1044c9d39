use serde::de::DeserializeOwned;
use crate::error::{Error, Result};
use crate::node::Node;

/// Deserialize a tree into `T`, with the JSON path of the failing field in the error.
pub fn from_node<T: DeserializeOwned>(node: Node) -> Result<T> {
    serde_path_to_error::deserialize::<_, T>(node.into_json()).map_err(|err| Error::Deserialize {
        path: err.path().to_string(),
        source: err.into_inner(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Release {
        tag: String,
        assets: Vec<Asset>,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Asset {
        size: u64,
    }

    #[test]
    fn reads_typed_values_back() {
        let node = Node::from_json(json!({"tag": "v1", "assets": [{"size": 3}]}));
        let release: Release = from_node(node).unwrap();
        assert_eq!(release, Release { tag: "v1".into(), assets: vec![Asset { size: 3 }] });
    }

    #[test]
    fn error_names_the_failing_path() {
        let node = Node::from_json(json!({"tag": "v1", "assets": [{"size": "big"}]}));
        let err = from_node::<Release>(node).unwrap_err();
        match &err {
            Error::Deserialize { path, .. } => assert_eq!(path, "assets[0].size"),
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().starts_with("at JSON path assets[0].size"));
    }
}
