use json_rewrite::{Error, Key, Node, Path, Scalar, Table, Visit, is_map_like, walk, walk_path};
use serde_json::{Value, json};

fn tree(value: Value) -> Node {
    Node::from_json(value)
}

fn scale_direct_numbers(mut table: Table, factor: i64) -> Table {
    for (_, child) in table.iter_mut() {
        let scaled = match child {
            Node::Scalar(Scalar::Number(n)) => n.as_i64().map(|i| i * factor),
            _ => None,
        };
        if let Some(value) = scaled {
            *child = Node::from(value);
        }
    }
    table
}

#[test]
fn scales_maps_and_maps_inside_lists() {
    let input = tree(json!({"x": {"y": 1, "z": 2}, "list": [{"k": 1}, {"k": 2}]}));
    let mut visits: Vec<Path> = Vec::new();
    let out = walk(input, |node, path| {
        visits.push(path.clone());
        Visit::descend(scale_direct_numbers(node, 10))
    })
    .unwrap();

    assert_eq!(
        visits,
        vec![
            Path::from(vec![Key::from("x")]),
            Path::from(vec![Key::from("list"), Key::Index(0)]),
            Path::from(vec![Key::from("list"), Key::Index(1)]),
        ]
    );
    assert_eq!(
        Node::Table(out).into_json(),
        json!({"x": {"y": 10, "z": 20}, "list": [{"k": 10}, {"k": 20}]})
    );
}

#[test]
fn lists_of_lists_are_traversed_transparently() {
    let mut visits = Vec::new();
    walk(tree(json!({"m": [[{"a": 1}], [[{"b": 2}]]]})), |node, path| {
        visits.push(path.to_string());
        Visit::descend(node)
    })
    .unwrap();
    assert_eq!(visits, vec!["/m/0/0", "/m/1/0/0"]);
}

#[test]
fn replaced_node_gets_its_own_descendants_visited() {
    let mut visits = Vec::new();
    let out = walk(tree(json!({"cfg": {"ref": "base"}})), |node, path| {
        visits.push(path.to_string());
        if node.contains_key(&Key::from("ref")) {
            Visit::Keep(tree(json!({"resolved": {"ref2": null}, "items": [{"n": 1}]})))
        } else {
            Visit::descend(node)
        }
    })
    .unwrap();
    assert_eq!(visits, vec!["/cfg", "/cfg/resolved", "/cfg/items/0"]);
    assert_eq!(
        Node::Table(out).into_json(),
        json!({"cfg": {"resolved": {"ref2": null}, "items": [{"n": 1}]}})
    );
}

#[test]
fn deleting_every_map_leaves_list_scaffolding() {
    let out = walk(
        tree(json!({"a": {"b": 1}, "n": 3, "l": [1, [2, {"c": 1}], {"d": 4}]})),
        |_, _| Visit::Delete,
    )
    .unwrap();
    assert_eq!(Node::Table(out).into_json(), json!({"n": 3, "l": [1, [2]]}));
}

#[test]
fn holes_left_by_deletion_make_a_list_map_like() {
    let out = walk(tree(json!({"l": [{"gone": 1}, "kept"]})), |_, _| Visit::Delete).unwrap();
    let list = out.get(&Key::from("l")).unwrap();
    assert!(is_map_like(list));
    assert_eq!(Node::Table(out).into_json(), json!({"l": {"1": "kept"}}));
}

#[test]
fn path_walker_and_rewriter_compose() {
    let input = match tree(json!({"spec": {"containers": [{"name": "a", "env": {"X": 1}}]}})) {
        Node::Table(table) => table,
        Node::Scalar(_) => unreachable!(),
    };
    let stamped = walk_path(input, &Path::parse("/spec/containers/0"), |node| match node {
        Node::Table(mut table) if table.is_map_like() => {
            table.insert("stamped", true);
            Node::Table(table)
        }
        other => other,
    })
    .unwrap();
    let out = walk(Node::Table(stamped), |node, _| {
        if node.contains_key(&Key::from("X")) { Visit::Delete } else { Visit::descend(node) }
    })
    .unwrap();
    assert_eq!(
        Node::Table(out).into_json(),
        json!({"spec": {"containers": [{"name": "a", "stamped": true}], "stamped": true}})
    );
}

#[test]
fn scalar_roots_are_rejected() {
    assert!(matches!(
        walk(tree(json!("text")), |n, _| Visit::descend(n)),
        Err(Error::NotComposite { found: "string" })
    ));
}
