//! Property tests over randomly shaped arenas.
//!
//! Trees are generated by attaching every new node under the root or an
//! earlier node, so every generated arena is valid by construction.

use lumen_ir::{Arena, NodeId, NodeType, NodeValue, SourceLocation, StructureEq, document};
use proptest::prelude::*;
use proptest::sample::Index;

#[derive(Debug, Clone)]
enum AttrSpec {
    Str(String),
    Num(f64),
    Bool(bool),
    Null,
    Array(Vec<Index>),
    Object(Vec<(String, Index)>),
}

#[derive(Debug, Clone)]
struct NodeSpec {
    parent: Index,
    node_type: Index,
    location: (u32, u32, u32, u32),
    attrs: Vec<(String, AttrSpec)>,
}

fn attr_spec() -> impl Strategy<Value = AttrSpec> {
    prop_oneof![
        "\\PC{0,12}".prop_map(AttrSpec::Str),
        (-1.0e12f64..1.0e12f64).prop_map(AttrSpec::Num),
        any::<bool>().prop_map(AttrSpec::Bool),
        Just(AttrSpec::Null),
        prop::collection::vec(any::<Index>(), 0..4).prop_map(AttrSpec::Array),
        prop::collection::vec(("[a-z]{1,5}", any::<Index>()), 0..4).prop_map(AttrSpec::Object),
    ]
}

fn node_spec() -> impl Strategy<Value = NodeSpec> {
    (
        any::<Index>(),
        any::<Index>(),
        (1u32..200, 1u32..120, 1u32..200, 1u32..120),
        prop::collection::vec(("[a-z]{1,6}", attr_spec()), 0..4),
    )
        .prop_map(|(parent, node_type, location, attrs)| NodeSpec {
            parent,
            node_type,
            location,
            attrs,
        })
}

/// Build an arena, returning it with ids in creation order.
fn build(specs: &[NodeSpec]) -> (Arena, Vec<NodeId>) {
    let mut arena = Arena::new();
    let mut ids = vec![arena.root_id()];
    for spec in specs {
        let node_type = NodeType::ALL[spec.node_type.index(NodeType::ALL.len())];
        let id = arena.create_node(node_type);
        let parent = ids[spec.parent.index(ids.len())];
        arena.add_child(parent, id).unwrap();
        let (sl, sc, el, ec) = spec.location;
        arena
            .set_location(id, SourceLocation::new(sl, sc, el, ec))
            .unwrap();
        ids.push(id);

        for (key, attr) in &spec.attrs {
            let pick = |index: &Index| ids[index.index(ids.len())];
            let value = match attr {
                AttrSpec::Str(s) => NodeValue::String(s.clone()),
                AttrSpec::Num(n) => NodeValue::Number(*n),
                AttrSpec::Bool(b) => NodeValue::Boolean(*b),
                AttrSpec::Null => NodeValue::Null,
                AttrSpec::Array(items) => NodeValue::ArrayRef(items.iter().map(pick).collect()),
                AttrSpec::Object(entries) => {
                    NodeValue::object_ref(entries.iter().map(|(k, i)| (k.clone(), pick(i))))
                }
            };
            arena.set_attribute(id, key.clone(), value).unwrap();
        }
    }
    (arena, ids)
}

proptest! {
    #[test]
    fn tree_invariant_holds(specs in prop::collection::vec(node_spec(), 0..60)) {
        let (arena, _) = build(&specs);
        prop_assert!(arena.validate().is_ok());
        prop_assert_eq!(arena.root().parent(), None);
        for node in arena.iter().filter(|n| n.id() != arena.root_id()) {
            let parent = arena.get(node.parent().unwrap()).unwrap();
            let count = parent.children().iter().filter(|c| **c == node.id()).count();
            prop_assert_eq!(count, 1);
        }
    }

    #[test]
    fn ids_are_strictly_increasing(specs in prop::collection::vec(node_spec(), 0..60)) {
        let (arena, ids) = build(&specs);
        prop_assert!(ids.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(ids.iter().all(|id| *id < arena.next_id()));
        prop_assert_eq!(ids.len(), arena.len());
    }

    #[test]
    fn round_trip_is_isomorphic(specs in prop::collection::vec(node_spec(), 0..60)) {
        let (arena, _) = build(&specs);
        let bytes = document::to_canonical_bytes(&arena);
        let decoded = document::from_slice(&bytes).unwrap();
        prop_assert!(arena.structure_eq(&decoded));
        prop_assert_eq!(decoded.next_id(), arena.next_id());
        prop_assert_eq!(document::to_canonical_bytes(&decoded), bytes);
    }

    #[test]
    fn serialization_is_deterministic(specs in prop::collection::vec(node_spec(), 0..60)) {
        let (arena, _) = build(&specs);
        let (rebuilt, _) = build(&specs);
        let first = document::to_canonical_bytes(&arena);
        prop_assert_eq!(&first, &document::to_canonical_bytes(&arena));
        prop_assert_eq!(&first, &document::to_canonical_bytes(&rebuilt));
    }
}
