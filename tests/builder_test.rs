//! Tests for TreeBuilder

use rstest::rstest;

use domnav::domain::{BuildEvent, DomainError, TreeBuilder};
use BuildEvent::Pop;

fn create(value: &str) -> BuildEvent {
    BuildEvent::create(value)
}

#[test]
fn given_closed_event_sequence_when_building_then_reproduces_shape() {
    // Arrange
    let events = vec![
        create("A"),
        create("B"),
        create("D"),
        Pop,
        Pop,
        create("C"),
        Pop,
        Pop,
    ];

    // Act
    let tree = TreeBuilder::from_events(events).unwrap();

    // Assert
    let a = tree.root().unwrap();
    let children: Vec<_> = tree
        .children_of(a)
        .iter()
        .map(|&idx| tree.value(idx).unwrap())
        .collect();
    assert_eq!(tree.value(a), Some("A"));
    assert_eq!(children, ["B", "C"]);
    let b = tree.children_of(a)[0];
    let c = tree.children_of(a)[1];
    assert_eq!(tree.value(tree.first_child(b).unwrap()), Some("D"));
    assert!(tree.children_of(c).is_empty());
    assert_eq!(tree.depth(), 3);
    assert_eq!(tree.len(), 4);
}

#[test]
fn given_deep_chain_when_building_then_depth_matches_nesting() {
    let mut events: Vec<_> = (0..50).map(|i| create(&format!("level{i}"))).collect();
    events.extend(std::iter::repeat(Pop).take(50));

    let tree = TreeBuilder::from_events(events).unwrap();

    assert_eq!(tree.depth(), 50);
    assert_eq!(tree.leaf_nodes(), vec!["level49".to_string()]);
}

#[test]
fn given_incremental_events_then_depth_tracks_open_nodes() {
    let mut builder = TreeBuilder::new();
    builder.apply(create("A")).unwrap();
    builder.apply(create("B")).unwrap();
    assert_eq!(builder.depth(), 2);
    builder.apply(Pop).unwrap();
    builder.apply(Pop).unwrap();
    assert_eq!(builder.depth(), 0);
    assert!(builder.finish().is_ok());
}

#[rstest]
#[case::unclosed_root(vec![create("A")], DomainError::StructuralMismatch { open: 1 })]
#[case::unclosed_child(
    vec![create("A"), create("B"), Pop],
    DomainError::StructuralMismatch { open: 1 }
)]
#[case::pop_first(vec![Pop], DomainError::PopAboveRoot { event: 1 })]
#[case::extra_pop(vec![create("A"), Pop, Pop], DomainError::PopAboveRoot { event: 3 })]
#[case::second_root(
    vec![create("A"), Pop, create("B"), Pop],
    DomainError::MultipleRoots { event: 3, value: "B".to_string() }
)]
#[case::nothing(vec![], DomainError::EmptyTree)]
fn given_malformed_events_when_building_then_structural_error(
    #[case] events: Vec<BuildEvent>,
    #[case] expected: DomainError,
) {
    assert_eq!(TreeBuilder::from_events(events).unwrap_err(), expected);
}
