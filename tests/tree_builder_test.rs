//! Tests for building trees from archive listings

use archtree::domain::{
    build_tree_from_path_list, build_tree_with_separator, DomainError, Tree, TreeBuilder,
};
use archtree::util::testing;
use rstest::rstest;

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

/// (depth, id, name, is_file, full_path) in pre-order
fn shape(tree: &Tree) -> Vec<(usize, usize, String, bool, String)> {
    fn walk(
        tree: &Tree,
        idx: generational_arena::Index,
        depth: usize,
        out: &mut Vec<(usize, usize, String, bool, String)>,
    ) {
        for (child_idx, node) in tree.children(idx) {
            out.push((depth, node.id, node.name.clone(), node.is_file, node.full_path.clone()));
            walk(tree, child_idx, depth + 1, out);
        }
    }
    let mut out = Vec::new();
    walk(tree, tree.root(), 0, &mut out);
    out
}

fn child_names(tree: &Tree, path: &str) -> Vec<String> {
    let idx = match path {
        "" => tree.root(),
        _ => tree
            .find_path(path)
            .and_then(|node| tree.index_of(node.id))
            .expect("path exists"),
    };
    tree.children(idx).map(|(_, n)| n.name.clone()).collect()
}

const D2_LISTING: &[&str] = &[
    r"d2data.mpq\data\global\items\flp2ax.dc6",
    r"d2data.mpq\data\global\items\flpaxe.dc6",
    r"d2data.mpq\data\global\excel\armor.txt",
    r"d2data.mpq\data\global\palette\act1\pal.dat",
    r"d2data.mpq\data\local\font\latin\font8.dc6",
    r"d2exp.mpq\data\global\excel\weapons.txt",
    r"d2exp.mpq\readme.txt",
    r"patch_d2.mpq\data\global\excel\armor.txt",
    r"patch_d2.mpq\data\global\ui\panel\invchar6.dc6",
    r"d2data.mpq\data\global\items\invaxe.dc6",
];

// ============================================================
// Worked examples
// ============================================================

#[test]
fn given_two_files_in_dir_and_one_at_top_when_building_then_dir_comes_first() {
    let tree = build_tree_with_separator(["a/x.txt", "a/y.txt", "b.txt"], '/');

    let root = tree.root_node();
    assert_eq!(root.name, "root");
    assert_eq!(child_names(&tree, ""), vec!["a", "b.txt"]);
    assert_eq!(child_names(&tree, "a"), vec!["x.txt", "y.txt"]);

    let a = tree.find_path("a").unwrap();
    assert!(!a.is_file);
    assert_eq!(a.full_path, "a");
    let b = tree.find_path("b.txt").unwrap();
    assert!(b.is_file);
    assert_eq!(b.full_path, "b.txt");
}

#[test]
fn given_mpq_entry_when_splitting_leaf_then_returns_container_and_inner_path() {
    let tree = build_tree_with_separator(["d2data.mpq/data/global/items/flp2ax.dc6"], '/');

    let leaf = tree
        .find_path("d2data.mpq/data/global/items/flp2ax.dc6")
        .unwrap();
    let split = leaf.container_path().unwrap();

    assert_eq!(split.container_id, "d2data.mpq");
    assert_eq!(split.inner_path, "data/global/items/flp2ax.dc6");
}

#[rstest]
#[case(&["Z.txt", "a.txt"])]
#[case(&["a.txt", "Z.txt"])]
fn given_mixed_case_names_when_ordering_then_uses_byte_order(#[case] listing: &[&str]) {
    let tree = build_tree_with_separator(listing.iter().copied(), '/');

    // 'Z' (0x5A) sorts before 'a' (0x61)
    assert_eq!(child_names(&tree, ""), vec!["Z.txt", "a.txt"]);
}

// ============================================================
// Ordering and identity
// ============================================================

#[test]
fn given_real_listing_when_building_then_directories_precede_files_everywhere() {
    let tree = build_tree_from_path_list(D2_LISTING);

    for (idx, _) in tree.iter() {
        let kinds: Vec<bool> = tree.children(idx).map(|(_, n)| n.is_file).collect();
        let first_file = kinds.iter().position(|&f| f).unwrap_or(kinds.len());
        assert!(
            kinds[first_file..].iter().all(|&f| f),
            "directory after file in {:?}",
            tree.get(idx).map(|n| &n.full_path)
        );
    }
    assert_eq!(child_names(&tree, r"d2exp.mpq"), vec!["data", "readme.txt"]);
    assert_eq!(
        child_names(&tree, r"d2data.mpq\data\global\items"),
        vec!["flp2ax.dc6", "flpaxe.dc6", "invaxe.dc6"]
    );
}

#[test]
fn given_same_listing_twice_when_building_then_tree_is_identical() {
    let first = build_tree_from_path_list(D2_LISTING);
    let second = build_tree_from_path_list(D2_LISTING);

    assert_eq!(shape(&first), shape(&second));
}

#[test]
fn given_repeated_entries_when_building_then_matches_deduplicated_build() {
    let doubled: Vec<&str> = D2_LISTING.iter().chain(D2_LISTING.iter()).copied().collect();
    let mut with_case_dupes = doubled.clone();
    with_case_dupes.push(r"D2DATA.MPQ\Data\Global\Items\FLP2AX.DC6");

    let once = build_tree_from_path_list(D2_LISTING);

    assert_eq!(shape(&build_tree_from_path_list(&doubled)), shape(&once));
    assert_eq!(shape(&build_tree_from_path_list(&with_case_dupes)), shape(&once));
}

#[test]
fn given_listing_when_building_then_ids_follow_creation_order() {
    let tree = build_tree_with_separator(["b/x", "a/y", "b/z"], '/');

    // b=1, x=2, a=3, y=4, z=5 even though "a" is displayed before "b"
    assert_eq!(tree.find_path("b").map(|n| n.id), Some(1));
    assert_eq!(tree.find_path("b/x").map(|n| n.id), Some(2));
    assert_eq!(tree.find_path("a").map(|n| n.id), Some(3));
    assert_eq!(tree.find_path("a/y").map(|n| n.id), Some(4));
    assert_eq!(tree.find_path("b/z").map(|n| n.id), Some(5));
    assert_eq!(child_names(&tree, ""), vec!["a", "b"]);

    for id in 0..=5 {
        assert_eq!(tree.find_by_id(id).map(|n| n.id), Some(id));
    }
}

#[test]
fn given_file_entry_when_building_then_full_path_is_original_string() {
    let entry = r"d2data.mpq\Data\\global\items\flp2ax.dc6";
    let tree = build_tree_from_path_list([entry]);

    let leaf = tree.find_path(r"d2data.mpq\data\global\items\flp2ax.dc6").unwrap();
    assert_eq!(leaf.full_path, entry);
    let dir = tree.find_path(r"d2data.mpq\data\global").unwrap();
    assert_eq!(dir.full_path, r"d2data.mpq\Data\global");
}

// ============================================================
// Boundaries
// ============================================================

#[rstest]
#[case("")]
#[case("/")]
#[case("//")]
fn given_entry_without_segments_when_inserting_then_nothing_is_created(#[case] entry: &str) {
    let mut builder = TreeBuilder::with_separator('/');

    assert_eq!(builder.insert(entry), None);
    assert_eq!(builder.insert("a.txt"), Some(1));

    let tree = builder.finish();
    assert_eq!(tree.len(), 1);
}

#[test]
fn given_directory_entry_then_file_below_when_building_then_file_is_kept() {
    let tree = build_tree_with_separator(["data/", "data/x.txt"], '/');

    let data = tree.find_path("data").unwrap();
    assert!(!data.is_file);
    assert_eq!(child_names(&tree, "data"), vec!["x.txt"]);
    assert_eq!(tree.file_count(), 1);
    assert_eq!(tree.leaf_nodes(), vec!["data/x.txt".to_string()]);
}

#[rstest]
#[case(r"d2data.mpq\data\")]
#[case(r"d2data.mpq\data\\")]
fn given_trailing_separator_when_building_then_last_segment_is_directory(#[case] entry: &str) {
    let tree = build_tree_from_path_list([entry, r"d2data.mpq\data\x.dc6"]);

    assert_eq!(
        shape(&tree),
        vec![
            (0, 1, "d2data.mpq".to_string(), false, "d2data.mpq".to_string()),
            (1, 2, "data".to_string(), false, r"d2data.mpq\data".to_string()),
            (2, 3, "x.dc6".to_string(), true, r"d2data.mpq\data\x.dc6".to_string()),
        ]
    );
}

#[test]
fn given_existing_file_when_inserting_same_name_as_directory_then_reports_conflict() {
    let mut builder = TreeBuilder::with_separator('/');
    builder.insert("data");

    let err = builder.try_insert("data/").unwrap_err();
    assert!(matches!(err, DomainError::PathConflict { existing: "file", .. }));
    assert_eq!(builder.tree().len(), 1);
}

#[test]
fn given_prefix_of_listing_when_building_then_tree_is_valid() {
    let mut builder = TreeBuilder::new();
    for (n, entry) in D2_LISTING.iter().enumerate() {
        builder.insert(entry);
        let tree = builder.tree();
        assert_eq!(tree.file_count(), n + 1);
        assert!(tree.iter().all(|(_, node)| !node.is_file || node.children.is_empty()));
    }
}

// ============================================================
// Type conflicts: first seen wins
// ============================================================

#[test]
fn given_file_then_nested_path_when_building_then_file_is_kept() {
    let tree = build_tree_with_separator(["a", "a/b"], '/');

    let a = tree.find_path("a").unwrap();
    assert!(a.is_file);
    assert!(a.children.is_empty());
    assert_eq!(tree.len(), 1);
}

#[test]
fn given_directory_then_same_name_as_file_when_building_then_directory_is_kept() {
    let tree = build_tree_with_separator(["a/b", "A"], '/');

    let a = tree.find_path("a").unwrap();
    assert!(!a.is_file);
    assert_eq!(child_names(&tree, "a"), vec!["b"]);
    assert_eq!(tree.len(), 2);
}

#[test]
fn given_conflicting_entry_when_try_inserting_then_reports_conflict() {
    let mut builder = TreeBuilder::with_separator('/');
    builder.insert("a/b");

    let err = builder.try_insert("a").unwrap_err();
    assert_eq!(
        err,
        DomainError::PathConflict {
            path: "a".into(),
            segment: "a".into(),
            existing: "directory",
        }
    );
    assert!(builder.try_insert("a/b/c").is_err());
    assert_eq!(builder.try_insert("a/B"), Ok(Some(2)));
}
