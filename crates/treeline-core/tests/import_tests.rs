//! End-to-end tests for Treeline imports.
//!
//! These tests replay synthetic source graphs through the full pipeline:
//! resolve → walk → snapshot → reconstruct → materialize.

use chrono::{TimeZone, Utc};
use treeline_core::source::MemorySource;
use treeline_core::tags::paths;
use treeline_core::{import, Error, ImportOptions, Importer, ObjectId};

/// A merge of two roots keeps its first parent and other parents apart.
#[test]
fn test_merge_of_two_roots() {
    let mut source = MemorySource::new();
    let a = source.add_commit(&[("/a.txt", "from a")], &[], "A", 100);
    let b = source.add_commit(&[("/b.txt", "from b")], &[], "B", 200);
    let m = source.add_commit(
        &[("/a.txt", "from a"), ("/b.txt", "from b")],
        &[&a, &b],
        "Merge b into a",
        300,
    );
    source.set_branch("main", &m);

    let import = import(&source).unwrap();
    let ha = import.identities.get(&a).unwrap();
    let hb = import.identities.get(&b).unwrap();
    let merge = import.repo.get(import.identities.get(&m).unwrap()).unwrap();

    assert_eq!(merge.first_parent, Some(ha));
    assert_eq!(merge.other_parents, vec![hb]);
    assert!(import.repo.get(ha).unwrap().is_root());
    assert!(import.repo.get(hb).unwrap().is_root());
}

/// Reconstructed timestamps come from the source, not the wall clock.
#[test]
fn test_timestamps_match_source() {
    let mut source = MemorySource::new();
    let a = source.add_commit(&[("/x", "1")], &[], "A", 946_684_800);
    let b = source.add_commit(&[("/x", "2")], &[&a], "B", 946_684_801);
    source.set_branch("main", &b);

    let before = Utc::now();
    let import = import(&source).unwrap();

    for (id, seconds) in [(&a, 946_684_800), (&b, 946_684_801)] {
        let commit = import.repo.get(import.identities.get(id).unwrap()).unwrap();
        assert_eq!(commit.timestamp, Utc.timestamp_opt(seconds, 0).unwrap());
        assert!(commit.timestamp < before);
    }
    assert_eq!(import.repo.clock().pinned(), None);
}

/// A tag on a tree is dropped; everything else still imports.
#[test]
fn test_reference_to_tree_is_skipped() {
    let mut source = MemorySource::new();
    let a = source.add_commit(&[("/readme.txt", "Hello World!")], &[], "A", 1);
    let tree = source.add_tree(&[("/loose.txt", &b"not a commit"[..])]);
    source.set_branch("main", &a);
    source.set_tag("tree-tag", &tree);
    source.set_ref("refs/heads/broken", &ObjectId::new("0123456789012345678901234567890123456789"));

    let import = import(&source).unwrap();
    assert_eq!(import.report.commits, 1);
    assert_eq!(
        import.report.unresolved_refs,
        vec!["refs/heads/broken", "refs/tags/tree-tag"]
    );
    assert_eq!(
        import.report.skipped_refs,
        vec!["refs/heads/broken", "refs/tags/tree-tag"]
    );
    assert_eq!(import.repo.branch("main"), import.identities.get(&a));
    assert_eq!(import.repo.branch("broken"), None);
    assert_eq!(import.repo.tag("tree-tag"), None);
}

/// Annotated and lightweight tags both land on the tagged commit.
#[test]
fn test_both_tag_kinds_resolve() {
    let mut source = MemorySource::new();
    let a = source.add_commit(&[("/v", "1")], &[], "A", 1);
    let b = source.add_commit(&[("/v", "2")], &[&a], "B", 2);
    source.set_branch("main", &b);
    source.set_tag("light", &a);
    source.set_annotated_tag("annotated", &a);

    let import = import(&source).unwrap();
    let ha = import.identities.get(&a);
    assert_eq!(import.repo.tag("light"), ha);
    assert_eq!(import.repo.tag("annotated"), ha);
    assert!(import.report.skipped_refs.is_empty());
}

/// History reachable only from a tag or a remote ref is imported too.
#[test]
fn test_all_references_seed_the_walk() {
    let mut source = MemorySource::new();
    let main = source.add_commit(&[("/m", "m")], &[], "main", 1);
    let tagged = source.add_commit(&[("/t", "t")], &[], "tagged", 2);
    let remote = source.add_commit(&[("/r", "r")], &[], "remote", 3);
    source.set_branch("main", &main);
    source.set_annotated_tag("release", &tagged);
    source.set_ref("refs/remotes/origin/feature", &remote);

    let import = import(&source).unwrap();
    assert_eq!(import.identities.len(), 3);
    assert!(import.identities.contains(&remote));
    // Remote-tracking refs seed the walk but are not local branches.
    assert_eq!(import.repo.branches().count(), 1);
    assert_eq!(import.repo.tag("release"), import.identities.get(&tagged));
}

/// Metadata is stored at the well-known paths.
#[test]
fn test_metadata_paths() {
    let mut source = MemorySource::new();
    source.set_author("Grace Hopper", "grace@example.com");
    let a = source.add_commit(&[], &[], "Compile it\n\nWith a longer body.", 1);
    source.set_branch("main", &a);

    let import = import(&source).unwrap();
    let commit = import.repo.get(import.repo.branch("main").unwrap()).unwrap();
    assert_eq!(commit.tags.get(paths::AUTHOR_NAME), Some("Grace Hopper"));
    assert_eq!(commit.tags.get(paths::AUTHOR_EMAIL), Some("grace@example.com"));
    assert_eq!(commit.tags.get(paths::MESSAGE), Some("Compile it\n\nWith a longer body."));
    assert_eq!(commit.tags.get(paths::MESSAGE_SHORT), Some("Compile it"));
    assert_eq!(commit.message, "Compile it\n\nWith a longer body.");
}

/// A failing blob read aborts the whole run.
#[test]
fn test_unreadable_blob_aborts_import() {
    let mut source = MemorySource::new();
    let a = source.add_commit(&[("/secret.bin", "locked")], &[], "A", 1);
    source.set_branch("main", &a);
    let blob = source.add_blob(b"locked");
    source.make_unreadable(&blob);

    let options = ImportOptions::default();
    let result = Importer::new(&source).with_options(options).run();
    match result {
        Err(Error::ContentRead { path, .. }) => assert_eq!(path, "/secret.bin"),
        other => panic!("expected a content read error, got {:?}", other.map(|i| i.report)),
    }
}

/// Tips of the reconstructed repository match the source branch heads.
#[test]
fn test_tips_and_log() {
    let mut source = MemorySource::new();
    let a = source.add_commit(&[("/f", "a")], &[], "A", 1);
    let b = source.add_commit(&[("/f", "b")], &[&a], "B", 2);
    let c = source.add_commit(&[("/f", "c")], &[&a], "C", 3);
    source.set_branch("left", &b);
    source.set_branch("right", &c);

    let import = import(&source).unwrap();
    let mut tips = import.repo.tips();
    tips.sort();
    let mut expected = vec![
        import.identities.get(&b).unwrap(),
        import.identities.get(&c).unwrap(),
    ];
    expected.sort();
    assert_eq!(tips, expected);

    let log = import.repo.first_parent_log(import.repo.branch("right").unwrap());
    assert_eq!(log.len(), 2);
    assert_eq!(import.repo.get(log[1]).unwrap().message, "A");
}

/// A commit only reachable from a detached HEAD is still imported.
#[test]
fn test_detached_head_seeds_the_walk() {
    let mut source = MemorySource::new();
    let a = source.add_commit(&[("/f", "a")], &[], "A", 1);
    let detached = source.add_commit(&[("/f", "d")], &[&a], "D", 2);
    source.set_branch("main", &a);
    source.set_head(&detached);

    let import = import(&source).unwrap();
    assert_eq!(import.identities.len(), 2);
    let handle = import.identities.get(&detached).unwrap();
    assert_eq!(import.repo.get(handle).unwrap().first_parent, import.identities.get(&a));
    // HEAD is not a branch; only main is recreated.
    assert_eq!(import.report.branches, vec!["main"]);
    assert!(import.report.unresolved_refs.is_empty());
}
