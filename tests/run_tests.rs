//! End-to-end runs through `dedupe_dir`: the documented scenarios, partition invariance, error classes.

use dupesweep::engine::{hash_bytes, write_deletions, write_records};
use dupesweep::pipeline::{ResolveOpts, resolve_duplicates};
use dupesweep::{CrawlStrategy, DupeError, ExitCode, Opts, dedupe_dir};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn touch(path: &Path, bytes: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, bytes).unwrap();
}

fn concurrent(n: usize) -> Opts {
    Opts {
        crawl: CrawlStrategy::Concurrent,
        num_threads: n,
        ..Opts::default()
    }
}

/// Relative paths of regular files left under `root`.
fn surviving(root: &Path) -> BTreeSet<PathBuf> {
    walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path().strip_prefix(root).unwrap().to_path_buf())
        .collect()
}

/// Same fixed tree in any directory: two duplicate classes spread over nested dirs plus uniques.
fn build_fixture(root: &Path) {
    touch(&root.join("top_a.txt"), b"alpha");
    touch(&root.join("one/alpha_copy.txt"), b"alpha");
    touch(&root.join("one/two/alpha_copy2.txt"), b"alpha");
    touch(&root.join("one/two/beta.bin"), b"beta");
    touch(&root.join("three/beta_copy.bin"), b"beta");
    touch(&root.join("three/unique.txt"), b"unique");
    touch(&root.join("three/four/five/empty"), b"");
    touch(&root.join("three/four/five/empty2"), b"");
    for i in 0..20 {
        touch(&root.join(format!("many/f{i}")), format!("{}", i % 4).as_bytes());
    }
}

#[test]
fn test_scenario_two_copies_and_a_unique() {
    for opts in [Opts::default(), concurrent(4)] {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        let c = dir.path().join("c");
        touch(&a, b"X");
        touch(&b, b"X");
        touch(&c, b"Y");

        let report = dedupe_dir(dir.path(), &opts).unwrap();

        assert_eq!(report.registry.len(), 3);
        assert_eq!(report.outcome.deleted.len(), 1);
        let deleted = &report.outcome.deleted[0];
        // The later-discovered of a/b goes.
        let pos = |p: &Path| report.registry.paths().iter().position(|q| q == p).unwrap();
        let (first, second) = if pos(&a) < pos(&b) { (&a, &b) } else { (&b, &a) };
        assert_eq!(&deleted.path, second);
        assert_eq!(&deleted.original, first);
        assert!(first.exists());
        assert!(!second.exists());
        assert!(c.exists());

        // Survivor and deleted record print the same digest.
        let digest_of = |p: &Path| report.registry.get(pos(p)).unwrap().digest().unwrap();
        assert_eq!(digest_of(&a), digest_of(&b));
        assert_eq!(digest_of(&a), hash_bytes(b"X"));
        assert_ne!(digest_of(&a), digest_of(&c));

        let mut out = Vec::new();
        write_deletions(&mut out, &report.outcome, false).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, format!("Deleted duplicate file: {}\n", second.display()));
    }
}

#[test]
fn test_scenario_nested_distinct_files() {
    for opts in [Opts::default(), concurrent(2)] {
        let dir = tempdir().unwrap();
        let f1 = dir.path().join("d1/d2/f1");
        let f2 = dir.path().join("d3/f2");
        touch(&f1, b"first");
        touch(&f2, b"second");

        let report = dedupe_dir(dir.path(), &opts).unwrap();

        assert!(report.outcome.deleted.is_empty());
        assert!(f1.exists() && f2.exists());
        let mut out = Vec::new();
        write_records(&mut out, &report.registry).unwrap();
        write_deletions(&mut out, &report.outcome, false).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains(&format!("File: {}\n", f1.display())));
        assert!(text.contains(&format!("File: {}\n", f2.display())));
        assert_eq!(text.matches("Hash: ").count(), 2);
        assert!(!text.contains("Deleted duplicate file"));
    }
}

#[test]
fn test_partition_invariance() {
    let mut results: Vec<(BTreeSet<PathBuf>, BTreeMap<PathBuf, String>)> = Vec::new();
    let mut runs = vec![Opts::default()];
    runs.extend([1, 2, 3, 5, 16].map(concurrent));
    for opts in runs {
        let dir = tempdir().unwrap();
        build_fixture(dir.path());
        let report = dedupe_dir(dir.path(), &opts).unwrap();
        let digests: BTreeMap<PathBuf, String> = report
            .registry
            .iter()
            .map(|r| {
                (
                    r.path.strip_prefix(dir.path()).unwrap().to_path_buf(),
                    r.digest().unwrap().to_hex(),
                )
            })
            .collect();
        let left = surviving(dir.path());
        // One survivor per distinct content: alpha, beta, unique, empty, 0..3
        assert_eq!(left.len(), 8);
        results.push((left, digests));
    }
    // Digests never depend on the worker count.
    for (_, digests) in &results[1..] {
        assert_eq!(digests, &results[0].1);
    }
    // Which copy survives follows discovery order, which differs between crawl strategies, but every
    // content class keeps exactly one file.
    for (left, _) in &results {
        let contents: BTreeSet<String> = left
            .iter()
            .map(|p| results[0].1[p].clone())
            .collect();
        assert_eq!(contents.len(), 8);
    }
}

#[test]
fn test_worker_count_does_not_change_selection() {
    // Dry runs over one unchanged tree: the sequential crawl order is fixed, so the selected
    // duplicates must match exactly whatever the worker count.
    let dir = tempdir().unwrap();
    build_fixture(dir.path());
    let mut selections = Vec::new();
    for n in [1, 2, 4, 9, 40] {
        let opts = Opts {
            num_threads: n,
            dry_run: true,
            ..Opts::default()
        };
        let report = dedupe_dir(dir.path(), &opts).unwrap();
        let selected: Vec<(PathBuf, PathBuf)> = report
            .outcome
            .deleted
            .iter()
            .map(|d| (d.path.clone(), d.original.clone()))
            .collect();
        selections.push(selected);
    }
    assert_eq!(selections[0].len(), 20);
    for s in &selections[1..] {
        assert_eq!(s, &selections[0]);
    }
}

#[test]
fn test_rerun_deletes_nothing() {
    let dir = tempdir().unwrap();
    build_fixture(dir.path());
    let first = dedupe_dir(dir.path(), &concurrent(4)).unwrap();
    assert_eq!(first.outcome.deleted.len(), 20);

    // Resolving the same registry again.
    let again = resolve_duplicates(&first.registry, ResolveOpts::default());
    assert!(again.deleted.is_empty());
    assert!(again.failed.is_empty());

    // A fresh run over the result.
    let second = dedupe_dir(dir.path(), &concurrent(4)).unwrap();
    assert!(second.outcome.deleted.is_empty());
    assert_eq!(second.registry.len(), 8);
}

#[test]
fn test_dry_run_leaves_tree_untouched() {
    let dir = tempdir().unwrap();
    build_fixture(dir.path());
    let before = surviving(dir.path());
    let opts = Opts {
        dry_run: true,
        ..concurrent(3)
    };
    let report = dedupe_dir(dir.path(), &opts).unwrap();
    assert_eq!(report.outcome.deleted.len(), 20);
    assert_eq!(surviving(dir.path()), before);

    let mut out = Vec::new();
    write_deletions(&mut out, &report.outcome, true).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert_eq!(text.matches("Duplicate file (dry run): ").count(), 20);
}

#[test]
fn test_every_deleted_file_had_an_earlier_twin() {
    let dir = tempdir().unwrap();
    build_fixture(dir.path());
    let report = dedupe_dir(dir.path(), &concurrent(3)).unwrap();
    for dup in &report.outcome.deleted {
        assert!(dup.original_index < dup.index);
        let kept = report.registry.get(dup.original_index).unwrap();
        let gone = report.registry.get(dup.index).unwrap();
        assert_eq!(kept.digest(), gone.digest());
        assert!(kept.path.exists());
        assert!(!gone.path.exists());
    }
}

#[test]
fn test_timings_are_consistent() {
    let dir = tempdir().unwrap();
    build_fixture(dir.path());
    let report = dedupe_dir(dir.path(), &concurrent(2)).unwrap();
    let t = report.timings;
    assert!(t.total >= t.crawl);
    assert!(t.total >= t.hash);
    assert!(t.total >= t.resolve);
}

#[test]
fn test_zero_threads_is_usage_error() {
    let dir = tempdir().unwrap();
    touch(&dir.path().join("a"), b"X");
    touch(&dir.path().join("b"), b"X");
    let err = dedupe_dir(dir.path(), &concurrent(0)).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<DupeError>(),
        Some(DupeError::Usage(_))
    ));
    assert_eq!(ExitCode::from_error(&err), ExitCode::Usage);
    // Nothing ran.
    assert!(dir.path().join("b").exists());
}

#[test]
fn test_missing_root_is_general_error() {
    let dir = tempdir().unwrap();
    let err = dedupe_dir(&dir.path().join("missing"), &Opts::default()).unwrap_err();
    assert_eq!(ExitCode::from_error(&err), ExitCode::GeneralError);
}

#[test]
fn test_root_must_be_directory() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("file");
    touch(&file, b"X");
    assert!(dedupe_dir(&file, &Opts::default()).is_err());
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_is_never_a_duplicate() {
    use std::os::unix::fs::PermissionsExt;
    if dupesweep::engine::running_as_root() {
        return; // root can read mode-000 files
    }
    let dir = tempdir().unwrap();
    let secret = dir.path().join("secret");
    let open = dir.path().join("open");
    touch(&secret, b"X");
    touch(&open, b"X");
    fs::set_permissions(&secret, fs::Permissions::from_mode(0o000)).unwrap();

    let report = dedupe_dir(dir.path(), &concurrent(2)).unwrap();

    fs::set_permissions(&secret, fs::Permissions::from_mode(0o644)).unwrap();
    assert_eq!(report.hash_failures.len(), 1);
    assert_eq!(report.hash_failures[0].path, secret);
    assert!(report.outcome.deleted.is_empty());
    assert!(secret.exists() && open.exists());
}

#[cfg(unix)]
#[test]
fn test_followed_directory_alias_keeps_only_copy() {
    use std::os::unix::fs::symlink;
    for strategy in [CrawlStrategy::Sequential, CrawlStrategy::Concurrent] {
        let dir = tempdir().unwrap();
        let real = dir.path().join("real/only_copy.txt");
        touch(&real, b"unique content");
        symlink(dir.path().join("real"), dir.path().join("alias")).unwrap();
        let opts = Opts {
            crawl: strategy,
            num_threads: 2,
            follow_links: true,
            ..Opts::default()
        };

        let report = dedupe_dir(dir.path(), &opts).unwrap();

        assert!(report.outcome.deleted.is_empty());
        assert!(report.outcome.failed.is_empty());
        assert_eq!(fs::read(&real).unwrap(), b"unique content");
        assert!(dir.path().join("alias/only_copy.txt").exists());
    }
}

#[cfg(unix)]
#[test]
fn test_followed_file_alias_keeps_target() {
    use std::os::unix::fs::symlink;
    for strategy in [CrawlStrategy::Sequential, CrawlStrategy::Concurrent] {
        let dir = tempdir().unwrap();
        let target = dir.path().join("target.txt");
        // Names on both sides of the target so either discovery order is exercised.
        let before = dir.path().join("a_link.txt");
        let after = dir.path().join("z_link.txt");
        touch(&target, b"unique content");
        symlink(&target, &before).unwrap();
        symlink(&target, &after).unwrap();
        let opts = Opts {
            crawl: strategy,
            num_threads: 3,
            follow_links: true,
            ..Opts::default()
        };

        let report = dedupe_dir(dir.path(), &opts).unwrap();

        assert_eq!(report.registry.len(), 3);
        assert!(report.outcome.deleted.is_empty());
        assert_eq!(fs::read(&target).unwrap(), b"unique content");
        assert_eq!(fs::read(&before).unwrap(), b"unique content");
        assert_eq!(fs::read(&after).unwrap(), b"unique content");
    }
}

#[cfg(unix)]
#[test]
fn test_followed_alias_with_real_copy_deletes_copy_only() {
    use std::os::unix::fs::symlink;
    let dir = tempdir().unwrap();
    let original = dir.path().join("real/data.bin");
    let copy = dir.path().join("other/data_copy.bin");
    touch(&original, b"shared");
    touch(&copy, b"shared");
    symlink(dir.path().join("real"), dir.path().join("alias")).unwrap();
    let opts = Opts {
        follow_links: true,
        ..Opts::default()
    };

    dedupe_dir(dir.path(), &opts).unwrap();

    // Exactly one physical copy survives, and it is still reachable.
    let left: Vec<PathBuf> = [original.clone(), copy.clone()]
        .into_iter()
        .filter(|p| p.exists())
        .collect();
    assert_eq!(left.len(), 1);
    assert_eq!(fs::read(&left[0]).unwrap(), b"shared");
}
