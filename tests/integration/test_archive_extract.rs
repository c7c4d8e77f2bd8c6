//! Streaming extraction from package archives

use crate::fixtures::{list_names, tar_bytes, tar_gz_bytes, write_tar_gz, write_tar_gz_with_dir};
use mmid::{ExtractOptions, ImageLimit, SourceKind, extract_top_k};
use std::fs;
use tempfile::TempDir;

fn limited(k: usize) -> ExtractOptions {
    ExtractOptions {
        limit: ImageLimit::Limited(k),
        ..Default::default()
    }
}

#[test]
fn test_flat_package_keeps_first_k_and_sidecar() {
    let temp_dir = TempDir::new().unwrap();
    let package = write_tar_gz(
        &temp_dir.path().join("scale-test-package.tgz"),
        &[
            ("pkg/12/01.jpg", b"one"),
            ("pkg/12/02.jpg", b"two"),
            ("pkg/12/03.jpg", b"three"),
            ("pkg/12/word.txt", b"zwolf"),
        ],
    )
    .unwrap();
    let dest = temp_dir.path().join("out");

    let summary = extract_top_k(&package, &dest, &limited(2)).unwrap();

    assert_eq!(summary.kind, SourceKind::Archive);
    assert_eq!(list_names(&dest.join("12")), vec!["01.jpg", "02.jpg", "word.txt"]);
    assert_eq!(fs::read(dest.join("12/02.jpg")).unwrap(), b"two");
    assert_eq!(fs::read_to_string(dest.join("12/word.txt")).unwrap(), "zwolf");

    let tally = summary.words["12"];
    assert_eq!(tally.images, 2);
    assert_eq!(tally.sidecars, 1);
    assert!(summary.errors.is_empty());
}

#[test]
fn test_flat_package_uses_arrival_order_not_name_order() {
    let temp_dir = TempDir::new().unwrap();
    let package = write_tar_gz(
        &temp_dir.path().join("pkg.tgz"),
        &[
            ("pkg/7/c.jpg", b"c"),
            ("pkg/7/a.jpg", b"a"),
            ("pkg/7/b.jpg", b"b"),
        ],
    )
    .unwrap();
    let dest = temp_dir.path().join("out");

    extract_top_k(&package, &dest, &limited(2)).unwrap();

    assert_eq!(list_names(&dest.join("7")), vec!["a.jpg", "c.jpg"]);
}

#[test]
fn test_nested_word_archive_keeps_smallest_names() {
    let temp_dir = TempDir::new().unwrap();
    let inner = tar_gz_bytes(&[("45/b.png", b"b"), ("45/a.png", b"a")]).unwrap();
    let package = write_tar_gz(
        &temp_dir.path().join("pkg.tgz"),
        &[("scale-test/45.tar.gz", &inner)],
    )
    .unwrap();
    let dest = temp_dir.path().join("out");

    let summary = extract_top_k(&package, &dest, &limited(1)).unwrap();

    assert_eq!(list_names(&dest.join("45")), vec!["a.png"]);
    assert_eq!(fs::read(dest.join("45/a.png")).unwrap(), b"a");
    assert_eq!(summary.words["45"].images, 1);
}

#[test]
fn test_nested_word_archive_flattens_and_keeps_sidecars() {
    let temp_dir = TempDir::new().unwrap();
    let inner = tar_gz_bytes(&[
        ("9/deep/dir/03.jpg", b"3"),
        ("9/deep/dir/01.jpg", b"1"),
        ("9/deep/dir/02.jpg", b"2"),
        ("9/metadata.json", b"{}"),
        ("9/word.txt", b"nine"),
        ("9/notes.pdf", b"ignored"),
    ])
    .unwrap();
    let package = write_tar_gz(&temp_dir.path().join("pkg.tgz"), &[("9.tar.gz", &inner)]).unwrap();
    let dest = temp_dir.path().join("out");

    let summary = extract_top_k(&package, &dest, &limited(2)).unwrap();

    assert_eq!(
        list_names(&dest.join("9")),
        vec!["01.jpg", "02.jpg", "metadata.json", "word.txt"]
    );
    assert_eq!(summary.words["9"].sidecars, 2);
}

#[test]
fn test_sidecars_after_cap_are_still_written() {
    let temp_dir = TempDir::new().unwrap();
    let package = write_tar_gz(
        &temp_dir.path().join("pkg.tgz"),
        &[
            ("pkg/3/01.jpg", b"1"),
            ("pkg/3/02.jpg", b"2"),
            ("pkg/3/03.JPEG", b"3"),
            ("pkg/3/word.txt", b"drei"),
            ("pkg/3/metadata.json", b"{\"n\":3}"),
            ("pkg/3/errors.json", b"[]"),
        ],
    )
    .unwrap();
    let dest = temp_dir.path().join("out");

    let summary = extract_top_k(&package, &dest, &limited(1)).unwrap();

    assert_eq!(
        list_names(&dest.join("3")),
        vec!["01.jpg", "errors.json", "metadata.json", "word.txt"]
    );
    assert_eq!(summary.images_written(), 1);
    assert_eq!(summary.sidecars_written(), 3);
}

#[test]
fn test_image_count_is_min_of_available_and_limit() {
    let temp_dir = TempDir::new().unwrap();
    let package = write_tar_gz(
        &temp_dir.path().join("pkg.tgz"),
        &[
            ("pkg/1/a.jpg", b"a"),
            ("pkg/2/a.jpg", b"a"),
            ("pkg/2/b.jpg", b"b"),
            ("pkg/2/c.jpg", b"c"),
            ("pkg/2/d.jpg", b"d"),
            ("pkg/2/e.jpg", b"e"),
        ],
    )
    .unwrap();
    let dest = temp_dir.path().join("out");

    let summary = extract_top_k(&package, &dest, &limited(3)).unwrap();

    assert_eq!(summary.words["1"].images, 1);
    assert_eq!(summary.words["2"].images, 3);
    assert_eq!(list_names(&dest.join("2")).len(), 3);
    assert_eq!(summary.short_words(), 1);
}

#[test]
fn test_unlimited_keeps_every_image() {
    let temp_dir = TempDir::new().unwrap();
    let package = write_tar_gz(
        &temp_dir.path().join("pkg.tgz"),
        &[
            ("pkg/5/a.jpg", b"a"),
            ("pkg/5/b.jpg", b"b"),
            ("pkg/5/c.png", b"c"),
        ],
    )
    .unwrap();
    let dest = temp_dir.path().join("out");

    let summary = extract_top_k(&package, &dest, &ExtractOptions::default()).unwrap();

    assert_eq!(summary.limit, ImageLimit::Unlimited);
    assert_eq!(list_names(&dest.join("5")), vec!["a.jpg", "b.jpg", "c.png"]);
    assert_eq!(summary.short_words(), 0);
}

#[test]
fn test_rerun_into_same_destination_is_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    let inner = tar_gz_bytes(&[("8/b.jpg", b"b"), ("8/a.jpg", b"a")]).unwrap();
    let package = write_tar_gz(
        &temp_dir.path().join("pkg.tgz"),
        &[
            ("pkg/12/01.jpg", b"1"),
            ("pkg/12/02.jpg", b"2"),
            ("pkg/12/word.txt", b"w"),
            ("pkg/8.tar.gz", &inner),
        ],
    )
    .unwrap();
    let dest = temp_dir.path().join("out");

    extract_top_k(&package, &dest, &limited(1)).unwrap();
    let first_12 = list_names(&dest.join("12"));
    let first_8 = list_names(&dest.join("8"));

    let summary = extract_top_k(&package, &dest, &limited(1)).unwrap();

    assert_eq!(list_names(&dest.join("12")), first_12);
    assert_eq!(list_names(&dest.join("8")), first_8);
    assert_eq!(list_names(&dest), vec!["12", "8"]);
    assert_eq!(fs::read(dest.join("12/01.jpg")).unwrap(), b"1");
    assert!(summary.errors.is_empty());
}

#[test]
fn test_plain_tar_package_is_accepted() {
    let temp_dir = TempDir::new().unwrap();
    let package = temp_dir.path().join("pkg.tar");
    fs::write(
        &package,
        tar_bytes(&[("pkg/4/x.png", b"x"), ("pkg/4/y.png", b"y")]).unwrap(),
    )
    .unwrap();
    let dest = temp_dir.path().join("out");

    extract_top_k(&package, &dest, &limited(1)).unwrap();

    assert_eq!(list_names(&dest.join("4")), vec!["x.png"]);
}

#[test]
fn test_irrelevant_members_are_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let package = write_tar_gz_with_dir(
        &temp_dir.path().join("pkg.tgz"),
        "pkg/12/",
        &[
            ("pkg/README.txt", b"readme"),
            ("pkg/12/notes.pdf", b"pdf"),
            ("pkg/abc/01.jpg", b"not a word"),
            ("pkg/12/01.jpg", b"1"),
        ],
    )
    .unwrap();
    let dest = temp_dir.path().join("out");

    let summary = extract_top_k(&package, &dest, &limited(5)).unwrap();

    assert_eq!(list_names(&dest), vec!["12"]);
    assert_eq!(list_names(&dest.join("12")), vec!["01.jpg"]);
    assert_eq!(summary.words.len(), 1);
    assert!(summary.errors.is_empty());
}

#[test]
fn test_progress_is_monotonic_and_finishes() {
    let temp_dir = TempDir::new().unwrap();
    let package = write_tar_gz(
        &temp_dir.path().join("pkg.tgz"),
        &[
            ("pkg/1/a.jpg", b"a"),
            ("pkg/2/a.jpg", b"a"),
            ("pkg/3/a.jpg", b"a"),
        ],
    )
    .unwrap();
    let dest = temp_dir.path().join("out");

    let opts = ExtractOptions {
        progress_entry_trigger: 1,
        ..limited(1)
    };
    let summary = extract_top_k(&package, &dest, &opts).unwrap();

    let last = summary.progress.last().expect("final snapshot");
    assert!(last.finished);
    assert_eq!(last.processed_entries, 3);
    assert_eq!(last.files_written, 3);
    for pair in summary.progress.windows(2) {
        assert!(pair[0].processed_entries <= pair[1].processed_entries);
        assert!(pair[0].bytes_written <= pair[1].bytes_written);
    }
}

#[test]
fn test_word_archive_and_flat_folder_share_one_limit() {
    let temp_dir = TempDir::new().unwrap();
    let inner = tar_gz_bytes(&[("12/a.jpg", b"a"), ("12/b.jpg", b"b")]).unwrap();
    let package = write_tar_gz(
        &temp_dir.path().join("pkg.tgz"),
        &[
            ("pkg/12.tar.gz", &inner),
            ("pkg/12/c.jpg", b"c"),
            ("pkg/12/d.jpg", b"d"),
            ("pkg/12/word.txt", b"w"),
        ],
    )
    .unwrap();
    let dest = temp_dir.path().join("out");

    let summary = extract_top_k(&package, &dest, &limited(2)).unwrap();

    assert_eq!(list_names(&dest.join("12")), vec!["a.jpg", "b.jpg", "word.txt"]);
    assert_eq!(summary.words["12"].images, 2);
}

#[test]
fn test_flat_folder_then_word_archive_share_one_limit() {
    let temp_dir = TempDir::new().unwrap();
    let inner = tar_gz_bytes(&[("12/a.jpg", b"a"), ("12/b.jpg", b"b")]).unwrap();
    let package = write_tar_gz(
        &temp_dir.path().join("pkg.tgz"),
        &[("pkg/12/c.jpg", b"c"), ("pkg/12.tar.gz", &inner)],
    )
    .unwrap();
    let dest = temp_dir.path().join("out");

    let summary = extract_top_k(&package, &dest, &limited(2)).unwrap();

    assert_eq!(list_names(&dest.join("12")), vec!["a.jpg", "c.jpg"]);
    assert_eq!(summary.words["12"].images, 2);
}

#[test]
fn test_repeated_word_archives_share_one_limit() {
    let temp_dir = TempDir::new().unwrap();
    let first = tar_gz_bytes(&[("5/a.jpg", b"a")]).unwrap();
    let second = tar_gz_bytes(&[("5/b.jpg", b"b")]).unwrap();
    let package = write_tar_gz(
        &temp_dir.path().join("pkg.tgz"),
        &[("x/5.tar.gz", &first), ("y/5.tar.gz", &second)],
    )
    .unwrap();
    let dest = temp_dir.path().join("out");

    let summary = extract_top_k(&package, &dest, &limited(1)).unwrap();

    assert_eq!(list_names(&dest.join("5")), vec!["a.jpg"]);
    assert_eq!(summary.words["5"].images, 1);
}

#[test]
fn test_word_archive_members_sharing_a_file_name_count_once() {
    let temp_dir = TempDir::new().unwrap();
    let inner = tar_gz_bytes(&[
        ("a/01.jpg", b"first"),
        ("b/01.jpg", b"second"),
        ("c/02.jpg", b"third"),
    ])
    .unwrap();
    let package = write_tar_gz(&temp_dir.path().join("pkg.tgz"), &[("6.tar.gz", &inner)]).unwrap();
    let dest = temp_dir.path().join("out");

    let summary = extract_top_k(&package, &dest, &limited(2)).unwrap();

    assert_eq!(list_names(&dest.join("6")), vec!["01.jpg", "02.jpg"]);
    assert_eq!(fs::read(dest.join("6/01.jpg")).unwrap(), b"first");
    assert_eq!(summary.words["6"].images, 2);
}

#[test]
fn test_flat_members_sharing_a_file_name_count_once() {
    let temp_dir = TempDir::new().unwrap();
    let package = write_tar_gz(
        &temp_dir.path().join("pkg.tgz"),
        &[
            ("x/3/01.jpg", b"first"),
            ("y/3/01.jpg", b"second"),
            ("y/3/02.jpg", b"third"),
        ],
    )
    .unwrap();
    let dest = temp_dir.path().join("out");

    let summary = extract_top_k(&package, &dest, &limited(2)).unwrap();

    assert_eq!(list_names(&dest.join("3")), vec!["01.jpg", "02.jpg"]);
    assert_eq!(fs::read(dest.join("3/01.jpg")).unwrap(), b"first");
    assert_eq!(summary.words["3"].images, 2);
}
