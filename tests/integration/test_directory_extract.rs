//! Bounded copy from already extracted package directories

#[cfg(test)]
mod tests {
    use crate::fixtures::{create_word_folder, list_names, tar_gz_bytes};
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
    fn test_word_folders_keep_first_names() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("german");
        create_word_folder(&source, "3", &["c.jpg", "a.jpg", "b.png"], "drei").unwrap();
        create_word_folder(&source, "10", &["z.jpg"], "zehn").unwrap();
        let dest = temp_dir.path().join("german-k2");

        let summary = extract_top_k(&source, &dest, &limited(2)).unwrap();

        assert_eq!(summary.kind, SourceKind::Directory);
        assert_eq!(list_names(&dest.join("3")), vec!["a.jpg", "b.png", "word.txt"]);
        assert_eq!(list_names(&dest.join("10")), vec!["word.txt", "z.jpg"]);
        assert_eq!(fs::read_to_string(dest.join("3/word.txt")).unwrap(), "drei");
        assert_eq!(summary.words.len(), 2);
        assert!(summary.errors.is_empty());
    }

    #[test]
    fn test_word_archives_in_directory_are_opened() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("src");
        fs::create_dir_all(&source).unwrap();
        fs::write(
            source.join("8.tar.gz"),
            tar_gz_bytes(&[("8/2.jpg", b"2"), ("8/1.jpg", b"1"), ("8/word.txt", b"acht")]).unwrap(),
        )
        .unwrap();
        let dest = temp_dir.path().join("out");

        let summary = extract_top_k(&source, &dest, &limited(1)).unwrap();

        assert_eq!(list_names(&dest.join("8")), vec!["1.jpg", "word.txt"]);
        assert_eq!(summary.words["8"].images, 1);
    }

    #[test]
    fn test_non_word_items_are_ignored() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("src");
        create_word_folder(&source, "4", &["a.jpg"], "vier").unwrap();
        fs::create_dir_all(source.join("notes")).unwrap();
        fs::write(source.join("notes/a.jpg"), b"a").unwrap();
        fs::write(source.join("index.csv"), b"id,word\n").unwrap();
        fs::write(source.join("extra.tar.gz"), b"not a word archive").unwrap();
        let dest = temp_dir.path().join("out");

        let summary = extract_top_k(&source, &dest, &limited(3)).unwrap();

        assert_eq!(list_names(&dest), vec!["4"]);
        assert!(summary.errors.is_empty());
    }

    #[test]
    fn test_empty_word_folder_is_still_created() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("src");
        fs::create_dir_all(source.join("77")).unwrap();
        let dest = temp_dir.path().join("out");

        let summary = extract_top_k(&source, &dest, &limited(3)).unwrap();

        assert!(dest.join("77").is_dir());
        assert_eq!(summary.words["77"].images, 0);
        assert_eq!(summary.short_words(), 1);
    }

    #[test]
    fn test_word_folder_and_word_archive_share_one_limit() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("src");
        create_word_folder(&source, "7", &["a.jpg"], "sieben").unwrap();
        fs::write(
            source.join("7.tar.gz"),
            tar_gz_bytes(&[("7/b.jpg", b"b")]).unwrap(),
        )
        .unwrap();
        let dest = temp_dir.path().join("out");

        let summary = extract_top_k(&source, &dest, &limited(1)).unwrap();

        assert_eq!(list_names(&dest.join("7")), vec!["a.jpg", "word.txt"]);
        assert_eq!(summary.words["7"].images, 1);
    }
}
