use dupfold::actions::{copy_file, CopyError, Materializer};
use dupfold::duplicates::DuplicateFinder;
use filetime::FileTime;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write(path: &Path, content: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

#[test]
fn test_copy_duplicates_places_every_member() {
    let src = tempdir().unwrap();
    let dest = tempdir().unwrap();
    write(&src.path().join("one").join("a.bin"), b"payload");
    write(&src.path().join("two").join("b.bin"), b"payload");
    write(&src.path().join("c.bin"), b"payloaX");

    let result = DuplicateFinder::with_defaults()
        .find_duplicates(src.path())
        .unwrap();
    let report = Materializer::new(dest.path())
        .copy_duplicates(&result.hashes)
        .unwrap();

    assert_eq!(report.duplicates_copied, 2);
    assert_eq!(report.bytes_written, 14);
    assert_eq!(fs::read(dest.path().join("a.bin")).unwrap(), b"payload");
    assert_eq!(fs::read(dest.path().join("b.bin")).unwrap(), b"payload");
    assert!(!dest.path().join("c.bin").exists());
}

#[test]
fn test_copy_is_flat() {
    let src = tempdir().unwrap();
    let dest = tempdir().unwrap();
    write(&src.path().join("deep").join("er").join("x.bin"), b"flat");

    let result = DuplicateFinder::with_defaults()
        .find_duplicates(src.path())
        .unwrap();
    Materializer::new(dest.path())
        .copy_originals(&result.corpus.seen)
        .unwrap();

    assert!(dest.path().join("x.bin").is_file());
    assert!(!dest.path().join("deep").exists());
}

#[test]
fn test_copy_originals_does_not_touch_existing_targets() {
    let src = tempdir().unwrap();
    let dest = tempdir().unwrap();
    write(&src.path().join("keep.bin"), b"new content");
    write(&dest.path().join("keep.bin"), b"old");

    let mtime = FileTime::from_unix_time(1_000_000, 0);
    filetime::set_file_mtime(dest.path().join("keep.bin"), mtime).unwrap();

    let result = DuplicateFinder::with_defaults()
        .find_duplicates(src.path())
        .unwrap();
    let report = Materializer::new(dest.path())
        .copy_originals(&result.corpus.seen)
        .unwrap();

    assert_eq!(report.originals_copied, 0);
    assert_eq!(report.originals_skipped, 1);
    assert_eq!(fs::read(dest.path().join("keep.bin")).unwrap(), b"old");

    let meta = fs::metadata(dest.path().join("keep.bin")).unwrap();
    assert_eq!(FileTime::from_last_modification_time(&meta), mtime);
}

#[test]
fn test_second_originals_pass_is_a_no_op() {
    let src = tempdir().unwrap();
    let dest = tempdir().unwrap();
    write(&src.path().join("a.bin"), b"1");
    write(&src.path().join("b.bin"), b"22");

    let result = DuplicateFinder::with_defaults()
        .find_duplicates(src.path())
        .unwrap();
    let materializer = Materializer::new(dest.path());

    let first = materializer.copy_originals(&result.corpus.seen).unwrap();
    assert_eq!(first.originals_copied, 2);

    let mtime = FileTime::from_unix_time(2_000_000, 0);
    filetime::set_file_mtime(dest.path().join("a.bin"), mtime).unwrap();

    let second = materializer.copy_originals(&result.corpus.seen).unwrap();
    assert_eq!(second.originals_copied, 0);
    assert_eq!(second.originals_skipped, 2);

    let meta = fs::metadata(dest.path().join("a.bin")).unwrap();
    assert_eq!(FileTime::from_last_modification_time(&meta), mtime);
}

#[test]
fn test_duplicates_overwrite_existing_targets() {
    let src = tempdir().unwrap();
    let dest = tempdir().unwrap();
    write(&src.path().join("a.bin"), b"dup");
    write(&src.path().join("b.bin"), b"dup");
    write(&dest.path().join("a.bin"), b"stale bytes");

    let result = DuplicateFinder::with_defaults()
        .find_duplicates(src.path())
        .unwrap();
    Materializer::new(dest.path())
        .copy_duplicates(&result.hashes)
        .unwrap();

    assert_eq!(fs::read(dest.path().join("a.bin")).unwrap(), b"dup");
}

#[test]
fn test_missing_destination_is_not_created() {
    let src = tempdir().unwrap();
    let parent = tempdir().unwrap();
    let dest = parent.path().join("dest_files");
    write(&src.path().join("a.bin"), b"x");

    let result = DuplicateFinder::with_defaults()
        .find_duplicates(src.path())
        .unwrap();
    let err = Materializer::new(&dest)
        .copy_originals(&result.corpus.seen)
        .unwrap_err();

    assert!(matches!(err, CopyError::Io { .. }));
    assert!(!dest.exists());
}

#[test]
fn test_copy_file_reports_bytes() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("in.bin");
    let target = dir.path().join("out.bin");
    write(&source, &[7u8; 4096]);

    let copied = copy_file(&source, &target).unwrap();

    assert_eq!(copied, 4096);
    assert_eq!(fs::read(&target).unwrap(), vec![7u8; 4096]);
}

#[test]
fn test_copy_file_missing_source() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("gone.bin");
    let err = copy_file(&source, &dir.path().join("out.bin")).unwrap_err();

    assert_eq!(err.source_path(), source.as_path());
    assert!(!dir.path().join("out.bin").exists());
}
