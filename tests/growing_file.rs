mod common;

use common::{create_test_file, leading_int};
use filebisect::source::{FileSource, MemorySource, MmapSource};
use filebisect::{
    bisect_seek_fixed_left, bisect_seek_left, extents, iter_inclusive, ByteSource, FixedLayout,
    IntegerField, SearchOptions,
};
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};

fn even_lines(from: i64, to: i64) -> Vec<u8> {
    let mut data = Vec::new();
    for key in (from..to).step_by(2) {
        data.extend_from_slice(format!("{key} event-{key}\n").as_bytes());
    }
    data
}

fn append(path: &std::path::Path, bytes: &[u8]) {
    let mut file = OpenOptions::new().append(true).open(path).unwrap();
    file.write_all(bytes).unwrap();
    file.flush().unwrap();
}

fn check_growth<S: ByteSource>(source: &S, path: &std::path::Path) {
    let key = leading_int();
    let opts = SearchOptions::new();

    let before = bisect_seek_left(source, &40, &key, &opts).unwrap();
    let end_before = bisect_seek_left(source, &1000, &key, &opts).unwrap();

    append(path, &even_lines(100, 300));

    // Keys below the old maximum are unaffected by appended larger keys
    assert_eq!(bisect_seek_left(source, &40, &key, &opts).unwrap(), before);
    // With `hi` unset the new records are searched as well
    assert_eq!(bisect_seek_left(source, &100, &key, &opts).unwrap(), end_before);
    assert!(bisect_seek_left(source, &250, &key, &opts).unwrap() > end_before);

    // A pinned `hi` keeps the old view
    let pinned = opts.with_hi(end_before);
    assert_eq!(bisect_seek_left(source, &250, &key, &pinned).unwrap(), end_before);
}

#[test]
fn file_source_sees_appended_records() {
    let file = create_test_file(&even_lines(0, 100));
    let source = FileSource::open(file.path()).unwrap();
    check_growth(&source, file.path());
}

#[test]
fn mmap_source_sees_appended_records() {
    let file = create_test_file(&even_lines(0, 100));
    let source = MmapSource::open(file.path()).unwrap();
    check_growth(&source, file.path());
}

#[test]
fn fixed_search_ignores_in_flight_partial_record() {
    let file = create_test_file(b"00010002000300");
    let source = FileSource::open(file.path()).unwrap();
    let layout = FixedLayout::new(4);
    let key = IntegerField::new(0, b' ');

    assert_eq!(
        bisect_seek_fixed_left(&source, &9, &layout, &key, &SearchOptions::new()).unwrap(),
        12
    );

    // The partial record completes
    append(file.path(), b"09");
    assert_eq!(
        bisect_seek_fixed_left(&source, &9, &layout, &key, &SearchOptions::new()).unwrap(),
        12
    );
    assert_eq!(
        bisect_seek_fixed_left(&source, &10, &layout, &key, &SearchOptions::new()).unwrap(),
        16
    );
}

#[test]
fn iteration_follows_growth_when_hi_unset() {
    let source = MemorySource::new(even_lines(0, 10));
    let key = leading_int();
    let (x, y) = (6, 20);
    let mut iter = iter_inclusive(&source, &x, &y, &key, &SearchOptions::new()).unwrap();

    assert_eq!(iter.next().unwrap().unwrap(), b"6 event-6\n");
    source.append(&even_lines(10, 14));

    let rest: Vec<Vec<u8>> = iter.collect::<Result<_, _>>().unwrap();
    assert_eq!(
        rest,
        vec![
            b"8 event-8\n".to_vec(),
            b"10 event-10\n".to_vec(),
            b"12 event-12\n".to_vec(),
        ]
    );
}

#[test]
fn concurrent_readers_against_appending_writer() {
    let file = create_test_file(&even_lines(0, 200));
    let path = file.path().to_path_buf();
    let key = leading_int();

    let reference = {
        let source = FileSource::open(&path).unwrap();
        extents(&source, &120, &key, &SearchOptions::new()).unwrap()
    };
    let writing = AtomicBool::new(true);

    std::thread::scope(|scope| {
        scope.spawn(|| {
            let mut writer = OpenOptions::new().append(true).open(&path).unwrap();
            for key in (200..2200).step_by(2) {
                // One record per write keeps every append atomic for readers
                writer
                    .write_all(format!("{key} event-{key}\n").as_bytes())
                    .unwrap();
            }
            writing.store(false, Ordering::SeqCst);
        });

        for _ in 0..4 {
            scope.spawn(|| {
                let source = FileSource::open(&path).unwrap();
                let mut rounds = 0;
                while writing.load(Ordering::SeqCst) || rounds < 20 {
                    let span = extents(&source, &120, &key, &SearchOptions::new()).unwrap();
                    assert_eq!(span, reference);
                    rounds += 1;
                }
            });
        }
    });

    let source = FileSource::open(&path).unwrap();
    let tail = bisect_seek_left(&source, &2198, &key, &SearchOptions::new()).unwrap();
    assert_eq!(source.read_range(tail, 64).unwrap(), b"2198 event-2198\n");
}
