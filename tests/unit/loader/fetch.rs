use std::{io::Cursor, time::Duration};

use super::*;

fn png_bytes(rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_raw(2, 1, [rgba, rgba].concat()).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "framescrub_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

#[test]
fn normalize_locator_strips_root_and_rejects_traversal() {
    assert_eq!(
        normalize_locator("/Frames/frame_001.jpg").unwrap(),
        "Frames/frame_001.jpg"
    );
    assert_eq!(normalize_locator("a\\.\\b.png").unwrap(), "a/b.png");
    assert!(normalize_locator("/Frames/../secret.jpg").is_err());
    assert!(normalize_locator("/").is_err());
}

#[test]
fn memory_fetcher_completes_synchronously() {
    let mut fetcher = MemoryFrameFetcher::new();
    fetcher.insert("/f/1.png", png_bytes([9, 8, 7, 255]));
    let (tx, rx) = crossbeam_channel::unbounded();

    fetcher.fetch(
        FrameRequest {
            index: FrameIndex(0),
            locator: "/f/1.png".to_string(),
        },
        tx.clone(),
    );
    fetcher.fetch(
        FrameRequest {
            index: FrameIndex(1),
            locator: "/f/2.png".to_string(),
        },
        tx,
    );

    let first = rx.try_recv().unwrap();
    assert_eq!(first.index, FrameIndex(0));
    assert_eq!(first.outcome.unwrap().width, 2);

    let second = rx.try_recv().unwrap();
    assert_eq!(second.index, FrameIndex(1));
    let failure = second.outcome.unwrap_err();
    assert_eq!(failure.locator, "/f/2.png");
}

#[test]
fn fs_fetcher_loads_and_reports_missing_files() {
    let tmp = temp_dir("fs_fetcher");
    std::fs::create_dir_all(tmp.join("Frames")).unwrap();
    std::fs::write(tmp.join("Frames/frame_001.png"), png_bytes([1, 2, 3, 255])).unwrap();

    let fetcher = FsFrameFetcher::new(&tmp, Some(2)).unwrap();
    assert_eq!(fetcher.root(), tmp.as_path());
    let (tx, rx) = crossbeam_channel::unbounded();
    fetcher.fetch(
        FrameRequest {
            index: FrameIndex(0),
            locator: "/Frames/frame_001.png".to_string(),
        },
        tx.clone(),
    );
    fetcher.fetch(
        FrameRequest {
            index: FrameIndex(1),
            locator: "/Frames/frame_002.png".to_string(),
        },
        tx,
    );

    let mut got = [
        rx.recv_timeout(Duration::from_secs(10)).unwrap(),
        rx.recv_timeout(Duration::from_secs(10)).unwrap(),
    ];
    got.sort_by_key(|c| c.index);
    assert!(got[0].is_ready());
    assert!(!got[1].is_ready());
    assert!(
        got[1]
            .outcome
            .as_ref()
            .unwrap_err()
            .reason
            .contains("frame_002.png")
    );

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn zero_threads_is_a_configuration_error() {
    let err = FsFrameFetcher::new(".", Some(0)).unwrap_err();
    assert!(matches!(err, ScrubError::Configuration(_)));
}
