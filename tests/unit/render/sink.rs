use super::*;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("unit_sink").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

fn cfg(frames: u64) -> SinkConfig {
    SinkConfig {
        frames,
        rate: Rate::ONE_SECOND,
    }
}

#[test]
fn png_sink_writes_zero_padded_files() {
    let dir = scratch_dir("padded");
    let mut sink = PngDirSink::new(&dir);
    let frame = FrameRGBA::solid(4, 4, [200, 10, 10, 255]);

    sink.begin(cfg(3)).unwrap();
    for i in 0..3 {
        sink.push_frame(FrameIndex(i), &frame).unwrap();
    }
    sink.end().unwrap();

    assert_eq!(sink.written(), 3);
    for name in ["0000.png", "0001.png", "0002.png"] {
        let bytes = std::fs::read(dir.join(name)).unwrap();
        let img = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(img.dimensions(), (4, 4));
        assert_eq!(img.get_pixel(1, 1).0, [200, 10, 10, 255]);
    }
}

#[test]
fn png_sink_rejects_out_of_order_frames() {
    let dir = scratch_dir("order");
    let mut sink = PngDirSink::new(&dir).with_digits(6);
    let frame = FrameRGBA::solid(2, 2, [0, 0, 0, 255]);

    sink.begin(cfg(2)).unwrap();
    sink.push_frame(FrameIndex(0), &frame).unwrap();
    assert!(matches!(
        sink.push_frame(FrameIndex(0), &frame),
        Err(ReelError::Render(_))
    ));
    assert!(dir.join("000000.png").exists());
    assert_eq!(sink.frame_path(FrameIndex(9)), dir.join("000009.png"));
}

#[test]
fn png_sink_rejects_inconsistent_frames() {
    let dir = scratch_dir("bad_frame");
    let mut sink = PngDirSink::new(&dir);
    let mut frame = FrameRGBA::solid(2, 2, [0, 0, 0, 255]);
    frame.data.truncate(3);

    sink.begin(cfg(1)).unwrap();
    assert!(sink.push_frame(FrameIndex(0), &frame).is_err());
    assert_eq!(sink.written(), 0);
}

#[test]
fn in_memory_sink_captures_everything() {
    let mut sink = InMemorySink::new();
    let frame = FrameRGBA::solid(1, 1, [1, 2, 3, 4]);
    sink.begin(cfg(2)).unwrap();
    sink.push_frame(FrameIndex(0), &frame).unwrap();
    sink.push_frame(FrameIndex(1), &frame).unwrap();
    assert!(!sink.ended());
    sink.end().unwrap();

    assert!(sink.ended());
    assert_eq!(sink.config(), Some(cfg(2)));
    assert_eq!(sink.frames().len(), 2);
    assert_eq!(sink.frames()[1].0, FrameIndex(1));
    assert!(sink.is_complete());
}

#[test]
fn in_memory_sink_looks_up_ticks_and_flags_short_renders() {
    let mut sink = InMemorySink::new();
    let red = FrameRGBA::solid(1, 1, [255, 0, 0, 255]);
    let blue = FrameRGBA::solid(1, 1, [0, 0, 255, 255]);
    sink.begin(cfg(3)).unwrap();
    sink.push_frame(FrameIndex(0), &red).unwrap();
    sink.push_frame(FrameIndex(1), &blue).unwrap();
    sink.end().unwrap();

    assert_eq!(sink.frame(FrameIndex(1)), Some(&blue));
    assert_eq!(sink.frame(FrameIndex(2)), None);
    assert!(sink.ended());
    assert!(!sink.is_complete());

    sink.begin(cfg(1)).unwrap();
    assert!(sink.frames().is_empty());
    assert!(!sink.ended());
}
