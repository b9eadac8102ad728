use super::*;

#[test]
fn decode_png_dimensions_and_pixels() {
    let frame = FrameRGBA::solid(3, 2, [10, 20, 30, 255]);
    let png = frame.encode_png().unwrap();
    let back = decode_frame(&png).unwrap();
    assert_eq!(back.width, 3);
    assert_eq!(back.height, 2);
    assert_eq!(&back.data[..4], &[10, 20, 30, 255]);
    assert_eq!(back, frame);
}

#[test]
fn decode_rejects_garbage() {
    assert!(decode_frame(b"<html>quota exceeded</html>").is_err());
}

#[test]
fn validate_checks_buffer_length() {
    let mut frame = FrameRGBA::solid(2, 2, [0, 0, 0, 255]);
    frame.validate().unwrap();
    frame.data.pop();
    assert!(matches!(frame.validate(), Err(ReelError::Render(_))));
    assert!(FrameRGBA::solid(0, 4, [0; 4]).validate().is_err());
}
