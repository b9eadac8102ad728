use chrono::{TimeZone, Utc};

use super::*;

#[test]
fn waypoints_survive_json() {
    let wps = vec![
        Waypoint::new(
            Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap(),
            "a.png",
            35.5,
            139.25,
        ),
        Waypoint::new(
            Utc.with_ymd_and_hms(2024, 5, 1, 9, 5, 0).unwrap(),
            "b.png",
            -1.0,
            2.0,
        ),
    ];
    let mut buf = Vec::new();
    write_waypoints_json(&mut buf, &wps).unwrap();
    let back = read_waypoints_json(buf.as_slice()).unwrap();
    assert_eq!(back, wps);
}

#[test]
fn reads_handwritten_json() {
    let src = r#"[{"timestamp":"2024-05-01T09:00:00Z","icon_ref":"x","latitude":1.5,"longitude":2.5}]"#;
    let wps = read_waypoints_json(src.as_bytes()).unwrap();
    assert_eq!(wps.len(), 1);
    assert_eq!(wps[0].icon_ref, "x");
    assert_eq!(wps[0].latitude, 1.5);
}

#[test]
fn missing_fields_are_parse_errors() {
    let src = r#"[{"timestamp":"2024-05-01T09:00:00Z","latitude":1.5}]"#;
    assert!(matches!(
        read_waypoints_json(src.as_bytes()),
        Err(ReelError::Parse(_))
    ));
}
