use chrono::TimeZone;

use super::*;

const DOC: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2">
  <Document>
    <Style id="walk">
      <IconStyle><Icon><href>http://example.com/walk.png</href></Icon></IconStyle>
    </Style>
    <Style id="train">
      <IconStyle><Icon><href>http://example.com/train.png</href></Icon></IconStyle>
    </Style>
    <Placemark>
      <name>Station</name>
      <TimeStamp><when>2024-05-01T09:00:10Z</when></TimeStamp>
      <styleUrl>#train</styleUrl>
      <Point><coordinates>139.7671,35.6812,0</coordinates></Point>
    </Placemark>
    <Placemark>
      <TimeStamp><when>2024-05-01T09:00:00Z</when></TimeStamp>
      <styleUrl>#walk</styleUrl>
      <Point><coordinates> 139.7000,35.6900 </coordinates></Point>
    </Placemark>
  </Document>
</kml>
"##;

#[test]
fn placemarks_become_waypoints() {
    let wps = parse_kml(DOC).unwrap();
    assert_eq!(wps.len(), 2);

    assert_eq!(
        wps[0].timestamp,
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 10).unwrap()
    );
    assert_eq!(wps[0].icon_ref, "http://example.com/train.png");
    assert_eq!(wps[0].latitude, 35.6812);
    assert_eq!(wps[0].longitude, 139.7671);

    assert_eq!(wps[1].icon_ref, "http://example.com/walk.png");
    assert_eq!(wps[1].latitude, 35.69);
    assert_eq!(wps[1].longitude, 139.7);
}

#[test]
fn styles_declared_after_placemarks_still_resolve() {
    let doc = r##"<kml><Document>
      <Placemark><when>2024-05-01T09:00:00Z</when><styleUrl>#late</styleUrl>
        <coordinates>1,2</coordinates></Placemark>
      <Style id="late"><IconStyle><Icon><href>late.png</href></Icon></IconStyle></Style>
    </Document></kml>"##;
    let wps = parse_kml(doc).unwrap();
    assert_eq!(wps[0].icon_ref, "late.png");
}

#[test]
fn unresolved_style_ids_give_empty_icons_and_absolute_urls_are_kept() {
    let doc = r##"<kml>
      <Placemark><when>2024-05-01T09:00:00Z</when><styleUrl>#missing</styleUrl>
        <coordinates>1,2</coordinates></Placemark>
      <Placemark><when>2024-05-01T09:00:01Z</when><styleUrl>http://x/icon.png</styleUrl>
        <coordinates>1,2</coordinates></Placemark>
      <Placemark><when>2024-05-01T09:00:02Z</when><coordinates>1,2</coordinates></Placemark>
    </kml>"##;
    let wps = parse_kml(doc).unwrap();
    assert_eq!(wps[0].icon_ref, "");
    assert_eq!(wps[1].icon_ref, "http://x/icon.png");
    assert_eq!(wps[2].icon_ref, "");
}

#[test]
fn style_maps_resolve_through_their_normal_pair() {
    let doc = r##"<kml><Document>
      <Style id="a-normal"><IconStyle><Icon><href>bike.png</href></Icon></IconStyle></Style>
      <Style id="a-hover"><IconStyle><Icon><href>bike-big.png</href></Icon></IconStyle></Style>
      <StyleMap id="a">
        <Pair><key>highlight</key><styleUrl>#a-hover</styleUrl></Pair>
        <Pair><key>normal</key><styleUrl>#a-normal</styleUrl></Pair>
      </StyleMap>
      <StyleMap id="outer"><Pair><key>normal</key><styleUrl>#a</styleUrl></Pair></StyleMap>
      <StyleMap id="loop"><Pair><key>normal</key><styleUrl>#loop</styleUrl></Pair></StyleMap>
      <Placemark><when>2024-05-01T09:00:00Z</when><styleUrl>#a</styleUrl>
        <coordinates>139.7,35.6</coordinates></Placemark>
      <Placemark><when>2024-05-01T09:00:01Z</when><styleUrl>#outer</styleUrl>
        <coordinates>139.7,35.6</coordinates></Placemark>
      <Placemark><when>2024-05-01T09:00:02Z</when><styleUrl>#loop</styleUrl>
        <coordinates>139.7,35.6</coordinates></Placemark>
    </Document></kml>"##;
    let wps = parse_kml(doc).unwrap();
    let icons: Vec<&str> = wps.iter().map(|w| w.icon_ref.as_str()).collect();
    assert_eq!(icons, vec!["bike.png", "bike.png", ""]);
}

#[test]
fn inline_style_map_pairs_do_not_replace_the_placemark_style() {
    let doc = r##"<kml>
      <Style id="walk"><IconStyle><Icon><href>walk.png</href></Icon></IconStyle></Style>
      <Placemark>
        <StyleMap><Pair><key>normal</key><styleUrl>#other</styleUrl></Pair></StyleMap>
        <styleUrl>#walk</styleUrl>
        <when>2024-05-01T09:00:00Z</when><coordinates>1,2</coordinates>
      </Placemark>
    </kml>"##;
    assert_eq!(parse_kml(doc).unwrap()[0].icon_ref, "walk.png");
}

#[test]
fn when_accepts_dates_offsets_and_space_separated_times() {
    let cases = [
        ("2024-05-01", Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0)),
        ("2024-05", Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0)),
        ("2024", Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)),
        ("2024-05-01 09:00:00", Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0)),
        ("2024-05-01T09:00:00+0900", Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0)),
        ("2024-05-01T09:00:00.5-0130", Utc.with_ymd_and_hms(2024, 5, 1, 10, 30, 0)),
        ("2024-05-01 09:00:00+09:00", Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0)),
    ];
    for (text, want) in cases {
        let doc = format!(
            "<kml><Placemark><when>{text}</when><coordinates>1,2</coordinates></Placemark></kml>"
        );
        let got = parse_kml(&doc).unwrap()[0].timestamp;
        let want = want.unwrap();
        if text.contains(".5") {
            assert_eq!(got, want + chrono::TimeDelta::milliseconds(500), "{text}");
        } else {
            assert_eq!(got, want, "{text}");
        }
    }

    for bad in ["2024-13", "24", "2024-05-01T25:00:00", "May 1st"] {
        let doc = format!(
            "<kml><Placemark><when>{bad}</when><coordinates>1,2</coordinates></Placemark></kml>"
        );
        assert!(matches!(parse_kml(&doc), Err(ReelError::Parse(_))), "{bad}");
    }
}

#[test]
fn prefixed_elements_and_zoneless_times() {
    let doc = r##"<k:kml xmlns:k="http://www.opengis.net/kml/2.2">
      <k:Placemark>
        <k:TimeStamp><k:when>2024-05-01T09:30:00</k:when></k:TimeStamp>
        <k:Point><k:coordinates>10.5,-3.25,12 11,4</k:coordinates></k:Point>
      </k:Placemark>
    </k:kml>"##;
    let wps = parse_kml(doc).unwrap();
    assert_eq!(
        wps[0].timestamp,
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap()
    );
    assert_eq!(wps[0].longitude, 10.5);
    assert_eq!(wps[0].latitude, -3.25);
}

#[test]
fn missing_fields_are_parse_errors() {
    let no_when = "<kml><Placemark><coordinates>1,2</coordinates></Placemark></kml>";
    assert!(matches!(parse_kml(no_when), Err(ReelError::Parse(_))));

    let no_coords = "<kml><Placemark><when>2024-05-01T09:00:00Z</when></Placemark></kml>";
    assert!(matches!(parse_kml(no_coords), Err(ReelError::Parse(_))));

    let bad_time = "<kml><Placemark><when>yesterday</when><coordinates>1,2</coordinates></Placemark></kml>";
    assert!(matches!(parse_kml(bad_time), Err(ReelError::Parse(_))));

    let bad_coords =
        "<kml><Placemark><when>2024-05-01T09:00:00Z</when><coordinates>east</coordinates></Placemark></kml>";
    assert!(matches!(parse_kml(bad_coords), Err(ReelError::Parse(_))));
}

#[test]
fn malformed_xml_is_a_parse_error() {
    assert!(matches!(
        parse_kml("<kml><Placemark></kml>"),
        Err(ReelError::Parse(_))
    ));
}

#[test]
fn document_without_placemarks_is_empty() {
    assert!(parse_kml("<kml><Document/></kml>").unwrap().is_empty());
}
