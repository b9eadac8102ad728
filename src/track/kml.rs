use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::{
    foundation::error::{ReelError, ReelResult},
    route::waypoint::Waypoint,
};

/// Read a KML document from disk and extract its placemarks as waypoints.
pub fn read_kml_path(path: impl AsRef<Path>) -> ReelResult<Vec<Waypoint>> {
    let path = path.as_ref();
    let xml = std::fs::read_to_string(path)
        .with_context(|| format!("read KML '{}'", path.display()))?;
    parse_kml(&xml)
}

/// Extract one waypoint per `<Placemark>`.
///
/// - timestamp from `<when>`: RFC 3339, `xsd:date`, `gYearMonth` or `gYear`; a space may
///   replace the `T`, offsets may be written `+0900`, and a zone-less value is taken as UTC
/// - icon from `<styleUrl>`: `#id` is resolved through `<Style id="id">...<href>` or through
///   the `normal` pair of `<StyleMap id="id">`; a `#id` that resolves to nothing gives an
///   empty icon, any other URL is used as is
/// - position from the first `lon,lat[,alt]` tuple of `<coordinates>`
///
/// Elements are matched by local name, so namespace prefixes are ignored.
#[tracing::instrument(skip(xml), fields(bytes = xml.len()))]
pub fn parse_kml(xml: &str) -> ReelResult<Vec<Waypoint>> {
    let mut reader = Reader::from_str(xml);
    let mut doc = KmlDoc::default();

    loop {
        let event = reader.read_event().map_err(|e| {
            ReelError::parse(format!(
                "malformed KML near byte {}: {e}",
                reader.buffer_position()
            ))
        })?;
        match event {
            Event::Start(e) => doc.open(&e)?,
            Event::End(_) => doc.close(),
            Event::Text(t) => {
                let text = t
                    .unescape()
                    .map_err(|e| ReelError::parse(format!("bad KML text: {e}")))?;
                doc.text(text.trim());
            }
            Event::CData(c) => doc.text(String::from_utf8_lossy(&c).trim()),
            Event::Eof => break,
            _ => {}
        }
    }

    tracing::debug!(
        placemarks = doc.placemarks.len(),
        styles = doc.styles.len(),
        style_maps = doc.style_maps.len(),
        "parsed KML"
    );
    let KmlDoc {
        styles,
        style_maps,
        placemarks,
        ..
    } = doc;
    let icons = IconTable { styles, style_maps };
    placemarks
        .into_iter()
        .enumerate()
        .map(|(i, d)| d.into_waypoint(i, &icons))
        .collect()
}

/// Streaming state while walking the document.
#[derive(Debug, Default)]
struct KmlDoc {
    stack: Vec<String>,
    style_id: Option<String>,
    style_map_id: Option<String>,
    pair: Option<StylePair>,
    draft: Option<PlacemarkDraft>,
    styles: HashMap<String, String>,
    style_maps: HashMap<String, String>,
    placemarks: Vec<PlacemarkDraft>,
}

#[derive(Debug, Default)]
struct StylePair {
    key: Option<String>,
    style_url: Option<String>,
}

impl KmlDoc {
    fn open(&mut self, e: &BytesStart<'_>) -> ReelResult<()> {
        let name = local_name(e);
        match name.as_str() {
            "Style" => self.style_id = attr(e, "id")?,
            "StyleMap" => self.style_map_id = attr(e, "id")?,
            "Pair" => self.pair = Some(StylePair::default()),
            "Placemark" => self.draft = Some(PlacemarkDraft::default()),
            _ => {}
        }
        self.stack.push(name);
        Ok(())
    }

    fn close(&mut self) {
        match self.stack.pop().as_deref() {
            Some("Style") => self.style_id = None,
            Some("StyleMap") => self.style_map_id = None,
            Some("Pair") => {
                if let Some(pair) = self.pair.take()
                    && pair.key.as_deref() == Some("normal")
                    && let (Some(id), Some(url)) = (&self.style_map_id, pair.style_url)
                {
                    self.style_maps.entry(id.clone()).or_insert(url);
                }
            }
            Some("Placemark") => self.placemarks.extend(self.draft.take()),
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        let Some(tag) = self.stack.last() else {
            return;
        };
        if text.is_empty() {
            return;
        }
        // Innermost container wins: a pair may sit inside an inline StyleMap of a placemark.
        if let Some(pair) = self.pair.as_mut() {
            let slot = match tag.as_str() {
                "key" => &mut pair.key,
                "styleUrl" => &mut pair.style_url,
                _ => return,
            };
            slot.get_or_insert_with(|| text.to_owned());
        } else if let Some(d) = self.draft.as_mut() {
            let slot = match tag.as_str() {
                "when" => &mut d.when,
                "styleUrl" => &mut d.style_url,
                "coordinates" => &mut d.coordinates,
                _ => return,
            };
            slot.get_or_insert_with(|| text.to_owned());
        } else if let Some(id) = &self.style_id
            && tag == "href"
        {
            self.styles
                .entry(id.clone())
                .or_insert_with(|| text.to_owned());
        }
    }
}

/// Style ids collected from the whole document, resolved once parsing is done.
#[derive(Debug)]
struct IconTable {
    styles: HashMap<String, String>,
    style_maps: HashMap<String, String>,
}

impl IconTable {
    /// Bounds `StyleMap` chains so a cycle cannot loop forever.
    const MAX_HOPS: usize = 8;

    fn resolve(&self, url: &str) -> String {
        let mut url = url;
        for _ in 0..Self::MAX_HOPS {
            let Some(id) = url.strip_prefix('#') else {
                return url.to_owned();
            };
            if let Some(href) = self.styles.get(id) {
                return href.clone();
            }
            match self.style_maps.get(id) {
                Some(next) => url = next.as_str(),
                None => break,
            }
        }
        String::new()
    }
}

#[derive(Debug, Default)]
struct PlacemarkDraft {
    when: Option<String>,
    style_url: Option<String>,
    coordinates: Option<String>,
}

impl PlacemarkDraft {
    fn into_waypoint(self, idx: usize, icons: &IconTable) -> ReelResult<Waypoint> {
        let when = self
            .when
            .ok_or_else(|| ReelError::parse(format!("placemark {idx}: missing <when>")))?;
        let timestamp = parse_when(&when).ok_or_else(|| {
            ReelError::parse(format!("placemark {idx}: bad timestamp '{when}'"))
        })?;

        let coordinates = self
            .coordinates
            .ok_or_else(|| ReelError::parse(format!("placemark {idx}: missing <coordinates>")))?;
        let (longitude, latitude) = parse_lon_lat(&coordinates).ok_or_else(|| {
            ReelError::parse(format!("placemark {idx}: bad coordinates '{coordinates}'"))
        })?;

        let icon_ref = self
            .style_url
            .map(|url| icons.resolve(&url))
            .unwrap_or_default();

        Ok(Waypoint {
            timestamp,
            icon_ref,
            latitude,
            longitude,
        })
    }
}

fn local_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

fn attr(e: &BytesStart<'_>, key: &str) -> ReelResult<Option<String>> {
    let Some(a) = e
        .try_get_attribute(key)
        .map_err(|err| ReelError::parse(format!("bad KML attribute '{key}': {err}")))?
    else {
        return Ok(None);
    };
    let value = a
        .unescape_value()
        .map_err(|err| ReelError::parse(format!("bad KML attribute '{key}': {err}")))?;
    Ok(Some(value.into_owned()))
}

const ZONED_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

fn parse_when(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t.with_timezone(&Utc));
    }
    if let Some(t) = ZONED_FORMATS
        .iter()
        .find_map(|f| DateTime::parse_from_str(s, f).ok())
    {
        return Some(t.with_timezone(&Utc));
    }
    if let Some(t) = NAIVE_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
    {
        return Some(t.and_utc());
    }
    parse_calendar_date(s).and_then(|d| d.and_hms_opt(0, 0, 0)).map(|t| t.and_utc())
}

/// `xsd:date` (`2024-05-01`), `gYearMonth` (`2024-05`) or `gYear` (`2024`), at midnight UTC.
fn parse_calendar_date(s: &str) -> Option<NaiveDate> {
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    let mut parts = s.split('-');
    let year = parts.next().filter(|y| y.len() == 4)?.parse::<i32>().ok()?;
    let month = match parts.next() {
        Some(m) if m.len() == 2 => m.parse::<u32>().ok()?,
        Some(_) => return None,
        None => 1,
    };
    if parts.next().is_some() {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// KML tuples are `lon,lat[,alt]`; only the first tuple is used.
fn parse_lon_lat(s: &str) -> Option<(f64, f64)> {
    let tuple = s.split_whitespace().next()?;
    let mut parts = tuple.split(',').map(str::trim);
    let lon = parts.next()?.parse::<f64>().ok()?;
    let lat = parts.next()?.parse::<f64>().ok()?;
    (lon.is_finite() && lat.is_finite()).then_some((lon, lat))
}

#[cfg(test)]
#[path = "../../tests/unit/track/kml.rs"]
mod tests;
