use std::{
    fs,
    io::{BufRead, BufReader, Write},
    net::TcpListener,
    path::Path,
    thread::spawn,
};

use assertor::{assert_that, FloatAssertion};
use geoview_core::{
    cache::CachedResolver, compute_view, source::listing::list_candidates, Document, ErrorKind,
    FeatureFilter, GeoSourceResolver, Resolve, SourceConfig, ViewOptions, ViewState,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use tempdir::TempDir;

fn view_of(json: &str, options: &ViewOptions) -> ViewState {
    let doc = Document::from_slice(json.as_bytes(), "inline").unwrap();
    compute_view(&doc, options).unwrap()
}

#[test]
fn point_centers_on_itself() {
    let view = view_of(
        r#"{"features":[{"geometry":{"coordinates":[-100.0, 40.0]}}]}"#,
        &ViewOptions::conus(),
    );
    assert_eq!(view.latitude, 40.0);
    assert_eq!(view.longitude, -100.0);
}

#[test]
fn line_centers_on_mean() {
    let view = view_of(
        r#"{"features":[{"geometry":{"coordinates":[[-100,40],[-102,42]]}}]}"#,
        &ViewOptions::conus(),
    );
    assert_eq!(view.latitude, 41.0);
    assert_eq!(view.longitude, -101.0);
}

#[test]
fn empty_collection_uses_defaults() {
    let view = view_of(r#"{"features":[]}"#, &ViewOptions::world());
    assert_eq!(
        view,
        ViewState {
            latitude: 0.0,
            longitude: 0.0,
            zoom: 1.0
        }
    );
}

#[test]
fn mean_of_realistic_outlook() {
    let view = view_of(
        r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "geometry": {
                        "type": "MultiPolygon",
                        "coordinates": [[[[-97.1, 35.2], [-96.3, 35.9], [-95.8, 34.7], [-97.1, 35.2]]]]
                    },
                    "properties": {"DN": 2, "LABEL": "TSTM"}
                },
                {
                    "type": "Feature",
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[[-90.4, 38.6], [-89.9, 39.1], [-90.4, 38.6]]]
                    },
                    "properties": {"DN": 3, "LABEL": "MRGL"}
                }
            ]
        }"#,
        &ViewOptions::conus(),
    );
    let lons = [-97.1, -96.3, -95.8, -97.1, -90.4, -89.9, -90.4];
    let lats = [35.2, 35.9, 34.7, 35.2, 38.6, 39.1, 38.6];
    // absolute tolerance only, a relative one turns negative for western longitudes
    assert_that!(view.longitude)
        .with_abs_tol(1e-9)
        .is_approx_equal_to(lons.iter().sum::<f64>() / 7.0);
    assert_that!(view.latitude)
        .with_abs_tol(1e-9)
        .is_approx_equal_to(lats.iter().sum::<f64>() / 7.0);
    assert_eq!(view.zoom, 4.0);
}

/// Serve one HTTP request with the given status line and no body
fn serve_status(status: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());
        let mut line = String::new();
        while reader.read_line(&mut line).unwrap() > 2 {
            line.clear();
        }
        write!(
            stream,
            "HTTP/1.1 {status}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
        )
        .unwrap();
    });
    format!("http://{addr}/day1otlk_cat.nolyr.geojson")
}

#[test]
fn remote_503_is_unavailable() {
    let url = serve_status("503 Service Unavailable");
    let resolver = GeoSourceResolver::new().unwrap();
    let err = resolver.resolve(&SourceConfig::remote(url)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SourceUnavailable);
    assert!(err.to_string().contains("503"));
}

#[test]
fn missing_file_differs_from_malformed_file() {
    let dir = TempDir::new("geoview_scenarios").unwrap();
    let resolver = GeoSourceResolver::new().unwrap();

    let err = resolver
        .resolve(&SourceConfig::file(dir.path().join("nope.geojson")))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SourceUnavailable);

    let path = dir.path().join("bad.geojson");
    fs::write(&path, "not json at all").unwrap();
    let err = resolver.resolve(&SourceConfig::file(&path)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedDocument);
}

#[test]
fn list_filter_and_view() {
    let dir = TempDir::new("geoview_scenarios").unwrap();
    let written = json!({
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "geometry": {"type": "Point", "coordinates": [10.0, 20.0]}, "properties": {"LABEL": "SLGT"}},
            {"type": "Feature", "geometry": {"type": "Point", "coordinates": [30.0, 40.0]}, "properties": {"LABEL": "TSTM"}}
        ]
    });
    fs::create_dir_all(dir.path().join("a")).unwrap();
    fs::write(dir.path().join("a/b.geojson"), written.to_string()).unwrap();
    fs::write(dir.path().join("a/readme.md"), "# data").unwrap();

    let candidates = list_candidates(dir.path()).unwrap();
    assert_eq!(candidates, vec![Path::new("a/b.geojson").to_path_buf()]);

    let resolver = CachedResolver::new(GeoSourceResolver::new().unwrap());
    let config = SourceConfig::directory(dir.path(), &candidates[0]);
    let doc = resolver.resolve(&config).unwrap();
    assert_eq!(doc.as_value(), written);

    let slight = doc.filter_features(&FeatureFilter::new("LABEL", ["SLGT"]));
    let view = compute_view(&slight, &ViewOptions::world()).unwrap();
    assert_eq!((view.longitude, view.latitude), (10.0, 20.0));

    // served from the cache even after the file is gone
    fs::remove_file(dir.path().join("a/b.geojson")).unwrap();
    assert_eq!(resolver.resolve(&config).unwrap(), doc);
}
