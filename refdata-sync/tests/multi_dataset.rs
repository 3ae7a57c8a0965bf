//! End-to-end pipeline runs across multiple datasets with a fake upstream.

use std::collections::HashMap;
use std::io::{Cursor, Write};
use std::path::PathBuf;

use tempfile::TempDir;
use zip::write::SimpleFileOptions;

use refdata_core::{ColumnSpec, DatasetName, DatasetSpec, FetchSpec, LocatorSpec, Version};
use refdata_sync::{
    status, sync_all, HttpClient, HttpError, HttpResponse, SyncStatus,
};

/// Fake upstream keyed by URL; unknown URLs get a transport error.
#[derive(Default)]
struct FakeUpstream {
    get: HashMap<String, HttpResponse>,
    head: HashMap<String, HttpResponse>,
}

impl FakeUpstream {
    fn on_get(&mut self, url: &str, response: HttpResponse) {
        self.get.insert(url.to_owned(), response);
    }

    fn on_head(&mut self, url: &str, response: HttpResponse) {
        self.head.insert(url.to_owned(), response);
    }
}

impl HttpClient for FakeUpstream {
    fn get(&self, url: &str) -> Result<HttpResponse, HttpError> {
        self.get.get(url).cloned().ok_or_else(|| HttpError::Transport {
            url: url.to_owned(),
            reason: "no route to host".into(),
        })
    }

    fn head(&self, url: &str) -> Result<HttpResponse, HttpError> {
        self.head.get(url).cloned().ok_or_else(|| HttpError::Transport {
            url: url.to_owned(),
            reason: "no route to host".into(),
        })
    }
}

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn dataset_names(datasets: &[DatasetSpec]) -> Vec<DatasetName> {
    datasets.iter().map(|d| d.name.clone()).collect()
}

fn response(status: u16, body: &[u8]) -> HttpResponse {
    HttpResponse::new(status, HashMap::new(), body.to_vec())
}

fn head_response(version: &str) -> HttpResponse {
    let mut headers = HashMap::new();
    headers.insert("Last-Modified".to_string(), version.to_string());
    HttpResponse::new(200, headers, Vec::new())
}

fn zip_with(member: &str, contents: &[u8]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file(member, SimpleFileOptions::default())
        .unwrap();
    writer.write_all(contents).unwrap();
    writer.finish().unwrap().into_inner()
}

fn column(source: &str) -> ColumnSpec {
    ColumnSpec {
        source: source.to_owned(),
        rename: None,
    }
}

fn cities_spec() -> DatasetSpec {
    DatasetSpec {
        name: DatasetName::from("cities"),
        locator: LocatorSpec::Scrape {
            page_url: "https://maps.test/data/us-cities".into(),
            pattern: r"us-cities/([\d\.]+)/basic/uscities_v[\d\.]+\.zip".into(),
            download_template: "https://maps.test/us-cities/{version}/basic/uscities_v{version}.zip".into(),
        },
        fetch: FetchSpec::Archive {
            member: "uscities.csv".into(),
        },
        columns: vec![
            column("city"),
            column("state_id"),
            column("lat"),
            column("lng"),
            column("population"),
        ],
        raw_path: PathBuf::from("uscities.csv"),
        output_path: PathBuf::from("city_population.json"),
        version_path: PathBuf::from("latest_city_version.txt"),
    }
}

fn counties_spec() -> DatasetSpec {
    DatasetSpec {
        name: DatasetName::from("counties"),
        locator: LocatorSpec::Probe {
            url: "https://opendata.test/export/csv".into(),
            header: "Last-Modified".into(),
        },
        fetch: FetchSpec::Direct,
        columns: vec![column("coty_code"), column("coty_name")],
        raw_path: PathBuf::from("counties.csv"),
        output_path: PathBuf::from("counties.json"),
        version_path: PathBuf::from("latest_county_version.txt"),
    }
}

const CITIES_CSV: &[u8] = b"\
city,state_id,state_name,lat,lng,population\n\
New York,NY,New York,40.6943,-73.9249,18908608\n\
Los Angeles,CA,California,34.1141,-118.4068,11922389\n\
Chicago,IL,Illinois,41.8375,-87.6866,8497759\n";

const COUNTIES_CSV: &[u8] = b"coty_code,coty_name,extra\n01001,Autauga,x\n01003,Baldwin,y\n";

fn healthy_upstream() -> FakeUpstream {
    let mut upstream = FakeUpstream::default();
    upstream.on_get(
        "https://maps.test/data/us-cities",
        response(
            200,
            b"<a href=\"/static/us-cities/1.90/basic/uscities_v1.90.zip\">Download</a>",
        ),
    );
    upstream.on_get(
        "https://maps.test/us-cities/1.90/basic/uscities_v1.90.zip",
        response(200, &zip_with("uscities.csv", CITIES_CSV)),
    );
    upstream.on_head("https://opendata.test/export/csv", head_response("v-2025-08"));
    upstream.on_get(
        "https://opendata.test/export/csv",
        response(200, COUNTIES_CSV),
    );
    upstream
}

#[test]
fn full_run_updates_both_datasets_and_reports() {
    init_logs();
    let root = TempDir::new().expect("root");
    let upstream = healthy_upstream();
    let datasets = [cities_spec(), counties_spec()];

    let outcomes = sync_all(&datasets, &upstream, root.path());
    assert_eq!(outcomes.len(), 2);
    assert_eq!(
        outcomes[0].status,
        SyncStatus::Updated {
            old: None,
            new: Version::from("1.90"),
        }
    );
    assert_eq!(
        outcomes[1].status,
        SyncStatus::Updated {
            old: None,
            new: Version::from("v-2025-08"),
        }
    );

    // Version records match the located versions.
    assert_eq!(
        std::fs::read_to_string(root.path().join("latest_city_version.txt")).expect("city version"),
        "1.90"
    );
    assert_eq!(
        std::fs::read_to_string(root.path().join("latest_county_version.txt"))
            .expect("county version"),
        "v-2025-08"
    );

    // Artifacts parse as arrays with one element per raw row minus header.
    let cities: Vec<serde_json::Value> = serde_json::from_str(
        &std::fs::read_to_string(root.path().join("city_population.json")).expect("cities json"),
    )
    .expect("parse cities");
    assert_eq!(cities.len(), 3);
    let counties: Vec<serde_json::Value> = serde_json::from_str(
        &std::fs::read_to_string(root.path().join("counties.json")).expect("counties json"),
    )
    .expect("parse counties");
    assert_eq!(counties.len(), 2);

    // Projection: declared fields only, in declared order.
    let fields: Vec<&String> = cities[0].as_object().expect("record").keys().collect();
    assert_eq!(fields, ["city", "state_id", "lat", "lng", "population"]);
    // FIPS codes keep their leading zeros.
    assert_eq!(counties[0]["coty_code"], serde_json::json!("01001"));

    status::write_report(root.path(), &dataset_names(&datasets), &outcomes).expect("report");
    let report = std::fs::read_to_string(root.path().join(status::STATUS_FILE)).expect("report");
    assert_eq!(report.lines().count(), 2);
}

#[test]
fn second_run_with_no_upstream_change_is_up_to_date_and_byte_identical() {
    init_logs();
    let root = TempDir::new().expect("root");
    let upstream = healthy_upstream();
    let datasets = [cities_spec(), counties_spec()];

    sync_all(&datasets, &upstream, root.path());
    let cities_1 = std::fs::read(root.path().join("city_population.json")).expect("read");
    let version_1 = std::fs::read(root.path().join("latest_city_version.txt")).expect("read");

    let outcomes = sync_all(&datasets, &upstream, root.path());
    assert!(
        outcomes
            .iter()
            .all(|o| matches!(o.status, SyncStatus::UpToDate { .. })),
        "second run must be a no-op: {outcomes:?}"
    );
    assert_eq!(
        std::fs::read(root.path().join("city_population.json")).expect("read"),
        cities_1
    );
    assert_eq!(
        std::fs::read(root.path().join("latest_city_version.txt")).expect("read"),
        version_1
    );
}

#[test]
fn one_dataset_failing_check_does_not_block_the_other() {
    init_logs();
    let root = TempDir::new().expect("root");
    let mut upstream = healthy_upstream();
    // The cities listing page got redesigned; the version pattern is gone.
    upstream.on_get(
        "https://maps.test/data/us-cities",
        response(200, b"<html>welcome to our new site</html>"),
    );

    let datasets = [cities_spec(), counties_spec()];
    let outcomes = sync_all(&datasets, &upstream, root.path());

    assert!(matches!(
        outcomes[0].status,
        SyncStatus::CheckFailed { .. }
    ));
    assert!(matches!(outcomes[1].status, SyncStatus::Updated { .. }));
    assert!(root.path().join("counties.json").exists());
    assert!(!root.path().join("city_population.json").exists());

    status::write_report(root.path(), &dataset_names(&datasets), &outcomes).expect("report");
    let report = std::fs::read_to_string(root.path().join(status::STATUS_FILE)).expect("report");
    assert!(report.contains("cities: failed to check"));
    assert!(report.contains("counties: first sync"));
}

#[test]
fn failed_download_keeps_prior_version_and_reports_fetch_failure() {
    init_logs();
    let root = TempDir::new().expect("root");
    let upstream = healthy_upstream();
    let datasets = [cities_spec()];
    sync_all(&datasets, &upstream, root.path());

    // A new release appears upstream but its download 404s.
    let mut upstream = healthy_upstream();
    upstream.on_get(
        "https://maps.test/data/us-cities",
        response(
            200,
            b"<a href=\"/static/us-cities/1.91/basic/uscities_v1.91.zip\">Download</a>",
        ),
    );
    upstream.on_get(
        "https://maps.test/us-cities/1.91/basic/uscities_v1.91.zip",
        response(404, b"not found"),
    );

    let outcomes = sync_all(&datasets, &upstream, root.path());
    assert!(matches!(outcomes[0].status, SyncStatus::FetchFailed { .. }));
    assert_eq!(
        std::fs::read_to_string(root.path().join("latest_city_version.txt")).expect("version"),
        "1.90",
        "a failed fetch must not advance the version"
    );

    status::write_report(root.path(), &dataset_names(&datasets), &outcomes).expect("report");
    let report = std::fs::read_to_string(root.path().join(status::STATUS_FILE)).expect("report");
    assert!(report.contains("download failed"));
}
