// End-to-end tests: fixture files in a temporary data directory, driven
// through Session the way the dashboard pages use it.

use std::{fs, path::Path};

use accessatlas::{
    classify::NO_ACCESS,
    equity::PalmaValue,
    selection::SelectionField,
    AccessSelection, CurveComparison, CurveSelection, DataConfig, DegeneratePolicy, Mode, OpportunitySelection,
    Outcome, PalmaScale, PalmaSelection, Session, ETRS_TM35FIN,
};
use serde_json::{json, Value};
use tempfile::TempDir;

fn square(x: f64, y: f64) -> Value {
    json!({
        "type": "Polygon",
        "coordinates": [[[x, y], [x + 0.1, y], [x + 0.1, y + 0.1], [x, y + 0.1], [x, y]]],
    })
}

fn feature(geometry: Value, properties: Value) -> Value {
    json!({ "type": "Feature", "geometry": geometry, "properties": properties })
}

fn write_collection(path: &Path, features: Vec<Value>) {
    let collection = json!({ "type": "FeatureCollection", "features": features });
    fs::write(path, serde_json::to_vec(&collection).unwrap()).unwrap();
}

fn data_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    write_collection(&root.join("grid_access.geojson"), vec![
        feature(square(24.6, 60.2), json!({ "mncplty": "Espoo", "JL_aptk30": 6, "JL_aptk60": 12, "PP_aptk30": 0, "PP_aptk60": 0 })),
        feature(square(24.7, 60.2), json!({ "mncplty": "Espoo", "JL_aptk30": 0, "JL_aptk60": 3, "PP_aptk30": 0, "PP_aptk60": 0 })),
        feature(square(25.4, 65.0), json!({ "mncplty": "Oulu", "JL_aptk30": 2, "JL_aptk60": 60, "PP_aptk30": 0, "PP_aptk60": 0 })),
        feature(square(25.5, 65.0), json!({ "mncplty": "Oulu", "JL_aptk30": 0, "JL_aptk60": 0, "PP_aptk30": 0, "PP_aptk60": 0 })),
    ]);

    fs::write(root.join("access_ttm_pt.csv"), "id,nimi,trv__50\na,Espoo,10\nb,Espoo,20\nc,Oulu,5\n").unwrap();
    fs::write(root.join("access_ttm_cycling.csv"), "id,nimi,trv__50\na,Espoo,15\nb,Espoo,40\nc,Oulu,-1\n").unwrap();
    fs::write(
        root.join("grid.csv"),
        "id,nimi,he_7_12,he_13_15,he_16_17\na,Espoo,50,30,20\nb,Espoo,100,0,0\nc,Oulu,10,-5,0\n",
    ).unwrap();

    fs::write(
        root.join("palma.csv"),
        "kunta,nimi,jl_aptk_30\n049,Espoo,1.5\n564,Oulu,inf\n091,Helsinki,0.8\n092,Vantaa,NaN\n",
    ).unwrap();
    write_collection(&root.join("kunnat2023.geojson"), ["Espoo", "Oulu", "Helsinki", "Vantaa"].iter()
        .enumerate()
        .map(|(i, name)| feature(square(24.0 + i as f64, 60.0), json!({ "nimi": name })))
        .collect());

    write_collection(&root.join("merged_opportunities.geojson"), vec![
        feature(json!({ "type": "Point", "coordinates": [24.65, 60.21] }),
            json!({ "opprtnt": "Pharmacy", "mncplty": "Espoo", "name": "Apteekki", "color": "#DD6E82" })),
        feature(json!({ "type": "Point", "coordinates": [24.66, 60.22] }),
            json!({ "opprtnt": "School", "mncplty": "Espoo", "name": "Koulu", "color": "#476DBF" })),
        feature(json!({ "type": "Point", "coordinates": [25.45, 65.01] }),
            json!({ "opprtnt": "School", "mncplty": "Oulu", "name": "Koulu", "color": "#476DBF" })),
    ]);

    dir
}

fn access(area: &str, mode: Mode, cutoff: &str, shared_bins: bool) -> AccessSelection {
    AccessSelection {
        area: Some(area.into()),
        mode: Some(mode),
        opportunity: Some("Pharmacy".into()),
        cutoff: Some(cutoff.into()),
        shared_bins,
    }
}

#[test]
fn area_options_start_with_finland() {
    let dir = data_dir();
    let mut session = Session::open(dir.path()).unwrap();
    assert_eq!(session.area_options().unwrap(), vec!["Finland", "Espoo", "Oulu"]);
    assert_eq!(session.curve_municipalities().unwrap(), vec!["Espoo", "Oulu"]);
}

#[test]
fn access_map_uses_shared_intervals() {
    let dir = data_dir();
    let mut session = Session::open(dir.path()).unwrap();

    let map = session.access_map(&access("Espoo", Mode::Transit, "30 min", true)).unwrap().ready().unwrap();
    assert_eq!(map.column, "JL_aptk30");
    assert_eq!(map.bins.boundaries(), &[0.0, 2.0, 4.0, 6.0, 8.0, 10.0, 12.0]);
    assert_eq!(map.cells(), 1);
    assert_eq!(map.choropleth.title, "Number of accessible pharmacy");
    assert_eq!(map.choropleth.viewport.unwrap().zoom, 10);

    let own = session.access_map(&access("Espoo", Mode::Transit, "30", false)).unwrap().ready().unwrap();
    assert_eq!(own.bins.max(), 6.0);

    let finland = session.access_map(&access("Finland", Mode::Transit, "30", true)).unwrap().ready().unwrap();
    assert_eq!(finland.bins.max(), 60.0);
    assert_eq!(finland.cells(), 2);
    assert_eq!(finland.choropleth.viewport.unwrap().zoom, 7);
}

#[test]
fn access_map_without_access_is_a_single_category() {
    let dir = data_dir();
    let mut session = Session::open(dir.path()).unwrap();

    let map = session.access_map(&access("Oulu", Mode::Cycling, "30", true)).unwrap().ready().unwrap();
    assert!(map.bins.is_degenerate());
    assert_eq!(map.cells(), 2);
    assert!(map.choropleth.features.iter().all(|f| f.fill == NO_ACCESS));
    assert_eq!(map.choropleth.legend.len(), 1);
}

#[test]
fn access_map_reports_missing_fields_and_unknown_areas() {
    let dir = data_dir();
    let mut session = Session::open(dir.path()).unwrap();

    let incomplete = AccessSelection { area: Some("Espoo".into()), ..Default::default() };
    assert_eq!(
        session.access_map(&incomplete).unwrap().message().unwrap(),
        "Please select mode of transportation, opportunity type and travel time cut-off",
    );

    let nowhere = session.access_map(&access("Atlantis", Mode::Transit, "30", true)).unwrap();
    assert!(matches!(nowhere, Outcome::NoData(_)));
}

#[test]
fn access_map_writes_geojson_and_svg() {
    let dir = data_dir();
    let mut session = Session::open(dir.path()).unwrap();
    let map = session.access_map(&access("Finland", Mode::Transit, "30", true)).unwrap().ready().unwrap();

    let geojson = dir.path().join("out/map.geojson");
    let svg = dir.path().join("out/map.svg");
    map.choropleth.write_geojson(&geojson).unwrap();
    map.choropleth.write_svg(&svg).unwrap();

    let written: Value = serde_json::from_slice(&fs::read(&geojson).unwrap()).unwrap();
    assert_eq!(written["features"].as_array().unwrap().len(), 2);
    assert_eq!(written["features"][0]["properties"]["name"], "Espoo");
    assert!(fs::read_to_string(&svg).unwrap().contains("<path"));
}

#[test]
fn cumulative_curves_for_one_selection() {
    let dir = data_dir();
    let mut session = Session::open(dir.path()).unwrap();

    let curves = session.cumulative_curves(&CurveSelection::new(vec!["Espoo".into()])).unwrap().ready().unwrap();
    assert_eq!(curves.points.len(), 2 * 61);
    assert_eq!(curves.share("Espoo", Mode::Transit, 9), Some(0.0));
    assert_eq!(curves.share("Espoo", Mode::Transit, 10), Some(0.5));
    assert_eq!(curves.share("Espoo", Mode::Transit, 20), Some(1.0));
    assert_eq!(curves.share("Espoo", Mode::Cycling, 39), Some(0.5));
    assert_eq!(curves.share("Espoo", Mode::Cycling, 40), Some(1.0));

    let all = session.cumulative_curves(&CurveSelection::default()).unwrap().ready().unwrap();
    assert_eq!(all.groups(), vec!["All municipalities"]);
    assert!(all.title.ends_with("All municipalities"));
}

#[test]
fn unreachable_origins_stay_in_the_denominator() {
    let dir = data_dir();
    let mut session = Session::open(dir.path()).unwrap();

    let oulu = session.cumulative_curves(&CurveSelection::new(vec!["Oulu".into()])).unwrap().ready().unwrap();
    assert_eq!(oulu.share("Oulu", Mode::Transit, 5), Some(1.0));
    assert_eq!(oulu.share("Oulu", Mode::Cycling, 60), Some(0.0));

    let empty = session.cumulative_curves(&CurveSelection::new(vec!["Atlantis".into()])).unwrap();
    assert!(matches!(empty, Outcome::NoData(_)));
}

#[test]
fn comparison_of_two_selections() {
    let dir = data_dir();
    let mut session = Session::open(dir.path()).unwrap();

    let curves = session.compare_curves(&CurveComparison {
        first: vec!["Espoo".into()],
        second: vec!["Oulu".into()],
        max_minutes: None,
    }).unwrap().ready().unwrap();
    assert_eq!(curves.groups(), vec!["Espoo", "Oulu"]);

    let same = session.compare_curves(&CurveComparison {
        first: vec!["Espoo".into(), "Oulu".into()],
        second: vec!["Oulu".into(), "Espoo".into()],
        max_minutes: Some(30),
    }).unwrap().ready().unwrap();
    assert_eq!(same.groups(), vec!["Espoo, Oulu"]);
    assert_eq!(same.points.len(), 2 * 31);

    let half = session.compare_curves(&CurveComparison { first: vec!["Espoo".into()], ..Default::default() }).unwrap();
    assert_eq!(half, Outcome::Incomplete(vec![SelectionField::Municipalities]));

    let path = dir.path().join("curves.csv");
    curves.write_csv(&path).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 1 + 4 * 61);
}

fn palma_selection() -> PalmaSelection {
    PalmaSelection {
        mode: Some(Mode::Transit),
        opportunity: Some("aptk".into()),
        cutoff: Some("30 min".into()),
    }
}

#[test]
fn palma_ranks_and_flags() {
    let dir = data_dir();
    let mut session = Session::open(dir.path()).unwrap();

    let view = session.palma(&palma_selection(), DegeneratePolicy::Flag, PalmaScale::Wide).unwrap().ready().unwrap();
    let ranked = view.presentation.ranked.iter().map(|r| (r.rank, r.municipality.as_str())).collect::<Vec<_>>();
    assert_eq!(ranked, vec![(1, "Espoo"), (2, "Helsinki")]);
    assert_eq!(view.presentation.flagged.len(), 1);
    assert_eq!(view.presentation.flagged[0].value, PalmaValue::Infinite);

    assert_eq!(view.choropleth.features.len(), 3);
    assert!(view.choropleth.features.iter().all(|f| f.name != "Vantaa"));
    assert_eq!(view.choropleth.viewport.unwrap().zoom, 5);

    let path = dir.path().join("ranking.csv");
    view.write_ranking_csv(&path).unwrap();
    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().next(), Some("rank,Kunta,Palma ratio"));
    assert_eq!(text.lines().nth(1), Some("1,Espoo,1.5"));
}

#[test]
fn palma_drop_policy_hides_degenerate_municipalities() {
    let dir = data_dir();
    let mut session = Session::open(dir.path()).unwrap();

    let view = session.palma(&palma_selection(), DegeneratePolicy::Drop, PalmaScale::Narrow).unwrap().ready().unwrap();
    assert!(view.presentation.flagged.is_empty());
    assert_eq!(view.choropleth.features.len(), 2);
    assert_eq!(view.presentation.scale.vmax(), 2.0);

    let cycling = PalmaSelection { mode: Some(Mode::Cycling), ..palma_selection() };
    let outcome = session.palma(&cycling, DegeneratePolicy::Flag, PalmaScale::Wide).unwrap();
    assert!(matches!(outcome, Outcome::NoData(_)));
}

#[test]
fn opportunities_by_type_and_area() {
    let dir = data_dir();
    let mut session = Session::open(dir.path()).unwrap();
    assert_eq!(session.opportunity_types().unwrap(), vec!["Pharmacy", "School"]);
    assert_eq!(session.opportunity_areas().unwrap(), vec!["Finland", "Espoo", "Oulu"]);

    let summary = session.opportunities(&OpportunitySelection {
        types: vec!["School".into()],
        area: None,
    }).unwrap().ready().unwrap();
    assert_eq!(summary.total(), 2);
    assert_eq!(summary.counts[0].color.to_string(), "#476dbf");

    let espoo = session.opportunities(&OpportunitySelection {
        types: vec!["School".into(), "Pharmacy".into()],
        area: Some("Espoo".into()),
    }).unwrap().ready().unwrap();
    assert_eq!(espoo.counts.len(), 2);
    assert_eq!(espoo.points.viewport.unwrap().zoom, 9);

    let none = session.opportunities(&OpportunitySelection::default()).unwrap();
    assert!(matches!(none, Outcome::Incomplete(ref fields) if fields == &[SelectionField::OpportunityTypes]));
}

#[test]
fn missing_files_are_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = Session::open(dir.path()).unwrap();
    assert!(session.area_options().is_err());
    assert!(Session::open(&dir.path().join("missing")).is_err());
}

fn metric_square(easting: f64, northing: f64) -> Value {
    json!({
        "type": "Polygon",
        "coordinates": [[
            [easting, northing], [easting + 250.0, northing], [easting + 250.0, northing + 250.0],
            [easting, northing + 250.0], [easting, northing],
        ]],
    })
}

#[test]
fn projected_grid_is_reprojected_on_load() {
    let dir = data_dir();
    write_collection(&dir.path().join("grid_access.geojson"), vec![
        feature(metric_square(500_000.0, 6_651_411.0), json!({ "mncplty": "Espoo", "JL_aptk30": 4, "JL_aptk60": 8 })),
        feature(metric_square(500_250.0, 6_651_411.0), json!({ "mncplty": "Espoo", "JL_aptk30": 2, "JL_aptk60": 6 })),
    ]);
    let config = DataConfig { source_crs: Some(ETRS_TM35FIN.to_string()), ..DataConfig::default() };
    let mut session = Session::with_config(dir.path(), config);

    let map = session.access_map(&access("Espoo", Mode::Transit, "30", true)).unwrap().ready().unwrap();
    assert_eq!(map.cells(), 2);
    let viewport = map.choropleth.viewport.unwrap();
    assert!((viewport.lon - 27.0).abs() < 0.02, "lon {}", viewport.lon);
    assert!((viewport.lat - 60.0).abs() < 0.02, "lat {}", viewport.lat);

    let geojson = map.choropleth.to_geojson();
    let x = geojson["features"][0]["geometry"]["coordinates"][0][0][0].as_f64().unwrap();
    assert!((x - 27.0).abs() < 0.01);
}
