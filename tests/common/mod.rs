#![allow(dead_code)]

use std::{fs, path::Path};

use districtscope::DistrictType;
use shapefile::{
    dbase::{FieldName, FieldValue, Record, TableWriterBuilder},
    Point, Polygon, PolygonRing,
};

pub const NAD83_PRJ: &str = r#"GEOGCS["GCS_North_American_1983",DATUM["D_North_American_1983",SPHEROID["GRS_1980",6378137,298.257222101]],PRIMEM["Greenwich",0],UNIT["Degree",0.017453292519943295]]"#;

/// Clockwise square ring in lon/lat.
pub fn square(lon: f64, lat: f64, size: f64) -> Vec<Point> {
    vec![
        Point::new(lon, lat),
        Point::new(lon, lat + size),
        Point::new(lon + size, lat + size),
        Point::new(lon + size, lat),
        Point::new(lon, lat),
    ]
}

/// Write `<data_dir>/<name>/<name>.shp` (+ `.prj`) with one Texas square per `(id, lon, lat)`.
pub fn write_districts(data_dir: &Path, district_type: DistrictType, districts: &[(&str, f64, f64)]) {
    let in_texas: Vec<_> = districts.iter().map(|&(id, lon, lat)| ("48", id, lon, lat)).collect();
    write_state_districts(data_dir, district_type, &in_texas);
}

/// Like `write_districts`, with the state FIPS code of each square: `(state, id, lon, lat)`.
pub fn write_state_districts(data_dir: &Path, district_type: DistrictType, districts: &[(&str, &str, f64, f64)]) {
    let name = district_type.shapefile_name().unwrap();
    let field = district_type.id_field().unwrap();
    let dir = data_dir.join(name);
    fs::create_dir_all(&dir).unwrap();

    let table = TableWriterBuilder::new()
        .add_character_field(FieldName::try_from("STATEFP").unwrap(), 2)
        .add_character_field(FieldName::try_from(field).unwrap(), 3);
    let mut writer = shapefile::Writer::from_path(dir.join(format!("{name}.shp")), table).unwrap();
    for &(state, id, lon, lat) in districts {
        let polygon = Polygon::with_rings(vec![PolygonRing::Outer(square(lon, lat, 0.1))]);
        let mut record = Record::default();
        record.insert("STATEFP".to_string(), FieldValue::Character(Some(state.to_string())));
        record.insert(field.to_string(), FieldValue::Character(Some(id.to_string())));
        writer.write_shape_and_record(&polygon, &record).unwrap();
    }
    drop(writer);

    fs::write(dir.join(format!("{name}.prj")), NAD83_PRJ).unwrap();
}

/// Fixtures for every district type that has a shapefile, around Austin, TX.
///
/// Congressional district 10 also exists in California, listed first.
pub fn write_all(data_dir: &Path) {
    write_state_districts(data_dir, DistrictType::UsHouse, &[
        ("06", "10", -121.0, 37.7),
        ("48", "25", -97.9, 30.2),
        ("48", "10", -97.8, 30.2),
        ("48", "35", -97.7, 30.2),
    ]);
    write_districts(data_dir, DistrictType::StateHouse, &[("046", -97.75, 30.25), ("047", -97.85, 30.25)]);
    write_districts(data_dir, DistrictType::StateSenate, &[("14", -97.8, 30.3)]);
}
