//! JSON input decoding.
//!
//! Input records are decoded into raw option-typed rows first so that a
//! missing field surfaces as a [`DataShapeError::MissingField`] naming the
//! field, rather than as an opaque serde message.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;

use camino::Utf8Path;
use geo::{Coord, LineString, Polygon};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use hexgravity_core::{
    CategoryConfig, ClampBounds, DataShapeError, DecayParams, EngineConfig, HexCell, Poi, Reducer,
    Tags,
};

use crate::CliError;

fn read_json<T: DeserializeOwned>(path: &Utf8Path) -> Result<T, CliError> {
    let file = File::open(path).map_err(|source| CliError::Io {
        path: path.to_owned(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| CliError::Parse {
        path: path.to_owned(),
        source,
    })
}

/// One POI row as it appears on disk.
#[derive(Debug, Deserialize)]
struct PoiRecord {
    id: Option<u64>,
    category: Option<String>,
    lon: Option<f64>,
    lat: Option<f64>,
    #[serde(default)]
    tags: Tags,
}

impl PoiRecord {
    fn into_poi(self) -> Result<Poi, DataShapeError> {
        let id = self.id.ok_or(DataShapeError::MissingField { field: "id" })?;
        let category = self.category.ok_or(DataShapeError::MissingField {
            field: "category",
        })?;
        let lon = self.lon.ok_or(DataShapeError::MissingField { field: "lon" })?;
        let lat = self.lat.ok_or(DataShapeError::MissingField { field: "lat" })?;
        Poi::new(id, category, Coord { x: lon, y: lat }, self.tags)
    }
}

/// Load and validate the POI table.
pub(crate) fn load_pois(path: &Utf8Path) -> Result<Vec<Poi>, CliError> {
    let records: Vec<PoiRecord> = read_json(path)?;
    records
        .into_iter()
        .map(|record| record.into_poi().map_err(CliError::from))
        .collect()
}

/// One hex cell as it appears on disk, boundary as [lon, lat] pairs.
#[derive(Debug, Deserialize)]
struct HexRecord {
    id: Option<String>,
    boundary: Option<Vec<[f64; 2]>>,
}

impl HexRecord {
    fn into_cell(self) -> Result<HexCell, DataShapeError> {
        let id = self.id.ok_or(DataShapeError::MissingField { field: "id" })?;
        let boundary = self.boundary.ok_or(DataShapeError::MissingField {
            field: "boundary",
        })?;
        let ring: Vec<Coord<f64>> = boundary.into_iter().map(|[x, y]| Coord { x, y }).collect();
        HexCell::new(id, Polygon::new(LineString::from(ring), Vec::new()))
    }
}

/// Load and validate the hex grid.
pub(crate) fn load_hexes(path: &Utf8Path) -> Result<Vec<HexCell>, CliError> {
    let records: Vec<HexRecord> = read_json(path)?;
    records
        .into_iter()
        .map(|record| record.into_cell().map_err(CliError::from))
        .collect()
}

/// The scoring configuration as it appears on disk.
#[derive(Debug, Deserialize)]
struct ConfigFile {
    categories: BTreeMap<String, CategoryEntry>,
    clamp: Option<[f64; 2]>,
}

#[derive(Debug, Deserialize)]
struct CategoryEntry {
    saturation_m: f64,
    decay_m: f64,
    #[serde(default)]
    reducer: Reducer,
    #[serde(default = "default_weight")]
    weight: f64,
}

fn default_weight() -> f64 {
    1.0
}

/// Load and validate the engine configuration.
pub(crate) fn load_config(path: &Utf8Path) -> Result<EngineConfig, CliError> {
    let file: ConfigFile = read_json(path)?;
    let clamp = match file.clamp {
        Some([lower, upper]) => ClampBounds::new(lower, upper)?,
        None => ClampBounds::default(),
    };
    let mut categories = BTreeMap::new();
    for (name, entry) in file.categories {
        let decay = DecayParams::new(entry.saturation_m, entry.decay_m)?;
        let category = CategoryConfig::new(decay, entry.reducer, entry.weight)?;
        categories.insert(name, category);
    }
    Ok(EngineConfig::new(categories, clamp)?)
}
