// County names of the map features.

use crate::mapping::*;

use std::fs;

/// Reads the names of the map features, in file order.
///
/// The file is either a GeoJSON feature collection, in which case the name is
/// read in the given property of each feature, or a plain array of names.
/// Features without that property are skipped.
pub fn read_geometry_names(path: &str, name_property: &str) -> BMapResult<Vec<String>> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(&contents).context(ParsingJsonSnafu { path })?;
    Ok(geometry_names(&js, name_property, path)?)
}

fn geometry_names(js: &JSValue, name_property: &str, path: &str) -> MapResult<Vec<String>> {
    if let Some(names) = js.as_array() {
        return Ok(names
            .iter()
            .filter_map(|n| n.as_str().map(|s| s.to_string()))
            .collect());
    }
    let features = js
        .get("features")
        .and_then(|f| f.as_array())
        .context(JsonLayoutSnafu {
            path,
            message: "expected a feature collection or an array of names",
        })?;
    let mut res: Vec<String> = Vec::new();
    for (idx, feature) in features.iter().enumerate() {
        match feature
            .get("properties")
            .and_then(|p| p.get(name_property))
        {
            Some(JSValue::String(s)) => res.push(s.clone()),
            Some(JSValue::Number(n)) => res.push(n.to_string()),
            _ => {
                warn!(
                    "read_geometry_names: feature {} of {} has no property {}",
                    idx, path, name_property
                );
            }
        }
    }
    debug!("read_geometry_names: {:?}", res);
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_collection() {
        let names = read_geometry_names(&test_file("tn_counties.geojson"), "NAME").unwrap();
        assert_eq!(names, vec!["Davidson", "Knox", "Shelby", "Hamilton"]);
    }

    #[test]
    fn other_layouts() {
        let js = json!({"type": "FeatureCollection", "features": [
            {"type": "Feature", "properties": {"COUNTY": "Adair"}},
            {"type": "Feature", "properties": {"NAME": "Beaver"}},
            {"type": "Feature"}
        ]});
        assert_eq!(geometry_names(&js, "COUNTY", "inline").unwrap(), vec!["Adair"]);
        let js = json!(["Adair", 3, "Le Flore"]);
        assert_eq!(
            geometry_names(&js, "NAME", "inline").unwrap(),
            vec!["Adair", "Le Flore"]
        );
        assert!(geometry_names(&json!({"type": "Feature"}), "NAME", "inline").is_err());
    }
}
