use geojson::{Feature, FeatureCollection, Geometry, Value as GeoJsonValue};
use serde_json::json;

use crate::model::{Node, Pipe};
use crate::{Error, NetworkEditor};

impl NetworkEditor {
    /// Converts the network to a `GeoJSON` `FeatureCollection`: one point per
    /// node followed by one line per pipe.
    pub fn to_geojson(&self) -> Result<FeatureCollection, Error> {
        let mut features = Vec::with_capacity(self.nodes().len() + self.pipes().len());

        for node in self.nodes() {
            features.push(create_node_feature(node)?);
        }
        for pipe in self.pipes() {
            features.push(create_pipe_feature(pipe)?);
        }

        Ok(FeatureCollection {
            features,
            bbox: None,
            foreign_members: None,
        })
    }

    pub fn to_geojson_string(&self) -> Result<String, Error> {
        serde_json::to_string(&self.to_geojson()?).map_err(|e| Error::GeoJsonError(e.to_string()))
    }
}

fn create_node_feature(node: &Node) -> Result<Feature, Error> {
    let geometry = Geometry::new(GeoJsonValue::from(&node.geometry));

    let value = json!({
        "type": "Feature",
        "geometry": geometry,
        "properties": {
            "kind": "node",
            "nodeid": node.id,
            "nodename": node.name,
            "isesr": node.is_esr,
            "in_pipes": node.in_pipes,
            "out_pipes": node.out_pipes,
        }
    });

    Feature::from_json_value(value).map_err(|e| Error::GeoJsonError(e.to_string()))
}

fn create_pipe_feature(pipe: &Pipe) -> Result<Feature, Error> {
    let geometry = Geometry::new(GeoJsonValue::from(&pipe.geometry));

    let value = json!({
        "type": "Feature",
        "geometry": geometry,
        "properties": {
            "kind": "pipe",
            "pipeid": pipe.id,
            "originid": pipe.origin,
            "destinationid": pipe.destination,
            "length": pipe.length(),
            "color": pipe.style.color,
            "weight": pipe.style.weight,
        }
    });

    Feature::from_json_value(value).map_err(|e| Error::GeoJsonError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use crate::NetworkEditor;

    #[test]
    fn features_for_nodes_and_pipes() {
        let mut editor = NetworkEditor::default();
        let a = editor.add_node(20.0, 78.0, Some("A"), None).unwrap();
        let b = editor.add_node(21.0, 79.0, Some("B"), None).unwrap();
        editor.add_pipe(a, b, None).unwrap();

        let collection = editor.to_geojson().unwrap();
        assert_eq!(collection.features.len(), 3);

        let kinds: Vec<String> = collection
            .features
            .iter()
            .map(|f| f.property("kind").unwrap().as_str().unwrap().to_string())
            .collect();
        assert_eq!(kinds, vec!["node", "node", "pipe"]);

        let text = editor.to_geojson_string().unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["type"], "FeatureCollection");
        assert_eq!(value["features"][0]["geometry"]["coordinates"], serde_json::json!([78.0, 20.0]));
        assert_eq!(value["features"][2]["geometry"]["type"], "LineString");
    }
}
