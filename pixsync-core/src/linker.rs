//! Resource grouping and scene linking
//!
//! Scene ownership of actors and triggers is not stored as a foreign key:
//! it is reconstructed from path containment (`<sceneFolder>/actors/...`,
//! `<sceneFolder>/triggers/...`). Child order within a scene comes from the
//! `_index` field, never from directory listing order.

use std::collections::HashMap;

use serde_json::Value;

use crate::loader::{from_data, LoadError, LoadedResource};
use crate::types::{ActorResource, SceneResource, TriggerResource};

const ACTORS_SUBFOLDER: &str = "/actors/";
const TRIGGERS_SUBFOLDER: &str = "/triggers/";

/// Group loaded resources by their declared type discriminator. Unrecognized
/// discriminators group under their raw value.
pub fn group_resources(resources: Vec<LoadedResource>) -> HashMap<String, Vec<LoadedResource>> {
    let mut lookup: HashMap<String, Vec<LoadedResource>> = HashMap::new();
    for resource in resources {
        lookup.entry(resource.kind.clone()).or_default().push(resource);
    }
    lookup
}

fn sort_by_index(rows: &mut [LoadedResource]) {
    rows.sort_by_key(|row| row.data.get("_index").and_then(Value::as_u64).unwrap_or(0));
}

/// Group child rows by their owning scene folder: the path prefix before the
/// trailing `/actors/<file>` or `/triggers/<file>` segment
fn group_by_scene_folder(
    mut rows: Vec<LoadedResource>,
    subfolder: &str,
) -> HashMap<String, Vec<LoadedResource>> {
    sort_by_index(&mut rows);
    let mut lookup: HashMap<String, Vec<LoadedResource>> = HashMap::new();
    for row in rows {
        let folder_index = row.path.rfind(subfolder).unwrap_or(0);
        let scene_folder = row.path[..folder_index].to_string();
        lookup.entry(scene_folder).or_default().push(row);
    }
    lookup
}

fn posix_dirname(path: &str) -> &str {
    path.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
}

/// Attach actors and triggers to their owning scenes. Scenes with no
/// matching children get empty arrays.
pub fn link_scenes(
    scenes: Vec<LoadedResource>,
    actors: Vec<LoadedResource>,
    triggers: Vec<LoadedResource>,
) -> Result<Vec<SceneResource>, LoadError> {
    let mut actors_by_folder = group_by_scene_folder(actors, ACTORS_SUBFOLDER);
    let mut triggers_by_folder = group_by_scene_folder(triggers, TRIGGERS_SUBFOLDER);

    scenes
        .into_iter()
        .map(|row| {
            let scene_dir = posix_dirname(&row.path).to_string();
            let mut scene: SceneResource = from_data(&row.path, row.data)?;
            scene.actors = typed_children(actors_by_folder.remove(&scene_dir))?;
            scene.triggers = typed_children(triggers_by_folder.remove(&scene_dir))?;
            Ok(scene)
        })
        .collect()
}

fn typed_children<T: serde::de::DeserializeOwned>(
    rows: Option<Vec<LoadedResource>>,
) -> Result<Vec<T>, LoadError> {
    rows.unwrap_or_default()
        .into_iter()
        .map(|row| from_data(&row.path, row.data))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(path: &str, kind: &str, data: Value) -> LoadedResource {
        LoadedResource {
            path: path.to_string(),
            kind: kind.to_string(),
            data,
        }
    }

    #[test]
    fn test_actors_order_by_index_not_filename() {
        let scenes = vec![row(
            "project/scenes/cave__s1/scene.pxres",
            "scene",
            json!({"_resourceType": "scene", "id": "s1", "name": "Cave"}),
        )];
        // Reverse filename-alphabetical order versus `_index`
        let actors = vec![
            row(
                "project/scenes/cave__s1/actors/aaa__a2.pxres",
                "actor",
                json!({"_resourceType": "actor", "id": "a2", "name": "aaa", "_index": 1}),
            ),
            row(
                "project/scenes/cave__s1/actors/zzz__a1.pxres",
                "actor",
                json!({"_resourceType": "actor", "id": "a1", "name": "zzz", "_index": 0}),
            ),
        ];

        let linked = link_scenes(scenes, actors, Vec::new()).unwrap();
        assert_eq!(linked.len(), 1);
        let ids: Vec<&str> = linked[0].actors.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["a1", "a2"]);
    }

    #[test]
    fn test_children_attach_only_to_owning_scene() {
        let scenes = vec![
            row(
                "project/scenes/cave__s1/scene.pxres",
                "scene",
                json!({"_resourceType": "scene", "id": "s1"}),
            ),
            row(
                "project/scenes/town__s2/scene.pxres",
                "scene",
                json!({"_resourceType": "scene", "id": "s2"}),
            ),
        ];
        let triggers = vec![row(
            "project/scenes/town__s2/triggers/door__t1.pxres",
            "trigger",
            json!({"_resourceType": "trigger", "id": "t1", "_index": 0}),
        )];

        let linked = link_scenes(scenes, Vec::new(), triggers).unwrap();
        assert!(linked[0].triggers.is_empty());
        assert_eq!(linked[1].triggers.len(), 1);
        assert_eq!(linked[1].triggers[0].id, "t1");
    }

    #[test]
    fn test_group_resources_keeps_unknown_kinds() {
        let lookup = group_resources(vec![row(
            "project/widgets/w__1.pxres",
            "widget",
            json!({"_resourceType": "widget", "id": "w1"}),
        )]);
        assert_eq!(lookup.get("widget").map(Vec::len), Some(1));
    }
}
