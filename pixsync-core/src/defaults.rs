//! Built-in default catalogs
//!
//! Static configuration injected into the graph assembler: the default
//! palette catalog and the baseline settings document that on-disk settings
//! fragments are folded over.

use serde_json::{json, Map, Value};

/// One built-in palette
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultPalette {
    pub id: &'static str,
    pub name: &'static str,
    pub colors: [&'static str; 4],
}

/// The built-in palettes every project carries. Existing palettes with these
/// ids keep their user-edited colors and only gain the default metadata.
pub const DEFAULT_PALETTES: [DefaultPalette; 8] = [
    DefaultPalette {
        id: "default-bg-1",
        name: "Default BG 1",
        colors: ["F8E8C8", "D89048", "A82820", "301850"],
    },
    DefaultPalette {
        id: "default-bg-2",
        name: "Default BG 2",
        colors: ["E0F8A0", "78C838", "488818", "081800"],
    },
    DefaultPalette {
        id: "default-bg-3",
        name: "Default BG 3",
        colors: ["F8D8A8", "E0A878", "785888", "002030"],
    },
    DefaultPalette {
        id: "default-bg-4",
        name: "Default BG 4",
        colors: ["B8D0D0", "D880D8", "8000A0", "380000"],
    },
    DefaultPalette {
        id: "default-bg-5",
        name: "Default BG 5",
        colors: ["F8F8B8", "90C8C8", "486878", "082048"],
    },
    DefaultPalette {
        id: "default-bg-6",
        name: "Default BG 6",
        colors: ["F8D8B0", "78C078", "688840", "583820"],
    },
    DefaultPalette {
        id: "default-sprite",
        name: "Default Sprites",
        colors: ["F8F0E0", "D88078", "B05010", "000000"],
    },
    DefaultPalette {
        id: "default-ui",
        name: "Default UI",
        colors: ["F8F8B8", "90C8C8", "486878", "082048"],
    },
];

/// Baseline settings document. The saved `settings.pxres` /
/// `user_settings.pxres` fragments shallow-merge over this, in path order.
pub fn default_project_settings() -> Map<String, Value> {
    let defaults = json!({
        "startSceneId": "",
        "startX": 0,
        "startY": 0,
        "startMoveSpeed": 1,
        "startAnimSpeed": 15,
        "startDirection": "down",
        "showCollisions": true,
        "showConnections": "selected",
        "showNavigator": true,
        "defaultBackgroundPaletteIds": [
            "default-bg-1",
            "default-bg-2",
            "default-bg-3",
            "default-bg-4",
            "default-bg-5",
            "default-bg-6",
            "default-sprite",
            "default-ui"
        ],
        "defaultSpritePaletteId": "default-sprite",
        "defaultUIPaletteId": "default-ui",
        "customHead": "",
        "worldScrollX": 0,
        "worldScrollY": 0,
        "zoom": 100
    });
    match defaults {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_palette_catalog_has_eight_entries() {
        assert_eq!(DEFAULT_PALETTES.len(), 8);
        assert!(DEFAULT_PALETTES.iter().any(|p| p.id == "default-sprite"));
        assert!(DEFAULT_PALETTES.iter().all(|p| p.colors.len() == 4));
    }

    #[test]
    fn test_default_settings_include_user_viewport_keys() {
        let settings = default_project_settings();
        assert_eq!(settings.get("worldScrollX"), Some(&Value::from(0)));
        assert_eq!(settings.get("zoom"), Some(&Value::from(100)));
    }
}
