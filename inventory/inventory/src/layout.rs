//! The static layout document: a catalog of hardware definitions plus the placement of racks on a floor.
//!
//! Positions and sizes are in grid units; views scale them to drawing units.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use math::Point;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_VIEW: &str = "Full";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub struct FloorLayout {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sysname: Option<String>,
    pub views: IndexMap<String, LayoutView>,
}

impl FloorLayout {
    /// The named view, or the first view when `name` is `None`.
    pub fn view(&self, name: Option<&str>) -> Result<(&str, &LayoutView), LayoutError> {
        match name {
            Some(name) => self
                .views
                .get_key_value(name)
                .map(|(name, view)| (name.as_str(), view))
                .ok_or_else(|| LayoutError::UnknownView(name.to_string())),
            None => self
                .views
                .first()
                .map(|(name, view)| (name.as_str(), view))
                .ok_or(LayoutError::NoViews),
        }
    }
}

#[derive(Deserialize)]
struct MultiViewDocument {
    #[serde(default)]
    sysname: Option<String>,
    views: IndexMap<String, LayoutView>,
}

/// Accepts both the multi-view document and a bare `{ floor, definitions }` view.
///
/// A document with a `views` key is always read as a multi-view document, so its errors are reported
/// as they are.
impl TryFrom<serde_json::Value> for FloorLayout {
    type Error = serde_json::Error;

    fn try_from(document: serde_json::Value) -> Result<Self, Self::Error> {
        if document.get("views").is_some() {
            let MultiViewDocument {
                sysname,
                views,
            } = serde_json::from_value(document)?;
            Ok(Self {
                sysname,
                views,
            })
        } else {
            let view: LayoutView = serde_json::from_value(document)?;
            Ok(Self {
                sysname: None,
                views: IndexMap::from([(DEFAULT_VIEW.to_string(), view)]),
            })
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutView {
    #[serde(default, rename = "view-description", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// index into `zoomscales`
    #[serde(default)]
    pub initzoom: usize,
    #[serde(default = "LayoutView::default_zoom_scales")]
    pub zoomscales: Vec<f64>,
    /// scale used by single-rack views
    #[serde(default = "LayoutView::default_rack_scale")]
    pub rackscale: f64,
    pub floor: FloorPlan,
    #[serde(alias = "types")]
    pub definitions: IndexMap<String, HardwareDefinition>,
}

impl LayoutView {
    fn default_zoom_scales() -> Vec<f64> {
        vec![1.0]
    }

    fn default_rack_scale() -> f64 {
        1.0
    }

    pub fn definition(&self, name: &str) -> Result<&HardwareDefinition, LayoutError> {
        self.definitions
            .get(name)
            .ok_or_else(|| LayoutError::UnknownDefinition(name.to_string()))
    }

    /// hwtype -> description, used for hover text.
    ///
    /// Definitions are listed under their own name and under their hwtype.
    pub fn descriptions(&self) -> BTreeMap<&str, &str> {
        let mut descriptions = BTreeMap::new();
        for (name, definition) in &self.definitions {
            descriptions.insert(name.as_str(), definition.description.as_str());
        }
        for (name, definition) in &self.definitions {
            descriptions
                .entry(definition.hwtype(name))
                .or_insert(definition.description.as_str());
        }
        descriptions
    }

    /// Checks every definition reference in the floor plan resolves and that no definition contains
    /// itself, directly or indirectly.
    pub fn validate(&self) -> Result<(), LayoutError> {
        let mut path = vec![];
        for item in &self.floor.content {
            self.validate_definition(&item.definition, &mut path)?;
        }
        Ok(())
    }

    fn validate_definition<'a>(&'a self, name: &'a str, path: &mut Vec<&'a str>) -> Result<(), LayoutError> {
        if path.contains(&name) {
            return Err(LayoutError::RecursiveDefinition(name.to_string()));
        }
        let definition = self.definition(name)?;

        path.push(name);
        for item in &definition.content {
            self.validate_definition(&item.definition, path)?;
        }
        path.pop();

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorPlan {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub width: f64,
    pub height: f64,
    pub content: Vec<ContentItem>,
}

impl FloorPlan {
    pub fn size(&self) -> Point {
        Point::new(self.width, self.height)
    }
}

/// A placement of a definition, relative to its container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub name: String,
    #[serde(alias = "type")]
    pub definition: String,
    pub x: f64,
    pub y: f64,
}

impl ContentItem {
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HardwareDefinition {
    #[serde(default)]
    pub description: String,
    /// hwtype of the elements built from this definition, defaults to the definition name
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub hwtype: Option<String>,
    pub width: f64,
    pub height: f64,
    /// the element itself is not drawn, its content is
    #[serde(default)]
    pub obscured: bool,
    #[serde(default)]
    pub content: Vec<ContentItem>,
}

impl HardwareDefinition {
    /// `name` is the key this definition is registered under.
    pub fn hwtype<'a>(&'a self, name: &'a str) -> &'a str {
        self.hwtype.as_deref().unwrap_or(name)
    }

    pub fn size(&self) -> Point {
        Point::new(self.width, self.height)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("Unknown hardware definition. definition: '{0}'")]
    UnknownDefinition(String),
    #[error("Hardware definition contains itself. definition: '{0}'")]
    RecursiveDefinition(String),
    #[error("Unknown layout view. view: '{0}'")]
    UnknownView(String),
    #[error("Layout has no views")]
    NoViews,
    #[error("Unknown rack placement. rack: '{0}'")]
    UnknownRack(String),
}
