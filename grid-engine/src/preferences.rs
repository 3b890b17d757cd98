//! FILENAME: grid-engine/src/preferences.rs
//! PURPOSE: Retrieval options sent with every grid request.
//! CONTEXT: These are the settings of the SmartView options dialog
//! (suppression, zoom behaviour, labels). They are independent of any
//! session and can be saved to and restored from a JSON file.

use crate::error::PreferenceError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use wire::{ProviderKind, WireError, XmlWriter};

// ============================================================================
// OPTION VALUES
// ============================================================================

/// Where ancestors appear when a hierarchy is expanded (HFM only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AncestorPosition {
    Top,
    #[default]
    Bottom,
}

/// How far a member is expanded when zooming in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoomMode {
    #[default]
    Children,
    Descendents,
    Base,
}

/// Indentation of totals and sub-items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Indent {
    #[default]
    None,
    SubItems,
    Totals,
}

/// How member labels are displayed (HFM only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberDisplay {
    #[default]
    Name,
    Description,
    Both,
}

impl AncestorPosition {
    fn as_str(self) -> &'static str {
        match self {
            AncestorPosition::Top => "top",
            AncestorPosition::Bottom => "bottom",
        }
    }
}

impl ZoomMode {
    fn as_str(self) -> &'static str {
        match self {
            ZoomMode::Children => "children",
            ZoomMode::Descendents => "descendents",
            ZoomMode::Base => "base",
        }
    }
}

impl Indent {
    fn code(self) -> u8 {
        match self {
            Indent::None => 0,
            Indent::SubItems => 1,
            Indent::Totals => 2,
        }
    }
}

impl MemberDisplay {
    fn code(self) -> u8 {
        match self {
            MemberDisplay::Name => 0,
            MemberDisplay::Description => 1,
            MemberDisplay::Both => 2,
        }
    }
}

fn invalid(preference: &'static str, value: &str) -> PreferenceError {
    PreferenceError::Invalid {
        preference,
        value: value.to_string(),
    }
}

impl FromStr for AncestorPosition {
    type Err = PreferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "top" => Ok(AncestorPosition::Top),
            "bottom" => Ok(AncestorPosition::Bottom),
            _ => Err(invalid("ancestor_position", s)),
        }
    }
}

impl FromStr for ZoomMode {
    type Err = PreferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "children" => Ok(ZoomMode::Children),
            "descendents" => Ok(ZoomMode::Descendents),
            "base" => Ok(ZoomMode::Base),
            _ => Err(invalid("zoom_mode", s)),
        }
    }
}

impl FromStr for Indent {
    type Err = PreferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(Indent::None),
            "subitems" => Ok(Indent::SubItems),
            "totals" => Ok(Indent::Totals),
            _ => Err(invalid("indent", s)),
        }
    }
}

impl FromStr for MemberDisplay {
    type Err = PreferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name" => Ok(MemberDisplay::Name),
            "description" => Ok(MemberDisplay::Description),
            "both" => Ok(MemberDisplay::Both),
            _ => Err(invalid("member_display", s)),
        }
    }
}

// ============================================================================
// PREFERENCES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub suppress_zero: bool,
    pub suppress_invalid: bool,
    pub suppress_missing: bool,
    pub suppress_underscore: bool,
    pub suppress_noaccess: bool,
    pub ancestor_position: AncestorPosition,
    pub zoom_mode: ZoomMode,
    pub navigate_with_data: bool,
    pub include_selection: bool,
    pub within_selected_group: bool,
    pub remove_unselected_groups: bool,
    pub no_access_text: String,
    pub missing_text: String,
    pub member_display: MemberDisplay,
    pub suppress_repeated_members: bool,
    pub indent: Indent,
    pub alias_table: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Preferences {
            suppress_zero: false,
            suppress_invalid: false,
            suppress_missing: false,
            suppress_underscore: false,
            suppress_noaccess: false,
            ancestor_position: AncestorPosition::Bottom,
            zoom_mode: ZoomMode::Children,
            navigate_with_data: true,
            include_selection: true,
            within_selected_group: false,
            remove_unselected_groups: false,
            no_access_text: "#No Access".to_string(),
            missing_text: "#Missing".to_string(),
            member_display: MemberDisplay::Name,
            suppress_repeated_members: false,
            indent: Indent::None,
            alias_table: "none".to_string(),
        }
    }
}

fn flag(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}

impl Preferences {
    pub fn new() -> Self {
        Self::default()
    }

    // String setters, for options that arrive as free text (config files,
    // command lines). Matching is case-insensitive.

    pub fn set_ancestor_position(&mut self, value: &str) -> Result<(), PreferenceError> {
        self.ancestor_position = value.parse()?;
        Ok(())
    }

    pub fn set_zoom_mode(&mut self, value: &str) -> Result<(), PreferenceError> {
        self.zoom_mode = value.parse()?;
        Ok(())
    }

    pub fn set_indent(&mut self, value: &str) -> Result<(), PreferenceError> {
        self.indent = value.parse()?;
        Ok(())
    }

    pub fn set_member_display(&mut self, value: &str) -> Result<(), PreferenceError> {
        self.member_display = value.parse()?;
        Ok(())
    }

    /// Writes the `<preferences>` block. The alias table is only understood
    /// by Essbase providers and is left out for the others.
    pub fn write_xml(&self, w: &mut XmlWriter, provider: ProviderKind) -> Result<(), WireError> {
        let member_display = self.member_display.code().to_string();
        let indent = self.indent.code().to_string();

        w.element("preferences", &[], |w| {
            w.empty(
                "row_suppression",
                &[
                    ("zero", flag(self.suppress_zero)),
                    ("invalid", flag(self.suppress_invalid)),
                    ("missing", flag(self.suppress_missing)),
                    ("underscore", flag(self.suppress_underscore)),
                    ("noaccess", flag(self.suppress_noaccess)),
                ],
            )?;
            w.empty("celltext", &[("val", "0")])?;
            w.empty(
                "zoomin",
                &[
                    ("ancestor", self.ancestor_position.as_str()),
                    ("mode", self.zoom_mode.as_str()),
                ],
            )?;
            w.empty("navigate", &[("withData", flag(self.navigate_with_data))])?;
            w.empty("includeSelection", &[("val", flag(self.include_selection))])?;
            w.empty("repeatMemberLabels", &[("val", flag(!self.suppress_repeated_members))])?;
            w.empty("withinSelectedGroup", &[("val", flag(self.within_selected_group))])?;
            w.empty("removeUnselectedGroup", &[("val", flag(self.remove_unselected_groups))])?;
            w.empty("includeDescriptionInLabel", &[("val", member_display.as_str())])?;
            w.empty("missingLabelText", &[("val", self.missing_text.as_str())])?;
            w.empty("noAccessText", &[("val", self.no_access_text.as_str())])?;
            if provider == ProviderKind::Essbase {
                w.empty("aliasTableName", &[("val", self.alias_table.as_str())])?;
            }
            w.empty("essIndent", &[("val", indent.as_str())])
        })
    }

    pub fn to_json(&self) -> Result<String, PreferenceError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, PreferenceError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), PreferenceError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, PreferenceError> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }
}
