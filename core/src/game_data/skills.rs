//! Skill name lookup.
//!
//! A static table covers common skills. Hosts with a fuller client database
//! can layer their own names on top via a TOML skill table:
//!
//! ```toml
//! [[skill]]
//! id = 19
//! name = "Fire Bolt"
//! ```

use std::fs;
use std::path::Path;

use dpsmeter_types::unknown_skill_label;
use hashbrown::HashMap;
use phf::phf_map;
use serde::Deserialize;

use super::CatalogError;
use crate::feed::SkillId;

/// Read-only skill id to display name lookup.
pub trait SkillCatalog: Send + Sync {
    fn skill_name(&self, skill_id: SkillId) -> Option<&str>;
}

/// Display label for a skill: its catalog name, or `"Skill #<id>"`.
pub fn skill_label(catalog: &dyn SkillCatalog, skill_id: SkillId) -> String {
    catalog
        .skill_name(skill_id)
        .map(str::to_string)
        .unwrap_or_else(|| unknown_skill_label(skill_id))
}

static BUILTIN_SKILLS: phf::Map<u32, &'static str> = phf_map! {
    1u32 => "Basic Skill",
    5u32 => "Bash",
    7u32 => "Magnum Break",
    11u32 => "Napalm Beat",
    13u32 => "Soul Strike",
    14u32 => "Cold Bolt",
    15u32 => "Frost Diver",
    17u32 => "Fire Ball",
    18u32 => "Fire Wall",
    19u32 => "Fire Bolt",
    20u32 => "Lightning Bolt",
    21u32 => "Thunderstorm",
    28u32 => "Heal",
    42u32 => "Mammonite",
    46u32 => "Double Strafe",
    47u32 => "Arrow Shower",
    56u32 => "Pierce",
    57u32 => "Brandish Spear",
    59u32 => "Spear Boomerang",
    62u32 => "Bowling Bash",
    79u32 => "Magnus Exorcismus",
    83u32 => "Meteor Storm",
    84u32 => "Jupitel Thunder",
    85u32 => "Lord of Vermilion",
    86u32 => "Water Ball",
    89u32 => "Storm Gust",
    90u32 => "Earth Spike",
    91u32 => "Heaven's Drive",
    136u32 => "Sonic Blow",
    382u32 => "Sharp Shooting",
    394u32 => "Arrow Vulcan",
    397u32 => "Spiral Pierce",
    406u32 => "Meteor Assault",
};

/// The compiled-in skill table.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinSkills;

impl SkillCatalog for BuiltinSkills {
    fn skill_name(&self, skill_id: SkillId) -> Option<&str> {
        BUILTIN_SKILLS.get(&skill_id).copied()
    }
}

#[derive(Debug, Deserialize)]
struct SkillTableFile {
    #[serde(default, rename = "skill")]
    skills: Vec<SkillEntry>,
}

#[derive(Debug, Deserialize)]
struct SkillEntry {
    id: SkillId,
    name: String,
}

/// User-provided names layered over [`BuiltinSkills`].
#[derive(Debug, Clone, Default)]
pub struct SkillTable {
    names: HashMap<SkillId, String>,
}

impl SkillTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a skill table from a TOML file.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path).map_err(|source| CatalogError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    /// Parse TOML content. `path` is only used for error reporting.
    pub fn parse(content: &str, path: &Path) -> Result<Self, CatalogError> {
        let file: SkillTableFile =
            toml::from_str(content).map_err(|source| CatalogError::ParseToml {
                path: path.to_path_buf(),
                source,
            })?;

        let mut table = Self::new();
        for entry in file.skills {
            if table.names.contains_key(&entry.id) {
                return Err(CatalogError::DuplicateSkill {
                    path: path.to_path_buf(),
                    skill_id: entry.id,
                });
            }
            table.names.insert(entry.id, entry.name);
        }
        tracing::debug!(path = %path.display(), skills = table.len(), "skill table loaded");
        Ok(table)
    }

    pub fn insert(&mut self, skill_id: SkillId, name: impl Into<String>) {
        self.names.insert(skill_id, name.into());
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl SkillCatalog for SkillTable {
    fn skill_name(&self, skill_id: SkillId) -> Option<&str> {
        self.names
            .get(&skill_id)
            .map(String::as_str)
            .or_else(|| BuiltinSkills.skill_name(skill_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn builtin_lookup_and_fallback() {
        assert_eq!(BuiltinSkills.skill_name(19), Some("Fire Bolt"));
        assert_eq!(skill_label(&BuiltinSkills, 5), "Bash");
        assert_eq!(skill_label(&BuiltinSkills, 60_000), "Skill #60000");
    }

    #[test]
    fn table_overrides_builtin_names() {
        let table = SkillTable::parse(
            r#"
            [[skill]]
            id = 19
            name = "Firebolt"

            [[skill]]
            id = 2021
            name = "Crimson Rock"
            "#,
            Path::new("skills.toml"),
        )
        .unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.skill_name(19), Some("Firebolt"));
        assert_eq!(table.skill_name(2021), Some("Crimson Rock"));
        // Untouched entries still come from the builtin table
        assert_eq!(table.skill_name(5), Some("Bash"));
        assert_eq!(table.skill_name(9999), None);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = SkillTable::parse(
            "[[skill]]\nid = 5\nname = \"A\"\n[[skill]]\nid = 5\nname = \"B\"\n",
            Path::new("dupes.toml"),
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateSkill { skill_id: 5, .. }));
    }

    #[test]
    fn empty_file_is_an_empty_table() {
        let table = SkillTable::parse("", Path::new("empty.toml")).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[[skill]]\nid = 7\nname = \"Magnum\"").unwrap();
        let table = SkillTable::load(file.path()).unwrap();
        assert_eq!(table.skill_name(7), Some("Magnum"));
    }

    #[test]
    fn bad_toml_is_parse_error() {
        let err = SkillTable::parse("[[skill]\n", Path::new("bad.toml")).unwrap_err();
        assert!(matches!(err, CatalogError::ParseToml { .. }));
    }
}
