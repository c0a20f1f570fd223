//! Static game data and skill name lookup

mod error;
mod skills;

pub use error::CatalogError;
pub use skills::{BuiltinSkills, SkillCatalog, SkillTable, skill_label};
