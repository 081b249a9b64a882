// 宝可梦图鉴
// 由调用方提供的只读数据：名字、属性、基础能力、立绘路径；核心从不远程获取

use serde::{Deserialize, Serialize};

use crate::core::error::{GameError, GameResult};
use crate::pokemon::stats::StatBlock;
use crate::pokemon::types::ElementType;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesEntry {
    pub name: String,
    pub element: ElementType,
    pub base_stats: StatBlock,
    /// 立绘引用，由传输层解析
    pub sprite: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesCatalog {
    #[serde(default, rename = "species")]
    entries: Vec<SpeciesEntry>,
}

impl SpeciesEntry {
    pub fn new(name: &str, element: ElementType, base_stats: StatBlock) -> Self {
        Self {
            name: name.to_string(),
            element,
            base_stats,
            sprite: format!("images/{}.png", name.to_lowercase()),
        }
    }

    /// 闪光形态的立绘路径
    pub fn shiny_sprite(&self) -> String {
        format!("images/shiny_{}.png", self.name.to_lowercase().replace(' ', "_"))
    }
}

impl SpeciesCatalog {
    pub fn new(entries: Vec<SpeciesEntry>) -> GameResult<Self> {
        let catalog = Self { entries };
        catalog.validate()?;
        Ok(catalog)
    }

    /// 初始图鉴
    pub fn starter() -> Self {
        Self {
            entries: vec![
                SpeciesEntry::new("Pikachu", ElementType::Electric, StatBlock::new(35, 55, 40, 90)),
                SpeciesEntry::new("Charmander", ElementType::Fire, StatBlock::new(39, 52, 43, 65)),
                SpeciesEntry::new("Squirtle", ElementType::Water, StatBlock::new(44, 48, 65, 43)),
                SpeciesEntry::new("Bulbasaur", ElementType::Grass, StatBlock::new(45, 49, 49, 45)),
                SpeciesEntry::new("Dratini", ElementType::Dragon, StatBlock::new(41, 64, 45, 50)),
            ],
        }
    }

    pub fn from_toml_str(text: &str) -> GameResult<Self> {
        let catalog: SpeciesCatalog = toml::from_str(text)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn from_json_str(text: &str) -> GameResult<Self> {
        let catalog: SpeciesCatalog = serde_json::from_str(text)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn entries(&self) -> &[SpeciesEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&SpeciesEntry> {
        self.entries.iter().find(|e| e.name.eq_ignore_ascii_case(name))
    }

    fn validate(&self) -> GameResult<()> {
        if self.entries.is_empty() {
            return Err(GameError::EmptySpeciesCatalog);
        }
        for entry in &self.entries {
            if entry.name.trim().is_empty() {
                return Err(GameError::Config("图鉴中存在空名字".to_string()));
            }
            if entry.base_stats.min() == 0 {
                return Err(GameError::Config(format!("{} 的基础能力值必须 >= 1", entry.name)));
            }
        }
        Ok(())
    }
}
