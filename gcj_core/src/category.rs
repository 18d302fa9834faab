//! The closed set of waste categories a schedule can list.

use std::{fmt, str::FromStr};

use bitmask_enum::bitmask;

static LABEL_BURNABLE: &str = "燃やせるごみ";
static LABEL_BOTTLE: &str = "びん";
static LABEL_SPRAY: &str = "スプレー容器";
static LABEL_PET: &str = "ペットボトル";
static LABEL_NON_BURNABLE: &str = "燃やせないごみ";
static LABEL_PAPER_CLOTH: &str = "古紙・古布";
static LABEL_PLASTIC: &str = "プラスチック製容器包装";
static LABEL_CAN: &str = "かん";
static LABEL_BULKY: &str = "粗大ごみ（予約制）";

/// Number of leading identity columns (block, annotation) before the category columns.
pub const IDENTITY_COLUMNS: usize = 2;

/// A waste category, identified by its header label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Burnable,
    Bottle,
    Spray,
    Pet,
    NonBurnable,
    PaperCloth,
    Plastic,
    Can,
    Bulky,
}

/// The set of categories collected on one day.
#[bitmask(u16)]
pub enum CategoryBitmask {
    Burnable,
    Bottle,
    Spray,
    Pet,
    NonBurnable,
    PaperCloth,
    Plastic,
    Can,
    Bulky,
}

impl Category {
    /// All recognized categories in declaration order.
    pub const ALL: [Category; 9] = [
        Category::Burnable,
        Category::Bottle,
        Category::Spray,
        Category::Pet,
        Category::NonBurnable,
        Category::PaperCloth,
        Category::Plastic,
        Category::Can,
        Category::Bulky,
    ];

    /// The header label, which is also the key used in the output.
    pub fn label(self) -> &'static str {
        match self {
            Category::Burnable => LABEL_BURNABLE,
            Category::Bottle => LABEL_BOTTLE,
            Category::Spray => LABEL_SPRAY,
            Category::Pet => LABEL_PET,
            Category::NonBurnable => LABEL_NON_BURNABLE,
            Category::PaperCloth => LABEL_PAPER_CLOTH,
            Category::Plastic => LABEL_PLASTIC,
            Category::Can => LABEL_CAN,
            Category::Bulky => LABEL_BULKY,
        }
    }

    pub fn flag(self) -> CategoryBitmask {
        match self {
            Category::Burnable => CategoryBitmask::Burnable,
            Category::Bottle => CategoryBitmask::Bottle,
            Category::Spray => CategoryBitmask::Spray,
            Category::Pet => CategoryBitmask::Pet,
            Category::NonBurnable => CategoryBitmask::NonBurnable,
            Category::PaperCloth => CategoryBitmask::PaperCloth,
            Category::Plastic => CategoryBitmask::Plastic,
            Category::Can => CategoryBitmask::Can,
            Category::Bulky => CategoryBitmask::Bulky,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.label())
    }
}

/// The label is not one of the recognized categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotRecognized(pub String);

impl fmt::Display for NotRecognized {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{} is not a known category", self.0)
    }
}

impl std::error::Error for NotRecognized {}

impl FromStr for Category {
    type Err = NotRecognized;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.label() == label)
            .ok_or_else(|| NotRecognized(label.to_string()))
    }
}

/// Map the trailing header columns to categories.
///
/// The returned vector is positional: index `i` describes the cell at column
/// `i + IDENTITY_COLUMNS` of every data row. Unknown or blank labels are logged
/// and yield `None`, so the remaining columns stay aligned.
pub fn header_columns(header: &[Option<String>]) -> Vec<Option<Category>> {
    header
        .iter()
        .skip(IDENTITY_COLUMNS)
        .enumerate()
        .map(|(index, cell)| {
            let label = cell.as_deref().unwrap_or_default();
            match label.parse::<Category>() {
                Ok(category) => Some(category),
                Err(err) => {
                    log::error!("Error: index: {index}, {err}");
                    None
                }
            }
        })
        .collect()
}
