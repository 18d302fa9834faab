//! Serialization of the aggregate into the calendar JSON document.
//!
//! The document maps every district to its block list and its calendar:
//!
//! ```json
//! {
//!     "地区エリアA": {
//!         "calendar": {
//!             "2024/04/01": {
//!                 "かん": "false",
//!                 "燃やせるごみ": "true"
//!             }
//!         },
//!         "subject_block_list": {
//!             "赤塚": {
//!                 "subject_block": "赤塚",
//!                 "subject_block_pronunciation": "あかつか"
//!             }
//!         }
//!     }
//! }
//! ```
//!
//! Keys are sorted and flags are the strings `"true"` and `"false"`, which existing
//! consumers of the file rely on.

use std::{collections::BTreeMap, fs, path::Path};

use serde::{ser::SerializeMap, Serialize, Serializer};
use serde_json::ser::PrettyFormatter;

use crate::{
    aggregate::{Block, CalendarAggregate, DateEntry, District},
    category::Category,
    error::Result,
};

/// Key names and flag values used in the output document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputKeys {
    pub subject_block_list: String,
    pub subject_block: String,
    pub subject_block_pronunciation: String,
    pub calendar: String,
    pub true_value: String,
    pub false_value: String,
}

impl Default for OutputKeys {
    fn default() -> Self {
        Self {
            subject_block_list: String::from("subject_block_list"),
            subject_block: String::from("subject_block"),
            subject_block_pronunciation: String::from("subject_block_pronunciation"),
            calendar: String::from("calendar"),
            true_value: String::from("true"),
            false_value: String::from("false"),
        }
    }
}

/// A serializable view of the aggregate.
pub struct CalendarDocument<'a> {
    aggregate: &'a CalendarAggregate,
    keys: &'a OutputKeys,
}

impl<'a> CalendarDocument<'a> {
    pub fn new(aggregate: &'a CalendarAggregate, keys: &'a OutputKeys) -> Self {
        Self { aggregate, keys }
    }
}

impl Serialize for CalendarDocument<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (name, district) in self.aggregate.districts() {
            map.serialize_entry(
                name,
                &DistrictView {
                    district,
                    keys: self.keys,
                },
            )?;
        }
        map.end()
    }
}

struct DistrictView<'a> {
    district: &'a District,
    keys: &'a OutputKeys,
}

impl Serialize for DistrictView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let blocks: BTreeMap<&str, BTreeMap<&str, &str>> = self
            .district
            .blocks()
            .map(|(name, block)| (name.as_str(), block_fields(block, self.keys)))
            .collect();
        let calendar: BTreeMap<&str, BTreeMap<&str, &str>> = self
            .district
            .calendar()
            .map(|(date, entry)| (date.as_str(), entry_flags(entry, self.keys)))
            .collect();

        let mut map = serializer.serialize_map(Some(2))?;
        if self.keys.calendar <= self.keys.subject_block_list {
            map.serialize_entry(&self.keys.calendar, &calendar)?;
            map.serialize_entry(&self.keys.subject_block_list, &blocks)?;
        } else {
            map.serialize_entry(&self.keys.subject_block_list, &blocks)?;
            map.serialize_entry(&self.keys.calendar, &calendar)?;
        }
        map.end()
    }
}

fn block_fields<'a>(block: &'a Block, keys: &'a OutputKeys) -> BTreeMap<&'a str, &'a str> {
    BTreeMap::from([
        (keys.subject_block.as_str(), block.name.as_str()),
        (
            keys.subject_block_pronunciation.as_str(),
            block.pronunciation.as_str(),
        ),
    ])
}

fn entry_flags<'a>(entry: &DateEntry, keys: &'a OutputKeys) -> BTreeMap<&'static str, &'a str> {
    Category::ALL
        .into_iter()
        .map(|category| {
            let value = if entry.is_set(category) {
                &keys.true_value
            } else {
                &keys.false_value
            };
            (category.label(), value.as_str())
        })
        .collect()
}

/// The document as a JSON value.
pub fn to_json(aggregate: &CalendarAggregate, keys: &OutputKeys) -> Result<serde_json::Value> {
    Ok(serde_json::to_value(CalendarDocument::new(aggregate, keys))?)
}

/// The document as UTF-8 JSON indented with four spaces. Non-ASCII text is not escaped.
pub fn render(aggregate: &CalendarAggregate, keys: &OutputKeys) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    CalendarDocument::new(aggregate, keys).serialize(&mut serializer)?;
    Ok(buffer)
}

/// Write the document to `path`, replacing any existing file.
pub fn write_json(aggregate: &CalendarAggregate, keys: &OutputKeys, path: &Path) -> Result<()> {
    fs::write(path, render(aggregate, keys)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{
        aggregate::CalendarAggregate,
        calendar::{fill_gaps, DateRange},
        category::Category,
        emit::{render, to_json, write_json, OutputKeys},
    };

    fn sample_aggregate() -> CalendarAggregate {
        let mut aggregate = CalendarAggregate::new();
        aggregate.register_block("地区エリアA", "赤塚", "あかつか");
        aggregate.mark("地区エリアA", "2024/04/01", Category::Burnable);
        aggregate
    }

    #[test]
    fn test_to_json_structure() {
        let aggregate = sample_aggregate();
        let value = to_json(&aggregate, &OutputKeys::default()).unwrap();
        let district = &value["地区エリアA"];
        assert_eq!(
            district["subject_block_list"]["赤塚"],
            json!({
                "subject_block": "赤塚",
                "subject_block_pronunciation": "あかつか",
            })
        );
        let entry = &district["calendar"]["2024/04/01"];
        assert_eq!(entry["燃やせるごみ"], json!("true"));
        assert_eq!(entry["びん"], json!("false"));
        assert_eq!(entry.as_object().unwrap().len(), Category::ALL.len());
    }

    #[test]
    fn test_every_unset_flag_is_false_string() {
        let mut aggregate = sample_aggregate();
        let range = DateRange::parse("20240401", "20240403").unwrap();
        fill_gaps(&mut aggregate, range);
        let value = to_json(&aggregate, &OutputKeys::default()).unwrap();
        let calendar = value["地区エリアA"]["calendar"].as_object().unwrap();
        assert_eq!(calendar.len(), 3);
        for date in ["2024/04/02", "2024/04/03"] {
            for category in Category::ALL {
                assert_eq!(calendar[date][category.label()], json!("false"));
            }
        }
    }

    #[test]
    fn test_render_format() {
        let mut aggregate = CalendarAggregate::new();
        aggregate.register_block("A", "赤塚", "あかつか");
        let text = String::from_utf8(render(&aggregate, &OutputKeys::default()).unwrap()).unwrap();
        let expected = [
            "{",
            "    \"A\": {",
            "        \"calendar\": {},",
            "        \"subject_block_list\": {",
            "            \"赤塚\": {",
            "                \"subject_block\": \"赤塚\",",
            "                \"subject_block_pronunciation\": \"あかつか\"",
            "            }",
            "        }",
            "    }",
            "}",
        ]
        .join("\n");
        assert_eq!(text, expected);
    }

    #[test]
    fn test_render_sorts_category_labels() {
        let aggregate = sample_aggregate();
        let text = String::from_utf8(render(&aggregate, &OutputKeys::default()).unwrap()).unwrap();
        let mut labels: Vec<&str> = Category::ALL.iter().map(|category| category.label()).collect();
        labels.sort_unstable();
        let positions: Vec<usize> = labels
            .iter()
            .map(|label| text.find(&format!("\"{label}\": ")).unwrap())
            .collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_custom_keys() {
        let aggregate = sample_aggregate();
        let keys = OutputKeys {
            subject_block_list: String::from("blocks"),
            subject_block: String::from("name"),
            subject_block_pronunciation: String::from("kana"),
            calendar: String::from("days"),
            true_value: String::from("1"),
            false_value: String::from("0"),
        };
        let value = to_json(&aggregate, &keys).unwrap();
        let district = &value["地区エリアA"];
        assert_eq!(
            district["blocks"]["赤塚"],
            json!({"name": "赤塚", "kana": "あかつか"})
        );
        assert_eq!(district["days"]["2024/04/01"]["燃やせるごみ"], json!("1"));
        assert_eq!(district["days"]["2024/04/01"]["かん"], json!("0"));
        let text = String::from_utf8(render(&aggregate, &keys).unwrap()).unwrap();
        assert!(text.find("\"blocks\"").unwrap() < text.find("\"days\"").unwrap());
    }

    #[test]
    fn test_empty_aggregate() {
        let text =
            String::from_utf8(render(&CalendarAggregate::new(), &OutputKeys::default()).unwrap())
                .unwrap();
        assert_eq!(text, "{}");
    }

    #[test]
    fn test_write_json_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("calendar_data.json");
        std::fs::write(&path, "stale").unwrap();
        write_json(&sample_aggregate(), &OutputKeys::default(), &path).unwrap();
        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            written["地区エリアA"]["calendar"]["2024/04/01"]["燃やせるごみ"],
            json!("true")
        );
    }

    #[test]
    fn test_write_json_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("calendar_data.json");
        assert!(write_json(&sample_aggregate(), &OutputKeys::default(), &path).is_err());
    }
}
