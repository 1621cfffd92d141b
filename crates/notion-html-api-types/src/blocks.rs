use serde::{Deserialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::files::{FileObject, Icon};
use crate::rich_text::{Color, RichText};

/// One node of a page's content tree.
///
/// Children are never embedded: container blocks (`table`, `toggle`,
/// `column_list`, `column`, `child_page`) are expanded by listing the
/// children of their `id`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawBlock")]
pub struct Block {
    pub id: String,
    pub has_children: bool,
    pub kind: BlockKind,
}

/// Closed set of block variants understood by the renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockKind {
    Paragraph(TextBlock),
    Heading1(TextBlock),
    Heading2(TextBlock),
    Heading3(TextBlock),
    BulletedListItem(TextBlock),
    NumberedListItem(TextBlock),
    ToDo(ToDoBlock),
    Quote(TextBlock),
    Toggle(TextBlock),
    Callout(CalloutBlock),
    Code(CodeBlock),
    Equation(EquationBlock),
    Divider,
    Table(TableBlock),
    TableRow(TableRowBlock),
    Image(MediaBlock),
    Video(MediaBlock),
    File(MediaBlock),
    ColumnList,
    Column,
    ChildPage(ChildPageBlock),
    /// Unknown discriminator, or a known one whose payload failed to decode.
    Unsupported { kind: String, reason: Option<String> },
}

impl BlockKind {
    /// The API discriminator this variant was decoded from.
    pub fn type_name(&self) -> &str {
        match self {
            BlockKind::Paragraph(_) => "paragraph",
            BlockKind::Heading1(_) => "heading_1",
            BlockKind::Heading2(_) => "heading_2",
            BlockKind::Heading3(_) => "heading_3",
            BlockKind::BulletedListItem(_) => "bulleted_list_item",
            BlockKind::NumberedListItem(_) => "numbered_list_item",
            BlockKind::ToDo(_) => "to_do",
            BlockKind::Quote(_) => "quote",
            BlockKind::Toggle(_) => "toggle",
            BlockKind::Callout(_) => "callout",
            BlockKind::Code(_) => "code",
            BlockKind::Equation(_) => "equation",
            BlockKind::Divider => "divider",
            BlockKind::Table(_) => "table",
            BlockKind::TableRow(_) => "table_row",
            BlockKind::Image(_) => "image",
            BlockKind::Video(_) => "video",
            BlockKind::File(_) => "file",
            BlockKind::ColumnList => "column_list",
            BlockKind::Column => "column",
            BlockKind::ChildPage(_) => "child_page",
            BlockKind::Unsupported { kind, .. } => kind,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TextBlock {
    #[serde(default)]
    pub rich_text: Vec<RichText>,
    #[serde(default)]
    pub color: Color,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ToDoBlock {
    #[serde(default)]
    pub rich_text: Vec<RichText>,
    #[serde(default)]
    pub checked: bool,
    #[serde(default)]
    pub color: Color,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CalloutBlock {
    #[serde(default)]
    pub rich_text: Vec<RichText>,
    #[serde(default)]
    pub icon: Option<Icon>,
    #[serde(default)]
    pub color: Color,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CodeBlock {
    #[serde(default)]
    pub rich_text: Vec<RichText>,
    #[serde(default)]
    pub caption: Vec<RichText>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EquationBlock {
    pub expression: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TableBlock {
    #[serde(default)]
    pub has_column_header: bool,
    #[serde(default)]
    pub has_row_header: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TableRowBlock {
    #[serde(default)]
    pub cells: Vec<Vec<RichText>>,
}

/// Payload shared by image, video and file blocks.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MediaBlock {
    #[serde(flatten)]
    pub source: FileObject,
    #[serde(default)]
    pub caption: Vec<RichText>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ChildPageBlock {
    #[serde(default)]
    pub title: String,
}

/// Envelope as sent by the API: the payload lives under a key named after
/// the discriminator, e.g. `{"type": "quote", "quote": {...}}`.
#[derive(Deserialize)]
struct RawBlock {
    #[serde(default)]
    id: String,
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    has_children: bool,
    #[serde(flatten)]
    payloads: Map<String, Value>,
}

impl From<RawBlock> for Block {
    fn from(raw: RawBlock) -> Self {
        let RawBlock {
            id,
            kind,
            has_children,
            mut payloads,
        } = raw;

        let decoded = match kind.as_str() {
            "paragraph" => payload(&mut payloads, &kind).map(BlockKind::Paragraph),
            "heading_1" => payload(&mut payloads, &kind).map(BlockKind::Heading1),
            "heading_2" => payload(&mut payloads, &kind).map(BlockKind::Heading2),
            "heading_3" => payload(&mut payloads, &kind).map(BlockKind::Heading3),
            "bulleted_list_item" => payload(&mut payloads, &kind).map(BlockKind::BulletedListItem),
            "numbered_list_item" => payload(&mut payloads, &kind).map(BlockKind::NumberedListItem),
            "to_do" => payload(&mut payloads, &kind).map(BlockKind::ToDo),
            "quote" => payload(&mut payloads, &kind).map(BlockKind::Quote),
            "toggle" => payload(&mut payloads, &kind).map(BlockKind::Toggle),
            "callout" => payload(&mut payloads, &kind).map(BlockKind::Callout),
            "code" => payload(&mut payloads, &kind).map(BlockKind::Code),
            "equation" => payload(&mut payloads, &kind).map(BlockKind::Equation),
            "divider" => Ok(BlockKind::Divider),
            "table" => payload(&mut payloads, &kind).map(BlockKind::Table),
            "table_row" => payload(&mut payloads, &kind).map(BlockKind::TableRow),
            "image" => payload(&mut payloads, &kind).map(BlockKind::Image),
            "video" => payload(&mut payloads, &kind).map(BlockKind::Video),
            "file" => payload(&mut payloads, &kind).map(BlockKind::File),
            "column_list" => Ok(BlockKind::ColumnList),
            "column" => Ok(BlockKind::Column),
            "child_page" => payload(&mut payloads, &kind).map(BlockKind::ChildPage),
            _ => {
                return Block {
                    id,
                    has_children,
                    kind: BlockKind::Unsupported { kind, reason: None },
                };
            }
        };

        let kind = decoded.unwrap_or_else(|err| BlockKind::Unsupported {
            kind,
            reason: Some(err.to_string()),
        });

        Block {
            id,
            has_children,
            kind,
        }
    }
}

fn payload<T: DeserializeOwned>(
    payloads: &mut Map<String, Value>,
    key: &str,
) -> Result<T, serde_json::Error> {
    let value = payloads.remove(key).unwrap_or(Value::Null);
    serde_json::from_value(value)
}
