//! Messages table row

use crate::cell::Cell;
use crate::enums::TableKind;
use crate::ids::MessageId;
use crate::row::{Row, TableRow};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Addressable columns of a Messages row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageField {
    MessageId,
    Time,
    From,
    MessageType,
    Feature,
    Subject,
    Text,
    HtmlFragment,
}

/// One venue message (margin-call notices, dealer messages, and the like)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageRow {
    pub message_id: MessageId,
    pub time: Option<DateTime<Utc>>,
    pub from: Option<String>,
    pub message_type: Option<String>,
    pub feature: Option<String>,
    pub subject: Option<String>,
    pub text: Option<String>,
    /// Whether `text` carries an HTML fragment rather than plain text
    pub html_fragment: Option<bool>,
}

impl MessageRow {
    /// Create a row with only the key set
    pub fn new(message_id: impl Into<MessageId>) -> Self {
        Self {
            message_id: message_id.into(),
            time: None,
            from: None,
            message_type: None,
            feature: None,
            subject: None,
            text: None,
            html_fragment: None,
        }
    }
}

impl TableRow for MessageRow {
    type Field = MessageField;

    const KIND: TableKind = TableKind::Messages;

    const FIELDS: &'static [MessageField] = &[
        MessageField::MessageId,
        MessageField::Time,
        MessageField::From,
        MessageField::MessageType,
        MessageField::Feature,
        MessageField::Subject,
        MessageField::Text,
        MessageField::HtmlFragment,
    ];

    fn row_id(&self) -> &str {
        self.message_id.as_str()
    }

    fn cell(&self, field: MessageField) -> Option<Cell> {
        match field {
            MessageField::MessageId => Some(Cell::Text(self.message_id.as_str().to_string())),
            MessageField::Time => self.time.map(Cell::Time),
            MessageField::From => self.from.clone().map(Cell::Text),
            MessageField::MessageType => self.message_type.clone().map(Cell::Text),
            MessageField::Feature => self.feature.clone().map(Cell::Text),
            MessageField::Subject => self.subject.clone().map(Cell::Text),
            MessageField::Text => self.text.clone().map(Cell::Text),
            MessageField::HtmlFragment => self.html_fragment.map(Cell::Bool),
        }
    }

    fn into_row(self) -> Row {
        Row::Message(self)
    }

    fn from_row(row: Row) -> Option<Self> {
        match row {
            Row::Message(r) => Some(r),
            _ => None,
        }
    }

    fn as_row(row: &Row) -> Option<&Self> {
        match row {
            Row::Message(r) => Some(r),
            _ => None,
        }
    }
}
