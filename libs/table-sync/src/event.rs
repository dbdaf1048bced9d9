//! Event values produced by table mutation
//!
//! `AppliedUpdate` is the typed result handed back to the caller of
//! [`Table::apply`](crate::table::Table::apply); `RowEvent` is its kind-erased
//! form carried by the all-events queues. Markers bracket manager batches.

use std::sync::Arc;
use types::enums::{TableKind, UpdateType, UpdatesProcessStatus};
use types::row::{Row, TableRow};

/// Result of one successfully applied mutation.
///
/// `previous` carries the replaced row for Update and the removed row for
/// Delete; `changed` lists the columns an Update touched.
#[derive(Debug, Clone)]
pub struct AppliedUpdate<R: TableRow> {
    pub update_type: UpdateType,
    pub row: Arc<R>,
    pub previous: Option<Arc<R>>,
    pub changed: Vec<R::Field>,
}

impl<R: TableRow> AppliedUpdate<R> {
    /// Erase the row kind for the all-events path
    pub fn to_row_event(&self) -> RowEvent {
        RowEvent {
            kind: R::KIND,
            update_type: self.update_type,
            row: Arc::new((*self.row).clone().into_row()),
            previous: self
                .previous
                .as_ref()
                .map(|p| Arc::new((**p).clone().into_row())),
        }
    }
}

/// One kind-erased mutation event
#[derive(Debug, Clone)]
pub struct RowEvent {
    pub kind: TableKind,
    pub update_type: UpdateType,
    pub row: Arc<Row>,
    pub previous: Option<Arc<Row>>,
}

impl RowEvent {
    /// Copy the row payloads so the receiver holds no shared references
    pub fn deep_copy(&self) -> RowEvent {
        RowEvent {
            kind: self.kind,
            update_type: self.update_type,
            row: Arc::new((*self.row).clone()),
            previous: self.previous.as_ref().map(|p| Arc::new((**p).clone())),
        }
    }
}

/// Item carried by an all-events queue
#[derive(Debug, Clone)]
pub enum AllEvent {
    /// Batch bracket on the manager-wide queue
    Marker(UpdatesProcessStatus),
    /// A row mutation
    Update(RowEvent),
}

impl AllEvent {
    /// The marker status, if this item is a bracket
    pub fn process_status(&self) -> Option<UpdatesProcessStatus> {
        match self {
            AllEvent::Marker(status) => Some(*status),
            AllEvent::Update(_) => None,
        }
    }

    /// The row event, if this item is a mutation
    pub fn as_update(&self) -> Option<&RowEvent> {
        match self {
            AllEvent::Marker(_) => None,
            AllEvent::Update(event) => Some(event),
        }
    }

    pub fn is_marker(&self) -> bool {
        matches!(self, AllEvent::Marker(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use types::account::AccountRow;

    #[test]
    fn test_to_row_event_erases_kind() {
        let mut row = AccountRow::new("A1");
        row.balance = Some(Decimal::from(1000));

        let applied = AppliedUpdate {
            update_type: UpdateType::Insert,
            row: Arc::new(row),
            previous: None,
            changed: Vec::new(),
        };

        let event = applied.to_row_event();
        assert_eq!(event.kind, TableKind::Accounts);
        assert_eq!(event.row.row_id(), "A1");
        assert!(event.previous.is_none());
    }

    #[test]
    fn test_deep_copy_detaches_payload() {
        let row = Arc::new(AccountRow::new("A1").into_row());
        let event = RowEvent {
            kind: TableKind::Accounts,
            update_type: UpdateType::Insert,
            row: row.clone(),
            previous: None,
        };

        let copy = event.deep_copy();
        assert!(!Arc::ptr_eq(&event.row, &copy.row));
        assert_eq!(*event.row, *copy.row);
    }

    #[test]
    fn test_all_event_accessors() {
        let marker = AllEvent::Marker(UpdatesProcessStatus::BeginTablesUpdate);
        assert!(marker.is_marker());
        assert_eq!(
            marker.process_status(),
            Some(UpdatesProcessStatus::BeginTablesUpdate)
        );
        assert!(marker.as_update().is_none());
    }
}
