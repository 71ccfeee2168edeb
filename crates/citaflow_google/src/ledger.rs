// --- File: crates/citaflow_google/src/ledger.rs ---
//! Google Sheets implementation of the [`LedgerService`] trait.
//!
//! The ledger is append-only: one row per completed booking, no update or
//! delete path. Rows land in a named range with `USER_ENTERED` parsing so
//! dates render as dates in the sheet.

use std::sync::Arc;

use citaflow_common::services::{BoxFuture, BoxedError, LedgerRow, LedgerService};
use google_sheets4::api::ValueRange;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::auth::SheetsHubType;

#[derive(Error, Debug)]
pub enum LedgerApiError {
    #[error("Google Sheets API error: {0}")]
    Api(#[from] google_sheets4::Error),
}

pub struct SheetsLedger {
    hub: Arc<SheetsHubType>,
    sheet_id: String,
    range: String,
}

impl SheetsLedger {
    pub fn new(hub: Arc<SheetsHubType>, sheet_id: String, range: String) -> Self {
        Self {
            hub,
            sheet_id,
            range,
        }
    }
}

fn row_to_cells(row: LedgerRow) -> Vec<Value> {
    vec![
        Value::String(row.timestamp),
        Value::String(row.nombre),
        Value::String(row.apellido),
        Value::String(row.email),
        Value::String(row.telefono),
        Value::String(row.service_type),
        Value::String(row.start_local),
        Value::String(row.event_link),
    ]
}

impl LedgerService for SheetsLedger {
    fn append_row(&self, row: LedgerRow) -> BoxFuture<'_, (), BoxedError> {
        let hub = Arc::clone(&self.hub);
        let sheet_id = self.sheet_id.clone();
        let range = self.range.clone();

        Box::pin(async move {
            let request = ValueRange {
                values: Some(vec![row_to_cells(row)]),
                ..Default::default()
            };

            let (_response, appended) = hub
                .spreadsheets()
                .values_append(request, &sheet_id, &range)
                .value_input_option("USER_ENTERED")
                .doit()
                .await
                .map_err(|e| BoxedError::new(LedgerApiError::from(e)))?;

            debug!(
                "Appended ledger row to {:?}",
                appended.table_range.as_deref().unwrap_or(&range)
            );
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ledger_row_maps_to_eight_cells_in_sheet_order() {
        let row = LedgerRow {
            timestamp: "2024-03-15T08:30:00Z".to_string(),
            nombre: "Jane".to_string(),
            apellido: "Doe".to_string(),
            email: "jane@example.com".to_string(),
            telefono: "600111222".to_string(),
            service_type: "consulta".to_string(),
            start_local: "15/3/2024, 9:00:00".to_string(),
            event_link: "https://calendar.google.com/event?eid=abc".to_string(),
        };

        let cells = row_to_cells(row);
        assert_eq!(cells.len(), 8);
        assert_eq!(cells[0], Value::String("2024-03-15T08:30:00Z".to_string()));
        assert_eq!(cells[5], Value::String("consulta".to_string()));
        assert_eq!(
            cells[7],
            Value::String("https://calendar.google.com/event?eid=abc".to_string())
        );
    }
}
