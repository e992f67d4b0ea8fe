// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use leave_ledger_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use leave_ledger_domain::EmployeeId;

use crate::data_models::{
    ActionData, ActorData, CauseData, StateSnapshotData, employee_id_from_db, timestamp_from_db,
};
use crate::diesel_schema::audit_events;
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = audit_events)]
pub struct AuditEventRow {
    pub event_id: i64,
    pub employee_id: String,
    pub year: i32,
    pub actor_json: String,
    pub cause_json: String,
    pub action_json: String,
    pub before_snapshot_json: String,
    pub after_snapshot_json: String,
    pub recorded_at: String,
}

impl AuditEventRow {
    fn into_domain(self) -> Result<AuditEvent, PersistenceError> {
        let actor_data: ActorData = serde_json::from_str(&self.actor_json)?;
        let cause_data: CauseData = serde_json::from_str(&self.cause_json)?;
        let action_data: ActionData = serde_json::from_str(&self.action_json)?;
        let before_data: StateSnapshotData = serde_json::from_str(&self.before_snapshot_json)?;
        let after_data: StateSnapshotData = serde_json::from_str(&self.after_snapshot_json)?;

        Ok(AuditEvent {
            event_id: Some(self.event_id),
            actor: Actor::new(actor_data.id, actor_data.actor_type),
            cause: Cause::new(cause_data.id, cause_data.description),
            action: Action::new(action_data.name, action_data.details),
            before: StateSnapshot::new(before_data.data),
            after: StateSnapshot::new(after_data.data),
            employee_id: employee_id_from_db(&self.employee_id)?,
            year: self.year,
            recorded_at: timestamp_from_db(&self.recorded_at)?,
        })
    }
}

/// Lists the audit events for one employee and year in append order.
///
/// # Errors
///
/// Returns an error if the query fails or an event cannot be deserialized.
pub fn list_audit_events(
    conn: &mut SqliteConnection,
    employee_id: &EmployeeId,
    year: i32,
) -> Result<Vec<AuditEvent>, PersistenceError> {
    audit_events::table
        .filter(audit_events::employee_id.eq(employee_id.value()))
        .filter(audit_events::year.eq(year))
        .order(audit_events::event_id.asc())
        .select(AuditEventRow::as_select())
        .load::<AuditEventRow>(conn)?
        .into_iter()
        .map(AuditEventRow::into_domain)
        .collect()
}
