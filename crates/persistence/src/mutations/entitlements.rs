// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use leave_ledger_audit::AuditEvent;
use leave_ledger_domain::AnnualEntitlement;
use tracing::debug;

use crate::data_models::day_count_to_db;
use crate::diesel_schema::annual_entitlements;
use crate::error::PersistenceError;
use crate::mutations::audit::persist_audit_event;

/// Inserts a ledger row unless the `(employee_id, year)` key is taken.
///
/// Returns `false` and records nothing if the row already exists.
///
/// # Errors
///
/// Returns an error if the transaction fails.
pub fn insert_entitlement_if_absent(
    conn: &mut SqliteConnection,
    entitlement: &AnnualEntitlement,
    event: &AuditEvent,
) -> Result<bool, PersistenceError> {
    conn.immediate_transaction::<_, PersistenceError, _>(|conn| {
        let inserted: usize = diesel::insert_or_ignore_into(annual_entitlements::table)
            .values((
                annual_entitlements::employee_id.eq(entitlement.employee_id.value()),
                annual_entitlements::year.eq(entitlement.year),
                annual_entitlements::days_corresponding
                    .eq(day_count_to_db(entitlement.days_corresponding)?),
                annual_entitlements::days_carried_over
                    .eq(day_count_to_db(entitlement.days_carried_over)?),
                annual_entitlements::days_not_taken_previous_year
                    .eq(day_count_to_db(entitlement.days_not_taken_previous_year)?),
                annual_entitlements::days_additional
                    .eq(day_count_to_db(entitlement.days_additional)?),
                annual_entitlements::days_taken.eq(day_count_to_db(entitlement.days_taken)?),
            ))
            .execute(conn)?;

        if inserted == 0 {
            debug!(
                "Ledger row for employee {} in {} already exists",
                entitlement.employee_id, entitlement.year
            );
            return Ok(false);
        }

        persist_audit_event(conn, event)?;
        Ok(true)
    })
}

/// Replaces `expected` with `updated` if every stored column still matches `expected`.
///
/// Returns `false` and records nothing if the row changed since it was read.
///
/// # Errors
///
/// Returns an error if the transaction fails.
pub fn swap_entitlement(
    conn: &mut SqliteConnection,
    expected: &AnnualEntitlement,
    updated: &AnnualEntitlement,
    event: &AuditEvent,
) -> Result<bool, PersistenceError> {
    conn.immediate_transaction::<_, PersistenceError, _>(|conn| {
        if update_if_unchanged(conn, expected, updated)? == 0 {
            return Ok(false);
        }

        persist_audit_event(conn, event)?;
        Ok(true)
    })
}

/// Conditional `UPDATE` of one ledger row. Must run inside a transaction.
///
/// Returns the number of rows changed: 1, or 0 when the stored row differs
/// from `expected`.
pub fn update_if_unchanged(
    conn: &mut SqliteConnection,
    expected: &AnnualEntitlement,
    updated: &AnnualEntitlement,
) -> Result<usize, PersistenceError> {
    let matching = annual_entitlements::table
        .filter(annual_entitlements::employee_id.eq(expected.employee_id.value()))
        .filter(annual_entitlements::year.eq(expected.year))
        .filter(
            annual_entitlements::days_corresponding
                .eq(day_count_to_db(expected.days_corresponding)?),
        )
        .filter(
            annual_entitlements::days_carried_over.eq(day_count_to_db(expected.days_carried_over)?),
        )
        .filter(
            annual_entitlements::days_not_taken_previous_year
                .eq(day_count_to_db(expected.days_not_taken_previous_year)?),
        )
        .filter(annual_entitlements::days_additional.eq(day_count_to_db(expected.days_additional)?))
        .filter(annual_entitlements::days_taken.eq(day_count_to_db(expected.days_taken)?));

    let changed: usize = diesel::update(matching)
        .set((
            annual_entitlements::days_corresponding
                .eq(day_count_to_db(updated.days_corresponding)?),
            annual_entitlements::days_carried_over.eq(day_count_to_db(updated.days_carried_over)?),
            annual_entitlements::days_not_taken_previous_year
                .eq(day_count_to_db(updated.days_not_taken_previous_year)?),
            annual_entitlements::days_additional.eq(day_count_to_db(updated.days_additional)?),
            annual_entitlements::days_taken.eq(day_count_to_db(updated.days_taken)?),
        ))
        .execute(conn)?;
    Ok(changed)
}
