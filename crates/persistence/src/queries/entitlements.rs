// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use leave_ledger_domain::{AnnualEntitlement, EmployeeId};

use crate::data_models::{day_count_from_db, employee_id_from_db};
use crate::diesel_schema::annual_entitlements;
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = annual_entitlements)]
pub struct EntitlementRow {
    pub employee_id: String,
    pub year: i32,
    pub days_corresponding: i32,
    pub days_carried_over: i32,
    pub days_not_taken_previous_year: i32,
    pub days_additional: i32,
    pub days_taken: i32,
}

impl EntitlementRow {
    fn into_domain(self) -> Result<AnnualEntitlement, PersistenceError> {
        Ok(AnnualEntitlement {
            employee_id: employee_id_from_db(&self.employee_id)?,
            year: self.year,
            days_corresponding: day_count_from_db(self.days_corresponding)?,
            days_carried_over: day_count_from_db(self.days_carried_over)?,
            days_not_taken_previous_year: day_count_from_db(self.days_not_taken_previous_year)?,
            days_additional: day_count_from_db(self.days_additional)?,
            days_taken: day_count_from_db(self.days_taken)?,
        })
    }
}

/// Reads the ledger row for one employee and year.
///
/// # Errors
///
/// Returns an error if the query fails or the row is malformed.
pub fn find_entitlement(
    conn: &mut SqliteConnection,
    employee_id: &EmployeeId,
    year: i32,
) -> Result<Option<AnnualEntitlement>, PersistenceError> {
    annual_entitlements::table
        .filter(annual_entitlements::employee_id.eq(employee_id.value()))
        .filter(annual_entitlements::year.eq(year))
        .select(EntitlementRow::as_select())
        .first::<EntitlementRow>(conn)
        .optional()?
        .map(EntitlementRow::into_domain)
        .transpose()
}
