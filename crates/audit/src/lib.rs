// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use leave_ledger_domain::{EmployeeId, Role};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Represents the entity performing an action.
///
/// An actor is any identifiable entity that initiates a state change.
/// This is usually an employee acting in a role, or the rollover process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// The unique identifier for this actor.
    pub id: String,
    /// The type of actor (e.g., "rh", "referente", "system").
    pub actor_type: String,
}

impl Actor {
    /// Creates a new Actor.
    #[must_use]
    pub const fn new(id: String, actor_type: String) -> Self {
        Self { id, actor_type }
    }

    /// Creates an actor for an employee acting in `role`.
    #[must_use]
    pub fn employee(id: &EmployeeId, role: Role) -> Self {
        Self::new(id.value().to_string(), role.as_str().to_string())
    }

    /// Creates an actor for an automated process.
    #[must_use]
    pub fn system(name: &str) -> Self {
        Self::new(name.to_string(), String::from("system"))
    }
}

/// Represents the reason or trigger for an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cause {
    /// A unique identifier for this cause (e.g., request ID, rollover year).
    pub id: String,
    /// A description of the cause.
    pub description: String,
}

impl Cause {
    /// Creates a new Cause.
    #[must_use]
    pub const fn new(id: String, description: String) -> Self {
        Self { id, description }
    }
}

/// Represents the specific action performed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// The name of the action (e.g., "`DebitDays`", "`ApproveAsRh`").
    pub name: String,
    /// Optional additional details, such as the day delta.
    pub details: Option<String>,
}

impl Action {
    /// Creates a new Action.
    #[must_use]
    pub const fn new(name: String, details: Option<String>) -> Self {
        Self { name, details }
    }
}

/// A serialized view of a ledger row or request at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// The serialized state.
    pub data: String,
}

impl StateSnapshot {
    /// Creates a new `StateSnapshot`.
    #[must_use]
    pub const fn new(data: String) -> Self {
        Self { data }
    }

    /// The snapshot used before a row exists.
    #[must_use]
    pub fn absent() -> Self {
        Self::new(String::from("absent"))
    }
}

/// An immutable audit event representing a state transition.
///
/// Every successful ledger mutation and workflow transition produces exactly
/// one audit event. Events are scoped to the employee and entitlement year
/// they affect:
/// - Who performed the action (actor)
/// - Why it was performed (cause)
/// - What action was performed (action)
/// - The state before and after the transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Store-assigned identifier. `None` until the event is persisted.
    pub event_id: Option<i64>,
    /// The actor who initiated this state change.
    pub actor: Actor,
    /// The cause or reason for this state change.
    pub cause: Cause,
    /// The action that was performed.
    pub action: Action,
    /// The state before the transition.
    pub before: StateSnapshot,
    /// The state after the transition.
    pub after: StateSnapshot,
    /// The employee whose balance or request changed.
    pub employee_id: EmployeeId,
    /// The entitlement year affected.
    pub year: i32,
    /// When the transition happened.
    pub recorded_at: OffsetDateTime,
}

impl AuditEvent {
    /// Creates a new, not yet persisted `AuditEvent` stamped with the current time.
    #[must_use]
    pub fn new(
        actor: Actor,
        cause: Cause,
        action: Action,
        before: StateSnapshot,
        after: StateSnapshot,
        employee_id: EmployeeId,
        year: i32,
    ) -> Self {
        Self {
            event_id: None,
            actor,
            cause,
            action,
            before,
            after,
            employee_id,
            year,
            recorded_at: OffsetDateTime::now_utc(),
        }
    }

    /// Returns a copy carrying the store-assigned identifier.
    #[must_use]
    pub fn with_event_id(self, event_id: i64) -> Self {
        Self {
            event_id: Some(event_id),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn create_test_event() -> AuditEvent {
        AuditEvent::new(
            Actor::new(String::from("rh-1"), String::from("rh")),
            Cause::new(String::from("request-7"), String::from("Final approval")),
            Action::new(String::from("DebitDays"), Some(String::from("days=10"))),
            StateSnapshot::new(String::from("days_taken=0")),
            StateSnapshot::new(String::from("days_taken=10")),
            EmployeeId::new("E-100").unwrap(),
            2026,
        )
    }

    #[test]
    fn test_actor_creation_requires_all_fields() {
        let actor: Actor = Actor::new(String::from("user-123"), String::from("referente"));

        assert_eq!(actor.id, "user-123");
        assert_eq!(actor.actor_type, "referente");
    }

    #[test]
    fn test_employee_actor_uses_role_name() {
        let id: EmployeeId = EmployeeId::new("R-1").unwrap();
        let actor: Actor = Actor::employee(&id, Role::Referente);

        assert_eq!(actor.id, "R-1");
        assert_eq!(actor.actor_type, "referente");
    }

    #[test]
    fn test_system_actor() {
        let actor: Actor = Actor::system("annual-rollover");

        assert_eq!(actor.id, "annual-rollover");
        assert_eq!(actor.actor_type, "system");
    }

    #[test]
    fn test_action_creation_with_details() {
        let action: Action = Action::new(
            String::from("GrantAdditionalDays"),
            Some(String::from("days=2")),
        );

        assert_eq!(action.name, "GrantAdditionalDays");
        assert_eq!(action.details, Some(String::from("days=2")));
    }

    #[test]
    fn test_new_event_is_unpersisted() {
        let event: AuditEvent = create_test_event();

        assert_eq!(event.event_id, None);
        assert_eq!(event.year, 2026);
        assert_eq!(event.employee_id.value(), "E-100");
    }

    #[test]
    fn test_with_event_id_keeps_every_other_field() {
        let event: AuditEvent = create_test_event();
        let persisted: AuditEvent = event.clone().with_event_id(42);

        assert_eq!(persisted.event_id, Some(42));
        assert_eq!(persisted.actor, event.actor);
        assert_eq!(persisted.action, event.action);
        assert_eq!(persisted.before, event.before);
        assert_eq!(persisted.after, event.after);
        assert_eq!(persisted.recorded_at, event.recorded_at);
    }

    #[test]
    fn test_absent_snapshot() {
        assert_eq!(StateSnapshot::absent().data, "absent");
    }
}
