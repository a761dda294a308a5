//! Registration engine
//!
//! Decides, inside one immediate-mode transaction per request, whether a
//! join lands confirmed, waitlisted, or rejected, and handles
//! cancellation, owner removal, and the owner's promotion override.

use tracing::info;
use uuid::Uuid;

use super::Engine;
use crate::error::{Error, Result};
use crate::invariants;
use crate::models::{Club, EventRegistration, EventRoster, RegistrationStatus};
use crate::permissions::ClubAction;

impl Engine {
    /// Register a user for an event
    ///
    /// The capacity read and the row insert happen in one transaction, so
    /// two simultaneous requests for the last open seat cannot both land
    /// confirmed. A full event queues the request when the event carries a
    /// waitlist and rejects it otherwise.
    pub fn register(
        &self,
        user_id: Uuid,
        club_id: Uuid,
        event_id: Uuid,
    ) -> Result<EventRegistration> {
        let club = self.club_or_not_found(club_id)?;
        let event = self.event_in_club(&club, event_id)?;

        let registration = self.db.immediate(|db| {
            self.check_registrant(&club, user_id)?;

            if db.registrations().find(event.id, user_id)?.is_some() {
                return Err(Error::DuplicateRegistration);
            }

            // Capacity at the moment of decision
            let confirmed = db
                .registrations()
                .count_with_status(event.id, RegistrationStatus::Confirmed)?;
            let status = if confirmed < event.max_participants {
                RegistrationStatus::Confirmed
            } else if event.has_waitlist {
                RegistrationStatus::Waitlist
            } else {
                return Err(Error::EventFull);
            };

            let registration = EventRegistration::new(event.id, user_id, status);
            db.registrations().create(&registration)?;

            invariants::assert_registration_invariants(&registration, &event, club.owner_id);
            Ok(registration)
        })?;

        // A confirmed decision can never breach the limit; waitlist rows
        // leave the confirmed count alone (which may already exceed the
        // limit after an owner override)
        if registration.is_confirmed() {
            invariants::assert_capacity_within_limit(&event, &self.capacity_of(&event)?);
        }
        info!(
            user_id = %user_id,
            event_id = %event.id,
            status = %registration.status,
            "registration created"
        );
        Ok(registration)
    }

    /// Cancel the caller's own registration, deleting the row
    ///
    /// The vacated seat stays open until the owner promotes someone from
    /// the waitlist; there is no automatic promotion.
    pub fn cancel_registration(
        &self,
        user_id: Uuid,
        club_id: Uuid,
        event_id: Uuid,
    ) -> Result<()> {
        let club = self.club_or_not_found(club_id)?;
        let event = self.event_in_club(&club, event_id)?;

        let registration = self
            .db
            .registrations()
            .find(event.id, user_id)?
            .ok_or_else(|| Error::NotFound("registration not found".into()))?;

        self.db.registrations().remove(registration.id)?;
        info!(user_id = %user_id, event_id = %event.id, "registration cancelled");
        Ok(())
    }

    /// Remove any registration from an event; owner only
    pub fn remove_registration(
        &self,
        actor_id: Uuid,
        club_id: Uuid,
        event_id: Uuid,
        registration_id: Uuid,
    ) -> Result<()> {
        let club = self.club_or_not_found(club_id)?;
        self.require_owner(&club, actor_id, ClubAction::ManageEvents)?;
        let event = self.event_in_club(&club, event_id)?;

        let registration = self.registration_in_event(event.id, registration_id)?;
        self.db.registrations().remove(registration.id)?;
        info!(registration_id = %registration.id, event_id = %event.id, "registration removed");
        Ok(())
    }

    /// Promote a registration to confirmed; owner only
    ///
    /// Capacity is deliberately not re-checked: the owner may confirm past
    /// `max_participants`. Registrant eligibility is re-validated on this
    /// write like any other.
    pub fn approve_registration(
        &self,
        actor_id: Uuid,
        club_id: Uuid,
        event_id: Uuid,
        registration_id: Uuid,
    ) -> Result<EventRegistration> {
        let club = self.club_or_not_found(club_id)?;
        self.require_owner(&club, actor_id, ClubAction::ManageEvents)?;
        let event = self.event_in_club(&club, event_id)?;

        let mut registration = self.registration_in_event(event.id, registration_id)?;
        self.check_registrant(&club, registration.user_id)?;

        self.db
            .registrations()
            .update_status(registration.id, RegistrationStatus::Confirmed)?;
        registration.status = RegistrationStatus::Confirmed;
        info!(registration_id = %registration.id, event_id = %event.id, "registration approved");
        Ok(registration)
    }

    /// Confirmed and waitlisted registrants, for active members and the
    /// owner
    pub fn event_roster(
        &self,
        viewer: Option<Uuid>,
        club_id: Uuid,
        event_id: Uuid,
    ) -> Result<EventRoster> {
        let club = self.visible_club(club_id, viewer)?;
        let actor = self.actor_for(&club, viewer)?;
        if !actor.can_perform(ClubAction::ViewEventDetail) {
            return Err(Error::PermissionDenied(
                "only club members can view events".into(),
            ));
        }
        let event = self.event_in_club(&club, event_id)?;

        Ok(EventRoster {
            confirmed: self
                .db
                .registrations()
                .participants(event.id, RegistrationStatus::Confirmed)?,
            waitlisted: self
                .db
                .registrations()
                .participants(event.id, RegistrationStatus::Waitlist)?,
        })
    }

    /// Both registrant rules, run independently on every write: the
    /// organizer never registers, and only active members register.
    fn check_registrant(&self, club: &Club, user_id: Uuid) -> Result<()> {
        if club.is_owner(Some(user_id)) {
            return Err(Error::Ineligible(
                "event organizer is automatically a participant".into(),
            ));
        }
        if !self.is_active_member(Some(user_id), club.id)? {
            return Err(Error::Ineligible(
                "only club members can register for events".into(),
            ));
        }
        Ok(())
    }

    fn registration_in_event(
        &self,
        event_id: Uuid,
        registration_id: Uuid,
    ) -> Result<EventRegistration> {
        self.db
            .registrations()
            .find_by_id(registration_id)?
            .filter(|r| r.event_id == event_id)
            .ok_or_else(|| Error::NotFound("registration not found".into()))
    }
}
