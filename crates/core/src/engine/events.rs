//! Event catalog operations

use tracing::info;
use uuid::Uuid;

use super::Engine;
use crate::error::{Error, Result};
use crate::models::{Capacity, Event, EventAttrs, RegistrationStatus};
use crate::permissions::ClubAction;

impl Engine {
    /// Create an event; owner only. The start must be in the future at
    /// creation time.
    pub fn create_event(
        &self,
        actor_id: Uuid,
        club_id: Uuid,
        attrs: EventAttrs,
    ) -> Result<Event> {
        let club = self.club_or_not_found(club_id)?;
        self.require_owner(&club, actor_id, ClubAction::ManageEvents)?;

        let event = Event::new(club.id, attrs);
        event.validate_for_create()?;

        self.db.events().create(&event)?;
        info!(event_id = %event.id, club_id = %club.id, "event created");
        Ok(event)
    }

    /// Update an event; owner only. The window and capacity rules are
    /// re-checked, the future-start rule is not.
    pub fn update_event(
        &self,
        actor_id: Uuid,
        club_id: Uuid,
        event_id: Uuid,
        attrs: EventAttrs,
    ) -> Result<Event> {
        let club = self.club_or_not_found(club_id)?;
        self.require_owner(&club, actor_id, ClubAction::ManageEvents)?;

        let mut event = self.event_in_club(&club, event_id)?;
        event.name = attrs.name;
        event.location = attrs.location;
        event.location_name = attrs.location_name;
        event.starts_at = attrs.starts_at;
        event.ends_at = attrs.ends_at;
        event.max_participants = attrs.max_participants;
        event.has_waitlist = attrs.has_waitlist;
        event.validate()?;

        self.db.events().update(&event)?;
        Ok(event)
    }

    /// Delete an event; owner only. Registrations go with it.
    pub fn delete_event(&self, actor_id: Uuid, club_id: Uuid, event_id: Uuid) -> Result<()> {
        let club = self.club_or_not_found(club_id)?;
        self.require_owner(&club, actor_id, ClubAction::ManageEvents)?;

        let event = self.event_in_club(&club, event_id)?;
        self.db.events().delete(event.id)?;
        info!(event_id = %event.id, club_id = %club.id, "event deleted");
        Ok(())
    }

    /// Event detail for active members and the owner
    pub fn event(&self, viewer: Option<Uuid>, club_id: Uuid, event_id: Uuid) -> Result<Event> {
        let club = self.visible_club(club_id, viewer)?;
        let actor = self.actor_for(&club, viewer)?;
        if !actor.can_perform(ClubAction::ViewEventDetail) {
            return Err(Error::PermissionDenied(
                "only club members can view events".into(),
            ));
        }
        self.event_in_club(&club, event_id)
    }

    /// Upcoming events for a visible club, soonest first
    pub fn upcoming_events(&self, viewer: Option<Uuid>, club_id: Uuid) -> Result<Vec<Event>> {
        let club = self.visible_club(club_id, viewer)?;
        self.db.events().upcoming(club.id)
    }

    /// Past events for a visible club, most recent first
    pub fn past_events(&self, viewer: Option<Uuid>, club_id: Uuid) -> Result<Vec<Event>> {
        let club = self.visible_club(club_id, viewer)?;
        self.db.events().past(club.id)
    }

    /// Derived capacity figures for an event on a visible club
    pub fn event_capacity(
        &self,
        viewer: Option<Uuid>,
        club_id: Uuid,
        event_id: Uuid,
    ) -> Result<Capacity> {
        let club = self.visible_club(club_id, viewer)?;
        let event = self.event_in_club(&club, event_id)?;
        self.capacity_of(&event)
    }

    /// The caller's own registration status for an event, if any
    pub fn registration_status(
        &self,
        user_id: Uuid,
        club_id: Uuid,
        event_id: Uuid,
    ) -> Result<Option<RegistrationStatus>> {
        let club = self.club_or_not_found(club_id)?;
        let event = self.event_in_club(&club, event_id)?;
        self.db.registrations().status_of(event.id, user_id)
    }

    pub(super) fn capacity_of(&self, event: &Event) -> Result<Capacity> {
        Ok(Capacity {
            max_participants: event.max_participants,
            confirmed: self
                .db
                .registrations()
                .count_with_status(event.id, RegistrationStatus::Confirmed)?,
            waitlisted: self
                .db
                .registrations()
                .count_with_status(event.id, RegistrationStatus::Waitlist)?,
        })
    }
}
