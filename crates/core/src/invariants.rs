//! Developer guardrails and invariants
//!
//! Debug assertions for detecting impossible states during development.
//! These checks are compiled out in release builds.

use uuid::Uuid;

use crate::models::{Capacity, Club, Event, EventRegistration, Membership};

/// Validate that a club's state is internally consistent
pub fn assert_club_invariants(club: &Club) {
    debug_assert!(
        club.owner_id != Uuid::nil(),
        "Club {} has nil owner_id",
        club.id
    );

    debug_assert!(
        !club.name.trim().is_empty(),
        "Club {} has empty name",
        club.id
    );
}

/// Validate that a membership belongs to the given club and never to its
/// owner
pub fn assert_membership_invariants(membership: &Membership, club: &Club) {
    debug_assert!(
        membership.club_id == club.id,
        "Membership {} references club {} but was checked against {}",
        membership.id,
        membership.club_id,
        club.id
    );

    debug_assert!(
        membership.user_id != Uuid::nil(),
        "Membership {} has nil user_id",
        membership.id
    );

    debug_assert!(
        membership.user_id != club.owner_id,
        "Membership {} belongs to the owner of club {}",
        membership.id,
        club.id
    );
}

/// Validate that a registration belongs to the given event and never to
/// the organizer
pub fn assert_registration_invariants(
    registration: &EventRegistration,
    event: &Event,
    owner_id: Uuid,
) {
    debug_assert!(
        registration.event_id == event.id,
        "Registration {} references event {} but was checked against {}",
        registration.id,
        registration.event_id,
        event.id
    );

    debug_assert!(
        registration.user_id != owner_id,
        "Registration {} belongs to the organizer of event {}",
        registration.id,
        event.id
    );
}

/// Validate capacity after a registration decision (never after an owner
/// override, which is allowed to exceed the limit)
pub fn assert_capacity_within_limit(event: &Event, capacity: &Capacity) {
    debug_assert!(
        capacity.confirmed <= capacity.max_participants,
        "Event {} has {} confirmed registrations for {} seats",
        event.id,
        capacity.confirmed,
        capacity.max_participants
    );
}
