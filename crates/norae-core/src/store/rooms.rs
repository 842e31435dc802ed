//! # Room Registry Operations
//!
//! Mirroring of the externally owned room-identity list, live status
//! toggles, and the local add/rename/remove conveniences.
//!
//! ## Status Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     Room Status Transitions                         │
//! │                                                                     │
//! │              set_room_status(InProgress)                            │
//! │   Waiting ────────────────────────────────────► InProgress          │
//! │      ▲        start_time = now, end_time = None                     │
//! │      │        (auto-opens a business session if none)               │
//! │      │                                                              │
//! │      │  set_room_status(Waiting)   status only, timestamps kept     │
//! │      │  settle(room)               start = None, end = now          │
//! │      │  end_session()              start = None, end = close time   │
//! │      └──────────────────────────────────────────── InProgress       │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use crate::error::{LedgerError, LedgerResult};
use crate::types::{Room, RoomIdentity, RoomStatus, Usage};

use super::{new_uuid, LedgerStore};

impl LedgerStore {
    /// Replaces the room set from the external identity list.
    ///
    /// ## Behavior
    /// - rooms whose id is retained keep their live status and timestamps
    /// - rooms missing from the new list are dropped and their usage
    ///   ledgers garbage-collected
    /// - when the selected room is dropped, selection falls back to the
    ///   first remaining room
    /// - an empty list is a reported no-op (a collaborator glitch must not
    ///   wipe the venue)
    pub fn register_rooms(&mut self, identities: &[RoomIdentity]) -> LedgerResult<()> {
        if identities.is_empty() {
            return Err(LedgerError::EmptyRoomList);
        }

        let next_rooms: Vec<Room> = identities
            .iter()
            .map(|identity| {
                match self.rooms.iter().find(|room| room.id == identity.id) {
                    Some(existing) => Room {
                        id: identity.id.clone(),
                        name: identity.name.clone(),
                        status: existing.status,
                        start_time: existing.start_time,
                        end_time: existing.end_time,
                    },
                    None => Room::waiting(identity.id.clone(), identity.name.clone()),
                }
            })
            .collect();

        let mut next_usage = HashMap::with_capacity(next_rooms.len());
        for room in &next_rooms {
            let usage = self.usage_by_room.remove(&room.id).unwrap_or_default();
            next_usage.insert(room.id.clone(), usage);
        }

        self.rooms = next_rooms;
        self.usage_by_room = next_usage;
        self.fix_selection();
        Ok(())
    }

    /// Transitions one room between waiting and in-progress.
    ///
    /// ## Auto-Open
    /// Entering in-progress with no open business session opens one on the
    /// spot. Operators forget the "start business" button in practice; a
    /// running room outside any session would silently fall out of the
    /// daily report, so the session follows the first room instead.
    ///
    /// ## Behavior
    /// - to `InProgress`: stamps `start_time = now`, clears `end_time`
    /// - to `Waiting`: clears status only; timestamps stay for display.
    ///   Callers wanting a clean slate settle or reset instead.
    pub fn set_room_status(&mut self, room_id: &str, status: RoomStatus) -> LedgerResult<()> {
        let index = self.require_room(room_id)?;
        let changed_at = Self::now();

        if status == RoomStatus::InProgress && self.active_session_id.is_none() {
            self.open_session_at(changed_at);
        }

        let room = &mut self.rooms[index];
        match status {
            RoomStatus::InProgress => {
                room.status = RoomStatus::InProgress;
                room.start_time = Some(changed_at);
                room.end_time = None;
            }
            RoomStatus::Waiting => {
                room.status = RoomStatus::Waiting;
            }
        }
        Ok(())
    }

    /// Changes which room the UI is showing.
    pub fn select_room(&mut self, room_id: &str) -> LedgerResult<()> {
        self.require_room(room_id)?;
        self.selected_room_id = room_id.to_string();
        Ok(())
    }

    /// Appends a new waiting room named after its position (`5번방`, ...)
    /// and returns its id.
    pub fn add_room(&mut self) -> String {
        let name = format!("{}번방", self.rooms.len() + 1);
        let id = format!("room-{}", new_uuid());
        self.usage_by_room.insert(id.clone(), Usage::default());
        self.rooms.push(Room::waiting(id.clone(), name));
        id
    }

    /// Renames a room. Blank names keep the old one.
    pub fn rename_room(&mut self, room_id: &str, name: &str) -> LedgerResult<()> {
        let index = self.require_room(room_id)?;
        let trimmed = name.trim();
        if !trimmed.is_empty() {
            self.rooms[index].name = trimmed.to_string();
        }
        Ok(())
    }

    /// Drops a room and its usage ledger.
    ///
    /// The last room can never be removed; the venue always has somewhere
    /// to seat a customer.
    pub fn remove_room(&mut self, room_id: &str) -> LedgerResult<()> {
        if self.rooms.len() <= 1 {
            return Err(LedgerError::LastRoom);
        }
        let index = self.require_room(room_id)?;
        self.rooms.remove(index);
        self.usage_by_room.remove(room_id);
        self.fix_selection();
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
