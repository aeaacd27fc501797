//! Game zones (Library, Hand, Battlefield, Graveyard, Stack, ...)
//!
//! A zone is an ordered container of entities whose top is the end of the
//! vector. An entity is in at most one place in a zone, and a move between
//! zones either fully happens or leaves both zones untouched.

use crate::core::{Card, CardId, GameEntity, PlayerId};
use crate::{Result, SimError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoneKind {
    Library,
    Hand,
    Battlefield,
    Graveyard,
    Stack,
    Exile,
    Command,
    Ante,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoneVisibility {
    /// Anyone may look
    Public,
    /// Only the owner may look
    Hidden,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Zone<T> {
    kind: ZoneKind,
    visibility: ZoneVisibility,
    owner: Option<PlayerId>,
    items: Vec<T>,
}

impl<T: GameEntity<Card> + Clone> Zone<T> {
    pub fn public(kind: ZoneKind, owner: Option<PlayerId>) -> Self {
        Zone {
            kind,
            visibility: ZoneVisibility::Public,
            owner,
            items: Vec::new(),
        }
    }

    pub fn hidden(kind: ZoneKind, owner: PlayerId) -> Self {
        Zone {
            kind,
            visibility: ZoneVisibility::Hidden,
            owner: Some(owner),
            items: Vec::new(),
        }
    }

    pub fn kind(&self) -> ZoneKind {
        self.kind
    }

    pub fn visibility(&self) -> ZoneVisibility {
        self.visibility
    }

    pub fn owner(&self) -> Option<PlayerId> {
        self.owner
    }

    /// Whether `viewer` may see the contents
    pub fn is_visible_to(&self, viewer: PlayerId) -> bool {
        self.visibility == ZoneVisibility::Public || self.owner == Some(viewer)
    }

    pub fn quantity(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: CardId) -> bool {
        self.position(id).is_some()
    }

    fn position(&self, id: CardId) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    fn duplicate(&self, id: CardId) -> SimError {
        SimError::DuplicateEntity {
            zone: self.kind,
            entity: id.to_string(),
        }
    }

    fn not_found(&self, id: CardId) -> SimError {
        SimError::NotInZone {
            zone: self.kind,
            entity: id.to_string(),
        }
    }

    fn underflow(&self, requested: usize) -> SimError {
        SimError::ZoneUnderflow {
            zone: self.kind,
            requested,
            available: self.items.len(),
        }
    }

    pub fn add_to_top(&mut self, item: T) -> Result<()> {
        if self.contains(item.id()) {
            return Err(self.duplicate(item.id()));
        }
        self.items.push(item);
        Ok(())
    }

    pub fn add_to_bottom(&mut self, item: T) -> Result<()> {
        if self.contains(item.id()) {
            return Err(self.duplicate(item.id()));
        }
        self.items.insert(0, item);
        Ok(())
    }

    pub fn get(&self, id: CardId) -> Result<&T> {
        self.items
            .iter()
            .find(|item| item.id() == id)
            .ok_or_else(|| self.not_found(id))
    }

    pub fn get_mut(&mut self, id: CardId) -> Result<&mut T> {
        let err = self.not_found(id);
        self.items.iter_mut().find(|item| item.id() == id).ok_or(err)
    }

    pub fn find_from_top(&self) -> Result<&T> {
        self.items.last().ok_or_else(|| self.underflow(1))
    }

    /// The top `n` entities, topmost first
    pub fn find_many_from_top(&self, n: usize) -> Result<Vec<&T>> {
        if n > self.items.len() {
            return Err(self.underflow(n));
        }
        Ok(self.items.iter().rev().take(n).collect())
    }

    pub fn remove_from_top(&mut self) -> Result<T> {
        let err = self.underflow(1);
        self.items.pop().ok_or(err)
    }

    /// Remove the top `n` entities, topmost first; nothing is removed on underflow
    pub fn remove_many_from_top(&mut self, n: usize) -> Result<Vec<T>> {
        if n > self.items.len() {
            return Err(self.underflow(n));
        }
        let split = self.items.len() - n;
        let mut taken = self.items.split_off(split);
        taken.reverse();
        Ok(taken)
    }

    pub fn remove(&mut self, id: CardId) -> Result<T> {
        match self.position(id) {
            Some(pos) => Ok(self.items.remove(pos)),
            None => Err(self.not_found(id)),
        }
    }

    /// Snapshot of the contents, top to bottom
    pub fn find_all(&self) -> Vec<T> {
        self.items.iter().rev().cloned().collect()
    }

    /// IDs of the contents, top to bottom
    pub fn ids(&self) -> Vec<CardId> {
        self.items.iter().rev().map(|item| item.id()).collect()
    }

    /// Iterate bottom to top
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub fn shuffle(&mut self, rng: &mut impl rand::Rng) {
        use rand::seq::SliceRandom;
        self.items.shuffle(rng);
    }

    /// Move one entity to the top of `target`, converting it on the way.
    ///
    /// Fails without changing either zone if the entity is absent, the
    /// conversion fails, or the target already holds the same ID.
    pub fn move_to_zone<U, F>(&mut self, id: CardId, target: &mut Zone<U>, convert: F) -> Result<()>
    where
        U: GameEntity<Card> + Clone,
        F: FnOnce(&T) -> Result<U>,
    {
        let pos = self.position(id).ok_or_else(|| self.not_found(id))?;
        let moved = convert(&self.items[pos])?;
        if target.contains(moved.id()) {
            return Err(target.duplicate(moved.id()));
        }
        self.items.remove(pos);
        target.items.push(moved);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CardInstance, Color};
    use std::sync::Arc;

    fn forest(id: u32) -> CardInstance {
        CardInstance::new(
            CardId::new(id),
            Arc::new(Card::basic_land("Forest", Color::Green)),
            PlayerId::new(0),
        )
    }

    fn library_of(ids: &[u32]) -> Zone<CardInstance> {
        let mut zone = Zone::hidden(ZoneKind::Library, PlayerId::new(0));
        for &id in ids {
            zone.add_to_top(forest(id)).unwrap();
        }
        zone
    }

    #[test]
    fn test_top_is_last_added() {
        let mut library = library_of(&[10, 11, 12]);
        assert_eq!(library.find_from_top().unwrap().id, CardId::new(12));
        assert_eq!(library.ids(), vec![CardId::new(12), CardId::new(11), CardId::new(10)]);

        library.add_to_bottom(forest(9)).unwrap();
        let drawn = library.remove_many_from_top(4).unwrap();
        let ids: Vec<u32> = drawn.iter().map(|c| c.id.as_u32()).collect();
        assert_eq!(ids, vec![12, 11, 10, 9]);
        assert!(library.is_empty());
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut hand = library_of(&[1]);
        let err = hand.add_to_top(forest(1)).unwrap_err();
        assert!(matches!(err, SimError::DuplicateEntity { zone: ZoneKind::Library, .. }));
        assert_eq!(hand.quantity(), 1);
    }

    #[test]
    fn test_underflow_leaves_zone_intact() {
        let mut library = library_of(&[1, 2]);
        let err = library.remove_many_from_top(3).unwrap_err();
        assert!(matches!(
            err,
            SimError::ZoneUnderflow {
                requested: 3,
                available: 2,
                ..
            }
        ));
        assert_eq!(library.quantity(), 2);
        assert!(library.find_many_from_top(3).is_err());
    }

    #[test]
    fn test_empty_zone_reports_underflow() {
        let mut graveyard: Zone<CardInstance> = Zone::public(ZoneKind::Graveyard, Some(PlayerId::new(0)));
        assert!(matches!(
            graveyard.find_from_top(),
            Err(SimError::ZoneUnderflow {
                requested: 1,
                available: 0,
                ..
            })
        ));
        assert!(matches!(
            graveyard.remove_from_top(),
            Err(SimError::ZoneUnderflow {
                requested: 1,
                available: 0,
                ..
            })
        ));
        assert_eq!(graveyard.quantity(), 0);

        graveyard.add_to_top(forest(5)).unwrap();
        assert_eq!(graveyard.remove_from_top().unwrap().id, CardId::new(5));
        assert!(graveyard.remove_from_top().is_err());
        assert!(graveyard.is_empty());
    }

    #[test]
    fn test_find_all_is_a_snapshot() {
        let mut library = library_of(&[1, 2, 3]);
        let snapshot = library.find_all();
        let ids: Vec<u32> = snapshot.iter().map(|c| c.id.as_u32()).collect();
        assert_eq!(ids, vec![3, 2, 1]);

        for card in &snapshot {
            library.remove(card.id).unwrap();
        }
        library.add_to_top(forest(4)).unwrap();

        assert_eq!(snapshot.len(), 3);
        assert_eq!(library.ids(), vec![CardId::new(4)]);
    }

    #[test]
    fn test_iter_runs_bottom_to_top() {
        let library = library_of(&[1, 2, 3]);
        let top_down: Vec<u32> = library.iter().rev().map(|c| c.id.as_u32()).collect();
        assert_eq!(top_down, vec![3, 2, 1]);
    }

    #[test]
    fn test_move_is_atomic() {
        let mut library = library_of(&[1, 2]);
        let mut hand = Zone::hidden(ZoneKind::Hand, PlayerId::new(0));
        hand.add_to_top(forest(2)).unwrap();

        // Target already holds #2: nothing moves
        assert!(library.move_to_zone(CardId::new(2), &mut hand, |c| Ok(c.clone())).is_err());
        assert_eq!(library.quantity(), 2);
        assert_eq!(hand.quantity(), 1);

        // Failing conversion: nothing moves
        let failed = library.move_to_zone(CardId::new(1), &mut hand, |_| {
            Err(SimError::ContractViolation("no".into()))
        });
        assert!(failed.is_err());
        assert!(library.contains(CardId::new(1)));

        library.move_to_zone(CardId::new(1), &mut hand, |c| Ok(c.clone())).unwrap();
        assert!(!library.contains(CardId::new(1)));
        assert_eq!(hand.find_from_top().unwrap().id, CardId::new(1));
    }

    #[test]
    fn test_visibility() {
        let hand: Zone<CardInstance> = Zone::hidden(ZoneKind::Hand, PlayerId::new(0));
        let graveyard: Zone<CardInstance> = Zone::public(ZoneKind::Graveyard, Some(PlayerId::new(0)));
        assert!(hand.is_visible_to(PlayerId::new(0)));
        assert!(!hand.is_visible_to(PlayerId::new(1)));
        assert!(graveyard.is_visible_to(PlayerId::new(1)));
    }
}
