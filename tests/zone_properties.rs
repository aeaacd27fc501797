//! Property tests for zone invariants

use proptest::prelude::*;
use std::sync::Arc;
use tabletop_sim::{
    core::{Card, CardId, CardInstance, Color, PlayerId},
    zones::{Zone, ZoneKind},
    SimError,
};

fn instance(raw: u32) -> CardInstance {
    CardInstance::new(
        CardId::new(raw),
        Arc::new(Card::basic_land("Forest", Color::Green)),
        PlayerId::new(0),
    )
}

fn filled(ids: &[u32]) -> Zone<CardInstance> {
    let mut zone = Zone::hidden(ZoneKind::Library, PlayerId::new(0));
    for id in ids {
        zone.add_to_top(instance(*id)).unwrap();
    }
    zone
}

fn unique_ids() -> impl Strategy<Value = Vec<u32>> {
    proptest::collection::btree_set(0u32..500, 0..20).prop_map(|s| s.into_iter().collect())
}

proptest! {
    #[test]
    fn prop_duplicate_add_rejected(ids in unique_ids(), pick in any::<prop::sample::Index>()) {
        prop_assume!(!ids.is_empty());
        let mut zone = filled(&ids);
        let dup = ids[pick.index(ids.len())];

        let before = zone.ids();
        let top = zone.add_to_top(instance(dup));
        let bottom = zone.add_to_bottom(instance(dup));
        let top_is_duplicate = matches!(top, Err(SimError::DuplicateEntity { .. }));
        let bottom_is_duplicate = matches!(bottom, Err(SimError::DuplicateEntity { .. }));
        prop_assert!(top_is_duplicate);
        prop_assert!(bottom_is_duplicate);
        prop_assert_eq!(zone.ids(), before);
    }

    #[test]
    fn prop_remove_many_is_all_or_nothing(ids in unique_ids(), n in 0usize..30) {
        let mut zone = filled(&ids);
        let before = zone.ids();

        match zone.remove_many_from_top(n) {
            Ok(removed) => {
                prop_assert!(n <= ids.len());
                let removed_ids: Vec<CardId> = removed.iter().map(|c| c.id).collect();
                prop_assert_eq!(&removed_ids[..], &before[..n]);
                prop_assert_eq!(zone.quantity(), ids.len() - n);
            }
            Err(SimError::ZoneUnderflow { requested, available, .. }) => {
                prop_assert!(n > ids.len());
                prop_assert_eq!(requested, n);
                prop_assert_eq!(available, ids.len());
                prop_assert_eq!(zone.ids(), before);
            }
            Err(other) => prop_assert!(false, "unexpected error {other:?}"),
        }
    }

    #[test]
    fn prop_move_is_atomic(ids in unique_ids(), target_ids in unique_ids(), probe in 0u32..500) {
        let mut source = filled(&ids);
        let mut target = Zone::public(ZoneKind::Graveyard, Some(PlayerId::new(0)));
        for id in target_ids.iter().filter(|id| !ids.contains(id)) {
            target.add_to_top(instance(*id)).unwrap();
        }
        let (source_before, target_before) = (source.ids(), target.ids());

        let moved = source.move_to_zone(CardId::new(probe), &mut target, |c| Ok(c.clone()));
        if moved.is_ok() {
            prop_assert!(!source.contains(CardId::new(probe)));
            prop_assert!(target.contains(CardId::new(probe)));
            prop_assert_eq!(source.quantity() + target.quantity(), source_before.len() + target_before.len());
        } else {
            prop_assert_eq!(source.ids(), source_before);
            prop_assert_eq!(target.ids(), target_before);
        }
    }

    #[test]
    fn prop_failed_conversion_leaves_both_zones(ids in unique_ids(), pick in any::<prop::sample::Index>()) {
        prop_assume!(!ids.is_empty());
        let mut source = filled(&ids);
        let mut target: Zone<CardInstance> = Zone::public(ZoneKind::Exile, None);
        let id = CardId::new(ids[pick.index(ids.len())]);
        let before = source.ids();

        let result = source.move_to_zone(id, &mut target, |_| {
            Err(SimError::ContractViolation("cannot convert".into()))
        });
        prop_assert!(result.is_err());
        prop_assert_eq!(source.ids(), before);
        prop_assert!(target.is_empty());
    }
}
