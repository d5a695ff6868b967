//! Property-based tests for collection state and persistence.
//!
//! # Properties Tested
//!
//! 1. **Restore Property**: after any sequence of operations, a manager
//!    restored from the same store holds identical collections
//! 2. **Capacity Property**: the compare set never exceeds its limit
//! 3. **Count Property**: cart count equals the sum of line quantities
//! 4. **Uniqueness Property**: no collection holds an id twice
//! 5. **Fail-open Property**: arbitrary stored bytes never panic on load

use proptest::prelude::*;
use std::collections::HashSet;
use storefront_state::backend::{InMemoryBackend, StorageBackend};
use storefront_state::catalog::InMemoryCatalog;
use storefront_state::{CollectionManager, ProductId, COMPARE_LIMIT};

// ============================================================================
// Operation generator
// ============================================================================

#[derive(Clone, Debug)]
enum Op {
    AddToCart(u32),
    RemoveFromCart(u32),
    ToggleWishlist(u32),
    ToggleCompare(u32),
    SelectSize(u32, &'static str),
}

const SIZES: &[&str] = &["XS", "M", "XL", "27", "38", "ONE SIZE"];

/// Ids 0..=10 cover all eight seeded products plus unknown ones.
fn arb_op() -> impl Strategy<Value = Op> {
    let id = 0u32..=10;
    prop_oneof![
        3 => id.clone().prop_map(Op::AddToCart),
        1 => id.clone().prop_map(Op::RemoveFromCart),
        2 => id.clone().prop_map(Op::ToggleWishlist),
        2 => id.clone().prop_map(Op::ToggleCompare),
        1 => (id, prop::sample::select(SIZES)).prop_map(|(id, size)| Op::SelectSize(id, size)),
    ]
}

fn apply(store: &mut CollectionManager<InMemoryCatalog, InMemoryBackend>, op: &Op) {
    match *op {
        Op::AddToCart(id) => {
            store.add_to_cart(ProductId(id));
        }
        Op::RemoveFromCart(id) => {
            store.remove_from_cart(ProductId(id));
        }
        Op::ToggleWishlist(id) => {
            store.toggle_wishlist(ProductId(id));
        }
        Op::ToggleCompare(id) => {
            let _ = store.toggle_compare(ProductId(id));
        }
        Op::SelectSize(id, size) => {
            let _ = store.select_size(ProductId(id), size);
        }
    }
}

fn unique(ids: impl Iterator<Item = ProductId>) -> bool {
    let mut seen = HashSet::new();
    ids.into_iter().all(|id| seen.insert(id))
}

// ============================================================================
// Properties 1-4: state invariants
// ============================================================================

proptest! {
    /// Property: a restart restores exactly what was in memory
    #[test]
    fn prop_restore_matches_memory(ops in prop::collection::vec(arb_op(), 0..60)) {
        let backend = InMemoryBackend::new();
        let mut store = CollectionManager::new(InMemoryCatalog::seeded(), backend.clone());
        for op in &ops {
            apply(&mut store, op);
        }

        let restored = CollectionManager::new(InMemoryCatalog::seeded(), backend);

        prop_assert_eq!(restored.cart(), store.cart());
        prop_assert_eq!(restored.wishlist(), store.wishlist());
        prop_assert_eq!(restored.compare(), store.compare());
        prop_assert_eq!(restored.counts(), store.counts());
    }

    /// Property: compare never exceeds the limit, cart count sums quantities,
    /// and ids are unique in every collection
    #[test]
    fn prop_collection_invariants(ops in prop::collection::vec(arb_op(), 0..80)) {
        let mut store = CollectionManager::new(InMemoryCatalog::seeded(), InMemoryBackend::new());

        for op in &ops {
            apply(&mut store, op);

            prop_assert!(store.compare_count() <= COMPARE_LIMIT);
            let quantities: usize = store.cart().iter().map(|l| l.quantity as usize).sum();
            prop_assert_eq!(store.cart_count(), quantities);
            prop_assert!(store.cart().iter().all(|l| l.quantity >= 1));
            prop_assert!(store.cart().iter().all(|l| l.product.offers_size(&l.selected_size)));
        }

        prop_assert!(unique(store.cart().iter().map(|l| l.product.id)));
        prop_assert!(unique(store.wishlist().iter().map(|p| p.id)));
        prop_assert!(unique(store.compare().iter().map(|p| p.id)));
    }

    /// Property: toggling the same id twice keeps wishlist membership
    #[test]
    fn prop_wishlist_double_toggle_is_identity(
        ops in prop::collection::vec(arb_op(), 0..30),
        id in 1u32..=8,
    ) {
        let mut store = CollectionManager::new(InMemoryCatalog::seeded(), InMemoryBackend::new());
        for op in &ops {
            apply(&mut store, op);
        }
        let before = store.wishlist().to_vec();

        store.toggle_wishlist(ProductId(id));
        store.toggle_wishlist(ProductId(id));

        let after = store.wishlist().to_vec();
        if before.iter().any(|p| p.id.0 == id) {
            // Removed, then re-added at the end.
            let mut expected = before.clone();
            expected.retain(|p| p.id.0 != id);
            expected.push(before.iter().find(|p| p.id.0 == id).unwrap().clone());
            prop_assert_eq!(after, expected);
        } else {
            prop_assert_eq!(after, before);
        }
    }
}

// ============================================================================
// Property 5: fail-open load
// ============================================================================

proptest! {
    /// Property: arbitrary stored bytes load as some valid state, never panic
    #[test]
    fn prop_arbitrary_bytes_never_panic(
        cart in prop::collection::vec(any::<u8>(), 0..256),
        wishlist in ".{0,64}",
    ) {
        let backend = InMemoryBackend::new();
        backend.set("cart", cart).unwrap();
        backend.set("wishlist", wishlist.into_bytes()).unwrap();

        let store = CollectionManager::new(InMemoryCatalog::seeded(), backend);

        prop_assert!(store.compare().is_empty());
        prop_assert!(unique(store.wishlist().iter().map(|p| p.id)));
    }
}
